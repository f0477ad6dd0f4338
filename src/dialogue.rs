//! Conversation state for the per-user ordering dialogues.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

/// The per-user conversation stage.
///
/// Answers accumulated so far ride along in the variant payloads, so an
/// `Idle` user structurally carries no data and a terminal transition clears
/// stage and data in one step.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum OrderDialogueState {
    #[default]
    Idle,
    /// Registration: waiting for the customer's first name.
    RegisterName,
    /// Registration: waiting for the last name.
    RegisterSurname { name: String },
    /// Registration: waiting for the age.
    RegisterAge { name: String, surname: String },
    /// Registration: waiting for a shared contact with the phone number.
    RegisterPhone {
        name: String,
        surname: String,
        age: String,
    },
    /// Admin product entry: waiting for the product name.
    AddProductName,
    /// Admin product entry: waiting for the display price.
    AddProductPrice { name: String },
    /// Ordering: a product was picked, waiting for the quantity.
    OrderQuantity { product_id: i64 },
}

/// Type alias for the ordering dialogue.
pub type OrderDialogue = Dialogue<OrderDialogueState, InMemStorage<OrderDialogueState>>;

/// Validates a free-text dialogue answer (names, product fields, quantities).
pub fn validate_text_input(input: &str) -> Result<String, &'static str> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err("empty");
    }

    if trimmed.len() > 255 {
        return Err("too_long");
    }

    Ok(trimmed.to_string())
}
