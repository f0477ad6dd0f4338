//! Dialogue Manager module for handling dialogue stage transitions
//!
//! One function per stage of the transition table. Each sends the outbound
//! reply first and advances the dialogue after, so a failed send leaves the
//! stage unchanged and the user can retry the same step.

use anyhow::Result;
use sqlx::sqlite::SqlitePool;
use teloxide::prelude::*;
use teloxide::types::Contact;
use tracing::{error, info};

use crate::catalog;
use crate::dialogue::{validate_text_input, OrderDialogue, OrderDialogueState};
use crate::order::{self, DispatchOutcome, OrderRequest};

use super::ui_builder::{
    admin_keyboard, contact_request_keyboard, order_entry_keyboard, TRANSIENT_ERROR,
};

const INVALID_INPUT: &str = "Please send a short text answer.";

/// Registration: the customer's first name.
pub async fn handle_register_name_input(
    bot: &Bot,
    msg: &Message,
    dialogue: OrderDialogue,
    input: &str,
) -> Result<()> {
    let name = match validate_text_input(input) {
        Ok(name) => name,
        Err(_) => {
            bot.send_message(msg.chat.id, INVALID_INPUT).await?;
            return Ok(());
        }
    };

    bot.send_message(msg.chat.id, "Please enter your last name:")
        .await?;
    dialogue
        .update(OrderDialogueState::RegisterSurname { name })
        .await?;

    Ok(())
}

/// Registration: the last name.
pub async fn handle_register_surname_input(
    bot: &Bot,
    msg: &Message,
    dialogue: OrderDialogue,
    input: &str,
    name: String,
) -> Result<()> {
    let surname = match validate_text_input(input) {
        Ok(surname) => surname,
        Err(_) => {
            bot.send_message(msg.chat.id, INVALID_INPUT).await?;
            return Ok(());
        }
    };

    bot.send_message(msg.chat.id, "Please enter your age:")
        .await?;
    dialogue
        .update(OrderDialogueState::RegisterAge { name, surname })
        .await?;

    Ok(())
}

/// Registration: the age, then request the phone via a contact share.
pub async fn handle_register_age_input(
    bot: &Bot,
    msg: &Message,
    dialogue: OrderDialogue,
    input: &str,
    name: String,
    surname: String,
) -> Result<()> {
    let age = match validate_text_input(input) {
        Ok(age) => age,
        Err(_) => {
            bot.send_message(msg.chat.id, INVALID_INPUT).await?;
            return Ok(());
        }
    };

    bot.send_message(msg.chat.id, "Please share your phone number:")
        .reply_markup(contact_request_keyboard())
        .await?;
    dialogue
        .update(OrderDialogueState::RegisterPhone { name, surname, age })
        .await?;

    Ok(())
}

/// Registration: the shared contact completes the dialogue.
///
/// The collected profile lives only for the duration of the dialogue; once
/// registration confirms, it is discarded along with the stage.
pub async fn handle_register_phone_contact(
    bot: &Bot,
    msg: &Message,
    dialogue: OrderDialogue,
    contact: &Contact,
    _name: String,
    _surname: String,
    _age: String,
) -> Result<()> {
    info!(
        user_id = %msg.chat.id,
        phone_len = contact.phone_number.len(),
        "Registration completed"
    );

    bot.send_message(msg.chat.id, "Registration complete ✅")
        .reply_markup(order_entry_keyboard())
        .await?;
    dialogue.exit().await?;

    Ok(())
}

/// Product entry: the candidate product name.
pub async fn handle_product_name_input(
    bot: &Bot,
    msg: &Message,
    dialogue: OrderDialogue,
    input: &str,
) -> Result<()> {
    let name = match validate_text_input(input) {
        Ok(name) => name,
        Err(_) => {
            bot.send_message(msg.chat.id, INVALID_INPUT).await?;
            return Ok(());
        }
    };

    bot.send_message(msg.chat.id, "Enter the price:").await?;
    dialogue
        .update(OrderDialogueState::AddProductPrice { name })
        .await?;

    Ok(())
}

/// Product entry: the price completes the dialogue and inserts the product.
pub async fn handle_product_price_input(
    bot: &Bot,
    msg: &Message,
    dialogue: OrderDialogue,
    pool: SqlitePool,
    input: &str,
    name: String,
) -> Result<()> {
    // The price is an opaque display string; it is stored as typed.
    let price = match validate_text_input(input) {
        Ok(price) => price,
        Err(_) => {
            bot.send_message(msg.chat.id, INVALID_INPUT).await?;
            return Ok(());
        }
    };

    match catalog::create_product(&pool, &name, &price).await {
        Ok(product_id) => {
            info!(user_id = %msg.chat.id, product_id, "Product added by admin");
            bot.send_message(msg.chat.id, "Product added ✅")
                .reply_markup(admin_keyboard())
                .await?;
            dialogue.exit().await?;
        }
        Err(e) => {
            // Stage unchanged so the admin can resend the price.
            error!(user_id = %msg.chat.id, error = %e, "Failed to insert product");
            bot.send_message(msg.chat.id, TRANSIENT_ERROR).await?;
        }
    }

    Ok(())
}

/// Ordering: the quantity completes the dialogue and dispatches the order.
pub async fn handle_order_quantity_input(
    bot: &Bot,
    msg: &Message,
    dialogue: OrderDialogue,
    pool: SqlitePool,
    admin_chat: ChatId,
    input: &str,
    product_id: i64,
) -> Result<()> {
    let quantity = match validate_text_input(input) {
        Ok(quantity) => quantity,
        Err(_) => {
            bot.send_message(msg.chat.id, INVALID_INPUT).await?;
            return Ok(());
        }
    };

    let (customer_name, customer_username, customer_id) = match msg.from.as_ref() {
        Some(user) => (user.first_name.clone(), user.username.clone(), user.id.0),
        None => (msg.chat.id.to_string(), None, msg.chat.id.0 as u64),
    };

    let request = OrderRequest {
        product_id,
        quantity,
        customer_name,
        customer_username,
        customer_id,
    };

    match order::dispatch(bot, &pool, admin_chat, &request).await {
        Ok(DispatchOutcome::Sent) => {
            bot.send_message(msg.chat.id, "Your order has been sent ✅")
                .await?;
            dialogue.exit().await?;
        }
        Ok(DispatchOutcome::ProductMissing) => {
            bot.send_message(
                msg.chat.id,
                "That product is no longer available. Please pick another one.",
            )
            .await?;
            dialogue.exit().await?;
        }
        Err(e) => {
            // Stage unchanged so the customer can resend the quantity.
            error!(user_id = %msg.chat.id, product_id, error = %e, "Failed to dispatch order");
            bot.send_message(msg.chat.id, TRANSIENT_ERROR).await?;
        }
    }

    Ok(())
}
