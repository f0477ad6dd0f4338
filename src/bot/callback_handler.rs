//! Callback Handler module for processing inline keyboard callback queries
//!
//! Product pickers attach an opaque `del_<id>` / `order_<id>` payload to each
//! button. Selections are honored regardless of the sender's current dialogue
//! stage; only the delete action is gated on the admin guard.

use anyhow::Result;
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error, warn};

use crate::catalog;
use crate::config::Config;
use crate::dialogue::{OrderDialogue, OrderDialogueState};

use super::ui_builder::TRANSIENT_ERROR;

const DELETE_PREFIX: &str = "del_";
const ORDER_PREFIX: &str = "order_";

/// Action encoded in a product-picker button payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductAction {
    Delete(i64),
    Order(i64),
}

impl ProductAction {
    /// Encode the action as a callback payload.
    pub fn encode(self) -> String {
        match self {
            ProductAction::Delete(id) => format!("{DELETE_PREFIX}{id}"),
            ProductAction::Order(id) => format!("{ORDER_PREFIX}{id}"),
        }
    }

    /// Parse a raw callback payload. `None` for anything malformed.
    pub fn parse(data: &str) -> Option<Self> {
        if let Some(id) = data.strip_prefix(DELETE_PREFIX) {
            return id.parse().ok().map(ProductAction::Delete);
        }
        if let Some(id) = data.strip_prefix(ORDER_PREFIX) {
            return id.parse().ok().map(ProductAction::Order);
        }
        None
    }
}

/// Handle callback queries from the product pickers.
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    dialogue: OrderDialogue,
    pool: SqlitePool,
    config: Arc<Config>,
) -> Result<()> {
    debug!(user_id = %q.from.id, data = ?q.data, "Received callback query");

    // Private-chat bots always have the picker message at hand; fall back to
    // the sender's own chat if Telegram dropped it.
    let chat_id = q
        .message
        .as_ref()
        .map(|msg| msg.chat().id)
        .unwrap_or(ChatId(q.from.id.0 as i64));

    match q.data.as_deref().and_then(ProductAction::parse) {
        Some(ProductAction::Delete(product_id)) => {
            if !config.is_admin(q.from.id) {
                bot.answer_callback_query(q.id)
                    .text("This action is not available.")
                    .await?;
                return Ok(());
            }

            match catalog::delete_product(&pool, product_id).await {
                // A stale id is a no-op success, so the confirmation is the
                // same either way.
                Ok(_) => {
                    if let Some(msg) = &q.message {
                        bot.edit_message_text(msg.chat().id, msg.id(), "Product removed ✅")
                            .await?;
                    }
                }
                Err(e) => {
                    error!(user_id = %q.from.id, product_id, error = %e, "Failed to delete product");
                    bot.send_message(chat_id, TRANSIENT_ERROR).await?;
                }
            }

            bot.answer_callback_query(q.id).await?;
        }
        Some(ProductAction::Order(product_id)) => {
            // An order selection starts a fresh quantity step whatever the
            // sender was doing before.
            bot.send_message(chat_id, "How many would you like? (pieces or kg)")
                .await?;
            dialogue
                .update(OrderDialogueState::OrderQuantity { product_id })
                .await?;

            bot.answer_callback_query(q.id).await?;
        }
        None => {
            warn!(user_id = %q.from.id, data = ?q.data, "Unrecognized callback payload");
            bot.answer_callback_query(q.id)
                .text("Unrecognized action.")
                .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delete_payload() {
        assert_eq!(ProductAction::parse("del_3"), Some(ProductAction::Delete(3)));
        assert_eq!(
            ProductAction::parse("order_12"),
            Some(ProductAction::Order(12))
        );
    }

    #[test]
    fn test_parse_rejects_malformed_payloads() {
        assert_eq!(ProductAction::parse(""), None);
        assert_eq!(ProductAction::parse("del_"), None);
        assert_eq!(ProductAction::parse("del_abc"), None);
        assert_eq!(ProductAction::parse("order_1.5"), None);
        assert_eq!(ProductAction::parse("edit_3"), None);
        assert_eq!(ProductAction::parse("3"), None);
    }

    #[test]
    fn test_encode_parse_round_trip() {
        let action = ProductAction::Order(42);
        assert_eq!(ProductAction::parse(&action.encode()), Some(action));
    }
}
