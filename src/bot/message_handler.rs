//! Message Handler module for processing incoming Telegram messages
//!
//! Entry point of the dialog engine. State dispatch takes priority over
//! trigger-text dispatch: a user mid-dialogue has their next message
//! interpreted as the answer for the current stage, never re-matched against
//! a trigger label.

use anyhow::Result;
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error};

use crate::catalog;
use crate::config::Config;
use crate::dialogue::{OrderDialogue, OrderDialogueState};

// Import dialogue manager functions
use super::dialogue_manager::{
    handle_order_quantity_input, handle_product_name_input, handle_product_price_input,
    handle_register_age_input, handle_register_name_input, handle_register_phone_contact,
    handle_register_surname_input,
};

// Import UI builder functions
use super::ui_builder::{
    admin_keyboard, contact_request_keyboard, delete_products_reply, place_order_reply,
    view_products_reply, PickerReply, ADD_PRODUCT, DELETE_PRODUCTS, PLACE_ORDER, TRANSIENT_ERROR,
    UNRECOGNIZED_INPUT, VIEW_PRODUCTS,
};

async fn handle_text_message(
    bot: &Bot,
    msg: &Message,
    dialogue: OrderDialogue,
    pool: SqlitePool,
    config: Arc<Config>,
) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    debug!(user_id = %msg.chat.id, message_length = text.len(), "Received text message");

    // Check dialogue state first
    let state = dialogue.get().await?.unwrap_or_default();
    match state {
        OrderDialogueState::RegisterName => {
            return handle_register_name_input(bot, msg, dialogue, text).await;
        }
        OrderDialogueState::RegisterSurname { name } => {
            return handle_register_surname_input(bot, msg, dialogue, text, name).await;
        }
        OrderDialogueState::RegisterAge { name, surname } => {
            return handle_register_age_input(bot, msg, dialogue, text, name, surname).await;
        }
        OrderDialogueState::RegisterPhone { .. } => {
            // This stage only accepts a shared contact.
            bot.send_message(msg.chat.id, "Please use the button below to share your contact.")
                .reply_markup(contact_request_keyboard())
                .await?;
            return Ok(());
        }
        OrderDialogueState::AddProductName => {
            return handle_product_name_input(bot, msg, dialogue, text).await;
        }
        OrderDialogueState::AddProductPrice { name } => {
            return handle_product_price_input(bot, msg, dialogue, pool, text, name).await;
        }
        OrderDialogueState::OrderQuantity { product_id } => {
            return handle_order_quantity_input(
                bot,
                msg,
                dialogue,
                pool,
                config.admin_chat(),
                text,
                product_id,
            )
            .await;
        }
        OrderDialogueState::Idle => {
            // Continue with trigger handling
        }
    }

    let is_admin = msg
        .from
        .as_ref()
        .map(|user| config.is_admin(user.id))
        .unwrap_or(false);

    // Handle /start command
    if text == "/start" {
        if is_admin {
            bot.send_message(msg.chat.id, "You are the administrator 👨‍💼")
                .reply_markup(admin_keyboard())
                .await?;
        } else {
            bot.send_message(msg.chat.id, "Please enter your first name:")
                .await?;
            dialogue.update(OrderDialogueState::RegisterName).await?;
        }
    }
    // Admin: start the product-add dialogue
    else if text == ADD_PRODUCT && is_admin {
        bot.send_message(msg.chat.id, "Enter the product name:")
            .await?;
        dialogue.update(OrderDialogueState::AddProductName).await?;
    }
    // Admin: list the catalog
    else if text == VIEW_PRODUCTS && is_admin {
        match catalog::list_products(&pool).await {
            Ok(products) => {
                bot.send_message(msg.chat.id, view_products_reply(&products))
                    .await?;
            }
            Err(e) => {
                error!(user_id = %msg.chat.id, error = %e, "Failed to list products");
                bot.send_message(msg.chat.id, TRANSIENT_ERROR).await?;
            }
        }
    }
    // Admin: show the delete picker
    else if text == DELETE_PRODUCTS && is_admin {
        match catalog::list_products(&pool).await {
            Ok(products) => match delete_products_reply(&products) {
                PickerReply::NoProducts(reply) => {
                    bot.send_message(msg.chat.id, reply).await?;
                }
                PickerReply::Picker(prompt, keyboard) => {
                    bot.send_message(msg.chat.id, prompt)
                        .reply_markup(keyboard)
                        .await?;
                }
            },
            Err(e) => {
                error!(user_id = %msg.chat.id, error = %e, "Failed to list products for deletion");
                bot.send_message(msg.chat.id, TRANSIENT_ERROR).await?;
            }
        }
    }
    // Any user: show the order picker
    else if text == PLACE_ORDER {
        match catalog::list_products(&pool).await {
            Ok(products) => match place_order_reply(&products) {
                PickerReply::NoProducts(reply) => {
                    bot.send_message(msg.chat.id, reply).await?;
                }
                PickerReply::Picker(prompt, keyboard) => {
                    bot.send_message(msg.chat.id, prompt)
                        .reply_markup(keyboard)
                        .await?;
                }
            },
            Err(e) => {
                error!(user_id = %msg.chat.id, error = %e, "Failed to list products for ordering");
                bot.send_message(msg.chat.id, TRANSIENT_ERROR).await?;
            }
        }
    }
    // Unmatched text, including admin triggers from non-admin senders,
    // gets one generic reply.
    else {
        bot.send_message(msg.chat.id, UNRECOGNIZED_INPUT).await?;
    }

    Ok(())
}

async fn handle_contact_message(bot: &Bot, msg: &Message, dialogue: OrderDialogue) -> Result<()> {
    let Some(contact) = msg.contact() else {
        return Ok(());
    };

    debug!(user_id = %msg.chat.id, "Received contact message");

    let state = dialogue.get().await?.unwrap_or_default();
    match state {
        OrderDialogueState::RegisterPhone { name, surname, age } => {
            handle_register_phone_contact(bot, msg, dialogue, contact, name, surname, age).await
        }
        _ => {
            bot.send_message(msg.chat.id, UNRECOGNIZED_INPUT).await?;
            Ok(())
        }
    }
}

async fn handle_unsupported_message(bot: &Bot, msg: &Message) -> Result<()> {
    debug!(user_id = %msg.chat.id, "Received unsupported message type");

    bot.send_message(msg.chat.id, UNRECOGNIZED_INPUT).await?;
    Ok(())
}

/// Route an inbound message by kind.
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: OrderDialogue,
    pool: SqlitePool,
    config: Arc<Config>,
) -> Result<()> {
    if msg.contact().is_some() {
        handle_contact_message(&bot, &msg, dialogue).await?;
    } else if msg.text().is_some() {
        handle_text_message(&bot, &msg, dialogue, pool, config).await?;
    } else {
        handle_unsupported_message(&bot, &msg).await?;
    }

    Ok(())
}
