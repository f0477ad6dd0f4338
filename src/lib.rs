//! # FastKitchen Telegram Bot
//!
//! A conversational ordering bot for a small food vendor. Customers register
//! through a short dialogue and place orders that are forwarded to a single
//! admin account; the admin manages the product catalog from a reply-keyboard
//! menu.

pub mod bot;
pub mod catalog;
pub mod config;
pub mod dialogue;
pub mod order;
