//! Telegram transport
//!
//! This module connects the dispatcher to the Telegram Bot API:
//! - A small JSON client for the handful of methods the bot needs
//! - A [`ChatSession`](crate::bot::ChatSession) implementation per chat
//! - The long-polling loop with graceful shutdown

mod api;
mod runner;
pub mod types;

pub use api::{TelegramApi, TelegramChat};
pub use runner::{run_bot, run_until};
