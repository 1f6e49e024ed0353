//! Chat session trait and error types
//!
//! The dispatcher talks to the chat platform only through [`ChatSession`],
//! scoped to the conversation the inbound message came from.

use crate::bot::responder::{Reply, TextFormat};
use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use thiserror::Error;

/// Errors that can occur while talking to the chat platform
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{method} failed: {description}")]
    Api { method: String, description: String },
}

/// Platform id of a message the bot has sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageHandle(pub i64);

/// One conversation on the chat platform
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// Sends a message into the conversation
    async fn send(&self, reply: &Reply) -> Result<MessageHandle, ChatError>;

    /// Deletes a message the bot sent earlier
    async fn delete(&self, handle: MessageHandle) -> Result<(), ChatError>;
}

/// Session that prints replies to stdout
///
/// Used by the `--lookup` command line mode.
#[derive(Debug, Default)]
pub struct ConsoleSession {
    next_id: AtomicI64,
}

impl ConsoleSession {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatSession for ConsoleSession {
    async fn send(&self, reply: &Reply) -> Result<MessageHandle, ChatError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        match reply.format {
            TextFormat::Plain => println!("{}", reply.text),
            TextFormat::Markdown => println!("{}", reply.text.replace('*', "")),
        }
        Ok(MessageHandle(id))
    }

    async fn delete(&self, handle: MessageHandle) -> Result<(), ChatError> {
        tracing::trace!("Console session ignoring delete of message {}", handle.0);
        Ok(())
    }
}
