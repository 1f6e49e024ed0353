//! Bot module: message handling independent of the chat platform
//!
//! This module contains:
//! - The dispatcher that turns an inbound message into replies
//! - Reply formatting and the fixed user-facing texts
//! - The [`ChatSession`] seam implemented by transports

mod dispatcher;
pub mod messages;
mod responder;
mod session;

pub use dispatcher::{
    validate_identifier, Command, DispatchOutcome, Dispatcher, InboundMessage,
    MAX_IDENTIFIER_LEN, MIN_IDENTIFIER_LEN,
};
pub use responder::{failure_reply, render_record, Reply, TextFormat};
pub use session::{ChatError, ChatSession, ConsoleSession, MessageHandle};
