//! Request dispatcher - per-message orchestration
//!
//! This module sequences one inbound message through:
//! - Duplicate suppression
//! - Identifier validation
//! - Portal fetch and table extraction
//! - Reply selection, including failure classification

use crate::bot::messages::{ABOUT_MESSAGE, FORMAT_WARNING, PROCESSING_MESSAGE, START_MESSAGE};
use crate::bot::responder::{failure_reply, render_record, Reply};
use crate::bot::session::{ChatError, ChatSession, MessageHandle};
use crate::config::Config;
use crate::portal::{extract_record, PlacementRecord, PortalClient};
use crate::state::DedupGuard;
use crate::{BotError, FailureKind};
use chrono::{DateTime, Utc};

/// Shortest accepted identifier, in characters
pub const MIN_IDENTIFIER_LEN: usize = 3;

/// Longest accepted identifier, in characters
pub const MAX_IDENTIFIER_LEN: usize = 20;

/// A text message received from the chat platform
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Opaque id used for duplicate detection
    pub message_id: String,
    /// Raw message text
    pub text: String,
    /// When the message was received
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    /// Creates a message received now
    pub fn new(message_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::received_at(message_id, text, Utc::now())
    }

    /// Creates a message with an explicit receive time
    pub fn received_at(
        message_id: impl Into<String>,
        text: impl Into<String>,
        received_at: DateTime<Utc>,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            text: text.into(),
            received_at,
        }
    }
}

/// Bot commands with fixed replies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    About,
}

impl Command {
    /// Parses `/start` or `/about`, optionally addressed as `/about@SomeBot`
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let name = word.split('@').next().unwrap_or(word);
        match name {
            "/start" => Some(Command::Start),
            "/about" => Some(Command::About),
            _ => None,
        }
    }
}

/// What the dispatcher did with one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Dropped as a duplicate delivery; nothing was sent
    Suppressed,
    /// Answered a fixed command
    Command(Command),
    /// Identifier failed the length check; format warning sent
    InvalidIdentifier,
    /// Placement found and sent
    Found(PlacementRecord),
    /// Page fetched but no placement in it
    NotFound,
    /// Fetch failed; mapped failure message sent
    FetchFailed(FailureKind),
}

/// Returns the trimmed identifier if its length is acceptable
///
/// Digits-only is not enforced; some students use their ID instead.
pub fn validate_identifier(raw: &str) -> Option<&str> {
    let identifier = raw.trim();
    let len = identifier.chars().count();
    (MIN_IDENTIFIER_LEN..=MAX_IDENTIFIER_LEN)
        .contains(&len)
        .then_some(identifier)
}

/// Handles inbound messages end to end
#[derive(Debug)]
pub struct Dispatcher {
    portal: PortalClient,
    dedup: DedupGuard,
}

impl Dispatcher {
    /// Creates a dispatcher from its parts
    pub fn new(portal: PortalClient, dedup: DedupGuard) -> Self {
        Self { portal, dedup }
    }

    /// Creates a dispatcher from configuration
    pub fn from_config(config: &Config) -> Result<Self, BotError> {
        let portal = PortalClient::new(&config.portal)?;
        let dedup = DedupGuard::from_config(&config.dedup);
        Ok(Self::new(portal, dedup))
    }

    /// Reply to `/start`
    pub fn handle_start(&self) -> Reply {
        Reply::markdown(START_MESSAGE)
    }

    /// Reply to `/about`
    pub fn handle_about(&self) -> Reply {
        Reply::plain(ABOUT_MESSAGE)
    }

    /// Routes a message to a command reply or to a placement lookup
    pub async fn handle<S>(
        &self,
        session: &S,
        message: &InboundMessage,
    ) -> Result<DispatchOutcome, ChatError>
    where
        S: ChatSession + ?Sized,
    {
        let Some(command) = Command::parse(&message.text) else {
            return self.handle_text(session, message).await;
        };

        if !self.admit(message) {
            return Ok(DispatchOutcome::Suppressed);
        }

        let reply = match command {
            Command::Start => self.handle_start(),
            Command::About => self.handle_about(),
        };
        session.send(&reply).await?;
        Ok(DispatchOutcome::Command(command))
    }

    /// Treats the message text as an identifier and answers with its placement
    ///
    /// Exactly one terminal reply is sent unless the message is suppressed as
    /// a duplicate. Fetch failures are answered, not returned; only a failure
    /// to deliver the terminal reply surfaces as `Err`.
    pub async fn handle_text<S>(
        &self,
        session: &S,
        message: &InboundMessage,
    ) -> Result<DispatchOutcome, ChatError>
    where
        S: ChatSession + ?Sized,
    {
        if !self.admit(message) {
            return Ok(DispatchOutcome::Suppressed);
        }

        self.lookup(session, &message.text).await
    }

    /// Validates, fetches, extracts and replies for one identifier
    pub async fn lookup<S>(&self, session: &S, raw: &str) -> Result<DispatchOutcome, ChatError>
    where
        S: ChatSession + ?Sized,
    {
        let Some(identifier) = validate_identifier(raw) else {
            tracing::debug!("Rejected identifier of length {}", raw.trim().chars().count());
            session.send(&Reply::plain(FORMAT_WARNING)).await?;
            return Ok(DispatchOutcome::InvalidIdentifier);
        };

        let ack = match session.send(&Reply::plain(PROCESSING_MESSAGE)).await {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!("Could not send processing message: {}", e);
                None
            }
        };

        let page = match self.portal.fetch_page(identifier).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!("Fetch error: {}", e);
                let kind = e.kind();
                self.discard_ack(session, ack).await;
                session.send(&failure_reply(kind)).await?;
                return Ok(DispatchOutcome::FetchFailed(kind));
            }
        };

        let record = extract_record(&page.body);
        let reply = render_record(&record, page.url.as_str());
        self.discard_ack(session, ack).await;
        session.send(&reply).await?;

        if record.is_found() {
            tracing::info!("Placement found for {}", identifier);
            Ok(DispatchOutcome::Found(record))
        } else {
            tracing::info!("No placement for {}", identifier);
            Ok(DispatchOutcome::NotFound)
        }
    }

    /// Deletes the "processing" acknowledgment
    pub async fn retract_ack<S>(&self, session: &S, ack: MessageHandle) -> Result<(), ChatError>
    where
        S: ChatSession + ?Sized,
    {
        session.delete(ack).await
    }

    /// Retracts the acknowledgment if one was sent; failures are only logged
    async fn discard_ack<S>(&self, session: &S, ack: Option<MessageHandle>)
    where
        S: ChatSession + ?Sized,
    {
        if let Some(ack) = ack {
            if let Err(e) = self.retract_ack(session, ack).await {
                tracing::warn!("Could not delete processing message: {}", e);
            }
        }
    }

    fn admit(&self, message: &InboundMessage) -> bool {
        let accepted = self
            .dedup
            .should_process(&message.message_id, message.received_at);
        if !accepted {
            tracing::debug!("Skipping duplicate message {}", message.message_id);
        }
        accepted
    }
}
