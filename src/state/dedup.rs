use crate::config::DedupConfig;
use chrono::{DateTime, Duration, Utc};
use std::sync::{Mutex, PoisonError};

/// The most recently accepted message
#[derive(Debug, Clone)]
struct LastSeen {
    message_id: String,
    seen_at: DateTime<Utc>,
}

/// Suppresses back-to-back redelivery of the same message
///
/// Only the immediately preceding message is remembered. A message is
/// dropped when its id equals that one and arrived within the window;
/// anything else is accepted and becomes the new "last seen".
#[derive(Debug)]
pub struct DedupGuard {
    window: Duration,
    last: Mutex<Option<LastSeen>>,
}

impl DedupGuard {
    /// Creates a guard with the given suppression window
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last: Mutex::new(None),
        }
    }

    /// Creates a guard from configuration
    pub fn from_config(config: &DedupConfig) -> Self {
        Self::new(Duration::milliseconds(config.window_ms as i64))
    }

    /// Returns the suppression window
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Decides whether a message should be processed
    ///
    /// # Arguments
    ///
    /// * `message_id` - Opaque id of the inbound message (empty ids are never suppressed)
    /// * `now` - Time the message was received
    ///
    /// # Returns
    ///
    /// * `true` - Process the message; it is now the last seen one
    /// * `false` - Duplicate within the window; state is left untouched
    pub fn should_process(&self, message_id: &str, now: DateTime<Utc>) -> bool {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = last.as_ref() {
            let duplicate = !message_id.is_empty()
                && previous.message_id == message_id
                && now.signed_duration_since(previous.seen_at) < self.window;
            if duplicate {
                return false;
            }
        }

        *last = Some(LastSeen {
            message_id: message_id.to_string(),
            seen_at: now,
        });
        true
    }
}

impl Default for DedupGuard {
    fn default() -> Self {
        Self::from_config(&DedupConfig::default())
    }
}
