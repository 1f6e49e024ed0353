//! Reply formatting
//!
//! Pure functions from lookup outcomes to chat replies.

use crate::bot::messages::{
    CONNECT_MESSAGE, FETCH_ERROR_MESSAGE, MISSING_FIELD, NOT_FOUND_MESSAGE, RESULT_FOOTER,
    RESULT_TITLE, TIMEOUT_MESSAGE, UNAVAILABLE_MESSAGE,
};
use crate::portal::{PlacementRecord, RecordField};
use crate::FailureKind;

/// How the chat client should interpret a reply's text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Markdown,
}

/// An outbound chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub format: TextFormat,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Plain,
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Markdown,
        }
    }
}

/// Field rows of the result message, in display order
const RESULT_LINES: &[(&str, RecordField)] = &[
    ("👤 *Name:*", RecordField::FullName),
    ("🆔 *ID:*", RecordField::IdNumber),
    ("📘 *Program:*", RecordField::Program),
    ("🧩 *Section:*", RecordField::Section),
    ("🏫 *Campus:*", RecordField::Campus),
    ("🛏️ *Dormitory:*", RecordField::Dormitory),
    ("🍽️ *Cafeteria:*", RecordField::Cafeteria),
];

/// Renders an extracted record
///
/// Returns the fixed not-found text unless both name and admission number are
/// present. Otherwise every field is listed, with "N/A" for the empty ones,
/// followed by a link back to the portal page.
pub fn render_record(record: &PlacementRecord, portal_url: &str) -> Reply {
    if !record.is_found() {
        return Reply::plain(NOT_FOUND_MESSAGE);
    }

    let fields = RESULT_LINES
        .iter()
        .map(|(label, field)| {
            let value = record.field(*field).unwrap_or(MISSING_FIELD);
            format!("{} {}", label, escape_markdown(value))
        })
        .collect::<Vec<_>>()
        .join("\n");

    Reply::markdown(format!(
        "{}\n\n{}\n\n*Check more on the portal:* {}\n\n{}",
        RESULT_TITLE,
        fields,
        escape_markdown(portal_url),
        RESULT_FOOTER
    ))
}

/// Escapes text for Telegram's legacy Markdown mode
///
/// Only `_`, `*`, `` ` `` and `[` are special there; an unbalanced one makes
/// the API reject the whole message.
fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Maps a fetch failure to its user-facing text
pub fn failure_reply(kind: FailureKind) -> Reply {
    let text = match kind {
        FailureKind::Timeout => TIMEOUT_MESSAGE,
        FailureKind::Transport => CONNECT_MESSAGE,
        FailureKind::HttpStatus(_) => UNAVAILABLE_MESSAGE,
        FailureKind::Unclassified => FETCH_ERROR_MESSAGE,
    };
    Reply::plain(text)
}
