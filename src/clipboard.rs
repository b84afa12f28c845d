//! Clipboard collaborator
//!
//! Turns a paste event into logical lines for the composer's paste
//! tokenizer.

use serde::{Deserialize, Serialize};

/// Data carried by a paste event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteEvent {
    /// `text/plain` payload, if the surface provided one
    #[serde(default)]
    pub text: Option<String>,
}

impl PasteEvent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

pub trait Clipboard {
    /// One entry per non-empty logical line
    fn parse_pasted_message(&self, event: &PasteEvent) -> Vec<String>;
}

/// Uses the event's own text payload
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextClipboard;

impl Clipboard for PlainTextClipboard {
    fn parse_pasted_message(&self, event: &PasteEvent) -> Vec<String> {
        event.text.as_deref().map(split_lines).unwrap_or_default()
    }
}

/// Falls back to the OS clipboard when the event carries no text
#[cfg(feature = "system-clipboard")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

#[cfg(feature = "system-clipboard")]
impl Clipboard for SystemClipboard {
    fn parse_pasted_message(&self, event: &PasteEvent) -> Vec<String> {
        if let Some(text) = event.text.as_deref() {
            return split_lines(text);
        }

        let clipboard_text = if let Ok(mut clipboard) = arboard::Clipboard::new() {
            clipboard.get_text().ok()
        } else {
            tracing::warn!("System clipboard unavailable");
            None
        };
        clipboard_text.as_deref().map(split_lines).unwrap_or_default()
    }
}

/// Split on line endings (`\n` or `\r\n`), dropping blank lines
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_drops_blank() {
        assert_eq!(
            split_lines("foo bar\r\n\n  \nbaz"),
            vec!["foo bar".to_string(), "baz".to_string()]
        );
    }

    #[test]
    fn test_plain_clipboard_without_text() {
        assert!(PlainTextClipboard
            .parse_pasted_message(&PasteEvent::default())
            .is_empty());
    }
}
