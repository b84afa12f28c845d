//! Key string parsing (`"ctrl+shift+left"`, `"Backspace"`, `"a"`)

use std::fmt;

use super::types::{KeyCode, KeyEvent, Modifiers};

/// Errors that can occur when parsing key strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    Empty,
    InvalidKey(String),
}

impl fmt::Display for KeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyParseError::Empty => write!(f, "Empty key string"),
            KeyParseError::InvalidKey(k) => write!(f, "Invalid key: {}", k),
        }
    }
}

impl std::error::Error for KeyParseError {}

/// Parse a `+`-separated key string into a [`KeyEvent`].
///
/// Modifier names are case-insensitive; a single-character key keeps its
/// case so that `"A"` types an uppercase letter. `"+"` on its own is the
/// plus key.
pub fn parse_key_string(key_str: &str) -> Result<KeyEvent, KeyParseError> {
    if key_str.is_empty() {
        return Err(KeyParseError::Empty);
    }
    if key_str == "+" {
        return Ok(KeyEvent::char('+'));
    }

    let mut mods = Modifiers::NONE;
    let mut key_part = None;

    for part in key_str.split('+') {
        match part.to_lowercase().as_str() {
            "ctrl" | "control" => mods = mods | Modifiers::CTRL,
            "shift" => mods = mods | Modifiers::SHIFT,
            "alt" | "option" | "opt" => mods = mods | Modifiers::ALT,
            "meta" | "super" | "win" | "cmd" => mods = mods | Modifiers::META,
            _ => {
                if key_part.is_some() {
                    return Err(KeyParseError::InvalidKey(format!(
                        "Multiple keys in binding: {}",
                        key_str
                    )));
                }
                key_part = Some(parse_key_code(part)?);
            }
        }
    }

    let key = key_part
        .ok_or_else(|| KeyParseError::InvalidKey(format!("No key found in: {}", key_str)))?;

    Ok(KeyEvent::new(key, mods))
}

fn parse_key_code(key: &str) -> Result<KeyCode, KeyParseError> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(if c == ' ' {
            KeyCode::Space
        } else {
            KeyCode::Char(c)
        });
    }

    match key.to_lowercase().as_str() {
        "enter" | "return" => Ok(KeyCode::Enter),
        "escape" | "esc" => Ok(KeyCode::Escape),
        "tab" => Ok(KeyCode::Tab),
        "backspace" | "back" => Ok(KeyCode::Backspace),
        "delete" | "del" => Ok(KeyCode::Delete),
        "space" => Ok(KeyCode::Space),

        "up" | "arrowup" => Ok(KeyCode::Up),
        "down" | "arrowdown" => Ok(KeyCode::Down),
        "left" | "arrowleft" => Ok(KeyCode::Left),
        "right" | "arrowright" => Ok(KeyCode::Right),

        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),

        _ => Err(KeyParseError::InvalidKey(key.to_string())),
    }
}
