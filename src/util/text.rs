//! Character classes for word-wise caret movement and deletion

/// Check if a character is a punctuation/symbol boundary (not whitespace)
pub fn is_punctuation(ch: char) -> bool {
    !ch.is_whitespace() && !ch.is_alphanumeric() && ch != '_' && !is_emoji_like(ch)
}

/// Pictographs count as word characters so Ctrl+Backspace removes an
/// emoji typed inline the same way it removes a word
fn is_emoji_like(ch: char) -> bool {
    matches!(ch as u32, 0x1F000..=0x1FAFF | 0x2600..=0x27BF | 0x200D | 0xFE0F)
}

/// Character class used to find word boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharType {
    Whitespace,
    /// Letters, digits, underscore, pictographs
    WordChar,
    Punctuation,
}

pub fn char_type(ch: char) -> CharType {
    if ch.is_whitespace() {
        CharType::Whitespace
    } else if is_punctuation(ch) {
        CharType::Punctuation
    } else {
        CharType::WordChar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_types() {
        assert_eq!(char_type(' '), CharType::Whitespace);
        assert_eq!(char_type('\t'), CharType::Whitespace);
        assert_eq!(char_type('a'), CharType::WordChar);
        assert_eq!(char_type('7'), CharType::WordChar);
        assert_eq!(char_type('_'), CharType::WordChar);
        assert_eq!(char_type('é'), CharType::WordChar);
        assert_eq!(char_type('!'), CharType::Punctuation);
        assert_eq!(char_type(':'), CharType::Punctuation);
    }

    #[test]
    fn test_emoji_is_word_char() {
        assert_eq!(char_type('😀'), CharType::WordChar);
        assert_eq!(char_type('❤'), CharType::WordChar);
        assert!(!is_punctuation('😀'));
    }
}
