//! Segment list backing the composer.
//!
//! Positions inside a [`Document`] are *unit offsets*: every char of a text
//! run is one unit and every token is exactly one unit. A unit offset can sit
//! before or after a token but never inside it, so every range operation here
//! removes or keeps tokens whole.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Identifier of an emote as understood by the catalog
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(String);

impl TokenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TokenId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Whether a token still has its full surface structure
/// (leading marker, body, trailing marker)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStructure {
    Intact,
    /// Found damaged on the surface; removed by the next cleanup pass
    Malformed,
}

/// An atomic inline widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: TokenId,
    /// Renderable markup supplied by the catalog
    pub markup: String,
    pub structure: TokenStructure,
}

impl Token {
    pub fn new(id: TokenId, markup: impl Into<String>) -> Self {
        Self {
            id,
            markup: markup.into(),
            structure: TokenStructure::Intact,
        }
    }

    pub fn malformed(id: TokenId) -> Self {
        Self {
            id,
            markup: String::new(),
            structure: TokenStructure::Malformed,
        }
    }

    pub fn is_malformed(&self) -> bool {
        self.structure == TokenStructure::Malformed
    }
}

/// One element of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Token(Token),
}

impl Segment {
    pub fn text(text: impl Into<String>) -> Self {
        Segment::Text(text.into())
    }

    /// Number of unit offsets this segment occupies
    pub fn unit_len(&self) -> usize {
        match self {
            Segment::Text(text) => text.chars().count(),
            Segment::Token(_) => 1,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Segment::Text(text) => Some(text),
            Segment::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Segment::Token(token) => Some(token),
            Segment::Text(_) => None,
        }
    }

    pub fn is_token(&self) -> bool {
        matches!(self, Segment::Token(_))
    }
}

/// What occupies a single unit offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit<'a> {
    Char(char),
    Token(&'a Token),
}

impl Unit<'_> {
    pub fn is_token(&self) -> bool {
        matches!(self, Unit::Token(_))
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Unit::Char(ch) => Some(*ch),
            Unit::Token(_) => None,
        }
    }
}

/// Ordered segment sequence.
///
/// After every mutation no two text runs are adjacent and no text run is
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    segments: Vec<Segment>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        let mut doc = Self { segments };
        doc.normalize();
        doc
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// No tokens and only whitespace text
    pub fn is_blank(&self) -> bool {
        self.segments.iter().all(|segment| match segment {
            Segment::Text(text) => text.trim().is_empty(),
            Segment::Token(_) => false,
        })
    }

    /// Total number of unit offsets
    pub fn len_units(&self) -> usize {
        self.segments.iter().map(Segment::unit_len).sum()
    }

    /// Unit offset at which segment `index` starts (`len_units` past the end)
    pub fn segment_start(&self, index: usize) -> usize {
        self.segments
            .iter()
            .take(index)
            .map(Segment::unit_len)
            .sum()
    }

    /// Segment holding `offset` and the offset within it.
    /// Returns `None` at or past the end of the document.
    pub fn locate(&self, offset: usize) -> Option<(usize, usize)> {
        let mut start = 0;
        for (index, segment) in self.segments.iter().enumerate() {
            let len = segment.unit_len();
            if offset < start + len {
                return Some((index, offset - start));
            }
            start += len;
        }
        None
    }

    /// Content of the unit at `offset`
    pub fn unit_at(&self, offset: usize) -> Option<Unit<'_>> {
        let (index, within) = self.locate(offset)?;
        match &self.segments[index] {
            Segment::Text(text) => text.chars().nth(within).map(Unit::Char),
            Segment::Token(token) => Some(Unit::Token(token)),
        }
    }

    /// Unit immediately before `offset`
    pub fn unit_before(&self, offset: usize) -> Option<Unit<'_>> {
        offset.checked_sub(1).and_then(|prev| self.unit_at(prev))
    }

    /// Tokens with their unit offsets, in document order
    pub fn tokens(&self) -> impl Iterator<Item = (usize, &Token)> {
        let mut start = 0;
        self.segments.iter().filter_map(move |segment| {
            let at = start;
            start += segment.unit_len();
            segment.as_token().map(|token| (at, token))
        })
    }

    pub fn token_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_token()).count()
    }

    /// Text runs concatenated, tokens skipped
    pub fn plain_text(&self) -> String {
        self.segments.iter().filter_map(Segment::as_text).collect()
    }

    /// Replace `range` with `segments`, returning the number of units inserted
    pub fn replace_range(&mut self, range: Range<usize>, segments: Vec<Segment>) -> usize {
        let len = self.len_units();
        let end = range.end.min(len);
        let start = range.start.min(end);

        let inserted = segments.iter().map(Segment::unit_len).sum();
        let right = self.split_off(end);
        self.split_off(start);
        self.segments.extend(segments);
        self.segments.extend(right);
        self.normalize();
        inserted
    }

    /// Insert `segments` at `offset`, returning the number of units inserted
    pub fn insert(&mut self, offset: usize, segments: Vec<Segment>) -> usize {
        self.replace_range(offset..offset, segments)
    }

    /// Remove `range`, returning the removed segments
    pub fn remove_range(&mut self, range: Range<usize>) -> Vec<Segment> {
        let len = self.len_units();
        let end = range.end.min(len);
        let start = range.start.min(end);

        let right = self.split_off(end);
        let removed = self.split_off(start);
        self.segments.extend(right);
        self.normalize();
        removed
    }

    /// Swap the token at unit `offset` for `segment`.
    /// Returns false if no token sits at `offset`.
    pub fn replace_token_at(&mut self, offset: usize, segment: Segment) -> bool {
        match self.locate(offset) {
            Some((index, 0)) if self.segments[index].is_token() => {
                self.segments[index] = segment;
                self.normalize();
                true
            }
            _ => false,
        }
    }

    /// Drop every malformed token, returning their former unit offsets
    pub fn remove_malformed(&mut self) -> Vec<usize> {
        let removed: Vec<usize> = self
            .tokens()
            .filter(|(_, token)| token.is_malformed())
            .map(|(at, _)| at)
            .collect();
        if removed.is_empty() {
            return removed;
        }

        self.segments
            .retain(|segment| !segment.as_token().is_some_and(Token::is_malformed));
        self.normalize();
        removed
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// Whether the segment invariants hold
    pub fn is_normalized(&self) -> bool {
        let no_empty = self
            .segments
            .iter()
            .all(|s| !matches!(s, Segment::Text(text) if text.is_empty()));
        let no_adjacent = self
            .segments
            .windows(2)
            .all(|pair| pair[0].is_token() || pair[1].is_token());
        no_empty && no_adjacent
    }

    /// Merge adjacent text runs and drop empty ones
    fn normalize(&mut self) {
        let mut merged: Vec<Segment> = Vec::with_capacity(self.segments.len());
        for segment in self.segments.drain(..) {
            match segment {
                Segment::Text(text) if text.is_empty() => {}
                Segment::Text(text) => match merged.last_mut() {
                    Some(Segment::Text(prev)) => prev.push_str(&text),
                    _ => merged.push(Segment::Text(text)),
                },
                token => merged.push(token),
            }
        }
        self.segments = merged;
    }

    /// Split at unit `offset`, keeping the left part and returning the right.
    /// A text run straddling `offset` is cut in two.
    fn split_off(&mut self, offset: usize) -> Vec<Segment> {
        let mut start = 0;
        for index in 0..self.segments.len() {
            if offset <= start {
                return self.segments.split_off(index);
            }
            let len = self.segments[index].unit_len();
            if offset < start + len {
                let tail = self.segments.split_off(index + 1);
                let mut right = Vec::with_capacity(tail.len() + 1);
                if let Segment::Text(text) = &mut self.segments[index] {
                    let byte = char_to_byte(text, offset - start);
                    right.push(Segment::Text(text.split_off(byte)));
                }
                right.extend(tail);
                return right;
            }
            start += len;
        }
        Vec::new()
    }
}

/// Byte index of the `char_idx`-th char (or the string length)
pub(crate) fn char_to_byte(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(byte, _)| byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(id: &str) -> Segment {
        Segment::Token(Token::new(TokenId::new(id), format!("<img {}>", id)))
    }

    #[test]
    fn test_from_segments_merges_and_drops_empty_text() {
        let doc = Document::from_segments(vec![
            Segment::text("ab"),
            Segment::text(""),
            Segment::text("cd"),
            tok("1"),
            Segment::text(""),
        ]);
        assert_eq!(doc.segments(), &[Segment::text("abcd"), tok("1")]);
        assert!(doc.is_normalized());
        assert_eq!(doc.len_units(), 5);
    }

    #[test]
    fn test_insert_splits_text_run() {
        let mut doc = Document::from_segments(vec![Segment::text("héllo")]);
        let n = doc.insert(2, vec![tok("x")]);
        assert_eq!(n, 1);
        assert_eq!(
            doc.segments(),
            &[Segment::text("hé"), tok("x"), Segment::text("llo")]
        );
    }

    #[test]
    fn test_remove_range_takes_tokens_whole_and_merges() {
        let mut doc =
            Document::from_segments(vec![Segment::text("ab"), tok("x"), Segment::text("cd")]);
        let removed = doc.remove_range(1..3);
        assert_eq!(removed, vec![Segment::text("b"), tok("x")]);
        assert_eq!(doc.segments(), &[Segment::text("acd")]);
    }

    #[test]
    fn test_unit_lookup() {
        let doc = Document::from_segments(vec![Segment::text("a"), tok("x"), Segment::text("b")]);
        assert_eq!(doc.unit_at(0), Some(Unit::Char('a')));
        assert!(doc.unit_at(1).is_some_and(|u| u.is_token()));
        assert_eq!(doc.unit_before(3), Some(Unit::Char('b')));
        assert_eq!(doc.unit_at(3), None);
        assert_eq!(doc.locate(2), Some((2, 0)));
        assert_eq!(doc.segment_start(2), 2);
    }

    #[test]
    fn test_remove_malformed() {
        let mut doc = Document::from_segments(vec![
            Segment::text("a"),
            Segment::Token(Token::malformed(TokenId::new("x"))),
            Segment::text("b"),
            tok("y"),
        ]);
        assert_eq!(doc.remove_malformed(), vec![1]);
        assert_eq!(doc.segments(), &[Segment::text("ab"), tok("y")]);
        assert!(doc.remove_malformed().is_empty());
    }

    #[test]
    fn test_blank() {
        assert!(Document::new().is_blank());
        assert!(Document::from_segments(vec![Segment::text("  ")]).is_blank());
        assert!(!Document::from_segments(vec![tok("x")]).is_blank());
    }
}
