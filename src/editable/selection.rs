//! Logical selection over unit offsets.

use std::ops::Range;

/// A selection with anchor (start point) and head (caret position), both
/// unit offsets. The anchor stays fixed while the head moves during
/// selection extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Create a collapsed selection (caret with no selection)
    pub fn collapsed(pos: usize) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    /// Check if selection is reversed (head before anchor)
    pub fn is_reversed(&self) -> bool {
        self.head < self.anchor
    }

    /// Move the head, collapsing unless `extend`
    pub fn move_head(&mut self, pos: usize, extend: bool) {
        self.head = pos;
        if !extend {
            self.anchor = pos;
        }
    }

    /// Clamp both ends to a document of `len` units
    pub fn clamp(&mut self, len: usize) {
        self.anchor = self.anchor.min(len);
        self.head = self.head.min(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_bounds() {
        let sel = Selection::new(5, 2);
        assert_eq!(sel.start(), 2);
        assert_eq!(sel.end(), 5);
        assert_eq!(sel.range(), 2..5);
        assert!(sel.is_reversed());
        assert!(!sel.is_empty());
    }

    #[test]
    fn test_move_head() {
        let mut sel = Selection::collapsed(3);
        sel.move_head(6, true);
        assert_eq!(sel, Selection::new(3, 6));
        sel.move_head(1, false);
        assert_eq!(sel, Selection::collapsed(1));
    }

    #[test]
    fn test_clamp() {
        let mut sel = Selection::new(2, 9);
        sel.clamp(4);
        assert_eq!(sel, Selection::new(2, 4));
    }
}
