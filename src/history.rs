//! Sent-message history with a recall cursor
//!
//! Newest entry at index 0. The cursor is -1 while the user is on the live
//! draft and otherwise indexes the entry being recalled.

use std::collections::VecDeque;

/// Default number of messages kept
pub const DEFAULT_CAPACITY: usize = 50;

/// Cursor position meaning "not recalling"
const LIVE_DRAFT: isize = -1;

/// Direction of a recall step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recall {
    /// Towards older entries (+1)
    Older,
    /// Towards newer entries (-1)
    Newer,
}

impl Recall {
    fn step(self) -> isize {
        match self {
            Recall::Older => 1,
            Recall::Newer => -1,
        }
    }
}

/// Bounded FIFO of submitted messages
#[derive(Debug, Clone)]
pub struct MessageHistory {
    messages: VecDeque<String>,
    cursor: isize,
    capacity: usize,
}

impl Default for MessageHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            cursor: LIVE_DRAFT,
            capacity: capacity.max(1),
        }
    }

    /// Prepend a message, evicting the oldest past capacity.
    /// Empty messages and repeats of the newest entry are ignored.
    pub fn add_message(&mut self, message: &str) {
        if message.is_empty() {
            return;
        }
        if self.messages.front().is_some_and(|head| head == message) {
            return;
        }

        self.messages.push_front(message.to_string());
        while self.messages.len() > self.capacity {
            self.messages.pop_back();
        }
    }

    /// Whether a step in `direction` would change the cursor
    pub fn can_move_cursor(&self, direction: Recall) -> bool {
        match direction {
            Recall::Older => self.cursor < self.messages.len() as isize - 1,
            Recall::Newer => self.cursor > 0,
        }
    }

    /// Step the cursor, clamped to the stored entries
    pub fn move_cursor(&mut self, direction: Recall) {
        self.cursor += direction.step();
        let last = self.messages.len() as isize - 1;
        if self.cursor < 0 {
            self.cursor = 0;
        } else if self.cursor > last {
            self.cursor = last;
        }
    }

    /// Entry under the cursor, `None` on the live draft
    pub fn message(&self) -> Option<&str> {
        if self.cursor < 0 {
            return None;
        }
        self.messages.get(self.cursor as usize).map(String::as_str)
    }

    /// Return to the live draft
    pub fn reset_cursor(&mut self) {
        self.cursor = LIVE_DRAFT;
    }

    pub fn is_cursor_at_start(&self) -> bool {
        self.cursor == LIVE_DRAFT
    }

    pub fn cursor(&self) -> isize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Entries from newest to oldest
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_ignores_empty_and_repeated_head() {
        let mut h = MessageHistory::new();
        h.add_message("");
        h.add_message("hi");
        h.add_message("hi");
        assert_eq!(h.len(), 1);

        h.add_message("yo");
        h.add_message("hi");
        assert_eq!(h.iter().collect::<Vec<_>>(), vec!["hi", "yo", "hi"]);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut h = MessageHistory::new();
        for i in 0..51 {
            h.add_message(&format!("msg {}", i));
        }
        assert_eq!(h.len(), 50);
        assert_eq!(h.iter().next(), Some("msg 50"));
        assert!(!h.iter().any(|m| m == "msg 0"));
    }

    #[test]
    fn test_cursor_bounds() {
        let mut h = MessageHistory::new();
        assert!(!h.can_move_cursor(Recall::Newer));
        assert!(!h.can_move_cursor(Recall::Older));

        h.add_message("a");
        h.add_message("b");
        assert!(h.can_move_cursor(Recall::Older));
        assert!(!h.can_move_cursor(Recall::Newer));

        h.move_cursor(Recall::Older);
        assert_eq!(h.message(), Some("b"));
        h.move_cursor(Recall::Older);
        assert_eq!(h.message(), Some("a"));
        assert!(!h.can_move_cursor(Recall::Older));

        // Clamped at the oldest entry
        h.move_cursor(Recall::Older);
        assert_eq!(h.message(), Some("a"));

        h.move_cursor(Recall::Newer);
        h.move_cursor(Recall::Newer);
        assert_eq!(h.cursor(), 0);

        h.reset_cursor();
        assert!(h.message().is_none());
        assert!(h.is_cursor_at_start());
    }

    #[test]
    fn test_move_on_empty_history_stays_on_draft() {
        let mut h = MessageHistory::new();
        h.move_cursor(Recall::Older);
        assert!(h.message().is_none());
        assert!(h.is_cursor_at_start());
    }
}
