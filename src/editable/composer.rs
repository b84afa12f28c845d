//! Composer - the document engine for a chat input with atomic emote tokens.
//!
//! Owns the segment list and the logical selection, performs every edit
//! itself and re-serializes the draft into the message that will be
//! submitted. Selection changes reported by the surface go through the
//! normalizer first, so the logical selection can never end up inside a
//! token.

use std::cell::Cell;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;
use std::rc::Rc;

use serde::Serialize;
use serde_json::{json, Value};

use crate::catalog::EmoteCatalog;
use crate::event_bus::{topics, EventBus};
use crate::history::{MessageHistory, Recall};
use crate::platform::Platform;
use crate::util::{char_type, CharType};

use super::normalize;
use super::segment::{Document, Segment, Token, TokenId, Unit};
use super::selection::Selection;
use super::surface::{self, SurfaceNode, SurfaceSelection};

/// Direction of a caret step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

/// Output of a serialization pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessedContent {
    /// Text runs trimmed at token boundaries and tokens in embeddable form,
    /// joined by single spaces
    pub message: String,
    /// Ids of every token in the draft
    pub token_ids: BTreeSet<TokenId>,
    /// Unicode scalar values in `message`
    pub character_count: usize,
}

pub struct Composer {
    doc: Document,
    /// `None` until the surface reports a caret or an edit places one
    selection: Option<Selection>,
    catalog: Rc<dyn EmoteCatalog>,
    platform: Rc<dyn Platform>,
    bus: EventBus,
    history: MessageHistory,
    /// Live draft saved when history recall starts
    stashed_draft: Option<Document>,
    revision: u64,
    processed_revision: u64,
    content: ProcessedContent,
    last_submitted: Option<ProcessedContent>,
    empty: bool,
    /// Set once the missing selection API has been reported
    selection_warned: Cell<bool>,
}

impl fmt::Debug for Composer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composer")
            .field("doc", &self.doc)
            .field("selection", &self.selection)
            .field("revision", &self.revision)
            .field("processed_revision", &self.processed_revision)
            .field("empty", &self.empty)
            .finish_non_exhaustive()
    }
}

impl Composer {
    pub fn new(catalog: Rc<dyn EmoteCatalog>, platform: Rc<dyn Platform>, bus: EventBus) -> Self {
        Self {
            doc: Document::new(),
            selection: None,
            catalog,
            platform,
            bus,
            history: MessageHistory::new(),
            stashed_draft: None,
            revision: 0,
            processed_revision: 0,
            content: ProcessedContent::default(),
            last_submitted: None,
            empty: true,
            selection_warned: Cell::new(false),
        }
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history = MessageHistory::with_capacity(capacity);
        self
    }

    // === Accessors ===

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Caret position; the end of the document when no caret is placed
    pub fn caret(&self) -> usize {
        self.selection
            .map_or_else(|| self.doc.len_units(), |sel| sel.head)
    }

    pub fn history(&self) -> &MessageHistory {
        &self.history
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Bumped by every mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Revision the last serialization pass ran against
    pub fn processed_revision(&self) -> u64 {
        self.processed_revision
    }

    pub fn needs_processing(&self) -> bool {
        self.revision != self.processed_revision
    }

    /// Result of the last serialization pass
    pub fn content(&self) -> &ProcessedContent {
        &self.content
    }

    pub fn message(&self) -> &str {
        &self.content.message
    }

    pub fn character_count(&self) -> usize {
        self.content.character_count
    }

    /// No token and nothing but whitespace
    pub fn is_empty(&self) -> bool {
        self.doc.is_blank()
    }

    /// Surface view of the current selection
    pub fn surface_selection(&self) -> Option<SurfaceSelection> {
        self.selection.map(|sel| {
            SurfaceSelection::new(
                surface::point_for_unit(&self.doc, sel.anchor),
                surface::point_for_unit(&self.doc, sel.head),
            )
        })
    }

    /// Surface nodes for the current document
    pub fn render(&self) -> Vec<SurfaceNode> {
        surface::render(&self.doc)
    }

    // === Insertion ===

    /// Insert `text` at the caret, replacing any selection
    pub fn insert_text(&mut self, text: &str) -> bool {
        let range = self.target_range();
        if text.is_empty() && range.is_empty() {
            return false;
        }

        let start = range.start;
        let inserted = self.doc.replace_range(range, vec![Segment::text(text)]);
        self.place_caret(start + inserted);
        self.touch();
        true
    }

    /// Insert the emote `id` as a token at the caret, replacing any
    /// selection, and leave the caret right after it.
    ///
    /// Returns the unit offset of the new token, or `None` if the id is
    /// empty or unknown to the catalog.
    pub fn insert_token(&mut self, id: &TokenId) -> Option<usize> {
        if id.is_empty() {
            tracing::error!("insert_token called without an emote id");
            return None;
        }

        // Picking an emote ends any history recall
        self.history.reset_cursor();

        let Some(markup) = self.catalog.renderable_by_id(id) else {
            tracing::debug!(%id, "No renderable emote for id");
            return None;
        };

        let range = self.target_range();
        let at = range.start;
        self.doc
            .replace_range(range, vec![Segment::Token(Token::new(id.clone(), markup))]);
        self.place_caret(at + 1);
        self.touch();
        self.process_content();
        Some(at)
    }

    /// Insert pasted lines as one batch.
    ///
    /// Words are split on whitespace across all lines and rejoined with
    /// single spaces; a word naming an emote exactly becomes a token.
    /// Returns the number of tokens created.
    pub fn parse_and_insert_paste<S: AsRef<str>>(&mut self, lines: &[S]) -> usize {
        let segments = self.tokenize(lines);
        if segments.is_empty() {
            return 0;
        }
        let tokens = segments.iter().filter(|s| s.is_token()).count();

        let range = self.target_range();
        let start = range.start;
        let inserted = self.doc.replace_range(range, segments);
        self.place_caret(start + inserted);
        self.touch();
        self.process_content();
        tokens
    }

    /// Replace the whole draft with `text`, tokenizing emote names
    pub fn set_content(&mut self, text: &str) {
        self.doc = Document::from_segments(self.tokenize(&[text]));
        let end = self.doc.len_units();
        self.place_caret(end);
        self.touch();
        self.process_content();
    }

    pub fn clear(&mut self) {
        self.doc.clear();
        self.place_caret(0);
        self.touch();
        self.process_content();
    }

    /// Swap the token at unit `offset` for the emote `id`
    pub fn replace_token(&mut self, offset: usize, id: &TokenId) -> Option<usize> {
        if !self.token_at(offset) {
            tracing::error!(offset, "replace_token: no token at offset");
            return None;
        }
        let Some(markup) = self.catalog.renderable_by_id(id) else {
            tracing::debug!(%id, "No renderable emote for id");
            return None;
        };

        self.doc
            .replace_token_at(offset, Segment::Token(Token::new(id.clone(), markup)));
        self.touch();
        Some(offset)
    }

    /// Turn the token at unit `offset` back into literal `text`, caret after it
    pub fn replace_token_with_text(&mut self, offset: usize, text: &str) -> bool {
        if !self.token_at(offset) {
            tracing::error!(offset, "replace_token_with_text: no token at offset");
            return false;
        }

        self.doc.replace_token_at(offset, Segment::text(text));
        self.place_caret(offset + text.chars().count());
        self.touch();
        true
    }

    // === Deletion ===

    /// Backspace: removes the selection, or the unit before the caret.
    /// A token is always removed whole.
    pub fn delete_backward(&mut self) -> bool {
        let range = self.target_range();
        if !range.is_empty() {
            return self.delete_range(range);
        }
        match range.start {
            0 => false,
            caret => self.delete_range(caret - 1..caret),
        }
    }

    /// Delete: removes the selection, or the unit after the caret
    pub fn delete_forward(&mut self) -> bool {
        let range = self.target_range();
        if !range.is_empty() {
            return self.delete_range(range);
        }
        let caret = range.start;
        if caret >= self.doc.len_units() {
            return false;
        }
        self.delete_range(caret..caret + 1)
    }

    /// Ctrl+Backspace. A token counts as one word.
    pub fn delete_word_backward(&mut self) -> bool {
        let range = self.target_range();
        if !range.is_empty() {
            return self.delete_range(range);
        }
        let caret = range.start;
        let start = self.word_boundary(caret, Direction::Backward);
        if start >= caret {
            return false;
        }
        self.delete_range(start..caret)
    }

    /// Ctrl+Delete. A token counts as one word.
    pub fn delete_word_forward(&mut self) -> bool {
        let range = self.target_range();
        if !range.is_empty() {
            return self.delete_range(range);
        }
        let caret = range.start;
        let end = self.word_boundary(caret, Direction::Forward);
        if end <= caret {
            return false;
        }
        self.delete_range(caret..end)
    }

    fn delete_range(&mut self, range: Range<usize>) -> bool {
        let start = range.start;
        let removed = self.doc.remove_range(range);
        if removed.is_empty() {
            return false;
        }
        if removed.iter().any(Segment::is_token) {
            tracing::trace!(start, "removed token(s) with deletion");
        }
        self.place_caret(start);
        self.touch();
        true
    }

    // === Word completion ===

    /// Space bar: if the word right before the caret names an emote, replace
    /// it with the token; otherwise type a space.
    ///
    /// Returns true if a token was created.
    pub fn handle_word_completion(&mut self) -> bool {
        let range = self.target_range();
        if !range.is_empty() {
            self.insert_text(" ");
            return false;
        }

        let caret = range.start;
        let word_start = self.word_start_before(caret);
        if word_start == caret {
            self.insert_text(" ");
            return false;
        }

        let word: String = self
            .doc
            .remove_range(word_start..caret)
            .iter()
            .filter_map(Segment::as_text)
            .collect();

        match self.resolve(&word) {
            Some(token) => {
                tracing::debug!(word, id = %token.id, "completed emote");
                self.history.reset_cursor();
                self.doc.insert(word_start, vec![Segment::Token(token)]);
                self.place_caret(word_start + 1);
                self.touch();
                self.process_content();
                true
            }
            None => {
                // Put the word back untouched and type the space after it
                self.doc.insert(word_start, vec![Segment::Text(word)]);
                self.insert_text(" ");
                false
            }
        }
    }

    /// Start of the run of non-whitespace chars ending at `caret`
    fn word_start_before(&self, caret: usize) -> usize {
        let mut pos = caret;
        while let Some(Unit::Char(ch)) = self.doc.unit_before(pos) {
            if ch.is_whitespace() {
                break;
            }
            pos -= 1;
        }
        pos
    }

    // === Serialization ===

    /// Walk the document once and rebuild the outgoing message.
    ///
    /// Publishes the character count and, on a change, the empty state.
    pub fn process_content(&mut self) -> &ProcessedContent {
        let mut parts: Vec<String> = Vec::new();
        let mut token_ids = BTreeSet::new();

        for segment in self.doc.segments() {
            match segment {
                Segment::Text(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        parts.push(trimmed.to_string());
                    }
                }
                Segment::Token(token) if token.is_malformed() => {
                    tracing::warn!(id = %token.id, "Invalid component node, skipping");
                }
                Segment::Token(token) if !self.resolves(&token.id) => {
                    tracing::warn!(id = %token.id, "Unknown emote id in draft, skipping");
                }
                Segment::Token(token) => {
                    token_ids.insert(token.id.clone());
                    parts.push(self.catalog.embeddable(&token.id));
                }
            }
        }

        let message = parts.join(" ");
        let character_count = message.chars().count();
        self.content = ProcessedContent {
            message,
            token_ids,
            character_count,
        };
        self.processed_revision = self.revision;

        self.bus
            .publish(topics::CHARACTER_COUNT, json!({ "value": character_count }));
        self.update_empty_state();
        &self.content
    }

    /// The draft as the user would type it, tokens written as emote names
    pub fn draft_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        for segment in self.doc.segments() {
            match segment {
                Segment::Text(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        parts.push(trimmed.to_string());
                    }
                }
                Segment::Token(token) => parts.push(
                    self.catalog
                        .name_by_id(&token.id)
                        .unwrap_or_else(|| token.id.to_string()),
                ),
            }
        }
        parts.join(" ")
    }

    // === Submit ===

    /// Publish a submit request if the draft has content.
    ///
    /// A pending debounced pass is run first so [`Composer::message`] holds
    /// the whole draft when the host reacts to the event.
    pub fn request_submit(&mut self) -> bool {
        if self.is_empty() {
            tracing::debug!("submit ignored, input is empty");
            return false;
        }
        if self.needs_processing() {
            self.process_content();
        }
        self.bus.publish(topics::SUBMIT, Value::Null);
        true
    }

    /// Called by the host once the message has been accepted: records it in
    /// history and starts a fresh draft. Returns the submitted content, which
    /// stays readable through [`Composer::last_submitted`].
    pub fn finish_submit(&mut self) -> &ProcessedContent {
        let content = self.process_content().clone();
        let typed = self.draft_text();
        self.history.add_message(&typed);
        self.history.reset_cursor();
        self.stashed_draft = None;
        self.clear();
        self.last_submitted.insert(content)
    }

    /// Content handed over by the last [`Composer::finish_submit`]
    pub fn last_submitted(&self) -> Option<&ProcessedContent> {
        self.last_submitted.as_ref()
    }

    // === History recall ===

    /// Step to an older history entry. Only starts a recall when the draft
    /// is empty.
    pub fn recall_older(&mut self) -> bool {
        let recalling = !self.history.is_cursor_at_start();
        if !recalling && !self.is_empty() {
            return false;
        }
        if !self.history.can_move_cursor(Recall::Older) {
            return false;
        }

        if !recalling {
            self.stashed_draft = Some(self.doc.clone());
        }
        self.history.move_cursor(Recall::Older);
        self.load_history_entry();
        true
    }

    /// Step to a newer history entry, or past the newest back to the draft
    pub fn recall_newer(&mut self) -> bool {
        if self.history.is_cursor_at_start() {
            return false;
        }

        if self.history.can_move_cursor(Recall::Newer) {
            self.history.move_cursor(Recall::Newer);
            self.load_history_entry();
        } else {
            self.history.reset_cursor();
            self.doc = self.stashed_draft.take().unwrap_or_default();
            let end = self.doc.len_units();
            self.place_caret(end);
            self.touch();
            self.process_content();
        }
        true
    }

    fn load_history_entry(&mut self) {
        if let Some(entry) = self.history.message().map(str::to_string) {
            self.set_content(&entry);
        }
    }

    // === Caret movement ===

    /// Ctrl+Left/Right. A token adjacent to the caret in `direction` is
    /// crossed in one step; text moves by word.
    pub fn handle_directional_word_skip(&mut self, direction: Direction, extend: bool) {
        let Some(sel) = self.movable_selection() else {
            return;
        };

        if !extend && !sel.is_empty() {
            let pos = match direction {
                Direction::Backward => sel.start(),
                Direction::Forward => sel.end(),
            };
            self.selection = Some(Selection::collapsed(pos));
            return;
        }

        let target = self.word_boundary(sel.head, direction);
        self.move_head(target, extend);
    }

    /// Left/Right by one unit
    pub fn move_caret(&mut self, direction: Direction, extend: bool) {
        let Some(sel) = self.movable_selection() else {
            return;
        };

        if !extend && !sel.is_empty() {
            let pos = match direction {
                Direction::Backward => sel.start(),
                Direction::Forward => sel.end(),
            };
            self.selection = Some(Selection::collapsed(pos));
            return;
        }

        let target = match direction {
            Direction::Backward => sel.head.saturating_sub(1),
            Direction::Forward => (sel.head + 1).min(self.doc.len_units()),
        };
        self.move_head(target, extend);
    }

    pub fn move_to_start(&mut self, extend: bool) {
        if self.movable_selection().is_some() {
            self.move_head(0, extend);
        }
    }

    pub fn move_to_end(&mut self, extend: bool) {
        if self.movable_selection().is_some() {
            let end = self.doc.len_units();
            self.move_head(end, extend);
        }
    }

    pub fn select_all(&mut self) {
        if self.movable_selection().is_some() {
            self.selection = Some(Selection::new(0, self.doc.len_units()));
        }
    }

    /// Adopt a selection reported by the surface.
    ///
    /// Positions inside a token are snapped outward first. Returns true if
    /// the reported selection had to be corrected, in which case the surface
    /// should be told the normalized one.
    pub fn set_surface_selection(&mut self, reported: SurfaceSelection) -> bool {
        if !self.platform.supports_selection() {
            self.warn_selection_unavailable();
            return false;
        }

        let normal = normalize::normalize_selection(&self.doc, reported);
        let snapped = normal != reported;
        if snapped {
            tracing::trace!(?reported, ?normal, "snapped selection out of token");
        }

        match (
            surface::unit_for_point(&self.doc, normal.anchor),
            surface::unit_for_point(&self.doc, normal.focus),
        ) {
            (Some(anchor), Some(head)) => self.selection = Some(Selection::new(anchor, head)),
            _ => tracing::error!(?normal, "normalized selection still inside a token"),
        }
        snapped
    }

    fn movable_selection(&mut self) -> Option<Selection> {
        if !self.platform.supports_selection() {
            self.warn_selection_unavailable();
            return None;
        }
        let end = self.doc.len_units();
        Some(*self.selection.get_or_insert(Selection::collapsed(end)))
    }

    fn move_head(&mut self, pos: usize, extend: bool) {
        let end = self.doc.len_units();
        let sel = self.selection.get_or_insert(Selection::collapsed(end));
        sel.move_head(pos.min(end), extend);
    }

    /// Next word boundary from `from`, never stepping into a token.
    ///
    /// Backward skips non-word chars then word chars; forward skips the run
    /// of the starting char type then any whitespace.
    fn word_boundary(&self, from: usize, direction: Direction) -> usize {
        match direction {
            Direction::Backward => {
                if self.doc.unit_before(from).is_some_and(|u| u.is_token()) {
                    return from - 1;
                }

                let mut pos = from;
                while let Some(Unit::Char(ch)) = self.doc.unit_before(pos) {
                    if char_type(ch) == CharType::WordChar {
                        break;
                    }
                    pos -= 1;
                }
                while let Some(Unit::Char(ch)) = self.doc.unit_before(pos) {
                    if char_type(ch) != CharType::WordChar {
                        break;
                    }
                    pos -= 1;
                }
                pos
            }
            Direction::Forward => {
                let first = match self.doc.unit_at(from) {
                    None => return from,
                    Some(Unit::Token(_)) => return from + 1,
                    Some(Unit::Char(ch)) => ch,
                };

                let start_type = char_type(first);
                let mut pos = from;
                while let Some(Unit::Char(ch)) = self.doc.unit_at(pos) {
                    if char_type(ch) != start_type {
                        break;
                    }
                    pos += 1;
                }
                while let Some(Unit::Char(ch)) = self.doc.unit_at(pos) {
                    if char_type(ch) != CharType::Whitespace {
                        break;
                    }
                    pos += 1;
                }
                pos
            }
        }
    }

    // === Surface reconciliation ===

    /// Replace the document with a surface tree edited behind the
    /// composer's back. Malformed tokens, and components whose id the
    /// catalog does not know, are kept until the next cleanup.
    pub fn resync_from_surface(&mut self, nodes: Vec<SurfaceNode>) {
        let readout = surface::read(nodes);
        if readout.dropped_line_breaks > 0 {
            tracing::debug!(
                count = readout.dropped_line_breaks,
                "Dropped stray line breaks"
            );
        }
        if readout.dropped_components > 0 {
            tracing::warn!(
                count = readout.dropped_components,
                "Dropped components without an emote id"
            );
        }

        let segments = readout
            .document
            .segments()
            .iter()
            .cloned()
            .map(|segment| match segment {
                Segment::Token(token) if !token.is_malformed() && !self.resolves(&token.id) => {
                    tracing::warn!(id = %token.id, "Component with unknown emote id");
                    Segment::Token(Token::malformed(token.id))
                }
                other => other,
            })
            .collect();
        self.doc = Document::from_segments(segments);
        let len = self.doc.len_units();
        if let Some(sel) = &mut self.selection {
            sel.clamp(len);
        }
        self.touch();
    }

    /// Remove tokens whose surface structure was damaged.
    /// Returns how many were removed.
    pub fn remove_malformed_tokens(&mut self) -> usize {
        let removed = self.doc.remove_malformed();
        if removed.is_empty() {
            return 0;
        }
        tracing::warn!(count = removed.len(), "Removed malformed emote components");

        let shift = |pos: usize| pos - removed.iter().filter(|&&at| at < pos).count();
        if let Some(sel) = &mut self.selection {
            *sel = Selection::new(shift(sel.anchor), shift(sel.head));
        }
        self.touch();
        removed.len()
    }

    // === Internals ===

    fn resolves(&self, id: &TokenId) -> bool {
        self.catalog.renderable_by_id(id).is_some()
    }

    fn warn_selection_unavailable(&self) {
        if !self.selection_warned.replace(true) {
            tracing::warn!("Selection API unavailable, edits append at end of input");
        }
    }

    /// Range an edit applies to: the selection, or the end of the document
    /// when the surface cannot report one
    fn target_range(&self) -> Range<usize> {
        let len = self.doc.len_units();
        if !self.platform.supports_selection() {
            self.warn_selection_unavailable();
            return len..len;
        }
        match self.selection {
            Some(sel) => sel.start().min(len)..sel.end().min(len),
            None => {
                tracing::debug!("No caret placed, appending at end of input");
                len..len
            }
        }
    }

    fn place_caret(&mut self, pos: usize) {
        if self.platform.supports_selection() {
            self.selection = Some(Selection::collapsed(pos));
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.update_empty_state();
    }

    fn update_empty_state(&mut self) {
        let empty = self.doc.is_blank();
        if empty != self.empty {
            self.empty = empty;
            self.bus
                .publish(topics::IS_EMPTY, json!({ "isEmpty": empty }));
        }
    }

    fn token_at(&self, offset: usize) -> bool {
        self.doc.unit_at(offset).is_some_and(|u| u.is_token())
    }

    /// Token for an emote name, if the catalog knows and can render it
    fn resolve(&self, name: &str) -> Option<Token> {
        let id = self.catalog.emote_id_by_name(name)?;
        let markup = self.catalog.renderable_by_id(&id)?;
        Some(Token::new(id, markup))
    }

    fn tokenize<S: AsRef<str>>(&self, lines: &[S]) -> Vec<Segment> {
        let mut segments = Vec::new();
        let words = lines.iter().flat_map(|line| line.as_ref().split_whitespace());
        for (i, word) in words.enumerate() {
            if i > 0 {
                segments.push(Segment::text(" "));
            }
            match self.resolve(word) {
                Some(token) => segments.push(Segment::Token(token)),
                None => segments.push(Segment::text(word)),
            }
        }
        segments
    }
}
