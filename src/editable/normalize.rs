//! Caret/selection normalizer.
//!
//! Classifies surface points against token boundaries and snaps illegal
//! positions (inside a token) to the nearer legal edge. Every function here
//! is a fixed point: normalizing an already normal position returns it
//! unchanged, so redundant selection-change notifications are harmless.

use std::cmp::Ordering;

use super::segment::{Document, Segment};
use super::surface::{span, Point, SurfaceSelection, TOKEN_SPAN};

/// Which token edge a position belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
}

/// Classification of a caret position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretState {
    /// Between ordinary text positions
    Outside,
    AtTokenLeftEdge,
    AtTokenRightEdge,
    /// Illegal; `nearer` is the boundary marker closest to the offset
    InsideToken { nearer: Edge },
}

impl CaretState {
    pub fn is_legal(self) -> bool {
        !matches!(self, CaretState::InsideToken { .. })
    }
}

pub fn classify(doc: &Document, point: Point) -> CaretState {
    match doc.segments().get(point.segment) {
        Some(Segment::Token(_)) => match point.offset {
            0 => CaretState::AtTokenLeftEdge,
            o if o >= TOKEN_SPAN => CaretState::AtTokenRightEdge,
            // Offset 1 follows the leading marker, offset 2 precedes the trailing one
            1 => CaretState::InsideToken { nearer: Edge::Left },
            _ => CaretState::InsideToken { nearer: Edge::Right },
        },
        _ => CaretState::Outside,
    }
}

/// Snap `point` to the nearer token edge if it is inside a token, and clamp
/// any offset past the end of its segment.
pub fn normalize_point(doc: &Document, point: Point) -> Point {
    match classify(doc, point) {
        CaretState::InsideToken { nearer } => snap(point, nearer),
        _ => clamp(doc, point),
    }
}

/// Normalize both ends of a selection.
///
/// A collapsed selection snaps like a caret. Otherwise the earlier endpoint
/// moves to the left edge and the later to the right edge of any token it
/// lands in, so a token is either wholly selected or not selected at all.
/// Direction (anchor vs focus) is preserved.
pub fn normalize_selection(doc: &Document, selection: SurfaceSelection) -> SurfaceSelection {
    if selection.is_collapsed() {
        return SurfaceSelection::caret(normalize_point(doc, selection.anchor));
    }

    let anchor = clamp(doc, selection.anchor);
    let focus = clamp(doc, selection.focus);
    let (anchor_edge, focus_edge) = match compare(anchor, focus) {
        Ordering::Greater => (Edge::Right, Edge::Left),
        _ => (Edge::Left, Edge::Right),
    };

    let widen = |point: Point, edge: Edge| match classify(doc, point) {
        CaretState::InsideToken { .. } => snap(point, edge),
        _ => point,
    };

    SurfaceSelection::new(widen(anchor, anchor_edge), widen(focus, focus_edge))
}

/// Whether `selection` is already normal
pub fn is_normal(doc: &Document, selection: SurfaceSelection) -> bool {
    normalize_selection(doc, selection) == selection
}

fn snap(point: Point, edge: Edge) -> Point {
    match edge {
        Edge::Left => Point::new(point.segment, 0),
        Edge::Right => Point::new(point.segment, TOKEN_SPAN),
    }
}

fn clamp(doc: &Document, point: Point) -> Point {
    match doc.segments().get(point.segment) {
        Some(segment) => Point::new(point.segment, point.offset.min(span(segment))),
        None => match doc.segments().last() {
            Some(last) => Point::new(doc.segment_count() - 1, span(last)),
            None => Point::default(),
        },
    }
}

fn compare(a: Point, b: Point) -> Ordering {
    (a.segment, a.offset).cmp(&(b.segment, b.offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editable::segment::{Token, TokenId};

    fn doc() -> Document {
        // "ab" [x] "cd"
        Document::from_segments(vec![
            Segment::text("ab"),
            Segment::Token(Token::new(TokenId::new("x"), "<x>")),
            Segment::text("cd"),
        ])
    }

    #[test]
    fn test_classify() {
        let doc = doc();
        assert_eq!(classify(&doc, Point::new(0, 1)), CaretState::Outside);
        assert_eq!(classify(&doc, Point::new(1, 0)), CaretState::AtTokenLeftEdge);
        assert_eq!(
            classify(&doc, Point::new(1, 1)),
            CaretState::InsideToken { nearer: Edge::Left }
        );
        assert_eq!(
            classify(&doc, Point::new(1, 2)),
            CaretState::InsideToken { nearer: Edge::Right }
        );
        assert_eq!(classify(&doc, Point::new(1, 3)), CaretState::AtTokenRightEdge);
    }

    #[test]
    fn test_caret_snaps_to_nearer_edge() {
        let doc = doc();
        assert_eq!(normalize_point(&doc, Point::new(1, 1)), Point::new(1, 0));
        assert_eq!(normalize_point(&doc, Point::new(1, 2)), Point::new(1, 3));
        assert_eq!(normalize_point(&doc, Point::new(0, 1)), Point::new(0, 1));
    }

    #[test]
    fn test_selection_widens_outward() {
        let doc = doc();
        // Forward selection ending inside the token at the "near left" offset
        let sel = SurfaceSelection::new(Point::new(0, 1), Point::new(1, 1));
        let norm = normalize_selection(&doc, sel);
        assert_eq!(norm.focus, Point::new(1, TOKEN_SPAN));
        assert_eq!(norm.anchor, Point::new(0, 1));

        // Backward selection starting inside the token
        let sel = SurfaceSelection::new(Point::new(2, 1), Point::new(1, 2));
        let norm = normalize_selection(&doc, sel);
        assert_eq!(norm.focus, Point::new(1, 0));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let doc = doc();
        for seg in 0..4 {
            for off in 0..5 {
                let p = Point::new(seg, off);
                let once = normalize_point(&doc, p);
                assert_eq!(normalize_point(&doc, once), once);
                assert!(classify(&doc, once).is_legal());

                let sel = SurfaceSelection::new(Point::new(0, 0), p);
                let once = normalize_selection(&doc, sel);
                assert!(is_normal(&doc, once));
            }
        }
    }
}
