//! Editing-surface model and the position mapping layer.
//!
//! The host surface renders each token as a component made of three parts:
//! a zero-width leading marker, a non-editable body and a zero-width trailing
//! marker. Surface caret positions are reported as a [`Point`] relative to a
//! segment; for a token the offset runs over `0..=TOKEN_SPAN`, where only the
//! two outer values are legal caret positions.

use serde::{Deserialize, Serialize};

use super::segment::{Document, Segment, Token, TokenId};

/// Number of surface offsets a token spans (leading marker, body, trailing marker)
pub const TOKEN_SPAN: usize = 3;

/// A caret position as reported by the surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub segment: usize,
    pub offset: usize,
}

impl Point {
    pub const fn new(segment: usize, offset: usize) -> Self {
        Self { segment, offset }
    }
}

/// A surface selection. `anchor == focus` is a collapsed caret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceSelection {
    pub anchor: Point,
    pub focus: Point,
}

impl SurfaceSelection {
    pub const fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub const fn caret(point: Point) -> Self {
        Self {
            anchor: point,
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// One part of a rendered token component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentPart {
    LeadingMarker,
    Body(String),
    TrailingMarker,
}

/// A child node of the surface root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceNode {
    Text(String),
    /// Stray `<br>`-like node injected by the surface
    LineBreak,
    Component {
        id: Option<String>,
        parts: Vec<ComponentPart>,
    },
}

impl SurfaceNode {
    /// A well-formed component for `token`
    pub fn component(token: &Token) -> Self {
        SurfaceNode::Component {
            id: Some(token.id.as_str().to_string()),
            parts: vec![
                ComponentPart::LeadingMarker,
                ComponentPart::Body(token.markup.clone()),
                ComponentPart::TrailingMarker,
            ],
        }
    }
}

/// Result of reading a surface tree back into segments
#[derive(Debug, Default)]
pub struct SurfaceReadout {
    pub document: Document,
    pub dropped_line_breaks: usize,
    pub dropped_components: usize,
}

/// Render the document as surface nodes
pub fn render(doc: &Document) -> Vec<SurfaceNode> {
    doc.segments()
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => SurfaceNode::Text(text.clone()),
            Segment::Token(token) => SurfaceNode::component(token),
        })
        .collect()
}

/// Read a surface tree produced by edits the composer did not perform.
///
/// Line breaks are dropped. A component missing any of its three parts is
/// kept as a malformed token; one without an id cannot be tracked and is
/// dropped outright.
pub fn read(nodes: Vec<SurfaceNode>) -> SurfaceReadout {
    let mut readout = SurfaceReadout::default();
    let mut segments = Vec::with_capacity(nodes.len());

    for node in nodes {
        match node {
            SurfaceNode::Text(text) => segments.push(Segment::Text(text)),
            SurfaceNode::LineBreak => readout.dropped_line_breaks += 1,
            SurfaceNode::Component { id: None, .. } => readout.dropped_components += 1,
            SurfaceNode::Component { id: Some(id), .. } if id.is_empty() => {
                readout.dropped_components += 1
            }
            SurfaceNode::Component {
                id: Some(id),
                parts,
            } => {
                let id = TokenId::new(id);
                let token = match parts.as_slice() {
                    [ComponentPart::LeadingMarker, ComponentPart::Body(markup), ComponentPart::TrailingMarker] => {
                        Token::new(id, markup.clone())
                    }
                    _ => Token::malformed(id),
                };
                segments.push(Segment::Token(token));
            }
        }
    }

    readout.document = Document::from_segments(segments);
    readout
}

/// Surface length of a segment
pub fn span(segment: &Segment) -> usize {
    match segment {
        Segment::Text(text) => text.chars().count(),
        Segment::Token(_) => TOKEN_SPAN,
    }
}

/// Surface point for a logical unit offset.
///
/// The point is placed at the start of the segment holding `unit`; the end
/// of the document maps to the end of the last segment.
pub fn point_for_unit(doc: &Document, unit: usize) -> Point {
    match doc.locate(unit) {
        Some((segment, within)) => Point::new(segment, within),
        None => match doc.segments().last() {
            Some(last) => Point::new(doc.segment_count() - 1, span(last)),
            None => Point::default(),
        },
    }
}

/// Logical unit offset for a surface point.
///
/// Returns `None` for a point strictly inside a token; such points must be
/// normalized first. Out-of-range points clamp to the nearest legal value.
pub fn unit_for_point(doc: &Document, point: Point) -> Option<usize> {
    let Some(segment) = doc.segments().get(point.segment) else {
        return Some(doc.len_units());
    };
    let start = doc.segment_start(point.segment);

    match segment {
        Segment::Text(_) => Some(start + point.offset.min(segment.unit_len())),
        Segment::Token(_) => match point.offset {
            0 => Some(start),
            o if o >= TOKEN_SPAN => Some(start + 1),
            _ => None,
        },
    }
}
