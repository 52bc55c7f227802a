//! Splits a diagram line into plain text and bracketed label spans.

use codeflow_core::flowchart::Shape;

/// A piece of one diagram line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    /// Text outside any label, kept verbatim.
    Text(&'a str),
    /// The content between a matching bracket pair.
    Label { shape: Shape, content: &'a str },
}

/// Split `line` into segments.
///
/// Both bracket kinds are tracked together and must nest properly, so
/// `[x[i] = 1]` is one label and `C{a[i] > 0}` is one decision label. An
/// opener without a properly nested closer stays in the text and scanning
/// resumes right after it.
pub(crate) fn segments(line: &str) -> Vec<Segment<'_>> {
    let bytes = line.as_bytes();
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let Some(shape) = opener(bytes[i]) else {
            i += 1;
            continue;
        };
        let Some(close) = matching_close(bytes, i) else {
            i += 1;
            continue;
        };

        if text_start < i {
            segments.push(Segment::Text(&line[text_start..i]));
        }
        segments.push(Segment::Label {
            shape,
            content: &line[i + 1..close],
        });
        i = close + 1;
        text_start = i;
    }

    if text_start < line.len() {
        segments.push(Segment::Text(&line[text_start..]));
    }
    segments
}

// Brackets are ASCII, so checking single bytes never splits a character.
fn opener(byte: u8) -> Option<Shape> {
    Shape::from_open(char::from(byte))
}

fn closer(byte: u8) -> Option<Shape> {
    Shape::from_close(char::from(byte))
}

/// Index of the closer matching the opener at `open`, if the brackets after
/// it nest properly.
fn matching_close(bytes: &[u8], open: usize) -> Option<usize> {
    let mut stack = Vec::new();
    for (offset, &byte) in bytes[open..].iter().enumerate() {
        if let Some(shape) = opener(byte) {
            stack.push(shape);
        } else if let Some(shape) = closer(byte) {
            if stack.pop() != Some(shape) {
                return None;
            }
            if stack.is_empty() {
                return Some(open + offset);
            }
        }
    }
    None
}
