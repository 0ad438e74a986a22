//! Piece-table document with an attached syntax tree.
//!
//! The logical text is the concatenation of an ordered list of [`Fragment`]s. Each fragment is
//! an `(offset, length)` view into one of two owned buffers: the pristine original text, or an
//! append-only buffer holding inserted text. Edits only ever split and splice the fragment
//! list; no buffer is rewritten.
//!
//! After each batch of edits the text is reparsed, because every node offset of the previous
//! tree may be stale.

use crate::edit::{Edit, is_application_ordered};
use crate::error::FormatError;
use crate::position::{Position, Range};
use crate::slice::DocumentSlice;
use cfmt_core_style::UnformattableMarkers;
use ropey::Rope;
use std::fmt;
use tree_sitter::{Language, Node, Parser, Tree};

/// Buffer a fragment points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    /// The read-only original text.
    Original,
    /// The append-only buffer of inserted text.
    Added,
}

/// A borrowed span of one of the document buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    /// Which buffer the span lives in.
    pub buffer: BufferKind,
    /// Start offset inside that buffer.
    pub start: usize,
    /// Byte length of the span.
    pub len: usize,
}

impl Fragment {
    fn new(buffer: BufferKind, start: usize, len: usize) -> Self {
        Self { buffer, start, len }
    }

    fn split(self, at: usize) -> (Self, Self) {
        debug_assert!(at > 0 && at < self.len);
        (
            Self::new(self.buffer, self.start, at),
            Self::new(self.buffer, self.start + at, self.len - at),
        )
    }
}

/// Where the last split left off: `fragments[index]` starts at byte `base`.
///
/// Fragments before `index` are never touched by a split or splice made through the cursor, so
/// a batch applied in descending offset order walks the fragment list once.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    index: usize,
    base: usize,
}

/// A source document: piece table, parser and current syntax tree.
pub struct Document {
    original: String,
    added: Vec<u8>,
    fragments: Vec<Fragment>,
    /// Logical length, kept in step with `fragments`.
    len: usize,
    /// Text the current tree was parsed from.
    source: String,
    lines: Rope,
    parser: Parser,
    tree: Tree,
}

impl Document {
    /// Parse `text` with `language`.
    ///
    /// A tree containing syntax errors is still a valid document; see
    /// [`Document::first_syntax_error`].
    pub fn new(text: &str, language: &Language) -> Result<Self, FormatError> {
        let mut parser = Parser::new();
        parser
            .set_language(language)
            .map_err(|e| FormatError::Language(e.to_string()))?;
        let tree = parser.parse(text, None).ok_or(FormatError::ParseFailed)?;

        let fragments = if text.is_empty() {
            Vec::new()
        } else {
            vec![Fragment::new(BufferKind::Original, 0, text.len())]
        };

        Ok(Self {
            original: text.to_string(),
            added: Vec::new(),
            fragments,
            len: text.len(),
            source: text.to_string(),
            lines: Rope::from_str(text),
            parser,
            tree,
        })
    }

    /// The current syntax tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Root node of the current syntax tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// The text as first loaded, before any edit.
    pub fn original_text(&self) -> &str {
        &self.original
    }

    /// Returns `true` if any applied edit changed the text.
    pub fn is_modified(&self) -> bool {
        self.source != self.original
    }

    /// Logical length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The live fragment list.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    fn bytes_of(&self, fragment: &Fragment) -> &[u8] {
        let buffer = match fragment.buffer {
            BufferKind::Original => self.original.as_bytes(),
            BufferKind::Added => &self.added,
        };
        &buffer[fragment.start..fragment.start + fragment.len]
    }

    /// Text of `range` as it was when the current tree was parsed.
    ///
    /// Edits of the running pass are only collected, never applied mid-pass, so this always
    /// agrees with the node offsets the pass is looking at.
    pub fn original_contents_at(&self, range: Range) -> &str {
        &self.source[range.start.byte_offset..range.end.byte_offset]
    }

    /// The full text the current tree was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Row/column of a byte offset in the current text.
    ///
    /// # Panics
    /// If `offset` lies past the end of the text.
    pub fn position_at(&self, offset: usize) -> Position {
        assert!(
            offset <= self.source.len(),
            "offset {offset} outside document of length {}",
            self.source.len()
        );
        let row = self.lines.byte_to_line(offset);
        let column = offset - self.lines.line_to_byte(row);
        Position::new(row, column, offset)
    }

    /// A read-only view of `range`.
    ///
    /// # Panics
    /// If `range` extends past the end of the text.
    pub fn slice(&self, range: Range) -> DocumentSlice<'_> {
        let from = range.start.byte_offset;
        let to = range.end.byte_offset;
        assert!(
            to <= self.len(),
            "{range} outside document of length {}",
            self.len()
        );

        let mut out = Vec::new();
        let mut base = 0usize;
        for fragment in &self.fragments {
            if base >= to {
                break;
            }
            let end = base + fragment.len;
            if end > from {
                let bytes = self.bytes_of(fragment);
                let lo = from.saturating_sub(base);
                let hi = (to - base).min(fragment.len);
                out.push(&bytes[lo..hi]);
            }
            base = end;
        }
        DocumentSlice::new(range, out)
    }

    /// Split the fragment list so that a fragment starts exactly at `offset`; returns its index
    /// (or the list length when `offset` is the end of the text).
    fn split_at(&mut self, offset: usize, cursor: &mut Cursor) -> usize {
        while cursor.base > offset {
            cursor.index -= 1;
            cursor.base -= self.fragments[cursor.index].len;
        }
        while cursor.index < self.fragments.len()
            && cursor.base + self.fragments[cursor.index].len <= offset
        {
            cursor.base += self.fragments[cursor.index].len;
            cursor.index += 1;
        }

        if cursor.index == self.fragments.len() {
            assert!(
                offset == cursor.base,
                "offset {offset} outside document of length {}",
                cursor.base
            );
            return cursor.index;
        }
        if offset == cursor.base {
            return cursor.index;
        }
        let (left, right) = self.fragments[cursor.index].split(offset - cursor.base);
        self.fragments[cursor.index] = left;
        self.fragments.insert(cursor.index + 1, right);
        cursor.index + 1
    }

    fn delete(&mut self, range: Range, cursor: &mut Cursor) {
        let from = range.start.byte_offset;
        let to = range.end.byte_offset.min(self.len);
        if from >= to {
            return;
        }
        let first = self.split_at(from, cursor);
        let last = self.split_at(to, cursor);
        self.fragments.drain(first..last);
        self.len -= to - from;
        *cursor = Cursor {
            index: first,
            base: from,
        };
    }

    fn insert(&mut self, position: Position, text: &str, cursor: &mut Cursor) {
        if text.is_empty() {
            return;
        }
        let start = self.added.len();
        self.added.extend_from_slice(text.as_bytes());
        let index = self.split_at(position.byte_offset, cursor);
        self.fragments
            .insert(index, Fragment::new(BufferKind::Added, start, text.len()));
        self.len += text.len();
    }

    /// Apply a batch of edits and reparse.
    ///
    /// The batch must already be in application order (see
    /// [`sort_for_application`](crate::edit::sort_for_application)); every edit's coordinates
    /// refer to the text before the batch. Deleting past the end of the text truncates
    /// silently.
    pub fn apply_edits(&mut self, edits: &[Edit]) -> Result<(), FormatError> {
        debug_assert!(
            is_application_ordered(edits),
            "edit batch is not in application order"
        );
        if edits.is_empty() {
            return Ok(());
        }

        let mut cursor = Cursor {
            index: self.fragments.len(),
            base: self.len,
        };
        for edit in edits {
            log::trace!("apply {edit}");
            match edit {
                Edit::Delete { range } => self.delete(*range, &mut cursor),
                Edit::Insert { position, text } => self.insert(*position, text, &mut cursor),
            }
        }
        self.reparse()
    }

    fn reparse(&mut self) -> Result<(), FormatError> {
        self.source = self.to_string();
        self.lines = Rope::from_str(&self.source);
        self.tree = self
            .parser
            .parse(&self.source, None)
            .ok_or(FormatError::ParseFailed)?;
        Ok(())
    }

    /// Position of the first error or missing node, if the tree has any.
    pub fn first_syntax_error(&self) -> Option<Position> {
        let root = self.root();
        if !root.has_error() {
            return None;
        }
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.is_error() || node.is_missing() {
                return Some(Position::start_of(node));
            }
            let mut cursor = node.walk();
            let children: Vec<Node<'_>> = node
                .children(&mut cursor)
                .filter(|child| child.has_error())
                .collect();
            stack.extend(children.into_iter().rev());
        }
        Some(Position::start_of(root))
    }

    /// Regions bracketed by the off/on marker lines.
    ///
    /// A region runs from the start of the `off` line to the end of the matching `on` line,
    /// or to the end of the text when no `on` follows.
    pub fn unformattable_ranges(&self, markers: &UnformattableMarkers) -> Vec<Range> {
        let mut out = Vec::new();
        if markers.off.is_empty() {
            return out;
        }

        let mut open: Option<usize> = None;
        let mut offset = 0usize;
        for line in self.source.split_inclusive('\n') {
            let trimmed = line.trim();
            match open {
                None if trimmed == markers.off => open = Some(offset),
                Some(start) if trimmed == markers.on => {
                    let end = offset + line.trim_end_matches(['\r', '\n']).len();
                    out.push(Range::new(self.position_at(start), self.position_at(end)));
                    open = None;
                }
                _ => {}
            }
            offset += line.len();
        }
        if let Some(start) = open {
            out.push(Range::new(
                self.position_at(start),
                self.position_at(self.source.len()),
            ));
        }
        out
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bytes = Vec::with_capacity(self.len());
        for fragment in &self.fragments {
            bytes.extend_from_slice(self.bytes_of(fragment));
        }
        f.write_str(&String::from_utf8_lossy(&bytes))
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("len", &self.len())
            .field("fragments", &self.fragments.len())
            .field("modified", &self.is_modified())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::sort_for_application;

    fn cpp(text: &str) -> Document {
        Document::new(text, &tree_sitter_cpp::LANGUAGE.into()).unwrap()
    }

    fn apply(doc: &mut Document, mut edits: Vec<Edit>) {
        sort_for_application(&mut edits);
        doc.apply_edits(&edits).unwrap();
    }

    #[test]
    fn test_new_document_is_one_fragment() {
        let doc = cpp("int x;\n");
        assert_eq!(doc.fragments().len(), 1);
        assert_eq!(doc.to_string(), "int x;\n");
        assert_eq!(doc.root().kind(), "translation_unit");
        assert!(doc.first_syntax_error().is_none());
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_slice_across_fragments() {
        let mut doc = cpp("int x;\n");
        let at = doc.position_at(4);
        apply(&mut doc, vec![Edit::insert(at, "yy")]);
        assert_eq!(doc.to_string(), "int yyx;\n");
        assert_eq!(doc.fragments().len(), 3);

        let range = Range::new(doc.position_at(2), doc.position_at(7));
        let slice = doc.slice(range);
        assert_eq!(slice.to_string(), "t yyx");
        assert_eq!(slice.fragments().len(), 3);
    }

    #[test]
    fn test_edits_use_pre_batch_coordinates() {
        let mut doc = cpp("int a;\nint b;\n");
        let edits = vec![
            Edit::insert(doc.position_at(4), "long_"),
            Edit::delete(Range::new(doc.position_at(11), doc.position_at(12))),
            Edit::insert(doc.position_at(11), "c"),
        ];
        apply(&mut doc, edits);
        assert_eq!(doc.to_string(), "int long_a;\nint c;\n");
        assert!(doc.is_modified());
        assert_eq!(doc.original_text(), "int a;\nint b;\n");
    }

    #[test]
    fn test_delete_then_insert_at_same_offset() {
        let mut doc = cpp("int x;  // note\n");
        let gap = Range::new(doc.position_at(6), doc.position_at(8));
        let edits = vec![Edit::insert(gap.start, " "), Edit::delete(gap)];
        apply(&mut doc, edits);
        assert_eq!(doc.to_string(), "int x; // note\n");
    }

    #[test]
    fn test_many_edits_in_one_batch() {
        let text = "a;\n".repeat(50);
        let mut doc = cpp(&text);
        let mut edits = Vec::new();
        for row in 0..50 {
            let start = doc.position_at(row * 3);
            edits.push(Edit::insert(start, "  "));
            edits.push(Edit::delete(Range::new(
                doc.position_at(row * 3 + 1),
                doc.position_at(row * 3 + 2),
            )));
        }
        apply(&mut doc, edits);
        assert_eq!(doc.to_string(), "  a\n".repeat(50));
        assert_eq!(doc.len(), 200);
        assert_eq!(doc.len(), doc.to_string().len());
    }

    #[test]
    fn test_delete_past_end_truncates() {
        let mut doc = cpp("int x;\n");
        let start = doc.position_at(6);
        let past = Position::new(5, 0, 100);
        apply(&mut doc, vec![Edit::delete(Range::new(start, past))]);
        assert_eq!(doc.to_string(), "int x;");
        assert_eq!(doc.len(), 6);
    }

    #[test]
    fn test_insert_at_end_appends() {
        let mut doc = cpp("int x;");
        let end = doc.position_at(6);
        apply(&mut doc, vec![Edit::insert(end, "\n")]);
        assert_eq!(doc.to_string(), "int x;\n");
    }

    #[test]
    fn test_reparse_after_edits() {
        let mut doc = cpp("int x;\n");
        let at = doc.position_at(0);
        apply(&mut doc, vec![Edit::insert(at, "long y;\n")]);
        let root = doc.root();
        assert_eq!(root.named_child_count(), 2);
        assert_eq!(doc.original_contents_at(Range::of(root)), "long y;\nint x;\n");
    }

    #[test]
    fn test_position_at_counts_rows() {
        let doc = cpp("a;\nbc;\n\nd;");
        assert_eq!(doc.position_at(0), Position::new(0, 0, 0));
        assert_eq!(doc.position_at(4), Position::new(1, 1, 4));
        assert_eq!(doc.position_at(7), Position::new(2, 0, 7));
        assert_eq!(doc.position_at(9), Position::new(3, 1, 9));
    }

    #[test]
    #[should_panic(expected = "outside document")]
    fn test_position_outside_text_is_a_contract_violation() {
        let doc = cpp("int x;");
        let _ = doc.position_at(7);
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let doc = cpp("int x = ;\n");
        assert!(doc.first_syntax_error().is_some());
    }

    #[test]
    fn test_unformattable_ranges() {
        let text = "int a;\n// cfmt off\nint   b;\n// cfmt on\nint c;\n  // cfmt off\nint d;\n";
        let doc = cpp(text);
        let ranges = doc.unformattable_ranges(&UnformattableMarkers::default());
        assert_eq!(ranges.len(), 2);
        assert_eq!(
            doc.original_contents_at(ranges[0]),
            "// cfmt off\nint   b;\n// cfmt on"
        );
        assert_eq!(
            doc.original_contents_at(ranges[1]),
            "  // cfmt off\nint d;\n"
        );
    }
}
