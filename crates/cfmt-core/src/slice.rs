//! Read-only views over document fragments.

use crate::position::{Position, Range};
use crate::unicode::UnicodeIterator;
use std::fmt;

/// An immutable view of a contiguous document range, backed by borrowed fragments.
///
/// Invariant: the fragment lengths always sum to `range.byte_count()`.
#[derive(Debug, Clone)]
pub struct DocumentSlice<'a> {
    range: Range,
    fragments: Vec<&'a [u8]>,
    len: usize,
}

impl<'a> DocumentSlice<'a> {
    pub(crate) fn new(range: Range, fragments: Vec<&'a [u8]>) -> Self {
        let len = fragments.iter().map(|f| f.len()).sum();
        debug_assert_eq!(len, range.byte_count(), "slice fragments disagree with {range}");
        Self {
            range,
            fragments,
            len,
        }
    }

    /// The document range this slice covers.
    pub fn range(&self) -> Range {
        self.range
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the slice covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The borrowed fragments, in document order.
    pub fn fragments(&self) -> &[&'a [u8]] {
        &self.fragments
    }

    /// Codepoint iterator over the slice.
    pub fn chars(&self) -> UnicodeIterator<'_> {
        UnicodeIterator::new(&self.fragments)
    }

    /// Byte at a position relative to the slice start.
    pub fn byte_at(&self, mut index: usize) -> Option<u8> {
        for fragment in &self.fragments {
            if index < fragment.len() {
                return Some(fragment[index]);
            }
            index -= fragment.len();
        }
        None
    }

    fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.fragments.iter().flat_map(|f| f.iter().copied())
    }

    /// Position of an absolute byte offset inside (or at the end of) this slice.
    ///
    /// # Panics
    /// If `offset` lies outside the slice.
    pub fn position_at(&self, offset: usize) -> Position {
        let start = self.range.start;
        assert!(
            offset >= start.byte_offset && offset <= self.range.end.byte_offset,
            "offset {offset} outside slice {}",
            self.range
        );
        let mut row = start.row;
        let mut column = start.column;
        for byte in self.bytes().take(offset - start.byte_offset) {
            if byte == b'\n' {
                row += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        Position::new(row, column, offset)
    }

    /// Re-slice by an absolute range contained in this slice.
    pub fn slice(&self, range: Range) -> DocumentSlice<'a> {
        assert!(
            self.range.contains(&range),
            "{range} is not inside slice {}",
            self.range
        );
        let from = range.start.byte_offset - self.range.start.byte_offset;
        let to = range.end.byte_offset - self.range.start.byte_offset;

        let mut out = Vec::new();
        let mut base = 0usize;
        for fragment in &self.fragments {
            let end = base + fragment.len();
            if end > from && base < to {
                let lo = from.saturating_sub(base);
                let hi = (to - base).min(fragment.len());
                out.push(&fragment[lo..hi]);
            }
            base = end;
            if base >= to {
                break;
            }
        }
        DocumentSlice::new(range, out)
    }

    /// Re-slice by byte offsets relative to the slice start.
    pub fn slice_bytes(&self, from: usize, to: usize) -> DocumentSlice<'a> {
        let base = self.range.start.byte_offset;
        let start = self.position_at(base + from);
        let end = self.position_at(base + to);
        self.slice(Range::new(start, end))
    }

    /// Absolute offset of the first `'\n'` at or after the absolute offset `from`.
    pub fn find_newline(&self, from: usize) -> Option<usize> {
        let skip = from.checked_sub(self.range.start.byte_offset)?;
        self.bytes()
            .enumerate()
            .skip(skip)
            .find(|(_, b)| *b == b'\n')
            .map(|(i, _)| self.range.start.byte_offset + i)
    }

    /// Split at every `'\n'`; the newline bytes are not part of any line.
    ///
    /// N newlines produce N + 1 lines, so a trailing newline yields an empty last line.
    pub fn lines(&self) -> Vec<DocumentSlice<'a>> {
        let mut out = Vec::new();
        let mut start = self.range.start.byte_offset;
        while let Some(newline) = self.find_newline(start) {
            let from = self.position_at(start);
            let to = self.position_at(newline);
            out.push(self.slice(Range::new(from, to)));
            start = newline + 1;
        }
        let from = self.position_at(start);
        out.push(self.slice(Range::new(from, self.range.end)));
        out
    }

    /// Drop leading and trailing ASCII whitespace.
    pub fn trim(&self) -> DocumentSlice<'a> {
        self.trim_start().trim_end()
    }

    /// Drop leading ASCII whitespace.
    pub fn trim_start(&self) -> DocumentSlice<'a> {
        let skip = self.bytes().take_while(|b| b.is_ascii_whitespace()).count();
        self.slice_bytes(skip, self.len)
    }

    /// Drop trailing ASCII whitespace.
    pub fn trim_end(&self) -> DocumentSlice<'a> {
        let bytes: Vec<u8> = self.bytes().collect();
        let keep = bytes
            .iter()
            .rposition(|b| !b.is_ascii_whitespace())
            .map_or(0, |i| i + 1);
        self.slice_bytes(0, keep)
    }

    /// Returns `true` if the slice is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.bytes().all(|b| b.is_ascii_whitespace())
    }

    /// Returns `true` if the slice begins with `prefix`.
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.len >= prefix.len() && self.bytes().zip(prefix).all(|(a, b)| a == *b)
    }

    /// Whitespace-separated words. Splitting is codepoint-aware, so any Unicode whitespace
    /// separates words and multi-byte characters are never cut.
    pub fn words(&self) -> Vec<DocumentSlice<'_>> {
        let mut out = Vec::new();
        let mut cursor = self.chars();
        let mut word_start: Option<UnicodeIterator<'_>> = None;

        loop {
            let here = cursor;
            let Some(ch) = cursor.next() else {
                if let Some(start) = word_start.take() {
                    out.push(self.word_slice(&start, &here));
                }
                break;
            };
            match (ch.is_whitespace(), word_start) {
                (true, Some(start)) => {
                    out.push(self.word_slice(&start, &here));
                    word_start = None;
                }
                (false, None) => word_start = Some(here),
                _ => {}
            }
        }
        out
    }

    fn word_slice<'s>(
        &'s self,
        start: &UnicodeIterator<'s>,
        end: &UnicodeIterator<'s>,
    ) -> DocumentSlice<'s> {
        let base = self.range.start.byte_offset;
        let range = Range::new(
            self.position_at(base + start.byte_index()),
            self.position_at(base + end.byte_index()),
        );
        DocumentSlice::new(range, start.fragments_until(end))
    }
}

impl fmt::Display for DocumentSlice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes: Vec<u8> = self.bytes().collect();
        f.write_str(&String::from_utf8_lossy(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture<'a>(parts: &[&'a str]) -> DocumentSlice<'a> {
        let fragments: Vec<&[u8]> = parts.iter().map(|&p| p.as_bytes()).collect();
        let text: String = parts.concat();
        let start = Position::new(0, 0, 0);
        let mut end = start;
        for b in text.bytes() {
            if b == b'\n' {
                end.row += 1;
                end.column = 0;
            } else {
                end.column += 1;
            }
            end.byte_offset += 1;
        }
        DocumentSlice::new(Range::new(start, end), fragments)
    }

    #[test]
    fn test_to_string_and_len() {
        let slice = fixture(&["int ", "x", " = 1;"]);
        assert_eq!(slice.len(), 10);
        assert_eq!(slice.to_string(), "int x = 1;");
    }

    #[test]
    fn test_reslice_across_fragments() {
        let slice = fixture(&["ab\nc", "de\n", "fg"]);
        let sub = slice.slice_bytes(2, 8);
        assert_eq!(sub.to_string(), "\ncde\nf");
        assert_eq!(sub.range().start, Position::new(0, 2, 2));
        assert_eq!(sub.range().end, Position::new(2, 1, 8));
        assert_eq!(sub.fragments().len(), 3);
    }

    #[test]
    fn test_find_newline_and_lines() {
        let slice = fixture(&["one\ntw", "o\n", "\nthree"]);
        assert_eq!(slice.find_newline(0), Some(3));
        assert_eq!(slice.find_newline(4), Some(7));
        assert_eq!(slice.find_newline(9), None);

        let lines: Vec<String> = slice.lines().iter().map(|l| l.to_string()).collect();
        assert_eq!(lines, vec!["one", "two", "", "three"]);
        assert_eq!(slice.lines()[3].range().start, Position::new(3, 0, 9));
    }

    #[test]
    fn test_trim_and_blank() {
        let slice = fixture(&["  \t", " hi there ", " \n"]);
        assert_eq!(slice.trim().to_string(), "hi there");
        assert_eq!(slice.trim_start().to_string(), "hi there  \n");
        assert!(!slice.is_blank());
        assert!(fixture(&[" ", "\t\n"]).is_blank());
        assert!(fixture(&["", ""]).trim().is_empty());
    }

    #[test]
    fn test_words_are_codepoint_safe() {
        let slice = fixture(&["  héllo wö", "rld\u{3000}日本 "]);
        let words: Vec<String> = slice.words().iter().map(|w| w.to_string()).collect();
        assert_eq!(words, vec!["héllo", "wörld", "日本"]);
    }

    #[test]
    fn test_word_ranges_track_document_offsets() {
        let slice = fixture(&["a b", "c\n  dd"]).slice_bytes(2, 9);
        let words = slice.words();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].to_string(), "bc");
        assert_eq!(words[0].range().start, Position::new(0, 2, 2));
        assert_eq!(words[0].range().end, Position::new(0, 4, 4));
        assert_eq!(words[0].fragments().len(), 2);
        assert_eq!(words[1].range().start, Position::new(1, 2, 7));
    }

    #[test]
    fn test_starts_with_across_fragments() {
        let slice = fixture(&[" ", "* item"]);
        assert!(slice.starts_with(b" * "));
        assert!(!slice.starts_with(b"*"));
    }
}
