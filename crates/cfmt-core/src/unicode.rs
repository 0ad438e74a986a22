//! Codepoint iteration over fragmented UTF-8.
//!
//! Document text lives in several non-contiguous byte fragments, and a multi-byte codepoint can
//! straddle a fragment boundary. [`UnicodeIterator`] decodes across those boundaries without
//! first copying the fragments into one buffer.

use std::cmp::Ordering;

/// Forward-only codepoint iterator over a sequence of byte fragments.
///
/// Iterators compare by their `(fragment, offset)` location, not by the decoded value. Comparing
/// iterators created over different fragment sequences is meaningless.
#[derive(Debug, Clone, Copy)]
pub struct UnicodeIterator<'a> {
    fragments: &'a [&'a [u8]],
    fragment: usize,
    offset: usize,
}

impl<'a> UnicodeIterator<'a> {
    /// An iterator positioned at the first byte of `fragments`.
    pub fn new(fragments: &'a [&'a [u8]]) -> Self {
        let mut iter = Self {
            fragments,
            fragment: 0,
            offset: 0,
        };
        iter.normalize();
        iter
    }

    /// An iterator positioned past the last byte.
    pub fn end(fragments: &'a [&'a [u8]]) -> Self {
        Self {
            fragments,
            fragment: fragments.len(),
            offset: 0,
        }
    }

    /// Returns `true` once every byte has been consumed.
    pub fn is_end(&self) -> bool {
        self.fragment >= self.fragments.len()
    }

    /// Byte distance from the start of the first fragment.
    pub fn byte_index(&self) -> usize {
        self.fragments[..self.fragment.min(self.fragments.len())]
            .iter()
            .map(|f| f.len())
            .sum::<usize>()
            + self.offset
    }

    /// Decode the codepoint at the current location without advancing.
    pub fn peek(&self) -> Option<char> {
        self.decode().map(|(ch, _)| ch)
    }

    /// Raw byte fragments between `self` (inclusive) and `end` (exclusive).
    ///
    /// The returned slices borrow the original fragments, so text can be reassembled without
    /// decoding and re-encoding it.
    pub fn fragments_until(&self, end: &Self) -> Vec<&'a [u8]> {
        let mut out = Vec::new();
        if *end <= *self {
            return out;
        }

        let mut fragment = self.fragment;
        let mut offset = self.offset;
        while fragment < self.fragments.len() && fragment <= end.fragment {
            let bytes = self.fragments[fragment];
            let stop = if fragment == end.fragment {
                end.offset
            } else {
                bytes.len()
            };
            if stop > offset {
                out.push(&bytes[offset..stop]);
            }
            fragment += 1;
            offset = 0;
        }
        out
    }

    fn byte_at(&self, fragment: usize, offset: usize) -> Option<u8> {
        self.fragments.get(fragment)?.get(offset).copied()
    }

    fn normalize(&mut self) {
        while self.fragment < self.fragments.len()
            && self.offset >= self.fragments[self.fragment].len()
        {
            self.fragment += 1;
            self.offset = 0;
        }
    }

    fn advance_bytes(&mut self, mut count: usize) {
        while count > 0 && !self.is_end() {
            let available = self.fragments[self.fragment].len() - self.offset;
            let step = available.min(count);
            self.offset += step;
            count -= step;
            self.normalize();
        }
    }

    /// Decode the codepoint at the current location. Returns the char and its encoded length.
    /// Malformed sequences decode to U+FFFD and consume a single byte.
    fn decode(&self) -> Option<(char, usize)> {
        let lead = self.byte_at(self.fragment, self.offset)?;
        let width = match lead {
            0x00..=0x7F => return Some((lead as char, 1)),
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Some((char::REPLACEMENT_CHARACTER, 1)),
        };

        let mut buf = [0u8; 4];
        let mut fragment = self.fragment;
        let mut offset = self.offset;
        for slot in buf.iter_mut().take(width) {
            while fragment < self.fragments.len() && offset >= self.fragments[fragment].len() {
                fragment += 1;
                offset = 0;
            }
            let Some(byte) = self.byte_at(fragment, offset) else {
                return Some((char::REPLACEMENT_CHARACTER, 1));
            };
            *slot = byte;
            offset += 1;
        }

        match std::str::from_utf8(&buf[..width]) {
            Ok(s) => s.chars().next().map(|ch| (ch, width)),
            Err(_) => Some((char::REPLACEMENT_CHARACTER, 1)),
        }
    }
}

impl Iterator for UnicodeIterator<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let (ch, width) = self.decode()?;
        self.advance_bytes(width);
        Some(ch)
    }
}

impl PartialEq for UnicodeIterator<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.fragment == other.fragment && self.offset == other.offset
    }
}

impl Eq for UnicodeIterator<'_> {}

impl PartialOrd for UnicodeIterator<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UnicodeIterator<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.fragment, self.offset).cmp(&(other.fragment, other.offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_across_fragments() {
        let fragments: [&[u8]; 3] = [b"ab", b"", b"c"];
        let chars: String = UnicodeIterator::new(&fragments).collect();
        assert_eq!(chars, "abc");
    }

    #[test]
    fn test_codepoint_split_across_fragments() {
        let text = "x你👋y".as_bytes();
        // Split inside both multi-byte sequences.
        let fragments: [&[u8]; 4] = [&text[..2], &text[2..5], &text[5..6], &text[6..]];
        let chars: Vec<char> = UnicodeIterator::new(&fragments).collect();
        assert_eq!(chars, vec!['x', '你', '👋', 'y']);
    }

    #[test]
    fn test_malformed_bytes_decode_to_replacement() {
        let fragments: [&[u8]; 1] = [&[b'a', 0xFF, 0xE4, b'b']];
        let chars: Vec<char> = UnicodeIterator::new(&fragments).collect();
        assert_eq!(
            chars,
            vec![
                'a',
                char::REPLACEMENT_CHARACTER,
                char::REPLACEMENT_CHARACTER,
                'b'
            ]
        );
    }

    #[test]
    fn test_ordering_by_location() {
        let fragments: [&[u8]; 2] = [b"ab", b"cd"];
        let start = UnicodeIterator::new(&fragments);
        let mut later = start;
        later.next();
        later.next();
        assert!(start < later);
        assert_eq!(later.byte_index(), 2);
        assert_eq!(later.peek(), Some('c'));
        assert!(later < UnicodeIterator::end(&fragments));
    }

    #[test]
    fn test_fragments_until_preserves_raw_bytes() {
        let text = "héllo wörld".as_bytes();
        let fragments: [&[u8]; 2] = [&text[..2], &text[2..]];
        let mut start = UnicodeIterator::new(&fragments);
        start.next(); // skip 'h'
        let mut end = start;
        for _ in 0..4 {
            end.next();
        }
        let raw: Vec<u8> = start.fragments_until(&end).concat();
        assert_eq!(std::str::from_utf8(&raw).unwrap(), "éllo");

        assert!(end.fragments_until(&start).is_empty());
    }
}
