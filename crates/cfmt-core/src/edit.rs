//! Text edits produced by a traversal pass.
//!
//! Every pass collects its edits against the text it traversed. [`sort_for_application`]
//! orders a batch so that applying the edits one after another never shifts the coordinates
//! of an edit that has not been applied yet:
//!
//! - descending start byte offset
//! - on equal offsets, [`Edit::Delete`] before [`Edit::Insert`], so an insert lands in front of
//!   the deleted span instead of being swallowed by it
//! - remaining ties keep collection order (the sort is stable)
//!
//! A consequence of the last rule: several inserts at one offset end up in the document in the
//! *reverse* of their collection order. Passes that emit multi-part replacements rely on this.

use crate::position::{Position, Range};
use std::cmp::Ordering;
use std::fmt;

/// A single document edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Remove the bytes in `range`.
    Delete {
        /// The range to remove.
        range: Range,
    },
    /// Insert `text` at `position`.
    Insert {
        /// Where the text goes.
        position: Position,
        /// The inserted text.
        text: String,
    },
}

impl Edit {
    /// A deletion.
    pub fn delete(range: Range) -> Self {
        Self::Delete { range }
    }

    /// An insertion.
    pub fn insert(position: Position, text: impl Into<String>) -> Self {
        Self::Insert {
            position,
            text: text.into(),
        }
    }

    /// Byte offset at which the edit starts.
    pub fn offset(&self) -> usize {
        match self {
            Self::Delete { range } => range.start.byte_offset,
            Self::Insert { position, .. } => position.byte_offset,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Delete { .. } => 0,
            Self::Insert { .. } => 1,
        }
    }

    /// Comparator for application order: `Less` means `self` must be applied first.
    pub fn application_order(&self, other: &Self) -> Ordering {
        other
            .offset()
            .cmp(&self.offset())
            .then_with(|| self.rank().cmp(&other.rank()))
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delete { range } => write!(f, "delete {range}"),
            Self::Insert { position, text } => write!(f, "insert {text:?} at {position}"),
        }
    }
}

/// Stable-sort a batch into application order.
pub fn sort_for_application(edits: &mut [Edit]) {
    edits.sort_by(Edit::application_order);
}

/// Returns `true` if the batch is already in application order.
pub fn is_application_ordered(edits: &[Edit]) -> bool {
    edits
        .windows(2)
        .all(|pair| pair[0].application_order(&pair[1]) != Ordering::Greater)
}
