#![warn(missing_docs)]
//! cfmt core - structural C/C++ source formatting
//!
//! # Overview
//!
//! `cfmt-core` rewrites parsed C/C++ source according to a declarative [`Style`]. It never
//! pretty-prints from scratch: every pass computes a small list of [`Edit`]s against the current
//! text, and everything those edits do not touch stays byte-identical.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Formatter (ordered passes)                 │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Passes: braces, indentation, reflow,       │
//! │  alignment, trailing comments               │  ← Edit generation
//! ├─────────────────────────────────────────────┤
//! │  Traverser engine + SymbolRegistry          │  ← CST walk
//! ├─────────────────────────────────────────────┤
//! │  Document (piece table + tree-sitter CST)   │  ← Text storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use cfmt_core::{Formatter, Style};
//!
//! let mut formatter = Formatter::new(Style::default());
//! let formatted = formatter.format("int main() {\nreturn 0;\n}\n").unwrap();
//! assert_eq!(formatted, "int main() {\n    return 0;\n}\n");
//! ```
//!
//! # Module Description
//!
//! - [`position`] - points and byte ranges
//! - [`unicode`] - codepoint iteration across fragments
//! - [`slice`] - read-only document views
//! - [`document`] - piece table with an attached syntax tree
//! - [`edit`] - edits and their application order
//! - [`traverser`] - the CST walker every pass plugs into
//! - [`traversers`] - the formatting passes
//! - [`formatter`] - the pass driver
//!
//! # Unformattable regions
//!
//! Lines between a `// cfmt off` and a `// cfmt on` comment line (markers configurable in
//! [`Style::unformattable`]) are passed through unchanged by every pass.

pub mod document;
pub mod edit;
mod error;
pub mod formatter;
pub mod position;
mod predicates;
pub mod slice;
pub mod symbols;
pub mod traverser;
pub mod traversers;
pub mod unicode;

pub use cfmt_core_style::Style;
pub use document::{BufferKind, Document, Fragment};
pub use edit::{Edit, is_application_ordered, sort_for_application};
pub use error::FormatError;
pub use formatter::Formatter;
pub use position::{Position, Range};
pub use slice::DocumentSlice;
pub use symbols::{Kind, SymbolRegistry};
pub use traverser::{ChildVisit, TraverseContext, Traverser, traverse};
pub use traversers::{
    BracketExistenceTraverser, CommentAlignmentTraverser, CommentReflowTraverser,
    IndentationTraverser, TextReflower,
};
pub use unicode::UnicodeIterator;
