use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors produced while parsing or formatting a document.
pub enum FormatError {
    #[error("tree-sitter language error: {0}")]
    /// The grammar could not be loaded into the parser.
    Language(String),

    #[error("the parser produced no syntax tree")]
    /// The parser returned no tree at all.
    ParseFailed,

    #[error("syntax error at {row}:{column}; nothing was formatted")]
    /// The input does not parse cleanly. No pass was run.
    Syntax {
        /// One-based line of the first error node.
        row: usize,
        /// One-based byte column of the first error node.
        column: usize,
    },

    #[error("pass '{pass}' produced text that no longer parses (at {row}:{column})")]
    /// A pass produced edits that broke the syntax tree. The run was abandoned.
    Reparse {
        /// Name of the offending pass.
        pass: &'static str,
        /// One-based line of the first error node.
        row: usize,
        /// One-based byte column of the first error node.
        column: usize,
    },
}
