//! The pass driver.

use crate::document::Document;
use crate::edit::sort_for_application;
use crate::error::FormatError;
use crate::symbols::SymbolRegistry;
use crate::traverser::{Traverser, traverse};
use crate::traversers::{
    AssignmentAlignmentTraverser, BitfieldAlignmentTraverser, BracketExistenceTraverser,
    CommentAlignmentTraverser, CommentReflowTraverser, DeclarationAlignmentTraverser,
    IndentationTraverser, InitializerListAlignmentTraverser,
};
use cfmt_core_style::Style;
use tree_sitter::Language;

/// Runs an ordered list of passes over a document.
///
/// Each pass sees the fully applied, reparsed result of the one before it. A run either
/// completes or fails as a whole: [`Formatter::format`] never returns partially formatted
/// text.
pub struct Formatter {
    style: Style,
    language: Language,
    symbols: SymbolRegistry,
    passes: Vec<Box<dyn Traverser>>,
}

impl Formatter {
    /// A formatter for C/C++ with the standard pass order.
    pub fn new(style: Style) -> Self {
        let language: Language = tree_sitter_cpp::LANGUAGE.into();
        let symbols = SymbolRegistry::cpp(&language);
        Self::with_language(style, language, symbols)
    }

    /// A formatter for another grammar. `symbols` must be resolved against `language`.
    pub fn with_language(style: Style, language: Language, symbols: SymbolRegistry) -> Self {
        Self {
            style,
            language,
            symbols,
            passes: Self::standard_passes(),
        }
    }

    /// Replace the pass list.
    pub fn with_passes(mut self, passes: Vec<Box<dyn Traverser>>) -> Self {
        self.passes = passes;
        self
    }

    /// BracketExistence, Indentation, CommentReflow, then the alignment passes with trailing
    /// comments last.
    pub fn standard_passes() -> Vec<Box<dyn Traverser>> {
        vec![
            Box::new(BracketExistenceTraverser::new()),
            Box::new(IndentationTraverser::new()),
            Box::new(CommentReflowTraverser::new()),
            Box::new(DeclarationAlignmentTraverser::new()),
            Box::new(AssignmentAlignmentTraverser::new()),
            Box::new(BitfieldAlignmentTraverser::new()),
            Box::new(InitializerListAlignmentTraverser::new()),
            Box::new(CommentAlignmentTraverser::new()),
        ]
    }

    /// The active style.
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Names of the configured passes, in run order.
    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    /// Format `text` and return the result.
    pub fn format(&mut self, text: &str) -> Result<String, FormatError> {
        let mut document = Document::new(text, &self.language)?;
        self.format_document(&mut document)?;
        Ok(document.to_string())
    }

    /// Run every pass over `document`.
    ///
    /// Fails up front with [`FormatError::Syntax`] when the document does not parse cleanly.
    /// When a pass breaks the syntax tree the error is returned and the document is left with
    /// that pass applied; [`Formatter::format`] discards it.
    pub fn format_document(&mut self, document: &mut Document) -> Result<(), FormatError> {
        if let Some(at) = document.first_syntax_error() {
            log::warn!("syntax error at {at}; leaving the document untouched");
            return Err(FormatError::Syntax {
                row: at.row + 1,
                column: at.column + 1,
            });
        }

        for pass in &mut self.passes {
            let mut edits = traverse(pass.as_mut(), document, &self.style, &self.symbols);
            log::debug!("pass {}: {} edits", pass.name(), edits.len());
            if edits.is_empty() {
                continue;
            }
            sort_for_application(&mut edits);
            document.apply_edits(&edits)?;

            if let Some(at) = document.first_syntax_error() {
                log::warn!("pass {} broke the syntax tree at {at}", pass.name());
                return Err(FormatError::Reparse {
                    pass: pass.name(),
                    row: at.row + 1,
                    column: at.column + 1,
                });
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Formatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Formatter")
            .field("style", &self.style)
            .field("passes", &self.pass_names())
            .finish()
    }
}
