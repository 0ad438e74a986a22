//! The formatting passes.

mod alignment;
mod brackets;
mod comment_alignment;
mod indentation;
mod reflow;

pub use alignment::{
    AlignmentRule, AlignmentTraverser, AssignmentAlignmentTraverser, Assignments,
    BitfieldAlignmentTraverser, Bitfields, DeclarationAlignmentTraverser, Declarations,
    InitializerListAlignmentTraverser, InitializerLists, Member,
};
pub use brackets::BracketExistenceTraverser;
pub use comment_alignment::CommentAlignmentTraverser;
pub use indentation::IndentationTraverser;
pub use reflow::{CommentReflowTraverser, TextReflower};
