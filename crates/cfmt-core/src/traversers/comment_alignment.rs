//! Trailing comment spacing.

use crate::position::{Position, Range};
use crate::predicates::{display_column, is_horizontal_space, rest_of_line_is_blank};
use crate::symbols::Kind;
use crate::traverser::{ChildVisit, TraverseContext, Traverser};
use cfmt_core_style::TrailingCommentAlignment;
use tree_sitter::Node;

/// A comment that shares its line with the token before it.
#[derive(Debug, Clone, Copy)]
struct Trailing {
    row: usize,
    /// Display column where the preceding token ends.
    code_end: usize,
    /// Whitespace between that token and the comment.
    gap: Range,
}

/// Left-justifies trailing comments, or aligns runs of them on consecutive lines.
///
/// A comment is trailing when a token precedes it on its line, nothing follows it, and it fits
/// on a single line. Comments that start their own line are never moved.
#[derive(Debug, Default, Clone)]
pub struct CommentAlignmentTraverser {
    previous: Option<Position>,
    group: Vec<Trailing>,
}

impl CommentAlignmentTraverser {
    /// A new pass.
    pub fn new() -> Self {
        Self::default()
    }

    fn flush(&mut self, ctx: &mut TraverseContext<'_>) {
        let group = std::mem::take(&mut self.group);
        if group.len() < 2 {
            return;
        }
        let Some(widest) = group.iter().map(|t| t.code_end).max() else {
            return;
        };
        for trailing in group {
            let spaces = " ".repeat(widest + 1 - trailing.code_end);
            ctx.replace(trailing.gap, &spaces);
        }
    }
}

impl Traverser for CommentAlignmentTraverser {
    fn name(&self) -> &'static str {
        "comment-alignment"
    }

    fn reset(&mut self, _ctx: &TraverseContext<'_>) {
        self.previous = None;
        self.group.clear();
    }

    fn visit_leaf<'t>(&mut self, node: Node<'t>, ctx: &mut TraverseContext<'t>) {
        if node.start_byte() == node.end_byte() {
            return;
        }
        let mode = ctx.style().alignment.trailing_comments;
        let previous = self.previous.replace(Position::end_of(node));
        if mode == TrailingCommentAlignment::Ignore || !ctx.is(node, Kind::Comment) {
            return;
        }

        let start = Position::start_of(node);
        let end = Position::end_of(node);
        let trailing = previous.and_then(|code_end| {
            let gap = Range::new(code_end, start);
            let is_trailing = code_end.row == start.row
                && end.row == start.row
                && is_horizontal_space(ctx.text(gap))
                && rest_of_line_is_blank(ctx, end.byte_offset)
                && !ctx.is_unformattable(Range::of(node));
            is_trailing.then(|| Trailing {
                row: start.row,
                code_end: display_column(ctx, code_end),
                gap,
            })
        });

        match (mode, trailing) {
            (TrailingCommentAlignment::LeftJustify, Some(trailing)) => {
                ctx.replace(trailing.gap, " ");
            }
            (TrailingCommentAlignment::AlignConsecutive, Some(trailing)) => {
                if self.group.last().is_some_and(|last| last.row + 1 != trailing.row) {
                    self.flush(ctx);
                }
                self.group.push(trailing);
            }
            (TrailingCommentAlignment::AlignConsecutive, None) => self.flush(ctx),
            _ => {}
        }
    }

    fn post_visit_child<'t>(&mut self, visit: &ChildVisit<'_, 't>, ctx: &mut TraverseContext<'t>) {
        if visit.parent.parent().is_none() && visit.is_last() {
            self.flush(ctx);
        }
    }
}
