//! Scope-depth indentation.

use crate::position::Position;
use crate::predicates::{
    block_interior, body_of, case_items, construct_of, construct_of_block, leading_range,
    starts_line,
};
use crate::symbols::Kind;
use crate::traverser::{ChildVisit, TraverseContext, Traverser};
use cfmt_core_style::{Construct, IndentationMode};
use tree_sitter::Node;

/// Re-indents every line from a running scope depth.
///
/// The depth rises and falls around braces, block interiors, unbraced loop and `if` bodies, and
/// the statements of a `case` label. The first token of each line then gets exactly
/// `depth` indentation units in front of it, plus one more unit when the line continues a
/// statement begun on an earlier line. Only the whitespace between the start of the line and
/// that token is ever rewritten.
#[derive(Debug, Default, Clone)]
pub struct IndentationTraverser {
    depth: usize,
}

impl IndentationTraverser {
    /// A new pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Depth changes around `visit.child()`: `(on entry, on exit)`.
    fn levels(visit: &ChildVisit<'_, '_>, ctx: &TraverseContext<'_>) -> (usize, usize) {
        let symbols = ctx.symbols();
        let parent = visit.parent;
        let child = visit.child();
        let mut enter = 0;
        let mut exit = 0;

        if let Some(construct) = construct_of_block(symbols, parent) {
            if let Some((open, close)) = block_interior(symbols, visit.siblings) {
                if close > open + 1 {
                    let mode = ctx.style().block(construct).indentation;
                    if visit.index == open || visit.index == close {
                        enter += mode.brace_levels();
                        exit += mode.brace_levels();
                    }
                    if visit.index == open + 1 {
                        enter += mode.body_levels();
                    }
                    if visit.index == close - 1 {
                        exit += mode.body_levels();
                    }
                }
            }
        }

        let Some(construct) = construct_of(symbols, parent) else {
            return (enter, exit);
        };
        let mode = ctx.style().block(construct).indentation;
        if mode == IndentationMode::None {
            return (enter, exit);
        }
        match construct {
            Construct::Case => {
                let items = case_items(symbols, parent);
                let statements = items.iter().filter(|i| !ctx.is(**i, Kind::Comment)).count();
                let sole_block = statements == 1
                    && items.iter().any(|i| ctx.is(*i, Kind::Compound));
                if !sole_block {
                    if items.first() == Some(&child) {
                        enter += 1;
                    }
                    if items.last() == Some(&child) {
                        exit += 1;
                    }
                }
            }
            Construct::Switch => {}
            _ => {
                let unbraced = body_of(symbols, parent).filter(|body| {
                    *body == child
                        && !ctx.is(*body, Kind::Compound)
                        && !(construct == Construct::Else && ctx.is(*body, Kind::If))
                });
                if unbraced.is_some() {
                    enter += 1;
                    exit += 1;
                }
            }
        }
        (enter, exit)
    }
}

impl Traverser for IndentationTraverser {
    fn name(&self) -> &'static str {
        "indentation"
    }

    fn reset(&mut self, _ctx: &TraverseContext<'_>) {
        self.depth = 0;
    }

    fn pre_visit_child<'t>(&mut self, visit: &ChildVisit<'_, 't>, ctx: &mut TraverseContext<'t>) {
        self.depth += Self::levels(visit, ctx).0;
    }

    fn post_visit_child<'t>(&mut self, visit: &ChildVisit<'_, 't>, ctx: &mut TraverseContext<'t>) {
        self.depth -= Self::levels(visit, ctx).1;
    }

    fn visit_leaf<'t>(&mut self, node: Node<'t>, ctx: &mut TraverseContext<'t>) {
        if node.start_byte() == node.end_byte() {
            return;
        }
        if !starts_line(ctx, node) {
            return;
        }
        if ctx.node_text(node).starts_with('#') || inside_literal(ctx, node) {
            return;
        }

        let depth = self.depth + usize::from(is_continuation(ctx, node));
        let wanted = ctx.style().indentation.render(depth);
        let range = leading_range(ctx, Position::start_of(node));
        ctx.replace(range, &wanted);
    }
}

/// Returns `true` if `node` sits inside a statement (or header) that started before it.
///
/// Walks up to the nearest scope-like ancestor and compares against the start of the child
/// that leads there.
fn is_continuation(ctx: &TraverseContext<'_>, node: Node<'_>) -> bool {
    let symbols = ctx.symbols();
    let mut current = node;
    while let Some(parent) = current.parent() {
        let scope = construct_of_block(symbols, parent).is_some()
            || construct_of(symbols, parent).is_some()
            || matches!(
                ctx.kind(parent),
                Some(Kind::TranslationUnit | Kind::PreprocBlock | Kind::TemplateDeclaration)
            );
        if scope {
            return current.start_byte() != node.start_byte();
        }
        current = parent;
    }
    false
}

/// Returns `true` for a token that continues a literal opened on an earlier line.
fn inside_literal(ctx: &TraverseContext<'_>, node: Node<'_>) -> bool {
    let mut current = node;
    while let Some(parent) = current.parent() {
        if matches!(
            ctx.kind(parent),
            Some(Kind::StringLiteral | Kind::RawStringLiteral | Kind::CharLiteral)
        ) {
            return parent.start_byte() != node.start_byte();
        }
        current = parent;
    }
    false
}
