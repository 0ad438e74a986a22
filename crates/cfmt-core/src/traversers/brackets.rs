//! Brace existence and newline placement for control-flow bodies.

use crate::position::{Position, Range};
use crate::predicates::{
    body_of, case_items, children_of, construct_of, is_line_comment, is_whitespace,
    rest_of_line_is_blank,
};
use crate::symbols::Kind;
use crate::traverser::{ChildVisit, TraverseContext, Traverser};
use cfmt_core_style::{BlockStyle, BraceExistence, BracePlacement, Construct};
use tree_sitter::Node;

/// Adds, removes, or re-places the braces around `if`, `else`, loop, `switch` and `case`
/// bodies.
///
/// Each construct is handled once, when its first child is visited. A construct whose policy
/// is [`BraceExistence::Ignore`] is never touched.
#[derive(Debug, Default, Clone, Copy)]
pub struct BracketExistenceTraverser;

impl BracketExistenceTraverser {
    /// A new pass.
    pub fn new() -> Self {
        Self
    }
}

impl Traverser for BracketExistenceTraverser {
    fn name(&self) -> &'static str {
        "bracket-existence"
    }

    fn pre_visit_child<'t>(&mut self, visit: &ChildVisit<'_, 't>, ctx: &mut TraverseContext<'t>) {
        if !visit.is_first() {
            return;
        }
        let node = visit.parent;
        let Some(construct) = construct_of(ctx.symbols(), node) else {
            return;
        };
        let style = *ctx.style().block(construct);
        if style.existence == BraceExistence::Ignore || ctx.is_unformattable(Range::of(node)) {
            return;
        }

        match construct {
            Construct::Case => case_body(ctx, node, visit.siblings, &style),
            Construct::Switch => {
                if let Some(body) = node.child_by_field_name("body") {
                    place_braces(ctx, node, visit.siblings, body, style.placement);
                }
            }
            _ => {
                let Some(body) = body_of(ctx.symbols(), node) else {
                    return;
                };
                if construct == Construct::Else && ctx.is(body, Kind::If) {
                    return;
                }
                if ctx.is(body, Kind::Compound) {
                    braced_body(ctx, node, visit.siblings, body, &style);
                } else if style.existence == BraceExistence::Require {
                    if let Some(prev) = body.prev_sibling() {
                        wrap(ctx, node, prev, body, body, style.placement);
                    }
                }
            }
        }
    }
}

fn case_body<'t>(
    ctx: &mut TraverseContext<'t>,
    case: Node<'t>,
    siblings: &[Node<'t>],
    style: &BlockStyle,
) {
    let items = case_items(ctx.symbols(), case);
    let statements: Vec<Node<'t>> = items
        .iter()
        .copied()
        .filter(|item| !ctx.is(*item, Kind::Comment))
        .collect();
    let (Some(&first), Some(&last)) = (statements.first(), statements.last()) else {
        return;
    };

    if statements.len() == 1 && ctx.is(first, Kind::Compound) {
        braced_body(ctx, case, siblings, first, style);
        return;
    }
    if style.existence != BraceExistence::Require
        || statements.iter().any(|s| ctx.is(*s, Kind::Compound))
    {
        return;
    }
    if let Some(prev) = first.prev_sibling() {
        wrap(ctx, case, prev, first, last, style.placement);
    }
}

fn braced_body<'t>(
    ctx: &mut TraverseContext<'t>,
    construct: Node<'t>,
    siblings: &[Node<'t>],
    compound: Node<'t>,
    style: &BlockStyle,
) {
    if style.existence == BraceExistence::Remove && removable(ctx, construct, compound) {
        remove_braces(ctx, compound);
    } else {
        place_braces(ctx, construct, siblings, compound, style.placement);
    }
}

/// A body can lose its braces when it holds exactly one non-declaration statement and no
/// comments, and removing them cannot rebind a following `else`.
fn removable(ctx: &TraverseContext<'_>, construct: Node<'_>, compound: Node<'_>) -> bool {
    let children = children_of(compound);
    let [open, statement, close] = children.as_slice() else {
        return false;
    };
    if !ctx.is(*open, Kind::OpenBrace) || !ctx.is(*close, Kind::CloseBrace) {
        return false;
    }
    if !statement.is_named() || ctx.is(*statement, Kind::Comment) {
        return false;
    }
    if ctx.is(*statement, Kind::Declaration) {
        return false;
    }
    let has_else = ctx.is(construct, Kind::If) && construct.child_by_field_name("alternative").is_some();
    !(has_else && ends_in_open_if(ctx, *statement))
}

/// Returns `true` if `statement` ends in an `if` without an `else` once this pass is applied,
/// so that an `else` placed right after it would bind to that inner `if`. Blocks that lose
/// their braces in the same pass are looked through.
fn ends_in_open_if(ctx: &TraverseContext<'_>, statement: Node<'_>) -> bool {
    let symbols = ctx.symbols();
    let mut node = statement;
    loop {
        let next = match ctx.kind(node) {
            Some(Kind::If) => match node.child_by_field_name("alternative") {
                None => return true,
                Some(alternative) => body_of(symbols, alternative),
            },
            Some(Kind::While | Kind::For | Kind::ForRange) => body_of(symbols, node),
            Some(Kind::Compound) => unbraced_statement(ctx, node),
            _ => None,
        };
        match next {
            Some(body) => node = body,
            None => return false,
        }
    }
}

/// The single statement of `compound` when this pass removes its braces.
fn unbraced_statement<'t>(ctx: &TraverseContext<'_>, compound: Node<'t>) -> Option<Node<'t>> {
    let construct = compound.parent()?;
    let kind = construct_of(ctx.symbols(), construct)?;
    if ctx.style().block(kind).existence != BraceExistence::Remove
        || body_of(ctx.symbols(), construct) != Some(compound)
        || ctx.is_unformattable(Range::of(construct))
        || !removable(ctx, construct, compound)
    {
        return None;
    }
    children_of(compound).get(1).copied()
}

fn remove_braces<'t>(ctx: &mut TraverseContext<'t>, compound: Node<'t>) {
    let children = children_of(compound);
    let [open, statement, close] = children.as_slice() else {
        return;
    };

    match compound.prev_sibling() {
        Some(prev) if !is_line_comment(ctx, prev) => {
            ctx.delete(Range::new(Position::end_of(prev), Position::end_of(*open)));
        }
        _ => {
            ctx.delete(with_leading_space(ctx, *open));
        }
    }

    let close_end = Position::end_of(*close);
    if rest_of_line_is_blank(ctx, close_end.byte_offset) {
        ctx.delete(Range::new(Position::end_of(*statement), close_end));
    } else {
        ctx.delete(with_leading_space(ctx, *close));
    }
}

/// The range of `token` widened over the spaces and tabs right before it.
fn with_leading_space(ctx: &TraverseContext<'_>, token: Node<'_>) -> Range {
    let start = Position::start_of(token);
    let line = &ctx.source()[start.line_start()..start.byte_offset];
    let keep = line.trim_end_matches([' ', '\t']).len();
    let from = if keep == 0 {
        start
    } else {
        ctx.position_at(start.line_start() + keep)
    };
    Range::new(from, Position::end_of(token))
}

/// Wrap the statements `first..=last` of `construct` in braces.
fn wrap<'t>(
    ctx: &mut TraverseContext<'t>,
    construct: Node<'t>,
    prev: Node<'t>,
    first: Node<'t>,
    last: Node<'t>,
    placement: BracePlacement,
) {
    let opening_after = |gap: &str| match placement.opening.newline_after() {
        Some(true) => "\n".to_string(),
        Some(false) => " ".to_string(),
        None => gap.to_string(),
    };

    let gap = Range::between(prev, first);
    let gap_text = ctx.text(gap);
    if is_line_comment(ctx, prev) || !is_whitespace(gap_text) {
        let after = opening_after(" ");
        ctx.insert(Position::start_of(first), format!("{{{after}"));
    } else {
        let before = if placement.opening.newline_before() == Some(true) {
            "\n"
        } else {
            " "
        };
        let after = opening_after(gap_text);
        ctx.replace(gap, &format!("{before}{{{after}"));
    }

    let before = if placement.closing.newline_before() == Some(true) {
        "\n"
    } else {
        " "
    };
    let closing = format!("{before}}}");
    let end = Position::end_of(last);

    match following(ctx, construct, last) {
        Some((next, inside)) if !ctx.is(next, Kind::Comment) => {
            let gap = Range::new(end, Position::start_of(next));
            let gap_text = ctx.text(gap);
            if !is_whitespace(gap_text) {
                ctx.insert(end, closing);
                return;
            }
            let after = match placement.closing.newline_after() {
                Some(true) => "\n",
                Some(false) if inside => " ",
                _ => gap_text,
            };
            ctx.replace(gap, &format!("{closing}{after}"));
        }
        _ => {
            ctx.insert(end, closing);
        }
    }
}

/// The node after `last` whose gap the closing brace of `construct` may rewrite, and whether it
/// belongs to `construct` itself (an `else` or the `while` of a do-loop).
///
/// Returns `None` when an enclosing construct will insert its own closing brace at the same
/// spot; that construct handles the gap instead.
fn following<'t>(
    ctx: &TraverseContext<'t>,
    construct: Node<'t>,
    last: Node<'t>,
) -> Option<(Node<'t>, bool)> {
    if let Some(next) = last.next_sibling() {
        return Some((next, true));
    }
    let mut node = construct;
    loop {
        if let Some(next) = node.next_sibling() {
            return Some((next, false));
        }
        let parent = node.parent()?;
        if will_wrap(ctx, parent, node) {
            return None;
        }
        node = parent;
    }
}

/// Returns `true` if `parent` wraps its unbraced body `child` in braces during this pass.
fn will_wrap(ctx: &TraverseContext<'_>, parent: Node<'_>, child: Node<'_>) -> bool {
    let symbols = ctx.symbols();
    let Some(construct) = construct_of(symbols, parent) else {
        return false;
    };
    if ctx.is(child, Kind::Compound) {
        return false;
    }
    if ctx.style().block(construct).existence != BraceExistence::Require {
        return false;
    }
    match construct {
        Construct::Switch => false,
        Construct::Case => {
            let items = case_items(symbols, parent);
            items.contains(&child)
                && !items.iter().any(|item| ctx.is(*item, Kind::Compound))
        }
        Construct::Else if ctx.is(child, Kind::If) => false,
        _ => body_of(symbols, parent) == Some(child),
    }
}

/// Adjust the newlines around the existing braces of `compound`.
fn place_braces<'t>(
    ctx: &mut TraverseContext<'t>,
    construct: Node<'t>,
    siblings: &[Node<'t>],
    compound: Node<'t>,
    placement: BracePlacement,
) {
    let children = children_of(compound);
    let (Some(&open), Some(&close)) = (children.first(), children.last()) else {
        return;
    };
    if children.len() < 2 || !ctx.is(open, Kind::OpenBrace) || !ctx.is(close, Kind::CloseBrace) {
        return;
    }

    if let Some(prev) = compound.prev_sibling() {
        adjust_gap(ctx, prev, open, placement.opening.newline_before());
    }
    let inner = &children[1..children.len() - 1];
    if let (Some(&first), Some(&last)) = (inner.first(), inner.last()) {
        adjust_gap(ctx, open, first, placement.opening.newline_after());
        adjust_gap(ctx, last, close, placement.closing.newline_before());
    }

    let index = siblings.iter().position(|s| *s == compound);
    let inside = index.and_then(|i| siblings.get(i + 1)).copied();
    match (inside, construct.next_sibling()) {
        (Some(next), _) => adjust_gap(ctx, close, next, placement.closing.newline_after()),
        (None, Some(next)) => {
            if placement.closing.newline_after() == Some(true) {
                adjust_gap(ctx, close, next, Some(true));
            }
        }
        (None, None) => {}
    }
}

/// Insert or remove the line break between `left` and `right`. Gaps holding anything but
/// whitespace are left alone, and nothing is ever joined onto a `//` comment.
fn adjust_gap<'t>(ctx: &mut TraverseContext<'t>, left: Node<'t>, right: Node<'t>, want: Option<bool>) {
    let Some(want) = want else {
        return;
    };
    if is_line_comment(ctx, left) {
        return;
    }
    let gap = Range::between(left, right);
    let text = ctx.text(gap);
    if !is_whitespace(text) {
        return;
    }
    let has_newline = text.contains('\n');
    if want && !has_newline {
        if ctx.is(right, Kind::Comment) {
            return;
        }
        ctx.replace(gap, "\n");
    } else if !want && has_newline {
        ctx.replace(gap, " ");
    }
}
