//! Shared node and text queries used by several passes.

use crate::position::{Position, Range};
use crate::symbols::{Kind, SymbolRegistry};
use crate::traverser::TraverseContext;
use cfmt_core_style::Construct;
use tree_sitter::Node;
use unicode_width::UnicodeWidthChar;

/// All children of `node`, in order.
pub fn children_of<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Named children of `node`, comments included.
pub fn named_children_of<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Returns `true` if `text` holds only spaces, tabs, and line breaks.
pub fn is_whitespace(text: &str) -> bool {
    text.bytes().all(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
}

/// Returns `true` if `text` holds only spaces and tabs.
pub fn is_horizontal_space(text: &str) -> bool {
    text.bytes().all(|b| matches!(b, b' ' | b'\t'))
}

/// Returns `true` if `node` is a `//` comment.
pub fn is_line_comment(ctx: &TraverseContext<'_>, node: Node<'_>) -> bool {
    ctx.is(node, Kind::Comment) && ctx.node_text(node).starts_with("//")
}

/// Returns `true` if only spaces and tabs precede `node` on its line.
pub fn starts_line(ctx: &TraverseContext<'_>, node: Node<'_>) -> bool {
    let start = Position::start_of(node);
    is_horizontal_space(&ctx.source()[start.line_start()..start.byte_offset])
}

/// Returns `true` if only whitespace follows `offset` up to the end of its line.
pub fn rest_of_line_is_blank(ctx: &TraverseContext<'_>, offset: usize) -> bool {
    let rest = &ctx.source()[offset..];
    let line = rest.split('\n').next().unwrap_or_default();
    is_whitespace(line)
}

/// The range from the start of `position`'s line up to `position`.
pub fn leading_range(ctx: &TraverseContext<'_>, position: Position) -> Range {
    Range::new(ctx.position_at(position.line_start()), position)
}

/// Display column of `position`, counting wide characters as two cells and expanding tabs to
/// the next multiple of `tab_width`.
pub fn display_column(ctx: &TraverseContext<'_>, position: Position) -> usize {
    let line = &ctx.source()[position.line_start()..position.byte_offset];
    text_width(line, ctx.style().indentation.tab_width)
}

/// Display width of a single-line `text` starting at column zero.
pub fn text_width(text: &str, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    text.chars().fold(0, |column, ch| {
        if ch == '\t' {
            column + (tab_width - column % tab_width)
        } else {
            column + ch.width().unwrap_or(0)
        }
    })
}

/// The innermost identifier-like node of a declarator.
///
/// Walks through pointer, array, function, reference, attributed, parenthesized and init
/// declarators. Every step moves to a strictly smaller node, so the walk terminates.
pub fn innermost_identifier<'t>(symbols: &SymbolRegistry, declarator: Node<'t>) -> Option<Node<'t>> {
    let mut node = declarator;
    loop {
        match symbols.kind(node)? {
            Kind::Identifier
            | Kind::FieldIdentifier
            | Kind::QualifiedIdentifier
            | Kind::DestructorName
            | Kind::OperatorName => return Some(node),
            Kind::PointerDeclarator
            | Kind::ArrayDeclarator
            | Kind::FunctionDeclarator
            | Kind::InitDeclarator => {
                node = node.child_by_field_name("declarator")?;
            }
            Kind::AttributedDeclarator
            | Kind::ParenthesizedDeclarator
            | Kind::ReferenceDeclarator => {
                node = named_children_of(node).into_iter().next()?;
            }
            _ => return None,
        }
    }
}

/// The body statement of a brace-controlled construct.
pub fn body_of<'t>(symbols: &SymbolRegistry, construct: Node<'t>) -> Option<Node<'t>> {
    match symbols.kind(construct)? {
        Kind::If => construct.child_by_field_name("consequence"),
        Kind::While | Kind::DoWhile | Kind::For | Kind::ForRange => {
            construct.child_by_field_name("body")
        }
        Kind::Else => named_children_of(construct)
            .into_iter()
            .rfind(|child| !symbols.is(*child, Kind::Comment)),
        _ => None,
    }
}

/// The style construct owning a brace-delimited block, judged by the block's parent.
pub fn construct_of_block(symbols: &SymbolRegistry, block: Node<'_>) -> Option<Construct> {
    let parent_kind = block.parent().and_then(|parent| symbols.kind(parent));
    let construct = match symbols.kind(block)? {
        Kind::Compound => match parent_kind {
            Some(Kind::If) => Construct::If,
            Some(Kind::Else) => Construct::Else,
            Some(Kind::While) => Construct::While,
            Some(Kind::DoWhile) => Construct::DoWhile,
            Some(Kind::For | Kind::ForRange) => Construct::For,
            Some(Kind::Switch) => Construct::Switch,
            Some(Kind::Case) => Construct::Case,
            Some(Kind::FunctionDefinition) => Construct::Function,
            Some(Kind::Lambda) => Construct::Lambda,
            Some(Kind::Try) => Construct::Try,
            Some(Kind::Catch) => Construct::Catch,
            _ => Construct::Block,
        },
        Kind::DeclarationList => match parent_kind {
            Some(Kind::LinkageSpecification) => Construct::Extern,
            Some(Kind::NamespaceDefinition) => Construct::Namespace,
            _ => Construct::Block,
        },
        Kind::FieldDeclarationList => match parent_kind {
            Some(Kind::ClassSpecifier | Kind::StructSpecifier | Kind::UnionSpecifier) => {
                Construct::Class
            }
            _ => Construct::Block,
        },
        Kind::EnumeratorList => match parent_kind {
            Some(Kind::EnumSpecifier) => Construct::Enum,
            _ => Construct::Block,
        },
        Kind::InitializerList => Construct::InitializerList,
        _ => return None,
    };
    Some(construct)
}

/// The style construct of a statement that owns a bracable body.
pub fn construct_of(symbols: &SymbolRegistry, node: Node<'_>) -> Option<Construct> {
    let construct = match symbols.kind(node)? {
        Kind::If => Construct::If,
        Kind::Else => Construct::Else,
        Kind::While => Construct::While,
        Kind::DoWhile => Construct::DoWhile,
        Kind::For | Kind::ForRange => Construct::For,
        Kind::Switch => Construct::Switch,
        Kind::Case => Construct::Case,
        _ => return None,
    };
    Some(construct)
}

/// Statements following the `:` of a `case`/`default` label, comments included.
pub fn case_items<'t>(symbols: &SymbolRegistry, case: Node<'t>) -> Vec<Node<'t>> {
    let children = children_of(case);
    match children.iter().position(|child| symbols.is(*child, Kind::Colon)) {
        Some(colon) => children[colon + 1..].to_vec(),
        None => Vec::new(),
    }
}

/// Inner children of a brace-delimited block: everything between `{` and `}`.
pub fn block_interior<'t>(symbols: &SymbolRegistry, children: &[Node<'t>]) -> Option<(usize, usize)> {
    let open = children
        .iter()
        .position(|child| symbols.is(*child, Kind::OpenBrace))?;
    let close = children
        .iter()
        .rposition(|child| symbols.is(*child, Kind::CloseBrace))?;
    (close > open).then_some((open, close))
}
