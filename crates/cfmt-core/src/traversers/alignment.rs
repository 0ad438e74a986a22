//! Column alignment of consecutive sibling constructs.
//!
//! Every alignment pass shares one scan: walk a sibling list, collect maximal runs of
//! consecutive members, and pad each member of a run so that its anchor reaches the run's
//! widest anchor column. What counts as a member, where its anchor sits, and which parents hold
//! sibling lists is decided by an [`AlignmentRule`].

use crate::position::{Position, Range};
use crate::predicates::{display_column, innermost_identifier, named_children_of};
use crate::symbols::Kind;
use crate::traverser::{ChildVisit, TraverseContext, Traverser};
use cfmt_core_style::{AlignmentToggle, Justify, Style};
use std::marker::PhantomData;
use tree_sitter::Node;

/// One alignable sibling.
#[derive(Debug, Clone, Copy)]
pub struct Member<'t> {
    /// The sibling itself.
    pub node: Node<'t>,
    /// Where the column is measured.
    pub anchor: Position,
    /// Where padding goes.
    pub pad_at: Position,
}

/// What one alignment pass aligns.
pub trait AlignmentRule {
    /// Pass name.
    const NAME: &'static str;

    /// The style toggle of this category.
    fn toggle(style: &Style) -> AlignmentToggle;

    /// Returns `true` if the children of `parent` form a list worth scanning.
    fn is_sibling_list(ctx: &TraverseContext<'_>, parent: Node<'_>) -> bool;

    /// The member view of `node`, or `None` if it breaks a run.
    fn member<'t>(ctx: &TraverseContext<'t>, node: Node<'t>) -> Option<Member<'t>>;

    /// Pad a run of two or more members.
    fn align_run<'t>(ctx: &mut TraverseContext<'t>, run: &[Member<'t>]) {
        let columns: Vec<usize> = run.iter().map(|m| display_column(ctx, m.anchor)).collect();
        let Some(&target) = columns.iter().max() else {
            return;
        };
        for (member, column) in run.iter().zip(columns) {
            if column < target {
                ctx.insert(member.pad_at, " ".repeat(target - column));
            }
        }
    }
}

/// Runs an [`AlignmentRule`] over every sibling list in the tree.
#[derive(Debug)]
pub struct AlignmentTraverser<R> {
    rule: PhantomData<R>,
}

impl<R> Default for AlignmentTraverser<R> {
    fn default() -> Self {
        Self { rule: PhantomData }
    }
}

impl<R: AlignmentRule> AlignmentTraverser<R> {
    /// A new pass.
    pub fn new() -> Self {
        Self::default()
    }

    fn scan<'t>(ctx: &mut TraverseContext<'t>, siblings: &[Node<'t>], toggle: AlignmentToggle) {
        let mut run: Vec<Member<'t>> = Vec::new();
        let mut last_row: Option<usize> = None;

        for &child in siblings {
            if !child.is_named() {
                continue;
            }
            if ctx.is(child, Kind::Comment) {
                let start_row = child.start_position().row;
                let trailing = run
                    .last()
                    .is_some_and(|m| m.node.end_position().row == start_row);
                if trailing || run.is_empty() {
                    continue;
                }
                if toggle.across_comments {
                    last_row = Some(child.end_position().row);
                } else {
                    Self::flush(ctx, &mut run);
                    last_row = None;
                }
                continue;
            }

            let member = R::member(ctx, child).filter(|m| !ctx.is_unformattable(Range::of(m.node)));
            let Some(member) = member else {
                Self::flush(ctx, &mut run);
                last_row = None;
                continue;
            };

            let row = child.start_position().row;
            let breaks = match (last_row, run.last()) {
                (Some(previous), Some(last)) => {
                    last.node.end_position().row == row
                        || (row > previous + 1 && !toggle.across_empty_lines)
                }
                _ => false,
            };
            if breaks {
                Self::flush(ctx, &mut run);
            }
            run.push(member);
            last_row = Some(child.end_position().row);
        }
        Self::flush(ctx, &mut run);
    }

    fn flush<'t>(ctx: &mut TraverseContext<'t>, run: &mut Vec<Member<'t>>) {
        if run.len() >= 2 {
            R::align_run(ctx, run);
        }
        run.clear();
    }
}

impl<R: AlignmentRule> Traverser for AlignmentTraverser<R> {
    fn name(&self) -> &'static str {
        R::NAME
    }

    fn pre_visit_child<'t>(&mut self, visit: &ChildVisit<'_, 't>, ctx: &mut TraverseContext<'t>) {
        if !visit.is_first() {
            return;
        }
        let toggle = R::toggle(ctx.style());
        if !toggle.enabled || !R::is_sibling_list(ctx, visit.parent) {
            return;
        }
        Self::scan(ctx, visit.siblings, toggle);
    }
}

fn single_row(node: Node<'_>) -> bool {
    node.start_position().row == node.end_position().row
}

fn child_of_kind<'t>(ctx: &TraverseContext<'_>, node: Node<'t>, kind: Kind) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|child| ctx.is(*child, kind))
}

/// Aligns the declared names of consecutive declarations.
#[derive(Debug)]
pub struct Declarations;

impl AlignmentRule for Declarations {
    const NAME: &'static str = "declaration-alignment";

    fn toggle(style: &Style) -> AlignmentToggle {
        style.alignment.declarations
    }

    fn is_sibling_list(ctx: &TraverseContext<'_>, parent: Node<'_>) -> bool {
        matches!(
            ctx.kind(parent),
            Some(
                Kind::TranslationUnit
                    | Kind::Compound
                    | Kind::DeclarationList
                    | Kind::FieldDeclarationList
            )
        )
    }

    fn member<'t>(ctx: &TraverseContext<'t>, node: Node<'t>) -> Option<Member<'t>> {
        if !matches!(ctx.kind(node), Some(Kind::Declaration | Kind::FieldDeclaration)) {
            return None;
        }
        let declarator = node.child_by_field_name("declarator")?;
        let name = innermost_identifier(ctx.symbols(), declarator)?;
        if name.start_position().row != node.start_position().row {
            return None;
        }
        Some(Member {
            node,
            anchor: Position::start_of(name),
            pad_at: Position::start_of(declarator),
        })
    }
}

/// Aligns the `=` of consecutive assignments and initialised declarations.
#[derive(Debug)]
pub struct Assignments;

impl AlignmentRule for Assignments {
    const NAME: &'static str = "assignment-alignment";

    fn toggle(style: &Style) -> AlignmentToggle {
        style.alignment.assignments
    }

    fn is_sibling_list(ctx: &TraverseContext<'_>, parent: Node<'_>) -> bool {
        matches!(
            ctx.kind(parent),
            Some(
                Kind::TranslationUnit
                    | Kind::Compound
                    | Kind::Case
                    | Kind::DeclarationList
                    | Kind::FieldDeclarationList
            )
        )
    }

    fn member<'t>(ctx: &TraverseContext<'t>, node: Node<'t>) -> Option<Member<'t>> {
        let operator = match ctx.kind(node)? {
            Kind::ExpressionStatement => {
                let expression = named_children_of(node).into_iter().next()?;
                if !ctx.is(expression, Kind::Assignment) {
                    return None;
                }
                expression.child_by_field_name("operator")?
            }
            Kind::Declaration => {
                let declarator = node.child_by_field_name("declarator")?;
                if !ctx.is(declarator, Kind::InitDeclarator) {
                    return None;
                }
                child_of_kind(ctx, declarator, Kind::Equals)?
            }
            Kind::FieldDeclaration => child_of_kind(ctx, node, Kind::Equals)?,
            _ => return None,
        };
        if operator.start_position().row != node.start_position().row {
            return None;
        }
        let at = Position::start_of(operator);
        Some(Member {
            node,
            anchor: at,
            pad_at: at,
        })
    }
}

/// Aligns the `:` of consecutive bitfield members.
#[derive(Debug)]
pub struct Bitfields;

impl AlignmentRule for Bitfields {
    const NAME: &'static str = "bitfield-alignment";

    fn toggle(style: &Style) -> AlignmentToggle {
        style.alignment.bitfields
    }

    fn is_sibling_list(ctx: &TraverseContext<'_>, parent: Node<'_>) -> bool {
        ctx.is(parent, Kind::FieldDeclarationList)
    }

    fn member<'t>(ctx: &TraverseContext<'t>, node: Node<'t>) -> Option<Member<'t>> {
        if !ctx.is(node, Kind::FieldDeclaration) {
            return None;
        }
        let clause = child_of_kind(ctx, node, Kind::BitfieldClause)?;
        if clause.start_position().row != node.start_position().row {
            return None;
        }
        let at = Position::start_of(clause);
        Some(Member {
            node,
            anchor: at,
            pad_at: at,
        })
    }
}

/// Aligns the columns of an initializer table: a list whose rows are single-line nested
/// initializer lists.
#[derive(Debug)]
pub struct InitializerLists;

impl AlignmentRule for InitializerLists {
    const NAME: &'static str = "initializer-list-alignment";

    fn toggle(style: &Style) -> AlignmentToggle {
        style.alignment.initializer_lists
    }

    fn is_sibling_list(ctx: &TraverseContext<'_>, parent: Node<'_>) -> bool {
        ctx.is(parent, Kind::InitializerList)
    }

    fn member<'t>(ctx: &TraverseContext<'t>, node: Node<'t>) -> Option<Member<'t>> {
        if !ctx.is(node, Kind::InitializerList) || !single_row(node) {
            return None;
        }
        let at = Position::start_of(node);
        Some(Member {
            node,
            anchor: at,
            pad_at: at,
        })
    }

    fn align_run<'t>(ctx: &mut TraverseContext<'t>, run: &[Member<'t>]) {
        let justify = ctx.style().alignment.initializer_list_justify;
        let rows: Vec<Vec<Node<'t>>> = run
            .iter()
            .map(|row| {
                named_children_of(row.node)
                    .into_iter()
                    .filter(|cell| !ctx.is(*cell, Kind::Comment))
                    .collect()
            })
            .collect();
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut shifts = vec![0usize; rows.len()];

        for column in 0..columns {
            let cells: Vec<(usize, usize, usize, Node<'t>)> = rows
                .iter()
                .enumerate()
                .filter_map(|(row, cells)| {
                    let cell = *cells.get(column)?;
                    let start = display_column(ctx, Position::start_of(cell)) + shifts[row];
                    let end = display_column(ctx, Position::end_of(cell)) + shifts[row];
                    Some((row, start, end, cell))
                })
                .collect();
            let target = cells
                .iter()
                .map(|(_, start, end, _)| match justify {
                    Justify::Left => *start,
                    Justify::Right => *end,
                })
                .max()
                .unwrap_or(0);
            for (row, start, end, cell) in cells {
                let at = match justify {
                    Justify::Left => start,
                    Justify::Right => end,
                };
                let pad = target - at;
                if pad > 0 {
                    ctx.insert(Position::start_of(cell), " ".repeat(pad));
                    shifts[row] += pad;
                }
            }
        }
    }
}

/// Declaration alignment pass.
pub type DeclarationAlignmentTraverser = AlignmentTraverser<Declarations>;
/// Assignment alignment pass.
pub type AssignmentAlignmentTraverser = AlignmentTraverser<Assignments>;
/// Bitfield alignment pass.
pub type BitfieldAlignmentTraverser = AlignmentTraverser<Bitfields>;
/// Initializer table alignment pass.
pub type InitializerListAlignmentTraverser = AlignmentTraverser<InitializerLists>;
