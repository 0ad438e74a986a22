//! Depth-first CST traversal.
//!
//! A [`Traverser`] is one formatting pass. [`traverse`] walks the current syntax tree of a
//! [`Document`] in document order and hands every node to the pass through four callbacks. The
//! pass never mutates the document: it records [`Edit`]s in the [`TraverseContext`], and the
//! caller applies the whole batch afterwards.

use crate::document::Document;
use crate::edit::Edit;
use crate::position::{Position, Range};
use crate::symbols::{Kind, SymbolRegistry};
use cfmt_core_style::Style;
use std::collections::BTreeMap;
use tree_sitter::Node;

/// A formatting pass over the CST.
///
/// All methods default to no-ops. A pass must not keep state across runs beyond what
/// [`Traverser::reset`] re-initialises.
pub trait Traverser {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Called once before the walk starts.
    fn reset(&mut self, _ctx: &TraverseContext<'_>) {}

    /// Called for every node without children.
    fn visit_leaf<'t>(&mut self, _node: Node<'t>, _ctx: &mut TraverseContext<'t>) {}

    /// Called before the subtree of `visit.child()` is walked.
    fn pre_visit_child<'t>(&mut self, _visit: &ChildVisit<'_, 't>, _ctx: &mut TraverseContext<'t>) {
    }

    /// Called after the subtree of `visit.child()` has been walked.
    fn post_visit_child<'t>(&mut self, _visit: &ChildVisit<'_, 't>, _ctx: &mut TraverseContext<'t>) {
    }
}

/// A parent node and the index of the child being visited.
#[derive(Debug, Clone, Copy)]
pub struct ChildVisit<'a, 't> {
    /// The node whose children are being walked.
    pub parent: Node<'t>,
    /// All children of `parent`, in order.
    pub siblings: &'a [Node<'t>],
    /// Index of the current child.
    pub index: usize,
}

impl<'a, 't> ChildVisit<'a, 't> {
    /// The child being visited.
    pub fn child(&self) -> Node<'t> {
        self.siblings[self.index]
    }

    /// The sibling before the current child.
    pub fn previous(&self) -> Option<Node<'t>> {
        self.index.checked_sub(1).map(|i| self.siblings[i])
    }

    /// The sibling after the current child.
    pub fn next(&self) -> Option<Node<'t>> {
        self.siblings.get(self.index + 1).copied()
    }

    /// Returns `true` for the first child.
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    /// Returns `true` for the last child.
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.siblings.len()
    }
}

/// Shared state of one traversal: the inputs and the edits collected so far.
pub struct TraverseContext<'t> {
    document: &'t Document,
    style: &'t Style,
    symbols: &'t SymbolRegistry,
    unformattable: Vec<Range>,
    edits: Vec<Edit>,
    /// Recorded deletions as `start -> end` byte offsets. They never overlap.
    deleted: BTreeMap<usize, usize>,
}

impl<'t> TraverseContext<'t> {
    /// Context over `document`. Unformattable regions are located once, up front.
    pub fn new(document: &'t Document, style: &'t Style, symbols: &'t SymbolRegistry) -> Self {
        Self {
            document,
            style,
            symbols,
            unformattable: document.unformattable_ranges(&style.unformattable),
            edits: Vec::new(),
            deleted: BTreeMap::new(),
        }
    }

    /// The document being traversed.
    pub fn document(&self) -> &'t Document {
        self.document
    }

    /// The active style.
    pub fn style(&self) -> &'t Style {
        self.style
    }

    /// The symbol registry.
    pub fn symbols(&self) -> &'t SymbolRegistry {
        self.symbols
    }

    /// Kind of `node`, if recognised.
    pub fn kind(&self, node: Node<'_>) -> Option<Kind> {
        self.symbols.kind(node)
    }

    /// Returns `true` if `node` has kind `kind`.
    pub fn is(&self, node: Node<'_>, kind: Kind) -> bool {
        self.symbols.is(node, kind)
    }

    /// The full text the tree was parsed from.
    pub fn source(&self) -> &'t str {
        self.document.source()
    }

    /// Text of `range`.
    pub fn text(&self, range: Range) -> &'t str {
        self.document.original_contents_at(range)
    }

    /// Text of `node`.
    pub fn node_text(&self, node: Node<'_>) -> &'t str {
        self.text(Range::of(node))
    }

    /// Position of a byte offset.
    pub fn position_at(&self, offset: usize) -> Position {
        self.document.position_at(offset)
    }

    /// The off/on regions of this document.
    pub fn unformattable(&self) -> &[Range] {
        &self.unformattable
    }

    /// Returns `true` if `range` touches an unformattable region.
    ///
    /// An empty range counts as touching when it lies inside or on the edge of a region.
    pub fn is_unformattable(&self, range: Range) -> bool {
        self.unformattable.iter().any(|region| {
            if range.is_empty() {
                let at = range.start.byte_offset;
                region.start.byte_offset <= at && at <= region.end.byte_offset
            } else {
                region.overlaps(&range)
            }
        })
    }

    fn collides(&self, range: Range) -> bool {
        // Deletions are disjoint, so the one starting last before `range` ends reaches furthest.
        self.deleted
            .range(..range.end.byte_offset)
            .next_back()
            .is_some_and(|(_, &end)| end > range.start.byte_offset)
    }

    fn record_delete(&mut self, range: Range) {
        self.deleted
            .insert(range.start.byte_offset, range.end.byte_offset);
        self.edits.push(Edit::delete(range));
    }

    /// Record a deletion. Returns `false` (and records nothing) when the range is empty,
    /// unformattable, or overlaps a deletion already recorded in this pass.
    pub fn delete(&mut self, range: Range) -> bool {
        if range.is_empty() || self.is_unformattable(range) || self.collides(range) {
            return false;
        }
        self.record_delete(range);
        true
    }

    /// Record an insertion. Returns `false` when the text is empty or the position is
    /// unformattable.
    pub fn insert(&mut self, position: Position, text: impl Into<String>) -> bool {
        let text = text.into();
        if text.is_empty() || self.is_unformattable(Range::new(position, position)) {
            return false;
        }
        self.edits.push(Edit::insert(position, text));
        true
    }

    /// Replace `range` with `text`: a deletion plus an insertion at its start. Either both are
    /// recorded or neither is.
    pub fn replace(&mut self, range: Range, text: &str) -> bool {
        if self.text(range) == text {
            return false;
        }
        if self.is_unformattable(range) || (!range.is_empty() && self.collides(range)) {
            return false;
        }
        if !range.is_empty() {
            self.record_delete(range);
        }
        if !text.is_empty() {
            self.edits.push(Edit::insert(range.start, text));
        }
        true
    }

    /// Edits recorded so far.
    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    fn into_edits(self) -> Vec<Edit> {
        self.edits
    }
}

/// Walk the CST of `document` with `traverser` and return the collected edits, in collection
/// order. The document is not modified.
pub fn traverse<T>(
    traverser: &mut T,
    document: &Document,
    style: &Style,
    symbols: &SymbolRegistry,
) -> Vec<Edit>
where
    T: Traverser + ?Sized,
{
    let mut ctx = TraverseContext::new(document, style, symbols);
    traverser.reset(&ctx);
    visit(traverser, document.root(), &mut ctx);
    ctx.into_edits()
}

fn visit<'t, T>(traverser: &mut T, node: Node<'t>, ctx: &mut TraverseContext<'t>)
where
    T: Traverser + ?Sized,
{
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
    if children.is_empty() {
        traverser.visit_leaf(node, ctx);
        return;
    }

    for index in 0..children.len() {
        let child_visit = ChildVisit {
            parent: node,
            siblings: &children,
            index,
        };
        traverser.pre_visit_child(&child_visit, ctx);
        visit(traverser, children[index], ctx);
        traverser.post_visit_child(&child_visit, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the leaf texts in visiting order and deletes every `;`.
    #[derive(Default)]
    struct Recorder {
        leaves: Vec<String>,
        depth: usize,
        max_depth: usize,
    }

    impl Traverser for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn reset(&mut self, _ctx: &TraverseContext<'_>) {
            *self = Self::default();
        }

        fn visit_leaf<'t>(&mut self, node: Node<'t>, ctx: &mut TraverseContext<'t>) {
            let text = ctx.node_text(node);
            self.leaves.push(text.to_string());
            if text == ";" {
                ctx.delete(Range::of(node));
            }
        }

        fn pre_visit_child<'t>(&mut self, _visit: &ChildVisit<'_, 't>, _ctx: &mut TraverseContext<'t>) {
            self.depth += 1;
            self.max_depth = self.max_depth.max(self.depth);
        }

        fn post_visit_child<'t>(&mut self, _visit: &ChildVisit<'_, 't>, _ctx: &mut TraverseContext<'t>) {
            self.depth -= 1;
        }
    }

    fn cpp(text: &str) -> (Document, SymbolRegistry) {
        let language = tree_sitter_cpp::LANGUAGE.into();
        let doc = Document::new(text, &language).unwrap();
        (doc, SymbolRegistry::cpp(&language))
    }

    #[test]
    fn test_leaves_in_document_order() {
        let (doc, symbols) = cpp("int a = 1;\nf(a);\n");
        let style = Style::default();
        let mut recorder = Recorder::default();
        let edits = traverse(&mut recorder, &doc, &style, &symbols);

        assert_eq!(
            recorder.leaves,
            vec!["int", "a", "=", "1", ";", "f", "(", "a", ")", ";"]
        );
        assert_eq!(recorder.depth, 0);
        assert!(recorder.max_depth >= 3);
        assert_eq!(edits.len(), 2);
        assert!(edits[0].offset() < edits[1].offset());
    }

    #[test]
    fn test_traversal_is_deterministic() {
        let (doc, symbols) = cpp("int a;\nint b;\n");
        let style = Style::default();
        let mut recorder = Recorder::default();
        let first = traverse(&mut recorder, &doc, &style, &symbols);
        let second = traverse(&mut recorder, &doc, &style, &symbols);
        assert_eq!(first, second);
        assert_eq!(recorder.leaves.len(), 6);
    }

    #[test]
    fn test_edits_in_unformattable_regions_are_dropped() {
        let (doc, symbols) = cpp("int a;\n// cfmt off\nint b;\n// cfmt on\nint c;\n");
        let style = Style::default();
        let mut recorder = Recorder::default();
        let edits = traverse(&mut recorder, &doc, &style, &symbols);
        let offsets: Vec<usize> = edits.iter().map(Edit::offset).collect();
        assert_eq!(offsets, vec![5, 42]);
    }

    #[test]
    fn test_overlapping_deletes_are_refused() {
        let (doc, symbols) = cpp("int a;\n");
        let style = Style::default();
        let mut ctx = TraverseContext::new(&doc, &style, &symbols);
        let wide = Range::new(doc.position_at(0), doc.position_at(4));
        let narrow = Range::new(doc.position_at(2), doc.position_at(3));
        assert!(ctx.delete(wide));
        assert!(!ctx.delete(narrow));
        assert!(!ctx.replace(narrow, "x"));
        assert!(ctx.insert(doc.position_at(2), "x"));
        assert_eq!(ctx.edits().len(), 2);
    }

    #[test]
    fn test_deletes_recorded_out_of_order() {
        let (doc, symbols) = cpp("int abc;\n");
        let style = Style::default();
        let mut ctx = TraverseContext::new(&doc, &style, &symbols);
        let span = |from: usize, to: usize| Range::new(doc.position_at(from), doc.position_at(to));

        assert!(ctx.delete(span(5, 7)));
        assert!(ctx.delete(span(0, 3)));
        // Touching neighbours on both sides is fine.
        assert!(ctx.delete(span(3, 5)));
        assert!(!ctx.delete(span(4, 6)));
        assert!(!ctx.delete(span(6, 8)));
        assert!(ctx.delete(span(7, 8)));
        assert_eq!(ctx.edits().len(), 4);
    }
}
