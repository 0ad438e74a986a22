#![warn(missing_docs)]
//! `cfmt-core-style` - declarative style configuration for `cfmt-core`.
//!
//! This crate intentionally stays lightweight and does **not** depend on any parser or on the
//! formatter itself. It only describes *what* the formatter should enforce:
//!
//! - brace existence and newline placement per construct
//! - scope-based indentation per construct
//! - column alignment of declarations, assignments, bitfields, initializer tables and
//!   trailing comments
//! - block comment reflow
//!
//! Every struct derives `serde::Deserialize` with `#[serde(default)]`, so hosts can load a
//! partial configuration from any format and fall back to [`Style::default`] for the rest.
//! Loading files is left to the host.

use serde::{Deserialize, Serialize};

/// How a braced scope is indented relative to the construct that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentationMode {
    /// Neither the braces nor the body are indented.
    None,
    /// Braces and body are both indented one level (Whitesmiths).
    BracesIndented,
    /// Braces stay at the construct level, the body is indented one level (K&R, Allman).
    #[default]
    BodyIndented,
    /// Braces are indented one level, the body two levels (GNU).
    BothIndented,
}

impl IndentationMode {
    /// Levels added around each brace token.
    pub fn brace_levels(self) -> usize {
        match self {
            Self::BracesIndented | Self::BothIndented => 1,
            Self::None | Self::BodyIndented => 0,
        }
    }

    /// Levels added around the statements between the braces.
    pub fn body_levels(self) -> usize {
        match self {
            Self::None => 0,
            Self::BracesIndented | Self::BodyIndented => 1,
            Self::BothIndented => 2,
        }
    }
}

/// Whether a construct's body must, must not, or may be wrapped in braces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BraceExistence {
    /// Wrap unbraced bodies in braces.
    Require,
    /// Remove braces around single-statement bodies.
    Remove,
    /// Leave the construct exactly as written.
    #[default]
    Ignore,
}

/// Where newlines go around a single brace token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewlinePlacement {
    /// A newline before the brace, none after it.
    Before,
    /// A newline after the brace, none before it.
    After,
    /// Newlines on both sides of the brace.
    Surround,
    /// Keep whatever the source has.
    #[default]
    Ignore,
}

impl NewlinePlacement {
    /// `Some(true)` if a newline is wanted before the brace, `Some(false)` if one is forbidden,
    /// `None` if the side is left alone.
    pub fn newline_before(self) -> Option<bool> {
        match self {
            Self::Before | Self::Surround => Some(true),
            Self::After => Some(false),
            Self::Ignore => None,
        }
    }

    /// `Some(true)` if a newline is wanted after the brace, `Some(false)` if one is forbidden,
    /// `None` if the side is left alone.
    pub fn newline_after(self) -> Option<bool> {
        match self {
            Self::After | Self::Surround => Some(true),
            Self::Before => Some(false),
            Self::Ignore => None,
        }
    }
}

/// Newline placement for the opening and closing brace of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BracePlacement {
    /// Rule for the `{` token.
    pub opening: NewlinePlacement,
    /// Rule for the `}` token.
    pub closing: NewlinePlacement,
}

impl BracePlacement {
    /// K&R placement: `if (x) {` ... `} else {`.
    pub fn attached() -> Self {
        Self {
            opening: NewlinePlacement::After,
            closing: NewlinePlacement::Before,
        }
    }

    /// Allman placement: every brace on its own line.
    pub fn broken() -> Self {
        Self {
            opening: NewlinePlacement::Surround,
            closing: NewlinePlacement::Surround,
        }
    }
}

/// Everything the formatter enforces for one kind of braced construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockStyle {
    /// Scope indentation of the braces and body.
    pub indentation: IndentationMode,
    /// Brace existence policy.
    pub existence: BraceExistence,
    /// Newline placement around existing or inserted braces.
    pub placement: BracePlacement,
}

impl BlockStyle {
    /// A style with the given indentation and everything else left alone.
    pub fn indented(indentation: IndentationMode) -> Self {
        Self {
            indentation,
            ..Self::default()
        }
    }
}

/// The constructs that own a braced (or bracable) body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Construct {
    /// `if (...)` consequence.
    If,
    /// `else` body.
    Else,
    /// `while (...)` body.
    While,
    /// `do ... while (...);` body.
    DoWhile,
    /// `for (...)` and range-`for` bodies.
    For,
    /// `switch (...)` body.
    Switch,
    /// Statements following a `case`/`default` label.
    Case,
    /// Function definition body.
    Function,
    /// `namespace` body.
    Namespace,
    /// `extern "C" { ... }` body.
    Extern,
    /// `class`/`struct`/`union` member list.
    Class,
    /// `enum` enumerator list.
    Enum,
    /// Brace-enclosed initializer list.
    InitializerList,
    /// Lambda body.
    Lambda,
    /// `try` body.
    Try,
    /// `catch` body.
    Catch,
    /// Any other nested compound statement.
    Block,
}

/// One [`BlockStyle`] per [`Construct`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct ConstructStyles {
    pub if_statement: BlockStyle,
    pub else_clause: BlockStyle,
    pub while_loop: BlockStyle,
    pub do_while_loop: BlockStyle,
    pub for_loop: BlockStyle,
    pub switch_statement: BlockStyle,
    pub case_block: BlockStyle,
    pub function: BlockStyle,
    pub namespace: BlockStyle,
    pub extern_block: BlockStyle,
    pub class: BlockStyle,
    pub enumeration: BlockStyle,
    pub initializer_list: BlockStyle,
    pub lambda: BlockStyle,
    pub try_block: BlockStyle,
    pub catch_block: BlockStyle,
    pub block: BlockStyle,
}

impl Default for ConstructStyles {
    fn default() -> Self {
        let body = BlockStyle::indented(IndentationMode::BodyIndented);
        let flat = BlockStyle::indented(IndentationMode::None);
        Self {
            if_statement: body,
            else_clause: body,
            while_loop: body,
            do_while_loop: body,
            for_loop: body,
            switch_statement: flat,
            case_block: body,
            function: body,
            namespace: flat,
            extern_block: flat,
            class: body,
            enumeration: body,
            initializer_list: body,
            lambda: body,
            try_block: body,
            catch_block: body,
            block: body,
        }
    }
}

impl ConstructStyles {
    /// Shared access by construct.
    pub fn get(&self, construct: Construct) -> &BlockStyle {
        match construct {
            Construct::If => &self.if_statement,
            Construct::Else => &self.else_clause,
            Construct::While => &self.while_loop,
            Construct::DoWhile => &self.do_while_loop,
            Construct::For => &self.for_loop,
            Construct::Switch => &self.switch_statement,
            Construct::Case => &self.case_block,
            Construct::Function => &self.function,
            Construct::Namespace => &self.namespace,
            Construct::Extern => &self.extern_block,
            Construct::Class => &self.class,
            Construct::Enum => &self.enumeration,
            Construct::InitializerList => &self.initializer_list,
            Construct::Lambda => &self.lambda,
            Construct::Try => &self.try_block,
            Construct::Catch => &self.catch_block,
            Construct::Block => &self.block,
        }
    }

    /// Mutable access by construct.
    pub fn get_mut(&mut self, construct: Construct) -> &mut BlockStyle {
        match construct {
            Construct::If => &mut self.if_statement,
            Construct::Else => &mut self.else_clause,
            Construct::While => &mut self.while_loop,
            Construct::DoWhile => &mut self.do_while_loop,
            Construct::For => &mut self.for_loop,
            Construct::Switch => &mut self.switch_statement,
            Construct::Case => &mut self.case_block,
            Construct::Function => &mut self.function,
            Construct::Namespace => &mut self.namespace,
            Construct::Extern => &mut self.extern_block,
            Construct::Class => &mut self.class,
            Construct::Enum => &mut self.enumeration,
            Construct::InitializerList => &mut self.initializer_list,
            Construct::Lambda => &mut self.lambda,
            Construct::Try => &mut self.try_block,
            Construct::Catch => &mut self.catch_block,
            Construct::Block => &mut self.block,
        }
    }
}

/// Character used for indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentCharacter {
    /// `' '`
    #[default]
    Space,
    /// `'\t'`
    Tab,
}

/// The unit inserted once per scope level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndentationUnit {
    /// Indentation character.
    pub character: IndentCharacter,
    /// Characters per level.
    pub width: usize,
    /// Display width of a tab when measuring columns.
    pub tab_width: usize,
}

impl Default for IndentationUnit {
    fn default() -> Self {
        Self {
            character: IndentCharacter::Space,
            width: 4,
            tab_width: 4,
        }
    }
}

impl IndentationUnit {
    /// The whitespace for `depth` scope levels.
    pub fn render(&self, depth: usize) -> String {
        let ch = match self.character {
            IndentCharacter::Space => ' ',
            IndentCharacter::Tab => '\t',
        };
        std::iter::repeat_n(ch, depth * self.width).collect()
    }
}

/// Toggle and grouping rules for one alignment category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentToggle {
    /// Whether the category is aligned at all.
    pub enabled: bool,
    /// Keep a run going across comment lines.
    pub across_comments: bool,
    /// Keep a run going across blank lines.
    pub across_empty_lines: bool,
}

impl AlignmentToggle {
    /// Enabled, breaking on comments and blank lines.
    pub fn consecutive() -> Self {
        Self {
            enabled: true,
            across_comments: false,
            across_empty_lines: false,
        }
    }
}

/// Justification of initializer-table cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Justify {
    /// Cell starts line up.
    #[default]
    Left,
    /// Cell ends line up.
    Right,
}

/// Trailing comment policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingCommentAlignment {
    /// Leave trailing comments alone.
    #[default]
    Ignore,
    /// Exactly one space between the last token and the comment.
    LeftJustify,
    /// Comments on consecutive lines start in the same column.
    AlignConsecutive,
}

/// Column alignment settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentStyle {
    /// Declarator names of consecutive declarations.
    pub declarations: AlignmentToggle,
    /// `=` of consecutive assignments and initialized declarations.
    pub assignments: AlignmentToggle,
    /// `:` of consecutive bitfield members.
    pub bitfields: AlignmentToggle,
    /// Cells of nested initializer-list rows.
    pub initializer_lists: AlignmentToggle,
    /// Justification of initializer-list cells.
    pub initializer_list_justify: Justify,
    /// Trailing comment policy.
    pub trailing_comments: TrailingCommentAlignment,
}

/// Block comment reflow settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentStyle {
    /// Word-wrap multi-line block comments.
    pub reflow: bool,
    /// Maximum line width, in display columns, of reflowed comment lines.
    pub target_line_length: usize,
}

impl Default for CommentStyle {
    fn default() -> Self {
        Self {
            reflow: false,
            target_line_length: 80,
        }
    }
}

/// Sentinel comments that switch formatting off and back on.
///
/// A line whose trimmed text equals `off` starts an unformattable region; the region ends with
/// the line whose trimmed text equals `on`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnformattableMarkers {
    /// Marker that disables formatting.
    pub off: String,
    /// Marker that re-enables formatting.
    pub on: String,
}

impl Default for UnformattableMarkers {
    fn default() -> Self {
        Self {
            off: "// cfmt off".to_string(),
            on: "// cfmt on".to_string(),
        }
    }
}

/// The complete, read-only formatting style.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Indentation unit.
    pub indentation: IndentationUnit,
    /// Per-construct brace and indentation rules.
    pub constructs: ConstructStyles,
    /// Column alignment.
    pub alignment: AlignmentStyle,
    /// Comment reflow.
    pub comments: CommentStyle,
    /// Off/on markers.
    pub unformattable: UnformattableMarkers,
}

impl Style {
    /// The block style of a construct.
    pub fn block(&self, construct: Construct) -> &BlockStyle {
        self.constructs.get(construct)
    }

    /// Builder-style override of one construct.
    pub fn with_block(mut self, construct: Construct, block: BlockStyle) -> Self {
        *self.constructs.get_mut(construct) = block;
        self
    }
}
