//! Grammar symbol lookup.
//!
//! Traversers never compare node kinds as strings. A [`SymbolRegistry`] resolves the handful of
//! grammar symbols the passes care about to a closed [`Kind`] enum once, by walking the
//! language's symbol table, and afterwards maps a node to its [`Kind`] with a single index.

use tree_sitter::{Language, Node};

/// Grammar symbols the formatting passes recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Kind {
    TranslationUnit,
    If,
    Else,
    While,
    DoWhile,
    For,
    ForRange,
    Switch,
    Case,
    Compound,
    DeclarationList,
    EnumeratorList,
    FieldDeclarationList,
    InitializerList,
    Lambda,
    Try,
    Catch,
    FunctionDefinition,
    NamespaceDefinition,
    LinkageSpecification,
    ClassSpecifier,
    StructSpecifier,
    UnionSpecifier,
    EnumSpecifier,
    TemplateDeclaration,
    PreprocBlock,
    Declaration,
    FieldDeclaration,
    InitDeclarator,
    ExpressionStatement,
    Identifier,
    FieldIdentifier,
    QualifiedIdentifier,
    DestructorName,
    OperatorName,
    Comment,
    Assignment,
    BitfieldClause,
    PointerDeclarator,
    ArrayDeclarator,
    FunctionDeclarator,
    AttributedDeclarator,
    ParenthesizedDeclarator,
    ReferenceDeclarator,
    StringLiteral,
    RawStringLiteral,
    CharLiteral,
    OpenBrace,
    CloseBrace,
    Colon,
    Equals,
}

/// `(grammar name, is named, kind)` entries for the C++ grammar.
const CPP_SYMBOLS: &[(&str, bool, Kind)] = &[
    ("translation_unit", true, Kind::TranslationUnit),
    ("if_statement", true, Kind::If),
    ("else_clause", true, Kind::Else),
    ("while_statement", true, Kind::While),
    ("do_statement", true, Kind::DoWhile),
    ("for_statement", true, Kind::For),
    ("for_range_loop", true, Kind::ForRange),
    ("switch_statement", true, Kind::Switch),
    ("case_statement", true, Kind::Case),
    ("compound_statement", true, Kind::Compound),
    ("declaration_list", true, Kind::DeclarationList),
    ("enumerator_list", true, Kind::EnumeratorList),
    ("field_declaration_list", true, Kind::FieldDeclarationList),
    ("initializer_list", true, Kind::InitializerList),
    ("lambda_expression", true, Kind::Lambda),
    ("try_statement", true, Kind::Try),
    ("catch_clause", true, Kind::Catch),
    ("function_definition", true, Kind::FunctionDefinition),
    ("namespace_definition", true, Kind::NamespaceDefinition),
    ("linkage_specification", true, Kind::LinkageSpecification),
    ("class_specifier", true, Kind::ClassSpecifier),
    ("struct_specifier", true, Kind::StructSpecifier),
    ("union_specifier", true, Kind::UnionSpecifier),
    ("enum_specifier", true, Kind::EnumSpecifier),
    ("template_declaration", true, Kind::TemplateDeclaration),
    ("preproc_if", true, Kind::PreprocBlock),
    ("preproc_ifdef", true, Kind::PreprocBlock),
    ("preproc_else", true, Kind::PreprocBlock),
    ("preproc_elif", true, Kind::PreprocBlock),
    ("preproc_elifdef", true, Kind::PreprocBlock),
    ("declaration", true, Kind::Declaration),
    ("field_declaration", true, Kind::FieldDeclaration),
    ("init_declarator", true, Kind::InitDeclarator),
    ("expression_statement", true, Kind::ExpressionStatement),
    ("identifier", true, Kind::Identifier),
    ("field_identifier", true, Kind::FieldIdentifier),
    ("qualified_identifier", true, Kind::QualifiedIdentifier),
    ("destructor_name", true, Kind::DestructorName),
    ("operator_name", true, Kind::OperatorName),
    ("comment", true, Kind::Comment),
    ("assignment_expression", true, Kind::Assignment),
    ("bitfield_clause", true, Kind::BitfieldClause),
    ("pointer_declarator", true, Kind::PointerDeclarator),
    ("array_declarator", true, Kind::ArrayDeclarator),
    ("function_declarator", true, Kind::FunctionDeclarator),
    ("attributed_declarator", true, Kind::AttributedDeclarator),
    ("parenthesized_declarator", true, Kind::ParenthesizedDeclarator),
    ("reference_declarator", true, Kind::ReferenceDeclarator),
    ("string_literal", true, Kind::StringLiteral),
    ("raw_string_literal", true, Kind::RawStringLiteral),
    ("char_literal", true, Kind::CharLiteral),
    ("{", false, Kind::OpenBrace),
    ("}", false, Kind::CloseBrace),
    (":", false, Kind::Colon),
    ("=", false, Kind::Equals),
];

/// Maps grammar symbol ids to [`Kind`]s.
#[derive(Debug, Clone)]
pub struct SymbolRegistry {
    kinds: Vec<Option<Kind>>,
}

impl SymbolRegistry {
    /// Resolve `table` against the symbol table of `language`.
    ///
    /// A grammar may expose one name under several ids (aliases); all of them map to the same
    /// kind. Names missing from the grammar are simply never matched.
    pub fn resolve(language: &Language, table: &[(&str, bool, Kind)]) -> Self {
        let count = language.node_kind_count();
        let mut kinds = vec![None; count];
        for (id, slot) in kinds.iter_mut().enumerate() {
            let Ok(id) = u16::try_from(id) else {
                break;
            };
            let Some(name) = language.node_kind_for_id(id) else {
                continue;
            };
            let named = language.node_kind_is_named(id);
            *slot = table
                .iter()
                .find(|(n, is_named, _)| *n == name && *is_named == named)
                .map(|(_, _, kind)| *kind);
        }
        Self { kinds }
    }

    /// Registry for the bundled C++ grammar.
    pub fn cpp(language: &Language) -> Self {
        Self::resolve(language, CPP_SYMBOLS)
    }

    /// The kind of `node`, if it is one the passes recognise.
    pub fn kind(&self, node: Node<'_>) -> Option<Kind> {
        self.kinds.get(usize::from(node.kind_id())).copied().flatten()
    }

    /// Returns `true` if `node` has kind `kind`.
    pub fn is(&self, node: Node<'_>, kind: Kind) -> bool {
        self.kind(node) == Some(kind)
    }
}
