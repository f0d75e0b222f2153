//! Base value objects shared by the whole schema model.
//!
//! The model is intended to be read-only: everything here is constructed
//! once by a format loader and never mutated afterwards.

use crate::error::DboGenError;
use crate::util::eq_ci;

/// Total order over every declared schema object.
///
/// A 3-tuple of (source file index, nesting depth, sequence within level),
/// compared lexicographically. Declaration position inside a file does not
/// matter for generation; this does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Order {
    pub source: usize,
    pub depth: usize,
    pub seq: usize,
}

impl Order {
    pub fn new(source: usize, depth: usize, seq: usize) -> Self {
        Order { source, depth, seq }
    }
}

/// Hands out sequential [`Order`] values while one source file is parsed.
#[derive(Debug)]
pub struct OrderTracker {
    source: usize,
    next_seq: Vec<usize>,
}

impl OrderTracker {
    pub fn new(source: usize) -> Self {
        OrderTracker {
            source,
            next_seq: Vec::new(),
        }
    }

    /// Next order at the given nesting depth.
    pub fn next(&mut self, depth: usize) -> Order {
        if self.next_seq.len() <= depth {
            self.next_seq.resize(depth + 1, 0);
        }
        let seq = self.next_seq[depth];
        self.next_seq[depth] += 1;
        Order::new(self.source, depth, seq)
    }
}

/// The kind of schema object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaObjectType {
    Column,
    Constraint,
    Table,
    View,
    /// Reserved, not implemented
    Sequence,
    /// Reserved, not implemented
    Procedure,
}

impl SchemaObjectType {
    pub fn name(&self) -> &'static str {
        match self {
            SchemaObjectType::Column => "column",
            SchemaObjectType::Constraint => "constraint",
            SchemaObjectType::Table => "table",
            SchemaObjectType::View => "view",
            SchemaObjectType::Sequence => "sequence",
            SchemaObjectType::Procedure => "procedure",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "column" => Some(SchemaObjectType::Column),
            "constraint" => Some(SchemaObjectType::Constraint),
            "table" => Some(SchemaObjectType::Table),
            "view" => Some(SchemaObjectType::View),
            "sequence" => Some(SchemaObjectType::Sequence),
            "procedure" => Some(SchemaObjectType::Procedure),
            _ => None,
        }
    }
}

/// Syntax tag of one SQL fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlSyntax {
    Native,
    Universal,
}

/// One dialect-specific SQL fragment.
///
/// The text may contain `{argName}` placeholders that a
/// [`PrepSqlConverter`](crate::codegen::PrepSqlConverter) later rewrites
/// into the driver's parameter syntax.
#[derive(Debug, Clone)]
pub struct SqlString {
    pub sql: String,
    pub syntax: SqlSyntax,
    pub platforms: Vec<String>,
}

impl SqlString {
    pub fn new(sql: impl Into<String>, syntax: SqlSyntax, platforms: Vec<String>) -> Self {
        SqlString {
            sql: sql.into(),
            syntax,
            platforms,
        }
    }

    /// True when this fragment applies to every platform.
    pub fn is_universal(&self) -> bool {
        self.syntax == SqlSyntax::Universal
            || self.platforms.is_empty()
            || self
                .platforms
                .iter()
                .any(|p| eq_ci(p, "any") || eq_ci(p, "all"))
    }

    /// True when this fragment's platform set intersects the request.
    pub fn matches_platforms<S: AsRef<str>>(&self, requested: &[S]) -> bool {
        self.platforms
            .iter()
            .any(|p| requested.iter().any(|r| eq_ci(p, r.as_ref())))
    }
}

/// One named argument referenced by a SQL fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlArgument {
    pub name: String,
    /// Basic type tag, e.g. "int" or "str"
    pub basic_type: String,
    /// A variable-length list (e.g. for `IN (...)`), which cannot be bound
    /// as a single prepared-statement parameter.
    pub is_collection: bool,
}

impl SqlArgument {
    pub fn new(name: impl Into<String>, basic_type: impl Into<String>, is_collection: bool) -> Self {
        SqlArgument {
            name: name.into(),
            basic_type: basic_type.into(),
            is_collection,
        }
    }
}

/// An ordered list of SQL dialect variants plus the arguments they reference.
#[derive(Debug, Clone)]
pub struct SqlSet {
    variants: Vec<SqlString>,
    arguments: Vec<SqlArgument>,
}

impl SqlSet {
    pub fn new(variants: Vec<SqlString>, arguments: Vec<SqlArgument>) -> Result<Self, DboGenError> {
        if variants.is_empty() {
            return Err(DboGenError::structural(
                "a sql set requires at least one sql variant",
            ));
        }
        Ok(SqlSet {
            variants,
            arguments,
        })
    }

    /// A single universal fragment with no arguments.
    pub fn universal(sql: impl Into<String>) -> Self {
        SqlSet {
            variants: vec![SqlString::new(sql, SqlSyntax::Universal, Vec::new())],
            arguments: Vec::new(),
        }
    }

    pub fn variants(&self) -> &[SqlString] {
        &self.variants
    }

    pub fn arguments(&self) -> &[SqlArgument] {
        &self.arguments
    }

    pub fn simple_arguments(&self) -> impl Iterator<Item = &SqlArgument> {
        self.arguments.iter().filter(|a| !a.is_collection)
    }

    pub fn collection_arguments(&self) -> impl Iterator<Item = &SqlArgument> {
        self.arguments.iter().filter(|a| a.is_collection)
    }

    /// Select the fragment for the requested platforms.
    ///
    /// A platform-tagged match wins over a universal variant even when the
    /// universal one is declared first. Returns `None` when nothing matches;
    /// the caller must treat that as an unsupported platform.
    pub fn get_for_platform<S: AsRef<str>>(&self, requested: &[S]) -> Option<&SqlString> {
        self.variants
            .iter()
            .find(|v| v.matches_platforms(requested))
            .or_else(|| self.variants.iter().find(|v| v.is_universal()))
    }
}

/// One target-language code fragment.
#[derive(Debug, Clone)]
pub struct LanguageString {
    pub language: String,
    pub code: String,
}

/// Target-language source variants, analogous to [`SqlSet`].
#[derive(Debug, Clone)]
pub struct LanguageSet {
    variants: Vec<LanguageString>,
    arguments: Vec<SqlArgument>,
}

impl LanguageSet {
    pub fn new(
        variants: Vec<LanguageString>,
        arguments: Vec<SqlArgument>,
    ) -> Result<Self, DboGenError> {
        if variants.is_empty() {
            return Err(DboGenError::structural(
                "a language set requires at least one code variant",
            ));
        }
        Ok(LanguageSet {
            variants,
            arguments,
        })
    }

    pub fn variants(&self) -> &[LanguageString] {
        &self.variants
    }

    pub fn arguments(&self) -> &[SqlArgument] {
        &self.arguments
    }

    pub fn get_for_language(&self, language: &str) -> Option<&LanguageString> {
        self.variants.iter().find(|v| eq_ci(&v.language, language))
    }
}

/// A literal or computed value: defaults, fixed create/update values,
/// constant query expressions.
#[derive(Debug, Clone)]
pub enum ValueTypeValue {
    Str(String),
    Numeric(f64),
    Boolean(bool),
    Date(String),
    Computed(SqlSet),
}
