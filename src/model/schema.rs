//! Schema model value objects for one version: tables, views, columns,
//! and constraints.

use crate::error::DboGenError;
use crate::util::normalize_constraint_type;

use super::{Change, LanguageSet, Order, SchemaObjectType, SqlSet, ValueTypeValue};

/// Typed payload carried by a constraint, selected by its kind.
#[derive(Debug, Clone, Default)]
pub enum ConstraintDetails {
    #[default]
    None,
    ForeignKey(ForeignKeyDetails),
    Index(IndexDetails),
}

impl ConstraintDetails {
    pub fn foreign_key(&self) -> Option<&ForeignKeyDetails> {
        match self {
            ConstraintDetails::ForeignKey(fk) => Some(fk),
            _ => None,
        }
    }

    pub fn index(&self) -> Option<&IndexDetails> {
        match self {
            ConstraintDetails::Index(ix) => Some(ix),
            _ => None,
        }
    }
}

/// Foreign key target and options.
#[derive(Debug, Clone)]
pub struct ForeignKeyDetails {
    pub table: String,
    pub column: String,
    /// FULL, PARTIAL, or SIMPLE
    pub match_type: Option<String>,
    /// RESTRICT, CASCADE, SET NULL, or NO ACTION
    pub on_delete: Option<String>,
    pub on_update: Option<String>,
    /// "owner" marks the remote table as owning rows of this one.
    pub relationship: Option<String>,
    /// "always" requests that reads join and flatten the remote row.
    pub pull: Option<String>,
}

impl ForeignKeyDetails {
    pub fn is_owner(&self) -> bool {
        self.relationship
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case("owner"))
    }

    pub fn pull_always(&self) -> bool {
        self.pull
            .as_deref()
            .is_some_and(|p| p.eq_ignore_ascii_case("always"))
    }
}

/// Index/key options.
#[derive(Debug, Clone, Default)]
pub struct IndexDetails {
    /// Index structure, e.g. BTREE or HASH
    pub using: Option<String>,
    /// Free-form trailing index option text
    pub option: Option<String>,
}

/// Fields shared by every constraint variant.
#[derive(Debug, Clone)]
pub struct ConstraintCore {
    pub order: Order,
    pub comment: Option<String>,
    /// Normalized: lower-cased with whitespace, `_`, and `-` stripped.
    pub constraint_type: String,
    /// Columns the constraint applies to. Empty for column-level
    /// constraints, which apply to their owning column.
    pub column_names: Vec<String>,
    pub details: ConstraintDetails,
    pub changes: Vec<Change>,
}

impl ConstraintCore {
    pub fn new(
        order: Order,
        comment: Option<String>,
        constraint_type: &str,
        column_names: Vec<String>,
        details: ConstraintDetails,
        changes: Vec<Change>,
    ) -> Result<Self, DboGenError> {
        let constraint_type = normalize_constraint_type(constraint_type);
        if constraint_type.is_empty() {
            return Err(DboGenError::structural("constraint requires a type"));
        }
        Ok(ConstraintCore {
            order,
            comment,
            constraint_type,
            column_names,
            details,
            changes,
        })
    }
}

/// A constraint is exactly one of these; SQL fragments, code fragments, and
/// DDL names are mutually exclusive on a single instance.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Structural kinds: primarykey, index, notnull, nullable, ...
    Plain(ConstraintCore),
    /// Carries a SQL value/filter expression.
    Sql { core: ConstraintCore, sql: SqlSet },
    /// Carries target-language validation/transform code.
    Language {
        core: ConstraintCore,
        code: LanguageSet,
    },
    /// Carries the stable identifier used in DDL.
    Named { core: ConstraintCore, name: String },
}

impl Constraint {
    pub fn core(&self) -> &ConstraintCore {
        match self {
            Constraint::Plain(core) => core,
            Constraint::Sql { core, .. } => core,
            Constraint::Language { core, .. } => core,
            Constraint::Named { core, .. } => core,
        }
    }

    pub fn order(&self) -> Order {
        self.core().order
    }

    /// The normalized constraint type tag.
    pub fn constraint_type(&self) -> &str {
        &self.core().constraint_type
    }

    pub fn details(&self) -> &ConstraintDetails {
        &self.core().details
    }

    pub fn sql_set(&self) -> Option<&SqlSet> {
        match self {
            Constraint::Sql { sql, .. } => Some(sql),
            _ => None,
        }
    }

    pub fn language_set(&self) -> Option<&LanguageSet> {
        match self {
            Constraint::Language { code, .. } => Some(code),
            _ => None,
        }
    }

    /// The DDL identifier, when one was declared.
    pub fn name(&self) -> Option<&str> {
        match self {
            Constraint::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Column names the constraint applies to, falling back to the owning
    /// column for column-level constraints.
    pub fn applicable_columns<'a>(&'a self, owning_column: Option<&'a str>) -> Vec<&'a str> {
        let names = &self.core().column_names;
        if names.is_empty() {
            owning_column.into_iter().collect()
        } else {
            names.iter().map(String::as_str).collect()
        }
    }
}

/// A single table/view column.
#[derive(Debug, Clone)]
pub struct Column {
    pub order: Order,
    pub comment: Option<String>,
    pub name: String,
    /// SQL value type tag, e.g. "int" or "nvarchar(200)"
    pub value_type: String,
    /// Fixed value for every row
    pub value: Option<ValueTypeValue>,
    pub default_value: Option<ValueTypeValue>,
    pub auto_increment: bool,
    pub remarks: Option<String>,
    pub before_column: Option<String>,
    pub after_column: Option<String>,
    pub position: Option<usize>,
    pub constraints: Vec<Constraint>,
    pub changes: Vec<Change>,
}

impl Column {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        order: Order,
        comment: Option<String>,
        name: String,
        value_type: String,
        value: Option<ValueTypeValue>,
        default_value: Option<ValueTypeValue>,
        auto_increment: bool,
        remarks: Option<String>,
        before_column: Option<String>,
        after_column: Option<String>,
        position: Option<usize>,
        constraints: Vec<Constraint>,
        changes: Vec<Change>,
    ) -> Result<Self, DboGenError> {
        if name.is_empty() {
            return Err(DboGenError::structural("column requires a name"));
        }
        if value_type.is_empty() {
            return Err(DboGenError::structural(format!(
                "column {name} requires a value type"
            )));
        }
        Ok(Column {
            order,
            comment,
            name,
            value_type,
            value,
            default_value,
            auto_increment,
            remarks,
            before_column,
            after_column,
            position,
            constraints,
            changes,
        })
    }
}

/// A named, parameterized filter fragment selectable at call time.
#[derive(Debug, Clone)]
pub struct WhereClause {
    pub name: String,
    pub sql: SqlSet,
}

/// Kind of a custom query declared on a table or view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendedSqlType {
    Query,
    Update,
    /// Pre/post SQL bracketing an externally supplied action, e.g. explicit
    /// table locking.
    Wrapper,
}

/// A named ad-hoc query or update attached to a table or view.
#[derive(Debug, Clone)]
pub struct ExtendedSql {
    pub name: String,
    pub sql_type: ExtendedSqlType,
    pub comment: Option<String>,
    pub sql: SqlSet,
    /// Only present for wrappers: the SQL run after the wrapped action.
    pub post_sql: Option<SqlSet>,
}

impl ExtendedSql {
    pub fn is_wrapper(&self) -> bool {
        self.sql_type == ExtendedSqlType::Wrapper
    }
}

/// A table declaration.
#[derive(Debug, Clone)]
pub struct Table {
    pub order: Order,
    pub comment: Option<String>,
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub table_name: String,
    pub table_space: Option<String>,
    pub columns: Vec<Column>,
    pub constraints: Vec<Constraint>,
    pub where_clauses: Vec<WhereClause>,
    pub extended_sql: Vec<ExtendedSql>,
    pub changes: Vec<Change>,
}

/// A view declaration.
#[derive(Debug, Clone)]
pub struct View {
    pub order: Order,
    pub comment: Option<String>,
    pub catalog_name: Option<String>,
    pub replace_if_exists: bool,
    pub schema_name: Option<String>,
    pub view_name: String,
    pub select_query: SqlSet,
    pub columns: Vec<Column>,
    pub constraints: Vec<Constraint>,
    pub where_clauses: Vec<WhereClause>,
    pub extended_sql: Vec<ExtendedSql>,
    pub changes: Vec<Change>,
}

/// A top-level schema object within one version.
#[derive(Debug, Clone)]
pub enum SchemaObject {
    Table(Table),
    View(View),
}

impl SchemaObject {
    pub fn object_type(&self) -> SchemaObjectType {
        match self {
            SchemaObject::Table(_) => SchemaObjectType::Table,
            SchemaObject::View(_) => SchemaObjectType::View,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SchemaObject::Table(t) => &t.table_name,
            SchemaObject::View(v) => &v.view_name,
        }
    }

    pub fn order(&self) -> Order {
        match self {
            SchemaObject::Table(t) => t.order,
            SchemaObject::View(v) => v.order,
        }
    }

    pub fn columns(&self) -> &[Column] {
        match self {
            SchemaObject::Table(t) => &t.columns,
            SchemaObject::View(v) => &v.columns,
        }
    }

    pub fn constraints(&self) -> &[Constraint] {
        match self {
            SchemaObject::Table(t) => &t.constraints,
            SchemaObject::View(v) => &v.constraints,
        }
    }

    pub fn where_clauses(&self) -> &[WhereClause] {
        match self {
            SchemaObject::Table(t) => &t.where_clauses,
            SchemaObject::View(v) => &v.where_clauses,
        }
    }

    pub fn extended_sql(&self) -> &[ExtendedSql] {
        match self {
            SchemaObject::Table(t) => &t.extended_sql,
            SchemaObject::View(v) => &v.extended_sql,
        }
    }

    pub fn changes(&self) -> &[Change] {
        match self {
            SchemaObject::Table(t) => &t.changes,
            SchemaObject::View(v) => &v.changes,
        }
    }

    pub fn is_view(&self) -> bool {
        matches!(self, SchemaObject::View(_))
    }
}
