//! Upgrade changes attached to a schema version.
//!
//! Changes migrate a database from the previous version to the one that
//! declares them; objects created for the first time carry none.

use super::{Order, SchemaObjectType};

/// The kind of change performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    Add,
    Remove,
    Rename,
    Alter,
    Sql,
}

impl ChangeType {
    pub fn name(&self) -> &'static str {
        match self {
            ChangeType::Add => "add",
            ChangeType::Remove => "remove",
            ChangeType::Rename => "rename",
            ChangeType::Alter => "alter",
            ChangeType::Sql => "sql",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "add" => Some(ChangeType::Add),
            "remove" => Some(ChangeType::Remove),
            "rename" => Some(ChangeType::Rename),
            "alter" => Some(ChangeType::Alter),
            "sql" => Some(ChangeType::Sql),
            _ => None,
        }
    }
}

/// A single change to a schema object, either top-level (drop a table) or
/// within an object (rename a column).
#[derive(Debug, Clone)]
pub enum Change {
    /// A trivial change that the platform generator can derive on its own.
    Basic {
        order: Order,
        comment: Option<String>,
        object_type: SchemaObjectType,
        change_type: ChangeType,
    },
    /// A change carried as explicit upgrade SQL.
    Sql(SqlChange),
}

impl Change {
    pub fn order(&self) -> Order {
        match self {
            Change::Basic { order, .. } => *order,
            Change::Sql(sql) => sql.order,
        }
    }

    pub fn object_type(&self) -> SchemaObjectType {
        match self {
            Change::Basic { object_type, .. } => *object_type,
            Change::Sql(sql) => sql.object_type,
        }
    }

    pub fn change_type(&self) -> ChangeType {
        match self {
            Change::Basic { change_type, .. } => *change_type,
            Change::Sql(_) => ChangeType::Sql,
        }
    }
}

/// Explicit upgrade SQL, tagged with the platforms it applies to.
#[derive(Debug, Clone)]
pub struct SqlChange {
    pub order: Order,
    pub comment: Option<String>,
    pub object_type: SchemaObjectType,
    pub sql: String,
    pub platforms: Vec<String>,
}
