//! Schema model value objects

mod base;
mod change;
mod schema;
mod version;

pub use base::{
    LanguageSet, LanguageString, Order, OrderTracker, SchemaObjectType, SqlArgument, SqlSet,
    SqlString, SqlSyntax, ValueTypeValue,
};
pub use change::{Change, ChangeType, SqlChange};
pub use schema::{
    Column, Constraint, ConstraintCore, ConstraintDetails, ExtendedSql, ExtendedSqlType,
    ForeignKeyDetails, IndexDetails, SchemaObject, Table, View, WhereClause,
};
pub use version::SchemaVersion;
