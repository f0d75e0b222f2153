//! Query-IR builders and the language-generation framework.

mod converter;
mod filegen;
mod mysql;
mod sql;

pub use converter::PrepSqlConverter;
pub use filegen::{FileGen, GenConfig, LanguageGenerator};
pub use mysql::MySqlPrepSqlConverter;
pub use sql::{
    CreateQuery, DeleteQuery, ExtendedSqlQuery, InputValue, PreparedSql, QueryBundle,
    ReadByQuery, ReadQueryData, SqlBit, UpdateCreateQuery, UpdateQuery, ValueSource,
    WhereClauseQuery,
};
