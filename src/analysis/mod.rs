//! Two-pass analysis: per-table classification, then cross-table reference
//! binding.

mod column_set;
mod model;

pub use column_set::{ColumnAnalysis, ColumnSetAnalysis, ForeignKeyAnalysis, TopAnalysis};
pub use model::{AnalysisModel, SchemaId};
