//! Platform-specific DDL emitters.
//!
//! Emitters consume the raw schema model, not the analysis; what matters
//! here is the declared DDL shape, not query eligibility.

mod mysql;

pub use mysql::MySqlScriptGenerator;

use crate::error::DboGenError;
use crate::model::{Change, SchemaObject};

/// Generates DDL scripts for one SQL platform. Implementations are
/// stateless.
pub trait SchemaScriptGenerator {
    /// True when any of the given platform tags names this generator.
    fn is_platform(&self, platforms: &[String]) -> bool;

    /// The creation script for a schema object.
    fn generate_base(&self, object: &SchemaObject) -> Result<String, DboGenError>;

    /// The upgrade script for one change. Changes tagged for other
    /// platforms produce nothing.
    fn generate_upgrade(&self, change: &Change) -> Result<Vec<String>, DboGenError>;
}
