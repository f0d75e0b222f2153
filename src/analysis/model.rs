//! The cross-table analysis arena.
//!
//! `register` runs the local pass on every table and view of a version;
//! `update_references` then links the foreign keys between the registered
//! entries. The two passes make declaration order irrelevant, and the
//! reference pass can be rerun after further registrations without changing
//! already-bound links.

use std::collections::HashMap;

use crate::error::{DboGenError, Diagnostic};
use crate::model::{SchemaObject, SchemaVersion};

use super::column_set::{ColumnSetAnalysis, ForeignKeyAnalysis};

/// Index of a registered schema object inside an [`AnalysisModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(pub(super) usize);

struct RegisteredSchema {
    schema: SchemaObject,
    analysis: ColumnSetAnalysis,
}

#[derive(Default)]
pub struct AnalysisModel {
    schemas: Vec<RegisteredSchema>,
    by_name: HashMap<String, SchemaId>,
    diagnostics: Vec<Diagnostic>,
    /// Recomputed on every reference pass so reruns do not pile up
    /// duplicate warnings.
    unresolved_diagnostics: Vec<Diagnostic>,
}

impl AnalysisModel {
    pub fn new() -> Self {
        AnalysisModel::default()
    }

    /// Run the local pass over every table and view of `version` and intern
    /// the results under `package`.
    pub fn register(
        &mut self,
        package: &str,
        version: &SchemaVersion,
    ) -> Result<(), DboGenError> {
        for schema in version.schema() {
            self.register_schema(package, schema)?;
        }
        Ok(())
    }

    pub fn register_schema(
        &mut self,
        package: &str,
        schema: &SchemaObject,
    ) -> Result<SchemaId, DboGenError> {
        let name = schema.name().to_string();
        if let Some(existing) = self.by_name.get(&name) {
            return Err(DboGenError::DuplicateSchemaName {
                name,
                package: self.schemas[existing.0].analysis.package.clone(),
            });
        }
        let analysis = ColumnSetAnalysis::build(schema, package)?;
        let id = SchemaId(self.schemas.len());
        self.schemas.push(RegisteredSchema {
            schema: schema.clone(),
            analysis,
        });
        self.by_name.insert(name, id);
        Ok(id)
    }

    /// The reference pass: bind every foreign key to the id of its target
    /// table. Rerunning it produces identical bindings; targets that do not
    /// exist become warnings, not errors, until a query actually needs them.
    pub fn update_references(&mut self) {
        self.unresolved_diagnostics.clear();
        let mut resolutions: Vec<(usize, usize, Option<SchemaId>)> = Vec::new();
        for (index, entry) in self.schemas.iter().enumerate() {
            for (col_index, column) in entry.analysis.columns.iter().enumerate() {
                let Some(fk) = &column.foreign_key else {
                    continue;
                };
                let remote = self.by_name.get(&fk.fk_table_name).copied();
                if remote.is_none() {
                    self.unresolved_diagnostics.push(Diagnostic::warning(format!(
                        "{}.{}: foreign key references unknown table {}",
                        entry.analysis.sql_name, fk.column_name, fk.fk_table_name
                    )));
                }
                resolutions.push((index, col_index, remote));
            }
        }
        for (index, col_index, remote) in resolutions {
            let column = &mut self.schemas[index].analysis.columns[col_index];
            if let Some(fk) = &mut column.foreign_key {
                fk.remote = remote;
            }
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = SchemaId> {
        (0..self.schemas.len()).map(SchemaId)
    }

    pub fn schema(&self, id: SchemaId) -> &SchemaObject {
        &self.schemas[id.0].schema
    }

    pub fn analysis(&self, id: SchemaId) -> &ColumnSetAnalysis {
        &self.schemas[id.0].analysis
    }

    pub fn id_for(&self, name: &str) -> Option<SchemaId> {
        self.by_name.get(name).copied()
    }

    pub fn analysis_for(&self, name: &str) -> Option<&ColumnSetAnalysis> {
        self.id_for(name).map(|id| self.analysis(id))
    }

    pub fn package_of(&self, id: SchemaId) -> &str {
        &self.schemas[id.0].analysis.package
    }

    /// Every schema that points a foreign key at `name`, with the first
    /// matching key per referencing schema.
    pub fn references_to(&self, name: &str) -> Vec<(SchemaId, &ForeignKeyAnalysis)> {
        let mut ret = Vec::new();
        for (index, entry) in self.schemas.iter().enumerate() {
            if let Some(fk) = entry
                .analysis
                .foreign_keys()
                .find(|fk| fk.fk_table_name == name)
            {
                ret.push((SchemaId(index), fk));
            }
        }
        ret
    }

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().chain(self.unresolved_diagnostics.iter())
    }
}
