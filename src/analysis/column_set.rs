//! Derived, query-ready facts for one table or view.
//!
//! Everything here is computed by the local classification pass and bound by
//! the reference pass; it is never user-authored and never mutated after
//! `AnalysisModel::update_references` completes.

use crate::error::DboGenError;
use crate::model::{Column, Constraint, Order, SchemaObject, ValueTypeValue};

use super::SchemaId;

/// Analysis of one foreign-key-shaped constraint on a column.
#[derive(Debug, Clone)]
pub struct ForeignKeyAnalysis {
    /// The local column carrying the key
    pub column_name: String,
    pub constraint_name: Option<String>,
    /// False for `falseforeignkey`/`fakeforeignkey` (modeled relationships
    /// that are not enforced by the database).
    pub is_real_fk: bool,
    pub is_owner: bool,
    /// The declaration asked for the remote row to always be pulled into
    /// reads.
    pub pull: bool,
    pub fk_table_name: String,
    pub fk_column_name: String,
    /// Bound by the reference pass; stays `None` for unresolved targets.
    pub remote: Option<SchemaId>,
}

/// Derived facts for one column.
#[derive(Debug, Clone)]
pub struct ColumnAnalysis {
    pub sql_name: String,
    pub value_type: String,
    pub order: Order,
    pub auto_gen: bool,
    pub default_value: Option<ValueTypeValue>,
    pub is_read: bool,
    /// noupdate column, or the whole set is read-only
    pub no_update: bool,
    pub is_primary_key: bool,
    pub is_unique: bool,
    pub is_nullable: bool,
    /// Participates in an index/key and is itself readable
    pub read_by: bool,
    pub create_value: Option<Constraint>,
    pub update_value: Option<Constraint>,
    pub read_value: Option<Constraint>,
    pub query_restrictions: Vec<Constraint>,
    pub read_validation: Vec<Constraint>,
    pub write_validation: Vec<Constraint>,
    pub foreign_key: Option<ForeignKeyAnalysis>,
}

impl ColumnAnalysis {
    /// Classify one column's constraints.
    pub(super) fn build(
        set_name: &str,
        column: &Column,
        is_read_only: bool,
    ) -> Result<Self, DboGenError> {
        let mut analysis = ColumnAnalysis {
            sql_name: column.name.clone(),
            value_type: column.value_type.clone(),
            order: column.order,
            auto_gen: column.auto_increment,
            default_value: column.default_value.clone(),
            is_read: true,
            no_update: is_read_only,
            is_primary_key: false,
            is_unique: false,
            // Nullable unless told otherwise, mirroring the permissive SQL
            // default.
            is_nullable: true,
            read_by: false,
            create_value: None,
            update_value: None,
            read_value: None,
            query_restrictions: Vec::new(),
            read_validation: Vec::new(),
            write_validation: Vec::new(),
            foreign_key: None,
        };

        for constraint in &column.constraints {
            match constraint.constraint_type() {
                "foreignkey" | "falseforeignkey" | "fakeforeignkey" => {
                    if analysis.foreign_key.is_some() {
                        return Err(DboGenError::structural(format!(
                            "{set_name}.{}: multiple foreign keys on one column",
                            column.name
                        )));
                    }
                    analysis.foreign_key =
                        Some(foreign_key_analysis(set_name, &column.name, constraint)?);
                }
                "initialvalue" => analysis.create_value = Some(constraint.clone()),
                "constantupdate" => analysis.update_value = Some(constraint.clone()),
                "constantquery" => analysis.read_value = Some(constraint.clone()),
                "restrictquery" => analysis.query_restrictions.push(constraint.clone()),
                "noupdate" => analysis.no_update = true,
                "notread" => analysis.is_read = false,
                "notnull" => analysis.is_nullable = false,
                "null" | "nullable" => analysis.is_nullable = true,
                "validateread" => analysis.read_validation.push(constraint.clone()),
                "validate" | "validatewrite" => {
                    analysis.write_validation.push(constraint.clone())
                }
                other => {
                    if other.ends_with("index") || other.ends_with("key") {
                        analysis.read_by = true;
                        if other == "primarykey" {
                            analysis.is_primary_key = true;
                        }
                        if other == "uniquekey" || other == "uniqueindex" {
                            analysis.is_unique = true;
                        }
                    }
                    // Other kinds belong to DDL or other tools; not derived
                    // facts.
                }
            }
        }

        analysis.read_by = analysis.read_by && analysis.is_read;
        Ok(analysis)
    }

    /// False for auto-generated and pure notread/noupdate columns.
    pub fn allows_create(&self) -> bool {
        !self.auto_gen && !self.no_update && self.is_read
    }

    pub fn allows_update(&self) -> bool {
        !self.auto_gen && !self.no_update && self.is_read
    }
}

fn foreign_key_analysis(
    set_name: &str,
    column_name: &str,
    constraint: &Constraint,
) -> Result<ForeignKeyAnalysis, DboGenError> {
    let details = constraint.details().foreign_key().ok_or_else(|| {
        DboGenError::structural(format!(
            "{set_name}.{column_name}: foreign key constraint lacks a target"
        ))
    })?;
    Ok(ForeignKeyAnalysis {
        column_name: column_name.to_string(),
        constraint_name: constraint.name().map(str::to_string),
        is_real_fk: constraint.constraint_type() == "foreignkey",
        is_owner: details.is_owner(),
        pull: details.pull_always(),
        fk_table_name: details.table.clone(),
        fk_column_name: details.column.clone(),
        remote: None,
    })
}

/// Derived facts from table-level constraints.
#[derive(Debug, Clone, Default)]
pub struct TopAnalysis {
    /// Columns of a table-level primary key constraint
    pub primary_key_columns: Vec<String>,
    /// Multi-column index sets, usable to generate "read by" operations
    pub column_index_sets: Vec<Vec<String>>,
    /// Index sets that are unique
    pub unique_sets: Vec<Vec<String>>,
    pub write_validation: Vec<Constraint>,
}

impl TopAnalysis {
    pub(super) fn build(set_name: &str, constraints: &[Constraint]) -> Result<Self, DboGenError> {
        let mut top = TopAnalysis::default();
        for constraint in constraints {
            let kind = constraint.constraint_type();
            if kind == "primarykey" {
                if !top.primary_key_columns.is_empty() {
                    return Err(DboGenError::structural(format!(
                        "{set_name}: multiple table-level primary keys"
                    )));
                }
                top.primary_key_columns = constraint.core().column_names.clone();
            } else if kind == "validate" || kind == "validatewrite" {
                top.write_validation.push(constraint.clone());
            } else if kind.ends_with("index") || kind.ends_with("key") {
                let names = &constraint.core().column_names;
                if !names.is_empty() {
                    top.column_index_sets.push(names.clone());
                    if kind.starts_with("unique") {
                        top.unique_sets.push(names.clone());
                    }
                }
            }
        }
        Ok(top)
    }
}

/// The full analysis of one table or view.
#[derive(Debug, Clone)]
pub struct ColumnSetAnalysis {
    pub sql_name: String,
    pub package: String,
    pub is_read_only: bool,
    pub columns: Vec<ColumnAnalysis>,
    pub top: TopAnalysis,
}

impl ColumnSetAnalysis {
    /// The local pass: classify one schema object independently of every
    /// other table. Foreign keys stay unbound until the reference pass.
    pub(super) fn build(
        schema: &SchemaObject,
        package: &str,
    ) -> Result<Self, DboGenError> {
        let is_read_only = schema.is_view();
        let sql_name = schema.name().to_string();

        let columns = schema
            .columns()
            .iter()
            .map(|c| ColumnAnalysis::build(&sql_name, c, is_read_only))
            .collect::<Result<Vec<_>, _>>()?;
        let top = TopAnalysis::build(&sql_name, schema.constraints())?;

        let analysis = ColumnSetAnalysis {
            sql_name,
            package: package.to_string(),
            is_read_only,
            columns,
            top,
        };

        if !is_read_only {
            // A table declares its primary key exactly once: either one
            // column-level constraint or one table-level constraint.
            let column_pks = analysis.columns.iter().filter(|c| c.is_primary_key).count();
            let top_pk = usize::from(!analysis.top.primary_key_columns.is_empty());
            if column_pks + top_pk > 1 {
                return Err(DboGenError::structural(format!(
                    "{}: more than one primary key declared",
                    analysis.sql_name
                )));
            }
            if column_pks + top_pk == 0 {
                return Err(DboGenError::structural(format!(
                    "{}: no primary key declared",
                    analysis.sql_name
                )));
            }
        }
        Ok(analysis)
    }

    pub fn get_column_analysis(&self, name: &str) -> Option<&ColumnAnalysis> {
        self.columns.iter().find(|c| c.sql_name == name)
    }

    /// Primary-key columns: the flagged column, or the columns named by the
    /// table-level primary key constraint.
    pub fn primary_key_columns(&self) -> Vec<&ColumnAnalysis> {
        let flagged: Vec<&ColumnAnalysis> =
            self.columns.iter().filter(|c| c.is_primary_key).collect();
        if !flagged.is_empty() {
            return flagged;
        }
        self.top
            .primary_key_columns
            .iter()
            .filter_map(|name| self.get_column_analysis(name))
            .collect()
    }

    pub fn columns_for_read(&self) -> impl Iterator<Item = &ColumnAnalysis> {
        self.columns.iter().filter(|c| c.is_read)
    }

    pub fn columns_for_create(&self) -> impl Iterator<Item = &ColumnAnalysis> {
        self.columns.iter().filter(|c| c.allows_create())
    }

    pub fn columns_for_update(&self) -> impl Iterator<Item = &ColumnAnalysis> {
        self.columns.iter().filter(|c| c.allows_update())
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = &ForeignKeyAnalysis> {
        self.columns.iter().filter_map(|c| c.foreign_key.as_ref())
    }

    /// True when some unique key exists that is not auto-generated; an
    /// upsert can target it.
    pub fn has_stable_unique_key(&self) -> bool {
        self.columns
            .iter()
            .any(|c| (c.is_unique || c.is_primary_key) && !c.auto_gen)
            || !self.top.unique_sets.is_empty()
            || (!self.top.primary_key_columns.is_empty()
                && self
                    .top
                    .primary_key_columns
                    .iter()
                    .filter_map(|n| self.get_column_analysis(n))
                    .all(|c| !c.auto_gen))
    }

    /// Column sets usable to generate "read/count by" operations: every
    /// single indexed, readable column plus the declared multi-column index
    /// sets.
    pub fn get_selectable_column_sets(&self) -> Vec<Vec<String>> {
        let mut ret: Vec<Vec<String>> = self
            .columns
            .iter()
            .filter(|c| c.read_by)
            .map(|c| vec![c.sql_name.clone()])
            .collect();
        ret.extend(self.top.column_index_sets.iter().cloned());
        ret
    }
}
