//! MySQL DDL generation.

use chrono::Utc;

use crate::error::DboGenError;
use crate::model::{
    Change, Constraint, IndexDetails, SchemaObject, Table, ValueTypeValue, View,
};
use crate::util::{eq_ci, sql_string_literal};

use super::SchemaScriptGenerator;

const PLATFORMS: &[&str] = &["mysql"];

/// Generates MySQL syntax for schema creation and upgrades.
pub struct MySqlScriptGenerator;

impl MySqlScriptGenerator {
    pub fn new() -> Self {
        MySqlScriptGenerator
    }

    fn header(&self, name: &str) -> String {
        format!(
            "-- Schema for {name}\n-- Generated on {}\n\n",
            Utc::now().format("%a %b %e %H:%M:%S %Y")
        )
    }

    fn generate_base_table(&self, table: &Table) -> Result<String, DboGenError> {
        // No "IF NOT EXISTS": that would mask a failed upgrade.
        let mut sql = String::from("CREATE TABLE ");
        if let Some(catalog) = &table.catalog_name {
            sql.push_str(catalog.trim());
            sql.push('.');
        }
        if let Some(schema) = &table.schema_name {
            sql.push_str(schema.trim());
            sql.push('.');
        }
        sql.push_str(table.table_name.trim());
        sql.push_str(" (\n");

        let mut constraint_sql = String::new();
        for (index, column) in table.columns.iter().enumerate() {
            if index == 0 {
                sql.push_str("    ");
            } else {
                sql.push_str("\n    , ");
            }
            sql.push_str(column.name.trim());
            sql.push(' ');
            sql.push_str(&column.value_type.trim().to_uppercase());

            for constraint in &column.constraints {
                match constraint.constraint_type() {
                    "notnull" => sql.push_str(" NOT NULL"),
                    "null" | "nullable" => sql.push_str(" NULL"),
                    _ => {}
                }
            }
            if let Some(default) = &column.default_value {
                sql.push_str(" DEFAULT ");
                sql.push_str(&self.escape_value(default)?);
            }
            if column.auto_increment {
                sql.push_str(" AUTO_INCREMENT");
            }

            for constraint in &column.constraints {
                constraint_sql.push_str(&self.constraint_clause(
                    &table.table_name,
                    &[column.name.as_str()],
                    constraint,
                )?);
            }
        }

        for constraint in &table.constraints {
            let names: Vec<&str> = constraint
                .core()
                .column_names
                .iter()
                .map(String::as_str)
                .collect();
            constraint_sql.push_str(&self.constraint_clause(
                &table.table_name,
                &names,
                constraint,
            )?);
        }

        sql.push_str(&constraint_sql);
        sql.push_str("\n)");
        // Hard-coded for foreign key support.
        sql.push_str(" ENGINE=INNODB;\n");

        Ok(format!("{}{sql}", self.header(&table.table_name)))
    }

    fn generate_base_view(&self, view: &View) -> Result<String, DboGenError> {
        let variant = view.select_query.get_for_platform(PLATFORMS).ok_or_else(|| {
            DboGenError::UnsupportedPlatform {
                platforms: PLATFORMS.iter().map(|p| p.to_string()).collect(),
            }
        })?;
        let mut sql = String::from("CREATE ");
        if view.replace_if_exists {
            sql.push_str("OR REPLACE ");
        }
        sql.push_str(&format!("VIEW {} AS\n{};\n", view.view_name, variant.sql));
        Ok(format!("{}{sql}", self.header(&view.view_name)))
    }

    /// One constraint clause (leading `\n    , `), or an empty string for
    /// kinds that other tools consume.
    fn constraint_clause(
        &self,
        table_name: &str,
        column_names: &[&str],
        constraint: &Constraint,
    ) -> Result<String, DboGenError> {
        // Code constraints never reach DDL.
        if constraint.language_set().is_some() {
            return Ok(String::new());
        }
        if let Some(sql_set) = constraint.sql_set() {
            // Verbatim platform DDL for everything this tool does not model.
            if constraint.constraint_type() == "native" {
                let variant = sql_set.get_for_platform(PLATFORMS).ok_or_else(|| {
                    DboGenError::UnsupportedPlatform {
                        platforms: PLATFORMS.iter().map(|p| p.to_string()).collect(),
                    }
                })?;
                return Ok(format!("\n    , {}", variant.sql));
            }
            return Ok(String::new());
        }

        let name = constraint.name();
        let columns = column_names.join(",");
        let index_details = constraint.details().index();

        let clause = match constraint.constraint_type() {
            // FULLTEXT and SPATIAL variants take no USING clause.
            "fulltextindex" => {
                self.keyed_clause(self.lead("FULLTEXT INDEX", name), &columns, index_details, false)
            }
            "spatialindex" => {
                self.keyed_clause(self.lead("SPATIAL INDEX", name), &columns, index_details, false)
            }
            "uniqueindex" => self.keyed_clause(
                self.constraint_lead("UNIQUE INDEX", name),
                &columns,
                index_details,
                true,
            ),
            "index" => {
                self.keyed_clause(self.lead("INDEX", name), &columns, index_details, true)
            }
            "fulltextkey" => {
                self.keyed_clause(self.lead("FULLTEXT KEY", name), &columns, index_details, false)
            }
            "spatialkey" => {
                self.keyed_clause(self.lead("SPATIAL KEY", name), &columns, index_details, false)
            }
            "primarykey" => self.keyed_clause(
                self.constraint_lead("PRIMARY KEY", name),
                &columns,
                index_details,
                true,
            ),
            "uniquekey" => self.keyed_clause(
                self.constraint_lead("UNIQUE KEY", name),
                &columns,
                index_details,
                true,
            ),
            "key" => {
                self.keyed_clause(self.lead("KEY", name), &columns, index_details, true)
            }
            "foreignkey" => {
                let details = constraint.details().foreign_key().ok_or_else(|| {
                    DboGenError::structural(format!(
                        "column and table must be in foreign key; found in {columns} in {table_name}"
                    ))
                })?;
                let mut sql = match name {
                    Some(n) => format!("FOREIGN KEY {n} ({columns})"),
                    None => format!("FOREIGN KEY ({columns})"),
                };
                sql.push_str(&format!(
                    " REFERENCES {} ({})",
                    details.table.trim(),
                    details.column.trim()
                ));
                if let Some(match_type) = &details.match_type {
                    sql.push_str(&format!(" MATCH {}", match_type.to_uppercase()));
                }
                if let Some(on_delete) = &details.on_delete {
                    sql.push_str(&format!(" ON DELETE {}", on_delete.to_uppercase()));
                }
                if let Some(on_update) = &details.on_update {
                    sql.push_str(&format!(" ON UPDATE {}", on_update.to_uppercase()));
                }
                sql
            }
            // Other constraint kinds may be used by the query layer or by
            // other databases and tools.
            _ => return Ok(String::new()),
        };
        Ok(format!("\n    , {clause}"))
    }

    fn lead(&self, keyword: &str, name: Option<&str>) -> String {
        match name {
            Some(n) => format!("{keyword} {n}"),
            None => keyword.to_string(),
        }
    }

    fn constraint_lead(&self, keyword: &str, name: Option<&str>) -> String {
        match name {
            Some(n) => format!("CONSTRAINT {n} {keyword}"),
            None => keyword.to_string(),
        }
    }

    fn keyed_clause(
        &self,
        lead: String,
        columns: &str,
        details: Option<&IndexDetails>,
        allow_using: bool,
    ) -> String {
        let mut sql = lead;
        if allow_using {
            if let Some(using) = details.and_then(|d| d.using.as_deref()) {
                sql.push_str(&format!(" USING {using}"));
            }
        }
        sql.push_str(&format!(" ({columns})"));
        if let Some(option) = details.and_then(|d| d.option.as_deref()) {
            sql.push_str(&format!(" {}", option.trim()));
        }
        sql
    }

    fn escape_value(&self, value: &ValueTypeValue) -> Result<String, DboGenError> {
        Ok(match value {
            ValueTypeValue::Str(s) => sql_string_literal(s),
            ValueTypeValue::Boolean(b) => if *b { "1" } else { "0" }.to_string(),
            ValueTypeValue::Numeric(n) => n.to_string(),
            ValueTypeValue::Date(d) => sql_string_literal(d),
            ValueTypeValue::Computed(set) => {
                let variant = set.get_for_platform(PLATFORMS).ok_or_else(|| {
                    DboGenError::UnsupportedPlatform {
                        platforms: PLATFORMS.iter().map(|p| p.to_string()).collect(),
                    }
                })?;
                variant.sql.clone()
            }
        })
    }
}

impl Default for MySqlScriptGenerator {
    fn default() -> Self {
        MySqlScriptGenerator::new()
    }
}

impl SchemaScriptGenerator for MySqlScriptGenerator {
    fn is_platform(&self, platforms: &[String]) -> bool {
        platforms.iter().any(|p| eq_ci(p, "mysql"))
    }

    fn generate_base(&self, object: &SchemaObject) -> Result<String, DboGenError> {
        match object {
            SchemaObject::Table(table) => self.generate_base_table(table),
            SchemaObject::View(view) => self.generate_base_view(view),
        }
    }

    fn generate_upgrade(&self, change: &Change) -> Result<Vec<String>, DboGenError> {
        match change {
            Change::Sql(sql_change) => {
                // No declared platforms means the change applies everywhere.
                if sql_change.platforms.is_empty() || self.is_platform(&sql_change.platforms) {
                    Ok(vec![sql_change.sql.clone()])
                } else {
                    Ok(Vec::new())
                }
            }
            Change::Basic { .. } => Err(DboGenError::structural(
                "derived upgrade changes are not implemented; declare a sql change",
            )),
        }
    }
}
