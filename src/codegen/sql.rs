//! Query intermediate representation: the resolved, parameterized
//! description of every generated operation for one table or view.
//!
//! Everything here is language-neutral. A language generator consumes these
//! descriptions and turns them into source text; it never needs to look at
//! the raw schema model again.

use std::collections::HashSet;

use crate::analysis::{AnalysisModel, ColumnAnalysis, SchemaId};
use crate::error::DboGenError;
use crate::model::{ExtendedSql, ExtendedSqlType, SqlArgument, ValueTypeValue, WhereClause};
use crate::util::{basic_value_type, sql_string_literal};

use super::converter::PrepSqlConverter;

/// One piece of a prepared SQL statement.
#[derive(Debug, Clone)]
pub enum SqlBit {
    Text(String),
    /// An unexpanded collection argument. The generation consumer must
    /// synthesize N positional placeholders and a matching argument map at
    /// call time; prepared-statement syntax has no variable-arity lists.
    Collection(SqlArgument),
}

/// SQL text with simple arguments already substituted and collection
/// arguments left as expansion points.
#[derive(Debug, Clone, Default)]
pub struct PreparedSql {
    bits: Vec<SqlBit>,
}

impl PreparedSql {
    pub fn new() -> Self {
        PreparedSql::default()
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        PreparedSql {
            bits: vec![SqlBit::Text(text.into())],
        }
    }

    /// Substitute `{name}` placeholders: simple arguments become the
    /// converter's parameter syntax, collection arguments split the text.
    pub fn substitute<F>(text: &str, arguments: &[SqlArgument], parameter: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        let mut bits: Vec<SqlBit> = vec![SqlBit::Text(text.to_string())];
        for arg in arguments.iter().filter(|a| a.is_collection) {
            let placeholder = format!("{{{}}}", arg.name);
            let mut split = Vec::new();
            for bit in bits {
                match bit {
                    SqlBit::Text(t) => {
                        for (index, part) in t.split(placeholder.as_str()).enumerate() {
                            if index > 0 {
                                split.push(SqlBit::Collection(arg.clone()));
                            }
                            if !part.is_empty() {
                                split.push(SqlBit::Text(part.to_string()));
                            }
                        }
                    }
                    other => split.push(other),
                }
            }
            bits = split;
        }
        for bit in &mut bits {
            if let SqlBit::Text(t) = bit {
                for arg in arguments.iter().filter(|a| !a.is_collection) {
                    let placeholder = format!("{{{}}}", arg.name);
                    if t.contains(&placeholder) {
                        *t = t.replace(&placeholder, &parameter(&arg.name));
                    }
                }
            }
        }
        PreparedSql { bits }
    }

    pub fn bits(&self) -> &[SqlBit] {
        &self.bits
    }

    pub fn push_text(&mut self, text: impl AsRef<str>) {
        if let Some(SqlBit::Text(last)) = self.bits.last_mut() {
            last.push_str(text.as_ref());
        } else {
            self.bits.push(SqlBit::Text(text.as_ref().to_string()));
        }
    }

    pub fn push_prepared(&mut self, other: &PreparedSql) {
        for bit in &other.bits {
            match bit {
                SqlBit::Text(t) => self.push_text(t),
                SqlBit::Collection(arg) => self.bits.push(SqlBit::Collection(arg.clone())),
            }
        }
    }

    /// True when a collection argument still needs call-time expansion.
    pub fn requires_expansion(&self) -> bool {
        self.bits.iter().any(|b| matches!(b, SqlBit::Collection(_)))
    }

    /// The full statement text, when no expansion point remains.
    pub fn text(&self) -> Option<String> {
        if self.requires_expansion() {
            return None;
        }
        let mut out = String::new();
        for bit in &self.bits {
            if let SqlBit::Text(t) = bit {
                out.push_str(t);
            }
        }
        Some(out)
    }
}

/// How one column obtains its value: SQL expression or generated code.
#[derive(Debug, Clone)]
pub enum ValueSource {
    /// A plain prepared-statement parameter carrying the caller's value.
    Parameter(String),
    Sql {
        sql: PreparedSql,
        arguments: Vec<SqlArgument>,
    },
    Code {
        code: String,
        arguments: Vec<SqlArgument>,
    },
}

impl ValueSource {
    /// Names of the caller-supplied arguments this source consumes.
    pub fn argument_names(&self) -> Vec<&str> {
        match self {
            ValueSource::Parameter(name) => vec![name.as_str()],
            ValueSource::Sql { arguments, .. } | ValueSource::Code { arguments, .. } => {
                arguments.iter().map(|a| a.name.as_str()).collect()
            }
        }
    }

    fn sql_text(&self, converter: &dyn PrepSqlConverter) -> PreparedSql {
        match self {
            ValueSource::Parameter(name) => PreparedSql::from_text(converter.sql_parameter(name)),
            ValueSource::Sql { sql, .. } => sql.clone(),
            // Code-produced values bind like a plain parameter; the language
            // layer computes the value before executing the statement.
            ValueSource::Code { .. } => PreparedSql::from_text("?"),
        }
    }
}

/// One column's value-production strategy for a write operation.
#[derive(Debug, Clone)]
pub struct InputValue {
    pub column_name: String,
    pub required: bool,
    /// Used when the caller supplied a value.
    pub specified: ValueSource,
    /// Used when the caller omitted the value; `None` means the column is
    /// simply left out (update) or must be supplied (create).
    pub default: Option<ValueSource>,
}

impl InputValue {
    /// All caller-supplied argument names, across both code paths.
    pub fn arguments(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .specified
            .argument_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        if let Some(default) = &self.default {
            for name in default.argument_names() {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }
}

fn value_source_for(
    value: &ValueTypeValue,
    converter: &dyn PrepSqlConverter,
) -> Result<ValueSource, DboGenError> {
    Ok(match value {
        ValueTypeValue::Str(s) => ValueSource::Sql {
            sql: PreparedSql::from_text(sql_string_literal(s)),
            arguments: Vec::new(),
        },
        ValueTypeValue::Numeric(n) => ValueSource::Sql {
            sql: PreparedSql::from_text(n.to_string()),
            arguments: Vec::new(),
        },
        ValueTypeValue::Boolean(b) => ValueSource::Sql {
            sql: PreparedSql::from_text(if *b { "1" } else { "0" }),
            arguments: Vec::new(),
        },
        ValueTypeValue::Date(d) => ValueSource::Sql {
            sql: PreparedSql::from_text(sql_string_literal(d)),
            arguments: Vec::new(),
        },
        ValueTypeValue::Computed(set) => ValueSource::Sql {
            sql: converter.prepare_sql(set)?,
            arguments: set.arguments().to_vec(),
        },
    })
}

/// Shared required/optional partitioning for Create and Update.
#[derive(Debug, Clone, Default)]
pub struct UpdateCreateQuery {
    /// In declaration order; required and optional interleaved.
    pub values: Vec<InputValue>,
}

impl UpdateCreateQuery {
    fn partition<'a>(
        columns: impl Iterator<Item = &'a ColumnAnalysis>,
        converter: &dyn PrepSqlConverter,
        for_update: bool,
    ) -> Result<Self, DboGenError> {
        let mut values = Vec::new();
        for column in columns {
            let constant = if for_update {
                &column.update_value
            } else {
                &column.create_value
            };
            let value = if let Some(sql_set) = constant.as_ref().and_then(|c| c.sql_set()) {
                // A constant create/update expression; the caller only
                // participates through the expression's own arguments.
                let source = ValueSource::Sql {
                    sql: converter.prepare_sql(sql_set)?,
                    arguments: sql_set.arguments().to_vec(),
                };
                let needs_args = !sql_set.arguments().is_empty();
                InputValue {
                    column_name: column.sql_name.clone(),
                    required: needs_args,
                    default: if needs_args { None } else { Some(source.clone()) },
                    specified: source,
                }
            } else {
                let specified = ValueSource::Parameter(column.sql_name.clone());
                let default = match &column.default_value {
                    Some(v) => Some(value_source_for(v, converter)?),
                    None => None,
                };
                // A default whose expression itself needs caller arguments
                // cannot stand in for a missing value; the column stays
                // required.
                let usable_default =
                    default.filter(|d| d.argument_names().is_empty());
                InputValue {
                    column_name: column.sql_name.clone(),
                    required: usable_default.is_none(),
                    // On update an omitted optional column is dropped from
                    // SET entirely rather than defaulted.
                    default: if for_update { None } else { usable_default },
                    specified,
                }
            };
            values.push(value);
        }
        Ok(UpdateCreateQuery { values })
    }

    pub fn required(&self) -> impl Iterator<Item = &InputValue> {
        self.values.iter().filter(|v| v.required)
    }

    pub fn optional(&self) -> impl Iterator<Item = &InputValue> {
        self.values.iter().filter(|v| !v.required)
    }
}

/// One "read by <columns>" operation derived from an index.
#[derive(Debug, Clone)]
pub struct ReadByQuery {
    pub name: String,
    pub columns: Vec<String>,
    pub sql: PreparedSql,
    pub count_sql: PreparedSql,
    pub arguments: Vec<SqlArgument>,
}

/// The assembled read operation: projection, joins, and restrictions.
#[derive(Debug, Clone)]
pub struct ReadQueryData {
    pub table_name: String,
    pub column_names: Vec<String>,
    pub select_columns: PreparedSql,
    pub from_clause: String,
    pub join_clause: String,
    pub where_clause: Option<PreparedSql>,
    pub arguments: Vec<SqlArgument>,
    pub sql: PreparedSql,
    pub count_sql: PreparedSql,
    pub read_by: Vec<ReadByQuery>,
}

impl ReadQueryData {
    pub fn build(
        model: &AnalysisModel,
        id: SchemaId,
        converter: &dyn PrepSqlConverter,
    ) -> Result<Self, DboGenError> {
        let analysis = model.analysis(id);
        let table = analysis.sql_name.clone();

        let mut column_names = Vec::new();
        let mut column_queries: Vec<PreparedSql> = Vec::new();
        let mut arguments: Vec<SqlArgument> = Vec::new();
        let mut where_ands: Vec<PreparedSql> = Vec::new();

        for column in analysis.columns_for_read() {
            let mut handled = false;
            if let Some(sql_set) = column.read_value.as_ref().and_then(|c| c.sql_set()) {
                let mut prepared = converter.prepare_sql(sql_set)?;
                prepared.push_text(format!(" AS {}", column.sql_name));
                column_queries.push(prepared);
                column_names.push(column.sql_name.clone());
                arguments.extend(sql_set.arguments().iter().cloned());
                handled = true;
            }
            if !handled {
                column_queries.push(PreparedSql::from_text(format!(
                    "{table}.{0} AS {0}",
                    column.sql_name
                )));
                column_names.push(column.sql_name.clone());
            }
            // Declared per-column read restrictions. Views are usually the
            // better tool, but the declaration is honored.
            for restriction in &column.query_restrictions {
                if let Some(sql_set) = restriction.sql_set() {
                    where_ands.push(converter.prepare_sql(sql_set)?);
                    arguments.extend(sql_set.arguments().iter().cloned());
                }
            }
        }

        let mut join_clause = String::new();
        let mut join_index = 0;
        for fk in analysis.foreign_keys() {
            if !fk.pull {
                continue;
            }
            join_index += 1;
            let alias = format!("k{join_index}");
            // A requested pull cannot proceed without the remote binding.
            let remote_id = fk.remote.ok_or_else(|| DboGenError::UnresolvedReference {
                table: table.clone(),
                column: fk.column_name.clone(),
                target: fk.fk_table_name.clone(),
            })?;
            let nullable = analysis
                .get_column_analysis(&fk.column_name)
                .map(|c| c.is_nullable)
                .unwrap_or(true);
            join_clause.push_str(if nullable {
                " LEFT OUTER JOIN "
            } else {
                " INNER JOIN "
            });
            join_clause.push_str(&format!(
                "{remote} {alias} ON {alias}.{remote_col} = {table}.{local_col}",
                remote = fk.fk_table_name,
                remote_col = fk.fk_column_name,
                local_col = fk.column_name,
            ));
            for remote_column in model.schema(remote_id).columns() {
                // Flattened with a table prefix to keep names collision-free.
                let query_name = format!("{}__{}", fk.fk_table_name, remote_column.name);
                column_queries.push(PreparedSql::from_text(format!(
                    "{alias}.{} AS {query_name}",
                    remote_column.name
                )));
                column_names.push(query_name);
            }
        }

        let mut select_columns = PreparedSql::new();
        for (index, piece) in column_queries.iter().enumerate() {
            if index > 0 {
                select_columns.push_text(",");
            }
            select_columns.push_prepared(piece);
        }

        let from_clause = format!(" FROM {table}{join_clause}");
        let where_clause = if where_ands.is_empty() {
            None
        } else {
            let mut w = PreparedSql::new();
            for (index, and) in where_ands.iter().enumerate() {
                if index > 0 {
                    w.push_text(" AND ");
                }
                w.push_prepared(and);
            }
            Some(w)
        };

        let mut sql = PreparedSql::from_text("SELECT ");
        sql.push_prepared(&select_columns);
        sql.push_text(&from_clause);
        let mut count_sql = PreparedSql::from_text(format!("SELECT COUNT(*){from_clause}"));
        if let Some(w) = &where_clause {
            sql.push_text(" WHERE ");
            sql.push_prepared(w);
            count_sql.push_text(" WHERE ");
            count_sql.push_prepared(w);
        }

        let mut read_by = Vec::new();
        for columns in analysis.get_selectable_column_sets() {
            let mut by_where = String::new();
            let mut by_arguments = Vec::new();
            for (index, column_name) in columns.iter().enumerate() {
                if index > 0 {
                    by_where.push_str(" AND ");
                }
                by_where.push_str(&format!(
                    "{table}.{column_name} = {}",
                    converter.sql_parameter(column_name)
                ));
                // Arguments carry the basic tag, not the SQL column type,
                // matching declared where-clause arguments.
                let basic_type = analysis
                    .get_column_analysis(column_name)
                    .map(|c| basic_value_type(&c.value_type))
                    .unwrap_or("str");
                by_arguments.push(SqlArgument::new(column_name.clone(), basic_type, false));
            }
            let connector = if where_clause.is_some() { " AND " } else { " WHERE " };
            let mut by_sql = sql.clone();
            by_sql.push_text(connector);
            by_sql.push_text(&by_where);
            let mut by_count = count_sql.clone();
            by_count.push_text(connector);
            by_count.push_text(&by_where);
            read_by.push(ReadByQuery {
                name: columns.join("_"),
                columns,
                sql: by_sql,
                count_sql: by_count,
                arguments: by_arguments,
            });
        }

        Ok(ReadQueryData {
            table_name: table,
            column_names,
            select_columns,
            from_clause,
            join_clause,
            where_clause,
            arguments,
            sql,
            count_sql,
            read_by,
        })
    }

    pub fn has_join(&self) -> bool {
        !self.join_clause.is_empty()
    }
}

/// The assembled insert operation, with an optional upsert variant.
#[derive(Debug, Clone)]
pub struct CreateQuery {
    pub table_name: String,
    pub values: UpdateCreateQuery,
    /// Single server-assigned column the caller reads back after insert.
    pub auto_generated_column: Option<String>,
    pub sql: PreparedSql,
    /// Only offered when a stable (non-auto-generated) unique key exists.
    pub upsert_sql: Option<PreparedSql>,
}

impl CreateQuery {
    pub fn build(
        model: &AnalysisModel,
        id: SchemaId,
        converter: &dyn PrepSqlConverter,
    ) -> Result<Self, DboGenError> {
        let analysis = model.analysis(id);
        let table = analysis.sql_name.clone();

        let mut auto_generated_column = None;
        for column in &analysis.columns {
            if column.auto_gen {
                if auto_generated_column.is_some() {
                    return Err(DboGenError::structural(format!(
                        "{table}: more than one auto-generated column"
                    )));
                }
                auto_generated_column = Some(column.sql_name.clone());
            }
        }

        let pk_names: HashSet<String> = analysis
            .primary_key_columns()
            .iter()
            .map(|c| c.sql_name.clone())
            .collect();

        // Auto-generated values are server-assigned; a caller-supplied key
        // column is insert input like any other.
        let values = UpdateCreateQuery::partition(analysis.columns_for_create(), converter, false)?;

        let mut sql = PreparedSql::from_text(format!("INSERT INTO {table} ("));
        let names: Vec<&str> = values.values.iter().map(|v| v.column_name.as_str()).collect();
        sql.push_text(names.join(","));
        sql.push_text(") VALUES (");
        for (index, value) in values.values.iter().enumerate() {
            if index > 0 {
                sql.push_text(",");
            }
            sql.push_prepared(&value.specified.sql_text(converter));
        }
        sql.push_text(")");

        let mut upsert_sql = None;
        if analysis.has_stable_unique_key() {
            let mut key_columns: HashSet<String> = pk_names.clone();
            for column in &analysis.columns {
                if column.is_unique {
                    key_columns.insert(column.sql_name.clone());
                }
            }
            for set in &analysis.top.unique_sets {
                key_columns.extend(set.iter().cloned());
            }
            let non_key: Vec<&InputValue> = values
                .values
                .iter()
                .filter(|v| !key_columns.contains(&v.column_name))
                .collect();
            if !non_key.is_empty() {
                let mut upsert = sql.clone();
                upsert.push_text(" ON DUPLICATE KEY UPDATE ");
                for (index, value) in non_key.iter().enumerate() {
                    if index > 0 {
                        upsert.push_text(",");
                    }
                    upsert.push_text(format!("{} = ", value.column_name));
                    upsert.push_prepared(&value.specified.sql_text(converter));
                }
                upsert_sql = Some(upsert);
            }
        }

        Ok(CreateQuery {
            table_name: table,
            values,
            auto_generated_column,
            sql,
            upsert_sql,
        })
    }
}

/// The assembled update operation: SET assignments keyed by the primary key.
#[derive(Debug, Clone)]
pub struct UpdateQuery {
    pub table_name: String,
    /// Always required, always the WHERE predicate; never defaulted.
    pub primary_keys: Vec<InputValue>,
    pub values: UpdateCreateQuery,
    pub set_assignments: Vec<(String, PreparedSql)>,
    pub where_clause: String,
    pub sql: PreparedSql,
}

impl UpdateQuery {
    /// Returns `None` for a table with no assignable columns (a key-only
    /// join table); there is nothing a SET list could name.
    pub fn build(
        model: &AnalysisModel,
        id: SchemaId,
        converter: &dyn PrepSqlConverter,
    ) -> Result<Option<Self>, DboGenError> {
        let analysis = model.analysis(id);
        let table = analysis.sql_name.clone();

        let pk_columns = analysis.primary_key_columns();
        if pk_columns.is_empty() {
            return Err(DboGenError::structural(format!(
                "cannot update {table} without a primary key"
            )));
        }
        let pk_names: HashSet<String> =
            pk_columns.iter().map(|c| c.sql_name.clone()).collect();
        let primary_keys: Vec<InputValue> = pk_columns
            .iter()
            .map(|c| InputValue {
                column_name: c.sql_name.clone(),
                required: true,
                specified: ValueSource::Parameter(c.sql_name.clone()),
                default: None,
            })
            .collect();

        let values = UpdateCreateQuery::partition(
            analysis
                .columns_for_update()
                .filter(|c| !c.auto_gen && !pk_names.contains(&c.sql_name)),
            converter,
            true,
        )?;
        if values.values.is_empty() {
            return Ok(None);
        }

        let set_assignments: Vec<(String, PreparedSql)> = values
            .values
            .iter()
            .map(|v| {
                let mut assignment = PreparedSql::from_text(format!("{} = ", v.column_name));
                assignment.push_prepared(&v.specified.sql_text(converter));
                (v.column_name.clone(), assignment)
            })
            .collect();

        let where_clause = primary_keys
            .iter()
            .map(|pk| format!("{} = {}", pk.column_name, converter.sql_parameter(&pk.column_name)))
            .collect::<Vec<_>>()
            .join(" AND ");

        let mut sql = PreparedSql::from_text(format!("UPDATE {table} SET "));
        for (index, (_, assignment)) in set_assignments.iter().enumerate() {
            if index > 0 {
                sql.push_text(",");
            }
            sql.push_prepared(assignment);
        }
        sql.push_text(format!(" WHERE {where_clause}"));

        Ok(Some(UpdateQuery {
            table_name: table,
            primary_keys,
            values,
            set_assignments,
            where_clause,
            sql,
        }))
    }
}

/// The assembled delete operation.
#[derive(Debug, Clone)]
pub struct DeleteQuery {
    pub table_name: String,
    pub primary_keys: Vec<InputValue>,
    pub sql: PreparedSql,
}

impl DeleteQuery {
    pub fn build(
        model: &AnalysisModel,
        id: SchemaId,
        converter: &dyn PrepSqlConverter,
    ) -> Result<Self, DboGenError> {
        let analysis = model.analysis(id);
        let table = analysis.sql_name.clone();

        let pk_columns = analysis.primary_key_columns();
        if pk_columns.is_empty() {
            return Err(DboGenError::structural(format!(
                "cannot delete from {table} without a primary key"
            )));
        }
        let primary_keys: Vec<InputValue> = pk_columns
            .iter()
            .map(|c| InputValue {
                column_name: c.sql_name.clone(),
                required: true,
                specified: ValueSource::Parameter(c.sql_name.clone()),
                default: None,
            })
            .collect();
        let where_clause = primary_keys
            .iter()
            .map(|pk| format!("{} = {}", pk.column_name, converter.sql_parameter(&pk.column_name)))
            .collect::<Vec<_>>()
            .join(" AND ");
        let sql = PreparedSql::from_text(format!("DELETE FROM {table} WHERE {where_clause}"));

        Ok(DeleteQuery {
            table_name: table,
            primary_keys,
            sql,
        })
    }
}

/// A declared ad-hoc query, prepared for the target platform.
#[derive(Debug, Clone)]
pub struct ExtendedSqlQuery {
    pub name: String,
    pub sql_type: ExtendedSqlType,
    pub sql: PreparedSql,
    /// Wrapper pairs only: the SQL run after the wrapped action.
    pub post_sql: Option<PreparedSql>,
    pub arguments: Vec<SqlArgument>,
}

impl ExtendedSqlQuery {
    pub fn build(
        extended: &ExtendedSql,
        converter: &dyn PrepSqlConverter,
    ) -> Result<Self, DboGenError> {
        let sql = converter.prepare_sql(&extended.sql)?;
        let post_sql = match &extended.post_sql {
            Some(set) => Some(converter.prepare_sql(set)?),
            None => None,
        };
        let mut arguments = extended.sql.arguments().to_vec();
        if let Some(post) = &extended.post_sql {
            for arg in post.arguments() {
                if !arguments.iter().any(|a| a.name == arg.name) {
                    arguments.push(arg.clone());
                }
            }
        }
        Ok(ExtendedSqlQuery {
            name: extended.name.clone(),
            sql_type: extended.sql_type,
            sql,
            post_sql,
            arguments,
        })
    }

    pub fn is_wrapper(&self) -> bool {
        self.sql_type == ExtendedSqlType::Wrapper
    }
}

/// A named optional filter, prepared for the target platform.
#[derive(Debug, Clone)]
pub struct WhereClauseQuery {
    pub name: String,
    pub sql: PreparedSql,
    pub arguments: Vec<SqlArgument>,
}

impl WhereClauseQuery {
    pub fn build(
        clause: &WhereClause,
        converter: &dyn PrepSqlConverter,
    ) -> Result<Self, DboGenError> {
        Ok(WhereClauseQuery {
            name: clause.name.clone(),
            sql: converter.prepare_sql(&clause.sql)?,
            arguments: clause.sql.arguments().to_vec(),
        })
    }
}

/// Every generated operation for one table or view.
#[derive(Debug, Clone)]
pub struct QueryBundle {
    pub schema_name: String,
    pub is_read_only: bool,
    pub read: ReadQueryData,
    pub create: Option<CreateQuery>,
    pub update: Option<UpdateQuery>,
    pub delete: Option<DeleteQuery>,
    pub extended_sql: Vec<ExtendedSqlQuery>,
    pub where_clauses: Vec<WhereClauseQuery>,
}

impl QueryBundle {
    pub fn build(
        model: &AnalysisModel,
        id: SchemaId,
        converter: &dyn PrepSqlConverter,
    ) -> Result<Self, DboGenError> {
        let analysis = model.analysis(id);
        let is_read_only = analysis.is_read_only;
        let schema_name = analysis.sql_name.clone();

        let read = ReadQueryData::build(model, id, converter)?;
        let (create, update, delete) = if is_read_only {
            (None, None, None)
        } else {
            (
                Some(CreateQuery::build(model, id, converter)?),
                UpdateQuery::build(model, id, converter)?,
                Some(DeleteQuery::build(model, id, converter)?),
            )
        };

        let schema = model.schema(id);
        let extended_sql = schema
            .extended_sql()
            .iter()
            .map(|e| ExtendedSqlQuery::build(e, converter))
            .collect::<Result<Vec<_>, _>>()?;
        let where_clauses = schema
            .where_clauses()
            .iter()
            .map(|w| WhereClauseQuery::build(w, converter))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(QueryBundle {
            schema_name,
            is_read_only,
            read,
            create,
            update,
            delete,
            extended_sql,
            where_clauses,
        })
    }
}
