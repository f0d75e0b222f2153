//! Format-independent schema parsing.
//!
//! Every format front-end (JSON, YAML, XML) reduces its file to one generic
//! nested value — maps, lists, and scalars — and hands it here. This module
//! never sees file syntax.
//!
//! Key spellings are forgiving: `schema-name`, `schema name`, `schema_name`,
//! and `schemaName`-style variants all normalize to the same key. Unknown
//! keys are a hard error, except the advisory channel: `comment` is kept,
//! `warning` and `note` are collected as diagnostics, and `error` always
//! aborts the parse.

use serde_json::{Map, Value};

use crate::error::{DboGenError, Diagnostic};
use crate::model::{
    Change, ChangeType, Column, Constraint, ConstraintCore, ConstraintDetails, ExtendedSql,
    ExtendedSqlType, ForeignKeyDetails, IndexDetails, LanguageSet, LanguageString, OrderTracker,
    SchemaObject, SchemaObjectType, SqlArgument, SqlChange, SqlSet, SqlString, SqlSyntax, Table,
    ValueTypeValue, View, WhereClause,
};
use crate::util::normalize_key;

/// One top-level item produced from a schema file.
#[derive(Debug)]
pub enum ParsedItem {
    Object(SchemaObject),
    Change(Change),
}

/// Parses one file's canonical value into schema model objects.
pub struct DictParser<'a> {
    tracker: OrderTracker,
    diagnostics: &'a mut Vec<Diagnostic>,
}

type KeyVal<'v> = (String, &'v Value);

impl<'a> DictParser<'a> {
    /// `source_index` is the file's position in the version's sorted file
    /// list; it keeps generation deterministic across formats.
    pub fn new(source_index: usize, diagnostics: &'a mut Vec<Diagnostic>) -> Self {
        DictParser {
            tracker: OrderTracker::new(source_index),
            diagnostics,
        }
    }

    /// Parse the top level of one schema file.
    pub fn parse(&mut self, value: &Value) -> Result<Vec<ParsedItem>, DboGenError> {
        let map = as_map(value, "schema file")?;
        let mut ret = Vec::new();
        for (key, val) in normalized_entries(map) {
            match key.as_str() {
                "table" => {
                    for item in one_or_many(val) {
                        ret.push(ParsedItem::Object(SchemaObject::Table(
                            self.parse_table(item)?,
                        )));
                    }
                }
                "view" => {
                    for item in one_or_many(val) {
                        ret.push(ParsedItem::Object(SchemaObject::View(
                            self.parse_view(item)?,
                        )));
                    }
                }
                "tables" => {
                    for item in unwrap_list(val, "table")? {
                        ret.push(ParsedItem::Object(SchemaObject::Table(
                            self.parse_table(item)?,
                        )));
                    }
                }
                "views" => {
                    for item in unwrap_list(val, "view")? {
                        ret.push(ParsedItem::Object(SchemaObject::View(
                            self.parse_view(item)?,
                        )));
                    }
                }
                "procedure" | "procedures" => {
                    return Err(DboGenError::structural(
                        "procedure schema objects are not implemented",
                    ));
                }
                "sequence" | "sequences" => {
                    return Err(DboGenError::structural(
                        "sequence schema objects are not implemented",
                    ));
                }
                "change" => {
                    for item in one_or_many(val) {
                        ret.push(ParsedItem::Change(self.parse_top_change(item)?));
                    }
                }
                "changes" => {
                    for item in as_list(val, "changes")? {
                        ret.push(ParsedItem::Change(self.parse_top_change(item)?));
                    }
                }
                _ => self.common_keyval(&key, val, "schema file")?,
            }
        }
        Ok(ret)
    }

    fn parse_table(&mut self, value: &Value) -> Result<Table, DboGenError> {
        let map = as_map(value, "table")?;
        let mut order = self.tracker.next(0);
        let mut comment = None;
        let mut catalog_name = None;
        let mut schema_name = None;
        let mut table_name = None;
        let mut table_space = None;
        let mut columns = Vec::new();
        let mut constraints = Vec::new();
        let mut where_clauses = Vec::new();
        let mut extended_sql = Vec::new();
        let mut changes = Vec::new();

        for (key, val) in normalized_entries(map) {
            match key.as_str() {
                "comment" => comment = Some(scalar_string(val, "table comment")?),
                "order" => order.seq = as_usize(val, "table order")?,
                "catalog" | "catalogname" => {
                    catalog_name = Some(scalar_string(val, "catalog name")?)
                }
                "schema" | "schemaname" => schema_name = Some(scalar_string(val, "schema name")?),
                "name" | "tablename" => table_name = Some(scalar_string(val, "table name")?),
                "space" | "tablespace" => table_space = Some(scalar_string(val, "table space")?),
                "column" => {
                    for item in one_or_many(val) {
                        columns.push(self.parse_column(item)?);
                    }
                }
                "columns" => {
                    for item in as_list(val, "columns")? {
                        columns.push(self.parse_column(item)?);
                    }
                }
                "constraint" => {
                    for item in one_or_many(val) {
                        constraints.push(self.parse_constraint(item)?);
                    }
                }
                "constraints" => {
                    for item in as_list(val, "constraints")? {
                        constraints.push(self.parse_constraint(item)?);
                    }
                }
                "whereclause" => {
                    for item in one_or_many(val) {
                        where_clauses.push(self.parse_where_clause(item)?);
                    }
                }
                "whereclauses" => {
                    for item in as_list(val, "where clauses")? {
                        where_clauses.push(self.parse_where_clause(item)?);
                    }
                }
                "extendedsql" => {
                    for item in one_or_many(val) {
                        extended_sql.push(self.parse_extended_sql(item)?);
                    }
                }
                "change" => {
                    for item in one_or_many(val) {
                        changes.push(self.parse_inner_change(item, SchemaObjectType::Table)?);
                    }
                }
                "changes" => {
                    for item in as_list(val, "changes")? {
                        changes.push(self.parse_inner_change(item, SchemaObjectType::Table)?);
                    }
                }
                _ => self.common_keyval(&key, val, "table")?,
            }
        }

        let table_name = table_name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| DboGenError::structural("table requires a name"))?;
        Ok(Table {
            order,
            comment,
            catalog_name,
            schema_name,
            table_name,
            table_space,
            columns,
            constraints,
            where_clauses,
            extended_sql,
            changes,
        })
    }

    fn parse_view(&mut self, value: &Value) -> Result<View, DboGenError> {
        let map = as_map(value, "view")?;
        let mut order = self.tracker.next(0);
        let mut comment = None;
        let mut catalog_name = None;
        let mut replace_if_exists = true;
        let mut schema_name = None;
        let mut view_name = None;
        let mut select_query = None;
        let mut columns = Vec::new();
        let mut constraints = Vec::new();
        let mut where_clauses = Vec::new();
        let mut extended_sql = Vec::new();
        let mut changes = Vec::new();

        for (key, val) in normalized_entries(map) {
            match key.as_str() {
                "comment" => comment = Some(scalar_string(val, "view comment")?),
                "order" => order.seq = as_usize(val, "view order")?,
                "catalog" | "catalogname" => {
                    catalog_name = Some(scalar_string(val, "catalog name")?)
                }
                "schema" | "schemaname" => schema_name = Some(scalar_string(val, "schema name")?),
                "name" | "viewname" => view_name = Some(scalar_string(val, "view name")?),
                "replace" | "replaceifexists" => replace_if_exists = parse_boolean(val),
                "query" | "select" | "sql" => select_query = Some(self.parse_sql_set(val)?),
                "column" => {
                    for item in one_or_many(val) {
                        columns.push(self.parse_column(item)?);
                    }
                }
                "columns" => {
                    for item in as_list(val, "columns")? {
                        columns.push(self.parse_column(item)?);
                    }
                }
                "constraint" => {
                    for item in one_or_many(val) {
                        constraints.push(self.parse_constraint(item)?);
                    }
                }
                "constraints" => {
                    for item in as_list(val, "constraints")? {
                        constraints.push(self.parse_constraint(item)?);
                    }
                }
                "whereclause" => {
                    for item in one_or_many(val) {
                        where_clauses.push(self.parse_where_clause(item)?);
                    }
                }
                "whereclauses" => {
                    for item in as_list(val, "where clauses")? {
                        where_clauses.push(self.parse_where_clause(item)?);
                    }
                }
                "extendedsql" => {
                    for item in one_or_many(val) {
                        extended_sql.push(self.parse_extended_sql(item)?);
                    }
                }
                "change" => {
                    for item in one_or_many(val) {
                        changes.push(self.parse_inner_change(item, SchemaObjectType::View)?);
                    }
                }
                "changes" => {
                    for item in as_list(val, "changes")? {
                        changes.push(self.parse_inner_change(item, SchemaObjectType::View)?);
                    }
                }
                _ => self.common_keyval(&key, val, "view")?,
            }
        }

        let view_name = view_name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| DboGenError::structural("view requires a name"))?;
        let select_query = select_query
            .ok_or_else(|| DboGenError::structural(format!("view {view_name} requires a query")))?;
        Ok(View {
            order,
            comment,
            catalog_name,
            replace_if_exists,
            schema_name,
            view_name,
            select_query,
            columns,
            constraints,
            where_clauses,
            extended_sql,
            changes,
        })
    }

    fn parse_column(&mut self, value: &Value) -> Result<Column, DboGenError> {
        let map = as_map(value, "column")?;
        let mut order = self.tracker.next(1);
        let mut comment = None;
        let mut name = None;
        let mut value_type = None;
        let mut literal_value = None;
        let mut default_value = None;
        let mut auto_increment = false;
        let mut remarks = None;
        let mut before_column = None;
        let mut after_column = None;
        let mut position = None;
        let mut constraints = Vec::new();
        let mut changes = Vec::new();

        for (key, val) in normalized_entries(map) {
            match key.as_str() {
                "comment" => comment = Some(scalar_string(val, "column comment")?),
                "order" => order.seq = as_usize(val, "column order")?,
                "name" => name = Some(scalar_string(val, "column name")?),
                "type" => value_type = Some(scalar_string(val, "column type")?),
                "value" => literal_value = self.parse_value_type_value(val)?,
                "default" | "defaultvalue" => default_value = self.parse_value_type_value(val)?,
                "autoincrement" => auto_increment = parse_boolean(val),
                "remarks" => remarks = Some(scalar_string(val, "column remarks")?),
                "before" | "beforecolumn" => {
                    before_column = Some(scalar_string(val, "before column")?)
                }
                "after" | "aftercolumn" => after_column = Some(scalar_string(val, "after column")?),
                "position" => position = Some(as_usize(val, "column position")?),
                "constraint" => {
                    for item in one_or_many(val) {
                        constraints.push(self.parse_constraint(item)?);
                    }
                }
                "constraints" => {
                    for item in as_list(val, "constraints")? {
                        constraints.push(self.parse_constraint(item)?);
                    }
                }
                "change" => {
                    for item in one_or_many(val) {
                        changes.push(self.parse_inner_change(item, SchemaObjectType::Column)?);
                    }
                }
                "changes" => {
                    for item in as_list(val, "changes")? {
                        changes.push(self.parse_inner_change(item, SchemaObjectType::Column)?);
                    }
                }
                _ => self.common_keyval(&key, val, "column")?,
            }
        }

        let name = name.ok_or_else(|| DboGenError::structural("column requires a name"))?;
        let value_type =
            value_type.ok_or_else(|| DboGenError::structural("column requires a type"))?;
        Column::new(
            order,
            comment,
            name,
            value_type,
            literal_value,
            default_value,
            auto_increment,
            remarks,
            before_column,
            after_column,
            position,
            constraints,
            changes,
        )
    }

    fn parse_constraint(&mut self, value: &Value) -> Result<Constraint, DboGenError> {
        let map = as_map(value, "constraint")?;
        let mut order = self.tracker.next(2);
        let mut comment = None;
        let mut constraint_type = None;
        let mut column_names = Vec::new();
        let mut changes = Vec::new();
        let mut name = None;
        let mut sql = None;
        let mut code = None;
        let mut language = None;
        let mut arguments = Vec::new();

        // Typed detail fields
        let mut fk_table = None;
        let mut fk_column = None;
        let mut fk_match = None;
        let mut fk_on_delete = None;
        let mut fk_on_update = None;
        let mut fk_relationship = None;
        let mut fk_pull = None;
        let mut ix_using = None;
        let mut ix_option = None;

        for (key, val) in normalized_entries(map) {
            match key.as_str() {
                "comment" => comment = Some(scalar_string(val, "constraint comment")?),
                "order" => order.seq = as_usize(val, "constraint order")?,
                "type" => constraint_type = Some(scalar_string(val, "constraint type")?),
                "name" => name = Some(scalar_string(val, "constraint name")?),
                "columns" | "columnnames" => column_names = parse_name_list(val)?,
                "sql" | "dialects" => sql = Some(val),
                "code" => code = Some(val),
                "language" => language = Some(scalar_string(val, "constraint language")?),
                "argument" => {
                    for item in one_or_many(val) {
                        arguments.push(parse_argument(item)?);
                    }
                }
                "arguments" => {
                    for item in as_list(val, "constraint arguments")? {
                        arguments.push(parse_argument(item)?);
                    }
                }
                "table" => fk_table = Some(scalar_string(val, "foreign key table")?),
                "column" => fk_column = Some(scalar_string(val, "foreign key column")?),
                "match" => fk_match = Some(scalar_string(val, "foreign key match")?),
                "delete" | "ondelete" => {
                    fk_on_delete = Some(scalar_string(val, "foreign key on delete")?)
                }
                "update" | "onupdate" => {
                    fk_on_update = Some(scalar_string(val, "foreign key on update")?)
                }
                "relationship" => {
                    fk_relationship = Some(scalar_string(val, "foreign key relationship")?)
                }
                "pull" => fk_pull = Some(scalar_string(val, "foreign key pull")?),
                "using" => ix_using = Some(scalar_string(val, "index using")?),
                "option" => ix_option = Some(scalar_string(val, "index option")?),
                "change" => {
                    for item in one_or_many(val) {
                        changes.push(self.parse_inner_change(item, SchemaObjectType::Constraint)?);
                    }
                }
                "changes" => {
                    for item in as_list(val, "changes")? {
                        changes.push(self.parse_inner_change(item, SchemaObjectType::Constraint)?);
                    }
                }
                _ => self.common_keyval(&key, val, "constraint")?,
            }
        }

        let raw_type =
            constraint_type.ok_or_else(|| DboGenError::structural("constraint requires a type"))?;
        let normalized = crate::util::normalize_constraint_type(&raw_type);

        let details = if matches!(
            normalized.as_str(),
            "foreignkey" | "falseforeignkey" | "fakeforeignkey"
        ) {
            let table = fk_table.ok_or_else(|| {
                DboGenError::structural(format!("{normalized} constraint requires a table"))
            })?;
            let column = fk_column.ok_or_else(|| {
                DboGenError::structural(format!("{normalized} constraint requires a column"))
            })?;
            ConstraintDetails::ForeignKey(ForeignKeyDetails {
                table,
                column,
                match_type: fk_match,
                on_delete: fk_on_delete,
                on_update: fk_on_update,
                relationship: fk_relationship,
                pull: fk_pull,
            })
        } else if ix_using.is_some() || ix_option.is_some() {
            ConstraintDetails::Index(IndexDetails {
                using: ix_using,
                option: ix_option,
            })
        } else {
            ConstraintDetails::None
        };

        let core = ConstraintCore::new(order, comment, &raw_type, column_names, details, changes)?;

        match (sql, code, name) {
            (Some(_), Some(_), _) => Err(DboGenError::structural(format!(
                "constraint {normalized}: sql and code are mutually exclusive",
            ))),
            (Some(sql_val), None, None) => Ok(Constraint::Sql {
                core,
                sql: self.parse_sql_set_with_args(sql_val, arguments)?,
            }),
            (None, Some(code_val), None) => Ok(Constraint::Language {
                core,
                code: parse_language_set(code_val, language, arguments)?,
            }),
            (None, None, Some(name)) => Ok(Constraint::Named { core, name }),
            (None, None, None) => Ok(Constraint::Plain(core)),
            (Some(_), None, Some(_)) | (None, Some(_), Some(_)) => {
                Err(DboGenError::structural(format!(
                    "constraint {normalized}: a named constraint cannot carry sql or code",
                )))
            }
        }
    }

    fn parse_where_clause(&mut self, value: &Value) -> Result<WhereClause, DboGenError> {
        let map = as_map(value, "where clause")?;
        let mut name = None;
        let mut sql = None;
        let mut arguments = Vec::new();
        for (key, val) in normalized_entries(map) {
            match key.as_str() {
                "name" => name = Some(scalar_string(val, "where clause name")?),
                "sql" | "dialects" => sql = Some(val),
                "argument" => {
                    for item in one_or_many(val) {
                        arguments.push(parse_argument(item)?);
                    }
                }
                "arguments" => {
                    for item in as_list(val, "where clause arguments")? {
                        arguments.push(parse_argument(item)?);
                    }
                }
                _ => self.common_keyval(&key, val, "where clause")?,
            }
        }
        let name = name.ok_or_else(|| DboGenError::structural("where clause requires a name"))?;
        let sql = sql
            .ok_or_else(|| DboGenError::structural(format!("where clause {name} requires sql")))?;
        Ok(WhereClause {
            name,
            sql: self.parse_sql_set_with_args(sql, arguments)?,
        })
    }

    fn parse_extended_sql(&mut self, value: &Value) -> Result<ExtendedSql, DboGenError> {
        let map = as_map(value, "extended sql")?;
        let mut name = None;
        let mut sql_type = ExtendedSqlType::Query;
        let mut comment = None;
        let mut sql = None;
        let mut post_sql = None;
        let mut arguments = Vec::new();
        for (key, val) in normalized_entries(map) {
            match key.as_str() {
                "name" => name = Some(scalar_string(val, "extended sql name")?),
                "comment" => comment = Some(scalar_string(val, "extended sql comment")?),
                "type" => {
                    let tag = scalar_string(val, "extended sql type")?;
                    sql_type = match tag.trim().to_lowercase().as_str() {
                        "query" | "select" => ExtendedSqlType::Query,
                        "update" | "write" => ExtendedSqlType::Update,
                        "wrapper" => ExtendedSqlType::Wrapper,
                        other => {
                            return Err(DboGenError::structural(format!(
                                "unknown extended sql type: {other}"
                            )))
                        }
                    };
                }
                "sql" | "pre" | "presql" | "dialects" => sql = Some(val),
                "post" | "postsql" => post_sql = Some(val),
                "argument" => {
                    for item in one_or_many(val) {
                        arguments.push(parse_argument(item)?);
                    }
                }
                "arguments" => {
                    for item in as_list(val, "extended sql arguments")? {
                        arguments.push(parse_argument(item)?);
                    }
                }
                _ => self.common_keyval(&key, val, "extended sql")?,
            }
        }
        let name = name.ok_or_else(|| DboGenError::structural("extended sql requires a name"))?;
        let sql = sql
            .ok_or_else(|| DboGenError::structural(format!("extended sql {name} requires sql")))?;
        if post_sql.is_some() && sql_type != ExtendedSqlType::Wrapper {
            return Err(DboGenError::structural(format!(
                "extended sql {name}: post sql is only valid for wrappers"
            )));
        }
        let post_sql = post_sql
            .map(|v| self.parse_sql_set_with_args(v, Vec::new()))
            .transpose()?;
        Ok(ExtendedSql {
            name,
            sql_type,
            comment,
            sql: self.parse_sql_set_with_args(sql, arguments)?,
            post_sql,
        })
    }

    fn parse_top_change(&mut self, value: &Value) -> Result<Change, DboGenError> {
        let change = self.parse_change_fields(value, None)?;
        match change {
            Change::Sql(_) => Ok(change),
            Change::Basic { .. } => Err(DboGenError::structural(
                "only sql changes are supported at the top level",
            )),
        }
    }

    fn parse_inner_change(
        &mut self,
        value: &Value,
        object_type: SchemaObjectType,
    ) -> Result<Change, DboGenError> {
        self.parse_change_fields(value, Some(object_type))
    }

    fn parse_change_fields(
        &mut self,
        value: &Value,
        implied_type: Option<SchemaObjectType>,
    ) -> Result<Change, DboGenError> {
        let map = as_map(value, "change")?;
        let mut order = self.tracker.next(if implied_type.is_some() { 1 } else { 0 });
        let mut comment = None;
        let mut object_type = implied_type;
        let mut change_type = ChangeType::Sql;
        let mut sql = None;
        let mut platforms = Vec::new();

        for (key, val) in normalized_entries(map) {
            match key.as_str() {
                "comment" => comment = Some(scalar_string(val, "change comment")?),
                "order" => order.seq = as_usize(val, "change order")?,
                "schema" | "schematype" => {
                    let tag = scalar_string(val, "change schema type")?;
                    object_type = Some(SchemaObjectType::parse(&tag).ok_or_else(|| {
                        DboGenError::structural(format!("unknown schema object type: {tag}"))
                    })?);
                }
                "change" | "changetype" => {
                    let tag = scalar_string(val, "change type")?;
                    change_type = ChangeType::parse(&tag).ok_or_else(|| {
                        DboGenError::structural(format!("unknown change type: {tag}"))
                    })?;
                }
                "sql" => sql = Some(scalar_string(val, "change sql")?),
                "platforms" | "dialects" => platforms = parse_name_list(val)?,
                _ => self.common_keyval(&key, val, "change")?,
            }
        }

        let object_type =
            object_type.ok_or_else(|| DboGenError::structural("change requires a schema type"))?;
        if change_type == ChangeType::Sql {
            let sql = sql
                .filter(|s| !s.is_empty())
                .ok_or_else(|| DboGenError::structural("sql change requires sql text"))?;
            Ok(Change::Sql(SqlChange {
                order,
                comment,
                object_type,
                sql,
                platforms,
            }))
        } else {
            Ok(Change::Basic {
                order,
                comment,
                object_type,
                change_type,
            })
        }
    }

    fn parse_value_type_value(
        &mut self,
        value: &Value,
    ) -> Result<Option<ValueTypeValue>, DboGenError> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(ValueTypeValue::Str(s.clone()))),
            Value::Number(n) => Ok(Some(ValueTypeValue::Numeric(n.as_f64().ok_or_else(
                || DboGenError::structural("unrepresentable numeric value"),
            )?))),
            Value::Bool(b) => Ok(Some(ValueTypeValue::Boolean(*b))),
            Value::Object(map) => {
                let mut value_type = None;
                let mut inner = None;
                for (key, val) in normalized_entries(map) {
                    match key.as_str() {
                        "type" => value_type = Some(scalar_string(val, "value type")?),
                        "value" => inner = Some(val),
                        _ => self.common_keyval(&key, val, "value")?,
                    }
                }
                let value_type =
                    value_type.ok_or_else(|| DboGenError::structural("value requires a type"))?;
                let inner =
                    inner.ok_or_else(|| DboGenError::structural("value requires a value"))?;
                let tag = value_type.trim().to_lowercase();
                if tag == "int"
                    || tag == "float"
                    || tag == "double"
                    || tag.starts_with("numeric")
                {
                    let n = match inner {
                        Value::Number(n) => n.as_f64().ok_or_else(|| {
                            DboGenError::structural("unrepresentable numeric value")
                        })?,
                        Value::String(s) => s.trim().parse().map_err(|_| {
                            DboGenError::structural(format!("bad numeric value: {s}"))
                        })?,
                        other => {
                            return Err(DboGenError::structural(format!(
                                "bad numeric value: {other}"
                            )))
                        }
                    };
                    Ok(Some(ValueTypeValue::Numeric(n)))
                } else if tag == "bool" || tag == "boolean" {
                    Ok(Some(ValueTypeValue::Boolean(parse_boolean(inner))))
                } else if tag == "date" || tag == "time" || tag == "datetime" {
                    Ok(Some(ValueTypeValue::Date(scalar_string(
                        inner,
                        "date value",
                    )?)))
                } else if tag == "computed" || tag == "sql" {
                    Ok(Some(ValueTypeValue::Computed(self.parse_sql_set(inner)?)))
                } else if tag == "str" || tag == "string" || tag == "char" || tag == "varchar" {
                    Ok(Some(ValueTypeValue::Str(scalar_string(
                        inner,
                        "string value",
                    )?)))
                } else {
                    Err(DboGenError::structural(format!(
                        "unknown value type: {value_type}"
                    )))
                }
            }
            other => Err(DboGenError::structural(format!("bad value: {other}"))),
        }
    }

    fn parse_sql_set(&mut self, value: &Value) -> Result<SqlSet, DboGenError> {
        self.parse_sql_set_with_args(value, Vec::new())
    }

    /// A sql value is either a bare string (one universal variant), a single
    /// dialect map, or a list of dialect maps.
    fn parse_sql_set_with_args(
        &mut self,
        value: &Value,
        arguments: Vec<SqlArgument>,
    ) -> Result<SqlSet, DboGenError> {
        let variants = match value {
            Value::String(s) => vec![SqlString::new(s.clone(), SqlSyntax::Universal, Vec::new())],
            Value::Object(_) => vec![self.parse_sql_string(value)?],
            Value::Array(items) => items
                .iter()
                .map(|item| self.parse_sql_string(item))
                .collect::<Result<Vec<_>, _>>()?,
            other => {
                return Err(DboGenError::structural(format!("bad sql value: {other}")));
            }
        };
        SqlSet::new(variants, arguments)
    }

    fn parse_sql_string(&mut self, value: &Value) -> Result<SqlString, DboGenError> {
        let map = as_map(value, "sql dialect")?;
        let mut sql = None;
        let mut syntax = SqlSyntax::Universal;
        let mut platforms = Vec::new();
        for (key, val) in normalized_entries(map) {
            match key.as_str() {
                "sql" => sql = Some(scalar_string(val, "sql text")?),
                "syntax" => {
                    let tag = scalar_string(val, "sql syntax")?;
                    syntax = match tag.trim().to_lowercase().as_str() {
                        "native" => SqlSyntax::Native,
                        "universal" => SqlSyntax::Universal,
                        other => {
                            return Err(DboGenError::structural(format!(
                                "unknown sql syntax: {other}"
                            )))
                        }
                    };
                }
                "platforms" | "platform" | "dialects" | "dialect" => {
                    platforms = parse_name_list(val)?
                }
                _ => self.common_keyval(&key, val, "sql dialect")?,
            }
        }
        let sql = sql.ok_or_else(|| DboGenError::structural("sql dialect requires sql text"))?;
        Ok(SqlString::new(sql, syntax, platforms))
    }

    /// `error` aborts; `warning`/`note` become diagnostics; anything else is
    /// an unknown key.
    fn common_keyval(&mut self, key: &str, val: &Value, context: &str) -> Result<(), DboGenError> {
        match key {
            "error" => Err(DboGenError::UserError {
                message: scalar_string(val, "error directive")?,
            }),
            "warning" => {
                self.diagnostics
                    .push(Diagnostic::warning(scalar_string(val, "warning")?));
                Ok(())
            }
            "note" => {
                self.diagnostics
                    .push(Diagnostic::note(scalar_string(val, "note")?));
                Ok(())
            }
            _ => Err(DboGenError::UnknownKey {
                key: key.to_string(),
                context: context.to_string(),
            }),
        }
    }
}

fn parse_language_set(
    value: &Value,
    language: Option<String>,
    arguments: Vec<SqlArgument>,
) -> Result<LanguageSet, DboGenError> {
    let variants = match value {
        Value::String(code) => {
            let language = language
                .ok_or_else(|| DboGenError::structural("code string requires a language key"))?;
            vec![LanguageString {
                language,
                code: code.clone(),
            }]
        }
        Value::Object(map) => map
            .iter()
            .map(|(lang, code)| {
                Ok(LanguageString {
                    language: lang.clone(),
                    code: scalar_string(code, "language code")?,
                })
            })
            .collect::<Result<Vec<_>, DboGenError>>()?,
        other => {
            return Err(DboGenError::structural(format!("bad code value: {other}")));
        }
    };
    LanguageSet::new(variants, arguments)
}

fn parse_argument(value: &Value) -> Result<SqlArgument, DboGenError> {
    match value {
        Value::String(name) => Ok(SqlArgument::new(name.clone(), "str", false)),
        Value::Object(map) => {
            let mut name = None;
            let mut basic_type = "str".to_string();
            let mut is_collection = false;
            for (key, val) in normalized_entries(map) {
                match key.as_str() {
                    "name" => name = Some(scalar_string(val, "argument name")?),
                    "type" => basic_type = scalar_string(val, "argument type")?,
                    "collection" | "iscollection" => is_collection = parse_boolean(val),
                    other => {
                        return Err(DboGenError::UnknownKey {
                            key: other.to_string(),
                            context: "argument".to_string(),
                        })
                    }
                }
            }
            let name = name.ok_or_else(|| DboGenError::structural("argument requires a name"))?;
            Ok(SqlArgument::new(name, basic_type, is_collection))
        }
        other => Err(DboGenError::structural(format!(
            "bad argument value: {other}"
        ))),
    }
}

/// Singular keys accept one value or a list of them; the XML front-end
/// collects repeated elements into a list under the singular name.
fn one_or_many(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

/// A list of names: either a list of strings or one comma-separated string.
fn parse_name_list(value: &Value) -> Result<Vec<String>, DboGenError> {
    match value {
        Value::String(s) => Ok(s
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect()),
        Value::Array(items) => items
            .iter()
            .map(|item| scalar_string(item, "name list entry"))
            .collect(),
        other => Err(DboGenError::structural(format!("bad name list: {other}"))),
    }
}

/// Entries of a map with normalized keys, in declaration order.
fn normalized_entries(map: &Map<String, Value>) -> impl Iterator<Item = KeyVal<'_>> {
    map.iter().map(|(k, v)| (normalize_key(k), v))
}

/// List items may be single-key wrapper maps (`{"table": {...}}`) or the
/// object maps themselves.
fn unwrap_list<'v>(value: &'v Value, wrapper_key: &str) -> Result<Vec<&'v Value>, DboGenError> {
    let items = as_list(value, wrapper_key)?;
    let mut ret = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Object(map) if map.len() == 1 => {
                let (key, inner) = map.iter().next().expect("len checked");
                if normalize_key(key) == wrapper_key {
                    ret.push(inner);
                } else {
                    ret.push(item);
                }
            }
            _ => ret.push(item),
        }
    }
    Ok(ret)
}

fn as_map<'v>(value: &'v Value, context: &str) -> Result<&'v Map<String, Value>, DboGenError> {
    value
        .as_object()
        .ok_or_else(|| DboGenError::structural(format!("{context} must be a map")))
}

fn as_list<'v>(value: &'v Value, context: &str) -> Result<&'v Vec<Value>, DboGenError> {
    value
        .as_array()
        .ok_or_else(|| DboGenError::structural(format!("{context} must be a list")))
}

fn as_usize(value: &Value, context: &str) -> Result<usize, DboGenError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| DboGenError::structural(format!("{context} must be a non-negative int"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| DboGenError::structural(format!("{context} must be a non-negative int"))),
        _ => Err(DboGenError::structural(format!(
            "{context} must be a non-negative int"
        ))),
    }
}

/// Scalars are stringified the way the original loaders did: strings kept,
/// numbers and booleans rendered.
fn scalar_string(value: &Value, context: &str) -> Result<String, DboGenError> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(DboGenError::structural(format!(
            "{context} must be a scalar"
        ))),
    }
}

fn parse_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => {
            let s = s.trim().to_lowercase();
            s == "1" || s == "true" || s == "on" || s == "yes"
        }
        _ => false,
    }
}
