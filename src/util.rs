//! Shared utility helpers.

/// Normalize a constraint type tag so that spelling variants compare equal.
///
/// `primary_key`, `primary-key`, `Primary Key`, and `PrimaryKey` all
/// normalize to `primarykey`.
pub fn normalize_constraint_type(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Normalize a parser key: trimmed, lower-cased, with `-`, `_`, and spaces
/// collapsed so that `schema-name`, `schema name`, and `schema_name` match.
pub fn normalize_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Convert a snake_case schema identifier to a PascalCase code name.
pub fn pascal_case(schema_name: &str) -> String {
    let mut first = true;
    let mut ret = String::with_capacity(schema_name.len());
    for c in schema_name.chars() {
        if c == '_' {
            first = true;
        } else if first {
            ret.extend(c.to_uppercase());
            first = false;
        } else {
            ret.extend(c.to_lowercase());
        }
    }
    ret
}

/// Reduce a SQL column type to the basic type tag used by query arguments:
/// `int`, `float`, `bool`, `date`, or `str`. Length and precision
/// parameters are ignored; anything unrecognized is `str`.
pub fn basic_value_type(sql_type: &str) -> &'static str {
    let base = sql_type
        .split('(')
        .next()
        .unwrap_or(sql_type)
        .trim()
        .to_lowercase();
    match base.as_str() {
        "int" | "integer" | "tinyint" | "smallint" | "mediumint" | "bigint" | "bit"
        | "serial" => "int",
        "float" | "double" | "real" | "decimal" | "numeric" => "float",
        "bool" | "boolean" => "bool",
        "date" | "time" | "datetime" | "timestamp" | "year" => "date",
        _ => "str",
    }
}

/// Case-insensitive equality for platform and dialect tags.
#[inline]
pub fn eq_ci(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Quote a string as a SQL literal, doubling embedded quotes.
pub fn sql_string_literal(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}
