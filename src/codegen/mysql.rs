//! MySQL prepared-statement converter.

use super::converter::PrepSqlConverter;

/// Converter for the MySQL family of drivers: `:name` parameters, variants
/// selected for the `mysql` platform tag.
pub struct MySqlPrepSqlConverter {
    language: String,
    platforms: Vec<String>,
}

impl MySqlPrepSqlConverter {
    pub fn new(language: impl Into<String>) -> Self {
        MySqlPrepSqlConverter {
            language: language.into(),
            platforms: vec!["mysql".to_string()],
        }
    }
}

impl PrepSqlConverter for MySqlPrepSqlConverter {
    fn language(&self) -> &str {
        &self.language
    }

    fn platforms(&self) -> &[String] {
        &self.platforms
    }
}
