//! Conversion of model SQL fragments into prepared-statement text.

use crate::error::DboGenError;
use crate::model::{LanguageSet, SqlSet};

use super::sql::PreparedSql;

/// Rewrites the model's `{argName}` placeholders into the parameter syntax
/// of one driver, for one set of platforms.
///
/// Simple arguments are substituted in place; collection arguments cannot be
/// bound as one parameter and are left as expansion points in the returned
/// [`PreparedSql`].
pub trait PrepSqlConverter {
    /// Target object language the generated artifacts are written in.
    fn language(&self) -> &str;

    /// SQL platforms this converter selects dialect variants for.
    fn platforms(&self) -> &[String];

    /// One named prepared-statement parameter.
    fn sql_parameter(&self, name: &str) -> String {
        format!(":{name}")
    }

    /// Select the dialect variant for this converter's platforms and
    /// substitute its placeholders.
    fn prepare_sql(&self, set: &SqlSet) -> Result<PreparedSql, DboGenError> {
        let variant =
            set.get_for_platform(self.platforms())
                .ok_or_else(|| DboGenError::UnsupportedPlatform {
                    platforms: self.platforms().to_vec(),
                })?;
        Ok(PreparedSql::substitute(&variant.sql, set.arguments(), |name| {
            self.sql_parameter(name)
        }))
    }

    /// Select the code variant for this converter's language, with `{out}`
    /// rewritten to the receiving variable.
    fn generate_code(
        &self,
        output_variable: &str,
        code: &LanguageSet,
    ) -> Result<String, DboGenError> {
        let variant = code.get_for_language(self.language()).ok_or_else(|| {
            DboGenError::UnsupportedLanguage {
                language: self.language().to_string(),
            }
        })?;
        Ok(variant.code.replace("{out}", output_variable))
    }
}
