//! Driver for generating one output file per table or view.
//!
//! The language-specific parts live behind [`LanguageGenerator`]; the driver
//! owns section ordering, the overwrite check, and the single write.

use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::ColumnSetAnalysis;
use crate::error::DboGenError;
use crate::model::SchemaObject;

use super::converter::PrepSqlConverter;
use super::sql::{ExtendedSqlQuery, QueryBundle};

/// Everything a language generator needs to emit one file.
pub struct GenConfig<'a> {
    pub schema: &'a SchemaObject,
    pub analysis: &'a ColumnSetAnalysis,
    pub bundle: &'a QueryBundle,
    pub converter: &'a dyn PrepSqlConverter,
    pub output_dir: &'a Path,
    pub fail_if_file_exists: bool,
    pub line_separator: &'a str,
}

/// The language-specific side of file generation.
///
/// Every method returns source lines; the driver joins them with the
/// configured separator.
pub trait LanguageGenerator {
    /// Output filename, relative to the output directory.
    fn generate_filename(&self, config: &GenConfig) -> String;

    fn generate_header(&self, config: &GenConfig) -> Vec<String>;

    fn generate_read(&self, config: &GenConfig) -> Vec<String>;

    fn generate_create(&self, config: &GenConfig) -> Vec<String>;

    fn generate_update(&self, config: &GenConfig) -> Vec<String>;

    fn generate_delete(&self, config: &GenConfig) -> Vec<String>;

    fn generate_extended_sql(&self, config: &GenConfig, extended: &ExtendedSqlQuery)
        -> Vec<String>;

    fn generate_extended_sql_wrapper(
        &self,
        config: &GenConfig,
        extended: &ExtendedSqlQuery,
    ) -> Vec<String>;

    fn generate_validations(&self, config: &GenConfig) -> Vec<String>;

    fn generate_footer(&self, config: &GenConfig) -> Vec<String>;
}

/// Generates the output file for one schema object.
pub struct FileGen<G: LanguageGenerator> {
    lang_gen: G,
}

impl<G: LanguageGenerator> FileGen<G> {
    pub fn new(lang_gen: G) -> Self {
        FileGen { lang_gen }
    }

    /// Assemble every section, then write once. A failing section or an
    /// existing target leaves nothing on disk.
    pub fn generate_file(&self, config: &GenConfig) -> Result<PathBuf, DboGenError> {
        let file_name = config
            .output_dir
            .join(self.lang_gen.generate_filename(config));
        if file_name.exists() && config.fail_if_file_exists {
            return Err(DboGenError::GenerationConflict { path: file_name });
        }

        let mut lines = self.lang_gen.generate_header(config);
        lines.extend(self.lang_gen.generate_read(config));
        if !config.analysis.is_read_only {
            lines.extend(self.lang_gen.generate_create(config));
            lines.extend(self.lang_gen.generate_update(config));
            lines.extend(self.lang_gen.generate_delete(config));
        }
        for extended in &config.bundle.extended_sql {
            if extended.is_wrapper() {
                lines.extend(self.lang_gen.generate_extended_sql_wrapper(config, extended));
            } else {
                lines.extend(self.lang_gen.generate_extended_sql(config, extended));
            }
        }
        lines.extend(self.lang_gen.generate_validations(config));
        lines.extend(self.lang_gen.generate_footer(config));

        fs::write(&file_name, lines.join(config.line_separator)).map_err(|source| {
            DboGenError::OutputWriteError {
                path: file_name.clone(),
                source,
            }
        })?;
        Ok(file_name)
    }
}
