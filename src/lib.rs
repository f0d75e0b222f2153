//! dbogen: a schema-driven DDL and data-access-object generator
//!
//! This library reads a versioned, declarative schema description
//! (JSON/YAML/XML), resolves it into a queryable semantic model, and
//! produces platform-specific DDL plus language-neutral query descriptions
//! for generated CRUD layers.

pub mod analysis;
pub mod codegen;
pub mod error;
pub mod model;
pub mod parser;
pub mod schemagen;
pub mod util;

use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use analysis::AnalysisModel;
use codegen::{MySqlPrepSqlConverter, PrepSqlConverter, QueryBundle};
use model::SchemaVersion;
use schemagen::{MySqlScriptGenerator, SchemaScriptGenerator};

pub use error::{DboGenError, Diagnostic};

/// Options for one generation run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Root directory holding one subdirectory per schema version
    pub schema_dir: PathBuf,
    /// Directory generated artifacts are written to
    pub output_dir: PathBuf,
    /// Target SQL platform (e.g., "mysql")
    pub platform: String,
    /// Package name the schemas are registered under
    pub package: String,
    /// Overwrite existing output files instead of failing
    pub overwrite: bool,
    /// Enable verbose output
    pub verbose: bool,
}

/// All versions found under a schema root, head first, plus the advisories
/// collected while loading them.
#[derive(Debug)]
pub struct LoadedSchema {
    pub versions: Vec<SchemaVersion>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Load and parse every version directory under `schema_dir`.
pub fn load_schema(options: &GenerateOptions) -> Result<LoadedSchema> {
    if options.verbose {
        println!("Loading schema from: {}", options.schema_dir.display());
    }

    let mut diagnostics = Vec::new();
    let versions = parser::parse_versions(&options.schema_dir, &mut diagnostics)?;
    if versions.is_empty() {
        return Err(DboGenError::structural(format!(
            "no version directories under {}",
            options.schema_dir.display()
        ))
        .into());
    }

    if options.verbose {
        println!("Found {} schema version(s)", versions.len());
    }
    Ok(LoadedSchema {
        versions,
        diagnostics,
    })
}

/// Register the head version under the package name and resolve references.
pub fn build_analysis(
    package: &str,
    head: &SchemaVersion,
) -> std::result::Result<AnalysisModel, DboGenError> {
    let mut model = AnalysisModel::new();
    model.register(package, head)?;
    model.update_references();
    Ok(model)
}

fn script_generator_for(
    platform: &str,
) -> std::result::Result<Box<dyn SchemaScriptGenerator>, DboGenError> {
    if util::eq_ci(platform, "mysql") {
        Ok(Box::new(MySqlScriptGenerator::new()))
    } else {
        Err(DboGenError::UnsupportedPlatform {
            platforms: vec![platform.to_string()],
        })
    }
}

fn converter_for(
    platform: &str,
    language: &str,
) -> std::result::Result<Box<dyn PrepSqlConverter>, DboGenError> {
    if util::eq_ci(platform, "mysql") {
        Ok(Box::new(MySqlPrepSqlConverter::new(language)))
    } else {
        Err(DboGenError::UnsupportedPlatform {
            platforms: vec![platform.to_string()],
        })
    }
}

/// Result of a DDL generation run
#[derive(Debug)]
pub struct DdlOutcome {
    pub files: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Generate the creation DDL for every object of the head version, one file
/// per schema object, plus an upgrade script when the head carries changes.
pub fn generate_ddl(options: &GenerateOptions) -> Result<DdlOutcome> {
    let loaded = load_schema(options)?;
    let head = &loaded.versions[0];

    // Analysis validates the model (duplicate names, primary keys) even
    // though DDL itself is emitted from the raw schema objects.
    let analysis = build_analysis(&options.package, head)?;
    let mut diagnostics = loaded.diagnostics;
    diagnostics.extend(analysis.diagnostics().cloned());

    let generator = script_generator_for(&options.platform)?;
    fs::create_dir_all(&options.output_dir).map_err(|source| DboGenError::OutputWriteError {
        path: options.output_dir.clone(),
        source,
    })?;

    let mut files = Vec::new();
    for object in head.schema() {
        let text = generator.generate_base(object)?;
        let path = options.output_dir.join(format!("{}.sql", object.name()));
        if path.exists() && !options.overwrite {
            return Err(DboGenError::GenerationConflict { path }.into());
        }
        fs::write(&path, text).map_err(|source| DboGenError::OutputWriteError {
            path: path.clone(),
            source,
        })?;
        if options.verbose {
            println!("Wrote {}", path.display());
        }
        files.push(path);
    }

    let mut upgrade_sql = Vec::new();
    for change in head.top_changes() {
        upgrade_sql.extend(generator.generate_upgrade(change)?);
    }
    if !upgrade_sql.is_empty() {
        let path = options.output_dir.join("upgrade.sql");
        if path.exists() && !options.overwrite {
            return Err(DboGenError::GenerationConflict { path }.into());
        }
        fs::write(&path, upgrade_sql.join("\n")).map_err(|source| {
            DboGenError::OutputWriteError {
                path: path.clone(),
                source,
            }
        })?;
        if options.verbose {
            println!("Wrote {}", path.display());
        }
        files.push(path);
    }

    Ok(DdlOutcome { files, diagnostics })
}

/// Result of building the query IR for every table and view
#[derive(Debug)]
pub struct QueryOutcome {
    pub bundles: Vec<QueryBundle>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Build the full query IR for every object of the head version, for
/// consumption by a language generator.
pub fn build_query_bundles(options: &GenerateOptions, language: &str) -> Result<QueryOutcome> {
    let loaded = load_schema(options)?;
    let head = &loaded.versions[0];

    let analysis = build_analysis(&options.package, head)?;
    let mut diagnostics = loaded.diagnostics;
    diagnostics.extend(analysis.diagnostics().cloned());

    let converter = converter_for(&options.platform, language)?;
    let mut bundles = Vec::new();
    for id in analysis.ids() {
        bundles.push(QueryBundle::build(&analysis, id, converter.as_ref())?);
    }

    if options.verbose {
        println!("Built query IR for {} schema object(s)", bundles.len());
    }
    Ok(QueryOutcome {
        bundles,
        diagnostics,
    })
}
