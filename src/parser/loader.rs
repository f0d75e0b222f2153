//! Version-directory discovery and schema file loading.
//!
//! A schema root holds one directory per version. A directory is a version
//! when its name matches `(v)?<digits>(_suffix)?`; every recognized file
//! under it (recursively) is parsed and merged into that version's
//! `SchemaVersion`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Result;
use rayon::prelude::*;
use regex::Regex;
use serde_json::Value;
use walkdir::WalkDir;

use crate::error::{DboGenError, Diagnostic};
use crate::model::{Change, SchemaObject, SchemaVersion};

use super::dict::{DictParser, ParsedItem};
use super::{parse_json_text, parse_xml_text, parse_yaml_text};

static VERSION_DIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v?(\d+)(_.*)?$").expect("static regex"));

/// Minimum number of files to benefit from parallel parsing.
const PARALLEL_THRESHOLD: usize = 8;

const RECOGNIZED_EXTENSIONS: [&str; 4] = ["json", "yaml", "yml", "xml"];

/// Extract the version number from a directory name, if it names a version.
/// `Some(Err(..))` marks a name shaped like a version whose number does not
/// fit in a `u32`.
fn version_of_dir_name(name: &str) -> Option<Result<u32, std::num::ParseIntError>> {
    let caps = VERSION_DIR_RE.captures(name)?;
    Some(caps.get(1)?.as_str().parse())
}

/// Find all version directories under the root: (version number, path).
pub fn find_version_dirs(
    root_dir: &Path,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<(u32, PathBuf)>> {
    let mut ret = Vec::new();
    for entry in std::fs::read_dir(root_dir).map_err(|e| DboGenError::SchemaFileReadError {
        path: root_dir.to_path_buf(),
        source: e,
    })? {
        let entry = entry.map_err(|e| DboGenError::SchemaFileReadError {
            path: root_dir.to_path_buf(),
            source: e,
        })?;
        if !entry.path().is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            match version_of_dir_name(name) {
                Some(Ok(version)) => ret.push((version, entry.path())),
                Some(Err(_)) => diagnostics.push(
                    Diagnostic::warning(format!(
                        "directory '{name}' looks like a version but its number is out of range; skipped"
                    ))
                    .with_path(entry.path()),
                ),
                None => {}
            }
        }
    }
    ret.sort();
    Ok(ret)
}

/// All recognized schema files under one version directory, sorted so that
/// source-index assignment is deterministic.
fn find_files_for_version(version_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(version_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| {
                    RECOGNIZED_EXTENSIONS
                        .iter()
                        .any(|r| e.eq_ignore_ascii_case(r))
                })
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

/// Parse one schema file into top-level items.
pub fn parse_schema_file(
    path: &Path,
    source_index: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<ParsedItem>> {
    let content =
        std::fs::read_to_string(path).map_err(|e| DboGenError::SchemaFileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
    // Strip UTF-8 BOM if present
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(&content);

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    let canonical: Value = match ext.as_str() {
        "json" => parse_json_text(content),
        "yaml" | "yml" => parse_yaml_text(content),
        "xml" => parse_xml_text(content),
        other => Err(DboGenError::structural(format!(
            "unrecognized schema file extension: {other}"
        ))),
    }
    .map_err(|e| DboGenError::SchemaFileParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut file_diagnostics = Vec::new();
    let items = DictParser::new(source_index, &mut file_diagnostics)
        .parse(&canonical)
        .map_err(|e| match e {
            // Keep the taxonomy: user `error` directives stay fatal as-is,
            // everything else gets the source location attached.
            DboGenError::UserError { .. } => e,
            other => DboGenError::SchemaFileParseError {
                path: path.to_path_buf(),
                message: other.to_string(),
            },
        })?;
    diagnostics.extend(
        file_diagnostics
            .into_iter()
            .map(|d| d.with_path(path)),
    );
    Ok(items)
}

/// Parse every file of one version directory into a `SchemaVersion`.
pub fn parse_version_dir(
    version: u32,
    version_dir: &Path,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<SchemaVersion> {
    let files = find_files_for_version(version_dir);

    let mut items: Vec<ParsedItem> = Vec::with_capacity(files.len() * 2);
    if files.len() >= PARALLEL_THRESHOLD {
        let results: Vec<(Result<Vec<ParsedItem>>, Vec<Diagnostic>)> = files
            .par_iter()
            .enumerate()
            .map(|(source_index, file)| {
                let mut file_diagnostics = Vec::new();
                let result = parse_schema_file(file, source_index, &mut file_diagnostics);
                (result, file_diagnostics)
            })
            .collect();
        for (result, file_diagnostics) in results {
            diagnostics.extend(file_diagnostics);
            items.extend(result?);
        }
    } else {
        for (source_index, file) in files.iter().enumerate() {
            items.extend(parse_schema_file(file, source_index, diagnostics)?);
        }
    }

    let mut top_changes: Vec<Change> = Vec::new();
    let mut schema: Vec<SchemaObject> = Vec::new();
    for item in items {
        match item {
            ParsedItem::Change(change) => top_changes.push(change),
            ParsedItem::Object(object) => schema.push(object),
        }
    }
    Ok(SchemaVersion::new(version, top_changes, schema))
}

/// Find and parse every schema version under the root.
///
/// Returned sorted descending by version number: the head (most recent)
/// version first.
pub fn parse_versions(root_dir: &Path, diagnostics: &mut Vec<Diagnostic>) -> Result<Vec<SchemaVersion>> {
    let mut ret = Vec::new();
    for (version, dir) in find_version_dirs(root_dir, diagnostics)? {
        ret.push(parse_version_dir(version, &dir, diagnostics)?);
    }
    ret.sort_by(|a, b| b.version.cmp(&a.version));
    Ok(ret)
}
