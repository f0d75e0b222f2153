//! Error types for dbogen

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during schema loading, analysis, and generation
#[derive(Error, Debug)]
pub enum DboGenError {
    #[error("Failed to read schema file: {path}")]
    SchemaFileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse schema file: {path}: {message}")]
    SchemaFileParseError { path: PathBuf, message: String },

    #[error("Invalid schema model: {message}")]
    Structural { message: String },

    #[error("Unknown key '{key}' in {context}")]
    UnknownKey { key: String, context: String },

    #[error("Schema error directive: {message}")]
    UserError { message: String },

    #[error("Schema object '{name}' is already registered (package {package})")]
    DuplicateSchemaName { name: String, package: String },

    #[error("Foreign key on {table}.{column} requires table '{target}', which is not registered")]
    UnresolvedReference {
        table: String,
        column: String,
        target: String,
    },

    #[error("No SQL variant supports the requested platforms: {platforms:?}")]
    UnsupportedPlatform { platforms: Vec<String> },

    #[error("No code variant supports the language: {language}")]
    UnsupportedLanguage { language: String },

    #[error("Will not overwrite existing file: {path}")]
    GenerationConflict { path: PathBuf },

    #[error("Failed to write generated file: {path}")]
    OutputWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DboGenError {
    /// Shorthand for structural model-construction errors.
    pub fn structural(message: impl Into<String>) -> Self {
        DboGenError::Structural {
            message: message.into(),
        }
    }
}

/// Severity of an advisory diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Note,
}

/// A non-fatal advisory surfaced by the loaders or the analysis engine.
///
/// These are collected rather than printed so that callers decide how to
/// report them; they never abort a run.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub source_path: Option<PathBuf>,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
            source_path: None,
        }
    }

    pub fn note(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Note,
            message: message.into(),
            source_path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.severity {
            Severity::Warning => "warning",
            Severity::Note => "note",
        };
        match &self.source_path {
            Some(path) => write!(f, "{}: {} ({})", tag, self.message, path.display()),
            None => write!(f, "{}: {}", tag, self.message),
        }
    }
}
