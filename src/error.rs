//! Error types for the documentation extractor
//!
//! This module provides structured error types using thiserror for better
//! error handling and actionable error messages. Diagnostics about the
//! documentation itself (unknown tags, unmatched braces) are never errors:
//! they are collected on the documents and the extraction output.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for file-level extraction
#[derive(Error, Debug)]
pub enum ExtractError {
    /// File system errors
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported file type '{extension}' for file '{path}'. Supported extensions: {supported}")]
    UnsupportedFileType {
        path: PathBuf,
        extension: String,
        supported: String,
    },

    /// Parsing errors
    #[error("Failed to parse '{path}': {source}")]
    Parse { path: PathBuf, source: ParseError },

    /// Configuration errors
    #[error("Invalid configuration: {reason}")]
    ConfigError { reason: String },

    #[error("Failed to serialize document tree: {0}")]
    Serialize(#[from] serde_json::Error),

    /// General errors for cases where we need to preserve existing behavior
    #[error("{0}")]
    General(String),
}

impl ExtractError {
    /// Get a stable status code for this error type.
    ///
    /// Returns a string identifier that can be used in JSON responses
    /// for programmatic error handling.
    pub fn status_code(&self) -> String {
        match self {
            Self::FileRead { .. } => "FILE_READ_ERROR",
            Self::FileWrite { .. } => "FILE_WRITE_ERROR",
            Self::UnsupportedFileType { .. } => "UNSUPPORTED_FILE_TYPE",
            Self::Parse { source, .. } => source.status_code(),
            Self::ConfigError { .. } => "CONFIG_ERROR",
            Self::Serialize(_) => "SERIALIZE_ERROR",
            Self::General(_) => "GENERAL_ERROR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::FileRead { .. } => vec![
                "Check that the file exists and you have read permissions",
                "Ensure the file is not locked by another process",
            ],
            Self::FileWrite { .. } => vec![
                "Check that the output directory exists and is writable",
            ],
            Self::UnsupportedFileType { .. } => vec![
                "Add the extension to `extensions` in .scopedoc/settings.toml",
                "Only JavaScript sources can be documented",
            ],
            Self::Parse { source, .. } => source.recovery_suggestions(),
            Self::ConfigError { .. } => vec![
                "Run 'scopedoc init --force' to regenerate the settings file",
                "Check SD_* environment variables for typos",
            ],
            _ => vec![],
        }
    }
}

/// Errors specific to parsing operations
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to initialize {language} parser: {reason}")]
    ParserInit { language: String, reason: String },

    #[error("Parser did not produce a syntax tree")]
    NoTree,

    #[error("Failed to parse code at line {line}, column {column}: {reason}")]
    SyntaxError {
        line: u32,
        column: u32,
        reason: String,
    },
}

impl ParseError {
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::ParserInit { .. } => "PARSER_INIT_ERROR",
            Self::NoTree => "NO_SYNTAX_TREE",
            Self::SyntaxError { .. } => "SYNTAX_ERROR",
        }
    }

    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::ParserInit { .. } => vec![
                "The tree-sitter grammar ABI may not match the tree-sitter runtime",
            ],
            Self::NoTree => vec!["Check that the input is text and not a binary file"],
            Self::SyntaxError { .. } => vec![
                "Fix the syntax error, or set parsing.strict_syntax = false to extract anyway",
            ],
        }
    }
}

/// Result type alias for file-level extraction
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Result type alias for parse operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context(self, msg: &str) -> Result<T, ExtractError>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: &str) -> Result<T, ExtractError> {
        self.map_err(|e| ExtractError::General(format!("{msg}: {e}")))
    }
}
