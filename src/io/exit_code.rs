//! Exit codes for CLI operations following Unix conventions.
//!
//! # Exit Code Semantics
//!
//! - `0`: Success - every input produced a document tree
//! - `1`: General error - unspecified failure
//! - `2`: Blocking error - the parser itself could not be set up
//! - `3-125`: Specific recoverable errors
//! - `126-255`: Reserved by shell

use crate::error::{ExtractError, ParseError};

/// Standard exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Operation succeeded (code 0)
    Success = 0,

    /// Unspecified error occurred (code 1)
    GeneralError = 1,

    /// Critical error that should halt automation (code 2)
    BlockingError = 2,

    /// Input file does not exist (code 3)
    NotFound = 3,

    /// Failed to parse files (code 4)
    ParseError = 4,

    /// File I/O error (code 5)
    IoError = 5,

    /// Configuration error (code 6)
    ConfigError = 6,

    /// Operation not supported (code 8)
    UnsupportedOperation = 8,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl ExitCode {
    /// Convert an `ExtractError` to the appropriate exit code.
    ///
    /// Maps specific error types to semantic exit codes that scripts
    /// can use to determine appropriate recovery actions.
    pub fn from_error(error: &ExtractError) -> Self {
        match error {
            ExtractError::FileRead { source, .. }
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                ExitCode::NotFound
            }

            // No parser means no file can be processed
            ExtractError::Parse {
                source: ParseError::ParserInit { .. },
                ..
            } => ExitCode::BlockingError,

            ExtractError::Parse { .. } => ExitCode::ParseError,
            ExtractError::FileRead { .. } | ExtractError::FileWrite { .. } => ExitCode::IoError,
            ExtractError::ConfigError { .. } => ExitCode::ConfigError,
            ExtractError::UnsupportedFileType { .. } => ExitCode::UnsupportedOperation,

            _ => ExitCode::GeneralError,
        }
    }

    /// The most severe of several exit codes; `Success` for none
    pub fn worst(codes: impl IntoIterator<Item = ExitCode>) -> Self {
        codes
            .into_iter()
            .max_by_key(|code| match code {
                ExitCode::Success => 0,
                ExitCode::BlockingError => u8::MAX,
                other => *other as u8,
            })
            .unwrap_or(ExitCode::Success)
    }

    /// Check if this exit code indicates success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success)
    }
}
