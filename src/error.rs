use std::io;

use thiserror::Error;

/// Every failure the codec can report.
///
/// None of these are retried: building, encoding and decoding are deterministic, so a second
/// attempt reproduces the same error.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// There was nothing to compress.
    #[error("input was empty, nothing to compress")]
    EmptyInput,

    /// The text contained a symbol the code table has no entry for.
    #[error("symbol {0:?} is not in the code table")]
    SymbolNotInTable(char),

    /// A persisted code table or payload reference was malformed or inconsistent.
    ///
    /// The argument describes what was wrong with it.
    #[error("corrupt artifact: {0}")]
    CorruptArtifact(String),

    /// The payload held fewer bits than the artifact declared.
    #[error("truncated payload: {0}")]
    TruncatedPayload(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = HuffmanError> = core::result::Result<T, E>;
