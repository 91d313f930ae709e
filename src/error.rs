use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZetPkgError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid ZetPkg format: expected exactly one payload separator, found {separators}")]
    Framing { separators: usize },

    #[error("Invalid ZetPkg: metadata header is not valid JSON ({0})")]
    MetadataParse(String),

    #[error("Invalid ZetPkg: payload is not valid JSON ({0})")]
    PayloadParse(String),

    #[error("Unsupported {field}: \"{value}\"")]
    UnsupportedFormat { field: &'static str, value: String },

    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("Entry file not found: {0}")]
    MissingEntry(String),

    #[error("Missing asset: {0}")]
    MissingAsset(String),

    #[error("Hash mismatch for {asset}: expected {expected}, got {actual}")]
    DigestMismatch {
        asset: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid base6x symbol {symbol:?} at position {position}")]
    InvalidSymbol { position: usize, symbol: char },

    #[error("Refusing to write asset outside the output directory: {0}")]
    UnsafePath(String),

    #[error("Asset path is also used as a directory by another asset: {0}")]
    PathConflict(String),
}

pub type Result<T> = std::result::Result<T, ZetPkgError>;

/// Coarse classification of a [`ZetPkgError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Io,
    Json,
    Framing,
    MetadataParse,
    PayloadParse,
    UnsupportedFormat,
    InvalidMetadata,
    MissingEntry,
    MissingAsset,
    DigestMismatch,
    InvalidSymbol,
    UnsafePath,
    PathConflict,
}

impl ZetPkgError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ZetPkgError::Io(_) => ErrorKind::Io,
            ZetPkgError::Json(_) => ErrorKind::Json,
            ZetPkgError::Framing { .. } => ErrorKind::Framing,
            ZetPkgError::MetadataParse(_) => ErrorKind::MetadataParse,
            ZetPkgError::PayloadParse(_) => ErrorKind::PayloadParse,
            ZetPkgError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            ZetPkgError::InvalidMetadata(_) => ErrorKind::InvalidMetadata,
            ZetPkgError::MissingEntry(_) => ErrorKind::MissingEntry,
            ZetPkgError::MissingAsset(_) => ErrorKind::MissingAsset,
            ZetPkgError::DigestMismatch { .. } => ErrorKind::DigestMismatch,
            ZetPkgError::InvalidSymbol { .. } => ErrorKind::InvalidSymbol,
            ZetPkgError::UnsafePath(_) => ErrorKind::UnsafePath,
            ZetPkgError::PathConflict(_) => ErrorKind::PathConflict,
        }
    }
}

/// Structured failure returned by the catch-all operations
/// ([`crate::builder::build`], [`crate::validator::validate`], [`crate::builder::verify`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<ZetPkgError> for Failure {
    fn from(err: ZetPkgError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for Failure {
    fn from(err: std::io::Error) -> Self {
        ZetPkgError::Io(err).into()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Failure {}
