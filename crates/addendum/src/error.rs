// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification used by callers to decide how to report a failure.
/// None of these are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingCapability,
    MalformedInput,
    OutputPath,
}

#[derive(Error, Debug)]
pub enum AddendumError {
    #[error("Missing capability: {hint}")]
    MissingCapability { hint: String },

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid date '{value}': {reason} (expected DD.MM.YYYY)")]
    InvalidDate { value: String, reason: String },

    #[error("Unknown agreement kind '{0}' (expected 'agent' or 'contract')")]
    InvalidAgreementKind(String),

    #[error("{location} contains U+{code:04X}, which a DOCX file cannot store")]
    UnencodableChar { location: String, code: u32 },

    #[error("Failed to open reference document {path:?}: {source}")]
    ReferenceOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Reference document {path:?} is not a valid DOCX file: {message}")]
    ReferenceFormat { path: PathBuf, message: String },

    #[error("Failed to serialize output document: {0}")]
    Serialize(String),
}

impl AddendumError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AddendumError::MissingCapability { .. } => ErrorKind::MissingCapability,
            AddendumError::MissingParameter(_)
            | AddendumError::InvalidDate { .. }
            | AddendumError::InvalidAgreementKind(_)
            | AddendumError::UnencodableChar { .. }
            | AddendumError::ReferenceOpen { .. }
            | AddendumError::ReferenceFormat { .. } => ErrorKind::MalformedInput,
            AddendumError::Serialize(_) => ErrorKind::OutputPath,
        }
    }
}

pub type AddendumResult<T> = Result<T, AddendumError>;
