//! Error types for the SNG crate.

use thiserror::Error;

use crate::extract::ExtractReport;

/// Errors that can occur when working with SNG packages.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Low-level read error (truncated input).
    #[error("{0}")]
    Common(#[from] vesna_common::Error),

    /// Archive does not start with the SNG identifier.
    #[error("invalid identifier: expected b\"SNGPKG\", got {actual:?}")]
    InvalidIdentifier { actual: Vec<u8> },

    /// Negative length prefix in the metadata section.
    #[error("negative {field} length: {value}")]
    NegativeLength { field: &'static str, value: i32 },

    /// Requested payload name is absent.
    #[error("payload not found: {0}")]
    PayloadNotFound(String),

    /// Extraction finished with one or more failed writes.
    #[error("extraction incomplete: {} write(s) failed", .report.failed.len())]
    ExtractionIncomplete { report: ExtractReport },
}

/// Result type for SNG operations.
pub type Result<T> = std::result::Result<T, Error>;
