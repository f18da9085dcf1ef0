//! Error types for ISO9660 operations

use alloc::format;
use alloc::string::String;
use thiserror::Error;

/// Result type for ISO9660 operations
pub type Result<T> = core::result::Result<T, IsoError>;

/// Errors that can occur while decoding an ISO9660 image
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IsoError {
    /// The volume descriptor set terminator was reached without a primary
    /// volume descriptor
    #[error("primary volume descriptor not found before volume set terminator")]
    PrimaryVolumeNotFound,

    /// A read or seek failed mid-decode; carries the rendered I/O cause
    #[error("corrupted image: {0}")]
    CorruptedImage(String),

    /// A directory record's declared length is inconsistent with its
    /// fixed, identifier, padding and system use regions
    #[error("malformed directory record")]
    MalformedRecord,

    /// The image uses a feature outside the supported ECMA-119 subset
    #[error("unsupported extension: {0}")]
    UnsupportedExtension(&'static str),

    /// File or directory not found
    #[error("file or directory not found")]
    NotFound,

    /// Path or directory nesting exceeds the ECMA-119 depth limit
    #[error("path exceeds maximum directory depth")]
    PathTooLong,

    /// Read operation failed (destination too small or not a regular file)
    #[error("read operation failed")]
    ReadFailed,
}

impl IsoError {
    /// Wrap an underlying I/O failure, preserving its message.
    pub(crate) fn corrupted<E: core::fmt::Display>(cause: E) -> Self {
        IsoError::CorruptedImage(format!("{cause}"))
    }
}
