//! Custom error types for the pdx-reader crate.

use thiserror::Error;

use crate::paradox::calendar::CalendarError;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum PdxError {
    /// An error originating from I/O operations (missing or unreadable file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A fixed header field could not be read or holds an impossible value.
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// The file type or version byte does not match any known table layout.
    #[error("Unsupported schema variant: file type {file_type}, file version {file_version}")]
    UnsupportedSchemaVariant { file_type: u8, file_version: u8 },

    /// A field descriptor carries a type tag with no known codec.
    #[error("Unknown field type {tag} for field {field}")]
    UnknownFieldType { field: usize, tag: u8 },

    /// A data block or record ended before its declared length.
    #[error(
        "Truncated record {record} in block {block}: {decoded_records} records were fully decoded"
    )]
    TruncatedRecord {
        block: usize,
        record: usize,
        decoded_records: usize,
    },

    /// A calendar conversion failed outside of cell decoding.
    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),
}

/// A convenience `Result` type alias using the crate's `PdxError` type.
pub type Result<T> = std::result::Result<T, PdxError>;
