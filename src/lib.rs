//! # pdx-reader
//!
//! A reader for Paradox table files (`.db`, format versions 3 through 7).
//! Decodes the header and every data block into a grid of typed cells, and
//! ships the proleptic Julian/Gregorian calendar used to interpret date fields.
//!
//! Memo, BLOB, OLE, graphic and BCD payloads are skipped and reported as
//! placeholders.
pub mod paradox;

// Re-export the main types for convenience
pub use paradox::{
    DecodeOptions, ParadoxReader, ParadoxTable, PdxError, Result,
    calendar::{Age, Calendar, CalendarDate, CalendarError, CalendarReform, OrdinalDate},
    codec::text::TextEncoding,
    models::{DecodeMode, FieldSpec, FieldType, FieldValue, SchemaVariant, TableSchema},
    table::{TableModel, Truncation},
};
