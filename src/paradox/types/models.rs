//! Core data structures for Paradox table components.
//!
//! This module defines the fundamental types used throughout the library:
//! - The table schema parsed from the file header
//! - Field type tags and their storage widths
//! - Decoded field values

use std::fmt::{Display, Formatter};

use super::error::{PdxError, Result};
use crate::paradox::calendar::CalendarDate;

/// Paradox field type tags as stored in the field descriptor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Alpha,
    Date,
    Short,
    Long,
    Currency,
    Number,
    Logical,
    MemoBlob,
    Blob,
    FmtMemoBlob,
    Ole,
    Graphic,
    Time,
    Timestamp,
    AutoInc,
    Bcd,
    Bytes,
}

impl FieldType {
    /// Returns the number of bytes this field occupies in a record.
    ///
    /// - Fixed-width numeric types ignore the declared size.
    /// - BCD is always 17 bytes.
    /// - Alpha and the opaque types use the declared size.
    pub fn stored_width(&self, declared_size: u8) -> usize {
        match self {
            FieldType::Logical => 1,
            FieldType::Short => 2,
            FieldType::Date | FieldType::Long | FieldType::AutoInc | FieldType::Time => 4,
            FieldType::Currency | FieldType::Number | FieldType::Timestamp => 8,
            FieldType::Bcd => 17,
            FieldType::Alpha
            | FieldType::MemoBlob
            | FieldType::Blob
            | FieldType::FmtMemoBlob
            | FieldType::Ole
            | FieldType::Graphic
            | FieldType::Bytes => declared_size as usize,
        }
    }

    /// Whether the payload is skipped instead of decoded.
    pub fn is_opaque(&self) -> bool {
        self.placeholder().is_some()
    }

    /// The cell text emitted for skipped payloads.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            FieldType::MemoBlob => Some("<pxfMemoBLOb>"),
            FieldType::Blob => Some("<pxfBLOb>"),
            FieldType::FmtMemoBlob => Some("<pxfFmtMemoBLOb>"),
            FieldType::Ole => Some("<pxfOLE>"),
            FieldType::Graphic => Some("<pxfGraphic>"),
            FieldType::Bcd => Some("<pxfBCD>"),
            FieldType::Bytes => Some("<pxfBytes>"),
            _ => None,
        }
    }
}

impl TryFrom<u8> for FieldType {
    type Error = u8;
    fn try_from(value: u8) -> std::result::Result<Self, u8> {
        match value {
            1 => Ok(Self::Alpha),
            2 => Ok(Self::Date),
            3 => Ok(Self::Short),
            4 => Ok(Self::Long),
            5 => Ok(Self::Currency),
            6 => Ok(Self::Number),
            9 => Ok(Self::Logical),
            12 => Ok(Self::MemoBlob),
            13 => Ok(Self::Blob),
            14 => Ok(Self::FmtMemoBlob),
            15 => Ok(Self::Ole),
            16 => Ok(Self::Graphic),
            20 => Ok(Self::Time),
            21 => Ok(Self::Timestamp),
            22 => Ok(Self::AutoInc),
            23 => Ok(Self::Bcd),
            24 => Ok(Self::Bytes),
            other => Err(other),
        }
    }
}

/// Header layout families, resolved once from the file type and version bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    /// Index-style files (types 1, 4, 6, 7, 8): field descriptors, no names.
    FieldsOnly,
    /// Data files written by format versions up to 3.5 (version id <= 4).
    Legacy,
    /// Data files from format 4.0 on, with the extended header block.
    Extended,
}

impl SchemaVariant {
    /// Resolves the layout from the header's file type and version bytes.
    pub fn detect(file_type: u8, file_version: u8) -> Result<Self> {
        let unsupported = PdxError::UnsupportedSchemaVariant {
            file_type,
            file_version,
        };
        match file_type {
            1 | 4 | 6 | 7 | 8 => Ok(Self::FieldsOnly),
            0 | 2 | 3 | 5 => match file_version {
                0..=4 => Ok(Self::Legacy),
                5..=12 => Ok(Self::Extended),
                _ => Err(unsupported),
            },
            _ => Err(unsupported),
        }
    }

    /// Whether the layout stores a field name list.
    pub fn has_field_names(&self) -> bool {
        !matches!(self, SchemaVariant::FieldsOnly)
    }
}

impl Display for SchemaVariant {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            SchemaVariant::FieldsOnly => write!(f, "fields-only"),
            SchemaVariant::Legacy => write!(f, "legacy"),
            SchemaVariant::Extended => write!(f, "extended"),
        }
    }
}

/// A single field descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub field_type: FieldType,
    /// Declared size byte from the descriptor table.
    pub size: u8,
    /// Field name, present for layouts that store one.
    pub name: Option<String>,
}

impl FieldSpec {
    /// Bytes this field occupies in a record.
    pub fn stored_width(&self) -> usize {
        self.field_type.stored_width(self.size)
    }
}

/// Complete parsed header of a Paradox table.
///
/// Built once per file and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    /// Bytes per record.
    pub record_size: u16,
    /// Bytes before the first data block.
    pub header_size: u16,
    pub file_type: u8,
    /// Data block size in 1 KiB units.
    pub block_size_units: u8,
    pub num_records: u32,
    /// Number of data blocks in use.
    pub file_blocks: u16,
    pub file_version: u8,
    pub variant: SchemaVariant,
    pub primary_key_fields: i16,
    pub sort_order: u8,
    pub encrypted: bool,
    pub auto_increment: i32,
    /// DOS code page, only present in the extended layout.
    pub dos_code_page: Option<u16>,
    pub fields: Vec<FieldSpec>,
}

impl TableSchema {
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn block_size_bytes(&self) -> usize {
        self.block_size_units as usize * 1024
    }

    /// Absolute offset of data block `block_index` (0-based).
    pub fn block_offset(&self, block_index: usize) -> usize {
        self.header_size as usize + block_index * self.block_size_bytes()
    }

    /// Descriptor of field `index`, counting from 1.
    pub fn field(&self, index: usize) -> Option<&FieldSpec> {
        index.checked_sub(1).and_then(|i| self.fields.get(i))
    }

    /// Type of field `index`, counting from 1.
    pub fn field_type(&self, index: usize) -> Option<FieldType> {
        self.field(index).map(|f| f.field_type)
    }

    /// Declared size of field `index`, counting from 1.
    pub fn field_size(&self, index: usize) -> Option<u8> {
        self.field(index).map(|f| f.size)
    }

    /// Name of field `index`, counting from 1.
    pub fn field_name(&self, index: usize) -> Option<&str> {
        self.field(index).and_then(|f| f.name.as_deref())
    }

    /// Display width of each field: the declared size for Alpha, 8 otherwise.
    pub fn display_widths(&self) -> Vec<usize> {
        self.fields
            .iter()
            .map(|f| match f.field_type {
                FieldType::Alpha => f.size as usize,
                _ => 8,
            })
            .collect()
    }
}

/// One decoded cell.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// The all-zero null marker.
    Empty,
    Alpha(String),
    Short(i16),
    Long(i32),
    AutoInc(i32),
    Number(f64),
    Currency(f64),
    /// Stored byte with the sign bit removed; 1 is true, 0 is false.
    Logical(u8),
    Date(CalendarDate),
    /// A date whose ordinal the calendar rejected. Renders empty.
    InvalidDate(i32),
    /// Milliseconds since midnight.
    Time(i32),
    Timestamp(i64),
    /// Skipped payload of the given type.
    Opaque(FieldType),
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Empty | FieldValue::InvalidDate(_) => Ok(()),
            FieldValue::Alpha(text) => f.write_str(text),
            FieldValue::Short(v) => write!(f, "{}", v),
            FieldValue::Long(v) | FieldValue::AutoInc(v) => write!(f, "{}", v),
            FieldValue::Number(v) => f.write_str(&crate::paradox::codec::field::format_double(*v)),
            FieldValue::Currency(v) => write!(f, "${}", crate::paradox::codec::field::format_double(*v)),
            FieldValue::Logical(v) => write!(f, "{}", v),
            FieldValue::Date(date) => f.write_str(&date.to_dmy()),
            FieldValue::Time(millis) => {
                let seconds = millis / 1000;
                let hours = seconds / 3600;
                let minutes = (seconds - hours * 3600) / 60;
                let secs = seconds - hours * 3600 - minutes * 60;
                write!(f, "{}:{}:{}", hours, minutes, secs)
            }
            FieldValue::Timestamp(v) => write!(f, "{}", v),
            FieldValue::Opaque(field_type) => f.write_str(field_type.placeholder().unwrap_or_default()),
        }
    }
}

/// How the decoder reacts to a record cut short by the end of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Stop at the first short read and keep the records decoded so far.
    #[default]
    Lenient,
    /// Fail with [`PdxError::TruncatedRecord`].
    Strict,
}
