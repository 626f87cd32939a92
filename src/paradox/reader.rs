use std::fs;
use std::path::Path;

use encoding_rs::Encoding;
use log::info;

use super::calendar::{Calendar, CalendarReform};
use super::codec::field::FieldCodec;
use super::codec::text::TextEncoding;
use super::format::{blocks::BlockRecordDecoder, header};
use super::types::error::Result;
use super::types::models::{DecodeMode, TableSchema};
use super::types::table::TableModel;

/// Settings that control how a table is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    pub mode: DecodeMode,
    pub encoding: TextEncoding,
    pub calendar: Calendar,
}

impl DecodeOptions {
    pub fn with_mode(mut self, mode: DecodeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for `with_mode(DecodeMode::Strict)`.
    pub fn strict(self) -> Self {
        self.with_mode(DecodeMode::Strict)
    }

    pub fn with_text_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Decodes Alpha fields and names with `encoding` instead of Latin-1.
    pub fn with_encoding(self, encoding: &'static Encoding) -> Self {
        self.with_text_encoding(TextEncoding::Fixed(encoding))
    }

    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Uses a calendar whose first Gregorian day is `year-month-day`.
    ///
    /// # Errors
    /// Returns `PdxError::Calendar` if no reform can start on that date.
    pub fn with_reform_date(self, year: i32, month: i32, day: i32) -> Result<Self> {
        let reform = CalendarReform::adopted(year, month, day)?;
        Ok(self.with_calendar(Calendar::new(reform)))
    }
}

/// A fully decoded table: its schema and its cell grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ParadoxTable {
    pub schema: TableSchema,
    pub table: TableModel,
}

/// The main reader for Paradox table files.
///
/// Opening a file reads it into memory and parses the header; the data
/// blocks are decoded on demand by [`ParadoxReader::decode`].
#[derive(Debug, Clone)]
pub struct ParadoxReader {
    data: Vec<u8>,
    pub schema: TableSchema,
    options: DecodeOptions,
}

impl ParadoxReader {
    /// Read a Paradox table from the given path.
    ///
    /// # Arguments
    /// * `path` - File path to the `.db` table
    /// * `options` - Decode mode, text encoding and calendar
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be read
    /// - The header is truncated or inconsistent
    /// - The file type or version is not a known layout
    pub fn open(path: impl AsRef<Path>, options: DecodeOptions) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening Paradox table: {}", path.display());
        let data = fs::read(path)?;
        Self::from_bytes(data, options)
    }

    /// Parse a Paradox table already held in memory.
    ///
    /// # Errors
    /// Same as [`ParadoxReader::open`], minus I/O.
    pub fn from_bytes(data: Vec<u8>, options: DecodeOptions) -> Result<Self> {
        let schema = header::parse(&data, options.encoding)?;
        Ok(Self {
            data,
            schema,
            options,
        })
    }

    /// Number of records declared by the header.
    pub fn num_records(&self) -> usize {
        self.schema.num_records as usize
    }

    pub fn num_fields(&self) -> usize {
        self.schema.num_fields()
    }

    /// Decodes all data blocks.
    ///
    /// # Errors
    /// Returns `PdxError::TruncatedRecord` in strict mode when the file ends
    /// inside a block.
    pub fn decode(&self) -> Result<TableModel> {
        let text = self.options.encoding.resolve(self.schema.dos_code_page);
        info!("Decoding {} blocks, text as {}", self.schema.file_blocks, text.name());
        let codec = FieldCodec::new(text, self.options.calendar);
        BlockRecordDecoder::new(&self.data, &self.schema, codec, self.options.mode).decode()
    }

    /// Decodes the table and hands back schema and grid together.
    pub fn into_table(self) -> Result<ParadoxTable> {
        let table = self.decode()?;
        Ok(ParadoxTable {
            schema: self.schema,
            table,
        })
    }
}
