//! The decoded row/column grid.

use super::models::FieldValue;

/// Where decoding stopped when the file ended inside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    /// Data block (0-based) holding the incomplete record.
    pub block: usize,
    /// Record slot the incomplete record would have occupied.
    pub record: usize,
    /// Records fully decoded before the cut.
    pub decoded_records: usize,
}

/// Decoded table contents.
///
/// Cells are addressed as `(field, record)`, both counting from 1:
/// - `field` runs over `1..=num_fields`
/// - record slot 1 is the header row holding the field names (empty for
///   layouts without names)
/// - decoded records occupy slots `2..=num_records + 1`
///
/// Internally the rows are plain 0-based vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
    num_fields: usize,
    declared_records: usize,
    header_row: Vec<String>,
    rows: Vec<Vec<FieldValue>>,
    truncation: Option<Truncation>,
}

impl TableModel {
    /// Record slot of the header row.
    pub const HEADER_SLOT: usize = 1;
    /// Record slot of the first decoded record.
    pub const FIRST_RECORD_SLOT: usize = 2;

    pub(crate) fn new(header_row: Vec<String>, declared_records: usize) -> Self {
        Self {
            num_fields: header_row.len(),
            declared_records,
            header_row,
            rows: Vec::new(),
            truncation: None,
        }
    }

    /// Appends a fully decoded record and returns the slot it landed in.
    pub(crate) fn push_record(&mut self, row: Vec<FieldValue>) -> usize {
        debug_assert_eq!(row.len(), self.num_fields);
        self.rows.push(row);
        self.rows.len() + 1
    }

    pub(crate) fn set_truncation(&mut self, truncation: Truncation) {
        self.truncation = Some(truncation);
    }

    pub fn num_fields(&self) -> usize {
        self.num_fields
    }

    /// Record count declared by the header.
    pub fn declared_records(&self) -> usize {
        self.declared_records
    }

    /// Records actually decoded.
    pub fn num_decoded(&self) -> usize {
        self.rows.len()
    }

    /// Highest addressable record slot, `declared_records + 1`.
    pub fn last_slot(&self) -> usize {
        self.declared_records + 1
    }

    /// Set when the file ended inside a record.
    pub fn truncation(&self) -> Option<Truncation> {
        self.truncation
    }

    pub fn is_truncated(&self) -> bool {
        self.truncation.is_some()
    }

    pub fn field_names(&self) -> &[String] {
        &self.header_row
    }

    /// Typed value at `(field, record)`. `None` for the header row, for
    /// out-of-range indexes and for slots no record was decoded into.
    pub fn value(&self, field: usize, record: usize) -> Option<&FieldValue> {
        let column = field.checked_sub(1)?;
        let row = record.checked_sub(Self::FIRST_RECORD_SLOT)?;
        self.rows.get(row)?.get(column)
    }

    /// Text at `(field, record)`, including the header row.
    pub fn cell(&self, field: usize, record: usize) -> Option<String> {
        if record == Self::HEADER_SLOT {
            return self.header_row.get(field.checked_sub(1)?).cloned();
        }
        self.value(field, record).map(ToString::to_string)
    }

    /// The decoded records, in file order.
    pub fn records(&self) -> impl Iterator<Item = &[FieldValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Every populated row rendered as text, header row first.
    pub fn text_rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        std::iter::once(self.header_row.clone())
            .chain(self.rows.iter().map(|row| row.iter().map(ToString::to_string).collect()))
    }
}
