//! Data block walking and record decoding.
//!
//! Each data block starts with a 6-byte header:
//! ```text
//! [2 bytes] next block number (big-endian, unused)
//! [2 bytes] this block number (big-endian, unused)
//! [2 bytes] add_data_size (little-endian, signed)
//! ```
//! followed by `add_data_size / record_size + 1` records.

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use log::{debug, info, trace, warn};

use crate::paradox::codec::field::FieldCodec;
use crate::paradox::types::{
    error::{PdxError, Result},
    models::{DecodeMode, FieldValue, TableSchema},
    table::{TableModel, Truncation},
};
use crate::paradox::utils;

/// Bytes of the per-block header preceding the records.
pub const BLOCK_HEADER_LEN: usize = 6;

/// Result of decoding one block.
#[derive(Debug)]
enum BlockStep {
    /// The block was fully decoded; carries the last record slot used.
    Done(usize),
    /// Every record slot is filled; remaining records are ignored.
    Full(usize),
    /// The input ended inside the block.
    Truncated(Truncation),
}

/// Walks the data blocks of one table.
pub struct BlockRecordDecoder<'a> {
    data: &'a [u8],
    schema: &'a TableSchema,
    codec: FieldCodec,
    mode: DecodeMode,
}

impl<'a> BlockRecordDecoder<'a> {
    pub fn new(data: &'a [u8], schema: &'a TableSchema, codec: FieldCodec, mode: DecodeMode) -> Self {
        Self {
            data,
            schema,
            codec,
            mode,
        }
    }

    /// Decodes every record of every block into a new [`TableModel`].
    ///
    /// # Errors
    /// * `TruncatedRecord` in [`DecodeMode::Strict`] when the input ends
    ///   inside a block header or a record
    pub fn decode(&self) -> Result<TableModel> {
        let header_row = self
            .schema
            .fields
            .iter()
            .map(|f| f.name.clone().unwrap_or_default())
            .collect();
        let mut table = TableModel::new(header_row, self.schema.num_records as usize);

        let mut slot = TableModel::HEADER_SLOT;
        for block_index in 0..self.schema.file_blocks as usize {
            match self.decode_block(block_index, slot, &mut table) {
                BlockStep::Done(last) => slot = last,
                BlockStep::Full(last) => {
                    slot = last;
                    break;
                }
                BlockStep::Truncated(truncation) => match self.mode {
                    DecodeMode::Strict => {
                        return Err(PdxError::TruncatedRecord {
                            block: truncation.block,
                            record: truncation.record,
                            decoded_records: truncation.decoded_records,
                        });
                    }
                    DecodeMode::Lenient => {
                        warn!(
                            "Block {} ends inside record slot {}; keeping {} records",
                            truncation.block, truncation.record, truncation.decoded_records
                        );
                        table.set_truncation(truncation);
                        break;
                    }
                },
            }
        }

        if table.num_decoded() < table.declared_records() && !table.is_truncated() {
            debug!(
                "Blocks held {} records, header declares {}",
                table.num_decoded(),
                table.declared_records()
            );
        }
        info!("Decoded {} records (last slot {})", table.num_decoded(), slot);
        Ok(table)
    }

    /// Decodes one block, starting after record slot `slot`.
    fn decode_block(&self, block_index: usize, mut slot: usize, table: &mut TableModel) -> BlockStep {
        let truncated = |slot: usize, table: &TableModel| {
            BlockStep::Truncated(Truncation {
                block: block_index,
                record: slot + 1,
                decoded_records: table.num_decoded(),
            })
        };

        // Records never extend past the block window.
        let offset = self.schema.block_offset(block_index);
        let end = offset.saturating_add(self.schema.block_size_bytes()).min(self.data.len());
        let mut reader = self.data.get(offset..end).unwrap_or_default();
        let (Ok(_next_block), Ok(_block_number), Ok(add_data_size)) = (
            reader.read_u16::<BigEndian>(),
            reader.read_u16::<BigEndian>(),
            reader.read_i16::<LittleEndian>(),
        ) else {
            return truncated(slot, table);
        };

        let records_in_block = (add_data_size as i32 / self.schema.record_size as i32 + 1).max(0) as usize;
        debug!(
            "Block {} at {:#x}: add_data_size={}, {} records",
            block_index, offset, add_data_size, records_in_block
        );

        for record_index in 0..records_in_block {
            if slot >= table.last_slot() {
                warn!(
                    "Block {} holds {} records beyond the declared {}; ignoring them",
                    block_index,
                    records_in_block - record_index,
                    table.declared_records()
                );
                return BlockStep::Full(slot);
            }
            let Some(row) = self.decode_record(&mut reader) else {
                return truncated(slot, table);
            };
            slot = table.push_record(row);
            trace!("Record slot {} committed", slot);
        }
        BlockStep::Done(slot)
    }

    /// Reads one record's fields in order. `None` if the input ends first.
    fn decode_record(&self, reader: &mut &[u8]) -> Option<Vec<FieldValue>> {
        let mut row = Vec::with_capacity(self.schema.num_fields());
        for (index, field) in self.schema.fields.iter().enumerate() {
            let bytes = utils::take(reader, field.stored_width())?;
            let value = self.codec.decode(field.field_type, bytes);
            trace!("Field {} ({:?}): {:?}", index + 1, field.field_type, value);
            row.push(value);
        }
        Some(row)
    }
}
