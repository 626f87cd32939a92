//! Paradox table header parsing.
//!
//! This module handles:
//! - Reading the fixed 0x58-byte header
//! - Resolving the layout variant from the file type and version bytes
//! - Reading the extended block of format 4.0+ data files
//! - Reading field descriptors and names

use byteorder::{LittleEndian, ReadBytesExt};
use log::{debug, info, trace, warn};

use super::blocks::BLOCK_HEADER_LEN;
use crate::paradox::codec::text::{TextDecoder, TextEncoding};
use crate::paradox::types::{
    error::{PdxError, Result},
    models::{FieldSpec, FieldType, SchemaVariant, TableSchema},
};
use crate::paradox::utils;

/// Size of the fixed header shared by every layout.
pub const FIXED_HEADER_LEN: usize = 0x58;
/// Size of the extra block the extended layout inserts after the fixed header.
pub const EXTENDED_BLOCK_LEN: usize = 0x20;

/// Unknown bytes between the descriptor pairs and the name list.
const FIELDS_ONLY_GAP: usize = 4;
const DATA_GAP: usize = 83;

/// Values read from the fixed part of the header.
#[derive(Debug)]
struct FixedHeader {
    record_size: u16,
    header_size: u16,
    file_type: u8,
    block_size_units: u8,
    num_records: i32,
    file_blocks: u16,
    num_fields: i16,
    primary_key_fields: i16,
    encryption1: i32,
    sort_order: u8,
    file_version: u8,
    auto_increment: i32,
}

/// Values read from the extended block.
#[derive(Debug)]
struct ExtendedHeader {
    encryption2: i32,
    dos_code_page: u16,
}

/// Parses the table header at the start of `data`.
///
/// # Header Structure
/// ```text
/// [0x00..0x58]  fixed header, little-endian
/// [0x58..0x78]  extended block (format 4.0+ data files only)
/// [n * 2 bytes] (type, size) descriptor pairs
/// [gap]         4 + n*4 bytes (index files) or 83 + n*4 bytes (data files)
/// [names]       n NUL-terminated field names (data files only)
/// ```
///
/// # Arguments
/// * `data` - The whole file contents
/// * `encoding` - How to decode field names
///
/// # Errors
/// * `MalformedHeader` if the buffer ends inside a required field or a
///   count is impossible
/// * `UnsupportedSchemaVariant` for unknown file type/version combinations
/// * `UnknownFieldType` for a descriptor with an unknown type tag
pub fn parse(data: &[u8], encoding: TextEncoding) -> Result<TableSchema> {
    info!("Parsing Paradox header ({} bytes of input)", data.len());

    // Step 1: Fixed header
    let mut reader = data;
    let fixed = read_fixed(&mut reader)?;
    trace!("Fixed header: {:?}", fixed);

    let variant = SchemaVariant::detect(fixed.file_type, fixed.file_version)?;
    debug!(
        "File type {} version {} resolved to the {} layout",
        fixed.file_type, fixed.file_version, variant
    );
    validate(&fixed)?;
    let num_fields = fixed.num_fields as usize;

    // Step 2: Extended block
    let extended = match variant {
        SchemaVariant::Extended => Some(read_extended(&mut reader)?),
        SchemaVariant::FieldsOnly | SchemaVariant::Legacy => None,
    };
    let encrypted = fixed.encryption1 != 0 || extended.as_ref().is_some_and(|e| e.encryption2 != 0);
    if encrypted {
        warn!("Table is password protected; field contents will not decode meaningfully");
    }
    let dos_code_page = extended.map(|e| e.dos_code_page);

    // Step 3: Field descriptors
    let mut fields = read_descriptors(&mut reader, num_fields)?;

    // Step 4: Gap and names
    let gap = match variant {
        SchemaVariant::FieldsOnly => FIELDS_ONLY_GAP,
        SchemaVariant::Legacy | SchemaVariant::Extended => DATA_GAP,
    } + num_fields * 4;
    let skipped = utils::skip(&mut reader, gap);
    if skipped < gap {
        debug!("Header ended {} bytes into a {}-byte gap", skipped, gap);
    }
    if variant.has_field_names() {
        let text = encoding.resolve(dos_code_page);
        read_names(&mut reader, &mut fields, &text)?;
    }

    let schema = TableSchema {
        record_size: fixed.record_size,
        header_size: fixed.header_size,
        file_type: fixed.file_type,
        block_size_units: fixed.block_size_units,
        num_records: fixed.num_records as u32,
        file_blocks: fixed.file_blocks,
        file_version: fixed.file_version,
        variant,
        primary_key_fields: fixed.primary_key_fields,
        sort_order: fixed.sort_order,
        encrypted,
        auto_increment: fixed.auto_increment,
        dos_code_page,
        fields,
    };
    info!(
        "Header parsed: {} fields, {} records in {} blocks of {} bytes",
        schema.num_fields(),
        schema.num_records,
        schema.file_blocks,
        schema.block_size_bytes()
    );
    Ok(schema)
}

fn malformed(what: &str) -> PdxError {
    PdxError::MalformedHeader(format!("input ends before {}", what))
}

fn read_fixed(reader: &mut &[u8]) -> Result<FixedHeader> {
    if reader.len() < FIXED_HEADER_LEN {
        return Err(PdxError::MalformedHeader(format!(
            "expected at least {} header bytes, found {}",
            FIXED_HEADER_LEN,
            reader.len()
        )));
    }
    let eof = |_| malformed("the end of the fixed header");

    let record_size = reader.read_u16::<LittleEndian>().map_err(eof)?; // 0x00
    let header_size = reader.read_u16::<LittleEndian>().map_err(eof)?; // 0x02
    let file_type = reader.read_u8().map_err(eof)?; // 0x04
    let block_size_units = reader.read_u8().map_err(eof)?; // 0x05
    let num_records = reader.read_i32::<LittleEndian>().map_err(eof)?; // 0x06
    let next_block = reader.read_u16::<LittleEndian>().map_err(eof)?; // 0x0A
    let file_blocks = reader.read_u16::<LittleEndian>().map_err(eof)?; // 0x0C
    let first_block = reader.read_u16::<LittleEndian>().map_err(eof)?; // 0x0E
    let last_block = reader.read_u16::<LittleEndian>().map_err(eof)?; // 0x10
    trace!("Blocks: next={} first={} last={}", next_block, first_block, last_block);
    utils::skip(reader, 0x21 - 0x12);
    let num_fields = reader.read_i16::<LittleEndian>().map_err(eof)?; // 0x21
    let primary_key_fields = reader.read_i16::<LittleEndian>().map_err(eof)?; // 0x23
    let encryption1 = reader.read_i32::<LittleEndian>().map_err(eof)?; // 0x25
    let sort_order = reader.read_u8().map_err(eof)?; // 0x29
    utils::skip(reader, 0x39 - 0x2A);
    let file_version = reader.read_u8().map_err(eof)?; // 0x39
    utils::skip(reader, 0x49 - 0x3A);
    let auto_increment = reader.read_i32::<LittleEndian>().map_err(eof)?; // 0x49
    utils::skip(reader, FIXED_HEADER_LEN - 0x4D);

    Ok(FixedHeader {
        record_size,
        header_size,
        file_type,
        block_size_units,
        num_records,
        file_blocks,
        num_fields,
        primary_key_fields,
        encryption1,
        sort_order,
        file_version,
        auto_increment,
    })
}

fn validate(fixed: &FixedHeader) -> Result<()> {
    if fixed.record_size == 0 {
        return Err(PdxError::MalformedHeader("record size is 0".to_string()));
    }
    if fixed.num_fields <= 0 {
        return Err(PdxError::MalformedHeader(format!(
            "field count is {}",
            fixed.num_fields
        )));
    }
    if fixed.num_records < 0 {
        return Err(PdxError::MalformedHeader(format!(
            "record count is {}",
            fixed.num_records
        )));
    }
    if fixed.block_size_units == 0 && fixed.file_blocks > 0 {
        return Err(PdxError::MalformedHeader(
            "block size is 0 but the table has data blocks".to_string(),
        ));
    }
    let block_size = fixed.block_size_units as usize * 1024;
    let records_per_block = block_size.saturating_sub(BLOCK_HEADER_LEN) / fixed.record_size as usize;
    let capacity = fixed.file_blocks as usize * records_per_block;
    if fixed.num_records as usize > capacity {
        return Err(PdxError::MalformedHeader(format!(
            "record count {} exceeds the {} records {} blocks can hold",
            fixed.num_records, capacity, fixed.file_blocks
        )));
    }
    Ok(())
}

fn read_extended(reader: &mut &[u8]) -> Result<ExtendedHeader> {
    let eof = |_| malformed("the end of the extended header");

    let file_ver_id2 = reader.read_i16::<LittleEndian>().map_err(eof)?; // 0x58
    let file_ver_id3 = reader.read_i16::<LittleEndian>().map_err(eof)?; // 0x5A
    let encryption2 = reader.read_i32::<LittleEndian>().map_err(eof)?; // 0x5C
    let file_update_time = reader.read_i32::<LittleEndian>().map_err(eof)?; // 0x60
    let hi_field_id = reader.read_i16::<LittleEndian>().map_err(eof)?; // 0x64
    let hi_field_id_info = reader.read_i16::<LittleEndian>().map_err(eof)?; // 0x66
    let sometimes_num_fields = reader.read_i16::<LittleEndian>().map_err(eof)?; // 0x68
    let dos_code_page = reader.read_u16::<LittleEndian>().map_err(eof)?; // 0x6A
    utils::take(reader, 4).ok_or_else(|| malformed("the end of the extended header"))?;
    let change_count4 = reader.read_i16::<LittleEndian>().map_err(eof)?; // 0x70
    utils::take(reader, 6).ok_or_else(|| malformed("the end of the extended header"))?;

    trace!(
        "Extended header: ver2={} ver3={} updated={} hi_field={}/{} fields={} changes={}",
        file_ver_id2,
        file_ver_id3,
        file_update_time,
        hi_field_id,
        hi_field_id_info,
        sometimes_num_fields,
        change_count4
    );
    debug!("DOS code page {}", dos_code_page);

    Ok(ExtendedHeader {
        encryption2,
        dos_code_page,
    })
}

fn read_descriptors(reader: &mut &[u8], num_fields: usize) -> Result<Vec<FieldSpec>> {
    let mut fields = Vec::with_capacity(num_fields);
    for index in 1..=num_fields {
        let eof = |_| malformed(&format!("the descriptor of field {}", index));
        let tag = reader.read_u8().map_err(eof)?;
        let size = reader.read_u8().map_err(eof)?;
        let field_type =
            FieldType::try_from(tag).map_err(|tag| PdxError::UnknownFieldType { field: index, tag })?;
        trace!("Field {}: {:?}, size {}", index, field_type, size);
        fields.push(FieldSpec {
            field_type,
            size,
            name: None,
        });
    }
    Ok(fields)
}

fn read_names(reader: &mut &[u8], fields: &mut [FieldSpec], text: &TextDecoder) -> Result<()> {
    for (index, field) in fields.iter_mut().enumerate() {
        let raw = utils::read_null_terminated(reader)
            .ok_or_else(|| malformed(&format!("the name of field {}", index + 1)))?;
        let name = text.decode(raw);
        trace!("Field {} name: {:?}", index + 1, name);
        field.name = Some(name);
    }
    Ok(())
}
