//! Field codec: raw record bytes plus a type tag in, a [`FieldValue`] out.
//!
//! Numeric fields use Paradox's order-preserving encoding: the value is stored
//! big-endian with bit 7 of the first byte inverted. An all-zero pattern is the
//! null marker and is checked before the bit is restored.

use byteorder::{BigEndian, ByteOrder};
use log::{trace, warn};

use super::text::TextDecoder;
use crate::paradox::calendar::{Calendar, OrdinalDate};
use crate::paradox::types::models::{FieldType, FieldValue};

/// Paradox day number of 1970-01-01 (0001-01-01 is day 1).
pub const PARADOX_DAY_OFFSET: i32 = 719_163;

/// Decodes individual fields for one table.
#[derive(Debug, Clone, Copy)]
pub struct FieldCodec {
    text: TextDecoder,
    calendar: Calendar,
}

impl FieldCodec {
    pub fn new(text: TextDecoder, calendar: Calendar) -> Self {
        Self { text, calendar }
    }

    /// Decodes one field from exactly its stored width of bytes.
    ///
    /// Shorter input is zero-padded on the right; the record walk never
    /// passes a short slice.
    pub fn decode(&self, field_type: FieldType, bytes: &[u8]) -> FieldValue {
        if field_type.is_opaque() {
            trace!("Skipping {} bytes of {:?}", bytes.len(), field_type);
            return FieldValue::Opaque(field_type);
        }
        if field_type == FieldType::Alpha {
            return FieldValue::Alpha(self.text.decode(bytes));
        }
        if bytes.iter().all(|&b| b == 0) {
            return FieldValue::Empty;
        }

        match field_type {
            FieldType::Short => FieldValue::Short(BigEndian::read_i16(&unflip::<2>(bytes))),
            FieldType::Long => FieldValue::Long(BigEndian::read_i32(&unflip::<4>(bytes))),
            FieldType::AutoInc => FieldValue::AutoInc(BigEndian::read_i32(&unflip::<4>(bytes))),
            FieldType::Number => FieldValue::Number(BigEndian::read_f64(&unflip::<8>(bytes))),
            FieldType::Currency => FieldValue::Currency(BigEndian::read_f64(&unflip::<8>(bytes))),
            FieldType::Logical => FieldValue::Logical(bytes[0] ^ 0x80),
            FieldType::Time => FieldValue::Time(BigEndian::read_i32(&unflip::<4>(bytes))),
            FieldType::Timestamp => FieldValue::Timestamp(BigEndian::read_i64(&unflip::<8>(bytes))),
            FieldType::Date => self.decode_date(BigEndian::read_i32(&unflip::<4>(bytes))),
            // Alpha and the opaque types returned above.
            _ => FieldValue::Opaque(field_type),
        }
    }

    /// Converts a Paradox day number (days since 0001-01-01, counting from 1)
    /// to a calendar date.
    fn decode_date(&self, paradox_days: i32) -> FieldValue {
        let Some(days) = paradox_days.checked_sub(PARADOX_DAY_OFFSET) else {
            warn!("Date value {} underflows the ordinal range", paradox_days);
            return FieldValue::InvalidDate(paradox_days);
        };
        let ordinal = OrdinalDate::new(days);
        if ordinal.is_null() {
            warn!("Date value {} decodes to the null ordinal", paradox_days);
            return FieldValue::InvalidDate(days);
        }
        match self.calendar.to_date(ordinal) {
            Ok(date) => FieldValue::Date(date),
            Err(e) => {
                warn!("Date value {} rejected: {}", paradox_days, e);
                FieldValue::InvalidDate(days)
            }
        }
    }
}

/// Copies the first `N` bytes and restores the inverted sign bit.
fn unflip<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut raw = [0u8; N];
    let n = bytes.len().min(N);
    raw[..n].copy_from_slice(&bytes[..n]);
    raw[0] ^= 0x80;
    raw
}

/// Formats a double the way the legacy tool printed it.
///
/// Magnitudes in `[1e-3, 1e7)` print as plain decimals, everything else in
/// scientific notation with an upper-case `E`. A fractional digit is always
/// present.
pub(crate) fn format_double(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let magnitude = value.abs();
    if (1e-3..1e7).contains(&magnitude) {
        let mut text = value.to_string();
        if !text.contains('.') {
            text.push_str(".0");
        }
        return text;
    }

    let sci = format!("{:e}", value);
    match sci.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => format!("{}E{}", mantissa, exponent),
        Some((mantissa, exponent)) => format!("{}.0E{}", mantissa, exponent),
        None => sci,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_decimals_keep_a_fraction_digit() {
        assert_eq!(format_double(5.0), "5.0");
        assert_eq!(format_double(-0.5), "-0.5");
        assert_eq!(format_double(1234567.25), "1234567.25");
        assert_eq!(format_double(0.001), "0.001");
    }

    #[test]
    fn large_and_small_magnitudes_use_exponents() {
        assert_eq!(format_double(1e7), "1.0E7");
        assert_eq!(format_double(1e-4), "1.0E-4");
        assert_eq!(format_double(-2.5e10), "-2.5E10");
    }

    #[test]
    fn special_values() {
        assert_eq!(format_double(0.0), "0.0");
        assert_eq!(format_double(-0.0), "-0.0");
        assert_eq!(format_double(f64::NAN), "NaN");
        assert_eq!(format_double(f64::INFINITY), "Infinity");
        assert_eq!(format_double(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn sign_bit_is_restored() {
        let codec = FieldCodec::new(TextDecoder::LATIN1, Calendar::default());
        assert_eq!(codec.decode(FieldType::Short, &[0x80, 0x05]), FieldValue::Short(5));
        assert_eq!(codec.decode(FieldType::Short, &[0x7F, 0xFB]), FieldValue::Short(-5));
        assert_eq!(codec.decode(FieldType::Long, &[0, 0, 0, 0]), FieldValue::Empty);
    }
}
