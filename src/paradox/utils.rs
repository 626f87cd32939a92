//! Low-level byte reading utilities.
//!
//! All readers here are plain `&[u8]` cursors: reading advances the slice.

/// Takes exactly `count` bytes, or `None` if fewer remain.
pub fn take<'a>(reader: &mut &'a [u8], count: usize) -> Option<&'a [u8]> {
    if reader.len() < count {
        return None;
    }
    let (head, tail) = reader.split_at(count);
    *reader = tail;
    Some(head)
}

/// Advances by up to `count` bytes. Running off the end is not an error.
///
/// Returns the number of bytes actually skipped.
pub fn skip(reader: &mut &[u8], count: usize) -> usize {
    let n = count.min(reader.len());
    *reader = &reader[n..];
    n
}

/// Reads bytes up to a zero terminator. The terminator is consumed but not
/// returned. `None` if the input ends first.
pub fn read_null_terminated<'a>(reader: &mut &'a [u8]) -> Option<&'a [u8]> {
    let end = reader.iter().position(|&b| b == 0)?;
    let bytes = &reader[..end];
    *reader = &reader[end + 1..];
    Some(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_helpers_advance_the_slice() {
        let data = [b'I', b'D', 0, b'X', 1, 2];
        let mut reader = &data[..];
        assert_eq!(read_null_terminated(&mut reader), Some(&b"ID"[..]));
        assert_eq!(take(&mut reader, 1), Some(&b"X"[..]));
        assert_eq!(take(&mut reader, 3), None);
        assert_eq!(skip(&mut reader, 10), 2);
        assert!(reader.is_empty());
        assert_eq!(read_null_terminated(&mut reader), None);
    }
}
