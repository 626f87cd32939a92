//! Decoding of individual field payloads and text.

pub mod field;
pub mod text;
