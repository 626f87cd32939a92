//! On-disk layout: the table header and the data blocks.

pub mod blocks;
pub mod header;
