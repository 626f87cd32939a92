//! Core Paradox reader module

pub mod calendar;
pub mod codec;
pub mod format;
pub mod reader;
pub mod types;
mod utils;

pub use reader::{DecodeOptions, ParadoxReader, ParadoxTable};
pub use types::error::{PdxError, Result};
pub use types::models;
pub use types::table;
