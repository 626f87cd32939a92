//! Text decoding for Alpha fields and field names.
//!
//! Paradox stores text in the DOS or Windows code page of the machine that
//! wrote the table. Without further information each byte is mapped to the
//! Unicode code point of the same value (ISO-8859-1 semantics).

use encoding_rs::Encoding;
use log::debug;

/// Which character set to use for Alpha fields and field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// One byte, one code point.
    #[default]
    Latin1,
    /// Always decode with this encoding.
    Fixed(&'static Encoding),
    /// Use the code page recorded in the extended header, falling back to
    /// `Latin1` when the header has none or it is not supported.
    HeaderCodePage,
}

impl TextEncoding {
    /// Picks the concrete decoder once the header's code page is known.
    pub fn resolve(&self, code_page: Option<u16>) -> TextDecoder {
        match self {
            TextEncoding::Latin1 => TextDecoder::LATIN1,
            TextEncoding::Fixed(encoding) => TextDecoder(Some(*encoding)),
            TextEncoding::HeaderCodePage => {
                let encoding = code_page.and_then(code_page_encoding);
                match (code_page, encoding) {
                    (Some(cp), Some(enc)) => debug!("Code page {} decoded as {}", cp, enc.name()),
                    (Some(cp), None) => debug!("Code page {} has no decoder, using Latin-1", cp),
                    (None, _) => debug!("No code page in header, using Latin-1"),
                }
                TextDecoder(encoding)
            }
        }
    }
}

/// A resolved text decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextDecoder(Option<&'static Encoding>);

impl TextDecoder {
    pub const LATIN1: Self = Self(None);

    /// Name of the character set, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.0.map_or("ISO-8859-1", Encoding::name)
    }

    /// Decodes `bytes`, dropping embedded NUL bytes instead of stopping at them.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self.0 {
            None => bytes.iter().filter(|&&b| b != 0).map(|&b| b as char).collect(),
            Some(encoding) => {
                let kept: Vec<u8> = bytes.iter().copied().filter(|&b| b != 0).collect();
                let (text, _, _) = encoding.decode(&kept);
                text.into_owned()
            }
        }
    }
}

impl Default for TextDecoder {
    fn default() -> Self {
        Self::LATIN1
    }
}

/// Looks up an encoding by WHATWG label, normalizing the GBK family to GB18030.
pub fn parse_encoding(label: &str) -> Option<&'static Encoding> {
    let label = label.trim();
    let label = if label.eq_ignore_ascii_case("GBK") || label.eq_ignore_ascii_case("GB2312") {
        "GB18030"
    } else {
        label
    };
    Encoding::for_label(label.as_bytes())
}

/// Maps a DOS/Windows code page number to an encoding, where one exists.
pub fn code_page_encoding(code_page: u16) -> Option<&'static Encoding> {
    match code_page {
        866 => Some(encoding_rs::IBM866),
        874 => Some(encoding_rs::WINDOWS_874),
        932 => Some(encoding_rs::SHIFT_JIS),
        936 => Some(encoding_rs::GB18030),
        949 => Some(encoding_rs::EUC_KR),
        950 => Some(encoding_rs::BIG5),
        1250..=1258 => Encoding::for_label(format!("windows-{}", code_page).as_bytes()),
        _ => None,
    }
}
