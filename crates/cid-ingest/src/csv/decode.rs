//! Text decoding and delimiter detection.
//!
//! DataSUS publishes its tables in Latin-1 with `;` separators, while the
//! structured reference tables are usually UTF-8 with `,`. Both are decoded to
//! UTF-8 before parsing.

use std::borrow::Cow;
use std::fmt;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Input text encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8 when the bytes are valid UTF-8, Latin-1 otherwise.
    #[default]
    Auto,
    Utf8,
    /// ISO-8859-1, decoded as its windows-1252 superset.
    Latin1,
}

/// Field separator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delimiter {
    /// Sniffed from the header line.
    #[default]
    Auto,
    Semicolon,
    Comma,
}

impl Delimiter {
    /// Separator byte; `None` for [`Delimiter::Auto`].
    pub fn byte(self) -> Option<u8> {
        match self {
            Delimiter::Auto => None,
            Delimiter::Semicolon => Some(b';'),
            Delimiter::Comma => Some(b','),
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Delimiter::Auto => "auto",
            Delimiter::Semicolon => ";",
            Delimiter::Comma => ",",
        })
    }
}

/// Decoded file contents.
#[derive(Debug, Clone)]
pub struct DecodedText<'a> {
    pub text: Cow<'a, str>,
    /// Name of the encoding actually used.
    pub encoding: &'static str,
    /// Whether malformed sequences were replaced.
    pub had_errors: bool,
}

/// Decodes raw bytes. A byte-order mark always wins over the requested
/// encoding and is stripped from the result.
pub fn decode_bytes(bytes: &[u8], requested: TextEncoding) -> DecodedText<'_> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return DecodedText {
            text,
            encoding: encoding.name(),
            had_errors,
        };
    }

    let encoding = match requested {
        TextEncoding::Utf8 => UTF_8,
        TextEncoding::Latin1 => WINDOWS_1252,
        TextEncoding::Auto => {
            if std::str::from_utf8(bytes).is_ok() {
                UTF_8
            } else {
                WINDOWS_1252
            }
        }
    };
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    DecodedText {
        text,
        encoding: encoding.name(),
        had_errors,
    }
}

/// Resolves [`Delimiter::Auto`] by counting separators on the first line.
/// `;` wins ties, including a single-column header.
pub fn sniff_delimiter(text: &str, requested: Delimiter) -> u8 {
    if let Some(byte) = requested.byte() {
        return byte;
    }
    let header = text.lines().next().unwrap_or("");
    let semicolons = header.matches(';').count();
    let commas = header.matches(',').count();
    if commas > semicolons { b',' } else { b';' }
}
