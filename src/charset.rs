//! Character sets: encodability, encoded sizes, and document decoding.

use encoding_rs::{Encoding, UTF_8};

use crate::error::{ConfigError, FilterError};

/// A named output character set.
#[derive(Debug, Clone, Copy)]
pub enum Charset {
    Ascii,
    Latin1,
    Utf8,
    Utf16,
    Utf32,
    Other(&'static Encoding),
}

impl Charset {
    /// Resolves a charset name (`ISO-8859-1`, `UTF-16LE`, `shift_jis`, ...).
    pub fn for_name(name: &str) -> Result<Self, ConfigError> {
        let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
        let charset = match normalized.as_str() {
            "us-ascii" | "ascii" => Charset::Ascii,
            // encoding_rs folds these into windows-1252, which is wider.
            "iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" | "l1" | "cp819" => Charset::Latin1,
            "utf-8" | "utf8" => Charset::Utf8,
            "utf-16" | "utf-16be" | "utf-16le" | "utf16" => Charset::Utf16,
            "utf-32" | "utf-32be" | "utf-32le" | "utf32" => Charset::Utf32,
            _ => match Encoding::for_label(name.trim().as_bytes()) {
                Some(encoding) if encoding == UTF_8 => Charset::Utf8,
                Some(encoding) => Charset::Other(encoding),
                None => return Err(ConfigError::UnknownCharset(name.to_string())),
            },
        };
        Ok(charset)
    }

    pub fn can_encode(&self, c: char) -> bool {
        match self {
            Charset::Ascii => c.is_ascii(),
            Charset::Latin1 => (c as u32) <= 0xFF,
            Charset::Utf8 | Charset::Utf16 | Charset::Utf32 => true,
            Charset::Other(encoding) => {
                let mut buf = [0u8; 4];
                let (_, _, had_errors) = encoding.encode(c.encode_utf8(&mut buf));
                !had_errors
            }
        }
    }

    /// Number of bytes `text` takes in this charset, without any byte-order mark.
    ///
    /// Returns the first unencodable char as the error.
    pub fn encoded_len(&self, text: &str) -> Result<usize, char> {
        if let Some(bad) = text.chars().find(|c| !self.can_encode(*c)) {
            return Err(bad);
        }
        let len = match self {
            Charset::Ascii | Charset::Latin1 => text.chars().count(),
            Charset::Utf8 => text.len(),
            Charset::Utf16 => text.encode_utf16().count() * 2,
            Charset::Utf32 => text.chars().count() * 4,
            Charset::Other(encoding) => encoding.encode(text).0.len(),
        };
        Ok(len)
    }
}

/// Decodes raw document bytes with the given encoding label.
///
/// A byte-order mark, when present, wins over the label.
pub fn decode(bytes: &[u8], label: &str) -> Result<String, FilterError> {
    let encoding = if label.trim().is_empty() {
        UTF_8
    } else {
        Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| FilterError::UnknownEncoding(label.to_string()))?
    };
    let (text, _, _) = encoding.decode(bytes);
    Ok(text.into_owned())
}
