//! The OQCS binary session format.
//!
//! ```text
//! "OQCS"                      4 ASCII bytes
//! version                     i64, 1 or 2
//! source locale               UTF block
//! target locale               UTF block
//! parameters                  UTF block (v1) or i32 count + UTF blocks (v2)
//! document count              i32
//!   input URI, filter id, encoding    UTF blocks, per document
//! signature count             i32
//!   signature                 UTF block, per suppressed issue
//! ```
//!
//! Integers are big-endian. A UTF block is a `u16` byte length followed by
//! modified UTF-8: UTF-16 code units encoded one by one, NUL as `C0 80`.

use std::io::{self, Read, Write};

use crate::error::SessionError;

pub const SIGNATURE: &[u8; 4] = b"OQCS";

/// Parameters fit in a single UTF block.
pub const VERSION_SINGLE_BLOCK: i64 = 1;

/// Parameters are split over several UTF blocks.
pub const VERSION_CHUNKED: i64 = 2;

/// Max UTF-16 code units per parameter block: every unit fits in 3 bytes.
pub const MAX_BLOCK_LEN: usize = 65000 / 3;

const MAX_UTF_BYTES: usize = u16::MAX as usize;

/// A document entry of a session file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    pub input_uri: String,
    pub filter_config_id: String,
    pub encoding: String,
}

/// Everything a session file holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub source_locale: String,
    pub target_locale: String,
    pub parameters: String,
    pub documents: Vec<DocumentEntry>,
    pub signatures: Vec<String>,
}

/// Number of blocks `data` needs in the chunked layout.
pub fn block_count(data: &str) -> usize {
    data.encode_utf16().count().div_ceil(MAX_BLOCK_LEN)
}

pub fn write_session<W: Write>(writer: W, data: &SessionData) -> Result<(), SessionError> {
    let mut w = BlockWriter::new(writer);
    w.write_raw(SIGNATURE)?;
    let version = if block_count(&data.parameters) > 1 {
        VERSION_CHUNKED
    } else {
        VERSION_SINGLE_BLOCK
    };
    w.write_i64(version)?;
    w.write_utf(&data.source_locale)?;
    w.write_utf(&data.target_locale)?;
    if version == VERSION_SINGLE_BLOCK {
        w.write_utf(&data.parameters)?;
    } else {
        w.write_long_string(&data.parameters)?;
    }

    w.write_count(data.documents.len())?;
    for document in &data.documents {
        w.write_utf(&document.input_uri)?;
        w.write_utf(&document.filter_config_id)?;
        w.write_utf(&document.encoding)?;
    }
    w.write_count(data.signatures.len())?;
    for signature in &data.signatures {
        w.write_utf(signature)?;
    }
    w.flush()
}

pub fn read_session<R: Read>(reader: R) -> Result<SessionData, SessionError> {
    let mut r = BlockReader::new(reader);
    let mut signature = [0u8; 4];
    r.read_raw(&mut signature)
        .map_err(|_| SessionError::InvalidSignature)?;
    if &signature != SIGNATURE {
        return Err(SessionError::InvalidSignature);
    }
    let version = r.read_i64()?;
    if !(VERSION_SINGLE_BLOCK..=VERSION_CHUNKED).contains(&version) {
        return Err(SessionError::UnsupportedVersion(version));
    }

    let source_locale = r.read_utf()?;
    let target_locale = r.read_utf()?;
    let parameters = if version == VERSION_SINGLE_BLOCK {
        r.read_utf()?
    } else {
        r.read_long_string()?
    };

    let count = r.read_count()?;
    let mut documents = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        documents.push(DocumentEntry {
            input_uri: r.read_utf()?,
            filter_config_id: r.read_utf()?,
            encoding: r.read_utf()?,
        });
    }
    let count = r.read_count()?;
    let mut signatures = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        signatures.push(r.read_utf()?);
    }

    Ok(SessionData {
        source_locale,
        target_locale,
        parameters,
        documents,
        signatures,
    })
}

// ============================================================
// Block Writer
// ============================================================

pub struct BlockWriter<W: Write> {
    inner: W,
}

impl<W: Write> BlockWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<(), SessionError> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    pub fn write_i64(&mut self, value: i64) -> Result<(), SessionError> {
        self.write_raw(&value.to_be_bytes())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<(), SessionError> {
        self.write_raw(&value.to_be_bytes())
    }

    fn write_count(&mut self, count: usize) -> Result<(), SessionError> {
        let count = i32::try_from(count).map_err(|_| SessionError::InvalidCount(i32::MAX))?;
        self.write_i32(count)
    }

    /// One UTF block.
    pub fn write_utf(&mut self, text: &str) -> Result<(), SessionError> {
        let units: Vec<u16> = text.encode_utf16().collect();
        self.write_units(&units)
    }

    fn write_units(&mut self, units: &[u16]) -> Result<(), SessionError> {
        let encoded = encode_modified_utf8(units);
        if encoded.len() > MAX_UTF_BYTES {
            return Err(SessionError::StringTooLong(encoded.len()));
        }
        self.write_raw(&(encoded.len() as u16).to_be_bytes())?;
        self.write_raw(&encoded)
    }

    /// A block count followed by blocks of at most [`MAX_BLOCK_LEN`] units.
    pub fn write_long_string(&mut self, text: &str) -> Result<(), SessionError> {
        let units: Vec<u16> = text.encode_utf16().collect();
        self.write_count(units.len().div_ceil(MAX_BLOCK_LEN))?;
        for chunk in units.chunks(MAX_BLOCK_LEN) {
            self.write_units(chunk)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), SessionError> {
        self.inner.flush()?;
        Ok(())
    }
}

fn encode_modified_utf8(units: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(units.len());
    for &unit in units {
        match unit {
            0x0001..=0x007F => out.push(unit as u8),
            0x0000 | 0x0080..=0x07FF => {
                out.push(0xC0 | (unit >> 6) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                out.push(0xE0 | (unit >> 12) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }
    out
}

// ============================================================
// Block Reader
// ============================================================

pub struct BlockReader<R: Read> {
    inner: R,
}

impl<R: Read> BlockReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn read_raw(&mut self, buf: &mut [u8]) -> Result<(), SessionError> {
        self.inner.read_exact(buf).map_err(|err| match err.kind() {
            io::ErrorKind::UnexpectedEof => SessionError::Truncated,
            _ => SessionError::Io(err),
        })
    }

    pub fn read_i64(&mut self) -> Result<i64, SessionError> {
        let mut buf = [0u8; 8];
        self.read_raw(&mut buf)?;
        Ok(i64::from_be_bytes(buf))
    }

    pub fn read_i32(&mut self) -> Result<i32, SessionError> {
        let mut buf = [0u8; 4];
        self.read_raw(&mut buf)?;
        Ok(i32::from_be_bytes(buf))
    }

    fn read_count(&mut self) -> Result<usize, SessionError> {
        let count = self.read_i32()?;
        usize::try_from(count).map_err(|_| SessionError::InvalidCount(count))
    }

    pub fn read_utf(&mut self) -> Result<String, SessionError> {
        let units = self.read_units()?;
        from_units(&units)
    }

    fn read_units(&mut self) -> Result<Vec<u16>, SessionError> {
        let mut len = [0u8; 2];
        self.read_raw(&mut len)?;
        let mut bytes = vec![0u8; u16::from_be_bytes(len) as usize];
        self.read_raw(&mut bytes)?;
        decode_modified_utf8(&bytes)
    }

    /// Blocks are joined at the code-unit level, so a surrogate pair split
    /// across two blocks decodes back to one char.
    pub fn read_long_string(&mut self) -> Result<String, SessionError> {
        let count = self.read_count()?;
        let mut units = Vec::new();
        for _ in 0..count {
            units.extend(self.read_units()?);
        }
        from_units(&units)
    }
}

fn from_units(units: &[u16]) -> Result<String, SessionError> {
    String::from_utf16(units).map_err(|err| SessionError::InvalidUtf(err.to_string()))
}

fn decode_modified_utf8(bytes: &[u8]) -> Result<Vec<u16>, SessionError> {
    let invalid = |at: usize| SessionError::InvalidUtf(format!("malformed input around byte {}", at));
    let continuation = |at: usize| -> Result<u16, SessionError> {
        match bytes.get(at) {
            Some(&b) if b & 0xC0 == 0x80 => Ok((b & 0x3F) as u16),
            _ => Err(invalid(at)),
        }
    };

    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b >> 4 {
            0x0..=0x7 => {
                units.push(b as u16);
                i += 1;
            }
            0xC | 0xD => {
                units.push(((b & 0x1F) as u16) << 6 | continuation(i + 1)?);
                i += 2;
            }
            0xE => {
                units.push(((b & 0x0F) as u16) << 12 | continuation(i + 1)? << 6 | continuation(i + 2)?);
                i += 3;
            }
            _ => return Err(invalid(i)),
        }
    }
    Ok(units)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn data(parameters: &str) -> SessionData {
        SessionData {
            source_locale: "en".to_string(),
            target_locale: "fr".to_string(),
            parameters: parameters.to_string(),
            documents: vec![DocumentEntry {
                input_uri: "file:///work/doc.json".to_string(),
                filter_config_id: "json".to_string(),
                encoding: "UTF-8".to_string(),
            }],
            signatures: vec!["1:abc".to_string()],
        }
    }

    fn encode(data: &SessionData) -> Vec<u8> {
        let mut bytes = Vec::new();
        write_session(&mut bytes, data).unwrap();
        bytes
    }

    #[test]
    fn test_layout() {
        let bytes = encode(&data("#v1"));
        assert_eq!(&bytes[..4], b"OQCS");
        assert_eq!(&bytes[4..12], &1i64.to_be_bytes());
        // "en"
        assert_eq!(&bytes[12..16], &[0, 2, b'e', b'n']);
        assert_eq!(read_session(bytes.as_slice()).unwrap(), data("#v1"));
    }

    #[test]
    fn test_long_parameters_use_chunks() {
        let parameters = "x".repeat(MAX_BLOCK_LEN * 2 + 5);
        let bytes = encode(&data(&parameters));
        assert_eq!(&bytes[4..12], &2i64.to_be_bytes());
        // count after the two locale blocks
        assert_eq!(&bytes[20..24], &3i32.to_be_bytes());
        assert_eq!(read_session(bytes.as_slice()).unwrap().parameters, parameters);
    }

    #[test]
    fn test_block_count() {
        assert_eq!(block_count(""), 0);
        assert_eq!(block_count(&"a".repeat(MAX_BLOCK_LEN)), 1);
        assert_eq!(block_count(&"a".repeat(MAX_BLOCK_LEN + 1)), 2);
    }

    #[test]
    fn test_modified_utf8() {
        let units: Vec<u16> = "a\0é€😀".encode_utf16().collect();
        let encoded = encode_modified_utf8(&units);
        assert_eq!(&encoded[..3], &[b'a', 0xC0, 0x80]);
        // The emoji is two surrogates of three bytes each.
        assert_eq!(encoded.len(), 1 + 2 + 2 + 3 + 6);
        assert_eq!(decode_modified_utf8(&encoded).unwrap(), units);
    }

    #[test]
    fn test_surrogate_pair_split_across_blocks() {
        let mut text = "a".repeat(MAX_BLOCK_LEN - 1);
        text.push('😀');
        let mut bytes = Vec::new();
        BlockWriter::new(&mut bytes).write_long_string(&text).unwrap();
        assert_eq!(&bytes[..4], &2i32.to_be_bytes());
        assert_eq!(BlockReader::new(bytes.as_slice()).read_long_string().unwrap(), text);
    }

    #[test]
    fn test_block_too_long() {
        let text = "€".repeat(MAX_UTF_BYTES / 3 + 1);
        let mut bytes = Vec::new();
        let err = BlockWriter::new(&mut bytes).write_utf(&text).unwrap_err();
        assert!(matches!(err, SessionError::StringTooLong(_)));
    }

    #[test]
    fn test_bad_signature() {
        let mut bytes = encode(&data("#v1"));
        bytes[0] = b'X';
        assert!(matches!(read_session(bytes.as_slice()), Err(SessionError::InvalidSignature)));
        assert!(matches!(read_session(&b"OQ"[..]), Err(SessionError::InvalidSignature)));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = encode(&data("#v1"));
        bytes[4..12].copy_from_slice(&3i64.to_be_bytes());
        assert!(matches!(
            read_session(bytes.as_slice()),
            Err(SessionError::UnsupportedVersion(3))
        ));
    }

    #[test]
    fn test_truncated_file() {
        let bytes = encode(&data("#v1"));
        let result = read_session(&bytes[..bytes.len() - 2]);
        assert!(matches!(result, Err(SessionError::Truncated)));
    }
}
