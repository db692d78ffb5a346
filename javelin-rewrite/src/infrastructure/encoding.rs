//! Decoding source files of unknown encoding

use encoding_rs::{UTF_16BE, UTF_16LE, WINDOWS_1252};
use std::path::Path;

/// Why a file could not be turned into text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeFailure {
    Binary,
}

#[derive(Debug)]
pub enum SourceReadError {
    Io(std::io::Error),
    Binary,
}

/// How a source file was stored on disk, so rewrites can keep it that way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceEncoding {
    #[default]
    Utf8,
    Utf8Bom,
    Utf16Le,
    Utf16Be,
    Windows1252,
}

impl SourceEncoding {
    /// Encodes `text` back into this encoding, BOM included. `None` when the
    /// text holds characters the encoding cannot represent.
    pub fn encode(&self, text: &str) -> Option<Vec<u8>> {
        match self {
            Self::Utf8 => Some(text.as_bytes().to_vec()),
            Self::Utf8Bom => {
                let mut bytes = vec![0xEF, 0xBB, 0xBF];
                bytes.extend_from_slice(text.as_bytes());
                Some(bytes)
            }
            Self::Utf16Le => {
                let mut bytes = vec![0xFF, 0xFE];
                bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
                Some(bytes)
            }
            Self::Utf16Be => {
                let mut bytes = vec![0xFE, 0xFF];
                bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
                Some(bytes)
            }
            Self::Windows1252 => {
                let (bytes, _, unmappable) = WINDOWS_1252.encode(text);
                (!unmappable).then(|| bytes.into_owned())
            }
        }
    }
}

/// Reads and decodes a file with [`decode_source`]
pub fn read_source_file(path: &Path) -> Result<String, SourceReadError> {
    read_source_file_detected(path).map(|(text, _)| text)
}

/// Like [`read_source_file`], also reporting the encoding that was detected
pub fn read_source_file_detected(path: &Path) -> Result<(String, SourceEncoding), SourceReadError> {
    let bytes = std::fs::read(path).map_err(SourceReadError::Io)?;
    decode_source_detected(&bytes).map_err(|DecodeFailure::Binary| SourceReadError::Binary)
}

/// Decodes bytes as UTF-8, BOM-declared UTF-16, or Windows-1252.
///
/// Content with NUL bytes and no UTF-16 BOM is treated as binary.
pub fn decode_source(bytes: &[u8]) -> Result<String, DecodeFailure> {
    decode_source_detected(bytes).map(|(text, _)| text)
}

pub fn decode_source_detected(bytes: &[u8]) -> Result<(String, SourceEncoding), DecodeFailure> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return Ok((String::from_utf8_lossy(rest).into_owned(), SourceEncoding::Utf8Bom));
    }
    if bytes.starts_with(&[0xFF, 0xFE]) {
        let (text, _, _) = UTF_16LE.decode(bytes);
        return Ok((text.into_owned(), SourceEncoding::Utf16Le));
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        let (text, _, _) = UTF_16BE.decode(bytes);
        return Ok((text.into_owned(), SourceEncoding::Utf16Be));
    }
    if bytes.contains(&0) {
        return Err(DecodeFailure::Binary);
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Ok((text.to_string(), SourceEncoding::Utf8)),
        Err(_) => {
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            Ok((text.into_owned(), SourceEncoding::Windows1252))
        }
    }
}
