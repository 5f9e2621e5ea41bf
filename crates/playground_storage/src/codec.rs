//! Reversible text compression used when a raw payload does not fit in storage.

use std::io::{Read, Write};

use base64::{engine::general_purpose, Engine as _};
use flate2::{read::DeflateDecoder, write::DeflateEncoder, Compression};
use thiserror::Error;

#[derive(Debug, Error)]
/// Compression failure.
pub enum CodecError {
    /// The encoder rejected the input.
    #[error("compression failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Text-to-token codec whose tokens are themselves storable strings.
pub trait CompressionCodec {
    /// Compresses `text` into a storable token.
    ///
    /// # Errors
    ///
    /// Returns an error when the encoder fails.
    fn compress(&self, text: &str) -> Result<String, CodecError>;

    /// Restores the text behind `token`.
    ///
    /// Input that is not a valid token is returned unchanged.
    fn decompress(&self, token: &str) -> String;
}

#[derive(Debug, Clone, Copy)]
/// Raw DEFLATE compressed, then standard base64 encoded.
pub struct DeflateBase64Codec {
    level: Compression,
}

impl Default for DeflateBase64Codec {
    fn default() -> Self {
        Self {
            level: Compression::best(),
        }
    }
}

impl DeflateBase64Codec {
    /// Creates a codec with an explicit DEFLATE level (0-9).
    pub fn with_level(level: u32) -> Self {
        Self {
            level: Compression::new(level.min(9)),
        }
    }

    fn try_decompress(token: &str) -> Option<String> {
        let compressed = general_purpose::STANDARD.decode(token.trim()).ok()?;
        let mut text = String::new();
        DeflateDecoder::new(compressed.as_slice())
            .read_to_string(&mut text)
            .ok()?;
        Some(text)
    }
}

impl CompressionCodec for DeflateBase64Codec {
    fn compress(&self, text: &str) -> Result<String, CodecError> {
        let mut encoder = DeflateEncoder::new(Vec::new(), self.level);
        encoder.write_all(text.as_bytes())?;
        let compressed = encoder.finish()?;
        Ok(general_purpose::STANDARD.encode(compressed))
    }

    fn decompress(&self, token: &str) -> String {
        Self::try_decompress(token).unwrap_or_else(|| token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compressed_tokens_restore_original_text() {
        let codec = DeflateBase64Codec::default();
        let text = "{\"blocks\":[".to_string() + &"{\"type\":\"divider\"},".repeat(200) + "{}]}";

        let token = codec.compress(&text).expect("compress");
        assert!(token.len() < text.len());
        assert_eq!(codec.decompress(&token), text);
    }

    #[test]
    fn non_token_input_is_returned_unchanged() {
        let codec = DeflateBase64Codec::default();
        assert_eq!(codec.decompress("[1, 2, 3]"), "[1, 2, 3]");
        assert_eq!(codec.decompress("aGVsbG8="), "aGVsbG8=");
    }

    #[test]
    fn unicode_text_survives() {
        let codec = DeflateBase64Codec::with_level(1);
        let text = "{\"text\":\"héllo :wave: 日本語\"}";
        let token = codec.compress(text).expect("compress");
        assert_eq!(codec.decompress(&token), text);
    }
}
