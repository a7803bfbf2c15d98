//! File content codec: gzip, then lowercase hex.
//!
//! An empty encoded string decodes to empty content. The emitter writes an
//! empty string for directories, which never carry content.

use super::{CodecError, Result};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::io::{Read, Write};

/// Compresses `raw` and renders the compressed stream as lowercase hex.
///
/// The gzip header carries no timestamp or file name, so encoding the same
/// bytes always yields the same string.
///
/// # Errors
///
/// Returns [`CodecError::Compress`] if the compressor fails.
///
/// # Examples
///
/// ```
/// use binfs::codec::content;
///
/// let a = content::encode(b"body { margin: 0 }")?;
/// let b = content::encode(b"body { margin: 0 }")?;
/// assert_eq!(a, b);
/// # Ok::<(), binfs::CodecError>(())
/// ```
pub fn encode(raw: &[u8]) -> Result<String> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(raw).map_err(CodecError::Compress)?;
    let compressed = encoder.finish().map_err(CodecError::Compress)?;
    Ok(hex::encode(compressed))
}

/// Reverses [`encode`].
///
/// # Errors
///
/// Returns [`CodecError::InvalidHex`] if `encoded` is not hex, or
/// [`CodecError::Decompress`] if the gzip stream is corrupt.
///
/// # Examples
///
/// ```
/// use binfs::codec::content;
///
/// assert!(content::decode("").unwrap().is_empty());
/// assert!(content::decode("zz").is_err());
/// ```
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    if encoded.is_empty() {
        return Ok(Vec::new());
    }

    let compressed = hex::decode(encoded)?;
    let mut decoder = GzDecoder::new(compressed.as_slice());
    let mut raw = Vec::new();
    decoder
        .read_to_end(&mut raw)
        .map_err(CodecError::Decompress)?;
    Ok(raw)
}
