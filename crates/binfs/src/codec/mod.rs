//! Text-safe encodings shared by the build-time emitter and the runtime loader.
//!
//! Both codecs render binary data as lowercase hex so the result can be
//! embedded verbatim in a string literal of generated source code. The
//! emitter and the loader must use exactly these functions; the encoded
//! format is the compatibility contract between the two halves.
//!
//! # Examples
//!
//! ```
//! use binfs::codec;
//!
//! let encoded = codec::content::encode(b"hello")?;
//! assert!(encoded.bytes().all(|b| b.is_ascii_hexdigit()));
//! assert_eq!(codec::content::decode(&encoded)?, b"hello");
//! # Ok::<(), binfs::CodecError>(())
//! ```

pub mod content;
pub mod time;

use std::io;
use thiserror::Error;

/// Errors produced while encoding or decoding embedded fields.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The field is not valid hex.
    #[error("invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Compressing content failed.
    #[error("failed to compress content")]
    Compress(#[source] io::Error),

    /// The compressed stream is corrupt or truncated.
    #[error("failed to decompress content")]
    Decompress(#[source] io::Error),

    /// The binary timestamp has the wrong length.
    #[error("invalid timestamp length: expected {expected} bytes, got {actual}")]
    InvalidTimestampLength {
        /// Required length in bytes
        expected: usize,
        /// Length that was found
        actual: usize,
    },

    /// The binary timestamp was written by an unknown encoder version.
    #[error("unsupported timestamp version: {0}")]
    UnsupportedTimestampVersion(u8),

    /// The timestamp cannot be represented.
    #[error("timestamp out of range")]
    TimestampOutOfRange,

    /// The UTC offset is not a whole number of minutes.
    #[error("UTC offset of {seconds}s is not a whole number of minutes")]
    FractionalOffset {
        /// Offset east of UTC in seconds
        seconds: i32,
    },

    /// The UTC offset is out of range or collides with the UTC marker.
    #[error("invalid UTC offset: {minutes} minutes")]
    InvalidOffset {
        /// Offset east of UTC in minutes
        minutes: i16,
    },
}

/// Type alias for codec results.
pub type Result<T> = std::result::Result<T, CodecError>;
