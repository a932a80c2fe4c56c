//! Error types for Stele operations.
//!
//! Every failure mode of the codec is a variant of [`SteleError`]. All of
//! them abort the encode/decode call in progress; the codec has no
//! partial-result or retry semantics.

use std::io;
use thiserror::Error;

/// The error type for Stele encode/decode operations.
#[derive(Debug, Error)]
pub enum SteleError {
    /// I/O error from the underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Palette construction saw fewer than 2 or more than 3 distinct values.
    #[error("invalid palette: {count} distinct values (need 2 or 3)")]
    InvalidPalette {
        /// Number of distinct values observed.
        count: usize,
    },

    /// A source pixel is not covered by the encoding palette.
    #[error("pixel at index {index} is not in the palette")]
    UnmappedPixel {
        /// Position of the offending pixel in the input buffer.
        index: usize,
    },

    /// A literal 2-bit code has no entry in the decoding palette.
    #[error("code {code} has no palette entry")]
    UnmappedCode {
        /// The unmapped 2-bit code value.
        code: u8,
    },

    /// Header carries a format version this build does not understand.
    #[error("unsupported format version: {found} (expected 1)")]
    UnsupportedVersion {
        /// Version byte found in the stream.
        found: u8,
    },

    /// An image dimension is below the 4-pixel minimum.
    #[error("image {axis} is {value}, below the 4-pixel minimum")]
    DimensionTooSmall {
        /// Which dimension ("width" or "height").
        axis: &'static str,
        /// The offending value.
        value: u16,
    },

    /// An image dimension is not divisible by 4.
    #[error("image {axis} is {value}, not divisible by 4")]
    DimensionNotAligned {
        /// Which dimension ("width" or "height").
        axis: &'static str,
        /// The offending value.
        value: u16,
    },

    /// Caller buffer length does not match the header-declared pixel count.
    #[error("buffer size mismatch: expected {expected} pixels, have {actual}")]
    SizeMismatch {
        /// Pixel count declared by width * height.
        expected: usize,
        /// Length of the caller's buffer.
        actual: usize,
    },

    /// The stream ended before the declared pixel count was reconstructed.
    #[error("truncated stream: reconstructed {written} of {expected} pixels")]
    TruncatedOutput {
        /// Pixels written before the stream ended.
        written: usize,
        /// Pixels declared by the header.
        expected: usize,
    },

    /// Corrupted body data.
    #[error("corrupted data at offset {offset}: {message}")]
    CorruptedData {
        /// Byte offset in the stream where corruption was detected.
        offset: u64,
        /// Description of the corruption.
        message: String,
    },
}

/// Result type alias for Stele operations.
pub type Result<T> = std::result::Result<T, SteleError>;

impl SteleError {
    /// Create a corrupted data error.
    pub fn corrupted(offset: u64, message: impl Into<String>) -> Self {
        Self::CorruptedData {
            offset,
            message: message.into(),
        }
    }
}
