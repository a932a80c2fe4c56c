//! Stele header parsing and writing.
//!
//! The header is a fixed 5-byte prefix carrying the format version and the
//! image dimensions. It is validated eagerly: [`Header::read`] rejects a
//! malformed header before any body byte is consumed.

use crate::error::{Result, SteleError};
use std::io::{Read, Write};

/// Format version emitted and accepted by this implementation.
pub const STELE_VERSION: u8 = 1;

/// Encoded header length in bytes.
pub const HEADER_LEN: usize = 5;

/// Smallest legal width/height in pixels.
pub const MIN_DIMENSION: u16 = 4;

/// Fixed-size stream header.
///
/// Wire layout (all multi-byte integers little-endian):
///
/// ```text
/// +---------+--------------+---------------+
/// | version | width        | height        |
/// | u8 (=1) | u16, >=4, %4 | u16, >=4, %4  |
/// +---------+--------------+---------------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Format version (must equal [`STELE_VERSION`]).
    pub version: u8,
    /// Image width in pixels.
    pub width: u16,
    /// Image height in pixels.
    pub height: u16,
}

impl Header {
    /// Create a version-1 header for the given dimensions.
    ///
    /// Fails if either dimension is below [`MIN_DIMENSION`] or not
    /// divisible by 4.
    pub fn new(width: u16, height: u16) -> Result<Self> {
        let header = Self {
            version: STELE_VERSION,
            width,
            height,
        };
        header.validate()?;
        Ok(header)
    }

    /// Check the header invariants.
    pub fn validate(&self) -> Result<()> {
        if self.version != STELE_VERSION {
            return Err(SteleError::UnsupportedVersion {
                found: self.version,
            });
        }
        check_dimension("width", self.width)?;
        check_dimension("height", self.height)?;
        Ok(())
    }

    /// Number of pixels declared by this header.
    pub fn pixel_count(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Write the header to a writer.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&[self.version])?;
        writer.write_all(&self.width.to_le_bytes())?;
        writer.write_all(&self.height.to_le_bytes())?;
        Ok(())
    }

    /// Read and validate a header from a reader.
    ///
    /// Consumes exactly [`HEADER_LEN`] bytes. Validation failures surface
    /// before any body byte is touched.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut raw = [0u8; HEADER_LEN];
        reader.read_exact(&mut raw)?;
        let header = Self {
            version: raw[0],
            width: u16::from_le_bytes([raw[1], raw[2]]),
            height: u16::from_le_bytes([raw[3], raw[4]]),
        };
        header.validate()?;
        Ok(header)
    }
}

fn check_dimension(axis: &'static str, value: u16) -> Result<()> {
    if value < MIN_DIMENSION {
        return Err(SteleError::DimensionTooSmall { axis, value });
    }
    if value % 4 != 0 {
        return Err(SteleError::DimensionNotAligned { axis, value });
    }
    Ok(())
}
