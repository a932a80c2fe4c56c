//! Stele encoder: 2-bit packing plus run-length records.
//!
//! Pixels are processed in groups of four; each group folds to one "code
//! byte" holding four 2-bit palette codes, lowest pixel in the lowest bit
//! pair. Long spans of a uniform code byte collapse into two-byte run
//! records, `[pattern | 0xC0, count]`, standing for `count` extra groups
//! beyond the one the record itself reconstructs.

use crate::error::{Result, SteleError};
use crate::header::Header;
use crate::palette::{PaletteMap, RUN_ESCAPE};
use std::hash::Hash;
use std::io::Write;
use tracing::{debug, trace};

/// Uniform code bytes eligible for run collapsing, indexed by palette code.
const UNIFORM: [u8; 3] = [0x00, 0x55, 0xAA];

/// Largest group-repeat count a single run record can carry.
const MAX_REPEAT: u8 = 255;

/// Which uniform byte pattern the pending run may keep matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entitlement {
    Color0,
    Color1,
    /// Tracked but never extended: uniform spans of the third palette
    /// color are emitted as literal bytes, keeping the output identical
    /// to streams written by existing Stele encoders.
    Color2,
}

/// Encode a pixel buffer as a Stele stream.
///
/// Writes the 5-byte header followed by the run-length body. The pixel
/// buffer length must equal `width * height` exactly; a mismatch fails
/// with [`SteleError::SizeMismatch`] before anything is written. Pixels
/// outside the palette fail with [`SteleError::UnmappedPixel`].
pub fn encode<T, W>(
    writer: &mut W,
    pixels: &[T],
    width: u16,
    height: u16,
    palette: &PaletteMap<T>,
) -> Result<()>
where
    T: Copy + Eq + Hash,
    W: Write,
{
    let header = Header::new(width, height)?;
    if pixels.len() != header.pixel_count() {
        return Err(SteleError::SizeMismatch {
            expected: header.pixel_count(),
            actual: pixels.len(),
        });
    }
    header.write(writer)?;
    debug!(width, height, colors = palette.len(), "encoding stele stream");

    let mut prev: Option<u8> = None;
    let mut repeat: u8 = 0;
    let mut entitlement: Option<Entitlement> = None;

    for (group_index, group) in pixels.chunks_exact(4).enumerate() {
        let byte = pack_group(group, group_index * 4, palette)?;

        let extends = match entitlement {
            Some(Entitlement::Color0) => byte == UNIFORM[0] && repeat < MAX_REPEAT,
            Some(Entitlement::Color1) => byte == UNIFORM[1] && repeat < MAX_REPEAT,
            Some(Entitlement::Color2) | None => false,
        };
        if extends {
            repeat += 1;
            continue;
        }

        flush(writer, prev, repeat)?;
        repeat = 0;
        // A new run is only ever entered from the byte's top nibble; the
        // low fields are reconstructed by the decoder's fill rule because
        // the top field always equals the run color.
        entitlement = match byte & 0xF0 {
            0x00 => Some(Entitlement::Color0),
            0x50 => Some(Entitlement::Color1),
            0xA0 => Some(Entitlement::Color2),
            _ => None,
        };
        prev = Some(byte);
    }

    flush(writer, prev, repeat)?;
    Ok(())
}

/// Fold four pixels into one code byte, lowest pixel first.
fn pack_group<T: Copy + Eq + Hash>(
    group: &[T],
    base: usize,
    palette: &PaletteMap<T>,
) -> Result<u8> {
    let mut byte = 0u8;
    for (offset, pixel) in group.iter().enumerate() {
        let code = palette
            .code_of(pixel)
            .ok_or(SteleError::UnmappedPixel {
                index: base + offset,
            })?;
        byte |= code << (2 * offset);
    }
    Ok(byte)
}

/// Emit the pending group: a run record when a run accumulated, a literal
/// byte otherwise, nothing at all before the first group.
fn flush<W: Write>(writer: &mut W, prev: Option<u8>, repeat: u8) -> Result<()> {
    match prev {
        Some(byte) if repeat > 0 => {
            trace!(byte, repeat, "run record");
            writer.write_all(&[byte | (RUN_ESCAPE << 6), repeat])?;
        }
        Some(byte) => writer.write_all(&[byte])?,
        None => {}
    }
    Ok(())
}
