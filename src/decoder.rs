//! Streaming Stele decoder.
//!
//! The body is consumed in chunks; each byte yields up to four 2-bit
//! fields, lowest bit pair first. Field value 3 is the run escape: the
//! byte that follows it carries a group count, and the run repeats the
//! previously emitted pixel `4 * count + 1` times. A run record may
//! straddle a chunk boundary, in which case the count byte is pulled
//! straight off the underlying stream.

use crate::error::{Result, SteleError};
use crate::header::{HEADER_LEN, Header};
use crate::palette::{PaletteMap, RUN_ESCAPE};
use std::hash::Hash;
use std::io::{ErrorKind, Read};
use tracing::debug;

/// Default body read-chunk size in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Decode a Stele stream into a caller-owned pixel buffer.
///
/// Reads and validates the header, checks that `out` holds exactly
/// `width * height` pixels, then reconstructs the body. `buffer_size`
/// caps the read-chunk size and affects performance only, never output.
///
/// The decoder requires the same palette (identical code assignment)
/// the encoder used; the stream itself carries none.
pub fn decode<T, R>(
    reader: &mut R,
    out: &mut [T],
    palette: &PaletteMap<T>,
    buffer_size: usize,
) -> Result<()>
where
    T: Copy + Eq + Hash,
    R: Read,
{
    let header = Header::read(reader)?;
    let expected = header.pixel_count();
    if out.len() != expected {
        return Err(SteleError::SizeMismatch {
            expected,
            actual: out.len(),
        });
    }
    debug!(
        width = header.width,
        height = header.height,
        "decoding stele stream"
    );

    let chunk_len = (expected / 4).min(buffer_size).max(1);
    let mut chunk = vec![0u8; chunk_len];
    let mut written = 0usize;
    // Stream position, for corruption reports only.
    let mut pos = HEADER_LEN as u64;

    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        let mut i = 0;
        while i < n {
            let byte = chunk[i];
            i += 1;
            pos += 1;
            for field in 0..4 {
                let code = (byte >> (2 * field)) & 0b11;
                if code == RUN_ESCAPE {
                    let count = if i < n {
                        let c = chunk[i];
                        i += 1;
                        c
                    } else {
                        read_count_byte(reader, written, expected)?
                    };
                    pos += 1;
                    let run = usize::from(count) * 4 + 1;
                    if written == 0 {
                        return Err(SteleError::corrupted(
                            pos,
                            "run record with no preceding pixel",
                        ));
                    }
                    if run > expected - written {
                        return Err(SteleError::corrupted(
                            pos,
                            format!("run of {run} pixels overflows the {expected}-pixel image"),
                        ));
                    }
                    let value = out[written - 1];
                    out[written..written + run].fill(value);
                    written += run;
                    // The remaining fields of this byte are abandoned.
                    break;
                }
                let pixel = *palette
                    .get(code)
                    .ok_or(SteleError::UnmappedCode { code })?;
                if written == expected {
                    return Err(SteleError::corrupted(
                        pos,
                        "body continues past the declared pixel count",
                    ));
                }
                out[written] = pixel;
                written += 1;
            }
        }
    }

    if written != expected {
        return Err(SteleError::TruncatedOutput { written, expected });
    }
    Ok(())
}

/// Decode with the default read-chunk size.
pub fn decode_with_default_buffer<T, R>(
    reader: &mut R,
    out: &mut [T],
    palette: &PaletteMap<T>,
) -> Result<()>
where
    T: Copy + Eq + Hash,
    R: Read,
{
    decode(reader, out, palette, DEFAULT_BUFFER_SIZE)
}

/// Pull a run count byte straight off the stream when the current chunk
/// is exhausted. EOF here means the stream ended mid-record.
fn read_count_byte<R: Read>(reader: &mut R, written: usize, expected: usize) -> Result<u8> {
    let mut count = [0u8; 1];
    match reader.read_exact(&mut count) {
        Ok(()) => Ok(count[0]),
        Err(err) if err.kind() == ErrorKind::UnexpectedEof => {
            Err(SteleError::TruncatedOutput { written, expected })
        }
        Err(err) => Err(err.into()),
    }
}
