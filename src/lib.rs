//! # Stele: fixed-palette pixel codec
//!
//! Stele packs images containing at most three distinct pixel values into
//! 2 bits per pixel and collapses long uniform spans into run-length
//! records. It is a one-shot, forward-only format: no random access, no
//! embedded index, no checksum, and no embedded palette — the decoder
//! must be handed the same [`PaletteMap`] the encoder used.
//!
//! ## Wire format
//!
//! A stream is a 5-byte header followed by a body of variable-length
//! records (all multi-byte integers little-endian):
//!
//! | Offset | Field   | Type | Constraint          |
//! |--------|---------|------|---------------------|
//! | 0      | version | u8   | must equal 1        |
//! | 1      | width   | u16  | >= 4, divisible by 4 |
//! | 3      | height  | u16  | >= 4, divisible by 4 |
//! | 5..    | body    | —    | record grammar below |
//!
//! Body bytes yield up to four 2-bit fields each, lowest bit pair first:
//!
//! - **Literal field**: value in `{0, 1, 2}` — one pixel, `palette[v]`.
//! - **Escape field**: value `3`, together with the following count byte
//!   `c` — fill `4 * c + 1` pixels with the previously emitted value.
//!
//! ## Example
//!
//! ```rust
//! use stele::{PaletteMap, decode_with_default_buffer, encode_to_vec};
//!
//! let mut pixels = vec![0xFF00_00FFu32; 24];
//! pixels.extend(vec![0x00FF_00FFu32; 8]);
//!
//! let palette = PaletteMap::from_pixels(&pixels).unwrap();
//! let encoded = encode_to_vec(&pixels, 4, 8, &palette).unwrap();
//!
//! let mut decoded = vec![0u32; 32];
//! decode_with_default_buffer(&mut encoded.as_slice(), &mut decoded, &palette).unwrap();
//! assert_eq!(decoded, pixels);
//! ```
//!
//! Encoding and decoding are single-threaded linear passes over blocking
//! I/O. A [`PaletteMap`] is immutable and safely shared across calls; a
//! single reader or writer must not be driven by more than one call at a
//! time.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod decoder;
mod encoder;
mod error;
mod header;
mod palette;

pub use decoder::{DEFAULT_BUFFER_SIZE, decode, decode_with_default_buffer};
pub use encoder::encode;
pub use error::{Result, SteleError};
pub use header::{HEADER_LEN, Header, MIN_DIMENSION, STELE_VERSION};
pub use palette::{MAX_PALETTE, MIN_PALETTE, PaletteMap, RUN_ESCAPE};

use std::hash::Hash;

/// Encode a pixel buffer into a freshly allocated byte vector.
///
/// Convenience wrapper over [`encode`] writing to an in-memory sink.
pub fn encode_to_vec<T>(
    pixels: &[T],
    width: u16,
    height: u16,
    palette: &PaletteMap<T>,
) -> Result<Vec<u8>>
where
    T: Copy + Eq + Hash,
{
    let mut out = Vec::with_capacity(HEADER_LEN + pixels.len() / 4);
    encode(&mut out, pixels, width, height, palette)?;
    Ok(out)
}
