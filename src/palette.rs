//! Bidirectional pixel-value / code table.
//!
//! A [`PaletteMap`] assigns each distinct pixel value a dense 2-bit code.
//! The format carries no embedded palette, so decoding requires the same
//! code assignment the encoder used, supplied out of band.

use crate::error::{Result, SteleError};
use std::collections::HashMap;
use std::hash::Hash;

/// Smallest palette the format can express.
pub const MIN_PALETTE: usize = 2;

/// Largest palette the format can express.
///
/// Code 3 is reserved as the run-length escape and never maps to a pixel.
pub const MAX_PALETTE: usize = 3;

/// 2-bit field value marking a run record in the body.
pub const RUN_ESCAPE: u8 = 3;

/// Immutable bidirectional mapping between pixel values and 2-bit codes.
///
/// Codes are assigned densely starting at 0, in the order pixel values are
/// first observed. The map is generic over the pixel type; it only relies
/// on equality and hashing, never on the value's internal structure.
///
/// A `PaletteMap` is immutable after construction and can be shared
/// read-only across concurrent encode and decode calls.
#[derive(Debug, Clone)]
pub struct PaletteMap<T> {
    codes: HashMap<T, u8>,
    pixels: Vec<T>,
}

impl<T: Copy + Eq + Hash> PaletteMap<T> {
    /// Build a palette by scanning `pixels` left to right.
    ///
    /// Fails with [`SteleError::InvalidPalette`] if the buffer holds fewer
    /// than 2 distinct values. The scan aborts the moment a fourth
    /// distinct value appears; the set itself stops growing at 3.
    pub fn from_pixels(pixels: &[T]) -> Result<Self> {
        let mut codes = HashMap::with_capacity(MAX_PALETTE);
        let mut values = Vec::with_capacity(MAX_PALETTE);
        for &pixel in pixels {
            if codes.contains_key(&pixel) {
                continue;
            }
            if values.len() == MAX_PALETTE {
                return Err(SteleError::InvalidPalette {
                    count: MAX_PALETTE + 1,
                });
            }
            codes.insert(pixel, values.len() as u8);
            values.push(pixel);
        }
        Self::bounded(codes, values)
    }

    /// Build a palette from an explicit ordered set of values.
    ///
    /// The set must hold 2 or 3 entries with no duplicates; anything else
    /// fails with [`SteleError::InvalidPalette`].
    pub fn from_values(values: &[T]) -> Result<Self> {
        let mut codes = HashMap::with_capacity(values.len());
        for (code, &pixel) in values.iter().enumerate() {
            if codes.insert(pixel, code as u8).is_some() {
                return Err(SteleError::InvalidPalette {
                    count: values.len(),
                });
            }
        }
        Self::bounded(codes, values.to_vec())
    }

    fn bounded(codes: HashMap<T, u8>, pixels: Vec<T>) -> Result<Self> {
        if !(MIN_PALETTE..=MAX_PALETTE).contains(&pixels.len()) {
            return Err(SteleError::InvalidPalette {
                count: pixels.len(),
            });
        }
        Ok(Self { codes, pixels })
    }

    /// Code assigned to `pixel`, or `None` if the pixel is unmapped.
    pub fn code_of(&self, pixel: &T) -> Option<u8> {
        self.codes.get(pixel).copied()
    }

    /// Pixel value for `code`, or `None` if the code has no entry.
    pub fn get(&self, code: u8) -> Option<&T> {
        self.pixels.get(usize::from(code))
    }

    /// Pixel value for `code`.
    ///
    /// # Panics
    ///
    /// Panics if `code >= self.len()`. Calling this with an out-of-range
    /// code is a programming error; use [`PaletteMap::get`] for the
    /// checked lookup.
    pub fn pixel_of(&self, code: u8) -> T {
        self.pixels[usize::from(code)]
    }

    /// Number of palette entries (2 or 3).
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Always false; a constructed palette holds at least 2 entries.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}
