use crate::BitDepth;
use snafu::{ensure, Snafu};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

#[cfg(feature = "std")]
mod std_api;
#[cfg(feature = "std")]
pub use std_api::*;

#[derive(Debug, Snafu)]
#[snafu(module)]
pub enum PackError {
    #[snafu(display("Output buffer holds {available} bytes, but {needed} bytes are needed"))]
    OutputTooSmall { needed: usize, available: usize },
}

/// Packing state for one pixel stream.
///
/// Pixels can be pushed one at a time (or in arbitrarily sized slices), a byte is produced every
/// time a group of [`BitDepth::pixels_per_byte`] pixels is complete.
#[derive(Debug, Clone, Copy)]
pub struct PackContext {
    depth: BitDepth,
    byte: u8,
    filled: u8,
}

impl PackContext {
    pub const fn new(depth: BitDepth) -> Self {
        Self {
            depth,
            byte: 0,
            filled: 0,
        }
    }

    pub const fn depth(&self) -> BitDepth {
        self.depth
    }

    /// Number of pixels waiting for their byte to be completed.
    pub const fn pending(&self) -> u8 {
        self.filled
    }

    /// Adds one pixel, returning the finished byte if this pixel completed it.
    #[inline]
    pub fn push(&mut self, pixel: u8) -> Option<u8> {
        self.byte |= self.depth.map_pixel(pixel) << self.depth.shift_for(self.filled);
        self.filled += 1;

        if self.filled == self.depth.pixels_per_byte() {
            self.take()
        } else {
            None
        }
    }

    /// Flushes a partially filled byte. The missing low-order pixels are zero.
    #[inline]
    pub fn finish(&mut self) -> Option<u8> {
        if self.filled == 0 {
            return None;
        }

        self.take()
    }

    #[inline]
    fn take(&mut self) -> Option<u8> {
        let byte = self.byte;
        self.byte = 0;
        self.filled = 0;
        Some(byte)
    }

    /// Packs `pixels` into `out`, returning the number of bytes written.
    pub fn pack_to_slice(
        pixels: &[u8],
        depth: BitDepth,
        out: &mut [u8],
    ) -> Result<usize, PackError> {
        let needed = depth.packed_len(pixels.len());
        ensure!(
            out.len() >= needed,
            pack_error::OutputTooSmallSnafu {
                needed,
                available: out.len()
            }
        );

        let mut state = PackContext::new(depth);
        let mut written = state.pack_to_slice_with_state(pixels, out)?;
        if let Some(byte) = state.finish() {
            out[written] = byte;
            written += 1;
        }

        Ok(written)
    }

    /// Like [`pack_to_slice`](Self::pack_to_slice), but continues from (and leaves) the pending
    /// state of `self`. Call [`finish`](Self::finish) after the last slice.
    pub fn pack_to_slice_with_state(
        &mut self,
        pixels: &[u8],
        out: &mut [u8],
    ) -> Result<usize, PackError> {
        let needed = (usize::from(self.filled) + pixels.len())
            / usize::from(self.depth.pixels_per_byte());
        ensure!(
            out.len() >= needed,
            pack_error::OutputTooSmallSnafu {
                needed,
                available: out.len()
            }
        );

        let mut written = 0;
        for &pixel in pixels {
            if let Some(byte) = self.push(pixel) {
                out[written] = byte;
                written += 1;
            }
        }

        Ok(written)
    }

    /// Packs `pixels`, appending the bytes to `w`.
    #[cfg(feature = "alloc")]
    pub fn pack_to_vec(pixels: &[u8], depth: BitDepth, w: &mut Vec<u8>) {
        let mut state = PackContext::new(depth);
        w.reserve(depth.packed_len(pixels.len()));
        state.pack_to_vec_with_state(pixels, w);
        w.extend(state.finish());
    }

    #[cfg(feature = "alloc")]
    pub fn pack_to_vec_with_state(&mut self, pixels: &[u8], w: &mut Vec<u8>) {
        for &pixel in pixels {
            if let Some(byte) = self.push(pixel) {
                w.push(byte);
            }
        }
    }
}

/// Packs a pixel grid at the given depth.
///
/// The result holds `ceil(pixels.len() / depth.pixels_per_byte())` bytes.
#[cfg(feature = "alloc")]
pub fn pack(pixels: &[u8], depth: BitDepth) -> Vec<u8> {
    let mut packed = Vec::new();
    PackContext::pack_to_vec(pixels, depth, &mut packed);
    packed
}

/// Same as [`pack`], for a depth that has not been validated yet.
#[cfg(feature = "alloc")]
pub fn pack_raw(pixels: &[u8], depth: u8) -> Result<Vec<u8>, crate::BitDepthError> {
    let depth = BitDepth::try_from(depth)?;
    Ok(pack(pixels, depth))
}
