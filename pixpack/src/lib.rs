//! Packs low bit-depth pixel grids into bytes and emits them as C array literals.
//!
//! The intended use is embedding small graphics (icons, glyphs) into firmware: an image is reduced
//! to either a monochrome grid or a 4-level palette-index grid, packed densely into bytes and
//! written out as a `const uint8_t` array.
//!
//! # Bit layout
//!
//! Pixels are taken in row-major order and packed most-significant-bits-first. Rows are *not*
//! byte-aligned: the pixel stream is packed as one flat sequence. If the pixel count is not a
//! multiple of the pixels per byte, the last byte is padded with zero bits.
//!
//! ## [`BitDepth::One`]
//!
//! ```plain
//! .- 1 bit per pixel -------.
//! |         Byte[n]         |
//! |  7  6  5  4  3  2  1  0 |
//! |--+--+--+--+--+--+--+----|
//! |p0|p1|p2|p3|p4|p5|p6|p7  |
//! `-------------------------`
//! ```
//!
//! - A pixel value of `0` is off, any other value is on.
//!
//! ## [`BitDepth::Two`]
//!
//! ```plain
//! .- 2 bits per pixel ------.
//! |         Byte[n]         |
//! |  7  6  5  4  3  2  1  0 |
//! |-----+-----+-----+-------|
//! |  p0 |  p1 |  p2 |  p3   |
//! `-------------------------`
//! ```
//!
//! - Each pixel is a palette index. Only the low 2 bits are kept, higher bits are silently
//!   dropped.
//!
//! # Array literal
//!
//! See [`emit`] for the exact text that is generated.
#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod emit;
pub mod pack;
pub mod unpack;
pub mod utils;

pub use emit::ArrayLiteral;
pub use pack::PackContext;
#[cfg(feature = "alloc")]
pub use pack::{pack, pack_raw};
pub use unpack::Unpacked;

use core::str::FromStr;
use snafu::{ensure, Snafu};

/// Number of bits used for one pixel in the packed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BitDepth {
    /// Monochrome, 8 pixels per byte.
    One = 1,
    /// 4-color palette, 4 pixels per byte.
    Two = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
pub enum BitDepthError {
    #[snafu(display("Invalid bit depth {depth}, expected 1 or 2"))]
    InvalidBitDepth { depth: u8 },
    #[snafu(display("Bit depth must be a number, expected 1 or 2"))]
    Unrecognized,
}

impl BitDepth {
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn pixels_per_byte(self) -> u8 {
        8 / self.bits()
    }

    /// Shift of the first pixel of a byte.
    #[inline]
    pub const fn shift_base(self) -> u8 {
        8 - self.bits()
    }

    /// Shift of the pixel in `slot` (0 being the leftmost pixel of the byte).
    #[inline]
    pub const fn shift_for(self, slot: u8) -> u8 {
        self.shift_base() - self.bits() * slot
    }

    #[inline]
    pub const fn mask(self) -> u8 {
        match self {
            BitDepth::One => 0b1,
            BitDepth::Two => 0b11,
        }
    }

    /// Maps a grid value to the bits that get packed for it.
    #[inline]
    pub const fn map_pixel(self, pixel: u8) -> u8 {
        match self {
            BitDepth::One => (pixel != 0) as u8,
            BitDepth::Two => pixel & 0b11,
        }
    }

    /// Number of bytes needed to hold `pixel_count` packed pixels.
    #[inline]
    pub const fn packed_len(self, pixel_count: usize) -> usize {
        pixel_count.div_ceil(self.pixels_per_byte() as usize)
    }

    /// Human readable description, used in the comment above generated arrays.
    pub const fn description(self) -> &'static str {
        match self {
            BitDepth::One => "1-bit per pixel (black & white), 8 pixels per byte",
            BitDepth::Two => "2-bits per pixel (4 colors), 4 pixels per byte",
        }
    }
}

impl TryFrom<u8> for BitDepth {
    type Error = BitDepthError;

    fn try_from(depth: u8) -> Result<Self, Self::Error> {
        match depth {
            1 => Ok(BitDepth::One),
            2 => Ok(BitDepth::Two),
            depth => InvalidBitDepthSnafu { depth }.fail(),
        }
    }
}

impl From<BitDepth> for u8 {
    fn from(depth: BitDepth) -> Self {
        depth.bits()
    }
}

impl FromStr for BitDepth {
    type Err = BitDepthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let depth = s.trim().parse::<u8>().map_err(|_| BitDepthError::Unrecognized)?;
        BitDepth::try_from(depth)
    }
}

impl core::fmt::Display for BitDepth {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.bits())
    }
}

#[derive(Debug, Snafu)]
pub enum GridError {
    #[snafu(display(
        "Specified grid dimensions don't match the number of pixels: {width} * {height} == {} pixels, but {pixel_count} pixels were given",
        width * height
    ))]
    DimensionMismatch {
        width: usize,
        height: usize,
        pixel_count: usize,
    },
}

/// A row-major grid of pixel values, as produced by decoding and reducing an image.
#[derive(Debug, Clone, Copy)]
pub struct PixelGrid<'a> {
    width: usize,
    height: usize,
    pixels: &'a [u8],
}

impl<'a> PixelGrid<'a> {
    pub fn new(width: usize, height: usize, pixels: &'a [u8]) -> Result<Self, GridError> {
        ensure!(
            width.checked_mul(height) == Some(pixels.len()),
            DimensionMismatchSnafu {
                width,
                height,
                pixel_count: pixels.len()
            }
        );

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &'a [u8] {
        self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Packs the whole grid at the given depth.
    #[cfg(feature = "alloc")]
    pub fn pack(&self, depth: BitDepth) -> alloc::vec::Vec<u8> {
        pack::pack(self.pixels, depth)
    }
}
