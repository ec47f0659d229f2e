//! Rendering of packed bytes as a C array literal.
//!
//! The generated text looks like this (for 18 bytes at 1 bit per pixel):
//!
//! ```plain
//! // Array length: 18 bytes (1-bit per pixel (black & white), 8 pixels per byte)
//! const uint8_t logo_1bit[18] = {
//! 0x00,0x3C,0x42,0x81,0x81,0x42,0x3C,0x00,0x00,0x3C,0x42,0x81,0x81,0x42,0x3C,0x00,
//! 0xFF,0xFF
//! };
//! ```
//!
//! Every value but the last is followed by a comma, and a line break follows every
//! [`VALUES_PER_LINE`]th value. The closing `};` always starts on its own line, so an array whose
//! length is a multiple of [`VALUES_PER_LINE`] (including an empty one) has a blank line before it.
use crate::BitDepth;
use core::fmt;

#[cfg(feature = "alloc")]
use alloc::string::{String, ToString};

/// C type of the array elements.
pub const ELEMENT_TYPE: &str = "uint8_t";

pub const VALUES_PER_LINE: usize = 16;

/// A named, typed array literal for a packed pixel grid.
#[derive(Debug, Clone, Copy)]
pub struct ArrayLiteral<'a> {
    name: &'a str,
    depth: BitDepth,
    bytes: &'a [u8],
}

impl<'a> ArrayLiteral<'a> {
    /// `name` is used as-is; the depth suffix (`_1bit`/`_2bit`) is appended to it.
    pub const fn new(name: &'a str, depth: BitDepth, bytes: &'a [u8]) -> Self {
        Self { name, depth, bytes }
    }

    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The declared C identifier, e.g. `icon_2bit`.
    pub fn identifier(&self) -> impl fmt::Display + 'a {
        Identifier {
            name: self.name,
            depth: self.depth,
        }
    }
}

struct Identifier<'a> {
    name: &'a str,
    depth: BitDepth,
}

impl fmt::Display for Identifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}bit", self.name, self.depth.bits())
    }
}

impl fmt::Display for ArrayLiteral<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.bytes.len();

        writeln!(
            f,
            "// Array length: {len} bytes ({})",
            self.depth.description()
        )?;
        writeln!(f, "const {ELEMENT_TYPE} {}[{len}] = {{", self.identifier())?;

        for (i, byte) in self.bytes.iter().enumerate() {
            write!(f, "0x{byte:02X}")?;
            if i + 1 < len {
                f.write_str(",")?;
            }
            if (i + 1) % VALUES_PER_LINE == 0 {
                f.write_str("\n")?;
            }
        }

        f.write_str("\n};\n")
    }
}

/// Renders `bytes` as an array literal named `<name>_<depth>bit`.
#[cfg(feature = "alloc")]
pub fn emit(bytes: &[u8], name: &str, depth: BitDepth) -> String {
    ArrayLiteral::new(name, depth, bytes).to_string()
}

#[cfg(feature = "std")]
mod std_api {
    use super::ArrayLiteral;
    use snafu::{ResultExt, Snafu};
    use std::io::Write;

    #[derive(Debug, Snafu)]
    pub enum EmitError {
        WriteIo { source: std::io::Error },
    }

    impl ArrayLiteral<'_> {
        pub fn write_to<W: Write>(&self, mut w: W) -> Result<(), EmitError> {
            write!(w, "{self}").context(WriteIoSnafu)
        }
    }
}
#[cfg(feature = "std")]
pub use std_api::*;
