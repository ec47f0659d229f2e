use crate::BitDepth;

#[cfg(feature = "alloc")]
use alloc::{format, string::String};

/// Luma levels above this are "on" when reducing to monochrome.
pub const DEFAULT_THRESHOLD: u8 = 128;

pub const PIXEL_ON: u8 = 255;
pub const PIXEL_OFF: u8 = 0;

/// File extensions (lowercase) of the image formats that get converted.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

/// Reduces a luma value to [`PIXEL_ON`] or [`PIXEL_OFF`].
#[inline]
pub const fn binarize(luma: u8, threshold: u8) -> u8 {
    if luma > threshold {
        PIXEL_ON
    } else {
        PIXEL_OFF
    }
}

/// Case-insensitive check against [`SUPPORTED_EXTENSIONS`].
pub fn is_supported_extension(extension: &str) -> bool {
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|supported| supported.eq_ignore_ascii_case(extension))
}

/// Variable name for an image, derived from its file stem. Spaces become underscores.
#[cfg(feature = "alloc")]
pub fn variable_name(stem: &str) -> String {
    stem.replace(' ', "_")
}

/// Name of the generated source file, `<name>_<depth>bit.c`.
#[cfg(feature = "alloc")]
pub fn output_file_name(name: &str, depth: BitDepth) -> String {
    format!("{name}_{}bit.c", depth.bits())
}
