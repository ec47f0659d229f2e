use image::{GrayImage, Luma, Pixel, Rgb};
use imagequant::RGBA;
use pixpack::{utils::binarize, BitDepth};
use snafu::{ResultExt, Snafu};
use std::path::{Path, PathBuf};

/// Palette size used for 2 bits per pixel.
pub const PALETTE_SIZE: u32 = 4;

#[derive(Debug, Snafu)]
pub enum SourceError {
    #[snafu(display("Failed to decode `{}`: {source}", path.display()))]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[snafu(display("Failed to quantize `{}`: {source}", path.display()))]
    Quantize {
        path: PathBuf,
        source: imagequant::Error,
    },
}

/// Loads the pixel grid for `depth`: binarized luma for 1 bit, palette indices for 2 bits.
pub fn load(path: &Path, depth: BitDepth, threshold: u8) -> Result<GrayImage, SourceError> {
    match depth {
        BitDepth::One => decode(path, threshold),
        BitDepth::Two => decode_quantized(path, PALETTE_SIZE).map(|(image, _)| image),
    }
}

fn open_luma(path: &Path) -> Result<GrayImage, SourceError> {
    let image = image::open(path).context(DecodeSnafu { path })?;
    log::debug!(
        "Decoded `{}`: {}x{} {:?}",
        path.display(),
        image.width(),
        image.height(),
        image.color()
    );

    Ok(image.into_luma8())
}

/// Grayscale image thresholded to 0 (off) and 255 (on).
pub fn decode(path: &Path, threshold: u8) -> Result<GrayImage, SourceError> {
    let mut image = open_luma(path)?;
    for Luma([luma]) in image.pixels_mut() {
        *luma = binarize(*luma, threshold);
    }

    Ok(image)
}

/// Grayscale image reduced to at most `palette_size` levels, holding the palette index of each
/// pixel. Indices run from the darkest level (0) to the lightest; the levels are returned too.
pub fn decode_quantized(
    path: &Path,
    palette_size: u32,
) -> Result<(GrayImage, Vec<u8>), SourceError> {
    let image = open_luma(path)?;
    let (palette, indices) = quantize(&image, palette_size).context(QuantizeSnafu { path })?;

    let lumas: Vec<u8> = palette
        .iter()
        .map(|c| Rgb([c.r, c.g, c.b]).to_luma().0[0])
        .collect();
    let mut order: Vec<usize> = (0..lumas.len()).collect();
    order.sort_by_key(|&i| lumas[i]);

    // rank[palette index] = index in dark to light order
    let mut rank = vec![0u8; lumas.len()];
    for (sorted, &i) in order.iter().enumerate() {
        rank[i] = sorted as u8;
    }
    let levels: Vec<u8> = order.iter().map(|&i| lumas[i]).collect();
    log::debug!("Palette for `{}`: {levels:?}", path.display());

    let width = image.width() as usize;
    let indexed = GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let index = indices[y as usize * width + x as usize];
        Luma([rank[usize::from(index)]])
    });

    Ok((indexed, levels))
}

/// Palette and per pixel palette indices, without dithering.
fn quantize(
    image: &GrayImage,
    palette_size: u32,
) -> Result<(Vec<RGBA>, Vec<u8>), imagequant::Error> {
    let pixels: Vec<RGBA> = image
        .pixels()
        .map(|&Luma([l])| RGBA {
            r: l,
            g: l,
            b: l,
            a: 255,
        })
        .collect();

    let mut liq = imagequant::new();
    liq.set_max_colors(palette_size)?;

    let mut img = liq.new_image(
        pixels,
        image.width() as usize,
        image.height() as usize,
        0.0,
    )?;
    let mut res = liq.quantize(&mut img)?;
    res.set_dithering_level(0.0)?;
    res.remapped(&mut img)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monochrome_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("steps.png");
        GrayImage::from_raw(4, 1, vec![0, 128, 129, 255])
            .unwrap()
            .save(&path)
            .unwrap();

        let image = decode(&path, 128).unwrap();
        assert_eq!(image.as_raw(), &[0, 0, 255, 255]);
    }

    #[test]
    fn quantized_indices() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("levels.png");
        GrayImage::from_raw(4, 2, vec![255, 170, 85, 0, 0, 85, 170, 255])
            .unwrap()
            .save(&path)
            .unwrap();

        let (image, levels) = decode_quantized(&path, PALETTE_SIZE).unwrap();
        assert_eq!(levels.len(), 4);
        for (level, expected) in levels.iter().zip([0u8, 85, 170, 255]) {
            assert!(level.abs_diff(expected) <= 1, "{levels:?}");
        }
        assert_eq!(image.as_raw(), &[3, 2, 1, 0, 0, 1, 2, 3]);
    }

    #[test]
    fn quantized_indices_stay_in_palette() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradient.png");
        let ramp: Vec<u8> = (0..=255).collect();
        GrayImage::from_raw(16, 16, ramp).unwrap().save(&path).unwrap();

        let (image, levels) = decode_quantized(&path, PALETTE_SIZE).unwrap();
        assert!(!levels.is_empty() && levels.len() <= 4);
        assert!(levels.windows(2).all(|w| w[0] <= w[1]));
        assert!(image.as_raw().iter().all(|&i| usize::from(i) < levels.len()));

        // the ramp is monotonic, so are the indices
        assert!(image.as_raw().windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(image.as_raw()[0], 0);
        assert_eq!(usize::from(image.as_raw()[255]), levels.len() - 1);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        assert!(matches!(
            load(&path, BitDepth::Two, 128),
            Err(SourceError::Decode { .. })
        ));
    }
}
