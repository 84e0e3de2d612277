//! Small PNG persistence helper for finished mosaics. The engine itself
//! only produces in-memory bitmaps; this is a convenience for callers that
//! want the composite on disk.

use crate::error::MosaicError;
use image::{ImageEncoder, RgbImage};
use std::path::Path;

/// Encodes the mosaic as a PNG at `path`.
pub fn save_png(path: &Path, mosaic: &RgbImage) -> Result<(), MosaicError> {
    let output = std::fs::File::create(path).map_err(image::ImageError::IoError)?;
    let encoder = image::codecs::png::PngEncoder::new(output);

    encoder.write_image(
        mosaic.as_raw(),
        mosaic.width(),
        mosaic.height(),
        image::ExtendedColorType::Rgb8,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn save_and_reload_a_solid_mosaic() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("mosaic.png");

        let mosaic = RgbImage::from_pixel(30, 30, Rgb([12, 34, 56]));
        save_png(&path, &mosaic).expect("save");

        let reloaded = image::open(&path).expect("reload").to_rgb8();
        assert_eq!(reloaded.dimensions(), (30, 30));
        assert_eq!(*reloaded.get_pixel(15, 15), Rgb([12, 34, 56]));
    }
}
