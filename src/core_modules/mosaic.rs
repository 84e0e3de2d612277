// THEORY:
// The `mosaic` module is the final stage: it consumes an ordered album set
// and tiles the covers into one square composite. The composer trusts the
// order it is given; all the intelligence lives in the sequencer.
//
// Geometry: the canvas holds `side x side` tiles with
// `side = floor(sqrt(n))`. The grid fitter upstream works with a
// ceiling-sized grid, so when n is not a perfect square the last
// `n - side*side` covers are resized like every other tile but land below
// the bottom edge of the canvas and are clipped away entirely. That silent
// truncation is observable, long-standing behavior of this layout and is
// kept as-is rather than rounding the canvas up.
//
// Each tile is resized to exactly the requested resolution with a
// CatmullRom filter, no aspect-ratio preservation. The background is black,
// which only shows on a zero-album canvas.

use crate::core_modules::album::AlbumSet;
use image::imageops::{self, FilterType};
use image::RgbImage;

/// Tiles the ordered covers into a single composite image.
///
/// The canvas is `(side * tile_w, side * tile_h)` with
/// `side = floor(sqrt(n))`; covers past `side * side` are silently dropped.
/// An empty set yields a 0x0 image.
pub fn compose(set: &AlbumSet, tile_w: u32, tile_h: u32) -> RgbImage {
    let n = set.len() as u32;
    let side = (n as f64).sqrt().floor() as u32;

    // `RgbImage::new` zero-fills, which is the black background.
    let mut canvas = RgbImage::new(side * tile_w, side * tile_h);

    let mut x: i64 = 0;
    let mut y: i64 = 0;
    for cover in set.art() {
        let tile = cover
            .resize_exact(tile_w, tile_h, FilterType::CatmullRom)
            .to_rgb8();

        // Tiles beyond the last full row sit entirely below the canvas and
        // are clipped away by `replace`.
        imageops::replace(&mut canvas, &tile, x, y);

        x += tile_w as i64;
        if x >= (side * tile_w) as i64 {
            x = 0;
            y += tile_h as i64;
        }
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::album::{AlbumRecord, AlbumSet};
    use image::{DynamicImage, Rgb, RgbImage};

    fn record(id: &str) -> AlbumRecord {
        AlbumRecord {
            id: id.to_string(),
            artist: String::new(),
            name: String::new(),
            release_date: "2000".to_string(),
            art_url: String::new(),
        }
    }

    fn solid_set(colors: &[(u8, u8, u8)]) -> AlbumSet {
        let albums = (0..colors.len()).map(|i| record(&i.to_string())).collect();
        let art = colors
            .iter()
            .map(|&(r, g, b)| DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([r, g, b]))))
            .collect();
        AlbumSet::new(albums, art)
    }

    #[test]
    fn nine_tiles_at_100px_make_a_300px_canvas() {
        let set = solid_set(&[(9, 9, 9); 9]);
        let mosaic = compose(&set, 100, 100);
        assert_eq!(mosaic.dimensions(), (300, 300));
    }

    #[test]
    fn ten_tiles_still_make_a_300px_canvas_and_drop_one() {
        let colors: Vec<(u8, u8, u8)> = (0..10).map(|i| (i as u8 * 20, 0, 0)).collect();
        let set = solid_set(&colors);
        let mosaic = compose(&set, 100, 100);

        // side = floor(sqrt(10)) = 3: same canvas as nine tiles.
        assert_eq!(mosaic.dimensions(), (300, 300));

        // The ninth cover fills the last placed tile; the tenth fell off.
        let last_placed = mosaic.get_pixel(250, 250);
        assert_eq!(*last_placed, Rgb([8 * 20, 0, 0]));
    }

    #[test]
    fn tiles_land_left_to_right_top_to_bottom() {
        let set = solid_set(&[
            (255, 0, 0),
            (0, 255, 0),
            (0, 0, 255),
            (255, 255, 255),
        ]);
        let mosaic = compose(&set, 10, 10);
        assert_eq!(mosaic.dimensions(), (20, 20));

        assert_eq!(*mosaic.get_pixel(5, 5), Rgb([255, 0, 0]));
        assert_eq!(*mosaic.get_pixel(15, 5), Rgb([0, 255, 0]));
        assert_eq!(*mosaic.get_pixel(5, 15), Rgb([0, 0, 255]));
        assert_eq!(*mosaic.get_pixel(15, 15), Rgb([255, 255, 255]));
    }

    #[test]
    fn empty_set_yields_an_empty_canvas() {
        let mosaic = compose(&AlbumSet::empty(), 100, 100);
        assert_eq!(mosaic.dimensions(), (0, 0));
    }

    #[test]
    fn tiles_are_stretched_to_the_exact_resolution() {
        // A non-square cover must fill a square tile edge to edge.
        let albums = vec![record("wide")];
        let art = vec![DynamicImage::ImageRgb8(RgbImage::from_pixel(
            64,
            16,
            Rgb([0, 200, 0]),
        ))];
        let mosaic = compose(&AlbumSet::new(albums, art), 50, 50);

        assert_eq!(mosaic.dimensions(), (50, 50));
        assert_eq!(*mosaic.get_pixel(0, 0), Rgb([0, 200, 0]));
        assert_eq!(*mosaic.get_pixel(49, 49), Rgb([0, 200, 0]));
    }
}
