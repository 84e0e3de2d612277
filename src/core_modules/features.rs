// THEORY:
// The `features` module is the first stage of the Color Strategy. It turns
// each cover image into a fixed-length numeric description of its color
// content, so that downstream stages can reason about "visual similarity"
// as plain distance between vectors.
//
// Key steps per cover:
// 1.  **Downsample**: resize to a small fixed square (64x64) with a
//     CatmullRom (bicubic-class) filter. This throws away layout detail and
//     keeps the overall color composition, which is what the mosaic layout
//     cares about.
// 2.  **Channel normalization**: covers arrive as anything the decoder
//     produced (grayscale, RGBA, 16-bit). Everything is converted to 8-bit
//     RGB before color-space conversion, so 1-channel art gets a proper
//     3-channel representation.
// 3.  **Perceptual color space**: each pixel is converted from RGB to HSV
//     scaled to the 8-bit range (hue in [0,255] rather than degrees). HSV
//     separates "which color" from "how bright", which makes nearby vectors
//     correspond to covers that actually look alike.
// 4.  **Ravel**: the 64x64x3 cube is flattened row-major,
//     channel-interleaved, into one f64 vector of dimension 12288.
//
// Extraction is independent per cover, so the batch runs on a rayon
// parallel iterator. The collect preserves input order, which keeps the
// final permutation independent of scheduling.

use image::DynamicImage;
use image::imageops::FilterType;
use rayon::prelude::*;

/// Side length of the downsampled cover used for feature extraction.
pub const FEATURE_SIZE: u32 = 64;

/// Dimension of one feature vector: width * height * 3 HSV channels.
pub const FEATURE_DIM: usize = (FEATURE_SIZE * FEATURE_SIZE * 3) as usize;

/// An N x D feature matrix stored as one flat row-major buffer.
pub struct FeatureMatrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl FeatureMatrix {
    /// Builds a matrix from explicit rows. Every row must have the same
    /// length. Useful for stages (and tests) that operate on matrices that
    /// did not come from cover art.
    pub fn from_rows(rows: &[&[f64]]) -> Self {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            assert_eq!(row.len(), cols, "all matrix rows must share one length");
            data.extend_from_slice(row);
        }
        Self {
            data,
            rows: rows.len(),
            cols,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

/// Extracts one feature vector per cover and stacks them into a matrix.
/// Row `i` of the result describes `art[i]`.
pub fn extract_features(art: &[DynamicImage]) -> FeatureMatrix {
    let rows: Vec<Vec<f64>> = art.par_iter().map(feature_vector).collect();

    let mut data = Vec::with_capacity(rows.len() * FEATURE_DIM);
    for row in &rows {
        data.extend_from_slice(row);
    }

    FeatureMatrix {
        data,
        rows: rows.len(),
        cols: FEATURE_DIM,
    }
}

/// Downsamples, channel-normalizes and ravels a single cover.
fn feature_vector(cover: &DynamicImage) -> Vec<f64> {
    let small = cover
        .resize_exact(FEATURE_SIZE, FEATURE_SIZE, FilterType::CatmullRom)
        .to_rgb8();

    let mut features = Vec::with_capacity(FEATURE_DIM);
    for pixel in small.pixels() {
        let [r, g, b] = pixel.0;
        let (h, s, v) = rgb_to_hsv8(r, g, b);
        features.push(h as f64);
        features.push(s as f64);
        features.push(v as f64);
    }
    features
}

/// Converts an 8-bit RGB pixel to 8-bit-scaled HSV.
/// Hue is mapped from [0, 360) degrees onto [0, 255]; saturation and value
/// keep the full 8-bit range.
fn rgb_to_hsv8(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let rf = r as f64 / 255.0;
    let gf = g as f64 / 255.0;
    let bf = b as f64 / 255.0;

    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let v = max;
    let s = if max > 0.0 { delta / max } else { 0.0 };

    let h_degrees = if delta <= f64::EPSILON {
        0.0
    } else if (max - rf).abs() <= f64::EPSILON {
        60.0 * (((gf - bf) / delta).rem_euclid(6.0))
    } else if (max - gf).abs() <= f64::EPSILON {
        60.0 * ((bf - rf) / delta + 2.0)
    } else {
        60.0 * ((rf - gf) / delta + 4.0)
    };

    let h = (h_degrees / 360.0 * 255.0).round().clamp(0.0, 255.0) as u8;
    let s = (s * 255.0).round() as u8;
    let v = (v * 255.0).round() as u8;
    (h, s, v)
}
