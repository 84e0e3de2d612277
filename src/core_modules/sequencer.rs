// THEORY:
// The `sequencer` module is the ordering engine. It owns the closed set of
// interchangeable strategies that take an `AlbumSet` and hand back the same
// albums in a new order. Callers select a strategy by tag (or by its config
// string) and dispatch is a plain match, so adding a strategy means adding a
// variant and an arm, nothing dynamic.
//
// Two strategies exist:
// 1.  **ByDate**: validate every release date, then a stable sort on the
//     date string. The strings are ISO-like, so lexicographic order is
//     chronological order, and stability keeps equal-dated albums in their
//     input order.
// 2.  **ByColor**: the full perceptual pipeline. Covers become HSV feature
//     vectors, the matrix is normalized (min-max, then standardization),
//     t-SNE reduces it to a 2D cloud, the grid fitter snaps the cloud onto
//     cells, and a row-major walk of the cells gives the permutation. The
//     result places visually similar covers in nearby mosaic tiles.
//
// Both strategies are permutations: no album is dropped or duplicated, and
// the parallel-array invariant of `AlbumSet` is preserved by construction.

use crate::core_modules::album::AlbumSet;
use crate::core_modules::embedding::reduce_to_plane;
use crate::core_modules::features::extract_features;
use crate::core_modules::grid_fit::{fit_to_grid, row_major_order};
use crate::core_modules::normalize::normalize_features;
use crate::error::MosaicError;

/// The closed set of album ordering strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortStrategy {
    /// Chronological, release date ascending, stable on ties.
    ByDate,
    /// Perceptual color-similarity layout.
    ByColor,
}

impl SortStrategy {
    /// Parses the configuration tag (`"by_date"` / `"by_color"`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "by_date" => Some(Self::ByDate),
            "by_color" => Some(Self::ByColor),
            _ => None,
        }
    }

    /// Reorders the set according to the strategy. `seed` drives the color
    /// strategy's embedding and is ignored by the date strategy.
    pub fn apply(self, set: AlbumSet, seed: u64) -> Result<AlbumSet, MosaicError> {
        match self {
            Self::ByDate => sort_by_date(set),
            Self::ByColor => sort_by_color(set, seed),
        }
    }
}

/// Stable chronological sort. Fails on the first malformed date, before any
/// reordering happens.
fn sort_by_date(set: AlbumSet) -> Result<AlbumSet, MosaicError> {
    for album in set.albums() {
        if !is_valid_release_date(&album.release_date) {
            return Err(MosaicError::InvalidDateFormat {
                album_id: album.id.clone(),
                value: album.release_date.clone(),
            });
        }
    }

    let mut order: Vec<usize> = (0..set.len()).collect();
    // Stable: ties keep their input order.
    order.sort_by(|&a, &b| set.albums()[a].release_date.cmp(&set.albums()[b].release_date));
    Ok(set.permute(&order))
}

/// Orders covers by visual color similarity.
fn sort_by_color(set: AlbumSet, seed: u64) -> Result<AlbumSet, MosaicError> {
    // Zero or one album: nothing to lay out.
    if set.len() <= 1 {
        return Ok(set);
    }

    // --- 1. Covers -> HSV feature matrix ---
    let mut features = extract_features(set.art());

    // --- 2. Min-max, then standardization ---
    normalize_features(&mut features);

    // --- 3. N x D -> N x 2 embedding ---
    let embedding = reduce_to_plane(&features, seed);

    // --- 4. Snap the cloud onto a grid, walk it row-major ---
    let assignment = fit_to_grid(&embedding);
    let order = row_major_order(&assignment);

    Ok(set.permute(&order))
}

/// Accepts `YYYY`, `YYYY-MM` and `YYYY-MM-DD` with plausible month/day
/// ranges. Anything else cannot be ordered lexicographically and is
/// rejected.
fn is_valid_release_date(date: &str) -> bool {
    let mut parts = date.split('-');

    let Some(year) = parts.next() else {
        return false;
    };
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    if let Some(month) = parts.next() {
        if month.len() != 2 || !month.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        let m: u32 = month.parse().unwrap_or(0);
        if !(1..=12).contains(&m) {
            return false;
        }

        if let Some(day) = parts.next() {
            if day.len() != 2 || !day.bytes().all(|b| b.is_ascii_digit()) {
                return false;
            }
            let d: u32 = day.parse().unwrap_or(0);
            if !(1..=31).contains(&d) {
                return false;
            }
        }
    }

    parts.next().is_none()
}
