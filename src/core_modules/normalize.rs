// THEORY:
// The `normalize` module rescales the raw feature matrix so that every
// column contributes comparably to the distances the embedding stage
// computes. Raw HSV channels live on very different effective ranges (hue
// wraps, value saturates), and t-SNE is distance-driven, so skipping this
// step lets a handful of wide columns dominate the layout.
//
// Two passes, in a fixed order:
// 1.  **Min-max**: each column is mapped onto [0, 1] using its own observed
//     range. A constant column has no range and maps to 0.
// 2.  **Standardization**: each column is shifted to zero mean and scaled to
//     unit variance. A zero-variance column is only centered.
//
// Both passes are column-wise over the flat row-major buffer and mutate the
// matrix in place. Min-max is a fixed point on its own output, which is what
// lets the two passes compose predictably.

use crate::core_modules::features::FeatureMatrix;

/// Rescales every column to [0, 1] by its own min/max. Constant columns
/// become 0.
pub fn min_max_scale(matrix: &mut FeatureMatrix) {
    let rows = matrix.rows();
    let cols = matrix.cols();
    if rows == 0 {
        return;
    }
    let data = matrix.as_mut_slice();

    for col in 0..cols {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for row in 0..rows {
            let v = data[row * cols + col];
            min = min.min(v);
            max = max.max(v);
        }

        let range = max - min;
        for row in 0..rows {
            let v = &mut data[row * cols + col];
            *v = if range > 0.0 { (*v - min) / range } else { 0.0 };
        }
    }
}

/// Shifts every column to zero mean and scales to unit variance.
/// Zero-variance columns are centered but not scaled.
pub fn standardize(matrix: &mut FeatureMatrix) {
    let rows = matrix.rows();
    let cols = matrix.cols();
    if rows == 0 {
        return;
    }
    let data = matrix.as_mut_slice();

    for col in 0..cols {
        let mut sum = 0.0;
        for row in 0..rows {
            sum += data[row * cols + col];
        }
        let mean = sum / rows as f64;

        let mut var = 0.0;
        for row in 0..rows {
            let d = data[row * cols + col] - mean;
            var += d * d;
        }
        // Population variance, matching the usual scaler convention.
        let std = (var / rows as f64).sqrt();
        let scale = if std > 0.0 { std } else { 1.0 };

        for row in 0..rows {
            let v = &mut data[row * cols + col];
            *v = (*v - mean) / scale;
        }
    }
}

/// The full two-pass normalization: min-max, then standardization.
/// The order matters and both passes are required.
pub fn normalize_features(matrix: &mut FeatureMatrix) {
    min_max_scale(matrix);
    standardize(matrix);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::features::FeatureMatrix;

    fn matrix_from_rows(rows: &[&[f64]]) -> FeatureMatrix {
        FeatureMatrix::from_rows(rows)
    }

    #[test]
    fn min_max_maps_each_column_onto_unit_range() {
        let mut m = matrix_from_rows(&[&[0.0, 10.0], &[5.0, 20.0], &[10.0, 30.0]]);
        min_max_scale(&mut m);

        assert_eq!(m.row(0), &[0.0, 0.0]);
        assert_eq!(m.row(1), &[0.5, 0.5]);
        assert_eq!(m.row(2), &[1.0, 1.0]);
    }

    #[test]
    fn min_max_is_idempotent() {
        let mut m = matrix_from_rows(&[&[3.0, 7.0], &[1.0, 9.0], &[2.0, 8.0]]);
        min_max_scale(&mut m);
        let once: Vec<f64> = m.as_slice().to_vec();
        min_max_scale(&mut m);
        assert_eq!(m.as_slice(), once.as_slice());
    }

    #[test]
    fn constant_columns_survive_both_passes_as_zeros() {
        let mut m = matrix_from_rows(&[&[4.0, 1.0], &[4.0, 2.0], &[4.0, 3.0]]);
        normalize_features(&mut m);

        for row in 0..3 {
            assert_eq!(m.row(row)[0], 0.0);
        }
    }

    #[test]
    fn standardize_produces_zero_mean_unit_variance() {
        let mut m = matrix_from_rows(&[&[1.0], &[2.0], &[3.0], &[4.0]]);
        standardize(&mut m);

        let n = m.rows() as f64;
        let mean: f64 = (0..m.rows()).map(|i| m.row(i)[0]).sum::<f64>() / n;
        let var: f64 = (0..m.rows()).map(|i| (m.row(i)[0] - mean).powi(2)).sum::<f64>() / n;

        assert!(mean.abs() < 1e-12);
        assert!((var - 1.0).abs() < 1e-12);
    }
}
