// THEORY:
// The `grid_fit` module snaps the free-floating 2D embedding onto a regular
// grid. A mosaic needs every cover in exactly one cell, but t-SNE produces
// an irregular cloud, so this stage solves a small assignment problem: each
// point gets a unique cell, chosen to keep points near where the embedding
// put them.
//
// Algorithm steps:
// 1.  **Normalization**: the point cloud is mapped into the unit square so
//     cell geometry and point geometry share one coordinate system. An axis
//     with no spread collapses to the square's midline.
// 2.  **Grid sizing**: `cols = ceil(sqrt(n))`, `rows = ceil(n / cols)`. The
//     cell count is always >= n and the sides are as close to equal as the
//     count allows.
// 3.  **Greedy assignment**: all (point, cell) pairs are ranked by squared
//     distance between the point and the cell center, with a total order on
//     ties (point index, then cell index). Walking that ranking and taking
//     every pair whose point and cell are both still free yields a bijection
//     from the n points onto n distinct cells.
//
// The greedy ranking is not globally optimal, but it is deterministic,
// always produces a bijection, and in practice lands within a few percent of
// the optimal total displacement, which is invisible in the finished mosaic.

/// A unique grid cell per input point, plus the grid's dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridAssignment {
    pub rows: usize,
    pub cols: usize,
    /// `cells[i]` is the (row, col) assigned to input point `i`.
    pub cells: Vec<(usize, usize)>,
}

/// Assigns every embedding point a unique cell on the best-fit grid.
pub fn fit_to_grid(points: &[(f64, f64)]) -> GridAssignment {
    let n = points.len();
    if n == 0 {
        return GridAssignment {
            rows: 0,
            cols: 0,
            cells: Vec::new(),
        };
    }

    // --- 1. Normalize the cloud into the unit square ---
    let normalized = normalize_to_unit_square(points);

    // --- 2. Size the grid ---
    let cols = (n as f64).sqrt().ceil() as usize;
    let rows = n.div_ceil(cols);
    let cell_count = rows * cols;

    // --- 3. Rank every (point, cell) pair by displacement ---
    let mut ranking = Vec::with_capacity(n * cell_count);
    for (point_idx, &(px, py)) in normalized.iter().enumerate() {
        for cell_idx in 0..cell_count {
            let row = cell_idx / cols;
            let col = cell_idx % cols;
            let cx = (col as f64 + 0.5) / cols as f64;
            let cy = (row as f64 + 0.5) / rows as f64;
            let d2 = (px - cx) * (px - cx) + (py - cy) * (py - cy);
            ranking.push((d2, point_idx, cell_idx));
        }
    }
    ranking.sort_by(|a, b| {
        a.0.total_cmp(&b.0)
            .then(a.1.cmp(&b.1))
            .then(a.2.cmp(&b.2))
    });

    // --- 4. Greedy bijection ---
    let mut cell_taken = vec![false; cell_count];
    let mut cells = vec![None; n];
    let mut assigned = 0;
    for (_, point_idx, cell_idx) in ranking {
        if assigned == n {
            break;
        }
        if cells[point_idx].is_some() || cell_taken[cell_idx] {
            continue;
        }
        cells[point_idx] = Some((cell_idx / cols, cell_idx % cols));
        cell_taken[cell_idx] = true;
        assigned += 1;
    }

    GridAssignment {
        rows,
        cols,
        cells: cells.into_iter().map(|c| c.unwrap()).collect(),
    }
}

/// Orders points by their assigned cell, row-major: primary key row,
/// secondary key column. Returns the permutation to apply to the inputs.
pub fn row_major_order(assignment: &GridAssignment) -> Vec<usize> {
    let mut order: Vec<usize> = (0..assignment.cells.len()).collect();
    order.sort_by_key(|&i| assignment.cells[i]);
    order
}

fn normalize_to_unit_square(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    let span_x = max_x - min_x;
    let span_y = max_y - min_y;
    points
        .iter()
        .map(|&(x, y)| {
            let nx = if span_x > 0.0 { (x - min_x) / span_x } else { 0.5 };
            let ny = if span_y > 0.0 { (y - min_y) / span_y } else { 0.5 };
            (nx, ny)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn scattered(n: usize) -> Vec<(f64, f64)> {
        // Deterministic irregular cloud, no RNG needed.
        (0..n)
            .map(|i| {
                let t = i as f64;
                ((t * 1.7).sin() * 10.0, (t * 2.3).cos() * 10.0)
            })
            .collect()
    }

    #[test]
    fn assignment_is_a_bijection_onto_distinct_cells() {
        for n in [1, 2, 5, 9, 10, 16, 23] {
            let assignment = fit_to_grid(&scattered(n));
            assert_eq!(assignment.cells.len(), n);

            let unique: HashSet<_> = assignment.cells.iter().collect();
            assert_eq!(unique.len(), n, "n={n}: cells must be unique");

            for &(row, col) in &assignment.cells {
                assert!(row < assignment.rows);
                assert!(col < assignment.cols);
            }
        }
    }

    #[test]
    fn grid_side_covers_the_square_estimate() {
        for n in [1, 2, 5, 9, 10, 16, 23] {
            let assignment = fit_to_grid(&scattered(n));
            let side = (n as f64).sqrt().ceil() as usize;
            assert!(assignment.cols >= side || assignment.rows >= side);
            assert!(assignment.rows * assignment.cols >= n);
        }
    }

    #[test]
    fn fitting_is_deterministic() {
        let points = scattered(12);
        assert_eq!(fit_to_grid(&points), fit_to_grid(&points));
    }

    #[test]
    fn row_major_order_walks_rows_then_columns() {
        let assignment = GridAssignment {
            rows: 2,
            cols: 2,
            cells: vec![(1, 0), (0, 1), (0, 0), (1, 1)],
        };
        assert_eq!(row_major_order(&assignment), vec![2, 1, 0, 3]);
    }

    #[test]
    fn corner_points_keep_their_corners() {
        // Four points already in a square layout should map to the four
        // cells without swaps.
        let points = vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)];
        let assignment = fit_to_grid(&points);
        assert_eq!(assignment.cells[0], (0, 0));
        assert_eq!(assignment.cells[1], (0, 1));
        assert_eq!(assignment.cells[2], (1, 0));
        assert_eq!(assignment.cells[3], (1, 1));
    }

    #[test]
    fn empty_cloud_yields_empty_assignment() {
        let assignment = fit_to_grid(&[]);
        assert!(assignment.cells.is_empty());
        assert_eq!(assignment.rows, 0);
    }
}
