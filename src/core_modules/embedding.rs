// THEORY:
// The `embedding` module is the dimensionality-reduction stage of the Color
// Strategy. It projects the N x D normalized feature matrix down to one 2D
// point per album while approximately preserving which covers were close to
// each other in feature space. The grid fitter then only has to solve a 2D
// placement problem instead of a 12288-dimensional one.
//
// The technique is exact (non-approximated) t-SNE:
// 1.  **Affinities**: for every point, a per-point precision is found by
//     binary search so that the conditional neighbor distribution over the
//     other points has a fixed perplexity. Exponentials are shifted by the
//     nearest-neighbor distance before normalization, so the search stays
//     finite even at extreme precisions.
// 2.  **Symmetrization**: conditional distributions are averaged into one
//     joint distribution P over pairs.
// 3.  **Gradient descent**: 2D points start from a small seeded Gaussian
//     cloud and are pulled together/pushed apart for a fixed number of
//     iterations so that the Student-t neighbor distribution Q of the layout
//     matches P. Early iterations exaggerate P to let clusters separate.
//
// Everything is sequential f64 arithmetic driven by one Pcg32 stream, so a
// fixed seed and identical inputs reproduce the identical embedding. The
// batch sizes this engine sees (tens to a few hundred covers) keep the
// O(n^2) pair loops cheap; no Barnes-Hut approximation is warranted.

use crate::core_modules::features::FeatureMatrix;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

const GRADIENT_ITERATIONS: usize = 500;
const EXAGGERATION_ITERATIONS: usize = 100;
const EXAGGERATION_FACTOR: f64 = 4.0;
const MOMENTUM_SWITCH_ITERATION: usize = 250;
const INITIAL_MOMENTUM: f64 = 0.5;
const FINAL_MOMENTUM: f64 = 0.8;
const LEARNING_RATE: f64 = 100.0;
const PRECISION_SEARCH_STEPS: usize = 50;
const ENTROPY_TOLERANCE: f64 = 1e-5;
const MIN_PROBABILITY: f64 = 1e-12;

/// Projects the feature matrix onto the plane, one (x, y) point per row.
///
/// Deterministic for a fixed `seed` and identical input. Degenerate sizes
/// short-circuit: zero rows yield no points, one row yields the origin.
pub fn reduce_to_plane(matrix: &FeatureMatrix, seed: u64) -> Vec<(f64, f64)> {
    let n = matrix.rows();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![(0.0, 0.0)];
    }

    // --- 1. Pairwise squared distances in feature space ---
    let distances = pairwise_squared_distances(matrix);

    // --- 2. Joint affinities at a size-appropriate perplexity ---
    let perplexity = 30.0_f64.min((n as f64 - 1.0) / 3.0).max(1.0);
    let p = joint_affinities(&distances, n, perplexity);

    // --- 3. Seeded initialization ---
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut y: Vec<(f64, f64)> = (0..n)
        .map(|_| (1e-4 * gaussian(&mut rng), 1e-4 * gaussian(&mut rng)))
        .collect();
    let mut velocity = vec![(0.0, 0.0); n];

    // --- 4. Gradient descent on the layout ---
    let mut q_numerators = vec![0.0; n * n];
    for iteration in 0..GRADIENT_ITERATIONS {
        let exaggeration = if iteration < EXAGGERATION_ITERATIONS {
            EXAGGERATION_FACTOR
        } else {
            1.0
        };
        let momentum = if iteration < MOMENTUM_SWITCH_ITERATION {
            INITIAL_MOMENTUM
        } else {
            FINAL_MOMENTUM
        };

        // Student-t numerators and their total mass.
        let mut z = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = y[i].0 - y[j].0;
                let dy = y[i].1 - y[j].1;
                let numerator = 1.0 / (1.0 + dx * dx + dy * dy);
                q_numerators[i * n + j] = numerator;
                q_numerators[j * n + i] = numerator;
                z += 2.0 * numerator;
            }
        }
        let z = z.max(MIN_PROBABILITY);

        for i in 0..n {
            let mut grad = (0.0, 0.0);
            for j in 0..n {
                if i == j {
                    continue;
                }
                let numerator = q_numerators[i * n + j];
                let q = (numerator / z).max(MIN_PROBABILITY);
                let weight = (exaggeration * p[i * n + j] - q) * numerator;
                grad.0 += 4.0 * weight * (y[i].0 - y[j].0);
                grad.1 += 4.0 * weight * (y[i].1 - y[j].1);
            }
            velocity[i].0 = momentum * velocity[i].0 - LEARNING_RATE * grad.0;
            velocity[i].1 = momentum * velocity[i].1 - LEARNING_RATE * grad.1;
        }
        for i in 0..n {
            y[i].0 += velocity[i].0;
            y[i].1 += velocity[i].1;
        }

        // Re-center so the cloud does not drift.
        let mean_x = y.iter().map(|p| p.0).sum::<f64>() / n as f64;
        let mean_y = y.iter().map(|p| p.1).sum::<f64>() / n as f64;
        for point in &mut y {
            point.0 -= mean_x;
            point.1 -= mean_y;
        }
    }

    y
}

fn pairwise_squared_distances(matrix: &FeatureMatrix) -> Vec<f64> {
    let n = matrix.rows();
    let mut distances = vec![0.0; n * n];
    for i in 0..n {
        let a = matrix.row(i);
        for j in (i + 1)..n {
            let b = matrix.row(j);
            let d2: f64 = a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y) * (x - y))
                .sum();
            distances[i * n + j] = d2;
            distances[j * n + i] = d2;
        }
    }
    distances
}

/// Builds the symmetrized joint distribution P from squared distances.
fn joint_affinities(distances: &[f64], n: usize, perplexity: f64) -> Vec<f64> {
    let target_entropy = perplexity.ln();
    let mut conditional = vec![0.0; n * n];

    for i in 0..n {
        // Shift by the nearest neighbor so exp() never underflows to an
        // all-zero row during the precision search.
        let shift = (0..n)
            .filter(|&j| j != i)
            .map(|j| distances[i * n + j])
            .fold(f64::INFINITY, f64::min);

        let mut beta = 1.0;
        let mut beta_min = f64::NEG_INFINITY;
        let mut beta_max = f64::INFINITY;

        for _ in 0..PRECISION_SEARCH_STEPS {
            let entropy = row_entropy(distances, n, i, beta, shift, &mut conditional);
            let diff = entropy - target_entropy;
            if diff.abs() < ENTROPY_TOLERANCE {
                break;
            }
            if diff > 0.0 {
                // Distribution too flat: sharpen.
                beta_min = beta;
                beta = if beta_max.is_finite() {
                    (beta + beta_max) / 2.0
                } else {
                    beta * 2.0
                };
            } else {
                beta_max = beta;
                beta = if beta_min.is_finite() {
                    (beta + beta_min) / 2.0
                } else {
                    beta / 2.0
                };
            }
        }
    }

    // Symmetrize and normalize to a joint distribution over all pairs.
    let mut joint = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let value = (conditional[i * n + j] + conditional[j * n + i]) / (2.0 * n as f64);
            joint[i * n + j] = value.max(MIN_PROBABILITY);
        }
    }
    joint
}

/// Fills row `i` of `conditional` with the neighbor distribution at
/// precision `beta` and returns its Shannon entropy.
fn row_entropy(
    distances: &[f64],
    n: usize,
    i: usize,
    beta: f64,
    shift: f64,
    conditional: &mut [f64],
) -> f64 {
    let mut sum = 0.0;
    let mut weighted_distance = 0.0;
    for j in 0..n {
        let p = if i == j {
            0.0
        } else {
            let shifted = distances[i * n + j] - shift;
            let p = (-beta * shifted).exp();
            weighted_distance += shifted * p;
            p
        };
        conditional[i * n + j] = p;
    }
    for j in 0..n {
        if j != i {
            sum += conditional[i * n + j];
        }
    }
    let sum = sum.max(MIN_PROBABILITY);

    let entropy = sum.ln() + beta * weighted_distance / sum;
    for j in 0..n {
        if j != i {
            conditional[i * n + j] /= sum;
        }
    }
    entropy
}

/// One standard normal sample via the Box-Muller transform.
fn gaussian(rng: &mut Pcg32) -> f64 {
    let u1: f64 = rng.gen_range(f64::MIN_POSITIVE..1.0);
    let u2: f64 = rng.r#gen();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}
