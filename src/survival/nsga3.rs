use ndarray::{Array1, Array2, Axis, s};
use ndarray_stats::QuantileExt;

use crate::genetic::{Fronts, FrontsExt, Population, PopulationFitness};
use crate::helpers::extreme_points::get_ideal;
use crate::non_dominated_sorting::build_fronts;
use crate::random::RandomGenerator;
use crate::survival::helpers::HyperPlaneNormalization;
use crate::survival::{SelectionError, SurvivalOperator, validate_positive};

/// Epsilon replacing zero weights in the achievement scalarizing function.
const ASF_EPSILON: f64 = 1e-6;
/// Near-zero intercepts are substituted by this divisor instead of raising an
/// error; replicating the threshold is required for behavioral compatibility.
const INTERCEPT_EPSILON: f64 = 1e-10;

/// Per-generation bookkeeping for one reference point: the number of
/// individuals from fully-accepted fronts already niched to it, and the
/// boundary-front candidates recorded as (perpendicular distance, row index)
/// pairs. Rebuilt from scratch on every association pass; the lattice
/// positions themselves never change.
#[derive(Clone, Debug, Default)]
pub struct ReferencePointNiche {
    pub count: usize,
    pub associates: Vec<(f64, usize)>,
}

struct Nsga3HyperPlaneNormalization;

impl Nsga3HyperPlaneNormalization {
    pub fn new() -> Self {
        Self
    }
}

impl HyperPlaneNormalization for Nsga3HyperPlaneNormalization {
    /// Computes the extreme points (z_max) from the translated rank-0 front.
    /// For each objective j, constructs a weight vector:
    ///   w^j = [eps, ..., 1.0 (at position j), ..., eps],
    /// then selects the solution that minimizes ASF(s, w^j) using argmin from ndarray-stats.
    fn compute_extreme_points(&self, translated_front: &PopulationFitness) -> Array2<f64> {
        let n_objectives = translated_front.ncols();
        // One extreme vector per objective.
        let mut extreme_points = Array2::<f64>::zeros((n_objectives, n_objectives));

        for j in 0..n_objectives {
            // All elements are epsilon except for the j-th element which is 1.0.
            let mut weight = Array1::<f64>::from_elem(n_objectives, ASF_EPSILON);
            weight[j] = 1.0;

            let asf_values: Vec<f64> = translated_front
                .outer_iter()
                .map(|solution| asf(&solution.to_owned(), &weight))
                .collect();
            let asf_array = Array1::from(asf_values);

            let best_idx = asf_array.argmin().unwrap();

            // The extreme point for objective j is the translated objective vector
            // of the solution that minimized ASF with weight vector w^j.
            let extreme = translated_front.row(best_idx);
            extreme_points.slice_mut(s![j, ..]).assign(&extreme);
        }
        extreme_points
    }
}

/// Reference-point based environmental selection, the survival operator of
/// the NSGA3 algorithm presented in the paper "An Evolutionary Many-Objective
/// Optimization Algorithm Using Reference-point Based Non-dominated Sorting
/// Approach".
///
/// Owns the fixed lattice of reference points in normalized objective space;
/// the lattice is built once per (objective count, division count) pair and
/// reused read-only across generations.
#[derive(Clone, Debug)]
pub struct ReferencePointsSurvival {
    reference_points: Array2<f64>, // Each row is a reference point
}

impl ReferencePointsSurvival {
    pub fn new(reference_points: Array2<f64>) -> Result<Self, SelectionError> {
        validate_positive(reference_points.nrows(), "reference point count")?;
        validate_positive(reference_points.ncols(), "objective count")?;
        Ok(Self { reference_points })
    }

    pub fn n_objectives(&self) -> usize {
        self.reference_points.ncols()
    }
}

impl SurvivalOperator for ReferencePointsSurvival {
    fn operate(
        &mut self,
        population: Population,
        n_survive: usize,
        rng: &mut dyn RandomGenerator,
    ) -> Result<Population, SelectionError> {
        validate_positive(n_survive, "n_survive")?;
        if population.fitness.ncols() != self.n_objectives() {
            return Err(SelectionError::InvalidParameter(format!(
                "population has {} objectives but the reference lattice was built for {}",
                population.fitness.ncols(),
                self.n_objectives()
            )));
        }
        if n_survive > population.len() {
            return Err(SelectionError::InvalidParameter(format!(
                "n_survive ({}) exceeds the candidate pool size ({})",
                n_survive,
                population.len()
            )));
        }

        // Build rank-annotated fronts
        let fronts = build_fronts(population, n_survive);
        // Whole fronts accepted so far, flattened only when needed.
        let mut accepted: Fronts = Vec::new();
        let mut n_survivors = 0;
        for front in fronts {
            let front_len = front.len();

            if n_survivors + front_len <= n_survive {
                // The whole front fits.
                accepted.push(front);
                n_survivors += front_len;
                if n_survivors == n_survive {
                    // Exact fill: boundary resolution is skipped entirely.
                    break;
                }
            } else {
                // This front is the boundary front: only part of it is needed.
                let remaining = n_survive - n_survivors;
                let n_accepted = n_survivors;
                // S_t from Algorithm 1 in the presented paper: every front
                // seen so far including the boundary front. Normalization
                // needs the whole candidate pool seen up to this point.
                accepted.push(front);
                let mut st = accepted.to_population();

                // Normalize (Algorithm 2), then associate (Algorithm 3).
                normalize(&mut st);
                let normalized = st
                    .normalized_fitness
                    .as_ref()
                    .expect("normalization must populate the normalized fitness matrix");
                let mut niches = associate(normalized, &self.reference_points, n_accepted);

                // Niching (Algorithm 4) selects exactly `remaining` rows from
                // the boundary part of S_t.
                let chosen_rows = niching(remaining, &mut niches, rng);
                let boundary_selection = st.selected(&chosen_rows);

                // Re-select the accepted rows from S_t rather than reusing the
                // accepted fronts: this way their normalized vectors travel
                // with the archive.
                let survivors = if n_accepted > 0 {
                    let accepted_rows: Vec<usize> = (0..n_accepted).collect();
                    Population::merge(&st.selected(&accepted_rows), &boundary_selection)
                } else {
                    boundary_selection
                };
                return Ok(survivors);
            }
        }
        Ok(accepted.to_population())
    }
}

/// Calculates the Achievement Scalarizing Function (ASF) for a given solution `x`
/// (which represents the translated objective values f'_i(x)) and a weight vector `w`.
/// Any weight equal to zero is replaced by a small epsilon (1e-6) to avoid division by zero.
/// This is the equation (4) in the presented paper
fn asf(x: &Array1<f64>, w: &Array1<f64>) -> f64 {
    // Compute the element-wise ratio: f'_i(x) / w_i.
    let ratios = x / w;
    // The ASF is the maximum of these ratios.
    ratios.fold(f64::MIN, |acc, &val| acc.max(val))
}

/// Normalizes the candidate pool in place (Algorithm 2 in the presented paper).
///
/// The ideal point and the extreme points are taken from the rank-0 front
/// only; by the dominance guarantee the population minimum of every objective
/// lies there. The resulting normalized matrix is written into
/// `st.normalized_fitness` for every individual in the pool, selected or not.
fn normalize(st: &mut Population) {
    // Without rank information the whole pool is treated as rank 0.
    let best = st.best();
    let z_min = get_ideal(&best.fitness);

    // Translate every individual in every front.
    let translated = &st.fitness - &z_min;
    let translated_best = &best.fitness - &z_min;

    let normalizer = Nsga3HyperPlaneNormalization::new();
    let intercepts = normalizer.compute_hyperplane_intercepts(&translated_best);

    // Near-zero intercepts are substituted, never raised as an error.
    let divisors = intercepts.mapv(|a| if a < INTERCEPT_EPSILON { INTERCEPT_EPSILON } else { a });
    let normalized = &translated / &divisors;

    st.set_normalized_fitness(normalized)
        .expect("normalized matrix has one row per individual");
}

/// Associates each solution s (each row in the normalized pool) with the
/// reference point w (each row in zr) that minimizes the perpendicular
/// distance d⊥(s, w) to the line through the origin and w.
/// This is the algorithm (3) in the presented paper.
///
/// Rows below `n_accepted` belong to fully-accepted fronts and only bump the
/// niche count; the remaining rows are boundary-front candidates recorded
/// with their distance. Ties are broken by strict comparison, so the first
/// lattice row at the minimum distance wins; lattice row order is part of the
/// deterministic contract.
fn associate(
    normalized: &PopulationFitness,
    zr: &Array2<f64>,
    n_accepted: usize,
) -> Vec<ReferencePointNiche> {
    // 1. Compute squared norms for each solution: shape (n,)
    let norm_s_sq: Array1<f64> = normalized.outer_iter().map(|p| p.dot(&p)).collect();

    // 2. Compute squared norms for each reference: shape (m,)
    // A zero-norm direction (the origin point of a zero-division lattice) has
    // no line to project onto; the distance degrades to the solution's own
    // norm, so the denominator is replaced by 1 while the dot stays 0.
    let norm_w_sq: Array1<f64> = zr
        .outer_iter()
        .map(|w| {
            let n = w.dot(&w);
            if n == 0.0 { 1.0 } else { n }
        })
        .collect();

    // 3. Compute dot products between each s and each w: matrix of shape (n, m)
    let dot = normalized.dot(&zr.t());

    // 4. Reshape norms for broadcasting:
    let norm_s_sq = norm_s_sq.insert_axis(Axis(1)); // shape (n, 1)
    let norm_w_sq = norm_w_sq.insert_axis(Axis(0)); // shape (1, m)

    let dot_sq = dot.mapv(|x| x * x);

    // 5. Squared perpendicular distance:
    // d2[i, j] = ||s_i||^2 - (dot[i,j]^2 / ||w_j||^2)
    let d2 = &norm_s_sq - &dot_sq / &norm_w_sq;

    let mut niches = vec![ReferencePointNiche::default(); zr.nrows()];
    for (i, row) in d2.outer_iter().enumerate() {
        let mut min_idx = 0;
        let mut min_val = f64::INFINITY;
        for (j, &val) in row.indexed_iter() {
            if val < min_val {
                min_val = val;
                min_idx = j;
            }
        }
        if i < n_accepted {
            niches[min_idx].count += 1;
        } else {
            // Clamp tiny negative d2 from floating-point cancellation.
            let distance = min_val.max(0.0).sqrt();
            niches[min_idx].associates.push((distance, i));
        }
    }
    niches
}

/// Implements the Niching procedure (algorithm 4 in the presented paper).
///
/// Repeatedly picks the least-subscribed reference point (ties broken
/// uniformly at random), takes its closest boundary associate when the point
/// is still unsubscribed and a uniformly random one otherwise, and removes
/// reference points permanently once their associate list is exhausted.
///
/// # Panics
/// If every reference point runs out of associates before `n_remaining` rows
/// are selected. The caller derives `n_remaining` from the boundary front
/// itself, so this is a programming-contract violation; under-filling the
/// archive silently would corrupt the surrounding evolutionary loop.
fn niching(
    n_remaining: usize,
    niches: &mut [ReferencePointNiche],
    rng: &mut dyn RandomGenerator,
) -> Vec<usize> {
    let mut available_refs: Vec<usize> = (0..niches.len()).collect();
    let mut selected = Vec::with_capacity(n_remaining);

    while selected.len() < n_remaining {
        assert!(
            !available_refs.is_empty(),
            "niching exhausted every reference point with {} of {} archive slots unfilled",
            n_remaining - selected.len(),
            n_remaining
        );

        // Jmin = { j in available_refs such that count_j is minimal }
        let min_count = available_refs
            .iter()
            .map(|&j| niches[j].count)
            .min()
            .unwrap(); // safe because available_refs is not empty
        let jmin: Vec<usize> = available_refs
            .iter()
            .copied()
            .filter(|&j| niches[j].count == min_count)
            .collect();

        // Select a random reference point from Jmin
        let j_bar = *rng.choose_usize(&jmin).unwrap();

        if niches[j_bar].associates.is_empty() {
            // No boundary candidates left for j_bar: retire it and retry.
            if let Some(pos) = available_refs.iter().position(|&j| j == j_bar) {
                available_refs.remove(pos);
            }
            continue;
        }

        let pick_pos = if niches[j_bar].count == 0 {
            // An unsubscribed niche takes its closest associate.
            niches[j_bar]
                .associates
                .iter()
                .enumerate()
                .min_by(|&(_, &(d1, _)), &(_, &(d2, _))| d1.partial_cmp(&d2).unwrap())
                .map(|(pos, _)| pos)
                .unwrap()
        } else {
            // Otherwise, a uniformly random associate.
            let positions: Vec<usize> = (0..niches[j_bar].associates.len()).collect();
            *rng.choose_usize(&positions).unwrap()
        };

        // Ownership transfer: the chosen row leaves its (single) owning
        // associate list and joins the archive.
        let (_, row) = niches[j_bar].associates.remove(pick_pos);
        niches[j_bar].count += 1;
        selected.push(row);
    }

    selected
}
