use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::{Array1, ArrayView1, Axis};
use rayon::prelude::*;

use crate::genetic::{Fronts, Population, PopulationFitness};

/// Inlines the check for "does f1 dominate f2?" to reduce call overhead.
/// All objectives are minimized: f1 dominates f2 when it is no worse in every
/// objective and strictly better in at least one.
#[inline]
fn dominates(f1: &ArrayView1<f64>, f2: &ArrayView1<f64>) -> bool {
    let mut better = false;
    // We assume f1.len() == f2.len()
    for (&a, &b) in f1.iter().zip(f2.iter()) {
        if a > b {
            return false;
        } else if a < b {
            better = true;
        }
    }
    better
}

/// Parallel Fast Non-Dominated Sorting.
/// Returns a vector of fronts, each front is a list of indices.
/// The individuals are grouped into fronts in order of non-dominance.
/// If during the construction of fronts the cumulative count of individuals reaches or exceeds
/// `min_survivors`, the entire last front is included (even if it causes the total to exceed
/// `min_survivors`) and no further fronts are added.
pub fn fast_non_dominated_sorting(
    population_fitness: &PopulationFitness,
    min_survivors: usize,
) -> Vec<Vec<usize>> {
    let population_size = population_fitness.shape()[0];

    // Thread-safe data structures
    let domination_count = (0..population_size)
        .map(|_| AtomicUsize::new(0))
        .collect::<Vec<_>>();
    let dominated_sets = (0..population_size)
        .map(|_| Mutex::new(Vec::new()))
        .collect::<Vec<_>>();

    // Precompute row views to avoid repeated indexing
    let fitness_rows: Vec<ArrayView1<f64>> = (0..population_size)
        .map(|i| population_fitness.index_axis(Axis(0), i))
        .collect();

    // Parallel pairwise comparisons: for each pair (p, q) with p < q, each thread updates local data
    (0..population_size).into_par_iter().for_each(|p| {
        // Accumulate changes locally to reduce locking overhead
        let mut local_updates = Vec::new();

        for q in (p + 1)..population_size {
            let p_dominates_q = dominates(&fitness_rows[p], &fitness_rows[q]);
            let q_dominates_p = dominates(&fitness_rows[q], &fitness_rows[p]);

            if p_dominates_q {
                local_updates.push((p, q));
            } else if q_dominates_p {
                local_updates.push((q, p));
            }
            // else -> neither dominates
        }

        // Apply local updates to shared data:
        // For each (dominator, dominated) pair:
        for (dominator, dominated) in local_updates {
            {
                let mut lock = dominated_sets[dominator].lock().unwrap();
                lock.push(dominated);
            }
            domination_count[dominated].fetch_add(1, Ordering::Relaxed);
        }
    });

    // Convert to a normal Vec<Vec<usize>>
    let dominated_sets_vec: Vec<Vec<usize>> = dominated_sets
        .into_iter()
        .map(|m| m.into_inner().unwrap())
        .collect();

    // Build the first front
    let mut fronts = Vec::new();
    let mut first_front = Vec::new();
    for i in 0..population_size {
        if domination_count[i].load(Ordering::Relaxed) == 0 {
            first_front.push(i);
        }
    }
    fronts.push(first_front.clone());
    let mut count = first_front.len();
    // If the first front already reaches min_survivors, return immediately.
    if count >= min_survivors {
        return fronts;
    }

    // Construct subsequent fronts
    let mut current_front = first_front;
    while !current_front.is_empty() {
        let mut next_front = Vec::new();
        for &p in &current_front {
            for &q in &dominated_sets_vec[p] {
                let old_count = domination_count[q].fetch_sub(1, Ordering::Relaxed);
                if old_count == 1 {
                    // now it's zero
                    next_front.push(q);
                }
            }
        }
        if next_front.is_empty() {
            break;
        }
        // If adding the next front reaches or exceeds min_survivors,
        // include the entire front and stop the construction.
        if count + next_front.len() >= min_survivors {
            fronts.push(next_front);
            break;
        } else {
            count += next_front.len();
            fronts.push(next_front.clone());
            current_front = next_front;
        }
    }

    fronts
}

/// Builds rank-annotated fronts from the population.
///
/// Fronts are disjoint, rank-ordered (rank 0 first) and their union covers
/// the candidate pool up to the `n_survive` truncation rule of
/// [`fast_non_dominated_sorting`].
pub fn build_fronts(population: Population, n_survive: usize) -> Fronts {
    let sorted_fronts = fast_non_dominated_sorting(&population.fitness, n_survive);
    let mut results: Fronts = Vec::new();

    // For each front (with rank = front_index), extract the sub-population.
    for (front_index, indices) in sorted_fronts.iter().enumerate() {
        let front_genes = population.genes.select(Axis(0), &indices[..]);
        let front_fitness = population.fitness.select(Axis(0), &indices[..]);

        // Create a rank Array1 (one rank value per individual in the front).
        let rank_arr = Some(Array1::from_elem(indices.len(), front_index));

        let population_front = Population::new(front_genes, front_fitness, rank_arr);
        results.push(population_front);
    }
    results
}
