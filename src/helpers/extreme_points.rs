use ndarray::{Array1, Axis};

use crate::genetic::PopulationFitness;

/// Computes the ideal point from a fitness matrix.
/// Each element of the returned array is the minimum value along the corresponding column.
///
/// For environmental selection this is evaluated over the rank-0 front only:
/// by the dominance guarantee the per-objective minimum of the whole candidate
/// pool already lies in rank 0.
pub fn get_ideal(population_fitness: &PopulationFitness) -> Array1<f64> {
    population_fitness.fold_axis(Axis(0), f64::INFINITY, |a, &b| a.min(b))
}
