use faer::linalg::solvers::Solve;
use faer::prelude::*;
use faer_ext::{IntoFaer, IntoNdarray};
use ndarray::{Array1, Array2, ArrayView1};

use crate::genetic::PopulationFitness;

pub trait HyperPlaneNormalization {
    /// This corresponds to the Z_max defined in the NSGA3 paper: one extreme
    /// vector per objective, taken from the translated rank-0 front.
    fn compute_extreme_points(&self, translated_front: &PopulationFitness) -> Array2<f64>;

    /// Computes the intercepts vector `a` by solving the linear system:
    /// Z_max * b = 1, where 1 is a vector of ones.
    /// then the intercepts in the objective axis are given by a = 1/b
    ///
    /// When no unique hyperplane exists (two extreme points coincide, or the
    /// solve yields a non-finite or non-positive component) the intercepts
    /// fall back to the diagonal of Z_max, i.e. each objective's own
    /// translated extreme value.
    fn compute_hyperplane_intercepts(&self, translated_front: &PopulationFitness) -> Array1<f64> {
        let m = translated_front.ncols();
        // Compute Z_max
        let z_max = self.compute_extreme_points(translated_front);
        if has_duplicate_rows(&z_max) {
            // Fewer than M distinct extremes: degenerate hyperplane.
            return z_max.diag().to_owned();
        }
        // We have to use the faer solver --- We don't use ndarray-linalg due that is not maintained
        let z_max_faer = z_max.view().into_faer();

        let ones = Mat::<f64>::from_fn(m, 1, |_, _| 1.0);
        // Compute the LU decomposition with partial pivoting,
        let plu = z_max_faer.partial_piv_lu();
        let solution = plu.solve(&ones);
        let solution_ndarray = solution.as_ref().into_ndarray();
        // this step is done because faer responds as two array [[...], [...], ..., [...]]
        let solution_ndarray: ArrayView1<f64> = solution_ndarray
            .into_shape_with_order(solution_ndarray.len())
            .unwrap();
        if solution_ndarray.iter().any(|&x| !x.is_finite() || x <= 0.0) {
            // this is the case for singular matrices
            z_max.diag().to_owned()
        } else {
            // Calculate intercepts as 1 / b.
            solution_ndarray.mapv(|val| 1.0 / val)
        }
    }
}

/// Exact row comparison is intentional: duplicate extreme rows are copies of
/// the same individual's translated objectives.
fn has_duplicate_rows(matrix: &Array2<f64>) -> bool {
    let n = matrix.nrows();
    for i in 0..n {
        for j in (i + 1)..n {
            if matrix.row(i) == matrix.row(j) {
                return true;
            }
        }
    }
    false
}
