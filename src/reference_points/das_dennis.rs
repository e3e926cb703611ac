use ndarray::Array2;

use crate::reference_points::StructuredReferencePoints;

/// Das-Dennis simplex lattice: every composition of `n_divisions` into
/// `n_objectives` non-negative integer parts, divided by `n_divisions`.
///
/// The lattice has C(P+M-1, M-1) points for M objectives and P divisions.
/// No upper bound is enforced; the count grows combinatorially with M, so
/// callers working with many objectives should check [`DasDennis::n_points`]
/// before paying for [`StructuredReferencePoints::generate`].
#[derive(Clone, Debug)]
pub struct DasDennis {
    n_objectives: usize,
    n_divisions: usize,
}

impl DasDennis {
    /// Per-axis division count used when the caller has no tuning preference.
    pub const DEFAULT_DIVISIONS: usize = 6;

    /// # Panics
    /// If `n_objectives` is zero; a lattice needs at least one axis.
    pub fn new(n_objectives: usize, n_divisions: usize) -> Self {
        assert!(
            n_objectives >= 1,
            "n_objectives must be at least 1, got {}",
            n_objectives
        );
        Self {
            n_objectives,
            n_divisions,
        }
    }

    /// Number of lattice points this generator will produce,
    /// binom(P + M - 1, M - 1), without generating them.
    pub fn n_points(&self) -> usize {
        binomial_coefficient(
            self.n_divisions + self.n_objectives - 1,
            self.n_objectives - 1,
        )
    }
}

impl StructuredReferencePoints for DasDennis {
    /// Generates all Das-Dennis reference points for (M, P).
    ///
    /// The procedure is:
    /// 1. Generate all combinations of nonnegative integers (h₁, h₂, …, hₘ)
    ///    that satisfy h₁ + h₂ + ... + hₘ = P.
    /// 2. Normalize each combination by dividing each component by P to get a
    ///    point on the simplex.
    ///
    /// The function returns an Array2<f64> where each row is a reference point.
    /// Row order is deterministic and part of the association tie-break
    /// contract downstream.
    fn generate(&self) -> Array2<f64> {
        let p = self.n_divisions;

        let mut points: Vec<Vec<usize>> = Vec::new();
        let mut current: Vec<usize> = Vec::with_capacity(self.n_objectives);
        generate_combinations(self.n_objectives, p, 0, &mut current, &mut points);

        // P = 0 yields the single all-zero composition; divide by 1 to keep
        // the origin point instead of 0/0.
        let divisor = if p == 0 { 1.0 } else { p as f64 };

        let num_points = points.len();
        let mut arr = Array2::<f64>::zeros((num_points, self.n_objectives));
        for (i, combination) in points.iter().enumerate() {
            for j in 0..self.n_objectives {
                arr[[i, j]] = combination[j] as f64 / divisor;
            }
        }
        arr
    }
}

/// Computes the binomial coefficient "n choose k".
fn binomial_coefficient(n: usize, k: usize) -> usize {
    let mut result = 1;
    for i in 0..k {
        result = result * (n - i) / (i + 1);
    }
    result
}

/// Recursively generates all combinations of nonnegative integers of length
/// `n_objectives` that sum to `sum`.
///
/// - `n_objectives`: total number of objectives
/// - `sum`: the remaining sum to distribute among the components
/// - `index`: current index being filled
/// - `current`: holds the current combination under construction
/// - `points`: collects all generated combinations
fn generate_combinations(
    n_objectives: usize,
    sum: usize,
    index: usize,
    current: &mut Vec<usize>,
    points: &mut Vec<Vec<usize>>,
) {
    if index == n_objectives - 1 {
        // For the last component, assign the remaining sum.
        current.push(sum);
        points.push(current.clone());
        current.pop();
        return;
    }
    // Distribute values from 0 to `sum` for the current component.
    for x in 0..=sum {
        current.push(x);
        generate_combinations(n_objectives, sum - x, index + 1, current, points);
        current.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rstest::rstest;

    #[rstest(
        m, p,
        case(2, 4),
        case(3, 6),
        case(3, 12),
        case(5, 4),
        case(8, 3)
    )]
    fn test_lattice_size_matches_binomial(m: usize, p: usize) {
        let generator = DasDennis::new(m, p);
        let points = generator.generate();
        assert_eq!(points.nrows(), generator.n_points());
        assert_eq!(points.ncols(), m);
    }

    #[test]
    fn test_generate_two_objectives_four_divisions() {
        // M=2, P=4 must produce exactly the 5 lattice points on the segment.
        let points = DasDennis::new(2, 4).generate();
        let expected = array![
            [0.0, 1.0],
            [0.25, 0.75],
            [0.5, 0.5],
            [0.75, 0.25],
            [1.0, 0.0]
        ];
        assert_eq!(points, expected);
    }

    #[test]
    fn test_rows_sum_to_one() {
        let points = DasDennis::new(3, 6).generate();
        for row in points.outer_iter() {
            let sum: f64 = row.sum();
            assert!(
                (sum - 1.0).abs() < 1e-12,
                "lattice row must lie on the unit simplex, got sum {}",
                sum
            );
        }
    }

    #[test]
    fn test_single_objective() {
        // M=1: the only composition is (P,), normalized to 1.0.
        let points = DasDennis::new(1, 6).generate();
        assert_eq!(points, array![[1.0]]);
    }

    #[test]
    #[should_panic(expected = "n_objectives must be at least 1")]
    fn test_zero_objectives_rejected() {
        DasDennis::new(0, 6);
    }

    #[test]
    fn test_zero_divisions_yields_origin() {
        let points = DasDennis::new(3, 0).generate();
        assert_eq!(points, array![[0.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_generate_is_deterministic() {
        let generator = DasDennis::new(4, 5);
        assert_eq!(generator.generate(), generator.generate());
    }

    #[test]
    fn test_binomial_coefficient() {
        assert_eq!(binomial_coefficient(5, 1), 5);
        assert_eq!(binomial_coefficient(9, 2), 36);
        assert_eq!(binomial_coefficient(7, 0), 1);
    }
}
