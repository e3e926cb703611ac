use std::error::Error;
use std::fmt;

use crate::genetic::Population;
use crate::random::RandomGenerator;

pub mod helpers;
pub mod nsga3;

pub use nsga3::{ReferencePointNiche, ReferencePointsSurvival};

/// Errors raised by environmental selection.
///
/// Only structural/contract violations surface here; numerical edge cases
/// (degenerate hyperplanes, near-zero intercepts, exhausted niches) are
/// absorbed locally with documented fallbacks.
#[derive(Debug)]
pub enum SelectionError {
    InvalidParameter(String),
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::InvalidParameter(msg) => {
                write!(f, "Invalid parameter: {}", msg)
            }
        }
    }
}

impl Error for SelectionError {}

// Helper function for positive integer validation
pub(crate) fn validate_positive(value: usize, name: &str) -> Result<(), SelectionError> {
    if value == 0 {
        return Err(SelectionError::InvalidParameter(format!(
            "{} must be greater than 0",
            name
        )));
    }
    Ok(())
}

/// The SurvivalOperator trait is the seam between the generational loop and
/// the environmental-selection strategy: given the combined parent+offspring
/// population, it selects exactly `n_survive` individuals for the next
/// generation's archive.
pub trait SurvivalOperator {
    /// Selects the individuals that will survive to the next generation.
    ///
    /// One selection pass is single-threaded and must run to completion
    /// before the returned archive is read; independent subpopulations may
    /// run their own passes on separate threads.
    fn operate(
        &mut self,
        population: Population,
        n_survive: usize,
        rng: &mut dyn RandomGenerator,
    ) -> Result<Population, SelectionError>;
}
