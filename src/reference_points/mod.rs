use ndarray::Array2;

mod das_dennis;

pub use das_dennis::DasDennis;

/// A common trait for structured reference points.
///
/// Generated lattices are pure functions of their parameters: immutable once
/// built and safe to share read-only across generations and threads.
pub trait StructuredReferencePoints {
    fn generate(&self) -> Array2<f64>;
}
