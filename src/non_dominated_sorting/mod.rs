mod dominator;

pub use dominator::{build_fronts, fast_non_dominated_sorting};
