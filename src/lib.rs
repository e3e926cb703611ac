//! Reference-point based environmental selection for many-objective
//! evolutionary optimizers (NSGA-III style): dominance-rank front walking
//! plus reference-point niching on the boundary front.

pub mod genetic;
pub mod helpers;
pub mod non_dominated_sorting;
pub mod random;
pub mod reference_points;
pub mod survival;
