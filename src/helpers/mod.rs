pub mod extreme_points;
