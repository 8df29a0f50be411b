pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type (local metric plane or drawing space).
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 2x2 matrix, the linear part of an affine map.
pub type Matrix2 = nalgebra::Matrix2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;
