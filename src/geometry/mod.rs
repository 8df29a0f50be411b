pub mod coord;
pub mod local_frame;
pub mod polygon;

pub use coord::{DrawingCoord, GeoCoord};
pub use local_frame::LocalFrame;
pub use polygon::GeoPolygon;

/// Mean earth radius in metres (IUGG), used for metric distances.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;
