mod polyline_offset_2d;

pub use polyline_offset_2d::PolylineOffset2D;
