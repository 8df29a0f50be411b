mod booth;
mod diagnostic;
mod door;
mod route;
mod walkway;

pub use booth::{Booth, Entrance};
pub use diagnostic::{FeatureDiagnostic, Stage};
pub use door::{DoorPoint, DoorSet};
pub use route::{Route, MIN_ROUTE_COORDS};
pub use walkway::WalkwayNetwork;
