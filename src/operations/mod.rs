pub mod doors;
pub mod offset;
pub mod preprocess;
pub mod route;
pub mod snap;

pub use doors::{InferDoors, InferredDoors};
pub use preprocess::{DeriveRoof, DeriveWalls, DerivedFeature, Preprocessed};
pub use route::PlanRoute;
pub use snap::SnapToDoor;
