//! Floor-plan input (GeoJSON, GraphML) and GeoJSON output.

mod export;
mod graphml;
mod load;

pub use export::{
    door_collection, entrance_collection, export_derived, graphml_collection, polygon_collection,
    route_collection, write_collection,
};
pub use graphml::{Connection, GraphmlLoader, GraphmlPlan};
pub use load::{CoordSpace, Loader};
