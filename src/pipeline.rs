//! The full derivation from raw floor plan to route, as one pure function.

use tracing::info;

use crate::engine::{GeometryEngine, PathFinder};
use crate::geometry::GeoCoord;
use crate::model::{Booth, DoorSet, FeatureDiagnostic, Route, WalkwayNetwork};
use crate::operations::doors::DEFAULT_DOOR_EPSILON_M;
use crate::operations::preprocess::{DEFAULT_ROOF_INSET_M, DEFAULT_WALL_THICKNESS_M};
use crate::operations::route::DEFAULT_MERGE_TOLERANCE;
use crate::operations::{
    DeriveRoof, DeriveWalls, DerivedFeature, InferDoors, PlanRoute, SnapToDoor,
};

/// Tunable distances of the derivation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOptions {
    pub roof_inset_m: f64,
    pub wall_thickness_m: f64,
    pub door_epsilon_m: f64,
    /// Walkway vertex merge tolerance in degrees.
    pub merge_tolerance: f64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            roof_inset_m: DEFAULT_ROOF_INSET_M,
            wall_thickness_m: DEFAULT_WALL_THICKNESS_M,
            door_epsilon_m: DEFAULT_DOOR_EPSILON_M,
            merge_tolerance: DEFAULT_MERGE_TOLERANCE,
        }
    }
}

/// Everything derived from one snapshot of booths and walkways.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Derived {
    pub floor: Vec<DerivedFeature>,
    pub roof: Vec<DerivedFeature>,
    pub walls: Vec<DerivedFeature>,
    pub doors: DoorSet,
    pub diagnostics: Vec<FeatureDiagnostic>,
}

impl Derived {
    /// Runs preprocessing and door inference.
    #[must_use]
    pub fn compute(
        engine: &impl GeometryEngine,
        booths: &[Booth],
        network: &WalkwayNetwork,
        options: &PipelineOptions,
    ) -> Self {
        let roof = DeriveRoof::new(options.roof_inset_m).execute(engine, booths);
        let walls = DeriveWalls::new(options.wall_thickness_m).execute(engine, booths);
        let doors = InferDoors::new(options.door_epsilon_m).execute(engine, booths, network);

        let floor = booths
            .iter()
            .map(|b| DerivedFeature {
                booth_id: b.id.clone(),
                label: b.label.clone(),
                polygon: b.polygon.clone(),
            })
            .collect();

        let mut diagnostics = roof.diagnostics;
        diagnostics.extend(walls.diagnostics);
        diagnostics.extend(doors.diagnostics);

        info!(
            booths = booths.len(),
            roofs = roof.features.len(),
            walls = walls.features.len(),
            doors = doors.doors.len(),
            dropped = diagnostics.len(),
            "derived floor plan"
        );

        Self {
            floor,
            roof: roof.features,
            walls: walls.features,
            doors: doors.doors,
            diagnostics,
        }
    }

    /// Snaps both endpoints to doors and plans between them.
    #[must_use]
    pub fn route<P: PathFinder>(
        &self,
        engine: &impl GeometryEngine,
        planner: &PlanRoute<'_, P>,
        booths: &[Booth],
        origin: GeoCoord,
        destination: GeoCoord,
    ) -> Route {
        let snap = SnapToDoor::new(booths, &self.doors);
        let from = snap.snap(engine, origin);
        let to = snap.snap(engine, destination);
        planner.execute(engine, from, to)
    }
}

/// Output of [`recompute_derived`].
#[derive(Debug, Clone, PartialEq)]
pub struct Recomputed {
    pub derived: Derived,
    pub route: Route,
}

/// Derives everything from scratch and plans one route.
///
/// Pure: the same inputs always give the same output. A changed floor plan
/// or walkway network means calling this again.
#[must_use]
pub fn recompute_derived<G, P>(
    engine: &G,
    finder: &P,
    booths: &[Booth],
    network: &WalkwayNetwork,
    origin: GeoCoord,
    destination: GeoCoord,
    options: &PipelineOptions,
) -> Recomputed
where
    G: GeometryEngine,
    P: PathFinder,
{
    let derived = Derived::compute(engine, booths, network, options);
    let graph = finder.build_graph(network, options.merge_tolerance);
    let planner = PlanRoute::new(finder, &graph, network);
    let route = derived.route(engine, &planner, booths, origin, destination);
    Recomputed { derived, route }
}
