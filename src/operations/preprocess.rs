use tracing::warn;

use crate::engine::GeometryEngine;
use crate::geometry::GeoPolygon;
use crate::model::{Booth, FeatureDiagnostic, Stage};

/// Default roof inset in metres.
pub const DEFAULT_ROOF_INSET_M: f64 = 0.1;

/// Default wall half-thickness in metres.
pub const DEFAULT_WALL_THICKNESS_M: f64 = 0.1;

/// A display polygon derived from one booth.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFeature {
    pub booth_id: String,
    pub label: Option<String>,
    pub polygon: GeoPolygon,
}

/// Output of a per-booth derivation: the features that succeeded, in booth
/// order, and one diagnostic per booth that was dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preprocessed {
    pub features: Vec<DerivedFeature>,
    pub diagnostics: Vec<FeatureDiagnostic>,
}

/// Shrinks every booth slightly so neighbouring roofs do not touch.
#[derive(Debug, Clone, Copy)]
pub struct DeriveRoof {
    inset_m: f64,
}

impl DeriveRoof {
    #[must_use]
    pub fn new(inset_m: f64) -> Self {
        Self { inset_m }
    }

    /// Derives one roof per booth. Never fails as a whole.
    #[must_use]
    pub fn execute(&self, engine: &impl GeometryEngine, booths: &[Booth]) -> Preprocessed {
        derive_each(booths, Stage::Roof, |booth| {
            engine.buffer_polygon(&booth.polygon, -self.inset_m)
        })
    }
}

impl Default for DeriveRoof {
    fn default() -> Self {
        Self::new(DEFAULT_ROOF_INSET_M)
    }
}

/// Turns every booth outline into a wall ribbon of fixed thickness.
#[derive(Debug, Clone, Copy)]
pub struct DeriveWalls {
    thickness_m: f64,
}

impl DeriveWalls {
    #[must_use]
    pub fn new(thickness_m: f64) -> Self {
        Self { thickness_m }
    }

    /// Derives one wall ribbon per booth. Never fails as a whole.
    #[must_use]
    pub fn execute(&self, engine: &impl GeometryEngine, booths: &[Booth]) -> Preprocessed {
        derive_each(booths, Stage::Walls, |booth| {
            let outline = engine.boundary(&booth.polygon);
            engine.buffer_line(&outline, self.thickness_m)
        })
    }
}

impl Default for DeriveWalls {
    fn default() -> Self {
        Self::new(DEFAULT_WALL_THICKNESS_M)
    }
}

fn derive_each<F>(booths: &[Booth], stage: Stage, mut derive: F) -> Preprocessed
where
    F: FnMut(&Booth) -> crate::Result<GeoPolygon>,
{
    let mut out = Preprocessed::default();
    for booth in booths {
        match derive(booth) {
            Ok(polygon) => out.features.push(DerivedFeature {
                booth_id: booth.id.clone(),
                label: booth.label.clone(),
                polygon,
            }),
            Err(err) => {
                warn!(booth = %booth.id, %stage, %err, "dropping feature");
                out.diagnostics.push(FeatureDiagnostic {
                    booth_id: booth.id.clone(),
                    stage,
                    reason: err.to_string(),
                });
            }
        }
    }
    out
}
