use tracing::{debug, warn};

use crate::engine::GeometryEngine;
use crate::model::{Booth, DoorPoint, DoorSet, FeatureDiagnostic, Stage, WalkwayNetwork};

/// Default outward buffer before testing walkway vertices, in metres.
pub const DEFAULT_DOOR_EPSILON_M: f64 = 1e-4;

/// Doors found for a booth list, plus the booths whose buffer failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InferredDoors {
    pub doors: DoorSet,
    pub diagnostics: Vec<FeatureDiagnostic>,
}

/// Picks, for every booth, the walkway vertex through which it is entered.
///
/// Each booth is grown by a hairline `epsilon_m` so vertices lying on (or
/// numerically just outside) its outline are caught. The first walkway
/// vertex in network order inside the grown booth becomes the door. A
/// booth without such a vertex simply has no door.
#[derive(Debug, Clone, Copy)]
pub struct InferDoors {
    epsilon_m: f64,
}

impl InferDoors {
    #[must_use]
    pub fn new(epsilon_m: f64) -> Self {
        Self { epsilon_m }
    }

    #[must_use]
    pub fn execute(
        &self,
        engine: &impl GeometryEngine,
        booths: &[Booth],
        network: &WalkwayNetwork,
    ) -> InferredDoors {
        let vertices = network.vertices();
        let mut doors = Vec::new();
        let mut diagnostics = Vec::new();

        for (index, booth) in booths.iter().enumerate() {
            let grown = match engine.buffer_polygon(&booth.polygon, self.epsilon_m) {
                Ok(p) => p,
                Err(err) => {
                    warn!(booth = %booth.id, %err, "cannot buffer booth for door search");
                    diagnostics.push(FeatureDiagnostic {
                        booth_id: booth.id.clone(),
                        stage: Stage::Door,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            match vertices.iter().find(|&&v| engine.contains(&grown, v)) {
                Some(&coord) => doors.push(DoorPoint {
                    coord,
                    booth: index,
                    booth_id: booth.id.clone(),
                    label: booth.label.clone(),
                }),
                None => debug!(booth = %booth.id, "no walkway vertex touches booth"),
            }
        }

        InferredDoors {
            doors: DoorSet::new(doors),
            diagnostics,
        }
    }
}

impl Default for InferDoors {
    fn default() -> Self {
        Self::new(DEFAULT_DOOR_EPSILON_M)
    }
}
