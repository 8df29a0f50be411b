use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use tracing::info;

use super::graphml::GraphmlPlan;
use crate::error::{ExportError, Result};
use crate::model::{DoorSet, Entrance, Route};
use crate::operations::DerivedFeature;
use crate::pipeline::Derived;

/// Polygon features with `id` and `label` properties.
#[must_use]
pub fn polygon_collection(features: &[DerivedFeature]) -> FeatureCollection {
    collection(
        features
            .iter()
            .map(|f| {
                feature(
                    Value::Polygon(f.polygon.to_rings()),
                    properties(&f.booth_id, f.label.as_deref()),
                )
            })
            .collect(),
    )
}

/// Entrance polygons with their `label`.
#[must_use]
pub fn entrance_collection(entrances: &[Entrance]) -> FeatureCollection {
    collection(
        entrances
            .iter()
            .map(|e| {
                let mut props = JsonObject::new();
                props.insert("label".to_owned(), e.label.as_deref().into());
                feature(Value::Polygon(e.polygon.to_rings()), props)
            })
            .collect(),
    )
}

/// One point feature per door.
#[must_use]
pub fn door_collection(doors: &DoorSet) -> FeatureCollection {
    collection(
        doors
            .iter()
            .map(|d| {
                feature(
                    Value::Point(d.coord.to_position()),
                    properties(&d.booth_id, d.label.as_deref()),
                )
            })
            .collect(),
    )
}

/// A single line feature, or an empty collection for [`Route::NoRoute`].
#[must_use]
pub fn route_collection(route: &Route) -> FeatureCollection {
    let features = route
        .coords()
        .map(|coords| {
            let mut props = JsonObject::new();
            props.insert("length_m".to_owned(), route.length_m().into());
            feature(
                Value::LineString(coords.iter().map(|c| c.to_position()).collect()),
                props,
            )
        })
        .into_iter()
        .collect();
    collection(features)
}

/// A GraphML plan as GeoJSON: `room` polygons, then `connection` lines
/// carrying their `source` and `target` node ids.
#[must_use]
pub fn graphml_collection(plan: &GraphmlPlan) -> FeatureCollection {
    let rooms = plan.booths.iter().map(|b| {
        let mut props = properties(&b.id, b.label.as_deref());
        props.insert("type".to_owned(), "room".into());
        feature(Value::Polygon(b.polygon.to_rings()), props)
    });
    let connections = plan.connections.iter().map(|c| {
        let mut props = JsonObject::new();
        props.insert("id".to_owned(), c.id.as_deref().into());
        props.insert("type".to_owned(), "connection".into());
        props.insert("source".to_owned(), c.source.as_str().into());
        props.insert("target".to_owned(), c.target.as_str().into());
        feature(
            Value::LineString(c.line.iter().map(|p| p.to_position()).collect()),
            props,
        )
    });
    collection(rooms.chain(connections).collect())
}

/// Writes `collection` as pretty-printed GeoJSON.
///
/// # Errors
///
/// Returns `ExportError` if the file cannot be created or written.
pub fn write_collection(path: &Path, collection: FeatureCollection) -> Result<()> {
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), &GeoJson::FeatureCollection(collection))
        .map_err(|source| ExportError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(())
}

/// Writes floor, roof, wall and door collections into `dir`.
///
/// # Errors
///
/// Returns `ExportError` if the directory or any file cannot be written.
pub fn export_derived(dir: &Path, derived: &Derived) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let outputs = [
        ("floor.geojson", polygon_collection(&derived.floor)),
        ("roof.geojson", polygon_collection(&derived.roof)),
        ("walls.geojson", polygon_collection(&derived.walls)),
        ("doors.geojson", door_collection(&derived.doors)),
    ];
    let mut written = Vec::with_capacity(outputs.len());
    for (name, fc) in outputs {
        let path = dir.join(name);
        write_collection(&path, fc)?;
        written.push(path);
    }
    info!(dir = %dir.display(), files = written.len(), "exported derived collections");
    Ok(written)
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn feature(value: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn properties(id: &str, label: Option<&str>) -> JsonObject {
    let mut props = JsonObject::new();
    props.insert("id".to_owned(), id.into());
    props.insert("label".to_owned(), label.into());
    props
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::GeoCoord;
    use crate::model::DoorPoint;

    #[test]
    fn no_route_exports_empty_collection() {
        assert!(route_collection(&Route::NoRoute).features.is_empty());
        let path = Route::Path(vec![
            GeoCoord::new(0.0, 0.0),
            GeoCoord::new(0.0, 0.001),
            GeoCoord::new(0.001, 0.001),
        ]);
        let fc = route_collection(&path);
        assert_eq!(fc.features.len(), 1);
        assert!(fc.features[0].property("length_m").unwrap().as_f64().unwrap() > 200.0);
    }

    #[test]
    fn doors_carry_booth_properties() {
        let doors = DoorSet::new(vec![DoorPoint {
            coord: GeoCoord::new(1.0, 2.0),
            booth: 0,
            booth_id: "12".to_owned(),
            label: Some("Bakery".to_owned()),
        }]);
        let fc = door_collection(&doors);
        let f = &fc.features[0];
        assert_eq!(f.property("id").unwrap(), "12");
        assert_eq!(f.property("label").unwrap(), "Bakery");
        match &f.geometry.as_ref().unwrap().value {
            Value::Point(p) => assert_eq!(p, &vec![1.0, 2.0]),
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn graphml_plan_lists_rooms_then_connections() {
        use crate::geometry::GeoPolygon;
        use crate::io::Connection;
        use crate::model::Booth;

        let square = GeoPolygon::new(vec![
            GeoCoord::new(0.0, 0.0),
            GeoCoord::new(1.0, 0.0),
            GeoCoord::new(1.0, 1.0),
        ]);
        let plan = GraphmlPlan {
            booths: vec![Booth::new("n0", Some("Cheese".to_owned()), square)],
            connections: vec![Connection {
                id: None,
                source: "n0".to_owned(),
                target: "n1".to_owned(),
                line: [GeoCoord::new(0.5, 0.5), GeoCoord::new(3.0, 0.5)],
            }],
        };
        let fc = graphml_collection(&plan);
        assert_eq!(fc.features.len(), 2);
        assert_eq!(fc.features[0].property("type").unwrap(), "room");
        assert_eq!(fc.features[1].property("type").unwrap(), "connection");
        assert_eq!(fc.features[1].property("target").unwrap(), "n1");
        assert!(fc.features[1].property("id").unwrap().is_null());
    }
}
