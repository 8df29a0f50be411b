//! Integration tests for GeoJSON loading and export

#![allow(clippy::unwrap_used)]

use std::io::Write;
use std::path::Path;

use marketnav::engine::{PlanarGeometry, WalkwayGraphFinder};
use marketnav::error::{LoadError, NavError};
use marketnav::geometry::{DrawingCoord, GeoCoord};
use marketnav::georef::GeoTransform;
use marketnav::io::{self, CoordSpace, Loader};
use marketnav::navigation::Navigator;
use marketnav::pipeline::PipelineOptions;
use tempfile::{tempdir, NamedTempFile};

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Two 40×40 drawing-unit booths on either side of an L-shaped corridor.
const DRAWING_BOOTHS: &str = r#"{"type": "FeatureCollection", "features": [
    {"type": "Feature", "properties": {"id": 1, "label": "Cheese"},
     "geometry": {"type": "Polygon", "coordinates": [[[100,100],[140,100],[140,140],[100,140],[100,100]]]}},
    {"type": "Feature", "properties": {"id": 2, "label": "Bread"},
     "geometry": {"type": "Polygon", "coordinates": [[[300,100],[340,100],[340,140],[300,140],[300,100]]]}},
    {"type": "Feature", "properties": {"id": 3, "label": "Off the plan"},
     "geometry": {"type": "Polygon", "coordinates": [[[2200,100],[2300,100],[2300,140],[2200,100]]]}}
]}"#;

const DRAWING_WALKWAYS: &str = r#"{"type": "FeatureCollection", "features": [
    {"type": "Feature", "properties": {},
     "geometry": {"type": "LineString", "coordinates": [[100,100],[200,60],[300,100]]}}
]}"#;

#[test]
fn test_drawing_space_market_routes_end_to_end() {
    let booths_file = write_temp(DRAWING_BOOTHS);
    let walkways_file = write_temp(DRAWING_WALKWAYS);
    let transform = GeoTransform::market_default().unwrap();
    let loader = Loader::new(CoordSpace::Drawing, &transform);

    let booths = loader.booths(booths_file.path()).unwrap();
    let ids: Vec<_> = booths.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, ["1", "2"]);

    let network = loader.walkways(walkways_file.path()).unwrap();
    assert_eq!(network.vertices()[1], transform.to_geo(DrawingCoord::new(200.0, 60.0)));

    let nav = Navigator::new(
        PlanarGeometry::new(),
        WalkwayGraphFinder,
        booths,
        network,
        &PipelineOptions::default(),
    );
    assert_eq!(nav.derived().doors.len(), 2);

    let origin = transform.to_geo(DrawingCoord::new(120.0, 120.0));
    let destination = transform.to_geo(DrawingCoord::new(320.0, 120.0));
    let state = nav.recompute(&nav.initial_state(origin, destination));
    let route = state.route.unwrap();
    let coords = route.coords().unwrap();
    assert_eq!(coords.len(), 3);
    let back = transform.to_drawing(coords[1]);
    assert!((back.x - 200.0).abs() < 1e-6 && (back.y - 60.0).abs() < 1e-6);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let transform = GeoTransform::market_default().unwrap();
    let loader = Loader::new(CoordSpace::Geographic, &transform);
    let err = loader.booths(Path::new("/nonexistent/floor.geojson")).unwrap_err();
    assert!(matches!(err, NavError::Load(LoadError::Io { .. })));
}

#[test]
fn test_feature_without_geometry_is_malformed() {
    let file = write_temp(
        r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"id": "a"}, "geometry": null}
        ]}"#,
    );
    let transform = GeoTransform::market_default().unwrap();
    let err = Loader::new(CoordSpace::Geographic, &transform)
        .booths(file.path())
        .unwrap_err();
    assert!(matches!(err, NavError::Load(LoadError::Malformed { index: 0, .. })));
}

#[test]
fn test_export_writes_all_collections() {
    let booths_file = write_temp(DRAWING_BOOTHS);
    let walkways_file = write_temp(DRAWING_WALKWAYS);
    let transform = GeoTransform::market_default().unwrap();
    let loader = Loader::new(CoordSpace::Drawing, &transform);
    let nav = Navigator::new(
        PlanarGeometry::new(),
        WalkwayGraphFinder,
        loader.booths(booths_file.path()).unwrap(),
        loader.walkways(walkways_file.path()).unwrap(),
        &PipelineOptions::default(),
    );

    let dir = tempdir().unwrap();
    let written = io::export_derived(dir.path(), nav.derived()).unwrap();
    assert_eq!(written.len(), 4);

    let walls = std::fs::read_to_string(dir.path().join("walls.geojson")).unwrap();
    let walls: geojson::FeatureCollection = walls.parse::<geojson::GeoJson>().unwrap().try_into().unwrap();
    assert_eq!(walls.features.len(), 2);
    assert_eq!(walls.features[1].property("label").unwrap(), "Bread");
}

/// Booth `1` on the left, a wide booth on the right whose door sits at its
/// far end. `second_props` is the right booth's properties object.
fn id_clash_booths(second_props: &str) -> String {
    format!(
        r#"{{"type": "FeatureCollection", "features": [
    {{"type": "Feature", "properties": {{"id": 1}},
     "geometry": {{"type": "Polygon", "coordinates": [[[-79.3596,43.81281],[-79.3595,43.81281],[-79.3595,43.8129],[-79.3596,43.8129],[-79.3596,43.81281]]]}}}},
    {{"type": "Feature", "properties": {second_props},
     "geometry": {{"type": "Polygon", "coordinates": [[[-79.3594,43.81281],[-79.359,43.81281],[-79.359,43.8129],[-79.3594,43.8129],[-79.3594,43.81281]]]}}}}
]}}"#
    )
}

const ID_CLASH_WALKWAYS: &str = r#"{"type": "FeatureCollection", "features": [
    {"type": "Feature", "properties": {},
     "geometry": {"type": "LineString", "coordinates": [[-79.3597,43.8127],[-79.3595,43.81281],[-79.359,43.81281]]}}
]}"#;

fn id_clash_navigator(second_props: &str) -> Navigator<PlanarGeometry, WalkwayGraphFinder> {
    let booths_file = write_temp(&id_clash_booths(second_props));
    let walkways_file = write_temp(ID_CLASH_WALKWAYS);
    let transform = GeoTransform::market_default().unwrap();
    let loader = Loader::new(CoordSpace::Geographic, &transform);
    Navigator::new(
        PlanarGeometry::new(),
        WalkwayGraphFinder,
        loader.booths(booths_file.path()).unwrap(),
        loader.walkways(walkways_file.path()).unwrap(),
        &PipelineOptions::default(),
    )
}

#[test]
fn test_booth_without_id_keeps_its_own_door() {
    let nav = id_clash_navigator("{}");
    let ids: Vec<_> = nav.booths().iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, ["1", "feature-1"]);
    assert_eq!(nav.derived().doors.len(), 2);

    // Inside the right booth, much closer to the left booth's door.
    let click = GeoCoord::new(-79.35938, 43.81285);
    assert_eq!(nav.snap(click), GeoCoord::new(-79.359, 43.81281));
}

#[test]
fn test_duplicate_ids_keep_both_doors() {
    let nav = id_clash_navigator(r#"{"id": "1"}"#);
    assert_eq!(nav.derived().doors.len(), 2);
    let click = GeoCoord::new(-79.35938, 43.81285);
    assert_eq!(nav.snap(click), GeoCoord::new(-79.359, 43.81281));
    assert_eq!(nav.snap(GeoCoord::new(-79.35955, 43.81285)), GeoCoord::new(-79.3595, 43.81281));
}
