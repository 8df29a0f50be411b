//! Integration tests for yEd GraphML floor plans

#![allow(clippy::unwrap_used)]

use std::io::Write;

use marketnav::engine::{PlanarGeometry, WalkwayGraphFinder};
use marketnav::geometry::DrawingCoord;
use marketnav::georef::GeoTransform;
use marketnav::io::{self, GraphmlLoader};
use marketnav::model::Route;
use marketnav::navigation::Navigator;
use marketnav::pipeline::PipelineOptions;
use tempfile::NamedTempFile;

/// Three 40×40 rooms in a row, chained left to right.
const ROW_OF_ROOMS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns" xmlns:y="http://www.yworks.com/xml/graphml">
  <key id="d4" for="node" attr.name="label" attr.type="string"/>
  <key id="d6" for="node" yfiles.type="nodegraphics"/>
  <graph id="G" edgedefault="undirected">
    <node id="n0">
      <data key="d4">Cheese</data>
      <data key="d6"><y:ShapeNode><y:Geometry height="40.0" width="40.0" x="100.0" y="100.0"/></y:ShapeNode></data>
    </node>
    <node id="n1">
      <data key="d4">Olives</data>
      <data key="d6"><y:ShapeNode><y:Geometry height="40.0" width="40.0" x="300.0" y="100.0"/></y:ShapeNode></data>
    </node>
    <node id="n2">
      <data key="d4">Bread</data>
      <data key="d6"><y:ShapeNode><y:Geometry height="40.0" width="40.0" x="500.0" y="100.0"/></y:ShapeNode></data>
    </node>
    <edge id="e0" source="n0" target="n1"/>
    <edge id="e1" source="n1" target="n2"/>
  </graph>
</graphml>"#;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_graphml_plan_routes_centre_to_centre() {
    let file = write_temp(ROW_OF_ROOMS);
    let transform = GeoTransform::market_default().unwrap();
    let plan = GraphmlLoader::new(&transform).load(file.path()).unwrap();
    assert_eq!(plan.booths.len(), 3);
    let walkways = plan.walkways();

    let nav = Navigator::new(
        PlanarGeometry::new(),
        WalkwayGraphFinder,
        plan.booths,
        walkways,
        &PipelineOptions::default(),
    );
    let centre = |x: f64| transform.to_geo(DrawingCoord::new(x, 120.0));
    let doors: Vec<_> = nav.derived().doors.iter().map(|d| d.coord).collect();
    assert_eq!(doors, [centre(120.0), centre(320.0), centre(520.0)]);

    let origin = transform.to_geo(DrawingCoord::new(105.0, 135.0));
    let destination = transform.to_geo(DrawingCoord::new(535.0, 105.0));
    let state = nav.recompute(&nav.initial_state(origin, destination));
    assert_eq!(
        state.route,
        Some(Route::Path(vec![centre(120.0), centre(320.0), centre(520.0)]))
    );

    let hits: Vec<_> = nav.search("br").iter().map(|d| d.booth_id.clone()).collect();
    assert_eq!(hits, ["n2"]);
}

#[test]
fn test_graphml_converts_to_geojson() {
    let file = write_temp(ROW_OF_ROOMS);
    let transform = GeoTransform::market_default().unwrap();
    let plan = GraphmlLoader::new(&transform).load(file.path()).unwrap();

    let fc = io::graphml_collection(&plan);
    assert_eq!(fc.features.len(), 5);
    assert_eq!(fc.features[0].property("label").unwrap(), "Cheese");
    assert_eq!(fc.features[4].property("source").unwrap(), "n1");
}
