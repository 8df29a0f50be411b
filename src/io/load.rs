use std::collections::HashSet;
use std::path::Path;

use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, GeoJson, Value};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::error::{LoadError, NavError, Result};
use crate::geometry::{DrawingCoord, GeoCoord, GeoPolygon};
use crate::georef::GeoTransform;
use crate::model::{Booth, Entrance, WalkwayNetwork};

/// Coordinate space a source file is authored in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordSpace {
    /// Longitude/latitude, used as is.
    #[default]
    Geographic,
    /// Floor-plan drawing units, converted through a [`GeoTransform`].
    Drawing,
}

/// Reads floor-plan data from GeoJSON, converting drawing-space input.
#[derive(Debug, Clone, Copy)]
pub struct Loader<'a> {
    space: CoordSpace,
    transform: &'a GeoTransform,
}

impl<'a> Loader<'a> {
    #[must_use]
    pub fn new(space: CoordSpace, transform: &'a GeoTransform) -> Self {
        Self { space, transform }
    }

    /// Loads booth polygons.
    ///
    /// In drawing space, booths with a vertex outside the floor-plan extent
    /// are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the file cannot be read or parsed, or a feature
    /// is not a polygon.
    pub fn booths(&self, path: &Path) -> Result<Vec<Booth>> {
        let text = read(path)?;
        self.parse_booths(&text, path)
    }

    /// Loads walkway lines (`LineString` or `MultiLineString` features).
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the file cannot be read or parsed, or a feature
    /// is not a line.
    pub fn walkways(&self, path: &Path) -> Result<WalkwayNetwork> {
        let text = read(path)?;
        self.parse_walkways(&text, path)
    }

    /// Loads entrance polygons, kept for display only.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the file cannot be read or parsed, or a feature
    /// is not a polygon.
    pub fn entrances(&self, path: &Path) -> Result<Vec<Entrance>> {
        let text = read(path)?;
        let collection = parse_collection(&text, path)?;
        let mut out = Vec::with_capacity(collection.features.len());
        for (index, feature) in collection.features.iter().enumerate() {
            if let Some(polygon) = self.feature_polygon(feature, path, index)? {
                out.push(Entrance {
                    label: string_property(feature, "label"),
                    polygon,
                });
            }
        }
        Ok(out)
    }

    /// Parses booth polygons from GeoJSON text; `source` names the origin
    /// in errors.
    ///
    /// # Errors
    ///
    /// Same as [`Loader::booths`].
    pub fn parse_booths(&self, text: &str, source: &Path) -> Result<Vec<Booth>> {
        let collection = parse_collection(text, source)?;
        let mut booths = Vec::with_capacity(collection.features.len());
        for (index, feature) in collection.features.iter().enumerate() {
            let Some(polygon) = self.feature_polygon(feature, source, index)? else {
                continue;
            };
            booths.push(Booth::new(
                booth_id(feature, index),
                string_property(feature, "label"),
                polygon,
            ));
        }
        warn_duplicate_ids(&booths, source);
        info!(path = %source.display(), count = booths.len(), "loaded booths");
        Ok(booths)
    }

    /// Parses walkway lines from GeoJSON text.
    ///
    /// # Errors
    ///
    /// Same as [`Loader::walkways`].
    pub fn parse_walkways(&self, text: &str, source: &Path) -> Result<WalkwayNetwork> {
        let collection = parse_collection(text, source)?;
        let mut lines = Vec::new();
        for (index, feature) in collection.features.iter().enumerate() {
            let value = geometry_value(feature, source, index)?;
            match value {
                Value::LineString(line) => lines.push(self.line(line, source, index)?),
                Value::MultiLineString(parts) => {
                    for line in parts {
                        lines.push(self.line(line, source, index)?);
                    }
                }
                other => {
                    return Err(malformed(
                        source,
                        index,
                        format!("expected a line, found {}", kind(other)),
                    ))
                }
            }
        }
        info!(path = %source.display(), lines = lines.len(), "loaded walkways");
        Ok(WalkwayNetwork::new(lines))
    }

    /// `None` when a drawing-space polygon leaves the floor-plan extent.
    fn feature_polygon(
        &self,
        feature: &Feature,
        source: &Path,
        index: usize,
    ) -> Result<Option<GeoPolygon>> {
        let rings = match geometry_value(feature, source, index)? {
            Value::Polygon(rings) => rings,
            Value::MultiPolygon(polys) if polys.len() == 1 => &polys[0],
            other => {
                return Err(malformed(
                    source,
                    index,
                    format!("expected a polygon, found {}", kind(other)),
                ))
            }
        };
        let Some((exterior, holes)) = rings.split_first() else {
            return Err(malformed(source, index, "polygon has no rings".to_owned()));
        };

        let converted = std::iter::once(exterior)
            .chain(holes)
            .map(|ring| self.ring(ring, source, index))
            .collect::<Result<Option<Vec<_>>>>()?;
        let Some(mut rings) = converted else {
            warn!(
                path = %source.display(),
                feature = index,
                "polygon leaves the floor-plan extent, skipped"
            );
            return Ok(None);
        };
        let exterior = rings.remove(0);
        Ok(Some(GeoPolygon::with_holes(exterior, rings)))
    }

    /// `None` when a drawing-space vertex is out of the extent.
    fn ring(&self, positions: &[Vec<f64>], source: &Path, index: usize) -> Result<Option<Vec<GeoCoord>>> {
        match self.space {
            CoordSpace::Geographic => positions
                .iter()
                .map(|p| position(p, source, index))
                .collect::<Result<Vec<_>>>()
                .map(Some),
            CoordSpace::Drawing => {
                let drawing = positions
                    .iter()
                    .map(|p| drawing_position(p, source, index))
                    .collect::<Result<Vec<_>>>()?;
                Ok(self.transform.ring_to_geo(&drawing).ok())
            }
        }
    }

    fn line(&self, positions: &[Vec<f64>], source: &Path, index: usize) -> Result<Vec<GeoCoord>> {
        match self.space {
            CoordSpace::Geographic => positions.iter().map(|p| position(p, source, index)).collect(),
            CoordSpace::Drawing => positions
                .iter()
                .map(|p| drawing_position(p, source, index).map(|d| self.transform.to_geo(d)))
                .collect(),
        }
    }
}

pub(crate) fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| {
        LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}

fn parse_collection(text: &str, source: &Path) -> Result<FeatureCollection> {
    let geojson_err = |e: geojson::Error| -> NavError {
        LoadError::GeoJson {
            path: source.to_path_buf(),
            source: Box::new(e),
        }
        .into()
    };
    let geojson: GeoJson = text.parse().map_err(geojson_err)?;
    FeatureCollection::try_from(geojson).map_err(geojson_err)
}

fn geometry_value<'f>(feature: &'f Feature, source: &Path, index: usize) -> Result<&'f Value> {
    feature
        .geometry
        .as_ref()
        .map(|g| &g.value)
        .ok_or_else(|| malformed(source, index, "feature has no geometry".to_owned()))
}

fn position(p: &[f64], source: &Path, index: usize) -> Result<GeoCoord> {
    GeoCoord::from_position(p)
        .ok_or_else(|| malformed(source, index, format!("bad position {p:?}")))
}

fn drawing_position(p: &[f64], source: &Path, index: usize) -> Result<DrawingCoord> {
    match p {
        [x, y, ..] if x.is_finite() && y.is_finite() => Ok(DrawingCoord::new(*x, *y)),
        _ => Err(malformed(source, index, format!("bad position {p:?}"))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

pub(crate) fn malformed(source: &Path, index: usize, reason: String) -> NavError {
    LoadError::Malformed {
        path: source.to_path_buf(),
        index,
        reason,
    }
    .into()
}

/// Duplicate ids are legal; doors stay keyed by booth position, but lookups
/// by id only reach the first booth.
pub(crate) fn warn_duplicate_ids(booths: &[Booth], source: &Path) {
    let mut seen = HashSet::with_capacity(booths.len());
    for booth in booths {
        if !seen.insert(booth.id.as_str()) {
            warn!(path = %source.display(), id = %booth.id, "duplicate booth id");
        }
    }
}

/// `id` property (numbers stringified), else the feature id, else
/// `feature-<index>`.
fn booth_id(feature: &Feature, index: usize) -> String {
    let from_props = feature.property("id").and_then(|v| match v {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    });
    from_props
        .or_else(|| {
            feature.id.as_ref().map(|id| match id {
                Id::String(s) => s.clone(),
                Id::Number(n) => n.to_string(),
            })
        })
        .unwrap_or_else(|| format!("feature-{index}"))
}

fn string_property(feature: &Feature, key: &str) -> Option<String> {
    feature
        .property(key)
        .and_then(JsonValue::as_str)
        .map(str::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn loader(space: CoordSpace, t: &GeoTransform) -> Loader<'_> {
        Loader::new(space, t)
    }

    const BOOTHS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"id": 7, "label": "Fish"},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}},
            {"type": "Feature", "id": "f-2", "properties": {},
             "geometry": {"type": "Polygon", "coordinates": [[[2,0],[3,0],[3,1],[2,0]]]}},
            {"type": "Feature", "properties": null,
             "geometry": {"type": "Polygon", "coordinates": [[[4,0],[5,0],[5,1],[4,0]]]}}
        ]
    }"#;

    #[test]
    fn booth_ids_fall_back_in_order() {
        let t = GeoTransform::market_default().unwrap();
        let booths = loader(CoordSpace::Geographic, &t)
            .parse_booths(BOOTHS, Path::new("booths.geojson"))
            .unwrap();
        let ids: Vec<_> = booths.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["7", "f-2", "feature-2"]);
        assert_eq!(booths[0].label.as_deref(), Some("Fish"));
        assert_eq!(booths[0].polygon.exterior.len(), 4);
    }

    #[test]
    fn drawing_space_is_converted_and_filtered() {
        let t = GeoTransform::market_default().unwrap();
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"id": "in"},
             "geometry": {"type": "Polygon", "coordinates": [[[100,100],[200,100],[200,200],[100,100]]]}},
            {"type": "Feature", "properties": {"id": "out"},
             "geometry": {"type": "Polygon", "coordinates": [[[100,100],[5000,100],[200,200],[100,100]]]}}
        ]}"#;
        let booths = loader(CoordSpace::Drawing, &t)
            .parse_booths(text, Path::new("plan.geojson"))
            .unwrap();
        assert_eq!(booths.len(), 1);
        assert_eq!(booths[0].id, "in");
        assert_eq!(booths[0].polygon.exterior[0], t.to_geo(DrawingCoord::new(100.0, 100.0)));
    }

    #[test]
    fn walkways_accept_multilines() {
        let t = GeoTransform::market_default().unwrap();
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {},
             "geometry": {"type": "LineString", "coordinates": [[0,0],[1,0]]}},
            {"type": "Feature", "properties": {},
             "geometry": {"type": "MultiLineString", "coordinates": [[[1,0],[2,0]],[[2,0],[2,1]]]}}
        ]}"#;
        let net = loader(CoordSpace::Geographic, &t)
            .parse_walkways(text, Path::new("walkways.geojson"))
            .unwrap();
        assert_eq!(net.lines().len(), 3);
        assert_eq!(net.vertices().len(), 6);
    }

    #[test]
    fn wrong_geometry_is_malformed() {
        let t = GeoTransform::market_default().unwrap();
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {},
             "geometry": {"type": "Point", "coordinates": [0,0]}}
        ]}"#;
        let err = loader(CoordSpace::Geographic, &t)
            .parse_booths(text, Path::new("x.geojson"))
            .unwrap_err();
        assert!(matches!(err, NavError::Load(LoadError::Malformed { index: 0, .. })));
        let err = loader(CoordSpace::Geographic, &t)
            .parse_walkways(text, Path::new("x.geojson"))
            .unwrap_err();
        assert!(matches!(err, NavError::Load(LoadError::Malformed { .. })));
    }

    #[test]
    fn invalid_json_is_a_geojson_error() {
        let t = GeoTransform::market_default().unwrap();
        let err = loader(CoordSpace::Geographic, &t)
            .parse_booths("{not json", Path::new("x.geojson"))
            .unwrap_err();
        assert!(matches!(err, NavError::Load(LoadError::GeoJson { .. })));
    }
}
