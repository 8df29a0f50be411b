//! yEd GraphML floor plans.
//!
//! Every node with a `y:ShapeNode/y:Geometry` rectangle is a booth drawn in
//! floor-plan units. Every edge between two such nodes is a connection line
//! joining the rectangle centres; taken together the connections form a
//! walkway network in which each booth's centre is its door.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use roxmltree::{Document, Node};
use tracing::{debug, info, warn};

use super::load::{malformed, read, warn_duplicate_ids};
use crate::error::{LoadError, Result};
use crate::geometry::{DrawingCoord, GeoCoord, GeoPolygon};
use crate::georef::GeoTransform;
use crate::model::{Booth, WalkwayNetwork};

const GRAPHML_NS: &str = "http://graphml.graphdrawing.org/xmlns";
const YWORKS_NS: &str = "http://www.yworks.com/xml/graphml";

/// Width and height of a shape whose geometry omits them.
const DEFAULT_SHAPE_SIZE: f64 = 30.0;

/// An edge between two booth centres.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    pub line: [GeoCoord; 2],
}

/// Booths and connections read from one GraphML file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphmlPlan {
    pub booths: Vec<Booth>,
    pub connections: Vec<Connection>,
}

impl GraphmlPlan {
    /// The connections as a walkway network, in edge order.
    #[must_use]
    pub fn walkways(&self) -> WalkwayNetwork {
        WalkwayNetwork::new(self.connections.iter().map(|c| c.line.to_vec()).collect())
    }
}

/// Reads drawing-space GraphML plans through a [`GeoTransform`].
#[derive(Debug, Clone, Copy)]
pub struct GraphmlLoader<'a> {
    transform: &'a GeoTransform,
}

impl<'a> GraphmlLoader<'a> {
    #[must_use]
    pub fn new(transform: &'a GeoTransform) -> Self {
        Self { transform }
    }

    /// Loads a plan from a file.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the file cannot be read, is not XML, has a
    /// non-numeric geometry attribute or joins two nodes more than once.
    pub fn load(&self, path: &Path) -> Result<GraphmlPlan> {
        let text = read(path)?;
        self.parse(&text, path)
    }

    /// Parses a plan from GraphML text; `source` names the origin in errors.
    ///
    /// Booths with a corner outside the floor-plan extent are skipped with a
    /// warning. Their centres still anchor connections.
    ///
    /// # Errors
    ///
    /// Same as [`GraphmlLoader::load`].
    pub fn parse(&self, text: &str, source: &Path) -> Result<GraphmlPlan> {
        let doc = Document::parse(text).map_err(|e| LoadError::Xml {
            path: source.to_path_buf(),
            source: e,
        })?;
        let keys = data_keys(&doc);

        let mut booths = Vec::new();
        let mut centres: HashMap<&str, DrawingCoord> = HashMap::new();
        let nodes = doc
            .descendants()
            .filter(|n| n.has_tag_name((GRAPHML_NS, "node")));
        for (index, node) in nodes.enumerate() {
            let Some(id) = node.attribute("id") else {
                debug!(node = index, "node without id, skipped");
                continue;
            };
            let Some(rect) = shape_geometry(node) else {
                debug!(%id, "node without shape geometry, skipped");
                continue;
            };
            let rect = Rect::read(rect, source, index)?;
            centres.insert(id, rect.centre());

            match self.transform.ring_to_geo(&rect.corners()) {
                Ok(ring) => booths.push(Booth::new(
                    id,
                    node_label(node, &keys),
                    GeoPolygon::new(ring),
                )),
                Err(err) => warn!(path = %source.display(), %id, %err, "booth skipped"),
            }
        }

        let connections = self.connections(&doc, &centres, source)?;
        warn_duplicate_ids(&booths, source);
        info!(
            path = %source.display(),
            booths = booths.len(),
            connections = connections.len(),
            "loaded GraphML plan"
        );
        Ok(GraphmlPlan {
            booths,
            connections,
        })
    }

    fn connections(
        &self,
        doc: &Document<'_>,
        centres: &HashMap<&str, DrawingCoord>,
        source: &Path,
    ) -> Result<Vec<Connection>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let edges = doc
            .descendants()
            .filter(|n| n.has_tag_name((GRAPHML_NS, "edge")));
        for (index, edge) in edges.enumerate() {
            let (Some(from), Some(to)) = (edge.attribute("source"), edge.attribute("target")) else {
                debug!(edge = index, "edge without endpoints, skipped");
                continue;
            };
            let (Some(&a), Some(&b)) = (centres.get(from), centres.get(to)) else {
                debug!(edge = index, from, to, "edge to a node without geometry, skipped");
                continue;
            };
            let pair = if from <= to { (from, to) } else { (to, from) };
            if !seen.insert(pair) {
                return Err(malformed(
                    source,
                    index,
                    format!("nodes {from} and {to} are joined more than once"),
                ));
            }
            out.push(Connection {
                id: edge.attribute("id").map(str::to_owned),
                source: from.to_owned(),
                target: to.to_owned(),
                line: [self.transform.to_geo(a), self.transform.to_geo(b)],
            });
        }
        Ok(out)
    }
}

/// A `y:Geometry` rectangle: top-left corner plus size, y down.
#[derive(Debug, Clone, Copy)]
struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Rect {
    fn read(geometry: Node<'_, '_>, source: &Path, index: usize) -> Result<Self> {
        let attr = |name: &str, default: f64| -> Result<f64> {
            match geometry.attribute(name) {
                None => Ok(default),
                Some(raw) => raw
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| {
                        malformed(source, index, format!("bad geometry {name}={raw:?}"))
                    }),
            }
        };
        Ok(Self {
            x: attr("x", 0.0)?,
            y: attr("y", 0.0)?,
            width: attr("width", DEFAULT_SHAPE_SIZE)?,
            height: attr("height", DEFAULT_SHAPE_SIZE)?,
        })
    }

    fn corners(self) -> [DrawingCoord; 5] {
        let (x0, y0) = (self.x, self.y);
        let (x1, y1) = (self.x + self.width, self.y + self.height);
        [
            DrawingCoord::new(x0, y0),
            DrawingCoord::new(x1, y0),
            DrawingCoord::new(x1, y1),
            DrawingCoord::new(x0, y1),
            DrawingCoord::new(x0, y0),
        ]
    }

    fn centre(self) -> DrawingCoord {
        DrawingCoord::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// `<key id=.. attr.name=..>` declarations; data elements refer to the id.
fn data_keys<'a>(doc: &'a Document<'_>) -> HashMap<&'a str, &'a str> {
    doc.descendants()
        .filter(|n| n.has_tag_name((GRAPHML_NS, "key")))
        .filter_map(|k| {
            let id = k.attribute("id")?;
            Some((id, k.attribute("attr.name").unwrap_or(id)))
        })
        .collect()
}

fn shape_geometry<'a, 'i>(node: Node<'a, 'i>) -> Option<Node<'a, 'i>> {
    node.descendants()
        .find(|n| n.has_tag_name((YWORKS_NS, "ShapeNode")))?
        .descendants()
        .find(|n| n.has_tag_name((YWORKS_NS, "Geometry")))
}

/// The node's `label` data value, else the text of its yEd node label.
fn node_label(node: Node<'_, '_>, keys: &HashMap<&str, &str>) -> Option<String> {
    let from_data = node
        .children()
        .filter(|n| n.has_tag_name((GRAPHML_NS, "data")))
        .find(|d| {
            d.attribute("key")
                .is_some_and(|k| keys.get(k).copied().unwrap_or(k) == "label")
        })
        .and_then(non_empty_text);
    from_data.or_else(|| {
        node.descendants()
            .find(|n| n.has_tag_name((YWORKS_NS, "NodeLabel")))
            .and_then(non_empty_text)
    })
}

fn non_empty_text(node: Node<'_, '_>) -> Option<String> {
    let text = node.text()?.trim();
    (!text.is_empty()).then(|| text.to_owned())
}
