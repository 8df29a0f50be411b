use std::collections::HashMap;

use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use tracing::debug;

use super::PathFinder;
use crate::geometry::GeoCoord;
use crate::model::WalkwayNetwork;

/// Smallest merge tolerance accepted; anything below is clamped.
const MIN_TOLERANCE: f64 = 1e-12;

type NodeKey = (i64, i64);

/// Undirected walkway graph with edge weights in metres.
#[derive(Debug, Clone)]
pub struct WalkwayGraph {
    graph: UnGraph<GeoCoord, f64>,
    nodes: HashMap<NodeKey, NodeIndex>,
    tolerance: f64,
}

impl WalkwayGraph {
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn node_for(&self, c: GeoCoord) -> Option<NodeIndex> {
        self.nodes.get(&snap_key(c, self.tolerance)).copied()
    }
}

/// Default path finder: coordinates snapped onto a `tolerance` grid become
/// shared nodes, then A* with a zero heuristic (Dijkstra) finds the path.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkwayGraphFinder;

impl PathFinder for WalkwayGraphFinder {
    type Graph = WalkwayGraph;

    fn build_graph(&self, network: &WalkwayNetwork, tolerance: f64) -> WalkwayGraph {
        let tolerance = tolerance.max(MIN_TOLERANCE);
        let mut graph = UnGraph::new_undirected();
        let mut nodes: HashMap<NodeKey, NodeIndex> = HashMap::new();

        for line in network.lines() {
            let mut prev: Option<NodeIndex> = None;
            for &c in line {
                let node = *nodes
                    .entry(snap_key(c, tolerance))
                    .or_insert_with(|| graph.add_node(c));
                if let Some(p) = prev {
                    if p != node {
                        let weight = graph[p].haversine_m(&graph[node]);
                        graph.add_edge(p, node, weight);
                    }
                }
                prev = Some(node);
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            tolerance,
            "walkway graph built"
        );
        WalkwayGraph {
            graph,
            nodes,
            tolerance,
        }
    }

    fn shortest_path(
        &self,
        graph: &WalkwayGraph,
        start: GeoCoord,
        end: GeoCoord,
    ) -> Option<Vec<GeoCoord>> {
        let from = graph.node_for(start)?;
        let to = graph.node_for(end)?;
        let (_cost, nodes) = astar(
            &graph.graph,
            from,
            |n| n == to,
            |e| *e.weight(),
            |_| 0.0,
        )?;
        Some(nodes.into_iter().map(|n| graph.graph[n]).collect())
    }
}

#[allow(clippy::cast_possible_truncation)]
fn snap_key(c: GeoCoord, tolerance: f64) -> NodeKey {
    (
        (c.lng / tolerance).round() as i64,
        (c.lat / tolerance).round() as i64,
    )
}
