use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef as _;

use crate::{
    foundation::core::{NodeId, Point, Rect},
    foundation::error::{ReelError, ReelResult},
    graph::layout,
    graph::spec::{EdgeSpec, NodeSpec},
};

/// A node of the immutable graph arena.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Dense id (arena index).
    pub id: NodeId,
    /// Unique display name.
    pub name: String,
    /// Layout position in graph space.
    pub position: Point,
}

/// An edge of the immutable graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    /// Source node.
    pub from: NodeId,
    /// Target node.
    pub to: NodeId,
    /// Non-negative, finite cost.
    pub weight: f64,
    /// Whether the edge can only be followed from `from` to `to`.
    pub directed: bool,
}

/// Outgoing adjacency entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Adjacent {
    /// Neighbor reachable over one arc.
    pub node: NodeId,
    /// Cost of the step.
    pub weight: f64,
}

/// Static node/edge structure, read-only after [`build_graph`].
///
/// Nodes and arcs live in a `petgraph` [`DiGraph`] whose node indices double as [`NodeId`]s;
/// undirected edges are stored as two opposite arcs. Neighbor lists are additionally kept
/// sorted by id so every consumer sees neighbors in the same order.
#[derive(Clone, Debug)]
pub struct Graph {
    inner: DiGraph<Node, f64>,
    edges: Vec<Edge>,
    sorted_neighbors: Vec<Vec<Adjacent>>,
    by_name: HashMap<String, NodeId>,
}

fn ix(id: NodeId) -> NodeIndex {
    NodeIndex::new(id.index())
}

fn id_of(ix: NodeIndex) -> NodeId {
    NodeId(ix.index() as u32)
}

/// Validate `nodes`/`edges` and build a [`Graph`].
///
/// Node ids follow input order. If any node lacks a position the whole graph is placed on a
/// circle (see [`layout::circle_positions`]).
pub fn build_graph(nodes: &[NodeSpec], edges: &[EdgeSpec]) -> ReelResult<Graph> {
    if nodes.is_empty() {
        return Err(ReelError::malformed("graph must contain at least one node"));
    }
    let count: u32 = nodes
        .len()
        .try_into()
        .ok()
        .filter(|&n| n < u32::MAX)
        .ok_or_else(|| ReelError::malformed("too many nodes"))?;

    let mut by_name = HashMap::with_capacity(nodes.len());
    for (idx, spec) in (0..count).zip(nodes) {
        if spec.name.trim().is_empty() {
            return Err(ReelError::malformed(format!(
                "node {idx} has an empty name"
            )));
        }
        if by_name.insert(spec.name.clone(), NodeId(idx)).is_some() {
            return Err(ReelError::malformed(format!(
                "duplicate node id '{}'",
                spec.name
            )));
        }
    }

    let explicit: Option<Vec<Point>> = nodes.iter().map(NodeSpec::position).collect();
    let positions = match explicit {
        Some(points) => {
            if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
                return Err(ReelError::malformed("node positions must be finite"));
            }
            points
        }
        None => layout::circle_positions(nodes.len()),
    };

    let mut inner: DiGraph<Node, f64> = DiGraph::with_capacity(nodes.len(), edges.len() * 2);
    for (idx, (spec, position)) in (0..count).zip(nodes.iter().zip(positions)) {
        let added = inner.add_node(Node {
            id: NodeId(idx),
            name: spec.name.clone(),
            position,
        });
        debug_assert_eq!(id_of(added), NodeId(idx));
    }

    let lookup = |name: &str| -> ReelResult<NodeId> {
        by_name.get(name).copied().ok_or_else(|| {
            ReelError::malformed(format!("edge references unknown node id '{name}'"))
        })
    };

    let mut graph_edges = Vec::with_capacity(edges.len());
    for spec in edges {
        let from = lookup(&spec.from)?;
        let to = lookup(&spec.to)?;
        if from == to {
            return Err(ReelError::malformed(format!(
                "self-loop on node '{}' is not supported",
                spec.from
            )));
        }
        if !spec.weight.is_finite() || spec.weight < 0.0 {
            return Err(ReelError::malformed(format!(
                "edge '{}' -> '{}' has invalid weight {} (must be finite and >= 0)",
                spec.from, spec.to, spec.weight
            )));
        }

        let mut arcs = vec![(from, to)];
        if !spec.directed {
            arcs.push((to, from));
        }
        if arcs
            .iter()
            .any(|&(a, b)| inner.find_edge(ix(a), ix(b)).is_some())
        {
            return Err(ReelError::malformed(format!(
                "duplicate edge between '{}' and '{}'",
                spec.from, spec.to
            )));
        }

        for (a, b) in arcs {
            inner.add_edge(ix(a), ix(b), spec.weight);
        }
        graph_edges.push(Edge {
            from,
            to,
            weight: spec.weight,
            directed: spec.directed,
        });
    }

    let sorted_neighbors = inner
        .node_indices()
        .map(|n| {
            let mut list: Vec<Adjacent> = inner
                .edges(n)
                .map(|e| Adjacent {
                    node: id_of(e.target()),
                    weight: *e.weight(),
                })
                .collect();
            list.sort_by_key(|adj| adj.node);
            list
        })
        .collect();

    Ok(Graph {
        inner,
        edges: graph_edges,
        sorted_neighbors,
        by_name,
    })
}

impl Graph {
    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.inner.raw_nodes().iter().map(|n| &n.weight)
    }

    /// All edges in input order; an undirected edge appears once.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Node by id, if it exists.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.inner.node_weight(ix(id))
    }

    /// Whether `id` names a node of this graph.
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.inner.node_count()
    }

    /// Resolve a node name to its id.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// Name of `id`, or an empty string for unknown ids.
    pub fn name(&self, id: NodeId) -> &str {
        self.node(id).map(|n| n.name.as_str()).unwrap_or("")
    }

    /// Nodes reachable from `id` over one arc, sorted by neighbor id.
    pub fn neighbors(&self, id: NodeId) -> &[Adjacent] {
        self.sorted_neighbors
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Weight of the arc that can be followed from `a` to `b`.
    pub fn edge_weight(&self, a: NodeId, b: NodeId) -> Option<f64> {
        if !self.contains(a) || !self.contains(b) {
            return None;
        }
        self.inner
            .find_edge(ix(a), ix(b))
            .and_then(|e| self.inner.edge_weight(e).copied())
    }

    /// Underlying directed graph; node indices equal [`NodeId`] indices.
    pub fn as_petgraph(&self) -> &DiGraph<Node, f64> {
        &self.inner
    }

    /// Bounding box of all node positions in graph space.
    pub fn bounds(&self) -> Rect {
        layout::bounds(self.nodes().map(|n| n.position))
    }

    /// Sum of edge weights along `path`, or `None` if two consecutive nodes are not adjacent.
    pub fn path_cost(&self, path: &[NodeId]) -> Option<f64> {
        path.windows(2)
            .map(|pair| self.edge_weight(pair[0], pair[1]))
            .sum()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/model.rs"]
mod tests;
