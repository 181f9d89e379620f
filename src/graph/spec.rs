use crate::{
    foundation::core::Point,
    foundation::error::ReelResult,
    graph::model::{Graph, build_graph},
};

/// One node as supplied by a graph source.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeSpec {
    /// Unique display name.
    pub name: String,
    /// Layout x coordinate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Layout y coordinate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl NodeSpec {
    /// Node without a layout position.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            x: None,
            y: None,
        }
    }

    /// Node placed at `(x, y)`.
    pub fn at(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            x: Some(x),
            y: Some(y),
        }
    }

    /// Position if both coordinates are set.
    pub fn position(&self) -> Option<Point> {
        Some(Point::new(self.x?, self.y?))
    }
}

/// One edge as supplied by a graph source, referencing nodes by name.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EdgeSpec {
    /// Source node name.
    pub from: String,
    /// Target node name.
    pub to: String,
    /// Non-negative traversal cost.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Whether the edge can only be followed from `from` to `to`.
    #[serde(default)]
    pub directed: bool,
}

fn default_weight() -> f64 {
    1.0
}

impl EdgeSpec {
    /// Undirected edge.
    pub fn undirected(from: impl Into<String>, to: impl Into<String>, weight: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight,
            directed: false,
        }
    }

    /// Directed edge.
    pub fn directed(from: impl Into<String>, to: impl Into<String>, weight: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight,
            directed: true,
        }
    }
}

/// Serializable graph description, the input format of the loader and the CLI.
///
/// ```json
/// {
///   "nodes": [{ "name": "A", "x": 0, "y": 0 }, { "name": "B", "x": 80, "y": 0 }],
///   "edges": [{ "from": "A", "to": "B", "weight": 2.5 }]
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GraphSpec {
    /// Nodes in id order.
    pub nodes: Vec<NodeSpec>,
    /// Edges between named nodes.
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

impl GraphSpec {
    /// Parse a graph description from JSON text.
    pub fn from_json_str(json: &str) -> ReelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a graph description from a reader.
    pub fn from_reader(reader: impl std::io::Read) -> ReelResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Validate and build the immutable [`Graph`].
    pub fn build(&self) -> ReelResult<Graph> {
        build_graph(&self.nodes, &self.edges)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/spec.rs"]
mod tests;
