use crate::foundation::core::NodeId;

/// Classification of one node in a [`TraversalState`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum NodeClass {
    /// Not discovered yet.
    #[default]
    Unvisited,
    /// Discovered but not expanded.
    Frontier,
    /// Expanded in an earlier step.
    Visited,
    /// Expanded in the step just taken.
    Current,
    /// Part of the reconstructed result path.
    OnResultPath,
}

impl NodeClass {
    /// All variants, in legend order.
    pub const ALL: [NodeClass; 5] = [
        NodeClass::Unvisited,
        NodeClass::Frontier,
        NodeClass::Visited,
        NodeClass::Current,
        NodeClass::OnResultPath,
    ];
}

/// Snapshot taken after one algorithmic step.
///
/// `classes[i]` and `costs[i]` describe node `NodeId(i)`, so every node carries exactly one
/// classification by construction.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TraversalState {
    /// 1-based step number; 0 for states not produced by an expansion.
    pub step: usize,
    /// One class per node, indexed by node id.
    pub classes: Vec<NodeClass>,
    /// Best known cost per node (hops, depth or distance depending on the algorithm).
    pub costs: Vec<Option<f64>>,
}

impl TraversalState {
    /// Class of `id`, `Unvisited` for ids outside the state.
    pub fn class_of(&self, id: NodeId) -> NodeClass {
        self.classes.get(id.index()).copied().unwrap_or_default()
    }

    /// Cost recorded for `id`.
    pub fn cost_of(&self, id: NodeId) -> Option<f64> {
        self.costs.get(id.index()).copied().flatten()
    }

    /// The node marked `Current`, if any.
    pub fn current(&self) -> Option<NodeId> {
        self.classes
            .iter()
            .position(|c| *c == NodeClass::Current)
            .map(|i| NodeId(i as u32))
    }

    /// Ids of all nodes with class `class`, ascending.
    pub fn nodes_with(&self, class: NodeClass) -> Vec<NodeId> {
        self.classes
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == class)
            .map(|(i, _)| NodeId(i as u32))
            .collect()
    }

    /// Whether this state classifies exactly `node_count` nodes with at most one `Current`.
    pub fn is_partition_of(&self, node_count: usize) -> bool {
        self.classes.len() == node_count
            && self.costs.len() == node_count
            && self
                .classes
                .iter()
                .filter(|c| **c == NodeClass::Current)
                .count()
                <= 1
    }
}

#[cfg(test)]
#[path = "../../tests/unit/traversal/state.rs"]
mod tests;
