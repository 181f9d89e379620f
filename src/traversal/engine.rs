use std::{
    cmp::{Ordering, Reverse},
    collections::{BinaryHeap, VecDeque},
};

use crate::{
    foundation::core::NodeId,
    foundation::error::{ReelError, ReelResult},
    graph::model::Graph,
    traversal::state::{NodeClass, TraversalState},
};

/// The closed set of search algorithms the engine can run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Breadth-first search (FIFO frontier).
    #[default]
    Bfs,
    /// Depth-first search (LIFO frontier).
    Dfs,
    /// Uniform-cost search / Dijkstra (cheapest cumulative weight first).
    #[serde(alias = "dijkstra")]
    UniformCost,
}

/// Run limits for a [`Traversal`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TraversalOptions {
    /// Fail with [`ReelError::StepLimitExceeded`] instead of expanding more than this many nodes.
    #[serde(default)]
    pub max_steps: Option<usize>,
    /// Fail with [`ReelError::UnreachableGoal`] when the search exhausts without reaching the goal.
    #[serde(default)]
    pub require_goal: bool,
}

/// Terminal result of a traversal.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TraversalOutcome {
    /// Whether the goal was expanded.
    pub found: bool,
    /// Start-to-goal node sequence; empty unless `found`.
    pub path: Vec<NodeId>,
    /// Number of expansions (emitted states).
    pub steps: usize,
}

/// One pull from [`Traversal::step`].
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// State after exactly one node expansion.
    State(TraversalState),
    /// The search is over.
    Done(TraversalOutcome),
}

#[derive(Clone, Copy, Debug)]
struct CostEntry {
    cost: f64,
    node: NodeId,
}

impl PartialEq for CostEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CostEntry {}

impl PartialOrd for CostEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CostEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.node.cmp(&other.node))
    }
}

enum Pending {
    Queue(VecDeque<NodeId>),
    Stack(Vec<NodeId>),
    Heap(BinaryHeap<Reverse<CostEntry>>),
}

#[derive(Clone, Copy, Debug)]
enum Halt {
    StepLimit(usize),
    Unreachable,
}

/// Step-wise graph search that exposes its state after every expansion.
///
/// The engine is a lazy, finite sequence: each [`Traversal::step`] expands exactly one node and
/// returns the resulting [`TraversalState`], until a terminal [`Step::Done`]. It cannot be
/// rewound; build a new one to replay.
///
/// Ties are broken towards the lower [`NodeId`]: BFS enqueues neighbors in ascending order, DFS
/// stacks them so the lowest pops first, and uniform-cost orders its heap by `(cost, id)`.
pub struct Traversal<'g> {
    graph: &'g Graph,
    algorithm: Algorithm,
    start: NodeId,
    goal: Option<NodeId>,
    options: TraversalOptions,
    classes: Vec<NodeClass>,
    costs: Vec<Option<f64>>,
    parent: Vec<Option<NodeId>>,
    pending: Pending,
    current: Option<NodeId>,
    steps: usize,
    outcome: Option<TraversalOutcome>,
    halt: Option<Halt>,
    drained: bool,
}

impl<'g> Traversal<'g> {
    /// Prepare a search from `start` towards `goal` (or full exploration when `goal` is `None`).
    #[tracing::instrument(skip(graph))]
    pub fn new(
        graph: &'g Graph,
        algorithm: Algorithm,
        start: NodeId,
        goal: Option<NodeId>,
        options: TraversalOptions,
    ) -> ReelResult<Self> {
        if !graph.contains(start) {
            return Err(ReelError::validation(format!(
                "start node {start} is not part of the graph"
            )));
        }
        if let Some(goal) = goal
            && !graph.contains(goal)
        {
            return Err(ReelError::validation(format!(
                "goal node {goal} is not part of the graph"
            )));
        }
        if options.max_steps == Some(0) {
            return Err(ReelError::validation("max_steps must be >= 1 when set"));
        }

        let n = graph.node_count();
        let mut classes = vec![NodeClass::Unvisited; n];
        let mut costs = vec![None; n];
        classes[start.index()] = NodeClass::Frontier;
        costs[start.index()] = Some(0.0);

        let pending = match algorithm {
            Algorithm::Bfs => Pending::Queue(VecDeque::from([start])),
            Algorithm::Dfs => Pending::Stack(vec![start]),
            Algorithm::UniformCost => Pending::Heap(BinaryHeap::from([Reverse(CostEntry {
                cost: 0.0,
                node: start,
            })])),
        };

        Ok(Self {
            graph,
            algorithm,
            start,
            goal,
            options,
            classes,
            costs,
            parent: vec![None; n],
            pending,
            current: None,
            steps: 0,
            outcome: None,
            halt: None,
            drained: false,
        })
    }

    /// Algorithm this traversal runs.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Number of expansions so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Terminal outcome, once [`Step::Done`] has been produced.
    pub fn outcome(&self) -> Option<&TraversalOutcome> {
        self.outcome.as_ref()
    }

    /// Advance by exactly one node expansion.
    ///
    /// After the search ends every further call returns the same [`Step::Done`].
    pub fn step(&mut self) -> ReelResult<Step> {
        if let Some(outcome) = &self.outcome {
            return Ok(Step::Done(outcome.clone()));
        }
        if let Some(halt) = self.halt {
            return Err(self.halt_error(halt));
        }

        if let Some(prev) = self.current.take() {
            self.classes[prev.index()] = NodeClass::Visited;
            if Some(prev) == self.goal {
                return self.finish(true);
            }
        }

        let Some(node) = self.pop_next() else {
            return self.finish(false);
        };

        if let Some(limit) = self.options.max_steps
            && self.steps >= limit
        {
            let halt = Halt::StepLimit(limit);
            self.halt = Some(halt);
            return Err(self.halt_error(halt));
        }

        self.steps += 1;
        self.classes[node.index()] = NodeClass::Current;
        self.current = Some(node);
        if Some(node) != self.goal {
            self.discover_from(node);
        }

        Ok(Step::State(self.snapshot()))
    }

    /// Run to completion, returning every emitted state and the outcome.
    pub fn run_to_end(&mut self) -> ReelResult<(Vec<TraversalState>, TraversalOutcome)> {
        let mut states = Vec::new();
        loop {
            match self.step()? {
                Step::State(s) => states.push(s),
                Step::Done(outcome) => return Ok((states, outcome)),
            }
        }
    }

    /// Final state with the result path marked [`NodeClass::OnResultPath`] and no `Current`.
    ///
    /// `None` until the traversal is done.
    pub fn highlight_state(&self) -> Option<TraversalState> {
        let outcome = self.outcome.as_ref()?;
        let mut classes = self.classes.clone();
        for id in &outcome.path {
            classes[id.index()] = NodeClass::OnResultPath;
        }
        Some(TraversalState {
            step: 0,
            classes,
            costs: self.costs.clone(),
        })
    }

    fn snapshot(&self) -> TraversalState {
        TraversalState {
            step: self.steps,
            classes: self.classes.clone(),
            costs: self.costs.clone(),
        }
    }

    fn pop_next(&mut self) -> Option<NodeId> {
        // Stale entries (nodes expanded since they were queued) are skipped.
        let classes = &self.classes;
        let is_open = |id: NodeId| classes[id.index()] == NodeClass::Frontier;
        match &mut self.pending {
            Pending::Queue(queue) => {
                while let Some(id) = queue.pop_front() {
                    if is_open(id) {
                        return Some(id);
                    }
                }
                None
            }
            Pending::Stack(stack) => {
                while let Some(id) = stack.pop() {
                    if is_open(id) {
                        return Some(id);
                    }
                }
                None
            }
            Pending::Heap(heap) => {
                while let Some(Reverse(entry)) = heap.pop() {
                    if is_open(entry.node) {
                        return Some(entry.node);
                    }
                }
                None
            }
        }
    }

    fn discover_from(&mut self, node: NodeId) {
        let base = self.costs[node.index()].unwrap_or(0.0);
        let graph = self.graph;
        match &mut self.pending {
            Pending::Queue(queue) => {
                for adj in graph.neighbors(node) {
                    let i = adj.node.index();
                    if self.classes[i] == NodeClass::Unvisited {
                        self.classes[i] = NodeClass::Frontier;
                        self.costs[i] = Some(base + 1.0);
                        self.parent[i] = Some(node);
                        queue.push_back(adj.node);
                    }
                }
            }
            Pending::Stack(stack) => {
                for adj in graph.neighbors(node).iter().rev() {
                    let i = adj.node.index();
                    if matches!(
                        self.classes[i],
                        NodeClass::Unvisited | NodeClass::Frontier
                    ) {
                        self.classes[i] = NodeClass::Frontier;
                        self.costs[i] = Some(base + 1.0);
                        self.parent[i] = Some(node);
                        stack.push(adj.node);
                    }
                }
            }
            Pending::Heap(heap) => {
                for adj in graph.neighbors(node) {
                    let i = adj.node.index();
                    if !matches!(
                        self.classes[i],
                        NodeClass::Unvisited | NodeClass::Frontier
                    ) {
                        continue;
                    }
                    let candidate = base + adj.weight;
                    if self.costs[i].is_none_or(|known| candidate < known) {
                        self.classes[i] = NodeClass::Frontier;
                        self.costs[i] = Some(candidate);
                        self.parent[i] = Some(node);
                        heap.push(Reverse(CostEntry {
                            cost: candidate,
                            node: adj.node,
                        }));
                    }
                }
            }
        }
    }

    fn finish(&mut self, found: bool) -> ReelResult<Step> {
        if !found
            && self.options.require_goal
            && let Some(goal) = self.goal
        {
            self.halt = Some(Halt::Unreachable);
            tracing::debug!(steps = self.steps, goal = %goal, "goal unreachable");
            return Err(self.halt_error(Halt::Unreachable));
        }

        let path = match (found, self.goal) {
            (true, Some(goal)) => self.reconstruct_path(goal),
            _ => Vec::new(),
        };
        let outcome = TraversalOutcome {
            found,
            path,
            steps: self.steps,
        };
        tracing::debug!(
            algorithm = ?self.algorithm,
            steps = outcome.steps,
            found,
            "traversal done"
        );
        self.outcome = Some(outcome.clone());
        Ok(Step::Done(outcome))
    }

    fn reconstruct_path(&self, goal: NodeId) -> Vec<NodeId> {
        let mut path = vec![goal];
        let mut at = goal;
        while at != self.start {
            match self.parent[at.index()] {
                Some(p) => {
                    path.push(p);
                    at = p;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }

    fn halt_error(&self, halt: Halt) -> ReelError {
        match halt {
            Halt::StepLimit(limit) => ReelError::StepLimitExceeded { limit },
            Halt::Unreachable => ReelError::unreachable(format!(
                "'{}' cannot be reached from '{}' ({} nodes explored)",
                self.goal.map(|g| self.graph.name(g)).unwrap_or(""),
                self.graph.name(self.start),
                self.steps
            )),
        }
    }
}

impl Iterator for Traversal<'_> {
    type Item = ReelResult<TraversalState>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.drained {
            return None;
        }
        match self.step() {
            Ok(Step::State(state)) => Some(Ok(state)),
            Ok(Step::Done(_)) => {
                self.drained = true;
                None
            }
            Err(e) => {
                self.drained = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/traversal/engine.rs"]
mod tests;
