pub mod edge;
pub mod node;

use std::collections::{HashMap, HashSet};
use std::fmt;

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::Directed;

use crate::error::{ExplorerError, Result};
use edge::{EdgeType, GraphEdge};
use node::GraphNode;

/// Which directional relationship around the focal entity is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// What the focal entity depends on (outgoing edges).
    #[default]
    Dependency,
    /// What depends on the focal entity (incoming edges).
    Dependent,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Dependency => ViewMode::Dependent,
            ViewMode::Dependent => ViewMode::Dependency,
        }
    }

    fn direction(self) -> Direction {
        match self {
            ViewMode::Dependency => Direction::Outgoing,
            ViewMode::Dependent => Direction::Incoming,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Dependency => f.write_str("dependency"),
            ViewMode::Dependent => f.write_str("dependent"),
        }
    }
}

/// Present on a payload only when the server truncated an oversized graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SamplingInfo {
    #[serde(alias = "originalCount")]
    pub original_count: usize,
    #[serde(alias = "sampledCount")]
    pub sampled_count: usize,
    #[serde(alias = "wasSampled")]
    pub was_sampled: bool,
}

/// One directional neighborhood as returned by a graph provider.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GraphPayload {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    #[serde(default, alias = "samplingInfo", skip_serializing_if = "Option::is_none")]
    pub sampling_info: Option<SamplingInfo>,
}

impl GraphPayload {
    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// True when the sampling block is present and reports truncation.
    pub fn was_sampled(&self) -> bool {
        self.sampling_info.is_some_and(|s| s.was_sampled)
    }
}

/// The full dependency graph held by the local provider: a directed petgraph
/// StableGraph with an O(1) name index. Edges point from a declaration to the
/// declarations it uses.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    pub graph: StableGraph<GraphNode, EdgeType, Directed>,
    pub name_index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, replacing the metadata of an existing node with the same name.
    pub fn add_node(&mut self, node: GraphNode) -> NodeIndex {
        if let Some(&existing) = self.name_index.get(&node.name) {
            self.graph[existing] = node;
            return existing;
        }
        let name = node.name.clone();
        let idx = self.graph.add_node(node);
        self.name_index.insert(name, idx);
        idx
    }

    /// Add a `source -> target` edge. Endpoints unknown to the graph get a
    /// placeholder node so exports with dangling references still load.
    pub fn add_edge(&mut self, source: &str, target: &str, edge_type: EdgeType) {
        let s = self.ensure_node(source);
        let t = self.ensure_node(target);
        let duplicate = self
            .graph
            .edges(s)
            .any(|e| e.target() == t && *e.weight() == edge_type);
        if !duplicate {
            self.graph.add_edge(s, t, edge_type);
        }
    }

    fn ensure_node(&mut self, name: &str) -> NodeIndex {
        match self.name_index.get(name) {
            Some(&idx) => idx,
            None => self.add_node(GraphNode::new(name, "")),
        }
    }

    pub fn node_count(&self) -> usize {
        self.name_index.len()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    /// All node names in lexicographic order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.name_index.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The one-hop neighborhood of `focal` in the given direction: the focal
    /// node, each neighbor once, and one edge per (neighbor, relationship).
    pub fn neighborhood(&self, focal: &str, mode: ViewMode) -> Result<GraphPayload> {
        let focal_idx = *self
            .name_index
            .get(focal)
            .ok_or_else(|| ExplorerError::NotFound(focal.to_owned()))?;

        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        let mut seen: HashSet<NodeIndex> = HashSet::new();

        for edge_ref in self.graph.edges_directed(focal_idx, mode.direction()) {
            let (source, target) = (edge_ref.source(), edge_ref.target());
            let neighbor = if source == focal_idx { target } else { source };
            edges.push(GraphEdge::new(
                self.graph[source].name.clone(),
                self.graph[target].name.clone(),
                edge_ref.weight().clone(),
            ));
            if neighbor != focal_idx && seen.insert(neighbor) {
                nodes.push(self.graph[neighbor].clone());
            }
        }

        // Sort for deterministic output; the focal node goes last as the backend does.
        nodes.sort_by(|a, b| a.name.cmp(&b.name));
        edges.sort_by(|a, b| a.id.cmp(&b.id));
        nodes.push(self.graph[focal_idx].clone());

        Ok(GraphPayload {
            nodes,
            edges,
            sampling_info: None,
        })
    }
}
