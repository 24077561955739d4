use std::path::Path;

use async_trait::async_trait;
use regex::RegexBuilder;

use super::{GraphProvider, SuggestionProvider};
use crate::error::{ExplorerError, Result};
use crate::graph::edge::GraphEdge;
use crate::graph::node::GraphNode;
use crate::graph::{DependencyGraph, GraphPayload, ViewMode};

/// On-disk shape of a graph export.
#[derive(Debug, Default, serde::Deserialize)]
struct GraphExport {
    #[serde(default)]
    nodes: Vec<GraphNode>,
    #[serde(default)]
    edges: Vec<GraphEdge>,
}

/// Serves suggestions and neighborhoods from an in-memory dependency graph.
#[derive(Debug, Clone, Default)]
pub struct LocalGraph {
    graph: DependencyGraph,
}

impl LocalGraph {
    pub fn new(graph: DependencyGraph) -> Self {
        Self { graph }
    }

    /// Load a `{ "nodes": [...], "edges": [...] }` export.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_json(&bytes)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let export: GraphExport = serde_json::from_slice(bytes)?;
        let mut graph = DependencyGraph::new();
        for node in export.nodes {
            graph.add_node(node);
        }
        for edge in export.edges {
            graph.add_edge(&edge.source, &edge.target, edge.edge_type);
        }
        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "loaded graph export"
        );
        Ok(Self { graph })
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Case-insensitive substring matches in name order, at most `limit`.
    pub fn matching_names(&self, text: &str, limit: usize) -> Result<Vec<String>> {
        let re = RegexBuilder::new(&regex::escape(text.trim()))
            .case_insensitive(true)
            .build()
            .map_err(|e| ExplorerError::Provider(format!("invalid pattern '{}': {}", text, e)))?;

        Ok(self
            .graph
            .names()
            .into_iter()
            .filter(|name| re.is_match(name))
            .take(limit)
            .map(str::to_owned)
            .collect())
    }
}

#[async_trait]
impl SuggestionProvider for LocalGraph {
    async fn suggest(&self, text: &str, limit: usize) -> Result<Vec<String>> {
        self.matching_names(text, limit)
    }
}

#[async_trait]
impl GraphProvider for LocalGraph {
    async fn fetch_graph(&self, focal: &str, direction: ViewMode) -> Result<GraphPayload> {
        self.graph.neighborhood(focal, direction)
    }
}
