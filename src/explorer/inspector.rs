//! Details-panel content for the selected graph element.

use crate::graph::edge::{EdgeType, GraphEdge};
use crate::graph::node::GraphNode;

pub const DOCS_FIND_URL: &str = "https://leanprover-community.github.io/mathlib4_docs/find/";

/// Fill color for a node of `category`.
pub fn category_color(category: &str) -> &'static str {
    match category {
        "Theorem" => "#1e40af",
        "Definition" => "#059669",
        "Structure" => "#7c3aed",
        "Inductive" => "#dc2626",
        _ => "#6b7280",
    }
}

/// Stroke color for an edge; type dependencies are drawn lightest.
pub fn edge_color(edge_type: &EdgeType) -> &'static str {
    match edge_type {
        EdgeType::TypeDeps => "#d1d5db",
        EdgeType::BodyDeps => "#9ca3af",
        EdgeType::Other(_) => "#6b7280",
    }
}

/// Percent-encode a URI component, leaving `!'()*` literal as browsers'
/// `encodeURIComponent` does, so primed names like `Nat.succ_le'` keep their quote.
pub fn encode_component(text: &str) -> String {
    urlencoding::encode(text)
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}

/// In-app link to the graph page of `name`.
pub fn graph_link(name: &str) -> String {
    format!("/graph/{}", encode_component(name))
}

/// Mathlib documentation search for `name`.
pub fn docs_link(name: &str) -> String {
    format!("{DOCS_FIND_URL}?pattern={}#doc", encode_component(name))
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NodeDetails {
    pub name: String,
    pub category: String,
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub const_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub informal_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub informal_statement: Option<String>,
    pub graph_link: String,
    pub docs_link: String,
}

impl From<&GraphNode> for NodeDetails {
    fn from(node: &GraphNode) -> Self {
        Self {
            name: node.name.clone(),
            category: node.category_label().to_owned(),
            color: category_color(&node.const_category),
            const_type: node.const_type.clone(),
            module: node.module.clone(),
            doc_string: node.doc_string.clone(),
            informal_name: node.informal_name.clone(),
            informal_statement: node.informal_statement.clone(),
            graph_link: graph_link(&node.name),
            docs_link: docs_link(&node.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct EdgeDetails {
    pub id: String,
    pub source: String,
    pub target: String,
    pub relationship: String,
    pub color: &'static str,
}

impl From<&GraphEdge> for EdgeDetails {
    fn from(edge: &GraphEdge) -> Self {
        Self {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            relationship: edge.edge_type.to_string(),
            color: edge_color(&edge.edge_type),
        }
    }
}

/// What the inspector panel shows.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InspectorContent {
    Node(NodeDetails),
    Edge(EdgeDetails),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_are_percent_encoded() {
        assert_eq!(graph_link("Nat.Prime"), "/graph/Nat.Prime");
        assert_eq!(graph_link("a b/c"), "/graph/a%20b%2Fc");
        assert_eq!(
            docs_link("Nat.Prime"),
            "https://leanprover-community.github.io/mathlib4_docs/find/?pattern=Nat.Prime#doc"
        );
    }

    #[test]
    fn test_links_keep_component_safe_punctuation() {
        assert_eq!(graph_link("Nat.succ_le'"), "/graph/Nat.succ_le'");
        assert_eq!(encode_component("f (x)!*"), "f%20(x)!*");
        assert_eq!(
            docs_link("Nat.succ_le'"),
            "https://leanprover-community.github.io/mathlib4_docs/find/?pattern=Nat.succ_le'#doc"
        );
    }

    #[test]
    fn test_unknown_category_uses_default_color() {
        assert_eq!(category_color("Theorem"), "#1e40af");
        assert_eq!(category_color("Axiom"), "#6b7280");
        assert_eq!(category_color(""), "#6b7280");
    }

    #[test]
    fn test_node_details_copy_metadata() {
        let node = GraphNode::new("Nat.Prime", "Definition")
            .with_module("Mathlib.Data.Nat.Prime.Defs")
            .with_doc_string("A prime number.");
        let details = NodeDetails::from(&node);
        assert_eq!(details.color, "#059669");
        assert_eq!(details.category, "Definition");
        assert_eq!(details.module.as_deref(), Some("Mathlib.Data.Nat.Prime.Defs"));
        assert_eq!(details.graph_link, "/graph/Nat.Prime");
    }

    #[test]
    fn test_edge_details_name_relationship() {
        let edge = GraphEdge::new("Nat.Prime", "Nat", EdgeType::TypeDeps);
        let details = EdgeDetails::from(&edge);
        assert_eq!(details.relationship, "typeDeps");
        assert_eq!(details.color, "#d1d5db");
        assert_eq!(details.id, "type_Nat.Prime->Nat");
    }

    #[test]
    fn test_content_serializes_with_kind_tag() {
        let edge = GraphEdge::new("A", "B", EdgeType::BodyDeps);
        let json = serde_json::to_value(InspectorContent::Edge(EdgeDetails::from(&edge))).unwrap();
        assert_eq!(json["kind"], "edge");
        assert_eq!(json["relationship"], "bodyDeps");
    }
}
