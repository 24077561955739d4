use std::fmt;

/// The relationship a dependency edge records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "RawEdgeType", into = "String")]
pub enum EdgeType {
    /// The source's type mentions the target.
    TypeDeps,
    /// The source's body (proof or definition) mentions the target.
    BodyDeps,
    /// Any relationship tag the client does not know about.
    Other(String),
}

impl EdgeType {
    pub fn as_str(&self) -> &str {
        match self {
            EdgeType::TypeDeps => "typeDeps",
            EdgeType::BodyDeps => "bodyDeps",
            EdgeType::Other(tag) => tag,
        }
    }

    /// Prefix used when building edge ids (`type_A->B`, `body_A->B`).
    pub fn id_prefix(&self) -> &str {
        match self {
            EdgeType::TypeDeps => "type",
            EdgeType::BodyDeps => "body",
            EdgeType::Other(tag) => tag,
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EdgeType {
    fn from(tag: &str) -> Self {
        match tag {
            "typeDeps" | "type" | "type_deps" => EdgeType::TypeDeps,
            "bodyDeps" | "body" | "body_deps" => EdgeType::BodyDeps,
            other => EdgeType::Other(other.to_owned()),
        }
    }
}

impl From<EdgeType> for String {
    fn from(edge_type: EdgeType) -> Self {
        edge_type.as_str().to_owned()
    }
}

/// Wire shapes accepted for an edge type: a tag string, or the legacy numeric
/// weight (0 = type dependency, anything else = body dependency).
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RawEdgeType {
    Tag(String),
    Weight(u64),
}

impl From<RawEdgeType> for EdgeType {
    fn from(raw: RawEdgeType) -> Self {
        match raw {
            RawEdgeType::Tag(tag) => EdgeType::from(tag.as_str()),
            RawEdgeType::Weight(0) => EdgeType::TypeDeps,
            RawEdgeType::Weight(_) => EdgeType::BodyDeps,
        }
    }
}

/// A directed dependency edge between two nodes, identified by `id`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(alias = "edgeType", alias = "weight")]
    pub edge_type: EdgeType,
}

impl GraphEdge {
    /// Build an edge whose id follows the `<kind>_<source>-><target>` scheme.
    pub fn new(source: impl Into<String>, target: impl Into<String>, edge_type: EdgeType) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("{}_{}->{}", edge_type.id_prefix(), source, target),
            source,
            target,
            edge_type,
        }
    }
}
