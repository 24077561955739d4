use std::sync::Arc;

use parking_lot::Mutex;

use super::inspector::{EdgeDetails, InspectorContent, NodeDetails};
use super::loader::GraphDataLoader;
use super::resize::SidebarResizer;
use crate::events::EventHub;
use crate::graph::GraphPayload;

/// The single inspector target. Node and edge selection exclude each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Selection {
    #[default]
    None,
    Node(String),
    Edge(String),
}

impl Selection {
    fn present_in(&self, payload: &GraphPayload) -> bool {
        match self {
            Selection::None => true,
            Selection::Node(name) => payload.node(name).is_some(),
            Selection::Edge(id) => payload.edge(id).is_some(),
        }
    }
}

struct Tracked {
    selection: Selection,
    /// Loader revision the selection was last checked against.
    revision: u64,
}

/// Selection and inspector sizing over whatever the loader currently shows.
pub struct GraphInteractionController {
    loader: Arc<GraphDataLoader>,
    tracked: Mutex<Tracked>,
    resizer: SidebarResizer,
}

impl GraphInteractionController {
    pub fn new(loader: Arc<GraphDataLoader>, hub: EventHub, initial_width: u32, window_width: u32) -> Self {
        let revision = loader.revision();
        Self {
            loader,
            tracked: Mutex::new(Tracked {
                selection: Selection::None,
                revision,
            }),
            resizer: SidebarResizer::new(hub, initial_width, window_width),
        }
    }

    pub fn loader(&self) -> &Arc<GraphDataLoader> {
        &self.loader
    }

    pub fn resizer(&self) -> &SidebarResizer {
        &self.resizer
    }

    pub fn select_node(&self, name: impl Into<String>) {
        self.replace(Selection::Node(name.into()));
    }

    pub fn select_edge(&self, id: impl Into<String>) {
        self.replace(Selection::Edge(id.into()));
    }

    /// Click on empty canvas.
    pub fn clear_selection(&self) {
        self.replace(Selection::None);
    }

    /// The current selection. A selection whose target vanished from a
    /// newer graph is cleared first.
    pub fn selection(&self) -> Selection {
        let revision = self.loader.revision();
        let mut tracked = self.tracked.lock();
        if tracked.revision != revision {
            tracked.revision = revision;
            if !tracked.selection.present_in(&self.loader.payload()) {
                tracing::debug!(selection = ?tracked.selection, "selection dropped after reload");
                tracked.selection = Selection::None;
            }
        }
        tracked.selection.clone()
    }

    /// Panel content for the current selection, if it resolves.
    pub fn inspector(&self) -> Option<InspectorContent> {
        let selection = self.selection();
        let payload = self.loader.payload();
        match selection {
            Selection::None => None,
            Selection::Node(name) => payload
                .node(&name)
                .map(|node| InspectorContent::Node(NodeDetails::from(node))),
            Selection::Edge(id) => payload
                .edge(&id)
                .map(|edge| InspectorContent::Edge(EdgeDetails::from(edge))),
        }
    }

    fn replace(&self, selection: Selection) {
        let revision = self.loader.revision();
        *self.tracked.lock() = Tracked { selection, revision };
    }
}

impl std::fmt::Debug for GraphInteractionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphInteractionController")
            .field("selection", &self.tracked.lock().selection)
            .field("resizer", &self.resizer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::graph::edge::{EdgeType, GraphEdge};
    use crate::graph::node::GraphNode;
    use crate::graph::ViewMode;
    use crate::provider::GraphProvider;
    use async_trait::async_trait;

    /// Dependency view: Nat.Prime -> Nat. Dependent view: Even -> Nat.Prime.
    struct TwoViews;

    #[async_trait]
    impl GraphProvider for TwoViews {
        async fn fetch_graph(&self, focal: &str, direction: ViewMode) -> Result<GraphPayload> {
            let (other, edge) = match direction {
                ViewMode::Dependency => ("Nat", GraphEdge::new(focal, "Nat", EdgeType::BodyDeps)),
                ViewMode::Dependent => ("Even", GraphEdge::new("Even", focal, EdgeType::TypeDeps)),
            };
            Ok(GraphPayload {
                nodes: vec![GraphNode::new(other, "Inductive"), GraphNode::new(focal, "Definition")],
                edges: vec![edge],
                sampling_info: None,
            })
        }
    }

    async fn mounted() -> GraphInteractionController {
        let loader = Arc::new(GraphDataLoader::new(Arc::new(TwoViews)));
        loader.mount("Nat.Prime").await.unwrap();
        GraphInteractionController::new(loader, EventHub::new(), 400, 1200)
    }

    #[tokio::test]
    async fn test_selection_is_exclusive() {
        let ctl = mounted().await;
        ctl.select_edge("e7");
        assert_eq!(ctl.selection(), Selection::Edge("e7".into()));

        ctl.select_node("Nat.Prime");
        assert_eq!(ctl.selection(), Selection::Node("Nat.Prime".into()));

        ctl.clear_selection();
        assert_eq!(ctl.selection(), Selection::None);
    }

    #[tokio::test]
    async fn test_inspector_resolves_node_and_edge() {
        let ctl = mounted().await;
        assert!(ctl.inspector().is_none());

        ctl.select_node("Nat");
        match ctl.inspector() {
            Some(InspectorContent::Node(details)) => {
                assert_eq!(details.name, "Nat");
                assert_eq!(details.color, "#dc2626");
            }
            other => panic!("expected node details, got {other:?}"),
        }

        ctl.select_edge("body_Nat.Prime->Nat");
        match ctl.inspector() {
            Some(InspectorContent::Edge(details)) => {
                assert_eq!(details.source, "Nat.Prime");
                assert_eq!(details.relationship, "bodyDeps");
            }
            other => panic!("expected edge details, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reload_drops_missing_selection_and_keeps_present_one() {
        let ctl = mounted().await;
        ctl.select_node("Nat");
        ctl.loader().toggle_view().await.unwrap();
        assert_eq!(ctl.selection(), Selection::None);

        ctl.select_node("Nat.Prime");
        ctl.loader().toggle_view().await.unwrap();
        assert_eq!(ctl.selection(), Selection::Node("Nat.Prime".into()));
    }

    #[tokio::test]
    async fn test_resizer_uses_initial_width() {
        let ctl = mounted().await;
        assert_eq!(ctl.resizer().width(), 400);
        assert!(!ctl.resizer().is_dragging());
    }

    #[test]
    fn test_selection_serializes_tagged() {
        let json = serde_json::to_value(Selection::Node("Nat.Prime".into())).unwrap();
        assert_eq!(json["kind"], "node");
        assert_eq!(json["id"], "Nat.Prime");
        let none = serde_json::to_value(Selection::None).unwrap();
        assert_eq!(none["kind"], "none");
    }
}
