//! Dependency-graph exploration: directional loading, selection, inspector.

pub mod inspector;
pub mod interaction;
pub mod loader;
pub mod resize;

pub use inspector::{EdgeDetails, InspectorContent, NodeDetails};
pub use interaction::{GraphInteractionController, Selection};
pub use loader::{GraphDataLoader, GraphViewState, SamplingNotice};
pub use resize::SidebarResizer;
