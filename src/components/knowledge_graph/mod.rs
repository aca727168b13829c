//! Knowledge-graph visualization: source-chain loader, viewport layout and
//! the hover-aware canvas component.

mod component;
mod graphml;
mod layout;
mod loader;
mod render;
mod state;
mod types;

pub use component::KnowledgeGraphCanvas;
pub use loader::{CancelToken, GraphLoadError, GraphSource};
pub use types::{Graph, GraphEdge, GraphMeta, GraphNode, GraphStatus};
