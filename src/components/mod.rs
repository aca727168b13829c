//! Feature components for the Evidence Explorer.

pub mod evidence;
pub mod knowledge_graph;
