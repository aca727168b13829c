use std::collections::HashMap;

use super::layout::{self, Viewport};
use super::types::{Graph, GraphMeta};

pub const MIN_NODE_RADIUS: f64 = 4.0;
pub const MAX_NODE_RADIUS: f64 = 14.0;
/// Extra pointer slack around a node circle for hit-testing.
pub const HIT_SLACK: f64 = 4.0;

/// Degree-based circle radius, square-root damped so hubs stay readable.
pub fn node_radius(degree: usize) -> f64 {
	(MIN_NODE_RADIUS + (degree as f64).sqrt()).clamp(MIN_NODE_RADIUS, MAX_NODE_RADIUS)
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
	pub id: String,
	pub label: String,
	pub degree: usize,
	pub x: f64,
	pub y: f64,
	pub radius: f64,
}

/// An edge resolved to indices into the scene node list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneEdge {
	pub source: usize,
	pub target: usize,
}

/// The drawable model: laid-out nodes, resolved edges and the hover state.
///
/// Owns an immutable [`Graph`] and recomputes positions whenever the
/// viewport changes; hover transitions touch only the `hover` field.
pub struct GraphScene {
	graph: Graph,
	pub nodes: Vec<SceneNode>,
	pub edges: Vec<SceneEdge>,
	viewport: Viewport,
	hover: Option<usize>,
}

impl GraphScene {
	pub fn new(graph: Graph, viewport: Viewport) -> Self {
		let mut scene = Self {
			graph,
			nodes: Vec::new(),
			edges: Vec::new(),
			viewport,
			hover: None,
		};
		scene.rebuild();
		scene
	}

	fn rebuild(&mut self) {
		let positions = layout::layout_positions(&self.graph.nodes, self.viewport);
		self.nodes = self
			.graph
			.nodes
			.iter()
			.zip(&positions)
			.map(|(node, &(x, y))| SceneNode {
				id: node.id.clone(),
				label: node.label.clone(),
				degree: node.degree,
				x,
				y,
				radius: node_radius(node.degree),
			})
			.collect();

		let index: HashMap<&str, usize> = self
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| (node.id.as_str(), i))
			.collect();
		// Edges with an unresolved endpoint are dropped here, silently.
		self.edges = self
			.graph
			.edges
			.iter()
			.filter_map(|edge| {
				Some(SceneEdge {
					source: *index.get(edge.source.as_str())?,
					target: *index.get(edge.target.as_str())?,
				})
			})
			.collect();

		if self.hover.is_some_and(|idx| idx >= self.nodes.len()) {
			self.hover = None;
		}
	}

	/// Recomputes the layout for a new viewport. Node order is stable, so
	/// the hover selection survives a resize.
	pub fn resize(&mut self, viewport: Viewport) {
		if viewport == self.viewport {
			return;
		}
		self.viewport = viewport;
		self.rebuild();
	}

	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	pub fn meta(&self) -> GraphMeta {
		self.graph.meta
	}

	/// Topmost node whose circle (plus slack) contains the point.
	pub fn node_at_position(&self, x: f64, y: f64) -> Option<usize> {
		self.nodes.iter().enumerate().rev().find_map(|(i, node)| {
			let (dx, dy) = (node.x - x, node.y - y);
			((dx * dx + dy * dy).sqrt() <= node.radius + HIT_SLACK).then_some(i)
		})
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		self.hover = node;
	}

	pub fn hover(&self) -> Option<usize> {
		self.hover
	}

	/// Identifier of the single active (hovered) node, if any.
	pub fn active_id(&self) -> Option<&str> {
		self.hover.map(|idx| self.nodes[idx].id.as_str())
	}

	pub fn is_active(&self, idx: usize) -> bool {
		self.hover == Some(idx)
	}

	pub fn edge_touches_active(&self, edge: SceneEdge) -> bool {
		self.hover
			.is_some_and(|idx| edge.source == idx || edge.target == idx)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::knowledge_graph::types::{GraphEdge, GraphNode, fallback_graph};

	const VIEW: Viewport = Viewport {
		width: 400.0,
		height: 300.0,
	};

	fn graph_with_dangling_edge() -> Graph {
		let nodes = vec![
			GraphNode {
				id: "a".into(),
				label: "A".into(),
				pos: None,
				degree: 0,
			},
			GraphNode {
				id: "b".into(),
				label: "B".into(),
				pos: None,
				degree: 0,
			},
		];
		let edges = vec![
			GraphEdge {
				id: "e1".into(),
				source: "a".into(),
				target: "b".into(),
			},
			GraphEdge {
				id: "e2".into(),
				source: "a".into(),
				target: "missing".into(),
			},
		];
		Graph::from_parts(nodes, edges)
	}

	#[test]
	fn radius_is_bounded_and_monotonic() {
		assert_eq!(node_radius(0), 4.0);
		assert_eq!(node_radius(4), 6.0);
		assert_eq!(node_radius(100), 14.0);

		let mut previous = 0.0;
		for degree in 0..200 {
			let r = node_radius(degree);
			assert!(r >= previous);
			assert!((MIN_NODE_RADIUS..=MAX_NODE_RADIUS).contains(&r));
			previous = r;
		}
	}

	#[test]
	fn unresolved_edges_are_excluded_from_the_scene() {
		let scene = GraphScene::new(graph_with_dangling_edge(), VIEW);
		assert_eq!(scene.edges.len(), 1);
		assert!(scene.edges.len() <= scene.meta().edge_count);
		for edge in &scene.edges {
			assert!(edge.source < scene.nodes.len());
			assert!(edge.target < scene.nodes.len());
		}
	}

	#[test]
	fn hover_is_exclusive_and_clearable() {
		let mut scene = GraphScene::new(graph_with_dangling_edge(), VIEW);

		scene.set_hover(Some(0));
		assert_eq!(scene.active_id(), Some("a"));
		assert!(scene.is_active(0));
		assert!(!scene.is_active(1));

		scene.set_hover(Some(1));
		assert_eq!(scene.active_id(), Some("b"));
		assert!(!scene.is_active(0));

		scene.set_hover(None);
		assert_eq!(scene.active_id(), None);
	}

	#[test]
	fn incident_edges_follow_the_active_node() {
		let mut scene = GraphScene::new(graph_with_dangling_edge(), VIEW);
		let edge = scene.edges[0];

		assert!(!scene.edge_touches_active(edge));
		scene.set_hover(Some(0));
		assert!(scene.edge_touches_active(edge));
		scene.set_hover(Some(1));
		assert!(scene.edge_touches_active(edge));
		scene.set_hover(None);
		assert!(!scene.edge_touches_active(edge));
	}

	#[test]
	fn hit_test_finds_the_node_under_the_pointer() {
		let scene = GraphScene::new(fallback_graph(), VIEW);
		let target = &scene.nodes[2];
		assert_eq!(
			scene.node_at_position(target.x + 1.0, target.y - 1.0),
			Some(2)
		);
		assert_eq!(scene.node_at_position(-100.0, -100.0), None);
	}

	#[test]
	fn resize_recomputes_positions_and_keeps_hover() {
		let mut scene = GraphScene::new(fallback_graph(), VIEW);
		scene.set_hover(Some(1));
		let before: Vec<(f64, f64)> = scene.nodes.iter().map(|n| (n.x, n.y)).collect();

		scene.resize(Viewport {
			width: 800.0,
			height: 600.0,
		});
		let after: Vec<(f64, f64)> = scene.nodes.iter().map(|n| (n.x, n.y)).collect();

		assert_ne!(before, after);
		assert_eq!(scene.active_id(), Some("ana"));
	}
}
