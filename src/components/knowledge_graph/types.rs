use std::collections::HashMap;

/// A single concept in the knowledge graph.
///
/// `pos` carries the source coordinates when the document supplied them;
/// `degree` is derived from the edge list whenever a [`Graph`] is built.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub label: String,
	pub pos: Option<(f64, f64)>,
	pub degree: usize,
}

/// A directed relation between two node identifiers.
///
/// Endpoints are not validated here; edges whose endpoints do not resolve
/// are kept in the graph and dropped when the drawable scene is built.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
	pub id: String,
	pub source: String,
	pub target: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphMeta {
	pub node_count: usize,
	pub edge_count: usize,
}

/// Immutable node/edge value object. Rebuilt wholesale on every load,
/// never mutated in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
	pub meta: GraphMeta,
}

impl Graph {
	/// Assembles a graph and recomputes every node degree as the count of
	/// edges naming that node as source or target.
	pub fn from_parts(mut nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
		let mut degree: HashMap<String, usize> = HashMap::with_capacity(nodes.len());
		for node in &nodes {
			degree.insert(node.id.clone(), 0);
		}
		for edge in &edges {
			if let Some(d) = degree.get_mut(&edge.source) {
				*d += 1;
			}
			if let Some(d) = degree.get_mut(&edge.target) {
				*d += 1;
			}
		}
		for node in &mut nodes {
			node.degree = degree.get(&node.id).copied().unwrap_or(0);
		}

		let meta = GraphMeta {
			node_count: nodes.len(),
			edge_count: edges.len(),
		};
		Self { nodes, edges, meta }
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Current state of the graph view, surfaced as the inline status pill.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum GraphStatus {
	#[default]
	Loading,
	Ready(GraphMeta),
	Fallback { meta: GraphMeta, message: String },
}

/// Built-in graph used when every source fails, so the view never renders
/// empty.
pub fn fallback_graph() -> Graph {
	let nodes = [
		("lupus", "Systemic Lupus Erythematosus", 50.0, 40.0),
		("ana", "Anti-Nuclear Antibodies", 70.0, 20.0),
		("complement", "Complement System", 30.0, 60.0),
		("rash", "Malar Rash", 80.0, 70.0),
		("arthritis", "Polyarthritis", 20.0, 30.0),
	]
	.into_iter()
	.map(|(id, label, x, y)| GraphNode {
		id: id.into(),
		label: label.into(),
		pos: Some((x, y)),
		degree: 0,
	})
	.collect();

	let edges = [
		("e1", "lupus", "ana"),
		("e2", "lupus", "complement"),
		("e3", "ana", "rash"),
		("e4", "complement", "arthritis"),
		("e5", "arthritis", "lupus"),
	]
	.into_iter()
	.map(|(id, source, target)| GraphEdge {
		id: id.into(),
		source: source.into(),
		target: target.into(),
	})
	.collect();

	Graph::from_parts(nodes, edges)
}
