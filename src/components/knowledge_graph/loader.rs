//! Ordered source chain for the knowledge graph: a structured JSON document
//! first, the verbose GraphML interchange document second. Both failing is
//! reported to the caller, which substitutes the built-in static graph.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::net::FetchError;

use super::graphml;
use super::types::{Graph, GraphEdge, GraphNode};

pub const PRIMARY_GRAPH_URL: &str = "/kg.json";
pub const SECONDARY_GRAPH_URL: &str = "/kg.graphml";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GraphLoadError {
	/// Network failure or non-success status; recovered by falling through
	/// to the next source.
	#[error("source unavailable: {0}")]
	SourceUnavailable(String),
	/// The document was fetched but cannot be decoded; treated exactly like
	/// an unavailable source.
	#[error("malformed document: {0}")]
	MalformedDocument(String),
	/// Every source failed. Carries the last failure's description for the
	/// inline status message.
	#[error("{0}")]
	AllSourcesExhausted(String),
}

impl From<FetchError> for GraphLoadError {
	fn from(err: FetchError) -> Self {
		GraphLoadError::SourceUnavailable(err.to_string())
	}
}

/// Which source a successfully loaded graph came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphSource {
	Primary,
	Secondary,
}

/// Cooperative cancellation: tripped when the requesting component is torn
/// down, checked before results are applied. In-flight fetches are not
/// aborted, their results are simply discarded.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn cancel(&self) {
		self.0.store(true, Ordering::Relaxed);
	}

	pub fn is_cancelled(&self) -> bool {
		self.0.load(Ordering::Relaxed)
	}

	/// Passes a completed result through, or discards it when the token has
	/// tripped. Every commit of an async result goes through here.
	pub fn admit<T>(&self, result: T) -> Option<T> {
		(!self.is_cancelled()).then_some(result)
	}
}

#[derive(Debug, Deserialize)]
struct JsonGraphDoc {
	#[serde(default)]
	nodes: Vec<JsonNode>,
	#[serde(default)]
	edges: Vec<JsonEdge>,
}

#[derive(Debug, Deserialize)]
struct JsonNode {
	id: String,
	label: Option<String>,
	x: Option<f64>,
	y: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct JsonEdge {
	id: Option<String>,
	source: String,
	target: String,
}

/// Decodes the structured fast-path document into a [`Graph`], defaulting
/// labels to ids and dropping non-finite coordinates at the boundary.
pub fn decode_json(text: &str) -> Result<Graph, GraphLoadError> {
	let doc: JsonGraphDoc = serde_json::from_str(text)
		.map_err(|err| GraphLoadError::MalformedDocument(err.to_string()))?;
	if doc.nodes.is_empty() {
		return Err(GraphLoadError::MalformedDocument(
			"document contains no nodes".into(),
		));
	}

	let nodes = doc
		.nodes
		.into_iter()
		.map(|node| {
			let JsonNode { id, label, x, y } = node;
			let pos = x.zip(y).filter(|(x, y)| x.is_finite() && y.is_finite());
			GraphNode {
				label: label
					.filter(|l| !l.trim().is_empty())
					.unwrap_or_else(|| id.clone()),
				id,
				pos,
				degree: 0,
			}
		})
		.collect();
	let edges = doc
		.edges
		.into_iter()
		.enumerate()
		.map(|(i, edge)| GraphEdge {
			id: edge.id.unwrap_or_else(|| format!("e{i}")),
			source: edge.source,
			target: edge.target,
		})
		.collect();

	Ok(Graph::from_parts(nodes, edges))
}

/// Runs the source chain in strict sequence. The secondary source is only
/// attempted after the primary has definitively failed. Generic over the
/// fetch strategy so ordering and outcomes are unit-testable off the wasm
/// target.
pub async fn load_graph(
	fetch: impl AsyncFn(&str) -> Result<String, FetchError>,
) -> Result<(Graph, GraphSource), GraphLoadError> {
	match fetch(PRIMARY_GRAPH_URL)
		.await
		.map_err(GraphLoadError::from)
		.and_then(|text| decode_json(&text))
	{
		Ok(graph) => {
			info!(
				"knowledge graph loaded from {PRIMARY_GRAPH_URL}: {} nodes, {} edges",
				graph.meta.node_count, graph.meta.edge_count
			);
			return Ok((graph, GraphSource::Primary));
		}
		Err(err) => warn!("primary graph source failed: {err}"),
	}

	match fetch(SECONDARY_GRAPH_URL)
		.await
		.map_err(GraphLoadError::from)
		.and_then(|text| graphml::parse_graphml(&text))
	{
		Ok(graph) => {
			info!(
				"knowledge graph loaded from {SECONDARY_GRAPH_URL}: {} nodes, {} edges",
				graph.meta.node_count, graph.meta.edge_count
			);
			Ok((graph, GraphSource::Secondary))
		}
		Err(err) => {
			warn!("secondary graph source failed: {err}");
			Err(GraphLoadError::AllSourcesExhausted(err.to_string()))
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use super::*;

	const JSON_DOC: &str = r#"{
		"nodes": [
			{"id": "a", "label": "Alpha", "x": 1.0, "y": 2.0},
			{"id": "b"}
		],
		"edges": [{"id": "e1", "source": "a", "target": "b"}]
	}"#;

	const GRAPHML_DOC: &str = r#"<graphml><graph>
		<node id="a"/><node id="b"/><node id="c"/>
		<edge source="a" target="b"/><edge source="b" target="c"/>
	</graph></graphml>"#;

	#[test]
	fn json_labels_default_to_id_and_positions_require_both_axes() {
		let g = decode_json(r#"{"nodes":[{"id":"a","x":3.0}],"edges":[]}"#).unwrap();
		assert_eq!(g.nodes[0].label, "a");
		assert_eq!(g.nodes[0].pos, None);
	}

	#[test]
	fn json_without_nodes_is_malformed() {
		let err = decode_json(r#"{"nodes":[],"edges":[]}"#).unwrap_err();
		assert!(matches!(err, GraphLoadError::MalformedDocument(_)));
	}

	#[test]
	fn primary_success_short_circuits() {
		let calls = RefCell::new(Vec::new());
		let fetch = async |url: &str| {
			calls.borrow_mut().push(url.to_string());
			Ok(JSON_DOC.to_string())
		};

		let (graph, source) = pollster::block_on(load_graph(fetch)).unwrap();
		assert_eq!(source, GraphSource::Primary);
		assert_eq!(graph.meta.node_count, 2);
		assert_eq!(graph.meta.edge_count, 1);
		assert_eq!(*calls.borrow(), vec![PRIMARY_GRAPH_URL.to_string()]);
	}

	#[test]
	fn primary_404_falls_through_to_secondary() {
		let calls = RefCell::new(Vec::new());
		let fetch = async |url: &str| {
			calls.borrow_mut().push(url.to_string());
			if url == PRIMARY_GRAPH_URL {
				Err(FetchError::new(format!("{url}: status 404")))
			} else {
				Ok(GRAPHML_DOC.to_string())
			}
		};

		let (graph, source) = pollster::block_on(load_graph(fetch)).unwrap();
		assert_eq!(source, GraphSource::Secondary);
		assert_eq!(graph.meta.node_count, 3);
		assert_eq!(graph.meta.edge_count, 2);
		assert_eq!(
			*calls.borrow(),
			vec![
				PRIMARY_GRAPH_URL.to_string(),
				SECONDARY_GRAPH_URL.to_string()
			]
		);
	}

	#[test]
	fn undecodable_primary_falls_through_to_secondary() {
		let fetch = async |url: &str| {
			if url == PRIMARY_GRAPH_URL {
				Ok("<html>not json</html>".to_string())
			} else {
				Ok(GRAPHML_DOC.to_string())
			}
		};

		let (_, source) = pollster::block_on(load_graph(fetch)).unwrap();
		assert_eq!(source, GraphSource::Secondary);
	}

	#[test]
	fn both_sources_failing_is_exhausted_with_a_message() {
		let fetch = async |url: &str| Err(FetchError::new(format!("{url}: connection refused")));

		let err = pollster::block_on(load_graph(fetch)).unwrap_err();
		match err {
			GraphLoadError::AllSourcesExhausted(message) => {
				assert!(!message.is_empty());
				assert!(message.contains("kg.graphml"));
			}
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[test]
	fn cancel_token_trips_once_and_stays_tripped() {
		let token = CancelToken::new();
		let observer = token.clone();
		assert!(!observer.is_cancelled());
		token.cancel();
		assert!(observer.is_cancelled());
	}

	#[test]
	fn tripped_token_discards_a_completed_load() {
		let token = CancelToken::new();
		let fetch = {
			let token = token.clone();
			// Teardown races the in-flight request: the fetch completes, but
			// the token has already tripped by the time the result is back.
			async move |_: &str| {
				token.cancel();
				Ok(JSON_DOC.to_string())
			}
		};

		let result = pollster::block_on(load_graph(fetch));
		assert!(result.is_ok());
		assert!(token.admit(result).is_none());
	}

	#[test]
	fn untripped_token_admits_the_result() {
		let token = CancelToken::new();
		assert_eq!(token.admit(42), Some(42));
	}
}
