//! In-process parser for the verbose GraphML fallback document.
//!
//! Understands the subset the dashboard actually encounters: `<key>`
//! declarations mapping key ids to semantic names, keyed `<data>` values per
//! node, and yEd-style nested `<Geometry>`/`<NodeLabel>` elements.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::loader::GraphLoadError;
use super::types::{Graph, GraphEdge, GraphNode};

struct PendingNode {
	id: String,
	label: Option<String>,
	x: Option<f64>,
	y: Option<f64>,
}

/// Where the next text event should land while walking a `<node>` element.
enum TextSink {
	None,
	NodeData(String),
	NodeLabel,
}

fn malformed(detail: impl ToString) -> GraphLoadError {
	GraphLoadError::MalformedDocument(detail.to_string())
}

fn attr_value(element: &BytesStart, name: &[u8]) -> Result<Option<String>, GraphLoadError> {
	for attr in element.attributes() {
		let attr = attr.map_err(malformed)?;
		if attr.key.as_ref() == name {
			return Ok(Some(attr.unescape_value().map_err(malformed)?.into_owned()));
		}
	}
	Ok(None)
}

fn finite_float(text: &str) -> Option<f64> {
	text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_graphml(text: &str) -> Result<Graph, GraphLoadError> {
	let mut reader = Reader::from_str(text);

	// key id -> lower-cased semantic name ("label", "x", ...)
	let mut keys: HashMap<String, String> = HashMap::new();
	let mut nodes: Vec<GraphNode> = Vec::new();
	let mut edges: Vec<GraphEdge> = Vec::new();
	let mut current: Option<PendingNode> = None;
	let mut sink = TextSink::None;

	loop {
		match reader.read_event().map_err(malformed)? {
			Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"key" => {
				let id = attr_value(&e, b"id")?.unwrap_or_default();
				let name = match attr_value(&e, b"attr.name")? {
					Some(name) => Some(name),
					None => attr_value(&e, b"yfiles:type")?,
				};
				if let Some(name) = name {
					keys.insert(id, name.to_lowercase());
				}
			}
			Event::Start(e) if e.local_name().as_ref() == b"node" => {
				let id = attr_value(&e, b"id")?.unwrap_or_else(|| format!("n{}", nodes.len()));
				current = Some(PendingNode {
					id,
					label: None,
					x: None,
					y: None,
				});
			}
			Event::Empty(e) if e.local_name().as_ref() == b"node" => {
				let id = attr_value(&e, b"id")?.unwrap_or_else(|| format!("n{}", nodes.len()));
				nodes.push(GraphNode {
					label: id.clone(),
					id,
					pos: None,
					degree: 0,
				});
			}
			Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Geometry" => {
				if let Some(node) = current.as_mut() {
					if let (Some(x), Some(y)) = (attr_value(&e, b"x")?, attr_value(&e, b"y")?) {
						if let (Some(x), Some(y)) = (finite_float(&x), finite_float(&y)) {
							node.x = Some(x);
							node.y = Some(y);
						}
					}
				}
			}
			Event::Start(e) if e.local_name().as_ref() == b"NodeLabel" && current.is_some() => {
				sink = TextSink::NodeLabel;
			}
			Event::Start(e) if e.local_name().as_ref() == b"data" && current.is_some() => {
				if let Some(key) = attr_value(&e, b"key")? {
					sink = TextSink::NodeData(key);
				}
			}
			Event::Text(t) => {
				let text = t.unescape().map_err(malformed)?;
				let text = text.trim();
				if text.is_empty() {
					continue;
				}
				if let Some(node) = current.as_mut() {
					match &sink {
						TextSink::NodeLabel => node.label = Some(text.to_string()),
						TextSink::NodeData(key) => {
							match keys.get(key).map(String::as_str) {
								Some("label" | "name" | "title") => {
									node.label = Some(text.to_string());
								}
								Some("x") => {
									if let Some(v) = finite_float(text) {
										node.x = Some(v);
									}
								}
								Some("y") => {
									if let Some(v) = finite_float(text) {
										node.y = Some(v);
									}
								}
								_ => {}
							}
						}
						TextSink::None => {}
					}
				}
			}
			Event::End(e)
				if e.local_name().as_ref() == b"data"
					|| e.local_name().as_ref() == b"NodeLabel" =>
			{
				sink = TextSink::None;
			}
			Event::End(e) if e.local_name().as_ref() == b"node" => {
				if let Some(pending) = current.take() {
					let PendingNode { id, label, x, y } = pending;
					nodes.push(GraphNode {
						label: label.unwrap_or_else(|| id.clone()),
						id,
						pos: x.zip(y),
						degree: 0,
					});
				}
				sink = TextSink::None;
			}
			Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"edge" => {
				// Edges without both endpoints are skipped outright.
				if let (Some(source), Some(target)) =
					(attr_value(&e, b"source")?, attr_value(&e, b"target")?)
				{
					let id =
						attr_value(&e, b"id")?.unwrap_or_else(|| format!("e{}", edges.len()));
					edges.push(GraphEdge { id, source, target });
				}
			}
			Event::Eof => break,
			_ => {}
		}
	}

	if nodes.is_empty() {
		return Err(malformed("document contains no nodes"));
	}
	Ok(Graph::from_parts(nodes, edges))
}
