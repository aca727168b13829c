//! Pure viewport layout: rescale source coordinates when enough nodes carry
//! them, otherwise fall back to an evenly spaced circle.

use std::f64::consts::PI;

use super::types::GraphNode;

/// Margin kept free on every side of the viewport in coordinate-fit mode.
pub const FIT_PADDING: f64 = 24.0;
/// Absolute minimum of anchored nodes required for coordinate-fit mode.
pub const ANCHORED_MIN: usize = 3;
/// Fraction of all nodes that must be anchored for coordinate-fit mode.
pub const ANCHORED_FRACTION: f64 = 0.6;
/// Smallest circle radius used by the fallback layout.
pub const CIRCLE_MIN_RADIUS: f64 = 80.0;
/// Circle radius as a fraction of the smaller viewport dimension.
pub const CIRCLE_RADIUS_FACTOR: f64 = 0.42;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutMode {
	CoordinateFit,
	CircularFallback,
}

fn finite_pos(node: &GraphNode) -> Option<(f64, f64)> {
	node.pos.filter(|(x, y)| x.is_finite() && y.is_finite())
}

/// Picks the layout mode: coordinate-fit when at least
/// `max(ANCHORED_MIN, floor(ANCHORED_FRACTION * n))` nodes carry finite
/// source coordinates.
pub fn layout_mode(nodes: &[GraphNode]) -> LayoutMode {
	let anchored = nodes.iter().filter(|n| finite_pos(n).is_some()).count();
	let needed = ANCHORED_MIN.max((ANCHORED_FRACTION * nodes.len() as f64).floor() as usize);
	if anchored >= needed {
		LayoutMode::CoordinateFit
	} else {
		LayoutMode::CircularFallback
	}
}

/// Maps every node to a view-space position. Pure: same nodes and viewport
/// always produce the same positions, in node order.
pub fn layout_positions(nodes: &[GraphNode], viewport: Viewport) -> Vec<(f64, f64)> {
	if nodes.is_empty() {
		return Vec::new();
	}
	match layout_mode(nodes) {
		LayoutMode::CoordinateFit => fit_positions(nodes, viewport),
		LayoutMode::CircularFallback => circle_positions(nodes.len(), viewport),
	}
}

fn fit_positions(nodes: &[GraphNode], viewport: Viewport) -> Vec<(f64, f64)> {
	let mut min_x = f64::INFINITY;
	let mut max_x = f64::NEG_INFINITY;
	let mut min_y = f64::INFINITY;
	let mut max_y = f64::NEG_INFINITY;
	for (x, y) in nodes.iter().filter_map(finite_pos) {
		min_x = min_x.min(x);
		max_x = max_x.max(x);
		min_y = min_y.min(y);
		max_y = max_y.max(y);
	}

	// Spans are floored at 1 so a degenerate bounding box cannot divide by
	// zero.
	let span_x = (max_x - min_x).max(1.0);
	let span_y = (max_y - min_y).max(1.0);
	let sx = (viewport.width - 2.0 * FIT_PADDING) / span_x;
	let sy = (viewport.height - 2.0 * FIT_PADDING) / span_y;
	let scale = sx.min(sy);

	nodes
		.iter()
		.map(|node| {
			// Unanchored nodes collapse onto the bounding-box minimum.
			let (x, y) = finite_pos(node).unwrap_or((min_x, min_y));
			(
				FIT_PADDING + (x - min_x) * scale,
				FIT_PADDING + (y - min_y) * scale,
			)
		})
		.collect()
}

fn circle_positions(count: usize, viewport: Viewport) -> Vec<(f64, f64)> {
	let radius = CIRCLE_MIN_RADIUS.max(CIRCLE_RADIUS_FACTOR * viewport.width.min(viewport.height));
	let cx = viewport.width / 2.0;
	let cy = viewport.height / 2.0;
	(0..count)
		.map(|i| {
			let angle = 2.0 * PI * i as f64 / count as f64;
			(cx + radius * angle.cos(), cy + radius * angle.sin())
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	const VIEW: Viewport = Viewport {
		width: 400.0,
		height: 300.0,
	};

	fn node(id: &str, pos: Option<(f64, f64)>) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.into(),
			pos,
			degree: 0,
		}
	}

	fn anchored(n: usize, total: usize) -> Vec<GraphNode> {
		(0..total)
			.map(|i| {
				let pos = (i < n).then(|| (i as f64 * 10.0, i as f64 * 5.0));
				node(&format!("n{i}"), pos)
			})
			.collect()
	}

	#[test]
	fn three_of_five_anchored_selects_fit() {
		assert_eq!(layout_mode(&anchored(3, 5)), LayoutMode::CoordinateFit);
	}

	#[test]
	fn two_of_five_anchored_selects_circle() {
		assert_eq!(layout_mode(&anchored(2, 5)), LayoutMode::CircularFallback);
	}

	#[test]
	fn non_finite_coordinates_do_not_count_as_anchored() {
		let mut nodes = anchored(3, 5);
		nodes[0].pos = Some((f64::NAN, 1.0));
		assert_eq!(layout_mode(&nodes), LayoutMode::CircularFallback);
	}

	#[test]
	fn fewer_than_three_nodes_always_use_circle() {
		assert_eq!(layout_mode(&anchored(2, 2)), LayoutMode::CircularFallback);
	}

	#[test]
	fn circle_nodes_are_equidistant_and_evenly_spaced() {
		let nodes = anchored(0, 8);
		let positions = layout_positions(&nodes, VIEW);
		let expected_radius = CIRCLE_MIN_RADIUS.max(CIRCLE_RADIUS_FACTOR * 300.0);
		let (cx, cy) = (200.0, 150.0);

		for &(x, y) in &positions {
			let dist = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
			assert!((dist - expected_radius).abs() < 1e-9);
		}
		for (i, &(x, y)) in positions.iter().enumerate() {
			let angle = 2.0 * PI * i as f64 / 8.0;
			assert!((x - (cx + expected_radius * angle.cos())).abs() < 1e-9);
			assert!((y - (cy + expected_radius * angle.sin())).abs() < 1e-9);
		}
	}

	#[test]
	fn fit_preserves_horizontal_ordering() {
		let nodes = vec![
			node("a", Some((0.0, 0.0))),
			node("b", Some((40.0, 10.0))),
			node("c", Some((90.0, 20.0))),
		];
		let positions = layout_positions(&nodes, VIEW);
		assert!(positions[0].0 <= positions[1].0);
		assert!(positions[1].0 <= positions[2].0);
	}

	#[test]
	fn fit_maps_bbox_minimum_to_padding_corner() {
		let nodes = vec![
			node("a", Some((10.0, 30.0))),
			node("b", Some((60.0, 80.0))),
			node("c", Some((110.0, 130.0))),
		];
		let positions = layout_positions(&nodes, VIEW);
		assert!((positions[0].0 - FIT_PADDING).abs() < 1e-9);
		assert!((positions[0].1 - FIT_PADDING).abs() < 1e-9);
	}

	#[test]
	fn unanchored_nodes_default_to_bbox_minimum() {
		let nodes = vec![
			node("a", Some((10.0, 30.0))),
			node("b", Some((60.0, 80.0))),
			node("c", Some((110.0, 130.0))),
			node("free", None),
		];
		let positions = layout_positions(&nodes, VIEW);
		assert_eq!(positions[3], positions[0]);
	}

	#[test]
	fn degenerate_bbox_does_not_divide_by_zero() {
		let nodes = vec![
			node("a", Some((5.0, 5.0))),
			node("b", Some((5.0, 5.0))),
			node("c", Some((5.0, 5.0))),
		];
		let positions = layout_positions(&nodes, VIEW);
		for &(x, y) in &positions {
			assert!(x.is_finite() && y.is_finite());
			assert!((x - FIT_PADDING).abs() < 1e-9);
			assert!((y - FIT_PADDING).abs() < 1e-9);
		}
	}

	#[test]
	fn layout_is_idempotent() {
		let nodes = anchored(4, 6);
		assert_eq!(layout_positions(&nodes, VIEW), layout_positions(&nodes, VIEW));
	}
}
