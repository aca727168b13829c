use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::GraphScene;

const BACKGROUND: &str = "#151a2d";
const NODE_FILL: &str = "#6aa9e9";
const ACTIVE_FILL: &str = "#f2b134";
const EDGE_RGB: &str = "110, 170, 230";
const LABEL_RGB: &str = "235, 240, 250";

// Edge styling: everything sits at the base level until a node is active,
// then incident edges brighten and thicken while the rest dim.
const EDGE_BASE_ALPHA: f64 = 0.35;
const EDGE_ACTIVE_ALPHA: f64 = 0.7;
const EDGE_DIM_ALPHA: f64 = 0.15;
const EDGE_BASE_WIDTH: f64 = 1.0;
const EDGE_ACTIVE_WIDTH: f64 = 2.0;

pub fn render(scene: &GraphScene, ctx: &CanvasRenderingContext2d) {
	let viewport = scene.viewport();
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, viewport.width, viewport.height);

	draw_edges(scene, ctx);
	draw_nodes(scene, ctx);
}

fn draw_edges(scene: &GraphScene, ctx: &CanvasRenderingContext2d) {
	let hovering = scene.hover().is_some();
	for &edge in &scene.edges {
		let a = &scene.nodes[edge.source];
		let b = &scene.nodes[edge.target];

		let (alpha, width) = if !hovering {
			(EDGE_BASE_ALPHA, EDGE_BASE_WIDTH)
		} else if scene.edge_touches_active(edge) {
			(EDGE_ACTIVE_ALPHA, EDGE_ACTIVE_WIDTH)
		} else {
			(EDGE_DIM_ALPHA, EDGE_BASE_WIDTH)
		};

		ctx.set_stroke_style_str(&format!("rgba({EDGE_RGB}, {alpha})"));
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
	}
}

fn draw_nodes(scene: &GraphScene, ctx: &CanvasRenderingContext2d) {
	ctx.set_text_align("center");
	for (idx, node) in scene.nodes.iter().enumerate() {
		let active = scene.is_active(idx);

		ctx.set_global_alpha(if active { 0.95 } else { 0.85 });
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, node.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(if active { ACTIVE_FILL } else { NODE_FILL });
		ctx.fill();
		ctx.set_global_alpha(1.0);

		let label_alpha = if active { 1.0 } else { 0.8 };
		ctx.set_fill_style_str(&format!("rgba({LABEL_RGB}, {label_alpha})"));
		ctx.set_font("11px sans-serif");
		let _ = ctx.fill_text(&node.label, node.x, node.y - node.radius - 6.0);
	}
}
