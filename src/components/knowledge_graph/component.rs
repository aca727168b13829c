use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, ResizeObserver};

use crate::net;

use super::layout::Viewport;
use super::loader::{self, CancelToken};
use super::render;
use super::state::GraphScene;
use super::types::{GraphStatus, fallback_graph};

fn canvas_context(canvas: &HtmlCanvasElement) -> CanvasRenderingContext2d {
	canvas
		.get_context("2d")
		.unwrap()
		.unwrap()
		.dyn_into()
		.unwrap()
}

fn parent_size(canvas: &HtmlCanvasElement) -> Viewport {
	let (width, height) = canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.unwrap_or((800.0, 600.0));
	Viewport { width, height }
}

/// Interactive knowledge-graph view: loads the graph through the source
/// chain, lays it out for the current viewport and redraws on hover and
/// resize. Load progress is reported through `status`.
#[component]
pub fn KnowledgeGraphCanvas(#[prop(into)] status: RwSignal<GraphStatus>) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let scene: Rc<RefCell<Option<GraphScene>>> = Rc::new(RefCell::new(None));
	// Keeps the observer and its closure alive for the component's lifetime.
	let observer: Rc<RefCell<Option<(ResizeObserver, Closure<dyn FnMut()>)>>> =
		Rc::new(RefCell::new(None));
	let cancel = CancelToken::new();

	{
		let cancel = cancel.clone();
		on_cleanup(move || cancel.cancel());
	}

	let (scene_init, observer_init, cancel_init) =
		(scene.clone(), observer.clone(), cancel.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let viewport = parent_size(&canvas);
		canvas.set_width(viewport.width as u32);
		canvas.set_height(viewport.height as u32);

		// Observe the containing element continuously, not just on mount;
		// layout is recomputed for every effective size change.
		{
			let (scene_resize, canvas_resize) = (scene_init.clone(), canvas.clone());
			let cb: Closure<dyn FnMut()> = Closure::new(move || {
				let viewport = parent_size(&canvas_resize);
				canvas_resize.set_width(viewport.width as u32);
				canvas_resize.set_height(viewport.height as u32);
				if let Some(ref mut s) = *scene_resize.borrow_mut() {
					s.resize(viewport);
					render::render(s, &canvas_context(&canvas_resize));
				}
			});
			let ro = ResizeObserver::new(cb.as_ref().unchecked_ref()).unwrap();
			if let Some(parent) = canvas.parent_element() {
				ro.observe(&parent);
			}
			*observer_init.borrow_mut() = Some((ro, cb));
		}

		let (scene_load, cancel_load, canvas_load) =
			(scene_init.clone(), cancel_init.clone(), canvas.clone());
		status.set(GraphStatus::Loading);
		spawn_local(async move {
			let result = loader::load_graph(async |url: &str| net::fetch_text(url).await).await;
			let Some(result) = cancel_load.admit(result) else {
				return;
			};

			let (graph, next) = match result {
				Ok((graph, _source)) => {
					let meta = graph.meta;
					(graph, GraphStatus::Ready(meta))
				}
				Err(err) => {
					warn!("substituting built-in graph: {err}");
					let graph = fallback_graph();
					let meta = graph.meta;
					(
						graph,
						GraphStatus::Fallback {
							meta,
							message: err.to_string(),
						},
					)
				}
			};
			status.set(next);

			let new_scene = GraphScene::new(graph, parent_size(&canvas_load));
			render::render(&new_scene, &canvas_context(&canvas_load));
			*scene_load.borrow_mut() = Some(new_scene);
		});
	});

	let scene_mm = scene.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut s) = *scene_mm.borrow_mut() {
			let hovered = s.node_at_position(x, y);
			if hovered != s.hover() {
				s.set_hover(hovered);
				render::render(s, &canvas_context(&canvas));
			}
		}
	};

	let scene_ml = scene.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		if let Some(ref mut s) = *scene_ml.borrow_mut() {
			if s.hover().is_some() {
				s.set_hover(None);
				render::render(s, &canvas_context(&canvas));
			}
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="knowledge-graph-canvas"
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			style="display: block; cursor: pointer;"
		/>
	}
}
