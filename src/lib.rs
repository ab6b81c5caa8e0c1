//! graph-view: Zoomable layered directed-graph view for the browser.
//!
//! This crate provides a WASM-based element that lays out a directed graph in
//! ranks, draws it as SVG inside a shadow root, animates between layouts and
//! supports pan/zoom. The layout and rendering core is DOM-free and can be
//! driven directly through [`GraphView`].

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

/// UI components.
pub mod components;

pub use components::graph_view::{
	EdgeSpec, ElementRegistry, GraphError, GraphSpec, GraphView, GraphViewElement, NodeSpec,
	Theme, register,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("graph-view: logging initialized");
}

/// Graph data and theme name from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], edges: [...] }; the theme is
/// read from the element's `data-theme` attribute.
fn load_graph_data() -> Option<(GraphSpec, Option<String>)> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let theme = element.get_attribute("data-theme");
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match GraphSpec::from_json(&json_text) {
		Ok(data) => {
			info!(
				"graph-view: loaded {} nodes, {} edges",
				data.node_count(),
				data.edge_count()
			);
			Some((data, theme))
		}
		Err(e) => {
			warn!("graph-view: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads graph data from DOM and renders it in a `graph-view` element.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let (graph_data, theme_name) = load_graph_data().unzip();
	let theme = theme_name.flatten().and_then(|name| {
		let theme = Theme::by_name(&name);
		if theme.is_none() {
			warn!("graph-view: unknown theme '{}', using default", name);
		}
		theme
	});

	let mut registry = ElementRegistry::new();
	let instance = register(&mut registry)
		.and_then(|()| registry.create(components::graph_view::TAG_NAME))
		.inspect_err(|e| warn!("graph-view: {}", e))
		.ok();
	let data = Signal::derive(move || graph_data.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Graph View" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="graph-view-demo">
			<h1>"Graph View"</h1>
			<p class="subtitle">"Scroll to zoom. Drag to pan. Double-click to zoom in, Shift+double-click to zoom out."</p>
			<GraphViewElement data=data theme=theme instance=instance />
		</main>
	}
}
