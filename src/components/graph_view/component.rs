//! Leptos component hosting a [`GraphView`] inside a shadow root.
//!
//! The component renders a host `<div>`, attaches an open shadow root to it
//! and mounts the element template there: the theme style sheet and a card
//! holding the `svg` surface (exposed as shadow part `svg`) with one nested
//! group. Scene primitives are keyed by node id / endpoint pair so they update
//! in place while a transition runs. A `requestAnimationFrame` loop runs only
//! while the view is animating.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, MouseEvent, ShadowRoot, ShadowRootInit, ShadowRootMode, WheelEvent};

use super::error::{GraphError, Result};
use super::layout::{CHAR_WIDTH, LINE_HEIGHT};
use super::lifecycle::ElementLifecycle;
use super::scene::{EdgePath, NodeShape, Scene};
use super::theme::{SURFACE_PART, Theme, Theming};
use super::types::{GraphSpec, Shape};
use super::view::GraphView;
use super::zoom::WheelDeltaMode;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Reactive mirror of the core state read by the template.
#[derive(Clone, Copy)]
struct Mirror {
	scene: RwSignal<Scene>,
	transform: RwSignal<String>,
	panning: RwSignal<bool>,
}

impl Mirror {
	fn sync_scene(&self, view: &GraphView) {
		self.scene.set(view.scene().cloned().unwrap_or_default());
	}

	fn sync_transform(&self, view: &GraphView) {
		self.transform.set(view.transform().to_attr());
	}
}

/// Message of a thrown JS error, or its debug form for other values.
fn describe(value: &JsValue) -> String {
	value
		.dyn_ref::<js_sys::Error>()
		.map(|e| String::from(e.message()))
		.unwrap_or_else(|| format!("{value:?}"))
}

fn attach_shadow(host: &HtmlElement) -> Result<ShadowRoot> {
	host.attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))
		.map_err(|e| GraphError::Dom(format!("attachShadow failed: {}", describe(&e))))
}

fn request_frame(frame: &FrameCallback) {
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Some(ref cb) = *frame.borrow() {
		if let Err(e) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			warn!("graph-view: requestAnimationFrame failed: {}", describe(&e));
		}
	}
}

/// Renders a themed, pannable graph view inside a shadow root.
///
/// Every new value of `data` is merged into the graph (see
/// [`GraphView::set_data`]); values arriving before the shadow root is ready
/// are queued. Pass `instance` to use a view created elsewhere, for example
/// from an [`ElementRegistry`](super::registry::ElementRegistry).
#[component]
pub fn GraphViewElement(
	/// Graph data. Each new value is merged into the view.
	#[prop(into)]
	data: Signal<Option<GraphSpec>>,
	/// Theme to start with instead of the default.
	#[prop(default = None)]
	theme: Option<Theme>,
	/// Extra style modules appended to the shadow root style sheet.
	#[prop(optional)]
	styles: Vec<String>,
	/// View to mount, for example one created by an element registry.
	#[prop(default = None)]
	instance: Option<GraphView>,
) -> impl IntoView {
	let host_ref = NodeRef::<leptos::html::Div>::new();
	let mut core = instance.unwrap_or_else(|| {
		GraphView::new(Theming::default(), ElementLifecycle::default())
	});
	if let Some(theme) = theme {
		core.theming_mut().set_theme(theme);
	}
	for module in styles {
		core.theming_mut().register_styles(module);
	}
	let view: Rc<RefCell<GraphView>> = Rc::new(RefCell::new(core));

	let mirror = Mirror {
		scene: RwSignal::new(Scene::default()),
		transform: RwSignal::new(String::new()),
		panning: RwSignal::new(false),
	};

	let frame: FrameCallback = Rc::new(RefCell::new(None));
	let running = Rc::new(Cell::new(false));
	let last_frame: Rc<Cell<Option<f64>>> = Rc::new(Cell::new(None));
	{
		let (view, frame_inner, running) = (view.clone(), frame.clone(), running.clone());
		*frame.borrow_mut() = Some(Closure::new(move |now: f64| {
			let dt = last_frame.get().map_or(0.0, |prev| now - prev);
			let animating = {
				let mut v = view.borrow_mut();
				if v.tick(dt) {
					mirror.sync_scene(&v);
				}
				v.is_animating()
			};
			if animating {
				last_frame.set(Some(now));
				request_frame(&frame_inner);
			} else {
				last_frame.set(None);
				running.set(false);
			}
		}));
	}
	let start_animation = {
		let (view, frame) = (view.clone(), frame.clone());
		move || {
			if !running.get() && view.borrow().is_animating() {
				running.set(true);
				request_frame(&frame);
			}
		}
	};

	let (view_data, start_data) = (view.clone(), start_animation.clone());
	Effect::new(move |_| {
		let Some(spec) = data.get() else {
			return;
		};
		{
			let mut v = view_data.borrow_mut();
			if let Err(e) = v.set_data(spec) {
				error!("{}: update rejected: {}", v.lifecycle().tag(), e);
			}
			mirror.sync_scene(&v);
		}
		start_data();
	});

	let (view_init, start_init) = (view.clone(), start_animation);
	Effect::new(move |_| {
		let Some(host) = host_ref.get() else {
			return;
		};
		if view_init.borrow().is_ready() {
			return;
		}
		let root = match attach_shadow(&host) {
			Ok(root) => root,
			Err(e) => {
				error!("graph-view: {}", e);
				return;
			}
		};

		let css = view_init.borrow().css();
		let view_tpl = view_init.clone();
		leptos::mount::mount_to(root.unchecked_into::<HtmlElement>(), move || {
			view! { <Template css=css view=view_tpl mirror=mirror /> }
		})
		.forget();

		{
			let mut v = view_init.borrow_mut();
			if let Err(e) = v.ready() {
				error!("{}: queued update rejected: {}", v.lifecycle().tag(), e);
			}
			mirror.sync_scene(&v);
			mirror.sync_transform(&v);
		}
		start_init();
	});

	view! { <div node_ref=host_ref class="graph-view-host" /> }
}

/// Shadow root content: style sheet plus the card with the SVG surface.
#[component]
fn Template(css: String, view: Rc<RefCell<GraphView>>, mirror: Mirror) -> impl IntoView {
	let svg_ref = NodeRef::<leptos::svg::Svg>::new();
	let local_point = move |ev: &MouseEvent| {
		let svg = svg_ref.get_untracked()?;
		let rect = svg.get_bounding_client_rect();
		Some((
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	};

	let view_wh = view.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(&*ev) else {
			return;
		};
		let mut v = view_wh.borrow_mut();
		let mode = WheelDeltaMode::from_dom(ev.delta_mode());
		if v.handle_wheel(x, y, ev.delta_y(), mode, ev.ctrl_key()) {
			mirror.sync_transform(&v);
		}
	};

	let view_md = view.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		let Some((x, y)) = local_point(&ev) else {
			return;
		};
		view_md.borrow_mut().handle_pointer_down(x, y);
		mirror.panning.set(true);
	};

	let view_mm = view.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(&ev) else {
			return;
		};
		let mut v = view_mm.borrow_mut();
		if v.handle_pointer_move(x, y) {
			mirror.sync_transform(&v);
		}
	};

	let view_mu = view.clone();
	let on_mouseup = move |_: MouseEvent| {
		view_mu.borrow_mut().handle_pointer_up();
		mirror.panning.set(false);
	};

	let view_ml = view.clone();
	let on_mouseleave = move |_: MouseEvent| {
		view_ml.borrow_mut().handle_pointer_up();
		mirror.panning.set(false);
	};

	let on_dblclick = move |ev: MouseEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(&ev) else {
			return;
		};
		let mut v = view.borrow_mut();
		if v.handle_double_click(x, y, ev.shift_key()) {
			mirror.sync_transform(&v);
		}
	};

	let scene = mirror.scene;
	view! {
		<style>{css}</style>
		<div class="card">
			<svg
				node_ref=svg_ref
				part=SURFACE_PART
				class=move || if mirror.panning.get() { "panning" } else { "" }
				on:wheel=on_wheel
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:dblclick=on_dblclick
			>
				<g class="inner" transform=move || mirror.transform.get()>
					<g class="edgePaths">
						<For
							each=move || {
								scene.with(|s| {
									s.edges
										.iter()
										.map(|e| (e.from.clone(), e.to.clone()))
										.collect::<Vec<_>>()
								})
							}
							key=|pair: &(String, String)| pair.clone()
							children=move |(from, to): (String, String)| view! { <EdgeView scene=scene from=from to=to /> }
						/>
					</g>
					<g class="nodes">
						<For
							each=move || {
								scene.with(|s| s.nodes.iter().map(|n| n.id.clone()).collect::<Vec<_>>())
							}
							key=|id: &String| id.clone()
							children=move |id: String| view! { <NodeView scene=scene id=id /> }
						/>
					</g>
				</g>
			</svg>
		</div>
	}
}

#[component]
fn NodeView(scene: RwSignal<Scene>, id: String) -> impl IntoView {
	let node = Memo::new(move |_| scene.with(|s| s.node(&id).cloned()));
	let read = move |f: fn(&NodeShape) -> String| {
		move || node.with(|n| n.as_ref().map(f).unwrap_or_default())
	};
	let kind = Memo::new(move |_| node.with(|n| n.as_ref().map(|n| n.shape)));
	let lines = Memo::new(move |_| {
		node.with(|n| {
			n.as_ref()
				.map(|n| n.label_lines().into_iter().map(String::from).collect::<Vec<_>>())
				.unwrap_or_default()
		})
	});

	let outline = move || match kind.get().unwrap_or_default() {
		Shape::Rect => view! {
			<rect
				x=read(|n| (-n.width / 2.0).to_string())
				y=read(|n| (-n.height / 2.0).to_string())
				width=read(|n| n.width.to_string())
				height=read(|n| n.height.to_string())
				rx=read(|n| n.rx.to_string())
				ry=read(|n| n.ry.to_string())
				style=read(|n| n.style.clone().unwrap_or_default())
			/>
		}
		.into_any(),
		Shape::Circle => view! {
			<circle
				r=read(|n| (n.width.max(n.height) / 2.0).to_string())
				style=read(|n| n.style.clone().unwrap_or_default())
			/>
		}
		.into_any(),
		Shape::Ellipse => view! {
			<ellipse
				rx=read(|n| (n.width / 2.0).to_string())
				ry=read(|n| (n.height / 2.0).to_string())
				style=read(|n| n.style.clone().unwrap_or_default())
			/>
		}
		.into_any(),
		Shape::Diamond => view! {
			<polygon
				points=read(NodeShape::diamond_points)
				style=read(|n| n.style.clone().unwrap_or_default())
			/>
		}
		.into_any(),
	};

	let tspans = move || {
		let lines = lines.get();
		let offset = (lines.len() as f64 - 1.0) / 2.0;
		lines
			.into_iter()
			.enumerate()
			.map(|(i, line)| {
				let y = (i as f64 - offset) * LINE_HEIGHT;
				view! { <tspan x="0" y=y.to_string() dominant-baseline="central">{line}</tspan> }
			})
			.collect_view()
	};

	view! {
		<g
			class=read(NodeShape::class_name)
			transform=read(NodeShape::transform)
			opacity=read(|n| n.opacity.to_string())
		>
			{outline}
			<text text-anchor="middle" style=read(|n| n.label_style.clone().unwrap_or_default())>
				{tspans}
			</text>
		</g>
	}
}

#[component]
fn EdgeView(scene: RwSignal<Scene>, from: String, to: String) -> impl IntoView {
	let edge = Memo::new(move |_| scene.with(|s| s.edge(&from, &to).cloned()));
	let read = move |f: fn(&EdgePath) -> String| {
		move || edge.with(|e| e.as_ref().map(f).unwrap_or_default())
	};
	let has_arrow = move || edge.with(|e| e.as_ref().is_some_and(|e| e.arrow.is_some()));
	let has_label = move || {
		edge.with(|e| {
			e.as_ref()
				.is_some_and(|e| e.label.is_some() && e.label_pos.is_some())
		})
	};

	view! {
		<g class=read(EdgePath::class_name) opacity=read(|e| e.opacity.to_string())>
			<path d=read(EdgePath::path_data) style=read(|e| e.style.clone().unwrap_or_default()) />
			<Show when=has_arrow>
				<polygon
					class="arrowhead"
					points=read(|e| e.arrow_points().unwrap_or_default())
					style=read(|e| e.arrowhead_style.clone().unwrap_or_default())
				/>
			</Show>
			<Show when=has_label>
				<g
					class="edgeLabel"
					transform=read(|e| {
						let (x, y) = e.label_pos.unwrap_or_default();
						format!("translate({x},{y})")
					})
				>
					<rect
						x=read(|e| (-label_width(e) / 2.0).to_string())
						y=(-LINE_HEIGHT / 2.0).to_string()
						width=read(|e| label_width(e).to_string())
						height=LINE_HEIGHT.to_string()
					/>
					<text
						text-anchor="middle"
						dominant-baseline="central"
						style=read(|e| e.label_style.clone().unwrap_or_default())
					>
						{read(|e| e.label.clone().unwrap_or_default())}
					</text>
				</g>
			</Show>
		</g>
	}
}

fn label_width(edge: &EdgePath) -> f64 {
	let chars = edge
		.label
		.as_deref()
		.map_or(0, |l| l.lines().map(|line| line.chars().count()).max().unwrap_or(0));
	chars as f64 * CHAR_WIDTH + 8.0
}
