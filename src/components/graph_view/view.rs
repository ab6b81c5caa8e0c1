//! The graph view element core.
//!
//! [`GraphView`] composes theming and lifecycle handling with the graph
//! model, the renderer and the pan/zoom controller. It is DOM-free; the Leptos
//! component drives it and mirrors its state into the shadow root.

use std::collections::HashSet;

use log::{debug, error, warn};

use super::error::{GraphError, Result};
use super::lifecycle::ElementLifecycle;
use super::model::{EdgeLabel, GraphConfig, GraphModel, MAX_MINLEN, NodeLabel, Transition};
use super::render::Renderer;
use super::scene::Scene;
use super::theme::Theming;
use super::types::{GraphSpec, NodeSpec};
use super::zoom::{ViewTransform, WheelDeltaMode, ZoomConfig, ZoomController, ZoomEvent};

/// Margin applied on both axes when the graph configuration sets neither.
pub const DEFAULT_MARGIN: f64 = 20.0;
/// Duration of the layout transition.
pub const TRANSITION_MS: f64 = 500.0;

/// The SVG surface and the transform of its nested group.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSurface {
	/// Surface width in px.
	pub width: f64,
	/// Surface height in px.
	pub height: f64,
	group_transform: ViewTransform,
}

impl RenderSurface {
	fn new((width, height): (f64, f64)) -> Self {
		Self {
			width,
			height,
			group_transform: ViewTransform::IDENTITY,
		}
	}

	/// Transform currently applied to the nested group.
	pub fn group_transform(&self) -> ViewTransform {
		self.group_transform
	}

	/// Value of the nested group's `transform` attribute.
	pub fn group_transform_attr(&self) -> String {
		self.group_transform.to_attr()
	}

	fn apply(&mut self, event: &ZoomEvent) {
		self.group_transform = event.transform;
	}
}

/// Collaborators created by [`GraphView::ready`].
#[derive(Clone, Debug)]
struct Attached {
	surface: RenderSurface,
	zoom: ZoomController,
	model: GraphModel,
	renderer: Renderer,
}

/// A themed, pannable graph view.
#[derive(Clone, Debug, Default)]
pub struct GraphView {
	theming: Theming,
	lifecycle: ElementLifecycle,
	graph_config: GraphConfig,
	zoom_config: ZoomConfig,
	attached: Option<Attached>,
}

impl GraphView {
	/// Uninitialized view. Call [`GraphView::ready`] once mounted.
	pub fn new(theming: Theming, lifecycle: ElementLifecycle) -> Self {
		Self {
			theming,
			lifecycle,
			..Self::default()
		}
	}

	/// Start from `config` instead of an empty graph configuration. Margins
	/// set here are kept by [`GraphView::ready`].
	pub fn with_graph_config(mut self, config: GraphConfig) -> Self {
		self.graph_config = config;
		self
	}

	/// Use `config` for the pan/zoom controller.
	pub fn with_zoom_config(mut self, config: ZoomConfig) -> Self {
		self.zoom_config = config;
		self
	}

	/// Whether [`GraphView::ready`] has run.
	pub fn is_ready(&self) -> bool {
		self.lifecycle.is_ready()
	}

	/// Tag, version and readiness.
	pub fn lifecycle(&self) -> &ElementLifecycle {
		&self.lifecycle
	}

	/// Theme and style modules.
	pub fn theming(&self) -> &Theming {
		&self.theming
	}

	/// Mutable theming.
	pub fn theming_mut(&mut self) -> &mut Theming {
		&mut self.theming
	}

	/// Shadow root style sheet.
	pub fn css(&self) -> String {
		self.theming.css()
	}

	/// The graph model, once ready.
	pub fn model(&self) -> Option<&GraphModel> {
		self.attached.as_ref().map(|a| &a.model)
	}

	/// The scene currently on screen.
	pub fn scene(&self) -> Option<&Scene> {
		self.attached.as_ref().map(|a| a.renderer.scene())
	}

	/// The rendering surface, once ready.
	pub fn surface(&self) -> Option<&RenderSurface> {
		self.attached.as_ref().map(|a| &a.surface)
	}

	/// Current pan/zoom transform; identity before ready.
	pub fn transform(&self) -> ViewTransform {
		self.attached
			.as_ref()
			.map_or(ViewTransform::IDENTITY, |a| a.surface.group_transform)
	}

	/// Whether a transition is running.
	pub fn is_animating(&self) -> bool {
		self.attached
			.as_ref()
			.is_some_and(|a| a.renderer.is_animating())
	}

	/// Initialize the surface, zoom controller and model, then apply any data
	/// assigned before now. Runs once; later calls do nothing.
	///
	/// Queued updates are applied independently. The first one that fails is
	/// returned after the rest have been applied.
	pub fn ready(&mut self) -> Result<()> {
		if self.is_ready() {
			debug!("{}: already ready", self.lifecycle.tag());
			return Ok(());
		}

		let surface = RenderSurface::new(self.theming.surface_size());
		let zoom = ZoomController::new(self.zoom_config);

		let mut model = GraphModel::new();
		let mut config = self.graph_config.clone();
		if config.marginx.is_none() && config.marginy.is_none() {
			config.marginx = Some(DEFAULT_MARGIN);
			config.marginy = Some(DEFAULT_MARGIN);
		}
		config.transition = Some(Transition::new(TRANSITION_MS));
		model.set_graph(config);

		self.attached = Some(Attached {
			surface,
			zoom,
			model,
			renderer: Renderer::new(),
		});

		let pending = self.lifecycle.mark_ready().unwrap_or_default();
		let mut first_error = None;
		for spec in pending {
			if let Err(e) = self.apply(spec) {
				error!("{}: queued update failed: {}", self.lifecycle.tag(), e);
				first_error.get_or_insert(e);
			}
		}
		first_error.map_or(Ok(()), Err)
	}

	/// Merge `spec` into the model and re-render. Before [`GraphView::ready`]
	/// the data is queued instead.
	///
	/// The whole update is validated first: on error nothing is changed.
	pub fn set_data(&mut self, spec: GraphSpec) -> Result<()> {
		if !self.is_ready() {
			self.lifecycle.queue(spec);
			return Ok(());
		}
		self.apply(spec)
	}

	/// Decode JSON and pass it to [`GraphView::set_data`].
	pub fn set_data_json(&mut self, json: &str) -> Result<()> {
		let spec = GraphSpec::from_json(json)?;
		self.set_data(spec)
	}

	/// Remove every node and edge, keeping the graph configuration. Before
	/// [`GraphView::ready`] this drops the queued data instead.
	pub fn clear(&mut self) {
		let Some(attached) = self.attached.as_mut() else {
			self.lifecycle.clear_pending();
			return;
		};
		attached.model.clear();
		attached.renderer.render(&attached.model);
	}

	fn apply(&mut self, spec: GraphSpec) -> Result<()> {
		let tag = self.lifecycle.tag();
		let Some(attached) = self.attached.as_mut() else {
			return Ok(());
		};
		validate(&attached.model, &spec)?;

		let GraphSpec { nodes, edges } = spec;
		let nodes = nodes.unwrap_or_default();
		let edges = edges.unwrap_or_default();
		debug!(
			"{}: applying {} nodes, {} edges",
			tag,
			nodes.len(),
			edges.len()
		);
		for node in nodes {
			let (id, label) = NodeLabel::from_spec(node);
			attached.model.set_node(id, label);
		}
		for edge in edges {
			let ((from, to), label) = EdgeLabel::from_spec(edge);
			attached.model.set_edge(&from, &to, label)?;
		}
		attached.renderer.render(&attached.model);
		Ok(())
	}

	/// Advance the layout transition. Returns whether the scene changed.
	pub fn tick(&mut self, dt_ms: f64) -> bool {
		self.attached
			.as_mut()
			.is_some_and(|a| a.renderer.tick(dt_ms))
	}

	fn zoom_with(&mut self, f: impl FnOnce(&mut ZoomController) -> Option<ZoomEvent>) -> bool {
		let Some(attached) = self.attached.as_mut() else {
			return false;
		};
		match f(&mut attached.zoom) {
			Some(event) => {
				attached.surface.apply(&event);
				true
			}
			None => false,
		}
	}

	/// Zoom about `(x, y)` for a wheel delta.
	pub fn handle_wheel(
		&mut self,
		x: f64,
		y: f64,
		delta_y: f64,
		mode: WheelDeltaMode,
		ctrl: bool,
	) -> bool {
		self.zoom_with(|zoom| zoom.wheel(x, y, delta_y, mode, ctrl))
	}

	/// Start a drag pan at `(x, y)`. Never emits.
	pub fn handle_pointer_down(&mut self, x: f64, y: f64) -> bool {
		self.zoom_with(|zoom| {
			zoom.pointer_down(x, y);
			None
		})
	}

	/// Pan to `(x, y)` while dragging.
	pub fn handle_pointer_move(&mut self, x: f64, y: f64) -> bool {
		self.zoom_with(|zoom| zoom.pointer_move(x, y))
	}

	/// End a drag pan. Never emits.
	pub fn handle_pointer_up(&mut self) -> bool {
		self.zoom_with(|zoom| {
			zoom.pointer_up();
			None
		})
	}

	/// Zoom in about `(x, y)`, or out when `shift` is held.
	pub fn handle_double_click(&mut self, x: f64, y: f64, shift: bool) -> bool {
		self.zoom_with(|zoom| zoom.double_click(x, y, shift))
	}

	/// Whether a drag pan is in progress.
	pub fn is_panning(&self) -> bool {
		self.attached.as_ref().is_some_and(|a| a.zoom.is_panning())
	}

	/// Scale and centre the laid-out graph inside the surface.
	pub fn fit_to_view(&mut self) -> bool {
		let Some(attached) = self.attached.as_mut() else {
			return false;
		};
		let target = attached.renderer.target();
		let content = (target.width, target.height);
		let viewport = (attached.surface.width, attached.surface.height);
		match attached.zoom.fit(content, viewport) {
			Some(event) => {
				attached.surface.apply(&event);
				true
			}
			None => false,
		}
	}

	/// Return to the identity transform.
	pub fn reset_zoom(&mut self) -> bool {
		self.zoom_with(ZoomController::reset)
	}
}

fn check_dimension(node: &NodeSpec, field: &'static str, value: Option<f64>) -> Result<()> {
	match value {
		Some(v) if !v.is_finite() || v < 0.0 => Err(GraphError::InvalidDimension {
			id: node.id.clone(),
			field,
			value: v,
		}),
		_ => Ok(()),
	}
}

/// Reject `spec` if any node has a bad dimension, any edge asks for more
/// than [`MAX_MINLEN`] ranks, or any edge endpoint is neither in `model`
/// nor among the incoming nodes.
fn validate(model: &GraphModel, spec: &GraphSpec) -> Result<()> {
	let nodes = spec.nodes.as_deref().unwrap_or_default();
	for node in nodes {
		check_dimension(node, "width", node.width)?;
		check_dimension(node, "height", node.height)?;
		check_dimension(node, "padding", node.padding)?;
		check_dimension(node, "rx", node.rx)?;
		check_dimension(node, "ry", node.ry)?;
	}

	let incoming: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
	let known = |id: &str| incoming.contains(id) || model.has_node(id);
	for edge in spec.edges.as_deref().unwrap_or_default() {
		if let Some(value) = edge.minlen.filter(|&m| m > MAX_MINLEN) {
			return Err(GraphError::MinlenOutOfRange {
				from: edge.from.clone(),
				to: edge.to.clone(),
				value,
			});
		}
		for endpoint in [&edge.from, &edge.to] {
			if !known(endpoint.as_str()) {
				warn!("rejecting edge {} -> {}: unknown node '{}'", edge.from, edge.to, endpoint);
				return Err(GraphError::DanglingEdge {
					from: edge.from.clone(),
					to: edge.to.clone(),
					missing: endpoint.clone(),
				});
			}
		}
	}
	Ok(())
}
