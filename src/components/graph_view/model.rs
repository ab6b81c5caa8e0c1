//! Mutable graph model: nodes keyed by id, directed edges keyed by endpoint
//! pair, plus graph-level layout configuration.
//!
//! Backed by a `petgraph` stable graph so node indices survive removals.
//! Upserts replace the stored label; they never create duplicates.

use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use serde_json::{Map, Value};

use super::error::{GraphError, Result};
use super::types::{Arrowhead, EdgeSpec, NodeSpec, Shape};

/// Default padding between a node's label and its outline.
pub const DEFAULT_PADDING: f64 = 10.0;
/// Largest accepted `minlen`; each extra rank costs one bend point per edge.
pub const MAX_MINLEN: u32 = 64;

/// Layout and display attributes stored for a node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeLabel {
	/// Displayed text, one line per `\n`.
	pub label: String,
	/// Outline shape.
	pub shape: Shape,
	/// Explicit width, otherwise derived from the label.
	pub width: Option<f64>,
	/// Explicit height, otherwise derived from the label.
	pub height: Option<f64>,
	/// Space between label and outline.
	pub padding: f64,
	/// Horizontal corner radius.
	pub rx: f64,
	/// Vertical corner radius.
	pub ry: f64,
	/// Inline CSS for the outline.
	pub style: Option<String>,
	/// Inline CSS for the label.
	pub label_style: Option<String>,
	/// Extra CSS class.
	pub class: Option<String>,
	/// Unrecognized attributes, kept verbatim.
	pub metadata: Map<String, Value>,
}

impl NodeLabel {
	/// Split a node record into its key and stored label.
	pub fn from_spec(spec: NodeSpec) -> (String, Self) {
		let label = spec.label.unwrap_or_else(|| spec.id.clone());
		(
			spec.id,
			Self {
				label,
				shape: spec.shape,
				width: spec.width,
				height: spec.height,
				padding: spec.padding.unwrap_or(DEFAULT_PADDING),
				rx: spec.rx.unwrap_or(0.0),
				ry: spec.ry.unwrap_or(0.0),
				style: spec.style,
				label_style: spec.label_style,
				class: spec.class,
				metadata: spec.extra,
			},
		)
	}

	/// Label used for nodes created without attributes.
	pub fn named(id: &str) -> Self {
		Self::from_spec(NodeSpec::new(id)).1
	}
}

/// Display attributes stored for an edge.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeLabel {
	/// Text drawn at the path midpoint.
	pub label: Option<String>,
	/// Marker at the target end.
	pub arrowhead: Arrowhead,
	/// Inline CSS for the path.
	pub style: Option<String>,
	/// Inline CSS for the arrowhead.
	pub arrowhead_style: Option<String>,
	/// Inline CSS for the label.
	pub label_style: Option<String>,
	/// Extra CSS class.
	pub class: Option<String>,
	/// Minimum rank distance, at least 1.
	pub minlen: u32,
	/// Pull of the edge during ordering, 1 by default.
	pub weight: f64,
	/// Unrecognized attributes, kept verbatim.
	pub metadata: Map<String, Value>,
}

impl Default for EdgeLabel {
	fn default() -> Self {
		Self::from_spec(EdgeSpec::default()).1
	}
}

impl EdgeLabel {
	/// Split an edge record into its endpoint pair and stored label.
	pub fn from_spec(spec: EdgeSpec) -> ((String, String), Self) {
		(
			(spec.from, spec.to),
			Self {
				label: spec.label.filter(|l| !l.is_empty()),
				arrowhead: spec.arrowhead,
				style: spec.style,
				arrowhead_style: spec.arrowhead_style,
				label_style: spec.label_style,
				class: spec.class,
				minlen: spec.minlen.unwrap_or(1).max(1),
				weight: spec.weight.unwrap_or(1.0),
				metadata: spec.extra,
			},
		)
	}
}

/// Direction in which ranks are stacked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RankDir {
	/// Top to bottom.
	#[default]
	TB,
	/// Bottom to top.
	BT,
	/// Left to right.
	LR,
	/// Right to left.
	RL,
}

impl RankDir {
	/// Ranks advance along the horizontal axis.
	pub fn is_horizontal(self) -> bool {
		matches!(self, RankDir::LR | RankDir::RL)
	}
}

/// Animated position change applied when the scene is redrawn.
///
/// Purely cosmetic: layout never reads it.
#[derive(Clone, Copy, Debug)]
pub struct Transition {
	/// Length of the animation.
	pub duration_ms: f64,
	/// Maps linear progress in `[0, 1]` to eased progress.
	pub ease: fn(f64) -> f64,
}

impl Transition {
	/// Transition over `duration_ms` with cubic in-out easing.
	pub fn new(duration_ms: f64) -> Self {
		Self {
			duration_ms,
			ease: ease_cubic_in_out,
		}
	}

	/// Eased progress after `elapsed_ms`, clamped to `[0, 1]`.
	pub fn progress(&self, elapsed_ms: f64) -> f64 {
		if self.duration_ms <= 0.0 {
			return 1.0;
		}
		(self.ease)((elapsed_ms / self.duration_ms).clamp(0.0, 1.0))
	}
}

/// Symmetric cubic easing.
pub fn ease_cubic_in_out(t: f64) -> f64 {
	let t = t.clamp(0.0, 1.0) * 2.0;
	if t <= 1.0 {
		t * t * t / 2.0
	} else {
		let t = t - 2.0;
		(t * t * t + 2.0) / 2.0
	}
}

/// Graph-level layout configuration.
#[derive(Clone, Debug)]
pub struct GraphConfig {
	/// Left and right margin. `None` until set.
	pub marginx: Option<f64>,
	/// Top and bottom margin. `None` until set.
	pub marginy: Option<f64>,
	/// Direction the ranks advance in.
	pub rankdir: RankDir,
	/// Horizontal gap between adjacent nodes in a rank.
	pub nodesep: f64,
	/// Gap between adjacent edge bends in a rank.
	pub edgesep: f64,
	/// Gap between ranks.
	pub ranksep: f64,
	/// Animation applied to layout changes.
	pub transition: Option<Transition>,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			marginx: None,
			marginy: None,
			rankdir: RankDir::TB,
			nodesep: 50.0,
			edgesep: 20.0,
			ranksep: 50.0,
			transition: None,
		}
	}
}

#[derive(Clone, Debug)]
struct ModelNode {
	id: String,
	label: NodeLabel,
}

/// Mutable directed graph with string node keys.
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
	graph: StableDiGraph<ModelNode, EdgeLabel>,
	index: HashMap<String, NodeIndex>,
	config: GraphConfig,
}

impl GraphModel {
	/// Empty model with the default configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Replace the graph-level configuration.
	pub fn set_graph(&mut self, config: GraphConfig) -> &mut Self {
		self.config = config;
		self
	}

	/// Graph-level configuration.
	pub fn graph(&self) -> &GraphConfig {
		&self.config
	}

	/// Mutable graph-level configuration.
	pub fn graph_mut(&mut self) -> &mut GraphConfig {
		&mut self.config
	}

	/// Insert a node, or replace the label of the node with the same id.
	pub fn set_node(&mut self, id: impl Into<String>, label: NodeLabel) -> &mut Self {
		let id = id.into();
		match self.index.get(&id) {
			Some(&idx) => {
				if let Some(node) = self.graph.node_weight_mut(idx) {
					node.label = label;
				}
			}
			None => {
				let idx = self.graph.add_node(ModelNode {
					id: id.clone(),
					label,
				});
				self.index.insert(id, idx);
			}
		}
		self
	}

	/// Insert a directed edge, or replace the label of the edge with the same
	/// endpoint pair. Both endpoints must already exist.
	pub fn set_edge(&mut self, from: &str, to: &str, label: EdgeLabel) -> Result<&mut Self> {
		let src = self.require(from, from, to)?;
		let dst = self.require(to, from, to)?;
		match self.graph.find_edge(src, dst) {
			Some(edge) => {
				if let Some(weight) = self.graph.edge_weight_mut(edge) {
					*weight = label;
				}
			}
			None => {
				self.graph.add_edge(src, dst, label);
			}
		}
		Ok(self)
	}

	fn require(&self, id: &str, from: &str, to: &str) -> Result<NodeIndex> {
		self.index
			.get(id)
			.copied()
			.ok_or_else(|| GraphError::DanglingEdge {
				from: from.to_string(),
				to: to.to_string(),
				missing: id.to_string(),
			})
	}

	/// Remove a node and every edge touching it.
	pub fn remove_node(&mut self, id: &str) -> bool {
		match self.index.remove(id) {
			Some(idx) => self.graph.remove_node(idx).is_some(),
			None => false,
		}
	}

	/// Drop every node and edge. Graph configuration is kept.
	pub fn clear(&mut self) {
		self.graph.clear();
		self.index.clear();
	}

	/// Whether a node with `id` exists.
	pub fn has_node(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	/// Label of node `id`.
	pub fn node(&self, id: &str) -> Option<&NodeLabel> {
		let idx = self.index.get(id)?;
		self.graph.node_weight(*idx).map(|n| &n.label)
	}

	/// Label of the edge `from -> to`.
	pub fn edge(&self, from: &str, to: &str) -> Option<&EdgeLabel> {
		let (src, dst) = (self.index.get(from)?, self.index.get(to)?);
		let edge = self.graph.find_edge(*src, *dst)?;
		self.graph.edge_weight(edge)
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.graph.node_count()
	}

	/// Number of edges.
	pub fn edge_count(&self) -> usize {
		self.graph.edge_count()
	}

	/// Nodes in index order.
	pub fn nodes(&self) -> impl Iterator<Item = (&str, &NodeLabel)> {
		self.graph
			.node_indices()
			.filter_map(|idx| self.graph.node_weight(idx))
			.map(|n| (n.id.as_str(), &n.label))
	}

	/// Edges as `(from, to, label)`.
	pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &EdgeLabel)> {
		self.graph.edge_indices().filter_map(|edge| {
			let (src, dst) = self.graph.edge_endpoints(edge)?;
			let label = self.graph.edge_weight(edge)?;
			Some((
				self.graph.node_weight(src)?.id.as_str(),
				self.graph.node_weight(dst)?.id.as_str(),
				label,
			))
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn model_with(ids: &[&str]) -> GraphModel {
		let mut model = GraphModel::new();
		for id in ids {
			model.set_node(*id, NodeLabel::named(id));
		}
		model
	}

	#[test]
	fn test_node_upsert_replaces_label() {
		let mut model = model_with(&["a"]);
		let (id, label) = NodeLabel::from_spec(NodeSpec::new("a").with_label("Alpha"));
		model.set_node(id, label);

		assert_eq!(model.node_count(), 1);
		assert_eq!(model.node("a").unwrap().label, "Alpha");
	}

	#[test]
	fn test_label_defaults_to_id() {
		let model = model_with(&["lonely"]);
		let node = model.node("lonely").unwrap();
		assert_eq!(node.label, "lonely");
		assert_eq!(node.padding, DEFAULT_PADDING);
		assert_eq!(node.shape, Shape::Rect);
	}

	#[test]
	fn test_parallel_edges_collapse() {
		let mut model = model_with(&["a", "b"]);
		model.set_edge("a", "b", EdgeLabel::default()).unwrap();
		let (_, label) = EdgeLabel::from_spec(EdgeSpec::new("a", "b").with_label("second"));
		model.set_edge("a", "b", label).unwrap();

		assert_eq!(model.edge_count(), 1);
		assert_eq!(model.edge("a", "b").unwrap().label.as_deref(), Some("second"));
		assert!(model.edge("b", "a").is_none());
	}

	#[test]
	fn test_dangling_edge_rejected() {
		let mut model = model_with(&["a"]);
		let err = model.set_edge("a", "ghost", EdgeLabel::default()).unwrap_err();
		match err {
			GraphError::DanglingEdge { missing, .. } => assert_eq!(missing, "ghost"),
			other => panic!("unexpected error: {other}"),
		}
		assert_eq!(model.edge_count(), 0);
	}

	#[test]
	fn test_remove_node_drops_incident_edges() {
		let mut model = model_with(&["a", "b", "c"]);
		model.set_edge("a", "b", EdgeLabel::default()).unwrap();
		model.set_edge("b", "c", EdgeLabel::default()).unwrap();

		assert!(model.remove_node("b"));
		assert!(!model.remove_node("b"));
		assert_eq!(model.node_count(), 2);
		assert_eq!(model.edge_count(), 0);
		assert!(!model.has_node("b"));
	}

	#[test]
	fn test_clear_keeps_config() {
		let mut model = model_with(&["a", "b"]);
		model.graph_mut().marginx = Some(7.0);
		model.set_edge("a", "b", EdgeLabel::default()).unwrap();
		model.clear();

		assert_eq!(model.node_count(), 0);
		assert_eq!(model.edge_count(), 0);
		assert_eq!(model.graph().marginx, Some(7.0));
	}

	#[test]
	fn test_edges_report_endpoint_ids() {
		let mut model = model_with(&["x", "y"]);
		model.set_edge("y", "x", EdgeLabel::default()).unwrap();
		let edges: Vec<_> = model.edges().map(|(f, t, _)| (f, t)).collect();
		assert_eq!(edges, vec![("y", "x")]);
	}

	#[test]
	fn test_minlen_is_at_least_one() {
		let mut spec = EdgeSpec::new("a", "b");
		spec.minlen = Some(0);
		let (_, label) = EdgeLabel::from_spec(spec);
		assert_eq!(label.minlen, 1);
	}

	#[test]
	fn test_transition_progress() {
		let transition = Transition::new(500.0);
		assert_eq!(transition.progress(0.0), 0.0);
		assert_eq!(transition.progress(250.0), 0.5);
		assert_eq!(transition.progress(500.0), 1.0);
		assert_eq!(transition.progress(900.0), 1.0);
		assert_eq!(Transition::new(0.0).progress(0.0), 1.0);
	}
}
