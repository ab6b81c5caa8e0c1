//! Graph data structures for input to the graph view component.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::Result;

/// Outline drawn for a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
	/// Rectangle, rounded by `rx`/`ry` when set.
	#[default]
	Rect,
	/// Circle sized by the larger dimension.
	Circle,
	/// Ellipse inscribed in the node box.
	Ellipse,
	/// Diamond around the label box.
	Diamond,
}

/// Marker drawn at the target end of an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrowhead {
	/// Filled triangle.
	#[default]
	Normal,
	/// Notched arrow.
	Vee,
	/// No marker.
	Undirected,
}

/// A node record. `id` is required; everything else is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
	/// Unique identifier for this node. Used to reference nodes in edges.
	pub id: String,
	/// Display label. Falls back to the id when absent.
	pub label: Option<String>,
	/// Outline shape, `rect` by default.
	#[serde(default)]
	pub shape: Shape,
	/// Explicit outline width. Derived from the label when absent.
	pub width: Option<f64>,
	/// Explicit outline height. Derived from the label when absent.
	pub height: Option<f64>,
	/// Space between label and outline on every side.
	pub padding: Option<f64>,
	/// Horizontal corner radius of a `rect`.
	pub rx: Option<f64>,
	/// Vertical corner radius of a `rect`.
	pub ry: Option<f64>,
	/// Inline CSS applied to the outline.
	pub style: Option<String>,
	/// Inline CSS applied to the label text.
	pub label_style: Option<String>,
	/// Extra CSS class added to the node group.
	pub class: Option<String>,
	/// Any other attributes, carried through as metadata.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl NodeSpec {
	/// Node `id` with no attributes.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			..Self::default()
		}
	}

	/// Set the display label.
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Set the outline shape.
	pub fn with_shape(mut self, shape: Shape) -> Self {
		self.shape = shape;
		self
	}

	/// Set an explicit outline size.
	pub fn with_size(mut self, width: f64, height: f64) -> Self {
		self.width = Some(width);
		self.height = Some(height);
		self
	}
}

/// A directed edge record between two node ids.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeSpec {
	/// Source node ID.
	pub from: String,
	/// Target node ID.
	pub to: String,
	/// Text drawn at the path midpoint.
	pub label: Option<String>,
	/// Marker at the target end, `normal` by default.
	#[serde(default)]
	pub arrowhead: Arrowhead,
	/// Inline CSS applied to the path.
	pub style: Option<String>,
	/// Inline CSS applied to the arrowhead.
	pub arrowhead_style: Option<String>,
	/// Inline CSS applied to the label text.
	pub label_style: Option<String>,
	/// Extra CSS class added to the edge group.
	pub class: Option<String>,
	/// Minimum number of ranks between the endpoints.
	pub minlen: Option<u32>,
	/// Pull of this edge when ordering nodes within a rank.
	pub weight: Option<f64>,
	/// Any other attributes, carried through as metadata.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl EdgeSpec {
	/// Edge `from -> to` with no attributes.
	pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
		Self {
			from: from.into(),
			to: to.into(),
			..Self::default()
		}
	}

	/// Set the edge label.
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}
}

/// Complete graph payload: nodes and edges, both optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphSpec {
	/// Node records, upserted by id.
	pub nodes: Option<Vec<NodeSpec>>,
	/// Edge records, upserted by endpoint pair.
	pub edges: Option<Vec<EdgeSpec>>,
}

impl GraphSpec {
	/// Payload with both lists present.
	pub fn new(nodes: Vec<NodeSpec>, edges: Vec<EdgeSpec>) -> Self {
		Self {
			nodes: Some(nodes),
			edges: Some(edges),
		}
	}

	/// Decode a GraphSpec from its JSON form.
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	/// Number of node records.
	pub fn node_count(&self) -> usize {
		self.nodes.as_ref().map_or(0, Vec::len)
	}

	/// Number of edge records.
	pub fn edge_count(&self) -> usize {
		self.edges.as_ref().map_or(0, Vec::len)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_view::error::GraphError;

	#[test]
	fn test_parse_full_payload() {
		let spec = GraphSpec::from_json(
			r##"{
				"nodes": [
					{"id": "a", "label": "Start", "shape": "circle", "labelStyle": "fill: red", "owner": "ops"},
					{"id": "b"}
				],
				"edges": [
					{"from": "a", "to": "b", "arrowhead": "vee", "minlen": 2, "weight": 3}
				]
			}"##,
		)
		.unwrap();

		let nodes = spec.nodes.as_ref().unwrap();
		assert_eq!(nodes.len(), 2);
		assert_eq!(nodes[0].label.as_deref(), Some("Start"));
		assert_eq!(nodes[0].shape, Shape::Circle);
		assert_eq!(nodes[0].label_style.as_deref(), Some("fill: red"));
		assert_eq!(nodes[0].extra.get("owner"), Some(&Value::from("ops")));
		assert_eq!(nodes[1].shape, Shape::Rect);

		let edges = spec.edges.as_ref().unwrap();
		assert_eq!(edges[0].arrowhead, Arrowhead::Vee);
		assert_eq!(edges[0].minlen, Some(2));
		assert_eq!(edges[0].weight, Some(3.0));
	}

	#[test]
	fn test_nodes_and_edges_are_optional() {
		let spec = GraphSpec::from_json("{}").unwrap();
		assert!(spec.nodes.is_none());
		assert!(spec.edges.is_none());
		assert_eq!(spec.node_count(), 0);

		let spec = GraphSpec::from_json(r#"{"nodes": [{"id": "solo"}]}"#).unwrap();
		assert_eq!(spec.node_count(), 1);
		assert!(spec.edges.is_none());
	}

	#[test]
	fn test_missing_required_keys_fail() {
		let err = GraphSpec::from_json(r#"{"nodes": [{"label": "no id"}]}"#).unwrap_err();
		assert!(matches!(err, GraphError::Parse(_)));

		let err = GraphSpec::from_json(r#"{"edges": [{"from": "a"}]}"#).unwrap_err();
		assert!(matches!(err, GraphError::Parse(_)));
	}

	#[test]
	fn test_unknown_shape_fails() {
		let err = GraphSpec::from_json(r#"{"nodes": [{"id": "a", "shape": "hexagon"}]}"#)
			.unwrap_err();
		assert!(matches!(err, GraphError::Parse(_)));
	}
}
