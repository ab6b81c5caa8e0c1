//! Visual primitives drawn into the nested group.
//!
//! A [`Scene`] is the pure-data form of the rendered tree: one [`NodeShape`]
//! per model node and one [`EdgePath`] per model edge, keyed so the DOM
//! layer can update existing elements in place.

use super::layout::{Layout, Point};
use super::model::GraphModel;
use super::types::{Arrowhead, Shape};

/// Arrowhead length along the edge direction.
pub const ARROW_LENGTH: f64 = 10.0;
/// Arrowhead width across the edge direction.
pub const ARROW_WIDTH: f64 = 8.0;

fn lerp(a: f64, b: f64, t: f64) -> f64 {
	if t >= 1.0 {
		return b;
	}
	a + (b - a) * t
}

fn lerp_point(a: Point, b: Point, t: f64) -> Point {
	(lerp(a.0, b.0, t), lerp(a.1, b.1, t))
}

fn points_attr(points: &[Point]) -> String {
	points
		.iter()
		.map(|(x, y)| format!("{x},{y}"))
		.collect::<Vec<_>>()
		.join(" ")
}

/// A node outline with its label, centred on `(x, y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeShape {
	/// Node id.
	pub id: String,
	/// Outline shape.
	pub shape: Shape,
	/// Centre x.
	pub x: f64,
	/// Centre y.
	pub y: f64,
	/// Outline width.
	pub width: f64,
	/// Outline height.
	pub height: f64,
	/// Corner radius along x.
	pub rx: f64,
	/// Corner radius along y.
	pub ry: f64,
	/// Label text.
	pub label: String,
	/// Inline CSS for the outline.
	pub style: Option<String>,
	/// Inline CSS for the label.
	pub label_style: Option<String>,
	/// Extra CSS class.
	pub class: Option<String>,
	/// Group opacity; new nodes fade in from 0.
	pub opacity: f64,
}

impl NodeShape {
	/// `transform` attribute of the node group.
	pub fn transform(&self) -> String {
		format!("translate({},{})", self.x, self.y)
	}

	/// `class` attribute of the node group.
	pub fn class_name(&self) -> String {
		match &self.class {
			Some(extra) => format!("node {extra}"),
			None => "node".to_string(),
		}
	}

	/// Polygon points of a diamond outline, relative to the centre.
	pub fn diamond_points(&self) -> String {
		let (hw, hh) = (self.width / 2.0, self.height / 2.0);
		points_attr(&[(0.0, -hh), (hw, 0.0), (0.0, hh), (-hw, 0.0)])
	}

	/// Label split into one entry per line.
	pub fn label_lines(&self) -> Vec<&str> {
		self.label.lines().collect()
	}

	fn tween(&self, target: &NodeShape, t: f64) -> NodeShape {
		NodeShape {
			x: lerp(self.x, target.x, t),
			y: lerp(self.y, target.y, t),
			width: lerp(self.width, target.width, t),
			height: lerp(self.height, target.height, t),
			opacity: lerp(self.opacity, target.opacity, t),
			..target.clone()
		}
	}
}

/// A routed edge with its arrowhead and optional label.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgePath {
	/// Source node id.
	pub from: String,
	/// Target node id.
	pub to: String,
	/// Line points; the last one sits at the arrowhead base.
	pub points: Vec<Point>,
	/// Arrowhead kind.
	pub arrowhead: Arrowhead,
	/// Closed arrowhead outline, absent for undirected edges.
	pub arrow: Option<Vec<Point>>,
	/// Edge label.
	pub label: Option<String>,
	/// Label anchor at the path midpoint.
	pub label_pos: Option<Point>,
	/// Inline CSS for the path.
	pub style: Option<String>,
	/// Inline CSS for the arrowhead.
	pub arrowhead_style: Option<String>,
	/// Inline CSS for the label.
	pub label_style: Option<String>,
	/// Extra CSS class.
	pub class: Option<String>,
	/// Group opacity.
	pub opacity: f64,
}

impl EdgePath {
	/// Identity of the edge within a scene.
	pub fn key(&self) -> (&str, &str) {
		(&self.from, &self.to)
	}

	/// SVG path data for the edge line.
	pub fn path_data(&self) -> String {
		let mut d = String::new();
		for (i, (x, y)) in self.points.iter().enumerate() {
			let cmd = if i == 0 { 'M' } else { 'L' };
			if i > 0 {
				d.push(' ');
			}
			d.push_str(&format!("{cmd}{x},{y}"));
		}
		d
	}

	/// Polygon points of the arrowhead.
	pub fn arrow_points(&self) -> Option<String> {
		self.arrow.as_deref().map(points_attr)
	}

	/// `class` attribute of the edge group.
	pub fn class_name(&self) -> String {
		match &self.class {
			Some(extra) => format!("edgePath {extra}"),
			None => "edgePath".to_string(),
		}
	}

	fn tween(&self, target: &EdgePath, t: f64) -> EdgePath {
		let compatible = self.points.len() == target.points.len()
			&& self.arrow.as_ref().map(Vec::len) == target.arrow.as_ref().map(Vec::len);
		if !compatible {
			return target.clone();
		}
		let zip = |a: &[Point], b: &[Point]| -> Vec<Point> {
			a.iter().zip(b).map(|(&p, &q)| lerp_point(p, q, t)).collect()
		};
		EdgePath {
			points: zip(&self.points, &target.points),
			arrow: match (&self.arrow, &target.arrow) {
				(Some(a), Some(b)) => Some(zip(a, b)),
				_ => target.arrow.clone(),
			},
			label_pos: match (self.label_pos, target.label_pos) {
				(Some(a), Some(b)) => Some(lerp_point(a, b, t)),
				_ => target.label_pos,
			},
			opacity: lerp(self.opacity, target.opacity, t),
			..target.clone()
		}
	}
}

/// Shorten the line to the arrowhead base and build the arrowhead outline.
fn attach_arrow(points: &mut [Point], arrowhead: Arrowhead) -> Option<Vec<Point>> {
	if arrowhead == Arrowhead::Undirected || points.len() < 2 {
		return None;
	}
	let tip = points[points.len() - 1];
	let prev = points[points.len() - 2];
	let (dx, dy) = (tip.0 - prev.0, tip.1 - prev.1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return None;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let length = ARROW_LENGTH.min(dist);
	let base = (tip.0 - ux * length, tip.1 - uy * length);
	let (px, py) = (-uy * ARROW_WIDTH / 2.0, ux * ARROW_WIDTH / 2.0);

	let (outline, line_end) = match arrowhead {
		Arrowhead::Vee => {
			let notch = (tip.0 - ux * length * 0.6, tip.1 - uy * length * 0.6);
			(
				vec![tip, (base.0 + px, base.1 + py), notch, (base.0 - px, base.1 - py)],
				notch,
			)
		}
		_ => (
			vec![tip, (base.0 + px, base.1 + py), (base.0 - px, base.1 - py)],
			base,
		),
	};
	if let Some(last) = points.last_mut() {
		*last = line_end;
	}
	Some(outline)
}

/// Complete visual tree for one layout.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	/// One shape per model node.
	pub nodes: Vec<NodeShape>,
	/// One path per model edge.
	pub edges: Vec<EdgePath>,
	/// Drawing width including margins.
	pub width: f64,
	/// Drawing height including margins.
	pub height: f64,
}

impl Scene {
	/// Turn a layout into drawable primitives, pulling display attributes
	/// from the model.
	pub fn build(model: &GraphModel, layout: &Layout) -> Self {
		let nodes = layout
			.nodes
			.iter()
			.filter_map(|geom| {
				let label = model.node(&geom.id)?;
				Some(NodeShape {
					id: geom.id.clone(),
					shape: label.shape,
					x: geom.x,
					y: geom.y,
					width: geom.width,
					height: geom.height,
					rx: label.rx,
					ry: label.ry,
					label: label.label.clone(),
					style: label.style.clone(),
					label_style: label.label_style.clone(),
					class: label.class.clone(),
					opacity: 1.0,
				})
			})
			.collect();

		let edges = layout
			.edges
			.iter()
			.filter_map(|geom| {
				let label = model.edge(&geom.from, &geom.to)?;
				let mut points = geom.points.clone();
				let arrow = attach_arrow(&mut points, label.arrowhead);
				Some(EdgePath {
					from: geom.from.clone(),
					to: geom.to.clone(),
					points,
					arrowhead: label.arrowhead,
					arrow,
					label: label.label.clone(),
					label_pos: geom.label_pos,
					style: label.style.clone(),
					arrowhead_style: label.arrowhead_style.clone(),
					label_style: label.label_style.clone(),
					class: label.class.clone(),
					opacity: 1.0,
				})
			})
			.collect();

		Self {
			nodes,
			edges,
			width: layout.width,
			height: layout.height,
		}
	}

	/// Shape of node `id`.
	pub fn node(&self, id: &str) -> Option<&NodeShape> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Path of the edge `from -> to`.
	pub fn edge(&self, from: &str, to: &str) -> Option<&EdgePath> {
		self.edges.iter().find(|e| e.key() == (from, to))
	}

	/// Scene at eased progress `t` between `self` and `target`.
	///
	/// Elements present in both move from their old to their new geometry;
	/// elements only in `target` fade in at their final position. Elements
	/// only in `self` are dropped.
	pub fn interpolate(&self, target: &Scene, t: f64) -> Scene {
		let t = t.clamp(0.0, 1.0);
		let nodes = target
			.nodes
			.iter()
			.map(|node| match self.node(&node.id) {
				Some(prev) => prev.tween(node, t),
				None => NodeShape {
					opacity: node.opacity * t,
					..node.clone()
				},
			})
			.collect();
		let edges = target
			.edges
			.iter()
			.map(|edge| match self.edge(&edge.from, &edge.to) {
				Some(prev) => prev.tween(edge, t),
				None => EdgePath {
					opacity: edge.opacity * t,
					..edge.clone()
				},
			})
			.collect();
		Scene {
			nodes,
			edges,
			width: lerp(self.width, target.width, t),
			height: lerp(self.height, target.height, t),
		}
	}
}
