//! Layered layout for directed graphs.
//!
//! The pipeline follows the usual hierarchical approach:
//! 1. Measure nodes from their labels (or explicit sizes)
//! 2. Break cycles by reversing DFS back edges
//! 3. Rank nodes by longest path, respecting `minlen`
//! 4. Split long edges into one bend point per intermediate rank
//! 5. Order each rank with barycenter sweeps, keeping the fewest crossings
//! 6. Assign coordinates, then orient by `rankdir` and apply margins
//!
//! All coordinates in the returned [`Layout`] are node centres in the
//! nested group's coordinate space.

use std::collections::{HashMap, VecDeque};
use std::f64::consts::SQRT_2;

use super::model::{GraphConfig, GraphModel, MAX_MINLEN, NodeLabel, RankDir};
use super::types::Shape;

/// Approximate advance of one label character.
pub const CHAR_WIDTH: f64 = 7.0;
/// Height of one label line.
pub const LINE_HEIGHT: f64 = 18.0;

const ORDER_SWEEPS: usize = 8;
const POSITION_SWEEPS: usize = 4;
const SELF_LOOP_REACH: f64 = 20.0;

/// A point in layout space.
pub type Point = (f64, f64);

/// Final placement of a node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeGeometry {
	/// Node id.
	pub id: String,
	/// Centre x.
	pub x: f64,
	/// Centre y.
	pub y: f64,
	/// Outline width.
	pub width: f64,
	/// Outline height.
	pub height: f64,
	/// Rank index, 0 for the first rank.
	pub rank: usize,
}

/// Final route of an edge, from the source outline to the target outline.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeGeometry {
	/// Source node id.
	pub from: String,
	/// Target node id.
	pub to: String,
	/// Route points, source outline first.
	pub points: Vec<Point>,
	/// Label anchor, set when the edge has a label.
	pub label_pos: Option<Point>,
}

/// Result of laying out a [`GraphModel`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
	/// Nodes in model order.
	pub nodes: Vec<NodeGeometry>,
	/// Edges in model order.
	pub edges: Vec<EdgeGeometry>,
	/// Drawing width including both horizontal margins.
	pub width: f64,
	/// Drawing height including both vertical margins.
	pub height: f64,
}

impl Layout {
	/// Geometry of node `id`.
	pub fn node(&self, id: &str) -> Option<&NodeGeometry> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Geometry of the edge `from -> to`.
	pub fn edge(&self, from: &str, to: &str) -> Option<&EdgeGeometry> {
		self.edges.iter().find(|e| e.from == from && e.to == to)
	}
}

/// Outline size of a node: explicit dimensions win, otherwise the label
/// plus padding, adjusted so the label fits inside the shape.
pub fn node_size(label: &NodeLabel) -> (f64, f64) {
	let lines = label.label.lines().count().max(1) as f64;
	let chars = label
		.label
		.lines()
		.map(|line| line.chars().count())
		.max()
		.unwrap_or(0) as f64;
	let text_w = chars * CHAR_WIDTH + 2.0 * label.padding;
	let text_h = lines * LINE_HEIGHT + 2.0 * label.padding;

	let factor = if label.shape == Shape::Diamond {
		SQRT_2
	} else {
		1.0
	};
	let width = label.width.unwrap_or(text_w * factor);
	let height = label.height.unwrap_or(text_h * factor);

	match label.shape {
		Shape::Circle => {
			let d = width.max(height);
			(d, d)
		}
		_ => (width, height),
	}
}

/// Point where the segment from the node centre toward `toward` leaves the
/// node outline.
pub fn intersect(node: &NodeGeometry, shape: Shape, toward: Point) -> Point {
	let (dx, dy) = (toward.0 - node.x, toward.1 - node.y);
	if dx.abs() < f64::EPSILON && dy.abs() < f64::EPSILON {
		return (node.x, node.y);
	}
	let (hw, hh) = (node.width / 2.0, node.height / 2.0);

	let t = match shape {
		Shape::Rect => {
			if dy.abs() * hw > dx.abs() * hh {
				hh / dy.abs()
			} else {
				hw / dx.abs()
			}
		}
		Shape::Circle | Shape::Ellipse => {
			let r = if shape == Shape::Circle {
				(hw.min(hh), hw.min(hh))
			} else {
				(hw, hh)
			};
			1.0 / ((dx * dx) / (r.0 * r.0) + (dy * dy) / (r.1 * r.1)).sqrt()
		}
		Shape::Diamond => 1.0 / (dx.abs() / hw + dy.abs() / hh),
	};
	if !t.is_finite() {
		return (node.x, node.y);
	}
	(node.x + dx * t, node.y + dy * t)
}

/// Point halfway along a polyline, measured by length.
pub fn midpoint(points: &[Point]) -> Option<Point> {
	let first = *points.first()?;
	let lengths: Vec<f64> = points
		.windows(2)
		.map(|p| ((p[1].0 - p[0].0).powi(2) + (p[1].1 - p[0].1).powi(2)).sqrt())
		.collect();
	let mut remaining = lengths.iter().sum::<f64>() / 2.0;
	for (pair, len) in points.windows(2).zip(&lengths) {
		if remaining <= *len && *len > 0.0 {
			let t = remaining / len;
			return Some((
				pair[0].0 + (pair[1].0 - pair[0].0) * t,
				pair[0].1 + (pair[1].1 - pair[0].1) * t,
			));
		}
		remaining -= len;
	}
	Some(first)
}

#[derive(Clone, Copy, Debug)]
struct InputEdge {
	from: usize,
	to: usize,
	minlen: usize,
	weight: f64,
	labelled: bool,
}

impl InputEdge {
	fn is_loop(&self) -> bool {
		self.from == self.to
	}

	/// Endpoints as used for ranking.
	fn oriented(&self, reversed: bool) -> (usize, usize) {
		if reversed {
			(self.to, self.from)
		} else {
			(self.from, self.to)
		}
	}
}

/// Lay out every node and edge of the model.
pub fn layout(model: &GraphModel) -> Layout {
	let config = model.graph();
	let (marginx, marginy) = (
		config.marginx.unwrap_or(0.0),
		config.marginy.unwrap_or(0.0),
	);

	let nodes: Vec<(&str, &NodeLabel)> = model.nodes().collect();
	if nodes.is_empty() {
		return Layout {
			width: 2.0 * marginx,
			height: 2.0 * marginy,
			..Layout::default()
		};
	}
	let index: HashMap<&str, usize> = nodes
		.iter()
		.enumerate()
		.map(|(i, (id, _))| (*id, i))
		.collect();

	let edges: Vec<InputEdge> = model
		.edges()
		.filter_map(|(from, to, label)| {
			Some(InputEdge {
				from: *index.get(from)?,
				to: *index.get(to)?,
				minlen: label.minlen.clamp(1, MAX_MINLEN) as usize,
				weight: label.weight,
				labelled: label.label.is_some(),
			})
		})
		.collect();

	let sizes: Vec<(f64, f64)> = nodes.iter().map(|(_, label)| node_size(label)).collect();
	let horizontal = config.rankdir.is_horizontal();
	let rank_sizes: Vec<(f64, f64)> = sizes
		.iter()
		.map(|&(w, h)| if horizontal { (h, w) } else { (w, h) })
		.collect();

	let reversed = break_cycles(nodes.len(), &edges);
	let ranks = assign_ranks(nodes.len(), &edges, &reversed);

	let mut layered = LayerGraph::build(&ranks, &rank_sizes, &edges, &reversed);
	layered.order();
	layered.position(config);

	let rankdir = config.rankdir;
	let mut placed: Vec<NodeGeometry> = nodes
		.iter()
		.zip(&sizes)
		.enumerate()
		.map(|(i, ((id, _), &(width, height)))| {
			let (x, y) = orient(layered.point(i), rankdir);
			NodeGeometry {
				id: id.to_string(),
				x,
				y,
				width,
				height,
				rank: ranks[i],
			}
		})
		.collect();

	let mut routes: Vec<(usize, usize, Vec<Point>, bool)> = Vec::with_capacity(edges.len());
	let mut chains = layered.chains.iter();
	for (edge, &rev) in edges.iter().zip(&reversed) {
		if edge.is_loop() {
			let node = &placed[edge.from];
			routes.push((edge.from, edge.to, self_loop(node), edge.labelled));
			continue;
		}
		let Some(chain) = chains.next() else {
			break;
		};
		let mut bends: Vec<Point> = chain
			.iter()
			.skip(1)
			.take(chain.len().saturating_sub(2))
			.map(|&v| orient(layered.point(v), rankdir))
			.collect();
		if rev {
			bends.reverse();
		}

		let (src, dst) = (&placed[edge.from], &placed[edge.to]);
		let start = intersect(
			src,
			nodes[edge.from].1.shape,
			bends.first().copied().unwrap_or((dst.x, dst.y)),
		);
		let end = intersect(
			dst,
			nodes[edge.to].1.shape,
			bends.last().copied().unwrap_or((src.x, src.y)),
		);
		let mut points = Vec::with_capacity(bends.len() + 2);
		points.push(start);
		points.extend(bends);
		points.push(end);
		routes.push((edge.from, edge.to, points, edge.labelled));
	}

	// Translate so the bounding box starts at the margins.
	let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
	let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
	for node in &placed {
		min_x = min_x.min(node.x - node.width / 2.0);
		max_x = max_x.max(node.x + node.width / 2.0);
		min_y = min_y.min(node.y - node.height / 2.0);
		max_y = max_y.max(node.y + node.height / 2.0);
	}
	for (_, _, points, _) in &routes {
		for &(x, y) in points {
			min_x = min_x.min(x);
			max_x = max_x.max(x);
			min_y = min_y.min(y);
			max_y = max_y.max(y);
		}
	}
	let (dx, dy) = (marginx - min_x, marginy - min_y);
	for node in &mut placed {
		node.x += dx;
		node.y += dy;
	}

	let edges = routes
		.into_iter()
		.map(|(from, to, points, labelled)| {
			let points: Vec<Point> = points.into_iter().map(|(x, y)| (x + dx, y + dy)).collect();
			let label_pos = if labelled { midpoint(&points) } else { None };
			EdgeGeometry {
				from: nodes[from].0.to_string(),
				to: nodes[to].0.to_string(),
				points,
				label_pos,
			}
		})
		.collect();

	Layout {
		nodes: placed,
		edges,
		width: max_x - min_x + 2.0 * marginx,
		height: max_y - min_y + 2.0 * marginy,
	}
}

fn orient(p: Point, rankdir: RankDir) -> Point {
	match rankdir {
		RankDir::TB => p,
		RankDir::BT => (p.0, -p.1),
		RankDir::LR => (p.1, p.0),
		RankDir::RL => (-p.1, p.0),
	}
}

fn self_loop(node: &NodeGeometry) -> Vec<Point> {
	let right = node.x + node.width / 2.0;
	let (top, bottom) = (node.y - node.height / 4.0, node.y + node.height / 4.0);
	vec![
		(right, top),
		(right + SELF_LOOP_REACH, top),
		(right + SELF_LOOP_REACH, bottom),
		(right, bottom),
	]
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
	New,
	Active,
	Done,
}

/// Mark the DFS back edges; reversing them makes the graph acyclic.
fn break_cycles(n: usize, edges: &[InputEdge]) -> Vec<bool> {
	let mut out: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
	for (e, edge) in edges.iter().enumerate() {
		if !edge.is_loop() {
			out[edge.from].push((e, edge.to));
		}
	}

	let mut reversed = vec![false; edges.len()];
	let mut state = vec![Visit::New; n];
	for root in 0..n {
		if state[root] != Visit::New {
			continue;
		}
		state[root] = Visit::Active;
		let mut stack = vec![(root, 0usize)];
		while let Some(&(v, next)) = stack.last() {
			match out[v].get(next) {
				Some(&(e, w)) => {
					if let Some(top) = stack.last_mut() {
						top.1 += 1;
					}
					match state[w] {
						Visit::Active => reversed[e] = true,
						Visit::New => {
							state[w] = Visit::Active;
							stack.push((w, 0));
						}
						Visit::Done => {}
					}
				}
				None => {
					state[v] = Visit::Done;
					stack.pop();
				}
			}
		}
	}
	reversed
}

/// Longest-path ranking over the acyclic orientation. Sources are pulled
/// down next to their nearest successor so they do not all sit on rank 0.
fn assign_ranks(n: usize, edges: &[InputEdge], reversed: &[bool]) -> Vec<usize> {
	let mut succ: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
	let mut indegree = vec![0usize; n];
	for (edge, &rev) in edges.iter().zip(reversed) {
		if edge.is_loop() {
			continue;
		}
		let (u, v) = edge.oriented(rev);
		succ[u].push((v, edge.minlen));
		indegree[v] += 1;
	}
	let has_pred: Vec<bool> = indegree.iter().map(|&d| d > 0).collect();

	let mut rank = vec![0usize; n];
	let mut queue: VecDeque<usize> = (0..n).filter(|&v| indegree[v] == 0).collect();
	while let Some(u) = queue.pop_front() {
		for &(v, minlen) in &succ[u] {
			rank[v] = rank[v].max(rank[u] + minlen);
			indegree[v] -= 1;
			if indegree[v] == 0 {
				queue.push_back(v);
			}
		}
	}

	for u in 0..n {
		if has_pred[u] {
			continue;
		}
		if let Some(r) = succ[u].iter().map(|&(v, minlen)| rank[v] - minlen).min() {
			rank[u] = r;
		}
	}

	let lowest = rank.iter().copied().min().unwrap_or(0);
	rank.iter().map(|r| r - lowest).collect()
}

/// A node in the layered graph: a real node or an edge bend point.
#[derive(Clone, Debug)]
struct LayerNode {
	width: f64,
	height: f64,
	rank: usize,
	real: bool,
	x: f64,
	y: f64,
}

/// Proper layered graph: every segment joins adjacent ranks.
struct LayerGraph {
	nodes: Vec<LayerNode>,
	preds: Vec<Vec<(usize, f64)>>,
	succs: Vec<Vec<(usize, f64)>>,
	layers: Vec<Vec<usize>>,
	/// Per non-loop input edge, the layer nodes from ranked source to
	/// ranked target.
	chains: Vec<Vec<usize>>,
}

impl LayerGraph {
	fn build(
		ranks: &[usize],
		sizes: &[(f64, f64)],
		edges: &[InputEdge],
		reversed: &[bool],
	) -> Self {
		let mut nodes: Vec<LayerNode> = ranks
			.iter()
			.zip(sizes)
			.map(|(&rank, &(width, height))| LayerNode {
				width,
				height,
				rank,
				real: true,
				x: 0.0,
				y: 0.0,
			})
			.collect();

		let mut segments = Vec::new();
		let mut chains = Vec::new();
		for (edge, &rev) in edges.iter().zip(reversed) {
			if edge.is_loop() {
				continue;
			}
			let (u, v) = edge.oriented(rev);
			let mut chain = vec![u];
			for rank in ranks[u] + 1..ranks[v] {
				nodes.push(LayerNode {
					width: 0.0,
					height: 0.0,
					rank,
					real: false,
					x: 0.0,
					y: 0.0,
				});
				chain.push(nodes.len() - 1);
			}
			chain.push(v);
			for pair in chain.windows(2) {
				segments.push((pair[0], pair[1], edge.weight));
			}
			chains.push(chain);
		}

		let mut preds = vec![Vec::new(); nodes.len()];
		let mut succs = vec![Vec::new(); nodes.len()];
		for &(upper, lower, weight) in &segments {
			succs[upper].push((lower, weight));
			preds[lower].push((upper, weight));
		}

		// Initial order: depth-first from the top ranks, so bend points
		// start out next to the edges they belong to.
		let max_rank = nodes.iter().map(|n| n.rank).max().unwrap_or(0);
		let mut layers = vec![Vec::new(); max_rank + 1];
		let mut visited = vec![false; nodes.len()];
		let mut roots: Vec<usize> = (0..nodes.len()).collect();
		roots.sort_by_key(|&v| nodes[v].rank);
		for root in roots {
			let mut stack = vec![root];
			while let Some(v) = stack.pop() {
				if visited[v] {
					continue;
				}
				visited[v] = true;
				layers[nodes[v].rank].push(v);
				for &(w, _) in succs[v].iter().rev() {
					if !visited[w] {
						stack.push(w);
					}
				}
			}
		}

		Self {
			nodes,
			preds,
			succs,
			layers,
			chains,
		}
	}

	fn point(&self, v: usize) -> Point {
		(self.nodes[v].x, self.nodes[v].y)
	}

	fn positions(&self) -> Vec<usize> {
		let mut pos = vec![0; self.nodes.len()];
		for layer in &self.layers {
			for (i, &v) in layer.iter().enumerate() {
				pos[v] = i;
			}
		}
		pos
	}

	fn crossings(&self) -> usize {
		let pos = &self.positions();
		let mut total = 0;
		for layer in &self.layers {
			let segments: Vec<(usize, usize)> = layer
				.iter()
				.flat_map(|&u| self.succs[u].iter().map(move |&(v, _)| (pos[u], pos[v])))
				.collect();
			for (i, a) in segments.iter().enumerate() {
				for b in &segments[i + 1..] {
					if (a.0 < b.0 && a.1 > b.1) || (a.0 > b.0 && a.1 < b.1) {
						total += 1;
					}
				}
			}
		}
		total
	}

	fn order(&mut self) {
		let mut best = self.layers.clone();
		let mut best_crossings = self.crossings();
		for sweep in 0..ORDER_SWEEPS {
			if best_crossings == 0 {
				break;
			}
			self.sweep(sweep % 2 == 0);
			let crossings = self.crossings();
			if crossings < best_crossings {
				best_crossings = crossings;
				best = self.layers.clone();
			}
		}
		self.layers = best;
	}

	/// Reorder every rank by the weighted barycenter of its neighbours in
	/// the previous rank (`down`) or the next rank.
	fn sweep(&mut self, down: bool) {
		let mut pos = self.positions();
		let count = self.layers.len();
		let ranks: Vec<usize> = if down {
			(1..count).collect()
		} else {
			(0..count.saturating_sub(1)).rev().collect()
		};

		for r in ranks {
			let mut keyed: Vec<(f64, usize)> = self.layers[r]
				.iter()
				.map(|&v| {
					let neighbours = if down { &self.preds[v] } else { &self.succs[v] };
					let total: f64 = neighbours.iter().map(|&(_, w)| w).sum();
					let barycenter = if neighbours.is_empty() || total <= 0.0 {
						pos[v] as f64
					} else {
						neighbours
							.iter()
							.map(|&(u, w)| pos[u] as f64 * w)
							.sum::<f64>() / total
					};
					(barycenter, v)
				})
				.collect();
			keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
			self.layers[r] = keyed.into_iter().map(|(_, v)| v).collect();
			for (i, &v) in self.layers[r].iter().enumerate() {
				pos[v] = i;
			}
		}
	}

	fn position(&mut self, config: &GraphConfig) {
		let mut y = 0.0;
		let mut previous_half: Option<f64> = None;
		for layer in &self.layers {
			let height = layer
				.iter()
				.map(|&v| self.nodes[v].height)
				.fold(0.0, f64::max);
			y = match previous_half {
				Some(half) => y + half + config.ranksep + height / 2.0,
				None => height / 2.0,
			};
			for &v in layer {
				self.nodes[v].y = y;
			}
			previous_half = Some(height / 2.0);
		}

		for layer in &self.layers {
			let mut x = 0.0;
			for (i, &v) in layer.iter().enumerate() {
				if i > 0 {
					x += separation(&self.nodes[layer[i - 1]], &self.nodes[v], config);
				}
				self.nodes[v].x = x;
			}
			let shift = x / 2.0;
			for &v in layer {
				self.nodes[v].x -= shift;
			}
		}

		let count = self.layers.len();
		for sweep in 0..POSITION_SWEEPS {
			let down = sweep % 2 == 0;
			let ranks: Vec<usize> = if down {
				(1..count).collect()
			} else {
				(0..count.saturating_sub(1)).rev().collect()
			};
			for r in ranks {
				let layer = self.layers[r].clone();
				let desired: Vec<f64> = layer
					.iter()
					.map(|&v| {
						let neighbours = if down { &self.preds[v] } else { &self.succs[v] };
						let total: f64 = neighbours.iter().map(|&(_, w)| w).sum();
						if neighbours.is_empty() || total <= 0.0 {
							self.nodes[v].x
						} else {
							neighbours
								.iter()
								.map(|&(u, w)| self.nodes[u].x * w)
								.sum::<f64>() / total
						}
					})
					.collect();
				let gaps: Vec<f64> = layer
					.windows(2)
					.map(|p| separation(&self.nodes[p[0]], &self.nodes[p[1]], config))
					.collect();
				for (&v, x) in layer.iter().zip(pack(&desired, &gaps)) {
					self.nodes[v].x = x;
				}
			}
		}
	}
}

/// Minimum centre distance between neighbours in a rank.
fn separation(a: &LayerNode, b: &LayerNode, config: &GraphConfig) -> f64 {
	let gap = match (a.real, b.real) {
		(true, true) => config.nodesep,
		(false, false) => config.edgesep,
		_ => (config.nodesep + config.edgesep) / 2.0,
	};
	(a.width + b.width) / 2.0 + gap
}

/// Place values as close to `desired` as possible while keeping
/// consecutive entries at least `gaps[i]` apart. Averages a left-biased and
/// a right-biased packing, both of which respect the gaps.
fn pack(desired: &[f64], gaps: &[f64]) -> Vec<f64> {
	let n = desired.len();
	let mut left = desired.to_vec();
	for i in 1..n {
		left[i] = left[i].max(left[i - 1] + gaps[i - 1]);
	}
	let mut right = desired.to_vec();
	for i in (0..n.saturating_sub(1)).rev() {
		right[i] = right[i].min(right[i + 1] - gaps[i]);
	}
	left.iter().zip(&right).map(|(l, r)| (l + r) / 2.0).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_view::model::EdgeLabel;
	use crate::components::graph_view::types::{EdgeSpec, NodeSpec};

	fn model(ids: &[&str], edges: &[(&str, &str)]) -> GraphModel {
		let mut model = GraphModel::new();
		model.graph_mut().marginx = Some(20.0);
		model.graph_mut().marginy = Some(20.0);
		for id in ids {
			model.set_node(*id, NodeLabel::named(id));
		}
		for (from, to) in edges {
			model.set_edge(from, to, EdgeLabel::default()).unwrap();
		}
		model
	}

	fn overlaps(a: &NodeGeometry, b: &NodeGeometry) -> bool {
		(a.x - b.x).abs() < (a.width + b.width) / 2.0
			&& (a.y - b.y).abs() < (a.height + b.height) / 2.0
	}

	#[test]
	fn test_node_size_from_label() {
		let label = NodeLabel::named("abcd");
		assert_eq!(node_size(&label), (4.0 * CHAR_WIDTH + 20.0, LINE_HEIGHT + 20.0));

		let (_, circle) = NodeLabel::from_spec(NodeSpec::new("ab").with_shape(Shape::Circle));
		let (w, h) = node_size(&circle);
		assert_eq!(w, h);

		let (_, fixed) = NodeLabel::from_spec(NodeSpec::new("x").with_size(80.0, 30.0));
		assert_eq!(node_size(&fixed), (80.0, 30.0));
	}

	#[test]
	fn test_chain_ranks_top_to_bottom() {
		let layout = layout(&model(&["a", "b", "c"], &[("a", "b"), ("b", "c")]));
		let (a, b, c) = (
			layout.node("a").unwrap(),
			layout.node("b").unwrap(),
			layout.node("c").unwrap(),
		);
		assert_eq!((a.rank, b.rank, c.rank), (0, 1, 2));
		assert!(a.y < b.y && b.y < c.y);
	}

	#[test]
	fn test_margins_offset_drawing() {
		let layout = layout(&model(&["a"], &[]));
		let a = layout.node("a").unwrap();
		assert!((a.x - a.width / 2.0 - 20.0).abs() < 1e-9);
		assert!((a.y - a.height / 2.0 - 20.0).abs() < 1e-9);
		assert!((layout.width - (a.width + 40.0)).abs() < 1e-9);
		assert!((layout.height - (a.height + 40.0)).abs() < 1e-9);
	}

	#[test]
	fn test_same_rank_nodes_do_not_overlap() {
		let layout = layout(&model(
			&["root", "l", "m", "r"],
			&[("root", "l"), ("root", "m"), ("root", "r")],
		));
		let children: Vec<_> = ["l", "m", "r"]
			.iter()
			.map(|id| layout.node(id).unwrap())
			.collect();
		for (i, a) in children.iter().enumerate() {
			for b in &children[i + 1..] {
				assert_eq!(a.rank, b.rank);
				assert!(!overlaps(a, b), "{} overlaps {}", a.id, b.id);
			}
		}
	}

	#[test]
	fn test_cycle_is_laid_out() {
		let layout = layout(&model(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]));
		assert_eq!(layout.nodes.len(), 3);
		assert_eq!(layout.edges.len(), 3);
		let back = layout.edge("c", "a").unwrap();
		// Reversed for ranking, but still drawn from c to a.
		let (c, a) = (layout.node("c").unwrap(), layout.node("a").unwrap());
		let start = back.points.first().unwrap();
		let end = back.points.last().unwrap();
		assert!((start.1 - c.y).abs() < (end.1 - c.y).abs());
		assert!((end.1 - a.y).abs() < (start.1 - a.y).abs());
	}

	#[test]
	fn test_long_edge_gets_bend_points() {
		let layout = layout(&model(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("a", "c")]));
		let long = layout.edge("a", "c").unwrap();
		assert_eq!(long.points.len(), 3);
		assert_eq!(layout.edge("a", "b").unwrap().points.len(), 2);
	}

	#[test]
	fn test_minlen_stretches_ranks() {
		let mut m = model(&["a", "b"], &[]);
		let mut spec = EdgeSpec::new("a", "b");
		spec.minlen = Some(3);
		let (_, label) = EdgeLabel::from_spec(spec);
		m.set_edge("a", "b", label).unwrap();

		let layout = layout(&m);
		assert_eq!(layout.node("b").unwrap().rank - layout.node("a").unwrap().rank, 3);
	}

	#[test]
	fn test_left_to_right() {
		let mut m = model(&["a", "b"], &[("a", "b")]);
		m.graph_mut().rankdir = RankDir::LR;
		let layout = layout(&m);
		let (a, b) = (layout.node("a").unwrap(), layout.node("b").unwrap());
		assert!(a.x < b.x);
		assert!((a.y - b.y).abs() < 1e-9);
	}

	#[test]
	fn test_bottom_to_top() {
		let mut m = model(&["a", "b"], &[("a", "b")]);
		m.graph_mut().rankdir = RankDir::BT;
		let layout = layout(&m);
		assert!(layout.node("a").unwrap().y > layout.node("b").unwrap().y);
	}

	#[test]
	fn test_edge_endpoints_on_outline() {
		let layout = layout(&model(&["a", "b"], &[("a", "b")]));
		let (a, b) = (layout.node("a").unwrap(), layout.node("b").unwrap());
		let edge = layout.edge("a", "b").unwrap();
		let start = edge.points[0];
		let end = edge.points[1];
		assert!((start.1 - (a.y + a.height / 2.0)).abs() < 1e-9);
		assert!((end.1 - (b.y - b.height / 2.0)).abs() < 1e-9);
	}

	#[test]
	fn test_self_loop_drawn_beside_node() {
		let layout = layout(&model(&["a"], &[("a", "a")]));
		let a = layout.node("a").unwrap();
		let edge = layout.edge("a", "a").unwrap();
		assert_eq!(edge.points.len(), 4);
		assert!(edge.points.iter().all(|p| p.0 >= a.x + a.width / 2.0 - 1e-9));
		assert!(layout.width >= a.width + SELF_LOOP_REACH + 40.0 - 1e-9);
	}

	#[test]
	fn test_empty_model() {
		let layout = layout(&model(&[], &[]));
		assert!(layout.nodes.is_empty());
		assert_eq!((layout.width, layout.height), (40.0, 40.0));
	}

	#[test]
	fn test_barycenter_removes_crossing() {
		// a->d and b->c start out crossed by insertion order.
		let layout = layout(&model(&["a", "b", "c", "d"], &[("a", "d"), ("b", "c")]));
		let (a, b) = (layout.node("a").unwrap(), layout.node("b").unwrap());
		let (c, d) = (layout.node("c").unwrap(), layout.node("d").unwrap());
		assert_eq!(a.x < b.x, d.x < c.x);
	}

	#[test]
	fn test_intersect_shapes() {
		let node = NodeGeometry {
			id: "n".into(),
			x: 0.0,
			y: 0.0,
			width: 40.0,
			height: 20.0,
			rank: 0,
		};
		let close = |p: Point, q: Point| (p.0 - q.0).abs() < 1e-9 && (p.1 - q.1).abs() < 1e-9;
		assert!(close(intersect(&node, Shape::Rect, (100.0, 0.0)), (20.0, 0.0)));
		assert!(close(intersect(&node, Shape::Rect, (0.0, -50.0)), (0.0, -10.0)));
		assert!(close(intersect(&node, Shape::Ellipse, (0.0, 50.0)), (0.0, 10.0)));
		assert!(close(intersect(&node, Shape::Circle, (50.0, 0.0)), (10.0, 0.0)));
		assert!(close(intersect(&node, Shape::Diamond, (50.0, 0.0)), (20.0, 0.0)));
		assert_eq!(intersect(&node, Shape::Rect, (0.0, 0.0)), (0.0, 0.0));
	}

	#[test]
	fn test_midpoint() {
		assert_eq!(midpoint(&[(0.0, 0.0), (10.0, 0.0)]), Some((5.0, 0.0)));
		assert_eq!(
			midpoint(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0)]),
			Some((0.0, 10.0))
		);
		assert_eq!(midpoint(&[]), None);
	}

	#[test]
	fn test_pack_respects_gaps() {
		let placed = pack(&[0.0, 0.0, 0.0], &[10.0, 10.0]);
		assert!(placed[1] - placed[0] >= 10.0 - 1e-9);
		assert!(placed[2] - placed[1] >= 10.0 - 1e-9);
		assert!((placed[1]).abs() < 1e-9);
	}
}
