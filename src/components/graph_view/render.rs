//! Layout + render invoker.
//!
//! Each call to [`Renderer::render`] lays out the model and builds the target
//! [`Scene`]. When the model's graph configuration carries a transition, the
//! displayed scene animates from what was on screen to the new target as
//! [`Renderer::tick`] advances; otherwise it jumps straight to the target.

use log::debug;

use super::layout::layout;
use super::model::{GraphModel, Transition};
use super::scene::Scene;

/// An in-flight animation between two scenes.
#[derive(Clone, Debug)]
struct Tween {
	from: Scene,
	transition: Transition,
	elapsed_ms: f64,
}

/// Computes layouts and tracks what is currently displayed.
#[derive(Clone, Debug, Default)]
pub struct Renderer {
	target: Scene,
	displayed: Scene,
	tween: Option<Tween>,
	renders: usize,
}

impl Renderer {
	/// Renderer with an empty scene.
	pub fn new() -> Self {
		Self::default()
	}

	/// Lay out `model` and start drawing it.
	pub fn render(&mut self, model: &GraphModel) -> &Scene {
		let target = Scene::build(model, &layout(model));
		debug!(
			"graph-view: render #{} with {} nodes, {} edges ({}x{})",
			self.renders + 1,
			target.nodes.len(),
			target.edges.len(),
			target.width,
			target.height
		);

		match model.graph().transition {
			Some(transition) => {
				let from = std::mem::take(&mut self.displayed);
				self.displayed = from.interpolate(&target, transition.progress(0.0));
				self.tween = Some(Tween {
					from,
					transition,
					elapsed_ms: 0.0,
				});
			}
			None => {
				self.tween = None;
				self.displayed = target.clone();
			}
		}
		self.target = target;
		self.renders += 1;
		&self.displayed
	}

	/// Advance the running transition by `dt_ms`. Returns `true` when the
	/// displayed scene changed.
	pub fn tick(&mut self, dt_ms: f64) -> bool {
		let Some(tween) = self.tween.as_mut() else {
			return false;
		};
		tween.elapsed_ms += dt_ms;
		if tween.elapsed_ms >= tween.transition.duration_ms {
			self.tween = None;
			self.displayed = self.target.clone();
		} else {
			let t = tween.transition.progress(tween.elapsed_ms);
			self.displayed = tween.from.interpolate(&self.target, t);
		}
		true
	}

	/// Whether a transition is running.
	pub fn is_animating(&self) -> bool {
		self.tween.is_some()
	}

	/// The scene currently on screen.
	pub fn scene(&self) -> &Scene {
		&self.displayed
	}

	/// The scene the current transition is heading to.
	pub fn target(&self) -> &Scene {
		&self.target
	}

	/// Number of [`Renderer::render`] calls so far.
	pub fn render_count(&self) -> usize {
		self.renders
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_view::model::{EdgeLabel, NodeLabel};

	fn model(ids: &[&str], edges: &[(&str, &str)]) -> GraphModel {
		let mut model = GraphModel::new();
		for id in ids {
			model.set_node(*id, NodeLabel::named(id));
		}
		for (from, to) in edges {
			model.set_edge(from, to, EdgeLabel::default()).unwrap();
		}
		model
	}

	#[test]
	fn test_without_transition_shows_target() {
		let mut renderer = Renderer::new();
		let m = model(&["a", "b"], &[("a", "b")]);
		renderer.render(&m);

		assert!(!renderer.is_animating());
		assert_eq!(renderer.scene(), renderer.target());
		assert!(!renderer.tick(16.0));
		assert_eq!(renderer.render_count(), 1);
	}

	#[test]
	fn test_transition_runs_to_completion() {
		let mut renderer = Renderer::new();
		let mut m = model(&["a"], &[]);
		m.graph_mut().transition = Some(Transition::new(500.0));
		renderer.render(&m);

		m.set_node("b", NodeLabel::named("b"));
		m.set_edge("a", "b", EdgeLabel::default()).unwrap();
		renderer.render(&m);

		assert!(renderer.is_animating());
		assert_eq!(renderer.scene().nodes.len(), 2);
		assert_eq!(renderer.scene().node("b").unwrap().opacity, 0.0);
		assert_ne!(renderer.scene(), renderer.target());

		assert!(renderer.tick(250.0));
		assert!(renderer.is_animating());
		assert_eq!(renderer.scene().node("b").unwrap().opacity, 0.5);

		assert!(renderer.tick(250.0));
		assert!(!renderer.is_animating());
		assert_eq!(renderer.scene(), renderer.target());
	}

	#[test]
	fn test_rerender_mid_transition_starts_from_screen() {
		let mut renderer = Renderer::new();
		let mut m = model(&["a"], &[]);
		m.graph_mut().transition = Some(Transition::new(500.0));
		renderer.render(&m);
		renderer.tick(100.0);
		let on_screen = renderer.scene().node("a").unwrap().opacity;

		renderer.render(&m);
		assert_eq!(renderer.scene().node("a").unwrap().opacity, on_screen);
	}
}
