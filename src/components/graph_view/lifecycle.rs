//! Element identity and ready-state tracking.

use log::info;

use super::types::GraphSpec;

/// Tag name the element registers under.
pub const TAG_NAME: &str = "graph-view";
/// Element version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Readiness of an element instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LifecycleState {
	/// Created; data assignments are queued.
	#[default]
	Uninitialized,
	/// Collaborators attached; data is applied directly.
	Ready,
}

/// Tag, version and readiness of one element instance.
///
/// Data assigned before the element is ready is queued here and handed back,
/// in assignment order, by [`ElementLifecycle::mark_ready`].
#[derive(Clone, Debug, PartialEq)]
pub struct ElementLifecycle {
	tag: &'static str,
	version: &'static str,
	state: LifecycleState,
	pending: Vec<GraphSpec>,
}

impl Default for ElementLifecycle {
	fn default() -> Self {
		Self::new(TAG_NAME)
	}
}

impl ElementLifecycle {
	/// Lifecycle for an element registered as `tag`.
	pub fn new(tag: &'static str) -> Self {
		Self {
			tag,
			version: VERSION,
			state: LifecycleState::Uninitialized,
			pending: Vec::new(),
		}
	}

	/// Registered tag name.
	pub fn tag(&self) -> &'static str {
		self.tag
	}

	/// Element version.
	pub fn version(&self) -> &'static str {
		self.version
	}

	/// Current state.
	pub fn state(&self) -> LifecycleState {
		self.state
	}

	/// `true` once [`ElementLifecycle::mark_ready`] has run.
	pub fn is_ready(&self) -> bool {
		self.state == LifecycleState::Ready
	}

	/// Hold `data` until the element is ready.
	pub fn queue(&mut self, data: GraphSpec) {
		info!(
			"{}: queued data ({} nodes, {} edges) until ready",
			self.tag,
			data.node_count(),
			data.edge_count()
		);
		self.pending.push(data);
	}

	/// Number of queued data assignments.
	pub fn pending(&self) -> usize {
		self.pending.len()
	}

	/// Drop everything queued so far.
	pub fn clear_pending(&mut self) {
		if !self.pending.is_empty() {
			info!("{}: dropped {} queued updates", self.tag, self.pending.len());
		}
		self.pending.clear();
	}

	/// Transition to `Ready`. Returns the queued data on the first call and
	/// nothing afterwards; the transition is one-way.
	pub fn mark_ready(&mut self) -> Option<Vec<GraphSpec>> {
		if self.is_ready() {
			return None;
		}
		self.state = LifecycleState::Ready;
		info!("{} v{}: ready", self.tag, self.version);
		Some(std::mem::take(&mut self.pending))
	}
}
