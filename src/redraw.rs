//! Repaint batching.
//!
//! Requests are collected per drawable unit while a commit runs and flushed once at its end,
//! so every affected layer (or stage) is repainted exactly once per commit, after all of the commit's mutations.

use crate::scene::SceneGraph;
use core::{fmt::Debug, hash::Hash};
use hashbrown::HashSet;
use tracing::{info, trace};

#[derive(Debug)]
pub struct RedrawCoalescer<N: Copy + Eq + Hash + Debug> {
	pending: HashSet<N>,
	order: Vec<N>,
	requests: usize,
}

impl<N: Copy + Eq + Hash + Debug> Default for RedrawCoalescer<N> {
	fn default() -> Self {
		Self::new()
	}
}

impl<N: Copy + Eq + Hash + Debug> RedrawCoalescer<N> {
	#[must_use]
	pub fn new() -> Self {
		Self {
			pending: HashSet::new(),
			order: Vec::new(),
			requests: 0,
		}
	}

	/// Marks the drawable unit of `node` dirty: its nearest layer, or the stage if there is no layer.
	///
	/// Nodes that are attached to neither are ignored, they will be drawn with the unit they are added to later.
	/// Returns the marked unit.
	pub fn request<S: SceneGraph<Node = N>>(&mut self, scene: &S, node: N) -> Option<N> {
		self.requests += 1;
		let unit = scene.layer(node).or_else(|| scene.stage(node));
		match unit {
			Some(unit) => {
				if self.pending.insert(unit) {
					trace!(?node, ?unit, "Repaint requested.");
					self.order.push(unit);
				}
			}
			None => trace!(?node, "Detached node, no repaint."),
		}
		unit
	}

	#[must_use]
	pub fn is_pending(&self, unit: N) -> bool {
		self.pending.contains(&unit)
	}

	#[must_use]
	pub fn pending(&self) -> usize {
		self.order.len()
	}

	/// Repaints each dirty unit that is still alive once, in request order.
	///
	/// Returns the number of repainted units.
	pub fn flush<S: SceneGraph<Node = N>>(&mut self, scene: &mut S) -> usize {
		let mut drawn = 0;
		for unit in self.order.drain(..) {
			if scene.contains(unit) {
				scene.batch_draw(unit);
				drawn += 1;
			} else {
				trace!(?unit, "Skipping repaint of destroyed unit.");
			}
		}
		self.pending.clear();

		if drawn > 0 {
			info!("Coalesced {} repaint request(s) into {} repaint(s).", self.requests, drawn);
		}
		self.requests = 0;
		drawn
	}
}
