//! Applying attribute maps to live scene nodes.
//!
//! Each application is split into [`diff`](`PropApplier::diff`), which only reads, and [`commit`](`PropApplier::commit`),
//! which performs the mutations in a fixed order:
//!
//! 1. unsubscribe removed or replaced handlers,
//! 2. clear removed attributes,
//! 3. write changed attributes in **one** batch,
//! 4. subscribe new handlers,
//! 5. request a repaint if anything visible changed.

use crate::{
	diagnostics::Diagnostics,
	listeners::ListenerRegistry,
	props::{event_name, is_reserved, Handler, Props, Value},
	redraw::RedrawCoalescer,
	scene::SceneGraph,
};
use core::{fmt::Debug, hash::Hash};
use tracing::{instrument, trace, trace_span};

/// The minimal set of mutations that turns one attribute map into another on a specific node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropDiff {
	/// Attributes to write in one batch.
	pub writes: Props,
	/// Attributes to clear.
	pub clears: Vec<String>,
	/// Event names whose bridge subscription is removed.
	pub unsubscribe: Vec<String>,
	/// Event names to (re)subscribe. Replaces existing bridge subscriptions for the same event.
	pub subscribe: Vec<(String, Handler)>,
}

impl PropDiff {
	/// Whether the diff changes attributes, which requires a repaint.
	#[must_use]
	pub fn is_mutation(&self) -> bool {
		!self.writes.is_empty() || !self.clears.is_empty()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		!self.is_mutation() && self.unsubscribe.is_empty() && self.subscribe.is_empty()
	}
}

/// Writes an attribute whenever its new value differs from the one stored on the node.
///
/// The old descriptor only decides what to clear and which handlers to drop, so attributes that were changed
/// behind the bridge's back are restored by the next application that carries them.
#[derive(Debug)]
pub struct PropApplier<N: Copy + Eq + Hash + Debug> {
	listeners: ListenerRegistry<N>,
	diagnostics: Diagnostics,
}

impl<N: Copy + Eq + Hash + Debug> PropApplier<N> {
	/// `namespace` is the private event namespace, without leading dot.
	#[must_use]
	pub fn new(namespace: impl Into<String>, diagnostics: Diagnostics) -> Self {
		Self {
			listeners: ListenerRegistry::new(namespace),
			diagnostics,
		}
	}

	#[must_use]
	pub fn listeners(&self) -> &ListenerRegistry<N> {
		&self.listeners
	}

	#[must_use]
	pub fn diagnostics(&self) -> &Diagnostics {
		&self.diagnostics
	}

	/// Computes what [`apply`](`PropApplier::apply`) would do, without doing it.
	pub fn diff<S: SceneGraph<Node = N>>(&self, scene: &S, node: N, new: &Props, old: &Props) -> PropDiff {
		let mut diff = PropDiff::default();

		for key in old.keys() {
			if is_reserved(key) || new.contains_key(key) {
				continue;
			}

			match event_name(key) {
				Some(event) => {
					if self.listeners.get(node, &event).is_some() {
						diff.unsubscribe.push(event);
					}
				}
				None => {
					if scene.attr(node, key).is_some() {
						diff.clears.push(key.to_owned());
					}
				}
			}
		}

		for (key, value) in new.iter() {
			if is_reserved(key) {
				continue;
			}

			match event_name(key) {
				Some(event) => {
					let wanted = value.as_handler();
					if self.listeners.get(node, &event) == wanted {
						continue;
					}
					match wanted {
						Some(handler) => diff.subscribe.push((event, handler.clone())),
						None => diff.unsubscribe.push(event),
					}
				}
				None => {
					if scene.attr(node, key) != Some(value) {
						diff.writes.insert(key, value.clone());
					}
				}
			}
		}

		diff
	}

	/// Applies `new` on top of `old` to `node`.
	///
	/// Returns whether attributes changed. In that case, a repaint of `node`'s drawable unit was requested.
	#[instrument(skip(self, scene, redraw, new, old))]
	pub fn apply<S: SceneGraph<Node = N>>(&mut self, scene: &mut S, redraw: &mut RedrawCoalescer<N>, node: N, new: &Props, old: &Props) -> bool {
		self.check_advisories(new);
		let diff = self.diff(&*scene, node, new, old);
		self.commit(scene, redraw, node, diff)
	}

	/// Performs the mutations described by `diff`.
	pub fn commit<S: SceneGraph<Node = N>>(&mut self, scene: &mut S, redraw: &mut RedrawCoalescer<N>, node: N, diff: PropDiff) -> bool {
		let mutated = diff.is_mutation();
		let span = trace_span!("Committing attributes", ?node, mutated);
		let _enter = span.enter();

		let PropDiff {
			writes,
			clears,
			unsubscribe,
			subscribe,
		} = diff;

		for event in &unsubscribe {
			self.listeners.unsubscribe(scene, node, event);
		}

		for key in &clears {
			trace!(?node, key = key.as_str(), "Clearing attribute.");
			scene.set_attr(node, key, None);
		}

		if !writes.is_empty() {
			if cfg!(feature = "dangerous-logging") {
				trace!(?node, ?writes, "Writing attributes.");
			} else {
				trace!(?node, keys = ?writes.keys().collect::<Vec<_>>(), "Writing attributes.");
			}
			scene.set_attrs(node, writes);
		}

		for (event, handler) in subscribe {
			self.listeners.subscribe(scene, node, &event, handler);
		}

		if mutated {
			redraw.request(&*scene, node);
		}
		mutated
	}

	/// Removes all of the bridge's subscriptions on `node`.
	pub fn release<S: SceneGraph<Node = N>>(&mut self, scene: &mut S, node: N) -> usize {
		self.listeners.release_node(scene, node)
	}

	/// Drops handlers that are no longer subscribed anywhere.
	pub fn collect_garbage(&mut self) -> usize {
		self.listeners.collect_garbage()
	}

	fn check_advisories(&self, props: &Props) {
		if props.contains_key("id") {
			self.diagnostics.warn_id();
		}
		if props.contains_key("zIndex") {
			self.diagnostics.warn_z_index();
		}

		let truthy = |key: &str| props.get(key).map_or(false, Value::is_truthy);
		if truthy("draggable") && (props.contains_key("x") || props.contains_key("y")) && !(truthy("onDragMove") || truthy("onDragEnd")) {
			self.diagnostics.warn_drag_position();
		}
	}
}
