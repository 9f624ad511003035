//! The bridge's own event subscriptions.
//!
//! Every subscription made by the bridge goes into the scene graph under a private namespace,
//! so that listeners attached by other code on the same node are never touched.
//! The registry mirrors those subscriptions per node, which lets the bridge unsubscribe precisely and
//! recognise handlers that are already attached.

use crate::{
	props::{Handler, HandlerId},
	rc_hash_map::{CountSaturatedError, RcHashMap},
	scene::SceneGraph,
};
use core::{fmt::Debug, hash::Hash};
use hashbrown::HashMap;
use tracing::{error, trace};

#[derive(Debug)]
pub struct ListenerRegistry<N: Copy + Eq + Hash + Debug> {
	namespace: String,
	by_node: HashMap<N, HashMap<String, HandlerId>>,
	handles: RcHashMap<HandlerId, u32, Handler>,
}

impl<N: Copy + Eq + Hash + Debug> ListenerRegistry<N> {
	/// `namespace` is used without leading dot.
	#[must_use]
	pub fn new(namespace: impl Into<String>) -> Self {
		Self {
			namespace: namespace.into(),
			by_node: HashMap::new(),
			handles: RcHashMap::new(),
		}
	}

	#[must_use]
	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	fn qualified(&self, event: &str) -> String {
		format!("{}.{}", event, self.namespace)
	}

	/// The handler currently subscribed by the bridge for `event` on `node`.
	#[must_use]
	pub fn get(&self, node: N, event: &str) -> Option<&Handler> {
		let id = self.by_node.get(&node)?.get(event)?;
		self.handles.get(id)
	}

	/// Number of events the bridge is subscribed to on `node`.
	#[must_use]
	pub fn count(&self, node: N) -> usize {
		self.by_node.get(&node).map_or(0, HashMap::len)
	}

	/// Number of subscriptions across all nodes.
	#[must_use]
	pub fn total(&self) -> usize {
		self.by_node.values().map(HashMap::len).sum()
	}

	/// Subscribes `handler` to `event` on `node`, replacing any handler the bridge subscribed there before.
	pub fn subscribe<S: SceneGraph<Node = N>>(&mut self, scene: &mut S, node: N, event: &str, handler: Handler) {
		self.unsubscribe(scene, node, event);

		let id = handler.id();
		if let Err(CountSaturatedError) = self.handles.increment_or_insert_with(id, || handler.clone()) {
			return error!(?node, event, "Too many active subscriptions of the same handler. Not subscribing.");
		}
		self.by_node.entry(node).or_insert_with(HashMap::new).insert(event.to_owned(), id);

		trace!(?node, event, ?handler, "Subscribing.");
		scene.on(node, &self.qualified(event), handler);
	}

	/// Removes the bridge's subscription to `event` on `node`, if there is one.
	///
	/// Returns whether a subscription was removed.
	pub fn unsubscribe<S: SceneGraph<Node = N>>(&mut self, scene: &mut S, node: N, event: &str) -> bool {
		let id = match self.by_node.get_mut(&node).and_then(|events| events.remove(event)) {
			Some(id) => id,
			None => return false,
		};
		if self.by_node.get(&node).map_or(false, HashMap::is_empty) {
			self.by_node.remove(&node);
		}

		match self.handles.weak_decrement(&id) {
			Ok(Some(handler)) => {
				trace!(?node, event, ?handler, "Unsubscribing.");
				let handler = handler.clone();
				scene.off(node, &self.qualified(event), Some(&handler));
			}
			Ok(None) => error!(?node, event, "Tried to unsubscribe a handler that isn't retained."),
			Err(CountSaturatedError) => error!(?node, event, "Tried to release a handler more often than it was subscribed."),
		}
		true
	}

	/// Removes every subscription the bridge made on `node`.
	///
	/// Returns the number of released subscriptions.
	pub fn release_node<S: SceneGraph<Node = N>>(&mut self, scene: &mut S, node: N) -> usize {
		let events = match self.by_node.remove(&node) {
			Some(events) => events,
			None => return 0,
		};

		for (event, id) in &events {
			match self.handles.weak_decrement(id) {
				Ok(Some(_)) => trace!(?node, event = event.as_str(), "Releasing subscription."),
				Ok(None) => error!(?node, event = event.as_str(), "Tried to release a handler that isn't retained."),
				Err(CountSaturatedError) => error!(?node, event = event.as_str(), "Tried to release a handler more often than it was subscribed."),
			}
		}
		scene.off(node, &format!(".{}", self.namespace), None);
		events.len()
	}

	/// Drops handlers that are no longer subscribed anywhere.
	///
	/// Returns the number of freed handlers.
	pub fn collect_garbage(&mut self) -> usize {
		self.handles.drain_weak().count()
	}

	/// Number of distinct retained handlers, including ones not yet collected.
	#[must_use]
	pub fn retained_handlers(&self) -> usize {
		self.handles.len()
	}
}
