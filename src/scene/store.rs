//! Slot-based node storage with versioned handles.

use super::SceneGraph;
use crate::{
	kind::NodeKind,
	props::{Event, Handler, Props, Value},
};
use core::fmt;
use hashbrown::HashMap;
use tracing::{trace, warn};

/// A handle to a node in a [`Scene`].
///
/// Handles to destroyed nodes stay detectable after their slot is reused, since every reuse bumps the slot's version.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
	slot: u32,
	version: u32,
}

impl fmt::Debug for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}v{}", self.slot, self.version)
	}
}

#[derive(Debug)]
struct Listener {
	event: String,
	namespace: Option<String>,
	handler: Handler,
}

#[derive(Debug)]
struct Entry {
	kind: NodeKind,
	attrs: HashMap<String, Value>,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
	listeners: Vec<Listener>,
	draws: usize,
}

#[derive(Debug)]
struct Slot {
	version: u32,
	entry: Option<Entry>,
}

/// An in-memory retained scene graph.
///
/// Parents own their children: [`destroy`](`SceneGraph::destroy`) frees the whole subtree.
/// The parent link stored on each child is a plain handle that never keeps anything alive.
///
/// Drawing is not implemented. [`batch_draw`](`SceneGraph::batch_draw`) only counts repaints per drawable unit.
#[derive(Debug, Default)]
pub struct Scene {
	slots: Vec<Slot>,
	free_list: Vec<u32>,
	draws: usize,
}

/// Splits `"click.ns"` into `("click", Some("ns"))`.
fn parse_event(event: &str) -> (&str, Option<&str>) {
	match event.split_once('.') {
		Some((name, namespace)) => (name, Some(namespace)),
		None => (event, None),
	}
}

impl Scene {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// The number of live nodes.
	#[must_use]
	pub fn len(&self) -> usize {
		self.slots.len() - self.free_list.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// How often `unit` was repainted.
	#[must_use]
	pub fn draw_count(&self, unit: NodeId) -> usize {
		self.entry(unit).draws
	}

	/// Repaints across all units since creation.
	#[must_use]
	pub fn total_draws(&self) -> usize {
		self.draws
	}

	/// Counts listeners on `node`, optionally only those in `namespace`.
	#[must_use]
	pub fn listener_count(&self, node: NodeId, namespace: Option<&str>) -> usize {
		self.entry(node)
			.listeners
			.iter()
			.filter(|listener| namespace.map_or(true, |namespace| listener.namespace.as_deref() == Some(namespace)))
			.count()
	}

	/// Dispatches an event to every listener for `name` on `node`, regardless of namespace.
	///
	/// Returns the number of handlers called.
	pub fn fire(&self, node: NodeId, name: &str, detail: Value) -> usize {
		let handlers: Vec<Handler> = self
			.entry(node)
			.listeners
			.iter()
			.filter(|listener| listener.event == name)
			.map(|listener| listener.handler.clone())
			.collect();

		let event = Event { name: name.to_owned(), detail };
		for handler in &handlers {
			handler.call(&event);
		}
		handlers.len()
	}

	fn validate(&self, id: NodeId) {
		assert!(
			(id.slot as usize) < self.slots.len() && self.slots[id.slot as usize].version == id.version && self.slots[id.slot as usize].entry.is_some(),
			"stale NodeId: {:?}",
			id
		);
	}

	fn entry(&self, id: NodeId) -> &Entry {
		self.validate(id);
		match &self.slots[id.slot as usize].entry {
			Some(entry) => entry,
			None => unreachable!(),
		}
	}

	fn entry_mut(&mut self, id: NodeId) -> &mut Entry {
		self.validate(id);
		match &mut self.slots[id.slot as usize].entry {
			Some(entry) => entry,
			None => unreachable!(),
		}
	}

	fn detach(&mut self, node: NodeId) {
		if let Some(parent) = self.entry_mut(node).parent.take() {
			self.entry_mut(parent).children.retain(|&child| child != node);
		}
	}
}

impl SceneGraph for Scene {
	type Node = NodeId;

	fn create_node(&mut self, kind: NodeKind) -> NodeId {
		let entry = Entry {
			kind,
			attrs: HashMap::new(),
			parent: None,
			children: Vec::new(),
			listeners: Vec::new(),
			draws: 0,
		};

		let index = if let Some(index) = self.free_list.pop() {
			let slot = &mut self.slots[index as usize];
			slot.version += 1;
			slot.entry = Some(entry);
			index
		} else {
			assert!(self.slots.len() < u32::MAX as usize, "too many scene nodes");
			#[allow(clippy::cast_possible_truncation)]
			let index = self.slots.len() as u32;
			self.slots.push(Slot { version: 0, entry: Some(entry) });
			index
		};

		let id = NodeId {
			slot: index,
			version: self.slots[index as usize].version,
		};
		trace!(?id, %kind, "Created node.");
		id
	}

	fn contains(&self, node: NodeId) -> bool {
		self.slots
			.get(node.slot as usize)
			.map_or(false, |slot| slot.version == node.version && slot.entry.is_some())
	}

	fn kind(&self, node: NodeId) -> NodeKind {
		self.entry(node).kind
	}

	fn attr(&self, node: NodeId, key: &str) -> Option<&Value> {
		self.entry(node).attrs.get(key)
	}

	fn attrs(&self, node: NodeId) -> Props {
		self.entry(node).attrs.iter().map(|(key, value)| (key.clone(), value.clone())).collect()
	}

	fn set_attr(&mut self, node: NodeId, key: &str, value: Option<Value>) {
		let attrs = &mut self.entry_mut(node).attrs;
		match value {
			Some(value) => {
				attrs.insert(key.to_owned(), value);
			}
			None => {
				attrs.remove(key);
			}
		}
	}

	fn set_attrs(&mut self, node: NodeId, attrs: Props) {
		self.entry_mut(node).attrs.extend(attrs);
	}

	fn on(&mut self, node: NodeId, event: &str, handler: Handler) {
		let (name, namespace) = parse_event(event);
		self.entry_mut(node).listeners.push(Listener {
			event: name.to_owned(),
			namespace: namespace.map(ToOwned::to_owned),
			handler,
		});
	}

	fn off(&mut self, node: NodeId, event: &str, handler: Option<&Handler>) {
		let (name, namespace) = parse_event(event);
		self.entry_mut(node).listeners.retain(|listener| {
			let matches = (name.is_empty() || listener.event == name)
				&& namespace.map_or(true, |namespace| listener.namespace.as_deref() == Some(namespace))
				&& handler.map_or(true, |handler| &listener.handler == handler);
			!matches
		});
	}

	fn add(&mut self, parent: NodeId, child: NodeId) {
		assert_ne!(parent, child, "a node can't be its own child");
		self.validate(parent);
		self.detach(child);
		self.entry_mut(parent).children.push(child);
		self.entry_mut(child).parent = Some(parent);
	}

	fn remove(&mut self, node: NodeId) {
		self.detach(node);
	}

	fn destroy(&mut self, node: NodeId) {
		self.detach(node);

		let mut stack = vec![node];
		while let Some(current) = stack.pop() {
			let slot = &mut self.slots[current.slot as usize];
			if let Some(entry) = slot.entry.take() {
				stack.extend(entry.children);
				slot.version += 1;
				self.free_list.push(current.slot);
			}
		}
	}

	fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.entry(node).parent
	}

	fn children(&self, node: NodeId) -> &[NodeId] {
		&self.entry(node).children
	}

	fn move_to_top(&mut self, node: NodeId) {
		if let Some(parent) = self.entry(node).parent {
			let siblings = &mut self.entry_mut(parent).children;
			siblings.retain(|&sibling| sibling != node);
			siblings.push(node);
		}
	}

	fn z_index(&self, node: NodeId) -> usize {
		self.entry(node)
			.parent
			.and_then(|parent| self.entry(parent).children.iter().position(|&sibling| sibling == node))
			.unwrap_or(0)
	}

	fn set_z_index(&mut self, node: NodeId, index: usize) {
		let parent = match self.entry(node).parent {
			Some(parent) => parent,
			None => return warn!(?node, index, "Can't set the z-index of a node without parent."),
		};

		let siblings = &mut self.entry_mut(parent).children;
		if index >= siblings.len() {
			warn!(?node, index, len = siblings.len(), "Unexpected z-index, clamping it.");
		}
		siblings.retain(|&sibling| sibling != node);
		let index = index.min(siblings.len());
		siblings.insert(index, node);
	}

	fn layer(&self, node: NodeId) -> Option<NodeId> {
		let mut current = Some(node);
		while let Some(candidate) = current {
			let entry = self.entry(candidate);
			if entry.kind.is_layer() {
				return Some(candidate);
			}
			current = entry.parent;
		}
		None
	}

	fn stage(&self, node: NodeId) -> Option<NodeId> {
		let mut current = node;
		while let Some(parent) = self.entry(current).parent {
			current = parent;
		}
		(self.entry(current).kind == NodeKind::Stage).then_some(current)
	}

	fn batch_draw(&mut self, unit: NodeId) {
		let entry = self.entry_mut(unit);
		entry.draws += 1;
		self.draws += 1;
		trace!(?unit, "Repainted.");
	}
}
