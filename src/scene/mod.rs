//! The retained scene graph the bridge mutates.
//!
//! [`SceneGraph`] is everything the bridge needs from a graphics library. Note that ordering is only available as
//! append-to-end ([`add`](`SceneGraph::add`)), [`move_to_top`](`SceneGraph::move_to_top`) and
//! [`set_z_index`](`SceneGraph::set_z_index`), and that there is no positional insert.
//!
//! [`Scene`] is an in-memory implementation that records repaints instead of drawing.

mod store;

pub use store::{NodeId, Scene};

use crate::{
	kind::NodeKind,
	props::{Handler, Props, Value},
};
use core::{fmt::Debug, hash::Hash};

/// Outbound contract towards the graphics library.
///
/// Event names passed to [`on`](`SceneGraph::on`) and [`off`](`SceneGraph::off`) may carry a namespace suffix:
/// `"click.bridge"` names the `click` event in the `bridge` namespace, `".bridge"` names every event in that namespace.
pub trait SceneGraph {
	/// A cheap handle to a live node.
	type Node: Copy + Eq + Hash + Debug;

	fn create_node(&mut self, kind: NodeKind) -> Self::Node;

	/// Whether `node` refers to a node that hasn't been destroyed.
	fn contains(&self, node: Self::Node) -> bool;

	fn kind(&self, node: Self::Node) -> NodeKind;

	fn attr(&self, node: Self::Node, key: &str) -> Option<&Value>;

	/// Snapshot of all attributes of `node`.
	fn attrs(&self, node: Self::Node) -> Props;

	/// Sets or, with [`None`], clears a single attribute.
	fn set_attr(&mut self, node: Self::Node, key: &str, value: Option<Value>);

	/// Sets all of `attrs` in one batch.
	fn set_attrs(&mut self, node: Self::Node, attrs: Props);

	fn on(&mut self, node: Self::Node, event: &str, handler: Handler);

	/// Removes matching listeners. With `handler: None`, all listeners matching `event` are removed.
	fn off(&mut self, node: Self::Node, event: &str, handler: Option<&Handler>);

	/// Appends `child` as top-most child of `parent`, detaching it from any previous parent first.
	fn add(&mut self, parent: Self::Node, child: Self::Node);

	/// Detaches `node` from its parent without destroying it.
	fn remove(&mut self, node: Self::Node);

	/// Detaches and destroys `node` and its entire subtree.
	fn destroy(&mut self, node: Self::Node);

	fn parent(&self, node: Self::Node) -> Option<Self::Node>;

	/// Children of `node` in draw order, bottom-most first.
	fn children(&self, node: Self::Node) -> &[Self::Node];

	fn move_to_top(&mut self, node: Self::Node);

	/// The index of `node` among its siblings, `0` if it's detached.
	fn z_index(&self, node: Self::Node) -> usize;

	/// Moves `node` to `index` among its siblings. Out-of-range indices are clamped.
	fn set_z_index(&mut self, node: Self::Node, index: usize);

	/// The nearest layer at or above `node`.
	fn layer(&self, node: Self::Node) -> Option<Self::Node>;

	/// The stage at the root of `node`'s tree.
	fn stage(&self, node: Self::Node) -> Option<Self::Node>;

	/// Repaints a drawable unit.
	fn batch_draw(&mut self, unit: Self::Node);
}
