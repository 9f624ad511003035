//! The tree mutation adapter: [`HostConfig`] over any [`SceneGraph`].

use crate::{
	apply::PropApplier,
	diagnostics::Diagnostics,
	error::{Error, OrderViolation, Result},
	factory,
	host::HostConfig,
	kind::NodeKind,
	listeners::ListenerRegistry,
	props::Props,
	redraw::RedrawCoalescer,
	schedule::{CallbackId, FrameScheduler, ManualScheduler},
	scene::SceneGraph,
};
use core::{convert::Infallible, time::Duration};
use hashbrown::HashSet;
use tracing::{error, info, instrument, trace, warn};

/// Construction context of a [`SceneHost`].
#[derive(Debug, Clone)]
pub struct HostOptions {
	/// Private event namespace, without leading dot.
	pub namespace: String,
	/// Commit every update, even if the descriptor didn't change.
	///
	/// Attributes changed directly on the scene are then restored by the next commit that reaches their node.
	pub strict: bool,
	/// Share one instance between hosts to warn only once per process.
	pub diagnostics: Diagnostics,
}

impl Default for HostOptions {
	fn default() -> Self {
		Self {
			namespace: "stage-host".to_owned(),
			strict: false,
			diagnostics: Diagnostics::new(),
		}
	}
}

/// Update payload that only says "there is something to apply".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateSignal;

/// Owns a scene graph and translates engine commits into its mutations.
///
/// Repaints are deferred until [`reset_after_commit`](`HostConfig::reset_after_commit`),
/// which repaints each affected layer (or stage) once.
pub struct SceneHost<S: SceneGraph> {
	scene: S,
	applier: PropApplier<S::Node>,
	redraw: RedrawCoalescer<S::Node>,
	mounted: HashSet<S::Node>,
	scheduler: Box<dyn FrameScheduler>,
	strict: bool,
}

impl<S: SceneGraph> SceneHost<S> {
	#[must_use]
	pub fn new(scene: S) -> Self {
		Self::with_options(scene, HostOptions::default())
	}

	#[must_use]
	pub fn with_options(scene: S, options: HostOptions) -> Self {
		Self {
			scene,
			applier: PropApplier::new(options.namespace, options.diagnostics),
			redraw: RedrawCoalescer::new(),
			mounted: HashSet::new(),
			scheduler: Box::new(ManualScheduler::new()),
			strict: options.strict,
		}
	}

	#[must_use]
	pub fn with_scheduler(mut self, scheduler: impl 'static + FrameScheduler) -> Self {
		self.scheduler = Box::new(scheduler);
		self
	}

	#[must_use]
	pub fn scene(&self) -> &S {
		&self.scene
	}

	/// Direct access to the scene graph.
	///
	/// Don't use this while a commit is in progress.
	pub fn scene_mut(&mut self) -> &mut S {
		&mut self.scene
	}

	pub fn into_scene(self) -> S {
		self.scene
	}

	#[must_use]
	pub fn listeners(&self) -> &ListenerRegistry<S::Node> {
		self.applier.listeners()
	}

	/// Whether `node` was created through this host and hasn't been removed since.
	#[must_use]
	pub fn is_mounted(&self, node: S::Node) -> bool {
		self.mounted.contains(&node)
	}

	/// Drawable units waiting for the end of the commit.
	#[must_use]
	pub fn pending_repaints(&self) -> usize {
		self.redraw.pending()
	}

	/// Creates a stage to serve as container, with `props` applied.
	#[instrument(skip(self, props))]
	pub fn create_container(&mut self, props: &Props) -> S::Node {
		let stage = self.scene.create_node(NodeKind::Stage);
		self.mounted.insert(stage);
		self.applier.apply(&mut self.scene, &mut self.redraw, stage, props, &Props::new());
		trace!(?stage, "Created container.");
		stage
	}

	/// Applies changed top-level attributes to `container`. Returns whether anything changed.
	pub fn update_container(&mut self, container: S::Node, new_props: &Props, old_props: &Props) -> bool {
		self.applier.apply(&mut self.scene, &mut self.redraw, container, new_props, old_props)
	}

	/// Releases the bridge's listeners in `container`'s subtree and destroys it.
	#[instrument(skip(self))]
	pub fn destroy_container(&mut self, container: S::Node) {
		let released = self.release_subtree(container);
		self.scene.destroy(container);
		let freed = self.applier.collect_garbage();
		info!(released, freed, "Destroyed container.");
	}

	fn subtree(&self, node: S::Node) -> Vec<S::Node> {
		let mut nodes = vec![node];
		let mut i = 0;
		while let Some(&current) = nodes.get(i) {
			nodes.extend_from_slice(self.scene.children(current));
			i += 1;
		}
		nodes
	}

	fn release_subtree(&mut self, root: S::Node) -> usize {
		let mut released = 0;
		for node in self.subtree(root) {
			released += self.applier.release(&mut self.scene, node);
			self.mounted.remove(&node);
		}
		released
	}

	/// Describes `node` for error messages.
	fn describe(&self, node: S::Node) -> String {
		if cfg!(feature = "log-paths") {
			format!("{} ({:?})", self.node_path(node), node)
		} else {
			format!("{:?}", node)
		}
	}

	/// The tags from the root of `node`'s tree down to `node`, joined by `/`.
	fn node_path(&self, node: S::Node) -> String {
		let mut path = vec![self.scene.kind(node).tag()];
		let mut current = node;
		while let Some(parent) = self.scene.parent(current) {
			path.push(self.scene.kind(parent).tag());
			current = parent;
		}
		path.reverse();
		path.join("/")
	}

	fn order_error(&self, child: S::Node, violation: OrderViolation) -> Error {
		let node = self.describe(child);
		error!(node = node.as_str(), %violation, "Invalid sibling order. The reconciliation engine produced an inconsistent commit.");
		Error::InvalidOrder { node, violation }
	}
}

impl<S: SceneGraph> HostConfig for SceneHost<S> {
	type Instance = S::Node;
	type Container = S::Node;
	type TextInstance = Infallible;
	type PublicInstance = S::Node;
	type HostContext = ();
	type UpdatePayload = UpdateSignal;
	type Error = Error;

	fn create_instance(&mut self, tag: &str, props: &Props, _root: S::Node, _context: &()) -> Result<S::Node> {
		let node = factory::create_node(&mut self.scene, &mut self.applier, &mut self.redraw, tag, props)?;
		self.mounted.insert(node);
		Ok(node)
	}

	fn create_text_instance(&mut self, text: &str, _root: S::Node, _context: &()) -> Result<Infallible> {
		Err(factory::text_child_error(text))
	}

	#[instrument(skip(self))]
	fn append_initial_child(&mut self, parent: S::Node, child: S::Node) {
		self.scene.add(parent, child);
		self.redraw.request(&self.scene, parent);
	}

	#[instrument(skip(self))]
	fn append_child(&mut self, parent: S::Node, child: S::Node) {
		if self.scene.parent(child) == Some(parent) {
			self.scene.move_to_top(child);
		} else {
			self.scene.add(parent, child);
		}
		self.redraw.request(&self.scene, parent);
	}

	fn append_child_to_container(&mut self, container: S::Node, child: S::Node) {
		self.append_child(container, child);
	}

	#[instrument(skip(self))]
	fn insert_before(&mut self, parent: S::Node, child: S::Node, before: S::Node) -> Result<()> {
		if child == before {
			return Err(self.order_error(child, OrderViolation::BeforeItself));
		}
		if self.scene.parent(before) != Some(parent) {
			return Err(self.order_error(child, OrderViolation::NotASibling));
		}

		// There is no positional insert, so append and then take over the anchor's index.
		self.scene.remove(child);
		self.scene.add(parent, child);
		let index = self.scene.z_index(before);
		self.scene.set_z_index(child, index);

		self.redraw.request(&self.scene, parent);
		Ok(())
	}

	fn insert_in_container_before(&mut self, container: S::Node, child: S::Node, before: S::Node) -> Result<()> {
		self.insert_before(container, child, before)
	}

	#[instrument(skip(self))]
	fn remove_child(&mut self, parent: S::Node, child: S::Node) {
		if self.scene.parent(child) != Some(parent) {
			warn!(child = self.describe(child).as_str(), "Removing a node from a parent it isn't attached to.");
		}

		let released = self.release_subtree(child);
		trace!(released, "Released subscriptions.");
		self.scene.destroy(child);
		self.redraw.request(&self.scene, parent);
	}

	fn remove_child_from_container(&mut self, container: S::Node, child: S::Node) {
		self.remove_child(container, child);
	}

	fn prepare_update(&self, _instance: S::Node, _tag: &str, old_props: &Props, new_props: &Props, _root: S::Node, _context: &()) -> Option<UpdateSignal> {
		(self.strict || old_props != new_props).then_some(UpdateSignal)
	}

	#[instrument(skip(self, _payload, old_props, new_props))]
	fn commit_update(&mut self, instance: S::Node, _payload: UpdateSignal, tag: &str, old_props: &Props, new_props: &Props) {
		self.applier.apply(&mut self.scene, &mut self.redraw, instance, new_props, old_props);
	}

	fn commit_text_update(&mut self, _text_instance: &mut Infallible, _old_text: &str, new_text: &str) -> Result<()> {
		Err(factory::text_child_error(new_text))
	}

	fn commit_mount(&mut self, _instance: S::Node, _tag: &str, _props: &Props) {}

	fn finalize_initial_children(&mut self, _instance: S::Node, _tag: &str, _props: &Props, _root: S::Node, _context: &()) -> bool {
		false
	}

	fn get_public_instance(&self, instance: S::Node) -> S::Node {
		instance
	}

	fn prepare_for_commit(&mut self, container: S::Node) {
		trace!(?container, "Commit starting.");
	}

	#[instrument(skip(self))]
	fn reset_after_commit(&mut self, container: S::Node) {
		let repainted = self.redraw.flush(&mut self.scene);
		let freed = self.applier.collect_garbage();
		info!(repainted, listeners = self.applier.listeners().total(), freed, "Commit complete.");
	}

	fn reset_text_content(&mut self, _instance: S::Node) {}

	fn should_set_text_content(&self, _tag: &str, _props: &Props) -> bool {
		false
	}

	fn should_deprioritize_subtree(&self, _tag: &str, _props: &Props) -> bool {
		false
	}

	fn get_root_host_context(&self, _root: S::Node) {}

	fn get_child_host_context(&self, _parent_context: &(), _tag: &str, _root: S::Node) {}

	fn schedule_deferred_callback(&mut self, callback: Box<dyn FnOnce()>) -> CallbackId {
		self.scheduler.schedule(callback)
	}

	fn cancel_deferred_callback(&mut self, id: CallbackId) {
		if !self.scheduler.cancel(id) {
			trace!(?id, "Deferred callback already ran or was cancelled.");
		}
	}

	fn now(&self) -> Duration {
		self.scheduler.now()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		props::{Handler, Value},
		scene::{NodeId, Scene},
	};

	fn host_with_layer() -> (SceneHost<Scene>, NodeId, NodeId) {
		let mut host = SceneHost::new(Scene::new());
		let stage = host.create_container(&Props::new().with("width", 100).with("height", 100));
		let layer = host.create_instance("Layer", &Props::new(), stage, &()).unwrap();
		host.append_child_to_container(stage, layer);
		host.reset_after_commit(stage);
		(host, stage, layer)
	}

	fn rects(host: &mut SceneHost<Scene>, stage: NodeId, layer: NodeId, count: usize) -> Vec<NodeId> {
		(0..count)
			.map(|i| {
				let rect = host.create_instance("Rect", &Props::new().with("name", i.to_string()), stage, &()).unwrap();
				host.append_child(layer, rect);
				rect
			})
			.collect()
	}

	#[test]
	fn append_moves_existing_children_to_top() {
		let (mut host, stage, layer) = host_with_layer();
		let r = rects(&mut host, stage, layer, 3);
		host.append_child(layer, r[0]);
		assert_eq!(host.scene().children(layer), &[r[1], r[2], r[0]]);
	}

	#[test]
	fn insert_before_takes_the_anchor_position() {
		let (mut host, stage, layer) = host_with_layer();
		let r = rects(&mut host, stage, layer, 4);

		host.insert_before(layer, r[3], r[1]).unwrap();
		assert_eq!(host.scene().children(layer), &[r[0], r[3], r[1], r[2]]);

		host.insert_before(layer, r[0], r[2]).unwrap();
		assert_eq!(host.scene().children(layer), &[r[3], r[1], r[0], r[2]]);

		let fresh = host.create_instance("Circle", &Props::new(), stage, &()).unwrap();
		host.insert_before(layer, fresh, r[3]).unwrap();
		assert_eq!(host.scene().children(layer), &[fresh, r[3], r[1], r[0], r[2]]);
	}

	#[test]
	fn insert_before_rejects_bad_anchors() {
		let (mut host, stage, layer) = host_with_layer();
		let r = rects(&mut host, stage, layer, 2);
		let stray = host.create_instance("Rect", &Props::new(), stage, &()).unwrap();

		let error = host.insert_before(layer, r[0], r[0]).unwrap_err();
		assert!(matches!(error, Error::InvalidOrder { violation: OrderViolation::BeforeItself, .. }));
		let error = host.insert_before(layer, r[0], stray).unwrap_err();
		assert!(matches!(error, Error::InvalidOrder { violation: OrderViolation::NotASibling, .. }));
		assert_eq!(host.scene().children(layer), &[r[0], r[1]]);
	}

	#[test]
	fn removal_releases_the_whole_subtree() {
		let (mut host, stage, layer) = host_with_layer();
		let group = host.create_instance("Group", &Props::new().with("onClick", Handler::new(|_| ())), stage, &()).unwrap();
		let inner = host.create_instance("Rect", &Props::new().with("onMouseOver", Handler::new(|_| ())), stage, &()).unwrap();
		host.append_initial_child(group, inner);
		host.append_child(layer, group);
		host.reset_after_commit(stage);
		assert_eq!(host.listeners().total(), 2);
		assert!(host.is_mounted(inner));

		host.remove_child(layer, group);
		assert_eq!(host.pending_repaints(), 1);
		host.reset_after_commit(stage);

		assert_eq!(host.listeners().total(), 0);
		assert_eq!(host.listeners().retained_handlers(), 0);
		assert!(!host.is_mounted(group));
		assert!(!host.is_mounted(inner));
		assert!(!host.scene().contains(inner));
		assert!(host.scene().children(layer).is_empty());
	}

	#[test]
	fn repaints_are_deferred_to_the_end_of_the_commit() {
		let (mut host, stage, layer) = host_with_layer();
		let r = rects(&mut host, stage, layer, 3);
		host.reset_after_commit(stage);
		let before = host.scene().draw_count(layer);

		for (i, &rect) in r.iter().enumerate() {
			let old = host.scene().attrs(rect);
			let new = old.clone().with("x", i32::try_from(i).unwrap() * 10);
			let payload = host.prepare_update(rect, "Rect", &old, &new, stage, &()).unwrap();
			host.commit_update(rect, payload, "Rect", &old, &new);
		}
		assert_eq!(host.scene().draw_count(layer), before);
		host.reset_after_commit(stage);
		assert_eq!(host.scene().draw_count(layer), before + 1);
		assert_eq!(host.scene().draw_count(stage), 1);
	}

	#[test]
	fn prepare_update_skips_equal_props() {
		let (host, stage, layer) = host_with_layer();
		let props = Props::new().with("x", 1);
		assert_eq!(host.prepare_update(layer, "Layer", &props, &props.clone(), stage, &()), None);
		assert_eq!(host.prepare_update(layer, "Layer", &props, &Props::new(), stage, &()), Some(UpdateSignal));
	}

	#[test]
	fn strict_hosts_always_update() {
		let mut host = SceneHost::with_options(
			Scene::new(),
			HostOptions {
				strict: true,
				..HostOptions::default()
			},
		);
		let stage = host.create_container(&Props::new());
		let rect = host.create_instance("Rect", &Props::new().with("x", 1), stage, &()).unwrap();
		host.append_child_to_container(stage, rect);
		host.reset_after_commit(stage);

		host.scene_mut().set_attr(rect, "x", Some(Value::from(7)));
		let props = Props::new().with("x", 1);
		let payload = host.prepare_update(rect, "Rect", &props, &props.clone(), stage, &()).unwrap();
		host.commit_update(rect, payload, "Rect", &props, &props);
		assert_eq!(host.scene().attr(rect, "x"), Some(&Value::from(1)));
	}

	#[test]
	fn node_paths() {
		let (mut host, stage, layer) = host_with_layer();
		let group = host.create_instance("Group", &Props::new(), stage, &()).unwrap();
		let rect = host.create_instance("Rect", &Props::new(), stage, &()).unwrap();
		host.append_initial_child(group, rect);
		host.append_child(layer, group);

		assert_eq!(host.node_path(rect), "Stage/Layer/Group/Rect");
		assert_eq!(host.node_path(stage), "Stage");

		let stray = host.create_instance("Circle", &Props::new(), stage, &()).unwrap();
		assert_eq!(host.node_path(stray), "Circle");
	}

	#[cfg(feature = "log-paths")]
	#[test]
	fn order_errors_name_the_path() {
		let (mut host, stage, layer) = host_with_layer();
		let r = rects(&mut host, stage, layer, 1);
		match host.insert_before(layer, r[0], r[0]).unwrap_err() {
			Error::InvalidOrder { node, .. } => assert_eq!(node, format!("Stage/Layer/Rect ({:?})", r[0])),
			error => panic!("unexpected error: {}", error),
		}
	}

	#[cfg(not(feature = "log-paths"))]
	#[test]
	fn order_errors_name_the_handle() {
		let (mut host, stage, layer) = host_with_layer();
		let r = rects(&mut host, stage, layer, 1);
		match host.insert_before(layer, r[0], r[0]).unwrap_err() {
			Error::InvalidOrder { node, .. } => assert_eq!(node, format!("{:?}", r[0])),
			error => panic!("unexpected error: {}", error),
		}
	}

	#[test]
	fn text_is_rejected() {
		let (mut host, stage, _) = host_with_layer();
		assert!(matches!(host.create_text_instance("hi", stage, &()), Err(Error::UnsupportedTextChild { .. })));
		assert!(!host.should_set_text_content("Text", &Props::new().with("text", "hi")));
	}

	#[test]
	fn container_lifecycle() {
		let mut host = SceneHost::new(Scene::new());
		let stage = host.create_container(&Props::new().with("width", 10));
		assert_eq!(host.scene().attr(stage, "width"), Some(&Value::from(10)));
		assert!(host.update_container(stage, &Props::new().with("width", 20), &Props::new().with("width", 10)));
		host.destroy_container(stage);
		assert!(host.scene().is_empty());
		assert!(!host.is_mounted(stage));
	}

	#[test]
	fn scheduling_is_forwarded() {
		let driver = ManualScheduler::new();
		let mut host = SceneHost::new(Scene::new()).with_scheduler(driver.clone());
		let id = host.schedule_deferred_callback(Box::new(|| ()));
		host.schedule_deferred_callback(Box::new(|| ()));
		host.cancel_deferred_callback(id);
		driver.advance(Duration::from_millis(5));
		assert_eq!(host.now(), Duration::from_millis(5));
		assert_eq!(driver.run_pending(), 1);
	}
}
