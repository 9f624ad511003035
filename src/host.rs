//! The inbound contract a reconciliation engine drives during its commits.
//!
//! The engine calls these in the order it decides. No two calls overlap and none of them suspend.
//! Work the engine abandons before committing never reaches the host.

use crate::{props::Props, schedule::CallbackId};
use core::{fmt::Debug, hash::Hash, time::Duration};

pub trait HostConfig {
	type Instance: Copy + Eq + Hash + Debug;
	type Container: Copy + Eq + Debug;
	/// Hosts that don't support text use an uninhabited type here.
	type TextInstance;
	/// The handle that is handed out to user code.
	type PublicInstance;
	type HostContext: Clone;
	/// Returned by [`prepare_update`](`HostConfig::prepare_update`) when there is something to commit.
	type UpdatePayload;
	type Error: std::error::Error;

	/// Creates a detached instance with `props` already applied.
	///
	/// # Errors
	///
	/// Iff `tag` can't be materialised.
	fn create_instance(&mut self, tag: &str, props: &Props, root: Self::Container, context: &Self::HostContext) -> Result<Self::Instance, Self::Error>;

	/// # Errors
	///
	/// Iff the host doesn't support bare text.
	fn create_text_instance(&mut self, text: &str, root: Self::Container, context: &Self::HostContext) -> Result<Self::TextInstance, Self::Error>;

	/// Attaches `child` to a `parent` that isn't mounted yet.
	fn append_initial_child(&mut self, parent: Self::Instance, child: Self::Instance);

	/// Makes `child` the last child of `parent`, moving it if it's already one of its children.
	fn append_child(&mut self, parent: Self::Instance, child: Self::Instance);

	fn append_child_to_container(&mut self, container: Self::Container, child: Self::Instance);

	/// Moves or attaches `child` so that it comes directly before `before` among `parent`'s children.
	///
	/// # Errors
	///
	/// Iff `before` can't be used as anchor for `child` under `parent`.
	fn insert_before(&mut self, parent: Self::Instance, child: Self::Instance, before: Self::Instance) -> Result<(), Self::Error>;

	/// # Errors
	///
	/// As [`insert_before`](`HostConfig::insert_before`).
	fn insert_in_container_before(&mut self, container: Self::Container, child: Self::Instance, before: Self::Instance) -> Result<(), Self::Error>;

	/// Detaches and destroys `child` and its descendants.
	fn remove_child(&mut self, parent: Self::Instance, child: Self::Instance);

	fn remove_child_from_container(&mut self, container: Self::Container, child: Self::Instance);

	/// Decides whether [`commit_update`](`HostConfig::commit_update`) needs to run for this change.
	fn prepare_update(
		&self,
		instance: Self::Instance,
		tag: &str,
		old_props: &Props,
		new_props: &Props,
		root: Self::Container,
		context: &Self::HostContext,
	) -> Option<Self::UpdatePayload>;

	fn commit_update(&mut self, instance: Self::Instance, payload: Self::UpdatePayload, tag: &str, old_props: &Props, new_props: &Props);

	/// # Errors
	///
	/// Iff the host doesn't support bare text.
	fn commit_text_update(&mut self, text_instance: &mut Self::TextInstance, old_text: &str, new_text: &str) -> Result<(), Self::Error>;

	/// Runs after mounting for instances whose [`finalize_initial_children`](`HostConfig::finalize_initial_children`) returned `true`.
	fn commit_mount(&mut self, instance: Self::Instance, tag: &str, props: &Props);

	/// Returns whether [`commit_mount`](`HostConfig::commit_mount`) should be called for `instance`.
	fn finalize_initial_children(&mut self, instance: Self::Instance, tag: &str, props: &Props, root: Self::Container, context: &Self::HostContext) -> bool;

	fn get_public_instance(&self, instance: Self::Instance) -> Self::PublicInstance;

	fn prepare_for_commit(&mut self, container: Self::Container);

	fn reset_after_commit(&mut self, container: Self::Container);

	fn reset_text_content(&mut self, instance: Self::Instance);

	fn should_set_text_content(&self, tag: &str, props: &Props) -> bool;

	fn should_deprioritize_subtree(&self, tag: &str, props: &Props) -> bool;

	fn get_root_host_context(&self, root: Self::Container) -> Self::HostContext;

	fn get_child_host_context(&self, parent_context: &Self::HostContext, tag: &str, root: Self::Container) -> Self::HostContext;

	fn schedule_deferred_callback(&mut self, callback: Box<dyn FnOnce()>) -> CallbackId;

	fn cancel_deferred_callback(&mut self, id: CallbackId);

	fn now(&self) -> Duration;
}
