//! The root surface bridge: one stage per mounted root, driven through an external reconciliation engine.

use crate::{
	adapter::SceneHost,
	element::Element,
	error::Result,
	host::HostConfig,
	props::Props,
	scene::SceneGraph,
};
use tracing::{info, instrument};

/// The entry points of a reconciliation engine that are needed to drive a root.
///
/// Implementations call back into `host` for every mutation, bracketed by
/// [`prepare_for_commit`](`HostConfig::prepare_for_commit`) and [`reset_after_commit`](`HostConfig::reset_after_commit`).
pub trait Reconciler<H: HostConfig> {
	/// The engine's bookkeeping for one container.
	type Root;

	fn create_container(&mut self, host: &mut H, container: H::Container) -> Self::Root;

	/// Reconciles `root`'s children against `children` and commits the result.
	///
	/// # Errors
	///
	/// Iff the host rejected part of the commit. The commit is aborted at that point.
	fn update_container(&mut self, host: &mut H, root: &mut Self::Root, children: &[Element]) -> Result<(), H::Error>;
}

/// Surface dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageConfig {
	pub width: f64,
	pub height: f64,
}

impl StageConfig {
	#[must_use]
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	fn merge_into(self, mut props: Props) -> Props {
		props.insert("width", self.width);
		props.insert("height", self.height);
		props
	}
}

/// A mounted root: a stage container plus the engine state for its subtree.
pub struct StageRoot<S: SceneGraph, R: Reconciler<SceneHost<S>>> {
	host: SceneHost<S>,
	reconciler: R,
	root: R::Root,
	container: S::Node,
	props: Props,
}

impl<S: SceneGraph, R: Reconciler<SceneHost<S>>> StageRoot<S, R> {
	/// Creates the stage sized to `config` with `props` applied, then commits `children` into it.
	///
	/// # Errors
	///
	/// Iff the initial commit fails.
	#[instrument(skip(host, reconciler, props, children))]
	pub fn mount(mut host: SceneHost<S>, mut reconciler: R, config: StageConfig, props: Props, children: &[Element]) -> Result<Self> {
		let props = config.merge_into(props);
		let container = host.create_container(&props);
		let mut root = reconciler.create_container(&mut host, container);
		reconciler.update_container(&mut host, &mut root, children)?;
		info!(?container, "Mounted.");
		Ok(Self {
			host,
			reconciler,
			root,
			container,
			props,
		})
	}

	/// Re-applies changed top-level attributes and commits `children`.
	///
	/// # Errors
	///
	/// Iff the commit fails.
	#[instrument(skip(self, props, children))]
	pub fn update(&mut self, config: StageConfig, props: Props, children: &[Element]) -> Result<()> {
		let props = config.merge_into(props);
		self.host.update_container(self.container, &props, &self.props);
		self.props = props;
		self.reconciler.update_container(&mut self.host, &mut self.root, children)
	}

	/// Commits an empty tree, so every node goes through regular removal, then destroys the stage.
	///
	/// Returns the host for inspection or reuse.
	///
	/// # Errors
	///
	/// Iff the emptying commit fails. The stage is destroyed regardless.
	#[instrument(skip(self))]
	pub fn unmount(mut self) -> Result<SceneHost<S>> {
		let result = self.reconciler.update_container(&mut self.host, &mut self.root, &[]);
		self.host.destroy_container(self.container);
		result.map(|()| self.host)
	}

	#[must_use]
	pub fn container(&self) -> S::Node {
		self.container
	}

	#[must_use]
	pub fn host(&self) -> &SceneHost<S> {
		&self.host
	}

	#[must_use]
	pub fn scene(&self) -> &S {
		self.host.scene()
	}

	#[must_use]
	pub fn engine_root(&self) -> &R::Root {
		&self.root
	}
}
