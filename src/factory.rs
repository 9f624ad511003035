//! Node creation.

use crate::{
	apply::PropApplier,
	error::{Error, Result},
	kind::NodeKind,
	props::Props,
	redraw::RedrawCoalescer,
	scene::SceneGraph,
};
use tracing::{error, instrument, trace};

/// Creates a scene node for the declarative type `tag` and applies `props` to it.
///
/// The node isn't attached to anything yet.
///
/// # Errors
///
/// [`Error::UnsupportedType`] iff `tag` isn't a supported node type.
/// `"Stage"` is rejected too, since stages are only created as containers by the root bridge.
/// Nothing is constructed in that case.
#[instrument(skip(scene, applier, redraw, props))]
pub fn create_node<S: SceneGraph>(
	scene: &mut S,
	applier: &mut PropApplier<S::Node>,
	redraw: &mut RedrawCoalescer<S::Node>,
	tag: &str,
	props: &Props,
) -> Result<S::Node> {
	let kind = match NodeKind::from_tag(tag) {
		Ok(NodeKind::Stage) | Err(_) => {
			error!(tag, "Unsupported node type.");
			return Err(Error::UnsupportedType { tag: tag.to_owned() });
		}
		Ok(kind) => kind,
	};

	let node = scene.create_node(kind);
	trace!(?node, "Created.");
	applier.apply(scene, redraw, node, props, &Props::new());
	Ok(node)
}

/// The error for every attempt to materialise bare text.
#[must_use]
pub fn text_child_error(text: &str) -> Error {
	error!(
		text = if cfg!(feature = "dangerous-logging") { text } else { "…" },
		"Bare text isn't supported as a child."
	);
	Error::UnsupportedTextChild { text: text.to_owned() }
}
