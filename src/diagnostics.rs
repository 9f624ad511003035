//! Advisory warnings that are emitted at most once.
//!
//! Create one [`Diagnostics`] at startup and hand clones of it to every [`SceneHost`](`crate::adapter::SceneHost`)
//! to get once-per-process behaviour. Separate instances warn independently.

use std::{cell::Cell, rc::Rc};
use tracing::warn;

#[derive(Debug, Default)]
struct Flags {
	id: Cell<bool>,
	z_index: Cell<bool>,
	drag: Cell<bool>,
}

/// Shared warn-once state.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics(Rc<Flags>);

impl Diagnostics {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns whether a warning was emitted.
	pub fn warn_id(&self) -> bool {
		once(&self.0.id, || {
			warn!(
				"The `id` attribute is reserved for internal use by the scene graph library. \
				Selecting nodes by `id` may conflict with other code; prefer keeping handles from `get_public_instance`."
			);
		})
	}

	/// Returns whether a warning was emitted.
	pub fn warn_z_index(&self) -> bool {
		once(&self.0.z_index, || {
			warn!(
				"The `zIndex` attribute conflicts with child order management. \
				Order nodes by their position among their siblings instead."
			);
		})
	}

	/// Returns whether a warning was emitted.
	pub fn warn_drag_position(&self) -> bool {
		once(&self.0.drag, || {
			warn!(
				"A draggable node has a fixed position but no `onDragMove` or `onDragEnd` handler. \
				Its position will be reset on the next update that touches it."
			);
		})
	}

	#[must_use]
	pub fn any_emitted(&self) -> bool {
		self.0.id.get() || self.0.z_index.get() || self.0.drag.get()
	}
}

fn once(flag: &Cell<bool>, emit: impl FnOnce()) -> bool {
	if flag.replace(true) {
		false
	} else {
		emit();
		true
	}
}
