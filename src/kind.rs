//! The closed vocabulary of scene node types.

use crate::Error;
use core::{fmt, str::FromStr};

/// A supported scene node type.
///
/// Tags are matched exactly (case-sensitive), as they are emitted by the reconciliation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
	/// The root surface. Only the [`StageRoot`](`crate::root::StageRoot`) creates these.
	Stage,
	Layer,
	FastLayer,
	Group,
	Label,
	Rect,
	Circle,
	Ellipse,
	Wedge,
	Line,
	Sprite,
	Image,
	Text,
	TextPath,
	Star,
	Ring,
	Arc,
	Tag,
	Path,
	RegularPolygon,
	Arrow,
	Shape,
	Transformer,
}

const TAGS: [(&str, NodeKind); 23] = [
	("Stage", NodeKind::Stage),
	("Layer", NodeKind::Layer),
	("FastLayer", NodeKind::FastLayer),
	("Group", NodeKind::Group),
	("Label", NodeKind::Label),
	("Rect", NodeKind::Rect),
	("Circle", NodeKind::Circle),
	("Ellipse", NodeKind::Ellipse),
	("Wedge", NodeKind::Wedge),
	("Line", NodeKind::Line),
	("Sprite", NodeKind::Sprite),
	("Image", NodeKind::Image),
	("Text", NodeKind::Text),
	("TextPath", NodeKind::TextPath),
	("Star", NodeKind::Star),
	("Ring", NodeKind::Ring),
	("Arc", NodeKind::Arc),
	("Tag", NodeKind::Tag),
	("Path", NodeKind::Path),
	("RegularPolygon", NodeKind::RegularPolygon),
	("Arrow", NodeKind::Arrow),
	("Shape", NodeKind::Shape),
	("Transformer", NodeKind::Transformer),
];

impl NodeKind {
	/// Parses a declarative type tag.
	///
	/// # Errors
	///
	/// Iff `tag` isn't one of the supported tags.
	pub fn from_tag(tag: &str) -> Result<Self, Error> {
		TAGS.iter()
			.find(|(candidate, _)| *candidate == tag)
			.map(|&(_, kind)| kind)
			.ok_or_else(|| Error::UnsupportedType { tag: tag.to_owned() })
	}

	#[must_use]
	pub fn tag(self) -> &'static str {
		TAGS.iter().find(|(_, kind)| *kind == self).map_or("Stage", |&(tag, _)| tag)
	}

	/// Whether nodes of this kind own a batched repaint.
	#[must_use]
	pub fn is_drawable_unit(self) -> bool {
		matches!(self, Self::Stage | Self::Layer | Self::FastLayer)
	}

	/// Layers, as opposed to the stage.
	#[must_use]
	pub fn is_layer(self) -> bool {
		matches!(self, Self::Layer | Self::FastLayer)
	}
}

impl FromStr for NodeKind {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_tag(s)
	}
}

impl fmt::Display for NodeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.tag())
	}
}
