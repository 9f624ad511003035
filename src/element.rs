//! Declarative node descriptors.

use crate::props::{Props, Value};

/// An immutable description of a desired scene node.
///
/// These are produced and diffed by the reconciliation engine. The bridge only ever reads them.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
	Node {
		/// The declarative type tag, e.g. `"Rect"`.
		tag: String,
		/// Sibling identity used by the engine to match old and new children.
		key: Option<String>,
		props: Props,
		children: Vec<Element>,
	},
	/// A bare text child. These are always rejected by the bridge.
	Text(String),
}

impl Element {
	#[must_use]
	pub fn new(tag: impl Into<String>) -> Self {
		Self::Node {
			tag: tag.into(),
			key: None,
			props: Props::new(),
			children: Vec::new(),
		}
	}

	#[must_use]
	pub fn text(text: impl Into<String>) -> Self {
		Self::Text(text.into())
	}

	/// Sets a prop. No-op on [`Element::Text`].
	#[must_use]
	pub fn prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		if let Self::Node { props, .. } = &mut self {
			props.insert(name, value);
		}
		self
	}

	/// Replaces all props. No-op on [`Element::Text`].
	#[must_use]
	pub fn props(mut self, new_props: Props) -> Self {
		if let Self::Node { props, .. } = &mut self {
			*props = new_props;
		}
		self
	}

	#[must_use]
	pub fn key(mut self, new_key: impl Into<String>) -> Self {
		if let Self::Node { key, .. } = &mut self {
			*key = Some(new_key.into());
		}
		self
	}

	#[must_use]
	pub fn child(mut self, child: Element) -> Self {
		if let Self::Node { children, .. } = &mut self {
			children.push(child);
		}
		self
	}

	#[must_use]
	pub fn children(mut self, new_children: impl IntoIterator<Item = Element>) -> Self {
		if let Self::Node { children, .. } = &mut self {
			children.extend(new_children);
		}
		self
	}

	#[must_use]
	pub fn tag(&self) -> Option<&str> {
		match self {
			Self::Node { tag, .. } => Some(tag),
			Self::Text(_) => None,
		}
	}

	#[must_use]
	pub fn get_key(&self) -> Option<&str> {
		match self {
			Self::Node { key, .. } => key.as_deref(),
			Self::Text(_) => None,
		}
	}

	#[must_use]
	pub fn get_props(&self) -> Option<&Props> {
		match self {
			Self::Node { props, .. } => Some(props),
			Self::Text(_) => None,
		}
	}

	#[must_use]
	pub fn get_children(&self) -> &[Element] {
		match self {
			Self::Node { children, .. } => children,
			Self::Text(_) => &[],
		}
	}
}
