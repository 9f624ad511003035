//! Attribute maps as they come from declarative node descriptors.
//!
//! Keys starting with `on` name event handlers. A handful of keys are framework bookkeeping and never reach the scene graph,
//! see [`is_reserved`].

use core::fmt;
use hashbrown::HashMap;
use std::{collections::BTreeMap, rc::Rc};

/// Keys that are skipped entirely when applying attributes.
pub const RESERVED_KEYS: [&str; 5] = ["children", "key", "ref", "style", "forwardedRef"];

#[must_use]
pub fn is_reserved(key: &str) -> bool {
	RESERVED_KEYS.contains(&key)
}

/// Whether `key` names an event handler (`onClick`, `onDragEnd`, …).
///
/// A bare `on` names no event, so it is an ordinary attribute.
#[must_use]
pub fn is_event_key(key: &str) -> bool {
	key.len() > 2 && key.starts_with("on")
}

/// Derives the scene graph event name from a handler key.
///
/// `onClick` → `click`, `onDragEnd` → `dragEnd`, `onContentMouseMove` → `contentMouseMove`.
/// The character following a `content` prefix is always upper-case, so `onContentmousemove` → `contentMousemove`.
///
/// Returns [`None`] iff `key` is not an event key.
#[must_use]
pub fn event_name(key: &str) -> Option<String> {
	const CONTENT: &str = "content";

	if !is_event_key(key) {
		return None;
	}

	let rest = &key[2..];
	let mut chars = rest.chars();
	let mut name: String = chars.next().map(|first| first.to_lowercase().chain(chars).collect()).unwrap_or_default();

	if name.len() > CONTENT.len() && name.starts_with(CONTENT) {
		let tail = name.split_off(CONTENT.len());
		let mut tail_chars = tail.chars();
		if let Some(first) = tail_chars.next() {
			name.extend(first.to_uppercase());
			name.extend(tail_chars);
		}
	}
	Some(name)
}

/// Payload passed to event handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
	/// The event name without namespace, e.g. `click`.
	pub name: String,
	pub detail: Value,
}

/// A reference-counted event handler.
///
/// Handlers compare by identity, like function references do in the reconciliation engine:
/// Two clones of one [`Handler`] are equal, two separately created handlers never are.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&Event)>);

impl Handler {
	pub fn new(f: impl 'static + Fn(&Event)) -> Self {
		Self(Rc::new(f))
	}

	pub fn call(&self, event: &Event) {
		(self.0)(event);
	}

	/// A key that is unique among live handlers.
	#[must_use]
	pub fn id(&self) -> HandlerId {
		HandlerId(Rc::as_ptr(&self.0).cast::<()>() as usize)
	}
}

impl PartialEq for Handler {
	fn eq(&self, other: &Self) -> bool {
		self.id() == other.id()
	}
}

impl fmt::Debug for Handler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Handler").field(&self.id()).finish()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(usize);

/// An attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Null,
	Bool(bool),
	Number(f64),
	String(String),
	List(Vec<Value>),
	Map(BTreeMap<String, Value>),
	Handler(Handler),
}

impl Value {
	#[must_use]
	pub fn as_handler(&self) -> Option<&Handler> {
		match self {
			Self::Handler(handler) => Some(handler),
			_ => None,
		}
	}

	#[must_use]
	pub fn is_truthy(&self) -> bool {
		match self {
			Self::Null => false,
			Self::Bool(value) => *value,
			Self::Number(number) => *number != 0.0 && !number.is_nan(),
			Self::String(string) => !string.is_empty(),
			Self::List(_) | Self::Map(_) | Self::Handler(_) => true,
		}
	}
}

impl From<f64> for Value {
	fn from(number: f64) -> Self {
		Self::Number(number)
	}
}

impl From<i32> for Value {
	fn from(number: i32) -> Self {
		Self::Number(number.into())
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<&str> for Value {
	fn from(string: &str) -> Self {
		Self::String(string.to_owned())
	}
}

impl From<String> for Value {
	fn from(string: String) -> Self {
		Self::String(string)
	}
}

impl From<Handler> for Value {
	fn from(handler: Handler) -> Self {
		Self::Handler(handler)
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(items: Vec<T>) -> Self {
		Self::List(items.into_iter().map(Into::into).collect())
	}
}

/// A string-keyed attribute map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props(HashMap<String, Value>);

impl Props {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style [`insert`](`Props::insert`).
	#[must_use]
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.insert(key, value);
		self
	}

	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.0.insert(key.into(), value.into())
	}

	#[must_use]
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	#[must_use]
	pub fn contains_key(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value))
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}
}

impl IntoIterator for Props {
	type Item = (String, Value);
	type IntoIter = hashbrown::hash_map::IntoIter<String, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Props {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Self(iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
	}
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Props {
	fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
		self.0.extend(iter.into_iter().map(|(key, value)| (key.into(), value.into())));
	}
}
