use core::fmt;
use thiserror::Error;

/// Failures surfaced to the invoking commit.
///
/// None of these are transient: Each one points to a contract violation by the caller or the reconciliation engine.
#[derive(Debug, Error)]
pub enum Error {
	#[error("Unsupported node type {tag:?}")]
	UnsupportedType { tag: String },

	#[error("Text children are not supported, wrap {text:?} in a `Text` node instead")]
	UnsupportedTextChild { text: String },

	#[error("Invalid sibling order for {node}: {violation}")]
	InvalidOrder { node: String, violation: OrderViolation },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderViolation {
	/// `insert_before(parent, x, x)`.
	BeforeItself,
	/// The anchor passed to `insert_before` isn't a child of the given parent.
	NotASibling,
}

impl fmt::Display for OrderViolation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::BeforeItself => f.write_str("a node can't be inserted before itself"),
			Self::NotASibling => f.write_str("the anchor node isn't a child of the target parent"),
		}
	}
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
