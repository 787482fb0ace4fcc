//! Error types for DOM mutation and parsing.

use crate::NodeId;
use thiserror::Error;

/// Errors raised by [`Document`](crate::Document) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DomError {
	/// Inserting `child` under `parent` would produce an invalid tree
	/// (a non-container parent, or a cycle).
	#[error("cannot insert {child} under {parent}")]
	HierarchyRequest {
		/// The would-be parent.
		parent: NodeId,
		/// The node being inserted.
		child: NodeId,
	},

	/// The reference node is not a child of the given parent.
	#[error("{node} is not a child of {parent}")]
	NotAChild {
		/// The parent that was searched.
		parent: NodeId,
		/// The node that was expected to be a child.
		node: NodeId,
	},

	/// The operation requires an element node.
	#[error("{0} is not an element")]
	NotAnElement(NodeId),

	/// The operation requires a node with a parent.
	#[error("{0} has no parent")]
	Detached(NodeId),

	/// HTML input could not be parsed.
	#[error("HTML parse error: {0}")]
	Parse(String),
}

/// Result type for DOM operations.
pub type DomResult<T> = Result<T, DomError>;
