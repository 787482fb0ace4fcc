//! Hydration error types.
//!
//! Annotation and reconciliation failures are fatal for the view being
//! processed: nothing here is retried, and the engine never falls back to
//! creating nodes on its own.

use crate::dom_path::NavigationError;
use reinhardt_dom::{DomError, NodeId};
use thiserror::Error;

/// Result type for hydration operations.
pub type HydrationResult<T> = Result<T, HydrationError>;

/// Hydration engine errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HydrationError {
	/// Live DOM does not have the shape the annotation describes.
	#[error("hydration structure mismatch: {0}")]
	StructuralMismatch(String),

	/// A located node does not match the slot that claims it.
	#[error("hydration node mismatch at slot {slot}: expected {expected}, found {actual}")]
	NodeMismatch {
		/// Slot index in the view definition.
		slot: usize,
		/// What the template expects.
		expected: String,
		/// What the DOM holds.
		actual: String,
	},

	/// The render tree has a shape the wire format cannot express.
	#[error("unsupported hydration structure: {0}")]
	UnsupportedStructure(String),

	/// Hydration of this construct is not implemented.
	#[error("hydration is not implemented for {0}")]
	NotImplemented(&'static str),

	/// No path from the slot's parent or from `<body>` reaches the node.
	#[error("slot {slot} is connected but unreachable from its parent and from <body>")]
	DetachedNode {
		/// Slot index in the view definition.
		slot: usize,
	},

	/// Navigation failure surfaced under the strict sibling-miss policy.
	#[error(transparent)]
	Navigation(#[from] NavigationError),

	/// A node location string could not be decoded.
	#[error("malformed node location: {0:?}")]
	MalformedNodeLocation(String),

	/// The annotation could not be encoded, or an annotation attribute is
	/// not valid for the wire format.
	#[error("invalid hydration annotation: {0}")]
	Annotation(#[from] serde_json::Error),

	/// A node was bound to two slots.
	#[error("node {0} was already claimed for hydration")]
	NodeAlreadyClaimed(NodeId),

	/// Underlying DOM operation failed.
	#[error(transparent)]
	Dom(#[from] DomError),
}

impl HydrationError {
	pub(crate) fn mismatch(reason: impl Into<String>) -> Self {
		Self::StructuralMismatch(reason.into())
	}
}
