//! Navigation paths between two live nodes.

use crate::node_location::{NavigationStep, ReferenceNode, compress_node_location};
use reinhardt_dom::{Document, NodeId};
use thiserror::Error;

/// Why no navigation path could be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigationError {
	/// Climbing from `finish` reached a node without a parent.
	#[error("no path from {start} to {finish}: ran past the top of the document")]
	NoPathFound { start: NodeId, finish: NodeId },

	/// `start` and `finish` share a parent but `finish` does not follow
	/// `start`.
	#[error("{finish} is not a following sibling of {start}")]
	SiblingNotFound { start: NodeId, finish: NodeId },
}

/// Computes the `firstChild` / `nextSibling` steps leading from `start` to
/// `finish`.
///
/// `finish` must lie in the subtree of `start`, in the subtree of one of its
/// following siblings, or be one of those siblings.
pub fn navigate_between(
	document: &Document,
	start: NodeId,
	finish: NodeId,
) -> Result<Vec<NavigationStep>, NavigationError> {
	let mut steps = Vec::new();
	push_steps(document, start, finish, &mut steps)?;
	Ok(steps)
}

fn push_steps(
	document: &Document,
	start: NodeId,
	finish: NodeId,
	steps: &mut Vec<NavigationStep>,
) -> Result<(), NavigationError> {
	if start == finish {
		return Ok(());
	}
	let (Some(start_parent), Some(finish_parent)) =
		(document.parent(start), document.parent(finish))
	else {
		return Err(NavigationError::NoPathFound { start, finish });
	};

	if start_parent == finish_parent {
		return push_sibling_steps(document, start, finish, steps);
	}

	// Reach the parent of `finish`, descend, then walk its children.
	push_steps(document, start, finish_parent, steps)?;
	steps.push(NavigationStep::FirstChild);
	let first = document
		.first_child(finish_parent)
		.ok_or(NavigationError::NoPathFound { start, finish })?;
	push_steps(document, first, finish, steps)
}

fn push_sibling_steps(
	document: &Document,
	start: NodeId,
	finish: NodeId,
	steps: &mut Vec<NavigationStep>,
) -> Result<(), NavigationError> {
	let mut current = start;
	while current != finish {
		current = document
			.next_sibling(current)
			.ok_or(NavigationError::SiblingNotFound { start, finish })?;
		steps.push(NavigationStep::NextSibling);
	}
	Ok(())
}

/// Computes the compressed location of `to` relative to `from`.
///
/// Returns `Ok(None)` when `to` cannot be reached by climbing (for example
/// because it is detached); a sibling-walk miss is surfaced as an error so
/// callers can choose how to treat it.
pub fn calc_path_between(
	document: &Document,
	from: NodeId,
	to: NodeId,
	reference: ReferenceNode,
) -> Result<Option<String>, NavigationError> {
	match navigate_between(document, from, to) {
		Ok(steps) => Ok(Some(compress_node_location(reference, &steps))),
		Err(NavigationError::NoPathFound { .. }) => Ok(None),
		Err(error) => Err(error),
	}
}
