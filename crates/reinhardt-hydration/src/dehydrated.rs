//! Server-rendered views waiting to be claimed by a view container.

use crate::annotation::{SerializedContainer, SerializedContainerView};
use crate::error::{HydrationError, HydrationResult};
use crate::view::ViewContainer;
use reinhardt_dom::{Document, NodeId};
use std::sync::Arc;
use tracing::debug;

/// A server-rendered view not yet bound to a client view.
///
/// Repeated views share their annotation; each record has its own
/// `first_child`.
#[derive(Debug, Clone)]
pub struct DehydratedView {
	data: Arc<SerializedContainerView>,
	first_child: Option<NodeId>,
}

impl DehydratedView {
	pub fn new(data: Arc<SerializedContainerView>, first_child: Option<NodeId>) -> Self {
		Self { data, first_child }
	}

	pub fn data(&self) -> &SerializedContainerView {
		&self.data
	}

	pub fn template(&self) -> &str {
		&self.data.template
	}

	pub fn num_root_nodes(&self) -> usize {
		self.data.num_root_nodes
	}

	/// First top-level DOM node, `None` for views rendering no nodes.
	pub fn first_child(&self) -> Option<NodeId> {
		self.first_child
	}
}

/// Expands a container annotation into one record per rendered view and
/// finds the container's anchor.
///
/// `start` is the container's first DOM node: the first node of its first
/// view, or the anchor itself when no view rendered any node. Multipliers
/// are unrolled.
pub fn locate_dehydrated_views_in_container(
	document: &Document,
	start: NodeId,
	container: &SerializedContainer,
) -> HydrationResult<(NodeId, Vec<DehydratedView>)> {
	let mut current = Some(start);
	let mut views = Vec::new();

	for serialized in &container.views {
		let data = Arc::new(serialized.clone());
		let num_root_nodes = serialized.num_root_nodes;
		for _ in 0..serialized.multiplier() {
			let mut first_child = None;
			if num_root_nodes > 0 {
				let node = current.ok_or_else(|| {
					HydrationError::mismatch(format!(
						"container ran out of nodes while locating a view of template {}",
						serialized.template
					))
				})?;
				first_child = Some(node);
				current = document.sibling_after(node, num_root_nodes);
			}
			views.push(DehydratedView::new(Arc::clone(&data), first_child));
		}
	}

	let anchor = current
		.ok_or_else(|| HydrationError::mismatch("container anchor is missing after its views"))?;
	if !document.is_comment(anchor) {
		return Err(HydrationError::mismatch(format!(
			"expected a container anchor comment at {anchor}, found {}",
			document.node_type(anchor)
		)));
	}
	debug!(views = views.len(), %anchor, "located dehydrated views");
	Ok((anchor, views))
}

/// Removes and returns the first unclaimed view rendered from `template`.
pub fn find_matching_dehydrated_view(
	container: &mut ViewContainer,
	template: &str,
) -> Option<DehydratedView> {
	let views = container.dehydrated_views_mut();
	let position = views.iter().position(|view| view.template() == template)?;
	Some(views.remove(position))
}
