//! DOM-order enumeration of the nodes a view occupies.

use super::definition::{SlotKind, ViewKind};
use super::instance::{ContainerHost, Slot, ViewContainer, ViewInstance};
use reinhardt_dom::NodeId;

/// Enumerates the top-level DOM nodes of a view, in DOM order.
///
/// The serializer uses the count of collected nodes as a view's
/// `numRootNodes`, and the first collected node as a slot's start position.
pub trait NativeNodeCollector {
	/// Collects the nodes of `start` and every slot following it through
	/// template `next` links.
	fn collect_native_nodes(
		&self,
		view: &ViewInstance,
		start: Option<usize>,
		out: &mut Vec<NodeId>,
	) {
		let definition = view.definition();
		for index in definition.siblings(start) {
			self.collect_slot(view, index, out);
		}
	}

	/// Collects the DOM nodes occupied by a single slot.
	fn collect_slot(&self, view: &ViewInstance, index: usize, out: &mut Vec<NodeId>);
}

/// Collector following template structure: a container contributes its
/// views and then its anchor, an element container its children and then
/// its anchor, a projection slot the nodes projected into it.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateOrderCollector;

impl TemplateOrderCollector {
	fn collect_container(&self, container: &ViewContainer, out: &mut Vec<NodeId>) {
		for child in container.views() {
			let definition = child.definition();
			match definition.kind() {
				ViewKind::Component => out.extend(child.host()),
				ViewKind::Embedded => {
					self.collect_native_nodes(child, definition.first_child(), out)
				}
			}
		}
		out.push(container.anchor());
	}
}

impl NativeNodeCollector for TemplateOrderCollector {
	fn collect_slot(&self, view: &ViewInstance, index: usize, out: &mut Vec<NodeId>) {
		let slot = view.definition().slot(index);
		if slot.kind == SlotKind::ElementContainer {
			self.collect_native_nodes(view, slot.child, out);
			out.extend(view.native_node(index));
			return;
		}
		match view.slot(index) {
			Slot::Empty => {}
			Slot::Node(node) => out.push(*node),
			Slot::Projection(nodes) => out.extend_from_slice(nodes),
			Slot::Component(child) => out.extend(child.host()),
			Slot::Container(container) => {
				if let ContainerHost::Component(component) = container.host() {
					out.extend(component.host());
				} else if slot.kind != SlotKind::Container {
					out.extend(container.host_node());
				}
				self.collect_container(container, out);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::view::TemplateBuilder;
	use reinhardt_dom::Document;
	use rstest::rstest;

	#[rstest]
	fn test_collects_container_views_before_anchor_and_ng_container_children() {
		let row = {
			let mut builder = TemplateBuilder::embedded("row");
			builder.element(None, "li");
			builder.element(None, "li");
			builder.build()
		};
		let mut builder = TemplateBuilder::component("list");
		let group = builder.element_container(None);
		builder.text(Some(group), "x");
		let rows = builder.template(None, row.clone());
		let definition = builder.build();

		let mut document = Document::new();
		let nodes: Vec<NodeId> = (0..6).map(|_| document.create_comment("n")).collect();
		let mut view = ViewInstance::new(definition, None);
		view.set_slot(group, Slot::Node(nodes[0]));
		view.set_slot(1, Slot::Node(nodes[1]));
		let mut container = ViewContainer::new(ContainerHost::Node(nodes[2]), nodes[2]);
		let mut child = ViewInstance::new(row, None);
		child.set_slot(0, Slot::Node(nodes[3]));
		child.set_slot(1, Slot::Node(nodes[4]));
		container.push_view(child);
		view.set_slot(rows, Slot::Container(container));

		let mut out = Vec::new();
		let first = view.definition().first_child();
		TemplateOrderCollector.collect_native_nodes(&view, first, &mut out);

		assert_eq!(out, [nodes[1], nodes[0], nodes[3], nodes[4], nodes[2]]);
	}
}
