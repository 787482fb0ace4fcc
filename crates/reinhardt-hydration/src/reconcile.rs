//! Client-side reconciliation: binding template slots to existing DOM.
//!
//! The instruction layer walks a view definition in template order and, for
//! every slot that owns DOM, calls [`locate_next_rnode`] instead of creating
//! a node. The located node is validated, claimed and stored in the slot,
//! which is what lets the next slot be found relative to it.

use crate::annotation::{SerializedContainer, SerializedView, TextNodeMarker};
use crate::config::HydrationConfig;
use crate::dehydrated::{DehydratedView, find_matching_dehydrated_view};
use crate::error::{HydrationError, HydrationResult};
use crate::node_location::{NavigationStep, ReferenceNode, decompress_node_location};
use crate::stats::HydrationStats;
use crate::view::{SlotDef, SlotKind, ViewContainer, ViewInstance};
use reinhardt_dom::{Document, NodeId, NodeKind};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Annotation of one view being hydrated, plus where its DOM starts.
#[derive(Debug, Clone, Default)]
pub struct HydrationInfo {
	data: SerializedView,
	first_child: Option<NodeId>,
	segment_heads: HashMap<usize, NodeId>,
}

impl HydrationInfo {
	pub fn new(data: SerializedView, first_child: Option<NodeId>) -> Self {
		Self {
			data,
			first_child,
			segment_heads: HashMap::new(),
		}
	}

	/// Info for a container view claimed from the dehydrated list.
	pub fn from_dehydrated(view: &DehydratedView) -> Self {
		Self::new(view.data().view.clone(), view.first_child())
	}

	pub fn data(&self) -> &SerializedView {
		&self.data
	}

	/// First DOM node of the view.
	pub fn first_child(&self) -> Option<NodeId> {
		self.first_child
	}

	pub fn container(&self, slot: usize) -> Option<&SerializedContainer> {
		self.data.containers.get(&slot)
	}

	pub fn template_id(&self, slot: usize) -> Option<&str> {
		self.data.templates.get(&slot).map(String::as_str)
	}

	pub fn is_disconnected(&self, slot: usize) -> bool {
		self.data.disconnected.contains(&slot)
	}

	/// First DOM node of an element container located earlier.
	pub fn segment_head(&self, slot: usize) -> Option<NodeId> {
		self.segment_heads.get(&slot).copied()
	}
}

/// Finds the existing DOM node for slot `current`.
///
/// `previous` is the slot's template predecessor as returned by
/// [`ViewDefinition::previous_slot`](crate::view::ViewDefinition::previous_slot),
/// and must already be bound in `view`. The returned node is the first node
/// the slot occupies: the element or text node itself, the first content
/// node of an element container, or the first view node of a container
/// (its anchor when the container rendered nothing).
pub fn locate_next_rnode(
	document: &Document,
	info: &mut HydrationInfo,
	view: &ViewInstance,
	current: usize,
	previous: Option<usize>,
	previous_is_parent: bool,
) -> HydrationResult<NodeId> {
	let definition = view.definition();
	let node = if let Some(path) = info.data.nodes.get(&current) {
		locate_by_path(document, view, path)?
	} else if definition.first_child() == Some(current) {
		info.first_child.ok_or_else(|| {
			HydrationError::mismatch(format!(
				"view of {} has no DOM for its first slot {current}",
				definition.name()
			))
		})?
	} else {
		let previous = previous.ok_or_else(|| {
			HydrationError::mismatch(format!("slot {current} has no template predecessor"))
		})?;
		locate_after(document, info, view, current, previous, previous_is_parent)?
	};

	if definition.slot(current).kind == SlotKind::ElementContainer {
		info.segment_heads.insert(current, node);
	}
	Ok(node)
}

fn locate_after(
	document: &Document,
	info: &HydrationInfo,
	view: &ViewInstance,
	current: usize,
	previous: usize,
	previous_is_parent: bool,
) -> HydrationResult<NodeId> {
	let definition = view.definition();
	let previous_def = definition.slot(previous);
	let missing = |what: &str| {
		HydrationError::mismatch(format!(
			"slot {current}: {what} after slot {previous} in {}",
			definition.name()
		))
	};

	if previous_is_parent && previous_def.kind == SlotKind::ElementContainer {
		return info
			.segment_head(previous)
			.ok_or_else(|| missing("element container was not located"));
	}

	let previous_node = view
		.native_node(previous)
		.ok_or_else(|| missing("no bound node"))?;
	if previous_is_parent {
		return document
			.first_child(previous_node)
			.ok_or_else(|| missing("no first child"));
	}

	let mut node = previous_node;
	if previous_def.kind == SlotKind::Element && previous_def.view_container {
		let container = info
			.container(previous)
			.ok_or_else(|| missing("no container annotation"))?;
		node = document
			.sibling_after(node, container.view_node_count() + 1)
			.ok_or_else(|| missing("container views end early"))?;
	}
	document
		.next_sibling(node)
		.ok_or_else(|| missing("no next sibling"))
}

fn locate_by_path(document: &Document, view: &ViewInstance, path: &str) -> HydrationResult<NodeId> {
	let location = decompress_node_location(path)?;
	let mut node = match location.reference {
		ReferenceNode::Host => view.host().ok_or_else(|| {
			HydrationError::mismatch(format!(
				"location {path} is host-relative but the view has no host"
			))
		})?,
		ReferenceNode::Body => document.body(),
		ReferenceNode::Slot(slot) => view.native_node(slot).ok_or_else(|| {
			HydrationError::mismatch(format!(
				"location {path} starts at slot {slot}, which has no node"
			))
		})?,
	};
	for step in location.steps {
		let next = match step {
			NavigationStep::FirstChild => document.first_child(node),
			NavigationStep::NextSibling => document.next_sibling(node),
		};
		node = next.ok_or_else(|| {
			HydrationError::mismatch(format!("failed to follow location {path}"))
		})?;
	}
	Ok(node)
}

/// Anchor comment of an element container whose first node is `head`.
pub fn locate_element_container_anchor(
	document: &Document,
	info: &HydrationInfo,
	slot: usize,
	head: NodeId,
) -> HydrationResult<NodeId> {
	let count = info
		.container(slot)
		.and_then(|container| container.num_root_nodes)
		.ok_or_else(|| {
			HydrationError::mismatch(format!(
				"element container at slot {slot} has no annotation"
			))
		})?;
	let anchor = document
		.sibling_after(head, count)
		.ok_or_else(|| {
			HydrationError::mismatch(format!("element container at slot {slot} ends early"))
		})?;
	if !document.is_comment(anchor) {
		return Err(HydrationError::NodeMismatch {
			slot,
			expected: "container anchor comment".to_string(),
			actual: describe(document, anchor),
		});
	}
	Ok(anchor)
}

/// Checks that a located node can back the slot.
pub fn validate_matching_node(
	document: &Document,
	slot: usize,
	node: NodeId,
	expected: &SlotDef,
) -> HydrationResult<()> {
	let matches = match expected.kind {
		SlotKind::Element => {
			let tag = expected.tag.as_deref().unwrap_or_default();
			document
				.tag_name(node)
				.is_some_and(|actual| actual.eq_ignore_ascii_case(tag))
		}
		SlotKind::Text => document.is_text(node),
		SlotKind::ElementContainer
		| SlotKind::Container
		| SlotKind::Projection
		| SlotKind::Icu => true,
	};
	if matches {
		return Ok(());
	}
	let expected = match expected.kind {
		SlotKind::Element => format!("<{}>", expected.tag.as_deref().unwrap_or_default()),
		_ => "text node".to_string(),
	};
	Err(HydrationError::NodeMismatch {
		slot,
		expected,
		actual: describe(document, node),
	})
}

fn describe(document: &Document, node: NodeId) -> String {
	match document.kind(node) {
		NodeKind::Element(element) => format!("<{}>", element.tag()),
		NodeKind::Text(_) => "text node".to_string(),
		NodeKind::Comment(data) => format!("comment <!--{data}-->"),
		NodeKind::Document => "document".to_string(),
	}
}

/// Client-side hydration state: claimed nodes and totals.
#[derive(Debug, Default)]
pub struct HydrationSession {
	config: HydrationConfig,
	claimed: HashSet<NodeId>,
	stats: HydrationStats,
}

impl HydrationSession {
	pub fn new(config: HydrationConfig) -> Self {
		Self {
			config,
			claimed: HashSet::new(),
			stats: HydrationStats::default(),
		}
	}

	pub fn config(&self) -> &HydrationConfig {
		&self.config
	}

	pub fn stats(&self) -> HydrationStats {
		self.stats
	}

	/// Reads and removes the annotation of a component host.
	///
	/// Returns `None` when the host opted out of hydration; its content must
	/// then be rendered from scratch. A host without annotation attribute
	/// hydrates with an empty annotation.
	pub fn retrieve_hydration_info(
		&mut self,
		document: &mut Document,
		host: NodeId,
	) -> HydrationResult<Option<HydrationInfo>> {
		if document.has_attribute(host, &self.config.skip_hydration_attribute) {
			debug!(%host, "host opted out of hydration");
			return Ok(None);
		}
		let data = match document.remove_attribute(host, &self.config.annotation_attribute) {
			Some(json) => SerializedView::from_json(&json)?,
			None => SerializedView::default(),
		};
		self.stats.hydrated_components += 1;
		Ok(Some(HydrationInfo::new(data, document.first_child(host))))
	}

	/// Records that `node` is bound to a slot.
	pub fn mark_rnode_as_claimed_for_hydration(&mut self, node: NodeId) -> HydrationResult<()> {
		if !self.claimed.insert(node) && self.config.check_claimed {
			return Err(HydrationError::NodeAlreadyClaimed(node));
		}
		self.stats.hydrated_nodes += 1;
		Ok(())
	}

	pub fn is_rnode_claimed_for_hydration(&self, node: NodeId) -> bool {
		self.claimed.contains(&node)
	}

	/// Claims a dehydrated view of `container` rendered from `template`.
	pub fn claim_dehydrated_view(
		&mut self,
		container: &mut ViewContainer,
		template: &str,
	) -> Option<DehydratedView> {
		let view = find_matching_dehydrated_view(container, template)?;
		self.stats.claimed_views += 1;
		debug!(template, "claimed dehydrated view");
		Some(view)
	}

	/// Undoes the text marker comments inserted by the serializer. Must run
	/// on the parsed document before any slot is located.
	pub fn process_text_node_markers_before_hydration(
		&mut self,
		document: &mut Document,
		root: NodeId,
	) -> HydrationResult<usize> {
		let markers: Vec<(NodeId, TextNodeMarker)> = document
			.descendants(root)
			.filter(|&node| document.is_comment(node))
			.filter_map(|node| {
				document
					.character_data(node)
					.and_then(TextNodeMarker::from_comment)
					.map(|marker| (node, marker))
			})
			.collect();

		for &(comment, marker) in &markers {
			match marker {
				TextNodeMarker::EmptyNode => {
					let text = document.create_text("");
					document.replace_with(comment, text)?;
				}
				TextNodeMarker::Separator => document.remove(comment),
			}
		}
		self.stats.text_markers += markers.len();
		Ok(markers.len())
	}
}
