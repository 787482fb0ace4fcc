//! Server-side annotation of rendered views.
//!
//! The walk follows template order. Most slots need nothing: the client
//! finds them as the first child of their parent or the next sibling of
//! their predecessor. The annotation records only what breaks that
//! inference:
//!
//! - container contents (`c`) and declared templates (`t`), so the client
//!   can skip over server-rendered views and later claim them;
//! - explicit locations (`n`) for slots moved by content projection;
//! - slots whose nodes never reached the document (`d`).
//!
//! Nested component views are annotated onto their own host elements.
//! Attributes and text marker comments are written only after the whole
//! walk, so the walk itself always sees the rendered DOM unchanged.

use crate::annotation::{
	SerializedContainer, SerializedContainerView, SerializedView, TextNodeMarker,
};
use crate::config::{HydrationConfig, SiblingMissPolicy};
use crate::dom_path::calc_path_between;
use crate::error::{HydrationError, HydrationResult};
use crate::node_location::{ReferenceNode, compress_node_location};
use crate::stats::AnnotationStats;
use crate::template_id::TemplateIdRegistry;
use crate::view::{
	ContainerHost, EmbeddedTemplates, NativeNodeCollector, Slot, SlotKind, TemplateOrderCollector,
	ViewContainer, ViewDefinition, ViewInstance, ViewKind, ViewTree,
};
use reinhardt_dom::{Document, NodeId};
use tracing::{debug, info, warn};

/// One serialization session: template ids, pending writes and totals.
#[derive(Debug)]
pub struct AnnotationSession<C = TemplateOrderCollector> {
	config: HydrationConfig,
	templates: TemplateIdRegistry,
	collector: C,
	pending_hosts: Vec<(NodeId, String)>,
	text_markers: Vec<(NodeId, TextNodeMarker)>,
	stats: AnnotationStats,
}

impl AnnotationSession {
	pub fn new(config: HydrationConfig) -> Self {
		Self::with_collector(config, TemplateOrderCollector)
	}
}

impl Default for AnnotationSession {
	fn default() -> Self {
		Self::new(HydrationConfig::default())
	}
}

impl<C: NativeNodeCollector> AnnotationSession<C> {
	/// Creates a session counting view nodes with a custom collector.
	pub fn with_collector(config: HydrationConfig, collector: C) -> Self {
		Self {
			config,
			templates: TemplateIdRegistry::new(),
			collector,
			pending_hosts: Vec::new(),
			text_markers: Vec::new(),
			stats: AnnotationStats::default(),
		}
	}

	pub fn config(&self) -> &HydrationConfig {
		&self.config
	}

	pub fn template_ids(&self) -> &TemplateIdRegistry {
		&self.templates
	}

	pub fn template_ids_mut(&mut self) -> &mut TemplateIdRegistry {
		&mut self.templates
	}

	/// Totals over every successful call on this session.
	pub fn stats(&self) -> AnnotationStats {
		self.stats
	}

	/// Annotates every root component view that has a host element.
	///
	/// Returns the totals of this call alone. Nothing is written to the
	/// document unless every root serializes; after an error the session
	/// holds no pending writes and its totals are unchanged.
	pub fn annotate_for_hydration<R>(
		&mut self,
		document: &mut Document,
		roots: &R,
	) -> HydrationResult<AnnotationStats>
	where
		R: ViewTree + ?Sized,
	{
		let before = self.stats;
		let walked = self.queue_roots(document, roots);
		self.commit(document, before, walked)?;

		let stats = self.stats.since(&before);
		info!(
			hosts = stats.annotated_hosts,
			views = stats.serialized_views,
			paths = stats.explicit_paths,
			text_markers = stats.text_markers,
			"annotated views for hydration"
		);
		Ok(stats)
	}

	/// Annotates `view` onto `host`, including nested component views.
	///
	/// No attribute is written when the annotation would be empty.
	pub fn annotate_host_element_for_hydration(
		&mut self,
		document: &mut Document,
		host: NodeId,
		view: &ViewInstance,
	) -> HydrationResult<()> {
		let before = self.stats;
		let walked = self.queue_host(document, host, view);
		self.commit(document, before, walked)
	}

	fn queue_roots<R>(&mut self, document: &Document, roots: &R) -> HydrationResult<()>
	where
		R: ViewTree + ?Sized,
	{
		for view in roots.root_views() {
			let Some(host) = view.host() else {
				warn!(
					template = view.definition().name(),
					"skipping root view without a host element"
				);
				continue;
			};
			self.queue_host(document, host, view)?;
		}
		Ok(())
	}

	/// Flushes the queued writes after a successful walk, or drops them.
	fn commit(
		&mut self,
		document: &mut Document,
		before: AnnotationStats,
		walked: HydrationResult<()>,
	) -> HydrationResult<()> {
		let outcome = walked.and_then(|()| self.flush(document));
		if outcome.is_err() {
			self.pending_hosts.clear();
			self.text_markers.clear();
			self.stats = before;
		}
		outcome
	}

	fn queue_host(
		&mut self,
		document: &Document,
		host: NodeId,
		view: &ViewInstance,
	) -> HydrationResult<()> {
		if document.has_attribute(host, &self.config.skip_hydration_attribute) {
			debug!(%host, "host opted out of hydration");
			return Ok(());
		}
		let annotation = self.serialize_view(document, view)?;
		if !annotation.is_empty() {
			self.pending_hosts.push((host, annotation.to_json()?));
		}
		Ok(())
	}

	fn flush(&mut self, document: &mut Document) -> HydrationResult<()> {
		for (host, json) in std::mem::take(&mut self.pending_hosts) {
			document.set_attribute(host, &self.config.annotation_attribute, &json)?;
			self.stats.annotated_hosts += 1;
		}
		for (node, marker) in std::mem::take(&mut self.text_markers) {
			let comment = document.create_comment(marker.as_str());
			document.insert_after(node, comment)?;
			self.stats.text_markers += 1;
		}
		Ok(())
	}

	fn serialize_view(
		&mut self,
		document: &Document,
		view: &ViewInstance,
	) -> HydrationResult<SerializedView> {
		let definition = view.definition();
		if view.slots().len() != definition.len() {
			return Err(HydrationError::UnsupportedStructure(format!(
				"view of {} has {} slots but its template declares {}",
				definition.name(),
				view.slots().len(),
				definition.len()
			)));
		}
		self.stats.serialized_views += 1;
		let mut annotation = SerializedView::default();

		for index in 0..definition.len() {
			let slot = definition.slot(index);
			if slot.kind == SlotKind::Icu {
				return Err(HydrationError::NotImplemented("ICU expressions"));
			}

			// Content children land wherever the component renders them.
			for head in slot.projection.iter().flatten().copied() {
				if definition.slot(head).kind != SlotKind::Projection
					&& self.start_node_connected(document, view, head)
				{
					let path = self.path_for_slot(document, view, head)?;
					self.record_path(&mut annotation, head, path);
				}
			}

			if slot.kind == SlotKind::Projection {
				// Projected nodes sit between this slot's predecessor and
				// its next sibling, so the sibling cannot be inferred.
				if let Some(next) = slot
					.next
					.filter(|&next| definition.slot(next).kind != SlotKind::Projection)
					.filter(|&next| self.start_node_connected(document, view, next))
				{
					let path = self.path_for_slot(document, view, next)?;
					self.record_path(&mut annotation, next, path);
				}
				continue;
			}

			let Some(native) = view.native_node(index) else {
				continue;
			};
			if !document.is_connected(native) {
				annotation.disconnected.insert(index);
				self.stats.disconnected_slots += 1;
				continue;
			}

			match view.slot(index) {
				Slot::Container(container) => {
					if slot.kind == SlotKind::Container {
						match &slot.embedded {
							Some(EmbeddedTemplates::Single(template)) => {
								annotation.templates.insert(index, self.templates.get(template));
							}
							Some(EmbeddedTemplates::Multiple(_)) => {
								return Err(HydrationError::UnsupportedStructure(format!(
									"slot {index} of {} declares several embedded templates",
									definition.name()
								)));
							}
							None => {}
						}
					}
					if let ContainerHost::Component(component) = container.host() {
						self.queue_component(document, component)?;
					}
					let views = self.serialize_container(document, container)?;
					annotation.containers.insert(
						index,
						SerializedContainer {
							views,
							num_root_nodes: None,
						},
					);
				}
				Slot::Component(component) => self.queue_component(document, component)?,
				Slot::Node(node) => match slot.kind {
					SlotKind::ElementContainer => {
						let mut nodes = Vec::new();
						self.collector.collect_native_nodes(view, slot.child, &mut nodes);
						annotation.containers.insert(
							index,
							SerializedContainer {
								views: Vec::new(),
								num_root_nodes: Some(nodes.len()),
							},
						);
					}
					SlotKind::Text if self.config.text_node_markers => {
						self.check_text_node(document, *node);
					}
					_ => {}
				},
				Slot::Empty | Slot::Projection(_) => {}
			}

			if let Some(projection_next) = slot
				.projection_next
				.filter(|&next| Some(next) != slot.next)
				.filter(|&next| definition.slot(next).kind != SlotKind::Projection)
				.filter(|&next| self.start_node_connected(document, view, next))
			{
				let path = self.path_for_slot(document, view, projection_next)?;
				self.record_path(&mut annotation, projection_next, path);
			}
		}

		Ok(annotation)
	}

	fn queue_component(
		&mut self,
		document: &Document,
		component: &ViewInstance,
	) -> HydrationResult<()> {
		match component.host() {
			Some(host) => self.queue_host(document, host, component),
			None => Ok(()),
		}
	}

	fn serialize_container(
		&mut self,
		document: &Document,
		container: &ViewContainer,
	) -> HydrationResult<Vec<SerializedContainerView>> {
		let mut views: Vec<SerializedContainerView> = Vec::new();
		for child in container.views() {
			let definition = child.definition();
			let num_root_nodes = match definition.kind() {
				ViewKind::Component => 1,
				ViewKind::Embedded => {
					let mut nodes = Vec::new();
					self.collector
						.collect_native_nodes(child, definition.first_child(), &mut nodes);
					nodes.len()
				}
			};
			let template = self.templates.get(definition);
			let entry = SerializedContainerView::new(
				template,
				num_root_nodes,
				self.serialize_view(document, child)?,
			);
			match views.last_mut() {
				Some(previous) if previous.same_shape(&entry) => previous.increment_multiplier(),
				_ => views.push(entry),
			}
		}
		Ok(views)
	}

	fn check_text_node(&mut self, document: &Document, node: NodeId) {
		if document.character_data(node) == Some("") {
			self.text_markers.push((node, TextNodeMarker::EmptyNode));
		} else if document
			.next_sibling(node)
			.is_some_and(|next| document.is_text(next))
		{
			self.text_markers.push((node, TextNodeMarker::Separator));
		}
	}

	fn record_path(&mut self, annotation: &mut SerializedView, slot: usize, path: String) {
		debug!(slot, %path, "explicit node location");
		if annotation.nodes.insert(slot, path).is_none() {
			self.stats.explicit_paths += 1;
		}
	}

	/// First DOM node the slot occupies.
	fn start_node(&self, view: &ViewInstance, index: usize) -> Option<NodeId> {
		let mut nodes = Vec::new();
		self.collector.collect_slot(view, index, &mut nodes);
		nodes.first().copied()
	}

	fn start_node_connected(&self, document: &Document, view: &ViewInstance, index: usize) -> bool {
		self.start_node(view, index).is_some_and(|node| document.is_connected(node))
	}

	/// Location of the slot's start node, relative to its nearest element
	/// ancestor (or the view host), else to `<body>`.
	fn path_for_slot(
		&self,
		document: &Document,
		view: &ViewInstance,
		index: usize,
	) -> HydrationResult<String> {
		let target = self
			.start_node(view, index)
			.ok_or(HydrationError::DetachedNode { slot: index })?;
		let (reference, from) = match reference_slot(view.definition(), index) {
			Some(parent) => (ReferenceNode::Slot(parent), view.native_node(parent)),
			None => (ReferenceNode::Host, view.host()),
		};
		if let Some(from) = from {
			if let Some(path) = self.path_between(document, from, target, reference)? {
				return Ok(path);
			}
		}
		self.path_between(document, document.body(), target, ReferenceNode::Body)?
			.ok_or(HydrationError::DetachedNode { slot: index })
	}

	fn path_between(
		&self,
		document: &Document,
		from: NodeId,
		to: NodeId,
		reference: ReferenceNode,
	) -> HydrationResult<Option<String>> {
		match calc_path_between(document, from, to, reference) {
			Ok(path) => Ok(path),
			Err(error) => match self.config.sibling_miss {
				SiblingMissPolicy::Fail => Err(error.into()),
				SiblingMissPolicy::Fallback => {
					warn!(%error, %reference, "node unreachable from reference, falling back");
					Ok(None)
				}
				SiblingMissPolicy::EmptyPath => {
					warn!(
						%error,
						%reference,
						"node unreachable from reference, emitting an empty path"
					);
					Ok(Some(compress_node_location(reference, &[])))
				}
			},
		}
	}
}

/// Nearest template ancestor with an element of its own. Element containers
/// are skipped: their children are DOM siblings of the container.
fn reference_slot(definition: &ViewDefinition, index: usize) -> Option<usize> {
	let mut parent = definition.slot(index).parent;
	while let Some(candidate) = parent {
		if definition.slot(candidate).kind != SlotKind::ElementContainer {
			return Some(candidate);
		}
		parent = definition.slot(candidate).parent;
	}
	None
}
