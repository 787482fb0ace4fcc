//! Test renderer for integration tests.
//!
//! Renders view definitions into a [`Document`] on the "server" and
//! hydrates them on the "client", driving the reconciler the way an
//! instruction layer would: slots in template order, containers once the
//! view's own nodes are bound, nested components last.

#![allow(dead_code)]

use reinhardt_dom::{Document, NodeId};
use reinhardt_hydration::view::{
	ContainerHost, EmbeddedTemplates, NativeNodeCollector, Slot, SlotDef, SlotKind,
	TemplateOrderCollector, ViewContainer, ViewDefinition, ViewInstance, ViewKind,
};
use reinhardt_hydration::{
	DehydratedView, HydrationError, HydrationInfo, HydrationResult, HydrationSession,
	locate_dehydrated_views_in_container, locate_element_container_anchor, locate_next_rnode,
	validate_matching_node,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// What to render into the containers and component hosts of a view.
#[derive(Debug, Default, Clone)]
pub struct ViewPlan {
	pub components: BTreeMap<usize, ViewPlan>,
	pub containers: BTreeMap<usize, Vec<PlannedView>>,
}

impl ViewPlan {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn component(mut self, slot: usize, plan: ViewPlan) -> Self {
		self.components.insert(slot, plan);
		self
	}

	pub fn container(mut self, slot: usize, views: Vec<PlannedView>) -> Self {
		self.containers.insert(slot, views);
		self
	}
}

/// One view to create inside a container.
#[derive(Debug, Clone)]
pub struct PlannedView {
	pub definition: Arc<ViewDefinition>,
	pub plan: ViewPlan,
}

impl PlannedView {
	pub fn new(definition: &Arc<ViewDefinition>) -> Self {
		Self {
			definition: Arc::clone(definition),
			plan: ViewPlan::default(),
		}
	}

	pub fn with_plan(mut self, plan: ViewPlan) -> Self {
		self.plan = plan;
		self
	}

	pub fn repeated(definition: &Arc<ViewDefinition>, count: usize) -> Vec<Self> {
		(0..count).map(|_| Self::new(definition)).collect()
	}
}

/// Where a newly created node goes. No parent leaves it detached.
#[derive(Debug, Clone, Copy, Default)]
struct Insertion {
	parent: Option<NodeId>,
	before: Option<NodeId>,
}

impl Insertion {
	fn before_anchor(document: &Document, anchor: NodeId) -> Self {
		Self {
			parent: document.parent(anchor),
			before: Some(anchor),
		}
	}

	fn place(self, document: &mut Document, node: NodeId) {
		if let Some(parent) = self.parent {
			document
				.insert_before(parent, node, self.before)
				.expect("insertion point belongs to the parent");
		}
	}
}

// Server

/// Renders `definition` into a new host element appended to `<body>`.
pub fn render_root(
	document: &mut Document,
	definition: &Arc<ViewDefinition>,
	plan: &ViewPlan,
) -> ViewInstance {
	let host = document.create_element(definition.host_tag().unwrap_or("app-root"));
	let body = document.body();
	document.append_child(body, host).expect("body accepts children");
	render_component(document, definition, host, plan, &[])
}

pub fn render_component(
	document: &mut Document,
	definition: &Arc<ViewDefinition>,
	host: NodeId,
	plan: &ViewPlan,
	projected: &[Vec<NodeId>],
) -> ViewInstance {
	let root = Insertion {
		parent: Some(host),
		before: None,
	};
	render_view(document, definition, Some(host), root, plan, projected)
}

fn render_view(
	document: &mut Document,
	definition: &Arc<ViewDefinition>,
	host: Option<NodeId>,
	root: Insertion,
	plan: &ViewPlan,
	projected: &[Vec<NodeId>],
) -> ViewInstance {
	let mut view = ViewInstance::new(Arc::clone(definition), host);
	let mut child_insertions = HashMap::new();
	for index in 0..definition.len() {
		let slot = definition.slot(index);
		let at = match slot.parent {
			Some(parent) => child_insertions.get(&parent).copied().unwrap_or_default(),
			None => root,
		};
		let value = create_slot(document, slot, index, at, projected, &mut child_insertions);
		view.set_slot(index, value);
	}
	render_containers(document, &mut view, plan);
	render_components(document, &mut view, plan);
	view
}

fn create_slot(
	document: &mut Document,
	slot: &SlotDef,
	index: usize,
	at: Insertion,
	projected: &[Vec<NodeId>],
	child_insertions: &mut HashMap<usize, Insertion>,
) -> Slot {
	match slot.kind {
		SlotKind::Element => {
			let element = document.create_element(slot.tag.as_deref().unwrap_or("div"));
			at.place(document, element);
			// Content children stay detached until a projection slot takes them.
			let children = if slot.is_component_host() {
				Insertion::default()
			} else {
				Insertion {
					parent: Some(element),
					before: None,
				}
			};
			child_insertions.insert(index, children);
			if !slot.view_container {
				return Slot::Node(element);
			}
			let anchor = document.create_comment("container");
			at.place(document, anchor);
			Slot::Container(ViewContainer::new(ContainerHost::Node(element), anchor))
		}
		SlotKind::Text => {
			let text = document.create_text(slot.text.as_deref().unwrap_or_default());
			at.place(document, text);
			Slot::Node(text)
		}
		SlotKind::ElementContainer => {
			let anchor = document.create_comment("ng-container");
			at.place(document, anchor);
			child_insertions.insert(
				index,
				Insertion {
					parent: at.parent,
					before: Some(anchor),
				},
			);
			Slot::Node(anchor)
		}
		SlotKind::Container => {
			let anchor = document.create_comment("container");
			at.place(document, anchor);
			Slot::Container(ViewContainer::new(ContainerHost::Node(anchor), anchor))
		}
		SlotKind::Icu => {
			let anchor = document.create_comment("icu");
			at.place(document, anchor);
			Slot::Node(anchor)
		}
		SlotKind::Projection => {
			let nodes = projected_bucket(slot, projected);
			for &node in &nodes {
				at.place(document, node);
			}
			Slot::Projection(nodes)
		}
	}
}

fn projected_bucket(slot: &SlotDef, projected: &[Vec<NodeId>]) -> Vec<NodeId> {
	slot.projection_slot
		.and_then(|bucket| projected.get(bucket))
		.cloned()
		.unwrap_or_default()
}

fn render_containers(document: &mut Document, view: &mut ViewInstance, plan: &ViewPlan) {
	for (&index, planned) in &plan.containers {
		let container = container_mut(view, index);
		for child in planned {
			let rendered = render_child_view(document, container.anchor(), child);
			container.push_view(rendered);
		}
	}
}

/// Renders a container view right before the container's anchor.
fn render_child_view(
	document: &mut Document,
	anchor: NodeId,
	planned: &PlannedView,
) -> ViewInstance {
	let at = Insertion::before_anchor(document, anchor);
	let definition = &planned.definition;
	match definition.kind() {
		ViewKind::Embedded => render_view(document, definition, None, at, &planned.plan, &[]),
		ViewKind::Component => {
			let host = document.create_element(definition.host_tag().unwrap_or("ng-component"));
			at.place(document, host);
			render_component(document, definition, host, &planned.plan, &[])
		}
	}
}

fn render_components(document: &mut Document, view: &mut ViewInstance, plan: &ViewPlan) {
	let definition = Arc::clone(view.definition());
	let empty = ViewPlan::default();
	for index in 0..definition.len() {
		let Some(component) = &definition.slot(index).component else {
			continue;
		};
		let Some(host) = view.native_node(index) else {
			continue;
		};
		let projected = projected_nodes(view, index);
		let child_plan = plan.components.get(&index).unwrap_or(&empty);
		let child = render_component(document, component, host, child_plan, &projected);
		attach_component(view, index, child);
	}
}

/// Nodes of the content children of component host `index`, per bucket.
fn projected_nodes(view: &ViewInstance, index: usize) -> Vec<Vec<NodeId>> {
	let definition = view.definition();
	definition
		.slot(index)
		.projection
		.iter()
		.map(|head| {
			let mut nodes = Vec::new();
			let mut cursor = *head;
			while let Some(child) = cursor {
				TemplateOrderCollector.collect_slot(view, child, &mut nodes);
				cursor = definition.slot(child).projection_next;
			}
			nodes
		})
		.collect()
}

fn attach_component(view: &mut ViewInstance, index: usize, component: ViewInstance) {
	match view.slot_mut(index) {
		Slot::Container(container) => {
			container.set_host(ContainerHost::Component(Box::new(component)));
		}
		slot => *slot = Slot::Component(Box::new(component)),
	}
}

fn container_mut(view: &mut ViewInstance, index: usize) -> &mut ViewContainer {
	match view.slot_mut(index) {
		Slot::Container(container) => container,
		other => panic!("slot {index} holds {other:?}, not a view container"),
	}
}

// Client

/// Hydrates the first element under `<body>` as the root component.
pub fn hydrate_root(
	document: &mut Document,
	session: &mut HydrationSession,
	definition: &Arc<ViewDefinition>,
	plan: &ViewPlan,
) -> HydrationResult<ViewInstance> {
	let body = document.body();
	let host = document
		.children(body)
		.find(|&node| document.is_element(node))
		.ok_or_else(|| HydrationError::StructuralMismatch("no root host element".to_string()))?;
	hydrate_component(document, session, definition, host, plan, &[])
}

pub fn hydrate_component(
	document: &mut Document,
	session: &mut HydrationSession,
	definition: &Arc<ViewDefinition>,
	host: NodeId,
	plan: &ViewPlan,
	projected: &[Vec<NodeId>],
) -> HydrationResult<ViewInstance> {
	match session.retrieve_hydration_info(document, host)? {
		Some(mut info) => {
			hydrate_view(document, session, definition, &mut info, Some(host), plan, projected)
		}
		None => {
			document.clear_children(host);
			Ok(render_component(document, definition, host, plan, projected))
		}
	}
}

fn hydrate_view(
	document: &mut Document,
	session: &mut HydrationSession,
	definition: &Arc<ViewDefinition>,
	info: &mut HydrationInfo,
	host: Option<NodeId>,
	plan: &ViewPlan,
	projected: &[Vec<NodeId>],
) -> HydrationResult<ViewInstance> {
	let mut view = ViewInstance::new(Arc::clone(definition), host);
	let mut fresh = HashSet::new();
	for index in 0..definition.len() {
		let slot = definition.slot(index);
		let value = match slot.kind {
			SlotKind::Icu => return Err(HydrationError::NotImplemented("ICU expressions")),
			SlotKind::Projection => Slot::Projection(projected_bucket(slot, projected)),
			_ if info.is_disconnected(index) => {
				fresh.insert(index);
				create_slot(document, slot, index, Insertion::default(), &[], &mut HashMap::new())
			}
			_ => claim_slot(document, session, info, &view, index)?,
		};
		view.set_slot(index, value);
	}
	hydrate_containers(document, session, info, &mut view, plan)?;
	hydrate_components(document, session, &mut view, plan, &fresh)?;
	Ok(view)
}

fn claim_slot(
	document: &Document,
	session: &mut HydrationSession,
	info: &mut HydrationInfo,
	view: &ViewInstance,
	index: usize,
) -> HydrationResult<Slot> {
	let definition = view.definition();
	let slot = definition.slot(index);
	let (previous, previous_is_parent) = match definition.previous_slot(index) {
		Some((previous, is_parent)) => (Some(previous), is_parent),
		None => (None, false),
	};
	let start = locate_next_rnode(document, info, view, index, previous, previous_is_parent)?;

	match slot.kind {
		SlotKind::Element | SlotKind::Text => {
			validate_matching_node(document, index, start, slot)?;
			session.mark_rnode_as_claimed_for_hydration(start)?;
			if !slot.view_container {
				return Ok(Slot::Node(start));
			}
			let first = document.next_sibling(start).ok_or_else(|| {
				HydrationError::StructuralMismatch(format!(
					"slot {index}: view container anchor is missing"
				))
			})?;
			let (anchor, views) = dehydrated_container(document, session, info, index, first)?;
			Ok(Slot::Container(
				ViewContainer::new(ContainerHost::Node(start), anchor).with_dehydrated_views(views),
			))
		}
		SlotKind::ElementContainer => {
			let anchor = locate_element_container_anchor(document, info, index, start)?;
			session.mark_rnode_as_claimed_for_hydration(anchor)?;
			Ok(Slot::Node(anchor))
		}
		SlotKind::Container => {
			let (anchor, views) = dehydrated_container(document, session, info, index, start)?;
			Ok(Slot::Container(
				ViewContainer::new(ContainerHost::Node(anchor), anchor)
					.with_dehydrated_views(views),
			))
		}
		SlotKind::Projection | SlotKind::Icu => unreachable!("handled by the caller"),
	}
}

fn dehydrated_container(
	document: &Document,
	session: &mut HydrationSession,
	info: &HydrationInfo,
	index: usize,
	start: NodeId,
) -> HydrationResult<(NodeId, Vec<DehydratedView>)> {
	let annotation = info.container(index).ok_or_else(|| {
		HydrationError::StructuralMismatch(format!("slot {index} has no container annotation"))
	})?;
	let (anchor, views) = locate_dehydrated_views_in_container(document, start, annotation)?;
	session.mark_rnode_as_claimed_for_hydration(anchor)?;
	Ok((anchor, views))
}

/// Creates the planned container views, claiming a dehydrated view for
/// each one rendered from the container's declared template.
fn hydrate_containers(
	document: &mut Document,
	session: &mut HydrationSession,
	info: &HydrationInfo,
	view: &mut ViewInstance,
	plan: &ViewPlan,
) -> HydrationResult<()> {
	let definition = Arc::clone(view.definition());
	for (&index, planned) in &plan.containers {
		let template_id = info.template_id(index).map(str::to_owned);
		let declared = match &definition.slot(index).embedded {
			Some(EmbeddedTemplates::Single(template)) => Some(template),
			_ => None,
		};
		let container = container_mut(view, index);
		for child in planned {
			let claimable =
				declared.is_some_and(|template| Arc::ptr_eq(template, &child.definition));
			let dehydrated = match (&template_id, claimable) {
				(Some(id), true) => session.claim_dehydrated_view(container, id),
				_ => None,
			};
			let hydrated = match dehydrated {
				Some(dehydrated) => {
					let mut child_info = HydrationInfo::from_dehydrated(&dehydrated);
					hydrate_view(
						document,
						session,
						&child.definition,
						&mut child_info,
						None,
						&child.plan,
						&[],
					)?
				}
				None => render_child_view(document, container.anchor(), child),
			};
			container.push_view(hydrated);
		}
	}
	Ok(())
}

fn hydrate_components(
	document: &mut Document,
	session: &mut HydrationSession,
	view: &mut ViewInstance,
	plan: &ViewPlan,
	fresh: &HashSet<usize>,
) -> HydrationResult<()> {
	let definition = Arc::clone(view.definition());
	let empty = ViewPlan::default();
	for index in 0..definition.len() {
		let Some(component) = &definition.slot(index).component else {
			continue;
		};
		let Some(host) = view.native_node(index) else {
			continue;
		};
		let projected = projected_nodes(view, index);
		let child_plan = plan.components.get(&index).unwrap_or(&empty);
		let child = if fresh.contains(&index) {
			render_component(document, component, host, child_plan, &projected)
		} else {
			hydrate_component(document, session, component, host, child_plan, &projected)?
		};
		attach_component(view, index, child);
	}
	Ok(())
}

// Inspection

/// Child-index path from the document root, or `None` for detached nodes.
pub fn position(document: &Document, node: NodeId) -> Option<Vec<usize>> {
	if !document.is_connected(node) {
		return None;
	}
	let mut path = Vec::new();
	let mut current = node;
	while let Some(parent) = document.parent(current) {
		let index = document
			.children(parent)
			.position(|child| child == current)
			.expect("node is a child of its parent");
		path.push(index);
		current = parent;
	}
	path.reverse();
	Some(path)
}

/// Positions of every node bound anywhere in the view tree, in walk order.
pub fn bound_positions(document: &Document, view: &ViewInstance) -> Vec<Option<Vec<usize>>> {
	let mut out = Vec::new();
	let mut stack = vec![view];
	while let Some(view) = stack.pop() {
		out.push(view.host().and_then(|host| position(document, host)));
		for slot in view.slots() {
			match slot {
				Slot::Empty | Slot::Projection(_) => {}
				Slot::Node(node) => out.push(position(document, *node)),
				Slot::Component(component) => stack.push(component),
				Slot::Container(container) => {
					out.push(position(document, container.anchor()));
					match container.host() {
						ContainerHost::Node(node) => out.push(position(document, *node)),
						ContainerHost::Component(component) => stack.push(component),
					}
					stack.extend(container.views().iter().rev());
				}
			}
		}
	}
	out
}

/// Number of dehydrated records left anywhere in the view tree.
pub fn dehydrated_count(view: &ViewInstance) -> usize {
	let mut count = 0;
	let mut stack = vec![view];
	while let Some(view) = stack.pop() {
		for slot in view.slots() {
			match slot {
				Slot::Component(component) => stack.push(component),
				Slot::Container(container) => {
					count += container.dehydrated_views().len();
					if let ContainerHost::Component(component) = container.host() {
						stack.push(component);
					}
					stack.extend(container.views());
				}
				Slot::Empty | Slot::Node(_) | Slot::Projection(_) => {}
			}
		}
	}
	count
}
