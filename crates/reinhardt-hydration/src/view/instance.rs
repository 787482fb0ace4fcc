//! Runtime view instances and view containers.

use super::definition::ViewDefinition;
use crate::dehydrated::DehydratedView;
use reinhardt_dom::NodeId;
use std::sync::Arc;

/// Runtime value of one slot.
#[derive(Debug, Default)]
pub enum Slot {
	/// Not created, e.g. a slot under a branch the renderer skipped.
	#[default]
	Empty,
	/// Element, text, element-container anchor or ICU anchor.
	Node(NodeId),
	/// Nodes currently rendered by a projection slot, in DOM order.
	Projection(Vec<NodeId>),
	/// Component host: the nested component view.
	Component(Box<ViewInstance>),
	/// Container anchor or element hosting a view container.
	Container(ViewContainer),
}

impl Slot {
	/// The DOM node standing for this slot in its parent's child list.
	pub fn native_node(&self) -> Option<NodeId> {
		match self {
			Self::Node(node) => Some(*node),
			Self::Component(view) => view.host(),
			Self::Container(container) => container.host_node(),
			Self::Empty | Self::Projection(_) => None,
		}
	}
}

/// One instantiation of a [`ViewDefinition`].
#[derive(Debug)]
pub struct ViewInstance {
	definition: Arc<ViewDefinition>,
	host: Option<NodeId>,
	slots: Vec<Slot>,
}

impl ViewInstance {
	/// Creates an instance with every slot empty. Component views pass
	/// their host element; embedded views have none.
	pub fn new(definition: Arc<ViewDefinition>, host: Option<NodeId>) -> Self {
		let slots = std::iter::repeat_with(Slot::default)
			.take(definition.len())
			.collect();
		Self {
			definition,
			host,
			slots,
		}
	}

	pub fn definition(&self) -> &Arc<ViewDefinition> {
		&self.definition
	}

	pub fn host(&self) -> Option<NodeId> {
		self.host
	}

	pub fn slots(&self) -> &[Slot] {
		&self.slots
	}

	pub fn slots_mut(&mut self) -> &mut [Slot] {
		&mut self.slots
	}

	pub fn slot(&self, index: usize) -> &Slot {
		&self.slots[index]
	}

	pub fn slot_mut(&mut self, index: usize) -> &mut Slot {
		&mut self.slots[index]
	}

	pub fn set_slot(&mut self, index: usize, value: Slot) {
		self.slots[index] = value;
	}

	pub fn native_node(&self, index: usize) -> Option<NodeId> {
		self.slots.get(index).and_then(Slot::native_node)
	}
}

/// What a view container is attached to.
#[derive(Debug)]
pub enum ContainerHost {
	/// A template anchor comment or a plain element.
	Node(NodeId),
	/// A component host; the container's anchor follows the host element.
	Component(Box<ViewInstance>),
}

/// Ordered views rendered before an anchor comment.
#[derive(Debug)]
pub struct ViewContainer {
	host: ContainerHost,
	anchor: NodeId,
	views: Vec<ViewInstance>,
	dehydrated: Vec<DehydratedView>,
}

impl ViewContainer {
	pub fn new(host: ContainerHost, anchor: NodeId) -> Self {
		Self {
			host,
			anchor,
			views: Vec::new(),
			dehydrated: Vec::new(),
		}
	}

	/// Attaches server-rendered views that can still be claimed.
	pub fn with_dehydrated_views(mut self, views: Vec<DehydratedView>) -> Self {
		self.dehydrated = views;
		self
	}

	pub fn host(&self) -> &ContainerHost {
		&self.host
	}

	/// Re-attaches the container, e.g. once the component rendered into
	/// its host element exists. Returns the previous host.
	pub fn set_host(&mut self, host: ContainerHost) -> ContainerHost {
		std::mem::replace(&mut self.host, host)
	}

	/// The host's DOM node: the anchor or element itself, or the component
	/// host element.
	pub fn host_node(&self) -> Option<NodeId> {
		match &self.host {
			ContainerHost::Node(node) => Some(*node),
			ContainerHost::Component(view) => view.host(),
		}
	}

	pub fn anchor(&self) -> NodeId {
		self.anchor
	}

	pub fn views(&self) -> &[ViewInstance] {
		&self.views
	}

	pub fn push_view(&mut self, view: ViewInstance) {
		self.views.push(view);
	}

	pub fn insert_view(&mut self, index: usize, view: ViewInstance) {
		self.views.insert(index.min(self.views.len()), view);
	}

	pub fn remove_view(&mut self, index: usize) -> Option<ViewInstance> {
		(index < self.views.len()).then(|| self.views.remove(index))
	}

	/// Server-rendered views not claimed yet.
	pub fn dehydrated_views(&self) -> &[DehydratedView] {
		&self.dehydrated
	}

	pub(crate) fn dehydrated_views_mut(&mut self) -> &mut Vec<DehydratedView> {
		&mut self.dehydrated
	}

	/// Host and views borrowed separately, for tree walks.
	pub fn parts_mut(&mut self) -> (&mut ContainerHost, &mut [ViewInstance]) {
		(&mut self.host, &mut self.views)
	}
}
