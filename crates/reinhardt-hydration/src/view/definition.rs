//! Static template descriptions.

use std::collections::HashMap;
use std::sync::Arc;

/// Kind of a template slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
	/// A plain element or a component host element.
	Element,
	Text,
	/// `<ng-container>`: a grouping with no element of its own, rendered as
	/// its children followed by an anchor comment.
	ElementContainer,
	/// A template anchor hosting embedded views.
	Container,
	/// `<ng-content>`: insertion point for content projected by the parent.
	Projection,
	/// ICU / i18n expression.
	Icu,
}

/// Embedded templates declared on a container slot.
#[derive(Debug, Clone)]
pub enum EmbeddedTemplates {
	Single(Arc<ViewDefinition>),
	Multiple(Vec<Arc<ViewDefinition>>),
}

/// One slot of a [`ViewDefinition`].
///
/// `parent`, `child` and `next` are template links: `child` is the first
/// template child and `next` the following template sibling. They describe
/// the template, which differs from the DOM wherever projection or element
/// containers are involved.
#[derive(Debug, Clone)]
pub struct SlotDef {
	pub kind: SlotKind,
	pub tag: Option<String>,
	/// Static text of a text slot.
	pub text: Option<String>,
	pub parent: Option<usize>,
	pub child: Option<usize>,
	pub next: Option<usize>,
	/// Next slot projected into the same bucket, for content children.
	pub projection_next: Option<usize>,
	/// First content child per projection bucket, for component hosts.
	pub projection: Vec<Option<usize>>,
	/// Bucket this content child is projected into; `None` drops it.
	pub project_into: Option<usize>,
	/// Bucket rendered by a [`SlotKind::Projection`] slot.
	pub projection_slot: Option<usize>,
	pub embedded: Option<EmbeddedTemplates>,
	/// Component rendered into this element.
	pub component: Option<Arc<ViewDefinition>>,
	/// This element also anchors a view container.
	pub view_container: bool,
}

impl SlotDef {
	fn new(kind: SlotKind, parent: Option<usize>) -> Self {
		Self {
			kind,
			tag: None,
			text: None,
			parent,
			child: None,
			next: None,
			projection_next: None,
			projection: Vec::new(),
			project_into: None,
			projection_slot: None,
			embedded: None,
			component: None,
			view_container: false,
		}
	}

	pub fn is_component_host(&self) -> bool {
		self.component.is_some()
	}
}

/// Whether a definition is a component template or an embedded template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
	Component,
	Embedded,
}

/// Shared, immutable template description.
#[derive(Debug)]
pub struct ViewDefinition {
	name: String,
	kind: ViewKind,
	host_tag: Option<String>,
	slots: Vec<SlotDef>,
	first_child: Option<usize>,
	projection_buckets: usize,
}

impl ViewDefinition {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> ViewKind {
		self.kind
	}

	/// Tag of the element a component is rendered into when it is created
	/// on its own, e.g. as a root or inside a view container.
	pub fn host_tag(&self) -> Option<&str> {
		self.host_tag.as_deref()
	}

	pub fn slots(&self) -> &[SlotDef] {
		&self.slots
	}

	pub fn slot(&self, index: usize) -> &SlotDef {
		&self.slots[index]
	}

	pub fn len(&self) -> usize {
		self.slots.len()
	}

	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	/// First root slot of the template.
	pub fn first_child(&self) -> Option<usize> {
		self.first_child
	}

	/// Number of projection buckets the template renders.
	pub fn projection_buckets(&self) -> usize {
		self.projection_buckets
	}

	/// Template predecessor of `index`: the previous sibling, or the parent
	/// when `index` is a first child. The flag is `true` for the parent case.
	pub fn previous_slot(&self, index: usize) -> Option<(usize, bool)> {
		let parent = self.slots[index].parent;
		let first = match parent {
			Some(parent) => self.slots[parent].child,
			None => self.first_child,
		};
		if first == Some(index) {
			return parent.map(|parent| (parent, true));
		}
		self.slots
			.iter()
			.position(|slot| slot.parent == parent && slot.next == Some(index))
			.map(|previous| (previous, false))
	}

	/// Slots in template order starting at `start` and following `next`.
	pub fn siblings(&self, start: Option<usize>) -> impl Iterator<Item = usize> + '_ {
		std::iter::successors(start, |&index| self.slots[index].next)
	}
}

/// Builds a [`ViewDefinition`], wiring template and projection links.
///
/// # Example
///
/// ```
/// use reinhardt_hydration::view::TemplateBuilder;
///
/// let mut builder = TemplateBuilder::component("greeting").host_tag("app-greeting");
/// let div = builder.element(None, "div");
/// builder.text(Some(div), "hello");
/// let definition = builder.build();
/// assert_eq!(definition.slot(div).child, Some(1));
/// ```
#[derive(Debug)]
pub struct TemplateBuilder {
	name: String,
	kind: ViewKind,
	host_tag: Option<String>,
	slots: Vec<SlotDef>,
	last_children: HashMap<Option<usize>, usize>,
}

impl TemplateBuilder {
	pub fn component(name: impl Into<String>) -> Self {
		Self::with_kind(name, ViewKind::Component)
	}

	pub fn embedded(name: impl Into<String>) -> Self {
		Self::with_kind(name, ViewKind::Embedded)
	}

	fn with_kind(name: impl Into<String>, kind: ViewKind) -> Self {
		Self {
			name: name.into(),
			kind,
			host_tag: None,
			slots: Vec::new(),
			last_children: HashMap::new(),
		}
	}

	pub fn host_tag(mut self, tag: impl Into<String>) -> Self {
		self.host_tag = Some(tag.into());
		self
	}

	pub fn element(&mut self, parent: Option<usize>, tag: &str) -> usize {
		let mut slot = SlotDef::new(SlotKind::Element, parent);
		slot.tag = Some(tag.to_ascii_lowercase());
		self.push(slot)
	}

	pub fn text(&mut self, parent: Option<usize>, text: &str) -> usize {
		let mut slot = SlotDef::new(SlotKind::Text, parent);
		slot.text = Some(text.to_string());
		self.push(slot)
	}

	pub fn element_container(&mut self, parent: Option<usize>) -> usize {
		self.push(SlotDef::new(SlotKind::ElementContainer, parent))
	}

	/// A template anchor whose container renders `template`.
	pub fn template(&mut self, parent: Option<usize>, template: Arc<ViewDefinition>) -> usize {
		let mut slot = SlotDef::new(SlotKind::Container, parent);
		slot.embedded = Some(EmbeddedTemplates::Single(template));
		self.push(slot)
	}

	/// Renders content projected into `bucket`.
	pub fn projection(&mut self, parent: Option<usize>, bucket: usize) -> usize {
		let mut slot = SlotDef::new(SlotKind::Projection, parent);
		slot.projection_slot = Some(bucket);
		self.push(slot)
	}

	pub fn icu(&mut self, parent: Option<usize>) -> usize {
		self.push(SlotDef::new(SlotKind::Icu, parent))
	}

	/// An element hosting `component`. Its template children become content
	/// children, projected into bucket 0 unless changed with
	/// [`project_into`](Self::project_into).
	pub fn component_host(
		&mut self,
		parent: Option<usize>,
		tag: &str,
		component: Arc<ViewDefinition>,
	) -> usize {
		let index = self.element(parent, tag);
		self.slots[index].component = Some(component);
		index
	}

	/// Attaches a view container to an element or component host.
	pub fn with_view_container(&mut self, index: usize) -> &mut Self {
		self.slots[index].view_container = true;
		self
	}

	pub fn project_into(&mut self, index: usize, bucket: Option<usize>) -> &mut Self {
		self.slots[index].project_into = bucket;
		self
	}

	/// Replaces the embedded templates of a container slot.
	pub fn embedded_templates(&mut self, index: usize, templates: EmbeddedTemplates) -> &mut Self {
		self.slots[index].embedded = Some(templates);
		self
	}

	fn push(&mut self, mut slot: SlotDef) -> usize {
		let index = self.slots.len();
		let parent = slot.parent;
		if parent.is_some_and(|parent| self.slots[parent].is_component_host()) {
			slot.project_into = Some(0);
		}
		self.slots.push(slot);

		match self.last_children.insert(parent, index) {
			Some(previous) => self.slots[previous].next = Some(index),
			None => {
				if let Some(parent) = parent {
					self.slots[parent].child = Some(index);
				}
			}
		}
		index
	}

	pub fn build(mut self) -> Arc<ViewDefinition> {
		for host in 0..self.slots.len() {
			let Some(component) = self.slots[host].component.clone() else {
				continue;
			};
			let buckets = component.projection_buckets();
			let mut heads = vec![None; buckets];
			let mut tails: Vec<Option<usize>> = vec![None; buckets];
			let mut cursor = self.slots[host].child;
			while let Some(child) = cursor {
				cursor = self.slots[child].next;
				let Some(bucket) = self.slots[child].project_into.filter(|b| *b < buckets) else {
					self.slots[child].project_into = None;
					continue;
				};
				match tails[bucket] {
					Some(tail) => self.slots[tail].projection_next = Some(child),
					None => heads[bucket] = Some(child),
				}
				tails[bucket] = Some(child);
			}
			self.slots[host].projection = heads;
		}

		let projection_buckets = self
			.slots
			.iter()
			.filter_map(|slot| slot.projection_slot)
			.map(|bucket| bucket + 1)
			.max()
			.unwrap_or(0);
		let first_child = self.slots.iter().position(|slot| slot.parent.is_none());

		Arc::new(ViewDefinition {
			name: self.name,
			kind: self.kind,
			host_tag: self.host_tag,
			slots: self.slots,
			first_child,
			projection_buckets,
		})
	}
}
