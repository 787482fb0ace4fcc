//! The [`Document`] arena and its tree operations.
//!
//! Nodes are never freed: removing a node only unlinks it, so every
//! [`NodeId`] handed out stays usable and a detached subtree can be
//! re-inserted later (projected content relies on this).

use crate::error::{DomError, DomResult};
use crate::node::{ElementData, NodeData, NodeId, NodeKind, NodeType};

/// A live document tree.
///
/// The root is a document node holding a single `<body>` element. Server
/// rendering builds under [`Document::body`]; [`Document::parse_html`]
/// rebuilds the same shape from serialized markup.
#[derive(Debug, Clone)]
pub struct Document {
	nodes: Vec<NodeData>,
	root: NodeId,
	body: NodeId,
}

impl Default for Document {
	fn default() -> Self {
		Self::new()
	}
}

impl Document {
	/// Creates a document containing an empty `<body>`.
	pub fn new() -> Self {
		let mut document = Self {
			nodes: vec![NodeData::new(NodeKind::Document)],
			root: NodeId::new(0),
			body: NodeId::new(0),
		};
		let body = document.create_element("body");
		document.link_last(document.root, body);
		document.body = body;
		document
	}

	/// The document node. It has no parent.
	pub fn root(&self) -> NodeId {
		self.root
	}

	pub fn body(&self) -> NodeId {
		self.body
	}

	/// Number of nodes ever allocated in this document, attached or not.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	// ------------------------------------------------------------------
	// Creation
	// ------------------------------------------------------------------

	pub fn create_element(&mut self, tag: &str) -> NodeId {
		self.alloc(NodeKind::Element(ElementData::new(tag)))
	}

	pub fn create_text(&mut self, data: &str) -> NodeId {
		self.alloc(NodeKind::Text(data.to_string()))
	}

	pub fn create_comment(&mut self, data: &str) -> NodeId {
		self.alloc(NodeKind::Comment(data.to_string()))
	}

	fn alloc(&mut self, kind: NodeKind) -> NodeId {
		let id = NodeId::new(self.nodes.len() as u32);
		self.nodes.push(NodeData::new(kind));
		id
	}

	// ------------------------------------------------------------------
	// Inspection
	// ------------------------------------------------------------------

	pub fn kind(&self, id: NodeId) -> &NodeKind {
		&self.nodes[id.index()].kind
	}

	pub fn node_type(&self, id: NodeId) -> NodeType {
		self.kind(id).node_type()
	}

	pub fn is_element(&self, id: NodeId) -> bool {
		self.kind(id).is_element()
	}

	pub fn is_text(&self, id: NodeId) -> bool {
		self.kind(id).is_text()
	}

	pub fn is_comment(&self, id: NodeId) -> bool {
		self.kind(id).is_comment()
	}

	/// Lowercased tag name of an element, `None` for other nodes.
	pub fn tag_name(&self, id: NodeId) -> Option<&str> {
		self.kind(id).as_element().map(ElementData::tag)
	}

	/// Data of a text or comment node.
	pub fn character_data(&self, id: NodeId) -> Option<&str> {
		self.kind(id).character_data()
	}

	/// Replaces the data of a text or comment node.
	pub fn set_character_data(&mut self, id: NodeId, data: &str) -> bool {
		match &mut self.nodes[id.index()].kind {
			NodeKind::Text(existing) | NodeKind::Comment(existing) => {
				*existing = data.to_string();
				true
			}
			_ => false,
		}
	}

	pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
		self.kind(id).as_element()?.get_attribute(name)
	}

	pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
		self.get_attribute(id, name).is_some()
	}

	pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
		match &mut self.nodes[id.index()].kind {
			NodeKind::Element(element) => {
				element.set_attribute(name, value);
				Ok(())
			}
			_ => Err(DomError::NotAnElement(id)),
		}
	}

	/// Removes an attribute, returning its previous value.
	pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
		match &mut self.nodes[id.index()].kind {
			NodeKind::Element(element) => element.remove_attribute(name),
			_ => None,
		}
	}

	// ------------------------------------------------------------------
	// Navigation
	// ------------------------------------------------------------------

	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.nodes[id.index()].parent
	}

	pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
		self.nodes[id.index()].first_child
	}

	pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
		self.nodes[id.index()].last_child
	}

	pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
		self.nodes[id.index()].next_sibling
	}

	pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
		self.nodes[id.index()].prev_sibling
	}

	/// Follows `next_sibling` `count` times. `count == 0` returns `id`.
	pub fn sibling_after(&self, id: NodeId, count: usize) -> Option<NodeId> {
		let mut current = id;
		for _ in 0..count {
			current = self.next_sibling(current)?;
		}
		Some(current)
	}

	pub fn children(&self, id: NodeId) -> Children<'_> {
		Children {
			document: self,
			next: self.first_child(id),
		}
	}

	/// Pre-order traversal of the subtree below `id`, excluding `id`.
	pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
		Descendants {
			document: self,
			scope: id,
			next: self.first_child(id),
		}
	}

	/// Whether `node` is `ancestor` or lies inside its subtree.
	pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
		let mut current = Some(node);
		while let Some(id) = current {
			if id == ancestor {
				return true;
			}
			current = self.parent(id);
		}
		false
	}

	/// Whether the node is attached to the document root.
	pub fn is_connected(&self, id: NodeId) -> bool {
		self.contains(self.root, id)
	}

	// ------------------------------------------------------------------
	// Mutation
	// ------------------------------------------------------------------

	/// Appends `child` as the last child of `parent`, detaching it first.
	pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
		self.insert_before(parent, child, None)
	}

	/// Inserts `child` under `parent` before `reference`, or last when
	/// `reference` is `None`.
	pub fn insert_before(
		&mut self,
		parent: NodeId,
		child: NodeId,
		reference: Option<NodeId>,
	) -> DomResult<()> {
		if !self.kind(parent).can_have_children() || self.contains(child, parent) {
			return Err(DomError::HierarchyRequest { parent, child });
		}
		if let Some(reference) = reference {
			if self.parent(reference) != Some(parent) {
				return Err(DomError::NotAChild {
					parent,
					node: reference,
				});
			}
			if reference == child {
				return Ok(());
			}
		}
		self.remove(child);
		match reference {
			Some(reference) => self.link_before(parent, child, reference),
			None => self.link_last(parent, child),
		}
		Ok(())
	}

	/// Inserts `node` immediately after `target` under the same parent.
	pub fn insert_after(&mut self, target: NodeId, node: NodeId) -> DomResult<()> {
		let parent = self.parent(target).ok_or(DomError::Detached(target))?;
		let next = self.next_sibling(target);
		self.insert_before(parent, node, next)
	}

	/// Unlinks `id` from its parent. Detached nodes are left untouched.
	pub fn remove(&mut self, id: NodeId) {
		let Some(parent) = self.parent(id) else {
			return;
		};
		let prev = self.previous_sibling(id);
		let next = self.next_sibling(id);
		match prev {
			Some(prev) => self.nodes[prev.index()].next_sibling = next,
			None => self.nodes[parent.index()].first_child = next,
		}
		match next {
			Some(next) => self.nodes[next.index()].prev_sibling = prev,
			None => self.nodes[parent.index()].last_child = prev,
		}
		let data = &mut self.nodes[id.index()];
		data.parent = None;
		data.prev_sibling = None;
		data.next_sibling = None;
	}

	/// Puts `replacement` where `old` is and detaches `old`.
	pub fn replace_with(&mut self, old: NodeId, replacement: NodeId) -> DomResult<()> {
		if old == replacement {
			return Ok(());
		}
		let parent = self.parent(old).ok_or(DomError::Detached(old))?;
		self.insert_before(parent, replacement, Some(old))?;
		self.remove(old);
		Ok(())
	}

	/// Detaches every child of `id`.
	pub fn clear_children(&mut self, id: NodeId) {
		while let Some(child) = self.first_child(id) {
			self.remove(child);
		}
	}

	fn link_last(&mut self, parent: NodeId, child: NodeId) {
		let last = self.last_child(parent);
		{
			let data = &mut self.nodes[child.index()];
			data.parent = Some(parent);
			data.prev_sibling = last;
			data.next_sibling = None;
		}
		match last {
			Some(last) => self.nodes[last.index()].next_sibling = Some(child),
			None => self.nodes[parent.index()].first_child = Some(child),
		}
		self.nodes[parent.index()].last_child = Some(child);
	}

	fn link_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
		let prev = self.previous_sibling(reference);
		{
			let data = &mut self.nodes[child.index()];
			data.parent = Some(parent);
			data.prev_sibling = prev;
			data.next_sibling = Some(reference);
		}
		self.nodes[reference.index()].prev_sibling = Some(child);
		match prev {
			Some(prev) => self.nodes[prev.index()].next_sibling = Some(child),
			None => self.nodes[parent.index()].first_child = Some(child),
		}
	}
}

/// Iterator over the direct children of a node.
#[derive(Debug, Clone)]
pub struct Children<'a> {
	document: &'a Document,
	next: Option<NodeId>,
}

impl Iterator for Children<'_> {
	type Item = NodeId;

	fn next(&mut self) -> Option<NodeId> {
		let current = self.next?;
		self.next = self.document.next_sibling(current);
		Some(current)
	}
}

/// Pre-order iterator over a subtree.
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
	document: &'a Document,
	scope: NodeId,
	next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
	type Item = NodeId;

	fn next(&mut self) -> Option<NodeId> {
		let current = self.next?;
		self.next = self.document.first_child(current).or_else(|| {
			let mut cursor = current;
			loop {
				if cursor == self.scope {
					return None;
				}
				if let Some(sibling) = self.document.next_sibling(cursor) {
					return Some(sibling);
				}
				cursor = self.document.parent(cursor)?;
			}
		});
		Some(current)
	}
}
