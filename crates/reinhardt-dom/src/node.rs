//! Node handles and node payloads stored in a [`Document`](crate::Document).

use std::fmt;

/// Handle to a node owned by a [`Document`](crate::Document).
///
/// Handles are arena indices. They stay valid for the lifetime of the
/// document that issued them, including after the node is detached.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
	pub(crate) const fn new(raw: u32) -> Self {
		Self(raw)
	}

	/// Returns the raw arena index.
	pub const fn as_u32(self) -> u32 {
		self.0
	}

	pub(crate) const fn index(self) -> usize {
		self.0 as usize
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Coarse node classification, mirroring the DOM `nodeType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
	Document,
	Element,
	Text,
	Comment,
}

impl fmt::Display for NodeType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Document => "document",
			Self::Element => "element",
			Self::Text => "text",
			Self::Comment => "comment",
		};
		f.write_str(name)
	}
}

/// Element payload: tag name and attributes in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
	tag: String,
	attributes: Vec<(String, String)>,
}

impl ElementData {
	pub(crate) fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into().to_ascii_lowercase(),
			attributes: Vec::new(),
		}
	}

	/// Lowercased tag name.
	pub fn tag(&self) -> &str {
		&self.tag
	}

	/// Attributes in the order they were first set.
	pub fn attributes(&self) -> &[(String, String)] {
		&self.attributes
	}

	pub fn get_attribute(&self, name: &str) -> Option<&str> {
		self.attributes
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}

	pub(crate) fn set_attribute(&mut self, name: &str, value: &str) {
		match self.attributes.iter_mut().find(|(key, _)| key == name) {
			Some((_, existing)) => *existing = value.to_string(),
			None => self
				.attributes
				.push((name.to_string(), value.to_string())),
		}
	}

	pub(crate) fn remove_attribute(&mut self, name: &str) -> Option<String> {
		let position = self.attributes.iter().position(|(key, _)| key == name)?;
		Some(self.attributes.remove(position).1)
	}
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
	Document,
	Element(ElementData),
	Text(String),
	Comment(String),
}

impl NodeKind {
	pub fn node_type(&self) -> NodeType {
		match self {
			Self::Document => NodeType::Document,
			Self::Element(_) => NodeType::Element,
			Self::Text(_) => NodeType::Text,
			Self::Comment(_) => NodeType::Comment,
		}
	}

	pub fn as_element(&self) -> Option<&ElementData> {
		match self {
			Self::Element(element) => Some(element),
			_ => None,
		}
	}

	/// Character data of a text or comment node.
	pub fn character_data(&self) -> Option<&str> {
		match self {
			Self::Text(data) | Self::Comment(data) => Some(data),
			_ => None,
		}
	}

	pub fn is_element(&self) -> bool {
		matches!(self, Self::Element(_))
	}

	pub fn is_text(&self) -> bool {
		matches!(self, Self::Text(_))
	}

	pub fn is_comment(&self) -> bool {
		matches!(self, Self::Comment(_))
	}

	pub(crate) fn can_have_children(&self) -> bool {
		matches!(self, Self::Document | Self::Element(_))
	}
}

/// Arena slot: payload plus tree links.
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
	pub(crate) kind: NodeKind,
	pub(crate) parent: Option<NodeId>,
	pub(crate) first_child: Option<NodeId>,
	pub(crate) last_child: Option<NodeId>,
	pub(crate) prev_sibling: Option<NodeId>,
	pub(crate) next_sibling: Option<NodeId>,
}

impl NodeData {
	pub(crate) fn new(kind: NodeKind) -> Self {
		Self {
			kind,
			parent: None,
			first_child: None,
			last_child: None,
			prev_sibling: None,
			next_sibling: None,
		}
	}
}
