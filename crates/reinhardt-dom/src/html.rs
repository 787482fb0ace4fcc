//! HTML serialization and parsing for [`Document`].
//!
//! Serialization emits no insignificant whitespace so that the parsed tree
//! has exactly the node sequence of the tree that produced it.

use crate::document::Document;
use crate::error::{DomError, DomResult};
use crate::node::{NodeId, NodeKind};
use scraper::{ElementRef, Html, Selector};

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
	"wbr",
];

impl Document {
	/// Serializes `id` and its subtree.
	pub fn outer_html(&self, id: NodeId) -> String {
		let mut out = String::new();
		self.write_node(id, &mut out);
		out
	}

	/// Serializes the children of `id`.
	pub fn inner_html(&self, id: NodeId) -> String {
		let mut out = String::new();
		for child in self.children(id) {
			self.write_node(child, &mut out);
		}
		out
	}

	/// Serialized content of `<body>`, the payload shipped to the client.
	pub fn body_html(&self) -> String {
		self.inner_html(self.body())
	}

	fn write_node(&self, id: NodeId, out: &mut String) {
		match self.kind(id) {
			NodeKind::Document => {
				for child in self.children(id) {
					self.write_node(child, out);
				}
			}
			NodeKind::Element(element) => {
				out.push('<');
				out.push_str(element.tag());
				for (name, value) in element.attributes() {
					out.push(' ');
					out.push_str(name);
					out.push_str("=\"");
					escape_into(value, true, out);
					out.push('"');
				}
				out.push('>');
				if VOID_ELEMENTS.contains(&element.tag()) {
					return;
				}
				for child in self.children(id) {
					self.write_node(child, out);
				}
				out.push_str("</");
				out.push_str(element.tag());
				out.push('>');
			}
			NodeKind::Text(data) => escape_into(data, false, out),
			NodeKind::Comment(data) => {
				out.push_str("<!--");
				out.push_str(data);
				out.push_str("-->");
			}
		}
	}

	/// Parses body markup into a fresh document.
	///
	/// `html` is treated as the content of `<body>`; the returned document
	/// has the same shape as one built with [`Document::new`].
	pub fn parse_html(html: &str) -> DomResult<Self> {
		let wrapped = format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>");
		let parsed = Html::parse_document(&wrapped);
		let selector = Selector::parse("body").map_err(|e| DomError::Parse(e.to_string()))?;
		let source = parsed
			.select(&selector)
			.next()
			.ok_or_else(|| DomError::Parse("document has no body".to_string()))?;

		let mut document = Document::new();
		let body = document.body();
		document.import_children(body, source)?;
		Ok(document)
	}

	fn import_children(&mut self, parent: NodeId, source: ElementRef<'_>) -> DomResult<()> {
		for child in source.children() {
			let id = match child.value() {
				scraper::Node::Element(element) => {
					let id = self.create_element(element.name());
					for (name, value) in element.attrs() {
						self.set_attribute(id, name, value)?;
					}
					if let Some(child_element) = ElementRef::wrap(child) {
						self.import_children(id, child_element)?;
					}
					id
				}
				scraper::Node::Text(text) => self.create_text(text),
				scraper::Node::Comment(comment) => self.create_comment(comment),
				_ => continue,
			};
			self.append_child(parent, id)?;
		}
		Ok(())
	}
}

fn escape_into(value: &str, attribute: bool, out: &mut String) {
	for ch in value.chars() {
		match ch {
			'&' => out.push_str("&amp;"),
			'"' if attribute => out.push_str("&quot;"),
			'<' if !attribute => out.push_str("&lt;"),
			'>' if !attribute => out.push_str("&gt;"),
			'\u{a0}' => out.push_str("&nbsp;"),
			_ => out.push(ch),
		}
	}
}
