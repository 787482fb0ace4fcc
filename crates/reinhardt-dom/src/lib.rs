//! Arena-backed live DOM for Reinhardt server rendering and hydration.
//!
//! The server renders into a [`Document`], serializes it with
//! [`Document::body_html`], and the client rebuilds an equivalent tree with
//! [`Document::parse_html`]. Nodes are addressed by copyable [`NodeId`]
//! handles, which lets render-tree models hold node references without
//! borrowing the document.
//!
//! ```
//! use reinhardt_dom::Document;
//!
//! let mut document = Document::new();
//! let div = document.create_element("div");
//! let text = document.create_text("hello");
//! document.append_child(div, text).unwrap();
//! document.append_child(document.body(), div).unwrap();
//!
//! assert_eq!(document.body_html(), "<div>hello</div>");
//! ```

mod document;
pub mod error;
mod html;
mod node;

pub use document::{Children, Descendants, Document};
pub use error::{DomError, DomResult};
pub use node::{ElementData, NodeId, NodeKind, NodeType};
