//! # Reinhardt Hydrate
//!
//! Hydration support for server-rendered Reinhardt views.
//!
//! The server renders a view tree, then annotates component host elements
//! with what the client needs to reuse the rendered DOM: container contents,
//! template ids, explicit node locations and disconnected slots. The client
//! reads those annotations and binds every template slot to the existing
//! node instead of creating a new one. Server-rendered views the client does
//! not claim are removed once the application reports stable.
//!
//! ## Crates
//!
//! - [`dom`]: the arena-backed document the engine reads and writes, with
//!   HTML serialization and parsing
//! - [`hydration`]: annotation, reconciliation and cleanup
//!
//! ## Quick Start
//!
//! ```
//! use reinhardt_hydrate::prelude::*;
//!
//! let mut builder = TemplateBuilder::component("app").host_tag("app-root");
//! let main = builder.element(None, "main");
//! builder.text(Some(main), "hello");
//! let definition = builder.build();
//!
//! let mut document = Document::new();
//! let host = document.create_element("app-root");
//! let main_node = document.create_element("main");
//! let text = document.create_text("hello");
//! document.append_child(document.body(), host).unwrap();
//! document.append_child(host, main_node).unwrap();
//! document.append_child(main_node, text).unwrap();
//!
//! let mut view = ViewInstance::new(definition, Some(host));
//! view.set_slot(0, Slot::Node(main_node));
//! view.set_slot(1, Slot::Node(text));
//!
//! let stats = AnnotationSession::new(HydrationConfig::default())
//!     .annotate_for_hydration(&mut document, &view)
//!     .unwrap();
//! assert_eq!(stats.serialized_views, 1);
//! assert_eq!(document.body_html(), "<app-root><main>hello</main></app-root>");
//! ```

pub use reinhardt_dom as dom;
pub use reinhardt_hydration as hydration;

/// Commonly used types for rendering and hydrating views.
pub mod prelude {
	pub use reinhardt_dom::{Document, DomError, NodeId, NodeType};
	pub use reinhardt_hydration::view::{
		ContainerHost, Slot, TemplateBuilder, ViewContainer, ViewDefinition, ViewInstance, ViewTree,
	};
	pub use reinhardt_hydration::{
		AnnotationSession, HydrationConfig, HydrationError, HydrationInfo, HydrationResult,
		HydrationSession, SiblingMissPolicy, cleanup_dehydrated_views,
		cleanup_dehydrated_views_when_stable, locate_next_rnode,
	};
}
