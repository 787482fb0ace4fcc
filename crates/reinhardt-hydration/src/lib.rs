//! Hydration annotations for server-rendered Reinhardt views.
//!
//! The server renders a view tree into a [`Document`], then annotates each
//! component host with a compact description of anything the client cannot
//! infer from template order alone. The client parses the HTML, reads those
//! annotations and binds every template slot to the existing node instead
//! of creating a new one. Server-rendered container views the client does
//! not reuse are removed once the application is stable.
//!
//! ## Architecture
//!
//! ```text
//! server                                   client
//! ┌──────────────────────┐                 ┌───────────────────────────────┐
//! │ render view tree     │                 │ Document::parse_html          │
//! │ AnnotationSession    │  ngh="{...}"    │ process_text_node_markers_... │
//! │  ├─ TemplateIdRegistry ─────────────▶  │ retrieve_hydration_info       │
//! │  ├─ calc_path_between│   HTML          │ locate_next_rnode (per slot)  │
//! │  └─ text markers     │                 │ locate_dehydrated_views_...   │
//! └──────────────────────┘                 │ find_matching_dehydrated_view │
//!                                          │ cleanup_dehydrated_views      │
//!                                          └───────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use reinhardt_hydration::view::{Slot, TemplateBuilder, ViewInstance};
//! use reinhardt_hydration::{
//!     AnnotationSession, HydrationConfig, HydrationSession, locate_next_rnode,
//! };
//! use reinhardt_dom::Document;
//!
//! let mut builder = TemplateBuilder::component("greeting").host_tag("app-greeting");
//! let heading = builder.element(None, "h1");
//! let definition = builder.build();
//!
//! // Server
//! let mut server = Document::new();
//! let host = server.create_element("app-greeting");
//! let h1 = server.create_element("h1");
//! server.append_child(server.body(), host).unwrap();
//! server.append_child(host, h1).unwrap();
//! let mut view = ViewInstance::new(definition.clone(), Some(host));
//! view.set_slot(heading, Slot::Node(h1));
//! AnnotationSession::new(HydrationConfig::default())
//!     .annotate_for_hydration(&mut server, &view)
//!     .unwrap();
//!
//! // Client
//! let mut client = Document::parse_html(&server.body_html()).unwrap();
//! let host = client.first_child(client.body()).unwrap();
//! let mut session = HydrationSession::new(HydrationConfig::default());
//! let mut info = session.retrieve_hydration_info(&mut client, host).unwrap().unwrap();
//! let view = ViewInstance::new(definition, Some(host));
//! let node = locate_next_rnode(&client, &mut info, &view, heading, None, false).unwrap();
//! assert_eq!(client.tag_name(node), Some("h1"));
//! ```

pub mod annotation;
pub mod cleanup;
pub mod config;
pub mod dehydrated;
pub mod dom_path;
pub mod error;
pub mod node_location;
pub mod reconcile;
pub mod serialize;
pub mod stats;
pub mod template_id;
pub mod view;

pub use annotation::{SerializedContainer, SerializedContainerView, SerializedView, TextNodeMarker};
pub use cleanup::{
	cleanup_dehydrated_views, cleanup_dehydrated_views_when_stable, wait_until_stable,
};
pub use config::{HydrationConfig, SiblingMissPolicy};
pub use dehydrated::{
	DehydratedView, find_matching_dehydrated_view, locate_dehydrated_views_in_container,
};
pub use dom_path::{NavigationError, calc_path_between, navigate_between};
pub use error::{HydrationError, HydrationResult};
pub use node_location::{
	NavigationStep, NodeLocation, ReferenceNode, compress_node_location, decompress_node_location,
};
pub use reconcile::{
	HydrationInfo, HydrationSession, locate_element_container_anchor, locate_next_rnode,
	validate_matching_node,
};
pub use serialize::AnnotationSession;
pub use stats::{AnnotationStats, CleanupReport, HydrationStats};
pub use template_id::TemplateIdRegistry;

pub use reinhardt_dom::{Document, NodeId};
