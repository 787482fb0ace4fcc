//! Render-tree model read by the serializer, reconciler and cleanup.
//!
//! A [`ViewDefinition`] is the static template shared by every instance; a
//! [`ViewInstance`] holds one [`Slot`] per template slot. Containers own
//! their child views and any server-rendered views not yet claimed.

mod collect;
mod definition;
mod instance;

pub use collect::{NativeNodeCollector, TemplateOrderCollector};
pub use definition::{
	EmbeddedTemplates, SlotDef, SlotKind, TemplateBuilder, ViewDefinition, ViewKind,
};
pub use instance::{ContainerHost, Slot, ViewContainer, ViewInstance};

/// Root component views of an application.
pub trait ViewTree {
	fn root_views(&self) -> Vec<&ViewInstance>;

	fn root_views_mut(&mut self) -> Vec<&mut ViewInstance>;
}

impl ViewTree for [ViewInstance] {
	fn root_views(&self) -> Vec<&ViewInstance> {
		self.iter().collect()
	}

	fn root_views_mut(&mut self) -> Vec<&mut ViewInstance> {
		self.iter_mut().collect()
	}
}

impl ViewTree for Vec<ViewInstance> {
	fn root_views(&self) -> Vec<&ViewInstance> {
		self.as_slice().root_views()
	}

	fn root_views_mut(&mut self) -> Vec<&mut ViewInstance> {
		self.as_mut_slice().root_views_mut()
	}
}

impl ViewTree for ViewInstance {
	fn root_views(&self) -> Vec<&ViewInstance> {
		vec![self]
	}

	fn root_views_mut(&mut self) -> Vec<&mut ViewInstance> {
		vec![self]
	}
}
