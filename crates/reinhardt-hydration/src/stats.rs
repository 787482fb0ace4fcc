//! Counters reported by annotation, hydration and cleanup.

use tracing::info;

/// Totals of one annotation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationStats {
	/// Host elements that received an annotation attribute.
	pub annotated_hosts: usize,
	/// Views walked, including container views.
	pub serialized_views: usize,
	/// Explicit node locations emitted.
	pub explicit_paths: usize,
	/// Marker comments inserted around text nodes.
	pub text_markers: usize,
	/// Slots reported as disconnected.
	pub disconnected_slots: usize,
}

impl AnnotationStats {
	/// Counts accumulated after `earlier` was taken.
	pub fn since(&self, earlier: &Self) -> Self {
		Self {
			annotated_hosts: self.annotated_hosts - earlier.annotated_hosts,
			serialized_views: self.serialized_views - earlier.serialized_views,
			explicit_paths: self.explicit_paths - earlier.explicit_paths,
			text_markers: self.text_markers - earlier.text_markers,
			disconnected_slots: self.disconnected_slots - earlier.disconnected_slots,
		}
	}
}

/// Totals of client-side hydration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HydrationStats {
	/// Component views whose annotation was read.
	pub hydrated_components: usize,
	/// DOM nodes bound to slots.
	pub hydrated_nodes: usize,
	/// Dehydrated views claimed by containers.
	pub claimed_views: usize,
	/// Text marker comments consumed before hydration.
	pub text_markers: usize,
}

impl HydrationStats {
	/// Emits the totals at `info` level.
	pub fn log_summary(&self) {
		info!(
			components = self.hydrated_components,
			nodes = self.hydrated_nodes,
			claimed_views = self.claimed_views,
			text_markers = self.text_markers,
			"hydration finished"
		);
	}
}

/// Outcome of a dehydrated view cleanup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
	pub views_removed: usize,
	pub nodes_removed: usize,
}
