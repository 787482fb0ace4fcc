//! Hydration configuration.

use serde::{Deserialize, Serialize};

/// Attribute carrying the serialized annotation on a component host.
pub const DEFAULT_ANNOTATION_ATTRIBUTE: &str = "ngh";

/// Attribute that opts a component host out of annotation and hydration.
pub const DEFAULT_SKIP_HYDRATION_ATTRIBUTE: &str = "ngskiphydration";

/// What to do when a sibling walk runs out of siblings before reaching its
/// target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiblingMissPolicy {
	/// Fail the annotation with [`HydrationError::Navigation`](crate::HydrationError::Navigation).
	Fail,
	/// Treat the target as unreachable from this reference and retry from
	/// `<body>`.
	#[default]
	Fallback,
	/// Emit a path with no steps, i.e. point at the reference node itself.
	EmptyPath,
}

/// Options shared by the serializer and the reconciler.
///
/// # Example
///
/// ```
/// use reinhardt_hydration::{HydrationConfig, SiblingMissPolicy};
///
/// let config = HydrationConfig::new()
///     .annotation_attribute("data-rh-ngh")
///     .sibling_miss(SiblingMissPolicy::Fail);
/// assert_eq!(config.annotation_attribute, "data-rh-ngh");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HydrationConfig {
	/// Host attribute carrying the annotation JSON.
	pub annotation_attribute: String,
	/// Host attribute that disables hydration for a component subtree.
	pub skip_hydration_attribute: String,
	/// Behaviour on a sibling-walk miss while computing paths.
	pub sibling_miss: SiblingMissPolicy,
	/// Reject binding one DOM node to two slots.
	pub check_claimed: bool,
	/// Insert marker comments around text nodes HTML parsing would lose.
	pub text_node_markers: bool,
}

impl Default for HydrationConfig {
	fn default() -> Self {
		Self {
			annotation_attribute: DEFAULT_ANNOTATION_ATTRIBUTE.to_string(),
			skip_hydration_attribute: DEFAULT_SKIP_HYDRATION_ATTRIBUTE.to_string(),
			sibling_miss: SiblingMissPolicy::default(),
			check_claimed: true,
			text_node_markers: true,
		}
	}
}

impl HydrationConfig {
	/// Creates the default configuration.
	pub fn new() -> Self {
		Self::default()
	}

	pub fn annotation_attribute(mut self, name: impl Into<String>) -> Self {
		self.annotation_attribute = name.into();
		self
	}

	pub fn skip_hydration_attribute(mut self, name: impl Into<String>) -> Self {
		self.skip_hydration_attribute = name.into();
		self
	}

	pub fn sibling_miss(mut self, policy: SiblingMissPolicy) -> Self {
		self.sibling_miss = policy;
		self
	}

	pub fn check_claimed(mut self, enabled: bool) -> Self {
		self.check_claimed = enabled;
		self
	}

	pub fn text_node_markers(mut self, enabled: bool) -> Self {
		self.text_node_markers = enabled;
		self
	}
}
