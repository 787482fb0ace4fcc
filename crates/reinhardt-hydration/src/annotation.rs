//! Hydration annotation wire format.
//!
//! An annotation is compact JSON written on a component host element:
//!
//! ```text
//! {"n":{"3":"0fn"},"c":{"1":{"v":[{"i":"t0","r":2,"x":3}]}},"t":{"1":"t0"}}
//! ```
//!
//! | Key | Field | Meaning |
//! |-----|-------|---------|
//! | `n` | nodes | explicit location per slot |
//! | `c` | containers | container annotation per slot |
//! | `t` | templates | template id per container slot |
//! | `d` | disconnected | slots whose nodes are not in the document |
//! | `v` | views | serialized views of a container |
//! | `r` | numRootNodes | top-level DOM nodes of a view or element container |
//! | `i` | template | template id of a container view |
//! | `x` | multiplier | repeat count of identical consecutive views |

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Comment inserted after an empty text node, which HTML parsing drops.
pub const EMPTY_TEXT_NODE_COMMENT: &str = "ngetn";

/// Comment inserted between adjacent text nodes, which HTML parsing merges.
pub const TEXT_NODE_SEPARATOR_COMMENT: &str = "ngtns";

/// Marker comments protecting text nodes across an HTML round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextNodeMarker {
	EmptyNode,
	Separator,
}

impl TextNodeMarker {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::EmptyNode => EMPTY_TEXT_NODE_COMMENT,
			Self::Separator => TEXT_NODE_SEPARATOR_COMMENT,
		}
	}

	pub fn from_comment(data: &str) -> Option<Self> {
		match data {
			EMPTY_TEXT_NODE_COMMENT => Some(Self::EmptyNode),
			TEXT_NODE_SEPARATOR_COMMENT => Some(Self::Separator),
			_ => None,
		}
	}
}

/// Structural description of one rendered view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedView {
	#[serde(
		rename = "n",
		default,
		skip_serializing_if = "BTreeMap::is_empty",
		with = "slot_map"
	)]
	pub nodes: BTreeMap<usize, String>,

	#[serde(
		rename = "c",
		default,
		skip_serializing_if = "BTreeMap::is_empty",
		with = "slot_map"
	)]
	pub containers: BTreeMap<usize, SerializedContainer>,

	#[serde(
		rename = "t",
		default,
		skip_serializing_if = "BTreeMap::is_empty",
		with = "slot_map"
	)]
	pub templates: BTreeMap<usize, String>,

	#[serde(rename = "d", default, skip_serializing_if = "BTreeSet::is_empty")]
	pub disconnected: BTreeSet<usize>,
}

impl SerializedView {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
			&& self.containers.is_empty()
			&& self.templates.is_empty()
			&& self.disconnected.is_empty()
	}

	/// Serializes to compact JSON.
	pub fn to_json(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string(self)
	}

	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}
}

/// Annotation of a view container or an element container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedContainer {
	#[serde(rename = "v", default, skip_serializing_if = "Vec::is_empty")]
	pub views: Vec<SerializedContainerView>,

	/// Set for element containers only: nodes between the segment head and
	/// the anchor comment.
	#[serde(rename = "r", default, skip_serializing_if = "Option::is_none")]
	pub num_root_nodes: Option<usize>,
}

impl SerializedContainer {
	/// Total top-level DOM nodes of all views, multipliers expanded.
	pub fn view_node_count(&self) -> usize {
		self.views
			.iter()
			.map(|view| view.num_root_nodes * view.multiplier())
			.sum()
	}
}

/// One (possibly repeated) view inside a container annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedContainerView {
	#[serde(rename = "i")]
	pub template: String,

	#[serde(rename = "r")]
	pub num_root_nodes: usize,

	#[serde(rename = "x", default, skip_serializing_if = "Option::is_none")]
	pub multiplier: Option<usize>,

	#[serde(flatten)]
	pub view: SerializedView,
}

impl SerializedContainerView {
	pub fn new(template: String, num_root_nodes: usize, view: SerializedView) -> Self {
		Self {
			template,
			num_root_nodes,
			multiplier: None,
			view,
		}
	}

	/// How many consecutive views this entry stands for.
	pub fn multiplier(&self) -> usize {
		self.multiplier.unwrap_or(1)
	}

	/// Equal in every field except the multiplier.
	pub fn same_shape(&self, other: &Self) -> bool {
		self.template == other.template
			&& self.num_root_nodes == other.num_root_nodes
			&& self.view == other.view
	}

	pub(crate) fn increment_multiplier(&mut self) {
		self.multiplier = Some(self.multiplier() + 1);
	}
}

/// Slot-keyed maps with decimal string keys, usable under `#[serde(flatten)]`.
mod slot_map {
	use serde::de::{Deserialize, Deserializer, Error};
	use serde::ser::{Serialize, SerializeMap, Serializer};
	use std::collections::BTreeMap;

	pub(super) fn serialize<S, V>(
		map: &BTreeMap<usize, V>,
		serializer: S,
	) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
		V: Serialize,
	{
		let mut out = serializer.serialize_map(Some(map.len()))?;
		for (slot, value) in map {
			out.serialize_entry(&slot.to_string(), value)?;
		}
		out.end()
	}

	pub(super) fn deserialize<'de, D, V>(deserializer: D) -> Result<BTreeMap<usize, V>, D::Error>
	where
		D: Deserializer<'de>,
		V: Deserialize<'de>,
	{
		BTreeMap::<String, V>::deserialize(deserializer)?
			.into_iter()
			.map(|(key, value)| match key.parse::<usize>() {
				Ok(slot) => Ok((slot, value)),
				Err(_) => Err(D::Error::custom(format!("invalid slot index {key:?}"))),
			})
			.collect()
	}
}
