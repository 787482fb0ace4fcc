//! Compact node location strings.
//!
//! A location is a reference node followed by navigation steps, with runs of
//! identical steps collapsed into `<step><count>`:
//!
//! ```text
//! bf2n   body -> firstChild -> firstChild -> nextSibling
//! 3fn4   slot 3 -> firstChild -> nextSibling x4
//! h      the host element itself
//! ```

use crate::error::{HydrationError, HydrationResult};
use std::fmt;

/// Marker for a location relative to the view's host element.
pub const REFERENCE_NODE_HOST: char = 'h';

/// Marker for a location relative to `<body>`.
pub const REFERENCE_NODE_BODY: char = 'b';

/// One DOM navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationStep {
	FirstChild,
	NextSibling,
}

impl NavigationStep {
	pub const fn as_char(self) -> char {
		match self {
			Self::FirstChild => 'f',
			Self::NextSibling => 'n',
		}
	}

	pub const fn from_char(ch: char) -> Option<Self> {
		match ch {
			'f' => Some(Self::FirstChild),
			'n' => Some(Self::NextSibling),
			_ => None,
		}
	}
}

/// Where a location starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceNode {
	/// The host element of the view being hydrated.
	Host,
	/// The document `<body>`.
	Body,
	/// The native node of a slot in the same view.
	Slot(usize),
}

impl fmt::Display for ReferenceNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Host => write!(f, "{REFERENCE_NODE_HOST}"),
			Self::Body => write!(f, "{REFERENCE_NODE_BODY}"),
			Self::Slot(index) => write!(f, "{index}"),
		}
	}
}

/// A decoded location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLocation {
	pub reference: ReferenceNode,
	pub steps: Vec<NavigationStep>,
}

/// Encodes `steps` relative to `reference`.
///
/// ```
/// use reinhardt_hydration::node_location::{compress_node_location, NavigationStep, ReferenceNode};
///
/// let steps = [
///     NavigationStep::FirstChild,
///     NavigationStep::FirstChild,
///     NavigationStep::NextSibling,
/// ];
/// assert_eq!(compress_node_location(ReferenceNode::Body, &steps), "bf2n");
/// ```
pub fn compress_node_location(reference: ReferenceNode, steps: &[NavigationStep]) -> String {
	let mut out = reference.to_string();
	for run in steps.chunk_by(|a, b| a == b) {
		out.push(run[0].as_char());
		if run.len() > 1 {
			out.push_str(&run.len().to_string());
		}
	}
	out
}

/// Decodes a string produced by [`compress_node_location`].
///
/// A missing repeat count, or a count of `0`, means a single step.
pub fn decompress_node_location(path: &str) -> HydrationResult<NodeLocation> {
	let malformed = || HydrationError::MalformedNodeLocation(path.to_string());
	let mut chars = path.char_indices().peekable();

	let reference = match chars.peek() {
		Some(&(_, REFERENCE_NODE_HOST)) => {
			chars.next();
			ReferenceNode::Host
		}
		Some(&(_, REFERENCE_NODE_BODY)) => {
			chars.next();
			ReferenceNode::Body
		}
		Some(&(_, ch)) if ch.is_ascii_digit() => {
			let digits = take_digits(path, &mut chars);
			ReferenceNode::Slot(digits.parse().map_err(|_| malformed())?)
		}
		_ => return Err(malformed()),
	};

	let mut steps = Vec::new();
	while let Some((_, ch)) = chars.next() {
		let step = NavigationStep::from_char(ch).ok_or_else(malformed)?;
		let digits = take_digits(path, &mut chars);
		let count = if digits.is_empty() {
			1
		} else {
			digits.parse::<usize>().map_err(|_| malformed())?.max(1)
		};
		steps.extend(std::iter::repeat_n(step, count));
	}

	Ok(NodeLocation { reference, steps })
}

fn take_digits<'a>(
	path: &'a str,
	chars: &mut std::iter::Peekable<std::str::CharIndices<'a>>,
) -> &'a str {
	let Some(&(start, _)) = chars.peek() else {
		return "";
	};
	let mut end = start;
	while let Some(&(index, ch)) = chars.peek() {
		if !ch.is_ascii_digit() {
			break;
		}
		end = index + ch.len_utf8();
		chars.next();
	}
	&path[start..end]
}
