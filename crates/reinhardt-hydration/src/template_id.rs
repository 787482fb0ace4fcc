//! Stable ids for view templates within one serialization session.

use crate::view::ViewDefinition;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// Assigns `t0`, `t1`, ... to templates in first-seen order.
///
/// Entries hold the template weakly, so the registry never keeps a
/// definition alive; the held `Weak` also pins the allocation, so an address
/// cannot be reused by a different template while its entry exists.
#[derive(Debug, Default)]
pub struct TemplateIdRegistry {
	entries: HashMap<usize, Entry>,
	next_id: usize,
	generation: u64,
}

#[derive(Debug)]
struct Entry {
	template: Weak<ViewDefinition>,
	id: String,
}

impl TemplateIdRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the id of `template`, assigning the next free one on first
	/// sight.
	pub fn get(&mut self, template: &Arc<ViewDefinition>) -> String {
		let key = Arc::as_ptr(template) as usize;
		if let Some(entry) = self.entries.get(&key) {
			return entry.id.clone();
		}
		let id = format!("t{}", self.next_id);
		self.next_id += 1;
		self.entries.insert(
			key,
			Entry {
				template: Arc::downgrade(template),
				id: id.clone(),
			},
		);
		id
	}

	/// Number of templates with an id.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Incremented on every [`teardown`](Self::teardown).
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Forgets templates that have been dropped.
	pub fn prune(&mut self) {
		self.entries
			.retain(|_, entry| entry.template.strong_count() > 0);
	}

	/// Ends the session: every id is forgotten and numbering restarts.
	pub fn teardown(&mut self) {
		self.entries.clear();
		self.next_id = 0;
		self.generation += 1;
	}
}
