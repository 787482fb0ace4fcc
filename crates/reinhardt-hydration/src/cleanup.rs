//! Removal of server-rendered views nobody claimed.

use crate::dehydrated::DehydratedView;
use crate::stats::CleanupReport;
use crate::view::{ContainerHost, Slot, ViewInstance, ViewTree};
use reinhardt_dom::Document;
use tokio::sync::watch;
use tracing::{debug, info};

/// Removes the DOM of every dehydrated view still held by a container
/// reachable from `roots`, and empties those lists.
///
/// Roots without a host element are ignored. Running it again removes
/// nothing.
pub fn cleanup_dehydrated_views<R>(document: &mut Document, roots: &mut R) -> CleanupReport
where
	R: ViewTree + ?Sized,
{
	let mut report = CleanupReport::default();
	let mut worklist: Vec<&mut ViewInstance> = roots
		.root_views_mut()
		.into_iter()
		.filter(|view| view.host().is_some())
		.collect();

	while let Some(view) = worklist.pop() {
		for slot in view.slots_mut() {
			match slot {
				Slot::Component(component) => worklist.push(&mut **component),
				Slot::Container(container) => {
					for dehydrated in std::mem::take(container.dehydrated_views_mut()) {
						report.nodes_removed += remove_dehydrated_view(document, &dehydrated);
						report.views_removed += 1;
					}
					let (host, views) = container.parts_mut();
					if let ContainerHost::Component(component) = host {
						worklist.push(&mut **component);
					}
					worklist.extend(views.iter_mut());
				}
				Slot::Empty | Slot::Node(_) | Slot::Projection(_) => {}
			}
		}
	}

	info!(
		views = report.views_removed,
		nodes = report.nodes_removed,
		"removed unclaimed dehydrated views"
	);
	report
}

/// Detaches the `num_root_nodes` siblings starting at the view's first node.
/// Returns how many nodes were removed.
pub fn remove_dehydrated_view(document: &mut Document, view: &DehydratedView) -> usize {
	let mut removed = 0;
	let mut current = view.first_child();
	while removed < view.num_root_nodes() {
		let Some(node) = current else {
			break;
		};
		current = document.next_sibling(node);
		document.remove(node);
		removed += 1;
	}
	debug!(template = view.template(), removed, "removed dehydrated view");
	removed
}

/// Resolves once `stable` reports `true`.
///
/// Returns `false` when the sender is dropped before the application ever
/// reports stable. Awaiting this first and then calling
/// [`cleanup_dehydrated_views`] keeps the document free for other work
/// while the application settles.
pub async fn wait_until_stable(stable: &mut watch::Receiver<bool>) -> bool {
	if stable.wait_for(|is_stable| *is_stable).await.is_err() {
		debug!("stable signal closed before the application became stable");
		return false;
	}
	true
}

/// Waits for the first `true` on `stable`, then runs
/// [`cleanup_dehydrated_views`] once.
///
/// The document and the view tree stay mutably borrowed for the whole wait.
/// Callers that keep rendering until the application is stable should use
/// [`wait_until_stable`] and run the cleanup themselves.
///
/// Returns `None` without touching the document when the sender is dropped
/// before the application ever reports stable.
pub async fn cleanup_dehydrated_views_when_stable<R>(
	mut stable: watch::Receiver<bool>,
	document: &mut Document,
	roots: &mut R,
) -> Option<CleanupReport>
where
	R: ViewTree + ?Sized,
{
	if !wait_until_stable(&mut stable).await {
		return None;
	}
	Some(cleanup_dehydrated_views(document, roots))
}
