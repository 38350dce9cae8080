//! One live container per host.
//!
//! Every render replaces the host's mount wholesale: new view tree, new
//! listener generation, new activation filter. Events are delivered with the
//! generation of the listener that saw them, and anything addressed to a
//! retired generation is dropped, so nodes from an earlier render can never
//! trigger a toggle.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

use crate::dom::Node;
use crate::dom::table::{SELECTED_CLASS, dim_cell_mut};
use crate::input::{Activation, ActivationFilter, UiEvent};
use crate::registry::HostId;
use crate::state::ElemId;

/// Identity of one attached delegated listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ListenerGeneration(pub u64);

impl fmt::Display for ListenerGeneration {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "gen#{}", self.0)
	}
}

/// An activation accepted by the live listener, with its render's flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
	pub activation: Activation,
	pub in_selection: bool,
}

#[derive(Debug)]
struct Mount {
	generation: ListenerGeneration,
	view: Node,
	in_selection: bool,
	listening: bool,
	filter: ActivationFilter,
}

#[derive(Debug, Default)]
pub struct ContainerReconciler {
	mounts: HashMap<HostId, Mount>,
	next_generation: u64,
}

impl ContainerReconciler {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the host's container with `view` and attaches one listener.
	pub fn rebuild(&mut self, host: HostId, view: Node, in_selection: bool) -> ListenerGeneration {
		self.install(host, view, in_selection, true)
	}

	/// Replaces the host's container with an error view. No listener is
	/// attached.
	pub fn fail(&mut self, host: HostId, view: Node) -> ListenerGeneration {
		self.install(host, view, false, false)
	}

	fn install(&mut self, host: HostId, view: Node, in_selection: bool, listening: bool) -> ListenerGeneration {
		self.next_generation += 1;
		let generation = ListenerGeneration(self.next_generation);
		let mount = Mount {
			generation,
			view,
			in_selection,
			listening,
			filter: ActivationFilter::new(),
		};

		if let Some(retired) = self.mounts.insert(host, mount) {
			trace!(target = "dimtable.render", %host, retired = %retired.generation, %generation, "container replaced");
		}
		generation
	}

	/// Routes an event from the listener of `generation`.
	///
	/// Returns `None` for retired generations, error views and events that are
	/// not activations.
	pub fn dispatch(&mut self, host: HostId, generation: ListenerGeneration, event: UiEvent) -> Option<Dispatch> {
		let mount = self.mounts.get_mut(&host)?;
		if !mount.listening || mount.generation != generation {
			debug!(target = "dimtable.render", %host, %generation, "event from retired listener dropped");
			return None;
		}

		let activation = mount.filter.accept(event)?;
		Some(Dispatch {
			activation,
			in_selection: mount.in_selection,
		})
	}

	/// Patches the selected class of the cell showing `elem` in the live view.
	///
	/// Returns whether a cell was found.
	pub fn set_selected(&mut self, host: HostId, elem: ElemId, selected: bool) -> bool {
		let Some(mount) = self.mounts.get_mut(&host) else {
			return false;
		};
		match dim_cell_mut(&mut mount.view, elem) {
			Some(cell) => {
				cell.set_class(SELECTED_CLASS, selected);
				true
			}
			None => false,
		}
	}

	pub fn view(&self, host: HostId) -> Option<&Node> {
		self.mounts.get(&host).map(|mount| &mount.view)
	}

	pub fn generation(&self, host: HostId) -> Option<ListenerGeneration> {
		self.mounts.get(&host).map(|mount| mount.generation)
	}

	/// Number of live listeners for `host`: 0 or 1.
	pub fn listener_count(&self, host: HostId) -> usize {
		self.mounts.get(&host).map_or(0, |mount| usize::from(mount.listening))
	}

	/// Removes the host's container entirely.
	pub fn detach(&mut self, host: HostId) -> bool {
		self.mounts.remove(&host).is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::dom::table::{DIM_CELL_CLASS, ELEM_ATTR, error_view};

	fn view_with_cell(elem: ElemId) -> Node {
		Node::new("div").with_child(
			Node::new("td")
				.with_class(DIM_CELL_CLASS)
				.with_attr(ELEM_ATTR, elem.to_string()),
		)
	}

	#[test]
	fn rebuild_retires_previous_generation() {
		let mut reconciler = ContainerReconciler::new();
		let host = HostId(1);
		let first = reconciler.rebuild(host, view_with_cell(1), false);
		let second = reconciler.rebuild(host, view_with_cell(1), false);
		assert_ne!(first, second);
		assert_eq!(reconciler.listener_count(host), 1);
		assert!(reconciler.dispatch(host, first, UiEvent::click("1")).is_none());
		assert!(reconciler.dispatch(host, second, UiEvent::click("1")).is_some());
	}

	#[test]
	fn dispatch_carries_render_flag() {
		let mut reconciler = ContainerReconciler::new();
		let generation = reconciler.rebuild(HostId(1), view_with_cell(1), true);
		let dispatch = reconciler.dispatch(HostId(1), generation, UiEvent::click("1")).unwrap();
		assert!(dispatch.in_selection);
		assert_eq!(dispatch.activation.target, "1");
	}

	#[test]
	fn error_view_has_no_listener() {
		let mut reconciler = ContainerReconciler::new();
		let generation = reconciler.fail(HostId(1), error_view("boom"));
		assert_eq!(reconciler.listener_count(HostId(1)), 0);
		assert!(reconciler.dispatch(HostId(1), generation, UiEvent::click("1")).is_none());
	}

	#[test]
	fn set_selected_patches_live_cell() {
		let mut reconciler = ContainerReconciler::new();
		reconciler.rebuild(HostId(1), view_with_cell(4), true);
		assert!(reconciler.set_selected(HostId(1), 4, true));
		let view = reconciler.view(HostId(1)).unwrap();
		assert!(view.find(&|n| n.has_class(SELECTED_CLASS)).is_some());
		assert!(!reconciler.set_selected(HostId(1), 5, true));
		assert!(!reconciler.set_selected(HostId(2), 4, true));
	}

	#[test]
	fn hosts_have_independent_mounts() {
		let mut reconciler = ContainerReconciler::new();
		let a = reconciler.rebuild(HostId(1), view_with_cell(1), false);
		reconciler.rebuild(HostId(2), view_with_cell(1), false);
		assert!(reconciler.dispatch(HostId(2), a, UiEvent::click("1")).is_none());
		assert!(reconciler.detach(HostId(1)));
		assert_eq!(reconciler.listener_count(HostId(1)), 0);
		assert_eq!(reconciler.listener_count(HostId(2)), 1);
	}
}
