//! Ownership map from host elements to their selection state.
//!
//! States are created on first use and dropped when the host reports that the
//! element is gone. Nothing else ever removes them.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::state::{SelectionState, SharedState};

/// Stable identifier the host assigns to one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostId(pub u64);

impl fmt::Display for HostId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "host#{}", self.0)
	}
}

#[derive(Debug, Default)]
pub struct StateRegistry {
	states: HashMap<HostId, SharedState>,
}

impl StateRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the state for `host`, creating it on first use.
	pub fn get_or_create(&mut self, host: HostId) -> SharedState {
		self.states
			.entry(host)
			.or_insert_with(|| {
				debug!(target = "dimtable.render", %host, "creating selection state");
				SelectionState::shared()
			})
			.clone()
	}

	pub fn get(&self, host: HostId) -> Option<SharedState> {
		self.states.get(&host).cloned()
	}

	/// Drops the state of a disposed host. Returns whether one existed.
	pub fn dispose(&mut self, host: HostId) -> bool {
		let removed = self.states.remove(&host).is_some();
		if removed {
			debug!(target = "dimtable.render", %host, "selection state dropped");
		}
		removed
	}

	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}
}
