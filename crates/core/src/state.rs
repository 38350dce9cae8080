//! Per-host selection state.
//!
//! One [`SelectionState`] exists per host element. It is the only piece of
//! the visualization that survives a render; everything else is rebuilt.

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::projector::{Projection, RowEntry};

/// Element identity of a dimension value (`qElemNumber`).
pub type ElemId = i64;

/// Selection state shared between the render path and activation handlers.
pub type SharedState = Arc<Mutex<SelectionState>>;

/// Session phase derived from the last observed flag and the session set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
	/// No backend session; clicks accumulate as pending intent.
	Idle,
	/// Backend session with at least one selected identity.
	Active,
	/// Backend session whose selection went empty; must be cancelled.
	ActiveEmpty,
	/// Cancel issued for an emptied session; waiting for the host to render
	/// with the flag cleared.
	Closing,
}

/// Session boundary crossed by a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionTransition {
	Unchanged,
	Entered,
	Exited,
}

/// Which set a toggle flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ToggleScope {
	Pending,
	Session,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
	pending: BTreeSet<ElemId>,
	session: BTreeSet<ElemId>,
	last_in_selection: bool,
	cancel_requested: bool,
	projection: Projection,
}

impl SelectionState {
	pub fn new() -> Self {
		Self::default()
	}

	/// Wraps a fresh state for sharing.
	pub fn shared() -> SharedState {
		Arc::new(Mutex::new(Self::new()))
	}

	/// Identities clicked while no session was active.
	pub fn pending(&self) -> &BTreeSet<ElemId> {
		&self.pending
	}

	/// Identities selected in the current session.
	pub fn session(&self) -> &BTreeSet<ElemId> {
		&self.session
	}

	pub fn last_in_selection(&self) -> bool {
		self.last_in_selection
	}

	/// Whether a cancel was issued for the current, emptied session.
	pub fn cancel_requested(&self) -> bool {
		self.cancel_requested
	}

	pub fn phase(&self) -> SessionPhase {
		match (self.last_in_selection, self.session.is_empty(), self.cancel_requested) {
			(false, _, _) => SessionPhase::Idle,
			(true, false, _) => SessionPhase::Active,
			(true, true, false) => SessionPhase::ActiveEmpty,
			(true, true, true) => SessionPhase::Closing,
		}
	}

	/// Rows of the most recent render.
	pub fn data(&self) -> &[RowEntry] {
		self.projection.rows()
	}

	/// Row position of `elem` in the most recent render.
	pub fn elem_to_row_index(&self, elem: ElemId) -> Option<usize> {
		self.projection.position_of(elem)
	}

	pub fn projection(&self) -> &Projection {
		&self.projection
	}

	/// Replaces the cached rows and index with those of a new render.
	pub fn replace_projection(&mut self, projection: Projection) {
		self.projection = projection;
	}

	pub(crate) fn projection_mut(&mut self) -> &mut Projection {
		&mut self.projection
	}

	/// Records the flag of the current render and reports the edge crossed.
	///
	/// The only writer of `last_in_selection`: the flag follows the host's
	/// renders, never the engine's own backend calls.
	pub(crate) fn observe(&mut self, in_selection: bool) -> SessionTransition {
		let transition = match (self.last_in_selection, in_selection) {
			(false, true) => SessionTransition::Entered,
			(true, false) => SessionTransition::Exited,
			_ => SessionTransition::Unchanged,
		};
		self.last_in_selection = in_selection;
		if transition != SessionTransition::Unchanged {
			self.cancel_requested = false;
		}
		transition
	}

	/// Moves pending intent into the session.
	pub(crate) fn seed_session(&mut self) {
		self.session = std::mem::take(&mut self.pending);
	}

	/// Drops the session set and marks it as cancelled. The phase stays
	/// [`SessionPhase::Closing`] until the host renders with the flag cleared.
	pub(crate) fn close_session(&mut self) {
		self.session.clear();
		self.cancel_requested = true;
	}

	/// Discards the session set without touching the flag.
	pub(crate) fn discard_session(&mut self) {
		self.session.clear();
	}

	/// Flips `elem` in the set `in_selection` designates.
	///
	/// Returns the set flipped and whether `elem` is now a member. Adding an
	/// identity to one set removes it from the other.
	pub(crate) fn flip(&mut self, elem: ElemId, in_selection: bool) -> (ToggleScope, bool) {
		let (scope, target, other) = if in_selection {
			(ToggleScope::Session, &mut self.session, &mut self.pending)
		} else {
			(ToggleScope::Pending, &mut self.pending, &mut self.session)
		};

		if target.remove(&elem) {
			(scope, false)
		} else {
			target.insert(elem);
			other.remove(&elem);
			if in_selection {
				self.cancel_requested = false;
			}
			(scope, true)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fresh_state_is_idle_and_empty() {
		let state = SelectionState::new();
		assert_eq!(state.phase(), SessionPhase::Idle);
		assert!(state.pending().is_empty());
		assert!(state.session().is_empty());
		assert!(state.data().is_empty());
	}

	#[test]
	fn observe_reports_edges_once() {
		let mut state = SelectionState::new();
		assert_eq!(state.observe(false), SessionTransition::Unchanged);
		assert_eq!(state.observe(true), SessionTransition::Entered);
		assert_eq!(state.observe(true), SessionTransition::Unchanged);
		assert_eq!(state.observe(false), SessionTransition::Exited);
	}

	#[test]
	fn flip_twice_restores_membership() {
		let mut state = SelectionState::new();
		assert_eq!(state.flip(4, false), (ToggleScope::Pending, true));
		assert_eq!(state.flip(4, false), (ToggleScope::Pending, false));
		assert!(state.pending().is_empty());
	}

	#[test]
	fn flip_keeps_sets_disjoint() {
		let mut state = SelectionState::new();
		state.flip(4, false);
		state.flip(4, true);
		assert!(state.pending().is_empty());
		assert_eq!(state.session(), &BTreeSet::from([4]));
	}

	#[test]
	fn seed_moves_pending_into_session() {
		let mut state = SelectionState::new();
		state.flip(3, false);
		state.flip(7, false);
		state.seed_session();
		assert_eq!(state.session(), &BTreeSet::from([3, 7]));
		assert!(state.pending().is_empty());
	}

	#[test]
	fn phase_tracks_session_cardinality() {
		let mut state = SelectionState::new();
		state.observe(true);
		assert_eq!(state.phase(), SessionPhase::ActiveEmpty);
		state.flip(5, true);
		assert_eq!(state.phase(), SessionPhase::Active);
		state.close_session();
		assert_eq!(state.phase(), SessionPhase::Closing);
		assert!(state.session().is_empty());
		assert!(state.last_in_selection());
	}

	#[test]
	fn closing_ends_only_on_host_edge() {
		let mut state = SelectionState::new();
		state.observe(true);
		state.flip(5, true);
		state.close_session();

		assert_eq!(state.observe(true), SessionTransition::Unchanged);
		assert_eq!(state.phase(), SessionPhase::Closing);
		assert_eq!(state.observe(false), SessionTransition::Exited);
		assert_eq!(state.phase(), SessionPhase::Idle);
		assert!(!state.cancel_requested());
	}

	#[test]
	fn session_add_after_close_reopens() {
		let mut state = SelectionState::new();
		state.observe(true);
		state.close_session();
		state.flip(7, true);

		assert!(!state.cancel_requested());
		assert_eq!(state.phase(), SessionPhase::Active);
		assert_eq!(state.observe(true), SessionTransition::Unchanged);
		assert_eq!(state.session(), &BTreeSet::from([7]));
	}
}
