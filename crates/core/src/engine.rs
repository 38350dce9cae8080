//! Selection session engine.
//!
//! Owns the enter/toggle/exit state machine and the protocol for talking to
//! the backend. Local state always changes first; backend calls confirm it
//! later and their failures are logged and swallowed without rollback.
//!
//! # Session flow
//!
//! 1. While idle, activations flip identities in the pending set and open a
//!    backend session (`begin` then `select` with `append = false`).
//! 2. The host re-renders with `inSelection = true`; [`SelectionEngine::observe_render`]
//!    sees the edge and seeds the session from the pending set.
//! 3. In the session, activations flip the session set and `select` with
//!    `append = true`.
//! 4. When a toggle empties the session, the engine calls `cancel` once and
//!    the state is closing. It returns to idle when the host renders with
//!    `inSelection = false`; renders that keep the flag set are plain data
//!    refreshes.
//!
//! Overlapping toggles are not queued. Each one awaits its own backend calls
//! and handles its own failures.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::backend::SelectionBackend;
use crate::config::EngineConfig;
use crate::error::BackendOp;
use crate::state::{ElemId, SelectionState, SessionTransition, SharedState, ToggleScope};

/// Result of the synchronous half of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalToggle {
	pub elem: ElemId,
	/// Flag of the render the activation came from.
	pub in_selection: bool,
	pub scope: ToggleScope,
	/// Whether `elem` is in the flipped set afterwards.
	pub member: bool,
	/// Visual state now shown for the row.
	pub selected: bool,
	/// Row that was updated, if one shows `elem`.
	pub row: Option<usize>,
}

/// How the backend answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BackendStatus {
	Confirmed,
	Failed(BackendOp),
}

/// Everything a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleOutcome {
	pub local: LocalToggle,
	pub backend: BackendStatus,
	/// Set when the toggle emptied the session and a cancel was issued.
	pub exit: Option<BackendStatus>,
}

pub struct SelectionEngine {
	backend: Arc<dyn SelectionBackend>,
	config: EngineConfig,
}

impl SelectionEngine {
	pub fn new(backend: Arc<dyn SelectionBackend>, config: EngineConfig) -> Self {
		Self { backend, config }
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	/// Parses a `data-q-elem` attribute value.
	pub fn parse_elem(raw: &str) -> Option<ElemId> {
		raw.trim().parse().ok()
	}

	/// Applies the session boundary crossed by a render, if any.
	///
	/// Must be called once per render with that render's flag. Data refreshes
	/// without a crossing leave both selection sets untouched.
	pub fn observe_render(&self, state: &mut SelectionState, in_selection: bool) -> SessionTransition {
		let transition = state.observe(in_selection);
		match transition {
			SessionTransition::Entered => self.enter_session(state),
			SessionTransition::Exited => {
				debug!(
					target = "dimtable.engine",
					discarded = state.session().len(),
					"session ended by host"
				);
				state.discard_session();
			}
			SessionTransition::Unchanged => {}
		}
		transition
	}

	/// Seeds the session with the pending intent and clears pending.
	pub fn enter_session(&self, state: &mut SelectionState) {
		state.seed_session();
		debug!(target = "dimtable.engine", seeded = state.session().len(), "session entered");
	}

	/// Flips `elem` and updates its row. Never suspends.
	pub fn flip(&self, state: &SharedState, elem: ElemId, in_selection: bool) -> LocalToggle {
		let mut state = state.lock();
		let (scope, member) = state.flip(elem, in_selection);
		// Pending intent is latent: only session members show as selected.
		let selected = in_selection && member;
		let row = state.projection_mut().mark_selected(elem, selected);
		if row.is_none() {
			debug!(target = "dimtable.engine", elem, "no row shows element; skipping visual update");
		}

		LocalToggle {
			elem,
			in_selection,
			scope,
			member,
			selected,
			row,
		}
	}

	/// Pushes a local toggle to the backend and exits an emptied session.
	pub async fn synchronize(&self, state: &SharedState, local: LocalToggle) -> ToggleOutcome {
		let backend = self.push_selection(local.elem, local.in_selection).await;

		let emptied = local.in_selection && {
			let state = state.lock();
			state.session().is_empty() && !state.cancel_requested()
		};
		let exit = if emptied { Some(self.exit_session(state).await) } else { None };

		ToggleOutcome { local, backend, exit }
	}

	/// Handles one user activation of `elem`.
	pub async fn toggle(&self, state: &SharedState, elem: ElemId, in_selection: bool) -> ToggleOutcome {
		let local = self.flip(state, elem, in_selection);
		self.synchronize(state, local).await
	}

	/// Clears the session and cancels it on the backend.
	///
	/// The observed flag is left alone: the state reads as
	/// [`SessionPhase::Closing`](crate::state::SessionPhase::Closing) until the
	/// host renders with `inSelection = false`.
	pub async fn exit_session(&self, state: &SharedState) -> BackendStatus {
		state.lock().close_session();

		match self.backend.cancel().await {
			Ok(()) => {
				info!(target = "dimtable.engine", "selection session cancelled");
				BackendStatus::Confirmed
			}
			Err(err) => {
				warn!(target = "dimtable.backend", error = %err, "cancel failed; session already cleared locally");
				BackendStatus::Failed(BackendOp::Cancel)
			}
		}
	}

	async fn push_selection(&self, elem: ElemId, in_selection: bool) -> BackendStatus {
		let path = self.config.selection_path.as_str();

		if !in_selection {
			if let Err(err) = self.backend.begin(path).await {
				warn!(target = "dimtable.backend", elem, error = %err, "begin failed; keeping local state");
				return BackendStatus::Failed(BackendOp::Begin);
			}
		}

		let elements = [elem];
		match self
			.backend
			.select(path, self.config.dimension_column, &elements, in_selection)
			.await
		{
			Ok(()) => BackendStatus::Confirmed,
			Err(err) => {
				warn!(target = "dimtable.backend", elem, error = %err, "select failed; keeping local state");
				BackendStatus::Failed(BackendOp::Select)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_elem_accepts_integers_only() {
		assert_eq!(SelectionEngine::parse_elem("12"), Some(12));
		assert_eq!(SelectionEngine::parse_elem(" 7 "), Some(7));
		assert_eq!(SelectionEngine::parse_elem("-2"), Some(-2));
		assert_eq!(SelectionEngine::parse_elem(""), None);
		assert_eq!(SelectionEngine::parse_elem("abc"), None);
		assert_eq!(SelectionEngine::parse_elem("1.5"), None);
	}
}
