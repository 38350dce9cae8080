//! The visualization facade hosts talk to.
//!
//! [`TableVisualization`] ties the registry, engine and reconciler together for
//! any number of host elements. The render path and the synchronous half of an
//! activation never suspend; only [`TableVisualization::synchronize`] and
//! [`TableVisualization::settle`] await the backend.

use std::sync::Arc;

use dimtable_protocol::Layout;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::backend::SelectionBackend;
use crate::config::EngineConfig;
use crate::dom::Node;
use crate::dom::table::{Headers, error_view, table_view};
use crate::engine::{BackendStatus, LocalToggle, SelectionEngine, ToggleOutcome};
use crate::error::Result;
use crate::input::UiEvent;
use crate::projector::project;
use crate::reconciler::{ContainerReconciler, ListenerGeneration};
use crate::registry::{HostId, StateRegistry};
use crate::snapshot::DataSnapshot;
use crate::state::{SessionPhase, SessionTransition, SharedState};

/// What a render did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RenderOutcome {
	#[serde(rename_all = "camelCase")]
	Table {
		generation: ListenerGeneration,
		transition: SessionTransition,
		phase: SessionPhase,
		rows: usize,
	},
	#[serde(rename_all = "camelCase")]
	Failed {
		generation: ListenerGeneration,
		reason: String,
	},
}

impl RenderOutcome {
	/// Generation of the container mounted by this render.
	pub fn generation(&self) -> ListenerGeneration {
		match self {
			RenderOutcome::Table { generation, .. } | RenderOutcome::Failed { generation, .. } => *generation,
		}
	}

	/// Whether the host should call [`TableVisualization::settle`].
	pub fn needs_settle(&self) -> bool {
		matches!(
			self,
			RenderOutcome::Table {
				phase: SessionPhase::ActiveEmpty,
				..
			}
		)
	}
}

/// A locally applied activation waiting for its backend round trip.
#[derive(Debug)]
pub struct PendingSync {
	host: HostId,
	state: SharedState,
	local: LocalToggle,
	prevents_default: bool,
}

impl PendingSync {
	pub fn host(&self) -> HostId {
		self.host
	}

	pub fn local(&self) -> &LocalToggle {
		&self.local
	}

	/// Whether the host must cancel the platform default for the event.
	pub fn prevents_default(&self) -> bool {
		self.prevents_default
	}
}

pub struct TableVisualization {
	engine: SelectionEngine,
	registry: Mutex<StateRegistry>,
	reconciler: Mutex<ContainerReconciler>,
}

impl TableVisualization {
	pub fn new(backend: Arc<dyn SelectionBackend>, config: EngineConfig) -> Self {
		Self {
			engine: SelectionEngine::new(backend, config),
			registry: Mutex::new(StateRegistry::new()),
			reconciler: Mutex::new(ContainerReconciler::new()),
		}
	}

	pub fn engine(&self) -> &SelectionEngine {
		&self.engine
	}

	/// Renders `layout` into the container of `host`.
	///
	/// Failures replace the container with an error view and leave the host's
	/// selection state as it was.
	pub fn render(&self, host: HostId, layout: &Layout) -> RenderOutcome {
		let state = self.registry.lock().get_or_create(host);

		match self.render_table(host, &state, layout) {
			Ok(outcome) => outcome,
			Err(err) => {
				warn!(target = "dimtable.render", %host, error = %err, "render failed; showing error view");
				let view = error_view(&self.engine.config().error_message);
				let generation = self.reconciler.lock().fail(host, view);
				RenderOutcome::Failed {
					generation,
					reason: err.to_string(),
				}
			}
		}
	}

	fn render_table(&self, host: HostId, state: &SharedState, layout: &Layout) -> Result<RenderOutcome> {
		let snapshot = DataSnapshot::read(layout)?;
		let config = self.engine.config();

		let (view, transition, phase, rows) = {
			let mut state = state.lock();
			let transition = self.engine.observe_render(&mut state, snapshot.in_selection);
			let projection = project(
				snapshot.matrix,
				state.session(),
				snapshot.in_selection,
				&config.measure_placeholder,
			);
			let view = table_view(
				Headers {
					dimension: snapshot.dim_header,
					measure: snapshot.meas_header,
				},
				projection.rows(),
				snapshot.in_selection,
			);
			let rows = projection.len();
			state.replace_projection(projection);
			(view, transition, state.phase(), rows)
		};

		let generation = self.reconciler.lock().rebuild(host, view, snapshot.in_selection);
		debug!(
			target = "dimtable.render",
			%host,
			%generation,
			rows,
			in_selection = snapshot.in_selection,
			?phase,
			"table rendered"
		);

		Ok(RenderOutcome::Table {
			generation,
			transition,
			phase,
			rows,
		})
	}

	/// Applies an event locally: filtering, parsing, flip and view patch.
	///
	/// Returns `None` when the event is not an activation, comes from a
	/// retired listener or names an unparsable identity.
	pub fn activate(&self, host: HostId, generation: ListenerGeneration, event: UiEvent) -> Option<PendingSync> {
		let dispatch = self.reconciler.lock().dispatch(host, generation, event)?;
		let Some(elem) = SelectionEngine::parse_elem(&dispatch.activation.target) else {
			debug!(target = "dimtable.engine", %host, raw = %dispatch.activation.target, "unparsable element identity ignored");
			return None;
		};
		let state = self.registry.lock().get(host)?;

		let local = self.engine.flip(&state, elem, dispatch.in_selection);
		self.reconciler.lock().set_selected(host, elem, local.selected);

		Some(PendingSync {
			host,
			state,
			local,
			prevents_default: dispatch.activation.prevents_default(),
		})
	}

	/// Completes an activation against the backend.
	pub async fn synchronize(&self, pending: PendingSync) -> ToggleOutcome {
		self.engine.synchronize(&pending.state, pending.local).await
	}

	/// [`Self::activate`] followed by [`Self::synchronize`].
	pub async fn handle_event(&self, host: HostId, generation: ListenerGeneration, event: UiEvent) -> Option<ToggleOutcome> {
		let pending = self.activate(host, generation, event)?;
		Some(self.synchronize(pending).await)
	}

	/// Cancels an empty session left behind by a render. A session already
	/// cancelled by a toggle is not cancelled again.
	pub async fn settle(&self, host: HostId) -> Option<BackendStatus> {
		let state = self.registry.lock().get(host)?;
		let phase = state.lock().phase();
		match phase {
			SessionPhase::ActiveEmpty => Some(self.engine.exit_session(&state).await),
			SessionPhase::Idle | SessionPhase::Active | SessionPhase::Closing => None,
		}
	}

	/// Host disposal: drops the state and the container of `host`.
	pub fn dispose(&self, host: HostId) {
		let had_state = self.registry.lock().dispose(host);
		let had_mount = self.reconciler.lock().detach(host);
		debug!(target = "dimtable.render", %host, had_state, had_mount, "host disposed");
	}

	pub fn state(&self, host: HostId) -> Option<SharedState> {
		self.registry.lock().get(host)
	}

	/// Copy of the live view of `host`.
	pub fn view(&self, host: HostId) -> Option<Node> {
		self.reconciler.lock().view(host).cloned()
	}

	pub fn listener_count(&self, host: HostId) -> usize {
		self.reconciler.lock().listener_count(host)
	}
}
