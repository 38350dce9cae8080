use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use dimtable::{
	BackendCall, BackendStatus, ElemId, EngineConfig, HostId, ListenerGeneration, RecordingBackend, RenderOutcome,
	SessionPhase, TableVisualization, ToggleOutcome,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::script::{self, Script, Step};

const HOST: HostId = HostId(1);

/// What one script step did.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum StepReport {
	Render { outcome: RenderOutcome },
	Toggle { outcome: ToggleOutcome },
	/// The event produced no activation (stale listener, repeat, bad identity).
	Ignored,
	FailNext,
	Settle { status: Option<BackendStatus> },
}

/// Final state after a replay.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
	pub steps: Vec<StepReport>,
	pub calls: Vec<BackendCall>,
	pub pending: BTreeSet<ElemId>,
	pub session: BTreeSet<ElemId>,
	pub phase: SessionPhase,
	pub html: Option<String>,
}

pub async fn execute(path: &Path, config: EngineConfig, pretty: bool) -> Result<()> {
	let raw = std::fs::read_to_string(path).with_context(|| format!("reading script {}", path.display()))?;
	let script = script::parse(&raw).with_context(|| format!("parsing script {}", path.display()))?;
	info!(target = "dimtable.cli", path = %path.display(), steps = script.steps.len(), "replaying script");

	let report = run_script(script, config).await?;
	let out = if pretty {
		serde_json::to_string_pretty(&report)?
	} else {
		serde_json::to_string(&report)?
	};
	println!("{out}");
	Ok(())
}

/// Runs `script` against a fresh [`RecordingBackend`]. Steps run strictly in
/// order; each toggle's backend calls finish before the next step.
pub async fn run_script(script: Script, config: EngineConfig) -> Result<ReplayReport> {
	let config = script.config.unwrap_or(config);
	config.validate().context("invalid engine configuration")?;

	let backend = RecordingBackend::new();
	let vis = TableVisualization::new(Arc::new(backend.clone()), config);
	let mut generation: Option<ListenerGeneration> = None;
	let mut steps = Vec::with_capacity(script.steps.len());

	for (i, step) in script.steps.into_iter().enumerate() {
		debug!(target = "dimtable.cli", index = i, ?step, "step");
		let report = match step {
			Step::Render(layout) => {
				let outcome = vis.render(HOST, &layout);
				generation = Some(outcome.generation());
				StepReport::Render { outcome }
			}
			Step::FailNext(op) => {
				backend.fail_next(op);
				StepReport::FailNext
			}
			Step::Settle => StepReport::Settle {
				status: vis.settle(HOST).await,
			},
			other => {
				let outcome = match (generation, other.event()) {
					(Some(generation), Some(event)) => vis.handle_event(HOST, generation, event).await,
					_ => None,
				};
				match outcome {
					Some(outcome) => StepReport::Toggle { outcome },
					None => StepReport::Ignored,
				}
			}
		};
		steps.push(report);
	}

	let (pending, session, phase) = match vis.state(HOST) {
		Some(state) => {
			let state = state.lock();
			(state.pending().clone(), state.session().clone(), state.phase())
		}
		None => (BTreeSet::new(), BTreeSet::new(), SessionPhase::Idle),
	};

	Ok(ReplayReport {
		steps,
		calls: backend.calls(),
		pending,
		session,
		phase,
		html: vis.view(HOST).map(|view| view.to_html()),
	})
}
