//! Replay scripts: a host's side of a session, written down as JSON.
//!
//! ```json
//! {
//!   "config": { "selectionPath": "/qHyperCubeDef" },
//!   "steps": [
//!     { "render": { "qHyperCube": { ... }, "qSelectionInfo": { "qInSelections": false } } },
//!     { "click": "1" },
//!     { "key": { "target": "2", "key": "Enter" } },
//!     { "failNext": "select" },
//!     "settle"
//!   ]
//! }
//! ```

use dimtable::{BackendOp, EngineConfig, UiEvent};
use dimtable_protocol::Layout;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
	/// Overrides the `--config` file when present.
	#[serde(default)]
	pub config: Option<EngineConfig>,
	pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
	/// Host delivers a new layout.
	Render(Box<Layout>),
	/// Pointer click on the dimension cell carrying this identity.
	Click(String),
	/// Key press on the dimension cell carrying `target`.
	Key { target: String, key: String },
	/// Raw event, for synthesized clicks and clicks outside any cell.
	Event(UiEvent),
	/// The next backend call of this kind fails.
	FailNext(BackendOp),
	/// Host asks the visualization to close an emptied session.
	Settle,
}

impl Step {
	pub fn event(&self) -> Option<UiEvent> {
		match self {
			Step::Click(target) => Some(UiEvent::click(target)),
			Step::Key { target, key } => Some(UiEvent::key(target, key)),
			Step::Event(event) => Some(event.clone()),
			_ => None,
		}
	}
}

pub fn parse(json: &str) -> serde_json::Result<Script> {
	serde_json::from_str(json)
}
