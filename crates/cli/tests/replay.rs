// Scripted sessions replayed through the CLI harness.

use dimtable::{BackendCall, EngineConfig, SessionPhase};
use dimtable_cli::commands::run_script;
use dimtable_cli::script::{self, Script};
use dimtable_protocol::{Cell, Layout};
use serde_json::{Value, json};

fn layout(in_selection: bool) -> Value {
	let layout = Layout::from_matrix(
		"Letter",
		Some("Count"),
		vec![
			vec![Cell::dimension("A", 1), Cell::measure("10")],
			vec![Cell::dimension("B", 2), Cell::measure("20")],
		],
		in_selection,
	);
	serde_json::to_value(layout).unwrap()
}

fn script(steps: Value) -> Script {
	script::parse(&json!({ "steps": steps }).to_string()).unwrap()
}

fn select(elem: i64, append: bool) -> BackendCall {
	BackendCall::Select {
		path: "/qHyperCubeDef".to_string(),
		column: 0,
		elements: vec![elem],
		append,
	}
}

fn begin() -> BackendCall {
	BackendCall::Begin {
		path: "/qHyperCubeDef".to_string(),
	}
}

#[tokio::test]
async fn full_session_round_trip() {
	let report = run_script(
		script(json!([
			{ "render": layout(false) },
			{ "click": "1" },
			{ "render": layout(true) },
			{ "key": { "target": "2", "key": "Enter" } },
			{ "click": "1" },
			{ "click": "2" },
			{ "render": layout(true) },
			{ "render": layout(false) },
		])),
		EngineConfig::default(),
	)
	.await
	.unwrap();

	assert_eq!(
		report.calls,
		vec![begin(), select(1, false), select(2, true), select(1, true), select(2, true), BackendCall::Cancel]
	);
	assert!(report.session.is_empty());
	assert!(report.pending.is_empty());
	assert_eq!(report.phase, SessionPhase::Idle);
	let refresh = serde_json::to_value(&report.steps[6]).unwrap();
	assert_eq!(refresh["outcome"]["transition"], "unchanged");
	assert_eq!(refresh["outcome"]["phase"], "closing");
}

#[tokio::test]
async fn select_failure_is_reported_but_local_state_stays() {
	let report = run_script(
		script(json!([
			{ "render": layout(false) },
			{ "failNext": "select" },
			{ "click": "2" },
		])),
		EngineConfig::default(),
	)
	.await
	.unwrap();

	let toggle = serde_json::to_value(&report.steps[2]).unwrap();
	assert_eq!(toggle["step"], "toggle");
	assert_eq!(toggle["outcome"]["backend"], json!({ "failed": "select" }));
	assert_eq!(report.pending.iter().copied().collect::<Vec<_>>(), vec![2]);
	assert_eq!(report.calls, vec![begin(), select(2, false)]);
}

#[tokio::test]
async fn events_before_first_render_are_ignored() {
	let report = run_script(script(json!([{ "click": "1" }])), EngineConfig::default())
		.await
		.unwrap();

	assert!(report.calls.is_empty());
	assert!(report.html.is_none());
	let step = serde_json::to_value(&report.steps[0]).unwrap();
	assert_eq!(step["step"], "ignored");
}

#[tokio::test]
async fn settle_closes_session_entered_empty() {
	let report = run_script(
		script(json!([
			{ "render": layout(false) },
			{ "render": layout(true) },
			"settle",
			{ "render": layout(true) },
			"settle",
		])),
		EngineConfig::default(),
	)
	.await
	.unwrap();

	assert_eq!(report.calls, vec![BackendCall::Cancel]);
	assert_eq!(report.phase, SessionPhase::Closing);
	let settle = serde_json::to_value(&report.steps[2]).unwrap();
	assert_eq!(settle["status"], json!("confirmed"));
	let again = serde_json::to_value(&report.steps[4]).unwrap();
	assert_eq!(again["status"], Value::Null);
}

#[tokio::test]
async fn script_config_overrides_selection_path() {
	let script = script::parse(
		&json!({
			"config": { "selectionPath": "/qListObjectDef" },
			"steps": [{ "render": layout(false) }, { "click": "1" }]
		})
		.to_string(),
	)
	.unwrap();

	let report = run_script(script, EngineConfig::default()).await.unwrap();
	assert_eq!(
		report.calls[0],
		BackendCall::Begin {
			path: "/qListObjectDef".to_string()
		}
	);
}

#[tokio::test]
async fn invalid_script_config_is_an_error() {
	let script = script::parse(&json!({ "config": { "selectionPath": "" }, "steps": [] }).to_string()).unwrap();
	assert!(run_script(script, EngineConfig::default()).await.is_err());
}

#[tokio::test]
async fn broken_layout_renders_error_markup() {
	let report = run_script(
		script(json!([{ "render": { "qSelectionInfo": { "qInSelections": false } } }])),
		EngineConfig::default(),
	)
	.await
	.unwrap();

	let html = report.html.unwrap();
	assert!(html.contains("Unable to render the table"));
	let render = serde_json::to_value(&report.steps[0]).unwrap();
	assert_eq!(render["outcome"]["status"], "failed");
}
