mod render;
mod replay;

use std::path::Path;

use anyhow::{Context, Result};
use dimtable::EngineConfig;
use serde::de::DeserializeOwned;

use crate::cli::Commands;

pub use replay::{ReplayReport, StepReport, run_script};

pub async fn dispatch(command: Commands, config: Option<&Path>) -> Result<()> {
	let config = load_config(config)?;
	match command {
		Commands::Render { layout } => render::execute(&layout, config),
		Commands::Replay { script, pretty } => replay::execute(&script, config, pretty).await,
	}
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
	let Some(path) = path else {
		return Ok(EngineConfig::default());
	};
	let raw = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
	EngineConfig::from_json_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
	let raw = std::fs::read_to_string(path).with_context(|| format!("reading {what} {}", path.display()))?;
	serde_json::from_str(&raw).with_context(|| format!("parsing {what} {}", path.display()))
}
