use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, bail};
use dimtable::{EngineConfig, HostId, RecordingBackend, RenderOutcome, TableVisualization};
use dimtable_protocol::Layout;
use tracing::info;

use super::read_json;

const HOST: HostId = HostId(1);

pub fn execute(layout_path: &Path, config: EngineConfig) -> Result<()> {
	let layout: Layout = read_json(layout_path, "layout")?;
	info!(target = "dimtable.cli", path = %layout_path.display(), "rendering layout");

	let vis = TableVisualization::new(Arc::new(RecordingBackend::new()), config);
	let outcome = vis.render(HOST, &layout);
	let Some(view) = vis.view(HOST) else {
		bail!("render produced no view");
	};

	println!("{}", view.to_html());
	if let RenderOutcome::Failed { reason, .. } = outcome {
		bail!("layout could not be rendered: {reason}");
	}
	Ok(())
}
