use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "dimtable")]
#[command(about = "dimtable - render layouts and replay selection sessions offline")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug, -vvv trace)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Engine configuration JSON (selectionPath, dimensionColumn, ...)
	#[arg(short, long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Render a layout JSON file and print the table HTML
	Render {
		/// Layout object as delivered by the host
		layout: PathBuf,
	},

	/// Replay a scripted session against a recording backend and print a JSON report
	Replay {
		/// Script file with `steps` (render, click, key, failNext, settle)
		script: PathBuf,
		/// Pretty-print the report
		#[arg(long)]
		pretty: bool,
	},
}
