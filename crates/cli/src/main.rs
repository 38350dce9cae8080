use clap::Parser;
use dimtable_cli::{cli::Cli, commands, logging};
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	if let Err(err) = commands::dispatch(cli.command, cli.config.as_deref()).await {
		error!(target = "dimtable.cli", error = %format!("{err:#}"), "command failed");
		std::process::exit(1);
	}
}
