use std::path::Path;

use resp_server::Server;
use resp_server::ServerResult;
use resp_server::config;
use resp_server::config::Cli;
use resp_server::config::Parser;
use resp_server::config::setup;
use tracing::info;
use tracing::warn;

#[tokio::main]
async fn main() -> ServerResult<()> {
	let args = Cli::parse();
	let config_path = args.config.clone();
	let config = setup(args)?;

	let _guard = telemetry::init(&config.log_level, config.log_file.as_deref().map(Path::new))?;
	info!("Initializing server at {}", config.addr());

	#[cfg(unix)]
	reload_on_hangup(config_path)?;
	#[cfg(not(unix))]
	let _ = config_path;

	let server = Server::bind(&config).await?;
	server.run().await
}

/// Re-read the configuration file on SIGHUP and apply its log level.
#[cfg(unix)]
fn reload_on_hangup(config_path: Option<String>) -> std::io::Result<()> {
	use tokio::signal::unix::SignalKind;
	use tokio::signal::unix::signal;

	let mut hangup = signal(SignalKind::hangup())?;
	tokio::spawn(async move {
		while hangup.recv().await.is_some() {
			match config::reload(config_path.as_deref()) {
				Ok(reloaded) => info!("Configuration reloaded, log level {}", reloaded.log_level),
				Err(e) => warn!("Failed to reload configuration: {}", e),
			}
		}
	});
	Ok(())
}
