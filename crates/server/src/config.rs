//! Configuration for the RESP server
//!
//! Settings come from three places, later ones winning: built-in defaults,
//! a configuration file (TOML, JSON or YAML), and command-line flags.
//!
//! # Example
//!
//! ```no_run
//! use resp_server::config::Cli;
//! use resp_server::config::Parser;
//! use resp_server::config::setup;
//!
//! let args = Cli::parse();
//! let config = setup(args)?;
//! println!("Server address: {}", config.addr());
//! # Ok::<(), resp_server::config::ConfigError>(())
//! ```

use std::path::Path;

pub use clap::Parser;
use resp::DEFAULT_MAX_BULK_LEN;
use resp::DEFAULT_MAX_DEPTH;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "conf/config.toml";

/// Largest accepted `max_depth`. Array decoding recurses once per level on
/// a tokio worker stack (2 MiB).
pub const MAX_DEPTH_LIMIT: usize = 1024;

/// Default cap on the bytes buffered for one request (1 GiB).
pub const DEFAULT_MAX_FRAME_LEN: usize = 1024 * 1024 * 1024;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("Failed to read configuration file '{path}': {source}")]
	Io {
		source: std::io::Error,
		path: String,
	},

	#[error("Failed to parse TOML configuration: {0}")]
	TomlParse(#[from] toml::de::Error),

	#[error("Failed to parse JSON configuration: {0}")]
	JsonParse(#[from] serde_json::Error),

	#[error("Failed to parse YAML configuration: {0}")]
	YamlParse(#[from] serde_yaml::Error),

	#[error("Unsupported configuration format: {0}")]
	UnsupportedFormat(String),

	#[error("Configuration file has no extension")]
	NoExtension,

	#[error("Invalid value {value} for '{field}': {reason}")]
	InvalidValue {
		field: &'static str,
		value: usize,
		reason: &'static str,
	},

	#[error("Failed to apply log level: {0}")]
	Telemetry(#[from] telemetry::TelemetryError),
}

/// Command-line arguments for the server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
	/// Configuration file path (TOML, JSON, or YAML).
	/// Defaults to conf/config.toml if it exists.
	#[arg(short, long)]
	pub config: Option<String>,

	/// Host to bind to
	#[arg(short = 'H', long)]
	pub host: Option<String>,

	/// Port to listen on
	#[arg(short, long)]
	pub port: Option<u16>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long)]
	pub log_level: Option<String>,

	/// Also write logs to this file
	#[arg(long)]
	pub log_file: Option<String>,

	/// Maximum array nesting accepted from clients (1 to 1024)
	#[arg(long)]
	pub max_depth: Option<usize>,

	/// Maximum bulk string length accepted from clients, in bytes
	#[arg(long)]
	pub max_bulk_len: Option<usize>,

	/// Maximum size of one buffered request, in bytes
	#[arg(long)]
	pub max_frame_len: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
	pub host: String,
	pub port: u16,
	pub log_level: String,
	pub log_file: Option<String>,
	pub max_depth: usize,
	pub max_bulk_len: usize,
	pub max_frame_len: usize,
}

impl ServerConfig {
	/// Address in `host:port` form, ready for `TcpListener::bind`.
	pub fn addr(&self) -> String {
		format!("{}:{}", self.host, self.port)
	}

	/// Reject limits the server cannot honour.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.max_depth == 0 || self.max_depth > MAX_DEPTH_LIMIT {
			return Err(ConfigError::InvalidValue {
				field: "max_depth",
				value: self.max_depth,
				reason: "must be between 1 and 1024",
			});
		}
		if self.max_frame_len == 0 {
			return Err(ConfigError::InvalidValue {
				field: "max_frame_len",
				value: self.max_frame_len,
				reason: "must be greater than 0",
			});
		}
		Ok(())
	}

	fn on_log_level_change(&self) -> Result<(), ConfigError> {
		telemetry::reload_log_level(&self.log_level)?;
		Ok(())
	}
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			host: "127.0.0.1".into(),
			port: 65432,
			log_level: "info".into(),
			log_file: None,
			max_depth: DEFAULT_MAX_DEPTH,
			max_bulk_len: DEFAULT_MAX_BULK_LEN,
			max_frame_len: DEFAULT_MAX_FRAME_LEN,
		}
	}
}

pub fn setup(args: Cli) -> Result<ServerConfig, ConfigError> {
	let mut config = load(args.config.as_deref())?;

	// Override with CLI arguments if explicitly provided
	if let Some(host) = args.host {
		config.host = host;
	}
	if let Some(port) = args.port {
		config.port = port;
	}
	if let Some(log_level) = args.log_level {
		config.log_level = log_level;
	}
	if let Some(log_file) = args.log_file {
		config.log_file = Some(log_file);
	}
	if let Some(depth) = args.max_depth {
		config.max_depth = depth;
	}
	if let Some(len) = args.max_bulk_len {
		config.max_bulk_len = len;
	}
	if let Some(len) = args.max_frame_len {
		config.max_frame_len = len;
	}

	config.validate()?;
	Ok(config)
}

/// Re-read the configuration file and apply its log level to the running
/// logger. Other settings only take effect on restart.
pub fn reload(path: Option<&str>) -> Result<ServerConfig, ConfigError> {
	let config = load(path)?;
	config.validate()?;
	config.on_log_level_change()?;
	Ok(config)
}

fn load(path: Option<&str>) -> Result<ServerConfig, ConfigError> {
	match path {
		Some(p) => load_from_file(p),
		None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from_file(DEFAULT_CONFIG_PATH),
		None => Ok(ServerConfig::default()),
	}
}

pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<ServerConfig, ConfigError> {
	let path_ref = path.as_ref();
	let content = std::fs::read_to_string(path_ref).map_err(|source| ConfigError::Io {
		path: path_ref.display().to_string(),
		source,
	})?;

	let extension = path_ref
		.extension()
		.and_then(|ext| ext.to_str())
		.ok_or(ConfigError::NoExtension)?;

	match extension.to_lowercase().as_str() {
		"toml" => Ok(toml::from_str(&content)?),
		"json" => Ok(serde_json::from_str(&content)?),
		"yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
		_ => Err(ConfigError::UnsupportedFormat(extension.to_string())),
	}
}
