pub mod logger;

use thiserror::Error;

// Re-export logger initialization for convenience
pub use logger::init;
pub use logger::reload_log_level;

/// Errors raised while setting up or changing logging.
#[derive(Error, Debug)]
pub enum TelemetryError {
	#[error("Invalid log level '{0}', expected one of: trace, debug, info, warn, error")]
	InvalidLogLevel(String),

	#[error("Logger is not initialized")]
	NotInitialized,

	#[error("Logger is already initialized: {0}")]
	AlreadyInitialized(String),

	#[error("Failed to reload log level: {0}")]
	ReloadFailed(String),

	#[error("Failed to open log file: {0}")]
	LogFile(String),
}
