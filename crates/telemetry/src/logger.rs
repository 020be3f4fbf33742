use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::NonBlocking;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::reload;
use tracing_subscriber::util::SubscriberInitExt;

use crate::TelemetryError;

/// Custom time formatter that displays time as "YYYY-MM-DD HH:MM:SS.micros"
struct CustomTimeFormat;

impl FormatTime for CustomTimeFormat {
	fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
		let now = std::time::SystemTime::now();
		let datetime: chrono::DateTime<chrono::Local> = now.into();
		write!(w, "{}", datetime.format("[%Y-%m-%d %H:%M:%S%.6f]"))
	}
}

type ReloadHandle = reload::Handle<EnvFilter, Registry>;

static RELOAD_HANDLE: OnceLock<ReloadHandle> = OnceLock::new();

const VALID_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Initialize the logger with the provided log level
///
/// This sets up a console logger with:
/// - The log level from the `level` parameter
/// - Structured output with timestamps in format: YYYY-MM-DD HH:MM:SS.micros
/// - Thread ids
///
/// When `log_file` is given, every event is also appended to that file
/// without ANSI colours. The returned guard flushes the file writer on drop
/// and must be held for as long as logging is needed.
///
/// # Example
///
/// ```no_run
/// let _guard = telemetry::init("info", None)?;
/// tracing::info!("Server starting");
/// # Ok::<(), telemetry::TelemetryError>(())
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - The log level is invalid
/// - The log file cannot be created
/// - A global subscriber is already installed
pub fn init(level: &str, log_file: Option<&Path>) -> Result<Option<WorkerGuard>, TelemetryError> {
	let env_filter = filter_for(level)?;

	let (file_sink, guard) = match log_file {
		Some(path) => {
			let (writer, guard) = file_writer(path)?;
			(Some(writer), Some(guard))
		}
		None => (None, None),
	};

	let (filter_layer, reload_handle) = reload::Layer::new(env_filter);

	tracing_subscriber::registry()
		.with(filter_layer)
		.with(
			fmt::layer()
				.with_timer(CustomTimeFormat)
				.with_target(false)
				.with_thread_ids(true)
				.with_line_number(false)
				.with_file(false),
		)
		.with(file_sink.map(|writer| {
			fmt::layer()
				.with_writer(writer)
				.with_ansi(false)
				.with_timer(CustomTimeFormat)
				.with_target(true)
				.with_thread_ids(true)
		}))
		.try_init()
		.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;

	let _ = RELOAD_HANDLE.set(reload_handle);
	Ok(guard)
}

/// Reload the log level dynamically
///
/// # Arguments
///
/// * `level` - The new log level to set. Valid values: trace, debug, info,
///   warn, error
///
/// # Example
///
/// ```no_run
/// # use telemetry::logger::reload_log_level;
/// reload_log_level("debug")?;
/// # Ok::<(), telemetry::TelemetryError>(())
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - The logger has not been initialized
/// - The provided log level is invalid
/// - The reload operation fails
pub fn reload_log_level(level: &str) -> Result<(), TelemetryError> {
	let new_filter = filter_for(level)?;

	let handle = RELOAD_HANDLE.get().ok_or(TelemetryError::NotInitialized)?;

	handle
		.reload(new_filter)
		.map_err(|e| TelemetryError::ReloadFailed(e.to_string()))?;

	tracing::info!("Log level changed to {}", level);
	Ok(())
}

fn filter_for(level: &str) -> Result<EnvFilter, TelemetryError> {
	let level_lower = level.to_lowercase();
	if !VALID_LEVELS.contains(&level_lower.as_str()) {
		return Err(TelemetryError::InvalidLogLevel(level.to_string()));
	}
	Ok(EnvFilter::new(&level_lower))
}

fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard), TelemetryError> {
	let file_name = path
		.file_name()
		.and_then(|name| name.to_str())
		.ok_or_else(|| TelemetryError::LogFile(format!("no file name in {}", path.display())))?;
	let dir = path
		.parent()
		.filter(|p| !p.as_os_str().is_empty())
		.unwrap_or_else(|| Path::new("."));

	let appender = RollingFileAppender::builder()
		.rotation(Rotation::NEVER)
		.filename_prefix(file_name)
		.build(dir)
		.map_err(|e| TelemetryError::LogFile(e.to_string()))?;

	Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	/// Test that valid log levels pass validation but return NotInitialized
	/// error
	///
	/// Note: We cannot test actual reload in unit tests since init() can only
	/// be called once. These tests validate the level validation logic.
	#[rstest]
	#[case("trace")]
	#[case("debug")]
	#[case("info")]
	#[case("warn")]
	#[case("error")]
	#[case("TRACE")] // Test case insensitivity
	#[case("DeBuG")] // Mixed case
	fn test_valid_log_levels(#[case] level: &str) {
		let result = reload_log_level(level);
		assert!(
			matches!(result, Err(TelemetryError::NotInitialized)),
			"Expected NotInitialized for valid level: {}",
			level
		);
	}

	/// Test that invalid log levels are rejected
	#[rstest]
	#[case("invalid")]
	#[case("warning")] // Common mistake (should be "warn")
	#[case("critical")] // Not a Rust log level
	#[case("")]
	fn test_invalid_log_levels(#[case] level: &str) {
		let result = reload_log_level(level);
		assert!(
			matches!(result, Err(TelemetryError::InvalidLogLevel(_))),
			"Expected InvalidLogLevel for: {}",
			level
		);
	}

	#[test]
	fn test_init_rejects_invalid_level() {
		let result = init("loud", None);
		assert!(matches!(result, Err(TelemetryError::InvalidLogLevel(_))));
	}

	#[test]
	fn test_file_writer_creates_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("server.log");

		let (_writer, _guard) = file_writer(&path).unwrap();
		assert!(path.exists());
	}

	#[test]
	fn test_file_writer_requires_file_name() {
		let result = file_writer(Path::new("/"));
		assert!(matches!(result, Err(TelemetryError::LogFile(_))));
	}
}
