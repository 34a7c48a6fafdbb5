//! Error types for the application registry.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when working with the application registry
#[derive(Debug, Error)]
pub enum AppError {
	/// No installed application has this name.
	#[error("Application not found: {0}")]
	NotFound(String),

	/// Two applications were registered under the same name.
	#[error("Duplicate application name: {0}")]
	DuplicateName(String),

	/// The application name is empty or contains disallowed characters.
	#[error("Invalid application name: {0}")]
	InvalidName(String),

	/// A fixture hook entry names no document type.
	#[error("Invalid fixture hook in app {app}: {reason}")]
	InvalidHook {
		/// Application declaring the hook.
		app: String,
		/// What is wrong with the entry.
		reason: String,
	},

	/// Settings could not be interpreted.
	#[error("Configuration error: {0}")]
	Config(String),

	/// Settings file parse failure.
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Settings file could not be read.
	#[error("Failed to read {path}: {source}")]
	Io {
		/// File being read.
		path: PathBuf,
		/// Underlying error.
		#[source]
		source: std::io::Error,
	},
}

/// Result type for application registry operations.
pub type AppResult<T> = Result<T, AppError>;
