//! Error types for fixture operations.

use std::path::PathBuf;

use docseed_apps::AppError;
use docseed_store::StoreError;
use thiserror::Error;

/// Errors that can occur while importing, exporting or syncing fixtures.
#[derive(Debug, Error)]
pub enum FixtureError {
	/// Document store operation failed.
	#[error(transparent)]
	Store(#[from] StoreError),

	/// Application registry lookup failed.
	#[error(transparent)]
	App(#[from] AppError),

	/// Filesystem operation failed.
	#[error("Failed to {action} {path}: {source}")]
	Io {
		/// What was being done, e.g. `"read"`.
		action: &'static str,
		/// Path involved.
		path: PathBuf,
		/// Underlying error.
		#[source]
		source: std::io::Error,
	},

	/// Fixture file content could not be parsed.
	#[error("Parse error in {path}: {message}")]
	Parse {
		/// File being parsed.
		path: String,
		/// Parser message.
		message: String,
	},

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// CSV parsing error.
	#[error("CSV error: {0}")]
	Csv(#[from] csv::Error),

	/// A record is not a valid document.
	#[error("Invalid record: {0}")]
	InvalidRecord(String),

	/// Unsupported file extension.
	#[error("Unsupported file extension: {0}")]
	UnsupportedExtension(String),

	/// Fixture file not found.
	#[error("Fixture file not found: {0}")]
	FileNotFound(String),

	/// An error raised while performing a named step of a sync or export.
	#[error("{operation}: {source}")]
	Operation {
		/// The step that failed, e.g. `"import frappe/fixtures/note.json"`.
		operation: String,
		/// The error it failed with.
		#[source]
		source: Box<FixtureError>,
	},
}

impl FixtureError {
	pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io {
			action,
			path: path.into(),
			source,
		}
	}

	/// Returns the innermost error, looking through [`FixtureError::Operation`].
	pub fn root(&self) -> &FixtureError {
		match self {
			Self::Operation { source, .. } => source.root(),
			other => other,
		}
	}
}

/// Result type alias for fixture operations.
pub type FixtureResult<T> = Result<T, FixtureError>;

/// Attaches the failing step to an error.
pub(crate) trait OperationContext<T> {
	fn operation(self, describe: impl FnOnce() -> String) -> FixtureResult<T>;
}

impl<T, E: Into<FixtureError>> OperationContext<T> for Result<T, E> {
	fn operation(self, describe: impl FnOnce() -> String) -> FixtureResult<T> {
		self.map_err(|e| FixtureError::Operation {
			operation: describe(),
			source: Box::new(e.into()),
		})
	}
}
