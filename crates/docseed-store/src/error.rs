//! Error types for document store operations.

use thiserror::Error;

/// Errors raised by a [`DocumentStore`](crate::DocumentStore).
#[derive(Debug, Error)]
pub enum StoreError {
	/// No document matched the lookup.
	#[error("{doctype} not found: {lookup}")]
	NotFound {
		/// Document type that was searched.
		doctype: String,
		/// Human-readable description of the lookup.
		lookup: String,
	},

	/// A document with the same name already exists.
	#[error("Duplicate entry: {doctype} {name}")]
	Duplicate {
		/// Document type of the conflicting document.
		doctype: String,
		/// Name that is already taken.
		name: String,
	},

	/// Document failed validation.
	#[error("Validation error: {0}")]
	Validation(String),

	/// A mandatory field is missing or empty.
	#[error("Mandatory field missing: {doctype}.{field}")]
	MandatoryMissing {
		/// Document type being written.
		doctype: String,
		/// Field that has no value.
		field: String,
	},

	/// A link field points at a document that does not exist.
	#[error("Could not find {target} {value} linked from {doctype}.{field}")]
	LinkMissing {
		/// Document type being written.
		doctype: String,
		/// Link field name.
		field: String,
		/// Target document type of the link.
		target: String,
		/// Linked document name.
		value: String,
	},

	/// The document type does not accept writes.
	#[error("Permission denied: {0} is read-only")]
	PermissionDenied(String),

	/// A filter expression could not be interpreted.
	#[error("Invalid filter: {0}")]
	InvalidFilter(String),

	/// Backend database failure.
	#[error("Database error: {0}")]
	Database(String),

	/// Document (de)serialization failure.
	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_duplicate_message() {
		let error = StoreError::Duplicate {
			doctype: "Note".to_string(),
			name: "welcome".to_string(),
		};
		assert_eq!(error.to_string(), "Duplicate entry: Note welcome");
	}

	#[rstest]
	fn test_link_missing_message() {
		let error = StoreError::LinkMissing {
			doctype: "Custom Script".to_string(),
			field: "dt".to_string(),
			target: "DocType".to_string(),
			value: "Sales Order".to_string(),
		};
		assert_eq!(
			error.to_string(),
			"Could not find DocType Sales Order linked from Custom Script.dt"
		);
	}

	#[rstest]
	fn test_json_error_from() {
		let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
		let error: StoreError = json_error.into();
		assert!(matches!(error, StoreError::Serialization(_)));
	}
}
