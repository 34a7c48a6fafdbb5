//! Fixture format definitions.
//!
//! A fixture record is a flat JSON object: the document's fields plus its
//! `doctype` and, optionally, `name`.

use std::path::Path;

use docseed_store::Document;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{FixtureError, FixtureResult};

/// A single fixture record.
///
/// # Example
///
/// ```json
/// {
///   "doctype": "Custom Field",
///   "dt": "Sales Invoice",
///   "fieldname": "region",
///   "label": "Region"
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct FixtureRecord {
	fields: Map<String, Value>,
}

impl FixtureRecord {
	/// Creates an empty record.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a record from a JSON object.
	pub fn from_map(fields: Map<String, Value>) -> Self {
		Self { fields }
	}

	/// Creates a record from a JSON value, which must be an object.
	pub fn from_value(value: Value) -> FixtureResult<Self> {
		match value {
			Value::Object(fields) => Ok(Self { fields }),
			other => Err(FixtureError::InvalidRecord(format!(
				"expected an object, got {}",
				other
			))),
		}
	}

	/// Creates a record from a document.
	pub fn from_document(doc: &Document) -> FixtureResult<Self> {
		Self::from_value(doc.to_value()?)
	}

	/// Sets a field, builder style.
	pub fn with_field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
		self.fields.insert(field.into(), value.into());
		self
	}

	/// Returns the `doctype` field, if it is a string.
	///
	/// # Example
	///
	/// ```
	/// # use docseed_fixtures::fixtures::FixtureRecord;
	/// let record = FixtureRecord::new().with_field("doctype", "Custom Field");
	/// assert_eq!(record.doctype(), Some("Custom Field"));
	/// ```
	pub fn doctype(&self) -> Option<&str> {
		self.get_str("doctype")
	}

	/// Returns the `name` field, if it is a string.
	pub fn name(&self) -> Option<&str> {
		self.get_str("name")
	}

	/// Returns a field value.
	pub fn get(&self, field: &str) -> Option<&Value> {
		self.fields.get(field)
	}

	/// Returns a field value when it is a string.
	pub fn get_str(&self, field: &str) -> Option<&str> {
		self.get(field).and_then(Value::as_str)
	}

	/// Returns a field value, reading a missing field as `null`.
	pub fn value(&self, field: &str) -> Value {
		self.get(field).cloned().unwrap_or(Value::Null)
	}

	/// Returns all fields.
	pub fn fields(&self) -> &Map<String, Value> {
		&self.fields
	}

	/// Converts the record into a document.
	///
	/// The record must carry a non-empty string `doctype`.
	pub fn into_document(self) -> FixtureResult<Document> {
		match self.doctype() {
			Some(doctype) if !doctype.trim().is_empty() => {}
			_ => {
				return Err(FixtureError::InvalidRecord(
					"record has no doctype".to_string(),
				));
			}
		}
		Ok(Document::from_value(Value::Object(self.fields))?)
	}
}

/// Supported fixture file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum FixtureFormat {
	/// JSON array of records, or a single record (default).
	#[default]
	Json,

	/// CSV with a header row of field names.
	Csv,
}

impl FixtureFormat {
	/// Determines the fixture format from a file extension.
	///
	/// Extensions are matched exactly, so `"JSON"` is not recognized.
	///
	/// # Example
	///
	/// ```
	/// # use docseed_fixtures::fixtures::FixtureFormat;
	/// assert_eq!(FixtureFormat::from_extension("json"), Some(FixtureFormat::Json));
	/// assert_eq!(FixtureFormat::from_extension("csv"), Some(FixtureFormat::Csv));
	/// assert_eq!(FixtureFormat::from_extension("js"), None);
	/// ```
	pub fn from_extension(ext: &str) -> Option<Self> {
		match ext {
			"json" => Some(Self::Json),
			"csv" => Some(Self::Csv),
			_ => None,
		}
	}

	/// Determines the fixture format from a file path.
	pub fn from_path(path: &Path) -> Option<Self> {
		path.extension()
			.and_then(|ext| ext.to_str())
			.and_then(Self::from_extension)
	}

	/// Returns the file extension for this format.
	pub fn extension(&self) -> &'static str {
		match self {
			Self::Json => "json",
			Self::Csv => "csv",
		}
	}
}

impl std::fmt::Display for FixtureFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Json => write!(f, "JSON"),
			Self::Csv => write!(f, "CSV"),
		}
	}
}

/// Parsed fixture data containing multiple records.
#[derive(Debug, Clone)]
pub struct FixtureData {
	/// Collection of fixture records.
	pub records: Vec<FixtureRecord>,

	/// Format the data was parsed from.
	pub format: FixtureFormat,

	/// Optional source file path.
	pub source: Option<String>,
}

impl FixtureData {
	/// Creates fixture data from a vector of records.
	pub fn from_records(records: Vec<FixtureRecord>, format: FixtureFormat) -> Self {
		Self {
			records,
			format,
			source: None,
		}
	}

	/// Sets the source file path.
	pub fn with_source(mut self, source: impl Into<String>) -> Self {
		self.source = Some(source.into());
		self
	}

	/// Returns the number of records.
	pub fn len(&self) -> usize {
		self.records.len()
	}

	/// Returns true if there are no records.
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Returns an iterator over the records.
	pub fn iter(&self) -> impl Iterator<Item = &FixtureRecord> {
		self.records.iter()
	}
}

impl IntoIterator for FixtureData {
	type Item = FixtureRecord;
	type IntoIter = std::vec::IntoIter<FixtureRecord>;

	fn into_iter(self) -> Self::IntoIter {
		self.records.into_iter()
	}
}
