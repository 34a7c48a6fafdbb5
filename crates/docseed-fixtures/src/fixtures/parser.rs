//! Fixture parsing functionality.
//!
//! Two entry points with different failure policies:
//!
//! - [`FixtureParser::scan`] reads any file as a JSON array and never fails;
//!   the outcome says whether records were found.
//! - [`FixtureParser::parse_file`] parses a `.json` or `.csv` fixture file and
//!   reports every problem as an error.

use std::path::Path;

use serde_json::{Map, Value};

use super::{FixtureData, FixtureFormat, FixtureRecord};
use crate::error::{FixtureError, FixtureResult};

/// Result of a best-effort scan of a fixture file.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
	/// The file is a JSON array of records.
	Parsed(Vec<FixtureRecord>),
	/// The file is an empty JSON array.
	Empty,
	/// The file could not be read as a JSON array of objects.
	ParseError(String),
}

impl ScanOutcome {
	/// The scanned records; empty unless the scan succeeded.
	pub fn records(&self) -> &[FixtureRecord] {
		match self {
			Self::Parsed(records) => records,
			Self::Empty | Self::ParseError(_) => &[],
		}
	}

	/// Returns true if the scan failed.
	pub fn is_error(&self) -> bool {
		matches!(self, Self::ParseError(_))
	}
}

/// Parser for fixture files.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureParser;

impl FixtureParser {
	/// Creates a new fixture parser.
	pub fn new() -> Self {
		Self
	}

	/// Reads `path` as a JSON array of records without failing.
	///
	/// Read errors, invalid JSON, a non-array document and non-object
	/// elements all yield [`ScanOutcome::ParseError`].
	pub fn scan(&self, path: &Path) -> ScanOutcome {
		let content = match std::fs::read_to_string(path) {
			Ok(content) => content,
			Err(e) => return ScanOutcome::ParseError(e.to_string()),
		};
		self.scan_str(&content)
	}

	/// Like [`Self::scan`], for content already in memory.
	pub fn scan_str(&self, content: &str) -> ScanOutcome {
		let items = match serde_json::from_str::<Value>(content) {
			Ok(Value::Array(items)) => items,
			Ok(_) => return ScanOutcome::ParseError("expected a JSON array".to_string()),
			Err(e) => return ScanOutcome::ParseError(e.to_string()),
		};
		if items.is_empty() {
			return ScanOutcome::Empty;
		}

		let mut records = Vec::with_capacity(items.len());
		for (idx, item) in items.into_iter().enumerate() {
			match item {
				Value::Object(fields) => records.push(FixtureRecord::from_map(fields)),
				_ => {
					return ScanOutcome::ParseError(format!(
						"record at index {} is not an object",
						idx
					));
				}
			}
		}
		ScanOutcome::Parsed(records)
	}

	/// Parses a fixture file from the given path.
	///
	/// The format is detected from the file extension.
	///
	/// # Errors
	///
	/// Returns an error if:
	/// - The file extension is not `json` or `csv`
	/// - The file cannot be read
	/// - The content is invalid, or a record has no `doctype`
	pub fn parse_file(&self, path: &Path) -> FixtureResult<FixtureData> {
		let format = FixtureFormat::from_path(path).ok_or_else(|| {
			FixtureError::UnsupportedExtension(
				path.extension()
					.and_then(|e| e.to_str())
					.unwrap_or("(none)")
					.to_string(),
			)
		})?;

		let content = std::fs::read_to_string(path).map_err(|e| {
			if e.kind() == std::io::ErrorKind::NotFound {
				FixtureError::FileNotFound(path.display().to_string())
			} else {
				FixtureError::io("read", path, e)
			}
		})?;

		let data = self
			.parse_string(&content, format)
			.map_err(|e| match e {
				FixtureError::Json(e) => FixtureError::Parse {
					path: path.display().to_string(),
					message: e.to_string(),
				},
				FixtureError::Csv(e) => FixtureError::Parse {
					path: path.display().to_string(),
					message: e.to_string(),
				},
				other => other,
			})?;
		Ok(data.with_source(path.display().to_string()))
	}

	/// Parses fixture data from a string.
	pub fn parse_string(&self, content: &str, format: FixtureFormat) -> FixtureResult<FixtureData> {
		let records = match format {
			FixtureFormat::Json => self.parse_json(content)?,
			FixtureFormat::Csv => self.parse_csv(content)?,
		};

		Ok(FixtureData::from_records(records, format))
	}

	fn parse_json(&self, content: &str) -> FixtureResult<Vec<FixtureRecord>> {
		let value: Value = serde_json::from_str(content)?;

		let items = match value {
			Value::Array(items) => items,
			Value::Object(_) => vec![value],
			_ => {
				return Err(FixtureError::InvalidRecord(
					"expected an array or an object".to_string(),
				));
			}
		};

		let mut records = Vec::with_capacity(items.len());
		for (idx, item) in items.into_iter().enumerate() {
			let record = FixtureRecord::from_value(item).map_err(|e| {
				FixtureError::InvalidRecord(format!("record at index {}: {}", idx, e))
			})?;
			self.validate_record(idx, &record)?;
			records.push(record);
		}
		Ok(records)
	}

	fn parse_csv(&self, content: &str) -> FixtureResult<Vec<FixtureRecord>> {
		let mut reader = csv::ReaderBuilder::new()
			.has_headers(true)
			.trim(csv::Trim::Headers)
			.from_reader(content.as_bytes());
		let headers = reader.headers()?.clone();

		if !headers.iter().any(|h| h == "doctype") {
			return Err(FixtureError::InvalidRecord(
				"CSV fixture has no doctype column".to_string(),
			));
		}

		let mut records = Vec::new();
		for (idx, row) in reader.records().enumerate() {
			let row = row?;
			let mut fields = Map::new();
			for (header, cell) in headers.iter().zip(row.iter()) {
				if header.is_empty() || cell.is_empty() {
					continue;
				}
				fields.insert(header.to_string(), Value::String(cell.to_string()));
			}
			let record = FixtureRecord::from_map(fields);
			self.validate_record(idx, &record)?;
			records.push(record);
		}
		Ok(records)
	}

	fn validate_record(&self, idx: usize, record: &FixtureRecord) -> FixtureResult<()> {
		match record.doctype() {
			Some(doctype) if !doctype.trim().is_empty() => Ok(()),
			_ => Err(FixtureError::InvalidRecord(format!(
				"record at index {} has no doctype",
				idx
			))),
		}
	}
}
