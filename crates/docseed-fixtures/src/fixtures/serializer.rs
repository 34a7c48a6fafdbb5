//! Document serialization for fixture output.

use std::path::Path;

use docseed_store::Document;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::FixtureRecord;
use crate::error::{FixtureError, FixtureResult};

/// Fixture serializer for exporting documents as a JSON array.
///
/// Keys are written in sorted order, one record per array element.
#[derive(Debug, Clone)]
pub struct FixtureSerializer {
	/// Indentation width for pretty printing; `0` writes compact JSON.
	indent: usize,
}

impl FixtureSerializer {
	/// Creates a new fixture serializer with an indentation of one space.
	pub fn new() -> Self {
		Self { indent: 1 }
	}

	/// Sets the indentation width.
	pub fn with_indent(mut self, indent: usize) -> Self {
		self.indent = indent;
		self
	}

	/// Returns the configured indentation width.
	pub fn indent(&self) -> usize {
		self.indent
	}

	/// Converts documents to fixture records.
	pub fn records(&self, docs: &[Document]) -> FixtureResult<Vec<FixtureRecord>> {
		docs.iter().map(FixtureRecord::from_document).collect()
	}

	/// Serializes fixture records to a string.
	pub fn serialize(&self, records: &[FixtureRecord]) -> FixtureResult<String> {
		if self.indent == 0 {
			return Ok(serde_json::to_string(records)?);
		}

		let indent = " ".repeat(self.indent);
		let mut out = Vec::new();
		let mut serializer =
			Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(indent.as_bytes()));
		records.serialize(&mut serializer)?;
		String::from_utf8(out).map_err(|e| FixtureError::InvalidRecord(e.to_string()))
	}

	/// Writes serialized documents to a file, replacing its content.
	pub fn write_to_file(&self, docs: &[Document], path: &Path) -> FixtureResult<()> {
		let content = self.serialize(&self.records(docs)?)?;
		std::fs::write(path, content).map_err(|e| FixtureError::io("write", path, e))
	}
}

impl Default for FixtureSerializer {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::{Value, json};

	#[rstest]
	fn test_serialize_sorted_keys() {
		let docs = vec![
			Document::new("Note")
				.with_name("welcome")
				.with_field("title", "Hi")
				.with_field("public", 1),
		];
		let serializer = FixtureSerializer::new().with_indent(0);
		let out = serializer
			.serialize(&serializer.records(&docs).unwrap())
			.unwrap();
		assert_eq!(
			out,
			r#"[{"doctype":"Note","name":"welcome","public":1,"title":"Hi"}]"#
		);
	}

	#[rstest]
	fn test_serialize_indent() {
		let records = vec![FixtureRecord::new().with_field("doctype", "Note")];
		let out = FixtureSerializer::new()
			.with_indent(2)
			.serialize(&records)
			.unwrap();
		assert_eq!(out, "[\n  {\n    \"doctype\": \"Note\"\n  }\n]");
	}

	#[rstest]
	fn test_write_to_file_overwrites() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("note.json");
		std::fs::write(&path, "stale").unwrap();

		FixtureSerializer::new()
			.write_to_file(&[Document::new("Note").with_name("a")], &path)
			.unwrap();

		let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
		assert_eq!(written, json!([{"doctype": "Note", "name": "a"}]));
	}

	#[rstest]
	fn test_write_to_missing_dir() {
		let result = FixtureSerializer::new().write_to_file(&[], Path::new("/nonexistent/dir/a.json"));
		assert!(matches!(result, Err(FixtureError::Io { action: "write", .. })));
	}
}
