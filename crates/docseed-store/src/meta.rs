//! Document type metadata and write checks.
//!
//! A [`MetaRegistry`] describes the document types a store knows about:
//! mandatory fields, link fields, naming rules and whether the type accepts
//! writes at all. Unregistered document types are stored without checks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::policy::InsertPolicy;

/// Document type of custom field definitions.
pub const CUSTOM_FIELD: &str = "Custom Field";
/// Document type of standard field definitions.
pub const DOCFIELD: &str = "DocField";
/// Document type of document type definitions.
pub const DOCTYPE: &str = "DocType";
/// Document type of client-side customization scripts.
pub const CUSTOM_SCRIPT: &str = "Custom Script";

/// A field whose value names a document of another type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkField {
	/// Field holding the linked name.
	pub fieldname: String,
	/// Document type the value must exist in.
	pub target: String,
}

/// Metadata for a single document type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocTypeMeta {
	/// Document type name.
	pub name: String,

	/// Fields that must be present and non-empty.
	#[serde(default)]
	pub mandatory: Vec<String>,

	/// Link fields checked for integrity.
	#[serde(default)]
	pub links: Vec<LinkField>,

	/// Naming pattern such as `"{dt}-{fieldname}"`.
	#[serde(default)]
	pub autoname: Option<String>,

	/// Rejects every write unless permissions are bypassed.
	#[serde(default)]
	pub read_only: bool,
}

impl DocTypeMeta {
	/// Creates metadata with no rules.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			mandatory: Vec::new(),
			links: Vec::new(),
			autoname: None,
			read_only: false,
		}
	}

	/// Adds mandatory fields.
	pub fn with_mandatory(mut self, fields: &[&str]) -> Self {
		self.mandatory
			.extend(fields.iter().map(|f| f.to_string()));
		self
	}

	/// Adds a link field.
	pub fn with_link(mut self, fieldname: impl Into<String>, target: impl Into<String>) -> Self {
		self.links.push(LinkField {
			fieldname: fieldname.into(),
			target: target.into(),
		});
		self
	}

	/// Sets the naming pattern.
	pub fn with_autoname(mut self, pattern: impl Into<String>) -> Self {
		self.autoname = Some(pattern.into());
		self
	}

	/// Marks the document type read-only.
	pub fn read_only(mut self) -> Self {
		self.read_only = true;
		self
	}
}

/// Registry of document type metadata.
#[derive(Debug, Clone, Default)]
pub struct MetaRegistry {
	doctypes: HashMap<String, DocTypeMeta>,
}

impl MetaRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registry with the customization document types used by fixtures.
	///
	/// Custom fields are named `{dt}-{fieldname}` and custom scripts
	/// `{dt}-{script_type}`, so re-importing the same record resolves to the
	/// same document.
	pub fn core() -> Self {
		let mut registry = Self::new();
		registry.register(DocTypeMeta::new(DOCTYPE));
		registry.register(
			DocTypeMeta::new(DOCFIELD).with_mandatory(&["fieldname", "parent", "parenttype"]),
		);
		registry.register(
			DocTypeMeta::new(CUSTOM_FIELD)
				.with_mandatory(&["dt", "fieldname"])
				.with_autoname("{dt}-{fieldname}"),
		);
		registry.register(
			DocTypeMeta::new(CUSTOM_SCRIPT)
				.with_mandatory(&["dt", "script_type"])
				.with_autoname("{dt}-{script_type}"),
		);
		registry
	}

	/// Registers (or replaces) metadata for a document type.
	pub fn register(&mut self, meta: DocTypeMeta) {
		self.doctypes.insert(meta.name.clone(), meta);
	}

	/// Returns metadata for a document type.
	pub fn get(&self, doctype: &str) -> Option<&DocTypeMeta> {
		self.doctypes.get(doctype)
	}

	/// Returns the number of registered document types.
	pub fn len(&self) -> usize {
		self.doctypes.len()
	}

	/// Returns true if nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.doctypes.is_empty()
	}

	/// Derives a name from the document type's naming pattern.
	///
	/// Returns `None` when the type has no pattern or a referenced field is
	/// missing or empty.
	pub fn autoname(&self, doc: &Document) -> Option<String> {
		let pattern = self.get(&doc.doctype)?.autoname.as_deref()?;
		let mut name = String::new();
		let mut rest = pattern;
		while let Some(start) = rest.find('{') {
			name.push_str(&rest[..start]);
			let end = rest[start..].find('}')? + start;
			let value = doc.field_value(&rest[start + 1..end]);
			let text = match value {
				Value::String(s) if !s.is_empty() => s,
				Value::Number(n) => n.to_string(),
				_ => return None,
			};
			name.push_str(&text);
			rest = &rest[end + 1..];
		}
		name.push_str(rest);
		Some(name)
	}

	/// Runs validation, mandatory and permission checks not bypassed by `policy`.
	///
	/// Link checks need the store and are reported by [`Self::required_links`].
	pub fn check(&self, doc: &Document, policy: &InsertPolicy) -> StoreResult<()> {
		if !policy.ignore_validate {
			validate(doc)?;
		}

		let Some(meta) = self.get(&doc.doctype) else {
			return Ok(());
		};

		if !policy.ignore_permissions && meta.read_only {
			return Err(StoreError::PermissionDenied(doc.doctype.clone()));
		}

		if !policy.ignore_mandatory {
			for field in &meta.mandatory {
				if is_blank(&doc.field_value(field)) {
					return Err(StoreError::MandatoryMissing {
						doctype: doc.doctype.clone(),
						field: field.clone(),
					});
				}
			}
		}

		Ok(())
	}

	/// Returns the `(link field, target doctype, linked name)` triples the
	/// store must verify before writing `doc`.
	pub fn required_links<'a>(
		&'a self,
		doc: &'a Document,
		policy: &InsertPolicy,
	) -> Vec<(&'a str, &'a str, &'a str)> {
		if policy.ignore_links {
			return Vec::new();
		}
		let Some(meta) = self.get(&doc.doctype) else {
			return Vec::new();
		};
		meta.links
			.iter()
			.filter_map(|link| {
				doc.get_str(&link.fieldname)
					.filter(|value| !value.is_empty())
					.map(|value| (link.fieldname.as_str(), link.target.as_str(), value))
			})
			.collect()
	}
}

fn validate(doc: &Document) -> StoreResult<()> {
	if doc.doctype.trim().is_empty() {
		return Err(StoreError::Validation("doctype must not be empty".to_string()));
	}
	if let Some(name) = &doc.name
		&& (name.trim().is_empty() || name.contains('/'))
	{
		return Err(StoreError::Validation(format!(
			"invalid name '{}' for {}",
			name, doc.doctype
		)));
	}
	if doc.fields.keys().any(|key| key.trim().is_empty()) {
		return Err(StoreError::Validation(format!(
			"{} has a field with an empty name",
			doc.doctype
		)));
	}
	Ok(())
}

fn is_blank(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::String(s) => s.trim().is_empty(),
		_ => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn custom_field() -> Document {
		Document::new(CUSTOM_FIELD)
			.with_field("dt", "Sales Invoice")
			.with_field("fieldname", "region")
	}

	#[rstest]
	fn test_core_autoname() {
		let registry = MetaRegistry::core();
		assert_eq!(
			registry.autoname(&custom_field()),
			Some("Sales Invoice-region".to_string())
		);

		let script = Document::new(CUSTOM_SCRIPT)
			.with_field("dt", "Sales Order")
			.with_field("script_type", "Client");
		assert_eq!(
			registry.autoname(&script),
			Some("Sales Order-Client".to_string())
		);
	}

	#[rstest]
	fn test_autoname_missing_field() {
		let registry = MetaRegistry::core();
		let doc = Document::new(CUSTOM_FIELD).with_field("dt", "Sales Invoice");
		assert_eq!(registry.autoname(&doc), None);
		assert_eq!(registry.autoname(&Document::new("Note")), None);
	}

	#[rstest]
	fn test_mandatory_check() {
		let registry = MetaRegistry::core();
		let doc = Document::new(CUSTOM_FIELD).with_field("dt", "Sales Invoice");

		let result = registry.check(&doc, &InsertPolicy::strict());
		assert!(matches!(
			result,
			Err(StoreError::MandatoryMissing { ref field, .. }) if field == "fieldname"
		));

		let bypass = InsertPolicy::strict().with_ignore_mandatory(true);
		assert!(registry.check(&doc, &bypass).is_ok());
	}

	#[rstest]
	fn test_read_only_check() {
		let mut registry = MetaRegistry::new();
		registry.register(DocTypeMeta::new("Locked").read_only());
		let doc = Document::new("Locked");

		assert!(matches!(
			registry.check(&doc, &InsertPolicy::strict()),
			Err(StoreError::PermissionDenied(_))
		));
		assert!(registry.check(&doc, &InsertPolicy::bypass_all()).is_ok());
	}

	#[rstest]
	#[case(Document::new(" "))]
	#[case(Document::new("Note").with_name("a/b"))]
	#[case(Document::new("Note").with_field("", 1))]
	fn test_validation(#[case] doc: Document) {
		let registry = MetaRegistry::new();
		assert!(matches!(
			registry.check(&doc, &InsertPolicy::strict()),
			Err(StoreError::Validation(_))
		));
		assert!(registry.check(&doc, &InsertPolicy::bypass_all()).is_ok());
	}

	#[rstest]
	fn test_required_links() {
		let mut registry = MetaRegistry::new();
		registry.register(DocTypeMeta::new(CUSTOM_FIELD).with_link("dt", DOCTYPE));
		let doc = custom_field();

		assert_eq!(
			registry.required_links(&doc, &InsertPolicy::strict()),
			vec![("dt", DOCTYPE, "Sales Invoice")]
		);
		assert!(
			registry
				.required_links(&doc, &InsertPolicy::strict().with_ignore_links(true))
				.is_empty()
		);
	}
}
