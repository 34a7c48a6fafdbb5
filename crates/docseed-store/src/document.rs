//! Document model.
//!
//! A document is a typed bag of fields: every document carries a `doctype`
//! tag, an optional `name` (its identity within the doctype) and any number
//! of JSON fields. The serialized form is a flat JSON object, which is also
//! the shape of a fixture record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreResult;

/// A single document in the store.
///
/// # Example
///
/// ```
/// use docseed_store::Document;
/// use serde_json::json;
///
/// let doc = Document::from_value(json!({
///     "doctype": "Note",
///     "name": "welcome",
///     "public": 1
/// }))
/// .unwrap();
/// assert_eq!(doc.doctype, "Note");
/// assert_eq!(doc.name.as_deref(), Some("welcome"));
/// assert_eq!(doc.get("public"), Some(&json!(1)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
	/// Document type tag (e.g. "Custom Field").
	pub doctype: String,

	/// Unique name within the doctype. Assigned by the store on insert when absent.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	/// Remaining field values.
	#[serde(flatten)]
	pub fields: Map<String, Value>,
}

impl Document {
	/// Creates an empty document of the given type.
	pub fn new(doctype: impl Into<String>) -> Self {
		Self {
			doctype: doctype.into(),
			name: None,
			fields: Map::new(),
		}
	}

	/// Sets the document name.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Sets a field value, builder style.
	pub fn with_field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
		self.set(field, value);
		self
	}

	/// Builds a document from a flat JSON object.
	pub fn from_value(value: Value) -> StoreResult<Self> {
		Ok(serde_json::from_value(value)?)
	}

	/// Converts the document back to its flat JSON form.
	pub fn to_value(&self) -> StoreResult<Value> {
		Ok(serde_json::to_value(self)?)
	}

	/// Sets a field value.
	pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
		self.fields.insert(field.into(), value.into());
	}

	/// Returns a field value.
	pub fn get(&self, field: &str) -> Option<&Value> {
		self.fields.get(field)
	}

	/// Returns a field value when it is a string.
	pub fn get_str(&self, field: &str) -> Option<&str> {
		self.get(field).and_then(Value::as_str)
	}

	/// Returns the value used when filtering on `field`.
	///
	/// `doctype` and `name` are addressable like ordinary fields; anything
	/// missing reads as `null`.
	pub fn field_value(&self, field: &str) -> Value {
		match field {
			"doctype" => Value::String(self.doctype.clone()),
			"name" => self.name.clone().map(Value::String).unwrap_or(Value::Null),
			_ => self.fields.get(field).cloned().unwrap_or(Value::Null),
		}
	}
}
