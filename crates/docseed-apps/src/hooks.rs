//! Fixture hooks
//!
//! Each application declares which document types it exports as fixtures.
//! An entry is either a bare document type name or a table naming the
//! document type (as `doctype`, or `dt`) with optional filters:
//!
//! ```toml
//! fixtures = [
//!     "Custom Field",
//!     { doctype = "Note", filters = { public = 1 } },
//!     { dt = "Property Setter", filters = [["doc_type", "=", "Item"]] },
//! ]
//! ```
//!
//! Filters are kept opaque here; the fixture exporter interprets them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// A single fixture hook entry as declared by an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FixtureHook {
	/// Export every document of this type.
	DocType(String),
	/// Structured entry.
	Entry {
		/// Document type to export.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		doctype: Option<String>,
		/// Alternative key for the document type.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		dt: Option<String>,
		/// Filters restricting the exported documents.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		filters: Option<Value>,
	},
}

impl FixtureHook {
	/// Hook exporting a whole document type.
	pub fn doctype(name: impl Into<String>) -> Self {
		Self::DocType(name.into())
	}

	/// Hook exporting the documents of `doctype` matching `filters`.
	pub fn filtered(doctype: impl Into<String>, filters: Value) -> Self {
		Self::Entry {
			doctype: Some(doctype.into()),
			dt: None,
			filters: Some(filters),
		}
	}

	/// Resolves the document type and filters of this entry.
	///
	/// `doctype` takes precedence over `dt`; an empty string counts as
	/// absent. `app` is only used for the error message.
	pub fn resolve(&self, app: &str) -> AppResult<ResolvedHook> {
		match self {
			Self::DocType(name) if name.trim().is_empty() => Err(AppError::InvalidHook {
				app: app.to_string(),
				reason: "empty document type".to_string(),
			}),
			Self::DocType(name) => Ok(ResolvedHook {
				doctype: name.clone(),
				filters: None,
			}),
			Self::Entry {
				doctype,
				dt,
				filters,
			} => {
				let doctype = [doctype, dt]
					.into_iter()
					.flatten()
					.find(|name| !name.trim().is_empty())
					.ok_or_else(|| AppError::InvalidHook {
						app: app.to_string(),
						reason: "entry has neither doctype nor dt".to_string(),
					})?;
				Ok(ResolvedHook {
					doctype: doctype.clone(),
					filters: filters.clone().filter(|f| !f.is_null()),
				})
			}
		}
	}
}

/// A fixture hook with its document type resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedHook {
	/// Document type to export.
	pub doctype: String,
	/// Filters, if any were declared.
	pub filters: Option<Value>,
}

/// Source of per-application fixture hook declarations.
pub trait HookRegistry {
	/// Returns the fixture hooks `app` declares, in declaration order.
	fn fixtures_for(&self, app: &str) -> AppResult<Vec<FixtureHook>>;
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_resolve_bare_doctype() {
		let resolved = FixtureHook::doctype("Custom Field").resolve("frappe").unwrap();
		assert_eq!(resolved.doctype, "Custom Field");
		assert_eq!(resolved.filters, None);
	}

	#[rstest]
	#[case(json!({"doctype": "Note", "filters": {"public": 1}}), "Note", Some(json!({"public": 1})))]
	#[case(json!({"dt": "Note"}), "Note", None)]
	#[case(json!({"doctype": "", "dt": "Property Setter"}), "Property Setter", None)]
	#[case(json!({"doctype": "Note", "dt": "Other", "filters": null}), "Note", None)]
	fn test_resolve_entry(
		#[case] raw: Value,
		#[case] doctype: &str,
		#[case] filters: Option<Value>,
	) {
		let hook: FixtureHook = serde_json::from_value(raw).unwrap();
		let resolved = hook.resolve("frappe").unwrap();
		assert_eq!(resolved.doctype, doctype);
		assert_eq!(resolved.filters, filters);
	}

	#[rstest]
	#[case(json!({"filters": {"public": 1}}))]
	#[case(json!({"doctype": ""}))]
	#[case(json!(""))]
	fn test_resolve_invalid(#[case] raw: Value) {
		let hook: FixtureHook = serde_json::from_value(raw).unwrap();
		assert!(matches!(
			hook.resolve("frappe"),
			Err(AppError::InvalidHook { ref app, .. }) if app == "frappe"
		));
	}

	#[rstest]
	fn test_deserialize_from_toml() {
		#[derive(Deserialize)]
		struct Decl {
			fixtures: Vec<FixtureHook>,
		}

		let decl: Decl = toml::from_str(
			r#"fixtures = ["Custom Field", { doctype = "Note", filters = { public = 1 } }]"#,
		)
		.unwrap();
		assert_eq!(
			decl.fixtures,
			vec![
				FixtureHook::doctype("Custom Field"),
				FixtureHook::filtered("Note", json!({"public": 1})),
			]
		);
	}
}
