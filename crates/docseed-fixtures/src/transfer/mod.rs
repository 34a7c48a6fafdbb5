//! Bulk import and export of fixture files.

mod export;
mod import;

pub use export::export_json;
pub use import::{ImportOptions, ImportResult, import_doc};

/// Turns a document type name into a file-name-safe identifier.
///
/// Lowercases, and replaces every character that is not alphanumeric or `_`
/// with `_`.
///
/// # Example
///
/// ```
/// use docseed_fixtures::transfer::scrub;
///
/// assert_eq!(scrub("Custom Field"), "custom_field");
/// assert_eq!(scrub("Sales-Order"), "sales_order");
/// ```
pub fn scrub(name: &str) -> String {
	name.chars()
		.flat_map(char::to_lowercase)
		.map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
		.collect()
}
