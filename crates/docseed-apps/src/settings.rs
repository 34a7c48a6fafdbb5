//! Settings file
//!
//! docseed reads a single TOML file (by default `docseed.toml`):
//!
//! ```toml
//! database_url = "sqlite://site.db?mode=rwc"
//! base_dir = "."
//!
//! [[apps]]
//! name = "frappe"
//! path = "apps/frappe"
//! fixtures = ["Custom Field", { doctype = "Note", filters = { public = 1 } }]
//!
//! [[doctypes]]
//! name = "Note"
//! mandatory = ["title"]
//! ```
//!
//! Relative application paths resolve against `base_dir`, which itself
//! resolves against the directory holding the settings file.
//! `DOCSEED_DATABASE_URL` overrides `database_url`.

use std::fs;
use std::path::{Path, PathBuf};

use docseed_store::{DocTypeMeta, MetaRegistry};
use serde::Deserialize;

use crate::apps::{AppConfig, Apps};
use crate::error::{AppError, AppResult};
use crate::hooks::FixtureHook;

/// Default settings file name.
pub const DEFAULT_SETTINGS_FILE: &str = "docseed.toml";
/// Environment variable overriding the database URL.
pub const DATABASE_URL_ENV: &str = "DOCSEED_DATABASE_URL";
/// Database used when none is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://docseed.db?mode=rwc";

/// An `[[apps]]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppSettings {
	/// Application name.
	pub name: String,
	/// Application directory; defaults to the name.
	#[serde(default)]
	pub path: Option<PathBuf>,
	/// Fixture hooks.
	#[serde(default)]
	pub fixtures: Vec<FixtureHook>,
}

/// Parsed settings file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
	/// Database connection URL.
	#[serde(default)]
	pub database_url: Option<String>,

	/// Directory application paths are relative to.
	#[serde(default)]
	pub base_dir: Option<PathBuf>,

	/// Installed applications, in installation order.
	#[serde(default)]
	pub apps: Vec<AppSettings>,

	/// Document type metadata merged over [`MetaRegistry::core`].
	#[serde(default)]
	pub doctypes: Vec<DocTypeMeta>,
}

impl Settings {
	/// Parses settings from TOML text.
	pub fn from_toml_str(content: &str) -> AppResult<Self> {
		Ok(toml::from_str(content)?)
	}

	/// Loads settings from a file.
	///
	/// A relative (or missing) `base_dir` is resolved against the file's
	/// directory.
	pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
		let path = path.as_ref();
		let content = fs::read_to_string(path).map_err(|source| AppError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let mut settings = Self::from_toml_str(&content)?;

		let parent = path.parent().unwrap_or(Path::new(""));
		let base = match settings.base_dir.take() {
			Some(dir) if dir.is_absolute() => dir,
			Some(dir) => parent.join(dir),
			None => parent.to_path_buf(),
		};
		settings.base_dir = Some(base);

		tracing::debug!("Loaded settings from {}", path.display());
		Ok(settings)
	}

	/// Applies overrides from the process environment.
	pub fn with_env_overrides(self) -> Self {
		self.apply_env(|key| std::env::var(key).ok())
	}

	/// Applies overrides from `lookup`, which maps variable names to values.
	pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
		if let Some(url) = lookup(DATABASE_URL_ENV).filter(|url| !url.is_empty()) {
			tracing::debug!("Database URL taken from {}", DATABASE_URL_ENV);
			self.database_url = Some(url);
		}
		self
	}

	/// The configured database URL, or [`DEFAULT_DATABASE_URL`].
	pub fn database_url(&self) -> &str {
		self.database_url
			.as_deref()
			.unwrap_or(DEFAULT_DATABASE_URL)
	}

	/// Builds the application registry.
	pub fn build_apps(&self) -> AppResult<Apps> {
		let base = self.base_dir.clone().unwrap_or_default();
		let mut apps = Apps::new();
		for app in &self.apps {
			let path = app
				.path
				.clone()
				.unwrap_or_else(|| PathBuf::from(&app.name));
			let path = if path.is_absolute() {
				path
			} else {
				base.join(path)
			};
			apps.register(AppConfig::new(&app.name, path).with_fixtures(app.fixtures.iter().cloned()))?;
		}
		Ok(apps)
	}

	/// Builds the store metadata: the core document types plus `[[doctypes]]`.
	pub fn meta_registry(&self) -> AppResult<MetaRegistry> {
		let mut registry = MetaRegistry::core();
		for meta in &self.doctypes {
			if meta.name.trim().is_empty() {
				return Err(AppError::Config(
					"[[doctypes]] entry with an empty name".to_string(),
				));
			}
			registry.register(meta.clone());
		}
		Ok(registry)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;
	use std::io::Write;

	const SAMPLE: &str = r#"
database_url = "sqlite://site.db?mode=rwc"

[[apps]]
name = "frappe"
path = "apps/frappe"
fixtures = ["Custom Field", { doctype = "Note", filters = { public = 1 } }]

[[apps]]
name = "erpnext"

[[doctypes]]
name = "Note"
mandatory = ["title"]
links = [{ fieldname = "owner", target = "User" }]
"#;

	#[rstest]
	fn test_parse() {
		let settings = Settings::from_toml_str(SAMPLE).unwrap();
		assert_eq!(settings.database_url(), "sqlite://site.db?mode=rwc");
		assert_eq!(settings.apps.len(), 2);
		assert_eq!(
			settings.apps[0].fixtures[1],
			FixtureHook::filtered("Note", json!({"public": 1}))
		);
		assert_eq!(settings.doctypes[0].mandatory, vec!["title".to_string()]);
	}

	#[rstest]
	fn test_defaults() {
		let settings = Settings::from_toml_str("").unwrap();
		assert_eq!(settings.database_url(), DEFAULT_DATABASE_URL);
		assert!(settings.build_apps().unwrap().is_empty());
	}

	#[rstest]
	fn test_unknown_key_rejected() {
		let result = Settings::from_toml_str("databse_url = \"x\"");
		assert!(matches!(result, Err(AppError::Toml(_))));
	}

	#[rstest]
	fn test_env_override() {
		let settings = Settings::from_toml_str(SAMPLE)
			.unwrap()
			.apply_env(|key| (key == DATABASE_URL_ENV).then(|| "sqlite::memory:".to_string()));
		assert_eq!(settings.database_url(), "sqlite::memory:");

		let untouched = Settings::from_toml_str(SAMPLE)
			.unwrap()
			.apply_env(|_| Some(String::new()));
		assert_eq!(untouched.database_url(), "sqlite://site.db?mode=rwc");
	}

	#[rstest]
	fn test_from_file_resolves_paths() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join(DEFAULT_SETTINGS_FILE);
		fs::File::create(&path)
			.unwrap()
			.write_all(SAMPLE.as_bytes())
			.unwrap();

		let apps = Settings::from_file(&path).unwrap().build_apps().unwrap();
		assert_eq!(apps.installed_apps(), vec!["frappe", "erpnext"]);
		assert_eq!(
			apps.get("frappe").unwrap().path,
			dir.path().join("apps/frappe")
		);
		assert_eq!(apps.get("erpnext").unwrap().path, dir.path().join("erpnext"));
	}

	#[rstest]
	fn test_from_file_missing() {
		let result = Settings::from_file("/nonexistent/docseed.toml");
		assert!(matches!(result, Err(AppError::Io { .. })));
	}

	#[rstest]
	fn test_meta_registry_merges_core() {
		let registry = Settings::from_toml_str(SAMPLE)
			.unwrap()
			.meta_registry()
			.unwrap();
		assert!(registry.get("Custom Field").is_some());
		let note = registry.get("Note").unwrap();
		assert_eq!(note.links[0].target, "User");
	}
}
