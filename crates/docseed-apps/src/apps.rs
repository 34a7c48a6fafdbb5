//! # Application Registry
//!
//! Installed applications, in installation order. Each application owns a
//! directory on disk; fixtures live under `<path>/fixtures` and custom
//! scripts under `<path>/fixtures/custom_scripts`.

use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::hooks::{FixtureHook, HookRegistry};

/// Name of the fixtures directory inside an application.
pub const FIXTURES_DIR: &str = "fixtures";
/// Name of the custom scripts directory inside the fixtures directory.
pub const CUSTOM_SCRIPTS_DIR: &str = "custom_scripts";

/// Configuration for a single application
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
	/// Application name, e.g. `"frappe"`
	pub name: String,

	/// Root directory of the application
	pub path: PathBuf,

	/// Declared fixture hooks, in declaration order
	pub fixtures: Vec<FixtureHook>,
}

impl AppConfig {
	/// Create a new AppConfig with no fixture hooks
	pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
		Self {
			name: name.into(),
			path: path.into(),
			fixtures: Vec::new(),
		}
	}

	/// Add a fixture hook
	pub fn with_fixture(mut self, hook: FixtureHook) -> Self {
		self.fixtures.push(hook);
		self
	}

	/// Add several fixture hooks
	pub fn with_fixtures(mut self, hooks: impl IntoIterator<Item = FixtureHook>) -> Self {
		self.fixtures.extend(hooks);
		self
	}

	/// Validate the application name.
	///
	/// Names are used as directory and module names, so only ASCII
	/// alphanumerics, `_` and `-` are accepted.
	pub fn validate_name(&self) -> AppResult<()> {
		if self.name.is_empty() {
			return Err(AppError::InvalidName("Name cannot be empty".to_string()));
		}

		if !self
			.name
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
		{
			return Err(AppError::InvalidName(format!(
				"Name '{}' must contain only alphanumeric characters, underscores and hyphens",
				self.name
			)));
		}

		Ok(())
	}

	/// Directory holding this application's fixture files
	pub fn fixtures_dir(&self) -> PathBuf {
		self.path.join(FIXTURES_DIR)
	}

	/// Directory holding this application's custom scripts
	pub fn custom_scripts_dir(&self) -> PathBuf {
		self.fixtures_dir().join(CUSTOM_SCRIPTS_DIR)
	}
}

/// Main application registry
///
/// # Examples
///
/// ```rust
/// use docseed_apps::{AppConfig, Apps};
///
/// let mut apps = Apps::new();
/// apps.register(AppConfig::new("frappe", "apps/frappe")).unwrap();
/// apps.register(AppConfig::new("erpnext", "apps/erpnext")).unwrap();
///
/// assert_eq!(apps.installed_apps(), vec!["frappe", "erpnext"]);
/// assert!(apps.is_installed("erpnext"));
/// assert_eq!(
///     apps.fixtures_dir("frappe").unwrap(),
///     std::path::Path::new("apps/frappe/fixtures")
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Apps {
	configs: Vec<AppConfig>,
}

impl Apps {
	/// Create an empty registry
	pub fn new() -> Self {
		Self::default()
	}

	/// Register an application configuration
	pub fn register(&mut self, config: AppConfig) -> AppResult<()> {
		config.validate_name()?;

		if self.is_installed(&config.name) {
			return Err(AppError::DuplicateName(config.name));
		}

		tracing::debug!("Registered app {} at {}", config.name, config.path.display());
		self.configs.push(config);
		Ok(())
	}

	/// Names of installed applications, in installation order
	pub fn installed_apps(&self) -> Vec<&str> {
		self.configs.iter().map(|c| c.name.as_str()).collect()
	}

	/// Installed application configurations, in installation order
	pub fn configs(&self) -> &[AppConfig] {
		&self.configs
	}

	/// Get an application configuration by name
	pub fn get(&self, name: &str) -> AppResult<&AppConfig> {
		self.configs
			.iter()
			.find(|c| c.name == name)
			.ok_or_else(|| AppError::NotFound(name.to_string()))
	}

	/// Check if an application is installed
	pub fn is_installed(&self, name: &str) -> bool {
		self.configs.iter().any(|c| c.name == name)
	}

	/// Path inside an application's directory
	pub fn app_path<P: AsRef<Path>>(&self, name: &str, parts: &[P]) -> AppResult<PathBuf> {
		let mut path = self.get(name)?.path.clone();
		for part in parts {
			path.push(part);
		}
		Ok(path)
	}

	/// Fixtures directory of an application
	pub fn fixtures_dir(&self, name: &str) -> AppResult<PathBuf> {
		Ok(self.get(name)?.fixtures_dir())
	}

	/// Custom scripts directory of an application
	pub fn custom_scripts_dir(&self, name: &str) -> AppResult<PathBuf> {
		Ok(self.get(name)?.custom_scripts_dir())
	}

	/// Number of installed applications
	pub fn len(&self) -> usize {
		self.configs.len()
	}

	/// Check if no application is installed
	pub fn is_empty(&self) -> bool {
		self.configs.is_empty()
	}
}

impl HookRegistry for Apps {
	fn fixtures_for(&self, app: &str) -> AppResult<Vec<FixtureHook>> {
		Ok(self.get(app)?.fixtures.clone())
	}
}
