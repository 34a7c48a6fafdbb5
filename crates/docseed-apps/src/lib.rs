//! Installed applications for docseed.
//!
//! - [`Apps`] - ordered registry of [`AppConfig`]s, with the fixture and
//!   custom script directories of each application
//! - [`FixtureHook`] - what an application exports as fixtures
//! - [`Settings`] - the TOML settings file the registry is built from
//!
//! # Examples
//!
//! ```rust
//! use docseed_apps::{HookRegistry, Settings};
//!
//! let settings = Settings::from_toml_str(r#"
//! [[apps]]
//! name = "frappe"
//! fixtures = ["Custom Field"]
//! "#).unwrap();
//!
//! let apps = settings.build_apps().unwrap();
//! assert_eq!(apps.installed_apps(), vec!["frappe"]);
//! assert_eq!(apps.fixtures_for("frappe").unwrap().len(), 1);
//! ```

#![warn(missing_docs)]

pub mod apps;
pub mod error;
pub mod hooks;
pub mod settings;

pub use apps::{AppConfig, Apps, CUSTOM_SCRIPTS_DIR, FIXTURES_DIR};
pub use error::{AppError, AppResult};
pub use hooks::{FixtureHook, HookRegistry, ResolvedHook};
pub use settings::{AppSettings, DEFAULT_SETTINGS_FILE, Settings};
