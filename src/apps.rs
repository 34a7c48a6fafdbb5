//! Application registry and settings module.
//!
//! # Examples
//!
//! ```rust,ignore
//! use docseed::apps::{AppConfig, Apps, FixtureHook};
//!
//! let mut apps = Apps::new();
//! apps.register(AppConfig::new("shop", "apps/shop").with_fixture(FixtureHook::doctype("Custom Field")))?;
//! ```

pub use docseed_apps::*;
