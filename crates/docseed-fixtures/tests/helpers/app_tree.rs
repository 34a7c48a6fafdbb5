//! Application directory builder.

use std::fs;
use std::path::{Path, PathBuf};

use docseed_apps::{AppConfig, Apps, FixtureHook};
use serde_json::Value;
use tempfile::TempDir;

/// A temporary directory holding one or more application trees.
pub struct AppTree {
	root: TempDir,
	apps: Vec<AppConfig>,
}

impl AppTree {
	/// Create an empty tree.
	pub fn new() -> Self {
		Self {
			root: tempfile::tempdir().expect("create temp dir"),
			apps: Vec::new(),
		}
	}

	/// Add an application directory without a fixtures directory.
	pub fn app(mut self, name: &str) -> Self {
		let path = self.root.path().join(name);
		fs::create_dir_all(&path).expect("create app dir");
		self.apps.push(AppConfig::new(name, path));
		self
	}

	/// Declare a fixture hook on the most recently added application.
	pub fn hook(mut self, hook: FixtureHook) -> Self {
		let app = self.apps.last_mut().expect("add an app first");
		app.fixtures.push(hook);
		self
	}

	/// Write `<app>/fixtures/<name>` with raw content.
	pub fn fixture(self, app: &str, name: &str, content: &str) -> Self {
		let dir = self.app_path(app).join("fixtures");
		fs::create_dir_all(&dir).expect("create fixtures dir");
		fs::write(dir.join(name), content).expect("write fixture");
		self
	}

	/// Write `<app>/fixtures/<name>` as a JSON document.
	pub fn json_fixture(self, app: &str, name: &str, value: Value) -> Self {
		let content = serde_json::to_string_pretty(&value).expect("serialize fixture");
		self.fixture(app, name, &content)
	}

	/// Write `<app>/fixtures/custom_scripts/<doctype>.js`.
	pub fn script(self, app: &str, doctype: &str, body: &str) -> Self {
		let dir = self.app_path(app).join("fixtures").join("custom_scripts");
		fs::create_dir_all(&dir).expect("create custom_scripts dir");
		fs::write(dir.join(format!("{}.js", doctype)), body).expect("write script");
		self
	}

	/// Directory of an application.
	pub fn app_path(&self, app: &str) -> PathBuf {
		self.root.path().join(app)
	}

	/// Root of the tree.
	pub fn root(&self) -> &Path {
		self.root.path()
	}

	/// Registry of the applications, in the order they were added.
	pub fn apps(&self) -> Apps {
		let mut apps = Apps::new();
		for config in &self.apps {
			apps.register(config.clone()).expect("register app");
		}
		apps
	}
}
