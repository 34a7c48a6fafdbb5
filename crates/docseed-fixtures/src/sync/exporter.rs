//! Fixture export to application directories.

use docseed_apps::{Apps, HookRegistry, ResolvedHook};
use docseed_store::{DocumentStore, Filters};

use super::report::{ExportReport, ExportedFile};
use crate::error::{FixtureError, FixtureResult, OperationContext};
use crate::transfer::{export_json, scrub};

/// Exports the fixtures each application declares to `<app>/fixtures`.
pub struct FixtureExporter<'a> {
	store: &'a dyn DocumentStore,
	apps: &'a Apps,
	hooks: &'a dyn HookRegistry,
}

impl<'a> FixtureExporter<'a> {
	/// Creates an exporter reading hooks from the application registry.
	pub fn new(store: &'a dyn DocumentStore, apps: &'a Apps) -> Self {
		Self {
			store,
			apps,
			hooks: apps,
		}
	}

	/// Uses another source of fixture hooks.
	pub fn with_hooks(mut self, hooks: &'a dyn HookRegistry) -> Self {
		self.hooks = hooks;
		self
	}

	/// Writes `<app>/fixtures/<scrubbed doctype>.json` for every hook entry
	/// of every installed application, in installation and declaration order.
	///
	/// Each export is announced on stdout as
	/// `Exporting {doctype} app {app} filters {filters}`.
	///
	/// # Errors
	///
	/// A hook entry naming no document type, invalid filters or a failed
	/// write aborts the export.
	pub async fn export_fixtures(&self) -> FixtureResult<ExportReport> {
		let mut report = ExportReport::default();

		for config in self.apps.configs() {
			for hook in self.hooks.fixtures_for(&config.name)? {
				let ResolvedHook { doctype, filters } = hook.resolve(&config.name)?;
				let shown = filters
					.as_ref()
					.map(|f| f.to_string())
					.unwrap_or_else(|| "None".to_string());
				println!("Exporting {} app {} filters {}", doctype, config.name, shown);
				tracing::info!("Exporting {} app {} filters {}", doctype, config.name, shown);

				let fixtures_dir = config.fixtures_dir();
				if !fixtures_dir.exists() {
					std::fs::create_dir(&fixtures_dir)
						.map_err(|e| FixtureError::io("create", &fixtures_dir, e))?;
				}

				let path = fixtures_dir.join(format!("{}.json", scrub(&doctype)));
				let filters = match &filters {
					Some(value) => Filters::from_value(value)?,
					None => Filters::new(),
				};
				let count = export_json(self.store, &doctype, &path, &filters)
					.await
					.operation(|| format!("export {} for app {}", doctype, config.name))?;

				report.files.push(ExportedFile {
					app: config.name.clone(),
					doctype,
					path,
					count,
				});
			}
		}

		Ok(report)
	}
}
