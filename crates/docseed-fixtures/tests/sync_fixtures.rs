//! End-to-end fixture sync and export against every store backend.

mod helpers;

use docseed_apps::FixtureHook;
use docseed_fixtures::prelude::*;
use docseed_fixtures::sync::FileOutcome;
use docseed_store::{
	CUSTOM_FIELD, CUSTOM_SCRIPT, DOCFIELD, DOCTYPE, Document, DocumentStore, Filters,
	InsertPolicy,
};
use helpers::app_tree::AppTree;
use helpers::stores::{Backend, open_store};
use rstest::rstest;
use serde_json::{Value, json};

fn custom_field(dt: &str, fieldname: &str) -> Value {
	json!({
		"doctype": "Custom Field",
		"dt": dt,
		"fieldname": fieldname,
		"label": fieldname,
		"fieldtype": "Data"
	})
}

async fn count(store: &dyn DocumentStore, doctype: &str) -> usize {
	store.list(doctype, &Filters::new()).await.unwrap().len()
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::sqlite(Backend::Sqlite)]
#[tokio::test]
async fn test_app_without_fixtures_leaves_store_unchanged(#[case] backend: Backend) {
	let tree = AppTree::new().app("bare").app("other");
	let store = open_store(backend, tree.root()).await;
	let apps = tree.apps();

	let report = FixtureImporter::new(store.as_ref(), &apps)
		.sync(None)
		.await
		.unwrap();

	assert_eq!(report.apps.len(), 2);
	assert!(report.apps.iter().all(|app| !app.has_fixtures));
	assert_eq!(count(store.as_ref(), CUSTOM_FIELD).await, 0);
	assert_eq!(count(store.as_ref(), CUSTOM_SCRIPT).await, 0);
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::sqlite(Backend::Sqlite)]
#[tokio::test]
async fn test_sync_twice_is_idempotent(#[case] backend: Backend) {
	let tree = AppTree::new()
		.app("shop")
		.json_fixture(
			"shop",
			"custom_field.json",
			json!([custom_field("Item", "origin"), custom_field("Item", "grade")]),
		)
		.script("shop", "Item", "frappe.ui.form.on('Item', {});");
	let store = open_store(backend, tree.root()).await;
	let apps = tree.apps();
	let importer = FixtureImporter::new(store.as_ref(), &apps);

	let first = importer.sync(None).await.unwrap();
	assert_eq!(first.custom_fields_inserted(), 2);
	assert_eq!(first.apps[0].scripts.created, vec!["Item".to_string()]);

	let second = importer.sync(None).await.unwrap();
	assert_eq!(second.custom_fields_inserted(), 0);
	assert_eq!(second.files_skipped(), 1);
	assert_eq!(second.apps[0].scripts.updated, vec!["Item".to_string()]);

	assert_eq!(count(store.as_ref(), CUSTOM_FIELD).await, 2);
	assert_eq!(count(store.as_ref(), CUSTOM_SCRIPT).await, 1);
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::sqlite(Backend::Sqlite)]
#[tokio::test]
async fn test_existing_custom_field_skips_whole_file(#[case] backend: Backend) {
	let tree = AppTree::new().app("shop").json_fixture(
		"shop",
		"mixed.json",
		json!([
			custom_field("Item", "origin"),
			{"doctype": "Note", "name": "release-notes", "title": "Release notes"}
		]),
	);
	let store = open_store(backend, tree.root()).await;
	let existing = Document::from_value(custom_field("Item", "origin")).unwrap();
	store.insert(existing, &InsertPolicy::strict()).await.unwrap();
	let apps = tree.apps();

	let report = FixtureImporter::new(store.as_ref(), &apps)
		.sync(Some("shop"))
		.await
		.unwrap();

	let file = &report.apps[0].files[0];
	assert_eq!(file.outcome, FileOutcome::SkippedExisting);
	assert_eq!(file.custom_fields_existing, 1);
	assert_eq!(count(store.as_ref(), "Note").await, 0);
	assert_eq!(count(store.as_ref(), CUSTOM_FIELD).await, 1);
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::sqlite(Backend::Sqlite)]
#[tokio::test]
async fn test_new_custom_fields_inserted_after_existing_one(#[case] backend: Backend) {
	let tree = AppTree::new().app("shop").json_fixture(
		"shop",
		"mixed.json",
		json!([
			custom_field("Item", "origin"),
			custom_field("Item", "grade"),
			{"doctype": "Note", "name": "release-notes", "title": "Release notes"}
		]),
	);
	let store = open_store(backend, tree.root()).await;
	let existing = Document::from_value(custom_field("Item", "origin")).unwrap();
	store.insert(existing, &InsertPolicy::strict()).await.unwrap();
	let apps = tree.apps();

	let report = FixtureImporter::new(store.as_ref(), &apps)
		.sync(None)
		.await
		.unwrap();

	let file = &report.apps[0].files[0];
	assert_eq!(file.outcome, FileOutcome::SkippedExisting);
	assert_eq!(file.custom_fields_existing, 1);
	assert_eq!(file.custom_fields_inserted, 1);

	let names: Vec<_> = store
		.list(CUSTOM_FIELD, &Filters::new())
		.await
		.unwrap()
		.into_iter()
		.filter_map(|doc| doc.name)
		.collect();
	assert_eq!(names, vec!["Item-origin".to_string(), "Item-grade".to_string()]);
	assert_eq!(count(store.as_ref(), "Note").await, 0);
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::sqlite(Backend::Sqlite)]
#[tokio::test]
async fn test_failed_sync_leaves_nothing_to_commit(#[case] backend: Backend) {
	let tree = AppTree::new()
		.app("shop")
		.json_fixture("shop", "a_fields.json", json!([custom_field("Item", "origin")]))
		.fixture("shop", "broken.json", "[{\"doctype\": \"Note\",");
	let store = open_store(backend, tree.root()).await;
	let apps = tree.apps();

	let error = FixtureImporter::new(store.as_ref(), &apps)
		.sync(None)
		.await
		.unwrap_err();
	assert!(matches!(error.root(), FixtureError::Parse { .. }));

	store.commit().await.unwrap();
	assert_eq!(count(store.as_ref(), CUSTOM_FIELD).await, 0);
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::sqlite(Backend::Sqlite)]
#[tokio::test]
async fn test_standard_field_counts_as_existing(#[case] backend: Backend) {
	let tree = AppTree::new().app("shop").json_fixture(
		"shop",
		"custom_field.json",
		json!([custom_field("Item", "item_name")]),
	);
	let store = open_store(backend, tree.root()).await;
	store
		.insert(
			Document::new(DOCFIELD)
				.with_field("fieldname", "item_name")
				.with_field("parent", "Item")
				.with_field("parenttype", DOCTYPE)
				.with_field("parentfield", "fields"),
			&InsertPolicy::strict(),
		)
		.await
		.unwrap();
	let apps = tree.apps();

	let report = FixtureImporter::new(store.as_ref(), &apps)
		.sync(None)
		.await
		.unwrap();

	assert_eq!(report.files_skipped(), 1);
	assert_eq!(count(store.as_ref(), CUSTOM_FIELD).await, 0);
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::sqlite(Backend::Sqlite)]
#[tokio::test]
async fn test_custom_script_created_then_updated(#[case] backend: Backend) {
	let tree = AppTree::new()
		.app("shop")
		.script("shop", "Sales Order", "// v1");
	let store = open_store(backend, tree.root()).await;
	let apps = tree.apps();
	let importer = FixtureImporter::new(store.as_ref(), &apps);

	importer.sync(None).await.unwrap();
	let filters = Filters::new().with_eq("dt", "Sales Order");
	let scripts = store.list(CUSTOM_SCRIPT, &filters).await.unwrap();
	assert_eq!(scripts.len(), 1);
	assert_eq!(scripts[0].get_str("script"), Some("// v1"));
	assert_eq!(scripts[0].get_str("script_type"), Some("Client"));

	let tree = tree.script("shop", "Sales Order", "// v2");
	let apps = tree.apps();
	FixtureImporter::new(store.as_ref(), &apps)
		.sync(None)
		.await
		.unwrap();

	let scripts = store.list(CUSTOM_SCRIPT, &filters).await.unwrap();
	assert_eq!(scripts.len(), 1);
	assert_eq!(scripts[0].get_str("script"), Some("// v2"));
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::sqlite(Backend::Sqlite)]
#[tokio::test]
async fn test_bulk_import_json_and_csv(#[case] backend: Backend) {
	let tree = AppTree::new()
		.app("shop")
		.json_fixture(
			"shop",
			"note.json",
			json!([{"doctype": "Note", "name": "welcome", "title": "Welcome"}]),
		)
		.fixture(
			"shop",
			"topic.csv",
			"doctype,name,title\nTopic,billing,Billing\nTopic,shipping,Shipping\n",
		)
		.fixture("shop", "README.md", "not a fixture");
	let store = open_store(backend, tree.root()).await;
	let apps = tree.apps();

	let report = FixtureImporter::new(store.as_ref(), &apps)
		.sync(None)
		.await
		.unwrap();

	assert_eq!(report.documents_imported(), 3);
	let outcomes: Vec<_> = report.apps[0]
		.files
		.iter()
		.map(|f| (f.file.as_str(), &f.outcome))
		.collect();
	assert_eq!(outcomes[0], ("README.md", &FileOutcome::Unsupported));
	assert_eq!(count(store.as_ref(), "Topic").await, 2);

	let second = FixtureImporter::new(store.as_ref(), &apps)
		.sync(None)
		.await
		.unwrap();
	assert_eq!(second.documents_imported(), 3);
	assert_eq!(count(store.as_ref(), "Note").await, 1);
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::sqlite(Backend::Sqlite)]
#[tokio::test]
async fn test_malformed_fixture_is_handed_to_bulk_import(#[case] backend: Backend) {
	let tree = AppTree::new()
		.app("shop")
		.fixture("shop", "broken.json", "[{\"doctype\": \"Note\",");
	let store = open_store(backend, tree.root()).await;
	let apps = tree.apps();

	let error = FixtureImporter::new(store.as_ref(), &apps)
		.sync(None)
		.await
		.unwrap_err();

	assert!(matches!(error, FixtureError::Operation { .. }));
	assert!(error.to_string().contains("broken.json"));
	assert!(matches!(error.root(), FixtureError::Parse { .. }));
}

#[rstest]
#[tokio::test]
async fn test_scan_error_is_reported() {
	let tree = AppTree::new()
		.app("shop")
		.fixture("shop", "single.json", r#"{"doctype": "Note", "name": "solo"}"#);
	let store = open_store(Backend::Memory, tree.root()).await;
	let apps = tree.apps();

	let report = FixtureImporter::new(store.as_ref(), &apps)
		.sync(None)
		.await
		.unwrap();

	assert_eq!(report.scan_errors(), 1);
	assert_eq!(count(store.as_ref(), "Note").await, 1);
}

#[rstest]
#[tokio::test]
async fn test_sync_single_app() {
	let tree = AppTree::new()
		.app("first")
		.json_fixture("first", "note.json", json!([{"doctype": "Note", "name": "a"}]))
		.app("second")
		.json_fixture("second", "note.json", json!([{"doctype": "Note", "name": "b"}]));
	let store = open_store(Backend::Memory, tree.root()).await;
	let apps = tree.apps();
	let importer = FixtureImporter::new(store.as_ref(), &apps);

	let report = importer.sync(Some("second")).await.unwrap();
	assert_eq!(report.apps.len(), 1);
	assert_eq!(report.apps[0].app, "second");

	let notes = store.list("Note", &Filters::new()).await.unwrap();
	assert_eq!(notes.len(), 1);
	assert_eq!(notes[0].name.as_deref(), Some("b"));

	assert!(matches!(
		importer.sync(Some("third")).await,
		Err(FixtureError::App(_))
	));
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::sqlite(Backend::Sqlite)]
#[tokio::test]
async fn test_export_applies_filters(#[case] backend: Backend) {
	let tree = AppTree::new()
		.app("shop")
		.hook(FixtureHook::filtered("Note", json!({"public": 1})))
		.hook(FixtureHook::Entry {
			doctype: None,
			dt: Some("Custom Field".to_string()),
			filters: None,
		});
	let store = open_store(backend, tree.root()).await;
	for (name, public) in [("draft", 0), ("welcome", 1), ("faq", 1)] {
		store
			.insert(
				Document::new("Note").with_name(name).with_field("public", public),
				&InsertPolicy::strict(),
			)
			.await
			.unwrap();
	}
	let apps = tree.apps();

	let report = FixtureExporter::new(store.as_ref(), &apps)
		.export_fixtures()
		.await
		.unwrap();

	assert_eq!(report.files.len(), 2);
	let fixtures = tree.app_path("shop").join("fixtures");
	let notes: Value =
		serde_json::from_str(&std::fs::read_to_string(fixtures.join("note.json")).unwrap()).unwrap();
	assert_eq!(
		notes,
		json!([
			{"doctype": "Note", "name": "faq", "public": 1},
			{"doctype": "Note", "name": "welcome", "public": 1}
		])
	);
	assert!(fixtures.join("custom_field.json").is_file());
}

#[rstest]
#[tokio::test]
async fn test_export_then_sync_round_trip() {
	let tree = AppTree::new()
		.app("shop")
		.hook(FixtureHook::doctype("Custom Field"));
	let source = open_store(Backend::Memory, tree.root()).await;
	source
		.insert(
			Document::from_value(custom_field("Item", "origin")).unwrap(),
			&InsertPolicy::strict(),
		)
		.await
		.unwrap();
	let apps = tree.apps();
	FixtureExporter::new(source.as_ref(), &apps)
		.export_fixtures()
		.await
		.unwrap();

	let target = open_store(Backend::Memory, tree.root()).await;
	let report = FixtureImporter::new(target.as_ref(), &apps)
		.sync(None)
		.await
		.unwrap();

	assert_eq!(report.custom_fields_inserted(), 1);
	let fields = target.list(CUSTOM_FIELD, &Filters::new()).await.unwrap();
	assert_eq!(fields.len(), 1);
	assert_eq!(fields[0].name.as_deref(), Some("Item-origin"));
}
