//! Database-backed document store.
//!
//! Documents are persisted as JSON text in a single table, keyed by
//! `(doctype, name)`. Any database supported by sqlx's `Any` driver works;
//! statements are rendered with sea-query's SQLite dialect, which the
//! default deployment (a site SQLite file) expects.
//!
//! ## Database Schema
//!
//! ```sql
//! CREATE TABLE docseed_documents (
//!     doctype VARCHAR(140) NOT NULL,
//!     name VARCHAR(255) NOT NULL,
//!     data TEXT NOT NULL,
//!     modified TEXT NOT NULL
//! );
//! CREATE UNIQUE INDEX idx_docseed_documents_key ON docseed_documents(doctype, name);
//! ```
//!
//! Writes run inside a transaction that is opened by the first statement and
//! closed by [`commit`](DocumentStore::commit) or
//! [`rollback`](DocumentStore::rollback). Reads go through the same
//! transaction, so they observe uncommitted writes.
//!
//! Equality filters on plain fields compared with non-numeric strings are
//! evaluated by the database through `json_extract`; every other condition
//! is checked on the loaded documents.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_query::{
	Alias, ColumnDef, Expr, ExprTrait, Index, Order, Query, SqliteQueryBuilder, Table,
};
use sqlx::any::AnyRow;
use serde_json::Value;
use sqlx::{Any, AnyPool, Row, Transaction};
use tokio::sync::Mutex;

use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::filters::{Filters, Operator};
use crate::meta::MetaRegistry;
use crate::policy::InsertPolicy;
use crate::store::{DocumentStore, Lookup, assign_name};

const TABLE: &str = "docseed_documents";

/// Document store backed by a SQL database.
///
/// # Example
///
/// ```rust,no_run
/// use docseed_store::{MetaRegistry, SqlStore};
///
/// # async fn example() {
/// let store = SqlStore::connect("sqlite://site.db?mode=rwc", MetaRegistry::core())
///     .await
///     .unwrap();
/// store.create_table().await.unwrap();
/// # }
/// # tokio::runtime::Runtime::new().unwrap().block_on(example());
/// ```
pub struct SqlStore {
	pool: Arc<AnyPool>,
	meta: MetaRegistry,
	tx: Mutex<Option<Transaction<'static, Any>>>,
}

impl SqlStore {
	/// Connects to the database at `database_url`.
	pub async fn connect(database_url: &str, meta: MetaRegistry) -> StoreResult<Self> {
		sqlx::any::install_default_drivers();
		let pool = AnyPool::connect(database_url)
			.await
			.map_err(|e| StoreError::Database(format!("Database connection error: {}", e)))?;
		Ok(Self::from_pool(Arc::new(pool), meta))
	}

	/// Creates a store over an existing pool.
	pub fn from_pool(pool: Arc<AnyPool>, meta: MetaRegistry) -> Self {
		Self {
			pool,
			meta,
			tx: Mutex::new(None),
		}
	}

	/// Creates the documents table if it does not exist.
	pub async fn create_table(&self) -> StoreResult<()> {
		let stmt = Table::create()
			.table(Alias::new(TABLE))
			.if_not_exists()
			.col(ColumnDef::new(Alias::new("doctype")).string_len(140).not_null())
			.col(ColumnDef::new(Alias::new("name")).string_len(255).not_null())
			.col(ColumnDef::new(Alias::new("data")).text().not_null())
			.col(ColumnDef::new(Alias::new("modified")).text().not_null())
			.to_owned();
		let sql = stmt.to_string(SqliteQueryBuilder);

		sqlx::query(&sql)
			.execute(&*self.pool)
			.await
			.map_err(|e| StoreError::Database(format!("Failed to create table: {}", e)))?;

		let idx = Index::create()
			.if_not_exists()
			.name("idx_docseed_documents_key")
			.table(Alias::new(TABLE))
			.col(Alias::new("doctype"))
			.col(Alias::new("name"))
			.unique()
			.to_owned();
		let sql = idx.to_string(SqliteQueryBuilder);

		sqlx::query(&sql)
			.execute(&*self.pool)
			.await
			.map_err(|e| StoreError::Database(format!("Failed to create index: {}", e)))?;

		Ok(())
	}

	async fn execute(&self, sql: &str, action: &str) -> StoreResult<u64> {
		let mut slot = self.tx.lock().await;
		let tx = self.transaction(&mut slot).await?;
		let result = sqlx::query(sql)
			.execute(&mut **tx)
			.await
			.map_err(|e| StoreError::Database(format!("Failed to {}: {}", action, e)))?;
		Ok(result.rows_affected())
	}

	async fn fetch(&self, sql: &str, action: &str) -> StoreResult<Vec<AnyRow>> {
		let mut slot = self.tx.lock().await;
		let tx = self.transaction(&mut slot).await?;
		sqlx::query(sql)
			.fetch_all(&mut **tx)
			.await
			.map_err(|e| StoreError::Database(format!("Failed to {}: {}", action, e)))
	}

	async fn transaction<'s>(
		&self,
		slot: &'s mut Option<Transaction<'static, Any>>,
	) -> StoreResult<&'s mut Transaction<'static, Any>> {
		let tx = match slot.take() {
			Some(tx) => tx,
			None => self
				.pool
				.begin()
				.await
				.map_err(|e| StoreError::Database(format!("Failed to begin transaction: {}", e)))?,
		};
		Ok(slot.insert(tx))
	}

	async fn load(
		&self,
		doctype: &str,
		name: Option<&str>,
		filters: Option<&Filters>,
	) -> StoreResult<Vec<Document>> {
		let sql = {
			let mut stmt = Query::select();
			stmt.column(Alias::new("data"))
				.from(Alias::new(TABLE))
				.and_where(Expr::col(Alias::new("doctype")).eq(doctype))
				.order_by(Alias::new("rowid"), Order::Asc);
			if let Some(name) = name {
				stmt.and_where(Expr::col(Alias::new("name")).eq(name));
			}
			for (field, value) in filters.map(indexed_conditions).unwrap_or_default() {
				stmt.and_where(
					Expr::cust_with_values("json_extract(\"data\", ?)", [format!("$.{}", field)])
						.eq(value),
				);
			}
			stmt.to_string(SqliteQueryBuilder)
		};

		let rows = self.fetch(&sql, "load documents").await?;
		rows.iter()
			.map(|row| {
				let data: String = row
					.try_get("data")
					.map_err(|e| StoreError::Database(format!("Invalid data column: {}", e)))?;
				Ok(serde_json::from_str(&data)?)
			})
			.collect()
	}

	async fn name_exists(&self, doctype: &str, name: &str) -> StoreResult<bool> {
		let stmt = Query::select()
			.expr(Expr::value(1))
			.from(Alias::new(TABLE))
			.and_where(Expr::col(Alias::new("doctype")).eq(doctype))
			.and_where(Expr::col(Alias::new("name")).eq(name))
			.to_owned();
		let sql = stmt.to_string(SqliteQueryBuilder);

		Ok(!self.fetch(&sql, "check document existence").await?.is_empty())
	}

	async fn check_links(&self, doc: &Document, policy: &InsertPolicy) -> StoreResult<()> {
		for (field, target, value) in self.meta.required_links(doc, policy) {
			if !self.name_exists(target, value).await? {
				return Err(StoreError::LinkMissing {
					doctype: doc.doctype.clone(),
					field: field.to_string(),
					target: target.to_string(),
					value: value.to_string(),
				});
			}
		}
		Ok(())
	}
}

#[async_trait]
impl DocumentStore for SqlStore {
	fn meta(&self) -> &MetaRegistry {
		&self.meta
	}

	async fn exists(&self, doctype: &str, filters: &Filters) -> StoreResult<bool> {
		Ok(self
			.load(doctype, None, Some(filters))
			.await?
			.iter()
			.any(|doc| filters.matches(doc)))
	}

	async fn get(&self, doctype: &str, lookup: &Lookup) -> StoreResult<Option<Document>> {
		let found = match lookup {
			Lookup::Name(name) => self.load(doctype, Some(name), None).await?.into_iter().next(),
			Lookup::Filters(filters) => self
				.load(doctype, None, Some(filters))
				.await?
				.into_iter()
				.find(|doc| filters.matches(doc)),
		};
		Ok(found)
	}

	async fn list(&self, doctype: &str, filters: &Filters) -> StoreResult<Vec<Document>> {
		Ok(self
			.load(doctype, None, Some(filters))
			.await?
			.into_iter()
			.filter(|doc| filters.matches(doc))
			.collect())
	}

	async fn insert(&self, mut doc: Document, policy: &InsertPolicy) -> StoreResult<Document> {
		self.meta.check(&doc, policy)?;
		self.check_links(&doc, policy).await?;

		let name = assign_name(&self.meta, &doc);
		if self.name_exists(&doc.doctype, &name).await? {
			return Err(StoreError::Duplicate {
				doctype: doc.doctype,
				name,
			});
		}
		doc.name = Some(name.clone());
		let data = serde_json::to_string(&doc)?;

		let stmt = Query::insert()
			.into_table(Alias::new(TABLE))
			.columns([
				Alias::new("doctype"),
				Alias::new("name"),
				Alias::new("data"),
				Alias::new("modified"),
			])
			.values(
				[
					Expr::val(doc.doctype.as_str()),
					Expr::val(name.as_str()),
					Expr::val(data),
					Expr::val(Utc::now().to_rfc3339()),
				]
				.into_iter()
				.collect::<Vec<Expr>>(),
			)
			.map_err(|e| StoreError::Database(format!("Failed to build insert: {}", e)))?
			.to_owned();
		let sql = stmt.to_string(SqliteQueryBuilder);

		self.execute(&sql, "insert document").await?;
		tracing::debug!("Inserted {} {}", doc.doctype, name);
		Ok(doc)
	}

	async fn save(&self, doc: Document, policy: &InsertPolicy) -> StoreResult<Document> {
		let name = doc.name.clone().ok_or_else(|| {
			StoreError::Validation(format!("cannot save unnamed {}", doc.doctype))
		})?;
		self.meta.check(&doc, policy)?;
		self.check_links(&doc, policy).await?;
		let data = serde_json::to_string(&doc)?;

		let stmt = Query::update()
			.table(Alias::new(TABLE))
			.value(Alias::new("data"), Expr::val(data))
			.value(Alias::new("modified"), Expr::val(Utc::now().to_rfc3339()))
			.and_where(Expr::col(Alias::new("doctype")).eq(doc.doctype.as_str()))
			.and_where(Expr::col(Alias::new("name")).eq(name.as_str()))
			.to_owned();
		let sql = stmt.to_string(SqliteQueryBuilder);

		if self.execute(&sql, "save document").await? == 0 {
			return Err(StoreError::NotFound {
				doctype: doc.doctype.clone(),
				lookup: name,
			});
		}
		tracing::debug!("Saved {} {}", doc.doctype, name);
		Ok(doc)
	}

	async fn commit(&self) -> StoreResult<()> {
		let mut slot = self.tx.lock().await;
		if let Some(tx) = slot.take() {
			tx.commit()
				.await
				.map_err(|e| StoreError::Database(format!("Failed to commit: {}", e)))?;
		}
		Ok(())
	}

	async fn rollback(&self) -> StoreResult<()> {
		let mut slot = self.tx.lock().await;
		if let Some(tx) = slot.take() {
			tx.rollback()
				.await
				.map_err(|e| StoreError::Database(format!("Failed to roll back: {}", e)))?;
			tracing::debug!("Rolled back staged writes");
		}
		Ok(())
	}
}

/// Equality conditions the database evaluates exactly like
/// [`Filters::matches`]: a plain field name compared with a non-empty string
/// that does not read as a number. Numeric and empty strings take part in
/// loose comparisons, so they stay in Rust.
fn indexed_conditions(filters: &Filters) -> Vec<(&str, &str)> {
	filters
		.conditions()
		.iter()
		.filter(|c| c.op == Operator::Eq)
		.filter(|c| {
			!c.field.is_empty()
				&& c.field
					.chars()
					.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
		})
		.filter_map(|c| match &c.value {
			Value::String(value) if !value.is_empty() && value.trim().parse::<f64>().is_err() => {
				Some((c.field.as_str(), value.as_str()))
			}
			_ => None,
		})
		.collect()
}
