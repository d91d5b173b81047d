//! Database backend abstraction.

use indexmap::IndexMap;
use serde_json::Value;
use slys_core::Result;
use std::sync::Arc;

/// A fetched row, columns in select order.
pub type Row = IndexMap<String, Value>;

/// Outcome of a statement that returns no rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryResult {
	pub rows_affected: u64,
	/// Auto-increment id generated by an `INSERT`, if any.
	pub last_insert_id: Option<u64>,
}

/// Executes SQL text. Calls block until the statement finished.
pub trait DatabaseBackend: Send + Sync {
	fn execute(&self, sql: &str) -> Result<QueryResult>;

	fn fetch_optional(&self, sql: &str) -> Result<Option<Row>>;
}

/// Database connection wrapper
#[derive(Clone)]
pub struct DatabaseConnection {
	backend: Arc<dyn DatabaseBackend>,
}

impl DatabaseConnection {
	pub fn new(backend: Arc<dyn DatabaseBackend>) -> Self {
		Self { backend }
	}

	pub fn backend(&self) -> Arc<dyn DatabaseBackend> {
		self.backend.clone()
	}

	pub fn execute(&self, sql: &str) -> Result<QueryResult> {
		tracing::debug!(sql = %sql, "execute");
		self.backend.execute(sql)
	}

	pub fn fetch_optional(&self, sql: &str) -> Result<Option<Row>> {
		tracing::debug!(sql = %sql, "fetch");
		self.backend.fetch_optional(sql)
	}
}

impl std::fmt::Debug for DatabaseConnection {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DatabaseConnection").finish_non_exhaustive()
	}
}
