//! MySQL backend over an sqlx pool.
//!
//! The request cycle is synchronous, so every call blocks on the pool through
//! the runtime handle captured at construction. Calls must come from outside
//! the runtime's worker threads (for example from `spawn_blocking`).

use crate::backend::{DatabaseBackend, DatabaseConnection, QueryResult, Row};
use serde_json::Value;
use slys_conf::DatabaseSettings;
use slys_core::{Error, Result};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, MySqlPool, Row as SqlxRow, ValueRef};
use std::sync::Arc;
use tokio::runtime::Handle;

/// MySQL database backend
pub struct MySqlBackend {
	pool: MySqlPool,
	runtime: Handle,
}

impl MySqlBackend {
	pub fn new(pool: MySqlPool, runtime: Handle) -> Self {
		Self { pool, runtime }
	}

	/// Create a backend whose pool connects on first use.
	pub fn connect_lazy(settings: &DatabaseSettings, runtime: Handle) -> Self {
		let options = MySqlConnectOptions::new()
			.host(&settings.host)
			.port(settings.port)
			.username(&settings.username)
			.password(&settings.password)
			.database(&settings.dbname);

		// Pool maintenance tasks are spawned on the given runtime
		let _guard = runtime.enter();
		let pool = MySqlPoolOptions::new()
			.max_connections(settings.max_connections)
			.connect_lazy_with(options);

		tracing::info!(
			host = %settings.host,
			port = settings.port,
			dbname = %settings.dbname,
			"configured MySQL pool"
		);

		Self::new(pool, runtime)
	}

	fn convert_row(mysql_row: &MySqlRow) -> Row {
		let mut row = Row::new();
		for (index, column) in mysql_row.columns().iter().enumerate() {
			let column_name = column.name().to_string();

			let is_null = mysql_row
				.try_get_raw(index)
				.map(|raw| raw.is_null())
				.unwrap_or(true);

			let value = if is_null {
				Value::Null
			} else if let Ok(value) = mysql_row.try_get::<i64, _>(index) {
				Value::from(value)
			} else if let Ok(value) = mysql_row.try_get::<u64, _>(index) {
				Value::from(value)
			} else if let Ok(value) = mysql_row.try_get::<f64, _>(index) {
				Value::from(value)
			} else if let Ok(value) = mysql_row.try_get::<String, _>(index) {
				Value::String(value)
			} else if let Ok(value) = mysql_row.try_get::<chrono::NaiveDateTime, _>(index) {
				datetime_value(value)
			} else if let Ok(value) = mysql_row.try_get::<chrono::NaiveDate, _>(index) {
				date_value(value)
			} else if let Ok(value) = mysql_row.try_get::<Vec<u8>, _>(index) {
				bytes_value(&value)
			} else {
				tracing::warn!(column = %column_name, "unsupported column type, reading as null");
				Value::Null
			};

			row.insert(column_name, value);
		}
		row
	}
}

impl DatabaseBackend for MySqlBackend {
	fn execute(&self, sql: &str) -> Result<QueryResult> {
		let result = self
			.runtime
			.block_on(sqlx::query(sql).execute(&self.pool))
			.map_err(persistence)?;

		Ok(QueryResult {
			rows_affected: result.rows_affected(),
			last_insert_id: insert_id(result.last_insert_id()),
		})
	}

	fn fetch_optional(&self, sql: &str) -> Result<Option<Row>> {
		let row = self
			.runtime
			.block_on(sqlx::query(sql).fetch_optional(&self.pool))
			.map_err(persistence)?;

		Ok(row.as_ref().map(Self::convert_row))
	}
}

impl DatabaseConnection {
	/// Connect to MySQL with the given settings.
	pub fn connect_mysql(settings: &DatabaseSettings, runtime: Handle) -> Self {
		Self::new(Arc::new(MySqlBackend::connect_lazy(settings, runtime)))
	}
}

fn persistence(err: sqlx::Error) -> Error {
	Error::Persistence(err.to_string())
}

/// MySQL reports 0 when a statement generated no auto-increment id.
fn insert_id(last_insert_id: u64) -> Option<u64> {
	match last_insert_id {
		0 => None,
		id => Some(id),
	}
}

fn datetime_value(value: chrono::NaiveDateTime) -> Value {
	Value::String(value.format("%Y-%m-%d %H:%M:%S").to_string())
}

fn date_value(value: chrono::NaiveDate) -> Value {
	Value::String(value.format("%Y-%m-%d").to_string())
}

/// Binary and unknown text columns are read as lossy UTF-8.
fn bytes_value(bytes: &[u8]) -> Value {
	Value::String(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{NaiveDate, NaiveDateTime};
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(0, None)]
	#[case(1, Some(1))]
	#[case(42, Some(42))]
	fn test_insert_id(#[case] raw: u64, #[case] expected: Option<u64>) {
		assert_eq!(insert_id(raw), expected);
	}

	#[rstest]
	fn test_date_columns_use_mysql_format() {
		let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
		let datetime: NaiveDateTime = date.and_hms_opt(8, 5, 0).unwrap();

		assert_eq!(date_value(date), json!("2024-02-29"));
		assert_eq!(datetime_value(datetime), json!("2024-02-29 08:05:00"));
	}

	#[rstest]
	#[case(b"caf\xc3\xa9".as_slice(), "café")]
	#[case(b"ab\xffc".as_slice(), "ab\u{fffd}c")]
	fn test_bytes_value_is_lossy_utf8(#[case] bytes: &[u8], #[case] expected: &str) {
		assert_eq!(bytes_value(bytes), json!(expected));
	}

	#[rstest]
	fn test_driver_errors_map_to_persistence() {
		let err = persistence(sqlx::Error::RowNotFound);

		assert!(matches!(err, Error::Persistence(message) if message.contains("no rows")));
	}
}
