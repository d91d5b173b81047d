//! Entity integration tests
//!
//! Exercises typed entities against an in-memory backend that records SQL.

use indexmap::IndexMap;
use parking_lot::Mutex;
use rstest::*;
use serde_json::{Value, json};
use slys_core::{Error, Result};
use slys_db::{DatabaseBackend, DatabaseConnection, Entity, QueryResult, Record, Row};
use std::sync::Arc;

/// Serves rows keyed by the exact SELECT statement.
#[derive(Default)]
struct FakeMySql {
	rows: IndexMap<String, Row>,
	log: Mutex<Vec<String>>,
	next_id: Mutex<u64>,
}

impl DatabaseBackend for FakeMySql {
	fn execute(&self, sql: &str) -> Result<QueryResult> {
		self.log.lock().push(sql.to_string());
		let mut next_id = self.next_id.lock();
		*next_id += 1;
		Ok(QueryResult {
			rows_affected: 1,
			last_insert_id: sql.starts_with("INSERT").then_some(*next_id),
		})
	}

	fn fetch_optional(&self, sql: &str) -> Result<Option<Row>> {
		self.log.lock().push(sql.to_string());
		Ok(self.rows.get(sql).cloned())
	}
}

struct ProductCategory {
	record: Record,
}

impl Entity for ProductCategory {
	fn from_record(record: Record) -> Self {
		Self { record }
	}

	fn record(&self) -> &Record {
		&self.record
	}

	fn record_mut(&mut self) -> &mut Record {
		&mut self.record
	}
}

impl ProductCategory {
	fn name(&self) -> Option<&str> {
		self.record.get("name").as_str()
	}

	fn set_name(&mut self, name: &str) {
		self.record.set("name", name);
	}
}

#[fixture]
fn backend() -> Arc<FakeMySql> {
	let mut rows = IndexMap::new();
	rows.insert(
		"SELECT * FROM `product_category` WHERE `id` = 5 LIMIT 1".to_string(),
		[("id", json!(5)), ("name", json!("Books")), ("position", json!(2))]
			.into_iter()
			.map(|(k, v)| (k.to_string(), v))
			.collect::<Row>(),
	);
	Arc::new(FakeMySql {
		rows,
		..Default::default()
	})
}

#[rstest]
fn test_find_mutate_save(backend: Arc<FakeMySql>) {
	let db = DatabaseConnection::new(backend.clone());

	let mut category = ProductCategory::find(&db, 5).unwrap().unwrap();
	assert_eq!(category.name(), Some("Books"));

	category.set_name("Comics");
	category.save(&db).unwrap();
	category.save(&db).unwrap();

	let log = backend.log.lock();
	assert_eq!(log.len(), 2);
	assert_eq!(
		log[1],
		"UPDATE `product_category` SET `name` = 'Comics' WHERE `id` = 5"
	);
}

#[rstest]
fn test_find_missing_row(backend: Arc<FakeMySql>) {
	let db = DatabaseConnection::new(backend);
	assert!(ProductCategory::find(&db, 6).unwrap().is_none());
}

#[rstest]
fn test_create_insert_then_delete(backend: Arc<FakeMySql>) {
	let db = DatabaseConnection::new(backend.clone());

	let mut category = ProductCategory::create();
	category.set_name("Games");
	category.save(&db).unwrap();

	assert_eq!(category.record().get("id"), &Value::from(1u64));

	category.delete(&db).unwrap();
	assert!(matches!(category.delete(&db), Err(Error::Persistence(_))));

	let log = backend.log.lock();
	assert_eq!(
		*log,
		vec![
			"INSERT INTO `product_category` SET `name` = 'Games'".to_string(),
			"DELETE FROM `product_category` WHERE `id` = 1".to_string(),
		]
	);
}
