//! Active-record rows.

use crate::backend::DatabaseConnection;
use crate::sql::{assignments, quote_ident};
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use slys_core::{Error, Result};

static NULL: Value = Value::Null;

/// Primary key values, in primary-key column order.
///
/// # Examples
///
/// ```
/// use slys_db::Key;
/// use serde_json::json;
///
/// let single = Key::from(5);
/// let composite = Key::from(vec![json!(1), json!("en")]);
/// assert_eq!(single.values().len(), 1);
/// assert_eq!(composite.values().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Key(Vec<Value>);

impl Key {
	pub fn values(&self) -> &[Value] {
		&self.0
	}
}

impl From<i64> for Key {
	fn from(id: i64) -> Self {
		Self(vec![Value::from(id)])
	}
}

impl From<u64> for Key {
	fn from(id: u64) -> Self {
		Self(vec![Value::from(id)])
	}
}

impl From<i32> for Key {
	fn from(id: i32) -> Self {
		Self(vec![Value::from(id)])
	}
}

impl From<&str> for Key {
	fn from(id: &str) -> Self {
		Self(vec![Value::from(id)])
	}
}

impl From<String> for Key {
	fn from(id: String) -> Self {
		Self(vec![Value::from(id)])
	}
}

impl From<Value> for Key {
	fn from(id: Value) -> Self {
		Self(vec![id])
	}
}

impl From<Vec<Value>> for Key {
	fn from(values: Vec<Value>) -> Self {
		Self(values)
	}
}

/// A single table row tracked for changes.
///
/// Columns changed through [`Record::set`] are dirty until the row is saved or
/// reloaded. [`Record::save`] writes only dirty non-key columns.
///
/// The key a row was loaded or inserted with is kept aside: updates and
/// deletes always target that row, and key columns changed in memory are
/// reset to it on the next save.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
	table: String,
	primary_key: Vec<String>,
	values: IndexMap<String, Value>,
	dirty: IndexSet<String>,
	loaded_key: Option<Vec<Value>>,
}

impl Record {
	pub fn new(table: impl Into<String>, primary_key: Vec<String>) -> Self {
		Self {
			table: table.into(),
			primary_key,
			values: IndexMap::new(),
			dirty: IndexSet::new(),
			loaded_key: None,
		}
	}

	pub fn table(&self) -> &str {
		&self.table
	}

	pub fn primary_key(&self) -> &[String] {
		&self.primary_key
	}

	/// Column value, `null` when the column was never set.
	pub fn get(&self, column: &str) -> &Value {
		self.values.get(column).unwrap_or(&NULL)
	}

	/// Set a column value. The column becomes dirty if the value changed.
	pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
		let column = column.into();
		let value = value.into();

		if self.values.get(&column) == Some(&value) {
			return;
		}

		self.dirty.insert(column.clone());
		self.values.insert(column, value);
	}

	/// Set several columns at once.
	pub fn set_values<I, K>(&mut self, values: I)
	where
		I: IntoIterator<Item = (K, Value)>,
		K: Into<String>,
	{
		for (column, value) in values {
			self.set(column, value);
		}
	}

	pub fn values(&self) -> &IndexMap<String, Value> {
		&self.values
	}

	pub fn is_dirty(&self) -> bool {
		!self.dirty.is_empty()
	}

	pub fn dirty_columns(&self) -> impl Iterator<Item = &str> {
		self.dirty.iter().map(String::as_str)
	}

	/// `true` once the row was read from or written to the database.
	pub fn was_loaded(&self) -> bool {
		self.loaded_key.is_some()
	}

	/// Load the row with the given key.
	///
	/// Returns whether a row was found. On a miss the record is left empty and
	/// unloaded. The dirty set is cleared either way.
	pub fn load(&mut self, db: &DatabaseConnection, key: impl Into<Key>) -> Result<bool> {
		let key = key.into();
		if key.values().len() != self.primary_key.len() {
			return Err(Error::Persistence(format!(
				"`{}` has {} primary key column(s), got {} value(s)",
				self.table,
				self.primary_key.len(),
				key.values().len()
			)));
		}

		let condition = assignments(
			self.primary_key
				.iter()
				.map(String::as_str)
				.zip(key.values()),
			" AND ",
		);
		let query = format!(
			"SELECT * FROM {} WHERE {} LIMIT 1",
			quote_ident(&self.table),
			condition
		);

		let row = db.fetch_optional(&query)?;
		self.dirty.clear();

		match row {
			Some(row) => {
				self.values = row;
				self.loaded_key = Some(self.key_values());
				Ok(true)
			}
			None => {
				self.values.clear();
				self.loaded_key = None;
				Ok(false)
			}
		}
	}

	/// Persist dirty columns.
	///
	/// A loaded row is updated by its key; anything else is inserted. Saving a
	/// loaded, clean row does nothing.
	pub fn save(&mut self, db: &DatabaseConnection) -> Result<()> {
		let loaded = self.was_loaded();

		if loaded && self.dirty.iter().all(|column| self.primary_key.contains(column)) {
			self.restore_key();
			self.dirty.clear();
			return Ok(());
		}

		let query = if loaded {
			let changed = self
				.dirty
				.iter()
				.filter(|column| !self.primary_key.contains(*column))
				.map(|column| (column.as_str(), self.get(column)));
			format!(
				"UPDATE {} SET {} WHERE {}",
				quote_ident(&self.table),
				assignments(changed, ", "),
				self.where_clause()?
			)
		} else {
			if self.dirty.is_empty() {
				return Err(Error::Persistence(format!(
					"nothing to insert into `{}`",
					self.table
				)));
			}
			// New rows may carry explicit key values
			let inserted = self
				.dirty
				.iter()
				.map(|column| (column.as_str(), self.get(column)));
			format!(
				"INSERT INTO {} SET {}",
				quote_ident(&self.table),
				assignments(inserted, ", ")
			)
		};

		let result = db.execute(&query)?;

		if loaded {
			self.restore_key();
		} else {
			if let ([key], Some(id)) = (self.primary_key.as_slice(), result.last_insert_id)
				&& self.get(key).is_null()
			{
				self.values.insert(key.clone(), Value::from(id));
			}
			self.loaded_key = Some(self.key_values());
		}

		self.dirty.clear();
		Ok(())
	}

	/// Delete the row by its key.
	pub fn delete(&mut self, db: &DatabaseConnection) -> Result<()> {
		let query = format!(
			"DELETE FROM {} WHERE {}",
			quote_ident(&self.table),
			self.where_clause()?
		);

		db.execute(&query)?;
		self.loaded_key = None;
		Ok(())
	}

	/// `` `pk` = value [AND ...] `` over the key the row was loaded with.
	pub fn where_clause(&self) -> Result<String> {
		let key = self.loaded_key.as_ref().ok_or_else(|| {
			Error::Persistence(format!(
				"can not build a where clause for an unloaded `{}` row",
				self.table
			))
		})?;

		Ok(assignments(
			self.primary_key.iter().map(String::as_str).zip(key),
			" AND ",
		))
	}

	fn key_values(&self) -> Vec<Value> {
		self.primary_key
			.iter()
			.map(|column| self.get(column).clone())
			.collect()
	}

	/// Put the loaded key back into the key columns.
	fn restore_key(&mut self) {
		let Some(key) = &self.loaded_key else {
			return;
		};

		for (column, value) in self.primary_key.iter().zip(key) {
			if self.values.get(column) != Some(value) {
				tracing::warn!(
					table = %self.table,
					column = %column,
					"key columns of a loaded row are never written, change discarded"
				);
				self.values.insert(column.clone(), value.clone());
			}
		}
	}
}
