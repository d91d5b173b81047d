//! Typed entities backed by a [`Record`].

use crate::backend::DatabaseConnection;
use crate::record::{Key, Record};
use slys_core::{Result, to_snake_case};

/// Table name derived from a type name: the last path segment in snake_case.
///
/// # Examples
///
/// ```
/// use slys_db::entity::table_name_for;
///
/// struct ProductCategory;
/// assert_eq!(table_name_for::<ProductCategory>(), "product_category");
/// ```
pub fn table_name_for<T: ?Sized>() -> String {
	let full = std::any::type_name::<T>();
	let without_generics = full.split('<').next().unwrap_or(full);
	let name = without_generics
		.rsplit("::")
		.next()
		.unwrap_or(without_generics);
	to_snake_case(name)
}

/// A typed wrapper around a [`Record`].
///
/// Implementors provide access to the record and typed accessors on top of
/// [`Record::get`] / [`Record::set`].
///
/// ```
/// use slys_db::{Entity, Record};
///
/// struct OrderItem {
///     record: Record,
/// }
///
/// impl Entity for OrderItem {
///     fn from_record(record: Record) -> Self {
///         Self { record }
///     }
///     fn record(&self) -> &Record {
///         &self.record
///     }
///     fn record_mut(&mut self) -> &mut Record {
///         &mut self.record
///     }
/// }
///
/// impl OrderItem {
///     fn quantity(&self) -> i64 {
///         self.record.get("quantity").as_i64().unwrap_or(0)
///     }
///     fn set_quantity(&mut self, quantity: i64) {
///         self.record.set("quantity", quantity);
///     }
/// }
///
/// let mut item = OrderItem::create();
/// item.set_quantity(3);
/// assert_eq!(item.quantity(), 3);
/// assert_eq!(item.record().table(), "order_item");
/// ```
pub trait Entity: Sized {
	fn from_record(record: Record) -> Self;

	fn record(&self) -> &Record;

	fn record_mut(&mut self) -> &mut Record;

	fn table_name() -> String {
		table_name_for::<Self>()
	}

	fn primary_key() -> Vec<String> {
		vec!["id".to_string()]
	}

	/// A new, unsaved entity.
	fn create() -> Self {
		Self::from_record(Record::new(Self::table_name(), Self::primary_key()))
	}

	/// Load an entity by key, `None` when no row matches.
	fn find(db: &DatabaseConnection, key: impl Into<Key>) -> Result<Option<Self>> {
		let mut entity = Self::create();
		if entity.record_mut().load(db, key)? {
			Ok(Some(entity))
		} else {
			Ok(None)
		}
	}

	fn save(&mut self, db: &DatabaseConnection) -> Result<()> {
		self.record_mut().save(db)
	}

	fn delete(&mut self, db: &DatabaseConnection) -> Result<()> {
		self.record_mut().delete(db)
	}
}
