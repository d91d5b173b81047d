//! # Slys DB
//!
//! Row-oriented active-record persistence.
//!
//! A [`Record`] tracks the columns changed since it was loaded and writes only
//! those on [`Record::save`]. The [`Entity`] trait layers typed accessors
//! over a record. SQL goes through a [`DatabaseConnection`], which wraps any
//! [`DatabaseBackend`]; [`MySqlBackend`] is the bundled one.

pub mod backend;
pub mod entity;
pub mod mysql;
pub mod record;
pub mod sql;

pub use backend::{DatabaseBackend, DatabaseConnection, QueryResult, Row};
pub use entity::Entity;
pub use mysql::MySqlBackend;
pub use record::{Key, Record};
