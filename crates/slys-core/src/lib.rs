//! # Slys Core
//!
//! Types shared by every Slys crate.
//!
//! - [`exception`]: the framework-wide error taxonomy and `Result` alias
//! - [`case`]: case conversion used for controller, action and table names

pub mod case;
pub mod exception;

pub use case::{to_camel_case, to_snake_case};
pub use exception::{Error, Result};
