//! Configuration sources for layered settings
//!
//! Each source produces a top-level map of values. Sources are merged in
//! priority order (environment variables > local file > global file > defaults).

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Error type for configuration sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Parse error: {0}")]
	Parse(String),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl From<SourceError> for slys_core::Error {
	fn from(err: SourceError) -> Self {
		slys_core::Error::Configuration(err.to_string())
	}
}

/// Environment variable configuration source
///
/// Only variables starting with the prefix are read. The remaining name is
/// lower-cased and split on `__` into nested keys, so `SLYS_DATABASE__HOST`
/// sets `database.host`.
pub struct EnvSource {
	prefix: String,
}

/// Keys whose environment value is a comma-separated list.
const LIST_KEYS: [&str; 2] = ["helpers", "plugins"];

impl EnvSource {
	/// Create a source reading variables that start with `prefix`
	///
	/// # Examples
	///
	/// ```
	/// use slys_conf::{ConfigSource, EnvSource};
	///
	/// let source = EnvSource::new("MYAPP_");
	/// assert_eq!(source.priority(), 100);
	/// ```
	pub fn new(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
		}
	}

	/// Load from an explicit set of variables instead of the process environment.
	pub fn load_from<I>(&self, vars: I) -> Result<IndexMap<String, Value>, SourceError>
	where
		I: IntoIterator<Item = (String, String)>,
	{
		let mut root = Map::new();

		for (key, value) in vars {
			let Some(clean_key) = key.strip_prefix(&self.prefix) else {
				continue;
			};
			let path: Vec<String> = clean_key
				.to_lowercase()
				.split("__")
				.map(str::to_string)
				.collect();
			if path.iter().any(String::is_empty) {
				return Err(SourceError::Parse(format!(
					"invalid environment variable name: {}",
					key
				)));
			}

			let parsed_value = if path.len() == 1 && LIST_KEYS.contains(&path[0].as_str()) {
				Value::Array(
					value
						.split(',')
						.map(str::trim)
						.filter(|s| !s.is_empty())
						.map(|s| Value::String(s.to_string()))
						.collect(),
				)
			} else {
				Value::String(value)
			};

			insert_path(&mut root, &path, parsed_value)?;
		}

		Ok(root.into_iter().collect())
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new("SLYS_")
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		self.load_from(std::env::vars())
	}

	fn priority(&self) -> u8 {
		100 // Highest priority
	}

	fn description(&self) -> String {
		format!("Environment variables (prefix: {})", self.prefix)
	}
}

fn insert_path(root: &mut Map<String, Value>, path: &[String], value: Value) -> Result<(), SourceError> {
	let (last, parents) = match path.split_last() {
		Some(split) => split,
		None => return Ok(()),
	};

	let mut current = root;
	for key in parents {
		let entry = current
			.entry(key.clone())
			.or_insert_with(|| Value::Object(Map::new()));
		current = entry.as_object_mut().ok_or_else(|| {
			SourceError::Parse(format!("`{}` is both a value and a table", key))
		})?;
	}
	current.insert(last.clone(), value);
	Ok(())
}

/// TOML file configuration source
///
/// A missing file yields no values.
pub struct TomlFileSource {
	path: PathBuf,
	priority: u8,
}

impl TomlFileSource {
	/// Create a new TOML file configuration source
	///
	/// # Examples
	///
	/// ```
	/// use slys_conf::{ConfigSource, TomlFileSource};
	///
	/// let global = TomlFileSource::new("config.toml");
	/// let local = TomlFileSource::new("local-config.toml").with_priority(60);
	/// assert!(local.priority() > global.priority());
	/// ```
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			priority: 50,
		}
	}

	pub fn with_priority(mut self, priority: u8) -> Self {
		self.priority = priority;
		self
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			tracing::debug!(path = %self.path.display(), "configuration file not found, skipping");
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let toml_value: toml::Table = toml::from_str(&content)?;

		// Convert TOML value to JSON value
		let json_value = serde_json::to_value(toml_value)?;

		match json_value {
			Value::Object(map) => Ok(map.into_iter().collect()),
			_ => Err(SourceError::Parse("Expected table at root".to_string())),
		}
	}

	fn priority(&self) -> u8 {
		self.priority
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// Default values configuration source
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	pub fn new() -> Self {
		Self {
			values: IndexMap::new(),
		}
	}

	/// Add a default value for a top-level key
	///
	/// # Examples
	///
	/// ```
	/// use slys_conf::DefaultSource;
	/// use serde_json::json;
	///
	/// let source = DefaultSource::new()
	///     .with_value("language", json!("de"));
	/// ```
	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}
}

impl Default for DefaultSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0 // Lowest priority
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}
