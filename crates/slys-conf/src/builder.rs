//! Merging configuration sources into [`Settings`].

use crate::settings::Settings;
use crate::sources::{ConfigSource, EnvSource, SourceError, TomlFileSource};
use serde_json::{Map, Value};
use std::path::Path;

/// Global configuration file name.
pub const CONFIG_FILE: &str = "config.toml";

/// Machine-local configuration file, merged over [`CONFIG_FILE`].
pub const LOCAL_CONFIG_FILE: &str = "local-config.toml";

/// Prefix of environment variables read by [`load_from_dir`].
pub const ENV_PREFIX: &str = "SLYS_";

/// Collects configuration sources and merges them into [`Settings`].
///
/// Tables are merged recursively; any other value from a higher-priority
/// source replaces the lower one. Sources with equal priority apply in the
/// order they were added.
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a configuration source
	pub fn add_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Merge all sources into a single JSON object.
	pub fn merged(&self) -> Result<Value, SourceError> {
		let mut ordered: Vec<&dyn ConfigSource> = self.sources.iter().map(|s| s.as_ref()).collect();
		ordered.sort_by_key(|source| source.priority());

		let mut merged = Value::Object(Map::new());
		for source in ordered {
			tracing::debug!(source = %source.description(), "loading configuration source");
			let values = source.load()?;
			deep_merge(&mut merged, Value::Object(values.into_iter().collect()));
		}

		Ok(merged)
	}

	/// Merge all sources and deserialize the result.
	pub fn build(&self) -> Result<Settings, SourceError> {
		let merged = self.merged()?;
		Ok(serde_json::from_value(merged)?)
	}
}

/// Recursively merge `overlay` into `base`.
///
/// # Examples
///
/// ```
/// use slys_conf::builder::deep_merge;
/// use serde_json::json;
///
/// let mut base = json!({ "paths": { "modules_root": "modules", "lang_root": "lang" } });
/// deep_merge(&mut base, json!({ "paths": { "lang_root": "i18n" } }));
///
/// assert_eq!(base, json!({ "paths": { "modules_root": "modules", "lang_root": "i18n" } }));
/// ```
pub fn deep_merge(base: &mut Value, overlay: Value) {
	match (base, overlay) {
		(Value::Object(base_map), Value::Object(overlay_map)) => {
			for (key, value) in overlay_map {
				match base_map.get_mut(&key) {
					Some(existing) => deep_merge(existing, value),
					None => {
						base_map.insert(key, value);
					}
				}
			}
		}
		(base, overlay) => *base = overlay,
	}
}

/// Load the standard layering for an application directory.
///
/// Reads `config.toml` and `local-config.toml` from `dir` and `SLYS_`
/// environment variables. Relative paths in `[paths]` are resolved against
/// `dir`.
pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Settings, SourceError> {
	let dir = dir.as_ref();

	let mut settings = SettingsBuilder::new()
		.add_source(TomlFileSource::new(dir.join(CONFIG_FILE)))
		.add_source(TomlFileSource::new(dir.join(LOCAL_CONFIG_FILE)).with_priority(60))
		.add_source(EnvSource::new(ENV_PREFIX))
		.build()?;

	settings.paths.rebase(dir);
	Ok(settings)
}
