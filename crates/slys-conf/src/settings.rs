//! Typed application settings.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Application settings.
///
/// Every field has a default, so an empty configuration is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Layout used when an action does not pick one.
	pub default_layout: String,
	/// Initial translation language of every request cycle.
	pub language: String,
	/// Custom helpers to load, by name.
	pub helpers: Vec<String>,
	/// Plugins to load, in order. `None` loads every registered plugin.
	pub plugins: Option<Vec<String>>,
	pub paths: PathSettings,
	pub routing: RoutingSettings,
	/// Known modules. Empty means any module may be dispatched to.
	pub modules: IndexMap<String, ModuleSettings>,
	pub layouts: IndexMap<String, LayoutSettings>,
	pub database: Option<DatabaseSettings>,
	pub server: ServerSettings,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			default_layout: "main".to_string(),
			language: "en".to_string(),
			helpers: Vec::new(),
			plugins: None,
			paths: PathSettings::default(),
			routing: RoutingSettings::default(),
			modules: IndexMap::new(),
			layouts: IndexMap::new(),
			database: None,
			server: ServerSettings::default(),
		}
	}
}

impl Settings {
	/// Placeholder units configured for a layout, in declaration order.
	pub fn placeholders(&self, layout: &str) -> Option<&IndexMap<String, PlaceholderSetting>> {
		self.layouts.get(layout).map(|l| &l.placeholders)
	}

	/// Root directory of a module's view templates.
	///
	/// # Examples
	///
	/// ```
	/// use slys_conf::Settings;
	/// use std::path::PathBuf;
	///
	/// let settings = Settings::default();
	/// assert_eq!(settings.views_root("shop"), PathBuf::from("modules/shop/views"));
	/// ```
	pub fn views_root(&self, module: &str) -> PathBuf {
		match self.modules.get(module).and_then(|m| m.views.as_ref()) {
			Some(views) => views.clone(),
			None => self.paths.modules_root.join(module).join("views"),
		}
	}
}

/// Filesystem locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
	pub modules_root: PathBuf,
	pub layouts_root: PathBuf,
	pub lang_root: PathBuf,
	/// Extension of view and layout templates, without the dot.
	pub template_extension: String,
}

impl Default for PathSettings {
	fn default() -> Self {
		Self {
			modules_root: PathBuf::from("modules"),
			layouts_root: PathBuf::from("layouts"),
			lang_root: PathBuf::from("lang"),
			template_extension: "html".to_string(),
		}
	}
}

impl PathSettings {
	/// Resolve every relative path against `base`.
	pub fn rebase(&mut self, base: &Path) {
		for path in [
			&mut self.modules_root,
			&mut self.layouts_root,
			&mut self.lang_root,
		] {
			if path.is_relative() {
				*path = base.join(&*path);
			}
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingSettings {
	/// Word separator of URL segments, used for controller and action names.
	pub word_separator: char,
}

impl Default for RoutingSettings {
	fn default() -> Self {
		Self {
			word_separator: '-',
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleSettings {
	/// Overrides `<modules_root>/<module>/views`.
	pub views: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
	pub placeholders: IndexMap<String, PlaceholderSetting>,
}

/// How a layout placeholder is produced.
///
/// ```toml
/// [layouts.main.placeholders]
/// sidebar = { controller = "sidebar" }
/// menu = "menu"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlaceholderSetting {
	/// A unit registered on the application under this name.
	Named(String),
	/// Dispatch a copy of the top-level request retargeted to these parts.
	Target(PlaceholderTarget),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderTarget {
	pub module: Option<String>,
	pub controller: Option<String>,
	pub action: Option<String>,
	pub params: IndexMap<String, String>,
}

/// MySQL connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
	pub host: String,
	#[serde(deserialize_with = "number_or_string")]
	pub port: u16,
	pub username: String,
	pub password: String,
	pub dbname: String,
	#[serde(deserialize_with = "number_or_string")]
	pub max_connections: u32,
}

impl Default for DatabaseSettings {
	fn default() -> Self {
		Self {
			host: "localhost".to_string(),
			port: 3306,
			username: String::new(),
			password: String::new(),
			dbname: String::new(),
			max_connections: 5,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
	pub bind: String,
}

impl Default for ServerSettings {
	fn default() -> Self {
		Self {
			bind: "127.0.0.1:8000".to_string(),
		}
	}
}

// Environment variables always arrive as strings
fn number_or_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: TryFrom<u64> + std::str::FromStr,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Raw {
		Number(u64),
		Text(String),
	}

	match Raw::deserialize(deserializer)? {
		Raw::Number(n) => T::try_from(n)
			.map_err(|_| serde::de::Error::custom(format!("number out of range: {}", n))),
		Raw::Text(s) => s
			.trim()
			.parse()
			.map_err(|_| serde::de::Error::custom(format!("invalid number: {}", s))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_empty_config_uses_defaults() {
		let settings: Settings = serde_json::from_value(json!({})).unwrap();
		assert_eq!(settings, Settings::default());
		assert_eq!(settings.paths.template_extension, "html");
		assert_eq!(settings.routing.word_separator, '-');
		assert_eq!(settings.server.bind, "127.0.0.1:8000");
	}

	#[rstest]
	fn test_placeholder_forms() {
		let settings: Settings = serde_json::from_value(json!({
			"layouts": {
				"main": {
					"placeholders": {
						"sidebar": { "controller": "sidebar", "params": { "limit": "5" } },
						"menu": "menu"
					}
				}
			}
		}))
		.unwrap();

		let placeholders = settings.placeholders("main").unwrap();
		let names: Vec<_> = placeholders.keys().cloned().collect();
		assert_eq!(names, vec!["sidebar", "menu"]);

		match &placeholders["sidebar"] {
			PlaceholderSetting::Target(target) => {
				assert_eq!(target.controller.as_deref(), Some("sidebar"));
				assert_eq!(target.action, None);
				assert_eq!(target.params["limit"], "5");
			}
			other => panic!("unexpected placeholder: {:?}", other),
		}
		assert_eq!(
			placeholders["menu"],
			PlaceholderSetting::Named("menu".to_string())
		);
	}

	#[rstest]
	#[case(json!(3307), 3307)]
	#[case(json!("3308"), 3308)]
	fn test_port_accepts_strings(#[case] port: serde_json::Value, #[case] expected: u16) {
		let db: DatabaseSettings = serde_json::from_value(json!({ "port": port })).unwrap();
		assert_eq!(db.port, expected);
		assert_eq!(db.max_connections, 5);
	}

	#[rstest]
	fn test_port_out_of_range_fails() {
		let result = serde_json::from_value::<DatabaseSettings>(json!({ "port": 70000 }));
		assert!(result.is_err());
	}

	#[rstest]
	fn test_views_root_override() {
		let mut settings = Settings::default();
		settings.modules.insert(
			"admin".to_string(),
			ModuleSettings {
				views: Some(PathBuf::from("/srv/admin-views")),
			},
		);

		assert_eq!(settings.views_root("admin"), PathBuf::from("/srv/admin-views"));
		assert_eq!(settings.views_root("shop"), PathBuf::from("modules/shop/views"));
	}

	#[rstest]
	fn test_rebase_keeps_absolute_paths() {
		let mut paths = PathSettings {
			layouts_root: PathBuf::from("/abs/layouts"),
			..PathSettings::default()
		};
		paths.rebase(Path::new("/app"));

		assert_eq!(paths.modules_root, PathBuf::from("/app/modules"));
		assert_eq!(paths.layouts_root, PathBuf::from("/abs/layouts"));
	}
}
