//! # Slys Conf
//!
//! Layered application settings.
//!
//! Settings are assembled from several [`ConfigSource`]s merged in priority
//! order (environment variables > `local-config.toml` > `config.toml` >
//! defaults) and then deserialized into [`Settings`].
//!
//! ```
//! use slys_conf::{DefaultSource, SettingsBuilder};
//! use serde_json::json;
//!
//! let settings = SettingsBuilder::new()
//!     .add_source(DefaultSource::new().with_value("default_layout", json!("admin")))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(settings.default_layout, "admin");
//! assert_eq!(settings.language, "en");
//! ```

pub mod builder;
pub mod settings;
pub mod sources;

pub use builder::{SettingsBuilder, load_from_dir};
pub use settings::{
	DatabaseSettings, LayoutSettings, ModuleSettings, PathSettings, PlaceholderSetting,
	PlaceholderTarget, RoutingSettings, ServerSettings, Settings,
};
pub use sources::{ConfigSource, DefaultSource, EnvSource, SourceError, TomlFileSource};
