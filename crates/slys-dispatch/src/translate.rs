//! Label translation from per-language TOML catalogs.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

type Catalog = HashMap<String, String>;

/// Looks labels up in `<root>/<language>.toml`.
///
/// A catalog is a flat table of strings:
///
/// ```toml
/// cart_empty = "Der Warenkorb ist leer"
/// checkout = "Zur Kasse"
/// ```
///
/// Catalogs are read on first use and cached. A missing or unreadable
/// catalog behaves like an empty one, and unknown labels translate to
/// themselves.
#[derive(Debug)]
pub struct Translator {
	root: PathBuf,
	catalogs: RwLock<HashMap<String, Arc<Catalog>>>,
}

impl Translator {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self {
			root: root.into(),
			catalogs: RwLock::new(HashMap::new()),
		}
	}

	pub fn translate(&self, language: &str, label: &str) -> String {
		self.catalog(language)
			.get(label)
			.cloned()
			.unwrap_or_else(|| label.to_string())
	}

	fn catalog(&self, language: &str) -> Arc<Catalog> {
		if let Some(catalog) = self.catalogs.read().get(language) {
			return catalog.clone();
		}

		let catalog = Arc::new(self.load(language));
		self.catalogs
			.write()
			.entry(language.to_string())
			.or_insert(catalog)
			.clone()
	}

	fn load(&self, language: &str) -> Catalog {
		// Language codes come from user code; keep them inside the root
		if language.is_empty() || language.contains(['/', '\\', '.']) {
			tracing::warn!(language = %language, "invalid language code");
			return Catalog::new();
		}

		let path = self.root.join(format!("{}.toml", language));
		let content = match fs::read_to_string(&path) {
			Ok(content) => content,
			Err(e) => {
				tracing::debug!(path = %path.display(), error = %e, "no translation catalog");
				return Catalog::new();
			}
		};

		match toml::from_str::<toml::Table>(&content) {
			Ok(table) => table
				.into_iter()
				.filter_map(|(label, value)| match value {
					toml::Value::String(text) => Some((label, text)),
					_ => None,
				})
				.collect(),
			Err(e) => {
				tracing::warn!(path = %path.display(), error = %e, "invalid translation catalog");
				Catalog::new()
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use tempfile::TempDir;

	#[rstest]
	fn test_translate_known_and_unknown_labels() {
		let temp_dir = TempDir::new().unwrap();
		fs::write(
			temp_dir.path().join("de.toml"),
			"checkout = \"Zur Kasse\"\ncount = 3\n",
		)
		.unwrap();

		let translator = Translator::new(temp_dir.path());

		assert_eq!(translator.translate("de", "checkout"), "Zur Kasse");
		assert_eq!(translator.translate("de", "count"), "count");
		assert_eq!(translator.translate("de", "missing"), "missing");
		assert_eq!(translator.translate("fr", "checkout"), "checkout");
	}

	#[rstest]
	fn test_catalog_is_cached() {
		let temp_dir = TempDir::new().unwrap();
		let path = temp_dir.path().join("en.toml");
		fs::write(&path, "hello = \"Hello\"").unwrap();

		let translator = Translator::new(temp_dir.path());
		assert_eq!(translator.translate("en", "hello"), "Hello");

		fs::write(&path, "hello = \"Howdy\"").unwrap();
		assert_eq!(translator.translate("en", "hello"), "Hello");
	}

	#[rstest]
	#[case("../secrets")]
	#[case("")]
	fn test_invalid_language_codes(#[case] language: &str) {
		let translator = Translator::new("/nonexistent");
		assert_eq!(translator.translate(language, "label"), "label");
	}

	#[rstest]
	fn test_broken_catalog_is_empty() {
		let temp_dir = TempDir::new().unwrap();
		fs::write(temp_dir.path().join("en.toml"), "hello = ").unwrap();

		let translator = Translator::new(temp_dir.path());
		assert_eq!(translator.translate("en", "hello"), "hello");
	}
}
