//! Tera-based template renderer
//!
//! Templates are read from disk on first use and kept compiled for the
//! lifetime of the renderer.
//!
//! # Examples
//!
//! ```rust,no_run
//! use slys_template::{TemplateRenderer, TeraRenderer};
//! use serde_json::{Map, json};
//! use std::path::Path;
//!
//! let renderer = TeraRenderer::new();
//! let mut context = Map::new();
//! context.insert("name".to_string(), json!("Alice"));
//!
//! let html = renderer
//!     .render(Path::new("modules/index/views/index/index.html"), &context)
//!     .unwrap();
//! ```

use parking_lot::RwLock;
use serde_json::{Map, Value};
use slys_core::{Error, Result};
use slys_http::UrlTarget;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

/// Renders a template file with bound variables.
pub trait TemplateRenderer: Send + Sync {
	/// Render `template` with `context`.
	///
	/// Fails with [`Error::TemplateNotFound`] when the file does not exist and
	/// with [`Error::Template`] when the engine rejects or fails the template.
	fn render(&self, template: &Path, context: &Map<String, Value>) -> Result<String>;
}

struct Loaded {
	tera: Tera,
	files: HashSet<PathBuf>,
}

/// Tera-based runtime template renderer
///
/// Each template is registered under its path, so `{% include %}` and
/// `{% extends %}` work between templates that were already rendered once.
/// Templates get a `url(module=, controller=, action=, ..)` function; extra
/// arguments become `name/value` segments.
pub struct TeraRenderer {
	inner: RwLock<Loaded>,
}

impl TeraRenderer {
	/// Creates a new TeraRenderer
	pub fn new() -> Self {
		let mut tera = Tera::default();
		tera.register_function("url", url_function);

		Self {
			inner: RwLock::new(Loaded {
				tera,
				files: HashSet::new(),
			}),
		}
	}

	fn ensure_loaded(&self, template: &Path, name: &str) -> Result<()> {
		if self.inner.read().files.contains(template) {
			return Ok(());
		}

		if !template.is_file() {
			return Err(Error::TemplateNotFound(template.display().to_string()));
		}

		let mut inner = self.inner.write();
		if inner.files.contains(template) {
			return Ok(());
		}
		inner
			.tera
			.add_template_file(template, Some(name))
			.map_err(|e| Error::Template(describe(&e)))?;
		inner.files.insert(template.to_path_buf());
		tracing::debug!(template = %template.display(), "compiled template");

		Ok(())
	}
}

impl Default for TeraRenderer {
	fn default() -> Self {
		Self::new()
	}
}

impl TemplateRenderer for TeraRenderer {
	fn render(&self, template: &Path, context: &Map<String, Value>) -> Result<String> {
		let name = template.to_string_lossy().into_owned();
		self.ensure_loaded(template, &name)?;

		let ctx = Context::from_serialize(context).map_err(|e| Error::Template(describe(&e)))?;

		self.inner
			.read()
			.tera
			.render(&name, &ctx)
			.map_err(|e| Error::Template(describe(&e)))
	}
}

// Tera nests the useful message in the source chain
fn describe(err: &tera::Error) -> String {
	let mut message = err.to_string();
	let mut source = std::error::Error::source(err);
	while let Some(cause) = source {
		message.push_str(": ");
		message.push_str(&cause.to_string());
		source = cause.source();
	}
	message
}

fn url_function(args: &HashMap<String, Value>) -> tera::Result<Value> {
	let mut target = UrlTarget::new();
	let mut params = BTreeMap::new();

	for (name, value) in args {
		let value = match value {
			Value::String(s) => s.clone(),
			Value::Null => continue,
			other => other.to_string(),
		};
		match name.as_str() {
			"module" => target = target.module(value),
			"controller" => target = target.controller(value),
			"action" => target = target.action(value),
			_ => {
				params.insert(name.clone(), value);
			}
		}
	}

	for (name, value) in params {
		target = target.param(name, value);
	}

	Ok(Value::String(target.build()))
}
