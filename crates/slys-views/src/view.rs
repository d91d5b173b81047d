//! Views: assigns bound to a template.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use slys_core::{Error, Result};
use slys_template::TemplateRenderer;
use std::ops::Index;
use std::path::{Path, PathBuf};

static NULL: Value = Value::Null;

/// Named values handed to a template.
///
/// Reading an assign that was never set yields `null`.
///
/// # Examples
///
/// ```
/// use slys_views::View;
/// use serde_json::{Value, json};
///
/// let mut view = View::new();
/// view.assign("title", "Cart");
/// view.assign("items", json!([1, 2]));
///
/// assert_eq!(view["title"], json!("Cart"));
/// assert_eq!(view["missing"], Value::Null);
/// assert!(view.contains("items"));
/// assert_eq!(view.to_json().unwrap(), r#"{"title":"Cart","items":[1,2]}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct View {
	assigns: Map<String, Value>,
	template: Option<PathBuf>,
}

impl View {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_template(template: impl Into<PathBuf>) -> Self {
		Self {
			assigns: Map::new(),
			template: Some(template.into()),
		}
	}

	pub fn template(&self) -> Option<&Path> {
		self.template.as_deref()
	}

	pub fn set_template(&mut self, template: impl Into<PathBuf>) {
		self.template = Some(template.into());
	}

	pub fn clear_template(&mut self) {
		self.template = None;
	}

	/// Set an assign, replacing any previous value.
	pub fn assign(&mut self, name: impl Into<String>, value: impl Into<Value>) {
		self.assigns.insert(name.into(), value.into());
	}

	pub fn get(&self, name: &str) -> &Value {
		self.assigns.get(name).unwrap_or(&NULL)
	}

	/// `true` when the assign is present and not `null`.
	pub fn contains(&self, name: &str) -> bool {
		self.assigns.get(name).is_some_and(|value| !value.is_null())
	}

	pub fn remove(&mut self, name: &str) -> Option<Value> {
		self.assigns.shift_remove(name)
	}

	pub fn assigns(&self) -> &Map<String, Value> {
		&self.assigns
	}

	/// Replace all assigns.
	pub fn set_data(&mut self, data: Map<String, Value>) {
		self.assigns = data;
	}

	/// Merge assigns over the current ones.
	pub fn extend(&mut self, data: Map<String, Value>) {
		self.assigns.extend(data);
	}

	/// Serialize the assigns as a JSON object.
	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string(&self.assigns)?)
	}

	/// Render the view through its template.
	pub fn render(&self, renderer: &dyn TemplateRenderer) -> Result<String> {
		let template = self
			.template
			.as_deref()
			.ok_or_else(|| Error::TemplateNotFound("view template is not set".to_string()))?;

		renderer.render(template, &self.assigns)
	}
}

impl Index<&str> for View {
	type Output = Value;

	fn index(&self, name: &str) -> &Value {
		self.get(name)
	}
}

impl From<Map<String, Value>> for View {
	fn from(assigns: Map<String, Value>) -> Self {
		Self {
			assigns,
			template: None,
		}
	}
}

impl Serialize for View {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		self.assigns.serialize(serializer)
	}
}
