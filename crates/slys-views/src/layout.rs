//! Layouts and their placeholders.
//!
//! A layout owns an ordered set of placeholders. Each placeholder starts as a
//! pending unit and becomes a [`View`] when the layout is evaluated:
//!
//! ```text
//! Unnamed --set_name--> PlaceholdersLoaded --evaluate--> Evaluating --> Resolved
//! ```
//!
//! The `content` placeholder always exists, comes first, and is normally
//! filled by the main dispatch before evaluation starts.

use crate::context::{RenderContext, Rendered};
use crate::view::View;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use slys_core::{Error, Result};
use slys_http::Request;
use slys_template::{TemplateLocator, TemplateRenderer};
use std::fmt;
use std::sync::Arc;

/// Name of the main placeholder.
pub const CONTENT: &str = "content";

/// A deferred placeholder computation.
///
/// The unit receives a copy of the top-level request and the placeholder
/// name. Returning a view uses it as is; returning `None` dispatches the
/// (possibly modified) request.
pub type Placeholder = Arc<dyn Fn(&mut Request, &str) -> Result<Option<View>> + Send + Sync>;

/// Executes requests on behalf of a layout.
pub trait Dispatch {
	/// Dispatch a request to its controller action.
	fn dispatch(&mut self, request: Request) -> Result<View>;

	/// The request the cycle started with.
	fn top_request(&self) -> &Request;

	/// The current render context. May change while placeholders resolve.
	fn render_context(&self) -> RenderContext;
}

/// Supplies the configured placeholder units of a layout.
pub trait PlaceholderSource {
	fn placeholders(&self, layout: &str) -> IndexMap<String, Placeholder>;
}

/// Progress of placeholder resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
	Unnamed,
	PlaceholdersLoaded,
	Evaluating,
	Resolved,
}

/// A named page frame composed of placeholders.
pub struct Layout {
	name: Option<String>,
	title: String,
	pending: IndexMap<String, Placeholder>,
	views: IndexMap<String, View>,
	state: LayoutState,
}

impl Layout {
	pub fn new() -> Self {
		Self {
			name: None,
			title: String::new(),
			pending: IndexMap::new(),
			views: IndexMap::new(),
			state: LayoutState::Unnamed,
		}
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	pub fn set_title(&mut self, title: impl Into<String>) {
		self.title = title.into();
	}

	pub fn state(&self) -> LayoutState {
		self.state
	}

	/// Select the layout and load its placeholder units.
	///
	/// Selecting the current name again does nothing. Any other name drops
	/// every pending and resolved placeholder.
	pub fn set_name(&mut self, name: &str, source: &dyn PlaceholderSource) {
		if self.name.as_deref() == Some(name) {
			return;
		}

		self.name = Some(name.to_string());
		self.pending.clear();
		self.views.clear();

		let fallthrough: Placeholder =
			Arc::new(|_: &mut Request, _: &str| -> Result<Option<View>> { Ok(None) });
		self.pending.insert(CONTENT.to_string(), fallthrough);
		self.pending.extend(source.placeholders(name));

		self.state = LayoutState::PlaceholdersLoaded;
		tracing::debug!(layout = %name, placeholders = self.pending.len(), "layout placeholders loaded");
	}

	/// Use `view` as the content placeholder.
	pub fn set_content(&mut self, view: View) {
		self.pending.shift_remove(CONTENT);
		self.views.insert(CONTENT.to_string(), view);
	}

	pub fn content(&self) -> Option<&View> {
		self.views.get(CONTENT)
	}

	/// Names of the placeholders, resolved ones first.
	pub fn placeholder_names(&self) -> Vec<&str> {
		self.views
			.keys()
			.chain(self.pending.keys())
			.map(String::as_str)
			.collect()
	}

	/// A resolved placeholder.
	pub fn placeholder(&self, name: &str) -> Result<&View> {
		self.views
			.get(name)
			.ok_or_else(|| Error::Lookup(format!("placeholder `{}` is not prepared", name)))
	}

	/// Resolve pending placeholders in order.
	///
	/// In JSON context only `content` is resolved. If the context switches to
	/// JSON while evaluating, evaluation stops after the current placeholder.
	pub fn evaluate(&mut self, dispatcher: &mut dyn Dispatch) -> Result<()> {
		if self.state == LayoutState::Unnamed {
			return Err(Error::TemplateNotFound("layout name is not set".to_string()));
		}
		self.state = LayoutState::Evaluating;

		if dispatcher.render_context().is_json() {
			if let Some(unit) = self.pending.shift_remove(CONTENT) {
				let view = resolve(CONTENT, &unit, dispatcher)?;
				self.views.insert(CONTENT.to_string(), view);
			}
			self.state = LayoutState::Resolved;
			return Ok(());
		}

		while let Some((name, unit)) = self.pending.shift_remove_index(0) {
			if self.views.contains_key(&name) {
				continue;
			}

			let view = resolve(&name, &unit, dispatcher)?;
			self.views.insert(name, view);

			if dispatcher.render_context().is_json() {
				tracing::debug!("render context switched to json, skipping remaining placeholders");
				break;
			}
		}

		self.state = LayoutState::Resolved;
		Ok(())
	}

	/// Evaluate and render the layout.
	///
	/// JSON context yields the content view's assigns. HTML context renders
	/// every placeholder view and then the layout template with `layout`,
	/// `title`, `content` and `placeholders`.
	pub fn render(
		&mut self,
		dispatcher: &mut dyn Dispatch,
		renderer: &dyn TemplateRenderer,
		locator: &TemplateLocator,
	) -> Result<Rendered> {
		let name = self
			.name
			.clone()
			.ok_or_else(|| Error::TemplateNotFound("layout name is not set".to_string()))?;

		self.evaluate(dispatcher)?;

		if dispatcher.render_context().is_json() {
			let body = match self.views.get(CONTENT) {
				Some(view) => view.to_json()?,
				None => View::new().to_json()?,
			};
			return Ok(Rendered::Json(body));
		}

		let mut placeholders = Map::new();
		for (placeholder, view) in &self.views {
			placeholders.insert(placeholder.clone(), Value::String(view.render(renderer)?));
		}

		let content = placeholders
			.get(CONTENT)
			.cloned()
			.unwrap_or_else(|| Value::String(String::new()));

		let mut context = Map::new();
		context.insert("layout".to_string(), Value::String(name.clone()));
		context.insert("title".to_string(), Value::String(self.title.clone()));
		context.insert("content".to_string(), content);
		context.insert("placeholders".to_string(), Value::Object(placeholders));

		let body = renderer.render(&locator.layout_template(&name), &context)?;
		Ok(Rendered::Html(body))
	}
}

impl Default for Layout {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Layout {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Layout")
			.field("name", &self.name)
			.field("title", &self.title)
			.field("pending", &self.pending.keys().collect::<Vec<_>>())
			.field("views", &self.views)
			.field("state", &self.state)
			.finish()
	}
}

fn resolve(name: &str, unit: &Placeholder, dispatcher: &mut dyn Dispatch) -> Result<View> {
	let mut request = dispatcher.top_request().clone();
	tracing::debug!(placeholder = %name, "resolving placeholder");

	match unit(&mut request, name)? {
		Some(view) => Ok(view),
		None => dispatcher.dispatch(request),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use slys_http::Method;
	use std::path::Path;
	use std::sync::atomic::{AtomicUsize, Ordering};

	struct FakeDispatcher {
		top: Request,
		context: RenderContext,
		dispatched: Vec<String>,
		json_after: Option<String>,
	}

	impl FakeDispatcher {
		fn new() -> Self {
			Self {
				top: Request::route("/shop/cart/add", Method::GET, Vec::<(String, String)>::new()),
				context: RenderContext::Html,
				dispatched: Vec::new(),
				json_after: None,
			}
		}
	}

	impl Dispatch for FakeDispatcher {
		fn dispatch(&mut self, request: Request) -> Result<View> {
			let target = format!("{}/{}", request.controller(), request.action());
			if self.json_after.as_deref() == Some(target.as_str()) {
				self.context = RenderContext::Json;
			}
			self.dispatched.push(target.clone());

			let mut view = View::with_template(format!("{}.html", target));
			view.assign("target", target);
			Ok(view)
		}

		fn top_request(&self) -> &Request {
			&self.top
		}

		fn render_context(&self) -> RenderContext {
			self.context
		}
	}

	#[derive(Default)]
	struct Units(IndexMap<String, Placeholder>);

	impl Units {
		fn with(mut self, name: &str, unit: Placeholder) -> Self {
			self.0.insert(name.to_string(), unit);
			self
		}
	}

	impl PlaceholderSource for Units {
		fn placeholders(&self, _layout: &str) -> IndexMap<String, Placeholder> {
			self.0.clone()
		}
	}

	fn retarget(controller: &'static str) -> Placeholder {
		Arc::new(move |request: &mut Request, _: &str| -> Result<Option<View>> {
			request.set_controller(controller);
			Ok(None)
		})
	}

	struct EchoRenderer;

	impl TemplateRenderer for EchoRenderer {
		fn render(&self, template: &Path, context: &Map<String, Value>) -> Result<String> {
			if template.starts_with("layouts") {
				return Ok(format!(
					"[{}|{}|{}]",
					context["title"].as_str().unwrap_or_default(),
					context["content"].as_str().unwrap_or_default(),
					context["placeholders"]["sidebar"].as_str().unwrap_or_default(),
				));
			}
			Ok(context["target"].as_str().unwrap_or_default().to_string())
		}
	}

	fn locator() -> TemplateLocator {
		TemplateLocator::new(&slys_conf::Settings::default())
	}

	#[rstest]
	fn test_content_placeholder_comes_first() {
		let mut layout = Layout::new();
		layout.set_name("main", &Units::default().with("sidebar", retarget("sidebar")));

		assert_eq!(layout.state(), LayoutState::PlaceholdersLoaded);
		assert_eq!(layout.placeholder_names(), vec!["content", "sidebar"]);
	}

	#[rstest]
	fn test_same_name_keeps_resolved_views() {
		let units = Units::default().with("sidebar", retarget("sidebar"));
		let mut layout = Layout::new();
		layout.set_name("main", &units);
		layout.set_content(View::new());
		layout.evaluate(&mut FakeDispatcher::new()).unwrap();

		layout.set_name("main", &units);

		assert!(layout.placeholder("sidebar").is_ok());
		assert_eq!(layout.state(), LayoutState::Resolved);
	}

	#[rstest]
	fn test_new_name_restarts() {
		let units = Units::default().with("sidebar", retarget("sidebar"));
		let mut layout = Layout::new();
		layout.set_name("main", &units);
		layout.set_content(View::new());
		layout.evaluate(&mut FakeDispatcher::new()).unwrap();

		layout.set_name("admin", &Units::default());

		assert_eq!(layout.state(), LayoutState::PlaceholdersLoaded);
		assert!(matches!(layout.placeholder("sidebar"), Err(Error::Lookup(_))));
		assert_eq!(layout.placeholder_names(), vec!["content"]);
	}

	#[rstest]
	fn test_units_run_on_copies_in_order() {
		let units = Units::default()
			.with("sidebar", retarget("sidebar"))
			.with("menu", retarget("menu"));
		let mut dispatcher = FakeDispatcher::new();
		let mut layout = Layout::new();
		layout.set_name("main", &units);

		layout.evaluate(&mut dispatcher).unwrap();

		assert_eq!(dispatcher.dispatched, vec!["cart/add", "sidebar/add", "menu/add"]);
		assert_eq!(dispatcher.top.controller(), "cart");
		assert_eq!(layout.placeholder("menu").unwrap()["target"], "menu/add");
	}

	#[rstest]
	fn test_returned_view_is_used_verbatim() {
		let unit: Placeholder = Arc::new(|_: &mut Request, name: &str| -> Result<Option<View>> {
			let mut view = View::new();
			view.assign("name", name);
			Ok(Some(view))
		});
		let mut dispatcher = FakeDispatcher::new();
		let mut layout = Layout::new();
		layout.set_name("main", &Units::default().with("banner", unit));
		layout.set_content(View::new());

		layout.evaluate(&mut dispatcher).unwrap();

		assert!(dispatcher.dispatched.is_empty());
		assert_eq!(layout.placeholder("banner").unwrap()["name"], "banner");
	}

	#[rstest]
	fn test_json_context_skips_other_placeholders() {
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = calls.clone();
		let unit: Placeholder = Arc::new(move |_: &mut Request, _: &str| -> Result<Option<View>> {
			counter.fetch_add(1, Ordering::SeqCst);
			Ok(None)
		});

		let mut dispatcher = FakeDispatcher::new();
		dispatcher.context = RenderContext::Json;
		let mut layout = Layout::new();
		layout.set_name("main", &Units::default().with("sidebar", unit));
		let mut content = View::new();
		content.assign("ok", true);
		layout.set_content(content);

		let rendered = layout.render(&mut dispatcher, &EchoRenderer, &locator()).unwrap();

		assert_eq!(rendered, Rendered::Json(r#"{"ok":true}"#.to_string()));
		assert_eq!(calls.load(Ordering::SeqCst), 0);
		assert!(dispatcher.dispatched.is_empty());
	}

	#[rstest]
	fn test_switch_to_json_stops_evaluation() {
		let units = Units::default()
			.with("sidebar", retarget("sidebar"))
			.with("menu", retarget("menu"));
		let mut dispatcher = FakeDispatcher::new();
		dispatcher.json_after = Some("sidebar/add".to_string());
		let mut layout = Layout::new();
		layout.set_name("main", &units);
		layout.set_content(View::new());

		let rendered = layout.render(&mut dispatcher, &EchoRenderer, &locator()).unwrap();

		assert_eq!(dispatcher.dispatched, vec!["sidebar/add"]);
		assert!(matches!(rendered, Rendered::Json(_)));
		assert!(matches!(layout.placeholder("menu"), Err(Error::Lookup(_))));
	}

	#[rstest]
	fn test_html_render_composes_layout() {
		let mut dispatcher = FakeDispatcher::new();
		let mut layout = Layout::new();
		layout.set_name("main", &Units::default().with("sidebar", retarget("sidebar")));
		layout.set_title("Shop");
		let mut content = View::with_template("content.html");
		content.assign("target", "main");
		layout.set_content(content);

		let rendered = layout.render(&mut dispatcher, &EchoRenderer, &locator()).unwrap();

		assert_eq!(rendered, Rendered::Html("[Shop|main|sidebar/add]".to_string()));
	}

	#[rstest]
	fn test_render_unnamed_layout() {
		let mut layout = Layout::new();
		let result = layout.render(&mut FakeDispatcher::new(), &EchoRenderer, &locator());
		assert!(matches!(result, Err(Error::TemplateNotFound(_))));
	}
}
