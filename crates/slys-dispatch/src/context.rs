//! What actions and plugins get to work with.
//!
//! Both contexts expose the built-in helpers as methods: render context
//! switching, forwarding, translation and URL building. Custom helpers are
//! reached by name through `call_helper`.

use crate::application::Application;
use crate::cycle::Cycle;
use crate::helper::Helper;
use serde_json::Value;
use slys_conf::Settings;
use slys_core::Result;
use slys_db::DatabaseConnection;
use slys_http::{Request, UrlTarget};
use slys_views::{RenderContext, View};

/// Context passed to a controller action.
pub struct ActionContext<'a> {
	app: &'a Application,
	cycle: &'a mut Cycle,
	request: &'a Request,
	view: &'a mut View,
}

impl<'a> ActionContext<'a> {
	pub(crate) fn new(
		app: &'a Application,
		cycle: &'a mut Cycle,
		request: &'a Request,
		view: &'a mut View,
	) -> Self {
		Self {
			app,
			cycle,
			request,
			view,
		}
	}

	/// The working view. Its template defaults to the action's view file.
	pub fn view(&self) -> &View {
		self.view
	}

	pub fn view_mut(&mut self) -> &mut View {
		self.view
	}

	pub fn assign(&mut self, name: impl Into<String>, value: impl Into<Value>) {
		self.view.assign(name, value);
	}

	/// The request being dispatched, which is not necessarily the top-level one.
	pub fn request(&self) -> &Request {
		self.request
	}

	pub fn param(&self, name: &str) -> Option<&str> {
		self.request.param(name)
	}

	/// Queue a forward derived from the request being dispatched.
	///
	/// `None` keeps the current controller or module.
	pub fn forward(&mut self, action: &str, controller: Option<&str>, module: Option<&str>) {
		let request = self.request.forwarded(action, controller, module);
		self.cycle.forward(request);
	}

	pub fn render_context(&self) -> RenderContext {
		self.cycle.render_context()
	}

	pub fn set_render_context(&mut self, context: RenderContext) {
		self.cycle.set_render_context(context);
	}

	/// Switch the layout once this dispatch returns.
	pub fn set_layout(&mut self, layout: impl Into<String>) {
		self.cycle.set_layout(layout);
	}

	pub fn set_title(&mut self, title: impl Into<String>) {
		self.cycle.set_title(title);
	}

	pub fn translate(&self, label: &str) -> String {
		self.app.translator().translate(self.cycle.language(), label)
	}

	pub fn language(&self) -> &str {
		self.cycle.language()
	}

	pub fn set_language(&mut self, language: impl Into<String>) {
		self.cycle.set_language(language);
	}

	/// Build a URL. An empty target yields the current request path.
	pub fn url(&self, target: &UrlTarget) -> String {
		url_for(self.request, target)
	}

	pub fn helper(&self, name: &str) -> Result<&dyn Helper> {
		self.app.helper(name)
	}

	pub fn call_helper(&self, name: &str, args: &[Value]) -> Result<Value> {
		self.app.helper(name)?.call(self.request, args)
	}

	pub fn settings(&self) -> &Settings {
		self.app.settings()
	}

	pub fn database(&self) -> Result<&DatabaseConnection> {
		self.app.database()
	}
}

/// Context passed to plugin hooks. Works relative to the top-level request.
pub struct PluginContext<'a> {
	app: &'a Application,
	cycle: &'a mut Cycle,
}

impl<'a> PluginContext<'a> {
	pub(crate) fn new(app: &'a Application, cycle: &'a mut Cycle) -> Self {
		Self { app, cycle }
	}

	pub fn request(&self) -> &Request {
		self.cycle.top_request()
	}

	/// Queue a forward derived from the top-level request.
	///
	/// Only honored from `pre_dispatch`; later forwards are discarded.
	pub fn forward(&mut self, action: &str, controller: Option<&str>, module: Option<&str>) {
		let request = self.cycle.top_request().forwarded(action, controller, module);
		self.cycle.forward(request);
	}

	pub fn render_context(&self) -> RenderContext {
		self.cycle.render_context()
	}

	pub fn set_render_context(&mut self, context: RenderContext) {
		self.cycle.set_render_context(context);
	}

	pub fn set_layout(&mut self, layout: impl Into<String>) {
		self.cycle.set_layout(layout);
	}

	pub fn set_title(&mut self, title: impl Into<String>) {
		self.cycle.set_title(title);
	}

	pub fn translate(&self, label: &str) -> String {
		self.app.translator().translate(self.cycle.language(), label)
	}

	pub fn language(&self) -> &str {
		self.cycle.language()
	}

	pub fn set_language(&mut self, language: impl Into<String>) {
		self.cycle.set_language(language);
	}

	pub fn url(&self, target: &UrlTarget) -> String {
		url_for(self.cycle.top_request(), target)
	}

	pub fn helper(&self, name: &str) -> Result<&dyn Helper> {
		self.app.helper(name)
	}

	pub fn call_helper(&self, name: &str, args: &[Value]) -> Result<Value> {
		self.app.helper(name)?.call(self.cycle.top_request(), args)
	}

	pub fn settings(&self) -> &Settings {
		self.app.settings()
	}

	pub fn database(&self) -> Result<&DatabaseConnection> {
		self.app.database()
	}
}

fn url_for(request: &Request, target: &UrlTarget) -> String {
	if target.is_empty() {
		request.path().to_string()
	} else {
		target.build()
	}
}
