//! Application assembly and the request cycle.

use crate::context::{ActionContext, PluginContext};
use crate::controller::{Action, ActionReturn, ControllerRegistry, action_key, controller_key};
use crate::cycle::Cycle;
use crate::helper::{Helper, is_builtin};
use crate::placeholder::LayoutPlaceholders;
use crate::plugin::Plugin;
use crate::translate::Translator;
use indexmap::{IndexMap, IndexSet};
use slys_conf::Settings;
use slys_core::{Error, Result};
use slys_db::DatabaseConnection;
use slys_http::Request;
use slys_template::{TemplateLocator, TemplateRenderer, TeraRenderer};
use slys_views::{Dispatch, Layout, Placeholder, RenderContext, Rendered, View};
use std::fmt;
use std::sync::Arc;

/// Collects everything an [`Application`] is made of.
///
/// Nothing is validated until [`ApplicationBuilder::build`], which reports
/// every setup problem as [`Error::Configuration`].
///
/// # Examples
///
/// ```
/// use slys_conf::Settings;
/// use slys_dispatch::ApplicationBuilder;
/// use serde_json::json;
///
/// let app = ApplicationBuilder::new(Settings::default())
///     .action("shop", "cart", "add", |cx| {
///         let sku = cx.param("sku").unwrap_or_default().to_string();
///         Ok(json!({ "sku": sku }))
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(app.controllers().len(), 1);
/// ```
pub struct ApplicationBuilder {
	settings: Settings,
	controllers: ControllerRegistry,
	modules: IndexSet<String>,
	plugins: IndexMap<String, Arc<dyn Plugin>>,
	helpers: IndexMap<String, Arc<dyn Helper>>,
	placeholders: IndexMap<String, Placeholder>,
	renderer: Option<Arc<dyn TemplateRenderer>>,
	database: Option<DatabaseConnection>,
}

impl ApplicationBuilder {
	pub fn new(settings: Settings) -> Self {
		Self {
			settings,
			controllers: ControllerRegistry::new(),
			modules: IndexSet::new(),
			plugins: IndexMap::new(),
			helpers: IndexMap::new(),
			placeholders: IndexMap::new(),
			renderer: None,
			database: None,
		}
	}

	/// Register an action under its URL names, e.g. `("shop", "order-item", "add")`.
	///
	/// The action may return `()`, a [`View`], an assigns map or a JSON
	/// object; see [`ActionReturn`].
	pub fn action<F, R>(mut self, module: &str, controller: &str, action: &str, f: F) -> Self
	where
		F: Fn(&mut ActionContext<'_>) -> Result<R> + Send + Sync + 'static,
		R: Into<ActionReturn>,
	{
		let separator = self.settings.routing.word_separator;
		let handler: Action = Arc::new(move |cx: &mut ActionContext<'_>| -> Result<ActionReturn> {
			f(cx).map(Into::into)
		});

		self.controllers.insert(
			controller_key(module, controller, separator),
			action_key(action, separator),
			handler,
		);
		self.modules.insert(module.to_string());
		self
	}

	pub fn plugin(mut self, name: impl Into<String>, plugin: impl Plugin + 'static) -> Self {
		self.plugins.insert(name.into(), Arc::new(plugin));
		self
	}

	pub fn helper(mut self, name: impl Into<String>, helper: impl Helper + 'static) -> Self {
		self.helpers.insert(name.into(), Arc::new(helper));
		self
	}

	/// Register a unit that layouts can name in their placeholder settings.
	pub fn placeholder<F>(mut self, name: impl Into<String>, unit: F) -> Self
	where
		F: Fn(&mut Request, &str) -> Result<Option<View>> + Send + Sync + 'static,
	{
		self.placeholders.insert(name.into(), Arc::new(unit));
		self
	}

	/// Replace the default [`TeraRenderer`].
	pub fn renderer(mut self, renderer: impl TemplateRenderer + 'static) -> Self {
		self.renderer = Some(Arc::new(renderer));
		self
	}

	pub fn database(mut self, database: DatabaseConnection) -> Self {
		self.database = Some(database);
		self
	}

	pub fn build(self) -> Result<Application> {
		let helpers = select_helpers(&self.settings, self.helpers)?;
		let plugins = select_plugins(&self.settings, self.plugins)?;
		let placeholders = LayoutPlaceholders::from_settings(&self.settings, &self.placeholders)?;

		if !self.settings.modules.is_empty()
			&& let Some(module) = self
				.modules
				.iter()
				.find(|module| !self.settings.modules.contains_key(module.as_str()))
		{
			return Err(Error::Configuration(format!(
				"module `{}` is not listed in the module settings",
				module
			)));
		}

		let locator = TemplateLocator::new(&self.settings);
		let translator = Translator::new(self.settings.paths.lang_root.clone());
		let renderer = self
			.renderer
			.unwrap_or_else(|| Arc::new(TeraRenderer::new()));

		tracing::info!(
			actions = self.controllers.len(),
			plugins = plugins.len(),
			helpers = helpers.len(),
			database = self.database.is_some(),
			"application built"
		);

		Ok(Application {
			settings: self.settings,
			controllers: self.controllers,
			plugins,
			helpers,
			placeholders,
			renderer,
			locator,
			translator,
			database: self.database,
		})
	}
}

fn select_helpers(
	settings: &Settings,
	registered: IndexMap<String, Arc<dyn Helper>>,
) -> Result<IndexMap<String, Arc<dyn Helper>>> {
	for (name, helper) in &registered {
		if is_builtin(name) {
			return Err(Error::Configuration(format!(
				"helper `{}` clashes with a built-in helper",
				name
			)));
		}
		if helper.name() != name {
			return Err(Error::Configuration(format!(
				"helper registered as `{}` is named `{}`",
				name,
				helper.name()
			)));
		}
	}

	if settings.helpers.is_empty() {
		return Ok(registered);
	}

	let mut selected = IndexMap::new();
	for name in settings.helpers.iter().filter(|name| !is_builtin(name)) {
		let helper = registered.get(name).cloned().ok_or_else(|| {
			Error::Configuration(format!("configured helper `{}` is not registered", name))
		})?;
		selected.insert(name.clone(), helper);
	}
	Ok(selected)
}

fn select_plugins(
	settings: &Settings,
	registered: IndexMap<String, Arc<dyn Plugin>>,
) -> Result<Vec<(String, Arc<dyn Plugin>)>> {
	let Some(configured) = &settings.plugins else {
		return Ok(registered.into_iter().collect());
	};

	configured
		.iter()
		.map(|name| {
			registered
				.get(name)
				.cloned()
				.map(|plugin| (name.clone(), plugin))
				.ok_or_else(|| {
					Error::Configuration(format!("configured plugin `{}` is not registered", name))
				})
		})
		.collect()
}

#[derive(Debug, Clone, Copy)]
enum Hook {
	PreDispatch,
	PostDispatch,
}

impl Hook {
	fn as_str(self) -> &'static str {
		match self {
			Self::PreDispatch => "pre_dispatch",
			Self::PostDispatch => "post_dispatch",
		}
	}
}

/// An immutable, shareable application.
///
/// Per-request state lives in a [`Cycle`], so one `Application` can serve
/// any number of requests concurrently.
pub struct Application {
	settings: Settings,
	controllers: ControllerRegistry,
	plugins: Vec<(String, Arc<dyn Plugin>)>,
	helpers: IndexMap<String, Arc<dyn Helper>>,
	placeholders: LayoutPlaceholders,
	renderer: Arc<dyn TemplateRenderer>,
	locator: TemplateLocator,
	translator: Translator,
	database: Option<DatabaseConnection>,
}

impl Application {
	pub fn builder(settings: Settings) -> ApplicationBuilder {
		ApplicationBuilder::new(settings)
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn controllers(&self) -> &ControllerRegistry {
		&self.controllers
	}

	pub fn renderer(&self) -> &dyn TemplateRenderer {
		self.renderer.as_ref()
	}

	pub fn locator(&self) -> &TemplateLocator {
		&self.locator
	}

	pub fn translator(&self) -> &Translator {
		&self.translator
	}

	/// Names of the loaded plugins, in hook order.
	pub fn plugin_names(&self) -> Vec<&str> {
		self.plugins.iter().map(|(name, _)| name.as_str()).collect()
	}

	pub fn helper(&self, name: &str) -> Result<&dyn Helper> {
		self.helpers
			.get(name)
			.map(|helper| helper.as_ref())
			.ok_or_else(|| Error::Lookup(format!("helper `{}` is not registered", name)))
	}

	pub fn database(&self) -> Result<&DatabaseConnection> {
		self.database
			.as_ref()
			.ok_or_else(|| Error::Lookup("no database connection configured".to_string()))
	}

	/// Run one request cycle and render its response body.
	pub fn run(&self, request: Request) -> Result<Rendered> {
		tracing::debug!(method = %request.method(), path = %request.path(), "request cycle started");

		let mut cycle = Cycle::new(request.clone(), self.settings.language.clone());
		let mut layout = Layout::new();
		layout.set_name(&self.settings.default_layout, &self.placeholders);

		self.run_plugins(Hook::PreDispatch, &mut cycle);

		let content = self.process_request(&request, &mut cycle)?;
		layout.set_content(content);
		self.switch_layout(&mut layout, &mut cycle);

		while let Some(forward) = cycle.next_forward() {
			let content = self.process_request(&forward, &mut cycle)?;
			layout.set_content(content);
			self.switch_layout(&mut layout, &mut cycle);
		}
		cycle.close_forwards();

		self.run_plugins(Hook::PostDispatch, &mut cycle);
		self.switch_layout(&mut layout, &mut cycle);
		if let Some(title) = cycle.take_title() {
			layout.set_title(title);
		}

		// Title and layout requests from placeholder actions come too late to apply
		let mut runner = Runner {
			app: self,
			cycle: &mut cycle,
		};
		layout.render(&mut runner, self.renderer.as_ref(), &self.locator)
	}

	/// Dispatch one request to its action and return the resulting view.
	pub fn process_request(&self, request: &Request, cycle: &mut Cycle) -> Result<View> {
		let separator = self.settings.routing.word_separator;
		let controller = controller_key(request.module(), request.controller(), separator);
		let action = action_key(request.action(), separator);
		tracing::debug!(controller = %controller, action = %action, "dispatching");

		let mut view = View::with_template(self.locator.view_template(
			request.module(),
			request.controller(),
			request.action(),
		));
		let handler = self.controllers.resolve(&controller, &action)?;

		let returned = handler(&mut ActionContext::new(self, cycle, request, &mut view))?;

		Ok(match returned {
			ActionReturn::Keep => view,
			ActionReturn::View(replacement) => replacement,
			ActionReturn::Assigns(assigns) => {
				view.extend(assigns);
				view
			}
		})
	}

	fn run_plugins(&self, hook: Hook, cycle: &mut Cycle) {
		for (name, plugin) in &self.plugins {
			let mut cx = PluginContext::new(self, cycle);
			let proceed = match hook {
				Hook::PreDispatch => plugin.pre_dispatch(&mut cx),
				Hook::PostDispatch => plugin.post_dispatch(&mut cx),
			};
			if !proceed {
				tracing::debug!(plugin = %name, hook = hook.as_str(), "plugin stopped the hook chain");
				break;
			}
		}
	}

	fn switch_layout(&self, layout: &mut Layout, cycle: &mut Cycle) {
		let Some(name) = cycle.take_layout() else {
			return;
		};

		let content = layout.content().cloned();
		layout.set_name(&name, &self.placeholders);
		if let Some(content) = content {
			layout.set_content(content);
		}
	}
}

impl fmt::Debug for Application {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Application")
			.field("controllers", &self.controllers)
			.field("plugins", &self.plugin_names())
			.field("helpers", &self.helpers.keys().collect::<Vec<_>>())
			.field("placeholders", &self.placeholders)
			.field("database", &self.database.is_some())
			.finish()
	}
}

/// Dispatches placeholder requests inside the current cycle.
struct Runner<'a> {
	app: &'a Application,
	cycle: &'a mut Cycle,
}

impl Dispatch for Runner<'_> {
	fn dispatch(&mut self, request: Request) -> Result<View> {
		self.app.process_request(&request, self.cycle)
	}

	fn top_request(&self) -> &Request {
		self.cycle.top_request()
	}

	fn render_context(&self) -> RenderContext {
		self.cycle.render_context()
	}
}
