//! # Slys
//!
//! A minimalist MVC web framework with convention-based routing and layout
//! placeholders.
//!
//! A URL such as `/shop/cart/add/sku/42` selects the `shop` module, the `cart`
//! controller and its `add` action, with `sku = 42` as a parameter. The
//! action fills a view, the view becomes the `content` placeholder of a
//! layout, and the layout's other placeholders are produced by dispatching
//! further requests before the page is rendered as HTML, or as JSON when the
//! cycle switches its render context.
//!
//! ## Crates
//!
//! - [`core`]: errors and case conversion
//! - [`http`]: the request value object and routing
//! - [`conf`]: layered settings
//! - [`template`]: template lookup and rendering
//! - [`views`]: views, render context and layouts
//! - [`db`]: active-record entities over MySQL
//! - [`dispatch`]: the application and its request cycle
//! - [`server`]: the HTTP server (feature `server`, enabled by default)
//!
//! ## Quick Example
//!
//! ```
//! use slys::prelude::*;
//! use serde_json::json;
//!
//! let app = ApplicationBuilder::new(Settings::default())
//!     .action("index", "index", "index", |cx| {
//!         cx.set_render_context(RenderContext::Json);
//!         Ok(json!({ "hello": cx.translate("world") }))
//!     })
//!     .build()
//!     .unwrap();
//!
//! let rendered = app.run(Request::route("/", Method::GET, Vec::<(String, String)>::new())).unwrap();
//! assert_eq!(rendered.body(), r#"{"hello":"world"}"#);
//! ```

pub use slys_conf as conf;
pub use slys_core as core;
pub use slys_db as db;
pub use slys_dispatch as dispatch;
pub use slys_http as http;
pub use slys_template as template;
pub use slys_views as views;

#[cfg(feature = "server")]
pub use slys_server as server;

pub use slys_core::{Error, Result};

pub mod prelude {
	pub use crate::conf::{Settings, SettingsBuilder, load_from_dir};
	pub use crate::core::{Error, Result};
	pub use crate::db::{DatabaseConnection, Entity, Record};
	pub use crate::dispatch::{
		ActionContext, ActionReturn, Application, ApplicationBuilder, Helper, Plugin, PluginContext,
	};
	pub use crate::http::{Method, Request, UrlTarget};
	pub use crate::template::{TemplateRenderer, TeraRenderer};
	pub use crate::views::{RenderContext, Rendered, View};

	#[cfg(feature = "server")]
	pub use crate::server::{HttpServer, serve};
}
