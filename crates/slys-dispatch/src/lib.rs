//! # Slys Dispatch
//!
//! The request cycle: controller resolution, forwarding, plugin hooks,
//! helpers and layout composition.
//!
//! An [`Application`] is assembled once with an [`ApplicationBuilder`] and
//! then serves requests through [`Application::run`]:
//!
//! 1. `pre_dispatch` plugin hooks
//! 2. the main dispatch, whose view becomes the layout content
//! 3. queued forwards, each replacing the content
//! 4. `post_dispatch` plugin hooks
//! 5. placeholder resolution and rendering of the layout
//!
//! ```
//! use slys_conf::Settings;
//! use slys_dispatch::ApplicationBuilder;
//! use slys_http::{Method, Request};
//! use slys_views::{RenderContext, Rendered};
//! use serde_json::json;
//!
//! let app = ApplicationBuilder::new(Settings::default())
//!     .action("shop", "cart", "add", |cx| {
//!         cx.set_render_context(RenderContext::Json);
//!         let qty: u32 = cx.param("qty").and_then(|q| q.parse().ok()).unwrap_or(1);
//!         Ok(json!({ "sku": cx.param("sku"), "qty": qty }))
//!     })
//!     .build()
//!     .unwrap();
//!
//! let request = Request::route("/shop/cart/add/sku/42", Method::POST, [("qty", "3")]);
//! let rendered = app.run(request).unwrap();
//!
//! assert_eq!(rendered, Rendered::Json(r#"{"sku":"42","qty":3}"#.to_string()));
//! ```

pub mod application;
pub mod context;
pub mod controller;
pub mod cycle;
pub mod helper;
pub mod placeholder;
pub mod plugin;
pub mod translate;

pub use application::{Application, ApplicationBuilder};
pub use context::{ActionContext, PluginContext};
pub use controller::{Action, ActionReturn, ControllerRegistry};
pub use cycle::Cycle;
pub use helper::{BUILTIN_HELPERS, Helper};
pub use placeholder::LayoutPlaceholders;
pub use plugin::Plugin;
pub use translate::Translator;
