//! # Slys Server
//!
//! Serves an [`Application`](slys_dispatch::Application) over HTTP/1 with
//! hyper and tokio.
//!
//! Each request is turned into a routed [`slys_http::Request`] (path, query
//! string and URL-encoded form body), run through the application on the
//! blocking pool, and answered with the rendered body: `200` with the HTML
//! or JSON content type, or `500` when the cycle fails.
//!
//! ```no_run
//! use std::sync::Arc;
//! use slys_dispatch::ApplicationBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), slys_server::BoxError> {
//!     slys_server::logging::init();
//!
//!     let settings = slys_conf::load_from_dir(".")?;
//!     let app = ApplicationBuilder::new(settings)
//!         .action("index", "index", "index", |cx| {
//!             cx.assign("greeting", "hello");
//!             Ok(())
//!         })
//!         .build()?;
//!
//!     slys_server::serve(Arc::new(app)).await
//! }
//! ```

pub mod logging;
pub mod server;

pub use server::{BoxError, HttpServer, build_request, respond, serve};
