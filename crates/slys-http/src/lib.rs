//! # Slys HTTP
//!
//! The [`Request`] value object and the segment-based routing that builds it.
//!
//! Routing is purely conventional: the first three path segments select the
//! module, controller and action, and the remaining segments are read as
//! `name/value` pairs.
//!
//! ```
//! use slys_http::Request;
//! use http::Method;
//!
//! let request = Request::route("/shop/cart/add/sku/42", Method::POST, [("qty", "3")]);
//!
//! assert_eq!(request.module(), "shop");
//! assert_eq!(request.controller(), "cart");
//! assert_eq!(request.action(), "add");
//! assert_eq!(request.param("sku"), Some("42"));
//! assert_eq!(request.param("qty"), Some("3"));
//! assert!(request.is_post());
//! ```

pub mod params;
pub mod request;
pub mod url;

pub use http::Method;
pub use request::{DEFAULT_SEGMENT, RESERVED_PARAMS, Request};
pub use url::UrlTarget;
