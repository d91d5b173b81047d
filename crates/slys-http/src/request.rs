//! The routed request.

use crate::params::{parse_query, positional_params};
use http::Method;
use percent_encoding::percent_decode_str;
use std::collections::HashMap;

/// Value used for module, controller and action when the path does not set them.
pub const DEFAULT_SEGMENT: &str = "index";

/// Parameter keys that always mirror the request's routing state.
pub const RESERVED_PARAMS: [&str; 3] = ["module", "controller", "action"];

/// A routed request: module/controller/action triple plus parameters.
///
/// The `module`, `controller` and `action` entries of [`Request::params`]
/// always reflect the routing state; values supplied by callers for these keys
/// are overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
	module: String,
	controller: String,
	action: String,
	params: HashMap<String, String>,
	method: Method,
	path: String,
	xml_http_request: bool,
}

impl Request {
	/// Create a request with default routing (`index/index/index`).
	///
	/// # Examples
	///
	/// ```
	/// use slys_http::{Method, Request};
	///
	/// let request = Request::new(Method::GET);
	/// assert_eq!(request.module(), "index");
	/// assert_eq!(request.params().len(), 3);
	/// ```
	pub fn new(method: Method) -> Self {
		let mut request = Self {
			module: DEFAULT_SEGMENT.to_string(),
			controller: DEFAULT_SEGMENT.to_string(),
			action: DEFAULT_SEGMENT.to_string(),
			params: HashMap::new(),
			method,
			path: "/".to_string(),
			xml_http_request: false,
		};
		request.sync_reserved();
		request
	}

	/// Route a request target into a request.
	///
	/// `target` is the raw request-target (path with optional query string).
	/// Path segments 1-3 select module, controller and action; the remaining
	/// segments are read pairwise as positional parameters. The query string
	/// and then `external` (typically form body fields) are merged on top, so
	/// on a key collision the external value wins.
	///
	/// # Examples
	///
	/// ```
	/// use slys_http::{Method, Request};
	///
	/// let request = Request::route("/blog/post/view/id/7?id=8", Method::GET, Vec::<(String, String)>::new());
	/// assert_eq!(request.controller(), "post");
	/// assert_eq!(request.param("id"), Some("8"));
	///
	/// let root = Request::route("/", Method::GET, Vec::<(String, String)>::new());
	/// assert_eq!(root.action(), "index");
	/// ```
	pub fn route<I, K, V>(target: &str, method: Method, external: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let (path, query) = match target.split_once('?') {
			Some((path, query)) => (path, Some(query)),
			None => (target, None),
		};

		let mut request = Self::new(method);
		request.path = if path.is_empty() {
			"/".to_string()
		} else {
			path.to_string()
		};

		let trimmed = path.trim_end_matches('/');
		// Only the root slash is stripped so that `//cart` keeps an empty module
		let segments: Vec<String> = trimmed
			.strip_prefix('/')
			.unwrap_or(trimmed)
			.split('/')
			.map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
			.collect();

		if trimmed.is_empty() {
			request.sync_reserved();
			return request;
		}

		if let Some(module) = segments.first().filter(|s| !s.is_empty()) {
			request.module = module.clone();
		}
		if let Some(controller) = segments.get(1).filter(|s| !s.is_empty()) {
			request.controller = controller.clone();
		}
		if let Some(action) = segments.get(2).filter(|s| !s.is_empty()) {
			request.action = action.clone();
		}

		if segments.len() > 3 {
			request.params.extend(positional_params(&segments[3..]));
		}

		if let Some(query) = query {
			request.params.extend(parse_query(query));
		}

		request.params.extend(
			external
				.into_iter()
				.map(|(key, value)| (key.into(), value.into())),
		);

		request.sync_reserved();
		request
	}

	/// Mark the request as issued by `XMLHttpRequest`.
	pub fn with_xml_http_request(mut self, xml_http_request: bool) -> Self {
		self.xml_http_request = xml_http_request;
		self
	}

	/// Derive the target of a forward from this request.
	///
	/// The action is always replaced; controller and module only when given
	/// and non-empty. Parameters are carried over. `self` is left untouched.
	///
	/// # Examples
	///
	/// ```
	/// use slys_http::{Method, Request};
	///
	/// let request = Request::route("/shop/cart/add", Method::POST, [("sku", "42")]);
	/// let next = request.forwarded("view", None, None);
	///
	/// assert_eq!(next.action(), "view");
	/// assert_eq!(next.controller(), "cart");
	/// assert_eq!(next.param("action"), Some("view"));
	/// assert_eq!(request.action(), "add");
	/// ```
	pub fn forwarded(&self, action: &str, controller: Option<&str>, module: Option<&str>) -> Self {
		let mut next = self.clone();
		next.action = action.to_string();

		if let Some(controller) = controller.filter(|c| !c.is_empty()) {
			next.controller = controller.to_string();
		}
		if let Some(module) = module.filter(|m| !m.is_empty()) {
			next.module = module.to_string();
		}

		next.sync_reserved();
		next
	}

	pub fn module(&self) -> &str {
		&self.module
	}

	pub fn controller(&self) -> &str {
		&self.controller
	}

	pub fn action(&self) -> &str {
		&self.action
	}

	/// All parameters, including the reserved routing keys.
	pub fn params(&self) -> &HashMap<String, String> {
		&self.params
	}

	/// Get a single parameter.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}

	pub fn method(&self) -> &Method {
		&self.method
	}

	/// The path part of the original request target.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// `true` when the HTTP method is `POST`.
	pub fn is_post(&self) -> bool {
		self.method == Method::POST
	}

	/// `true` for every method other than `POST`.
	pub fn is_get(&self) -> bool {
		!self.is_post()
	}

	pub fn is_xml_http_request(&self) -> bool {
		self.xml_http_request
	}

	pub fn set_module(&mut self, module: impl Into<String>) {
		self.module = module.into();
		self.sync_reserved();
	}

	pub fn set_controller(&mut self, controller: impl Into<String>) {
		self.controller = controller.into();
		self.sync_reserved();
	}

	pub fn set_action(&mut self, action: impl Into<String>) {
		self.action = action.into();
		self.sync_reserved();
	}

	/// Set a parameter. Writes to the reserved routing keys are ignored.
	pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
		let name = name.into();
		if RESERVED_PARAMS.contains(&name.as_str()) {
			tracing::debug!(param = %name, "ignoring write to reserved request parameter");
			return;
		}
		self.params.insert(name, value.into());
	}

	/// Remove a parameter. Reserved routing keys cannot be removed.
	pub fn remove_param(&mut self, name: &str) -> Option<String> {
		if RESERVED_PARAMS.contains(&name) {
			return None;
		}
		self.params.remove(name)
	}

	fn sync_reserved(&mut self) {
		self.params
			.insert("module".to_string(), self.module.clone());
		self.params
			.insert("controller".to_string(), self.controller.clone());
		self.params
			.insert("action".to_string(), self.action.clone());
	}
}

impl Default for Request {
	fn default() -> Self {
		Self::new(Method::GET)
	}
}
