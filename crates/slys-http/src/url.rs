//! Building application URLs from routing parts.

use crate::request::DEFAULT_SEGMENT;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters escaped inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
	.add(b' ')
	.add(b'"')
	.add(b'#')
	.add(b'%')
	.add(b'/')
	.add(b'<')
	.add(b'>')
	.add(b'?')
	.add(b'`')
	.add(b'{')
	.add(b'}');

/// A dispatch target to turn into a path.
///
/// Routing parts that are left unset are filled with `index` when a later
/// part is present, so that the segment positions stay meaningful.
///
/// # Examples
///
/// ```
/// use slys_http::UrlTarget;
///
/// let url = UrlTarget::new()
///     .action("view")
///     .param("id", "7")
///     .build();
/// assert_eq!(url, "/index/index/view/id/7/");
///
/// assert_eq!(UrlTarget::new().module("shop").build(), "/shop/");
/// assert_eq!(UrlTarget::new().build(), "/");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlTarget {
	module: Option<String>,
	controller: Option<String>,
	action: Option<String>,
	params: Vec<(String, String)>,
}

impl UrlTarget {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn module(mut self, module: impl Into<String>) -> Self {
		self.module = non_empty(module.into());
		self
	}

	pub fn controller(mut self, controller: impl Into<String>) -> Self {
		self.controller = non_empty(controller.into());
		self
	}

	pub fn action(mut self, action: impl Into<String>) -> Self {
		self.action = non_empty(action.into());
		self
	}

	/// Append a `name/value` pair after the routing segments.
	pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.push((name.into(), value.into()));
		self
	}

	/// `true` when no routing part and no parameter is set.
	pub fn is_empty(&self) -> bool {
		self.module.is_none()
			&& self.controller.is_none()
			&& self.action.is_none()
			&& self.params.is_empty()
	}

	/// Render the target as an absolute path ending with `/`.
	pub fn build(&self) -> String {
		let mut segments: Vec<&str> = Vec::new();

		// How many routing segments must be written
		let depth = if !self.params.is_empty() || self.action.is_some() {
			3
		} else if self.controller.is_some() {
			2
		} else if self.module.is_some() {
			1
		} else {
			0
		};

		let parts = [&self.module, &self.controller, &self.action];
		for part in parts.iter().take(depth) {
			segments.push(part.as_deref().unwrap_or(DEFAULT_SEGMENT));
		}

		let mut url = String::from("/");
		for segment in segments {
			url.extend(utf8_percent_encode(segment, SEGMENT));
			url.push('/');
		}
		for (name, value) in &self.params {
			url.extend(utf8_percent_encode(name, SEGMENT));
			url.push('/');
			url.extend(utf8_percent_encode(value, SEGMENT));
			url.push('/');
		}
		url
	}
}

fn non_empty(value: String) -> Option<String> {
	if value.is_empty() { None } else { Some(value) }
}

impl std::fmt::Display for UrlTarget {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.build())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Request;
	use http::Method;
	use rstest::rstest;

	#[rstest]
	fn test_full_target() {
		let url = UrlTarget::new()
			.module("shop")
			.controller("cart")
			.action("add")
			.param("sku", "42")
			.build();
		assert_eq!(url, "/shop/cart/add/sku/42/");
	}

	#[rstest]
	#[case(UrlTarget::new().controller("cart"), "/index/cart/")]
	#[case(UrlTarget::new().module("shop").action("list"), "/shop/index/list/")]
	#[case(UrlTarget::new().param("page", "2"), "/index/index/index/page/2/")]
	#[case(UrlTarget::new().module(""), "/")]
	fn test_missing_parts_default_to_index(#[case] target: UrlTarget, #[case] expected: &str) {
		assert_eq!(target.build(), expected);
	}

	#[rstest]
	fn test_segments_are_encoded() {
		let url = UrlTarget::new()
			.module("blog")
			.controller("post")
			.action("search")
			.param("q", "a/b c")
			.build();
		assert_eq!(url, "/blog/post/search/q/a%2Fb%20c/");
	}

	#[rstest]
	fn test_built_url_routes_back() {
		let url = UrlTarget::new()
			.module("blog")
			.controller("post")
			.action("search")
			.param("q", "a/b c")
			.build();
		let request = Request::route(&url, Method::GET, Vec::<(String, String)>::new());

		assert_eq!(request.module(), "blog");
		assert_eq!(request.action(), "search");
		assert_eq!(request.param("q"), Some("a/b c"));
	}

	#[rstest]
	fn test_is_empty() {
		assert!(UrlTarget::new().is_empty());
		assert!(!UrlTarget::new().param("a", "b").is_empty());
	}
}
