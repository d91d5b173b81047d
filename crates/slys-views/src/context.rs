//! HTML / JSON render context.

use std::fmt;

/// Output format of a request cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RenderContext {
	#[default]
	Html,
	Json,
}

impl RenderContext {
	pub fn is_json(self) -> bool {
		self == Self::Json
	}

	pub fn content_type(self) -> &'static str {
		match self {
			Self::Html => "text/html; charset=utf-8",
			Self::Json => "application/json",
		}
	}
}

impl fmt::Display for RenderContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Html => f.write_str("html"),
			Self::Json => f.write_str("json"),
		}
	}
}

/// The body produced by a request cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
	Html(String),
	Json(String),
}

impl Rendered {
	pub fn body(&self) -> &str {
		match self {
			Self::Html(body) | Self::Json(body) => body,
		}
	}

	pub fn into_body(self) -> String {
		match self {
			Self::Html(body) | Self::Json(body) => body,
		}
	}

	pub fn context(&self) -> RenderContext {
		match self {
			Self::Html(_) => RenderContext::Html,
			Self::Json(_) => RenderContext::Json,
		}
	}

	pub fn content_type(&self) -> &'static str {
		self.context().content_type()
	}
}
