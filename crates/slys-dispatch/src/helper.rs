//! Custom helpers.

use serde_json::Value;
use slys_core::Result;
use slys_http::Request;

/// Helpers provided by the dispatch contexts themselves.
pub const BUILTIN_HELPERS: &[&str] = &["context", "forward", "translate", "url"];

/// A named function callable from actions and plugins.
///
/// The name returned by [`Helper::name`] must match the name the helper is
/// registered under.
pub trait Helper: Send + Sync {
	fn name(&self) -> &str;

	fn call(&self, request: &Request, args: &[Value]) -> Result<Value>;
}

/// Whether `name` is taken by a built-in helper.
pub fn is_builtin(name: &str) -> bool {
	BUILTIN_HELPERS.contains(&name)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("url", true)]
	#[case("translate", true)]
	#[case("currency", false)]
	fn test_is_builtin(#[case] name: &str, #[case] expected: bool) {
		assert_eq!(is_builtin(name), expected);
	}
}
