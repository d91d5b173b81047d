//! Request parameter parsing.
//!
//! Parameters come from three places, merged in increasing priority:
//! positional `name/value` path segments, the query string, and an
//! `application/x-www-form-urlencoded` body.

/// Parse a query string (without the leading `?`) into decoded pairs.
///
/// Malformed input yields no pairs rather than an error.
///
/// # Examples
///
/// ```
/// use slys_http::params::parse_query;
///
/// let pairs = parse_query("name=John%20Doe&empty=");
/// assert_eq!(pairs, vec![
///     ("name".to_string(), "John Doe".to_string()),
///     ("empty".to_string(), String::new()),
/// ]);
/// ```
pub fn parse_query(query: &str) -> Vec<(String, String)> {
	match serde_urlencoded::from_str::<Vec<(String, String)>>(query) {
		Ok(pairs) => pairs,
		Err(e) => {
			tracing::debug!("ignoring malformed query string: {}", e);
			Vec::new()
		}
	}
}

/// Parse an urlencoded form body into decoded pairs.
pub fn parse_form(body: &[u8]) -> Vec<(String, String)> {
	match serde_urlencoded::from_bytes::<Vec<(String, String)>>(body) {
		Ok(pairs) => pairs,
		Err(e) => {
			tracing::debug!("ignoring malformed form body: {}", e);
			Vec::new()
		}
	}
}

/// Read positional segments pairwise as `name/value`.
///
/// An odd trailing name is paired with an empty value.
///
/// # Examples
///
/// ```
/// use slys_http::params::positional_params;
///
/// let pairs = positional_params(&["sku", "42", "color"]);
/// assert_eq!(pairs, vec![
///     ("sku".to_string(), "42".to_string()),
///     ("color".to_string(), String::new()),
/// ]);
/// ```
pub fn positional_params<S: AsRef<str>>(segments: &[S]) -> Vec<(String, String)> {
	segments
		.chunks(2)
		.map(|pair| {
			let name = pair[0].as_ref().to_string();
			let value = pair
				.get(1)
				.map(|v| v.as_ref().to_string())
				.unwrap_or_default();
			(name, value)
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_positional_even() {
		let pairs = positional_params(&["a", "1", "b", "2"]);
		assert_eq!(
			pairs,
			vec![
				("a".to_string(), "1".to_string()),
				("b".to_string(), "2".to_string()),
			]
		);
	}

	#[rstest]
	fn test_positional_empty() {
		let segments: [&str; 0] = [];
		assert!(positional_params(&segments).is_empty());
	}

	#[rstest]
	fn test_parse_form_plus_is_space() {
		let pairs = parse_form(b"title=Hello+World&qty=3");
		assert_eq!(pairs[0], ("title".to_string(), "Hello World".to_string()));
		assert_eq!(pairs[1], ("qty".to_string(), "3".to_string()));
	}

	#[rstest]
	fn test_parse_query_preserves_equals_in_value() {
		let pairs = parse_query("token=abc%3D%3D");
		assert_eq!(pairs, vec![("token".to_string(), "abc==".to_string())]);
	}
}
