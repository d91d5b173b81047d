//! SQL text helpers for the MySQL dialect.

use serde_json::Value;

/// Escape a string the way `mysql_real_escape_string` does.
///
/// # Examples
///
/// ```
/// use slys_db::sql::escape_string;
///
/// assert_eq!(escape_string("O'Brien"), r"O\'Brien");
/// assert_eq!(escape_string("a\nb"), r"a\nb");
/// ```
pub fn escape_string(value: &str) -> String {
	let mut escaped = String::with_capacity(value.len() + 2);
	for ch in value.chars() {
		match ch {
			'\0' => escaped.push_str("\\0"),
			'\n' => escaped.push_str("\\n"),
			'\r' => escaped.push_str("\\r"),
			'\\' => escaped.push_str("\\\\"),
			'\'' => escaped.push_str("\\'"),
			'"' => escaped.push_str("\\\""),
			'\x1a' => escaped.push_str("\\Z"),
			_ => escaped.push(ch),
		}
	}
	escaped
}

/// Quote a table or column name with backticks.
pub fn quote_ident(name: &str) -> String {
	format!("`{}`", name.replace('`', "``"))
}

/// Render a value as an SQL literal.
///
/// Numbers are written as is, strings are escaped and single-quoted,
/// booleans become `1`/`0`, `null` becomes `NULL`, and arrays or objects are
/// stored as quoted JSON text.
///
/// # Examples
///
/// ```
/// use slys_db::sql::literal;
/// use serde_json::json;
///
/// assert_eq!(literal(&json!(5)), "5");
/// assert_eq!(literal(&json!("it's")), r"'it\'s'");
/// assert_eq!(literal(&json!(true)), "1");
/// assert_eq!(literal(&json!(null)), "NULL");
/// ```
pub fn literal(value: &Value) -> String {
	match value {
		Value::Null => "NULL".to_string(),
		Value::Bool(true) => "1".to_string(),
		Value::Bool(false) => "0".to_string(),
		Value::Number(n) => n.to_string(),
		Value::String(s) => format!("'{}'", escape_string(s)),
		other => format!("'{}'", escape_string(&other.to_string())),
	}
}

/// `` `column` = literal `` joined by `separator`.
pub(crate) fn assignments<'a, I>(pairs: I, separator: &str) -> String
where
	I: IntoIterator<Item = (&'a str, &'a Value)>,
{
	pairs
		.into_iter()
		.map(|(column, value)| format!("{} = {}", quote_ident(column), literal(value)))
		.collect::<Vec<_>>()
		.join(separator)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("plain", "plain")]
	#[case("back\\slash", "back\\\\slash")]
	#[case("nul\0", "nul\\0")]
	#[case("\"quoted\"", "\\\"quoted\\\"")]
	#[case("ctrl\x1a", "ctrl\\Z")]
	fn test_escape_string(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(escape_string(input), expected);
	}

	#[rstest]
	fn test_quote_ident_doubles_backticks() {
		assert_eq!(quote_ident("order"), "`order`");
		assert_eq!(quote_ident("we`ird"), "`we``ird`");
	}

	#[rstest]
	#[case(json!(1.5), "1.5")]
	#[case(json!(-3), "-3")]
	#[case(json!(false), "0")]
	#[case(json!(["a"]), r#"'[\"a\"]'"#)]
	fn test_literal(#[case] value: Value, #[case] expected: &str) {
		assert_eq!(literal(&value), expected);
	}

	#[rstest]
	fn test_assignments() {
		let a = json!(1);
		let b = json!("x");
		assert_eq!(
			assignments([("a", &a), ("b", &b)], " AND "),
			"`a` = 1 AND `b` = 'x'"
		);
	}
}
