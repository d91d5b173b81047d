//! Case conversion for routing and persistence names.
//!
//! URL segments such as `my-action-name` become controller and action
//! identifiers (`MyActionName`, `myActionName`), and type names such as
//! `ProductCategory` become table names (`product_category`).

/// Converts a separator-delimited token to camelCase.
///
/// The token is lower-cased first, then split on `separator` and on spaces;
/// every word is capitalized and the separators are removed. The first letter
/// is lower-cased unless `camel_first` is set.
///
/// # Examples
///
/// ```
/// use slys_core::to_camel_case;
///
/// assert_eq!(to_camel_case("my-action-name", false, '-'), "myActionName");
/// assert_eq!(to_camel_case("my-action-name", true, '-'), "MyActionName");
/// assert_eq!(to_camel_case("order_item", true, '_'), "OrderItem");
/// ```
pub fn to_camel_case(input: &str, camel_first: bool, separator: char) -> String {
	let lowered = input.to_lowercase();

	let mut result: String = lowered
		.split(|c: char| c == separator || c == ' ')
		.filter(|word| !word.is_empty())
		.map(capitalize)
		.collect();

	if !camel_first {
		result = lower_first(&result);
	}

	result
}

/// Converts a CamelCase name to snake_case.
///
/// # Examples
///
/// ```
/// use slys_core::to_snake_case;
///
/// assert_eq!(to_snake_case("ProductCategory"), "product_category");
/// assert_eq!(to_snake_case("user"), "user");
/// ```
pub fn to_snake_case(input: &str) -> String {
	let mut result = String::with_capacity(input.len() + 4);

	for (index, ch) in lower_first(input).chars().enumerate() {
		if ch.is_uppercase() {
			if index > 0 {
				result.push('_');
			}
			result.extend(ch.to_lowercase());
		} else {
			result.push(ch);
		}
	}

	result
}

fn capitalize(word: &str) -> String {
	let mut chars = word.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

fn lower_first(word: &str) -> String {
	let mut chars = word.chars();
	match chars.next() {
		Some(first) => first.to_lowercase().chain(chars).collect(),
		None => String::new(),
	}
}
