//! Controller registry and action results.

use crate::context::ActionContext;
use serde_json::{Map, Value};
use slys_core::{Error, Result, to_camel_case};
use slys_views::View;
use std::collections::HashMap;
use std::sync::Arc;

/// A registered controller action.
pub type Action = Arc<dyn Fn(&mut ActionContext<'_>) -> Result<ActionReturn> + Send + Sync>;

/// What an action hands back to the dispatcher.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ActionReturn {
	/// Keep the working view as the action left it.
	#[default]
	Keep,
	/// Replace the working view, template included.
	View(View),
	/// Merge into the working view's assigns. The template is kept.
	Assigns(Map<String, Value>),
}

impl From<()> for ActionReturn {
	fn from(_: ()) -> Self {
		Self::Keep
	}
}

impl From<View> for ActionReturn {
	fn from(view: View) -> Self {
		Self::View(view)
	}
}

impl From<Map<String, Value>> for ActionReturn {
	fn from(assigns: Map<String, Value>) -> Self {
		Self::Assigns(assigns)
	}
}

impl From<Value> for ActionReturn {
	fn from(value: Value) -> Self {
		match value {
			Value::Object(assigns) => Self::Assigns(assigns),
			_ => Self::Keep,
		}
	}
}

/// `<CamelModule>.Controller.<CamelController>`
///
/// # Examples
///
/// ```
/// use slys_dispatch::controller::controller_key;
///
/// assert_eq!(controller_key("shop", "order-item", '-'), "Shop.Controller.OrderItem");
/// ```
pub fn controller_key(module: &str, controller: &str, separator: char) -> String {
	format!(
		"{}.Controller.{}",
		to_camel_case(module, true, separator),
		to_camel_case(controller, true, separator)
	)
}

/// `<camelAction>Action`
///
/// # Examples
///
/// ```
/// use slys_dispatch::controller::action_key;
///
/// assert_eq!(action_key("add-item", '-'), "addItemAction");
/// ```
pub fn action_key(action: &str, separator: char) -> String {
	format!("{}Action", to_camel_case(action, false, separator))
}

/// Actions indexed by controller key and action key.
#[derive(Default, Clone)]
pub struct ControllerRegistry {
	controllers: HashMap<String, HashMap<String, Action>>,
}

impl ControllerRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, controller_key: String, action_key: String, action: Action) {
		self.controllers
			.entry(controller_key)
			.or_default()
			.insert(action_key, action);
	}

	pub fn contains_controller(&self, controller_key: &str) -> bool {
		self.controllers.contains_key(controller_key)
	}

	/// Find an action, failing with [`Error::Resolution`] on a miss.
	pub fn resolve(&self, controller_key: &str, action_key: &str) -> Result<Action> {
		let actions = self.controllers.get(controller_key).ok_or_else(|| {
			Error::Resolution(format!("controller `{}` not found", controller_key))
		})?;

		actions.get(action_key).cloned().ok_or_else(|| {
			Error::Resolution(format!(
				"action `{}` not found in `{}`",
				action_key, controller_key
			))
		})
	}

	pub fn len(&self) -> usize {
		self.controllers.values().map(HashMap::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.controllers.is_empty()
	}
}

impl std::fmt::Debug for ControllerRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut keys: Vec<_> = self.controllers.keys().collect();
		keys.sort();
		f.debug_struct("ControllerRegistry")
			.field("controllers", &keys)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn noop() -> Action {
		Arc::new(|_: &mut ActionContext<'_>| -> Result<ActionReturn> { Ok(ActionReturn::Keep) })
	}

	#[rstest]
	#[case("index", "index", "Index.Controller.Index")]
	#[case("shop", "cart", "Shop.Controller.Cart")]
	#[case("my-shop", "CART", "MyShop.Controller.Cart")]
	fn test_controller_key(#[case] module: &str, #[case] controller: &str, #[case] expected: &str) {
		assert_eq!(controller_key(module, controller, '-'), expected);
	}

	#[rstest]
	#[case("index", '-', "indexAction")]
	#[case("my-action-name", '-', "myActionNameAction")]
	#[case("my_action", '_', "myActionAction")]
	fn test_action_key(#[case] action: &str, #[case] separator: char, #[case] expected: &str) {
		assert_eq!(action_key(action, separator), expected);
	}

	#[rstest]
	fn test_resolve_misses() {
		let mut registry = ControllerRegistry::new();
		registry.insert("Shop.Controller.Cart".into(), "addAction".into(), noop());

		assert!(registry.resolve("Shop.Controller.Cart", "addAction").is_ok());
		assert!(matches!(
			registry.resolve("Shop.Controller.Cart", "removeAction"),
			Err(Error::Resolution(_))
		));
		assert!(matches!(
			registry.resolve("Shop.Controller.Order", "addAction"),
			Err(Error::Resolution(_))
		));
		assert_eq!(registry.len(), 1);
	}

	#[rstest]
	fn test_action_return_conversions() {
		assert_eq!(ActionReturn::from(()), ActionReturn::Keep);
		assert_eq!(ActionReturn::from(json!("text")), ActionReturn::Keep);
		assert!(matches!(ActionReturn::from(json!({ "a": 1 })), ActionReturn::Assigns(_)));
		assert!(matches!(ActionReturn::from(View::new()), ActionReturn::View(_)));
	}
}
