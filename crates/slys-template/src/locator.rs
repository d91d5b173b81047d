//! Template path conventions.

use slys_conf::Settings;
use std::path::PathBuf;

/// Maps dispatch targets and layout names to template files.
///
/// # Examples
///
/// ```
/// use slys_conf::Settings;
/// use slys_template::TemplateLocator;
/// use std::path::PathBuf;
///
/// let locator = TemplateLocator::new(&Settings::default());
///
/// assert_eq!(
///     locator.view_template("shop", "cart", "add"),
///     PathBuf::from("modules/shop/views/cart/add.html"),
/// );
/// assert_eq!(locator.layout_template("main"), PathBuf::from("layouts/main.html"));
/// ```
#[derive(Debug, Clone)]
pub struct TemplateLocator {
	settings: Settings,
}

impl TemplateLocator {
	pub fn new(settings: &Settings) -> Self {
		Self {
			settings: settings.clone(),
		}
	}

	/// `<views root>/<controller>/<action>.<ext>`, see [`Settings::views_root`].
	pub fn view_template(&self, module: &str, controller: &str, action: &str) -> PathBuf {
		self.settings
			.views_root(module)
			.join(controller)
			.join(format!("{}.{}", action, self.settings.paths.template_extension))
	}

	/// `<layouts_root>/<name>.<ext>`
	pub fn layout_template(&self, name: &str) -> PathBuf {
		self.settings
			.paths
			.layouts_root
			.join(format!("{}.{}", name, self.settings.paths.template_extension))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use slys_conf::ModuleSettings;

	#[rstest]
	fn test_module_override_and_extension() {
		let mut settings = Settings::default();
		settings.paths.template_extension = "tera".to_string();
		settings.modules.insert(
			"admin".to_string(),
			ModuleSettings {
				views: Some(PathBuf::from("/srv/admin")),
			},
		);
		settings.modules.insert("shop".to_string(), ModuleSettings::default());

		let locator = TemplateLocator::new(&settings);

		assert_eq!(
			locator.view_template("admin", "user", "list"),
			PathBuf::from("/srv/admin/user/list.tera")
		);
		assert_eq!(
			locator.view_template("shop", "index", "index"),
			PathBuf::from("modules/shop/views/index/index.tera")
		);
		assert_eq!(locator.layout_template("main"), PathBuf::from("layouts/main.tera"));
	}

	#[rstest]
	fn test_view_template_follows_settings_views_root() {
		let mut settings = Settings::default();
		settings.paths.modules_root = PathBuf::from("/srv/app/modules");
		settings.modules.insert(
			"blog".to_string(),
			ModuleSettings {
				views: Some(PathBuf::from("/srv/blog/templates")),
			},
		);

		let locator = TemplateLocator::new(&settings);

		for module in ["blog", "shop"] {
			assert_eq!(
				locator.view_template(module, "post", "show"),
				settings.views_root(module).join("post").join("show.html")
			);
		}
	}
}
