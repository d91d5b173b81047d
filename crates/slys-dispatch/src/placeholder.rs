//! Layout placeholder units built from settings.

use indexmap::IndexMap;
use slys_conf::{PlaceholderSetting, PlaceholderTarget, Settings};
use slys_core::{Error, Result};
use slys_http::Request;
use slys_views::{Placeholder, PlaceholderSource, View};
use std::sync::Arc;

/// A unit that retargets the copied request and lets it be dispatched.
pub fn target_unit(target: PlaceholderTarget) -> Placeholder {
	Arc::new(move |request: &mut Request, _: &str| -> Result<Option<View>> {
		if let Some(module) = &target.module {
			request.set_module(module);
		}
		if let Some(controller) = &target.controller {
			request.set_controller(controller);
		}
		if let Some(action) = &target.action {
			request.set_action(action);
		}
		for (name, value) in &target.params {
			request.set_param(name, value);
		}
		Ok(None)
	})
}

/// Placeholder units of every configured layout.
#[derive(Default, Clone)]
pub struct LayoutPlaceholders {
	layouts: IndexMap<String, IndexMap<String, Placeholder>>,
}

impl LayoutPlaceholders {
	/// Build the units of every layout in `settings`.
	///
	/// Named units are looked up in `named`; an unknown name is a
	/// [`Error::Configuration`].
	pub fn from_settings(
		settings: &Settings,
		named: &IndexMap<String, Placeholder>,
	) -> Result<Self> {
		let mut layouts = IndexMap::new();

		for (layout, layout_settings) in &settings.layouts {
			let mut units = IndexMap::new();
			for (placeholder, setting) in &layout_settings.placeholders {
				let unit = match setting {
					PlaceholderSetting::Target(target) => target_unit(target.clone()),
					PlaceholderSetting::Named(name) => named.get(name).cloned().ok_or_else(|| {
						Error::Configuration(format!(
							"placeholder `{}` of layout `{}` uses unregistered unit `{}`",
							placeholder, layout, name
						))
					})?,
				};
				units.insert(placeholder.clone(), unit);
			}
			layouts.insert(layout.clone(), units);
		}

		Ok(Self { layouts })
	}
}

impl PlaceholderSource for LayoutPlaceholders {
	fn placeholders(&self, layout: &str) -> IndexMap<String, Placeholder> {
		self.layouts.get(layout).cloned().unwrap_or_default()
	}
}

impl std::fmt::Debug for LayoutPlaceholders {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut map = f.debug_map();
		for (layout, units) in &self.layouts {
			map.entry(layout, &units.keys().collect::<Vec<_>>());
		}
		map.finish()
	}
}
