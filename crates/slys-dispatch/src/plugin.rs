//! Dispatch plugins.

use crate::context::PluginContext;

/// Hooks run around the main dispatch of every cycle.
///
/// Returning `false` stops the remaining plugins of the same hook. The main
/// dispatch runs regardless.
///
/// # Examples
///
/// ```
/// use slys_dispatch::{Plugin, PluginContext};
/// use slys_views::RenderContext;
///
/// struct JsonForAjax;
///
/// impl Plugin for JsonForAjax {
///     fn pre_dispatch(&self, cx: &mut PluginContext<'_>) -> bool {
///         if cx.request().is_xml_http_request() {
///             cx.set_render_context(RenderContext::Json);
///         }
///         true
///     }
/// }
/// ```
pub trait Plugin: Send + Sync {
	fn pre_dispatch(&self, cx: &mut PluginContext<'_>) -> bool {
		let _ = cx;
		true
	}

	fn post_dispatch(&self, cx: &mut PluginContext<'_>) -> bool {
		let _ = cx;
		true
	}
}
