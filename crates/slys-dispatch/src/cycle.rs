//! Per-request mutable state.

use slys_http::Request;
use slys_views::RenderContext;
use std::collections::VecDeque;

/// State of one `Application::run`.
///
/// Holds everything an action or plugin may change during the cycle, so the
/// application itself stays immutable and shareable.
#[derive(Debug)]
pub struct Cycle {
	top: Request,
	forwards: VecDeque<Request>,
	accepting_forwards: bool,
	context: RenderContext,
	title: Option<String>,
	layout: Option<String>,
	language: String,
}

impl Cycle {
	pub fn new(top: Request, language: impl Into<String>) -> Self {
		Self {
			top,
			forwards: VecDeque::new(),
			accepting_forwards: true,
			context: RenderContext::default(),
			title: None,
			layout: None,
			language: language.into(),
		}
	}

	/// The request the cycle started with.
	pub fn top_request(&self) -> &Request {
		&self.top
	}

	/// Queue a forward. Ignored once the forward queue was drained.
	pub fn forward(&mut self, request: Request) {
		if !self.accepting_forwards {
			tracing::warn!(
				module = %request.module(),
				controller = %request.controller(),
				action = %request.action(),
				"forward issued after dispatch finished, discarding"
			);
			return;
		}
		tracing::debug!(
			module = %request.module(),
			controller = %request.controller(),
			action = %request.action(),
			"forward queued"
		);
		self.forwards.push_back(request);
	}

	pub(crate) fn next_forward(&mut self) -> Option<Request> {
		self.forwards.pop_front()
	}

	pub(crate) fn close_forwards(&mut self) {
		self.accepting_forwards = false;
		self.forwards.clear();
	}

	pub fn pending_forwards(&self) -> usize {
		self.forwards.len()
	}

	pub fn render_context(&self) -> RenderContext {
		self.context
	}

	pub fn set_render_context(&mut self, context: RenderContext) {
		self.context = context;
	}

	pub fn set_title(&mut self, title: impl Into<String>) {
		self.title = Some(title.into());
	}

	pub(crate) fn take_title(&mut self) -> Option<String> {
		self.title.take()
	}

	/// Request a layout switch, applied after the current dispatch.
	pub fn set_layout(&mut self, layout: impl Into<String>) {
		self.layout = Some(layout.into());
	}

	pub(crate) fn take_layout(&mut self) -> Option<String> {
		self.layout.take()
	}

	pub fn language(&self) -> &str {
		&self.language
	}

	pub fn set_language(&mut self, language: impl Into<String>) {
		self.language = language.into();
	}
}
