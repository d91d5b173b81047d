//! Framework error types.
//!
//! Every error is fatal for the request cycle that raised it: nothing in the
//! pipeline retries, errors propagate to the top of `Application::run` and
//! surface as a failed response.

use thiserror::Error;

/// Result type used across the Slys crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Slys framework errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
	/// No controller or action is registered for the resolved names.
	#[error("resolution error: {0}")]
	Resolution(String),

	/// A view or layout template is unset or missing on disk.
	#[error("template not found: {0}")]
	TemplateNotFound(String),

	/// The template engine failed while rendering an existing template.
	#[error("template error: {0}")]
	Template(String),

	/// Invalid placeholder, helper, plugin or settings setup.
	#[error("configuration error: {0}")]
	Configuration(String),

	/// Persistence operation failed or was invoked in an invalid state.
	#[error("persistence error: {0}")]
	Persistence(String),

	/// A named helper, placeholder or service was requested but is not available.
	#[error("lookup error: {0}")]
	Lookup(String),

	/// JSON serialization failed.
	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	/// IO error.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

impl Error {
	/// Returns `true` for errors caused by a missing or unset template.
	pub fn is_template_not_found(&self) -> bool {
		matches!(self, Self::TemplateNotFound(_))
	}

	/// Returns `true` for controller/action resolution failures.
	pub fn is_resolution(&self) -> bool {
		matches!(self, Self::Resolution(_))
	}
}
