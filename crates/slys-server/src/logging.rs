//! Subscriber setup for binaries built on Slys.

use crate::server::BoxError;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Install a formatting subscriber filtered by `RUST_LOG`.
///
/// Does nothing if a global subscriber is already installed.
pub fn init() {
	if let Err(e) = try_init() {
		tracing::debug!(error = %e, "tracing subscriber not installed");
	}
}

/// Like [`init`], but reports why the subscriber could not be installed.
pub fn try_init() -> Result<(), BoxError> {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
		.add_directive("hyper=warn".parse()?)
		.add_directive("sqlx=warn".parse()?);

	tracing_subscriber::fmt().with_env_filter(filter).try_init()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_init_twice_does_not_panic() {
		init();
		init();
		assert!(try_init().is_err());
	}
}
