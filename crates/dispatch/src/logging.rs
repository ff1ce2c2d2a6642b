//! Tracing subscriber setup for applications embedding the dispatcher.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;

/// Environment variable holding the filter directives. Falls back to `RUST_LOG`.
pub const LOG_ENV: &str = "LATCH_LOG";

fn filter(verbose: bool) -> EnvFilter {
	EnvFilter::try_from_env(LOG_ENV)
		.or_else(|_| EnvFilter::try_from_default_env())
		.unwrap_or_else(|_| {
			if verbose {
				EnvFilter::new("latch_codec=trace,latch_convert=trace,latch_dispatch=trace,latch_handler=trace,info")
			} else {
				EnvFilter::new("latch_dispatch=debug,warn")
			}
		})
}

/// Installs a global `fmt` subscriber.
///
/// Fails if a global subscriber is already set.
pub fn try_init(verbose: bool) -> Result<(), TryInitError> {
	tracing_subscriber::registry()
		.with(filter(verbose))
		.with(tracing_subscriber::fmt::layer().with_target(true))
		.try_init()
}

/// Like [`try_init`], but leaves an existing subscriber in place.
pub fn init(verbose: bool) {
	if try_init(verbose).is_err() {
		tracing::debug!("global subscriber already installed");
	}
}
