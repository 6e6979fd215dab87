// crates.io
use tracing::Span;
use tracing_subscriber::EnvFilter;
// self
use crate::obs::Stage;

/// Span wrapping one pipeline stage.
pub fn stage_span(stage: Stage) -> Span {
	tracing::info_span!("sheets_relay.submission", stage = stage.as_str())
}

/// Installs the global `fmt` subscriber, filtered by `RUST_LOG` (defaults to `info`).
///
/// Later calls leave the first subscriber in place.
pub fn init_tracing() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
}

#[cfg(test)]
mod tests {
	// crates.io
	use tracing::Instrument;
	// self
	use super::*;

	#[tokio::test]
	async fn stage_span_wraps_future() {
		let value = async { 42 }.instrument(stage_span(Stage::Authenticate)).await;

		assert_eq!(value, 42);
	}

	#[test]
	fn init_tracing_is_idempotent() {
		init_tracing();
		init_tracing();
	}
}
