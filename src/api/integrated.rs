//! Register route for embedding into an existing axum application.
//!
//! Configuration problems do not prevent the router from being built: the route keeps
//! answering preflights with 204 and reports the problem as a 500 on every `POST`, so the
//! host application stays up while an operator fixes the environment.

// crates.io
use axum::Router;
use tracing::warn;
// self
use crate::{
	_prelude::*,
	api::{self, SharedRelay},
	config::{DEFAULT_ALLOWED_ORIGIN, Settings},
	relay::Relay,
};

/// Builds the register route from environment `settings`.
pub fn router(settings: Settings) -> Router {
	let origin = settings.allowed_origin().unwrap_or_else(|err| {
		warn!(error = %err, "Falling back to the default CORS origin.");

		axum::http::HeaderValue::from_static(DEFAULT_ALLOWED_ORIGIN)
	});
	let relay = Relay::from_settings(settings);

	if let Err(err) = &relay {
		warn!(error = %err, "Registration relay is not configured; submissions will answer 500.");
	}

	api::with_cors(api::register_routes(SharedRelay::new(relay)), origin)
}

/// Builds the register route around an already configured relay.
pub fn router_with_relay(relay: Relay) -> Router {
	let origin = relay.config().allowed_origin.clone();

	api::with_cors(api::register_routes(Arc::new(Ok(relay))), origin)
}
