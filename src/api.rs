//! axum adapters over [`relay::dispatch`](crate::relay::dispatch).
//!
//! [`integrated`] exposes only the register route so it can be merged into an existing
//! router; [`standalone`] adds the health path, a 404 fallback, and the listener loop. Both
//! attach the same CORS headers to every response.

pub mod integrated;
pub mod standalone;

// crates.io
use axum::{
	Json, Router,
	extract::{DefaultBodyLimit, State, rejection::BytesRejection},
	http::{
		HeaderName, HeaderValue,
		header::{
			ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
			ACCESS_CONTROL_ALLOW_ORIGIN,
		},
	},
	response::{IntoResponse, Response},
	routing::any,
};
use tower_http::set_header::SetResponseHeaderLayer;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, SubmissionError},
	relay::{self, MAX_BODY_BYTES, Relay, RelayReply, RelayRequest},
};

/// Registration endpoint path.
pub const REGISTER_PATH: &str = "/api/register";
/// Health-check path (standalone server only).
pub const HEALTH_PATH: &str = "/api/health";

/// Relay shared with handlers; the error side keeps a misconfigured relay answering 500.
pub type SharedRelay = Arc<Result<Relay, ConfigError>>;

impl IntoResponse for RelayReply {
	fn into_response(self) -> Response {
		match self.body {
			Some(body) => (self.status, Json(body)).into_response(),
			None => self.status.into_response(),
		}
	}
}

/// Routes every method on [`REGISTER_PATH`] to the relay, which answers anything other than
/// `POST`/`OPTIONS` with a JSON 405.
fn register_routes(relay: SharedRelay) -> Router {
	Router::new()
		.route(REGISTER_PATH, any(register))
		.layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
		.with_state(relay)
}

async fn register(
	State(relay): State<SharedRelay>,
	method: Method,
	body: Result<Bytes, BytesRejection>,
) -> RelayReply {
	let relay: &Result<Relay, ConfigError> = &relay;
	let request = RelayRequest { method, body: body.map_err(body_error) };

	relay::dispatch(relay.as_ref(), request).await
}

fn body_error(rejection: BytesRejection) -> SubmissionError {
	if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
		SubmissionError::PayloadTooLarge { limit: MAX_BODY_BYTES }
	} else {
		SubmissionError::Unreadable
	}
}

/// Attaches the permissive CORS headers to every response from `router`.
fn with_cors(router: Router, origin: HeaderValue) -> Router {
	let header = |name: HeaderName, value: HeaderValue| {
		SetResponseHeaderLayer::overriding(name, value)
	};

	router
		.layer(header(ACCESS_CONTROL_ALLOW_ORIGIN, origin))
		.layer(header(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("POST,OPTIONS")))
		.layer(header(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type")))
}
