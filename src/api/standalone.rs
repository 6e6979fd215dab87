//! Standalone registration server.
//!
//! Unlike the integrated route, the standalone server refuses to start without complete
//! configuration. It also answers `OPTIONS` on any path with 204, serves [`HEALTH_PATH`], and
//! returns an empty 404 for everything else.

// crates.io
use axum::{
	Json, Router,
	response::{IntoResponse, Response},
	routing::get,
};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
// self
use crate::{
	_prelude::*,
	api::{self, HEALTH_PATH},
	config::Settings,
	relay::Relay,
};

/// Body returned by [`HEALTH_PATH`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
	/// Always `"ok"`.
	pub status: Cow<'static, str>,
}

/// Builds the full standalone router around `relay`.
pub fn router(relay: Relay) -> Router {
	let origin = relay.config().allowed_origin.clone();
	let routes = api::register_routes(Arc::new(Ok(relay)))
		.route(HEALTH_PATH, get(health).options(preflight))
		.fallback(fallback);

	api::with_cors(routes, origin)
}

/// Loads the relay from `settings`, binds `0.0.0.0:<API_PORT>`, and serves until Ctrl+C or
/// SIGTERM.
pub async fn serve(settings: Settings) -> Result<()> {
	let port = settings.port()?;
	let relay = Relay::from_settings(settings)?;
	let listener = TcpListener::bind(("0.0.0.0", port)).await?;

	info!(address = %listener.local_addr()?, "Registration API listening.");

	axum::serve(listener, router(relay)).with_graceful_shutdown(shutdown_signal()).await?;

	info!("Registration API stopped.");

	Ok(())
}

async fn health() -> Json<Health> {
	Json(Health { status: Cow::Borrowed("ok") })
}

async fn preflight() -> StatusCode {
	StatusCode::NO_CONTENT
}

async fn fallback(method: Method) -> Response {
	if method == Method::OPTIONS {
		StatusCode::NO_CONTENT.into_response()
	} else {
		StatusCode::NOT_FOUND.into_response()
	}
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(err) = signal::ctrl_c().await {
			warn!(error = %err, "Failed to install the Ctrl+C handler.");
			std::future::pending::<()>().await;
		}

		info!("Received Ctrl+C, shutting down.");
	};
	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;

				info!("Received terminate signal, shutting down.");
			},
			Err(err) => {
				warn!(error = %err, "Failed to install the SIGTERM handler.");
				std::future::pending::<()>().await;
			},
		}
	};
	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}
