//! Standalone registration relay server.

// std
use std::process::ExitCode;
// self
use sheets_relay::{api::standalone, config::Settings, obs};

#[tokio::main]
async fn main() -> ExitCode {
	obs::init_tracing();

	let result = match Settings::from_env() {
		Ok(settings) => standalone::serve(settings).await,
		Err(err) => Err(err.into()),
	};

	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			tracing::error!(error = %err, source = ?std::error::Error::source(&err), "Registration API failed to run.");

			ExitCode::FAILURE
		},
	}
}
