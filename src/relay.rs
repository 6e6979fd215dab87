//! Core submission handler shared by both HTTP adapters.
//!
//! [`dispatch`] runs one request through `validate → authenticate → append` and maps every
//! outcome onto a [`RelayReply`]. Adapters only translate their framework's request into a
//! [`RelayRequest`] and the reply back into a response, so both deployment variants share the
//! exact status mapping:
//!
//! - `OPTIONS` always answers 204, even when the relay is misconfigured.
//! - Missing configuration answers 500 before the body is looked at.
//! - Client defects answer 400 (413 for oversized bodies) without any outbound call.
//! - Token or append failures answer 502; the append never runs after a failed token exchange.

// crates.io
use tracing::{Instrument, debug, error, info, warn};
// self
use crate::{
	_prelude::*,
	auth::{self, AccessToken},
	config::{RelayConfig, Settings},
	error::{ConfigError, SubmissionError},
	http::HttpClient,
	obs::{self, Outcome, Stage},
	sheets::{self, AppendReceipt},
	submission::Submission,
};

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 1_000_000;

/// Configured relay: immutable settings plus the outbound HTTP client.
///
/// Cloning is cheap; clones share the configuration and connection pool.
#[derive(Clone, Debug)]
pub struct Relay {
	config: Arc<RelayConfig>,
	http_client: HttpClient,
	clock: fn() -> OffsetDateTime,
}
impl Relay {
	/// Creates a relay with a client built from `config`.
	pub fn new(config: RelayConfig) -> Result<Self, ConfigError> {
		let http_client = HttpClient::build(config.upstream_timeout)?;

		Ok(Self { config: Arc::new(config), http_client, clock: OffsetDateTime::now_utc })
	}

	/// Validates `settings` and creates a relay from them.
	pub fn from_settings(settings: Settings) -> Result<Self, ConfigError> {
		Self::new(settings.into_config()?)
	}

	/// Replaces the outbound HTTP client.
	pub fn with_http_client(mut self, http_client: HttpClient) -> Self {
		self.http_client = http_client;

		self
	}

	/// Replaces the clock used for assertion timestamps and default `submittedAt` values.
	pub fn with_clock(mut self, clock: fn() -> OffsetDateTime) -> Self {
		self.clock = clock;

		self
	}

	/// Configuration the relay was built from.
	pub fn config(&self) -> &RelayConfig {
		&self.config
	}

	/// Runs one JSON body through validation, authentication, and append.
	pub async fn submit(&self, body: &[u8]) -> Result<AppendReceipt> {
		let submission =
			staged(Stage::Validate, async { Submission::from_json(body).map_err(Error::from) })
				.await?;

		debug!(
			experience = submission.experience_level().map(|level| level.as_str()),
			"Registration validated."
		);

		let token = staged(Stage::Authenticate, self.authenticate()).await?;
		let now = (self.clock)();
		let row = submission.into_row(now, &self.config.source_tag);

		staged(Stage::Append, async {
			sheets::append_row(&self.http_client, &self.config.sheet, &token, &row)
				.await
				.map_err(Error::from)
		})
		.await
	}

	/// Signs a fresh assertion and exchanges it for a bearer token.
	pub async fn authenticate(&self) -> Result<AccessToken> {
		let account = &self.config.service_account;
		let assertion = auth::sign_assertion(account, (self.clock)())?;
		let token =
			auth::exchange_assertion(&self.http_client, &account.token_endpoint, &assertion).await?;

		Ok(token)
	}
}

/// Framework-neutral view of an inbound request.
#[derive(Debug)]
pub struct RelayRequest {
	/// HTTP method.
	pub method: Method,
	/// Buffered body, or the reason it could not be read.
	pub body: Result<Bytes, SubmissionError>,
}
impl RelayRequest {
	/// Creates a request with a successfully buffered body.
	pub fn new(method: Method, body: impl Into<Bytes>) -> Self {
		Self { method, body: Ok(body.into()) }
	}
}

/// JSON body returned by the register endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyBody {
	/// Whether the registration was stored.
	pub ok: bool,
	/// User-safe failure description; absent on success.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

/// Framework-neutral response produced by [`dispatch`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayReply {
	/// HTTP status.
	pub status: StatusCode,
	/// JSON body; `None` for 204 replies.
	pub body: Option<ReplyBody>,
}
impl RelayReply {
	/// `204 No Content` preflight reply.
	pub fn no_content() -> Self {
		Self { status: StatusCode::NO_CONTENT, body: None }
	}

	/// `200 {"ok":true}`.
	pub fn accepted() -> Self {
		Self { status: StatusCode::OK, body: Some(ReplyBody { ok: true, message: None }) }
	}

	/// `{"ok":false,"message":...}` with `status`.
	pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
		Self { status, body: Some(ReplyBody { ok: false, message: Some(message.into()) }) }
	}

	fn from_error(err: &Error) -> Self {
		Self::failure(err.status(), err.public_message())
	}
}

/// Handles one request against `relay`, or against the configuration error that prevented
/// building it.
pub async fn dispatch(relay: Result<&Relay, &ConfigError>, request: RelayRequest) -> RelayReply {
	if request.method == Method::OPTIONS {
		return RelayReply::no_content();
	}

	let relay = match relay {
		Ok(relay) => relay,
		Err(err) => {
			error!(error = %err, "Registration relay is not configured.");

			return RelayReply::failure(StatusCode::INTERNAL_SERVER_ERROR, err.public_message());
		},
	};
	let outcome = if request.method != Method::POST {
		Err(SubmissionError::MethodNotAllowed { method: request.method }.into())
	} else {
		match request.body {
			Ok(body) => relay.submit(&body).await,
			Err(err) => Err(err.into()),
		}
	};

	match outcome {
		Ok(receipt) => {
			info!(
				updated_range = receipt.updated_range.as_deref().unwrap_or("unknown"),
				"Registration appended."
			);

			RelayReply::accepted()
		},
		Err(err) => {
			log_failure(&err);

			RelayReply::from_error(&err)
		},
	}
}

async fn staged<T, Fut>(stage: Stage, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	obs::count(stage, Outcome::Attempt);

	let result = fut.instrument(obs::stage_span(stage)).await;

	obs::count(stage, Outcome::of(&result));

	result
}

fn log_failure(err: &Error) {
	match err {
		Error::Submission(inner) => warn!(error = %inner, "Registration rejected."),
		Error::Config(inner) => error!(error = %inner, source = ?inner.source(), "Submission failed."),
		Error::Io(inner) => error!(error = %inner, "Submission failed."),
		Error::Upstream(inner) => error!(
			stage = %inner.stage(),
			error = %inner,
			source = ?inner.source(),
			"Submission failed."
		),
	}
}
