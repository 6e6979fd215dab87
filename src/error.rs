//! Relay-level error types and their mapping onto HTTP status codes and user-safe messages.

// self
use crate::{_prelude::*, obs::Stage};

/// Relay-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Message shown to submitters when the relay has no usable credentials.
pub const MISSING_CONFIG_MESSAGE: &str = "Missing Google Sheets configuration. Please add GOOGLE_SHEET_ID, GOOGLE_CLIENT_EMAIL, and GOOGLE_PRIVATE_KEY to your environment.";

/// Canonical relay error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Server-side configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Submitter sent a payload the relay refuses to forward.
	#[error(transparent)]
	Submission(#[from] SubmissionError),
	/// Google OAuth or Sheets failure.
	#[error(transparent)]
	Upstream(#[from] UpstreamError),
	/// Listener could not be bound or the server loop failed.
	#[error("Server I/O failed.")]
	Io(#[from] std::io::Error),
}
impl Error {
	/// HTTP status returned to the submitter for this error.
	pub fn status(&self) -> StatusCode {
		match self {
			Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::Submission(e) => e.status(),
			Self::Upstream(_) => StatusCode::BAD_GATEWAY,
			Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// User-safe message; never contains upstream bodies or error chains.
	pub fn public_message(&self) -> Cow<'static, str> {
		match self {
			Self::Config(e) => Cow::Borrowed(e.public_message()),
			Self::Submission(e) => e.public_message(),
			Self::Upstream(e) => Cow::Borrowed(e.public_message()),
			Self::Io(_) => Cow::Borrowed("Could not submit registration. Please try again later."),
		}
	}
}

/// Configuration and validation failures raised while assembling the relay.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Environment settings could not be read.
	#[error("Environment settings could not be loaded.")]
	Load(#[from] config::ConfigError),
	/// One or more required settings are unset or empty.
	#[error("Missing required settings: {}.", .missing.join(", "))]
	MissingSettings {
		/// Environment variable names that were absent.
		missing: Vec<&'static str>,
	},
	/// Service-account private key is not a PKCS#8 or PKCS#1 RSA key.
	#[error("Service-account private key could not be parsed.")]
	InvalidPrivateKey {
		/// Underlying PEM decoding failure.
		#[source]
		source: BoxError,
	},
	/// Assertion encoding or signing failed with the configured key.
	#[error("Service-account assertion could not be signed.")]
	Signing(#[from] jsonwebtoken::errors::Error),
	/// An endpoint setting is not an absolute URL.
	#[error("Setting `{name}` is not a valid URL.")]
	InvalidEndpoint {
		/// Offending environment variable.
		name: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoint URL cannot carry path segments.
	#[error("Setting `{name}` cannot be used as a base URL.")]
	CannotBeABase {
		/// Offending environment variable.
		name: &'static str,
	},
	/// Numeric setting failed to parse.
	#[error("Setting `{name}` must be a number, got `{value}`.")]
	InvalidNumber {
		/// Offending environment variable.
		name: &'static str,
		/// Raw value found in the environment.
		value: String,
	},
	/// Allowed-origin value cannot be used as a header.
	#[error("CORS origin `{value}` is not a valid header value.")]
	InvalidOrigin {
		/// Raw value found in the environment.
		value: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild(#[source] ReqwestError),
}
impl ConfigError {
	/// Wraps a key decoding failure inside [`ConfigError`].
	pub fn invalid_private_key(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::InvalidPrivateKey { source: Box::new(src) }
	}

	/// Operator-facing message safe to return to submitters.
	pub fn public_message(&self) -> &'static str {
		match self {
			Self::MissingSettings { .. } => MISSING_CONFIG_MESSAGE,
			_ => "Google Sheets integration is misconfigured.",
		}
	}
}

/// Client-side defects in a submitted payload.
#[derive(Debug, ThisError)]
pub enum SubmissionError {
	/// Body is not JSON.
	#[error("Request body is not valid JSON.")]
	InvalidJson(#[source] serde_json::Error),
	/// Body exceeded the accepted size.
	#[error("Request body exceeds {limit} bytes.")]
	PayloadTooLarge {
		/// Maximum accepted body size in bytes.
		limit: usize,
	},
	/// Request body could not be read.
	#[error("Request body could not be read.")]
	Unreadable,
	/// `name` or `email` absent or blank.
	#[error("Name and email are required.")]
	MissingRequired,
	/// A field carried a non-string JSON value.
	#[error("Field `{path}` has an invalid type.")]
	InvalidField {
		/// Path of the offending field.
		path: String,
		/// Structured deserialization failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Method other than `POST`/`OPTIONS` reached the handler.
	#[error("Method `{method}` is not supported.")]
	MethodNotAllowed {
		/// Method received.
		method: Method,
	},
}
impl SubmissionError {
	fn status(&self) -> StatusCode {
		match self {
			Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
			Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
			_ => StatusCode::BAD_REQUEST,
		}
	}

	fn public_message(&self) -> Cow<'static, str> {
		match self {
			Self::InvalidJson(_) | Self::Unreadable => Cow::Borrowed("Invalid JSON payload."),
			Self::PayloadTooLarge { .. } => Cow::Borrowed("Payload too large."),
			Self::MissingRequired => Cow::Borrowed("Name and email are required."),
			Self::InvalidField { path, .. } => Cow::Owned(format!("Field `{path}` must be a string.")),
			Self::MethodNotAllowed { .. } => Cow::Borrowed("Method not allowed."),
		}
	}
}

/// Failures reported by Google's token endpoint or Sheets API.
#[derive(Debug, ThisError)]
pub enum UpstreamError {
	/// Token endpoint answered with a non-success status.
	#[error("Token endpoint returned HTTP {status}: {body}")]
	TokenRejected {
		/// HTTP status code.
		status: u16,
		/// Raw response body, kept for server-side logs only.
		body: String,
	},
	/// Token endpoint answered 2xx with a body lacking a usable token.
	#[error("Token endpoint returned a malformed response.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Sheets API answered the append with a non-success status.
	#[error("Sheets append returned HTTP {status}: {body}")]
	AppendRejected {
		/// HTTP status code.
		status: u16,
		/// Raw response body, kept for server-side logs only.
		body: String,
	},
	/// Network failure (DNS, TCP, TLS, timeout) while talking to Google.
	#[error("Network error occurred during the {stage} stage.")]
	Network {
		/// Stage that issued the request.
		stage: Stage,
		/// Transport failure.
		#[source]
		source: ReqwestError,
	},
}
impl UpstreamError {
	/// Stage in which the failure occurred.
	pub fn stage(&self) -> Stage {
		match self {
			Self::TokenRejected { .. } | Self::TokenResponseParse { .. } => Stage::Authenticate,
			Self::AppendRejected { .. } => Stage::Append,
			Self::Network { stage, .. } => *stage,
		}
	}

	fn public_message(&self) -> &'static str {
		match self.stage() {
			Stage::Append => "Unable to save your registration right now. Please try again soon.",
			_ => "Unable to authenticate with Google Sheets right now.",
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn upstream_messages_hide_bodies() {
		let err = Error::from(UpstreamError::TokenRejected {
			status: 400,
			body: "{\"error\":\"invalid_grant\",\"error_description\":\"Invalid JWT\"}".into(),
		});

		assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
		assert_eq!(err.public_message(), "Unable to authenticate with Google Sheets right now.");
		assert!(err.to_string().contains("invalid_grant"));

		let err = Error::from(UpstreamError::AppendRejected { status: 403, body: "denied".into() });

		assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
		assert!(!err.public_message().contains("denied"));
	}

	#[test]
	fn missing_settings_use_operator_message() {
		let err = Error::from(ConfigError::MissingSettings {
			missing: vec!["GOOGLE_SHEET_ID", "GOOGLE_PRIVATE_KEY"],
		});

		assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(err.public_message(), MISSING_CONFIG_MESSAGE);
		assert_eq!(err.to_string(), "Missing required settings: GOOGLE_SHEET_ID, GOOGLE_PRIVATE_KEY.");
	}

	#[test]
	fn submission_errors_are_client_errors() {
		assert_eq!(Error::from(SubmissionError::MissingRequired).status(), StatusCode::BAD_REQUEST);
		assert_eq!(
			Error::from(SubmissionError::PayloadTooLarge { limit: 10 }).status(),
			StatusCode::PAYLOAD_TOO_LARGE
		);
		assert_eq!(
			Error::from(SubmissionError::Unreadable).public_message(),
			"Invalid JSON payload."
		);
	}
}
