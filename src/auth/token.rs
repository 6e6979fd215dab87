//! JWT bearer grant: trades a signed assertion for a short-lived access token.
//!
//! Tokens are requested once per submission and never cached. Any non-2xx answer from the
//! token endpoint is an upstream failure; its body travels inside the error for server-side
//! logging only.

// self
use crate::{
	_prelude::*,
	auth::SignedAssertion,
	error::UpstreamError,
	http::HttpClient,
	obs::Stage,
};

/// `grant_type` value for the JWT bearer grant (RFC 7523).
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Redacted bearer token keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);
impl AccessToken {
	/// Wraps a new token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AccessToken").field(&"<redacted>").finish()
	}
}
impl Display for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[derive(Deserialize)]
struct TokenResponse {
	access_token: String,
}

/// Exchanges `assertion` for a bearer token at `endpoint`.
pub async fn exchange_assertion(
	client: &HttpClient,
	endpoint: &Url,
	assertion: &SignedAssertion,
) -> Result<AccessToken, UpstreamError> {
	let request = client
		.post(endpoint.clone())
		.form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.expose())]);
	let response = client.send(request, Stage::Authenticate).await?;

	if !response.status.is_success() {
		return Err(UpstreamError::TokenRejected {
			status: response.status.as_u16(),
			body: response.body_text(),
		});
	}

	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);
	let parsed: TokenResponse = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| UpstreamError::TokenResponseParse { source })?;

	Ok(AccessToken::new(parsed.access_token))
}
