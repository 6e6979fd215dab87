//! Outbound HTTP plumbing shared by the token exchange and the Sheets append.
//!
//! [`HttpClient`] wraps a reqwest client built once from [`RelayConfig`](crate::config::RelayConfig);
//! [`HttpClient::send`] classifies transport failures by pipeline stage and buffers the body so
//! callers can keep it for diagnostics when the status is not a success.

// std
use std::ops::Deref;
// crates.io
use reqwest::{RequestBuilder, redirect::Policy};
// self
use crate::{_prelude::*, error::ConfigError, error::UpstreamError, obs::Stage};

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Redirects are never followed: Google's token endpoint and the Sheets API answer directly,
/// and a redirect would forward the assertion or bearer token to another origin.
#[derive(Clone, Debug)]
pub struct HttpClient(ReqwestClient);
impl HttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds the relay's client; `timeout` of `None` leaves requests unbounded.
	pub fn build(timeout: Option<StdDuration>) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder().redirect(Policy::none());

		if let Some(timeout) = timeout {
			builder = builder.timeout(timeout);
		}

		builder.build().map(Self).map_err(ConfigError::HttpClientBuild)
	}

	/// Sends `request` and buffers the full response.
	pub async fn send(
		&self,
		request: RequestBuilder,
		stage: Stage,
	) -> Result<UpstreamResponse, UpstreamError> {
		let network = |source| UpstreamError::Network { stage, source };
		let response = request.send().await.map_err(network)?;
		let status = response.status();
		let body = response.bytes().await.map_err(network)?;

		Ok(UpstreamResponse { status, body })
	}
}
impl Deref for HttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Buffered response from Google.
#[derive(Clone, Debug)]
pub struct UpstreamResponse {
	/// HTTP status code.
	pub status: StatusCode,
	/// Raw body bytes.
	pub body: Bytes,
}
impl UpstreamResponse {
	/// Body decoded as lossy UTF-8, for logs.
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}
