//! Shared fixtures for the relay integration tests.

#![allow(dead_code)]

// std
use std::time::Duration;
// crates.io
use httpmock::prelude::*;
use time::{OffsetDateTime, macros::datetime};
// self
use sheets_relay::{
	config::Settings,
	http::HttpClient,
	relay::Relay,
	reqwest::{Client, redirect::Policy},
};

/// PKCS#8 RSA key used to sign test assertions.
pub const TEST_KEY: &str = include_str!("../fixtures/service_account.pem");
pub const CLIENT_EMAIL: &str = "relay-test@doncaster-gaming.iam.gserviceaccount.com";
pub const SHEET_ID: &str = "sheet-under-test";
pub const ACCESS_TOKEN: &str = "ya29.mock-access-token";
pub const APPEND_PATH: &str = "/v4/spreadsheets/sheet-under-test/values/Sheet1!A:H:append";
pub const FROZEN_TIMESTAMP: &str = "2026-10-18T14:05:09.123Z";

pub fn frozen_clock() -> OffsetDateTime {
	datetime!(2026-10-18 14:05:09.123 UTC)
}

/// Settings pointing both Google endpoints at `server`, with the key in escaped-newline form.
pub fn mock_settings(server: &MockServer) -> Settings {
	Settings {
		google_sheet_id: Some(SHEET_ID.into()),
		google_client_email: Some(CLIENT_EMAIL.into()),
		google_private_key: Some(TEST_KEY.replace('\n', "\\n")),
		google_token_url: Some(server.url("/token")),
		google_sheets_api_url: Some(server.base_url()),
		..Default::default()
	}
}

/// Builds a client that accepts the self-signed certificates served by `httpmock`.
pub fn test_http_client(timeout: Option<Duration>) -> HttpClient {
	let mut builder = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.redirect(Policy::none());

	if let Some(timeout) = timeout {
		builder = builder.timeout(timeout);
	}

	HttpClient::with_client(builder.build().expect("Failed to build insecure Reqwest client for tests."))
}

/// Builds a relay from `settings` that talks to `httpmock` through [`test_http_client`].
pub fn relay_from(settings: Settings) -> Relay {
	let timeout = settings
		.upstream_timeout_secs
		.as_deref()
		.map(|secs| Duration::from_secs(secs.parse().expect("Timeout should be a number.")));

	Relay::from_settings(settings)
		.expect("Settings should produce a relay.")
		.with_http_client(test_http_client(timeout))
}

pub fn mock_relay(server: &MockServer) -> Relay {
	relay_from(mock_settings(server)).with_clock(frozen_clock)
}

pub async fn mock_token_success(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/token")
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200).header("content-type", "application/json").body(format!(
				"{{\"access_token\":\"{ACCESS_TOKEN}\",\"token_type\":\"Bearer\",\"expires_in\":3599}}"
			));
		})
		.await
}

pub async fn mock_append_success(
	server: &MockServer,
	row: serde_json::Value,
) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST)
				.path(APPEND_PATH)
				.query_param("valueInputOption", "USER_ENTERED")
				.header("authorization", format!("Bearer {ACCESS_TOKEN}"))
				.json_body(serde_json::json!({ "values": [row] }));
			then.status(200).header("content-type", "application/json").body(
				"{\"spreadsheetId\":\"sheet-under-test\",\"updates\":{\"updatedRange\":\"Sheet1!A7:H7\",\"updatedRows\":1}}",
			);
		})
		.await
}
