//! Signed service-account assertions (RS256 JWTs) for the JWT bearer grant.
//!
//! Encoding and signing are delegated to `jsonwebtoken`; this module only decides which claims
//! Google expects and keeps the key material out of `Debug` output. Nothing here performs I/O.

// crates.io
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use time::Duration;
// self
use crate::{
	_prelude::*,
	config::{SPREADSHEETS_SCOPE, ServiceAccount},
	error::ConfigError,
};

/// Lifetime requested for every assertion.
pub const ASSERTION_LIFETIME: Duration = Duration::hours(1);

/// RSA key used to sign assertions; never printed.
#[derive(Clone)]
pub struct ServiceAccountKey(EncodingKey);
impl ServiceAccountKey {
	/// Parses a PEM-encoded RSA private key, accepting PKCS#8 (`BEGIN PRIVATE KEY`, the format
	/// Google issues) and PKCS#1 (`BEGIN RSA PRIVATE KEY`).
	pub fn from_pem(pem: &str) -> Result<Self, ConfigError> {
		EncodingKey::from_rsa_pem(pem.as_bytes())
			.map(Self)
			.map_err(ConfigError::invalid_private_key)
	}
}
impl Debug for ServiceAccountKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ServiceAccountKey").field(&"<redacted>").finish()
	}
}

/// Claim set carried by a service-account assertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
	/// Service-account email.
	pub iss: String,
	/// Space-delimited OAuth scopes.
	pub scope: String,
	/// Token endpoint the assertion is presented to.
	pub aud: String,
	/// Expiry, Unix seconds.
	pub exp: i64,
	/// Issued-at, Unix seconds.
	pub iat: i64,
}
impl AssertionClaims {
	/// Builds the claim set for `account` issued at `now`.
	pub fn new(account: &ServiceAccount, now: OffsetDateTime) -> Self {
		let iat = now.unix_timestamp();

		Self {
			iss: account.client_email.clone(),
			scope: SPREADSHEETS_SCOPE.to_owned(),
			aud: account.token_endpoint.to_string(),
			exp: iat + ASSERTION_LIFETIME.whole_seconds(),
			iat,
		}
	}
}

/// Compact, signed assertion ready to present to the token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedAssertion {
	token: String,
	claims: AssertionClaims,
}
impl SignedAssertion {
	/// Returns the compact token. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.token
	}

	/// Claims embedded in the token.
	pub fn claims(&self) -> &AssertionClaims {
		&self.claims
	}
}
impl Debug for SignedAssertion {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SignedAssertion")
			.field("token", &"<redacted>")
			.field("claims", &self.claims)
			.finish()
	}
}

/// Signs a fresh assertion for `account`, valid from `now` for [`ASSERTION_LIFETIME`].
pub fn sign_assertion(
	account: &ServiceAccount,
	now: OffsetDateTime,
) -> Result<SignedAssertion, ConfigError> {
	let claims = AssertionClaims::new(account, now);
	let token = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &account.key.0)?;

	Ok(SignedAssertion { token, claims })
}
