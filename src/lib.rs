//! Registration relay for the Doncaster gaming event: validates sign-up payloads, signs a
//! service-account assertion, trades it for a Google bearer token, and appends one spreadsheet
//! row per submission.
//!
//! The crate ships one core handler ([`relay::dispatch`]) and two thin adapters over it:
//! [`api::integrated`] for mounting inside an existing router, and [`api::standalone`] for
//! running the relay as its own HTTP server.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod relay;
pub mod sheets;
pub mod submission;

mod _prelude {
	pub use std::{
		borrow::Cow,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		str::FromStr,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use axum::{
		body::Bytes,
		http::{Method, StatusCode},
	};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, tower as _};
