//! Service-account authentication: assertion signing and bearer token exchange.

pub mod assertion;
pub mod token;

pub use assertion::*;
pub use token::*;
