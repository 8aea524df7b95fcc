//! Bearer token minted per export window.

// self
use crate::{_prelude::*, auth::Secret};

/// Short-lived JWT returned by the key exchange. Never cached across windows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiToken {
	jwt: Secret,
}
impl ApiToken {
	/// Wraps a raw JWT.
	pub fn new(jwt: impl Into<String>) -> Self {
		Self { jwt: Secret::new(jwt) }
	}

	/// Returns the raw JWT. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		self.jwt.expose()
	}

	/// Renders the `Authorization` header value.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.jwt.expose())
	}
}
