//! Long-lived API key pair exchanged for short-lived tokens.

// self
use crate::{_prelude::*, auth::Secret};

/// API key id + secret. The secret never reaches logs through `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	/// API key identifier.
	pub key_id: String,
	/// API key secret.
	pub key_secret: Secret,
}
impl Credentials {
	/// Creates credentials from a key pair.
	pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
		Self { key_id: key_id.into(), key_secret: Secret::new(key_secret) }
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("key_id", &self.key_id)
			.field("key_secret", &self.key_secret)
			.finish()
	}
}
