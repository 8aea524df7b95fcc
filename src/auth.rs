//! API-key credentials, redacted secrets, bearer tokens, and the key-for-token exchange.

pub mod authenticator;
pub mod credentials;
pub mod secret;
pub mod token;

pub use authenticator::*;
pub use credentials::*;
pub use secret::*;
pub use token::*;
