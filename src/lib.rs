//! Batched usage-metering exporter for self-hosted instances: plan day-aligned windows, exchange
//! an API key for a token per window, fetch the window's usage document, and hand it to a local
//! or presigned-upload sink while isolating failures per window.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod pipeline;
pub mod sink;
pub mod usage;
pub mod window;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		num::NonZeroU32,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(feature = "cli")] use {clap as _, tracing_subscriber as _};
#[cfg(any(test, feature = "cli"))] use {color_eyre as _, tokio as _};
#[cfg(test)] use httpmock as _;
