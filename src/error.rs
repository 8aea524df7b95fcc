//! Exporter-level error types shared across the planner, transports, sinks, and the pipeline.

// self
use crate::{_prelude::*, http::Endpoint};

/// Exporter-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const BODY_PREVIEW_LIMIT: usize = 256;

/// Canonical exporter error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Caller-supplied input is malformed; the run must not start.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Upstream answered, but not with what the exporter expects.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
	/// Sink-layer failure.
	#[error(transparent)]
	Sink(#[from] crate::sink::SinkError),

	/// Authentication succeeded at the HTTP level but yielded no token.
	#[error("Authentication returned an empty token{}.", format_reasons(.reasons))]
	EmptyToken {
		/// GraphQL error messages reported next to the missing token, if any.
		reasons: Vec<String>,
	},
}
impl Error {
	/// Returns `true` when the failure invalidates the whole run rather than a single window.
	pub fn aborts_run(&self) -> bool {
		matches!(self, Self::Validation(_) | Self::Config(_))
	}

	/// Renders the error together with every underlying cause.
	pub fn chain(&self) -> ErrorChain<'_> {
		ErrorChain(self)
	}
}

/// [`Display`] adapter printing an error followed by its `source()` chain.
#[derive(Clone, Copy, Debug)]
pub struct ErrorChain<'a>(&'a (dyn StdError + 'static));
impl Display for ErrorChain<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}", self.0)?;

		let mut source = self.0.source();

		while let Some(cause) = source {
			write!(f, " Caused by: {cause}")?;

			source = cause.source();
		}

		Ok(())
	}
}

/// Input validation failures raised before any network activity.
#[derive(Debug, ThisError)]
pub enum ValidationError {
	/// Date string does not match `YYYY-MM-DD`.
	#[error("Invalid date format: {input}, expected format: YYYY-MM-DD.")]
	InvalidDate {
		/// Offending input.
		input: String,
		/// Underlying parser failure.
		#[source]
		source: time::error::Parse,
	},
	/// Export range ends before it starts.
	#[error("Export range is inverted: {start} is after {end}.")]
	InvertedRange {
		/// Requested range start.
		start: OffsetDateTime,
		/// Requested range end.
		end: OffsetDateTime,
	},
	/// URL supplied for an endpoint cannot be parsed or cannot carry a path.
	#[error("The {field} URL `{input}` is invalid.")]
	InvalidUrl {
		/// Which setting carried the URL.
		field: &'static str,
		/// Offending input.
		input: String,
	},
}

/// Configuration failures raised while assembling the exporter.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Endpoint URL could not be derived from a configured base.
	#[error("Unable to derive the {endpoint} URL.")]
	EndpointUrl {
		/// Endpoint being derived.
		endpoint: Endpoint,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint being called.
		endpoint: Endpoint,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(endpoint: Endpoint, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}
}

/// Failures where the upstream responded but the response is unusable.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// Non-2xx HTTP status.
	#[error("The {endpoint} endpoint returned HTTP {status}: {body_preview}")]
	Status {
		/// Endpoint being called.
		endpoint: Endpoint,
		/// HTTP status code.
		status: u16,
		/// Truncated response body.
		body_preview: String,
	},
	/// Response body is not the JSON shape the exporter needs.
	#[error("The {endpoint} endpoint returned malformed JSON.")]
	Decode {
		/// Endpoint being called.
		endpoint: Endpoint,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Metadata endpoint handed out an unusable upload URL.
	#[error("Presigned upload URL `{url}` is invalid.")]
	InvalidUploadTarget {
		/// URL as returned by the metadata endpoint.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
impl ProtocolError {
	/// Builds a [`ProtocolError::Status`] with a bounded preview of `body`.
	pub fn status(endpoint: Endpoint, status: u16, body: &[u8]) -> Self {
		let text = String::from_utf8_lossy(body);
		let mut body_preview: String = text.chars().take(BODY_PREVIEW_LIMIT).collect();

		if text.chars().count() > BODY_PREVIEW_LIMIT {
			body_preview.push_str("...");
		}

		Self::Status { endpoint, status, body_preview }
	}

	/// Returns the HTTP status when the failure carries one.
	pub fn http_status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } => Some(*status),
			Self::Decode { .. } | Self::InvalidUploadTarget { .. } => None,
		}
	}
}

fn format_reasons(reasons: &[String]) -> String {
	if reasons.is_empty() { String::new() } else { format!(": {}", reasons.join("; ")) }
}
