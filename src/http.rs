//! Transport primitives for every call the exporter makes.
//!
//! The module exposes [`ExportHttpClient`] together with crate-owned request and response types
//! so authentication, usage fetches, and sinks stay independent of any particular HTTP stack.
//! [`ReqwestHttpClient`] is the default implementation; tests and embedders can plug in their
//! own transport by implementing the trait.

// self
use crate::{_prelude::*, error::ProtocolError};

/// Boxed future returned by [`ExportHttpClient::send`].
pub type HttpFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, crate::error::TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports used by the exporter.
///
/// The trait is the exporter's only dependency on an HTTP stack and is object safe so a single
/// `Arc<dyn ExportHttpClient>` can be shared by the authenticator, the fetcher, and the sinks.
/// Implementations report transport failures (DNS, TCP, TLS) as errors and hand back every HTTP
/// response, successful or not, as an [`HttpResponse`]; status classification happens in the
/// caller through [`HttpResponse::error_for_status`].
pub trait ExportHttpClient
where
	Self: Send + Sync,
{
	/// Executes `request` and buffers the full response body.
	fn send(&self, request: HttpRequest) -> HttpFuture<'_>;
}

/// Logical endpoints the exporter talks to, used to label errors and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
	/// `POST {base}/graphql` key exchange on the self-hosted instance.
	Authentication,
	/// `GET {base}/selfhosted/metrics` on the self-hosted instance.
	UsageMetrics,
	/// Public presigned-URL metadata endpoint.
	UploadUrl,
	/// Presigned object-store upload target.
	Upload,
}
impl Endpoint {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Endpoint::Authentication => "authentication",
			Endpoint::UsageMetrics => "usage_metrics",
			Endpoint::UploadUrl => "upload_url",
			Endpoint::Upload => "upload",
		}
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// HTTP verbs used by the exporter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
	/// `GET`.
	Get,
	/// `POST`.
	Post,
	/// `PUT`.
	Put,
}
impl HttpMethod {
	/// Returns the method token as sent on the wire.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outbound request description handed to an [`ExportHttpClient`].
#[derive(Clone, Debug)]
pub struct HttpRequest {
	/// Logical endpoint, used for error labeling.
	pub endpoint: Endpoint,
	/// HTTP verb.
	pub method: HttpMethod,
	/// Fully resolved target URL, query string included.
	pub url: Url,
	/// Header name/value pairs in insertion order.
	pub headers: Vec<(String, String)>,
	/// Optional request body.
	pub body: Option<Vec<u8>>,
}
impl HttpRequest {
	/// Creates a request without headers or body.
	pub fn new(endpoint: Endpoint, method: HttpMethod, url: Url) -> Self {
		Self { endpoint, method, url, headers: Vec::new(), body: None }
	}

	/// Appends a header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Sets a JSON body and the matching `Content-Type` unless one is already present.
	pub fn json_body(mut self, body: Vec<u8>) -> Self {
		if self.header_value("content-type").is_none() {
			self.headers.push(("Content-Type".into(), "application/json".into()));
		}

		self.body = Some(body);

		self
	}

	/// Looks up a header value case-insensitively.
	pub fn header_value(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// Buffered response returned by an [`ExportHttpClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Creates a response from its parts.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Converts non-2xx responses into [`ProtocolError::Status`].
	pub fn error_for_status(self, endpoint: Endpoint) -> Result<Self, ProtocolError> {
		if self.is_success() {
			Ok(self)
		} else {
			Err(ProtocolError::status(endpoint, self.status, &self.body))
		}
	}

	/// Deserializes the body as JSON, reporting the failing path on error.
	pub fn json<T>(&self, endpoint: Endpoint) -> Result<T, ProtocolError>
	where
		T: for<'de> Deserialize<'de>,
	{
		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| ProtocolError::Decode { endpoint, source })
	}
}

/// Joins `path` onto `base`, keeping any path prefix the base already carries.
pub(crate) fn join_path(base: &Url, path: &str) -> Result<Url, url::ParseError> {
	let mut prefix = base.as_str().trim_end_matches('/').to_owned();

	prefix.push('/');
	prefix.push_str(path.trim_start_matches('/'));

	Url::parse(&prefix)
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds a client that verifies TLS certificates.
	pub fn new() -> Self {
		Self::default()
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that optionally accepts invalid certificates and host names.
	///
	/// Only meant for self-hosted instances fronted by private certificate authorities.
	pub fn with_tls_verification(skip: bool) -> Result<Self, crate::error::ConfigError> {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(skip)
			.danger_accept_invalid_hostnames(skip)
			.build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ExportHttpClient for ReqwestHttpClient {
	fn send(&self, request: HttpRequest) -> HttpFuture<'_> {
		Box::pin(async move {
			let HttpRequest { endpoint, method, url, headers, body } = request;
			let method = match method {
				HttpMethod::Get => reqwest::Method::GET,
				HttpMethod::Post => reqwest::Method::POST,
				HttpMethod::Put => reqwest::Method::PUT,
			};
			let mut builder = self.0.request(method, url);

			for (name, value) in headers {
				builder = builder.header(name, value);
			}
			if let Some(body) = body {
				builder = builder.body(body);
			}

			let network = |e: ReqwestError| crate::error::TransportError::network(endpoint, e);
			let response = builder.send().await.map_err(network)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(network)?.to_vec();

			Ok(HttpResponse { status, body })
		})
	}
}
