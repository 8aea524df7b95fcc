//! Presigned-upload sink forwarding payloads to the central collector.

// self
use crate::{
	_prelude::*,
	error::{ConfigError, ProtocolError},
	http::{self, Endpoint, ExportHttpClient, HttpMethod, HttpRequest},
	sink::SinkError,
	usage::UsagePayload,
};

/// Public API serving presigned upload targets.
pub const DEFAULT_UPLOAD_API: &str = "https://app.spacelift.io";

/// Single-use upload target returned by the metadata endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresignedTarget {
	/// Presigned object-store URL.
	#[serde(rename = "URL")]
	pub url: String,
	/// Headers the upload must carry verbatim. `null` decodes as no headers.
	#[serde(rename = "Headers", default, deserialize_with = "null_as_empty")]
	pub headers: BTreeMap<String, String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	Ok(Option::<BTreeMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Uploads payloads under `{ulid}/{license_id}/{file_name}`.
///
/// Each store asks the unauthenticated metadata endpoint for a fresh [`PresignedTarget`] and then
/// issues exactly one `PUT`.
#[derive(Clone)]
pub struct RemoteUploadSink {
	http: Arc<dyn ExportHttpClient>,
	metadata_endpoint: Url,
}
impl RemoteUploadSink {
	/// Creates a sink that resolves upload targets through `api_base`.
	pub fn new(http: Arc<dyn ExportHttpClient>, api_base: &Url) -> Result<Self, ConfigError> {
		let metadata_endpoint = http::join_path(api_base, "selfhosted/metrics/upload_url")
			.map_err(|source| ConfigError::EndpointUrl { endpoint: Endpoint::UploadUrl, source })?;

		Ok(Self { http, metadata_endpoint })
	}

	/// Requests a presigned target for `object_key`.
	pub async fn presign(&self, object_key: &str) -> Result<PresignedTarget> {
		let mut url = self.metadata_endpoint.clone();

		url.query_pairs_mut().append_pair("object_key", object_key);

		let request = HttpRequest::new(Endpoint::UploadUrl, HttpMethod::Get, url);
		let response = self.http.send(request).await?.error_for_status(Endpoint::UploadUrl)?;

		Ok(response.json(Endpoint::UploadUrl)?)
	}

	/// Uploads `payload`, returning its object key.
	pub async fn store(&self, payload: &UsagePayload) -> Result<String> {
		let object_key = payload.object_key();
		let body = payload.to_json().map_err(|e| SinkError::Serialization {
			message: format!("Failed to serialize usage payload: {e}"),
		})?;
		let target = self.presign(&object_key).await?;
		let url = Url::parse(&target.url)
			.map_err(|source| ProtocolError::InvalidUploadTarget { url: target.url.clone(), source })?;
		let mut request = HttpRequest::new(Endpoint::Upload, HttpMethod::Put, url);

		for (name, value) in target.headers {
			request = request.header(name, value);
		}

		self.http
			.send(request.json_body(body))
			.await?
			.error_for_status(Endpoint::Upload)?;

		Ok(object_key)
	}
}
impl Debug for RemoteUploadSink {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RemoteUploadSink")
			.field("metadata_endpoint", &self.metadata_endpoint.as_str())
			.finish()
	}
}
