//! Usage-metrics retrieval for a single export window.

pub mod payload;

pub use payload::*;

// self
use crate::{
	_prelude::*,
	auth::ApiToken,
	error::ConfigError,
	http::{self, Endpoint, ExportHttpClient, HttpMethod, HttpRequest},
	window::Window,
};

/// Fetches the usage document for one window with `GET {base}/selfhosted/metrics`.
#[derive(Clone)]
pub struct UsageFetcher {
	http: Arc<dyn ExportHttpClient>,
	endpoint: Url,
}
impl UsageFetcher {
	/// Creates a fetcher for the instance rooted at `base_url`.
	pub fn new(http: Arc<dyn ExportHttpClient>, base_url: &Url) -> Result<Self, ConfigError> {
		let endpoint = http::join_path(base_url, "selfhosted/metrics").map_err(|source| {
			ConfigError::EndpointUrl { endpoint: Endpoint::UsageMetrics, source }
		})?;

		Ok(Self { http, endpoint })
	}

	/// Builds the request URL carrying the window bounds as epoch seconds.
	pub fn url_for(&self, window: &Window) -> Url {
		let mut url = self.endpoint.clone();

		url.query_pairs_mut()
			.append_pair("start_timestamp", &window.start_timestamp().to_string())
			.append_pair("end_timestamp", &window.end_timestamp().to_string());

		url
	}

	/// Retrieves and parses the window's usage document. Non-2xx responses are errors.
	pub async fn fetch(&self, window: &Window, token: &ApiToken) -> Result<UsagePayload> {
		let request = HttpRequest::new(Endpoint::UsageMetrics, HttpMethod::Get, self.url_for(window))
			.header("Authorization", token.bearer());
		let response = self.http.send(request).await?.error_for_status(Endpoint::UsageMetrics)?;

		Ok(response.json(Endpoint::UsageMetrics)?)
	}
}
impl Debug for UsageFetcher {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UsageFetcher").field("endpoint", &self.endpoint.as_str()).finish()
	}
}
