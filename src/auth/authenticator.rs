//! API-key-for-JWT exchange against the instance's GraphQL endpoint.

// self
use crate::{
	_prelude::*,
	auth::{ApiToken, Credentials},
	error::ConfigError,
	http::{self, Endpoint, ExportHttpClient, HttpMethod, HttpRequest},
};

/// Exchanges [`Credentials`] for an [`ApiToken`] with a single `POST {base}/graphql`.
#[derive(Clone)]
pub struct Authenticator {
	http: Arc<dyn ExportHttpClient>,
	endpoint: Url,
}
impl Authenticator {
	/// Creates an authenticator for the instance rooted at `base_url`.
	pub fn new(http: Arc<dyn ExportHttpClient>, base_url: &Url) -> Result<Self, ConfigError> {
		let endpoint = http::join_path(base_url, "graphql").map_err(|source| {
			ConfigError::EndpointUrl { endpoint: Endpoint::Authentication, source }
		})?;

		Ok(Self { http, endpoint })
	}

	/// Performs the exchange.
	///
	/// Transport failures and non-2xx responses propagate unchanged. A 2xx response without a
	/// usable JWT is reported as [`Error::EmptyToken`] together with any GraphQL error messages.
	pub async fn authenticate(&self, credentials: &Credentials) -> Result<ApiToken> {
		let body = serde_json::json!({ "query": token_mutation(credentials) });
		let request = HttpRequest::new(Endpoint::Authentication, HttpMethod::Post, self.endpoint.clone())
			.json_body(body.to_string().into_bytes());
		let response =
			self.http.send(request).await?.error_for_status(Endpoint::Authentication)?;
		let envelope: GraphqlEnvelope = response.json(Endpoint::Authentication)?;

		match envelope.data.and_then(|data| data.api_key_user).and_then(|user| user.jwt) {
			Some(jwt) if !jwt.trim().is_empty() => Ok(ApiToken::new(jwt)),
			_ => Err(Error::EmptyToken {
				reasons: envelope.errors.into_iter().map(|e| e.message).collect(),
			}),
		}
	}
}
impl Debug for Authenticator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authenticator").field("endpoint", &self.endpoint.as_str()).finish()
	}
}

#[derive(Debug, Deserialize)]
struct GraphqlEnvelope {
	#[serde(default)]
	data: Option<TokenData>,
	#[serde(default)]
	errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct TokenData {
	#[serde(default, rename = "apiKeyUser")]
	api_key_user: Option<ApiKeyUser>,
}

#[derive(Debug, Deserialize)]
struct ApiKeyUser {
	#[serde(default)]
	jwt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
	#[serde(default)]
	message: String,
}

fn token_mutation(credentials: &Credentials) -> String {
	// JSON string literals are valid GraphQL string literals.
	let id = serde_json::Value::from(credentials.key_id.as_str());
	let secret = serde_json::Value::from(credentials.key_secret.expose());

	format!("mutation GetToken {{ apiKeyUser(id: {id}, secret: {secret}) {{ jwt }} }}")
}
