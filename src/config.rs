//! Run configuration assembled by front ends (the bundled CLI or an embedding service).

// std
use std::path::PathBuf;
// self
use crate::{
	_prelude::*,
	auth::Credentials,
	error::ValidationError,
	window::{BatchSize, DateRange},
};
#[cfg(feature = "reqwest")]
use crate::{
	http::ReqwestHttpClient,
	pipeline::ExportPipeline,
	sink::{LocalFileSink, RemoteUploadSink, Sink},
};

/// Where fetched payloads go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination {
	/// One JSON file per window in `dir`.
	Local {
		/// Output directory.
		dir: PathBuf,
	},
	/// Presigned uploads resolved through `api_base`.
	Remote {
		/// Public API serving presigned upload targets.
		api_base: Url,
	},
}
impl Default for Destination {
	fn default() -> Self {
		Self::Local { dir: PathBuf::from(".") }
	}
}

/// Everything one export run needs.
#[derive(Clone, Debug)]
pub struct ExportConfig {
	/// Root URL of the self-hosted instance.
	pub base_url: Url,
	/// API key pair; requires admin permissions on the instance.
	pub credentials: Credentials,
	/// First exported day, `YYYY-MM-DD`.
	pub start_date: String,
	/// First day not exported, `YYYY-MM-DD`.
	pub end_date: String,
	/// Days per window.
	pub batch: BatchSize,
	/// Accept invalid certificates from the instance. Never applies to uploads.
	pub skip_tls_verification: bool,
	/// Payload destination.
	pub destination: Destination,
}
impl ExportConfig {
	/// Parses an `http(s)` URL for the setting named `field`.
	pub fn parse_url(field: &'static str, input: &str) -> Result<Url, ValidationError> {
		let invalid = || ValidationError::InvalidUrl { field, input: input.to_owned() };
		let url = Url::parse(input).map_err(|_| invalid())?;

		if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
			return Err(invalid());
		}

		Ok(url)
	}

	/// Validates the date bounds without touching the network.
	pub fn date_range(&self) -> Result<DateRange, ValidationError> {
		DateRange::parse(&self.start_date, &self.end_date)
	}

	/// Builds the reqwest-backed pipeline this configuration describes.
	#[cfg(feature = "reqwest")]
	pub fn build_pipeline(&self) -> Result<ExportPipeline> {
		let instance = Arc::new(ReqwestHttpClient::with_tls_verification(self.skip_tls_verification)?);
		let sink: Sink = match &self.destination {
			Destination::Local { dir } => LocalFileSink::new(dir).into(),
			Destination::Remote { api_base } =>
				RemoteUploadSink::new(Arc::new(ReqwestHttpClient::new()), api_base)?.into(),
		};

		Ok(ExportPipeline::new(instance, &self.base_url, self.credentials.clone(), sink)?)
	}

	/// Validates the dates, builds the pipeline, and runs the export.
	#[cfg(feature = "reqwest")]
	pub async fn run(&self) -> Result<()> {
		let range = self.date_range()?;

		self.build_pipeline()?.run(range, self.batch).await
	}
}
