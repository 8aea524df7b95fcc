//! Batched export orchestration.
//!
//! [`ExportPipeline`] plans windows once, then walks them strictly in order: authenticate, fetch,
//! store. A failing window is reported to the observer and skipped; the run carries on with the
//! next one. Run-level errors (malformed input, broken configuration) surface before the first
//! window, so a malformed date never causes network traffic.
//! Tokens are minted per window and dropped with it.

// self
use crate::{
	_prelude::*,
	auth::{Authenticator, Credentials},
	error::ConfigError,
	http::ExportHttpClient,
	obs::{self, ExportObserver, ExportStage, TracingObserver, WindowOutcome, WindowSpan},
	sink::{Sink, StoredArtifact},
	usage::UsageFetcher,
	window::{self, BatchSize, DateRange, Window},
};

/// Coordinates the authenticator, fetcher, and sink across the windows of an export range.
#[derive(Clone)]
pub struct ExportPipeline {
	credentials: Credentials,
	authenticator: Authenticator,
	fetcher: UsageFetcher,
	sink: Sink,
	observer: Arc<dyn ExportObserver>,
}
impl ExportPipeline {
	/// Creates a pipeline against the instance at `base_url`, logging through [`TracingObserver`].
	///
	/// `http` serves the instance calls (key exchange and usage fetch); the sink carries its own
	/// transport.
	pub fn new(
		http: Arc<dyn ExportHttpClient>,
		base_url: &Url,
		credentials: Credentials,
		sink: impl Into<Sink>,
	) -> Result<Self, ConfigError> {
		Ok(Self {
			credentials,
			authenticator: Authenticator::new(http.clone(), base_url)?,
			fetcher: UsageFetcher::new(http, base_url)?,
			sink: sink.into(),
			observer: Arc::new(TracingObserver),
		})
	}

	/// Replaces the observer receiving phase transitions and failures.
	pub fn with_observer(mut self, observer: Arc<dyn ExportObserver>) -> Self {
		self.observer = observer;

		self
	}

	/// Configured sink.
	pub fn sink(&self) -> &Sink {
		&self.sink
	}

	/// Validates `YYYY-MM-DD` bounds, then runs the export.
	///
	/// Validation failures return before any window is planned.
	pub async fn export(&self, start: &str, end: &str, batch: BatchSize) -> Result<()> {
		let range = DateRange::parse(start, end)?;

		self.run(range, batch).await
	}

	/// Processes every window of `range` in order, absorbing per-window failures.
	///
	/// Always returns `Ok(())` once every window was attempted.
	pub async fn run(&self, range: DateRange, batch: BatchSize) -> Result<()> {
		for window in window::plan(range, batch) {
			let span = WindowSpan::new(&window);

			match span.instrument(self.process_window(&window)).await {
				Ok(artifact) => {
					self.observer.stored(&window, &artifact);
					obs::record_window_outcome(WindowOutcome::Success);
				},
				Err(e) => {
					self.observer.failed(&window, &e);
					obs::record_window_outcome(WindowOutcome::Failure);
				},
			}
		}

		Ok(())
	}

	/// Authenticates, fetches, and stores a single window.
	pub async fn process_window(&self, window: &Window) -> Result<StoredArtifact> {
		self.observer.stage(window, ExportStage::TokenRequested);

		let token = self.authenticator.authenticate(&self.credentials).await?;

		self.observer.stage(window, ExportStage::TokenReceived);
		self.observer.stage(window, ExportStage::DataRequested);

		let payload = self.fetcher.fetch(window, &token).await?;

		self.observer.stage(window, ExportStage::DataReceived);

		if self.sink.is_remote() {
			self.observer.stage(window, ExportStage::Uploading);
		}

		let artifact = self.sink.store(&payload).await?;

		self.observer.stage(window, ExportStage::DataProcessed);

		Ok(artifact)
	}
}
impl Debug for ExportPipeline {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ExportPipeline")
			.field("credentials", &self.credentials)
			.field("authenticator", &self.authenticator)
			.field("fetcher", &self.fetcher)
			.field("sink", &self.sink)
			.finish()
	}
}
