// self
use crate::{
	_prelude::*,
	obs::{ExportObserver, ExportStage},
	sink::StoredArtifact,
	window::Window,
};

/// Span wrapper scoping every event emitted while a window is processed.
#[derive(Clone, Debug)]
pub struct WindowSpan {
	span: tracing::Span,
}
impl WindowSpan {
	/// Creates a span tagged with the window's epoch bounds.
	pub fn new(window: &Window) -> Self {
		let span = tracing::info_span!(
			"usage_export.window",
			start = window.start_timestamp(),
			end = window.end_timestamp(),
		);

		Self { span }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> tracing::instrument::Instrumented<Fut>
	where
		Fut: Future,
	{
		use tracing::Instrument;

		fut.instrument(self.span.clone())
	}
}

/// Default observer emitting INFO per phase transition and ERROR per failed window.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;
impl ExportObserver for TracingObserver {
	fn stage(&self, window: &Window, stage: ExportStage) {
		match stage {
			ExportStage::TokenRequested => tracing::info!(stage = stage.as_str(), "Requesting API token"),
			ExportStage::TokenReceived => tracing::info!(stage = stage.as_str(), "API token received"),
			ExportStage::DataRequested =>
				tracing::info!(stage = stage.as_str(), "Requesting data {window}"),
			ExportStage::DataReceived => tracing::info!(stage = stage.as_str(), "Data received"),
			ExportStage::Uploading =>
				tracing::info!(stage = stage.as_str(), "Sending data to the central collector"),
			ExportStage::DataProcessed => tracing::info!(stage = stage.as_str(), "Data processed"),
		}
	}

	fn stored(&self, _window: &Window, artifact: &StoredArtifact) {
		tracing::debug!(%artifact, "Usage data stored");
	}

	fn failed(&self, window: &Window, error: &Error) {
		tracing::error!(%window, "Request error: {}", error.chain());
	}
}
