//! Observability hooks for export runs.
//!
//! The pipeline never logs directly; it reports phase transitions and failures to an injected
//! [`ExportObserver`]. [`TracingObserver`] turns them into `tracing` events, [`MemoryObserver`]
//! records them for tests and embedders.
//!
//! # Feature Flags
//!
//! - Enable `metrics` to increment the `usage_export_window_total` counter once per window, labeled
//!   by `outcome`.

mod memory;
mod metrics;
mod tracing;

pub use self::{memory::*, metrics::*, tracing::*};

// self
use crate::{_prelude::*, sink::StoredArtifact, window::Window};

/// Per-window phase transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportStage {
	/// Key exchange is about to start.
	TokenRequested,
	/// Key exchange returned a token.
	TokenReceived,
	/// Usage fetch is about to start.
	DataRequested,
	/// Usage document arrived.
	DataReceived,
	/// Payload is being forwarded to the central collector.
	Uploading,
	/// Payload reached its sink.
	DataProcessed,
}
impl ExportStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ExportStage::TokenRequested => "token_requested",
			ExportStage::TokenReceived => "token_received",
			ExportStage::DataRequested => "data_requested",
			ExportStage::DataReceived => "data_received",
			ExportStage::Uploading => "uploading",
			ExportStage::DataProcessed => "data_processed",
		}
	}
}
impl Display for ExportStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WindowOutcome {
	/// Payload stored.
	Success,
	/// Window skipped after an error.
	Failure,
}
impl WindowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			WindowOutcome::Success => "success",
			WindowOutcome::Failure => "failure",
		}
	}
}
impl Display for WindowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Logging capability injected into the pipeline.
pub trait ExportObserver
where
	Self: Send + Sync,
{
	/// A window moved to `stage`.
	fn stage(&self, window: &Window, stage: ExportStage);

	/// A window's payload was stored as `artifact`.
	fn stored(&self, _window: &Window, _artifact: &StoredArtifact) {}

	/// A window failed and will be skipped.
	fn failed(&self, window: &Window, error: &Error);
}
