// self
use crate::{
	_prelude::*,
	obs::{ExportObserver, ExportStage},
	sink::StoredArtifact,
	window::Window,
};

/// Event captured by [`MemoryObserver`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObservedEvent {
	/// Phase transition.
	Stage {
		/// Window being processed.
		window: Window,
		/// Stage reached.
		stage: ExportStage,
	},
	/// Payload stored.
	Stored {
		/// Window being processed.
		window: Window,
		/// Resulting artifact.
		artifact: StoredArtifact,
	},
	/// Window skipped.
	Failed {
		/// Window being processed.
		window: Window,
		/// Rendered error, causes included.
		message: String,
	},
}

/// Thread-safe observer that keeps events in-process for tests and embedders.
#[derive(Debug, Default)]
pub struct MemoryObserver(Mutex<Vec<ObservedEvent>>);
impl MemoryObserver {
	/// Snapshot of all events in arrival order.
	pub fn events(&self) -> Vec<ObservedEvent> {
		self.0.lock().clone()
	}

	/// Windows that failed, with their rendered errors.
	pub fn failures(&self) -> Vec<(Window, String)> {
		self.0
			.lock()
			.iter()
			.filter_map(|event| match event {
				ObservedEvent::Failed { window, message } => Some((*window, message.clone())),
				_ => None,
			})
			.collect()
	}

	/// Artifacts stored so far, with their windows.
	pub fn stored(&self) -> Vec<(Window, StoredArtifact)> {
		self.0
			.lock()
			.iter()
			.filter_map(|event| match event {
				ObservedEvent::Stored { window, artifact } => Some((*window, artifact.clone())),
				_ => None,
			})
			.collect()
	}

	/// Stages reached by `window`, in order.
	pub fn stages_for(&self, window: &Window) -> Vec<ExportStage> {
		self.0
			.lock()
			.iter()
			.filter_map(|event| match event {
				ObservedEvent::Stage { window: w, stage } if w == window => Some(*stage),
				_ => None,
			})
			.collect()
	}
}
impl ExportObserver for MemoryObserver {
	fn stage(&self, window: &Window, stage: ExportStage) {
		self.0.lock().push(ObservedEvent::Stage { window: *window, stage });
	}

	fn stored(&self, window: &Window, artifact: &StoredArtifact) {
		self.0.lock().push(ObservedEvent::Stored { window: *window, artifact: artifact.clone() });
	}

	fn failed(&self, window: &Window, error: &Error) {
		let message = error.chain().to_string();

		self.0.lock().push(ObservedEvent::Failed { window: *window, message });
	}
}
