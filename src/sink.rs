//! Destinations for fetched usage documents.
//!
//! [`Sink`] is chosen once at startup and handed to the pipeline as a single dependency. Storing
//! the same payload twice produces the same artifact (same file name or object key); concurrent
//! stores of one key are last-writer-wins.

pub mod file;
pub mod remote;

pub use file::LocalFileSink;
pub use remote::{PresignedTarget, RemoteUploadSink};

// std
use std::path::PathBuf;
// self
use crate::{_prelude::*, usage::UsagePayload};

/// Where a payload ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoredArtifact {
	/// Local file path.
	File(PathBuf),
	/// Remote object key.
	Object(String),
}
impl Display for StoredArtifact {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::File(path) => write!(f, "file {}", path.display()),
			Self::Object(key) => write!(f, "object {key}"),
		}
	}
}

/// Configured payload destination.
#[derive(Clone, Debug)]
pub enum Sink {
	/// Pretty JSON files in a local directory.
	Local(LocalFileSink),
	/// Presigned uploads to the central collector.
	Remote(RemoteUploadSink),
}
impl Sink {
	/// Persists `payload`, returning the resulting artifact.
	pub async fn store(&self, payload: &UsagePayload) -> Result<StoredArtifact> {
		match self {
			Self::Local(sink) => Ok(StoredArtifact::File(sink.store(payload)?)),
			Self::Remote(sink) => Ok(StoredArtifact::Object(sink.store(payload).await?)),
		}
	}

	/// Returns `true` for the remote variant.
	pub fn is_remote(&self) -> bool {
		matches!(self, Self::Remote(_))
	}
}
impl From<LocalFileSink> for Sink {
	fn from(sink: LocalFileSink) -> Self {
		Self::Local(sink)
	}
}
impl From<RemoteUploadSink> for Sink {
	fn from(sink: RemoteUploadSink) -> Self {
		Self::Remote(sink)
	}
}

/// Error type produced by local persistence.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum SinkError {
	/// Payload could not be serialized.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Filesystem failure.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
