//! Local-directory sink writing one JSON file per window.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{_prelude::*, sink::SinkError, usage::UsagePayload};

/// Writes payloads as pretty JSON to `{dir}/usage_data_{start}_{end}.json`, replacing any file of
/// the same name.
#[derive(Clone, Debug)]
pub struct LocalFileSink {
	dir: PathBuf,
}
impl LocalFileSink {
	/// Creates a sink targeting `dir`.
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	/// Path a payload would be written to.
	pub fn path_for(&self, payload: &UsagePayload) -> PathBuf {
		self.dir.join(payload.file_name())
	}

	/// Writes `payload`, returning the final path.
	pub fn store(&self, payload: &UsagePayload) -> Result<PathBuf, SinkError> {
		let path = self.path_for(payload);
		let serialized = payload.to_pretty_json().map_err(|e| SinkError::Serialization {
			message: format!("Failed to serialize usage payload: {e}"),
		})?;

		Self::ensure_dir_exists(&self.dir)?;
		Self::write_atomically(&path, &serialized)?;

		Ok(path)
	}

	fn ensure_dir_exists(dir: &Path) -> Result<(), SinkError> {
		if !dir.as_os_str().is_empty() {
			fs::create_dir_all(dir).map_err(|e| SinkError::Backend {
				message: format!("Failed to create output directory {}: {e}", dir.display()),
			})?;
		}

		Ok(())
	}

	fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), SinkError> {
		let mut tmp_path = path.to_path_buf();

		tmp_path.set_extension("json.tmp");

		let mut file = File::create(&tmp_path).map_err(|e| SinkError::Backend {
			message: format!("Failed to create {}: {e}", tmp_path.display()),
		})?;
		let written = Self::write_and_sync(&mut file, &tmp_path, contents).and_then(|()| {
			drop(file);

			fs::rename(&tmp_path, path).map_err(|e| SinkError::Backend {
				message: format!("Failed to replace {}: {e}", path.display()),
			})
		});

		if written.is_err() {
			// Best effort; the original failure is what gets reported.
			let _ = fs::remove_file(&tmp_path);
		}

		written
	}

	fn write_and_sync(file: &mut File, tmp_path: &Path, contents: &[u8]) -> Result<(), SinkError> {
		file.write_all(contents).map_err(|e| SinkError::Backend {
			message: format!("Failed to write {}: {e}", tmp_path.display()),
		})?;
		file.sync_all().map_err(|e| SinkError::Backend {
			message: format!("Failed to sync {}: {e}", tmp_path.display()),
		})
	}
}
impl Default for LocalFileSink {
	fn default() -> Self {
		Self::new(".")
	}
}
