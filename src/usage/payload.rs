//! Usage document returned by the metrics endpoint plus the naming rules derived from it.

// self
use crate::_prelude::*;

/// Placeholder object-key segment when the payload carries no account ULID.
pub const UNKNOWN_ULID: &str = "unknown_ulid";
/// Placeholder object-key segment when the payload carries no license identifier.
pub const UNKNOWN_LICENSE_ID: &str = "unknown_license_id";

const DATE_PREFIX_LEN: usize = 10;

/// Opaque usage document.
///
/// Only `account.ulid`, `account.license_id`, and `time_range.{start,end}` are ever read; the rest
/// of the document is carried through untouched, key order and number literals included.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsagePayload(serde_json::Value);
impl UsagePayload {
	/// Wraps an already parsed document.
	pub fn new(document: serde_json::Value) -> Self {
		Self(document)
	}

	/// Borrows the full document.
	pub fn document(&self) -> &serde_json::Value {
		&self.0
	}

	/// Account ULID, or [`UNKNOWN_ULID`] when absent or empty.
	pub fn account_ulid(&self) -> &str {
		self.non_empty_str("/account/ulid").unwrap_or(UNKNOWN_ULID)
	}

	/// License identifier, or [`UNKNOWN_LICENSE_ID`] when absent or empty.
	pub fn license_id(&self) -> &str {
		self.non_empty_str("/account/license_id").unwrap_or(UNKNOWN_LICENSE_ID)
	}

	/// Self-reported `(start, end)` strings; missing entries are empty.
	pub fn time_range(&self) -> (&str, &str) {
		(
			self.0.pointer("/time_range/start").and_then(|v| v.as_str()).unwrap_or_default(),
			self.0.pointer("/time_range/end").and_then(|v| v.as_str()).unwrap_or_default(),
		)
	}

	/// Artifact name `usage_data_{start}_{end}.json` built from the payload's own date range.
	///
	/// Path separators in the reported dates are replaced with `_`, so the name never leaves the
	/// sink's directory.
	pub fn file_name(&self) -> String {
		let (start, end) = self.time_range();

		format!("usage_data_{}_{}.json", date_prefix(start), date_prefix(end))
	}

	/// Remote object key `{ulid}/{license_id}/{file_name}`.
	pub fn object_key(&self) -> String {
		format!("{}/{}/{}", self.account_ulid(), self.license_id(), self.file_name())
	}

	/// Pretty-printed JSON, as written to local files.
	pub fn to_pretty_json(&self) -> Result<Vec<u8>, serde_json::Error> {
		serde_json::to_vec_pretty(&self.0)
	}

	/// Compact JSON, as uploaded.
	pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
		serde_json::to_vec(&self.0)
	}

	fn non_empty_str(&self, pointer: &str) -> Option<&str> {
		self.0.pointer(pointer).and_then(|v| v.as_str()).filter(|v| !v.is_empty())
	}
}

fn date_prefix(value: &str) -> String {
	value
		.chars()
		.take(DATE_PREFIX_LEN)
		.map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
		.collect()
}
