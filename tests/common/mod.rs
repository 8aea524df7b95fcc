#![allow(dead_code)]

// std
use std::{
	env,
	path::{Path, PathBuf},
	process,
	sync::Arc,
};
// crates.io
use serde_json::{Value, json};
use time::OffsetDateTime;
// self
use usage_export::{
	auth::Credentials,
	obs::MemoryObserver,
	pipeline::ExportPipeline,
	sink::Sink,
	url::Url,
	window::BatchSize,
};

pub const KEY_ID: &str = "01HKEYINTEGRATION";
pub const KEY_SECRET: &str = "integration-secret";

pub fn temp_dir(label: &str) -> PathBuf {
	env::temp_dir().join(format!(
		"usage_export_it_{label}_{}_{}",
		process::id(),
		OffsetDateTime::now_utc().unix_timestamp_nanos(),
	))
}

pub fn cleanup(dir: &Path) {
	if dir.exists() {
		std::fs::remove_dir_all(dir).unwrap_or_else(|e| {
			panic!("Failed to remove temporary directory {}: {e}", dir.display())
		});
	}
}

pub fn token_body(jwt: &str) -> Value {
	json!({ "data": { "apiKeyUser": { "jwt": jwt } } })
}

pub fn usage_body(start: &str, end: &str) -> Value {
	json!({
		"account": { "ulid": "01HACCOUNT", "license_id": "lic-integration" },
		"time_range": { "start": format!("{start}T00:00:00Z"), "end": format!("{end}T00:00:00Z") },
		"usage": { "workers": 4, "runs": 17 },
	})
}

pub fn days(count: u32) -> BatchSize {
	BatchSize::from_days(count).expect("Batch fixture should be non-zero.")
}

pub fn url(value: &str) -> Url {
	Url::parse(value).expect("Failed to parse test URL.")
}

pub fn build_pipeline(
	http: Arc<dyn usage_export::http::ExportHttpClient>,
	base_url: &Url,
	sink: impl Into<Sink>,
) -> (ExportPipeline, Arc<MemoryObserver>) {
	let observer = Arc::new(MemoryObserver::default());
	let pipeline = ExportPipeline::new(http, base_url, Credentials::new(KEY_ID, KEY_SECRET), sink)
		.expect("Pipeline should build for integration tests.")
		.with_observer(observer.clone());

	(pipeline, observer)
}
