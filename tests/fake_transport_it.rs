mod common;

// std
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};
// self
use common::*;
use usage_export::{
	error::{Error, TransportError, ValidationError},
	http::{ExportHttpClient, HttpFuture, HttpRequest},
	sink::{LocalFileSink, RemoteUploadSink},
	window::BatchSize,
};

#[derive(Debug)]
struct Offline;
impl std::fmt::Display for Offline {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.write_str("Transport offline.")
	}
}
impl std::error::Error for Offline {}

/// Counts calls and fails every one of them.
#[derive(Default)]
struct CountingHttpClient {
	calls: AtomicUsize,
}
impl CountingHttpClient {
	fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl ExportHttpClient for CountingHttpClient {
	fn send(&self, request: HttpRequest) -> HttpFuture<'_> {
		Box::pin(async move {
			self.calls.fetch_add(1, Ordering::SeqCst);

			Err(TransportError::network(request.endpoint, Offline))
		})
	}
}

#[tokio::test]
async fn malformed_dates_abort_before_any_call() {
	let http = Arc::new(CountingHttpClient::default());
	let upload = Arc::new(CountingHttpClient::default());
	let sink = RemoteUploadSink::new(upload.clone(), &url("https://collector.example.com"))
		.expect("Remote sink should build.");
	let (pipeline, observer) =
		build_pipeline(http.clone(), &url("https://spacelift.example.com"), sink);

	for (start, end) in [
		("2024-1-1", "2024-01-10"),
		("2024-01-01", "20240110"),
		("yesterday", "today"),
		("2024-01-01 ", "2024-01-10"),
	] {
		let err = pipeline
			.export(start, end, BatchSize::DEFAULT)
			.await
			.expect_err("Malformed dates should abort the run.");

		assert!(matches!(err, Error::Validation(ValidationError::InvalidDate { .. })), "{err:?}");
	}

	assert_eq!(http.calls(), 0);
	assert_eq!(upload.calls(), 0);
	assert!(observer.events().is_empty());
}

#[tokio::test]
async fn inverted_range_aborts_before_any_call() {
	let http = Arc::new(CountingHttpClient::default());
	let (pipeline, _observer) = build_pipeline(
		http.clone(),
		&url("https://spacelift.example.com"),
		LocalFileSink::new(temp_dir("inverted")),
	);
	let err = pipeline
		.export("2024-02-01", "2024-01-01", BatchSize::DEFAULT)
		.await
		.expect_err("Inverted ranges should abort the run.");

	assert!(err.aborts_run());
	assert_eq!(http.calls(), 0);
}

#[tokio::test]
async fn equal_bounds_plan_no_windows() {
	let http = Arc::new(CountingHttpClient::default());
	let (pipeline, observer) = build_pipeline(
		http.clone(),
		&url("https://spacelift.example.com"),
		LocalFileSink::new(temp_dir("equal")),
	);

	pipeline
		.export("2024-05-05", "2024-05-05", days(3))
		.await
		.expect("Empty ranges should succeed.");

	assert_eq!(http.calls(), 0);
	assert!(observer.events().is_empty());
}

#[tokio::test]
async fn offline_transport_fails_each_window_once() {
	let http = Arc::new(CountingHttpClient::default());
	let (pipeline, observer) = build_pipeline(
		http.clone(),
		&url("https://spacelift.example.com"),
		LocalFileSink::new(temp_dir("offline")),
	);

	pipeline
		.export("2024-01-01", "2024-01-22", BatchSize::DEFAULT)
		.await
		.expect("Transport failures are per-window.");

	assert_eq!(http.calls(), 3, "Each window authenticates once and stops there.");
	assert_eq!(observer.failures().len(), 3);
}
