mod common;

// std
use std::{fs, sync::Arc};
// crates.io
use httpmock::prelude::*;
// self
use common::*;
use usage_export::{http::ReqwestHttpClient, sink::LocalFileSink, window::BatchSize};

#[tokio::test]
async fn ten_days_in_weekly_batches_write_two_files() {
	let server = MockServer::start_async().await;
	let dir = temp_dir("weekly");
	let (pipeline, observer) = build_pipeline(
		Arc::new(ReqwestHttpClient::new()),
		&url(&server.base_url()),
		LocalFileSink::new(&dir),
	);
	let auth = server
		.mock_async(|when, then| {
			when.method(POST).path("/graphql").header("content-type", "application/json");
			then.status(200).json_body(token_body("jwt-weekly"));
		})
		.await;
	let first = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/selfhosted/metrics")
				.query_param("start_timestamp", "1704067200")
				.query_param("end_timestamp", "1704672000")
				.header("authorization", "Bearer jwt-weekly");
			then.status(200).json_body(usage_body("2024-01-01", "2024-01-08"));
		})
		.await;
	let second = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/selfhosted/metrics")
				.query_param("start_timestamp", "1704672000")
				.query_param("end_timestamp", "1704844800")
				.header("authorization", "Bearer jwt-weekly");
			then.status(200).json_body(usage_body("2024-01-08", "2024-01-10"));
		})
		.await;

	pipeline
		.export("2024-01-01", "2024-01-10", BatchSize::DEFAULT)
		.await
		.expect("Export should complete.");

	auth.assert_calls_async(2).await;
	first.assert_async().await;
	second.assert_async().await;

	assert!(observer.failures().is_empty());

	let written: serde_json::Value = serde_json::from_slice(
		&fs::read(dir.join("usage_data_2024-01-01_2024-01-08.json"))
			.expect("First window file should exist."),
	)
	.expect("First window file should hold JSON.");

	assert_eq!(written, usage_body("2024-01-01", "2024-01-08"));
	assert!(dir.join("usage_data_2024-01-08_2024-01-10.json").exists());

	cleanup(&dir);
}

#[tokio::test]
async fn file_names_follow_payload_dates_not_window_bounds() {
	let server = MockServer::start_async().await;
	let dir = temp_dir("payload_dates");
	let (pipeline, _observer) = build_pipeline(
		Arc::new(ReqwestHttpClient::new()),
		&url(&server.base_url()),
		LocalFileSink::new(&dir),
	);

	server
		.mock_async(|when, then| {
			when.method(POST).path("/graphql");
			then.status(200).json_body(token_body("jwt"));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/selfhosted/metrics");
			then.status(200).json_body(usage_body("2023-12-31", "2024-01-02"));
		})
		.await;

	pipeline
		.export("2024-01-01", "2024-01-02", days(1))
		.await
		.expect("Export should complete.");

	assert!(dir.join("usage_data_2023-12-31_2024-01-02.json").exists());
	assert!(!dir.join("usage_data_2024-01-01_2024-01-02.json").exists());

	cleanup(&dir);
}

#[tokio::test]
async fn storing_the_same_window_twice_is_idempotent() {
	let server = MockServer::start_async().await;
	let dir = temp_dir("idempotent");
	let (pipeline, observer) = build_pipeline(
		Arc::new(ReqwestHttpClient::new()),
		&url(&server.base_url()),
		LocalFileSink::new(&dir),
	);

	server
		.mock_async(|when, then| {
			when.method(POST).path("/graphql");
			then.status(200).json_body(token_body("jwt"));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/selfhosted/metrics");
			then.status(200).json_body(usage_body("2024-02-01", "2024-02-02"));
		})
		.await;

	pipeline.export("2024-02-01", "2024-02-02", days(1)).await.expect("First run should pass.");

	let path = dir.join("usage_data_2024-02-01_2024-02-02.json");
	let first = fs::read(&path).expect("File should exist after the first run.");

	pipeline.export("2024-02-01", "2024-02-02", days(1)).await.expect("Second run should pass.");

	let second = fs::read(&path).expect("File should exist after the second run.");

	assert_eq!(first, second);
	assert_eq!(fs::read_dir(&dir).expect("Output directory should be readable.").count(), 1);
	assert_eq!(observer.stored().len(), 2);

	cleanup(&dir);
}
