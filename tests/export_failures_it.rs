mod common;

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
// self
use common::*;
use usage_export::{http::ReqwestHttpClient, sink::LocalFileSink};

#[tokio::test]
async fn server_error_on_middle_window_is_logged_and_skipped() {
	let server = MockServer::start_async().await;
	let dir = temp_dir("middle_500");
	let (pipeline, observer) = build_pipeline(
		Arc::new(ReqwestHttpClient::new()),
		&url(&server.base_url()),
		LocalFileSink::new(&dir),
	);
	let auth = server
		.mock_async(|when, then| {
			when.method(POST).path("/graphql");
			then.status(200).json_body(token_body("jwt-3"));
		})
		.await;
	let windows = [
		("1704067200", "1704153600", Some(("2024-01-01", "2024-01-02"))),
		("1704153600", "1704240000", None),
		("1704240000", "1704326400", Some(("2024-01-03", "2024-01-04"))),
	];
	let mut mocks = Vec::new();

	for (start, end, dates) in windows {
		let mock = server
			.mock_async(|when, then| {
				when.method(GET)
					.path("/selfhosted/metrics")
					.query_param("start_timestamp", start)
					.query_param("end_timestamp", end);

				match dates {
					Some((from, to)) => {
						then.status(200).json_body(usage_body(from, to));
					},
					None => {
						then.status(500).body("internal error");
					},
				}
			})
			.await;

		mocks.push(mock);
	}

	pipeline
		.export("2024-01-01", "2024-01-04", days(1))
		.await
		.expect("A failing window must not fail the run.");

	auth.assert_calls_async(3).await;

	for mock in &mocks {
		mock.assert_async().await;
	}

	let failures = observer.failures();

	assert_eq!(failures.len(), 1);
	assert_eq!(failures[0].0.start_timestamp(), 1_704_153_600);
	assert!(failures[0].1.contains("HTTP 500"));
	assert!(dir.join("usage_data_2024-01-01_2024-01-02.json").exists());
	assert!(dir.join("usage_data_2024-01-03_2024-01-04.json").exists());

	cleanup(&dir);
}

#[tokio::test]
async fn rejected_credentials_fail_every_window_without_fetching() {
	let server = MockServer::start_async().await;
	let dir = temp_dir("unauthorized");
	let (pipeline, observer) = build_pipeline(
		Arc::new(ReqwestHttpClient::new()),
		&url(&server.base_url()),
		LocalFileSink::new(&dir),
	);
	let auth = server
		.mock_async(|when, then| {
			when.method(POST).path("/graphql");
			then.status(200).json_body(serde_json::json!({
				"data": { "apiKeyUser": null },
				"errors": [{ "message": "unauthorized" }],
			}));
		})
		.await;
	let usage = server
		.mock_async(|when, then| {
			when.method(GET).path("/selfhosted/metrics");
			then.status(200).json_body(usage_body("2024-01-01", "2024-01-02"));
		})
		.await;

	pipeline
		.export("2024-01-01", "2024-01-03", days(1))
		.await
		.expect("Authentication failures are per-window.");

	auth.assert_calls_async(2).await;
	usage.assert_calls_async(0).await;

	let failures = observer.failures();

	assert_eq!(failures.len(), 2);
	assert!(failures.iter().all(|(_, message)| message.contains("unauthorized")));
	assert!(!dir.exists());
}

#[tokio::test]
async fn unreachable_instance_is_a_per_window_failure() {
	let dir = temp_dir("unreachable");
	let (pipeline, observer) = build_pipeline(
		Arc::new(ReqwestHttpClient::new()),
		&url("http://127.0.0.1:9"),
		LocalFileSink::new(&dir),
	);

	pipeline
		.export("2024-01-01", "2024-01-03", days(1))
		.await
		.expect("Transport failures are per-window.");

	let failures = observer.failures();

	assert_eq!(failures.len(), 2);
	assert!(observer.stored().is_empty());

	for (window, message) in failures {
		assert!(
			message.starts_with("Network error occurred while calling the authentication endpoint."),
			"{window}: {message}"
		);
		assert!(
			message.to_lowercase().contains("connect"),
			"Failure for {window} should keep the connection cause: {message}"
		);
	}
}
