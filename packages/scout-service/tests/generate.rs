use std::{sync::Arc, time::Duration};

use scout_service::{Error, Providers, SpecService};
use scout_store::memory::MemoryStore;
use scout_testkit::{
	RecordingDelay, ScriptedReasoning, invalid_draft_value, sample_normalized_profile,
	test_config, valid_draft_value,
};

fn service(
	script: Vec<Result<serde_json::Value, String>>,
) -> (SpecService, Arc<ScriptedReasoning>, Arc<RecordingDelay>, Arc<MemoryStore>) {
	let store = Arc::new(MemoryStore::new());
	let reasoning = Arc::new(ScriptedReasoning::new(script));
	let delay = Arc::new(RecordingDelay::new());
	let service = SpecService::with_providers(
		test_config(),
		store.clone(),
		Providers { reasoning: reasoning.clone() },
	)
	.with_delay(delay.clone());

	(service, reasoning, delay, store)
}

#[tokio::test]
async fn generates_once_then_serves_from_cache() {
	let (service, reasoning, _, store) = service(vec![Ok(valid_draft_value())]);
	let profile = sample_normalized_profile();

	let first = service.generate(&profile).await.expect("generation succeeds");

	assert!(!first.from_cache);
	assert_eq!(first.attempts, 1);
	assert_eq!(first.spec.subject_id, profile.subject_id);
	assert_eq!(first.spec.profile_version, profile.profile_version);
	assert_eq!(first.spec.platforms, profile.preferences.platforms);
	assert_eq!(first.spec.page_size, 50);
	assert_eq!(store.len(), 1);

	let second = service.generate(&profile).await.expect("cache hit succeeds");

	assert!(second.from_cache);
	assert_eq!(second.attempts, 0);
	assert_eq!(second.spec, first.spec);
	assert_eq!(reasoning.calls(), 1);
}

#[tokio::test]
async fn retries_transport_failures_with_doubling_backoff() {
	let (service, reasoning, delay, _) = service(vec![
		Err("connection reset".to_string()),
		Err("connection reset".to_string()),
		Ok(valid_draft_value()),
	]);

	let response =
		service.generate(&sample_normalized_profile()).await.expect("third attempt succeeds");

	assert_eq!(response.attempts, 3);
	assert_eq!(reasoning.calls(), 3);
	assert_eq!(
		delay.recorded(),
		vec![Duration::from_millis(250), Duration::from_millis(500)],
	);
}

#[tokio::test]
async fn retries_drafts_that_violate_the_schema() {
	let (service, reasoning, delay, _) =
		service(vec![Ok(invalid_draft_value()), Ok(valid_draft_value())]);

	let response =
		service.generate(&sample_normalized_profile()).await.expect("second attempt succeeds");

	assert_eq!(response.attempts, 2);
	assert_eq!(reasoning.calls(), 2);
	assert_eq!(delay.recorded(), vec![Duration::from_millis(250)]);
}

#[tokio::test]
async fn exhausted_retries_surface_the_attempt_count() {
	let (service, reasoning, _, store) = service(vec![
		Err("boom".to_string()),
		Err("boom".to_string()),
		Err("boom".to_string()),
	]);

	let err = service.generate(&sample_normalized_profile()).await.unwrap_err();

	match err {
		Error::Provider { attempts, .. } => assert_eq!(attempts, 3),
		other => panic!("expected a provider error, got {other:?}"),
	}

	assert_eq!(reasoning.calls(), 3);
	assert!(store.is_empty());
}

#[tokio::test]
async fn undecodable_payloads_are_retried_like_failures() {
	let (service, reasoning, _, _) = service(vec![
		Ok(serde_json::json!({ "totally": "unrelated" })),
		Ok(valid_draft_value()),
	]);

	let response =
		service.generate(&sample_normalized_profile()).await.expect("second attempt succeeds");

	assert_eq!(response.attempts, 2);
	assert_eq!(reasoning.calls(), 2);
}

#[tokio::test]
async fn rejects_profiles_without_a_valid_version() {
	let (service, reasoning, _, _) = service(vec![Ok(valid_draft_value())]);
	let mut profile = sample_normalized_profile();

	profile.profile_version = 0;

	assert!(matches!(
		service.generate(&profile).await.unwrap_err(),
		Error::InvalidRequest { .. },
	));
	assert_eq!(reasoning.calls(), 0);
}

#[tokio::test]
async fn new_profile_version_misses_the_old_cache_entry() {
	let (service, reasoning, _, store) =
		service(vec![Ok(valid_draft_value()), Ok(valid_draft_value())]);
	let mut profile = sample_normalized_profile();

	service.generate(&profile).await.expect("v1 generation succeeds");

	profile.profile_version = 2;

	let response = service.generate(&profile).await.expect("v2 generation succeeds");

	assert!(!response.from_cache);
	assert_eq!(reasoning.calls(), 2);
	assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn invalidate_forces_regeneration() {
	let (service, reasoning, _, _) =
		service(vec![Ok(valid_draft_value()), Ok(valid_draft_value())]);
	let profile = sample_normalized_profile();

	service.generate(&profile).await.expect("generation succeeds");
	assert!(
		service
			.has_spec(profile.subject_id, profile.profile_version)
			.await
			.expect("has succeeds")
	);

	service
		.invalidate_spec(profile.subject_id, profile.profile_version)
		.await
		.expect("invalidate succeeds");

	let response = service.generate(&profile).await.expect("regeneration succeeds");

	assert!(!response.from_cache);
	assert_eq!(reasoning.calls(), 2);
}
