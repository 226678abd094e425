use time::macros::datetime;
use uuid::Uuid;

use scout_domain::{
	profile::{ContractType, RemotePreference, Seniority},
	spec::{SearchSpec, WeightedKeyword},
};
use scout_store::{SpecStore, memory::MemoryStore, spec_cache_key};

fn spec(subject_id: Uuid, profile_version: u32) -> SearchSpec {
	SearchSpec {
		subject_id,
		tenant_id: "tenant-1".to_string(),
		profile_version,
		title_keywords: vec![WeightedKeyword { keyword: "rust engineer".to_string(), weight: 9 }],
		skill_keywords: vec![WeightedKeyword { keyword: "rust".to_string(), weight: 10 }],
		negative_keywords: vec!["unpaid".to_string()],
		locations: vec!["remote".to_string()],
		seniority_levels: vec![Seniority::Senior],
		remote: RemotePreference::Remote,
		contract_types: vec![ContractType::Contract],
		hourly_rate_min: Some(70.0),
		hourly_rate_max: Some(130.0),
		fixed_budget_min: None,
		fixed_budget_max: None,
		platforms: vec!["upwork".to_string()],
		page_size: 50,
		generated_at: datetime!(2025-06-15 12:00:00 UTC),
	}
}

#[tokio::test]
async fn set_then_get_returns_deep_equal_spec() {
	let store = MemoryStore::new();
	let subject = Uuid::from_u128(1);
	let spec = spec(subject, 3);

	store.set(&spec, None).await.expect("set succeeds");

	let fetched = store.get(subject, 3).await.expect("get succeeds");

	assert_eq!(fetched, Some(spec));
}

#[tokio::test]
async fn different_version_is_a_miss_by_construction() {
	let store = MemoryStore::new();
	let subject = Uuid::from_u128(2);

	store.set(&spec(subject, 3), None).await.expect("set succeeds");

	assert_eq!(store.get(subject, 4).await.expect("get succeeds"), None);
	assert!(!store.has(subject, 4).await.expect("has succeeds"));
	assert!(store.has(subject, 3).await.expect("has succeeds"));
}

#[tokio::test]
async fn repeated_set_keeps_one_entry() {
	let store = MemoryStore::new();
	let subject = Uuid::from_u128(3);
	let spec = spec(subject, 1);

	for _ in 0..3 {
		store.set(&spec, None).await.expect("set succeeds");
	}

	assert_eq!(store.len(), 1);
	assert_eq!(store.get(subject, 1).await.expect("get succeeds"), Some(spec));
}

#[tokio::test]
async fn expired_entries_read_as_absent() {
	let store = MemoryStore::new();
	let subject = Uuid::from_u128(4);

	store.set(&spec(subject, 1), Some(0)).await.expect("set succeeds");

	assert_eq!(store.get(subject, 1).await.expect("get succeeds"), None);

	store.set(&spec(subject, 2), Some(3_600)).await.expect("set succeeds");

	assert!(store.has(subject, 2).await.expect("has succeeds"));
}

#[tokio::test]
async fn invalidate_removes_only_the_given_version() {
	let store = MemoryStore::new();
	let subject = Uuid::from_u128(5);

	store.set(&spec(subject, 1), None).await.expect("set succeeds");
	store.set(&spec(subject, 2), None).await.expect("set succeeds");
	store.invalidate(subject, 1).await.expect("invalidate succeeds");

	assert_eq!(store.get(subject, 1).await.expect("get succeeds"), None);
	assert!(store.has(subject, 2).await.expect("has succeeds"));
}

#[test]
fn cache_keys_are_stable_strings() {
	let subject = Uuid::from_u128(6);

	assert_eq!(spec_cache_key(subject, 9), format!("{subject}:v9"));
}
