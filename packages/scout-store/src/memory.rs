use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
};

use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{BoxFuture, Result, SpecStore, spec_cache_key};
use scout_domain::spec::SearchSpec;

#[derive(Clone, Debug)]
struct StoredEntry {
	spec: SearchSpec,
	expires_at: Option<OffsetDateTime>,
}

/// Reference backend: non-persistent, for tests and local runs. Expiry is
/// checked lazily on read; no eviction task runs.
#[derive(Clone, Default)]
pub struct MemoryStore {
	entries: Arc<Mutex<HashMap<String, StoredEntry>>>,
}
impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Count of live entries, expired ones included until a read prunes them.
	pub fn len(&self) -> usize {
		self.entries.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn lookup(&self, key: &str, now: OffsetDateTime) -> Option<SearchSpec> {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());
		let expired = entries
			.get(key)
			.and_then(|entry| entry.expires_at)
			.map(|expires_at| expires_at <= now)
			.unwrap_or(false);

		if expired {
			entries.remove(key);

			return None;
		}

		entries.get(key).map(|entry| entry.spec.clone())
	}
}
impl SpecStore for MemoryStore {
	fn get<'a>(
		&'a self,
		subject_id: Uuid,
		profile_version: u32,
	) -> BoxFuture<'a, Result<Option<SearchSpec>>> {
		Box::pin(async move {
			let key = spec_cache_key(subject_id, profile_version);

			Ok(self.lookup(&key, OffsetDateTime::now_utc()))
		})
	}

	fn set<'a>(
		&'a self,
		spec: &'a SearchSpec,
		ttl_seconds: Option<u64>,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let key = spec_cache_key(spec.subject_id, spec.profile_version);
			let expires_at = ttl_seconds.map(|ttl| {
				OffsetDateTime::now_utc() + Duration::seconds(ttl.min(i64::MAX as u64) as i64)
			});
			let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

			entries.insert(key, StoredEntry { spec: spec.clone(), expires_at });

			Ok(())
		})
	}

	fn has<'a>(&'a self, subject_id: Uuid, profile_version: u32) -> BoxFuture<'a, Result<bool>> {
		Box::pin(async move {
			let key = spec_cache_key(subject_id, profile_version);

			Ok(self.lookup(&key, OffsetDateTime::now_utc()).is_some())
		})
	}

	fn invalidate<'a>(
		&'a self,
		subject_id: Uuid,
		profile_version: u32,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let key = spec_cache_key(subject_id, profile_version);
			let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

			entries.remove(&key);

			Ok(())
		})
	}
}
