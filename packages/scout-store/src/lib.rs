pub mod memory;
pub mod postgres;
pub mod schema;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = std::pin::Pin<Box<dyn Future<Output = T> + Send + 'a>>;

use scout_domain::spec::SearchSpec;
use uuid::Uuid;

/// Deterministic cache key: one entry per (subject, profile version). A
/// version bump changes the key, so stale entries miss by construction and no
/// delete-on-update step exists.
pub fn spec_cache_key(subject_id: Uuid, profile_version: u32) -> String {
	format!("{subject_id}:v{profile_version}")
}

/// Storage-agnostic search-spec cache. Entries are replaced whole, so a read
/// never observes a partially written value, and setting an equal value again
/// never grows the number of stored entries.
pub trait SpecStore
where
	Self: Send + Sync,
{
	fn get<'a>(
		&'a self,
		subject_id: Uuid,
		profile_version: u32,
	) -> BoxFuture<'a, Result<Option<SearchSpec>>>;

	/// Writes under the key derived from the spec's own identity fields. A
	/// TTL, when given, makes the entry lazily expire on read.
	fn set<'a>(&'a self, spec: &'a SearchSpec, ttl_seconds: Option<u64>)
	-> BoxFuture<'a, Result<()>>;

	fn has<'a>(&'a self, subject_id: Uuid, profile_version: u32) -> BoxFuture<'a, Result<bool>>;

	fn invalidate<'a>(
		&'a self,
		subject_id: Uuid,
		profile_version: u32,
	) -> BoxFuture<'a, Result<()>>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cache_key_embeds_subject_and_version() {
		let subject = Uuid::from_u128(7);

		assert_eq!(
			spec_cache_key(subject, 3),
			format!("{subject}:v3"),
		);
		assert_ne!(spec_cache_key(subject, 3), spec_cache_key(subject, 4));
	}
}
