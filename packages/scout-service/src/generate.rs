use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

use crate::{Error, Result, SpecService, summary};
use scout_domain::{
	profile::NormalizedProfile,
	spec::{self, DraftSpec, SearchSpec},
};

#[derive(Clone, Debug, Serialize)]
pub struct GenerateResponse {
	pub spec: SearchSpec,
	pub from_cache: bool,
	/// Reasoning attempts consumed; `0` on a cache hit.
	pub attempts: u32,
}

impl SpecService {
	/// Returns the cached spec for the profile's exact version when present;
	/// otherwise drafts one through the reasoning capability with bounded
	/// retries, merges in identity and paging, re-validates, and caches it.
	pub async fn generate(&self, profile: &NormalizedProfile) -> Result<GenerateResponse> {
		if profile.profile_version == 0 {
			return Err(Error::InvalidRequest {
				message: "Profile version starts at 1.".to_string(),
			});
		}
		if profile.tenant_id.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "Tenant id must be non-empty.".to_string(),
			});
		}

		if let Some(spec) = self.store.get(profile.subject_id, profile.profile_version).await? {
			tracing::info!(
				subject_id = %profile.subject_id,
				profile_version = profile.profile_version,
				hit = true,
				"Spec cache hit."
			);

			return Ok(GenerateResponse { spec, from_cache: true, attempts: 0 });
		}

		tracing::info!(
			subject_id = %profile.subject_id,
			profile_version = profile.profile_version,
			hit = false,
			"Spec cache miss; drafting."
		);

		let messages = summary::build_messages(profile);
		let (draft, attempts) = self.invoke_with_retry(&messages).await?;
		let spec = SearchSpec::from_draft(
			draft,
			profile,
			self.cfg.generator.page_size,
			OffsetDateTime::now_utc(),
		);

		spec::validate_spec(&spec)?;
		self.store.set(&spec, self.cfg.cache.ttl_seconds).await?;
		tracing::info!(
			subject_id = %spec.subject_id,
			profile_version = spec.profile_version,
			attempts,
			"Generated and cached spec."
		);

		Ok(GenerateResponse { spec, from_cache: false, attempts })
	}

	/// Drafting retries on transport failures, undecodable payloads, and
	/// schema violations alike; the capability is non-deterministic, so the
	/// next attempt may well succeed. Validation of the merged spec is NOT
	/// retried here: that failure is deterministic.
	async fn invoke_with_retry(&self, messages: &[Value]) -> Result<(DraftSpec, u32)> {
		let max_attempts = self.cfg.generator.max_retries.saturating_add(1);
		let mut last_failure = String::new();

		for attempt in 1..=max_attempts {
			if attempt > 1 {
				let delay = backoff_delay(self.cfg.generator.backoff_base_ms, attempt);

				tracing::warn!(
					attempt,
					delay_ms = delay.as_millis() as u64,
					error = %last_failure,
					"Retrying reasoning call."
				);
				self.delay.sleep(delay).await;
			}

			match self.attempt_draft(messages).await {
				Ok(draft) => return Ok((draft, attempt)),
				Err(failure) => last_failure = failure,
			}
		}

		Err(Error::Provider { attempts: max_attempts, message: last_failure })
	}

	async fn attempt_draft(&self, messages: &[Value]) -> std::result::Result<DraftSpec, String> {
		let value = self
			.providers
			.reasoning
			.complete(&self.cfg.providers.reasoning, messages)
			.await
			.map_err(|err| err.to_string())?;
		let draft =
			serde_json::from_value::<DraftSpec>(value).map_err(|err| err.to_string())?;

		spec::validate_draft(&draft).map_err(|violation| violation.to_string())?;

		Ok(draft)
	}
}

/// The wait before attempt `n` doubles each retry: base, 2*base, 4*base, ...
fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
	let exponent = attempt.saturating_sub(2).min(16);

	Duration::from_millis(base_ms.saturating_mul(1_u64 << exponent))
}
