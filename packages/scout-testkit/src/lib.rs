//! Scripted doubles and fixtures for exercising the generation pipeline
//! without a network or a database.

use std::{
	collections::VecDeque,
	sync::{
		Mutex,
		atomic::{AtomicU32, Ordering},
	},
	time::Duration,
};

use serde_json::{Map, Value, json};
use time::macros::datetime;
use uuid::Uuid;

use scout_config::{Cache, Config, Generator, Providers, ReasoningProviderConfig, Service};
use scout_domain::{
	normalize,
	profile::{
		NormalizedProfile, RawEducation, RawExperience, RawPreferences, RawProfile, RawSkill,
		YearMonth,
	},
};
use scout_service::{Delay, ReasoningProvider};
use scout_store::BoxFuture;

/// Replays a fixed script of reasoning outcomes, one per call, and counts the
/// calls. Running past the end of the script is reported as a provider error
/// rather than a panic so retry exhaustion can be asserted on.
pub struct ScriptedReasoning {
	script: Mutex<VecDeque<Result<Value, String>>>,
	calls: AtomicU32,
}
impl ScriptedReasoning {
	pub fn new(script: Vec<Result<Value, String>>) -> Self {
		Self { script: Mutex::new(script.into_iter().collect()), calls: AtomicU32::new(0) }
	}

	pub fn calls(&self) -> u32 {
		self.calls.load(Ordering::SeqCst)
	}
}
impl ReasoningProvider for ScriptedReasoning {
	fn complete<'a>(
		&'a self,
		_cfg: &'a ReasoningProviderConfig,
		_messages: &'a [Value],
	) -> BoxFuture<'a, scout_providers::Result<Value>> {
		Box::pin(async move {
			self.calls.fetch_add(1, Ordering::SeqCst);

			let next = {
				let mut script = self.script.lock().unwrap_or_else(|err| err.into_inner());

				script.pop_front()
			};

			match next {
				Some(Ok(value)) => Ok(value),
				Some(Err(message)) => Err(scout_providers::Error::InvalidResponse { message }),
				None => Err(scout_providers::Error::InvalidResponse {
					message: "Reasoning script exhausted.".to_string(),
				}),
			}
		})
	}
}

/// Records requested backoff durations and returns immediately, keeping retry
/// tests instant while still asserting the schedule.
#[derive(Default)]
pub struct RecordingDelay {
	delays: Mutex<Vec<Duration>>,
}
impl RecordingDelay {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn recorded(&self) -> Vec<Duration> {
		self.delays.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
impl Delay for RecordingDelay {
	fn sleep<'a>(&'a self, duration: Duration) -> BoxFuture<'a, ()> {
		Box::pin(async move {
			self.delays.lock().unwrap_or_else(|err| err.into_inner()).push(duration);
		})
	}
}

pub fn test_config() -> Config {
	Config {
		service: Service { log_level: "info".to_string() },
		providers: Providers {
			reasoning: ReasoningProviderConfig {
				provider_id: "scripted".to_string(),
				api_base: "http://localhost:0".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/chat/completions".to_string(),
				model: "test-model".to_string(),
				temperature: 0.2,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
		cache: Cache { backend: "memory".to_string(), ttl_seconds: None, postgres: None },
		generator: Generator { max_retries: 2, backoff_base_ms: 250, page_size: 50 },
	}
}

pub fn sample_raw_profile(subject_id: Uuid, profile_version: u32) -> RawProfile {
	RawProfile {
		subject_id,
		tenant_id: "tenant-test".to_string(),
		profile_version,
		skills: vec![
			RawSkill { name: "React".to_string(), level: 4, years: Some(5.0) },
			RawSkill { name: "react".to_string(), level: 5, years: Some(3.0) },
			RawSkill { name: "Next.js".to_string(), level: 4, years: Some(2.0) },
			RawSkill { name: "TypeScript".to_string(), level: 4, years: Some(4.0) },
			RawSkill { name: "Node.js".to_string(), level: 3, years: Some(4.0) },
		],
		experiences: vec![
			RawExperience {
				title: "Senior Frontend Engineer".to_string(),
				company: "Acme".to_string(),
				start_date: Some("2022-03".to_string()),
				end_date: None,
				highlights: "Led the design-system rebuild.\nCut bundle size by 40%."
					.to_string(),
			},
			RawExperience {
				title: "Frontend Engineer".to_string(),
				company: "Initech".to_string(),
				start_date: Some("2019-01".to_string()),
				end_date: Some("2022-02".to_string()),
				highlights: "Shipped the checkout flow; mentored two juniors.".to_string(),
			},
		],
		educations: vec![RawEducation {
			institution: "State University".to_string(),
			degree: "BSc Computer Science".to_string(),
			field: "Computer Science".to_string(),
			start_date: Some("2014-09".to_string()),
			end_date: Some("2018-06".to_string()),
		}],
		preferences: Some(RawPreferences {
			platforms: vec!["upwork".to_string()],
			hourly_rate_min: Some(60.0),
			hourly_rate_max: Some(110.0),
			tightness: 3,
			project_types: vec!["long term".to_string()],
			remote: Some(scout_domain::profile::RemotePreference::Remote),
		}),
	}
}

/// Normalizes the sample profile at a pinned reference time so derived fields
/// are stable across test runs.
pub fn sample_normalized_profile() -> NormalizedProfile {
	normalize::normalize_profile_at(
		&sample_raw_profile(Uuid::from_u128(0xfeed), 1),
		YearMonth { year: 2025, month: 6 },
		datetime!(2025-06-15 12:00:00 UTC),
	)
}

/// A draft the schema validator accepts as-is.
pub fn valid_draft_value() -> Value {
	json!({
		"title_keywords": [
			{ "keyword": "frontend engineer", "weight": 9 },
			{ "keyword": "react developer", "weight": 8 }
		],
		"skill_keywords": [
			{ "keyword": "react", "weight": 10 },
			{ "keyword": "typescript", "weight": 8 },
			{ "keyword": "nextjs", "weight": 7 }
		],
		"negative_keywords": ["wordpress"],
		"locations": ["remote"],
		"seniority_levels": ["senior"],
		"remote": "remote",
		"contract_types": ["contract"],
		"hourly_rate_min": 60.0,
		"hourly_rate_max": 110.0
	})
}

/// A draft that parses but violates the schema (weight out of range), for
/// driving the retry path.
pub fn invalid_draft_value() -> Value {
	let mut draft = valid_draft_value();

	draft["skill_keywords"][0]["weight"] = json!(11);

	draft
}
