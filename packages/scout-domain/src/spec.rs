use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::profile::{ContractType, NormalizedProfile, RemotePreference, Seniority};

pub const MAX_TITLE_KEYWORDS: usize = 10;
pub const MAX_SKILL_KEYWORDS: usize = 20;
pub const MAX_NEGATIVE_KEYWORDS: usize = 10;
pub const MAX_LOCATIONS: usize = 5;
pub const MIN_KEYWORD_WEIGHT: u8 = 1;
pub const MAX_KEYWORD_WEIGHT: u8 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct WeightedKeyword {
	pub keyword: String,
	pub weight: u8,
}

/// The shape the reasoning capability must return: a search spec minus the
/// identity, platform, and paging fields the generator merges in afterwards.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct DraftSpec {
	pub title_keywords: Vec<WeightedKeyword>,
	pub skill_keywords: Vec<WeightedKeyword>,
	#[serde(default)]
	pub negative_keywords: Vec<String>,
	#[serde(default)]
	pub locations: Vec<String>,
	pub seniority_levels: Vec<Seniority>,
	pub remote: RemotePreference,
	pub contract_types: Vec<ContractType>,
	#[serde(default)]
	pub hourly_rate_min: Option<f32>,
	#[serde(default)]
	pub hourly_rate_max: Option<f32>,
	#[serde(default)]
	pub fixed_budget_min: Option<f32>,
	#[serde(default)]
	pub fixed_budget_max: Option<f32>,
}

/// The cacheable artifact consumed by downstream matching, keyed by
/// `(subject_id, profile_version)`. Immutable once stored; a profile edit
/// supersedes it under a new version instead of mutating it.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SearchSpec {
	pub subject_id: Uuid,
	pub tenant_id: String,
	pub profile_version: u32,
	pub title_keywords: Vec<WeightedKeyword>,
	pub skill_keywords: Vec<WeightedKeyword>,
	pub negative_keywords: Vec<String>,
	pub locations: Vec<String>,
	pub seniority_levels: Vec<Seniority>,
	pub remote: RemotePreference,
	pub contract_types: Vec<ContractType>,
	pub hourly_rate_min: Option<f32>,
	pub hourly_rate_max: Option<f32>,
	pub fixed_budget_min: Option<f32>,
	pub fixed_budget_max: Option<f32>,
	pub platforms: Vec<String>,
	pub page_size: u32,
	#[serde(with = "crate::time_serde")]
	pub generated_at: OffsetDateTime,
}
impl SearchSpec {
	/// Copies identity and platform preference from the normalized profile
	/// into a validated draft and stamps the generation timestamp.
	pub fn from_draft(
		draft: DraftSpec,
		profile: &NormalizedProfile,
		page_size: u32,
		generated_at: OffsetDateTime,
	) -> Self {
		Self {
			subject_id: profile.subject_id,
			tenant_id: profile.tenant_id.clone(),
			profile_version: profile.profile_version,
			title_keywords: draft.title_keywords,
			skill_keywords: draft.skill_keywords,
			negative_keywords: draft.negative_keywords,
			locations: draft.locations,
			seniority_levels: draft.seniority_levels,
			remote: draft.remote,
			contract_types: draft.contract_types,
			hourly_rate_min: draft.hourly_rate_min,
			hourly_rate_max: draft.hourly_rate_max,
			fixed_budget_min: draft.fixed_budget_min,
			fixed_budget_max: draft.fixed_budget_max,
			platforms: profile.preferences.platforms.clone(),
			page_size,
			generated_at,
		}
	}
}

/// Rejection with the offending field path; never silently coerced.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("Schema violation at {field}: {message}")]
pub struct SpecViolation {
	pub field: String,
	pub message: String,
}
impl SpecViolation {
	fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self { field: field.into(), message: message.into() }
	}
}

/// Validates the draft shape returned by the reasoning capability. A
/// violation here triggers a retry in the generator.
pub fn validate_draft(draft: &DraftSpec) -> Result<(), SpecViolation> {
	validate_weighted_keywords("$.title_keywords", &draft.title_keywords, MAX_TITLE_KEYWORDS)?;
	validate_weighted_keywords("$.skill_keywords", &draft.skill_keywords, MAX_SKILL_KEYWORDS)?;
	validate_keyword_list("$.negative_keywords", &draft.negative_keywords, MAX_NEGATIVE_KEYWORDS)?;
	validate_keyword_list("$.locations", &draft.locations, MAX_LOCATIONS)?;

	if draft.contract_types.is_empty() {
		return Err(SpecViolation::new(
			"$.contract_types",
			"At least one contract type is required.",
		));
	}

	validate_bounds("$.hourly_rate", draft.hourly_rate_min, draft.hourly_rate_max)?;
	validate_bounds("$.fixed_budget", draft.fixed_budget_min, draft.fixed_budget_max)?;

	Ok(())
}

/// Re-validates the merged spec before it is cached; identity and paging
/// fields are checked on top of the draft rules.
pub fn validate_spec(spec: &SearchSpec) -> Result<(), SpecViolation> {
	if spec.tenant_id.trim().is_empty() {
		return Err(SpecViolation::new("$.tenant_id", "Tenant id must be non-empty."));
	}
	if spec.profile_version == 0 {
		return Err(SpecViolation::new("$.profile_version", "Profile version starts at 1."));
	}
	if spec.platforms.is_empty() {
		return Err(SpecViolation::new("$.platforms", "At least one platform is required."));
	}
	if spec.page_size == 0 || spec.page_size > MAX_PAGE_SIZE {
		return Err(SpecViolation::new(
			"$.page_size",
			format!("Page size must be in the range 1-{MAX_PAGE_SIZE}."),
		));
	}

	validate_weighted_keywords("$.title_keywords", &spec.title_keywords, MAX_TITLE_KEYWORDS)?;
	validate_weighted_keywords("$.skill_keywords", &spec.skill_keywords, MAX_SKILL_KEYWORDS)?;
	validate_keyword_list("$.negative_keywords", &spec.negative_keywords, MAX_NEGATIVE_KEYWORDS)?;
	validate_keyword_list("$.locations", &spec.locations, MAX_LOCATIONS)?;

	if spec.contract_types.is_empty() {
		return Err(SpecViolation::new(
			"$.contract_types",
			"At least one contract type is required.",
		));
	}

	validate_bounds("$.hourly_rate", spec.hourly_rate_min, spec.hourly_rate_max)?;
	validate_bounds("$.fixed_budget", spec.fixed_budget_min, spec.fixed_budget_max)?;

	Ok(())
}

fn validate_weighted_keywords(
	path: &str,
	keywords: &[WeightedKeyword],
	max_entries: usize,
) -> Result<(), SpecViolation> {
	if keywords.is_empty() {
		return Err(SpecViolation::new(path, "At least one keyword is required."));
	}
	if keywords.len() > max_entries {
		return Err(SpecViolation::new(path, format!("At most {max_entries} entries are allowed.")));
	}

	for (index, entry) in keywords.iter().enumerate() {
		if entry.keyword.trim().is_empty() {
			return Err(SpecViolation::new(
				format!("{path}[{index}].keyword"),
				"Keyword must be non-empty.",
			));
		}
		if !(MIN_KEYWORD_WEIGHT..=MAX_KEYWORD_WEIGHT).contains(&entry.weight) {
			return Err(SpecViolation::new(
				format!("{path}[{index}].weight"),
				format!("Weight must be in the range {MIN_KEYWORD_WEIGHT}-{MAX_KEYWORD_WEIGHT}."),
			));
		}
	}

	Ok(())
}

fn validate_keyword_list(
	path: &str,
	entries: &[String],
	max_entries: usize,
) -> Result<(), SpecViolation> {
	if entries.len() > max_entries {
		return Err(SpecViolation::new(path, format!("At most {max_entries} entries are allowed.")));
	}

	for (index, entry) in entries.iter().enumerate() {
		if entry.trim().is_empty() {
			return Err(SpecViolation::new(
				format!("{path}[{index}]"),
				"Entry must be non-empty.",
			));
		}
	}

	Ok(())
}

fn validate_bounds(
	path: &str,
	min: Option<f32>,
	max: Option<f32>,
) -> Result<(), SpecViolation> {
	for (suffix, value) in [("min", min), ("max", max)] {
		if let Some(value) = value
			&& (!value.is_finite() || value < 0.0)
		{
			return Err(SpecViolation::new(
				format!("{path}_{suffix}"),
				"Bound must be a non-negative finite number.",
			));
		}
	}

	if let (Some(min), Some(max)) = (min, max)
		&& min > max
	{
		return Err(SpecViolation::new(
			format!("{path}_min"),
			"Lower bound must not exceed upper bound.",
		));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn draft() -> DraftSpec {
		DraftSpec {
			title_keywords: vec![WeightedKeyword {
				keyword: "backend engineer".to_string(),
				weight: 9,
			}],
			skill_keywords: vec![WeightedKeyword { keyword: "rust".to_string(), weight: 8 }],
			negative_keywords: vec!["unpaid".to_string()],
			locations: vec!["remote".to_string()],
			seniority_levels: vec![Seniority::Senior],
			remote: RemotePreference::Remote,
			contract_types: vec![ContractType::Contract],
			hourly_rate_min: Some(60.0),
			hourly_rate_max: Some(120.0),
			fixed_budget_min: None,
			fixed_budget_max: None,
		}
	}

	#[test]
	fn accepts_a_well_formed_draft() {
		assert!(validate_draft(&draft()).is_ok());
	}

	#[test]
	fn rejects_out_of_range_weight_with_field_path() {
		let mut bad = draft();

		bad.skill_keywords.push(WeightedKeyword { keyword: "sql".to_string(), weight: 11 });

		let violation = validate_draft(&bad).unwrap_err();

		assert_eq!(violation.field, "$.skill_keywords[1].weight");
	}

	#[test]
	fn rejects_excess_entries() {
		let mut bad = draft();

		bad.title_keywords = (0..11)
			.map(|i| WeightedKeyword { keyword: format!("kw{i}"), weight: 5 })
			.collect();

		assert_eq!(validate_draft(&bad).unwrap_err().field, "$.title_keywords");
	}

	#[test]
	fn rejects_empty_contract_types() {
		let mut bad = draft();

		bad.contract_types.clear();

		assert_eq!(validate_draft(&bad).unwrap_err().field, "$.contract_types");
	}

	#[test]
	fn rejects_inverted_rate_bounds() {
		let mut bad = draft();

		bad.hourly_rate_min = Some(150.0);

		assert_eq!(validate_draft(&bad).unwrap_err().field, "$.hourly_rate_min");
	}

	#[test]
	fn draft_deserializes_from_provider_json() {
		let json = serde_json::json!({
			"title_keywords": [{ "keyword": "data engineer", "weight": 8 }],
			"skill_keywords": [{ "keyword": "python", "weight": 9 }],
			"seniority_levels": ["mid", "senior"],
			"remote": "remote",
			"contract_types": ["contract", "freelance"],
			"hourly_rate_min": 50.0
		});
		let draft: DraftSpec = serde_json::from_value(json).expect("draft should deserialize");

		assert!(validate_draft(&draft).is_ok());
		assert!(draft.negative_keywords.is_empty());
	}
}
