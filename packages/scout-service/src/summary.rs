//! Builds the bounded profile summary handed to the reasoning capability.
//! Only derived, non-identifying fields go over the wire; the subject and
//! tenant ids stay local and are merged back in after the draft returns.

use serde_json::{Value, json};

use scout_domain::profile::{NormalizedExperience, NormalizedProfile, NormalizedSkill};

pub const SECONDARY_SKILL_SAMPLE: usize = 5;
pub const EXPERIENCE_SAMPLE: usize = 3;
pub const HIGHLIGHT_SAMPLE: usize = 3;

const INSTRUCTION: &str = "\
You turn a freelancer's normalized profile into a job-search specification.

Respond with a single JSON object and nothing else. Required fields:
- \"title_keywords\": 1-10 objects { \"keyword\": string, \"weight\": 1-10 }.
- \"skill_keywords\": 1-20 objects { \"keyword\": string, \"weight\": 1-10 }.
- \"seniority_levels\": non-empty array drawn from
  [\"entry\", \"junior\", \"mid\", \"senior\", \"lead\", \"principal\"].
- \"remote\": one of \"remote\", \"hybrid\", \"onsite\", \"flexible\".
- \"contract_types\": non-empty array drawn from
  [\"full_time\", \"contract\", \"freelance\", \"any\"].

Optional fields:
- \"negative_keywords\": up to 10 strings for work to exclude.
- \"locations\": up to 5 strings.
- \"hourly_rate_min\", \"hourly_rate_max\", \"fixed_budget_min\",
  \"fixed_budget_max\": non-negative numbers with min <= max.

Weight keywords by how central they are to the profile. Respect the stated
rate preferences when present and do not invent ones that are absent.";

pub fn build_messages(profile: &NormalizedProfile) -> Vec<Value> {
	vec![
		json!({ "role": "system", "content": INSTRUCTION }),
		json!({ "role": "user", "content": profile_summary(profile).to_string() }),
	]
}

/// The summary is intentionally lossy: top skills, the most recent
/// experiences, and the preference envelope. Enough signal to draft a spec,
/// small enough to stay within a prompt budget for any profile size.
pub fn profile_summary(profile: &NormalizedProfile) -> Value {
	json!({
		"primary_skills": profile.primary_skills.iter().map(skill_summary).collect::<Vec<_>>(),
		"secondary_skills": profile
			.secondary_skills
			.iter()
			.take(SECONDARY_SKILL_SAMPLE)
			.map(skill_summary)
			.collect::<Vec<_>>(),
		"recent_experiences": profile
			.experiences
			.iter()
			.take(EXPERIENCE_SAMPLE)
			.map(experience_summary)
			.collect::<Vec<_>>(),
		"title_keywords": profile.title_keywords,
		"total_experience_months": profile.total_experience_months,
		"seniority": profile.seniority,
		"highest_degree": profile.highest_degree,
		"preferences": {
			"hourly_rate_min": profile.preferences.hourly_rate_min,
			"hourly_rate_max": profile.preferences.hourly_rate_max,
			"remote": profile.preferences.remote,
			"contract_type": profile.preferences.contract_type,
		},
	})
}

fn skill_summary(skill: &NormalizedSkill) -> Value {
	json!({ "name": skill.display, "level": skill.level, "years": skill.years })
}

fn experience_summary(experience: &NormalizedExperience) -> Value {
	json!({
		"title": experience.title,
		"duration_months": experience.duration_months,
		"highlights": experience.highlights.iter().take(HIGHLIGHT_SAMPLE).collect::<Vec<_>>(),
	})
}
