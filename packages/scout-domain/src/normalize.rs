use std::{cmp::Ordering, collections::HashMap, sync::OnceLock};

use regex::Regex;
use time::OffsetDateTime;

use crate::{
	profile::{
		ContractType, DegreeLevel, NormalizedEducation, NormalizedExperience, NormalizedPreferences,
		NormalizedProfile, NormalizedSkill, RawEducation, RawExperience, RawPreferences, RawProfile,
		RawSkill, RemotePreference, YearMonth,
	},
	seniority, skills,
};

pub const PRIMARY_SKILL_CAP: usize = 10;
pub const HIGHLIGHTS_PER_EXPERIENCE_CAP: usize = 10;
pub const MIN_HIGHLIGHT_CHARS: usize = 6;

pub const DEFAULT_PLATFORMS: &[&str] = &["freelancer", "upwork"];
pub const DEFAULT_TIGHTNESS: u8 = 3;

/// Ranked high to low; the first tier whose keyword appears in the normalized
/// degree text wins. Matching is a loose substring check, so a degree string
/// containing another tier's keyword (e.g. "ma" inside "mathematics") can
/// outrank the intended tier. Kept as-is.
const DEGREE_TIERS: &[(DegreeLevel, &[&str])] = &[
	(DegreeLevel::Doctorate, &["phd", "ph d", "doctor", "dphil", "edd"]),
	(DegreeLevel::Master, &["master", "msc", "mba", "meng", "ma"]),
	(DegreeLevel::Bachelor, &["bachelor", "bsc", "beng", "btech", "ba"]),
	(DegreeLevel::Associate, &["associate", "aas"]),
	(DegreeLevel::Secondary, &["high school", "secondary", "diploma", "ged"]),
];

/// Pure transformation; uses the real clock for the reference time and the
/// generation timestamp.
pub fn normalize_profile(raw: &RawProfile) -> NormalizedProfile {
	let now = OffsetDateTime::now_utc();
	let reference = YearMonth { year: now.year(), month: u8::from(now.month()) };

	normalize_profile_at(raw, reference, now)
}

/// Fully deterministic variant: the reference time closes open-ended
/// experiences and `generated_at` stamps the snapshot. Reordering any input
/// collection does not change the output.
pub fn normalize_profile_at(
	raw: &RawProfile,
	reference: YearMonth,
	generated_at: OffsetDateTime,
) -> NormalizedProfile {
	let (primary_skills, secondary_skills, skill_keywords) = normalize_skills(&raw.skills);
	let experiences = normalize_experiences(&raw.experiences, reference);
	let total_experience_months =
		experiences.iter().filter_map(|entry| entry.duration_months).sum::<u32>();
	let seniority = seniority::classify(i64::from(total_experience_months));
	let title_keywords = title_keywords(&raw.experiences);
	let (educations, highest_degree) = normalize_educations(&raw.educations);
	let preferences = normalize_preferences(raw.preferences.as_ref());

	NormalizedProfile {
		subject_id: raw.subject_id,
		tenant_id: raw.tenant_id.clone(),
		profile_version: raw.profile_version,
		primary_skills,
		secondary_skills,
		skill_keywords,
		experiences,
		total_experience_months,
		seniority,
		title_keywords,
		educations,
		highest_degree,
		preferences,
		generated_at,
	}
}

fn normalize_skills(
	raw: &[RawSkill],
) -> (Vec<NormalizedSkill>, Vec<NormalizedSkill>, Vec<String>) {
	let mut by_id: HashMap<String, NormalizedSkill> = HashMap::new();

	for skill in raw {
		let id = skills::to_canonical(&skill.name);

		if id.is_empty() {
			continue;
		}

		let candidate = NormalizedSkill {
			display: skills::display_name(&id),
			id: id.clone(),
			level: skill.level.clamp(1, 5),
			years: skill.years.filter(|years| years.is_finite() && *years >= 0.0),
		};

		match by_id.get(&id) {
			Some(existing) if !beats(&candidate, existing) => {},
			_ => {
				by_id.insert(id, candidate);
			},
		}
	}

	let mut sorted: Vec<NormalizedSkill> = by_id.into_values().collect();

	sorted.sort_by(|a, b| {
		b.level
			.cmp(&a.level)
			.then_with(|| cmp_years_desc(a.years, b.years))
			.then_with(|| a.id.cmp(&b.id))
	});

	let keywords = sorted.iter().map(|skill| skill.id.clone()).collect();
	let split = sorted.len().min(PRIMARY_SKILL_CAP);
	let secondary = sorted.split_off(split);

	(sorted, secondary, keywords)
}

/// Dedup rule: higher proficiency wins, ties broken by more years. Known
/// years beats unknown years.
fn beats(candidate: &NormalizedSkill, existing: &NormalizedSkill) -> bool {
	if candidate.level != existing.level {
		return candidate.level > existing.level;
	}

	match (candidate.years, existing.years) {
		(Some(a), Some(b)) => a > b,
		(Some(_), None) => true,
		_ => false,
	}
}

fn cmp_years_desc(a: Option<f32>, b: Option<f32>) -> Ordering {
	match (a, b) {
		(Some(a), Some(b)) => b.total_cmp(&a),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	}
}

fn normalize_experiences(
	raw: &[RawExperience],
	reference: YearMonth,
) -> Vec<NormalizedExperience> {
	let mut out: Vec<NormalizedExperience> = raw
		.iter()
		.map(|entry| {
			let start_date = entry.start_date.as_deref().and_then(YearMonth::parse);
			let end_date = entry.end_date.as_deref().and_then(YearMonth::parse);

			NormalizedExperience {
				title: entry.title.trim().to_string(),
				company: trim_to_none(&entry.company),
				start_date,
				end_date,
				duration_months: duration_months(
					start_date,
					entry.end_date.as_deref(),
					reference,
				),
				highlights: split_highlights(&entry.highlights),
			}
		})
		.collect();

	out.sort_by(|a, b| match (a.start_date, b.start_date) {
		(Some(a_start), Some(b_start)) =>
			b_start.cmp(&a_start).then_with(|| a.title.cmp(&b.title)),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => a.title.cmp(&b.title),
	});

	out
}

/// `(end.year - start.year) * 12 + (end.month - start.month)`, with the
/// reference time standing in for a null end date. Valid durations floor to
/// one month; a missing or unparseable start, an unparseable end, or an end
/// before the start all degrade to `None`.
fn duration_months(
	start: Option<YearMonth>,
	raw_end: Option<&str>,
	reference: YearMonth,
) -> Option<u32> {
	let start = start?;
	let end = match raw_end {
		Some(raw) => YearMonth::parse(raw)?,
		None => reference,
	};
	let months = start.months_until(end);

	if months < 0 {
		return None;
	}

	Some(months.max(1) as u32)
}

fn highlight_splitter() -> &'static Regex {
	static SPLITTER: OnceLock<Regex> = OnceLock::new();

	SPLITTER.get_or_init(|| {
		Regex::new(r"\r?\n|[\u{2022}\u{25CF}\u{00B7}]|\.\s+")
			.expect("highlight splitter pattern is valid")
	})
}

/// Splits free-text highlights on newlines, bullet markers, and
/// sentence-ending periods. Fragments are trimmed of bullet prefixes and a
/// single trailing period; anything under six characters is dropped.
pub fn split_highlights(text: &str) -> Vec<String> {
	highlight_splitter()
		.split(text)
		.filter_map(|fragment| {
			let trimmed =
				fragment.trim().trim_start_matches(['-', '*', '>']).trim();
			let stripped = trimmed.strip_suffix('.').unwrap_or(trimmed).trim_end();

			(stripped.chars().count() >= MIN_HIGHLIGHT_CHARS).then(|| stripped.to_string())
		})
		.take(HIGHLIGHTS_PER_EXPERIENCE_CAP)
		.collect()
}

fn title_keywords(raw: &[RawExperience]) -> Vec<String> {
	let mut keywords: Vec<String> = raw
		.iter()
		.filter_map(|entry| {
			let normalized = normalize_keyword(&entry.title);

			(!normalized.is_empty()).then_some(normalized)
		})
		.collect();

	keywords.sort();
	keywords.dedup();

	keywords
}

/// Lowercases and strips punctuation, with separators collapsing to a single
/// space.
pub fn normalize_keyword(raw: &str) -> String {
	let lowered = raw.trim().to_lowercase();
	let mut out = String::with_capacity(lowered.len());

	for ch in lowered.chars() {
		if ch.is_alphanumeric() {
			out.push(ch);
		} else if (ch.is_whitespace() || matches!(ch, '-' | '/' | '_')) && !out.ends_with(' ') {
			out.push(' ');
		}
	}

	out.trim().to_string()
}

fn normalize_educations(raw: &[RawEducation]) -> (Vec<NormalizedEducation>, DegreeLevel) {
	let mut out: Vec<NormalizedEducation> = raw
		.iter()
		.map(|entry| NormalizedEducation {
			institution: trim_to_none(&entry.institution),
			degree: trim_to_none(&entry.degree),
			field: trim_to_none(&entry.field),
			graduation_year: entry
				.end_date
				.as_deref()
				.and_then(YearMonth::parse)
				.map(|date| date.year),
		})
		.collect();

	out.sort_by(|a, b| match (a.graduation_year, b.graduation_year) {
		(Some(a_year), Some(b_year)) =>
			b_year.cmp(&a_year).then_with(|| a.institution.cmp(&b.institution)),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => a.institution.cmp(&b.institution),
	});

	let highest = out
		.iter()
		.filter_map(|entry| entry.degree.as_deref().map(degree_level))
		.max()
		.unwrap_or(DegreeLevel::None);

	(out, highest)
}

pub fn degree_level(degree: &str) -> DegreeLevel {
	let normalized = normalize_keyword(degree);

	for (level, needles) in DEGREE_TIERS {
		if needles.iter().any(|needle| normalized.contains(needle)) {
			return *level;
		}
	}

	DegreeLevel::None
}

fn normalize_preferences(raw: Option<&RawPreferences>) -> NormalizedPreferences {
	let Some(raw) = raw else {
		return NormalizedPreferences {
			platforms: default_platforms(),
			hourly_rate_min: None,
			hourly_rate_max: None,
			tightness: DEFAULT_TIGHTNESS,
			remote: RemotePreference::Flexible,
			contract_type: ContractType::Any,
		};
	};
	let mut platforms: Vec<String> = raw
		.platforms
		.iter()
		.map(|platform| platform.trim().to_lowercase())
		.filter(|platform| !platform.is_empty())
		.collect();

	platforms.sort();
	platforms.dedup();

	if platforms.is_empty() {
		platforms = default_platforms();
	}

	NormalizedPreferences {
		platforms,
		hourly_rate_min: raw.hourly_rate_min.filter(|rate| rate.is_finite() && *rate >= 0.0),
		hourly_rate_max: raw.hourly_rate_max.filter(|rate| rate.is_finite() && *rate >= 0.0),
		tightness: raw.tightness.clamp(1, 5),
		remote: raw.remote.unwrap_or(RemotePreference::Flexible),
		contract_type: contract_type_for(&raw.project_types),
	}
}

fn default_platforms() -> Vec<String> {
	DEFAULT_PLATFORMS.iter().map(|platform| (*platform).to_string()).collect()
}

/// Fixed precedence: full-time beats long-term beats short/medium-term.
fn contract_type_for(project_types: &[String]) -> ContractType {
	let tags: Vec<String> = project_types.iter().map(|tag| normalize_keyword(tag)).collect();
	let has = |needle: &str| tags.iter().any(|tag| tag == needle);

	if has("full time") {
		ContractType::FullTime
	} else if has("long term") {
		ContractType::Contract
	} else if has("short term") || has("medium term") {
		ContractType::Freelance
	} else {
		ContractType::Any
	}
}

fn trim_to_none(raw: &str) -> Option<String> {
	let trimmed = raw.trim();

	(!trimmed.is_empty()).then(|| trimmed.to_string())
}
