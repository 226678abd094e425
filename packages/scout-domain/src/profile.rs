use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Source record owned by the profile-editing surface. The normalization
/// pipeline treats it as read-only input and never fails on its contents.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RawProfile {
	pub subject_id: Uuid,
	pub tenant_id: String,
	pub profile_version: u32,
	#[serde(default)]
	pub skills: Vec<RawSkill>,
	#[serde(default)]
	pub experiences: Vec<RawExperience>,
	#[serde(default)]
	pub educations: Vec<RawEducation>,
	#[serde(default)]
	pub preferences: Option<RawPreferences>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RawSkill {
	pub name: String,
	pub level: u8,
	#[serde(default)]
	pub years: Option<f32>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RawExperience {
	pub title: String,
	#[serde(default)]
	pub company: String,
	/// Free-text date. `None` or unparseable degrades to a null duration.
	#[serde(default)]
	pub start_date: Option<String>,
	/// `None` marks a current position; duration runs to the reference time.
	#[serde(default)]
	pub end_date: Option<String>,
	#[serde(default)]
	pub highlights: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RawEducation {
	#[serde(default)]
	pub institution: String,
	#[serde(default)]
	pub degree: String,
	#[serde(default)]
	pub field: String,
	#[serde(default)]
	pub start_date: Option<String>,
	#[serde(default)]
	pub end_date: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RawPreferences {
	#[serde(default)]
	pub platforms: Vec<String>,
	#[serde(default)]
	pub hourly_rate_min: Option<f32>,
	#[serde(default)]
	pub hourly_rate_max: Option<f32>,
	#[serde(default = "default_tightness")]
	pub tightness: u8,
	#[serde(default)]
	pub project_types: Vec<String>,
	#[serde(default)]
	pub remote: Option<RemotePreference>,
}

fn default_tightness() -> u8 {
	3
}

/// Calendar month precision is all the duration math needs; day-of-month is
/// parsed and discarded.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct YearMonth {
	pub year: i32,
	pub month: u8,
}
impl YearMonth {
	/// Accepts `YYYY-MM-DD`, `YYYY-MM`, `YYYY/MM`, and bare `YYYY`. Anything
	/// else is `None`; malformed dates are not an error anywhere in the
	/// pipeline.
	pub fn parse(raw: &str) -> Option<Self> {
		let trimmed = raw.trim();

		if trimmed.is_empty() {
			return None;
		}

		let mut parts = trimmed.splitn(3, ['-', '/']);
		let year = parts.next()?.trim().parse::<i32>().ok()?;

		if !(1000..=9999).contains(&year) {
			return None;
		}

		let month = match parts.next() {
			Some(part) => part.trim().parse::<u8>().ok().filter(|month| (1..=12).contains(month))?,
			None => 1,
		};

		Some(Self { year, month })
	}

	pub fn months_until(self, end: Self) -> i32 {
		(end.year - self.year) * 12 + (i32::from(end.month) - i32::from(self.month))
	}
}

#[derive(
	Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Seniority {
	Entry,
	Junior,
	Mid,
	Senior,
	Lead,
	Principal,
}

#[derive(
	Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DegreeLevel {
	None,
	Secondary,
	Associate,
	Bachelor,
	Master,
	Doctorate,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
	FullTime,
	Contract,
	Freelance,
	Any,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemotePreference {
	Remote,
	Hybrid,
	Onsite,
	Flexible,
}

/// Derived, immutable snapshot. Rebuilt whole on every normalization call;
/// `profile_version` must equal the source's version.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct NormalizedProfile {
	pub subject_id: Uuid,
	pub tenant_id: String,
	pub profile_version: u32,
	pub primary_skills: Vec<NormalizedSkill>,
	pub secondary_skills: Vec<NormalizedSkill>,
	pub skill_keywords: Vec<String>,
	pub experiences: Vec<NormalizedExperience>,
	pub total_experience_months: u32,
	pub seniority: Seniority,
	pub title_keywords: Vec<String>,
	pub educations: Vec<NormalizedEducation>,
	pub highest_degree: DegreeLevel,
	pub preferences: NormalizedPreferences,
	#[serde(with = "crate::time_serde")]
	pub generated_at: OffsetDateTime,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct NormalizedSkill {
	pub id: String,
	pub display: String,
	pub level: u8,
	pub years: Option<f32>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct NormalizedExperience {
	pub title: String,
	pub company: Option<String>,
	pub start_date: Option<YearMonth>,
	pub end_date: Option<YearMonth>,
	pub duration_months: Option<u32>,
	pub highlights: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct NormalizedEducation {
	pub institution: Option<String>,
	pub degree: Option<String>,
	pub field: Option<String>,
	pub graduation_year: Option<i32>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct NormalizedPreferences {
	pub platforms: Vec<String>,
	pub hourly_rate_min: Option<f32>,
	pub hourly_rate_max: Option<f32>,
	pub tightness: u8,
	pub remote: RemotePreference,
	pub contract_type: ContractType,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_full_dates() {
		assert_eq!(YearMonth::parse("2021-05-01"), Some(YearMonth { year: 2021, month: 5 }));
		assert_eq!(YearMonth::parse("2021-05"), Some(YearMonth { year: 2021, month: 5 }));
		assert_eq!(YearMonth::parse("2021/05"), Some(YearMonth { year: 2021, month: 5 }));
		assert_eq!(YearMonth::parse(" 2021 "), Some(YearMonth { year: 2021, month: 1 }));
	}

	#[test]
	fn rejects_malformed_dates() {
		assert_eq!(YearMonth::parse(""), None);
		assert_eq!(YearMonth::parse("soon"), None);
		assert_eq!(YearMonth::parse("2021-13"), None);
		assert_eq!(YearMonth::parse("2021-"), None);
		assert_eq!(YearMonth::parse("99-05"), None);
	}

	#[test]
	fn month_arithmetic_crosses_years() {
		let start = YearMonth { year: 2020, month: 11 };
		let end = YearMonth { year: 2021, month: 2 };

		assert_eq!(start.months_until(end), 3);
		assert_eq!(end.months_until(start), -3);
	}

	#[test]
	fn degree_levels_order_by_rank() {
		assert!(DegreeLevel::Doctorate > DegreeLevel::Master);
		assert!(DegreeLevel::Master > DegreeLevel::Bachelor);
		assert!(DegreeLevel::Secondary > DegreeLevel::None);
	}
}
