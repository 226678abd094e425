use crate::profile::Seniority;

/// Ordered half-open intervals `[min, max)` over total experience months.
/// Contiguous and jointly exhaustive; the last interval is unbounded.
const TIERS: &[(u32, Option<u32>, Seniority)] = &[
	(0, Some(24), Seniority::Entry),
	(24, Some(48), Seniority::Junior),
	(48, Some(72), Seniority::Mid),
	(72, Some(120), Seniority::Senior),
	(120, Some(180), Seniority::Lead),
	(180, None, Seniority::Principal),
];

/// Total function: every input maps to exactly one tier. Negative input
/// clamps to zero months.
pub fn classify(total_months: i64) -> Seniority {
	let months = total_months.max(0).min(i64::from(u32::MAX)) as u32;

	TIERS
		.iter()
		.find(|(min, max, _)| months >= *min && max.map(|max| months < max).unwrap_or(true))
		.map(|(_, _, tier)| *tier)
		.unwrap_or(Seniority::Principal)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn boundary_months_fall_in_expected_tiers() {
		assert_eq!(classify(0), Seniority::Entry);
		assert_eq!(classify(23), Seniority::Entry);
		assert_eq!(classify(24), Seniority::Junior);
		assert_eq!(classify(47), Seniority::Junior);
		assert_eq!(classify(48), Seniority::Mid);
		assert_eq!(classify(71), Seniority::Mid);
		assert_eq!(classify(72), Seniority::Senior);
		assert_eq!(classify(119), Seniority::Senior);
		assert_eq!(classify(120), Seniority::Lead);
		assert_eq!(classify(179), Seniority::Lead);
		assert_eq!(classify(180), Seniority::Principal);
		assert_eq!(classify(600), Seniority::Principal);
	}

	#[test]
	fn negative_input_clamps_to_zero() {
		assert_eq!(classify(-1), Seniority::Entry);
		assert_eq!(classify(i64::MIN), Seniority::Entry);
	}

	#[test]
	fn tiers_are_contiguous_and_exhaustive() {
		let mut expected_min = 0;

		for (min, max, _) in TIERS {
			assert_eq!(*min, expected_min);

			match max {
				Some(max) => {
					assert!(*max > *min);

					expected_min = *max;
				},
				None => {},
			}
		}

		assert!(TIERS.last().map(|(_, max, _)| max.is_none()).unwrap_or(false));
	}
}
