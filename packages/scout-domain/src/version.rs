use serde::{Deserialize, Serialize};

/// Outcome of comparing a derived artifact's recorded profile version against
/// the subject's current version.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Staleness {
	pub is_stale: bool,
	pub version_gap: u32,
	pub reason: String,
}

/// Stale iff the data version is behind the current version; the gap is only
/// reported when stale.
pub fn check_staleness(data_version: u32, current_version: u32) -> Staleness {
	if data_version < current_version {
		Staleness {
			is_stale: true,
			version_gap: current_version - data_version,
			reason: format!(
				"Data version {data_version} is behind current version {current_version}."
			),
		}
	} else {
		Staleness { is_stale: false, version_gap: 0, reason: "Data is current.".to_string() }
	}
}

pub fn is_stale(data_version: u32, current_version: u32) -> bool {
	data_version < current_version
}

pub fn is_fresh(data_version: u32, current_version: u32) -> bool {
	!is_stale(data_version, current_version)
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum VersionError {
	#[error("Version cannot decrease from {old} to {new}.")]
	Decrement { old: u32, new: u32 },
	#[error("Version {version} did not change; updates must increment.")]
	NoOp { version: u32 },
	#[error("Version must increment by exactly 1; got {old} to {new}.")]
	Gap { old: u32, new: u32 },
}

/// Accepts exactly `old + 1`; decrements, repeats, and gaps are rejected with
/// distinct reasons, never clamped.
pub fn validate_version_update(old: u32, new: u32) -> Result<(), VersionError> {
	if new < old {
		return Err(VersionError::Decrement { old, new });
	}
	if new == old {
		return Err(VersionError::NoOp { version: old });
	}
	if new != old + 1 {
		return Err(VersionError::Gap { old, new });
	}

	Ok(())
}

pub fn next_version(version: u32) -> u32 {
	version + 1
}
