#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Failed to encode spec for storage: {0}")]
	Encode(#[source] serde_json::Error),
	#[error("Failed to decode stored spec: {0}")]
	Decode(#[source] serde_json::Error),
}
