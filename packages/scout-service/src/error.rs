pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Schema violation at {field}: {message}")]
	SchemaViolation { field: String, message: String },
	#[error("Reasoning provider failed after {attempts} attempts: {message}")]
	Provider { attempts: u32, message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<scout_store::Error> for Error {
	fn from(err: scout_store::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<scout_domain::spec::SpecViolation> for Error {
	fn from(violation: scout_domain::spec::SpecViolation) -> Self {
		Self::SchemaViolation { field: violation.field, message: violation.message }
	}
}
