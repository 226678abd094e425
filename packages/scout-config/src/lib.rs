mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Cache, Config, Generator, Postgres, Providers, ReasoningProviderConfig, Service};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.providers.reasoning.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.reasoning.api_key must be non-empty.".to_string(),
		});
	}
	if cfg.providers.reasoning.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.reasoning.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if !cfg.providers.reasoning.temperature.is_finite()
		|| !(0.0..=2.0).contains(&cfg.providers.reasoning.temperature)
	{
		return Err(Error::Validation {
			message: "providers.reasoning.temperature must be in the range 0.0-2.0.".to_string(),
		});
	}

	match cfg.cache.backend.as_str() {
		"memory" => {},
		"postgres" => {
			let Some(postgres) = cfg.cache.postgres.as_ref() else {
				return Err(Error::Validation {
					message: "cache.postgres is required when cache.backend is postgres."
						.to_string(),
				});
			};

			if postgres.dsn.trim().is_empty() {
				return Err(Error::Validation {
					message: "cache.postgres.dsn must be non-empty.".to_string(),
				});
			}
			if postgres.pool_max_conns == 0 {
				return Err(Error::Validation {
					message: "cache.postgres.pool_max_conns must be greater than zero."
						.to_string(),
				});
			}
		},
		_ => {
			return Err(Error::Validation {
				message: "cache.backend must be one of memory or postgres.".to_string(),
			});
		},
	}

	if let Some(ttl) = cfg.cache.ttl_seconds
		&& ttl == 0
	{
		return Err(Error::Validation {
			message: "cache.ttl_seconds must be greater than zero.".to_string(),
		});
	}

	if cfg.generator.max_retries > 10 {
		return Err(Error::Validation {
			message: "generator.max_retries must be 10 or less.".to_string(),
		});
	}
	if cfg.generator.backoff_base_ms == 0 {
		return Err(Error::Validation {
			message: "generator.backoff_base_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.generator.page_size == 0 || cfg.generator.page_size > 100 {
		return Err(Error::Validation {
			message: "generator.page_size must be in the range 1-100.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg
		.cache
		.postgres
		.as_ref()
		.map(|postgres| postgres.dsn.trim().is_empty() && cfg.cache.backend != "postgres")
		.unwrap_or(false)
	{
		cfg.cache.postgres = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn base_toml() -> String {
		r#"
[service]
log_level = "info"

[providers.reasoning]
provider_id = "openai"
api_base    = "http://localhost"
api_key     = "key"
path        = "/v1/chat/completions"
model       = "m"
temperature = 0.2
timeout_ms  = 1000

[cache]
backend = "memory"

[generator]
"#
		.to_string()
	}

	#[test]
	fn loads_defaults_for_generator() {
		let cfg: Config = toml::from_str(&base_toml()).expect("config parses");

		assert_eq!(cfg.generator.max_retries, 2);
		assert_eq!(cfg.generator.backoff_base_ms, 250);
		assert_eq!(cfg.generator.page_size, 50);
		assert!(validate(&cfg).is_ok());
	}

	#[test]
	fn rejects_unknown_cache_backend() {
		let raw = base_toml().replace("backend = \"memory\"", "backend = \"redis\"");
		let cfg: Config = toml::from_str(&raw).expect("config parses");

		assert!(validate(&cfg).is_err());
	}

	#[test]
	fn postgres_backend_requires_dsn() {
		let raw = base_toml().replace("backend = \"memory\"", "backend = \"postgres\"");
		let cfg: Config = toml::from_str(&raw).expect("config parses");

		assert!(validate(&cfg).is_err());
	}

	#[test]
	fn rejects_zero_ttl() {
		let raw =
			base_toml().replace("backend = \"memory\"", "backend = \"memory\"\nttl_seconds = 0");
		let cfg: Config = toml::from_str(&raw).expect("config parses");

		assert!(validate(&cfg).is_err());
	}
}
