use std::{fs, path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use color_eyre::eyre;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use scout_domain::{normalize, profile::RawProfile};
use scout_service::SpecService;
use scout_store::{SpecStore, memory::MemoryStore, postgres::PostgresStore};

#[derive(Debug, Parser)]
#[command(version, rename_all = "kebab")]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Normalizes a raw profile JSON file and prints the result.
	Normalize {
		#[arg(value_name = "PROFILE")]
		profile: PathBuf,
	},
	/// Normalizes a raw profile, then generates (or serves from cache) its
	/// search spec.
	Generate {
		#[arg(value_name = "PROFILE")]
		profile: PathBuf,
	},
	/// Reports whether a spec is cached for the given subject and version.
	Has {
		#[arg(value_name = "SUBJECT_ID")]
		subject_id: Uuid,
		#[arg(value_name = "PROFILE_VERSION")]
		profile_version: u32,
	},
	/// Drops the cached spec for the given subject and version.
	Invalidate {
		#[arg(value_name = "SUBJECT_ID")]
		subject_id: Uuid,
		#[arg(value_name = "PROFILE_VERSION")]
		profile_version: u32,
	},
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = scout_config::load(&args.config)?;

	init_tracing(&config);

	match args.command {
		Command::Normalize { profile } => {
			let raw = read_profile(&profile)?;
			let normalized = normalize::normalize_profile(&raw);

			println!("{}", serde_json::to_string_pretty(&normalized)?);
		},
		Command::Generate { profile } => {
			let raw = read_profile(&profile)?;
			let normalized = normalize::normalize_profile(&raw);
			let service = build_service(config).await?;
			let response = service.generate(&normalized).await?;

			println!("{}", serde_json::to_string_pretty(&response)?);
		},
		Command::Has { subject_id, profile_version } => {
			let service = build_service(config).await?;
			let cached = service.has_spec(subject_id, profile_version).await?;

			println!("{cached}");
		},
		Command::Invalidate { subject_id, profile_version } => {
			let service = build_service(config).await?;

			service.invalidate_spec(subject_id, profile_version).await?;
		},
	}

	Ok(())
}

fn init_tracing(config: &scout_config::Config) {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn read_profile(path: &PathBuf) -> color_eyre::Result<RawProfile> {
	let raw = fs::read_to_string(path)?;

	Ok(serde_json::from_str(&raw)?)
}

async fn build_service(config: scout_config::Config) -> color_eyre::Result<SpecService> {
	let store: Arc<dyn SpecStore> = match config.cache.backend.as_str() {
		"memory" => Arc::new(MemoryStore::new()),
		"postgres" => {
			let Some(pg) = config.cache.postgres.as_ref() else {
				return Err(eyre::eyre!("The postgres backend requires a [cache.postgres] table."));
			};
			let store = PostgresStore::connect(pg).await?;

			store.ensure_schema().await?;

			Arc::new(store)
		},
		other => return Err(eyre::eyre!("Unknown cache backend {other:?}.")),
	};

	tracing::info!(backend = %config.cache.backend, "Cache backend ready.");

	Ok(SpecService::new(config, store))
}

#[cfg(test)]
mod tests {
	use super::*;
	use scout_testkit::test_config;
	use uuid::Uuid;

	#[tokio::test]
	async fn memory_backend_builds_a_working_service() {
		let service = build_service(test_config()).await.expect("service builds");
		let cached =
			service.has_spec(Uuid::from_u128(1), 1).await.expect("has succeeds");

		assert!(!cached);
	}

	#[tokio::test]
	async fn unknown_backend_is_rejected() {
		let mut config = test_config();

		config.cache.backend = "redis".to_string();

		assert!(build_service(config).await.is_err());
	}
}
