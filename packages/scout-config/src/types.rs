use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub providers: Providers,
	pub cache: Cache,
	pub generator: Generator,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub reasoning: ReasoningProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct ReasoningProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Cache {
	pub backend: String,
	#[serde(default)]
	pub ttl_seconds: Option<u64>,
	#[serde(default)]
	pub postgres: Option<Postgres>,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Generator {
	/// Retries after the initial attempt; total attempts are `max_retries + 1`.
	#[serde(default = "default_max_retries")]
	pub max_retries: u32,
	#[serde(default = "default_backoff_base_ms")]
	pub backoff_base_ms: u64,
	#[serde(default = "default_page_size")]
	pub page_size: u32,
}

fn default_max_retries() -> u32 {
	2
}

fn default_backoff_base_ms() -> u64 {
	250
}

fn default_page_size() -> u32 {
	50
}
