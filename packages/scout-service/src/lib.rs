pub mod generate;
pub mod summary;

mod error;

pub use error::{Error, Result};
pub use generate::GenerateResponse;

use std::{sync::Arc, time::Duration};

use serde_json::Value;

use scout_config::{Config, ReasoningProviderConfig};
use scout_providers::reasoning;
use scout_store::{BoxFuture, SpecStore};

/// One call to the external reasoning capability. The service owns the retry
/// policy; implementations make exactly one attempt per invocation.
pub trait ReasoningProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a ReasoningProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, scout_providers::Result<Value>>;
}

/// Injectable sleep so retry backoff is observable in tests without waiting
/// wall-clock time.
pub trait Delay
where
	Self: Send + Sync,
{
	fn sleep<'a>(&'a self, duration: Duration) -> BoxFuture<'a, ()>;
}

struct HttpReasoning;
impl ReasoningProvider for HttpReasoning {
	fn complete<'a>(
		&'a self,
		cfg: &'a ReasoningProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, scout_providers::Result<Value>> {
		Box::pin(reasoning::complete(cfg, messages))
	}
}

struct TokioDelay;
impl Delay for TokioDelay {
	fn sleep<'a>(&'a self, duration: Duration) -> BoxFuture<'a, ()> {
		Box::pin(tokio::time::sleep(duration))
	}
}

#[derive(Clone)]
pub struct Providers {
	pub reasoning: Arc<dyn ReasoningProvider>,
}
impl Default for Providers {
	fn default() -> Self {
		Self { reasoning: Arc::new(HttpReasoning) }
	}
}

pub struct SpecService {
	pub cfg: Config,
	pub store: Arc<dyn SpecStore>,
	pub providers: Providers,
	pub delay: Arc<dyn Delay>,
}
impl SpecService {
	pub fn new(cfg: Config, store: Arc<dyn SpecStore>) -> Self {
		Self { cfg, store, providers: Providers::default(), delay: Arc::new(TokioDelay) }
	}

	pub fn with_providers(cfg: Config, store: Arc<dyn SpecStore>, providers: Providers) -> Self {
		Self { cfg, store, providers, delay: Arc::new(TokioDelay) }
	}

	pub fn with_delay(mut self, delay: Arc<dyn Delay>) -> Self {
		self.delay = delay;

		self
	}

	pub async fn has_spec(&self, subject_id: uuid::Uuid, profile_version: u32) -> Result<bool> {
		Ok(self.store.has(subject_id, profile_version).await?)
	}

	pub async fn invalidate_spec(
		&self,
		subject_id: uuid::Uuid,
		profile_version: u32,
	) -> Result<()> {
		tracing::info!(
			subject_id = %subject_id,
			profile_version,
			"Invalidating cached spec."
		);

		Ok(self.store.invalidate(subject_id, profile_version).await?)
	}
}
