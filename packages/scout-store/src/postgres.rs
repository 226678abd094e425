use sqlx::{PgPool, Row, postgres::PgPoolOptions};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{BoxFuture, Error, Result, SpecStore, schema, spec_cache_key};
use scout_domain::spec::SearchSpec;

/// Production backend: one row per cache key, the spec stored whole as JSONB.
/// The upsert replaces the row atomically, which is what makes equal-value
/// re-writes idempotent.
#[derive(Clone)]
pub struct PostgresStore {
	pub pool: PgPool,
}
impl PostgresStore {
	pub async fn connect(cfg: &scout_config::Postgres) -> Result<Self> {
		let pool =
			PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect(&cfg.dsn).await?;

		Ok(Self { pool })
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		let sql = schema::render_schema();
		let mut tx = self.pool.begin().await?;

		for statement in sql.split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}

	async fn fetch(
		&self,
		subject_id: Uuid,
		profile_version: u32,
	) -> Result<Option<SearchSpec>> {
		let key = spec_cache_key(subject_id, profile_version);
		let now = OffsetDateTime::now_utc();
		let row = sqlx::query(
			"\
SELECT spec
FROM search_specs
WHERE cache_key = $1 AND (expires_at IS NULL OR expires_at > $2)",
		)
		.bind(&key)
		.bind(now)
		.fetch_optional(&self.pool)
		.await?;

		let Some(row) = row else {
			return Ok(None);
		};
		let value: serde_json::Value = row.try_get("spec")?;
		let spec = serde_json::from_value(value).map_err(Error::Decode)?;

		Ok(Some(spec))
	}
}
impl SpecStore for PostgresStore {
	fn get<'a>(
		&'a self,
		subject_id: Uuid,
		profile_version: u32,
	) -> BoxFuture<'a, Result<Option<SearchSpec>>> {
		Box::pin(self.fetch(subject_id, profile_version))
	}

	fn set<'a>(
		&'a self,
		spec: &'a SearchSpec,
		ttl_seconds: Option<u64>,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let key = spec_cache_key(spec.subject_id, spec.profile_version);
			let now = OffsetDateTime::now_utc();
			let expires_at = ttl_seconds
				.map(|ttl| now + Duration::seconds(ttl.min(i64::MAX as u64) as i64));
			let value = serde_json::to_value(spec).map_err(Error::Encode)?;

			sqlx::query(
				"\
INSERT INTO search_specs (
	cache_key,
	subject_id,
	profile_version,
	spec,
	expires_at,
	created_at,
	updated_at
)
VALUES ($1,$2,$3,$4,$5,$6,$6)
ON CONFLICT (cache_key) DO UPDATE SET
	spec = EXCLUDED.spec,
	expires_at = EXCLUDED.expires_at,
	updated_at = EXCLUDED.updated_at",
			)
			.bind(&key)
			.bind(spec.subject_id)
			.bind(i64::from(spec.profile_version))
			.bind(value)
			.bind(expires_at)
			.bind(now)
			.execute(&self.pool)
			.await?;

			Ok(())
		})
	}

	fn has<'a>(&'a self, subject_id: Uuid, profile_version: u32) -> BoxFuture<'a, Result<bool>> {
		Box::pin(async move {
			let key = spec_cache_key(subject_id, profile_version);
			let now = OffsetDateTime::now_utc();
			let row = sqlx::query(
				"\
SELECT 1 AS one
FROM search_specs
WHERE cache_key = $1 AND (expires_at IS NULL OR expires_at > $2)",
			)
			.bind(&key)
			.bind(now)
			.fetch_optional(&self.pool)
			.await?;

			Ok(row.is_some())
		})
	}

	fn invalidate<'a>(
		&'a self,
		subject_id: Uuid,
		profile_version: u32,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let key = spec_cache_key(subject_id, profile_version);

			sqlx::query("DELETE FROM search_specs WHERE cache_key = $1")
				.bind(&key)
				.execute(&self.pool)
				.await?;

			Ok(())
		})
	}
}
