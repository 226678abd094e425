pub fn render_schema() -> String {
	"\
CREATE TABLE IF NOT EXISTS search_specs (
	cache_key TEXT PRIMARY KEY,
	subject_id UUID NOT NULL,
	profile_version BIGINT NOT NULL,
	spec JSONB NOT NULL,
	expires_at TIMESTAMPTZ,
	created_at TIMESTAMPTZ NOT NULL,
	updated_at TIMESTAMPTZ NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_search_specs_subject ON search_specs (subject_id, profile_version)"
		.to_string()
}
