use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// One chat-completions call against the configured reasoning provider. The
/// caller owns the retry policy; this function makes exactly one attempt.
pub async fn complete(
	cfg: &scout_config::ReasoningProviderConfig,
	messages: &[Value],
) -> Result<Value> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"response_format": { "type": "json_object" },
		"messages": messages,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_completion_json(json)
}

/// Chat-completions responses carry the structured payload as a JSON string
/// inside the first choice's message content; some providers return the bare
/// object instead.
fn parse_completion_json(json: Value) -> Result<Value> {
	if let Some(content) = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
	{
		let parsed: Value = serde_json::from_str(content).map_err(|_| Error::InvalidResponse {
			message: "Reasoning content is not valid JSON.".to_string(),
		})?;

		return Ok(parsed);
	}

	if json.is_object() {
		return Ok(json);
	}

	Err(Error::InvalidResponse {
		message: "Reasoning response is missing JSON content.".to_string(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_choice_content_json() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "{\"title_keywords\": []}" } }
			]
		});
		let parsed = parse_completion_json(json).expect("parse failed");

		assert!(parsed.get("title_keywords").is_some());
	}

	#[test]
	fn passes_through_bare_objects() {
		let json = serde_json::json!({ "skill_keywords": [] });
		let parsed = parse_completion_json(json).expect("parse failed");

		assert!(parsed.get("skill_keywords").is_some());
	}

	#[test]
	fn rejects_non_json_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "not json" } }
			]
		});

		assert!(parse_completion_json(json).is_err());
	}
}
