use std::pin::Pin;

use async_openai::{config::OpenAIConfig, error::OpenAIError, Client};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    services::generation_provider::{GenerationOptions, GenerationProvider, TextStream},
};

const ENVELOPE_KEY: &str = "items";
const SCHEMA_NAME: &str = "exam_payload";

#[derive(Debug, Deserialize)]
struct CompletionBody {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, OpenAIError>> + Send>>;

/// Provider backed by an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
}

impl OpenAiProvider {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.openai_api_key.expose_secret())
            .with_api_base(&config.openai_api_base);

        Self {
            client: Client::with_config(openai_config),
        }
    }
}

#[async_trait]
impl GenerationProvider for OpenAiProvider {
    async fn stream_text(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> AppResult<TextStream> {
        log::info!("Opening completion stream with model {}", options.model);

        let request = json!({
            "model": options.model,
            "temperature": options.temperature,
            "stream": true,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let chunks: ChunkStream = self.client.chat().create_stream_byot(request).await?;

        let fragments = chunks.filter_map(|chunk| async move {
            match chunk {
                Ok(chunk) => chunk
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.delta.content)
                    .filter(|content| !content.is_empty())
                    .map(Ok),
                Err(err) => Some(Err(AppError::from(err))),
            }
        });

        Ok(Box::pin(fragments))
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &Value,
        options: &GenerationOptions,
    ) -> AppResult<String> {
        log::info!("Requesting structured completion with model {}", options.model);

        let (schema, enveloped) = object_schema(schema);
        let request = json!({
            "model": options.model,
            "temperature": options.temperature,
            "messages": [{ "role": "user", "content": prompt }],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": SCHEMA_NAME,
                    "schema": schema,
                    "strict": false,
                },
            },
        });

        let body: CompletionBody = self.client.chat().create_byot(request).await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AppError::SchemaError("Completion contained no content".to_string()))?;

        if enveloped {
            Ok(unwrap_envelope(content))
        } else {
            Ok(content)
        }
    }
}

/// The endpoint only accepts object roots, so other schemas are wrapped
/// under a single required key.
fn object_schema(schema: &Value) -> (Value, bool) {
    let mut schema = schema.clone();
    if let Some(map) = schema.as_object_mut() {
        map.remove("$schema");
    }

    if schema.get("type").and_then(Value::as_str) == Some("object") {
        return (schema, false);
    }

    // `$ref`s point at the document root, so definitions move up with it.
    let defs = schema
        .as_object_mut()
        .and_then(|map| map.remove("$defs"));

    let mut wrapped = json!({
        "type": "object",
        "properties": { ENVELOPE_KEY: schema },
        "required": [ENVELOPE_KEY],
        "additionalProperties": false,
    });
    if let (Some(defs), Some(map)) = (defs, wrapped.as_object_mut()) {
        map.insert("$defs".to_string(), defs);
    }
    (wrapped, true)
}

/// Leaves the payload untouched when it is not a recognisable envelope so
/// the caller's schema check reports the problem.
fn unwrap_envelope(content: String) -> String {
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(mut map)) => match map.remove(ENVELOPE_KEY) {
            Some(inner) => inner.to_string(),
            None => content,
        },
        _ => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_schemas_are_wrapped_in_an_object() {
        let schema = json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "type": "array",
            "items": { "type": "string" }
        });

        let (wrapped, enveloped) = object_schema(&schema);

        assert!(enveloped);
        assert_eq!(wrapped["type"], "object");
        assert_eq!(wrapped["properties"]["items"]["type"], "array");
        assert!(wrapped["properties"]["items"].get("$schema").is_none());
    }

    #[test]
    fn definitions_move_to_the_wrapper_root() {
        let schema = json!({
            "type": "array",
            "items": { "$ref": "#/$defs/Item" },
            "$defs": { "Item": { "type": "object" } }
        });

        let (wrapped, _) = object_schema(&schema);

        assert_eq!(wrapped["$defs"]["Item"]["type"], "object");
        assert!(wrapped["properties"]["items"].get("$defs").is_none());
    }

    #[test]
    fn object_schemas_pass_through() {
        let schema = json!({ "type": "object", "properties": {} });
        let (same, enveloped) = object_schema(&schema);

        assert!(!enveloped);
        assert_eq!(same, schema);
    }

    #[test]
    fn envelope_is_unwrapped_to_inner_json() {
        let unwrapped = unwrap_envelope(r#"{"items":["a","b"]}"#.to_string());
        assert_eq!(unwrapped, r#"["a","b"]"#);
    }

    #[test]
    fn unrecognised_payload_is_left_alone() {
        let raw = "```json\n[\"a\"]\n```".to_string();
        assert_eq!(unwrap_envelope(raw.clone()), raw);

        let other = r#"{"answers":[]}"#.to_string();
        assert_eq!(unwrap_envelope(other.clone()), other);
    }

    #[test]
    fn stream_chunks_tolerate_missing_fields() {
        let chunk: StreamChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{"role":"assistant"}}]}"#).unwrap();
        assert!(chunk.choices[0].delta.content.is_none());

        let usage_only: StreamChunk = serde_json::from_str(r#"{"usage":{"total_tokens":9}}"#).unwrap();
        assert!(usage_only.choices.is_empty());
    }

    #[test]
    fn provider_builds_from_test_config() {
        let _provider = OpenAiProvider::new(&Config::test_config());
    }
}
