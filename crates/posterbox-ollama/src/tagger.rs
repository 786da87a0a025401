//! Entity tagging through an Ollama model.

use crate::client::OllamaClient;
use crate::error::OllamaResult;
use crate::types::{GenerateOptions, GenerateRequest};
use posterbox_config::TaggingConfig;
use posterbox_core::TagExtractor;
use serde_json::Value;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

/// Poster text beyond this many characters is not sent to the model.
const MAX_PROMPT_CHARS: usize = 3000;

/// Entity names longer than this are treated as model noise.
const MAX_TAG_CHARS: usize = 80;

/// Tag extractor that asks a local model for named entities.
///
/// Built once per process; the HTTP client and runtime are reused for every
/// poster.
pub struct OllamaTagExtractor {
    client: OllamaClient,
    model: String,
    entity_kinds: Vec<String>,
    rt: Runtime,
}

impl OllamaTagExtractor {
    /// Create a tag extractor from config. An unreachable server is only
    /// logged: extraction calls will fail individually.
    pub fn from_config(config: &TaggingConfig) -> OllamaResult<Self> {
        let client = OllamaClient::from_config(config)?;
        let rt = Runtime::new()?;

        let extractor = Self {
            client,
            model: config.model.clone(),
            entity_kinds: config.entity_kinds.clone(),
            rt,
        };

        if !extractor.is_available() {
            warn!(
                "Ollama is not running at {}; posters will be stored without tags",
                extractor.client.host()
            );
        }

        Ok(extractor)
    }

    /// Check if the Ollama server answers.
    pub fn is_available(&self) -> bool {
        self.rt.block_on(self.client.is_available())
    }

    /// Check if the configured model is pulled.
    pub fn has_model(&self) -> OllamaResult<bool> {
        self.rt.block_on(self.client.has_model(&self.model))
    }

    fn build_prompt(&self, text: &str) -> String {
        format!(
            "List the named entities in the following poster text that are {}. \
             Copy each entity exactly as written. Respond with a JSON object of the form \
             {{\"entities\": [\"...\"]}} and nothing else. If there are none, return \
             {{\"entities\": []}}.\n\nPoster text:\n{}",
            self.entity_kinds.join(", "),
            truncate_chars(text, MAX_PROMPT_CHARS)
        )
    }
}

impl TagExtractor for OllamaTagExtractor {
    fn extract_tags(&self, text: &str) -> posterbox_core::Result<Vec<String>> {
        let request = GenerateRequest::new(&self.model, self.build_prompt(text))
            .with_json_format()
            .with_options(
                GenerateOptions::new()
                    .with_temperature(0.0)
                    .with_num_predict(200),
            );

        let response = self.rt.block_on(self.client.generate(request))?;
        let tags = parse_entities(&response.response);
        debug!("Extracted entities: {:?}", tags);

        Ok(tags)
    }
}

/// Parse a model response into entity names.
///
/// Accepts a JSON array of strings, a JSON object holding such an array, or
/// (when the model ignored the format) one entity per line.
pub fn parse_entities(response: &str) -> Vec<String> {
    let trimmed = strip_code_fence(response.trim());

    let names = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(items)) => strings_in(&items),
        Ok(Value::Object(map)) => map
            .values()
            .find_map(|value| value.as_array().map(|items| strings_in(items)))
            .unwrap_or_default(),
        Ok(_) => Vec::new(),
        Err(_) => trimmed
            .lines()
            .map(|line| {
                // Clean up the line (remove bullets, numbers, etc.)
                line.trim()
                    .trim_start_matches(|c: char| {
                        c.is_numeric() || c == '.' || c == '-' || c == '*' || c == ')'
                    })
                    .trim()
                    .trim_matches('"')
                    .to_string()
            })
            .collect(),
    };

    names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty() && name.chars().count() <= MAX_TAG_CHARS)
        .collect()
}

fn strings_in(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj
                .get("text")
                .or_else(|| obj.get("name"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
        .collect()
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
