//! Google Gemini subtask suggestions
//!
//! Calls the `generateContent` REST endpoint with a JSON response schema so the
//! model answers with `{ "subtasks": [string] }`.

use async_trait::async_trait;
use core_config::{env_or_default, env_parse, env_required_any, ConfigError, FromEnv};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

use super::{build_prompt, SubtaskSuggester};
use crate::error::{SuggestionError, SuggestionResult};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Gemini API configuration
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    /// Base URL up to and including the API version
    pub api_base: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl FromEnv for GeminiConfig {
    /// - API_KEY (or GEMINI_API_KEY): required
    /// - GEMINI_MODEL: defaults to "gemini-2.5-flash"
    /// - GEMINI_API_BASE: defaults to the public v1beta endpoint
    /// - GEMINI_TIMEOUT_SECS: defaults to 30
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = env_required_any(&["API_KEY", "GEMINI_API_KEY"])?;
        let timeout_secs = env_parse("GEMINI_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self::new(api_key)
            .with_model(env_or_default("GEMINI_MODEL", DEFAULT_MODEL))
            .with_api_base(env_or_default("GEMINI_API_BASE", DEFAULT_API_BASE))
            .with_timeout(Duration::from_secs(timeout_secs)))
    }
}

/// What went wrong talking to Gemini. Never leaves this module.
#[derive(Debug, Error)]
enum GeminiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error ({status}): {body}")]
    Api { status: StatusCode, body: String },

    #[error("response contained no text")]
    EmptyResponse,

    #[error("response text is not JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

// Gemini request/response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// The shape the response schema asks for
#[derive(Debug, Deserialize)]
struct SuggestionPayload {
    subtasks: Vec<String>,
}

fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "subtasks": {
                "type": "ARRAY",
                "description": "A list of actionable subtasks.",
                "items": {
                    "type": "STRING",
                    "description": "A single subtask."
                }
            }
        },
        "required": ["subtasks"]
    })
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated
    fn into_text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        (!text.trim().is_empty()).then_some(text)
    }
}

/// Parse the model's JSON answer.
///
/// Text that is not JSON is an error; JSON of any other shape means "no subtasks".
fn parse_suggestions(text: &str) -> Result<Vec<String>, GeminiError> {
    let value: serde_json::Value = serde_json::from_str(text.trim())?;

    match serde_json::from_value::<SuggestionPayload>(value) {
        Ok(payload) => Ok(payload
            .subtasks
            .into_iter()
            .map(|subtask| subtask.trim().to_string())
            .filter(|subtask| !subtask.is_empty())
            .collect()),
        Err(e) => {
            warn!(error = %e, "Gemini answer did not match the subtasks schema");
            Ok(Vec::new())
        }
    }
}

/// Subtask suggestions backed by the Gemini API
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(GeminiConfig::from_env()?))
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    async fn generate(&self, task_name: &str) -> Result<Vec<String>, GeminiError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: build_prompt(task_name),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
                temperature: self.config.temperature,
            },
        };

        let response = self
            .client
            .post(self.config.endpoint_url())
            .header("x-goog-api-key", &self.config.api_key)
            .timeout(self.config.timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api { status, body });
        }

        let text = response
            .json::<GenerateContentResponse>()
            .await?
            .into_text()
            .ok_or(GeminiError::EmptyResponse)?;

        parse_suggestions(&text)
    }
}

#[async_trait]
impl SubtaskSuggester for GeminiProvider {
    #[instrument(skip(self), fields(model = %self.config.model))]
    async fn suggest_subtasks(&self, task_name: &str) -> SuggestionResult<Vec<String>> {
        match self.generate(task_name).await {
            Ok(subtasks) => {
                debug!(count = subtasks.len(), "Generated subtask suggestions");
                Ok(subtasks)
            }
            Err(e) => {
                error!(error = %e, "Error generating subtasks");
                Err(SuggestionError::GenerationFailed)
            }
        }
    }
}
