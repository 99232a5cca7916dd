//! Model-generated fix suggestions.
//!
//! A language model rewrites each raw validator error into one short,
//! actionable fix. The contract with a provider is strict: for n input
//! errors it must return exactly n suggestions, in input order. Callers
//! verify the count and discard the whole batch on mismatch, so a provider
//! that drifts from the contract only costs the nicer wording; validation
//! itself never depends on this module.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Provider configuration, deserialized from the `[suggestions]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SuggestConfig {
    /// Opt-in switch; the CLI `--suggest` flag enables a single run
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub max_tokens: usize,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://api.anthropic.com/v1/messages".to_string(),
            model: "claude-3-5-haiku-20241022".to_string(),
            max_tokens: 1024,
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Errors that can occur while fetching suggestions.
#[derive(Debug)]
pub enum SuggestError {
    /// API key environment variable unset or empty
    MissingApiKey(String),
    /// Transport-level failure (connection, timeout, serialization)
    Http(reqwest::Error),
    /// Non-success status from the endpoint
    Api { status: u16, body: String },
    /// Response carried no usable text
    EmptyResponse,
}

impl std::fmt::Display for SuggestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKey(var) => write!(f, "suggestion API key not set: ${}", var),
            Self::Http(e) => write!(f, "suggestion request failed: {}", e),
            Self::Api { status, body } => {
                write!(f, "suggestion endpoint returned {}: {}", status, body.trim())
            }
            Self::EmptyResponse => write!(f, "suggestion endpoint returned no content"),
        }
    }
}

impl std::error::Error for SuggestError {}

impl From<reqwest::Error> for SuggestError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

/// Everything a provider may want to see besides the errors themselves.
#[derive(Debug, Clone, Default)]
pub struct SuggestionContext {
    /// Schema text the document failed against, when readable
    pub schema: Option<String>,
    /// The document being validated
    pub document: String,
}

/// Rewrites raw validator errors into human-readable suggestions.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Produce one suggestion per input error, in input order.
    async fn suggest(
        &self,
        errors: &[String],
        context: &SuggestionContext,
    ) -> Result<Vec<String>, SuggestError>;
}

/// Messages-API request format
#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: usize,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

/// Messages-API response format
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
}

/// Provider backed by an Anthropic-compatible messages endpoint.
#[derive(Debug)]
pub struct HttpSuggestionProvider {
    config: SuggestConfig,
    api_key: String,
    client: reqwest::Client,
}

impl HttpSuggestionProvider {
    pub fn new(config: SuggestConfig) -> Result<Self, SuggestError> {
        let api_key = env::var(&config.api_key_env).unwrap_or_default();
        if api_key.is_empty() {
            return Err(SuggestError::MissingApiKey(config.api_key_env.clone()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            api_key,
            client,
        })
    }
}

#[async_trait]
impl SuggestionProvider for HttpSuggestionProvider {
    async fn suggest(
        &self,
        errors: &[String],
        context: &SuggestionContext,
    ) -> Result<Vec<String>, SuggestError> {
        if errors.is_empty() {
            return Ok(Vec::new());
        }

        let request = MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: build_prompt(errors, context),
            }],
        };

        log::debug!(
            "requesting {} suggestion(s) from {}",
            errors.len(),
            self.config.model
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SuggestError::Api { status, body });
        }

        let body: MessagesResponse = response.json().await?;
        let text = body
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or(SuggestError::EmptyResponse)?;

        Ok(parse_suggestions(&text))
    }
}

fn build_prompt(errors: &[String], context: &SuggestionContext) -> String {
    let error_list = errors
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{}. {}", i + 1, e))
        .collect::<Vec<_>>()
        .join("\n");

    let schema_section = match &context.schema {
        Some(schema) => format!("\nSchema it was validated against:\n{}\n", schema),
        None => String::new(),
    };

    format!(
        r#"A vars file failed schema validation. Rewrite each validation error as one
short, actionable fix in plain language, keeping the input order.

Document:
{document}
{schema_section}
Validation errors:
{error_list}

Respond with EXACTLY {count} lines, one suggestion per line, numbered like
the input. No preamble, no explanations.
"#,
        document = context.document,
        schema_section = schema_section,
        error_list = error_list,
        count = errors.len(),
    )
}

/// Split the model's reply into one suggestion per line, dropping list
/// prefixes and blank lines.
fn parse_suggestions(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_list_prefix)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Remove `1.`, `2)`, or `- ` style prefixes the model tends to add
fn strip_list_prefix(line: &str) -> &str {
    let line = line.trim();

    let after_digits = line.trim_start_matches(|c: char| c.is_ascii_digit());
    if after_digits.len() < line.len() {
        if let Some(rest) = after_digits
            .strip_prefix('.')
            .or_else(|| after_digits.strip_prefix(')'))
        {
            return rest.trim_start();
        }
    }

    line.strip_prefix("- ").map(str::trim_start).unwrap_or(line)
}
