//! LLM agent module for summarization.
//!
//! Uses rstructor's Gemini client. A failed or empty completion never becomes
//! an error for the caller: it is replaced by a fixed placeholder summary.

use crate::classify::ContentType;
use crate::config::Config;
use async_trait::async_trait;
use rstructor::{GeminiClient, GeminiModel, LLMClient};
use thiserror::Error;
use tracing::{info, warn};

pub const SUMMARY_FAILED: &str = "Failed to generate summary. Please try again later.";
pub const SUMMARY_UNAVAILABLE: &str = "Summary not available.";

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("LLM request failed: {0}")]
    RequestFailed(String),
    #[error("configuration error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),
}

/// Turns extracted content into a formatted summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, content: &str, content_type: ContentType) -> String;
}

/// Summarizer backed by the Gemini API
pub struct GeminiSummarizer {
    client: GeminiClient,
    persona: String,
}

impl GeminiSummarizer {
    /// Build the client once; fails when the credential is missing or rejected
    pub fn new(config: &Config) -> Result<Self, AgentError> {
        let api_key = config.api_key()?;
        let model = parse_gemini_model(&config.agent.model);

        let client = GeminiClient::new(api_key)
            .map_err(|e| AgentError::RequestFailed(e.to_string()))?
            .model(model);

        Ok(Self {
            client,
            persona: config.agent.persona.clone(),
        })
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    async fn summarize(&self, content: &str, content_type: ContentType) -> String {
        let prompt = build_prompt(&self.persona, content, content_type);

        match self.client.generate_with_metadata(&prompt).await {
            Ok(result) => {
                info!(content_type = %content_type, chars = result.text.len(), "summary generated");
                summary_or_placeholder(&result.text)
            }
            Err(e) => {
                warn!(error = %e, "Gemini API error");
                SUMMARY_FAILED.to_string()
            }
        }
    }
}

/// System instruction followed by the user message
pub fn build_prompt(persona: &str, content: &str, content_type: ContentType) -> String {
    format!(
        r#"{}

---

I need a concise summary of the following {} content:
CONTENT:
{}
"#,
        persona.trim(),
        content_type.label(),
        content
    )
}

fn summary_or_placeholder(text: &str) -> String {
    if text.trim().is_empty() {
        SUMMARY_UNAVAILABLE.to_string()
    } else {
        text.to_string()
    }
}

/// Parse a model string into a GeminiModel
fn parse_gemini_model(model: &str) -> GeminiModel {
    match model {
        "gemini-2.0-flash" => GeminiModel::Gemini20Flash,
        "gemini-2.5-flash" => GeminiModel::Gemini25Flash,
        "gemini-2.5-pro" => GeminiModel::Gemini25Pro,
        _ => GeminiModel::Gemini25Flash, // Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PERSONA;

    #[test]
    fn prompt_embeds_type_and_content() {
        let prompt = build_prompt(DEFAULT_PERSONA, "The body text.", ContentType::Article);
        assert!(prompt.starts_with("You are a helpful and accurate language summarizer."));
        assert!(prompt.contains("NEVER fabricate information."));
        assert!(prompt.contains("following article content"));
        assert!(prompt.ends_with("CONTENT:\nThe body text.\n"));
    }

    #[test]
    fn empty_completion_becomes_placeholder() {
        assert_eq!(summary_or_placeholder("  \n"), SUMMARY_UNAVAILABLE);
        assert_eq!(summary_or_placeholder("## Done"), "## Done");
    }

    #[test]
    fn construction_requires_a_key() {
        let config = Config::default();
        assert!(matches!(
            GeminiSummarizer::new(&config),
            Err(AgentError::ConfigError(_))
        ));
    }
}
