//! Request orchestration.
//!
//! Authenticates the caller, validates the URL, classifies it, dispatches to
//! the matching extractor and hands the text to the summarizer. Each request
//! runs once, start to finish: no retries, no caching, no partial results.

use crate::agent::{AgentError, GeminiSummarizer, Summarizer};
use crate::auth::{Authenticator, BearerTokenAuthenticator};
use crate::classify::{classify, ContentType};
use crate::config::{Config, ExtractionFailurePolicy};
use crate::scraper::{ArticleExtractor, ContentExtractor, ExtractError};
use crate::summary::{ContentRequest, ExtractedContent, SummaryResult};
use crate::transcript::{TikTokTranscripts, TranscriptProvider, YouTubeTranscripts};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

/// Why a request produced no summary. The display text is sent to the client.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("Invalid request body")]
    InvalidBody,
    #[error("URL is required")]
    MissingUrl,
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("{0}")]
    Extraction(ExtractError),
    #[error("Could not extract content from the provided URL")]
    EmptyContent,
    #[error("Internal server error. Please try again later.")]
    Internal(String),
}

impl PipelineError {
    pub fn status_code(&self) -> u16 {
        match self {
            PipelineError::Unauthorized => 401,
            PipelineError::InvalidBody
            | PipelineError::MissingUrl
            | PipelineError::InvalidUrl
            | PipelineError::Extraction(_)
            | PipelineError::EmptyContent => 400,
            PipelineError::Internal(_) => 500,
        }
    }
}

/// Failures while wiring the pipeline at startup
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub struct Pipeline {
    authenticator: Arc<dyn Authenticator>,
    articles: Arc<dyn ContentExtractor>,
    transcripts: Vec<Arc<dyn TranscriptProvider>>,
    summarizer: Arc<dyn Summarizer>,
    on_failure: ExtractionFailurePolicy,
}

impl Pipeline {
    /// Pipeline with the placeholder transcript providers and the default failure policy
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        articles: Arc<dyn ContentExtractor>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            authenticator,
            articles,
            transcripts: vec![Arc::new(YouTubeTranscripts), Arc::new(TikTokTranscripts)],
            summarizer,
            on_failure: ExtractionFailurePolicy::default(),
        }
    }

    /// Wire the production collaborators. Fails fast without an API key.
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let summarizer = GeminiSummarizer::new(config)?;
        let articles = ArticleExtractor::new(&config.extraction)?;
        let authenticator = BearerTokenAuthenticator::new(config.auth.tokens.clone());
        if authenticator.is_empty() {
            warn!("no API tokens configured, every summarize request will be rejected");
        }

        Ok(Self::new(
            Arc::new(authenticator),
            Arc::new(articles),
            Arc::new(summarizer),
        )
        .with_failure_policy(config.extraction.on_failure))
    }

    pub fn with_transcripts(mut self, transcripts: Vec<Arc<dyn TranscriptProvider>>) -> Self {
        self.transcripts = transcripts;
        self
    }

    pub fn with_failure_policy(mut self, policy: ExtractionFailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    /// Handle a raw API request: authenticate first, then parse and summarize
    pub async fn handle(
        &self,
        token: Option<&str>,
        body: &[u8],
    ) -> Result<SummaryResult, PipelineError> {
        let user = self
            .authenticator
            .authenticate(token)
            .await
            .ok_or(PipelineError::Unauthorized)?;

        let request = parse_request(body)?;
        info!(user = %user, url = %request.url, "summarize request");
        self.summarize(&request).await
    }

    /// Validate, extract and summarize an already authenticated request
    pub async fn summarize(&self, request: &ContentRequest) -> Result<SummaryResult, PipelineError> {
        let url = request.url.trim();
        if url.is_empty() {
            return Err(PipelineError::MissingUrl);
        }
        validate_url(url)?;

        let content = self.extract(url).await?;
        if content.text.trim().is_empty() {
            return Err(PipelineError::EmptyContent);
        }

        let summary = self
            .summarizer
            .summarize(&content.text, content.source_type)
            .await;

        Ok(SummaryResult {
            summary_text: summary,
            content_type: content.source_type,
            source_url: request.url.clone(),
        })
    }

    /// Classify the URL and run the matching extractor, applying the failure policy
    pub async fn extract(&self, url: &str) -> Result<ExtractedContent, PipelineError> {
        let content_type = classify(url);

        let result = match content_type {
            ContentType::Article => self.articles.extract(url).await,
            platform => match self.transcripts.iter().find(|p| p.platform() == platform) {
                Some(provider) => provider.transcript(url).await,
                None => {
                    return Err(PipelineError::Internal(format!(
                        "no transcript provider for {}",
                        platform
                    )))
                }
            },
        };

        match result {
            Ok(text) => Ok(ExtractedContent::extracted(text, content_type)),
            Err(error) => match self.on_failure {
                ExtractionFailurePolicy::Summarize => {
                    warn!(url, error = %error, "extraction failed, summarizing the failure message instead");
                    Ok(ExtractedContent::degraded(error, content_type))
                }
                ExtractionFailurePolicy::Reject => Err(PipelineError::Extraction(error)),
            },
        }
    }
}

/// Read `{ "url": string }` from a JSON body
pub fn parse_request(body: &[u8]) -> Result<ContentRequest, PipelineError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| PipelineError::InvalidBody)?;
    match value.get("url").and_then(Value::as_str) {
        Some(url) if !url.trim().is_empty() => Ok(ContentRequest {
            url: url.to_string(),
        }),
        _ => Err(PipelineError::MissingUrl),
    }
}

fn validate_url(url: &str) -> Result<(), PipelineError> {
    let parsed = Url::parse(url).map_err(|_| PipelineError::InvalidUrl)?;
    let web_scheme = matches!(parsed.scheme(), "http" | "https");
    if web_scheme && parsed.host_str().is_some() {
        Ok(())
    } else {
        Err(PipelineError::InvalidUrl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_parsing() {
        assert_eq!(
            parse_request(br#"{"url":"https://example.com"}"#).unwrap().url,
            "https://example.com"
        );
        assert!(matches!(parse_request(br#"{"url":""}"#), Err(PipelineError::MissingUrl)));
        assert!(matches!(parse_request(br#"{"url":"   "}"#), Err(PipelineError::MissingUrl)));
        assert!(matches!(parse_request(br#"{"url":42}"#), Err(PipelineError::MissingUrl)));
        assert!(matches!(parse_request(br#"{}"#), Err(PipelineError::MissingUrl)));
        assert!(matches!(parse_request(b"not json"), Err(PipelineError::InvalidBody)));
    }

    #[test]
    fn url_validation() {
        assert!(validate_url("https://example.com/a").is_ok());
        assert!(validate_url("http://youtu.be/abc").is_ok());
        assert!(matches!(validate_url("example.com"), Err(PipelineError::InvalidUrl)));
        assert!(matches!(validate_url("ftp://example.com"), Err(PipelineError::InvalidUrl)));
        assert!(matches!(validate_url("mailto:a@b.c"), Err(PipelineError::InvalidUrl)));
    }

    #[test]
    fn status_codes() {
        assert_eq!(PipelineError::Unauthorized.status_code(), 401);
        assert_eq!(PipelineError::MissingUrl.status_code(), 400);
        assert_eq!(PipelineError::EmptyContent.status_code(), 400);
        assert_eq!(PipelineError::Extraction(ExtractError::NotFound).status_code(), 400);
        assert_eq!(PipelineError::Internal("boom".into()).status_code(), 500);
        assert_eq!(
            PipelineError::Extraction(ExtractError::NotFound).to_string(),
            "Article not found. Please check the URL and try again."
        );
    }
}
