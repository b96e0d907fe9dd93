//! Request and result types that flow through the pipeline.

use crate::classify::ContentType;
use crate::scraper::ExtractError;
use serde::{Deserialize, Serialize};

/// Body of a summarize request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentRequest {
    pub url: String,
}

/// Whether extracted text is real content or a failure message standing in for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Extracted,
    Degraded(ExtractError),
}

/// Text pulled from a URL, ready for summarization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub text: String,
    pub source_type: ContentType,
    pub outcome: ExtractionOutcome,
}

impl ExtractedContent {
    pub fn extracted(text: String, source_type: ContentType) -> Self {
        Self {
            text,
            source_type,
            outcome: ExtractionOutcome::Extracted,
        }
    }

    /// Content whose text is the failure message itself
    pub fn degraded(error: ExtractError, source_type: ContentType) -> Self {
        Self {
            text: error.to_string(),
            source_type,
            outcome: ExtractionOutcome::Degraded(error),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.outcome, ExtractionOutcome::Degraded(_))
    }
}

/// The answer to one summarize request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryResult {
    #[serde(rename = "summary")]
    pub summary_text: String,
    #[serde(rename = "contentType")]
    pub content_type: ContentType,
    #[serde(rename = "url")]
    pub source_url: String,
}
