//! URL classification.
//!
//! Decides which extractor handles a URL by plain substring matching.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of content a URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "YouTube")]
    YouTube,
    #[serde(rename = "TikTok")]
    TikTok,
    #[serde(rename = "article")]
    Article,
}

impl ContentType {
    /// Label used in prompts and JSON responses
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::YouTube => "YouTube",
            ContentType::TikTok => "TikTok",
            ContentType::Article => "article",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a URL. YouTube wins over TikTok, anything else is an article.
pub fn classify(url: &str) -> ContentType {
    if url.contains("youtube.com") || url.contains("youtu.be") {
        ContentType::YouTube
    } else if url.contains("tiktok.com") || url.contains("vm.tiktok.com") {
        ContentType::TikTok
    } else {
        ContentType::Article
    }
}
