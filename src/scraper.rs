//! Web scraping module for article extraction.
//!
//! Uses reqwest for fetching and scraper for HTML parsing. The extraction
//! heuristic itself is the pure [`extract_main_text`]; [`ArticleExtractor`]
//! only adds the network fetch and maps transport failures to [`ExtractError`].

use crate::config::ExtractionConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use scraper::{ElementRef, Html, Node, Selector};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Marker appended to truncated text
pub const ELLIPSIS: &str = "...";

/// Elements whose start separates the text before and after them
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Why content could not be extracted. The display text is the message shown
/// to users (and summarized, when the failure policy allows it).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Could not reach the website. Please check the URL and try again.")]
    Unreachable,
    #[error("Access denied. This website blocks automated content extraction.")]
    AccessDenied,
    #[error("Article not found. Please check the URL and try again.")]
    NotFound,
    #[error("Failed to fetch article content. Please try again or check if the URL is accessible.")]
    FetchFailed,
    #[error("Could not extract meaningful content from this article. The page might be protected or require JavaScript to load content.")]
    NoMeaningfulContent,
    #[error("Transcript not available.")]
    TranscriptUnavailable,
}

/// Selector lists and length thresholds driving [`extract_main_text`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractionRules {
    /// Candidate containers for the main content, in priority order
    pub content_selectors: Vec<String>,
    /// Elements removed before any text is read
    pub noise_selectors: Vec<String>,
    /// Below this many characters the whole body is used instead
    pub fallback_threshold: usize,
    /// Below this many characters extraction fails
    pub min_chars: usize,
    /// Text is cut to this many characters plus [`ELLIPSIS`]
    pub max_chars: usize,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            content_selectors: [
                "article",
                "[role=\"main\"]",
                ".main-content",
                ".content",
                ".post-content",
                ".entry-content",
                ".article-content",
                "main",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            noise_selectors: [
                "script",
                "style",
                "nav",
                "header",
                "footer",
                "aside",
                ".ad",
                ".advertisement",
                ".sidebar",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            fallback_threshold: 100,
            min_chars: 50,
            max_chars: 10_000,
        }
    }
}

/// Anything that can turn an article URL into text.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<String, ExtractError>;
}

/// Fetches pages over HTTP and runs [`extract_main_text`] on them.
pub struct ArticleExtractor {
    client: Client,
    rules: ExtractionRules,
}

impl ArticleExtractor {
    /// Build an extractor with a client configured from `config`
    pub fn new(config: &ExtractionConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config.rules.clone()))
    }

    /// Use an existing client, e.g. one with a custom proxy setup
    pub fn with_client(client: Client, rules: ExtractionRules) -> Self {
        Self { client, rules }
    }

    async fn fetch_html(&self, url: &str) -> Result<String, ExtractError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_failure(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_failure(status));
        }

        response.text().await.map_err(|e| transport_failure(&e))
    }
}

#[async_trait]
impl ContentExtractor for ArticleExtractor {
    async fn extract(&self, url: &str) -> Result<String, ExtractError> {
        let result = match self.fetch_html(url).await {
            Ok(html) => extract_main_text(&html, &self.rules),
            Err(e) => Err(e),
        };

        match &result {
            Ok(text) => debug!(url, chars = text.chars().count(), "extracted article text"),
            Err(e) => warn!(url, error = ?e, "article extraction failed"),
        }
        result
    }
}

/// Locate the main text block of an HTML page.
///
/// Noise elements are detached from the tree first. Of all elements matched by
/// the content selectors, the one with the longest text wins; if that is
/// shorter than `fallback_threshold` the whole body is used. The result is
/// whitespace-normalized and truncated to `max_chars`.
pub fn extract_main_text(html: &str, rules: &ExtractionRules) -> Result<String, ExtractError> {
    let mut document = Html::parse_document(html);
    strip_noise(&mut document, &rules.noise_selectors);

    let mut content = String::new();
    let mut content_len = 0;
    for selector in parse_selectors(&rules.content_selectors) {
        for element in document.select(&selector) {
            let text = element_text(&element);
            let len = text.chars().count();
            if len > content_len {
                content = text;
                content_len = len;
            }
        }
    }

    if content_len < rules.fallback_threshold {
        content = body_text(&document);
    }

    let content = normalize_whitespace(&content);
    if content.chars().count() < rules.min_chars {
        return Err(ExtractError::NoMeaningfulContent);
    }

    Ok(truncate(content, rules.max_chars))
}

/// Detach every element matching the given selectors
fn strip_noise(document: &mut Html, selectors: &[String]) {
    for selector in parse_selectors(selectors) {
        let ids: Vec<_> = document.select(&selector).map(|element| element.id()).collect();
        for id in ids {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }
}

fn parse_selectors(selectors: &[String]) -> Vec<Selector> {
    selectors
        .iter()
        .filter_map(|s| match Selector::parse(s) {
            Ok(selector) => Some(selector),
            Err(e) => {
                warn!(selector = %s, error = %e, "ignoring invalid selector");
                None
            }
        })
        .collect()
}

/// Concatenated text of an element. Inline markup adds nothing, block elements add a space.
fn element_text(element: &ElementRef) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(e) if BLOCK_ELEMENTS.contains(&e.name()) => text.push(' '),
            _ => {}
        }
    }
    text.trim().to_string()
}

fn body_text(document: &Html) -> String {
    let body_selector = Selector::parse("body").unwrap();
    document
        .select(&body_selector)
        .next()
        .map(|body| element_text(&body))
        .unwrap_or_default()
}

/// Collapse every run of whitespace (newlines included) into one space
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to `max_chars` characters, appending [`ELLIPSIS`] if anything was dropped
pub fn truncate(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}{}", &text[..idx], ELLIPSIS),
        None => text,
    }
}

fn status_failure(status: StatusCode) -> ExtractError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ExtractError::AccessDenied,
        StatusCode::NOT_FOUND => ExtractError::NotFound,
        _ => ExtractError::FetchFailed,
    }
}

fn transport_failure(error: &reqwest::Error) -> ExtractError {
    if let Some(status) = error.status() {
        return status_failure(status);
    }
    if is_dns_failure(error) {
        ExtractError::Unreachable
    } else {
        ExtractError::FetchFailed
    }
}

/// Walk the error chain looking for a host resolution failure
fn is_dns_failure(error: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(err) = current {
        let message = err.to_string().to_lowercase();
        if message.contains("dns error")
            || message.contains("failed to lookup address")
            || message.contains("name or service not known")
            || message.contains("no such host")
        {
            return true;
        }
        current = err.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    fn page(body: &str) -> String {
        format!("<html><head><title>t</title></head><body>{}</body></html>", body)
    }

    fn words(n: usize) -> String {
        vec!["lorem"; n].join(" ")
    }

    #[test]
    fn picks_longest_content_block() {
        let html = page(&format!(
            "<article>{}</article><div class=\"post-content\">{}</div>",
            words(30),
            words(60)
        ));
        let text = extract_main_text(&html, &ExtractionRules::default()).unwrap();
        assert_eq!(text, words(60));
    }

    #[test]
    fn strips_noise_before_reading_text() {
        let html = page(&format!(
            "<article><script>var tracking = 1;</script><aside>related stories</aside>{}</article>\
             <nav>home about contact</nav>",
            words(40)
        ));
        let text = extract_main_text(&html, &ExtractionRules::default()).unwrap();
        assert!(!text.contains("tracking"));
        assert!(!text.contains("related"));
        assert!(!text.contains("contact"));
        assert_eq!(text, words(40));
    }

    #[test]
    fn short_block_falls_back_to_body() {
        let html = page(&format!(
            "<main>tiny main</main><div class=\"wrapper\"><p>{}</p></div>",
            words(20)
        ));
        let text = extract_main_text(&html, &ExtractionRules::default()).unwrap();
        assert!(text.starts_with("tiny main"));
        assert!(text.ends_with("lorem"));
    }

    #[test]
    fn inline_markup_does_not_split_words() {
        let html = page(
            "<article><p>See <a href=\"/docs\">the docs</a>, it is un<em>believ</em>able how much \
             text fits in one paragraph of a reasonably long article body.</p></article>",
        );
        let text = extract_main_text(&html, &ExtractionRules::default()).unwrap();
        assert!(text.starts_with("See the docs, it is unbelievable how much text"));
    }

    #[test]
    fn block_elements_keep_words_apart() {
        let html = page(&format!(
            "<article><h2>Heading</h2><p>{}</p><ul><li>first</li><li>second</li></ul></article>",
            words(20)
        ));
        let text = extract_main_text(&html, &ExtractionRules::default()).unwrap();
        assert!(text.starts_with("Heading lorem"));
        assert!(text.ends_with("lorem first second"));
    }

    #[test]
    fn too_little_text_is_an_error() {
        let html = page("<p>Hello there</p>");
        let err = extract_main_text(&html, &ExtractionRules::default()).unwrap_err();
        assert_eq!(err, ExtractError::NoMeaningfulContent);
        assert!(err.to_string().starts_with("Could not extract meaningful content"));
    }

    #[test]
    fn whitespace_is_collapsed() {
        let html = page(&format!("<article>\n\n  {}\n\t\n  {}  </article>", words(15), words(15)));
        let text = extract_main_text(&html, &ExtractionRules::default()).unwrap();
        assert!(!text.contains('\n'));
        assert!(!text.contains("  "));
    }

    #[test]
    fn long_text_is_truncated_with_ellipsis() {
        let html = page(&format!("<article>{}</article>", "a".repeat(12_000)));
        let text = extract_main_text(&html, &ExtractionRules::default()).unwrap();
        assert_eq!(text.chars().count(), 10_003);
        assert!(text.ends_with(ELLIPSIS));
    }

    #[test]
    fn exact_limit_is_not_truncated() {
        let html = page(&format!("<article>{}</article>", "b".repeat(10_000)));
        let text = extract_main_text(&html, &ExtractionRules::default()).unwrap();
        assert_eq!(text.chars().count(), 10_000);
        assert!(!text.ends_with(ELLIPSIS));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let text = "é".repeat(20);
        let cut = truncate(text, 5);
        assert_eq!(cut, format!("{}...", "é".repeat(5)));
    }

    #[test]
    fn invalid_selectors_are_skipped() {
        let rules = ExtractionRules {
            content_selectors: vec!["[[[".to_string(), "article".to_string()],
            ..ExtractionRules::default()
        };
        let html = page(&format!("<article>{}</article>", words(40)));
        assert_eq!(extract_main_text(&html, &rules).unwrap(), words(40));
    }

    #[test]
    fn maps_http_statuses() {
        assert_eq!(status_failure(StatusCode::FORBIDDEN), ExtractError::AccessDenied);
        assert_eq!(status_failure(StatusCode::UNAUTHORIZED), ExtractError::AccessDenied);
        assert_eq!(status_failure(StatusCode::NOT_FOUND), ExtractError::NotFound);
        assert_eq!(status_failure(StatusCode::BAD_GATEWAY), ExtractError::FetchFailed);
    }

    #[derive(Debug)]
    struct Wrapped {
        message: &'static str,
        source: Option<std::io::Error>,
    }

    impl fmt::Display for Wrapped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message)
        }
    }

    impl StdError for Wrapped {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            self.source.as_ref().map(|e| e as &(dyn StdError + 'static))
        }
    }

    #[test]
    fn detects_dns_failure_in_error_chain() {
        let err = Wrapped {
            message: "error sending request",
            source: Some(std::io::Error::other(
                "failed to lookup address information: Name or service not known",
            )),
        };
        assert!(is_dns_failure(&err));

        let refused = Wrapped {
            message: "error sending request",
            source: Some(std::io::Error::other("connection refused")),
        };
        assert!(!is_dns_failure(&refused));
    }
}
