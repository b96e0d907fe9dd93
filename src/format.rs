//! Summary formatting.
//!
//! Turns the loosely Markdown-shaped text returned by the LLM into typed
//! display lines, one per input line, and renders them as HTML or terminal text.

use colored::Colorize;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref HEADER: Regex = Regex::new(r"^#{1,3}\s*\S").unwrap();
    static ref HEADER_MARKER: Regex = Regex::new(r"^#{1,3}").unwrap();
    static ref HEADER_PREFIX: Regex = Regex::new(r"^#{1,3}\s*").unwrap();
    static ref BULLET: Regex = Regex::new(r"^\s*[-•*]\s").unwrap();
    static ref NUMBERED: Regex = Regex::new(r"^\s*(\d+)\.\s").unwrap();
}

/// Deepest heading tag the renderers emit
pub const MAX_HEADING_TAG: usize = 6;

/// One classified line of summary text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayLine {
    Header { level: usize, text: String },
    BulletItem { text: String },
    /// `index` is the number as written, not validated or renumbered
    NumberedItem { index: String, text: String },
    BlankSpacer,
    Paragraph { text: String },
}

impl DisplayLine {
    /// Classify a single line. First match wins: header, bullet, numbered, blank, paragraph.
    pub fn parse(line: &str) -> Self {
        if HEADER.is_match(line) {
            let level = HEADER_MARKER.find(line).map(|m| m.len()).unwrap_or(1);
            let text = HEADER_PREFIX.replace(line, "").into_owned();
            return DisplayLine::Header { level, text };
        }

        if let Some(m) = BULLET.find(line) {
            return DisplayLine::BulletItem {
                text: line[m.end()..].to_string(),
            };
        }

        if let Some(caps) = NUMBERED.captures(line) {
            let whole = caps.get(0).map(|m| m.end()).unwrap_or(0);
            let index = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            return DisplayLine::NumberedItem {
                index: index.to_string(),
                text: line[whole..].to_string(),
            };
        }

        if line.trim().is_empty() {
            return DisplayLine::BlankSpacer;
        }

        DisplayLine::Paragraph {
            text: line.to_string(),
        }
    }

    /// HTML heading tag for a header line; headers sit one level below the page title
    pub fn heading_tag(&self) -> Option<String> {
        match self {
            DisplayLine::Header { level, .. } => {
                Some(format!("h{}", (level + 1).min(MAX_HEADING_TAG)))
            }
            _ => None,
        }
    }
}

/// Split summary text on newlines and classify every line
pub fn format_summary(text: &str) -> Vec<DisplayLine> {
    text.split('\n').map(DisplayLine::parse).collect()
}

/// Render display lines as an HTML fragment. Line text is escaped.
pub fn render_html(lines: &[DisplayLine]) -> String {
    let mut out = String::new();
    for line in lines {
        let rendered = match line {
            DisplayLine::Header { text, .. } => {
                let tag = line.heading_tag().unwrap_or_else(|| "h2".to_string());
                format!("<{tag}>{}</{tag}>", ammonia::clean_text(text))
            }
            DisplayLine::BulletItem { text } => {
                format!(
                    "<div class=\"bullet\"><span>•</span> <span>{}</span></div>",
                    ammonia::clean_text(text)
                )
            }
            DisplayLine::NumberedItem { index, text } => format!(
                "<div class=\"numbered\"><span>{}.</span> <span>{}</span></div>",
                ammonia::clean_text(index),
                ammonia::clean_text(text)
            ),
            DisplayLine::BlankSpacer => "<div class=\"spacer\"></div>".to_string(),
            DisplayLine::Paragraph { text } => format!("<p>{}</p>", ammonia::clean_text(text)),
        };
        out.push_str(&rendered);
        out.push('\n');
    }
    out
}

/// Render display lines for a terminal
pub fn render_terminal(lines: &[DisplayLine]) -> String {
    let mut out = String::new();
    for line in lines {
        let rendered = match line {
            DisplayLine::Header { level: 1, text } => text.bold().underline().to_string(),
            DisplayLine::Header { text, .. } => text.bold().to_string(),
            DisplayLine::BulletItem { text } => format!("  {} {}", "•".blue().bold(), text),
            DisplayLine::NumberedItem { index, text } => {
                format!("  {} {}", format!("{}.", index).blue().bold(), text)
            }
            DisplayLine::BlankSpacer => String::new(),
            DisplayLine::Paragraph { text } => text.clone(),
        };
        out.push_str(&rendered);
        out.push('\n');
    }
    out
}
