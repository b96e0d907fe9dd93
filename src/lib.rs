//! # Magic Tutor
//!
//! Summarise articles and videos by URL using an LLM.
//!
//! ## Features
//!
//! - **Classification**: YouTube, TikTok or article, decided from the URL alone
//! - **Article extraction**: fetches the page and picks the main content block by selector priority
//! - **Pluggable collaborators**: transcripts, summarization and authentication sit behind traits
//! - **Display lines**: summaries split into typed header, bullet, numbered and paragraph lines

pub mod agent;
pub mod auth;
pub mod classify;
pub mod config;
pub mod format;
pub mod pipeline;
pub mod scraper;
pub mod server;
pub mod summary;
pub mod transcript;

pub use classify::{classify, ContentType};
pub use config::Config;
pub use format::{format_summary, DisplayLine};
pub use pipeline::{Pipeline, PipelineError};
pub use summary::{ContentRequest, ExtractedContent, SummaryResult};
