//! CLI command handlers

pub mod channels;
pub mod config;
pub mod simulate;

use anyhow::{Context, Result};
use livequiz_core::QuizConfig;
use std::path::Path;

/// Load configuration from `path` (if any) plus `LIVEQUIZ_*` overrides
pub fn load_config(path: Option<&Path>) -> Result<QuizConfig> {
    QuizConfig::load(path).with_context(|| match path {
        Some(path) => format!("loading configuration from {}", path.display()),
        None => "loading default configuration".to_string(),
    })
}
