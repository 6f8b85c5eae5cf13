//! Session core configuration
//!
//! Loaded from TOML, then overridden by `LIVEQUIZ_*` environment variables,
//! then validated. Every field has a default, so an empty file is valid.

pub mod validation;

use crate::effects::reliability::RetryPolicy;
use crate::envelope::QUESTION_EVENT;
use crate::errors::{QuizError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use validation::ConfigValidator;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "LIVEQUIZ_";

/// Tunables for the session lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuizConfig {
    /// Candidate keys tried before giving up on allocation
    pub allocation_attempts: u32,
    /// Upper bound on a single publish
    pub publish_timeout_ms: u32,
    /// Upper bound on a single grant call
    pub grant_timeout_ms: u32,
    /// Retries for grants failing with a transient error
    pub grant_retry_attempts: u32,
    /// Delay between grant retries
    pub grant_retry_delay_ms: u32,
    /// Event name used for question delivery
    pub question_event: String,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            allocation_attempts: 5,
            publish_timeout_ms: 5_000,
            grant_timeout_ms: 5_000,
            grant_retry_attempts: 2,
            grant_retry_delay_ms: 100,
            question_event: QUESTION_EVENT.to_string(),
        }
    }
}

impl QuizConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            QuizError::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load, apply environment overrides and validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `LIVEQUIZ_*` overrides from the process environment
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply overrides from `(name, value)` pairs; unrelated names are ignored
    pub fn merge_with_vars<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            if let Some(key) = name.strip_prefix(ENV_PREFIX) {
                self.set_from_string(&key.to_lowercase(), &value)?;
            }
        }
        Ok(())
    }

    /// Set one field from its string form
    pub fn set_from_string(&mut self, key: &str, value: &str) -> Result<()> {
        let parse = |value: &str| {
            value
                .parse::<u32>()
                .map_err(|e| QuizError::config(format!("Invalid value for {key}: {e}")))
        };
        match key {
            "allocation_attempts" => self.allocation_attempts = parse(value)?,
            "publish_timeout_ms" => self.publish_timeout_ms = parse(value)?,
            "grant_timeout_ms" => self.grant_timeout_ms = parse(value)?,
            "grant_retry_attempts" => self.grant_retry_attempts = parse(value)?,
            "grant_retry_delay_ms" => self.grant_retry_delay_ms = parse(value)?,
            "question_event" => self.question_event = value.to_string(),
            other => {
                tracing::debug!(key = other, "ignoring unknown configuration override");
            }
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let mut validator = ConfigValidator::new();
        validator
            .range("allocation_attempts", self.allocation_attempts, Some(1), None)
            .range("publish_timeout_ms", self.publish_timeout_ms, Some(1), None)
            .range("grant_timeout_ms", self.grant_timeout_ms, Some(1), None)
            .custom(
                "question_event",
                self.question_event.as_str(),
                |event: &str| !event.trim().is_empty(),
                "must not be empty",
            );

        validator.result().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            QuizError::config(messages.join("; "))
        })
    }

    /// Publish timeout as a duration
    pub fn publish_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.publish_timeout_ms))
    }

    /// Grant timeout as a duration
    pub fn grant_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.grant_timeout_ms))
    }

    /// Retry policy applied to transient grant failures
    pub fn grant_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(Duration::from_millis(u64::from(self.grant_retry_delay_ms)))
            .with_max_attempts(self.grant_retry_attempts)
    }
}
