//! Quiz definition files
//!
//! ```toml
//! title = "Capitals"
//! access_key = "00aa11bb22cc33dd"   # optional
//!
//! [[questions]]
//! title = "Capital of France?"
//! answers = ["Paris", "Lyon"]
//! rank = 1                          # optional, defaults to file order
//! ```

use anyhow::{Context, Result};
use livequiz_core::effects::RandomEffects;
use livequiz_core::identifiers::ACCESS_KEY_BYTES;
use livequiz_core::{AccessKey, Question, QuestionId, Quiz, QuizId};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuizFile {
    pub title: String,
    #[serde(default)]
    pub access_key: Option<AccessKey>,
    #[serde(default)]
    pub questions: Vec<QuestionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestionEntry {
    pub title: String,
    #[serde(default)]
    pub answers: Vec<String>,
    #[serde(default)]
    pub rank: Option<i64>,
    #[serde(default)]
    pub content: Option<serde_json::Value>,
}

impl QuizFile {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("parsing quiz file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading quiz file {}", path.display()))?;
        Self::parse(&content)
    }

    /// Build the quiz, drawing ids and a missing access key from `random`
    pub async fn into_quiz<R: RandomEffects>(self, random: &R) -> Result<Quiz> {
        let access_key = match self.access_key {
            Some(key) => key,
            None => {
                let bytes: [u8; ACCESS_KEY_BYTES] = random
                    .random_bytes(ACCESS_KEY_BYTES)
                    .await
                    .try_into()
                    .map_err(|_| anyhow::anyhow!("random source returned a short buffer"))?;
                AccessKey::from_bytes(bytes)
            }
        };

        let mut questions = Vec::with_capacity(self.questions.len());
        for (position, entry) in self.questions.into_iter().enumerate() {
            let default_rank = i64::try_from(position).context("too many questions")?;
            questions.push(Question {
                id: QuestionId::from_uuid(random.random_uuid().await),
                rank: entry.rank.unwrap_or(default_rank),
                title: entry.title,
                answers: entry.answers,
                content: entry.content.unwrap_or_default(),
            });
        }

        Ok(Quiz {
            id: QuizId::from_uuid(random.random_uuid().await),
            access_key,
            title: self.title,
            questions,
        })
    }
}
