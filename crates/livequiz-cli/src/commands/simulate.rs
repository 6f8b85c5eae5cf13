//! End-to-end simulation on in-memory handlers
//!
//! Opens a session for a quiz file, starts it, advances until the quiz
//! finishes, then destroys it. Every envelope that reached the server channel
//! is printed as one JSON line on stdout.

use crate::quiz_file::QuizFile;
use anyhow::{bail, Context, Result};
use clap::Args;
use livequiz_core::{ParticipantDraft, QuizConfig};
use livequiz_effects::LiveQuizEffects;
use livequiz_session::{Advance, AuthorizationReport, DestroyReport, SessionLifecycle};
use std::path::PathBuf;
use tracing::{info, warn};

/// Simulate command arguments
#[derive(Args)]
pub struct SimulateCommand {
    /// Quiz definition (TOML)
    #[arg(short, long)]
    pub quiz: PathBuf,

    /// Number of synthetic participants
    #[arg(short = 'n', long, default_value = "3")]
    pub participants: usize,
}

/// What a simulation produced
#[derive(Debug)]
pub struct SimulationOutcome {
    pub access_key: String,
    pub envelopes: Vec<String>,
    pub authorization: AuthorizationReport,
    pub destroyed: DestroyReport,
}

/// Run the simulation without printing
pub async fn simulate(cmd: &SimulateCommand, config: QuizConfig) -> Result<SimulationOutcome> {
    if cmd.participants == 0 {
        bail!("at least one participant is required");
    }

    let effects = LiveQuizEffects::in_memory();
    let quiz = QuizFile::load(&cmd.quiz)?.into_quiz(&effects).await?;
    effects.store().insert_quiz(quiz.clone()).await;

    let drafts = (1..=cmd.participants)
        .map(|i| ParticipantDraft::new(format!("Participant {i}"), format!("p{i}@livequiz.local")))
        .collect();

    let lifecycle = SessionLifecycle::new(config);
    let opened = lifecycle
        .open(&effects, Some(&quiz), drafts)
        .await
        .context("opening session")?;
    let key = opened.session.access_key.clone();
    info!(access_key = %key, quiz = %quiz.title, "session opened");

    let started = lifecycle.start(&effects, &key).await.context("starting session")?;
    if let Some(date) = started.starting_date.and_then(|t| t.to_datetime()) {
        info!(access_key = %key, started_at = %date.to_rfc3339(), "session started");
    }

    loop {
        match lifecycle
            .switch_to_next(&effects, &key)
            .await
            .context("advancing session")?
        {
            Advance::Advanced(index) => info!(access_key = %key, index, "advanced"),
            Advance::QuizFinished => break,
        }
    }

    let server = opened.session.channels().server;
    let mut envelopes = Vec::new();
    for published in effects.pubsub().history(&server).await {
        envelopes.push(published.envelope.to_json()?);
    }

    let destroyed = lifecycle.destroy(&effects, &key).await.context("destroying session")?;
    if !destroyed.authorization.is_complete() {
        warn!(access_key = %key, "lock-down incomplete");
    }

    Ok(SimulationOutcome {
        access_key: key.to_string(),
        envelopes,
        authorization: opened.authorization,
        destroyed,
    })
}

/// Handle simulate command execution
pub async fn handle_simulate_command(cmd: &SimulateCommand, config: QuizConfig) -> Result<()> {
    let outcome = simulate(cmd, config).await?;

    println!("session {}", outcome.access_key);
    for envelope in &outcome.envelopes {
        println!("{envelope}");
    }
    println!(
        "destroyed: {} participants removed, {} channels locked",
        outcome.destroyed.participants_removed,
        outcome.destroyed.authorization.granted_channels().count()
    );
    for failure in outcome
        .authorization
        .failures()
        .chain(outcome.destroyed.authorization.failures())
    {
        println!("grant failure: {failure}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn runs_every_question_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiz.toml");
        std::fs::write(
            &path,
            "title = \"sim\"\n\
             [[questions]]\ntitle = \"one\"\nanswers = [\"a\"]\n\
             [[questions]]\ntitle = \"two\"\nanswers = [\"b\"]\n",
        )
        .unwrap();

        let outcome = simulate(
            &SimulateCommand {
                quiz: path,
                participants: 2,
            },
            QuizConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.envelopes.len(), 2);
        assert!(outcome.envelopes[0].contains("\"one\""));
        assert!(outcome.envelopes[1].contains("\"two\""));
        assert!(outcome.authorization.is_complete());
        assert_eq!(outcome.destroyed.participants_removed, 2);
        assert_eq!(outcome.destroyed.authorization.outcomes.len(), 3);
    }

    #[tokio::test]
    async fn empty_quiz_fails_to_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        std::fs::write(&path, "title = \"empty\"\n").unwrap();

        let err = simulate(
            &SimulateCommand {
                quiz: path,
                participants: 1,
            },
            QuizConfig::default(),
        )
        .await
        .unwrap_err();
        assert!(format!("{err:#}").contains("no questions"));
    }
}
