// Copyright 2026 The Solace Project
// SPDX-License-Identifier: Apache-2.0

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use solace::config::{self, ConfigSource, FileSource, StringSource};
use solace::engine::{self, SupportEngine};
use solace::mood::{self, MoodEntry};
use solace::profile::{MoodStats, PeerPreferences, SessionStats};

#[derive(Parser)]
#[command(name = "solace", about = "Crisis-risk assessment and anonymous peer matching")]
struct Cli {
    /// Path to the solace.yaml config file (built-in defaults when omitted)
    #[arg(long, global = true, env = "SOLACE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assess crisis risk in a text and print the assessment as JSON
    Analyze {
        /// Text to analyze; read from stdin when omitted
        #[arg(long)]
        text: Option<String>,
    },
    /// Rank compatible peers from a profile fixture file
    Match {
        /// YAML list of profiles
        #[arg(long)]
        profiles: PathBuf,
        /// Identifier of the profile to match for
        #[arg(long)]
        subject: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Mood trend report for one user from a YAML list of mood entries
    Trends {
        #[arg(long)]
        entries: PathBuf,
        #[arg(long)]
        subject: String,
        #[arg(long, default_value_t = 30)]
        days: u32,
        /// Print anonymized community insights over all entries instead
        #[arg(long, default_value_t = false)]
        community: bool,
    },
}

/// One entry of a `match --profiles` fixture file.
#[derive(Deserialize)]
struct ProfileFixture {
    id: String,
    #[serde(default)]
    preferences: PeerPreferences,
    #[serde(default)]
    mood_stats: Option<MoodStats>,
    /// Raw check-ins; used to derive mood stats when `mood_stats` is absent.
    #[serde(default)]
    moods: Vec<MoodEntry>,
    #[serde(default)]
    session_sizes: Vec<u32>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .json()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let source: Box<dyn ConfigSource> = match &cli.config {
        Some(path) => Box::new(FileSource { path: path.clone() }),
        None => Box::new(StringSource::new("solace: v1\n")),
    };
    let config = match config::load_config(source.as_ref()) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            tracing::error!(source = %source.describe(), "failed to load config: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        version = %config.policy.version,
        environment = %config.runtime.environment,
        capability_timeout_ms = config.runtime.engine.capability_timeout_ms,
        contract_hash = %config.contract_hash,
        "config loaded"
    );

    let engine = engine::build_engine(config, None);

    let result = match cli.command {
        Command::Analyze { text } => analyze(&engine, text).await,
        Command::Match {
            profiles,
            subject,
            limit,
        } => match_peers(&engine, &profiles, &subject, limit).await,
        Command::Trends {
            entries,
            subject,
            days,
            community,
        } => trends(&entries, &subject, days, community),
    };

    match result {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}

async fn analyze(engine: &SupportEngine, text: Option<String>) -> Result<String, String> {
    let text = match text {
        Some(t) => t,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("failed to read stdin: {e}"))?;
            buf
        }
    };

    let assessment = engine.analyze_text(&text).await;
    to_json(&assessment)
}

async fn match_peers(
    engine: &SupportEngine,
    path: &Path,
    subject: &str,
    limit: Option<usize>,
) -> Result<String, String> {
    let fixtures: Vec<ProfileFixture> = read_yaml(path)?;

    for fixture in fixtures {
        let mood_stats = fixture
            .mood_stats
            .unwrap_or_else(|| MoodStats::from_entries(&fixture.moods));
        let session_stats = SessionStats::from_session_sizes(&fixture.session_sizes);
        engine
            .upsert_profile(&fixture.id, fixture.preferences, mood_stats, session_stats)
            .map_err(|e| format!("invalid profile in {}: {e}", path.display()))?;
    }

    if engine.profiles().get(subject).is_none() {
        return Err(format!("no profile \"{subject}\" in {}", path.display()));
    }

    let candidates = engine.find_compatible_peers(subject, limit).await;
    to_json(&candidates)
}

fn trends(path: &Path, subject: &str, days: u32, community: bool) -> Result<String, String> {
    let entries: Vec<MoodEntry> = read_yaml(path)?;
    let now = Utc::now();

    if community {
        return match mood::community_insights(&entries, now, days) {
            Some(insights) => to_json(&insights),
            None => Err(format!(
                "community insights need at least {} entries in the window",
                mood::COMMUNITY_MIN_ENTRIES
            )),
        };
    }

    let own: Vec<MoodEntry> = entries
        .into_iter()
        .filter(|e| e.commitment == subject)
        .collect();
    to_json(&mood::analyze_trends(&own, now, days))
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    serde_yaml::from_str(&content).map_err(|e| format!("failed to parse {}: {e}", path.display()))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("failed to serialize output: {e}"))
}
