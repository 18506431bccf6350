// Copyright 2026 The Solace Project
// SPDX-License-Identifier: Apache-2.0

use crate::recommend::RecommendationCatalog;
use crate::signal::PhraseTier;

use super::pattern::PhrasePattern;

// ---------------------------------------------------------------------------
// Top-level config (combines policy + runtime)
// ---------------------------------------------------------------------------

/// Top-level parsed and validated solace config.
#[derive(Debug)]
pub struct Config {
    /// Scoring policy: phrase tiers, fusion weights, thresholds.
    pub policy: PolicyConfig,
    /// Runtime configuration, varies by environment.
    pub runtime: RuntimeConfig,
    /// SHA256 hash of the raw YAML: "sha256:{hex}".
    pub contract_hash: String,
}

impl Config {
    pub fn version(&self) -> &str {
        &self.policy.version
    }
}

// ---------------------------------------------------------------------------
// Policy config
// ---------------------------------------------------------------------------

/// Everything that changes a score.
#[derive(Debug)]
pub struct PolicyConfig {
    /// Contract version. Always "v1".
    pub version: String,
    pub phrases: PhraseConfig,
    pub crisis: CrisisConfig,
    pub matching: MatchingConfig,
}

/// Tiered phrase dictionaries, compiled once at load.
#[derive(Debug)]
pub struct PhraseConfig {
    /// Always holds High, Medium, Low in that order.
    pub tiers: Vec<TierPhrases>,
}

impl PhraseConfig {
    pub fn tier(&self, tier: PhraseTier) -> Option<&TierPhrases> {
        self.tiers.iter().find(|t| t.tier == tier)
    }
}

/// One severity tier: its phrases, compiled pattern and scoring weight.
#[derive(Debug, Clone)]
pub struct TierPhrases {
    pub tier: PhraseTier,
    pub weight: f64,
    pub phrases: Vec<String>,
    pub pattern: PhrasePattern,
}

/// Crisis fusion knobs.
#[derive(Debug, Clone)]
pub struct CrisisConfig {
    /// Added once per sentence holding at least `cooccurrence_min_matches` hits.
    pub cooccurrence_bonus: f64,
    pub cooccurrence_min_matches: usize,
    /// Multiplier on negative compound valence.
    pub sentiment_weight: f64,
    /// Multiplier on negative polarity.
    pub polarity_weight: f64,
    pub thresholds: RiskThresholds,
    pub recommendations: RecommendationCatalog,
}

/// Closed lower bounds for each risk level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high: 0.75,
            medium: 0.45,
            low: 0.25,
        }
    }
}

/// Compatibility fusion knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchingConfig {
    pub text_weight: f64,
    pub behavioral_weight: f64,
    pub temporal_weight: f64,
    /// Candidates scoring below this are discarded.
    pub threshold: f64,
    pub default_limit: usize,
    /// Average-mood distance at which mood similarity reaches zero.
    pub mood_divisor: f64,
    /// Variance distance at which variance similarity reaches zero.
    pub variance_divisor: f64,
    pub mood_weight: f64,
    pub variance_weight: f64,
    /// Temporal score when either side has no preferred times.
    pub neutral_temporal: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            text_weight: 0.4,
            behavioral_weight: 0.4,
            temporal_weight: 0.2,
            threshold: 0.3,
            default_limit: 5,
            mood_divisor: 5.0,
            variance_divisor: 2.0,
            mood_weight: 0.7,
            variance_weight: 0.3,
            neutral_temporal: 0.5,
        }
    }
}

// ---------------------------------------------------------------------------
// Runtime config
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct RuntimeConfig {
    pub engine: EngineConfig,
    /// Environment label (e.g. "staging", "production").
    pub environment: String,
}

/// Engine runtime configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on any single sentiment call or ranking pass.
    pub capability_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capability_timeout_ms: 5000,
        }
    }
}
