// Copyright 2026 The Solace Project
// SPDX-License-Identifier: Apache-2.0

use sha2::{Digest, Sha256};

use crate::recommend::RecommendationCatalog;
use crate::signal::{PhraseTier, RiskLevel};

use super::defaults::{default_hotlines, default_phrases, default_tier_weight};
use super::error::ConfigError;
use super::pattern::PhrasePattern;
use super::raw;
use super::source::ConfigSource;
use super::types::*;

/// Load and validate a solace config from the given source.
///
/// Steps:
/// 1. Read raw YAML from source
/// 2. Compute SHA256 contract hash
/// 3. Parse YAML into raw deserialization types
/// 4. Validate version, weights, thresholds and divisors
/// 5. Compile one phrase regex per tier (defaults first, then user phrases)
/// 6. Build typed Config struct
pub fn load_config(source: &dyn ConfigSource) -> Result<Config, ConfigError> {
    let raw_yaml = source.load()?;
    let contract_hash = compute_hash(&raw_yaml);

    let raw: raw::RawConfig = serde_yaml::from_str(&raw_yaml)?;

    if raw.solace != "v1" {
        return Err(ConfigError::Validation(format!(
            "unsupported contract version \"{}\", expected \"v1\"",
            raw.solace
        )));
    }

    let phrases = build_phrase_config(raw.phrases)?;
    let crisis = build_crisis_config(raw.crisis)?;
    let matching = build_matching_config(raw.matching)?;
    let engine = build_engine_config(raw.engine)?;

    Ok(Config {
        policy: PolicyConfig {
            version: raw.solace,
            phrases,
            crisis,
            matching,
        },
        runtime: RuntimeConfig {
            engine,
            environment: raw.environment.unwrap_or_default(),
        },
        contract_hash,
    })
}

pub fn compute_hash(raw_yaml: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_yaml.as_bytes());
    let hash = hasher.finalize();
    format!("sha256:{:x}", hash)
}

fn validate_unit(name: &str, v: f64) -> Result<f64, ConfigError> {
    if !v.is_finite() || !(0.0..=1.0).contains(&v) {
        return Err(ConfigError::Validation(format!(
            "{name} must be in [0.0, 1.0], got {v}"
        )));
    }
    Ok(v)
}

fn validate_positive(name: &str, v: f64) -> Result<f64, ConfigError> {
    if !v.is_finite() || v <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "{name} must be > 0, got {v}"
        )));
    }
    Ok(v)
}

fn build_phrase_config(raw: Option<raw::RawPhraseConfig>) -> Result<PhraseConfig, ConfigError> {
    let (use_defaults, mut extra, weights) = match raw {
        Some(r) => (
            r.use_defaults != Some(false),
            vec![
                (PhraseTier::High, r.high),
                (PhraseTier::Medium, r.medium),
                (PhraseTier::Low, r.low),
            ],
            r.weights,
        ),
        None => (true, Vec::new(), None),
    };

    let mut tiers = Vec::with_capacity(PhraseTier::ALL.len());
    for tier in PhraseTier::ALL {
        let mut phrases = if use_defaults {
            default_phrases(tier)
        } else {
            Vec::new()
        };
        if let Some(pos) = extra.iter().position(|(t, _)| *t == tier) {
            let (_, user) = extra.swap_remove(pos);
            for phrase in user {
                let trimmed = phrase.trim();
                if trimmed.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "{tier} phrase list contains an empty phrase"
                    )));
                }
                phrases.push(trimmed.to_lowercase());
            }
        }

        let configured = weights.as_ref().and_then(|w| match tier {
            PhraseTier::High => w.high,
            PhraseTier::Medium => w.medium,
            PhraseTier::Low => w.low,
        });
        let weight = validate_unit(
            &format!("phrases.weights.{tier}"),
            configured.unwrap_or_else(|| default_tier_weight(tier)),
        )?;

        let pattern = PhrasePattern::compile(tier, &phrases)?;
        tiers.push(TierPhrases {
            tier,
            weight,
            phrases,
            pattern,
        });
    }

    if tiers.iter().all(|t| t.phrases.is_empty()) {
        return Err(ConfigError::Validation(
            "no crisis phrases configured: set phrases.use_defaults or list phrases".into(),
        ));
    }

    Ok(PhraseConfig { tiers })
}

fn build_crisis_config(raw: Option<raw::RawCrisisConfig>) -> Result<CrisisConfig, ConfigError> {
    let raw = match raw {
        Some(r) => r,
        None => {
            return Ok(CrisisConfig {
                cooccurrence_bonus: 0.5,
                cooccurrence_min_matches: 2,
                sentiment_weight: 0.4,
                polarity_weight: 0.2,
                thresholds: RiskThresholds::default(),
                recommendations: RecommendationCatalog::new(default_hotlines()),
            })
        }
    };

    let cooccurrence_bonus =
        validate_unit("crisis.cooccurrence_bonus", raw.cooccurrence_bonus.unwrap_or(0.5))?;
    let cooccurrence_min_matches = raw.cooccurrence_min_matches.unwrap_or(2);
    if cooccurrence_min_matches < 1 {
        return Err(ConfigError::Validation(
            "crisis.cooccurrence_min_matches must be >= 1".into(),
        ));
    }
    let sentiment_weight =
        validate_unit("crisis.sentiment_weight", raw.sentiment_weight.unwrap_or(0.4))?;
    let polarity_weight =
        validate_unit("crisis.polarity_weight", raw.polarity_weight.unwrap_or(0.2))?;

    let thresholds = build_thresholds(raw.thresholds)?;

    let hotlines: Vec<String> = raw
        .hotlines
        .unwrap_or_else(default_hotlines)
        .into_iter()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .collect();
    let mut recommendations = RecommendationCatalog::new(hotlines);

    // Sorted so the first invalid key reported is stable.
    let mut overrides: Vec<(String, Vec<String>)> = raw.recommendations.into_iter().collect();
    overrides.sort_by(|a, b| a.0.cmp(&b.0));
    for (label, advice) in overrides {
        let level = match RiskLevel::from_label(&label) {
            Some(RiskLevel::Unknown) | None => {
                return Err(ConfigError::Validation(format!(
                    "unknown recommendation level \"{label}\", expected \"HIGH\", \"MEDIUM\", \"LOW\", or \"MINIMAL\""
                )));
            }
            Some(level) => level,
        };
        if advice.iter().any(|a| a.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "crisis.recommendations.{label} contains an empty entry"
            )));
        }
        recommendations = recommendations.with_advice(level, advice);
    }

    Ok(CrisisConfig {
        cooccurrence_bonus,
        cooccurrence_min_matches,
        sentiment_weight,
        polarity_weight,
        thresholds,
        recommendations,
    })
}

fn build_thresholds(raw: Option<raw::RawThresholds>) -> Result<RiskThresholds, ConfigError> {
    let defaults = RiskThresholds::default();
    let raw = match raw {
        Some(r) => r,
        None => return Ok(defaults),
    };

    let thresholds = RiskThresholds {
        high: validate_unit("crisis.thresholds.high", raw.high.unwrap_or(defaults.high))?,
        medium: validate_unit("crisis.thresholds.medium", raw.medium.unwrap_or(defaults.medium))?,
        low: validate_unit("crisis.thresholds.low", raw.low.unwrap_or(defaults.low))?,
    };

    if !(thresholds.low < thresholds.medium && thresholds.medium < thresholds.high) {
        return Err(ConfigError::Validation(format!(
            "crisis thresholds must satisfy low < medium < high, got low={} medium={} high={}",
            thresholds.low, thresholds.medium, thresholds.high
        )));
    }
    Ok(thresholds)
}

fn build_matching_config(
    raw: Option<raw::RawMatchingConfig>,
) -> Result<MatchingConfig, ConfigError> {
    let d = MatchingConfig::default();
    let raw = match raw {
        Some(r) => r,
        None => return Ok(d),
    };

    let default_limit = raw.default_limit.unwrap_or(d.default_limit);
    if default_limit < 1 {
        return Err(ConfigError::Validation(
            "matching.default_limit must be >= 1".into(),
        ));
    }

    Ok(MatchingConfig {
        text_weight: validate_unit(
            "matching.text_weight",
            raw.text_weight.unwrap_or(d.text_weight),
        )?,
        behavioral_weight: validate_unit(
            "matching.behavioral_weight",
            raw.behavioral_weight.unwrap_or(d.behavioral_weight),
        )?,
        temporal_weight: validate_unit(
            "matching.temporal_weight",
            raw.temporal_weight.unwrap_or(d.temporal_weight),
        )?,
        threshold: validate_unit("matching.threshold", raw.threshold.unwrap_or(d.threshold))?,
        default_limit,
        mood_divisor: validate_positive(
            "matching.mood_divisor",
            raw.mood_divisor.unwrap_or(d.mood_divisor),
        )?,
        variance_divisor: validate_positive(
            "matching.variance_divisor",
            raw.variance_divisor.unwrap_or(d.variance_divisor),
        )?,
        mood_weight: validate_unit(
            "matching.mood_weight",
            raw.mood_weight.unwrap_or(d.mood_weight),
        )?,
        variance_weight: validate_unit(
            "matching.variance_weight",
            raw.variance_weight.unwrap_or(d.variance_weight),
        )?,
        neutral_temporal: validate_unit(
            "matching.neutral_temporal",
            raw.neutral_temporal.unwrap_or(d.neutral_temporal),
        )?,
    })
}

fn build_engine_config(raw: Option<raw::RawEngineConfig>) -> Result<EngineConfig, ConfigError> {
    let raw = match raw {
        Some(r) => r,
        None => return Ok(EngineConfig::default()),
    };

    let capability_timeout_ms = raw
        .capability_timeout_ms
        .unwrap_or(EngineConfig::default().capability_timeout_ms);
    if capability_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "engine.capability_timeout_ms must be > 0".into(),
        ));
    }

    Ok(EngineConfig {
        capability_timeout_ms,
    })
}
