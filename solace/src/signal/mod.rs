// Copyright 2026 The Solace Project
// SPDX-License-Identifier: Apache-2.0

// Signal types for the crisis engine.
//
// The keyword extractor and the sentiment capability each emit a bounded
// observation. The risk combiner fuses them into a CrisisAssessment that
// carries the discrete risk level and the advice to show.

pub mod combiner;
pub mod extractor;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::capability::CapabilityError;

/// Shown when an assessment could not be produced.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Analysis failed, please try again.";

// ---------------------------------------------------------------------------
// Phrase tiers
// ---------------------------------------------------------------------------

/// Severity bucket of a crisis phrase. Ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhraseTier {
    High,
    Medium,
    Low,
}

impl PhraseTier {
    pub const ALL: [PhraseTier; 3] = [PhraseTier::High, PhraseTier::Medium, PhraseTier::Low];
}

impl std::fmt::Display for PhraseTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhraseTier::High => write!(f, "high"),
            PhraseTier::Medium => write!(f, "medium"),
            PhraseTier::Low => write!(f, "low"),
        }
    }
}

/// Outcome of scanning one normalized text against the tier dictionaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordMatchResult {
    /// Matched occurrences per tier, in text order. Every tier is present.
    pub matches: BTreeMap<PhraseTier, Vec<String>>,
    pub total_matches: usize,
    /// Tier-weighted score with co-occurrence bonus, in [0.0, 1.0].
    pub score: f64,
}

impl KeywordMatchResult {
    pub fn empty() -> Self {
        Self {
            matches: PhraseTier::ALL.iter().map(|t| (*t, Vec::new())).collect(),
            total_matches: 0,
            score: 0.0,
        }
    }

    pub fn tier_matches(&self, tier: PhraseTier) -> &[String] {
        self.matches.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }
}

// ---------------------------------------------------------------------------
// Sentiment
// ---------------------------------------------------------------------------

/// Valence reading supplied by a sentiment capability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentReading {
    /// Overall valence in [-1.0, 1.0].
    pub compound: f64,
    /// In [-1.0, 1.0].
    pub polarity: f64,
    /// In [0.0, 1.0].
    pub subjectivity: f64,
}

impl SentimentReading {
    /// Construct a reading with every field clamped into range.
    ///
    /// NaN clamps to 0.0; infinities clamp to the nearest bound.
    pub fn new(compound: f64, polarity: f64, subjectivity: f64) -> Self {
        Self {
            compound: clamp_range(compound, -1.0, 1.0),
            polarity: clamp_range(polarity, -1.0, 1.0),
            subjectivity: clamp_range(subjectivity, 0.0, 1.0),
        }
    }

    pub fn neutral() -> Self {
        Self {
            compound: 0.0,
            polarity: 0.0,
            subjectivity: 0.0,
        }
    }

    /// Reject readings an external backend produced out of range.
    pub fn validate(&self) -> Result<(), CapabilityError> {
        let checks = [
            ("compound", self.compound, -1.0, 1.0),
            ("polarity", self.polarity, -1.0, 1.0),
            ("subjectivity", self.subjectivity, 0.0, 1.0),
        ];
        for (name, value, lo, hi) in checks {
            if !value.is_finite() || value < lo || value > hi {
                return Err(CapabilityError::InvalidReading(format!(
                    "{name} = {value} outside [{lo}, {hi}]"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

/// Discrete crisis risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Minimal,
    Low,
    Medium,
    High,
    /// Only carried by the failure sentinel.
    Unknown,
}

impl RiskLevel {
    pub fn needs_intervention(self) -> bool {
        matches!(self, RiskLevel::Medium | RiskLevel::High)
    }

    /// Parse the uppercase label used in YAML and datasets.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "MINIMAL" => Some(RiskLevel::Minimal),
            "LOW" => Some(RiskLevel::Low),
            "MEDIUM" => Some(RiskLevel::Medium),
            "HIGH" => Some(RiskLevel::High),
            "UNKNOWN" => Some(RiskLevel::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Minimal => write!(f, "MINIMAL"),
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
            RiskLevel::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Fused crisis decision for one text.
#[derive(Debug, Clone, Serialize)]
pub struct CrisisAssessment {
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub needs_intervention: bool,
    pub keyword_result: KeywordMatchResult,
    pub sentiment: SentimentReading,
    pub recommendations: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
    /// Commitment of the record owner, when the text came from storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub encrypted_original: bool,
    /// Why analysis failed. `Some` only on the sentinel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl CrisisAssessment {
    /// The fail-safe sentinel: UNKNOWN risk, no intervention flag, retry advice.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            risk_level: RiskLevel::Unknown,
            risk_score: 0.0,
            needs_intervention: false,
            keyword_result: KeywordMatchResult::empty(),
            sentiment: SentimentReading::neutral(),
            recommendations: vec![ANALYSIS_FAILED_MESSAGE.to_string()],
            analyzed_at: Utc::now(),
            subject: None,
            encrypted_original: false,
            failure: Some(reason.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

// ---------------------------------------------------------------------------
// Numeric helpers
// ---------------------------------------------------------------------------

/// Clamp to [0.0, 1.0]. NaN and -INFINITY clamp to 0.0; INFINITY to 1.0.
pub fn clamp_unit(v: f64) -> f64 {
    clamp_range(v, 0.0, 1.0)
}

fn clamp_range(v: f64, lo: f64, hi: f64) -> f64 {
    if v.is_nan() {
        0.0_f64.clamp(lo, hi)
    } else {
        v.clamp(lo, hi)
    }
}

/// Round to 3 decimal places.
pub fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
