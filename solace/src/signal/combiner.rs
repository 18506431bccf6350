// Copyright 2026 The Solace Project
// SPDX-License-Identifier: Apache-2.0

// Risk combiner: fuses the keyword and sentiment signals into an assessment.

use chrono::Utc;

use crate::config::{CrisisConfig, RiskThresholds};

use super::{clamp_unit, round3, CrisisAssessment, KeywordMatchResult, RiskLevel, SentimentReading};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Fuses bounded signals into a discrete crisis assessment.
///
/// Never panics on bad input: an invalid sentiment reading yields the
/// failure sentinel.
pub trait RiskCombiner: Send + Sync {
    fn assess(
        &self,
        keywords: &KeywordMatchResult,
        sentiment: &SentimentReading,
        crisis: &CrisisConfig,
    ) -> CrisisAssessment;
}

// ---------------------------------------------------------------------------
// Default implementation
// ---------------------------------------------------------------------------

/// Additive fusion: keyword score plus the negative parts of compound and
/// polarity, capped at 1.0, then mapped through closed lower thresholds.
pub struct DefaultRiskCombiner;

impl DefaultRiskCombiner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DefaultRiskCombiner {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskCombiner for DefaultRiskCombiner {
    fn assess(
        &self,
        keywords: &KeywordMatchResult,
        sentiment: &SentimentReading,
        crisis: &CrisisConfig,
    ) -> CrisisAssessment {
        if let Err(e) = sentiment.validate() {
            tracing::warn!(error = %e, "sentiment reading rejected, returning failure sentinel");
            return CrisisAssessment::failed(e.to_string());
        }

        let sentiment_component = (-sentiment.compound).max(0.0) * crisis.sentiment_weight;
        let polarity_component = (-sentiment.polarity).max(0.0) * crisis.polarity_weight;
        let keyword_component = clamp_unit(keywords.score);

        let total = round3(clamp_unit(
            (keyword_component + sentiment_component + polarity_component).min(1.0),
        ));
        let risk_level = classify(total, &crisis.thresholds);

        CrisisAssessment {
            risk_level,
            risk_score: total,
            needs_intervention: risk_level.needs_intervention(),
            keyword_result: keywords.clone(),
            sentiment: *sentiment,
            recommendations: crisis.recommendations.for_level(risk_level),
            analyzed_at: Utc::now(),
            subject: None,
            encrypted_original: false,
            failure: None,
        }
    }
}

/// Map a fused score to a level. Bounds are inclusive, checked high to low.
pub fn classify(score: f64, thresholds: &RiskThresholds) -> RiskLevel {
    if score >= thresholds.high {
        RiskLevel::High
    } else if score >= thresholds.medium {
        RiskLevel::Medium
    } else if score >= thresholds.low {
        RiskLevel::Low
    } else {
        RiskLevel::Minimal
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
