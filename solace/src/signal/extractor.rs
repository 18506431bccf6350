// Copyright 2026 The Solace Project
// SPDX-License-Identifier: Apache-2.0

// Keyword extraction: scans normalized text against the tier dictionaries.

use crate::config::PolicyConfig;

use super::{clamp_unit, round3, KeywordMatchResult};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Converts normalized text into a tier-weighted keyword signal.
///
/// Implementations must be deterministic: scanning the same text twice
/// yields an identical result.
pub trait KeywordExtractor: Send + Sync {
    fn scan(&self, text: &str, policy: &PolicyConfig) -> KeywordMatchResult;
}

// ---------------------------------------------------------------------------
// Default implementation
// ---------------------------------------------------------------------------

pub struct DefaultKeywordExtractor;

impl DefaultKeywordExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DefaultKeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor for DefaultKeywordExtractor {
    fn scan(&self, text: &str, policy: &PolicyConfig) -> KeywordMatchResult {
        let mut result = KeywordMatchResult::empty();
        if text.trim().is_empty() {
            return result;
        }

        let mut base = 0.0;
        for tier in &policy.phrases.tiers {
            let hits = tier.pattern.find_all(text);
            base += tier.weight * hits.len() as f64;
            result.total_matches += hits.len();
            result.matches.insert(tier.tier, hits);
        }

        let crisis = &policy.crisis;
        let bonus: f64 = text
            .split(['.', '!', '?'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter(|sentence| {
                let hits: usize = policy
                    .phrases
                    .tiers
                    .iter()
                    .map(|t| t.pattern.count(sentence))
                    .sum();
                hits >= crisis.cooccurrence_min_matches
            })
            .map(|_| crisis.cooccurrence_bonus)
            .sum();

        result.score = round3(clamp_unit((base + bonus).min(1.0)));
        result
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
