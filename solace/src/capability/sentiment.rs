// Copyright 2026 The Solace Project
// SPDX-License-Identifier: Apache-2.0

//! Lexicon sentiment analyzer (fallback)
//!
//! Used when no external sentiment backend is wired. Valences are on a
//! [-4, 4] scale; the compound score is normalized into [-1, 1].

use std::collections::HashMap;

use async_trait::async_trait;

use super::{CapabilityError, SentimentAnalyzer};
use crate::signal::SentimentReading;

/// Scalar applied to a valence preceded by a negator.
const NEGATION_SCALAR: f64 = -0.74;

/// How many preceding tokens a negator reaches.
const NEGATION_WINDOW: usize = 3;

/// Added to the magnitude of a valence preceded by a booster.
const BOOSTER_INCREMENT: f64 = 0.293;

/// Normalization constant for the compound score.
const COMPOUND_ALPHA: f64 = 15.0;

const MAX_VALENCE: f64 = 4.0;

const LEXICON: &[(&str, f64)] = &[
    // positive
    ("happy", 2.7),
    ("good", 1.9),
    ("great", 3.1),
    ("love", 3.2),
    ("loved", 2.9),
    ("calm", 1.3),
    ("grateful", 2.3),
    ("hope", 1.9),
    ("hopeful", 2.3),
    ("better", 1.9),
    ("okay", 0.9),
    ("fine", 0.8),
    ("glad", 2.0),
    ("excited", 2.2),
    ("proud", 2.1),
    ("relaxed", 2.2),
    ("safe", 1.9),
    ("supported", 1.8),
    ("enjoy", 2.2),
    ("wonderful", 2.7),
    ("peaceful", 2.2),
    ("strong", 2.3),
    ("thankful", 2.3),
    ("fun", 2.3),
    // negative
    ("sad", -2.1),
    ("hopeless", -2.8),
    ("worthless", -2.3),
    ("depressed", -2.3),
    ("anxious", -1.0),
    ("worried", -1.2),
    ("stressed", -1.4),
    ("overwhelmed", -1.5),
    ("lonely", -2.0),
    ("alone", -1.0),
    ("tired", -1.0),
    ("hate", -2.7),
    ("die", -2.9),
    ("dead", -3.3),
    ("kill", -3.7),
    ("suicide", -3.5),
    ("hurt", -2.4),
    ("pain", -2.3),
    ("cry", -2.1),
    ("crying", -2.1),
    ("afraid", -2.0),
    ("scared", -1.9),
    ("angry", -2.3),
    ("awful", -2.0),
    ("terrible", -2.1),
    ("bad", -2.5),
    ("miserable", -2.2),
    ("empty", -0.8),
    ("broken", -1.6),
    ("pointless", -1.6),
    ("burden", -1.6),
    ("worst", -3.1),
    ("failure", -2.3),
    ("guilty", -1.8),
    ("ashamed", -2.1),
    ("numb", -1.1),
    ("panic", -2.3),
    ("lost", -1.3),
    ("useless", -1.8),
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "nothing", "nobody", "without", "cannot", "can't", "don't",
    "doesn't", "didn't", "isn't", "wasn't", "aren't", "won't", "nor",
];

const BOOSTERS: &[&str] = &[
    "very",
    "really",
    "so",
    "extremely",
    "incredibly",
    "totally",
    "completely",
    "absolutely",
    "deeply",
];

pub struct LexiconSentiment {
    valence: HashMap<&'static str, f64>,
}

impl LexiconSentiment {
    pub fn new() -> Self {
        Self {
            valence: LEXICON.iter().copied().collect(),
        }
    }

    /// Synchronous scoring, shared by the async trait method and benches.
    pub fn score(&self, text: &str) -> SentimentReading {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return SentimentReading::neutral();
        }

        let mut sum = 0.0;
        let mut normalized_sum = 0.0;
        let mut bearing = 0usize;

        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.valence.get(token.as_str()) else {
                continue;
            };
            let mut v = base;

            if i > 0 && BOOSTERS.contains(&tokens[i - 1].as_str()) {
                v += BOOSTER_INCREMENT * v.signum();
            }
            let window_start = i.saturating_sub(NEGATION_WINDOW);
            if tokens[window_start..i]
                .iter()
                .any(|t| NEGATORS.contains(&t.as_str()))
            {
                v *= NEGATION_SCALAR;
            }

            sum += v;
            normalized_sum += (v / MAX_VALENCE).clamp(-1.0, 1.0);
            bearing += 1;
        }

        if bearing == 0 {
            return SentimentReading::neutral();
        }

        let compound = sum / (sum * sum + COMPOUND_ALPHA).sqrt();
        let polarity = normalized_sum / bearing as f64;
        let subjectivity = bearing as f64 / tokens.len() as f64;
        SentimentReading::new(compound, polarity, subjectivity)
    }
}

impl Default for LexiconSentiment {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SentimentAnalyzer for LexiconSentiment {
    async fn analyze(&self, text: &str) -> Result<SentimentReading, CapabilityError> {
        Ok(self.score(text))
    }
}

/// Lowercased word tokens; apostrophes stay inside words ("can't").
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}
