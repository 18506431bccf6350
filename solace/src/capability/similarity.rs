// Copyright 2026 The Solace Project
// SPDX-License-Identifier: Apache-2.0

//! Term-frequency cosine similarity (fallback)
//!
//! Texts become unigram + bigram count vectors with English stop words
//! removed; the score is their cosine.

use std::collections::HashMap;

use super::{CapabilityError, TextSimilarity};

const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "been", "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has",
    "have", "he", "her", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just",
    "me", "more", "my", "of", "on", "or", "our", "out", "she", "so", "some", "than", "that",
    "the", "their", "them", "then", "there", "these", "they", "this", "to", "up", "us", "was",
    "we", "were", "what", "when", "which", "who", "will", "with", "would", "you", "your",
];

pub struct TermCosineSimilarity;

impl TermCosineSimilarity {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TermCosineSimilarity {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSimilarity for TermCosineSimilarity {
    fn similarity(&self, a: &str, b: &str) -> Result<f64, CapabilityError> {
        if a.trim() == b.trim() && !a.trim().is_empty() {
            return Ok(1.0);
        }
        let va = term_vector(a);
        let vb = term_vector(b);
        Ok(cosine_similarity(&va, &vb).clamp(0.0, 1.0))
    }
}

/// Unigram and adjacent-bigram counts over non-stop-word tokens.
fn term_vector(text: &str) -> HashMap<String, f64> {
    let tokens: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .filter(|t| !STOP_WORDS.contains(&t.as_str()))
        .collect();

    let mut counts: HashMap<String, f64> = HashMap::new();
    for token in &tokens {
        *counts.entry(token.clone()).or_insert(0.0) += 1.0;
    }
    for pair in tokens.windows(2) {
        *counts.entry(format!("{} {}", pair[0], pair[1])).or_insert(0.0) += 1.0;
    }
    counts
}

fn cosine_similarity(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .filter_map(|(term, x)| b.get(term).map(|y| x * y))
        .sum();
    let norm_a: f64 = a.values().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.values().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
