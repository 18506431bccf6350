// Copyright 2026 The Solace Project
// SPDX-License-Identifier: Apache-2.0

// Consumed capabilities: sentiment, text similarity, decryption.
//
// The engines treat every backend as potentially slow or failing. Built-in
// fallbacks cover sentiment and similarity; decryption has none because key
// management lives outside this crate.

mod sentiment;
mod similarity;

pub use sentiment::LexiconSentiment;
pub use similarity::TermCosineSimilarity;

use async_trait::async_trait;

use crate::signal::SentimentReading;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Raised by a `Decryptor` on malformed or undecryptable input.
#[derive(Debug, thiserror::Error)]
pub enum DecryptionError {
    #[error("malformed ciphertext: {0}")]
    Malformed(String),

    #[error("decryption backend failed: {0}")]
    Backend(String),
}

/// Failure of any consumed capability.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("capability unavailable: {0}")]
    Unavailable(String),

    #[error("timeout: capability exceeded {deadline_ms}ms deadline")]
    Timeout { deadline_ms: u64 },

    #[error("invalid reading: {0}")]
    InvalidReading(String),

    #[error("decryption failed: {0}")]
    Decryption(#[from] DecryptionError),
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Valence scoring for normalized text. May be remote; always awaited
/// under a deadline.
#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<SentimentReading, CapabilityError>;
}

/// Pairwise similarity of preference texts.
///
/// Must be symmetric with `similarity(a, a) == 1.0` for non-empty `a`, and
/// return values in [0.0, 1.0].
pub trait TextSimilarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> Result<f64, CapabilityError>;
}

/// Turns a stored ciphertext back into plaintext.
pub trait Decryptor: Send + Sync {
    fn decrypt(&self, ciphertext: &str) -> Result<String, DecryptionError>;
}
