// Copyright 2026 The Solace Project
// SPDX-License-Identifier: Apache-2.0

// Support engine
//
// Wires the crisis and matching pipelines together behind one async surface:
// - Normalization of incoming text
// - Keyword scan + sentiment capability (under deadline)
// - Risk fusion and recommendations
// - Optional decryption of stored text before analysis
// - Compatibility ranking over a profile snapshot (blocking pool, under deadline)
//
// No public operation here returns an error for analysis or matching: every
// capability failure degrades to the failure sentinel or an empty list and is
// logged. Raw text and plaintext never reach the logs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::capability::{
    CapabilityError, Decryptor, LexiconSentiment, SentimentAnalyzer, TermCosineSimilarity,
};
use crate::config::Config;
use crate::matching::{CompatibilityCandidate, CompatibilityRanker, DefaultCompatibilityRanker};
use crate::normalize::{Normalizer, TextNormalizer};
use crate::profile::{
    InMemoryProfileStore, MoodStats, PeerPreferences, PeerProfile, ProfileError, ProfileStore,
    SessionStats,
};
use crate::signal::combiner::{DefaultRiskCombiner, RiskCombiner};
use crate::signal::extractor::{DefaultKeywordExtractor, KeywordExtractor};
use crate::signal::{CrisisAssessment, SentimentReading};

// ---------------------------------------------------------------------------
// Request context for structured logging
// ---------------------------------------------------------------------------

struct RequestContext {
    request_id: String,
    contract_hash: String,
    started: Instant,
}

impl RequestContext {
    fn new(config: &Config) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            contract_hash: config.contract_hash.clone(),
            started: Instant::now(),
        }
    }

    fn latency_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}

// ---------------------------------------------------------------------------
// Dependencies
// ---------------------------------------------------------------------------

/// Everything the engine calls, injected at construction.
pub struct EngineDeps {
    pub config: Arc<Config>,
    pub normalizer: Arc<dyn Normalizer>,
    pub extractor: Arc<dyn KeywordExtractor>,
    pub combiner: Arc<dyn RiskCombiner>,
    pub sentiment: Arc<dyn SentimentAnalyzer>,
    pub ranker: Arc<dyn CompatibilityRanker>,
    /// `None` means encrypted analysis always yields the sentinel.
    pub decryptor: Option<Arc<dyn Decryptor>>,
    pub profiles: Arc<dyn ProfileStore>,
}

// ---------------------------------------------------------------------------
// SupportEngine
// ---------------------------------------------------------------------------

pub struct SupportEngine {
    deps: EngineDeps,
}

impl SupportEngine {
    pub fn new_with(deps: EngineDeps) -> Self {
        Self { deps }
    }

    pub fn config(&self) -> &Config {
        &self.deps.config
    }

    pub fn profiles(&self) -> &Arc<dyn ProfileStore> {
        &self.deps.profiles
    }

    fn capability_timeout(&self) -> Duration {
        Duration::from_millis(self.deps.config.runtime.engine.capability_timeout_ms)
    }

    /// Classify crisis risk in free text.
    pub async fn analyze_text(&self, text: &str) -> CrisisAssessment {
        let ctx = RequestContext::new(&self.deps.config);
        let assessment = self.assess(&ctx, text).await;
        log_assessment(&ctx, &assessment, false);
        assessment
    }

    /// Decrypt a stored record, then classify it.
    ///
    /// Decryption failure yields the sentinel. `subject` is the record
    /// owner's commitment and is copied onto the assessment.
    pub async fn analyze_encrypted(
        &self,
        ciphertext: &str,
        subject: Option<&str>,
    ) -> CrisisAssessment {
        let ctx = RequestContext::new(&self.deps.config);

        let decrypted = match &self.deps.decryptor {
            Some(decryptor) => decryptor.decrypt(ciphertext).map_err(CapabilityError::from),
            None => Err(CapabilityError::Unavailable(
                "no decryptor configured".to_string(),
            )),
        };

        let mut assessment = match decrypted {
            Ok(plaintext) => self.assess(&ctx, &plaintext).await,
            Err(e) => {
                tracing::warn!(
                    request_id = %ctx.request_id,
                    contract_hash = %ctx.contract_hash,
                    stage = "decrypt",
                    error = %e,
                    "decryption failed, returning failure sentinel"
                );
                CrisisAssessment::failed(e.to_string())
            }
        };
        assessment.subject = subject.map(str::to_string);
        assessment.encrypted_original = true;

        log_assessment(&ctx, &assessment, true);
        assessment
    }

    /// Rank compatible peers for `identifier`. `None` uses the configured
    /// default limit. Unknown identifiers, timeouts and ranking failures
    /// yield an empty list.
    pub async fn find_compatible_peers(
        &self,
        identifier: &str,
        limit: Option<usize>,
    ) -> Vec<CompatibilityCandidate> {
        let ctx = RequestContext::new(&self.deps.config);
        let limit = limit.unwrap_or(self.deps.config.policy.matching.default_limit);
        if limit == 0 {
            return Vec::new();
        }

        let ranker = Arc::clone(&self.deps.ranker);
        let profiles = Arc::clone(&self.deps.profiles);
        let config = Arc::clone(&self.deps.config);
        let subject = identifier.to_string();
        let task = tokio::task::spawn_blocking(move || {
            ranker.rank(&subject, profiles.as_ref(), limit, &config.policy.matching)
        });

        let deadline = self.capability_timeout();
        let candidates = match tokio::time::timeout(deadline, task).await {
            Ok(Ok(candidates)) => candidates,
            Ok(Err(join_err)) => {
                tracing::error!(
                    request_id = %ctx.request_id,
                    error = %join_err,
                    "ranking task failed, returning no candidates"
                );
                Vec::new()
            }
            Err(_) => {
                tracing::warn!(
                    request_id = %ctx.request_id,
                    timeout_ms = deadline.as_millis() as u64,
                    "ranking timed out, returning no candidates"
                );
                Vec::new()
            }
        };

        tracing::info!(
            request_id = %ctx.request_id,
            contract_hash = %ctx.contract_hash,
            candidates = candidates.len(),
            limit = limit,
            top_score = candidates.first().map(|c| c.compatibility_score).unwrap_or(0.0),
            latency_ms = ctx.latency_ms(),
            "peer matching complete"
        );
        candidates
    }

    /// Create or replace a peer profile.
    pub fn upsert_profile(
        &self,
        identifier: &str,
        preferences: PeerPreferences,
        mood_stats: MoodStats,
        session_stats: SessionStats,
    ) -> Result<PeerProfile, ProfileError> {
        let profile = self
            .deps
            .profiles
            .upsert(identifier, preferences, mood_stats, session_stats)?;
        tracing::debug!(profiles = self.deps.profiles.len(), "profile upserted");
        Ok(profile)
    }

    // -----------------------------------------------------------------------
    // Crisis pipeline
    // -----------------------------------------------------------------------

    async fn assess(&self, ctx: &RequestContext, text: &str) -> CrisisAssessment {
        let normalized = self.deps.normalizer.normalize(text);
        let keywords = self.deps.extractor.scan(&normalized, &self.deps.config.policy);

        let sentiment = match self.read_sentiment(ctx, &normalized).await {
            Ok(reading) => reading,
            Err(e) => return CrisisAssessment::failed(e.to_string()),
        };

        self.deps
            .combiner
            .assess(&keywords, &sentiment, &self.deps.config.policy.crisis)
    }

    async fn read_sentiment(
        &self,
        ctx: &RequestContext,
        normalized: &str,
    ) -> Result<SentimentReading, CapabilityError> {
        let deadline = self.capability_timeout();
        let result = match tokio::time::timeout(deadline, self.deps.sentiment.analyze(normalized))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(CapabilityError::Timeout {
                deadline_ms: deadline.as_millis() as u64,
            }),
        };

        if let Err(e) = &result {
            tracing::warn!(
                request_id = %ctx.request_id,
                contract_hash = %ctx.contract_hash,
                stage = "sentiment",
                error = %e,
                "sentiment capability failed, returning failure sentinel"
            );
        }
        result
    }
}

fn log_assessment(ctx: &RequestContext, assessment: &CrisisAssessment, encrypted: bool) {
    match &assessment.failure {
        Some(reason) => tracing::warn!(
            request_id = %ctx.request_id,
            contract_hash = %ctx.contract_hash,
            risk_level = %assessment.risk_level,
            encrypted = encrypted,
            reason = %reason,
            latency_ms = ctx.latency_ms(),
            "crisis analysis failed"
        ),
        None => tracing::info!(
            request_id = %ctx.request_id,
            contract_hash = %ctx.contract_hash,
            risk_level = %assessment.risk_level,
            risk_score = assessment.risk_score,
            needs_intervention = assessment.needs_intervention,
            keyword_matches = assessment.keyword_result.total_matches,
            encrypted = encrypted,
            latency_ms = ctx.latency_ms(),
            "crisis analysis complete"
        ),
    }
}

// ---------------------------------------------------------------------------
// Public factory for default engine
// ---------------------------------------------------------------------------

/// Engine with built-in sentiment/similarity backends and an in-memory
/// profile store.
pub fn build_engine(config: Arc<Config>, decryptor: Option<Arc<dyn Decryptor>>) -> SupportEngine {
    let deps = EngineDeps {
        config,
        normalizer: Arc::new(TextNormalizer::new()),
        extractor: Arc::new(DefaultKeywordExtractor::new()),
        combiner: Arc::new(DefaultRiskCombiner::new()),
        sentiment: Arc::new(LexiconSentiment::new()),
        ranker: Arc::new(DefaultCompatibilityRanker::new(Arc::new(
            TermCosineSimilarity::new(),
        ))),
        decryptor,
        profiles: Arc::new(InMemoryProfileStore::new()),
    };

    SupportEngine::new_with(deps)
}

#[cfg(test)]
mod tests;
