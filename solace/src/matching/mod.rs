// Copyright 2026 The Solace Project
// SPDX-License-Identifier: Apache-2.0

// Compatibility ranking for anonymous peer matching.
//
// Three bounded signals per candidate (text similarity of preference texts,
// behavioral similarity of mood patterns, temporal overlap) are fused with
// fixed weights, filtered by a threshold and ranked.

mod behavioral;
mod temporal;

pub use behavioral::behavioral_similarity;
pub use temporal::temporal_compatibility;

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use crate::capability::TextSimilarity;
use crate::config::MatchingConfig;
use crate::profile::{PeerProfile, ProfileStore, ProfileSummary};
use crate::signal::{clamp_unit, round3};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A scored peer eligible for introduction to the subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatibilityCandidate {
    pub peer_identifier: String,
    pub compatibility_score: f64,
    pub text_similarity: f64,
    pub behavioral_similarity: f64,
    pub temporal_compatibility: f64,
    pub shared_topics: BTreeSet<String>,
    pub profile_summary: ProfileSummary,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Ranks the peers in a store by compatibility with one subject.
pub trait CompatibilityRanker: Send + Sync {
    /// Candidates with score >= threshold, best first, at most `limit`.
    ///
    /// An unknown subject or an otherwise empty store yields an empty list.
    fn rank(
        &self,
        subject: &str,
        store: &dyn ProfileStore,
        limit: usize,
        config: &MatchingConfig,
    ) -> Vec<CompatibilityCandidate>;
}

// ---------------------------------------------------------------------------
// Default implementation
// ---------------------------------------------------------------------------

pub struct DefaultCompatibilityRanker {
    similarity: Arc<dyn TextSimilarity>,
}

impl DefaultCompatibilityRanker {
    pub fn new(similarity: Arc<dyn TextSimilarity>) -> Self {
        Self { similarity }
    }

    fn score_candidate(
        &self,
        subject: &PeerProfile,
        peer: &PeerProfile,
        config: &MatchingConfig,
    ) -> (f64, CompatibilityCandidate) {
        let text = match self
            .similarity
            .similarity(&subject.preference_text, &peer.preference_text)
        {
            Ok(v) => clamp_unit(v),
            Err(e) => {
                tracing::warn!(
                    peer = %peer.commitment,
                    error = %e,
                    "text similarity failed, scoring candidate with 0"
                );
                0.0
            }
        };
        let behavioral = behavioral_similarity(&subject.mood_stats, &peer.mood_stats, config);
        let temporal = clamp_unit(temporal_compatibility(
            &subject.preferences.preferred_times,
            &peer.preferences.preferred_times,
            config,
        ));

        let combined = clamp_unit(
            text * config.text_weight
                + behavioral * config.behavioral_weight
                + temporal * config.temporal_weight,
        );

        let shared_topics = subject
            .topic_tokens()
            .intersection(&peer.topic_tokens())
            .cloned()
            .collect();

        let candidate = CompatibilityCandidate {
            peer_identifier: peer.commitment.clone(),
            compatibility_score: round3(combined),
            text_similarity: round3(text),
            behavioral_similarity: round3(behavioral),
            temporal_compatibility: round3(temporal),
            shared_topics,
            profile_summary: peer.summary(),
        };
        (combined, candidate)
    }
}

impl CompatibilityRanker for DefaultCompatibilityRanker {
    fn rank(
        &self,
        subject: &str,
        store: &dyn ProfileStore,
        limit: usize,
        config: &MatchingConfig,
    ) -> Vec<CompatibilityCandidate> {
        let Some(subject_profile) = store.get(subject) else {
            tracing::debug!(subject = %subject, "no profile for subject, nothing to rank");
            return Vec::new();
        };
        let peers = store.all_except(subject);
        if peers.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(f64, CompatibilityCandidate)> = peers
            .iter()
            .map(|peer| self.score_candidate(&subject_profile, peer, config))
            .filter(|(combined, _)| *combined >= config.threshold)
            .collect();

        scored.sort_by(|(a_score, a), (b_score, b)| {
            b_score
                .total_cmp(a_score)
                .then_with(|| a.peer_identifier.cmp(&b.peer_identifier))
        });
        scored.truncate(limit);

        scored.into_iter().map(|(_, candidate)| candidate).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
