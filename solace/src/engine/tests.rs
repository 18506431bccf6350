// Copyright 2026 The Solace Project
// SPDX-License-Identifier: Apache-2.0

// Engine tests

use super::*;
use crate::capability::DecryptionError;
use crate::config::{load_config, StringSource};
use crate::recommend::HOTLINE_PREFIX;
use crate::signal::{RiskLevel, ANALYSIS_FAILED_MESSAGE};
use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// Sentiment backend returning a fixed reading.
struct FixedSentiment(SentimentReading);

#[async_trait]
impl SentimentAnalyzer for FixedSentiment {
    async fn analyze(&self, _text: &str) -> Result<SentimentReading, CapabilityError> {
        Ok(self.0)
    }
}

struct FailingSentiment;

#[async_trait]
impl SentimentAnalyzer for FailingSentiment {
    async fn analyze(&self, _text: &str) -> Result<SentimentReading, CapabilityError> {
        Err(CapabilityError::Unavailable("sentiment service down".into()))
    }
}

/// Never answers inside any sane deadline.
struct SlowSentiment;

#[async_trait]
impl SentimentAnalyzer for SlowSentiment {
    async fn analyze(&self, _text: &str) -> Result<SentimentReading, CapabilityError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(SentimentReading::neutral())
    }
}

/// Reports a compound far outside [-1, 1], bypassing the clamping constructor.
struct OutOfRangeSentiment;

#[async_trait]
impl SentimentAnalyzer for OutOfRangeSentiment {
    async fn analyze(&self, _text: &str) -> Result<SentimentReading, CapabilityError> {
        Ok(SentimentReading {
            compound: -3.0,
            polarity: 0.0,
            subjectivity: 0.0,
        })
    }
}

/// "enc:<plaintext>" decrypts to the plaintext; anything else is malformed.
struct PrefixDecryptor;

impl Decryptor for PrefixDecryptor {
    fn decrypt(&self, ciphertext: &str) -> Result<String, DecryptionError> {
        ciphertext
            .strip_prefix("enc:")
            .map(str::to_string)
            .ok_or_else(|| DecryptionError::Malformed("missing envelope".into()))
    }
}

/// Similarity that blocks its thread, to trip the ranking deadline.
struct BlockingSimilarity;

impl crate::capability::TextSimilarity for BlockingSimilarity {
    fn similarity(&self, _a: &str, _b: &str) -> Result<f64, CapabilityError> {
        std::thread::sleep(Duration::from_millis(300));
        Ok(1.0)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn config_with_timeout(timeout_ms: u64) -> Arc<Config> {
    let yaml = format!("solace: v1\nengine:\n  capability_timeout_ms: {timeout_ms}\n");
    Arc::new(load_config(&StringSource::new(yaml)).unwrap())
}

fn default_config() -> Arc<Config> {
    config_with_timeout(5000)
}

fn engine_with(
    config: Arc<Config>,
    sentiment: Arc<dyn SentimentAnalyzer>,
    decryptor: Option<Arc<dyn Decryptor>>,
) -> SupportEngine {
    SupportEngine::new_with(EngineDeps {
        config,
        normalizer: Arc::new(TextNormalizer::new()),
        extractor: Arc::new(DefaultKeywordExtractor::new()),
        combiner: Arc::new(DefaultRiskCombiner::new()),
        sentiment,
        ranker: Arc::new(DefaultCompatibilityRanker::new(Arc::new(
            TermCosineSimilarity::new(),
        ))),
        decryptor,
        profiles: Arc::new(InMemoryProfileStore::new()),
    })
}

fn neutral_engine() -> SupportEngine {
    engine_with(
        default_config(),
        Arc::new(FixedSentiment(SentimentReading::neutral())),
        None,
    )
}

fn prefs(topics: &str, times: &[&str]) -> PeerPreferences {
    PeerPreferences {
        topics: topics.to_string(),
        severity_level: "moderate".to_string(),
        age_range: "18-25".to_string(),
        preferred_times: times.iter().map(|t| t.to_string()).collect(),
    }
}

fn mood(avg: f64, variance: f64) -> MoodStats {
    MoodStats {
        avg_mood: avg,
        mood_variance: variance,
        crisis_episode_count: 0,
    }
}

// ---------------------------------------------------------------
// 1. Crisis analysis of plain text
// ---------------------------------------------------------------

#[tokio::test]
async fn high_and_medium_phrases_reach_high_risk() {
    let engine = neutral_engine();
    let a = engine.analyze_text("I feel hopeless and want to die").await;

    assert_eq!(a.risk_level, RiskLevel::High);
    assert_eq!(a.risk_score, 1.0);
    assert!(a.needs_intervention);
    assert!(a.failure.is_none());
    assert_eq!(a.keyword_result.total_matches, 2);
    assert!(a.recommendations.iter().any(|r| r.starts_with(HOTLINE_PREFIX)));
}

#[tokio::test]
async fn benign_text_is_minimal() {
    let engine = neutral_engine();
    let a = engine.analyze_text("Had a lovely walk in the park today").await;

    assert_eq!(a.risk_level, RiskLevel::Minimal);
    assert_eq!(a.risk_score, 0.0);
    assert!(!a.needs_intervention);
    assert!(!a.encrypted_original);
    assert!(a.subject.is_none());
}

#[tokio::test]
async fn negative_sentiment_lifts_low_phrase_to_medium() {
    let engine = engine_with(
        default_config(),
        Arc::new(FixedSentiment(SentimentReading::new(-0.5, -0.5, 0.8))),
        None,
    );
    // 0.3 (low) + 0.5 * 0.4 + 0.5 * 0.2
    let a = engine.analyze_text("I am sad").await;
    assert_eq!(a.risk_score, 0.6);
    assert_eq!(a.risk_level, RiskLevel::Medium);
    assert!(a.needs_intervention);
}

#[tokio::test]
async fn text_is_normalized_before_scanning() {
    let engine = neutral_engine();
    let a = engine.analyze_text("I  WANT\u{200B}   TO\tDIE").await;
    assert_eq!(a.risk_level, RiskLevel::High);
}

#[tokio::test]
async fn empty_text_is_minimal_not_an_error() {
    let engine = neutral_engine();
    let a = engine.analyze_text("").await;
    assert_eq!(a.risk_level, RiskLevel::Minimal);
    assert!(!a.is_failure());
}

#[tokio::test]
async fn lexicon_backend_end_to_end() {
    let engine = build_engine(default_config(), None);
    let a = engine
        .analyze_text("Everything is pointless. I feel worthless and hopeless.")
        .await;
    assert!(a.risk_level >= RiskLevel::Medium, "got {:?}", a.risk_level);
    assert!(a.sentiment.compound < 0.0);
}

// ---------------------------------------------------------------
// 2. Capability failures degrade to the sentinel
// ---------------------------------------------------------------

#[tokio::test]
async fn sentiment_error_yields_sentinel() {
    let engine = engine_with(default_config(), Arc::new(FailingSentiment), None);
    let a = engine.analyze_text("I want to die").await;

    assert_eq!(a.risk_level, RiskLevel::Unknown);
    assert_eq!(a.risk_score, 0.0);
    assert!(!a.needs_intervention);
    assert_eq!(a.recommendations, vec![ANALYSIS_FAILED_MESSAGE.to_string()]);
    assert!(a.failure.unwrap().contains("sentiment service down"));
}

#[tokio::test(start_paused = true)]
async fn sentiment_timeout_yields_sentinel() {
    let engine = engine_with(config_with_timeout(50), Arc::new(SlowSentiment), None);
    let a = engine.analyze_text("I want to die").await;

    assert_eq!(a.risk_level, RiskLevel::Unknown);
    assert!(a.failure.unwrap().contains("50ms"));
}

#[tokio::test]
async fn invalid_reading_yields_sentinel() {
    let engine = engine_with(default_config(), Arc::new(OutOfRangeSentiment), None);
    let a = engine.analyze_text("I am sad").await;
    assert_eq!(a.risk_level, RiskLevel::Unknown);
    assert!(a.failure.unwrap().contains("compound"));
}

// ---------------------------------------------------------------
// 3. Encrypted records
// ---------------------------------------------------------------

#[tokio::test]
async fn encrypted_record_is_decrypted_and_tagged() {
    let engine = engine_with(
        default_config(),
        Arc::new(FixedSentiment(SentimentReading::neutral())),
        Some(Arc::new(PrefixDecryptor)),
    );
    let a = engine
        .analyze_encrypted("enc:I want to die", Some("c0mm1t"))
        .await;

    assert_eq!(a.risk_level, RiskLevel::High);
    assert!(a.encrypted_original);
    assert_eq!(a.subject.as_deref(), Some("c0mm1t"));
}

#[tokio::test]
async fn malformed_ciphertext_yields_tagged_sentinel() {
    let engine = engine_with(
        default_config(),
        Arc::new(FixedSentiment(SentimentReading::neutral())),
        Some(Arc::new(PrefixDecryptor)),
    );
    let a = engine.analyze_encrypted("garbage", Some("c0mm1t")).await;

    assert_eq!(a.risk_level, RiskLevel::Unknown);
    assert!(a.encrypted_original);
    assert_eq!(a.subject.as_deref(), Some("c0mm1t"));
    assert!(a.failure.unwrap().contains("missing envelope"));
}

#[tokio::test]
async fn missing_decryptor_yields_sentinel() {
    let engine = neutral_engine();
    let a = engine.analyze_encrypted("enc:I want to die", None).await;
    assert_eq!(a.risk_level, RiskLevel::Unknown);
    assert!(a.subject.is_none());
    assert!(a.failure.unwrap().contains("no decryptor"));
}

// ---------------------------------------------------------------
// 4. Peer matching
// ---------------------------------------------------------------

#[tokio::test]
async fn matching_ranks_best_peer_first() {
    let engine = neutral_engine();
    engine
        .upsert_profile(
            "me",
            prefs("anxiety, grief", &["evening"]),
            mood(6.0, 1.0),
            SessionStats::default(),
        )
        .unwrap();
    engine
        .upsert_profile(
            "close",
            prefs("anxiety, grief", &["evening"]),
            mood(6.0, 1.0),
            SessionStats::default(),
        )
        .unwrap();
    engine
        .upsert_profile(
            "partial",
            prefs("anxiety, work", &["evening"]),
            mood(4.0, 2.0),
            SessionStats::default(),
        )
        .unwrap();

    let out = engine.find_compatible_peers("me", None).await;
    assert!(!out.is_empty());
    assert_eq!(out[0].peer_identifier, "close");
    assert_eq!(out[0].compatibility_score, 1.0);
    assert!(out.iter().all(|c| c.peer_identifier != "me"));
}

#[tokio::test]
async fn matching_honours_explicit_and_default_limits() {
    let engine = neutral_engine();
    engine
        .upsert_profile("me", prefs("anxiety", &[]), mood(5.0, 0.0), SessionStats::default())
        .unwrap();
    for i in 0..8 {
        engine
            .upsert_profile(
                &format!("peer-{i}"),
                prefs("anxiety", &[]),
                mood(5.0, 0.0),
                SessionStats::default(),
            )
            .unwrap();
    }

    assert_eq!(engine.find_compatible_peers("me", Some(2)).await.len(), 2);
    // default_limit is 5
    assert_eq!(engine.find_compatible_peers("me", None).await.len(), 5);
    assert!(engine.find_compatible_peers("me", Some(0)).await.is_empty());
}

#[tokio::test]
async fn matching_unknown_subject_is_empty() {
    let engine = neutral_engine();
    engine
        .upsert_profile("peer", prefs("anxiety", &[]), mood(5.0, 0.0), SessionStats::default())
        .unwrap();
    assert!(engine.find_compatible_peers("nobody", None).await.is_empty());
}

#[tokio::test]
async fn matching_timeout_returns_empty() {
    let engine = SupportEngine::new_with(EngineDeps {
        config: config_with_timeout(20),
        normalizer: Arc::new(TextNormalizer::new()),
        extractor: Arc::new(DefaultKeywordExtractor::new()),
        combiner: Arc::new(DefaultRiskCombiner::new()),
        sentiment: Arc::new(FixedSentiment(SentimentReading::neutral())),
        ranker: Arc::new(DefaultCompatibilityRanker::new(Arc::new(BlockingSimilarity))),
        decryptor: None,
        profiles: Arc::new(InMemoryProfileStore::new()),
    });
    engine
        .upsert_profile("me", prefs("anxiety", &[]), mood(5.0, 0.0), SessionStats::default())
        .unwrap();
    engine
        .upsert_profile("peer", prefs("anxiety", &[]), mood(5.0, 0.0), SessionStats::default())
        .unwrap();

    assert!(engine.find_compatible_peers("me", None).await.is_empty());
}

#[test]
fn upsert_rejects_empty_identifier() {
    let engine = neutral_engine();
    let err = engine
        .upsert_profile("  ", prefs("anxiety", &[]), mood(5.0, 0.0), SessionStats::default())
        .unwrap_err();
    assert!(matches!(err, ProfileError::EmptyIdentifier));
    assert!(engine.profiles().is_empty());
}
