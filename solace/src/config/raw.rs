// Raw YAML deserialization types (internal)
// These are separate from the public Config structs because:
// 1. phrase lists are compiled into regexes, which are not Deserialize
// 2. every numeric knob is optional here and defaulted + validated in the loader
// 3. keeps the public API free of Option noise

use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    pub solace: String,
    pub phrases: Option<RawPhraseConfig>,
    pub crisis: Option<RawCrisisConfig>,
    pub matching: Option<RawMatchingConfig>,
    pub engine: Option<RawEngineConfig>,
    pub environment: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawPhraseConfig {
    /// If false, skip embedding the default tier phrase lists. Default: true.
    pub use_defaults: Option<bool>,
    #[serde(default)]
    pub high: Vec<String>,
    #[serde(default)]
    pub medium: Vec<String>,
    #[serde(default)]
    pub low: Vec<String>,
    pub weights: Option<RawTierWeights>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTierWeights {
    pub high: Option<f64>,
    pub medium: Option<f64>,
    pub low: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawCrisisConfig {
    pub cooccurrence_bonus: Option<f64>,
    pub cooccurrence_min_matches: Option<usize>,
    pub sentiment_weight: Option<f64>,
    pub polarity_weight: Option<f64>,
    pub thresholds: Option<RawThresholds>,
    pub hotlines: Option<Vec<String>>,
    /// Per-level advice overrides, keyed by "HIGH" / "MEDIUM" / "LOW" / "MINIMAL".
    #[serde(default)]
    pub recommendations: HashMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawThresholds {
    pub high: Option<f64>,
    pub medium: Option<f64>,
    pub low: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawMatchingConfig {
    pub text_weight: Option<f64>,
    pub behavioral_weight: Option<f64>,
    pub temporal_weight: Option<f64>,
    pub threshold: Option<f64>,
    pub default_limit: Option<usize>,
    pub mood_divisor: Option<f64>,
    pub variance_divisor: Option<f64>,
    pub mood_weight: Option<f64>,
    pub variance_weight: Option<f64>,
    pub neutral_temporal: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawEngineConfig {
    pub capability_timeout_ms: Option<u64>,
}
