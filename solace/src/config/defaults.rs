use crate::recommend::FALLBACK_HOTLINES;
use crate::signal::PhraseTier;

/// The default tier phrase lists YAML, embedded at compile time.
const DEFAULT_PHRASES_YAML: &str = include_str!("../../schema/default_phrases.yaml");

#[derive(serde::Deserialize)]
struct DefaultPhrasesYaml {
    high: Vec<String>,
    medium: Vec<String>,
    low: Vec<String>,
}

/// Parse the embedded default phrase list for one tier.
/// Panics on malformed YAML (this is our own file, checked by tests).
pub fn default_phrases(tier: PhraseTier) -> Vec<String> {
    let raw: DefaultPhrasesYaml = serde_yaml::from_str(DEFAULT_PHRASES_YAML)
        .expect("default phrases YAML is invalid");
    match tier {
        PhraseTier::High => raw.high,
        PhraseTier::Medium => raw.medium,
        PhraseTier::Low => raw.low,
    }
}

/// Default scoring weight for a tier.
pub fn default_tier_weight(tier: PhraseTier) -> f64 {
    match tier {
        PhraseTier::High => 1.0,
        PhraseTier::Medium => 0.6,
        PhraseTier::Low => 0.3,
    }
}

/// Crisis lines surfaced with every HIGH assessment unless overridden.
pub fn default_hotlines() -> Vec<String> {
    FALLBACK_HOTLINES.iter().map(|s| s.to_string()).collect()
}
