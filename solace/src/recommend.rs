// Copyright 2026 The Solace Project
// SPDX-License-Identifier: Apache-2.0

// Advice shown alongside a crisis assessment, keyed by risk level.

use std::collections::BTreeMap;

use crate::config::default_hotlines;
use crate::signal::{RiskLevel, ANALYSIS_FAILED_MESSAGE};

/// Leading text of the hotline line inserted into HIGH advice.
pub const HOTLINE_PREFIX: &str = "Contact crisis helpline";

/// Rendered when no hotline is configured, so HIGH advice is never bare.
pub const FALLBACK_HOTLINES: &[&str] = &["AASRA 022-27546669", "iCall 9152987821"];

/// Ordered advice per risk level.
///
/// HIGH advice always carries a hotline line at position 1 (or 0 when the
/// HIGH list is empty). Levels without an entry fall back to MINIMAL.
#[derive(Debug, Clone)]
pub struct RecommendationCatalog {
    advice: BTreeMap<RiskLevel, Vec<String>>,
    hotlines: Vec<String>,
}

impl RecommendationCatalog {
    /// Built-in advice with the given hotlines.
    pub fn new(hotlines: Vec<String>) -> Self {
        let mut advice = BTreeMap::new();
        advice.insert(
            RiskLevel::High,
            owned(&[
                "Immediate professional intervention recommended",
                "Reach out to a trusted person right now",
            ]),
        );
        advice.insert(
            RiskLevel::Medium,
            owned(&[
                "Consider scheduling time with a counsellor",
                "Connect with supportive peers",
                "Use grounding or mindfulness techniques",
            ]),
        );
        advice.insert(
            RiskLevel::Low,
            owned(&[
                "Maintain self-care habits",
                "Track your mood regularly",
                "Stay connected with friends or support groups",
            ]),
        );
        advice.insert(
            RiskLevel::Minimal,
            owned(&[
                "Keep up your positive routines",
                "Continue monitoring your wellbeing",
            ]),
        );
        Self { advice, hotlines }
    }

    /// Replace the advice list for one level. UNKNOWN is not overridable.
    pub fn with_advice(mut self, level: RiskLevel, advice: Vec<String>) -> Self {
        if level != RiskLevel::Unknown {
            self.advice.insert(level, advice);
        }
        self
    }

    pub fn hotlines(&self) -> &[String] {
        &self.hotlines
    }

    /// The hotline line shown with HIGH advice.
    pub fn hotline_line(&self) -> String {
        let lines: Vec<&str> = if self.hotlines.is_empty() {
            FALLBACK_HOTLINES.to_vec()
        } else {
            self.hotlines.iter().map(String::as_str).collect()
        };
        format!("{HOTLINE_PREFIX} ({})", lines.join(" / "))
    }

    /// Advice for `level`, in display order.
    pub fn for_level(&self, level: RiskLevel) -> Vec<String> {
        match level {
            RiskLevel::Unknown => vec![ANALYSIS_FAILED_MESSAGE.to_string()],
            RiskLevel::High => {
                let mut list = self.advice.get(&RiskLevel::High).cloned().unwrap_or_default();
                let at = list.len().min(1);
                list.insert(at, self.hotline_line());
                list
            }
            other => self
                .advice
                .get(&other)
                .or_else(|| self.advice.get(&RiskLevel::Minimal))
                .cloned()
                .unwrap_or_default(),
        }
    }
}

impl Default for RecommendationCatalog {
    fn default() -> Self {
        Self::new(default_hotlines())
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
