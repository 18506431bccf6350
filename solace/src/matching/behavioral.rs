// Copyright 2026 The Solace Project
// SPDX-License-Identifier: Apache-2.0

use crate::config::MatchingConfig;
use crate::profile::MoodStats;
use crate::signal::clamp_unit;

/// Similarity of two mood patterns in [0.0, 1.0].
///
/// Average mood and variance are each compared by absolute distance over a
/// fixed divisor, then blended with the mood/variance weights.
pub fn behavioral_similarity(a: &MoodStats, b: &MoodStats, config: &MatchingConfig) -> f64 {
    let mood = (1.0 - (a.avg_mood - b.avg_mood).abs() / config.mood_divisor).max(0.0);
    let variance =
        (1.0 - (a.mood_variance - b.mood_variance).abs() / config.variance_divisor).max(0.0);
    clamp_unit(mood * config.mood_weight + variance * config.variance_weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(avg: f64, variance: f64) -> MoodStats {
        MoodStats {
            avg_mood: avg,
            mood_variance: variance,
            crisis_episode_count: 0,
        }
    }

    fn sim(a: MoodStats, b: MoodStats) -> f64 {
        behavioral_similarity(&a, &b, &MatchingConfig::default())
    }

    #[test]
    fn identical_patterns_score_one() {
        assert_eq!(sim(stats(6.0, 1.0), stats(6.0, 1.0)), 1.0);
    }

    #[test]
    fn one_point_mood_gap_scores_point_eight_six() {
        let s = sim(stats(6.0, 1.0), stats(7.0, 1.0));
        assert!((s - 0.86).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn far_apart_patterns_floor_at_zero() {
        // mood gap 9 > 5 and variance gap 4 > 2: both terms floor at 0
        assert_eq!(sim(stats(1.0, 0.0), stats(10.0, 4.0)), 0.0);
    }

    #[test]
    fn variance_gap_only_costs_variance_weight() {
        // variance gap 2 zeroes variance similarity, mood identical
        let s = sim(stats(5.0, 0.0), stats(5.0, 2.0));
        assert!((s - 0.7).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn similarity_is_symmetric() {
        let a = stats(3.2, 1.4);
        let b = stats(7.9, 0.3);
        assert_eq!(sim(a, b), sim(b, a));
    }
}
