// Copyright 2026 The Solace Project
// SPDX-License-Identifier: Apache-2.0

// Mood history analysis.
//
// Derives the aggregate MoodStats/SessionStats stored on a peer profile,
// a per-user trend report, and anonymized community insights. Every
// function here is pure over the entries it is given; fetching history is
// the caller's job.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::{MoodStats, SessionStats};
use crate::recommend::FALLBACK_HOTLINES;
use crate::signal::RiskLevel;

/// How many recent entries feed `MoodStats`.
pub const MOOD_STATS_WINDOW: usize = 30;

/// Scores at or below this count as a low-mood episode.
pub const LOW_MOOD_THRESHOLD: f64 = 3.0;

/// Minimum entries before community insights are reported.
pub const COMMUNITY_MIN_ENTRIES: usize = 10;

/// Slope magnitude (mood points per day) separating a trend from stable.
const TREND_SLOPE_EPSILON: f64 = 0.01;

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// One logged mood check-in. Scores are on a 1-10 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub commitment: String,
    pub score: f64,
    #[serde(default)]
    pub crisis_flag: bool,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Profile statistics
// ---------------------------------------------------------------------------

impl MoodStats {
    /// Mean, population variance and crisis count over the most recent
    /// `MOOD_STATS_WINDOW` entries. No history yields the defaults.
    pub fn from_entries(entries: &[MoodEntry]) -> Self {
        if entries.is_empty() {
            return Self::default();
        }

        let mut recent: Vec<&MoodEntry> = entries.iter().collect();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(MOOD_STATS_WINDOW);

        let scores: Vec<f64> = recent.iter().map(|e| e.score).collect();
        let avg = mean(&scores);
        let variance = scores.iter().map(|s| (s - avg).powi(2)).sum::<f64>() / scores.len() as f64;

        Self {
            avg_mood: avg,
            mood_variance: variance,
            crisis_episode_count: recent.iter().filter(|e| e.crisis_flag).count() as u32,
        }
    }
}

impl SessionStats {
    /// Count and mean size of the sessions a user created.
    pub fn from_session_sizes(sizes: &[u32]) -> Self {
        if sizes.is_empty() {
            return Self::default();
        }
        let total: f64 = sizes.iter().map(|s| *s as f64).sum();
        Self {
            sessions_created: sizes.len() as u32,
            preferred_session_size: total / sizes.len() as f64,
        }
    }
}

// ---------------------------------------------------------------------------
// Trend report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Volatility {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecentTrend {
    Increasing,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSummary {
    /// Least-squares slope of score over time, in mood points per day.
    pub slope_per_day: f64,
    pub correlation: f64,
    pub average_mood: f64,
    pub min_mood: f64,
    pub max_mood: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternSummary {
    pub volatility: Volatility,
    /// Sample standard deviation of scores.
    pub standard_deviation: f64,
    pub best_day: Option<String>,
    pub worst_day: Option<String>,
    /// Hour of day (UTC, 0-23).
    pub best_hour: Option<u32>,
    pub worst_hour: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskTrend {
    pub crisis_rate: f64,
    pub low_mood_rate: f64,
    /// Crisis rate over the last 7 days of the window vs. the rest.
    pub recent_trend: RecentTrend,
    pub total_crisis_episodes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    /// Recent-half average minus early-half average.
    pub improvement_score: f64,
    pub early_period_avg: f64,
    pub recent_period_avg: f64,
    /// `1 / (std + 1)`; higher is steadier.
    pub consistency_score: f64,
    /// `min(n / 30, 1)`.
    pub engagement_score: f64,
}

/// Per-user trend report. Sections are `None` when history is too thin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodTrendReport {
    pub period_days: u32,
    pub total_entries: usize,
    pub direction: TrendDirection,
    pub risk_level: RiskLevel,
    pub trend: Option<TrendSummary>,
    pub patterns: Option<PatternSummary>,
    pub risk: Option<RiskTrend>,
    pub progress: Option<ProgressSummary>,
    pub recommendations: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Trend analysis
// ---------------------------------------------------------------------------

/// Analyze one user's entries inside `[now - days, now]`.
///
/// Fewer than two entries in the window yield a minimal report with
/// `InsufficientData` and `Unknown` risk.
pub fn analyze_trends(entries: &[MoodEntry], now: DateTime<Utc>, days: u32) -> MoodTrendReport {
    let cutoff = window_cutoff(now, days);
    let mut window: Vec<&MoodEntry> = entries
        .iter()
        .filter(|e| e.timestamp >= cutoff && e.timestamp <= now)
        .collect();
    window.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    if window.len() < 2 {
        return MoodTrendReport {
            period_days: days,
            total_entries: window.len(),
            direction: TrendDirection::InsufficientData,
            risk_level: RiskLevel::Unknown,
            trend: None,
            patterns: None,
            risk: None,
            progress: None,
            recommendations: vec!["Please log more mood entries for detailed analysis".to_string()],
            analyzed_at: now,
        };
    }

    let (direction, trend) = trend_summary(&window);
    let patterns = pattern_summary(&window);
    let (risk_level, risk) = risk_trend(&window);
    let progress = progress_summary(&window);
    let recommendations = trend_recommendations(direction, risk_level);

    MoodTrendReport {
        period_days: days,
        total_entries: window.len(),
        direction,
        risk_level,
        trend: Some(trend),
        patterns: Some(patterns),
        risk: Some(risk),
        progress: Some(progress),
        recommendations,
        analyzed_at: now,
    }
}

fn trend_summary(window: &[&MoodEntry]) -> (TrendDirection, TrendSummary) {
    let origin = window[0].timestamp;
    let xs: Vec<f64> = window
        .iter()
        .map(|e| (e.timestamp - origin).num_seconds() as f64 / 86_400.0)
        .collect();
    let ys: Vec<f64> = window.iter().map(|e| e.score).collect();

    let x_mean = mean(&xs);
    let y_mean = mean(&ys);
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(&ys) {
        sxy += (x - x_mean) * (y - y_mean);
        sxx += (x - x_mean).powi(2);
        syy += (y - y_mean).powi(2);
    }

    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    let correlation = if sxx > 0.0 && syy > 0.0 {
        sxy / (sxx.sqrt() * syy.sqrt())
    } else {
        0.0
    };

    let direction = if slope > TREND_SLOPE_EPSILON {
        TrendDirection::Improving
    } else if slope < -TREND_SLOPE_EPSILON {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    };

    let summary = TrendSummary {
        slope_per_day: slope,
        correlation,
        average_mood: y_mean,
        min_mood: ys.iter().copied().fold(f64::INFINITY, f64::min),
        max_mood: ys.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    };
    (direction, summary)
}

fn pattern_summary(window: &[&MoodEntry]) -> PatternSummary {
    let scores: Vec<f64> = window.iter().map(|e| e.score).collect();
    let std = sample_std(&scores);
    let volatility = if std > 2.0 {
        Volatility::High
    } else if std > 1.0 {
        Volatility::Medium
    } else {
        Volatility::Low
    };

    let by_day = group_means(window, |e| e.timestamp.weekday().num_days_from_monday());
    let by_hour = group_means(window, |e| e.timestamp.hour());

    PatternSummary {
        volatility,
        standard_deviation: std,
        best_day: extreme_key(&by_day, true).map(|d| WEEKDAYS[d as usize].to_string()),
        worst_day: extreme_key(&by_day, false).map(|d| WEEKDAYS[d as usize].to_string()),
        best_hour: extreme_key(&by_hour, true),
        worst_hour: extreme_key(&by_hour, false),
    }
}

fn risk_trend(window: &[&MoodEntry]) -> (RiskLevel, RiskTrend) {
    let n = window.len() as f64;
    let crisis_count = window.iter().filter(|e| e.crisis_flag).count();
    let crisis_rate = crisis_count as f64 / n;
    let low_mood_rate =
        window.iter().filter(|e| e.score <= LOW_MOOD_THRESHOLD).count() as f64 / n;

    let latest = window[window.len() - 1].timestamp;
    let recent_cutoff = latest - Duration::days(7);
    let (recent, older): (Vec<&&MoodEntry>, Vec<&&MoodEntry>) =
        window.iter().partition(|e| e.timestamp >= recent_cutoff);
    let rate = |part: &[&&MoodEntry]| {
        if part.is_empty() {
            0.0
        } else {
            part.iter().filter(|e| e.crisis_flag).count() as f64 / part.len() as f64
        }
    };
    let recent_rate = rate(&recent);
    let older_rate = rate(&older);

    let level = if crisis_rate > 0.3 || recent_rate > 0.4 {
        RiskLevel::High
    } else if crisis_rate > 0.1 || low_mood_rate > 0.4 {
        RiskLevel::Medium
    } else if low_mood_rate > 0.2 {
        RiskLevel::Low
    } else {
        RiskLevel::Minimal
    };

    let risk = RiskTrend {
        crisis_rate,
        low_mood_rate,
        recent_trend: if recent_rate > older_rate {
            RecentTrend::Increasing
        } else {
            RecentTrend::Stable
        },
        total_crisis_episodes: crisis_count,
    };
    (level, risk)
}

fn progress_summary(window: &[&MoodEntry]) -> ProgressSummary {
    let scores: Vec<f64> = window.iter().map(|e| e.score).collect();
    let mid = scores.len() / 2;
    let early = mean(&scores[..mid]);
    let recent = mean(&scores[mid..]);

    ProgressSummary {
        improvement_score: recent - early,
        early_period_avg: early,
        recent_period_avg: recent,
        consistency_score: 1.0 / (sample_std(&scores) + 1.0),
        engagement_score: (scores.len() as f64 / 30.0).min(1.0),
    }
}

fn trend_recommendations(direction: TrendDirection, risk: RiskLevel) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    match direction {
        TrendDirection::Improving => {
            out.push("Great progress! Continue with current strategies".into());
            out.push("Consider sharing your success with the community".into());
        }
        TrendDirection::Declining => {
            out.push("Consider reaching out for additional support".into());
            out.push("Review recent changes that might be affecting your mood".into());
        }
        TrendDirection::Stable | TrendDirection::InsufficientData => {
            out.push("Your mood appears stable - maintain current routine".into());
        }
    }
    match risk {
        RiskLevel::High => {
            out.push("High risk detected - please consider professional support".into());
            out.push(format!("Crisis resources: {}", FALLBACK_HOTLINES.join(" / ")));
        }
        RiskLevel::Medium => {
            out.push("Increased support recommended - engage with community".into());
            out.push("Consider scheduling regular check-ins with support network".into());
        }
        _ => {}
    }
    out
}

// ---------------------------------------------------------------------------
// Community insights
// ---------------------------------------------------------------------------

/// Score buckets: excellent >= 8, good [6, 8), moderate [4, 6), low [2, 4),
/// crisis < 2.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MoodDistribution {
    pub excellent: usize,
    pub good: usize,
    pub moderate: usize,
    pub low: usize,
    pub crisis: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunityInsights {
    pub period_days: u32,
    pub total_entries: usize,
    pub average_mood: f64,
    pub distribution: MoodDistribution,
    pub crisis_rate: f64,
    pub active_users: usize,
    pub insights: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Anonymized aggregate over every user's entries in `[now - days, now]`.
///
/// Returns `None` below `COMMUNITY_MIN_ENTRIES` entries.
pub fn community_insights(
    entries: &[MoodEntry],
    now: DateTime<Utc>,
    days: u32,
) -> Option<CommunityInsights> {
    let cutoff = window_cutoff(now, days);
    let window: Vec<&MoodEntry> = entries
        .iter()
        .filter(|e| e.timestamp >= cutoff && e.timestamp <= now)
        .collect();
    if window.len() < COMMUNITY_MIN_ENTRIES {
        return None;
    }

    let scores: Vec<f64> = window.iter().map(|e| e.score).collect();
    let average_mood = mean(&scores);
    let crisis_rate = window.iter().filter(|e| e.crisis_flag).count() as f64 / window.len() as f64;

    let mut distribution = MoodDistribution::default();
    for s in &scores {
        match *s {
            s if s >= 8.0 => distribution.excellent += 1,
            s if s >= 6.0 => distribution.good += 1,
            s if s >= 4.0 => distribution.moderate += 1,
            s if s >= 2.0 => distribution.low += 1,
            _ => distribution.crisis += 1,
        }
    }

    let active_users = window
        .iter()
        .map(|e| e.commitment.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    let mut insights = Vec::new();
    if average_mood >= 6.0 {
        insights.push("Community mood is generally positive this week".to_string());
    } else if average_mood <= 4.0 {
        insights.push("Community may benefit from additional support resources".to_string());
    } else {
        insights.push("Community mood is moderate - mixed experiences reported".to_string());
    }
    if crisis_rate > 0.15 {
        insights.push(
            "Higher than usual crisis indicators - community support is important".to_string(),
        );
    } else if crisis_rate < 0.05 {
        insights.push("Low crisis indicators - community appears stable".to_string());
    }

    Some(CommunityInsights {
        period_days: days,
        total_entries: window.len(),
        average_mood,
        distribution,
        crisis_rate,
        active_users,
        insights,
        generated_at: now,
    })
}

// ---------------------------------------------------------------------------
// Numeric helpers
// ---------------------------------------------------------------------------

/// Start of the `days`-long window ending at `now`. A window reaching past
/// the representable range starts at the earliest instant.
fn window_cutoff(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    Duration::try_days(i64::from(days))
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

fn group_means<F>(window: &[&MoodEntry], key: F) -> BTreeMap<u32, f64>
where
    F: Fn(&MoodEntry) -> u32,
{
    let mut acc: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for e in window {
        let slot = acc.entry(key(e)).or_insert((0.0, 0));
        slot.0 += e.score;
        slot.1 += 1;
    }
    acc.into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}

/// Key of the highest (or lowest) mean; the smallest key wins ties.
fn extreme_key(means: &BTreeMap<u32, f64>, highest: bool) -> Option<u32> {
    let mut best: Option<(u32, f64)> = None;
    for (&k, &v) in means {
        let better = match best {
            None => true,
            Some((_, b)) if highest => v > b,
            Some((_, b)) => v < b,
        };
        if better {
            best = Some((k, v));
        }
    }
    best.map(|(k, _)| k)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Monday 2026-03-02 09:00 UTC.
    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    fn entry(day: i64, score: f64, crisis: bool) -> MoodEntry {
        MoodEntry {
            commitment: "c1".to_string(),
            score,
            crisis_flag: crisis,
            timestamp: base() + Duration::days(day),
        }
    }

    fn daily(scores: &[f64]) -> Vec<MoodEntry> {
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| entry(i as i64, *s, false))
            .collect()
    }

    fn report(entries: &[MoodEntry]) -> MoodTrendReport {
        analyze_trends(entries, base() + Duration::days(20), 30)
    }

    // ---------------------------------------------------------------
    // MoodStats / SessionStats
    // ---------------------------------------------------------------

    #[test]
    fn empty_history_uses_default_stats() {
        assert_eq!(MoodStats::from_entries(&[]), MoodStats::default());
        assert_eq!(MoodStats::default().avg_mood, 5.0);
    }

    #[test]
    fn mood_stats_use_population_variance() {
        let mut entries = daily(&[4.0, 6.0]);
        entries[1].crisis_flag = true;
        let stats = MoodStats::from_entries(&entries);
        assert_eq!(stats.avg_mood, 5.0);
        assert_eq!(stats.mood_variance, 1.0);
        assert_eq!(stats.crisis_episode_count, 1);
    }

    #[test]
    fn mood_stats_only_consider_most_recent_thirty() {
        // 10 old entries at score 1, then 30 recent at score 8
        let mut entries: Vec<MoodEntry> = (0..10).map(|d| entry(d, 1.0, true)).collect();
        entries.extend((10..40).map(|d| entry(d, 8.0, false)));
        let stats = MoodStats::from_entries(&entries);
        assert_eq!(stats.avg_mood, 8.0);
        assert_eq!(stats.mood_variance, 0.0);
        assert_eq!(stats.crisis_episode_count, 0);
    }

    #[test]
    fn session_stats_defaults_and_mean() {
        assert_eq!(SessionStats::from_session_sizes(&[]), SessionStats::default());
        assert_eq!(SessionStats::default().preferred_session_size, 4.0);

        let stats = SessionStats::from_session_sizes(&[3, 5, 7]);
        assert_eq!(stats.sessions_created, 3);
        assert_eq!(stats.preferred_session_size, 5.0);
    }

    // ---------------------------------------------------------------
    // Trend report
    // ---------------------------------------------------------------

    #[test]
    fn fewer_than_two_entries_is_insufficient() {
        let r = report(&daily(&[5.0]));
        assert_eq!(r.direction, TrendDirection::InsufficientData);
        assert_eq!(r.risk_level, RiskLevel::Unknown);
        assert!(r.trend.is_none());
        assert_eq!(r.total_entries, 1);
        assert_eq!(
            r.recommendations,
            vec!["Please log more mood entries for detailed analysis"]
        );
    }

    #[test]
    fn oversized_window_covers_whole_history() {
        let now = base() + Duration::days(1);
        let entries = vec![entry(0, 5.0, false), entry(1, 6.0, false)];

        for days in [u32::MAX, 100_000_000] {
            let r = analyze_trends(&entries, now, days);
            assert_eq!(r.total_entries, 2);
            assert_eq!(r.direction, TrendDirection::Improving);
        }
        assert_eq!(window_cutoff(now, u32::MAX), DateTime::<Utc>::MIN_UTC);

        let many: Vec<MoodEntry> = (0..10).map(|d| entry(-d, 5.0, false)).collect();
        let c = community_insights(&many, now, u32::MAX).unwrap();
        assert_eq!(c.total_entries, 10);
    }

    #[test]
    fn entries_outside_window_are_ignored() {
        let mut entries = daily(&[5.0, 6.0]);
        entries.push(MoodEntry {
            timestamp: base() - Duration::days(60),
            ..entry(0, 1.0, true)
        });
        let r = report(&entries);
        assert_eq!(r.total_entries, 2);
        assert_eq!(r.risk.unwrap().total_crisis_episodes, 0);
    }

    #[test]
    fn rising_scores_are_improving() {
        let r = report(&daily(&[3.0, 4.0, 5.0, 6.0, 7.0]));
        assert_eq!(r.direction, TrendDirection::Improving);
        let trend = r.trend.unwrap();
        assert!((trend.slope_per_day - 1.0).abs() < 1e-9);
        assert!((trend.correlation - 1.0).abs() < 1e-9);
        assert_eq!(trend.min_mood, 3.0);
        assert_eq!(trend.max_mood, 7.0);
        assert_eq!(
            r.recommendations[0],
            "Great progress! Continue with current strategies"
        );
    }

    #[test]
    fn falling_scores_are_declining() {
        let r = report(&daily(&[8.0, 7.0, 6.0, 5.0]));
        assert_eq!(r.direction, TrendDirection::Declining);
        assert!(r
            .recommendations
            .contains(&"Consider reaching out for additional support".to_string()));
    }

    #[test]
    fn flat_scores_are_stable() {
        let r = report(&daily(&[6.0, 6.0, 6.0]));
        assert_eq!(r.direction, TrendDirection::Stable);
        let trend = r.trend.unwrap();
        assert_eq!(trend.slope_per_day, 0.0);
        assert_eq!(trend.correlation, 0.0);
        assert_eq!(r.patterns.unwrap().volatility, Volatility::Low);
    }

    #[test]
    fn volatility_from_sample_std() {
        let r = report(&daily(&[1.0, 9.0, 1.0, 9.0]));
        let p = r.patterns.unwrap();
        assert_eq!(p.volatility, Volatility::High);
        assert!(p.standard_deviation > 2.0);
    }

    #[test]
    fn best_and_worst_weekday_and_hour() {
        // Monday 8, Tuesday 3, Wednesday 5
        let r = report(&daily(&[8.0, 3.0, 5.0]));
        let p = r.patterns.unwrap();
        assert_eq!(p.best_day.as_deref(), Some("monday"));
        assert_eq!(p.worst_day.as_deref(), Some("tuesday"));
        assert_eq!(p.best_hour, Some(9));
        assert_eq!(p.worst_hour, Some(9));
    }

    #[test]
    fn risk_levels_follow_rates() {
        let cases: [(&[f64], RiskLevel); 3] = [
            (&[6.0, 7.0, 8.0, 6.0, 7.0], RiskLevel::Minimal),
            (&[2.0, 2.0, 5.0, 6.0, 7.0], RiskLevel::Low),
            (&[2.0, 2.0, 2.0, 6.0, 7.0], RiskLevel::Medium),
        ];
        for (scores, expected) in cases {
            assert_eq!(report(&daily(scores)).risk_level, expected, "scores {scores:?}");
        }
    }

    #[test]
    fn high_crisis_rate_is_high_risk() {
        let entries = vec![
            entry(0, 5.0, true),
            entry(1, 5.0, false),
            entry(2, 5.0, true),
            entry(3, 5.0, false),
        ];
        let r = report(&entries);
        assert_eq!(r.risk_level, RiskLevel::High);
        assert!(r
            .recommendations
            .iter()
            .any(|s| s.starts_with("Crisis resources:")));
    }

    #[test]
    fn recent_crises_mark_trend_increasing() {
        // old week calm, last week all crisis
        let mut entries: Vec<MoodEntry> = (0..5).map(|d| entry(d, 6.0, false)).collect();
        entries.extend((12..15).map(|d| entry(d, 4.0, true)));
        let r = report(&entries);
        let risk = r.risk.unwrap();
        assert_eq!(risk.recent_trend, RecentTrend::Increasing);
        assert_eq!(r.risk_level, RiskLevel::High);
    }

    #[test]
    fn progress_compares_halves() {
        let r = report(&daily(&[4.0, 4.0, 6.0, 6.0]));
        let p = r.progress.unwrap();
        assert_eq!(p.early_period_avg, 4.0);
        assert_eq!(p.recent_period_avg, 6.0);
        assert_eq!(p.improvement_score, 2.0);
        assert!((p.consistency_score - 1.0 / (1.154_700_538 + 1.0)).abs() < 1e-6);
        assert!((p.engagement_score - 4.0 / 30.0).abs() < 1e-12);
    }

    // ---------------------------------------------------------------
    // Community insights
    // ---------------------------------------------------------------

    #[test]
    fn community_needs_ten_entries() {
        let entries = daily(&[5.0; 9]);
        assert!(community_insights(&entries, base() + Duration::days(8), 30).is_none());
    }

    #[test]
    fn community_distribution_and_users() {
        let scores = [9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0, 1.5];
        let entries: Vec<MoodEntry> = scores
            .iter()
            .enumerate()
            .map(|(i, s)| MoodEntry {
                commitment: format!("user{}", i % 3),
                ..entry(0, *s, i == 0)
            })
            .collect();

        let c = community_insights(&entries, base() + Duration::days(1), 7).unwrap();
        assert_eq!(c.total_entries, 10);
        assert_eq!(
            c.distribution,
            MoodDistribution {
                excellent: 2,
                good: 2,
                moderate: 2,
                low: 2,
                crisis: 2,
            }
        );
        assert_eq!(c.active_users, 3);
        assert_eq!(c.crisis_rate, 0.1);
        // average 4.65: moderate
        assert_eq!(
            c.insights,
            vec!["Community mood is moderate - mixed experiences reported"]
        );
    }

    #[test]
    fn community_positive_and_stable() {
        let entries: Vec<MoodEntry> = (0..12).map(|d| entry(d % 3, 8.0, false)).collect();
        let c = community_insights(&entries, base() + Duration::days(3), 7).unwrap();
        assert_eq!(c.insights.len(), 2);
        assert!(c.insights[0].contains("generally positive"));
        assert!(c.insights[1].contains("Low crisis indicators"));
    }
}
