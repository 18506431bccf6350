// Copyright 2026 The Solace Project
// SPDX-License-Identifier: Apache-2.0

// Peer profile storage for compatibility matching.
//
// Profiles are keyed by an anonymous commitment and carry only preference
// text and aggregate mood/session statistics. The store is the single owner
// of profile lifetime: records change only through upsert, record_activity
// and remove.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("profile identifier must not be empty")]
    EmptyIdentifier,
}

// ---------------------------------------------------------------------------
// Profile types
// ---------------------------------------------------------------------------

/// Matching preferences as supplied by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeerPreferences {
    /// Comma-separated topics, e.g. "anxiety, exam stress".
    pub topics: String,
    pub severity_level: String,
    pub age_range: String,
    /// Time slots such as "morning", "late_night".
    pub preferred_times: BTreeSet<String>,
}

/// Aggregate mood statistics over recent history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodStats {
    pub avg_mood: f64,
    pub mood_variance: f64,
    pub crisis_episode_count: u32,
}

impl Default for MoodStats {
    fn default() -> Self {
        Self {
            avg_mood: 5.0,
            mood_variance: 0.0,
            crisis_episode_count: 0,
        }
    }
}

/// Aggregate peer-session participation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionStats {
    pub sessions_created: u32,
    pub preferred_session_size: f64,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self {
            sessions_created: 0,
            preferred_session_size: 4.0,
        }
    }
}

/// A stored peer profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeerProfile {
    pub commitment: String,
    /// Derived from `preferences`; the unit fed to text similarity.
    pub preference_text: String,
    pub preferences: PeerPreferences,
    pub mood_stats: MoodStats,
    pub session_stats: SessionStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_activity: Option<DateTime<Utc>>,
}

impl PeerProfile {
    /// Topic tokens: comma-split, trimmed, lowercased, empty ones dropped.
    pub fn topic_tokens(&self) -> BTreeSet<String> {
        topic_tokens(&self.preferences.topics)
    }

    /// Anonymous summary safe to show another user.
    pub fn summary(&self) -> ProfileSummary {
        let prefs = &self.preferences;
        ProfileSummary {
            topics: non_empty_or(&prefs.topics, "General support"),
            severity_level: non_empty_or(&prefs.severity_level, "moderate"),
            age_range: non_empty_or(&prefs.age_range, "25-35"),
            active_times: prefs.preferred_times.iter().cloned().collect(),
            avg_mood: (self.mood_stats.avg_mood * 10.0).round() / 10.0,
            sessions_created: self.session_stats.sessions_created,
        }
    }
}

/// Display summary attached to a compatibility candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub topics: String,
    pub severity_level: String,
    pub age_range: String,
    pub active_times: Vec<String>,
    /// Rounded to 1 decimal.
    pub avg_mood: f64,
    pub sessions_created: u32,
}

/// Build the similarity text: topics, "severity X", "age Y", "active t1 t2",
/// empty parts omitted, lowercased.
pub fn preference_text(prefs: &PeerPreferences) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(4);

    let topics = prefs.topics.trim();
    if !topics.is_empty() {
        parts.push(topics.to_string());
    }
    let severity = prefs.severity_level.trim();
    if !severity.is_empty() {
        parts.push(format!("severity {severity}"));
    }
    let age = prefs.age_range.trim();
    if !age.is_empty() {
        parts.push(format!("age {age}"));
    }
    let times: Vec<&str> = prefs
        .preferred_times
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if !times.is_empty() {
        parts.push(format!("active {}", times.join(" ")));
    }

    parts.join(" ").to_lowercase()
}

pub fn topic_tokens(topics: &str) -> BTreeSet<String> {
    topics
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

// ---------------------------------------------------------------------------
// ProfileStore trait
// ---------------------------------------------------------------------------

/// Owner of peer profiles.
///
/// Implementations must be thread-safe (Send + Sync). Reads return owned
/// copies so a ranking pass scores a snapshot taken at call start.
pub trait ProfileStore: Send + Sync {
    /// Create or overwrite the profile for `identifier`. Atomic per identifier.
    fn upsert(
        &self,
        identifier: &str,
        preferences: PeerPreferences,
        mood_stats: MoodStats,
        session_stats: SessionStats,
    ) -> Result<PeerProfile, ProfileError>;

    fn get(&self, identifier: &str) -> Option<PeerProfile>;

    /// Every profile except `identifier`, sorted by commitment.
    fn all_except(&self, identifier: &str) -> Vec<PeerProfile>;

    /// Returns the removed profile, if any.
    fn remove(&self, identifier: &str) -> Option<PeerProfile>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stamp `last_activity`. Returns false when the profile does not exist.
    fn record_activity(&self, identifier: &str) -> bool;
}

// ---------------------------------------------------------------------------
// InMemoryProfileStore
// ---------------------------------------------------------------------------

/// In-memory profile store backed by `DashMap` for concurrent access.
///
/// Suitable for single-instance deployments. A database-backed store
/// implements the same trait.
pub struct InMemoryProfileStore {
    profiles: DashMap<String, PeerProfile>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self {
            profiles: DashMap::new(),
        }
    }
}

impl Default for InMemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn upsert(
        &self,
        identifier: &str,
        preferences: PeerPreferences,
        mood_stats: MoodStats,
        session_stats: SessionStats,
    ) -> Result<PeerProfile, ProfileError> {
        let key = identifier.trim();
        if key.is_empty() {
            return Err(ProfileError::EmptyIdentifier);
        }

        let now = Utc::now();
        let text = preference_text(&preferences);

        // The entry guard holds the shard lock for the whole read-modify-write.
        let mut entry = self
            .profiles
            .entry(key.to_string())
            .or_insert_with(|| PeerProfile {
                commitment: key.to_string(),
                preference_text: String::new(),
                preferences: PeerPreferences::default(),
                mood_stats: MoodStats::default(),
                session_stats: SessionStats::default(),
                created_at: now,
                updated_at: now,
                last_activity: None,
            });
        let profile = entry.value_mut();
        profile.preference_text = text;
        profile.preferences = preferences;
        profile.mood_stats = mood_stats;
        profile.session_stats = session_stats;
        profile.updated_at = now;

        Ok(profile.clone())
    }

    fn get(&self, identifier: &str) -> Option<PeerProfile> {
        self.profiles
            .get(identifier.trim())
            .map(|entry| entry.value().clone())
    }

    fn all_except(&self, identifier: &str) -> Vec<PeerProfile> {
        let skip = identifier.trim();
        let mut peers: Vec<PeerProfile> = self
            .profiles
            .iter()
            .filter(|entry| entry.key() != skip)
            .map(|entry| entry.value().clone())
            .collect();
        peers.sort_by(|a, b| a.commitment.cmp(&b.commitment));
        peers
    }

    fn remove(&self, identifier: &str) -> Option<PeerProfile> {
        self.profiles
            .remove(identifier.trim())
            .map(|(_, profile)| profile)
    }

    fn len(&self) -> usize {
        self.profiles.len()
    }

    fn record_activity(&self, identifier: &str) -> bool {
        match self.profiles.get_mut(identifier.trim()) {
            Some(mut entry) => {
                entry.value_mut().last_activity = Some(Utc::now());
                true
            }
            None => false,
        }
    }
}
