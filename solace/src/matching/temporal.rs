// Copyright 2026 The Solace Project
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;

use crate::config::MatchingConfig;

/// Overlap of two preferred-time sets in [0.0, 1.0].
///
/// Either side empty yields the neutral score: no stated preference is
/// neither a conflict nor a perfect fit. Otherwise the Jaccard index.
pub fn temporal_compatibility(
    a: &BTreeSet<String>,
    b: &BTreeSet<String>,
    config: &MatchingConfig,
) -> f64 {
    if a.is_empty() || b.is_empty() {
        return config.neutral_temporal;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}
