// Copyright 2026 The Solace Project
// SPDX-License-Identifier: Apache-2.0

/// All errors that can occur during config loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config source: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid {tier} phrase pattern \"{pattern}\": {source}")]
    InvalidPattern {
        tier: String,
        pattern: String,
        source: regex::Error,
    },
}
