// Copyright 2026 The Solace Project
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use super::error::ConfigError;

/// Where the solace YAML contract is read from.
///
/// `FileSource` reads `solace.yaml` from disk; `StringSource` carries the
/// document inline so tests and the eval harness avoid file I/O.
pub trait ConfigSource {
    fn load(&self) -> Result<String, ConfigError>;

    /// Human-readable origin, used in startup logs.
    fn describe(&self) -> String;
}

/// Loads config from a file on disk.
pub struct FileSource {
    pub path: PathBuf,
}

impl ConfigSource for FileSource {
    fn load(&self) -> Result<String, ConfigError> {
        Ok(std::fs::read_to_string(&self.path)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Provides config content directly as a string.
pub struct StringSource {
    pub content: String,
}

impl StringSource {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl ConfigSource for StringSource {
    fn load(&self) -> Result<String, ConfigError> {
        Ok(self.content.clone())
    }

    fn describe(&self) -> String {
        "<inline>".to_string()
    }
}
