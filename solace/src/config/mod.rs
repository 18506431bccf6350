// Config loader and validator
//
// Loads solace.yaml, validates structure and numeric ranges, compiles the
// tier phrase dictionaries, and computes a deterministic contract hash.

mod defaults;
mod error;
mod loader;
mod pattern;
mod raw;
mod source;
mod types;

pub use defaults::{default_hotlines, default_phrases, default_tier_weight};
pub use error::ConfigError;
pub use loader::{compute_hash, load_config};
pub use pattern::PhrasePattern;
pub use source::{ConfigSource, FileSource, StringSource};
pub use types::*;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
