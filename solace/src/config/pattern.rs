// Copyright 2026 The Solace Project
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use regex::Regex;

use super::error::ConfigError;
use crate::signal::PhraseTier;

/// A tier's phrase list compiled into one case-insensitive alternation.
///
/// Each phrase is escaped, inner spaces accept 1-3 whitespace characters,
/// and every alternative is anchored on word boundaries so "kill myself"
/// never fires inside "skill myself".
#[derive(Clone)]
pub struct PhrasePattern {
    pub pattern: String,
    regex: Option<Regex>,
}

impl PhrasePattern {
    /// Compile a phrase list, returning `ConfigError::InvalidPattern` on failure.
    ///
    /// An empty list compiles to a pattern that never matches.
    pub fn compile(tier: PhraseTier, phrases: &[String]) -> Result<Self, ConfigError> {
        if phrases.is_empty() {
            return Ok(Self {
                pattern: String::new(),
                regex: None,
            });
        }

        let alternatives: Vec<String> = phrases
            .iter()
            .map(|p| {
                let tokens: Vec<String> = p.split_whitespace().map(regex::escape).collect();
                format!(r"\b{}\b", tokens.join(r"\s{1,3}"))
            })
            .collect();
        let pattern = format!("(?i)(?:{})", alternatives.join("|"));

        let regex = Regex::new(&pattern).map_err(|e| ConfigError::InvalidPattern {
            tier: tier.to_string(),
            pattern: pattern.clone(),
            source: e,
        })?;
        Ok(Self {
            pattern,
            regex: Some(regex),
        })
    }

    /// All non-overlapping matches, left to right, as they appear in `text`.
    pub fn find_all(&self, text: &str) -> Vec<String> {
        match &self.regex {
            Some(re) => re.find_iter(text).map(|m| m.as_str().to_string()).collect(),
            None => Vec::new(),
        }
    }

    /// Number of non-overlapping matches in `text`.
    pub fn count(&self, text: &str) -> usize {
        match &self.regex {
            Some(re) => re.find_iter(text).count(),
            None => 0,
        }
    }

    #[cfg(test)]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(text))
    }
}

impl fmt::Debug for PhrasePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhrasePattern")
            .field("pattern", &self.pattern)
            .finish()
    }
}

impl PartialEq for PhrasePattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(phrases: &[&str]) -> PhrasePattern {
        let owned: Vec<String> = phrases.iter().map(|s| s.to_string()).collect();
        PhrasePattern::compile(PhraseTier::High, &owned).unwrap()
    }

    #[test]
    fn multi_word_phrase_tolerates_irregular_spacing() {
        let p = compile(&["kill myself"]);
        assert!(p.is_match("i want to kill myself"));
        assert!(p.is_match("i want to kill   myself"));
        assert!(p.is_match("Kill\tMyself"));
    }

    #[test]
    fn more_than_three_spaces_do_not_match() {
        let p = compile(&["kill myself"]);
        assert!(!p.is_match("kill    myself"));
    }

    #[test]
    fn phrase_does_not_match_inside_longer_word() {
        let p = compile(&["kill myself", "sad"]);
        assert!(!p.is_match("a skill myself taught"));
        assert!(!p.is_match("sadness"));
        assert!(!p.is_match("crusade"));
    }

    #[test]
    fn apostrophes_are_escaped_literally() {
        let p = compile(&["can't go on", "i'm a burden"]);
        assert_eq!(p.count("i can't go on, i'm a burden"), 2);
    }

    #[test]
    fn find_all_returns_occurrences_in_order() {
        let p = compile(&["hopeless", "nobody cares"]);
        let hits = p.find_all("hopeless. nobody cares. still hopeless");
        assert_eq!(hits, vec!["hopeless", "nobody cares", "hopeless"]);
    }

    #[test]
    fn empty_phrase_list_never_matches() {
        let p = PhrasePattern::compile(PhraseTier::Low, &[]).unwrap();
        assert!(!p.is_match("anything at all"));
        assert_eq!(p.count("sad"), 0);
        assert!(p.find_all("sad").is_empty());
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let p = compile(&["self.harm"]);
        assert!(p.is_match("self.harm"));
        assert!(!p.is_match("selfxharm"));
    }
}
