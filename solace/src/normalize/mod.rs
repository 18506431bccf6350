// Text normalization shared by the keyword scan and the sentiment call.
//
// A pure string transformation applied to every text before analysis. It is
// idempotent: normalizing already-normalized content returns the same result.

use unicode_normalization::UnicodeNormalization;

// ---------------------------------------------------------------------------
// Trait: Normalizer
// ---------------------------------------------------------------------------

/// Pure string normalizer. Implementations must be Send + Sync so they can be
/// shared across async tasks.
pub trait Normalizer: Send + Sync {
    /// Normalize a single string. The result must be idempotent:
    /// `normalize(normalize(x)) == normalize(x)` for all `x`.
    fn normalize(&self, input: &str) -> String;
}

// ---------------------------------------------------------------------------
// Implementation: TextNormalizer
// ---------------------------------------------------------------------------

/// Normalizer that applies, in order:
///
/// 1. NFKC unicode normalization (fullwidth -> ASCII, ligatures, etc.)
/// 2. Zero-width / invisible character removal
/// 3. Lowercasing
/// 4. Whitespace collapse (any run becomes one space) and trim
pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer for TextNormalizer {
    fn normalize(&self, input: &str) -> String {
        let nfkc: String = input.nfkc().collect();
        let visible = remove_invisible_chars(&nfkc);
        collapse_whitespace(&visible.to_lowercase())
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Returns true if the character is a zero-width or invisible character
/// that should be stripped during normalization.
fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{200B}' // Zero-width space
        | '\u{200C}' // Zero-width non-joiner
        | '\u{200D}' // Zero-width joiner
        | '\u{FEFF}' // BOM / zero-width no-break space
        | '\u{00AD}' // Soft hyphen
        | '\u{200E}' // Left-to-right mark
        | '\u{200F}' // Right-to-left mark
        | '\u{202A}'..='\u{202E}' // Directional embeddings and overrides
        | '\u{2060}'..='\u{2064}' // Word joiner, invisible operators
        | '\u{FE00}'..='\u{FE0F}' // Variation selectors 1-16
        | '\u{180E}' // Mongolian vowel separator
    )
}

fn remove_invisible_chars(input: &str) -> String {
    input.chars().filter(|c| !is_invisible(*c)).collect()
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
