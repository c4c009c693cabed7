use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Normalization policy for text comparison
///
/// `Alphanumeric` matches the reference behavior for brochure search:
/// punctuation is dropped so "Villa's" and "Villas" compare equal.
/// `DiacriticsOnly` keeps punctuation and only folds accents and case.
/// The active policy changes match results, so callers pick it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeMode {
    DiacriticsOnly,
    Alphanumeric,
}

/// Canonicalize text for case- and diacritic-insensitive comparison
///
/// Steps:
/// 1. Unicode canonical decomposition (NFD)
/// 2. Drop combining marks ("Café" -> "Cafe")
/// 3. Lowercase
/// 4. Optionally drop non-alphanumeric characters (whitespace kept)
/// 5. Trim surrounding whitespace
///
/// Deterministic and side-effect free. Text without diacritics passes
/// through unchanged apart from case folding and trimming.
pub fn normalize(text: &str, mode: NormalizeMode) -> String {
    let folded = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase);

    let cleaned: String = match mode {
        NormalizeMode::DiacriticsOnly => folded.collect(),
        NormalizeMode::Alphanumeric => folded
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect(),
    };

    cleaned.trim().to_string()
}
