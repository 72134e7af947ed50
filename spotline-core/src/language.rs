//! Language block resolution.
//!
//! Downstream placement filters programming blocks by language-prefix
//! codes. Most labels map statically; "South Asian" covers two block
//! families (Hindi `SA` and Punjabi `P`) and needs an explicit sub-choice
//! collected upfront — the resolver reports pending rather than guessing.

use serde::{Deserialize, Serialize};

/// Static label → block-prefix table. "Chinese" and "South Asian" are
/// multi-dialect labels mapping to the union of their component prefixes.
const LANGUAGE_BLOCK_PREFIXES: &[(&str, &[&str])] = &[
    ("Chinese", &["C", "M"]),
    ("Cantonese", &["C"]),
    ("Mandarin", &["M"]),
    ("Filipino", &["T"]),
    ("Korean", &["K"]),
    ("Vietnamese", &["V"]),
    ("Hmong", &["Hm"]),
    ("Hindi", &["SA"]),
    ("Punjabi", &["P"]),
    ("Japanese", &["J"]),
];

/// The explicit sub-choice for South Asian lines, collected from the
/// interactive collaborator before the engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SouthAsianChoice {
    Hindi,
    Punjabi,
    Both,
}

/// Result of prefix resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockResolution {
    Resolved(Vec<String>),
    /// The label needs a disambiguation input before its prefix set can be
    /// finalized. Order processing halts here until the caller supplies it.
    PendingDisambiguation,
}

/// Resolve a language label to its block-filter prefixes.
pub fn resolve_block_prefixes(
    language: &str,
    south_asian_choice: Option<SouthAsianChoice>,
) -> BlockResolution {
    if language.eq_ignore_ascii_case("south asian") {
        return match south_asian_choice {
            Some(SouthAsianChoice::Hindi) => BlockResolution::Resolved(vec!["SA".to_string()]),
            Some(SouthAsianChoice::Punjabi) => BlockResolution::Resolved(vec!["P".to_string()]),
            Some(SouthAsianChoice::Both) => {
                BlockResolution::Resolved(vec!["SA".to_string(), "P".to_string()])
            }
            None => BlockResolution::PendingDisambiguation,
        };
    }

    for (label, prefixes) in LANGUAGE_BLOCK_PREFIXES {
        if label.eq_ignore_ascii_case(language) {
            return BlockResolution::Resolved(prefixes.iter().map(|p| p.to_string()).collect());
        }
    }
    BlockResolution::Resolved(Vec::new())
}

/// Normalize a label to its table spelling ("KOREAN" → "Korean"); unknown
/// labels fall back to title case of the first word.
pub fn normalize_language_name(language: &str) -> String {
    if language.eq_ignore_ascii_case("south asian") {
        return "South Asian".to_string();
    }
    for (label, _) in LANGUAGE_BLOCK_PREFIXES {
        if label.eq_ignore_ascii_case(language) {
            return (*label).to_string();
        }
    }
    let mut chars = language.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Detect the language from free-form program text ("mandarin news" →
/// "Mandarin"). Multi-word labels are checked before their substrings.
pub fn detect_language(program: &str) -> Option<String> {
    let lower = program.to_lowercase();
    let keywords: &[(&str, &[&str])] = &[
        ("South Asian", &["south asian", "hindi", "punjabi"]),
        ("Cantonese", &["cantonese"]),
        ("Mandarin", &["mandarin"]),
        ("Chinese", &["chinese"]),
        ("Filipino", &["filipino", "tagalog"]),
        ("Korean", &["korean"]),
        ("Vietnamese", &["vietnamese"]),
        ("Hmong", &["hmong"]),
        ("Japanese", &["japanese"]),
    ];
    for (language, needles) in keywords {
        if needles.iter().any(|n| lower.contains(n)) {
            return Some((*language).to_string());
        }
    }
    None
}
