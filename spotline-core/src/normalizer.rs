//! Cell repair catalog.
//!
//! Source documents are layout/OCR extractions with systematic artifacts:
//! column shifts push spaces into time tokens, glyph doubling corrupts
//! weekday runs, and minute components pick up stray digits. Only the
//! catalogued signatures below are repaired — anything else that fails to
//! parse is skipped as a malformed row and counted, never coerced.

use crate::parser::parse_day_pattern;
use crate::types::ColumnRole;
use regex::Regex;

enum Repair {
    /// Regex substitution with capture-group references.
    Substitute { pattern: Regex, replacement: &'static str },
    /// Full-cell match replaced by a fixed canonical day run, but only
    /// when the cell does not already parse as a day pattern. The
    /// corruption varies (doubled letters, case noise) while the intent
    /// is unambiguous; a clean run like "MTuWF" carries different days
    /// than the canonical token and must flow through untouched.
    CanonicalizeDayRun { pattern: Regex, canonical: &'static str },
}

pub struct RepairRule {
    pub name: &'static str,
    role: ColumnRole,
    repair: Repair,
}

impl RepairRule {
    fn apply(&self, text: &str) -> String {
        match &self.repair {
            Repair::Substitute { pattern, replacement } => {
                pattern.replace_all(text, *replacement).into_owned()
            }
            Repair::CanonicalizeDayRun { pattern, canonical } => {
                if pattern.is_match(text) && parse_day_pattern(text).is_err() {
                    (*canonical).to_string()
                } else {
                    text.to_string()
                }
            }
        }
    }
}

/// Applies the ordered repair catalog to individual cells. Rules only fire
/// on cells from their own column role, and every rule is idempotent on
/// already-clean input.
pub struct CellNormalizer {
    rules: Vec<RepairRule>,
}

impl CellNormalizer {
    pub fn new() -> Self {
        // Rule order matters: the longest weekday-run signatures must be
        // tried before the plain M..F one.
        let rules = vec![
            RepairRule {
                name: "time-space-after-dash",
                role: ColumnRole::Time,
                repair: Repair::Substitute {
                    pattern: Regex::new(r"-\s+").expect("valid repair pattern"),
                    replacement: "-",
                },
            },
            RepairRule {
                name: "time-split-colon",
                role: ColumnRole::Time,
                repair: Repair::Substitute {
                    pattern: Regex::new(r"(\d)\s*:\s*(\d)").expect("valid repair pattern"),
                    replacement: "$1:$2",
                },
            },
            RepairRule {
                name: "time-extra-minute-digit",
                role: ColumnRole::Time,
                repair: Repair::Substitute {
                    pattern: Regex::new(r":([0-5]\d)\d([ap])").expect("valid repair pattern"),
                    replacement: ":$1$2",
                },
            },
            RepairRule {
                name: "day-run-doubled-letters-full-week",
                role: ColumnRole::Day,
                repair: Repair::CanonicalizeDayRun {
                    pattern: Regex::new(r"^MT[A-Za-z]+FSa?Su$").expect("valid repair pattern"),
                    canonical: "MTuWThFSaSu",
                },
            },
            RepairRule {
                name: "day-run-doubled-letters-mon-sat",
                role: ColumnRole::Day,
                repair: Repair::CanonicalizeDayRun {
                    pattern: Regex::new(r"^MT[A-Za-z]+FSa$").expect("valid repair pattern"),
                    canonical: "MTuWThFSa",
                },
            },
            RepairRule {
                name: "day-run-doubled-letters-weekdays",
                role: ColumnRole::Day,
                repair: Repair::CanonicalizeDayRun {
                    pattern: Regex::new(r"^MT[A-Za-z]+F$").expect("valid repair pattern"),
                    canonical: "MTuWThF",
                },
            },
            RepairRule {
                name: "rate-currency-noise",
                role: ColumnRole::Rate,
                repair: Repair::Substitute {
                    pattern: Regex::new(r"[$,\s]").expect("valid repair pattern"),
                    replacement: "",
                },
            },
        ];
        Self { rules }
    }

    /// Run every catalogued rule for this column role, in order. Returns
    /// the repaired cell text; the input is untouched when nothing matches.
    pub fn normalize(&self, role: ColumnRole, text: &str) -> String {
        let mut out = text.trim().to_string();
        for rule in self.rules.iter().filter(|r| r.role == role) {
            out = rule.apply(&out);
        }
        out
    }
}

impl Default for CellNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
