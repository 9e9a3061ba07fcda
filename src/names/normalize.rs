//! Player name normalization.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// A literal `{wrong: correct}` substitution for a known typo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypoFix {
    pub wrong: String,
    pub correct: String,
}

impl TypoFix {
    pub fn new(wrong: &str, correct: &str) -> Self {
        Self {
            wrong: wrong.to_string(),
            correct: correct.to_string(),
        }
    }
}

/// Trim, collapse internal whitespace and word-capitalize a raw name.
///
/// Capitalization follows title-case rules: a letter is upper-cased when it
/// does not follow another letter, lower-cased otherwise
/// (`"o'neil"` → `"O'Neil"`, `"karthik01x"` → `"Karthik01X"`).
pub fn normalize_name(raw: &str) -> String {
    let collapsed = whitespace_run().replace_all(raw.trim(), " ");
    title_case(&collapsed)
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;

    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }

    out
}

/// Apply typo substitutions in table order, each over the whole name.
///
/// Later rules see the output of earlier ones.
pub fn apply_typo_fixes(name: &str, fixes: &[TypoFix]) -> String {
    let mut fixed = name.to_string();
    for fix in fixes {
        if fix.wrong.is_empty() {
            continue;
        }
        fixed = fixed.replace(&fix.wrong, &fix.correct);
    }
    fixed
}

/// Full normalizer: [`normalize_name`] followed by [`apply_typo_fixes`].
pub fn canonicalize(raw: &str, fixes: &[TypoFix]) -> String {
    apply_typo_fixes(&normalize_name(raw), fixes)
}
