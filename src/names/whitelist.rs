//! Whitelist reconciliation: map normalized names onto the canonical roster.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::normalize::{canonicalize, TypoFix};
use crate::models::{Diagnostic, PlayerRow, RawRecord};

/// Score given to an exact roster match.
pub const EXACT_SCORE: f64 = 100.0;

/// Length of the longest common subsequence of two char slices.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Indel similarity on a 0-100 scale: `2 * lcs / (len a + len b)`.
///
/// Insertions and deletions cost one each and substitutions count as both,
/// so a dropped letter scores higher than under plain Levenshtein.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    char_similarity(&a, &b)
}

pub(crate) fn char_similarity(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return EXACT_SCORE;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

/// A successful mapping of one name to a roster entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameMatch {
    pub canonical: String,
    pub score: f64,
}

impl NameMatch {
    pub fn is_exact(&self) -> bool {
        self.score >= EXACT_SCORE
    }
}

/// A name that no roster entry reached the threshold for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedName {
    pub name: String,
    pub best_candidate: Option<String>,
    pub best_score: f64,
}

/// Outcome of reconciling a set of distinct names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Normalized name → roster entry
    pub mapping: BTreeMap<String, NameMatch>,

    /// Names left without a mapping, in first-seen order
    pub unmatched: Vec<UnmatchedName>,
}

impl Reconciliation {
    pub fn canonical(&self, name: &str) -> Option<&str> {
        self.mapping.get(name).map(|m| m.canonical.as_str())
    }

    /// Mappings that needed fuzzy scoring.
    pub fn fuzzy_matches(&self) -> impl Iterator<Item = (&str, &NameMatch)> {
        self.mapping
            .iter()
            .filter(|(_, m)| !m.is_exact())
            .map(|(name, m)| (name.as_str(), m))
    }
}

/// Matches names against an ordered roster.
#[derive(Debug, Clone)]
pub struct WhitelistReconciler<'a> {
    roster: &'a [String],
    threshold: u8,
}

impl<'a> WhitelistReconciler<'a> {
    pub fn new(roster: &'a [String], threshold: u8) -> Self {
        Self { roster, threshold }
    }

    /// Highest-scoring roster entry; earlier roster entries win ties.
    pub fn best_candidate(&self, name: &str) -> Option<(&'a str, f64)> {
        let mut best: Option<(&'a str, f64)> = None;
        for entry in self.roster {
            let score = similarity(name, entry);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((entry.as_str(), score)),
            }
        }
        best
    }

    /// Resolve one name: exact match first, then best fuzzy candidate.
    pub fn resolve(&self, name: &str) -> Result<NameMatch, UnmatchedName> {
        if let Some(entry) = self.roster.iter().find(|entry| entry.as_str() == name) {
            return Ok(NameMatch {
                canonical: entry.clone(),
                score: EXACT_SCORE,
            });
        }

        match self.best_candidate(name) {
            Some((entry, score)) if score >= f64::from(self.threshold) => Ok(NameMatch {
                canonical: entry.to_string(),
                score,
            }),
            best => Err(UnmatchedName {
                name: name.to_string(),
                best_candidate: best.map(|(entry, _)| entry.to_string()),
                best_score: best.map(|(_, score)| score).unwrap_or(0.0),
            }),
        }
    }

    /// Resolve each distinct name once, preserving first-seen order.
    pub fn reconcile<'n, I>(&self, names: I) -> Reconciliation
    where
        I: IntoIterator<Item = &'n str>,
    {
        let mut result = Reconciliation::default();
        let mut seen = HashSet::new();

        for name in names {
            if name.is_empty() || !seen.insert(name) {
                continue;
            }
            match self.resolve(name) {
                Ok(m) => {
                    if !m.is_exact() {
                        info!(
                            "Fuzzy matched '{}' -> '{}' (score: {:.1})",
                            name, m.canonical, m.score
                        );
                    }
                    result.mapping.insert(name.to_string(), m);
                }
                Err(unmatched) => result.unmatched.push(unmatched),
            }
        }

        result
    }
}

/// Rows that survived reconciliation, plus what happened to the rest.
#[derive(Debug, Clone, Default)]
pub struct ReconciledRows {
    pub rows: Vec<PlayerRow>,
    pub reconciliation: Reconciliation,
    pub diagnostics: Vec<Diagnostic>,
}

/// Normalize every record's name, reconcile against the roster and keep
/// only rows that map to a roster entry.
pub fn reconcile_records(
    records: Vec<RawRecord>,
    fixes: &[TypoFix],
    reconciler: &WhitelistReconciler<'_>,
) -> ReconciledRows {
    let mut diagnostics = Vec::new();
    let total = records.len();

    let mut normalized: Vec<(String, RawRecord)> = Vec::with_capacity(total);
    for record in records {
        let name = canonicalize(&record.name, fixes);
        if name.is_empty() {
            debug!("Row {} has a blank player name", record.row);
            diagnostics.push(Diagnostic::BlankName { row: record.row });
            continue;
        }
        normalized.push((name, record));
    }

    let distinct: HashSet<&str> = normalized.iter().map(|(n, _)| n.as_str()).collect();
    info!("Unique players after normalization: {}", distinct.len());

    let reconciliation = reconciler.reconcile(normalized.iter().map(|(n, _)| n.as_str()));

    let mut dropped_rows: HashMap<String, usize> = HashMap::new();
    let mut rows = Vec::with_capacity(normalized.len());
    for (name, record) in normalized {
        match reconciliation.canonical(&name) {
            Some(canonical) => rows.push(PlayerRow {
                player: canonical.to_string(),
                record,
            }),
            None => *dropped_rows.entry(name).or_insert(0) += 1,
        }
    }

    if !reconciliation.unmatched.is_empty() {
        let names: Vec<_> = reconciliation
            .unmatched
            .iter()
            .map(|u| u.name.as_str())
            .collect();
        warn!("Unmatched players (filtered out): {:?}", names);
    }

    for unmatched in &reconciliation.unmatched {
        diagnostics.push(Diagnostic::UnmatchedName {
            name: unmatched.name.clone(),
            rows: dropped_rows.get(&unmatched.name).copied().unwrap_or(0),
            best_candidate: unmatched.best_candidate.clone(),
            best_score: unmatched.best_score,
        });
    }

    info!("Filtered {} rows not in whitelist", total - rows.len());
    info!("Remaining rows: {}", rows.len());

    ReconciledRows {
        rows,
        reconciliation,
        diagnostics,
    }
}
