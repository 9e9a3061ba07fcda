//! Recoverable data quality findings collected during a run.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A row-level or artefact-level issue that was recovered locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Counter column absent from the input; treated as all zero
    MissingColumn { column: String },

    /// Cell present but not numeric; treated as unknown
    UnparseableValue {
        row: usize,
        column: String,
        value: String,
    },

    /// Player name empty after normalization; row dropped
    BlankName { row: usize },

    /// Name with no roster entry at or above the threshold; rows dropped
    UnmatchedName {
        name: String,
        rows: usize,
        best_candidate: Option<String>,
        best_score: f64,
    },

    /// Nobody met a leaderboard gate; the ungated population was ranked
    GateRelaxed {
        leaderboard: String,
        column: String,
        minimum: f64,
    },

    /// Designated spotlight player has no aggregate row
    SpotlightMissing { player: String },

    /// Photo could not be read; skipped
    PhotoSkipped { path: PathBuf, reason: String },

    /// A chart or report artefact could not be written; skipped
    RenderFailed { artefact: String, reason: String },
}

impl Diagnostic {
    /// Stable identifier of the diagnostic kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::MissingColumn { .. } => "missing_column",
            Diagnostic::UnparseableValue { .. } => "unparseable_value",
            Diagnostic::BlankName { .. } => "blank_name",
            Diagnostic::UnmatchedName { .. } => "unmatched_name",
            Diagnostic::GateRelaxed { .. } => "gate_relaxed",
            Diagnostic::SpotlightMissing { .. } => "spotlight_missing",
            Diagnostic::PhotoSkipped { .. } => "photo_skipped",
            Diagnostic::RenderFailed { .. } => "render_failed",
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::MissingColumn { column } => {
                write!(f, "column '{}' not found; treated as zero", column)
            }
            Diagnostic::UnparseableValue { row, column, value } => write!(
                f,
                "row {}: '{}' in column '{}' is not numeric",
                row, value, column
            ),
            Diagnostic::BlankName { row } => write!(f, "row {}: blank player name", row),
            Diagnostic::UnmatchedName {
                name,
                rows,
                best_candidate,
                best_score,
            } => match best_candidate {
                Some(candidate) => write!(
                    f,
                    "'{}' ({} rows) unmatched; closest '{}' scored {:.1}",
                    name, rows, candidate, best_score
                ),
                None => write!(f, "'{}' ({} rows) unmatched", name, rows),
            },
            Diagnostic::GateRelaxed {
                leaderboard,
                column,
                minimum,
            } => write!(
                f,
                "{}: nobody has {} >= {}; gate relaxed",
                leaderboard, column, minimum
            ),
            Diagnostic::SpotlightMissing { player } => {
                write!(f, "spotlight player '{}' not found in dataset", player)
            }
            Diagnostic::PhotoSkipped { path, reason } => {
                write!(f, "photo {:?} skipped: {}", path, reason)
            }
            Diagnostic::RenderFailed { artefact, reason } => {
                write!(f, "{} not rendered: {}", artefact, reason)
            }
        }
    }
}

/// Ordered collection of diagnostics for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Count per diagnostic kind, sorted by kind.
    pub fn counts_by_kind(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for item in &self.items {
            *counts.entry(item.kind()).or_insert(0) += 1;
        }
        counts
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.items.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_kind() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::BlankName { row: 3 });
        diagnostics.push(Diagnostic::BlankName { row: 9 });
        diagnostics.extend(vec![Diagnostic::MissingColumn {
            column: "dots".to_string(),
        }]);

        let counts = diagnostics.counts_by_kind();
        assert_eq!(counts.get("blank_name"), Some(&2));
        assert_eq!(counts.get("missing_column"), Some(&1));
        assert_eq!(diagnostics.len(), 3);
    }

    #[test]
    fn test_diagnostic_serialization() {
        let d = Diagnostic::GateRelaxed {
            leaderboard: "batting_avg".to_string(),
            column: "innings".to_string(),
            minimum: 3.0,
        };
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.starts_with(r#"{"kind":"gate_relaxed""#));

        let parsed: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, d);
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::UnmatchedName {
            name: "Random Guy".to_string(),
            rows: 2,
            best_candidate: Some("Harshith Sai".to_string()),
            best_score: 41.66,
        };
        assert_eq!(
            d.to_string(),
            "'Random Guy' (2 rows) unmatched; closest 'Harshith Sai' scored 41.7"
        );
    }
}
