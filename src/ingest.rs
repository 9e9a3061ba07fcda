//! Stats file loader.
//!
//! Reads a delimited stats file, identifies the player-name column and coerces
//! the counter columns. Data quality problems in individual cells are
//! recovered locally and reported as diagnostics; only a missing file or a
//! missing player column aborts the load.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{Counter, Counters, Diagnostic, RawRecord};

/// Header names accepted for the player column, in priority order.
pub const PLAYER_COLUMNS: [&str; 4] = ["player", "Player", "name", "Name"];

/// Header names accepted for the optional match date column.
pub const DATE_COLUMNS: [&str; 2] = ["date", "Date"];

/// Errors that abort loading.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Stats file not found: {0}")]
    NotFound(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No player name column found (expected one of {expected:?}, found {found:?})")]
    MissingPlayerColumn {
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// A loaded stats table.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    /// Header used for player names
    pub player_column: String,

    /// All headers, as read
    pub columns: Vec<String>,

    pub records: Vec<RawRecord>,

    /// Whether the file carried its own `balls_bowled` column
    pub has_balls_bowled: bool,

    pub diagnostics: Vec<Diagnostic>,
}

/// Load a stats file from disk.
pub fn load_stats(path: &Path) -> Result<LoadedTable, IngestError> {
    info!("Loading data from: {:?}", path);

    if !path.exists() {
        tracing::error!("CSV file not found: {:?}", path);
        return Err(IngestError::NotFound(path.to_path_buf()));
    }

    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    read_stats(file)
}

/// Read a stats table from any reader.
pub fn read_stats<R: Read>(reader: R) -> Result<LoadedTable, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.as_str(), i))
        .collect();

    let Some(player_column) = PLAYER_COLUMNS.iter().find(|c| index.contains_key(**c)) else {
        tracing::error!("No player name column found!");
        return Err(IngestError::MissingPlayerColumn {
            expected: PLAYER_COLUMNS.iter().map(|s| s.to_string()).collect(),
            found: headers,
        });
    };
    let player_idx = index[*player_column];
    let date_idx = DATE_COLUMNS.iter().find_map(|c| index.get(*c).copied());

    let mut diagnostics = Vec::new();
    let mut counter_columns: Vec<(Counter, usize)> = Vec::new();
    for counter in Counter::ALL {
        match index.get(counter.column()) {
            Some(&i) => counter_columns.push((counter, i)),
            None if counter.is_optional() => {}
            None => {
                warn!("Column '{}' not found in data", counter.column());
                diagnostics.push(Diagnostic::MissingColumn {
                    column: counter.column().to_string(),
                });
            }
        }
    }
    let has_balls_bowled = counter_columns
        .iter()
        .any(|(c, _)| *c == Counter::BallsBowled);

    let mut records = Vec::new();
    for (i, result) in csv_reader.records().enumerate() {
        let row = i + 1;
        let cells = result?;

        let name = cells.get(player_idx).unwrap_or("").to_string();
        let mut counters = Counters::zeroed();
        if !has_balls_bowled {
            counters.balls_bowled = None;
        }

        for &(counter, col) in &counter_columns {
            let raw = cells.get(col).unwrap_or("");
            match parse_cell(raw, counter) {
                Some(value) => counters.set(counter, Some(value)),
                None => {
                    debug!("Row {}: unparseable {} value {:?}", row, counter, raw);
                    counters.set(counter, None);
                    diagnostics.push(Diagnostic::UnparseableValue {
                        row,
                        column: counter.column().to_string(),
                        value: raw.to_string(),
                    });
                }
            }
        }

        let mut record = RawRecord::new(row, name, counters);
        if let Some(date) = date_idx.and_then(|d| cells.get(d)) {
            if !date.trim().is_empty() {
                record = record.with_date(date.trim());
            }
        }
        records.push(record);
    }

    info!("Loaded {} rows, {} columns", records.len(), headers.len());
    info!("Columns found: {:?}", headers);

    Ok(LoadedTable {
        player_column: player_column.to_string(),
        columns: headers,
        records,
        has_balls_bowled,
        diagnostics,
    })
}

/// Parse one counter cell. Blank cells count as zero; `None` means the
/// cell is present but not a finite number.
fn parse_cell(raw: &str, counter: Counter) -> Option<f64> {
    let mut text = raw.trim();
    if text.is_empty() {
        return Some(0.0);
    }
    if counter == Counter::Highest {
        text = text.trim_end_matches('*').trim_end();
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn read(text: &str) -> LoadedTable {
        read_stats(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_player_column_variants() {
        for header in PLAYER_COLUMNS {
            let table = read(&format!("{},runs\nNithesh Y,12\n", header));
            assert_eq!(table.player_column, header);
            assert_eq!(table.records[0].name, "Nithesh Y");
        }
    }

    #[test]
    fn test_player_column_priority() {
        let table = read("Name,player,runs\nWrong,Right,1\n");
        assert_eq!(table.player_column, "player");
        assert_eq!(table.records[0].name, "Right");
    }

    #[test]
    fn test_missing_player_column() {
        let err = read_stats("batsman,runs\nX,1\n".as_bytes()).unwrap_err();
        match err {
            IngestError::MissingPlayerColumn { found, .. } => {
                assert_eq!(found, vec!["batsman", "runs"]);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_missing_columns_are_zero() {
        let table = read("player,runs\nPushkar P,44\n");
        let counters = &table.records[0].counters;

        assert_eq!(counters.runs, Some(44.0));
        assert_eq!(counters.wickets, Some(0.0));
        assert_eq!(counters.balls_bowled, None);
        assert!(!table.has_balls_bowled);

        let missing: Vec<_> = table
            .diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::MissingColumn { column } => Some(column.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(missing.len(), Counter::ALL.len() - 2);
        assert!(missing.contains(&"wickets"));
        assert!(!missing.contains(&"balls_bowled"));
    }

    #[test]
    fn test_unparseable_values_are_unknown() {
        let table = read("player,runs,balls,highest\nA,abc,,57*\nB,nan,10,DNB\n");

        let a = &table.records[0].counters;
        assert_eq!(a.runs, None);
        assert_eq!(a.balls, Some(0.0));
        assert_eq!(a.highest, Some(57.0));

        let b = &table.records[1].counters;
        assert_eq!(b.runs, None);
        assert_eq!(b.highest, None);

        assert!(table.diagnostics.contains(&Diagnostic::UnparseableValue {
            row: 1,
            column: "runs".to_string(),
            value: "abc".to_string(),
        }));
        assert!(table.diagnostics.contains(&Diagnostic::UnparseableValue {
            row: 2,
            column: "highest".to_string(),
            value: "DNB".to_string(),
        }));
    }

    #[test]
    fn test_balls_bowled_and_date_columns() {
        let table = read("player,overs,balls_bowled,date\nA,3.0,17,2025-05-01\nB,1,6,\n");

        assert!(table.has_balls_bowled);
        assert_eq!(table.records[0].counters.balls_bowled, Some(17.0));
        assert_eq!(table.records[0].date.as_deref(), Some("2025-05-01"));
        assert_eq!(table.records[1].date, None);
    }

    #[test]
    fn test_rows_numbered_from_one() {
        let table = read("player,runs\nA,1\nB,2\nC,3\n");
        let rows: Vec<_> = table.records.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![1, 2, 3]);
    }

    #[test]
    fn test_load_stats_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_stats(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, IngestError::NotFound(_)));
    }

    #[test]
    fn test_load_stats_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, " Player , runs ,wickets").unwrap();
        writeln!(file, "akhil reddy danda,55,2").unwrap();
        drop(file);

        let table = load_stats(&path).unwrap();
        assert_eq!(table.player_column, "Player");
        assert_eq!(table.records[0].counters.runs, Some(55.0));
        assert_eq!(table.records[0].counters.wickets, Some(2.0));
    }
}
