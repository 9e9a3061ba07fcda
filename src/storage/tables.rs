//! Tabular and JSON artefacts.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use super::StorageError;
use crate::models::{Leaderboard, PhotoRecord, PlayerAggregate, Stat};

/// Render a metric value for a table cell. Unknown values are blank.
pub fn format_cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}", (v * 100.0).round() / 100.0),
        None => String::new(),
    }
}

fn create(path: &Path) -> Result<File, StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}

/// Write one leaderboard as `canonical_player, <column>, rank`.
pub fn write_leaderboard_csv(path: &Path, board: &Leaderboard) -> Result<(), StorageError> {
    let mut writer = csv::Writer::from_writer(create(path)?);
    writer.write_record(["canonical_player", board.metric.column.column(), "rank"])?;

    for entry in &board.entries {
        writer.write_record([
            entry.player.clone(),
            format_cell(Some(entry.value)),
            entry.rank.to_string(),
        ])?;
    }

    writer.flush()?;
    info!("Saved {:?}", path);
    Ok(())
}

/// Write every aggregate with every raw and derived column.
pub fn write_player_stats_csv(
    path: &Path,
    players: &[PlayerAggregate],
) -> Result<(), StorageError> {
    let stats = Stat::all();
    let mut writer = csv::Writer::from_writer(create(path)?);

    let mut header = vec!["canonical_player".to_string(), "rows".to_string()];
    header.extend(stats.iter().map(|s| s.column().to_string()));
    writer.write_record(&header)?;

    for player in players {
        let mut record = vec![player.player.clone(), player.rows.to_string()];
        record.extend(stats.iter().map(|s| format_cell(player.stat(*s))));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    info!("Saved {:?} ({} players)", path, players.len());
    Ok(())
}

/// Characters of extracted text kept in the catalog.
const CATALOG_TEXT_CHARS: usize = 200;

fn catalog_text(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        "No text detected".to_string()
    } else {
        text.chars().take(CATALOG_TEXT_CHARS).collect()
    }
}

/// Write the photo catalog, one row per analysed photo.
pub fn write_photo_catalog_csv(path: &Path, photos: &[PhotoRecord]) -> Result<(), StorageError> {
    let mut writer = csv::Writer::from_writer(create(path)?);
    writer.write_record([
        "filename",
        "path",
        "category",
        "description",
        "width",
        "height",
        "aspect_ratio",
        "mean_r",
        "mean_g",
        "mean_b",
        "size_bytes",
        "modified",
        "detected_players",
        "extracted_text",
    ])?;

    for photo in photos {
        let [r, g, b] = photo.facts.mean_rgb;
        writer.write_record([
            photo.file_name.clone(),
            photo.path.display().to_string(),
            photo.category.as_str().to_string(),
            photo.category.description().to_string(),
            photo.facts.width.to_string(),
            photo.facts.height.to_string(),
            format_cell(Some(photo.facts.aspect_ratio())),
            format_cell(Some(r)),
            format_cell(Some(g)),
            format_cell(Some(b)),
            photo.size_bytes.to_string(),
            photo
                .modified
                .map(|m| m.to_rfc3339())
                .unwrap_or_default(),
            photo.detected_players.join("; "),
            catalog_text(&photo.facts.text),
        ])?;
    }

    writer.flush()?;
    info!("Saved photo catalog: {:?}", path);
    Ok(())
}

/// Write a text artefact such as a rendered report.
pub fn write_text(path: &Path, contents: &str) -> Result<(), StorageError> {
    let mut file = create(path)?;
    file.write_all(contents.as_bytes())?;
    info!("Saved {:?}", path);
    Ok(())
}

/// Write any serializable value as pretty JSON.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let mut writer = BufWriter::new(create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    info!("Saved {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::derive_metrics;
    use crate::models::{
        Counter, Counters, Direction, LeaderboardEntry, MetricFamily, MetricSpec, PhotoCategory,
        PhotoFacts,
    };
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn aggregate(name: &str, runs: f64) -> PlayerAggregate {
        let mut counters = Counters::zeroed();
        counters.runs = Some(runs);
        counters.innings = Some(3.0);
        PlayerAggregate {
            player: name.to_string(),
            rows: 2,
            metrics: derive_metrics(&counters),
            counters,
        }
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(Some(40.0)), "40");
        assert_eq!(format_cell(Some(133.3333)), "133.33");
        assert_eq!(format_cell(None), "");
    }

    #[test]
    fn test_write_leaderboard_csv() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("top5_batting_runs.csv");
        let board = Leaderboard {
            metric: MetricSpec::new(
                MetricFamily::Batting,
                Stat::Counter(Counter::Runs),
                "Runs",
                Direction::Descending,
            ),
            gate_relaxed: false,
            entries: vec![
                LeaderboardEntry {
                    player: "Nithesh Y".to_string(),
                    value: 210.0,
                    rank: 1,
                },
                LeaderboardEntry {
                    player: "Pushkar P".to_string(),
                    value: 180.5,
                    rank: 2,
                },
            ],
        };

        write_leaderboard_csv(&path, &board).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "canonical_player,runs,rank\nNithesh Y,210,1\nPushkar P,180.5,2\n"
        );
    }

    #[test]
    fn test_write_player_stats_csv() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("player_stats_full.csv");

        write_player_stats_csv(&path, &[aggregate("Harshith Sai", 90.0)]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "canonical_player");
        assert_eq!(headers.len(), 2 + Stat::all().len());

        let row = reader.records().next().unwrap().unwrap();
        let avg_idx = headers.iter().position(|h| h == "avg").unwrap();
        let sr_idx = headers.iter().position(|h| h == "sr").unwrap();
        assert_eq!(&row[0], "Harshith Sai");
        assert_eq!(&row[avg_idx], "30");
        assert_eq!(&row[sr_idx], "");
    }

    #[test]
    fn test_write_photo_catalog_csv() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("photo_catalog.csv");
        let photo = PhotoRecord {
            path: PathBuf::from("imgs/final.jpg"),
            file_name: "final.jpg".to_string(),
            category: PhotoCategory::TrophyCeremony,
            facts: PhotoFacts {
                width: 200,
                height: 100,
                mean_rgb: [10.0, 20.0, 30.0],
                text: "ccpl trophy".to_string(),
            },
            size_bytes: 1024,
            modified: None,
            detected_players: vec!["Nithesh Y".to_string(), "Pushkar P".to_string()],
        };

        write_photo_catalog_csv(&path, &[photo]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let line = text.lines().nth(1).unwrap();
        assert_eq!(
            line,
            "final.jpg,imgs/final.jpg,trophy_ceremony,Trophy ceremony or award presentation,\
             200,100,2,10,20,30,1024,,Nithesh Y; Pushkar P,ccpl trophy"
        );
    }

    #[test]
    fn test_catalog_text() {
        assert_eq!(catalog_text("  "), "No text detected");
        assert_eq!(catalog_text(" man of the match "), "man of the match");
        assert_eq!(catalog_text(&"x".repeat(500)).chars().count(), 200);
    }

    #[test]
    fn test_write_json_pretty() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested").join("spotlights.json");

        write_json_pretty(&path, &vec![aggregate("A", 1.0)]).unwrap();
        let back: Vec<PlayerAggregate> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back[0].player, "A");
    }
}
