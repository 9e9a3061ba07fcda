//! Output directory operations.
//!
//! Handles writing run artefacts to the output directory:
//! - Leaderboard and player stats tables (CSV)
//! - Spotlight results (JSON) and diagnostics (JSONL)
//! - Paths for reports, charts and the photo catalog

pub mod jsonl;
pub mod tables;

pub use jsonl::JsonlWriter;
pub use tables::{
    write_json_pretty, write_leaderboard_csv, write_photo_catalog_csv, write_player_stats_csv,
    write_text,
};

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// File names inside the output directory.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub output_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Create the output directory if needed.
    pub fn ensure_dir(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    pub fn leaderboard_csv(&self, key: &str) -> PathBuf {
        self.output_dir.join(format!("top5_{}.csv", key))
    }

    pub fn leaderboard_chart(&self, key: &str) -> PathBuf {
        self.output_dir.join(format!("top5_{}.png", key))
    }

    pub fn player_stats_csv(&self) -> PathBuf {
        self.output_dir.join("player_stats_full.csv")
    }

    pub fn spotlights_json(&self) -> PathBuf {
        self.output_dir.join("spotlights.json")
    }

    /// Sparkline path for the `index`-th spotlight player. Names with no
    /// usable characters fall back to `player_<n>`.
    pub fn spotlight_chart(&self, index: usize, player: &str) -> PathBuf {
        let mut name = slug(player);
        if name.is_empty() {
            name = format!("player_{}", index + 1);
        }
        self.output_dir.join(format!("spotlight_{}_runs.png", name))
    }

    pub fn diagnostics_jsonl(&self) -> PathBuf {
        self.output_dir.join("diagnostics.jsonl")
    }

    pub fn summary_markdown(&self) -> PathBuf {
        self.output_dir.join("Executive_Summary.md")
    }

    pub fn summary_html(&self) -> PathBuf {
        self.output_dir.join("Executive_Summary.html")
    }

    pub fn photo_catalog_csv(&self) -> PathBuf {
        self.output_dir.join("photo_catalog.csv")
    }

    pub fn photo_category_chart(&self) -> PathBuf {
        self.output_dir.join("photo_category_analysis.png")
    }

    pub fn contact_sheet(&self) -> PathBuf {
        self.output_dir.join("photos_contact_sheet.png")
    }
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self::new(PathBuf::from("./outputs"))
    }
}

/// File-name-safe form of a player name: lowercase ASCII alphanumerics
/// separated by single underscores.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}
