//! Photo analysis.
//!
//! - **discover**: recursive photo discovery
//! - **inspect**: dimensions, colour and extracted text
//! - **categorize**: ordered rule table
//! - **detect**: roster players in file names and text

pub mod categorize;
pub mod detect;
pub mod discover;
pub mod inspect;

pub use categorize::categorize;
pub use detect::{detect_players, partial_similarity};
pub use discover::discover_photos;
pub use inspect::{exif_timestamp, inspect_photo, SidecarText, TextSource};

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::models::{Diagnostic, PhotoCategory, PhotoRecord};

/// Errors that can occur during photo analysis.
#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("Images path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result of analysing a photo directory.
#[derive(Debug, Clone, Default)]
pub struct PhotoAnalysis {
    pub photos: Vec<PhotoRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

impl PhotoAnalysis {
    /// Photos per category, for categories with at least one photo.
    pub fn category_counts(&self) -> BTreeMap<PhotoCategory, usize> {
        let mut counts = BTreeMap::new();
        for photo in &self.photos {
            *counts.entry(photo.category).or_insert(0) += 1;
        }
        counts
    }

    /// Players by number of photos they were detected in, most first,
    /// ties by name.
    pub fn most_photographed(&self, limit: usize) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for photo in &self.photos {
            for player in &photo.detected_players {
                *counts.entry(player.as_str()).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(p, c)| (p.to_string(), c))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }
}

/// Analyse every photo under `dir`. Photos that cannot be read are skipped
/// with a diagnostic.
pub fn analyze_photos(
    dir: &Path,
    roster: &[String],
    threshold: u8,
    text: &dyn TextSource,
) -> Result<PhotoAnalysis, PhotoError> {
    info!("Analyzing photos in: {:?}", dir);

    let mut analysis = PhotoAnalysis::default();
    for path in discover_photos(dir)? {
        let inspection = match inspect_photo(&path, text) {
            Ok(i) => i,
            Err(e) => {
                warn!("Error processing {:?}: {}", path, e);
                analysis.diagnostics.push(Diagnostic::PhotoSkipped {
                    path: path.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let detected_players =
            detect_players(roster, &file_name, &inspection.facts.text, threshold);

        analysis.photos.push(PhotoRecord {
            category: categorize(&inspection.facts),
            path,
            file_name,
            facts: inspection.facts,
            size_bytes: inspection.size_bytes,
            modified: inspection.modified,
            detected_players,
        });
    }

    info!("Analyzed {} images", analysis.photos.len());
    info!("Player appearances: {:?}", analysis.most_photographed(usize::MAX));
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::fs;

    fn roster() -> Vec<String> {
        vec!["Harshith Sai".to_string(), "Pushkar P".to_string()]
    }

    #[test]
    fn test_analyze_photos() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path();

        RgbImage::from_pixel(30, 10, Rgb([10, 10, 10]))
            .save(dir.join("team_harshith.png"))
            .unwrap();
        RgbImage::from_pixel(10, 20, Rgb([10, 10, 10]))
            .save(dir.join("bowling.png"))
            .unwrap();
        fs::write(dir.join("bowling.png.txt"), "Pushkar P 3/12").unwrap();
        fs::write(dir.join("corrupt.jpg"), b"garbage").unwrap();

        let analysis = analyze_photos(dir, &roster(), 70, &SidecarText).unwrap();

        assert_eq!(analysis.photos.len(), 2);
        assert_eq!(analysis.photos[0].file_name, "bowling.png");
        assert_eq!(analysis.photos[0].category, PhotoCategory::ActionShot);
        assert_eq!(analysis.photos[0].detected_players, vec!["Pushkar P"]);
        assert_eq!(analysis.photos[1].category, PhotoCategory::TeamCelebration);
        assert_eq!(analysis.photos[1].detected_players, vec!["Harshith Sai"]);

        assert_eq!(analysis.diagnostics.len(), 1);
        assert_eq!(analysis.diagnostics[0].kind(), "photo_skipped");
    }

    #[test]
    fn test_counts() {
        let mk = |category, players: &[&str]| PhotoRecord {
            path: PathBuf::from("x.jpg"),
            file_name: "x.jpg".to_string(),
            category,
            facts: crate::models::PhotoFacts {
                width: 1,
                height: 1,
                mean_rgb: [0.0; 3],
                text: String::new(),
            },
            size_bytes: 0,
            modified: None,
            detected_players: players.iter().map(|p| p.to_string()).collect(),
        };
        let analysis = PhotoAnalysis {
            photos: vec![
                mk(PhotoCategory::Other, &["B", "A"]),
                mk(PhotoCategory::Other, &["B"]),
                mk(PhotoCategory::ActionShot, &["C"]),
            ],
            diagnostics: Vec::new(),
        };

        let counts = analysis.category_counts();
        assert_eq!(counts[&PhotoCategory::Other], 2);
        assert_eq!(counts[&PhotoCategory::ActionShot], 1);
        assert_eq!(
            analysis.most_photographed(2),
            vec![("B".to_string(), 2), ("A".to_string(), 1)]
        );
    }
}
