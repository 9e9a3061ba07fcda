//! Photo catalogue models.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category assigned to a photo by the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoCategory {
    TrophyCeremony,
    ManOfMatch,
    Leaderboard,
    TeamCelebration,
    IndividualAwards,
    ActionShot,
    Other,
}

impl PhotoCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoCategory::TrophyCeremony => "trophy_ceremony",
            PhotoCategory::ManOfMatch => "man_of_match",
            PhotoCategory::Leaderboard => "leaderboard",
            PhotoCategory::TeamCelebration => "team_celebration",
            PhotoCategory::IndividualAwards => "individual_awards",
            PhotoCategory::ActionShot => "action_shot",
            PhotoCategory::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PhotoCategory::TrophyCeremony => "Trophy Ceremony",
            PhotoCategory::ManOfMatch => "Man Of The Match",
            PhotoCategory::Leaderboard => "Leaderboard",
            PhotoCategory::TeamCelebration => "Team Celebration",
            PhotoCategory::IndividualAwards => "Individual Awards",
            PhotoCategory::ActionShot => "Action Shot",
            PhotoCategory::Other => "Other",
        }
    }

    /// Short description shown in the catalogue.
    pub fn description(&self) -> &'static str {
        match self {
            PhotoCategory::TrophyCeremony => "Trophy ceremony or award presentation",
            PhotoCategory::ManOfMatch => "Man of the Match award",
            PhotoCategory::Leaderboard => "League standings or points table",
            PhotoCategory::TeamCelebration => "Team group photo or celebration",
            PhotoCategory::IndividualAwards => "Individual player with trophy/award",
            PhotoCategory::ActionShot => "Cricket action shot",
            PhotoCategory::Other => "Team moment or cricket scene",
        }
    }
}

impl std::fmt::Display for PhotoCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Measurable properties of an image used by the categorisation rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoFacts {
    pub width: u32,
    pub height: u32,

    /// Mean red, green, blue over all pixels (0-255)
    pub mean_rgb: [f64; 3],

    /// Lowercased extracted text (empty when none)
    pub text: String,
}

impl PhotoFacts {
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            0.0
        } else {
            self.width as f64 / self.height as f64
        }
    }
}

/// One analysed photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub path: PathBuf,
    pub file_name: String,
    pub category: PhotoCategory,
    pub facts: PhotoFacts,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Utc>>,
    pub detected_players: Vec<String>,
}
