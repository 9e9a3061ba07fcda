//! Spotlight results for designated players.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::PlayerAggregate;

/// Signed distance to the last place of a full leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    /// The player's own value for the leaderboard column
    pub value: f64,

    /// The 5th-place value
    pub cutoff_value: f64,

    /// Positive means the player trails the cutoff
    pub margin: f64,
}

impl Margin {
    pub fn is_behind(&self) -> bool {
        self.margin > 0.0
    }
}

/// Where a spotlight player stands on one leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Standing {
    Ranked { rank: usize },
    Outside(Margin),
    /// Leaderboard not full, or a value was undefined
    Unplaced,
}

/// Spotlight report for one designated player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotlightResult {
    pub player: String,

    pub stats: PlayerAggregate,

    /// Standing per leaderboard key
    pub standings: BTreeMap<String, Standing>,

    /// Runs per input row, in date order
    pub sparkline: Vec<f64>,
}

impl SpotlightResult {
    /// Leaderboards on which the player is ranked.
    pub fn ranks(&self) -> impl Iterator<Item = (&str, usize)> {
        self.standings.iter().filter_map(|(key, standing)| match standing {
            Standing::Ranked { rank } => Some((key.as_str(), *rank)),
            _ => None,
        })
    }

    /// Leaderboards on which the player has a margin to the cutoff.
    pub fn margins(&self) -> impl Iterator<Item = (&str, &Margin)> {
        self.standings.iter().filter_map(|(key, standing)| match standing {
            Standing::Outside(margin) => Some((key.as_str(), margin)),
            _ => None,
        })
    }

    pub fn top5_appearances(&self) -> usize {
        self.ranks().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Counters, DerivedMetrics};

    fn spotlight() -> SpotlightResult {
        let mut standings = BTreeMap::new();
        standings.insert("batting_runs".to_string(), Standing::Ranked { rank: 2 });
        standings.insert(
            "bowling_wickets".to_string(),
            Standing::Outside(Margin {
                value: 4.0,
                cutoff_value: 6.0,
                margin: 2.0,
            }),
        );
        standings.insert("fielding_dismissals".to_string(), Standing::Unplaced);

        SpotlightResult {
            player: "Akhil Reddy Danda".to_string(),
            stats: PlayerAggregate {
                player: "Akhil Reddy Danda".to_string(),
                rows: 1,
                counters: Counters::zeroed(),
                metrics: DerivedMetrics::default(),
            },
            standings,
            sparkline: vec![],
        }
    }

    #[test]
    fn test_ranks_and_margins() {
        let s = spotlight();
        assert_eq!(s.ranks().collect::<Vec<_>>(), vec![("batting_runs", 2)]);
        assert_eq!(s.top5_appearances(), 1);

        let margins: Vec<_> = s.margins().collect();
        assert_eq!(margins.len(), 1);
        assert_eq!(margins[0].0, "bowling_wickets");
        assert!(margins[0].1.is_behind());
    }

    #[test]
    fn test_standing_serialization() {
        let json = serde_json::to_string(&Standing::Ranked { rank: 1 }).unwrap();
        assert_eq!(json, r#"{"status":"ranked","rank":1}"#);

        let json = serde_json::to_string(&Standing::Unplaced).unwrap();
        assert_eq!(json, r#"{"status":"unplaced"}"#);
    }
}
