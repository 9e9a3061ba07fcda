//! Leaderboard models.

use serde::{Deserialize, Serialize};

use super::Stat;

/// Maximum number of entries on a leaderboard.
pub const LEADERBOARD_SIZE: usize = 5;

/// Sort direction for a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Lower is better (economy, bowling average)
    Ascending,
    /// Higher is better
    Descending,
}

/// Which part of the game a leaderboard belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricFamily {
    Batting,
    Bowling,
    Fielding,
}

impl MetricFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricFamily::Batting => "batting",
            MetricFamily::Bowling => "bowling",
            MetricFamily::Fielding => "fielding",
        }
    }
}

/// Minimum-sample eligibility gate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub column: Stat,
    pub minimum: f64,
}

impl Gate {
    pub fn new(column: Stat, minimum: f64) -> Self {
        Self { column, minimum }
    }
}

/// One entry of the metric table: leaderboard key → aggregate column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSpec {
    /// Leaderboard key, e.g. `bowling_economy`
    pub key: String,

    /// Human readable title, e.g. "Economy Rate"
    pub title: String,

    pub family: MetricFamily,

    /// Aggregate column the leaderboard ranks by
    pub column: Stat,

    pub direction: Direction,

    pub gate: Option<Gate>,
}

impl MetricSpec {
    pub fn new(family: MetricFamily, column: Stat, title: &str, direction: Direction) -> Self {
        Self {
            key: format!("{}_{}", family.as_str(), column.column()),
            title: title.to_string(),
            family,
            column,
            direction,
            gate: None,
        }
    }

    /// Override the generated key.
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    pub fn with_gate(mut self, column: Stat, minimum: f64) -> Self {
        self.gate = Some(Gate::new(column, minimum));
        self
    }
}

/// A ranked leaderboard entry. Rank is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player: String,
    pub value: f64,
    pub rank: usize,
}

/// Top-N table for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub metric: MetricSpec,

    /// True when nobody met the gate and the ungated population was used
    pub gate_relaxed: bool,

    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn key(&self) -> &str {
        &self.metric.key
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() == LEADERBOARD_SIZE
    }

    pub fn leader(&self) -> Option<&LeaderboardEntry> {
        self.entries.first()
    }

    /// The last entry of a full leaderboard.
    pub fn cutoff(&self) -> Option<&LeaderboardEntry> {
        if self.is_full() {
            self.entries.last()
        } else {
            None
        }
    }

    pub fn rank_of(&self, player: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.player == player)
            .map(|e| e.rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Counter, DerivedStat};

    fn entries(n: usize) -> Vec<LeaderboardEntry> {
        (1..=n)
            .map(|rank| LeaderboardEntry {
                player: format!("Player {}", rank),
                value: 100.0 - rank as f64,
                rank,
            })
            .collect()
    }

    #[test]
    fn test_metric_spec_key() {
        let spec = MetricSpec::new(
            MetricFamily::Bowling,
            Stat::Derived(DerivedStat::Economy),
            "Economy Rate",
            Direction::Ascending,
        )
        .with_gate(Stat::Counter(Counter::Overs), 10.0);

        assert_eq!(spec.key, "bowling_economy");
        assert_eq!(spec.gate.unwrap().minimum, 10.0);
    }

    #[test]
    fn test_metric_spec_key_override() {
        let spec = MetricSpec::new(
            MetricFamily::Fielding,
            Stat::Derived(DerivedStat::DismissalsField),
            "Fielding Dismissals",
            Direction::Descending,
        )
        .with_key("fielding_dismissals");

        assert_eq!(spec.key, "fielding_dismissals");
        assert_eq!(spec.column.column(), "dismissals_field");
    }

    #[test]
    fn test_leaderboard_cutoff() {
        let metric = MetricSpec::new(
            MetricFamily::Batting,
            Stat::Counter(Counter::Runs),
            "Runs",
            Direction::Descending,
        );
        let full = Leaderboard {
            metric: metric.clone(),
            gate_relaxed: false,
            entries: entries(5),
        };
        assert_eq!(full.cutoff().unwrap().rank, 5);
        assert_eq!(full.rank_of("Player 3"), Some(3));
        assert_eq!(full.rank_of("Nobody"), None);

        let short = Leaderboard {
            metric,
            gate_relaxed: false,
            entries: entries(3),
        };
        assert!(short.cutoff().is_none());
        assert_eq!(short.leader().unwrap().player, "Player 1");
    }

    #[test]
    fn test_direction_serialization() {
        let json = serde_json::to_string(&Direction::Ascending).unwrap();
        assert_eq!(json, "\"ascending\"");
    }
}
