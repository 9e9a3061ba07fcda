//! Per-player aggregates and derived metrics.

use serde::{Deserialize, Serialize};

use super::{Counter, Counters};

/// Derived statistics for a row or an aggregated player.
///
/// `None` is the "undefined" marker: a zero or unknown divisor, or an
/// unknown dividend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub dismissals: Option<f64>,
    pub avg: Option<f64>,
    pub sr: Option<f64>,
    pub boundaries: Option<f64>,
    pub economy: Option<f64>,
    pub avg_bowl: Option<f64>,
    pub strike_rate_bowl: Option<f64>,
    pub dismissals_field: Option<f64>,
}

/// A derived statistic column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedStat {
    Dismissals,
    Avg,
    Sr,
    Boundaries,
    Economy,
    AvgBowl,
    StrikeRateBowl,
    DismissalsField,
}

impl DerivedStat {
    pub const ALL: [DerivedStat; 8] = [
        DerivedStat::Dismissals,
        DerivedStat::Avg,
        DerivedStat::Sr,
        DerivedStat::Boundaries,
        DerivedStat::Economy,
        DerivedStat::AvgBowl,
        DerivedStat::StrikeRateBowl,
        DerivedStat::DismissalsField,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            DerivedStat::Dismissals => "dismissals",
            DerivedStat::Avg => "avg",
            DerivedStat::Sr => "sr",
            DerivedStat::Boundaries => "boundaries",
            DerivedStat::Economy => "economy",
            DerivedStat::AvgBowl => "avg_bowl",
            DerivedStat::StrikeRateBowl => "strike_rate_bowl",
            DerivedStat::DismissalsField => "dismissals_field",
        }
    }
}

impl DerivedMetrics {
    pub fn get(&self, stat: DerivedStat) -> Option<f64> {
        match stat {
            DerivedStat::Dismissals => self.dismissals,
            DerivedStat::Avg => self.avg,
            DerivedStat::Sr => self.sr,
            DerivedStat::Boundaries => self.boundaries,
            DerivedStat::Economy => self.economy,
            DerivedStat::AvgBowl => self.avg_bowl,
            DerivedStat::StrikeRateBowl => self.strike_rate_bowl,
            DerivedStat::DismissalsField => self.dismissals_field,
        }
    }
}

/// Any column of the aggregated player table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stat {
    Counter(Counter),
    Derived(DerivedStat),
}

impl Stat {
    /// All columns of the full player table, counters first.
    pub fn all() -> Vec<Stat> {
        Counter::ALL
            .iter()
            .copied()
            .map(Stat::Counter)
            .chain(DerivedStat::ALL.iter().copied().map(Stat::Derived))
            .collect()
    }

    pub fn column(&self) -> &'static str {
        match self {
            Stat::Counter(c) => c.column(),
            Stat::Derived(d) => d.column(),
        }
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// One row per canonical player: summed counters plus recomputed metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAggregate {
    /// Canonical roster name
    pub player: String,

    /// Number of input rows folded into this aggregate
    pub rows: usize,

    pub counters: Counters,

    pub metrics: DerivedMetrics,
}

impl PlayerAggregate {
    /// Look up any column by its explicit identifier.
    pub fn stat(&self, stat: Stat) -> Option<f64> {
        match stat {
            Stat::Counter(c) => self.counters.get(c),
            Stat::Derived(d) => self.metrics.get(d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_all_columns() {
        let all = Stat::all();
        assert_eq!(all.len(), Counter::ALL.len() + DerivedStat::ALL.len());
        assert_eq!(all[0].column(), "matches");
        assert_eq!(all.last().unwrap().column(), "dismissals_field");
    }

    #[test]
    fn test_stat_lookup() {
        let mut counters = Counters::zeroed();
        counters.wickets = Some(7.0);
        let aggregate = PlayerAggregate {
            player: "Nithesh Y".to_string(),
            rows: 2,
            counters,
            metrics: DerivedMetrics {
                economy: Some(6.5),
                ..Default::default()
            },
        };

        assert_eq!(aggregate.stat(Stat::Counter(Counter::Wickets)), Some(7.0));
        assert_eq!(aggregate.stat(Stat::Derived(DerivedStat::Economy)), Some(6.5));
        assert_eq!(aggregate.stat(Stat::Derived(DerivedStat::Avg)), None);
    }
}
