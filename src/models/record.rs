//! Raw input rows and their reconciled form.

use serde::{Deserialize, Serialize};

/// A raw numeric counter column in the stats file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    Matches,
    Innings,
    Runs,
    Balls,
    Fours,
    Sixes,
    Highest,
    NotOuts,
    Wickets,
    Overs,
    Maidens,
    RunsConceded,
    Dots,
    Catches,
    Stumpings,
    RunOuts,
    BallsBowled,
}

impl Counter {
    /// Every counter, in output column order.
    pub const ALL: [Counter; 17] = [
        Counter::Matches,
        Counter::Innings,
        Counter::Runs,
        Counter::Balls,
        Counter::Fours,
        Counter::Sixes,
        Counter::Highest,
        Counter::NotOuts,
        Counter::Wickets,
        Counter::Overs,
        Counter::Maidens,
        Counter::RunsConceded,
        Counter::Dots,
        Counter::Catches,
        Counter::Stumpings,
        Counter::RunOuts,
        Counter::BallsBowled,
    ];

    /// Column header in the input and output tables.
    pub fn column(&self) -> &'static str {
        match self {
            Counter::Matches => "matches",
            Counter::Innings => "innings",
            Counter::Runs => "runs",
            Counter::Balls => "balls",
            Counter::Fours => "fours",
            Counter::Sixes => "sixes",
            Counter::Highest => "highest",
            Counter::NotOuts => "not_outs",
            Counter::Wickets => "wickets",
            Counter::Overs => "overs",
            Counter::Maidens => "maidens",
            Counter::RunsConceded => "runs_conceded",
            Counter::Dots => "dots",
            Counter::Catches => "catches",
            Counter::Stumpings => "stumpings",
            Counter::RunOuts => "run_outs",
            Counter::BallsBowled => "balls_bowled",
        }
    }

    /// Whether a missing column is expected rather than a data quality issue.
    ///
    /// `balls_bowled` is estimated from overs when the file does not carry it.
    pub fn is_optional(&self) -> bool {
        matches!(self, Counter::BallsBowled)
    }

    /// Whether the column aggregates by maximum instead of sum.
    pub fn aggregates_by_max(&self) -> bool {
        matches!(self, Counter::Highest)
    }
}

impl std::fmt::Display for Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// Numeric counters for one row (or one aggregated player).
///
/// `None` means the value is unknown: the cell was present but could not
/// be parsed as a number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Counters {
    pub matches: Option<f64>,
    pub innings: Option<f64>,
    pub runs: Option<f64>,
    pub balls: Option<f64>,
    pub fours: Option<f64>,
    pub sixes: Option<f64>,
    pub highest: Option<f64>,
    pub not_outs: Option<f64>,
    pub wickets: Option<f64>,
    pub overs: Option<f64>,
    pub maidens: Option<f64>,
    pub runs_conceded: Option<f64>,
    pub dots: Option<f64>,
    pub catches: Option<f64>,
    pub stumpings: Option<f64>,
    pub run_outs: Option<f64>,
    pub balls_bowled: Option<f64>,
}

impl Counters {
    /// All counters set to zero.
    pub fn zeroed() -> Self {
        let mut counters = Self::default();
        for counter in Counter::ALL {
            counters.set(counter, Some(0.0));
        }
        counters
    }

    /// Read a single counter.
    pub fn get(&self, counter: Counter) -> Option<f64> {
        match counter {
            Counter::Matches => self.matches,
            Counter::Innings => self.innings,
            Counter::Runs => self.runs,
            Counter::Balls => self.balls,
            Counter::Fours => self.fours,
            Counter::Sixes => self.sixes,
            Counter::Highest => self.highest,
            Counter::NotOuts => self.not_outs,
            Counter::Wickets => self.wickets,
            Counter::Overs => self.overs,
            Counter::Maidens => self.maidens,
            Counter::RunsConceded => self.runs_conceded,
            Counter::Dots => self.dots,
            Counter::Catches => self.catches,
            Counter::Stumpings => self.stumpings,
            Counter::RunOuts => self.run_outs,
            Counter::BallsBowled => self.balls_bowled,
        }
    }

    /// Overwrite a single counter.
    pub fn set(&mut self, counter: Counter, value: Option<f64>) {
        let slot = match counter {
            Counter::Matches => &mut self.matches,
            Counter::Innings => &mut self.innings,
            Counter::Runs => &mut self.runs,
            Counter::Balls => &mut self.balls,
            Counter::Fours => &mut self.fours,
            Counter::Sixes => &mut self.sixes,
            Counter::Highest => &mut self.highest,
            Counter::NotOuts => &mut self.not_outs,
            Counter::Wickets => &mut self.wickets,
            Counter::Overs => &mut self.overs,
            Counter::Maidens => &mut self.maidens,
            Counter::RunsConceded => &mut self.runs_conceded,
            Counter::Dots => &mut self.dots,
            Counter::Catches => &mut self.catches,
            Counter::Stumpings => &mut self.stumpings,
            Counter::RunOuts => &mut self.run_outs,
            Counter::BallsBowled => &mut self.balls_bowled,
        };
        *slot = value;
    }
}

/// One row of the input stats file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// 1-based data row number (header excluded)
    pub row: usize,

    /// Player name exactly as it appeared in the file
    pub name: String,

    /// Match date, if the file has a date column
    pub date: Option<String>,

    pub counters: Counters,
}

impl RawRecord {
    pub fn new(row: usize, name: impl Into<String>, counters: Counters) -> Self {
        Self {
            row,
            name: name.into(),
            date: None,
            counters,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}

/// A row whose player name has been reconciled to a roster entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRow {
    /// Canonical roster name
    pub player: String,

    pub record: RawRecord,
}
