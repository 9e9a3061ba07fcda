//! Statistics calculation engine.
//!
//! Computes derived metrics from reconciled rows:
//! - Per-row and per-player batting, bowling and fielding metrics
//! - Per-player aggregation over summed raw counters
//! - Top-5 leaderboards with eligibility gates
//! - Spotlight standings for designated players

pub mod leaderboard;
pub mod spotlight;

pub use leaderboard::{build_leaderboard, build_leaderboards, metric_catalogue};
pub use spotlight::{build_spotlights, standing_for};

use std::collections::BTreeMap;

use tracing::info;

use crate::models::{Counter, Counters, DerivedMetrics, PlayerAggregate, PlayerRow};

/// Divide, or `None` when the divisor is zero or either side is unknown.
pub fn safe_divide(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

fn add(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(a? + b?)
}

/// Compute derived metrics from raw counters.
///
/// Used identically for single rows and for aggregated players.
pub fn derive_metrics(c: &Counters) -> DerivedMetrics {
    let dismissals = match (c.innings, c.not_outs) {
        (Some(innings), Some(not_outs)) => Some((innings - not_outs).max(0.0)),
        _ => None,
    };

    DerivedMetrics {
        dismissals,
        avg: safe_divide(c.runs, dismissals),
        sr: safe_divide(c.runs.map(|r| r * 100.0), c.balls),
        boundaries: add(c.fours, c.sixes),
        economy: safe_divide(c.runs_conceded, c.overs),
        avg_bowl: safe_divide(c.runs_conceded, c.wickets),
        strike_rate_bowl: safe_divide(c.balls_bowled, c.wickets),
        dismissals_field: add(add(c.catches, c.stumpings), c.run_outs),
    }
}

/// Fill `balls_bowled` from overs × 6 when the input carried no such column.
pub fn estimate_balls_bowled(rows: &mut [PlayerRow]) {
    for row in rows.iter_mut() {
        let counters = &mut row.record.counters;
        counters.balls_bowled = counters.overs.map(|o| o * 6.0);
    }
    info!("Estimated balls_bowled from overs");
}

/// Fold rows into one aggregate per canonical player, sorted by name.
///
/// Counters are summed with unknown cells contributing zero; `highest` is a
/// maximum and stays unknown only if every row is unknown. Derived metrics
/// are recomputed from the folded counters.
pub fn aggregate_players(rows: &[PlayerRow]) -> Vec<PlayerAggregate> {
    let mut folded: BTreeMap<&str, (usize, Counters)> = BTreeMap::new();

    for row in rows {
        let (count, totals) = folded
            .entry(row.player.as_str())
            .or_insert_with(|| (0, empty_totals()));
        *count += 1;

        for counter in Counter::ALL {
            let value = row.record.counters.get(counter);
            let current = totals.get(counter);
            let next = if counter.aggregates_by_max() {
                match (current, value) {
                    (Some(a), Some(b)) => Some(a.max(b)),
                    (a, b) => a.or(b),
                }
            } else {
                Some(current.unwrap_or(0.0) + value.unwrap_or(0.0))
            };
            totals.set(counter, next);
        }
    }

    let aggregates: Vec<PlayerAggregate> = folded
        .into_iter()
        .map(|(player, (rows, counters))| PlayerAggregate {
            player: player.to_string(),
            rows,
            metrics: derive_metrics(&counters),
            counters,
        })
        .collect();

    info!("Aggregated stats for {} players", aggregates.len());
    aggregates
}

fn empty_totals() -> Counters {
    let mut totals = Counters::zeroed();
    totals.highest = None;
    totals
}
