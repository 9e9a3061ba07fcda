//! Top-5 leaderboard construction.

use std::cmp::Ordering;

use tracing::{info, warn};

use crate::config::Thresholds;
use crate::models::{
    Counter, DerivedStat, Diagnostic, Direction, Leaderboard, LeaderboardEntry, MetricFamily,
    MetricSpec, PlayerAggregate, Stat, LEADERBOARD_SIZE,
};

/// The leaderboards produced by a run, in report order.
pub fn metric_catalogue(thresholds: &Thresholds) -> Vec<MetricSpec> {
    use Direction::{Ascending, Descending};
    use MetricFamily::{Batting, Bowling, Fielding};

    vec![
        MetricSpec::new(Batting, Stat::Counter(Counter::Runs), "Runs", Descending),
        MetricSpec::new(
            Batting,
            Stat::Derived(DerivedStat::Avg),
            "Batting Average",
            Descending,
        )
        .with_gate(
            Stat::Counter(Counter::Innings),
            f64::from(thresholds.min_innings_for_bat_avg),
        ),
        MetricSpec::new(Batting, Stat::Derived(DerivedStat::Sr), "Strike Rate", Descending)
            .with_gate(
                Stat::Counter(Counter::Balls),
                f64::from(thresholds.min_balls_for_sr),
            ),
        MetricSpec::new(
            Batting,
            Stat::Derived(DerivedStat::Boundaries),
            "Boundaries",
            Descending,
        ),
        MetricSpec::new(
            Batting,
            Stat::Counter(Counter::Highest),
            "Highest Score",
            Descending,
        ),
        MetricSpec::new(Bowling, Stat::Counter(Counter::Wickets), "Wickets", Descending),
        MetricSpec::new(
            Bowling,
            Stat::Derived(DerivedStat::AvgBowl),
            "Bowling Average",
            Ascending,
        )
        .with_gate(
            Stat::Counter(Counter::Wickets),
            f64::from(thresholds.min_wickets_for_bowl_avg),
        ),
        MetricSpec::new(
            Bowling,
            Stat::Derived(DerivedStat::Economy),
            "Economy Rate",
            Ascending,
        )
        .with_gate(
            Stat::Counter(Counter::Overs),
            f64::from(thresholds.min_overs_for_econ),
        ),
        MetricSpec::new(
            Fielding,
            Stat::Derived(DerivedStat::DismissalsField),
            "Fielding Dismissals",
            Descending,
        )
        .with_key("fielding_dismissals"),
    ]
}

/// Rank players on one metric.
///
/// Players failing the gate are excluded unless nobody passes, in which case
/// the whole population is ranked and `gate_relaxed` is set. Undefined values
/// are dropped, then players are ordered by value in the metric's direction
/// with ties broken by name ascending.
pub fn build_leaderboard(players: &[PlayerAggregate], metric: &MetricSpec) -> Leaderboard {
    let mut pool: Vec<&PlayerAggregate> = players.iter().collect();
    let mut gate_relaxed = false;

    if let Some(gate) = &metric.gate {
        let eligible: Vec<&PlayerAggregate> = players
            .iter()
            .filter(|p| p.stat(gate.column).is_some_and(|v| v >= gate.minimum))
            .collect();
        if eligible.is_empty() {
            warn!(
                "No players meet threshold for {} ({} >= {}). Relaxing...",
                metric.title, gate.column, gate.minimum
            );
            gate_relaxed = true;
        } else {
            pool = eligible;
        }
    }

    let mut ranked: Vec<(&str, f64)> = pool
        .into_iter()
        .filter_map(|p| p.stat(metric.column).map(|v| (p.player.as_str(), v)))
        .collect();

    ranked.sort_by(|(name_a, a), (name_b, b)| {
        let by_value = match metric.direction {
            Direction::Ascending => a.total_cmp(b),
            Direction::Descending => b.total_cmp(a),
        };
        match by_value {
            Ordering::Equal => name_a.cmp(name_b),
            other => other,
        }
    });

    let entries: Vec<LeaderboardEntry> = ranked
        .into_iter()
        .take(LEADERBOARD_SIZE)
        .enumerate()
        .map(|(i, (player, value))| LeaderboardEntry {
            player: player.to_string(),
            value,
            rank: i + 1,
        })
        .collect();

    info!("Top-5 {}: {} players", metric.title, entries.len());

    Leaderboard {
        metric: metric.clone(),
        gate_relaxed,
        entries,
    }
}

/// Build every catalogue leaderboard, reporting relaxed gates.
pub fn build_leaderboards(
    players: &[PlayerAggregate],
    catalogue: &[MetricSpec],
) -> (Vec<Leaderboard>, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let boards: Vec<Leaderboard> = catalogue
        .iter()
        .map(|metric| build_leaderboard(players, metric))
        .collect();

    for board in &boards {
        if let (true, Some(gate)) = (board.gate_relaxed, &board.metric.gate) {
            diagnostics.push(Diagnostic::GateRelaxed {
                leaderboard: board.metric.key.clone(),
                column: gate.column.column().to_string(),
                minimum: gate.minimum,
            });
        }
    }

    (boards, diagnostics)
}
