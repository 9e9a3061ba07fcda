//! Spotlight standings for designated players.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::models::{
    Diagnostic, Direction, Leaderboard, Margin, PlayerAggregate, PlayerRow, SpotlightResult,
    Standing,
};

/// Standing of one player on one leaderboard.
///
/// Ranked players get their rank. Otherwise, on a full leaderboard, the
/// margin to 5th place is computed from the leaderboard's own column; the
/// margin is positive when the player trails. Anything else is unplaced.
pub fn standing_for(player: &PlayerAggregate, board: &Leaderboard) -> Standing {
    if let Some(rank) = board.rank_of(&player.player) {
        return Standing::Ranked { rank };
    }

    let Some(cutoff) = board.cutoff() else {
        return Standing::Unplaced;
    };
    let Some(value) = player.stat(board.metric.column) else {
        return Standing::Unplaced;
    };

    let margin = match board.metric.direction {
        Direction::Descending => cutoff.value - value,
        Direction::Ascending => value - cutoff.value,
    };

    Standing::Outside(Margin {
        value,
        cutoff_value: cutoff.value,
        margin,
    })
}

/// Runs per row for one player, in date order.
///
/// ISO dates sort chronologically; other date strings sort lexically after
/// them. Rows without a date come last, in input order. A player with no
/// dated rows at all has no sparkline.
pub fn sparkline(player: &str, rows: &[PlayerRow]) -> Vec<f64> {
    let mut points: Vec<(Option<NaiveDate>, Option<&str>, f64)> = rows
        .iter()
        .filter(|r| r.player == player)
        .map(|row| {
            let date = row.record.date.as_deref().map(str::trim).filter(|d| !d.is_empty());
            let parsed = date.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
            (parsed, date, row.record.counters.runs.unwrap_or(0.0))
        })
        .collect();

    if points.iter().all(|(_, date, _)| date.is_none()) {
        return Vec::new();
    }

    // Stable sort: undated rows keep their input order.
    points.sort_by(|a, b| {
        let rank = |p: &(Option<NaiveDate>, Option<&str>, f64)| match p {
            (Some(_), _, _) => 0,
            (None, Some(_), _) => 1,
            (None, None, _) => 2,
        };
        rank(a).cmp(&rank(b)).then_with(|| match (a, b) {
            ((Some(x), _, _), (Some(y), _, _)) => x.cmp(y),
            ((None, Some(x), _), (None, Some(y), _)) => x.cmp(y),
            _ => Ordering::Equal,
        })
    });

    points.into_iter().map(|(_, _, runs)| runs).collect()
}

/// Build spotlight results for every designated player present in the data.
pub fn build_spotlights(
    designated: &[String],
    players: &[PlayerAggregate],
    boards: &[Leaderboard],
    rows: &[PlayerRow],
) -> (Vec<SpotlightResult>, Vec<Diagnostic>) {
    info!("Generating spotlight reports for: {:?}", designated);

    let mut spotlights = Vec::new();
    let mut diagnostics = Vec::new();

    for name in designated {
        let Some(aggregate) = players.iter().find(|p| &p.player == name) else {
            warn!("Spotlight player '{}' not found in dataset", name);
            diagnostics.push(Diagnostic::SpotlightMissing {
                player: name.clone(),
            });
            continue;
        };

        let standings: BTreeMap<String, Standing> = boards
            .iter()
            .map(|board| (board.key().to_string(), standing_for(aggregate, board)))
            .collect();

        let result = SpotlightResult {
            player: name.clone(),
            stats: aggregate.clone(),
            standings,
            sparkline: sparkline(name, rows),
        };

        info!(
            "Spotlight for {}: {} top-5 appearances",
            name,
            result.top5_appearances()
        );
        spotlights.push(result);
    }

    (spotlights, diagnostics)
}
