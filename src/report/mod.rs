//! Executive summary and chart rendering.
//!
//! - **markdown** / **html**: the executive summary in two formats
//! - **charts**: PNG bar charts and sparklines
//! - **gallery**: photo contact sheet

pub mod charts;
pub mod gallery;
pub mod html;
pub mod markdown;

pub use charts::{render_category_chart, render_leaderboard_chart, render_sparkline};
pub use gallery::render_contact_sheet;
pub use html::HtmlFormatter;
pub use markdown::MarkdownFormatter;

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::models::{
    Counter, DerivedStat, Diagnostics, Leaderboard, PhotoCategory, SpotlightResult, Stat,
};

/// Errors that can occur while rendering an artefact.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Plot error: {0}")]
    Plot(String),

    #[error("Nothing to draw: {0}")]
    EmptyChart(String),
}

/// Photo figures shown in the summary.
#[derive(Debug, Clone, Default)]
pub struct PhotoSummary {
    pub total: usize,
    pub categories: BTreeMap<PhotoCategory, usize>,
    pub most_photographed: Vec<(String, usize)>,
}

/// Everything the summary formatters need.
#[derive(Debug, Clone)]
pub struct SummaryContext<'a> {
    pub generated_at: NaiveDateTime,
    pub leaderboards: &'a [Leaderboard],
    pub spotlights: &'a [SpotlightResult],
    pub photos: Option<PhotoSummary>,
    pub diagnostics: &'a Diagnostics,
}

/// A headline figure: who leads a key leaderboard and by how much.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub label: &'static str,
    pub player: String,
    pub value: String,
}

const HIGHLIGHTS: [(&str, &str, &str); 3] = [
    ("Top Run Scorer", "batting_runs", "runs"),
    ("Top Wicket Taker", "bowling_wickets", "wickets"),
    ("Best Batting Average", "batting_avg", ""),
];

impl SummaryContext<'_> {
    pub fn leaderboard(&self, key: &str) -> Option<&Leaderboard> {
        self.leaderboards.iter().find(|b| b.key() == key)
    }

    /// Leaders of the headline leaderboards, skipping empty ones.
    pub fn highlights(&self) -> Vec<Highlight> {
        HIGHLIGHTS
            .iter()
            .filter_map(|(label, key, unit)| {
                let board = self.leaderboard(key)?;
                let leader = board.leader()?;
                let mut value = format_stat(board.metric.column, leader.value);
                if !unit.is_empty() {
                    value = format!("{} {}", value, unit);
                }
                Some(Highlight {
                    label: *label,
                    player: leader.player.clone(),
                    value,
                })
            })
            .collect()
    }

    pub fn generated(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Format a stat value: whole numbers for counts, two decimals for rates.
pub fn format_stat(stat: Stat, value: f64) -> String {
    let whole = match stat {
        Stat::Counter(Counter::Overs) => false,
        Stat::Counter(_) => true,
        Stat::Derived(d) => matches!(
            d,
            DerivedStat::Dismissals | DerivedStat::Boundaries | DerivedStat::DismissalsField
        ),
    };
    if whole {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Optional value with a dash for unknown.
pub fn format_optional(stat: Stat, value: Option<f64>) -> String {
    value
        .map(|v| format_stat(stat, v))
        .unwrap_or_else(|| "-".to_string())
}

/// `batting_avg_bowl` → `Batting Avg Bowl`.
pub fn humanize_key(key: &str) -> String {
    key.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Phrase for a margin: how far behind or ahead of 5th place.
pub fn margin_phrase(margin: f64) -> String {
    let side = if margin > 0.0 { "behind" } else { "ahead" };
    format!("{:.2} {}", margin.abs(), side)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlights() {
        let f = fixtures::fixture();
        let ctx = fixtures::context(&f, None);

        let highlights = ctx.highlights();
        assert_eq!(highlights.len(), 3);
        assert_eq!(
            highlights[0],
            Highlight {
                label: "Top Run Scorer",
                player: "Faizan Mohammad".to_string(),
                value: "210 runs".to_string(),
            }
        );
        assert_eq!(highlights[1].player, "Dr. Vishnu Reddy");
        assert_eq!(highlights[1].value, "9 wickets");
        assert_eq!(highlights[2].label, "Best Batting Average");
        assert_eq!(ctx.generated(), "2025-06-01 09:30:00");
    }

    #[test]
    fn test_format_stat() {
        assert_eq!(format_stat(Stat::Counter(Counter::Runs), 1234.0), "1234");
        assert_eq!(format_stat(Stat::Counter(Counter::Overs), 3.5), "3.50");
        assert_eq!(format_stat(Stat::Derived(DerivedStat::Avg), 40.0), "40.00");
        assert_eq!(
            format_stat(Stat::Derived(DerivedStat::DismissalsField), 4.0),
            "4"
        );
        assert_eq!(format_optional(Stat::Derived(DerivedStat::Sr), None), "-");
    }

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("bowling_avg_bowl"), "Bowling Avg Bowl");
        assert_eq!(humanize_key("fielding_dismissals"), "Fielding Dismissals");
    }

    #[test]
    fn test_margin_phrase() {
        assert_eq!(margin_phrase(3.0), "3.00 behind");
        assert_eq!(margin_phrase(-1.25), "1.25 ahead");
        assert_eq!(margin_phrase(0.0), "0.00 ahead");
    }
}
