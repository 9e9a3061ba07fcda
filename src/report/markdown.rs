use super::{format_optional, format_stat, humanize_key, margin_phrase, PhotoSummary, SummaryContext};
use crate::models::{Counter, DerivedStat, Diagnostics, Leaderboard, SpotlightResult, Stat};

/// Diagnostics listed individually before the summary switches to counts only.
pub const MAX_LISTED_DIAGNOSTICS: usize = 20;

/// Markdown formatter for the executive summary
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn format(ctx: &SummaryContext<'_>) -> String {
        let mut md = String::with_capacity(4096);

        md.push_str("# Cricket Statistics - Executive Summary\n\n");
        md.push_str(&format!("*Generated: {}*\n\n", ctx.generated()));

        md.push_str("## Key Highlights\n\n");
        let highlights = ctx.highlights();
        if highlights.is_empty() {
            md.push_str("No leaderboard data available.\n");
        }
        for h in &highlights {
            md.push_str(&format!("- **{}**: {} ({})\n", h.label, h.player, h.value));
        }
        md.push('\n');

        md.push_str("## Spotlight Players\n\n");
        if ctx.spotlights.is_empty() {
            md.push_str("No spotlight players found in the data.\n\n");
        }
        for spotlight in ctx.spotlights {
            Self::format_spotlight(&mut md, spotlight);
        }

        md.push_str("## Leaderboards\n\n");
        for board in ctx.leaderboards {
            Self::format_leaderboard(&mut md, board);
        }

        if let Some(photos) = &ctx.photos {
            Self::format_photos(&mut md, photos);
        }

        Self::format_diagnostics(&mut md, ctx.diagnostics);

        md
    }

    fn format_spotlight(md: &mut String, spotlight: &SpotlightResult) {
        let stats = &spotlight.stats;
        md.push_str(&format!("### {}\n\n", spotlight.player));
        md.push_str(&format!(
            "- Matches: {}\n",
            format_optional(Stat::Counter(Counter::Matches), stats.counters.matches)
        ));
        md.push_str(&format!(
            "- Runs: {} (Avg: {})\n",
            format_optional(Stat::Counter(Counter::Runs), stats.counters.runs),
            format_optional(Stat::Derived(DerivedStat::Avg), stats.metrics.avg)
        ));
        md.push_str(&format!(
            "- Wickets: {}\n",
            format_optional(Stat::Counter(Counter::Wickets), stats.counters.wickets)
        ));
        md.push_str(&format!(
            "- Top-5 Appearances: {}\n\n",
            spotlight.top5_appearances()
        ));

        let ranks: Vec<_> = spotlight.ranks().collect();
        if !ranks.is_empty() {
            md.push_str("**Ranks**\n\n");
            for (key, rank) in ranks {
                md.push_str(&format!("- #{} in {}\n", rank, humanize_key(key)));
            }
            md.push('\n');
        }

        let margins: Vec<_> = spotlight.margins().collect();
        if !margins.is_empty() {
            md.push_str("**Margins to #5**\n\n");
            for (key, margin) in margins {
                md.push_str(&format!(
                    "- {}: {}\n",
                    humanize_key(key),
                    margin_phrase(margin.margin)
                ));
            }
            md.push('\n');
        }
    }

    fn format_leaderboard(md: &mut String, board: &Leaderboard) {
        let column = board.metric.column;
        md.push_str(&format!("### {}\n\n", board.metric.title));

        if board.entries.is_empty() {
            md.push_str("No eligible players.\n\n");
            return;
        }
        if board.gate_relaxed {
            md.push_str("*No player met the minimum sample; all players ranked.*\n\n");
        }

        md.push_str(&format!("| Rank | Player | {} |\n", humanize_key(column.column())));
        md.push_str("|------|--------|------|\n");
        for entry in &board.entries {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                entry.rank,
                entry.player,
                format_stat(column, entry.value)
            ));
        }
        md.push('\n');
    }

    fn format_photos(md: &mut String, photos: &PhotoSummary) {
        md.push_str("## Photo Analysis\n\n");
        md.push_str(&format!("- Total images analyzed: {}\n", photos.total));
        for (category, count) in &photos.categories {
            md.push_str(&format!("- **{}:** {} photos\n", category.label(), count));
        }

        if !photos.most_photographed.is_empty() {
            md.push_str("\nMost Photographed Players:\n\n");
            for (player, count) in &photos.most_photographed {
                md.push_str(&format!("- {}: {} appearances\n", player, count));
            }
        }
        md.push('\n');
    }

    fn format_diagnostics(md: &mut String, diagnostics: &Diagnostics) {
        md.push_str("## Data Quality\n\n");
        if diagnostics.is_empty() {
            md.push_str("No data quality issues found.\n");
            return;
        }

        md.push_str("| Issue | Count |\n|-------|-------|\n");
        for (kind, count) in diagnostics.counts_by_kind() {
            md.push_str(&format!("| {} | {} |\n", humanize_key(kind), count));
        }
        md.push('\n');

        for diagnostic in diagnostics.iter().take(MAX_LISTED_DIAGNOSTICS) {
            md.push_str(&format!("- {}\n", diagnostic));
        }
        if diagnostics.len() > MAX_LISTED_DIAGNOSTICS {
            md.push_str(&format!(
                "- ... and {} more (see diagnostics.jsonl)\n",
                diagnostics.len() - MAX_LISTED_DIAGNOSTICS
            ));
        }
    }
}
