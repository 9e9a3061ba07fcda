use super::{format_optional, format_stat, humanize_key, margin_phrase, SummaryContext};
use crate::models::{Counter, DerivedStat, Stat};

/// Escape text for inclusion in HTML element content or attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// HTML formatter for the executive summary
pub struct HtmlFormatter;

impl HtmlFormatter {
    /// Format the summary as standalone HTML with embedded CSS
    pub fn format(ctx: &SummaryContext<'_>) -> String {
        let mut html = String::with_capacity(8192);

        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        html.push_str("<meta charset=\"UTF-8\">\n");
        html.push_str("<title>Cricket Statistics - Executive Summary</title>\n");
        html.push_str("<style>\n");
        html.push_str("body { font-family: Arial, sans-serif; margin: 40px auto; max-width: 900px; line-height: 1.6; }\n");
        html.push_str("h1 { color: #2c3e50; border-bottom: 3px solid #3498db; padding-bottom: 10px; }\n");
        html.push_str("h2 { color: #34495e; margin-top: 30px; }\n");
        html.push_str("h3 { color: #7f8c8d; }\n");
        html.push_str("ul { line-height: 1.8; }\n");
        html.push_str(".timestamp { color: #95a5a6; font-style: italic; }\n");
        html.push_str(".spotlight { background: #eaf2f8; border-left: 4px solid #3498db; padding: 15px; margin: 15px 0; border-radius: 4px; }\n");
        html.push_str(".note { color: #b9770e; font-style: italic; }\n");
        html.push_str(".behind { color: #c0392b; }\n");
        html.push_str(".ahead { color: #1e8449; }\n");
        html.push_str("table { width: 100%; border-collapse: collapse; margin: 16px 0; }\n");
        html.push_str("th { background: #34495e; color: white; text-align: left; padding: 10px; }\n");
        html.push_str("td { padding: 10px; border-bottom: 1px solid #ecf0f1; }\n");
        html.push_str("</style>\n</head>\n<body>\n");

        html.push_str("<h1>Cricket Statistics - Executive Summary</h1>\n");
        html.push_str(&format!(
            "<p class=\"timestamp\">Generated: {}</p>\n",
            ctx.generated()
        ));

        html.push_str("<h2>Key Highlights</h2>\n<ul>\n");
        for h in ctx.highlights() {
            html.push_str(&format!(
                "<li><strong>{}</strong>: {} ({})</li>\n",
                escape(h.label),
                escape(&h.player),
                escape(&h.value)
            ));
        }
        html.push_str("</ul>\n");

        html.push_str("<h2>Spotlight Players</h2>\n");
        for spotlight in ctx.spotlights {
            let stats = &spotlight.stats;
            html.push_str("<div class=\"spotlight\">\n");
            html.push_str(&format!("<h3>{}</h3>\n<ul>\n", escape(&spotlight.player)));
            html.push_str(&format!(
                "<li>Matches: {}</li>\n",
                format_optional(Stat::Counter(Counter::Matches), stats.counters.matches)
            ));
            html.push_str(&format!(
                "<li>Runs: {} (Avg: {})</li>\n",
                format_optional(Stat::Counter(Counter::Runs), stats.counters.runs),
                format_optional(Stat::Derived(DerivedStat::Avg), stats.metrics.avg)
            ));
            html.push_str(&format!(
                "<li>Wickets: {}</li>\n",
                format_optional(Stat::Counter(Counter::Wickets), stats.counters.wickets)
            ));
            html.push_str(&format!(
                "<li>Top-5 Appearances: {}</li>\n</ul>\n",
                spotlight.top5_appearances()
            ));

            for (key, rank) in spotlight.ranks() {
                html.push_str(&format!("<p>#{} in {}</p>\n", rank, humanize_key(key)));
            }
            for (key, margin) in spotlight.margins() {
                let class = if margin.is_behind() { "behind" } else { "ahead" };
                html.push_str(&format!(
                    "<p>{}: <span class=\"{}\">{}</span> (#5 has {:.2})</p>\n",
                    humanize_key(key),
                    class,
                    margin_phrase(margin.margin),
                    margin.cutoff_value
                ));
            }
            html.push_str("</div>\n");
        }

        html.push_str("<h2>Leaderboards</h2>\n");
        for board in ctx.leaderboards {
            let column = board.metric.column;
            html.push_str(&format!("<h3>{}</h3>\n", escape(&board.metric.title)));
            if board.entries.is_empty() {
                html.push_str("<p>No eligible players.</p>\n");
                continue;
            }
            if board.gate_relaxed {
                html.push_str(
                    "<p class=\"note\">No player met the minimum sample; all players ranked.</p>\n",
                );
            }
            html.push_str(&format!(
                "<table>\n<tr><th>Rank</th><th>Player</th><th>{}</th></tr>\n",
                humanize_key(column.column())
            ));
            for entry in &board.entries {
                html.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                    entry.rank,
                    escape(&entry.player),
                    format_stat(column, entry.value)
                ));
            }
            html.push_str("</table>\n");
        }

        if let Some(photos) = &ctx.photos {
            html.push_str("<h2>Photo Analysis</h2>\n<ul>\n");
            html.push_str(&format!(
                "<li>Total images analyzed: {}</li>\n",
                photos.total
            ));
            for (category, count) in &photos.categories {
                html.push_str(&format!(
                    "<li><strong>{}:</strong> {} photos</li>\n",
                    category.label(),
                    count
                ));
            }
            html.push_str("</ul>\n");

            if !photos.most_photographed.is_empty() {
                html.push_str("<h3>Most Photographed Players</h3>\n<ul>\n");
                for (player, count) in &photos.most_photographed {
                    html.push_str(&format!(
                        "<li>{}: {} appearances</li>\n",
                        escape(player),
                        count
                    ));
                }
                html.push_str("</ul>\n");
            }
        }

        html.push_str("<h2>Data Quality</h2>\n");
        if ctx.diagnostics.is_empty() {
            html.push_str("<p>No data quality issues found.</p>\n");
        } else {
            html.push_str("<table>\n<tr><th>Issue</th><th>Count</th></tr>\n");
            for (kind, count) in ctx.diagnostics.counts_by_kind() {
                html.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td></tr>\n",
                    humanize_key(kind),
                    count
                ));
            }
            html.push_str("</table>\n<ul>\n");
            for diagnostic in ctx
                .diagnostics
                .iter()
                .take(super::markdown::MAX_LISTED_DIAGNOSTICS)
            {
                html.push_str(&format!("<li>{}</li>\n", escape(&diagnostic.to_string())));
            }
            html.push_str("</ul>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
        assert_eq!(escape("Dr. Vishnu Reddy"), "Dr. Vishnu Reddy");
    }

    #[test]
    fn test_html_document() {
        let f = fixtures::fixture();
        let html = HtmlFormatter::format(&fixtures::context(&f, None));

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.trim_end().ends_with("</html>"));
        assert!(html.contains("<p class=\"timestamp\">Generated: 2025-06-01 09:30:00</p>"));
        assert!(html.contains("<li><strong>Top Run Scorer</strong>: Faizan Mohammad (210 runs)</li>"));
        assert!(html.contains("<tr><td>1</td><td>Faizan Mohammad</td><td>210</td></tr>"));
        assert!(html.contains("<h3>Dr. Vishnu Reddy</h3>"));
    }

    #[test]
    fn test_html_escapes_player_text() {
        let f = fixtures::fixture();
        let html = HtmlFormatter::format(&fixtures::context(&f, None));

        assert!(html.contains("Guest &lt;Player&gt;"));
        assert!(!html.contains("Guest <Player>"));
    }
}
