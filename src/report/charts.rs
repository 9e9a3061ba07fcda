//! PNG charts rendered with plotters.

use std::collections::BTreeMap;
use std::path::Path;

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::info;

use super::{format_stat, ReportError};
use crate::models::{Leaderboard, PhotoCategory};

const STEEL_BLUE: RGBColor = RGBColor(70, 130, 180);
const GRID: RGBColor = RGBColor(220, 220, 220);

const PALETTE: [RGBColor; 7] = [
    RGBColor(141, 211, 199),
    RGBColor(255, 237, 111),
    RGBColor(190, 186, 218),
    RGBColor(251, 128, 114),
    RGBColor(128, 177, 211),
    RGBColor(253, 180, 98),
    RGBColor(179, 222, 105),
];

const FONT: &str = "sans-serif";
pub(crate) const CHART_WIDTH: u32 = 1000;
const ROW_HEIGHT: u32 = 60;
const CHART_CHROME: u32 = 140;
pub(crate) const SPARK_SIZE: (u32, u32) = (1000, 300);

fn plot_err<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> ReportError {
    ReportError::Plot(err.to_string())
}

/// One labelled horizontal bar.
struct Bar {
    label: String,
    value: f64,
    text: String,
    color: RGBColor,
}

/// Chart height for `rows` horizontal bars.
pub(crate) fn bar_chart_height(rows: usize) -> u32 {
    CHART_CHROME + rows as u32 * ROW_HEIGHT
}

/// Horizontal bars, first bar at the top, each labelled with its name and
/// value at the end of the bar.
fn draw_bars(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    title: &str,
    axis: &str,
    bars: &[Bar],
) -> Result<(), ReportError> {
    root.fill(&WHITE).map_err(plot_err)?;

    let rows = bars.len() as f64;
    let max = bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
    // Room to the right of the longest bar for its label.
    let x_max = if max > 0.0 { max * 1.6 } else { 1.0 };

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 28))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(10)
        .build_cartesian_2d(0.0..x_max, 0.0..rows)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .disable_y_axis()
        .light_line_style(GRID)
        .x_desc(axis)
        .draw()
        .map_err(plot_err)?;

    // Row i (0 = top) occupies the band [rows - i - 1, rows - i].
    let band = |i: usize| rows - i as f64 - 1.0;

    chart
        .draw_series(bars.iter().enumerate().map(|(i, bar)| {
            Rectangle::new(
                [(0.0, band(i) + 0.15), (bar.value.max(0.0), band(i) + 0.85)],
                bar.color.filled(),
            )
        }))
        .map_err(plot_err)?;

    let label_style = TextStyle::from((FONT, 18).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    chart
        .draw_series(bars.iter().enumerate().map(|(i, bar)| {
            Text::new(
                format!("{}  ({})", bar.label, bar.text),
                (bar.value.max(0.0) + x_max * 0.01, band(i) + 0.5),
                label_style.clone(),
            )
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Horizontal bar chart of a leaderboard, rank 1 at the top.
pub fn render_leaderboard_chart(board: &Leaderboard, path: &Path) -> Result<(), ReportError> {
    if board.entries.is_empty() {
        return Err(ReportError::EmptyChart(board.key().to_string()));
    }

    let bars: Vec<Bar> = board
        .entries
        .iter()
        .map(|entry| Bar {
            label: format!("#{} {}", entry.rank, entry.player),
            value: entry.value,
            text: format_stat(board.metric.column, entry.value),
            color: STEEL_BLUE,
        })
        .collect();

    let mut title = format!("Top {}: {}", bars.len(), board.metric.title);
    if board.gate_relaxed {
        title.push_str(" (gate relaxed)");
    }

    let root = BitMapBackend::new(path, (CHART_WIDTH, bar_chart_height(bars.len())))
        .into_drawing_area();
    draw_bars(&root, &title, board.metric.column.column(), &bars)?;

    info!("Saved chart: {:?}", path);
    Ok(())
}

/// Runs per match for one player, line over a shaded area. Needs at least
/// two points.
pub fn render_sparkline(player: &str, values: &[f64], path: &Path) -> Result<(), ReportError> {
    if values.len() < 2 {
        return Err(ReportError::EmptyChart(format!(
            "sparkline needs at least 2 points, got {}",
            values.len()
        )));
    }

    let root = BitMapBackend::new(path, SPARK_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let max = values.iter().copied().fold(0.0_f64, f64::max);
    let y_max = if max > 0.0 { max * 1.15 } else { 1.0 };
    let x_max = (values.len() - 1) as f64;
    let points: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, v.max(0.0)))
        .collect();

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{}: runs per match", player), (FONT, 24))
        .margin(15)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .light_line_style(GRID)
        .x_labels(values.len().min(12))
        .x_label_formatter(&|x| format!("{:.0}", x + 1.0))
        .x_desc("Match")
        .y_desc("Runs")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(
            AreaSeries::new(points.iter().copied(), 0.0, STEEL_BLUE.mix(0.25))
                .border_style(STEEL_BLUE.stroke_width(2)),
        )
        .map_err(plot_err)?;
    chart
        .draw_series(
            points
                .iter()
                .map(|p| Circle::new(*p, 4, STEEL_BLUE.filled())),
        )
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    info!("Saved sparkline: {:?}", path);
    Ok(())
}

/// Bar chart of photo counts per category, largest first.
pub fn render_category_chart(
    counts: &BTreeMap<PhotoCategory, usize>,
    path: &Path,
) -> Result<(), ReportError> {
    if counts.is_empty() {
        return Err(ReportError::EmptyChart("no photo categories".to_string()));
    }

    let mut ordered: Vec<(&PhotoCategory, &usize)> = counts.iter().collect();
    ordered.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let bars: Vec<Bar> = ordered
        .into_iter()
        .map(|(category, count)| Bar {
            label: category.label().to_string(),
            value: *count as f64,
            text: count.to_string(),
            color: PALETTE[*category as usize % PALETTE.len()],
        })
        .collect();

    let root = BitMapBackend::new(path, (CHART_WIDTH, bar_chart_height(bars.len())))
        .into_drawing_area();
    draw_bars(&root, "Photo Categories", "photos", &bars)?;

    info!("Saved category analysis: {:?}", path);
    Ok(())
}
