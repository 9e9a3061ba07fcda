//! Sequential orchestration of a run.
//!
//! `analyze` is the pure core: loaded table in, analysis out. The `run_*`
//! functions wrap it with file IO for the binary's subcommands.

use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;
use tracing::{info, warn};

use crate::calculate::{
    aggregate_players, build_leaderboards, build_spotlights, estimate_balls_bowled,
    metric_catalogue,
};
use crate::config::AppConfig;
use crate::ingest::{load_stats, IngestError, LoadedTable};
use crate::models::{
    Diagnostic, Diagnostics, Leaderboard, PlayerAggregate, PlayerRow, SpotlightResult,
};
use crate::names::{reconcile_records, Reconciliation, WhitelistReconciler};
use crate::photos::{analyze_photos, PhotoAnalysis, PhotoError, SidecarText};
use crate::report::{
    render_category_chart, render_contact_sheet, render_leaderboard_chart, render_sparkline,
    HtmlFormatter,
    MarkdownFormatter, PhotoSummary, ReportError, SummaryContext,
};
use crate::storage::{
    write_json_pretty, write_leaderboard_csv, write_photo_catalog_csv, write_player_stats_csv,
    write_text, JsonlWriter, OutputLayout, StorageError,
};

/// Players listed under "most photographed" in the summary.
const MOST_PHOTOGRAPHED: usize = 5;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Photo analysis error: {0}")]
    Photo(#[from] PhotoError),
}

/// In-memory result of analysing one stats table.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub rows_loaded: usize,
    pub rows: Vec<PlayerRow>,
    pub reconciliation: Reconciliation,
    pub players: Vec<PlayerAggregate>,
    pub leaderboards: Vec<Leaderboard>,
    pub spotlights: Vec<SpotlightResult>,
    pub diagnostics: Diagnostics,
}

/// Run the loaded table through reconciliation, aggregation, leaderboards
/// and spotlights.
pub fn analyze(table: LoadedTable, config: &AppConfig) -> Analysis {
    let mut diagnostics = Diagnostics::new();
    diagnostics.extend(table.diagnostics);
    let rows_loaded = table.records.len();

    let reconciler = WhitelistReconciler::new(&config.roster, config.fuzzy_match_threshold);
    let reconciled = reconcile_records(table.records, &config.typo_fixes, &reconciler);
    diagnostics.extend(reconciled.diagnostics);

    let mut rows = reconciled.rows;
    if !table.has_balls_bowled {
        estimate_balls_bowled(&mut rows);
    }

    let players = aggregate_players(&rows);

    let catalogue = metric_catalogue(&config.thresholds);
    let (leaderboards, board_diagnostics) = build_leaderboards(&players, &catalogue);
    diagnostics.extend(board_diagnostics);

    let (spotlights, spotlight_diagnostics) =
        build_spotlights(&config.spotlight_players, &players, &leaderboards, &rows);
    diagnostics.extend(spotlight_diagnostics);

    Analysis {
        rows_loaded,
        rows,
        reconciliation: reconciled.reconciliation,
        players,
        leaderboards,
        spotlights,
        diagnostics,
    }
}

/// Switches for optional stages of `run_analysis`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub skip_charts: bool,
    pub skip_photos: bool,
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub rows_loaded: usize,
    pub rows_kept: usize,
    pub players: usize,
    pub leaderboards: usize,
    pub spotlights: usize,
    pub photos: Option<usize>,
    pub diagnostics: Diagnostics,
}

fn record_render_failure(diagnostics: &mut Diagnostics, artefact: &Path, err: ReportError) {
    warn!("Failed to render {:?}: {}", artefact, err);
    diagnostics.push(Diagnostic::RenderFailed {
        artefact: artefact.display().to_string(),
        reason: err.to_string(),
    });
}

/// Load, analyse and write every artefact to the output directory.
pub fn run_analysis(config: &AppConfig, options: RunOptions) -> Result<RunSummary, PipelineError> {
    info!("Starting cricket stats analysis");

    let layout = OutputLayout::new(config.output_dir.clone());
    layout.ensure_dir()?;

    let table = load_stats(&config.stats_csv)?;
    let mut analysis = analyze(table, config);

    for board in &analysis.leaderboards {
        write_leaderboard_csv(&layout.leaderboard_csv(board.key()), board)?;
    }
    write_player_stats_csv(&layout.player_stats_csv(), &analysis.players)?;
    write_json_pretty(&layout.spotlights_json(), &analysis.spotlights)?;

    let photos = match (&config.images_dir, options.skip_photos) {
        (Some(dir), false) => {
            run_photo_stage(dir, config, &layout, !options.skip_charts, &mut analysis.diagnostics)
        }
        (None, _) => {
            info!("No images directory configured. Skipping photo analysis.");
            None
        }
        (Some(_), true) => None,
    };

    if !options.skip_charts {
        let failures = render_charts(&analysis, &layout);
        analysis.diagnostics.extend(failures.iter().cloned());
    }

    let photo_summary = photos.as_ref().map(|p| PhotoSummary {
        total: p.photos.len(),
        categories: p.category_counts(),
        most_photographed: p.most_photographed(MOST_PHOTOGRAPHED),
    });

    let ctx = SummaryContext {
        generated_at: Local::now().naive_local(),
        leaderboards: &analysis.leaderboards,
        spotlights: &analysis.spotlights,
        photos: photo_summary,
        diagnostics: &analysis.diagnostics,
    };
    info!("Building executive summary...");
    write_text(&layout.summary_markdown(), &MarkdownFormatter::format(&ctx))?;
    write_text(&layout.summary_html(), &HtmlFormatter::format(&ctx))?;

    JsonlWriter::new(layout.diagnostics_jsonl()).write_all(&analysis.diagnostics)?;

    let summary = RunSummary {
        rows_loaded: analysis.rows_loaded,
        rows_kept: analysis.rows.len(),
        players: analysis.players.len(),
        leaderboards: analysis.leaderboards.len(),
        spotlights: analysis.spotlights.len(),
        photos: photos.map(|p| p.photos.len()),
        diagnostics: analysis.diagnostics,
    };

    info!(
        "Analysis complete: {} players, {} diagnostics. Outputs saved to {:?}",
        summary.players,
        summary.diagnostics.len(),
        layout.output_dir
    );
    Ok(summary)
}

/// Leaderboard bar charts and spotlight sparklines. Returns the failures.
fn render_charts(analysis: &Analysis, layout: &OutputLayout) -> Diagnostics {
    info!("Rendering charts...");
    let mut failures = Diagnostics::new();

    for board in analysis.leaderboards.iter().filter(|b| !b.entries.is_empty()) {
        let path = layout.leaderboard_chart(board.key());
        if let Err(e) = render_leaderboard_chart(board, &path) {
            record_render_failure(&mut failures, &path, e);
        }
    }

    for (index, spotlight) in analysis.spotlights.iter().enumerate() {
        if spotlight.sparkline.len() < 2 {
            continue;
        }
        let path = layout.spotlight_chart(index, &spotlight.player);
        if let Err(e) = render_sparkline(&spotlight.player, &spotlight.sparkline, &path) {
            record_render_failure(&mut failures, &path, e);
        }
    }

    failures
}

/// Photo stage inside an analysis run. Failures become diagnostics.
fn run_photo_stage(
    dir: &Path,
    config: &AppConfig,
    layout: &OutputLayout,
    charts: bool,
    diagnostics: &mut Diagnostics,
) -> Option<PhotoAnalysis> {
    let photos = match analyze_photos(
        dir,
        &config.roster,
        config.photo_ocr_match_threshold,
        &SidecarText,
    ) {
        Ok(photos) => photos,
        Err(e) => {
            warn!("Photo analysis skipped: {}", e);
            diagnostics.push(Diagnostic::PhotoSkipped {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            });
            return None;
        }
    };

    diagnostics.extend(photos.diagnostics.iter().cloned());
    if let Err(e) = write_photo_catalog_csv(&layout.photo_catalog_csv(), &photos.photos) {
        warn!("Failed to write photo catalog: {}", e);
        diagnostics.push(Diagnostic::RenderFailed {
            artefact: layout.photo_catalog_csv().display().to_string(),
            reason: e.to_string(),
        });
    }

    if charts {
        for (path, result) in render_photo_charts(&photos, layout) {
            if let Err(e) = result {
                record_render_failure(diagnostics, &path, e);
            }
        }
    }

    Some(photos)
}

/// Category chart and contact sheet for analysed photos. Nothing is drawn
/// when there are no photos.
fn render_photo_charts(
    photos: &PhotoAnalysis,
    layout: &OutputLayout,
) -> Vec<(PathBuf, Result<(), ReportError>)> {
    if photos.photos.is_empty() {
        return Vec::new();
    }

    let category_chart = layout.photo_category_chart();
    let contact_sheet = layout.contact_sheet();
    vec![
        (
            category_chart.clone(),
            render_category_chart(&photos.category_counts(), &category_chart),
        ),
        (
            contact_sheet.clone(),
            render_contact_sheet(&photos.photos, &contact_sheet),
        ),
    ]
}

/// Analyse a photo directory on its own and write the catalog and chart.
pub fn run_photos(config: &AppConfig, dir: &Path) -> Result<PhotoAnalysis, PipelineError> {
    let layout = OutputLayout::new(config.output_dir.clone());
    layout.ensure_dir()?;

    let photos = analyze_photos(
        dir,
        &config.roster,
        config.photo_ocr_match_threshold,
        &SidecarText,
    )?;
    write_photo_catalog_csv(&layout.photo_catalog_csv(), &photos.photos)?;

    for (path, result) in render_photo_charts(&photos, &layout) {
        if let Err(e) = result {
            warn!("Failed to render {:?}: {}", path, e);
        }
    }

    for (category, count) in &photos.category_counts() {
        info!("{}: {} photos", category.label(), count);
    }
    Ok(photos)
}

/// Outcome of the `reconcile` subcommand.
#[derive(Debug, Clone)]
pub struct ReconcileReport {
    pub rows_loaded: usize,
    pub rows_kept: usize,
    pub reconciliation: Reconciliation,
    pub diagnostics: Diagnostics,
}

/// Load and reconcile names without writing anything.
pub fn run_reconcile(config: &AppConfig) -> Result<ReconcileReport, PipelineError> {
    let table = load_stats(&config.stats_csv)?;
    let rows_loaded = table.records.len();

    let mut diagnostics = Diagnostics::new();
    diagnostics.extend(table.diagnostics);

    let reconciler = WhitelistReconciler::new(&config.roster, config.fuzzy_match_threshold);
    let reconciled = reconcile_records(table.records, &config.typo_fixes, &reconciler);
    diagnostics.extend(reconciled.diagnostics);

    Ok(ReconcileReport {
        rows_loaded,
        rows_kept: reconciled.rows.len(),
        reconciliation: reconciled.reconciliation,
        diagnostics,
    })
}
