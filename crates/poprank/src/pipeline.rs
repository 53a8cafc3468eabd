//! Extract, rank and present in one run.

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::extract::extract_columns;
use poprank_output::{ExportFormat, Exporter, GrowthReport, ReportBuilder, present};
use poprank_rank::rank_growth;
use poprank_sheet::{DocumentHost, Session};
use std::path::Path;
use tracing::{info, info_span};

/// Stage a run is in, for progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Loading the source columns.
    Extract,
    /// Computing and sorting growth.
    Rank,
    /// Writing the output sheet.
    Present,
}

impl Stage {
    /// Short description of the stage.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Extract => "Reading population columns",
            Self::Rank => "Ranking growth",
            Self::Present => "Writing output sheet",
        }
    }
}

/// Run the whole pipeline against a session.
///
/// Each stage starts only after the previous one succeeded; the first
/// failure ends the run. Extraction failures leave the document untouched.
pub fn run_pipeline<H: DocumentHost>(
    session: &mut Session<H>,
    config: &PipelineConfig,
) -> Result<GrowthReport> {
    run_pipeline_with_progress(session, config, |_| {})
}

/// Like [`run_pipeline`], calling `on_stage` as each stage begins.
pub fn run_pipeline_with_progress<H, F>(
    session: &mut Session<H>,
    config: &PipelineConfig,
    mut on_stage: F,
) -> Result<GrowthReport>
where
    H: DocumentHost,
    F: FnMut(Stage),
{
    let _span = info_span!("pipeline", table = %config.source.table).entered();

    on_stage(Stage::Extract);
    let columns = extract_columns(session, &config.source).map_err(PipelineError::Extract)?;

    on_stage(Stage::Rank);
    let ranking = rank_growth(
        &columns.names,
        &columns.latest,
        &columns.earliest,
        &config.rank,
    )?;

    on_stage(Stage::Present);
    let presented = present(session, &ranking.ranked, &config.layout)?;

    info!(
        ranked = ranking.ranked.len(),
        skipped = ranking.skipped.len(),
        sheet = %presented.sheet,
        "pipeline finished"
    );

    let report = ReportBuilder::new()
        .table(config.source.table.clone())
        .ranking(ranking)
        .output(presented)
        .build()?;
    Ok(report)
}

/// Write a report's ranking to `path` as CSV or JSON, picked by extension.
///
/// Unknown extensions and write failures surface as [`PipelineError::Export`].
pub fn export_ranking(report: &GrowthReport, path: &Path) -> Result<ExportFormat> {
    let format = ExportFormat::from_path(path)?;
    report.ranked.export_to_file(path, format)?;
    info!(path = %path.display(), rows = report.ranked.len(), "exported ranking");
    Ok(format)
}
