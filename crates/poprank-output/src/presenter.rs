//! Output worksheet presentation.
//!
//! [`present`] replaces the output worksheet with a title, a structured table
//! of the ranked cities and a chart over the city and growth columns. All
//! writes go through one [`Session`]: a lookup flush decides whether an old
//! sheet must be deleted, and a final flush commits the whole layout.

use crate::layout::Layout;
use poprank_rank::CityGrowth;
use poprank_sheet::{
    CellValue, ChartRequest, DebugInfo, DocumentHost, Font, RangeRef, SeriesBy, Session,
    SheetError,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while presenting the ranking.
#[derive(Debug, Error)]
pub enum PresentError {
    /// The document rejected a request.
    #[error(transparent)]
    Sheet(#[from] SheetError),

    /// The layout cannot hold the table.
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
}

impl PresentError {
    /// Host diagnostics for the request that failed, if any.
    pub const fn debug_info(&self) -> Option<&DebugInfo> {
        match self {
            Self::Sheet(err) => err.debug_info(),
            Self::InvalidLayout(_) => None,
        }
    }
}

/// Where the ranking ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresentedReport {
    /// Output worksheet name.
    pub sheet: String,
    /// Structured table name.
    pub table: String,
    /// Table range including the header row.
    pub table_range: RangeRef,
    /// Chart name assigned by the host.
    pub chart: String,
    /// Chart data source (city and growth columns).
    pub chart_source: RangeRef,
    /// Chart placement.
    pub chart_position: RangeRef,
    /// Number of data rows written.
    pub rows: usize,
    /// Whether an existing sheet with the same name was deleted first.
    pub replaced_existing: bool,
}

/// One table row: rank, city, growth.
pub fn table_row(rank: usize, city: &CityGrowth) -> Vec<CellValue> {
    vec![
        CellValue::Number(rank as f64),
        CellValue::Text(city.name.clone()),
        CellValue::Number(city.growth),
    ]
}

/// Write `ranked` to the output worksheet described by `layout`.
///
/// Any worksheet with the output name is deleted and recreated, so running
/// twice leaves the same layout. The new sheet is activated.
///
/// # Errors
///
/// Returns [`PresentError::Sheet`] when a flush fails; requests before the
/// failing one stay applied.
pub fn present<H: DocumentHost>(
    session: &mut Session<H>,
    ranked: &[CityGrowth],
    layout: &Layout,
) -> Result<PresentedReport, PresentError> {
    check_layout(layout)?;
    let sheet = layout.sheet_name.as_str();
    let table = layout.table_name();
    let header_range = layout.header_range();
    let table_range = header_range.grow_rows(ranked.len() as u32)?;
    let chart_source = table_range.column(1)?.bounding_rect(&table_range.last_column());
    let chart_position = layout.chart_position()?;

    let existing = session.worksheet_or_null(sheet);
    session.sync()?;
    let existing = session.resolve(&existing)?;
    if let Some(info) = &existing {
        debug!(sheet = %info.name, position = info.position, "replacing worksheet");
        session.delete_worksheet(&info.name);
    }
    session.add_worksheet(sheet);

    let mut title_row = vec![CellValue::Empty; layout.title_range.column_count()];
    title_row[0] = CellValue::Text(layout.title.clone());
    session.set_values(sheet, layout.title_range, vec![title_row]);
    session.merge(sheet, layout.title_range);
    session.set_font(
        sheet,
        layout.title_range,
        Font::bold_size(layout.title_font_size),
    );

    let headers = layout
        .headers
        .iter()
        .map(|h| CellValue::Text(h.clone()))
        .collect();
    session.set_values(sheet, header_range, vec![headers]);
    session.add_table(sheet, header_range, true, &table);
    for (index, city) in ranked.iter().enumerate() {
        session.add_table_rows(&table, vec![table_row(index + 1, city)]);
    }

    if let Some(body) = table_range.data_body() {
        session.set_number_format(sheet, body.last_column(), &layout.growth_format);
    }
    session.autofit_columns(sheet, table_range);

    let chart = session.add_chart(
        sheet,
        ChartRequest {
            chart_type: layout.chart_type,
            source: chart_source,
            series_by: SeriesBy::Columns,
            title: Some(layout.chart_title.clone()),
            position: Some(chart_position),
        },
    );
    session.activate(sheet);
    session.sync()?;

    let report = PresentedReport {
        sheet: sheet.to_string(),
        table,
        table_range,
        chart: session.resolve(&chart)?,
        chart_source,
        chart_position,
        rows: ranked.len(),
        replaced_existing: existing.is_some(),
    };
    info!(
        sheet = %report.sheet,
        table_range = %report.table_range,
        rows = report.rows,
        replaced = report.replaced_existing,
        "presented ranking"
    );
    Ok(report)
}

fn check_layout(layout: &Layout) -> Result<(), PresentError> {
    if layout.title_range.row_count() != 1 {
        return Err(PresentError::InvalidLayout(format!(
            "title range {} must be a single row",
            layout.title_range
        )));
    }
    if layout.title_range.intersects(&layout.header_range()) {
        return Err(PresentError::InvalidLayout(format!(
            "title range {} overlaps header {}",
            layout.title_range,
            layout.header_range()
        )));
    }
    if layout.chart_rows == 0 || layout.chart_columns == 0 {
        return Err(PresentError::InvalidLayout(
            "chart must span at least one row and column".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use poprank_sheet::{CellRef, ChartType, MemoryHost, Workbook};

    fn cities(n: usize) -> Vec<CityGrowth> {
        (0..n)
            .map(|i| CityGrowth::new(format!("City{}", i), 1000.0 * (n - i) as f64))
            .collect()
    }

    fn at(a1: &str) -> CellRef {
        CellRef::parse(a1).unwrap()
    }

    #[test]
    fn test_layout_for_ten_rows() {
        let mut session = Session::new(MemoryHost::default());
        let report = present(&mut session, &cities(10), &Layout::default()).unwrap();

        assert_eq!(report.table_range.to_string(), "B4:D14");
        assert_eq!(report.chart_source.to_string(), "C4:D14");
        assert_eq!(report.chart_position.to_string(), "F2:O21");
        assert_eq!(report.chart, "Chart 1");
        assert!(!report.replaced_existing);

        let book = session.host().workbook();
        let ws = book.active_worksheet().unwrap();
        assert_eq!(ws.name, "Top 10 Growing Cities");
        assert_eq!(ws.value(at("B2")), &CellValue::from("Top 10 Growing Cities"));
        assert_eq!(ws.merges, vec![RangeRef::parse("B2:D2").unwrap()]);
        assert_eq!(ws.value(at("D4")), &CellValue::from("Population Growth"));
        assert_eq!(ws.value(at("B5")), &CellValue::Number(1.0));
        assert_eq!(ws.cell(at("D5")).unwrap().display(), "10,000");
        assert_eq!(ws.charts[0].chart_type, ChartType::ColumnClustered);
    }

    #[test]
    fn test_empty_ranking_keeps_header_only() {
        let mut session = Session::new(MemoryHost::default());
        let report = present(&mut session, &[], &Layout::default()).unwrap();

        assert_eq!(report.rows, 0);
        assert_eq!(report.table_range.to_string(), "B4:D4");
        assert_eq!(report.chart_source.to_string(), "C4:D4");
        let ws = session.host().workbook().active_worksheet().unwrap();
        assert!(ws.cell(at("D4")).unwrap().number_format.is_none());
    }

    #[test]
    fn test_existing_sheet_replaced() {
        let mut book = Workbook::new();
        book.add_worksheet("Data").unwrap();
        book.add_worksheet("Top 10 Growing Cities")
            .unwrap()
            .set_value(at("Z99"), CellValue::from("stale"));
        let mut session = Session::new(MemoryHost::new(book));

        let report = present(&mut session, &cities(3), &Layout::default()).unwrap();
        assert!(report.replaced_existing);

        let book = session.host().workbook();
        let ws = book.worksheet("Top 10 Growing Cities").unwrap();
        assert!(ws.value(at("Z99")).is_empty());
        assert_eq!(ws.charts.len(), 1);
        assert_eq!(book.worksheets.len(), 2);
    }

    #[test]
    fn test_two_flushes_per_presentation() {
        let mut session = Session::new(MemoryHost::default());
        present(&mut session, &cities(2), &Layout::default()).unwrap();
        assert_eq!(session.flush_count(), 2);
        assert_eq!(session.pending_requests(), 0);
    }

    #[test]
    fn test_invalid_layout_rejected_before_requests() {
        let layout = Layout {
            chart_rows: 0,
            ..Layout::default()
        };
        let mut session = Session::new(MemoryHost::default());
        let err = present(&mut session, &cities(1), &layout).unwrap_err();
        assert!(matches!(err, PresentError::InvalidLayout(_)));
        assert!(err.debug_info().is_none());
        assert_eq!(session.host().executed(), 0);
    }
}
