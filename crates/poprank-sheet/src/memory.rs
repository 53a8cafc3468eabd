//! Host that executes requests against an in-memory [`Workbook`].

use crate::error::Result;
use crate::request::{Request, Response, WorksheetInfo};
use crate::session::DocumentHost;
use crate::workbook::{Chart, Workbook};

/// In-memory document host.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    workbook: Workbook,
    executed: usize,
}

impl MemoryHost {
    /// Wrap a workbook.
    pub const fn new(workbook: Workbook) -> Self {
        Self {
            workbook,
            executed: 0,
        }
    }

    /// Current document state.
    pub const fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    /// Release the document.
    pub fn into_workbook(self) -> Workbook {
        self.workbook
    }

    /// Number of requests applied so far.
    pub const fn executed(&self) -> usize {
        self.executed
    }
}

impl DocumentHost for MemoryHost {
    fn execute(&mut self, request: &Request) -> Result<Response> {
        let book = &mut self.workbook;
        let response = match request {
            Request::LoadColumnValues { table, column } => {
                Response::Values(book.column_values(table, column)?)
            }
            Request::GetWorksheetOrNull { name } => {
                Response::Worksheet(book.worksheet_position(name).map(|position| {
                    WorksheetInfo {
                        name: book.worksheets[position].name.clone(),
                        position,
                    }
                }))
            }
            Request::AddWorksheet { name } => {
                book.add_worksheet(name)?;
                Response::Done
            }
            Request::DeleteWorksheet { name } => {
                book.delete_worksheet(name)?;
                Response::Done
            }
            Request::SetValues {
                sheet,
                range,
                values,
            } => {
                book.worksheet_mut(sheet)?.set_values(*range, values)?;
                Response::Done
            }
            Request::Merge { sheet, range } => {
                book.worksheet_mut(sheet)?.merge(*range);
                Response::Done
            }
            Request::SetFont { sheet, range, font } => {
                book.worksheet_mut(sheet)?.set_font(*range, *font);
                Response::Done
            }
            Request::SetNumberFormat {
                sheet,
                range,
                format,
            } => {
                book.worksheet_mut(sheet)?.set_number_format(*range, format);
                Response::Done
            }
            Request::AutofitColumns { sheet, range } => {
                book.worksheet_mut(sheet)?.autofit_columns(*range);
                Response::Done
            }
            Request::AddTable {
                sheet,
                range,
                has_headers,
                name,
            } => {
                book.add_table(sheet, *range, *has_headers, name)?;
                Response::Done
            }
            Request::AddTableRows { table, rows } => {
                book.add_table_rows(table, rows)?;
                Response::Done
            }
            Request::AddChart {
                sheet,
                chart_type,
                source,
                series_by,
                title,
                position,
            } => {
                let ws = book.worksheet_mut(sheet)?;
                let name = format!("Chart {}", ws.charts.len() + 1);
                ws.charts.push(Chart {
                    name: name.clone(),
                    chart_type: *chart_type,
                    source: *source,
                    series_by: *series_by,
                    title: title.clone(),
                    position: *position,
                });
                Response::Chart(name)
            }
            Request::Activate { sheet } => {
                book.activate(sheet)?;
                Response::Done
            }
        };
        self.executed += 1;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::RangeRef;
    use crate::error::SheetError;
    use crate::session::{ChartRequest, Session};
    use crate::workbook::{ChartType, SeriesBy};

    #[test]
    fn test_lookup_resolves_none_then_some() {
        let mut session = Session::new(MemoryHost::default());
        let before = session.worksheet_or_null("Out");
        session.add_worksheet("Out");
        let after = session.worksheet_or_null("out");
        session.sync().unwrap();

        assert_eq!(session.resolve(&before).unwrap(), None);
        let info = session.resolve(&after).unwrap().unwrap();
        assert_eq!(info.name, "Out");
        assert_eq!(info.position, 0);
    }

    #[test]
    fn test_chart_names_increment() {
        let mut session = Session::new(MemoryHost::default());
        session.add_worksheet("Out");
        let chart = ChartRequest {
            chart_type: ChartType::ColumnClustered,
            source: RangeRef::parse("C4:D6").unwrap(),
            series_by: SeriesBy::Columns,
            title: None,
            position: None,
        };
        let first = session.add_chart("Out", chart.clone());
        let second = session.add_chart("Out", chart);
        session.sync().unwrap();

        assert_eq!(session.resolve(&first).unwrap(), "Chart 1");
        assert_eq!(session.resolve(&second).unwrap(), "Chart 2");
        assert_eq!(session.host().executed(), 3);
    }

    #[test]
    fn test_shape_mismatch_is_host_error() {
        let mut session = Session::new(MemoryHost::default());
        session.add_worksheet("Out");
        session.set_values(
            "Out",
            RangeRef::parse("B4:D4").unwrap(),
            vec![vec!["Rank".into(), "City".into()]],
        );
        let err = session.sync().unwrap_err();
        assert!(matches!(err, SheetError::Host { .. }));
        assert_eq!(err.debug_info().unwrap().error_location, "Range.values");
        assert_eq!(session.host().executed(), 1);
    }
}
