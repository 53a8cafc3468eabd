//! Two-phase request session.
//!
//! Builder calls only queue a [`Request`] and hand back a [`Pending`]
//! ticket. Nothing touches the document until [`Session::sync`] flushes the
//! queue, in order, to the [`DocumentHost`]. A ticket resolves only after the
//! flush that carried it; reading earlier is an error rather than stale data.

use crate::address::RangeRef;
use crate::error::{Result, SheetError};
use crate::request::{DebugInfo, FromResponse, Request, Response, WorksheetInfo};
use crate::value::CellValue;
use crate::workbook::{ChartType, Font, SeriesBy};
use std::collections::HashMap;
use std::marker::PhantomData;
use tracing::{debug, warn};

/// Backend that applies requests to a real document.
pub trait DocumentHost {
    /// Execute one request.
    ///
    /// # Errors
    ///
    /// Returns the host failure; the session aborts the rest of the batch.
    fn execute(&mut self, request: &Request) -> Result<Response>;
}

impl<H: DocumentHost + ?Sized> DocumentHost for &mut H {
    fn execute(&mut self, request: &Request) -> Result<Response> {
        (**self).execute(request)
    }
}

/// Ticket for a value that becomes readable after the next flush.
#[derive(Debug)]
#[must_use = "a pending value is only useful if resolved after sync()"]
pub struct Pending<T> {
    id: u64,
    _marker: PhantomData<fn() -> T>,
}

/// Explicit document session handle.
#[derive(Debug)]
pub struct Session<H> {
    host: H,
    // Writes carry no ticket id; only ticketed responses are kept.
    queue: Vec<(Option<u64>, Request)>,
    resolved: HashMap<u64, Response>,
    next_id: u64,
    flushes: usize,
}

impl<H: DocumentHost> Session<H> {
    /// Open a session over a host.
    pub fn new(host: H) -> Self {
        Self {
            host,
            queue: Vec::new(),
            resolved: HashMap::new(),
            next_id: 0,
            flushes: 0,
        }
    }

    /// Borrow the host.
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Close the session and return the host. Unflushed requests are dropped.
    pub fn into_host(self) -> H {
        if !self.queue.is_empty() {
            warn!(
                pending = self.queue.len(),
                "session closed with unflushed requests"
            );
        }
        self.host
    }

    /// Number of queued, unflushed requests.
    pub fn pending_requests(&self) -> usize {
        self.queue.len()
    }

    /// Number of completed flushes.
    pub const fn flush_count(&self) -> usize {
        self.flushes
    }

    fn enqueue<T: FromResponse>(&mut self, request: Request) -> Pending<T> {
        let id = self.next_id;
        self.next_id += 1;
        self.queue.push((Some(id), request));
        Pending {
            id,
            _marker: PhantomData,
        }
    }

    fn enqueue_write(&mut self, request: Request) {
        self.queue.push((None, request));
    }

    /// Send every queued request to the host and resolve their tickets.
    ///
    /// The first failure aborts the batch: requests after it are discarded,
    /// requests before it stay applied. Not-found failures are returned as
    /// they are; any other failure becomes [`SheetError::Host`] carrying
    /// [`DebugInfo`] for the failing request.
    pub fn sync(&mut self) -> Result<()> {
        let batch = std::mem::take(&mut self.queue);
        let batch_len = batch.len();
        debug!(requests = batch_len, flush = self.flushes + 1, "sync");

        for (index, (id, request)) in batch.into_iter().enumerate() {
            match self.host.execute(&request) {
                Ok(response) => {
                    if let Some(id) = id {
                        self.resolved.insert(id, response);
                    }
                }
                Err(err) if err.is_not_found() || matches!(err, SheetError::Host { .. }) => {
                    warn!(index, location = request.location(), error = %err, "batch aborted");
                    return Err(attach_debug_info(err, index, batch_len, &request));
                }
                Err(err) => {
                    warn!(index, location = request.location(), error = %err, "batch aborted");
                    return Err(SheetError::Host {
                        message: err.to_string(),
                        debug_info: Some(DebugInfo {
                            request_index: index,
                            batch_len,
                            error_location: request.location().to_string(),
                            detail: err.to_string(),
                        }),
                    });
                }
            }
        }

        self.flushes += 1;
        Ok(())
    }

    /// Read a value that a previous flush resolved.
    pub fn resolve<T: FromResponse>(&self, pending: &Pending<T>) -> Result<T> {
        let response = self
            .resolved
            .get(&pending.id)
            .cloned()
            .ok_or(SheetError::NotSynced)?;
        T::from_response(response)
    }

    /// Queue a load of one table column's values, header row first.
    pub fn load_column_values(
        &mut self,
        table: &str,
        column: &str,
    ) -> Pending<Vec<Vec<CellValue>>> {
        self.enqueue(Request::LoadColumnValues {
            table: table.to_string(),
            column: column.to_string(),
        })
    }

    /// Queue a nullable worksheet lookup.
    pub fn worksheet_or_null(&mut self, name: &str) -> Pending<Option<WorksheetInfo>> {
        self.enqueue(Request::GetWorksheetOrNull {
            name: name.to_string(),
        })
    }

    /// Queue creation of a worksheet.
    pub fn add_worksheet(&mut self, name: &str) {
        self.enqueue_write(Request::AddWorksheet {
            name: name.to_string(),
        });
    }

    /// Queue deletion of a worksheet.
    pub fn delete_worksheet(&mut self, name: &str) {
        self.enqueue_write(Request::DeleteWorksheet {
            name: name.to_string(),
        });
    }

    /// Queue a value write.
    pub fn set_values(&mut self, sheet: &str, range: RangeRef, values: Vec<Vec<CellValue>>) {
        self.enqueue_write(Request::SetValues {
            sheet: sheet.to_string(),
            range,
            values,
        });
    }

    /// Queue a merge.
    pub fn merge(&mut self, sheet: &str, range: RangeRef) {
        self.enqueue_write(Request::Merge {
            sheet: sheet.to_string(),
            range,
        });
    }

    /// Queue a font update.
    pub fn set_font(&mut self, sheet: &str, range: RangeRef, font: Font) {
        self.enqueue_write(Request::SetFont {
            sheet: sheet.to_string(),
            range,
            font,
        });
    }

    /// Queue a number format.
    pub fn set_number_format(&mut self, sheet: &str, range: RangeRef, format: &str) {
        self.enqueue_write(Request::SetNumberFormat {
            sheet: sheet.to_string(),
            range,
            format: format.to_string(),
        });
    }

    /// Queue an auto-fit of the entire columns under `range`.
    pub fn autofit_columns(&mut self, sheet: &str, range: RangeRef) {
        self.enqueue_write(Request::AutofitColumns {
            sheet: sheet.to_string(),
            range,
        });
    }

    /// Queue creation of a structured table.
    pub fn add_table(&mut self, sheet: &str, range: RangeRef, has_headers: bool, name: &str) {
        self.enqueue_write(Request::AddTable {
            sheet: sheet.to_string(),
            range,
            has_headers,
            name: name.to_string(),
        });
    }

    /// Queue rows to append to a table.
    pub fn add_table_rows(&mut self, table: &str, rows: Vec<Vec<CellValue>>) {
        self.enqueue_write(Request::AddTableRows {
            table: table.to_string(),
            rows,
        });
    }

    /// Queue creation of a chart; resolves to the chart's name.
    pub fn add_chart(&mut self, sheet: &str, chart: ChartRequest) -> Pending<String> {
        self.enqueue(Request::AddChart {
            sheet: sheet.to_string(),
            chart_type: chart.chart_type,
            source: chart.source,
            series_by: chart.series_by,
            title: chart.title,
            position: chart.position,
        })
    }

    /// Queue activation of a worksheet.
    pub fn activate(&mut self, sheet: &str) {
        self.enqueue_write(Request::Activate {
            sheet: sheet.to_string(),
        });
    }
}

/// Chart parameters for [`Session::add_chart`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    /// Chart kind.
    pub chart_type: ChartType,
    /// Data range.
    pub source: RangeRef,
    /// Series orientation.
    pub series_by: SeriesBy,
    /// Title text.
    pub title: Option<String>,
    /// Cells the chart covers.
    pub position: Option<RangeRef>,
}

fn attach_debug_info(
    err: SheetError,
    index: usize,
    batch_len: usize,
    request: &Request,
) -> SheetError {
    match err {
        SheetError::Host {
            message,
            debug_info: None,
        } => SheetError::Host {
            debug_info: Some(DebugInfo {
                request_index: index,
                batch_len,
                error_location: request.location().to_string(),
                detail: message.clone(),
            }),
            message,
        },
        other => other,
    }
}
