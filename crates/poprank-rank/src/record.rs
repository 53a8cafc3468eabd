//! Growth records built from aligned column values.

use poprank_sheet::CellValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Population change for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityGrowth {
    /// City name as displayed in the source table.
    pub name: String,

    /// `latest - earliest`; `NaN` when the latest value was not numeric and
    /// the policy keeps such rows.
    pub growth: f64,
}

impl CityGrowth {
    /// Create a growth record.
    pub fn new(name: impl Into<String>, growth: f64) -> Self {
        Self {
            name: name.into(),
            growth,
        }
    }
}

impl fmt::Display for CityGrowth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:+}", self.name, self.growth)
    }
}

/// What to do with a row whose earliest value is numeric but latest is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatestPolicy {
    /// Keep the row with `NaN` growth; it sorts after every numeric growth.
    #[default]
    Propagate,
    /// Drop the row, like a missing earliest value.
    Skip,
}

/// Why a data row did not produce a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// Earliest value missing or not a number.
    EarliestNotNumeric {
        /// Type of the value found.
        found: &'static str,
    },
    /// Latest value not a number under [`LatestPolicy::Skip`].
    LatestNotNumeric {
        /// Type of the value found.
        found: &'static str,
    },
}

/// A data row excluded from ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// Index into the column arrays (the header is row 0).
    pub row: usize,
    /// City name on that row.
    pub name: String,
    /// Why the row was excluded.
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Records and exclusions produced from one set of columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrowthRecords {
    /// One record per qualifying row, in input order.
    pub records: Vec<CityGrowth>,
    /// Rows that did not qualify, in input order.
    pub skipped: Vec<SkippedRow>,
}

static EMPTY: CellValue = CellValue::Empty;

// Column values arrive as single-value rows; a missing row or cell reads as empty.
fn cell(column: &[Vec<CellValue>], row: usize) -> &CellValue {
    column.get(row).and_then(|r| r.first()).unwrap_or(&EMPTY)
}

/// Build growth records from aligned name, latest and earliest columns.
///
/// Row 0 is the header and is never read. Rows are driven by the name
/// column; shorter value columns read as empty.
pub fn collect_growth(
    names: &[Vec<CellValue>],
    latest: &[Vec<CellValue>],
    earliest: &[Vec<CellValue>],
    policy: LatestPolicy,
) -> GrowthRecords {
    let mut out = GrowthRecords::default();

    for row in 1..names.len() {
        let name = cell(names, row).to_string();
        let earliest_value = cell(earliest, row);
        let latest_value = cell(latest, row);

        let Some(earliest_n) = earliest_value.as_number() else {
            debug!(
                row,
                %name,
                found = earliest_value.type_name(),
                "skipping row without earliest value"
            );
            out.skipped.push(SkippedRow {
                row,
                name,
                reason: SkipReason::EarliestNotNumeric {
                    found: earliest_value.type_name(),
                },
            });
            continue;
        };

        let growth = match (latest_value.as_number(), policy) {
            (Some(latest_n), _) => latest_n - earliest_n,
            (None, LatestPolicy::Propagate) => {
                debug!(
                    row,
                    %name,
                    found = latest_value.type_name(),
                    "latest value not numeric, growth is NaN"
                );
                f64::NAN
            }
            (None, LatestPolicy::Skip) => {
                debug!(
                    row,
                    %name,
                    found = latest_value.type_name(),
                    "skipping row without latest value"
                );
                out.skipped.push(SkippedRow {
                    row,
                    name,
                    reason: SkipReason::LatestNotNumeric {
                        found: latest_value.type_name(),
                    },
                });
                continue;
            }
        };

        out.records.push(CityGrowth { name, growth });
    }

    out
}
