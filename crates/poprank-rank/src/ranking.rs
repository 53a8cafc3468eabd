//! Stable descending top-N ranking.

use crate::error::{RankError, Result};
use crate::record::{CityGrowth, LatestPolicy, SkippedRow, collect_growth};
use poprank_sheet::CellValue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::info;

/// Default number of records kept.
pub const DEFAULT_TOP_N: usize = 10;

/// Configuration for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankConfig {
    /// Maximum number of records kept (default: 10)
    pub top_n: usize,
    /// Handling of non-numeric latest values (default: propagate as NaN)
    pub latest_policy: LatestPolicy,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            latest_policy: LatestPolicy::default(),
        }
    }
}

/// Ranked output plus what was left out.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    /// At most `top_n` records, growth descending.
    pub ranked: Vec<CityGrowth>,
    /// Number of rows that produced a record before truncation.
    pub qualifying: usize,
    /// Rows excluded by the skip rules.
    pub skipped: Vec<SkippedRow>,
}

/// Descending order on growth; `NaN` sorts after every number.
pub fn growth_descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}

/// Sort records by growth descending; equal growth keeps input order.
pub fn sort_by_growth(records: &mut [CityGrowth]) {
    records.sort_by(|a, b| growth_descending(a.growth, b.growth));
}

/// Sort and keep the first `top_n` records.
pub fn top_n(mut records: Vec<CityGrowth>, top_n: usize) -> Result<Vec<CityGrowth>> {
    if top_n == 0 {
        return Err(RankError::InvalidTopN(top_n));
    }
    sort_by_growth(&mut records);
    records.truncate(top_n);
    Ok(records)
}

/// Rank cities by growth from aligned name, latest and earliest columns.
///
/// Each column is the host's single-value row layout with the header at
/// index 0.
///
/// # Examples
///
/// ```
/// use poprank_rank::{RankConfig, rank_growth};
/// use poprank_sheet::CellValue;
///
/// let col = |vals: Vec<CellValue>| vals.into_iter().map(|v| vec![v]).collect::<Vec<_>>();
/// let names = col(vec!["City".into(), "A".into(), "B".into(), "C".into()]);
/// let n = CellValue::Number;
/// let latest = col(vec!["2014".into(), n(100.0), n(200.0), n(90.0)]);
/// let earliest = col(vec!["1990".into(), n(50.0), n(150.0), CellValue::Empty]);
///
/// let ranking = rank_growth(&names, &latest, &earliest, &RankConfig::default()).unwrap();
/// let order: Vec<&str> = ranking.ranked.iter().map(|c| c.name.as_str()).collect();
/// assert_eq!(order, ["A", "B"]);
/// assert_eq!(ranking.skipped.len(), 1);
/// ```
pub fn rank_growth(
    names: &[Vec<CellValue>],
    latest: &[Vec<CellValue>],
    earliest: &[Vec<CellValue>],
    config: &RankConfig,
) -> Result<Ranking> {
    if config.top_n == 0 {
        return Err(RankError::InvalidTopN(config.top_n));
    }

    let collected = collect_growth(names, latest, earliest, config.latest_policy);
    let qualifying = collected.records.len();
    let ranked = top_n(collected.records, config.top_n)?;

    info!(
        rows = names.len().saturating_sub(1),
        qualifying,
        skipped = collected.skipped.len(),
        ranked = ranked.len(),
        "ranked growth"
    );

    Ok(Ranking {
        ranked,
        qualifying,
        skipped: collected.skipped,
    })
}
