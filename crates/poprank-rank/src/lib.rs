#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/poprank/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod ranking;
pub mod record;

pub use error::{RankError, Result};
pub use ranking::{
    DEFAULT_TOP_N, RankConfig, Ranking, growth_descending, rank_growth, sort_by_growth, top_n,
};
pub use record::{
    CityGrowth, GrowthRecords, LatestPolicy, SkipReason, SkippedRow, collect_growth,
};
