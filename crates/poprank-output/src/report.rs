//! Run report for a ranking.

use crate::export::RankedCity;
use crate::presenter::PresentedReport;
use chrono::{DateTime, Utc};
use poprank_rank::{Ranking, SkippedRow};
use poprank_sheet::format_number;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A required field was not set on the builder.
    #[error("Missing report field: {0}")]
    MissingField(&'static str),
}

/// Summary of one ranking run.
#[derive(Debug, Clone, Serialize)]
pub struct GrowthReport {
    /// Source table name.
    pub table: String,

    /// Report generation timestamp.
    pub generated_at: DateTime<Utc>,

    /// Ranked cities, best first.
    pub ranked: Vec<RankedCity>,

    /// Rows that produced a growth value before truncation.
    pub qualifying: usize,

    /// Rows excluded from ranking.
    pub skipped: Vec<SkippedRow>,

    /// Where the ranking was written, when it was presented.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PresentedReport>,
}

fn growth_text(growth: Option<f64>) -> String {
    growth.map_or_else(|| "n/a".to_string(), |g| format_number(g, "#,##0"))
}

impl GrowthReport {
    /// Create a report from a ranking.
    pub fn new(table: impl Into<String>, ranking: &Ranking) -> Self {
        Self {
            table: table.into(),
            generated_at: Utc::now(),
            ranked: RankedCity::from_ranking(&ranking.ranked),
            qualifying: ranking.qualifying,
            skipped: ranking.skipped.clone(),
            output: None,
        }
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nPopulation Growth: {}\n", self.table));
        output.push_str(&format!(
            "Generated: {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("{:>4}  {:<32} {:>20}\n", "Rank", "City", "Growth"));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for city in &self.ranked {
            output.push_str(&format!(
                "{:>4}  {:<32} {:>20}\n",
                city.rank,
                city.city,
                growth_text(city.growth)
            ));
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{} of {} qualifying rows shown, {} skipped\n",
            self.ranked.len(),
            self.qualifying,
            self.skipped.len()
        ));
        if let Some(out) = &self.output {
            output.push_str(&format!(
                "Written to '{}' {} (chart {} at {})\n",
                out.sheet, out.table_range, out.chart_source, out.chart_position
            ));
        }
        output.push_str(&"=".repeat(60));
        output.push('\n');

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Population Growth: {}\n\n", self.table));
        output.push_str(&format!(
            "**Generated:** {}\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output.push_str("| Rank | City | Growth |\n");
        output.push_str("|-----:|------|-------:|\n");
        for city in &self.ranked {
            output.push_str(&format!(
                "| {} | {} | {} |\n",
                city.rank,
                city.city,
                growth_text(city.growth)
            ));
        }

        if !self.skipped.is_empty() {
            output.push_str("\n## Skipped Rows\n\n");
            for row in &self.skipped {
                output.push_str(&format!("- row {}: {}\n", row.row, row.name));
            }
        }

        output
    }
}

impl fmt::Display for GrowthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ascii_table())
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    table: Option<String>,
    ranking: Option<Ranking>,
    output: Option<PresentedReport>,
    generated_at: Option<DateTime<Utc>>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source table name.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Set the ranking.
    pub fn ranking(mut self, ranking: Ranking) -> Self {
        self.ranking = Some(ranking);
        self
    }

    /// Set where the ranking was written.
    pub fn output(mut self, output: PresentedReport) -> Self {
        self.output = Some(output);
        self
    }

    /// Override the generation timestamp.
    pub const fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Build the report.
    pub fn build(self) -> Result<GrowthReport, ReportError> {
        let ranking = self.ranking.ok_or(ReportError::MissingField("ranking"))?;
        let mut report = GrowthReport::new(self.table.unwrap_or_default(), &ranking);
        if let Some(at) = self.generated_at {
            report.generated_at = at;
        }
        report.output = self.output;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use poprank_rank::{CityGrowth, SkipReason};

    fn ranking() -> Ranking {
        Ranking {
            ranked: vec![
                CityGrowth::new("Austin", 447_169.0),
                CityGrowth::new("Unknown", f64::NAN),
            ],
            qualifying: 2,
            skipped: vec![SkippedRow {
                row: 3,
                name: "Irvine".to_string(),
                reason: SkipReason::EarliestNotNumeric { found: "empty" },
            }],
        }
    }

    fn report() -> GrowthReport {
        ReportBuilder::new()
            .table("PopulationTable")
            .ranking(ranking())
            .generated_at(Utc.with_ymd_and_hms(2014, 7, 1, 0, 0, 0).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_report_builder() {
        let report = report();
        assert_eq!(report.table, "PopulationTable");
        assert_eq!(report.ranked[0].rank, 1);
        assert_eq!(report.ranked[1].growth, None);
        assert_eq!(report.skipped.len(), 1);
    }

    #[test]
    fn test_builder_requires_ranking() {
        assert!(matches!(
            ReportBuilder::new().table("T").build(),
            Err(ReportError::MissingField("ranking"))
        ));
    }

    #[test]
    fn test_report_ascii_table() {
        let table = report().to_ascii_table();
        assert!(table.contains("Population Growth: PopulationTable"));
        assert!(table.contains("2014-07-01 00:00:00 UTC"));
        assert!(table.contains("447,169"));
        assert!(table.contains("n/a"));
        assert!(table.contains("2 of 2 qualifying rows shown, 1 skipped"));
    }

    #[test]
    fn test_report_markdown() {
        let md = report().to_markdown();
        assert!(md.contains("| 1 | Austin | 447,169 |"));
        assert!(md.contains("- row 3: Irvine"));
    }

    #[test]
    fn test_report_json() {
        let json = report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["ranked"][0]["city"], "Austin");
        assert_eq!(value["skipped"][0]["reason"], "earliest_not_numeric");
        assert!(value.get("output").is_none());
    }
}
