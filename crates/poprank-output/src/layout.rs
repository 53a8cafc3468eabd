//! Output sheet layout.

use poprank_sheet::{CellRef, ChartType, RangeRef};
use serde::{Deserialize, Serialize};

/// Where and how the ranking is drawn on the output worksheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Output worksheet name (default: "Top 10 Growing Cities")
    pub sheet_name: String,
    /// Title text written into the merged title range
    pub title: String,
    /// Merged title range (default: B2:D2)
    pub title_range: RangeRef,
    /// Title font size in points (default: 14)
    pub title_font_size: f64,
    /// Top-left cell of the table header (default: B4)
    pub header_anchor: CellRef,
    /// Header texts for the rank, city and growth columns
    pub headers: [String; 3],
    /// Number format for the growth column (default: "#,##")
    pub growth_format: String,
    /// Chart kind (default: clustered column)
    pub chart_type: ChartType,
    /// Chart title
    pub chart_title: String,
    /// Top-left cell of the chart (default: F2)
    pub chart_anchor: CellRef,
    /// Rows the chart spans (default: 20)
    pub chart_rows: u32,
    /// Columns the chart spans (default: 10)
    pub chart_columns: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            sheet_name: "Top 10 Growing Cities".to_string(),
            title: "Top 10 Growing Cities".to_string(),
            title_range: RangeRef::new(CellRef { row: 1, col: 1 }, CellRef { row: 1, col: 3 }),
            title_font_size: 14.0,
            header_anchor: CellRef { row: 3, col: 1 },
            headers: [
                "Rank".to_string(),
                "City".to_string(),
                "Population Growth".to_string(),
            ],
            growth_format: "#,##".to_string(),
            chart_type: ChartType::ColumnClustered,
            chart_title: "Population Growth between 1990 and 2014".to_string(),
            chart_anchor: CellRef { row: 1, col: 5 },
            chart_rows: 20,
            chart_columns: 10,
        }
    }
}

impl Layout {
    /// Structured table name derived from the sheet name.
    ///
    /// `Top 10 Growing Cities` becomes `Top10GrowingCitiesTable`.
    pub fn table_name(&self) -> String {
        let stem: String = self
            .sheet_name
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if stem.chars().next().is_some_and(char::is_alphabetic) {
            format!("{}Table", stem)
        } else {
            format!("_{}Table", stem)
        }
    }

    /// Header row range for the three table columns.
    pub fn header_range(&self) -> RangeRef {
        RangeRef::new(
            self.header_anchor,
            CellRef {
                row: self.header_anchor.row,
                col: self.header_anchor.col + 2,
            },
        )
    }

    /// Chart placement: anchor plus `chart_rows` x `chart_columns` cells.
    pub fn chart_position(&self) -> poprank_sheet::Result<RangeRef> {
        let corner = self.chart_anchor.offset(
            i64::from(self.chart_rows.max(1)) - 1,
            i64::from(self.chart_columns.max(1)) - 1,
        )?;
        Ok(RangeRef::new(self.chart_anchor, corner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let layout = Layout::default();
        assert_eq!(layout.title_range.to_string(), "B2:D2");
        assert_eq!(layout.header_range().to_string(), "B4:D4");
        assert_eq!(layout.chart_position().unwrap().to_string(), "F2:O21");
        assert_eq!(layout.table_name(), "Top10GrowingCitiesTable");
    }

    #[test]
    fn test_table_name_for_numeric_sheet() {
        let layout = Layout {
            sheet_name: "2014 Growth".to_string(),
            ..Layout::default()
        };
        assert_eq!(layout.table_name(), "_2014GrowthTable");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let layout: Layout =
            serde_json::from_str(r#"{"sheet_name": "Growth", "chart_anchor": "H3"}"#).unwrap();
        assert_eq!(layout.sheet_name, "Growth");
        assert_eq!(layout.chart_anchor.to_string(), "H3");
        assert_eq!(layout.growth_format, "#,##");
        assert_eq!(layout.chart_rows, 20);
    }
}
