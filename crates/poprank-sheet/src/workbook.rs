//! In-memory workbook document.
//!
//! A workbook is an ordered list of worksheets plus the name of the active
//! one. Worksheets hold sparse cells, merged ranges, structured tables and
//! charts. Worksheet and table names are matched case-insensitively, the way
//! spreadsheet hosts resolve them.

use crate::address::{CellRef, RangeRef};
use crate::error::{Result, SheetError};
use crate::value::CellValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Longest worksheet name a host accepts.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const FORBIDDEN_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

// Width padding added to the longest rendered value when auto-fitting.
const AUTOFIT_PADDING: f64 = 2.0;

/// Partial font update; `None` fields are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Font {
    /// Bold weight.
    pub bold: Option<bool>,
    /// Point size.
    pub size: Option<f64>,
}

impl Font {
    /// Bold text at the given point size.
    pub const fn bold_size(size: f64) -> Self {
        Self {
            bold: Some(true),
            size: Some(size),
        }
    }
}

/// A populated or formatted cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Stored value.
    #[serde(default)]
    pub value: CellValue,

    /// Display format such as `#,##`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_format: Option<String>,

    /// Bold weight.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,

    /// Point size, if not the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

impl Cell {
    /// Rendered text under the cell's number format.
    pub fn display(&self) -> String {
        self.value.format_with(self.number_format.as_deref())
    }
}

/// A named, header-bound range supporting row appends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredTable {
    /// Workbook-unique table name.
    pub name: String,
    /// Header row plus data body.
    pub range: RangeRef,
    /// Whether the first row holds header text.
    pub has_headers: bool,
}

impl StructuredTable {
    /// Data rows only (without the header row).
    pub const fn body(&self) -> Option<RangeRef> {
        if self.has_headers {
            self.range.data_body()
        } else {
            Some(self.range)
        }
    }

    /// Number of data rows.
    pub const fn row_count(&self) -> usize {
        match self.body() {
            Some(body) => body.row_count(),
            None => 0,
        }
    }
}

/// Chart kinds a worksheet can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartType {
    /// Vertical bars grouped side by side.
    ColumnClustered,
    /// Horizontal bars grouped side by side.
    BarClustered,
    /// Line chart.
    Line,
    /// Pie chart.
    Pie,
}

/// How chart series are read from the source range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeriesBy {
    /// Let the host decide.
    #[default]
    Auto,
    /// One series per column.
    Columns,
    /// One series per row.
    Rows,
}

/// A chart bound to a source range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    /// Worksheet-unique chart name.
    pub name: String,
    /// Chart kind.
    pub chart_type: ChartType,
    /// Data range, including the header row.
    pub source: RangeRef,
    /// Series orientation.
    pub series_by: SeriesBy,
    /// Title text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Cells the chart covers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<RangeRef>,
}

/// A single worksheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Worksheet {
    /// Sheet name.
    pub name: String,

    /// Sparse cell storage keyed by A1 address.
    #[serde(default)]
    pub cells: BTreeMap<CellRef, Cell>,

    /// Merged ranges.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merges: Vec<RangeRef>,

    /// Structured tables on this sheet.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<StructuredTable>,

    /// Charts on this sheet.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub charts: Vec<Chart>,

    /// Column widths in characters, keyed by zero-based column index.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub column_widths: BTreeMap<u32, f64>,
}

static EMPTY: CellValue = CellValue::Empty;

impl Worksheet {
    /// Create an empty worksheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Value at `cell`, `Empty` if unset.
    pub fn value(&self, cell: CellRef) -> &CellValue {
        self.cells.get(&cell).map_or(&EMPTY, |c| &c.value)
    }

    /// Cell at `cell`, if it has been written or formatted.
    pub fn cell(&self, cell: CellRef) -> Option<&Cell> {
        self.cells.get(&cell)
    }

    /// Write one value.
    pub fn set_value(&mut self, cell: CellRef, value: CellValue) {
        self.cells.entry(cell).or_default().value = value;
    }

    /// Write a value matrix whose shape matches `range`.
    pub fn set_values(&mut self, range: RangeRef, values: &[Vec<CellValue>]) -> Result<()> {
        let cols = values.iter().map(Vec::len).max().unwrap_or(0);
        let ragged = values.iter().any(|row| row.len() != cols);
        if values.len() != range.row_count() || cols != range.column_count() || ragged {
            return Err(SheetError::Shape {
                expected_rows: range.row_count(),
                expected_cols: range.column_count(),
                rows: values.len(),
                cols,
            });
        }
        for (r, row) in values.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                let cell = range.start.offset(r as i64, c as i64)?;
                self.set_value(cell, value.clone());
            }
        }
        Ok(())
    }

    /// Merge `range` into one cell, replacing any merge it overlaps.
    pub fn merge(&mut self, range: RangeRef) {
        self.merges.retain(|m| !m.intersects(&range));
        if !range.is_single_cell() {
            self.merges.push(range);
        }
    }

    /// Merged range containing `cell`, if any.
    pub fn merge_at(&self, cell: CellRef) -> Option<&RangeRef> {
        self.merges.iter().find(|m| m.contains(cell))
    }

    /// Apply a font update to every cell in `range`.
    pub fn set_font(&mut self, range: RangeRef, font: Font) {
        for cell in range.cells() {
            let entry = self.cells.entry(cell).or_default();
            if let Some(bold) = font.bold {
                entry.bold = bold;
            }
            if let Some(size) = font.size {
                entry.font_size = Some(size);
            }
        }
    }

    /// Apply a number format to every cell in `range`.
    pub fn set_number_format(&mut self, range: RangeRef, format: &str) {
        for cell in range.cells() {
            self.cells.entry(cell).or_default().number_format = Some(format.to_string());
        }
    }

    /// Size each of `range`'s entire columns to its widest rendered value.
    ///
    /// Cells inside a merge that spans several columns do not count.
    pub fn autofit_columns(&mut self, range: RangeRef) {
        for col in range.columns() {
            let widest = self
                .cells
                .iter()
                .filter(|(at, _)| at.col == col)
                .filter(|(at, _)| {
                    self.merge_at(**at)
                        .is_none_or(|merged| merged.column_count() == 1)
                })
                .map(|(_, cell)| cell.display().chars().count())
                .max()
                .unwrap_or(0);
            if widest > 0 {
                self.column_widths
                    .insert(col, widest as f64 + AUTOFIT_PADDING);
            } else {
                self.column_widths.remove(&col);
            }
        }
    }

    /// Table on this sheet by name.
    pub fn table(&self, name: &str) -> Option<&StructuredTable> {
        self.tables.iter().find(|t| names_match(&t.name, name))
    }

    /// Header texts of a table, generated as `Column1..n` without a header row.
    pub fn table_headers(&self, table: &StructuredTable) -> Vec<String> {
        if table.has_headers {
            table
                .range
                .columns()
                .map(|col| {
                    self.value(CellRef {
                        row: table.range.start.row,
                        col,
                    })
                    .to_string()
                })
                .collect()
        } else {
            (1..=table.range.column_count())
                .map(|i| format!("Column{}", i))
                .collect()
        }
    }

    /// All values of one table column, header first, as single-value rows.
    pub fn table_column_values(
        &self,
        table: &StructuredTable,
        column: &str,
    ) -> Result<Vec<Vec<CellValue>>> {
        let index = self
            .table_headers(table)
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| SheetError::ColumnNotFound {
                table: table.name.clone(),
                column: column.to_string(),
            })?;
        let column_range = table.range.column(index)?;
        let mut values = Vec::with_capacity(column_range.row_count() + 1);
        if !table.has_headers {
            values.push(vec![CellValue::Text(column.to_string())]);
        }
        values.extend(column_range.cells().map(|cell| vec![self.value(cell).clone()]));
        Ok(values)
    }

    /// Number of rows and columns spanned by content, from `A1`.
    pub fn used_extent(&self) -> (u32, u32) {
        let mut rows = 0;
        let mut cols = 0;
        for (at, cell) in &self.cells {
            if !cell.value.is_empty() {
                rows = rows.max(at.row + 1);
                cols = cols.max(at.col + 1);
            }
        }
        (rows, cols)
    }
}

/// The whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    /// Worksheets in tab order.
    #[serde(default)]
    pub worksheets: Vec<Worksheet>,

    /// Name of the active worksheet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<String>,
}

impl Workbook {
    /// Create an empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Worksheet by name.
    pub fn worksheet(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| names_match(&ws.name, name))
    }

    /// Mutable worksheet by name.
    pub fn worksheet_mut(&mut self, name: &str) -> Result<&mut Worksheet> {
        self.worksheets
            .iter_mut()
            .find(|ws| names_match(&ws.name, name))
            .ok_or_else(|| SheetError::WorksheetNotFound(name.to_string()))
    }

    /// Tab position of a worksheet.
    pub fn worksheet_position(&self, name: &str) -> Option<usize> {
        self.worksheets.iter().position(|ws| names_match(&ws.name, name))
    }

    /// Append a new empty worksheet. The first worksheet becomes active.
    pub fn add_worksheet(&mut self, name: &str) -> Result<&mut Worksheet> {
        validate_sheet_name(name)?;
        if self.worksheet(name).is_some() {
            return Err(SheetError::WorksheetExists(name.to_string()));
        }
        if self.active.is_none() {
            self.active = Some(name.to_string());
        }
        self.worksheets.push(Worksheet::new(name));
        let last = self.worksheets.len() - 1;
        Ok(&mut self.worksheets[last])
    }

    /// Remove a worksheet together with its tables and charts.
    ///
    /// If it was active, the worksheet that takes its tab position (or the
    /// new last one) becomes active.
    pub fn delete_worksheet(&mut self, name: &str) -> Result<Worksheet> {
        let position = self
            .worksheet_position(name)
            .ok_or_else(|| SheetError::WorksheetNotFound(name.to_string()))?;
        let removed = self.worksheets.remove(position);
        let was_active = self
            .active
            .as_deref()
            .is_some_and(|active| names_match(active, &removed.name));
        if was_active {
            self.active = self
                .worksheets
                .get(position)
                .or_else(|| self.worksheets.last())
                .map(|ws| ws.name.clone());
        }
        Ok(removed)
    }

    /// Make a worksheet the active one.
    pub fn activate(&mut self, name: &str) -> Result<()> {
        let position = self
            .worksheet_position(name)
            .ok_or_else(|| SheetError::WorksheetNotFound(name.to_string()))?;
        self.active = Some(self.worksheets[position].name.clone());
        Ok(())
    }

    /// The active worksheet.
    pub fn active_worksheet(&self) -> Option<&Worksheet> {
        self.active.as_deref().and_then(|name| self.worksheet(name))
    }

    /// Find a table anywhere in the workbook.
    pub fn find_table(&self, name: &str) -> Option<(&Worksheet, &StructuredTable)> {
        self.worksheets
            .iter()
            .find_map(|ws| ws.table(name).map(|table| (ws, table)))
    }

    /// Load one column of a table, header row first.
    pub fn column_values(&self, table: &str, column: &str) -> Result<Vec<Vec<CellValue>>> {
        let (sheet, table) = self
            .find_table(table)
            .ok_or_else(|| SheetError::TableNotFound(table.to_string()))?;
        sheet.table_column_values(table, column)
    }

    /// Create a structured table over `range` on `sheet`.
    pub fn add_table(
        &mut self,
        sheet: &str,
        range: RangeRef,
        has_headers: bool,
        name: &str,
    ) -> Result<()> {
        validate_table_name(name)?;
        if self.find_table(name).is_some() {
            return Err(SheetError::TableExists(name.to_string()));
        }
        let ws = self.worksheet_mut(sheet)?;
        if let Some(clash) = ws.tables.iter().find(|t| t.range.intersects(&range)) {
            return Err(SheetError::InvalidAddress(format!(
                "{} overlaps table {}",
                range, clash.name
            )));
        }
        ws.tables.push(StructuredTable {
            name: name.to_string(),
            range,
            has_headers,
        });
        Ok(())
    }

    /// Append rows to the end of a table, growing its range.
    pub fn add_table_rows(&mut self, table: &str, rows: &[Vec<CellValue>]) -> Result<()> {
        let (sheet_name, table_range) = self
            .find_table(table)
            .map(|(ws, t)| (ws.name.clone(), t.range))
            .ok_or_else(|| SheetError::TableNotFound(table.to_string()))?;
        let width = table_range.column_count();
        if let Some(bad) = rows.iter().find(|row| row.len() != width) {
            return Err(SheetError::RowShape {
                table: table.to_string(),
                expected: width,
                found: bad.len(),
            });
        }
        if rows.is_empty() {
            return Ok(());
        }

        let ws = self.worksheet_mut(&sheet_name)?;
        let target = RangeRef::new(
            CellRef::new(table_range.end.row + 1, table_range.start.col)?,
            CellRef::new(table_range.end.row + rows.len() as u32, table_range.end.col)?,
        );
        ws.set_values(target, rows)?;
        let grown = table_range.grow_rows(rows.len() as u32)?;
        if let Some(t) = ws.tables.iter_mut().find(|t| names_match(&t.name, table)) {
            t.range = grown;
        }
        Ok(())
    }
}

/// Case-insensitive name comparison used for worksheets and tables.
pub fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Reject worksheet names a spreadsheet host would refuse.
pub fn validate_sheet_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || name.chars().count() > MAX_SHEET_NAME_LEN
        || name.contains(FORBIDDEN_SHEET_CHARS)
        || name.starts_with('\'')
        || name.ends_with('\'')
    {
        return Err(SheetError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Reject table names a spreadsheet host would refuse.
pub fn validate_table_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '\\');
    let valid_rest = chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.');
    if !valid_start || !valid_rest {
        return Err(SheetError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(s: &str) -> RangeRef {
        RangeRef::parse(s).unwrap()
    }

    fn population_book() -> Workbook {
        let mut book = Workbook::new();
        let ws = book.add_worksheet("Data").unwrap();
        ws.set_values(
            range("A1:C3"),
            &[
                vec!["City".into(), "2014".into(), "1990".into()],
                vec!["Austin".into(), CellValue::Number(912791.0), CellValue::Number(465622.0)],
                vec!["Irvine".into(), CellValue::Number(236716.0), CellValue::Empty],
            ],
        )
        .unwrap();
        book.add_table("Data", range("A1:C3"), true, "PopulationTable")
            .unwrap();
        book
    }

    #[test]
    fn test_column_values_include_header() {
        let book = population_book();
        let values = book.column_values("populationtable", "1990").unwrap();
        assert_eq!(
            values,
            vec![
                vec![CellValue::Text("1990".to_string())],
                vec![CellValue::Number(465622.0)],
                vec![CellValue::Empty],
            ]
        );
    }

    #[test]
    fn test_column_values_not_found() {
        let book = population_book();
        assert!(matches!(
            book.column_values("Missing", "City"),
            Err(SheetError::TableNotFound(_))
        ));
        assert!(matches!(
            book.column_values("PopulationTable", "Town"),
            Err(SheetError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_add_worksheet_rules() {
        let mut book = Workbook::new();
        book.add_worksheet("Top 10 Growing Cities").unwrap();
        assert!(matches!(
            book.add_worksheet("top 10 growing cities"),
            Err(SheetError::WorksheetExists(_))
        ));
        assert!(matches!(
            book.add_worksheet("a/b"),
            Err(SheetError::InvalidName(_))
        ));
        assert!(matches!(
            book.add_worksheet(&"x".repeat(32)),
            Err(SheetError::InvalidName(_))
        ));
        assert_eq!(book.active.as_deref(), Some("Top 10 Growing Cities"));
    }

    #[test]
    fn test_delete_active_worksheet_moves_focus() {
        let mut book = Workbook::new();
        book.add_worksheet("One").unwrap();
        book.add_worksheet("Two").unwrap();
        book.add_worksheet("Three").unwrap();
        book.activate("Two").unwrap();

        book.delete_worksheet("Two").unwrap();
        assert_eq!(book.active.as_deref(), Some("Three"));

        book.delete_worksheet("Three").unwrap();
        assert_eq!(book.active.as_deref(), Some("One"));

        book.delete_worksheet("One").unwrap();
        assert!(book.active.is_none());
        assert!(matches!(
            book.delete_worksheet("One"),
            Err(SheetError::WorksheetNotFound(_))
        ));
    }

    #[test]
    fn test_add_table_rows_grows_range() {
        let mut book = population_book();
        book.add_table_rows(
            "PopulationTable",
            &[vec!["Plano".into(), CellValue::Number(278480.0), CellValue::Number(128713.0)]],
        )
        .unwrap();
        let (_, table) = book.find_table("PopulationTable").unwrap();
        assert_eq!(table.range.to_string(), "A1:C4");
        assert_eq!(table.row_count(), 3);

        let err = book
            .add_table_rows("PopulationTable", &[vec!["Short".into()]])
            .unwrap_err();
        assert!(matches!(
            err,
            SheetError::RowShape {
                expected: 3,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_table_name_rules() {
        assert!(validate_table_name("Top10GrowingCitiesTable").is_ok());
        assert!(validate_table_name("Top 10").is_err());
        assert!(validate_table_name("10Top").is_err());
        assert!(validate_table_name("").is_err());

        let mut book = population_book();
        assert!(matches!(
            book.add_table("Data", range("E1:F1"), true, "PopulationTable"),
            Err(SheetError::TableExists(_))
        ));
        assert!(matches!(
            book.add_table("Data", range("B2:D2"), true, "Other"),
            Err(SheetError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_autofit_ignores_wide_merges() {
        let mut ws = Worksheet::new("Out");
        ws.set_value(
            CellRef::parse("B2").unwrap(),
            "A very long merged title".into(),
        );
        ws.merge(range("B2:D2"));
        ws.set_value(CellRef::parse("B4").unwrap(), "Rank".into());
        ws.set_value(CellRef::parse("D5").unwrap(), CellValue::Number(1234567.0));
        ws.set_number_format(range("D5"), "#,##");
        ws.autofit_columns(range("B4:D5"));

        assert_eq!(ws.column_widths.get(&1), Some(&6.0));
        assert_eq!(ws.column_widths.get(&3), Some(&11.0));
        assert!(!ws.column_widths.contains_key(&2));
    }

    #[test]
    fn test_headerless_table_columns() {
        let mut book = Workbook::new();
        let ws = book.add_worksheet("Raw").unwrap();
        ws.set_values(range("A1:A2"), &[vec![CellValue::Number(1.0)], vec![CellValue::Number(2.0)]])
            .unwrap();
        book.add_table("Raw", range("A1:A2"), false, "RawTable")
            .unwrap();
        let values = book.column_values("RawTable", "Column1").unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values[1], vec![CellValue::Number(1.0)]);
    }
}
