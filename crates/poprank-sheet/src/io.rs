//! Workbook persistence and CSV import.

use crate::address::{CellRef, RangeRef, column_name};
use crate::error::{Result, SheetError};
use crate::value::CellValue;
use crate::workbook::Workbook;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;
use tracing::info;

/// Worksheet name used for imported CSV data.
pub const IMPORT_SHEET: &str = "Data";

impl Workbook {
    /// Parse a workbook document from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the workbook as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a workbook document from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let book: Self = serde_json::from_reader(reader)?;
        info!(
            path = %path.display(),
            worksheets = book.worksheets.len(),
            "loaded workbook"
        );
        Ok(book)
    }

    /// Save the workbook document to disk.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        info!(path = %path.display(), "saved workbook");
        Ok(())
    }

    /// Import CSV text as worksheet [`IMPORT_SHEET`] holding one table.
    ///
    /// The first record becomes the table header. Every field is typed with
    /// [`CellValue::from_input`]; short records are padded with empty cells.
    pub fn from_csv_reader<R: Read>(reader: R, table_name: &str) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows: Vec<Vec<CellValue>> = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(CellValue::from_input).collect());
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if rows.is_empty() || width == 0 {
            return Err(SheetError::EmptyTable(table_name.to_string()));
        }
        for row in &mut rows {
            row.resize(width, CellValue::Empty);
        }
        // Header cells are always text, even when they look numeric.
        for cell in &mut rows[0] {
            if !matches!(cell, CellValue::Text(_)) {
                *cell = CellValue::Text(cell.to_string());
            }
        }

        let range = RangeRef::new(
            CellRef::new(0, 0)?,
            CellRef::new(rows.len() as u32 - 1, width as u32 - 1)?,
        );

        let mut book = Self::new();
        book.add_worksheet(IMPORT_SHEET)?.set_values(range, &rows)?;
        book.add_table(IMPORT_SHEET, range, true, table_name)?;
        info!(
            table = table_name,
            rows = rows.len() - 1,
            columns = width,
            last_column = %column_name(width as u32 - 1),
            "imported CSV"
        );
        Ok(book)
    }

    /// Import a CSV file; see [`Workbook::from_csv_reader`].
    pub fn from_csv_path<P: AsRef<Path>>(path: P, table_name: &str) -> Result<Self> {
        Self::from_csv_reader(BufReader::new(File::open(path)?), table_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
City,7/1/2014 population estimate,4/1/1990 census population
Austin,912791,465622
Irvine,236716,
Plano,278480,128713
";

    #[test]
    fn test_csv_import_builds_table() {
        let book = Workbook::from_csv_reader(CSV.as_bytes(), "PopulationTable").unwrap();
        let (sheet, table) = book.find_table("PopulationTable").unwrap();
        assert_eq!(sheet.name, IMPORT_SHEET);
        assert_eq!(table.range.to_string(), "A1:C4");

        let earliest = book
            .column_values("PopulationTable", "4/1/1990 census population")
            .unwrap();
        assert_eq!(earliest[1], vec![CellValue::Number(465622.0)]);
        assert_eq!(earliest[2], vec![CellValue::Empty]);
    }

    #[test]
    fn test_csv_numeric_header_stays_text() {
        let book = Workbook::from_csv_reader("City,2014\nA,1\n".as_bytes(), "T").unwrap();
        let values = book.column_values("T", "2014").unwrap();
        assert_eq!(values[0], vec![CellValue::Text("2014".to_string())]);
    }

    #[test]
    fn test_csv_pads_short_records() {
        let book = Workbook::from_csv_reader("a,b,c\n1\n".as_bytes(), "T").unwrap();
        assert_eq!(book.column_values("T", "c").unwrap()[1], vec![CellValue::Empty]);
    }

    #[test]
    fn test_empty_csv_rejected() {
        assert!(matches!(
            Workbook::from_csv_reader("".as_bytes(), "T"),
            Err(SheetError::EmptyTable(_))
        ));
    }

    #[test]
    fn test_json_file_round_trip() {
        let book = Workbook::from_csv_reader(CSV.as_bytes(), "PopulationTable").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.json");

        book.save(&path).unwrap();
        let loaded = Workbook::load(&path).unwrap();
        assert_eq!(loaded, book);
        assert!(book.to_json_string().unwrap().contains("\"A1\""));
    }
}
