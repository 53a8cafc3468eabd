//! Column extraction from the source table.

use crate::config::SourceConfig;
use poprank_sheet::{CellValue, DocumentHost, Result, Session};
use tracing::debug;

/// The three source columns, each with its header at index 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnSet {
    /// City names.
    pub names: Vec<Vec<CellValue>>,
    /// Latest population figures.
    pub latest: Vec<Vec<CellValue>>,
    /// Earliest population figures.
    pub earliest: Vec<Vec<CellValue>>,
}

impl ColumnSet {
    /// Number of data rows, header excluded.
    pub fn data_rows(&self) -> usize {
        self.names.len().saturating_sub(1)
    }
}

/// Load the name, latest and earliest columns in one flush.
///
/// Fails with the host's not-found error when the table or a column is
/// missing. Nothing is written.
pub fn extract_columns<H: DocumentHost>(
    session: &mut Session<H>,
    source: &SourceConfig,
) -> Result<ColumnSet> {
    let names = session.load_column_values(&source.table, &source.name_column);
    let latest = session.load_column_values(&source.table, &source.latest_column);
    let earliest = session.load_column_values(&source.table, &source.earliest_column);
    session.sync()?;

    let columns = ColumnSet {
        names: session.resolve(&names)?,
        latest: session.resolve(&latest)?,
        earliest: session.resolve(&earliest)?,
    };
    debug!(table = %source.table, rows = columns.data_rows(), "extracted columns");
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use poprank_sheet::{MemoryHost, SheetError, Workbook};

    fn session() -> Session<MemoryHost> {
        let csv = "City,7/1/2014 population estimate,4/1/1990 census population\nA,100,50\n";
        let book = Workbook::from_csv_reader(csv.as_bytes(), "PopulationTable").unwrap();
        Session::new(MemoryHost::new(book))
    }

    #[test]
    fn test_extract_three_columns_in_one_flush() {
        let mut session = session();
        let columns = extract_columns(&mut session, &SourceConfig::default()).unwrap();

        assert_eq!(columns.data_rows(), 1);
        assert_eq!(columns.names[1], vec![CellValue::from("A")]);
        assert_eq!(columns.latest[1], vec![CellValue::Number(100.0)]);
        assert_eq!(columns.earliest[0], vec![CellValue::from("4/1/1990 census population")]);
        assert_eq!(session.flush_count(), 1);
    }

    #[test]
    fn test_missing_column_is_not_found() {
        let mut session = session();
        let source = SourceConfig {
            latest_column: "2020 estimate".to_string(),
            ..SourceConfig::default()
        };
        let err = extract_columns(&mut session, &source).unwrap_err();
        assert!(matches!(err, SheetError::ColumnNotFound { .. }));
    }

    #[test]
    fn test_missing_table_is_not_found() {
        let mut session = session();
        let source = SourceConfig {
            table: "Cities".to_string(),
            ..SourceConfig::default()
        };
        let err = extract_columns(&mut session, &source).unwrap_err();
        assert!(matches!(err, SheetError::TableNotFound(_)));
    }
}
