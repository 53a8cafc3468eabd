//! Opening and saving workbook documents.

use poprank::sheet::{Result, Workbook};
use std::path::{Path, PathBuf};

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

/// Open a workbook JSON document, or import a CSV file as a workbook whose
/// single table is named `table`.
pub(crate) fn open_workbook(path: &Path, table: &str) -> Result<Workbook> {
    if is_csv(path) {
        Workbook::from_csv_path(path, table)
    } else {
        Workbook::load(path)
    }
}

/// Where the updated workbook is saved.
///
/// Workbook input is overwritten in place unless `output` is given; CSV
/// input always needs an explicit output path.
pub(crate) fn output_path(
    input: &Path,
    output: Option<PathBuf>,
) -> std::result::Result<PathBuf, String> {
    match output {
        Some(path) if is_csv(&path) => Err(format!(
            "{} is a CSV path; workbooks are saved as JSON",
            path.display()
        )),
        Some(path) => Ok(path),
        None if is_csv(input) => {
            Err("--output is required when the input is a CSV file".to_string())
        }
        None => Ok(input.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_defaults_to_workbook_input() {
        let path = output_path(Path::new("book.json"), None).unwrap();
        assert_eq!(path, PathBuf::from("book.json"));
    }

    #[test]
    fn test_csv_input_needs_output() {
        assert!(output_path(Path::new("cities.CSV"), None).is_err());
        let path = output_path(Path::new("cities.csv"), Some("out.json".into())).unwrap();
        assert_eq!(path, PathBuf::from("out.json"));
        assert!(output_path(Path::new("cities.csv"), Some("out.csv".into())).is_err());
    }

    #[test]
    fn test_open_csv_then_json() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("cities.csv");
        std::fs::write(&csv, "City,2014,1990\nAustin,912791,465622\n").unwrap();

        let book = open_workbook(&csv, "Cities").unwrap();
        assert!(book.find_table("Cities").is_some());

        let json = dir.path().join("book.json");
        book.save(&json).unwrap();
        assert_eq!(open_workbook(&json, "ignored").unwrap(), book);
    }
}
