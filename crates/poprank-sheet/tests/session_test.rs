//! Integration tests for the batched session over the in-memory host.

use poprank_sheet::{
    CellValue, ChartRequest, ChartType, Font, MemoryHost, RangeRef, SeriesBy, Session,
    SheetError, Workbook,
};

fn range(s: &str) -> RangeRef {
    RangeRef::parse(s).unwrap()
}

fn source_book() -> Workbook {
    let csv = "City,Latest,Earliest\nAustin,912791,465622\nPlano,278480,128713\n";
    Workbook::from_csv_reader(csv.as_bytes(), "PopulationTable").unwrap()
}

#[test]
fn test_reads_need_a_flush() {
    let mut session = Session::new(MemoryHost::new(source_book()));
    let names = session.load_column_values("PopulationTable", "City");

    assert!(matches!(session.resolve(&names), Err(SheetError::NotSynced)));
    session.sync().unwrap();

    let names = session.resolve(&names).unwrap();
    assert_eq!(names.len(), 3);
    assert_eq!(names[2], vec![CellValue::Text("Plano".to_string())]);
}

#[test]
fn test_missing_column_fails_the_flush() {
    let mut session = Session::new(MemoryHost::new(source_book()));
    let _ok = session.load_column_values("PopulationTable", "City");
    let _missing = session.load_column_values("PopulationTable", "Mayor");

    let err = session.sync().unwrap_err();
    assert!(matches!(err, SheetError::ColumnNotFound { ref column, .. } if column == "Mayor"));
}

#[test]
fn test_build_output_sheet() {
    let mut session = Session::new(MemoryHost::new(source_book()));
    let sheet = "Top Cities";

    session.add_worksheet(sheet);
    session.set_values(sheet, range("B2:D2"), vec![vec![
        "Top Cities".into(),
        "".into(),
        "".into(),
    ]]);
    session.merge(sheet, range("B2:D2"));
    session.set_font(sheet, range("B2:D2"), Font::bold_size(14.0));
    session.set_values(sheet, range("B4:D4"), vec![vec![
        "Rank".into(),
        "City".into(),
        "Population Growth".into(),
    ]]);
    session.add_table(sheet, range("B4:D4"), true, "TopCitiesTable");
    session.add_table_rows("TopCitiesTable", vec![vec![
        CellValue::Number(1.0),
        "Austin".into(),
        CellValue::Number(447169.0),
    ]]);
    session.set_number_format(sheet, range("D5:D5"), "#,##");
    let chart = session.add_chart(sheet, ChartRequest {
        chart_type: ChartType::ColumnClustered,
        source: range("C4:D5"),
        series_by: SeriesBy::Columns,
        title: Some("Growth".to_string()),
        position: Some(range("F2:O21")),
    });
    session.activate(sheet);
    session.sync().unwrap();

    assert_eq!(session.resolve(&chart).unwrap(), "Chart 1");
    let book = session.into_host().into_workbook();
    let ws = book.active_worksheet().unwrap();
    assert_eq!(ws.name, sheet);
    assert_eq!(ws.merges, vec![range("B2:D2")]);
    assert_eq!(ws.tables[0].range, range("B4:D5"));
    let growth = ws.cell(range("D5").start).unwrap();
    assert_eq!(growth.display(), "447,169");
    assert_eq!(ws.cell(range("B2").start).unwrap().font_size, Some(14.0));

    // The new sheet is a sibling of the imported one.
    assert_eq!(book.worksheets.len(), 2);
}
