//! Presentation of a ranking read from an imported workbook.

use poprank_output::{
    ExportFormat, Exporter, GrowthReport, Layout, RankedCity, present, render_worksheet,
};
use poprank_rank::{RankConfig, rank_growth};
use poprank_sheet::{CellRef, CellValue, MemoryHost, Session, Workbook};

const CSV: &str = "\
City,7/1/2014 population estimate,4/1/1990 census population
Houston,2239558,1630553
San Antonio,1436697,935933
Dallas,1281047,1006877
Austin,912791,465622
Fort Worth,812238,447619
Irvine,236716,
";

fn ranked_session() -> (Session<MemoryHost>, poprank_rank::Ranking) {
    let book = Workbook::from_csv_reader(CSV.as_bytes(), "PopulationTable").unwrap();
    let mut session = Session::new(MemoryHost::new(book));
    let names = session.load_column_values("PopulationTable", "City");
    let latest = session.load_column_values("PopulationTable", "7/1/2014 population estimate");
    let earliest = session.load_column_values("PopulationTable", "4/1/1990 census population");
    session.sync().unwrap();

    let ranking = rank_growth(
        &session.resolve(&names).unwrap(),
        &session.resolve(&latest).unwrap(),
        &session.resolve(&earliest).unwrap(),
        &RankConfig::default(),
    )
    .unwrap();
    (session, ranking)
}

#[test]
fn test_present_imported_ranking() {
    let (mut session, ranking) = ranked_session();
    let order: Vec<&str> = ranking.ranked.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(order, ["Houston", "San Antonio", "Austin", "Fort Worth", "Dallas"]);

    let report = present(&mut session, &ranking.ranked, &Layout::default()).unwrap();
    assert_eq!(report.table_range.to_string(), "B4:D9");
    assert_eq!(report.chart_source.to_string(), "C4:D9");

    let book = session.into_host().into_workbook();
    let ws = book.active_worksheet().unwrap();
    let growth = ws.cell(CellRef::parse("D5").unwrap()).unwrap();
    assert_eq!(growth.value, CellValue::Number(609_005.0));
    assert_eq!(growth.display(), "609,005");
    assert!(ws.column_widths.contains_key(&3));
    assert_eq!(ws.cell(CellRef::parse("B2").unwrap()).unwrap().font_size, Some(14.0));

    let text = render_worksheet(ws);
    assert!(text.contains("Top 10 Growing Cities"));
    assert!(text.contains("Table Top10GrowingCitiesTable at B4:D9"));
}

#[test]
fn test_rerun_produces_identical_sheet() {
    let (mut session, ranking) = ranked_session();
    present(&mut session, &ranking.ranked, &Layout::default()).unwrap();
    let first = session.host().workbook().clone();

    let report = present(&mut session, &ranking.ranked, &Layout::default()).unwrap();
    assert!(report.replaced_existing);
    assert_eq!(session.host().workbook(), &first);
}

#[test]
fn test_report_and_export_agree() {
    let (_, ranking) = ranked_session();
    let report = GrowthReport::new("PopulationTable", &ranking);
    assert_eq!(report.skipped[0].name, "Irvine");

    let csv = RankedCity::from_ranking(&ranking.ranked)
        .export_to_string(ExportFormat::Csv)
        .unwrap();
    assert_eq!(csv.lines().count(), ranking.ranked.len() + 1);
    assert!(report.to_ascii_table().contains("609,005"));
}
