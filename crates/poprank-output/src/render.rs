//! Plain-text rendering of a worksheet.

use poprank_sheet::{CellRef, Worksheet, column_name};

const MIN_WIDTH: usize = 3;

/// Render the used area of a worksheet as a text grid.
///
/// Cells show their formatted display text. A value in a merged range
/// spans the whole merge. Tables and charts are listed below the grid.
pub fn render_worksheet(ws: &Worksheet) -> String {
    let (rows, cols) = ws.used_extent();
    let mut output = format!("Worksheet: {}\n", ws.name);

    if rows == 0 {
        output.push_str("(empty)\n");
    } else {
        let widths: Vec<usize> = (0..cols).map(|col| column_width(ws, col)).collect();
        let row_label = rows.to_string().len();

        output.push_str(&" ".repeat(row_label));
        for (col, width) in widths.iter().enumerate() {
            output.push_str(&format!(" | {:^w$}", column_name(col as u32), w = width));
        }
        output.push('\n');

        for row in 0..rows {
            output.push_str(&format!("{:>w$}", row + 1, w = row_label));
            let mut col = 0;
            while col < cols {
                let at = CellRef { row, col };
                let merged = ws.merge_at(at).filter(|m| m.start == at && m.row_count() == 1);
                let span = merged.map_or(1, |m| m.column_count().min((cols - col) as usize));
                let width: usize = widths[col as usize..col as usize + span].iter().sum::<usize>()
                    + 3 * (span - 1);
                let text = ws.cell(at).map(|c| c.display()).unwrap_or_default();
                let numeric = ws.value(at).is_number();
                if numeric {
                    output.push_str(&format!(" | {:>w$}", text, w = width));
                } else {
                    output.push_str(&format!(" | {:<w$}", text, w = width));
                }
                col += span as u32;
            }
            output.push('\n');
        }
    }

    for table in &ws.tables {
        output.push_str(&format!("Table {} at {}\n", table.name, table.range));
    }
    for chart in &ws.charts {
        output.push_str(&format!(
            "{} ({:?}) '{}' source {}",
            chart.name,
            chart.chart_type,
            chart.title.as_deref().unwrap_or_default(),
            chart.source
        ));
        if let Some(position) = chart.position {
            output.push_str(&format!(" at {}", position));
        }
        output.push('\n');
    }
    output
}

fn column_width(ws: &Worksheet, col: u32) -> usize {
    let fitted = ws
        .cells
        .iter()
        .filter(|(at, _)| at.col == col)
        .filter(|(at, _)| ws.merge_at(**at).is_none_or(|m| m.column_count() == 1))
        .map(|(_, cell)| cell.display().chars().count())
        .max()
        .unwrap_or(0);
    fitted.max(MIN_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use poprank_sheet::{CellValue, RangeRef};

    #[test]
    fn test_render_empty_sheet() {
        let ws = Worksheet::new("Blank");
        assert_eq!(render_worksheet(&ws), "Worksheet: Blank\n(empty)\n");
    }

    #[test]
    fn test_render_formats_and_merges() {
        let mut ws = Worksheet::new("Out");
        let title = RangeRef::parse("A1:B1").unwrap();
        ws.set_values(
            title,
            &[vec![CellValue::from("Growth"), CellValue::Empty]],
        )
        .unwrap();
        ws.merge(title);
        ws.set_value(CellRef::parse("A2").unwrap(), CellValue::from("Austin"));
        ws.set_value(CellRef::parse("B2").unwrap(), CellValue::Number(447_169.0));
        ws.set_number_format(RangeRef::parse("B2").unwrap(), "#,##");

        let text = render_worksheet(&ws);
        let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
        assert_eq!(lines[1], "  |   A    |    B");
        assert_eq!(lines[2], "1 | Growth");
        assert_eq!(lines[3], "2 | Austin | 447,169");
    }
}
