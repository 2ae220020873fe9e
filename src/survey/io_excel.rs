use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::survey::{io_common::Table, *};

/// Reads a worksheet of an Excel workbook (.xlsx).
///
/// The worksheet name may be omitted if the workbook has a single worksheet.
/// Numbers that are integers are read without decimals, so that `3.0` in a
/// score column reads as `3`.
pub fn read_excel_table(path: &str, worksheet_name: Option<&str>) -> SurveyResult<Table> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header_row = iter.next().context(EmptyInputSnafu { path })?;
    debug!("read_excel_table: header: {:?}", header_row);
    let header = read_row(path, 1, header_row)?;

    let mut rows: Vec<(usize, Vec<String>)> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let lineno = idx + 2;
        debug!("read_excel_table: lineno: {:?} row: {:?}", lineno, &row);
        rows.push((lineno, read_row(path, lineno, row)?));
    }
    Ok(Table {
        path: path.to_string(),
        header,
        rows,
    })
}

fn read_row(path: &str, lineno: usize, row: &[DataType]) -> SurveyResult<Vec<String>> {
    row.iter().map(|c| read_cell(path, lineno, c)).collect()
}

fn read_cell(path: &str, lineno: usize, cell: &DataType) -> SurveyResult<String> {
    match cell {
        DataType::String(s) => Ok(s.trim().to_string()),
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Float(f) if f.fract() == 0.0 => Ok(format!("{}", *f as i64)),
        DataType::Float(f) => Ok(f.to_string()),
        DataType::Bool(b) => Ok(b.to_string()),
        DataType::Empty => Ok(String::new()),
        _ => MalformedCellSnafu {
            path,
            lineno,
            content: format!("{:?}", cell),
            expected: "text or a number",
        }
        .fail(),
    }
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> SurveyResult<Range<DataType>> {
    debug!(
        "read_excel_table: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(name) = worksheet_name {
        let wrange = workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { path, name })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyInputSnafu { path }.fail(),
            [(name, wrange)] => {
                debug!("read_excel_table: path: {:?} worksheet: {:?}", path, name);
                Ok(wrange.clone())
            }
            _ => AmbiguousWorksheetSnafu { path }.fail(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_as_text() {
        assert_eq!(read_cell("a.xlsx", 2, &DataType::Float(3.0)).unwrap(), "3");
        assert_eq!(read_cell("a.xlsx", 2, &DataType::Float(2.5)).unwrap(), "2.5");
        assert_eq!(read_cell("a.xlsx", 2, &DataType::Int(12)).unwrap(), "12");
        assert_eq!(
            read_cell("a.xlsx", 2, &DataType::String(" Social ".to_string())).unwrap(),
            "Social"
        );
        assert_eq!(read_cell("a.xlsx", 2, &DataType::Empty).unwrap(), "");
        assert!(matches!(
            read_cell("a.xlsx", 4, &DataType::Error(calamine::CellErrorType::Div0)),
            Err(SurveyError::MalformedCell { lineno: 4, .. })
        ));
    }

    fn workbook_path() -> String {
        format!(
            "{}/tests/data/riasec_excel/riasec_questions.xlsx",
            env!("CARGO_MANIFEST_DIR")
        )
    }

    #[test]
    fn read_worksheet() {
        let t = read_excel_table(&workbook_path(), Some("Questions")).unwrap();
        assert_eq!(t.header, vec!["ID", "Question", "Dimension"]);
        assert_eq!(t.rows.len(), 4);
        assert_eq!(
            t.rows[0],
            (
                2,
                vec![
                    "1".to_string(),
                    "Build kitchen cabinets".to_string(),
                    "Realistic".to_string()
                ]
            )
        );
        assert_eq!(t.rows[3].0, 5);
        assert_eq!(t.rows[3].1[2], "social");
    }

    #[test]
    fn worksheet_selection() {
        assert!(matches!(
            read_excel_table(&workbook_path(), None),
            Err(SurveyError::AmbiguousWorksheet { .. })
        ));
        assert!(matches!(
            read_excel_table(&workbook_path(), Some("Answers")),
            Err(SurveyError::MissingWorksheet { .. })
        ));
        let notes = read_excel_table(&workbook_path(), Some("Notes")).unwrap();
        assert_eq!(notes.header, vec!["Collected with the paper form"]);
        assert!(notes.rows.is_empty());
    }

    #[test]
    fn missing_workbook() {
        assert!(matches!(
            read_excel_table("/nonexistent/answers.xlsx", None),
            Err(SurveyError::OpeningExcel { .. })
        ));
    }
}
