// Primitives for reading CSV files.

use crate::survey::{io_common::Table, *};

pub fn read_csv_table(path: &str) -> SurveyResult<Table> {
    let data = fs::read(path)
        .map_err(csv::Error::from)
        .context(CsvOpenSnafu { path })?;
    read_records(path, &data)
}

fn csv_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    // The header is handled like any other line, and the rows do not need to
    // have the same length.
    builder
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All);
    builder
}

/// Physical line numbers (starting at 1) of byte offsets in the content.
///
/// The reader skips empty lines before a record, but the start offset of
/// that record is taken before them: they are skipped here as well.
/// Offsets must be queried in increasing order.
struct LineCounter<'a> {
    data: &'a [u8],
    offset: usize,
    line: usize,
}

impl<'a> LineCounter<'a> {
    fn new(data: &'a [u8]) -> LineCounter<'a> {
        LineCounter {
            data,
            offset: 0,
            line: 1,
        }
    }

    fn line_at(&mut self, offset: u64) -> usize {
        let mut target = (offset as usize).min(self.data.len());
        while target < self.data.len() && matches!(self.data[target], b'\n' | b'\r') {
            target += 1;
        }
        if target > self.offset {
            self.line += self.data[self.offset..target]
                .iter()
                .filter(|b| **b == b'\n')
                .count();
            self.offset = target;
        }
        self.line
    }
}

fn read_records(path: &str, data: &[u8]) -> SurveyResult<Table> {
    let mut rdr = csv_builder().from_reader(data);
    let mut lines = LineCounter::new(data);
    let mut record = csv::StringRecord::new();

    let mut header: Option<Vec<String>> = None;
    let mut rows: Vec<(usize, Vec<String>)> = Vec::new();
    loop {
        let start = rdr.position().byte();
        let has_record = rdr.read_record(&mut record).context(CsvLineParseSnafu {
            path,
            lineno: lines.line_at(start),
        })?;
        if !has_record {
            break;
        }
        let lineno = lines.line_at(record.position().map(|p| p.byte()).unwrap_or(start));
        debug!("read_records: lineno: {:?} row: {:?}", lineno, record);
        match header {
            None => {
                header = Some(
                    record
                        .iter()
                        // Spreadsheet exports often start with a byte order mark.
                        .map(|s| s.trim_start_matches('\u{feff}').to_string())
                        .collect(),
                );
            }
            Some(_) => rows.push((lineno, record.iter().map(|s| s.to_string()).collect())),
        }
    }

    match header {
        Some(header) => Ok(Table {
            path: path.to_string(),
            header,
            rows,
        }),
        None => EmptyInputSnafu { path }.fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::io_common::responses_from_table;

    #[test]
    fn header_and_rows() {
        let data = "\u{feff}ID, Question ,Dimension\n1,Sell houses,E\n\n2,\"Draw, paint\",A,extra\n";
        let t = read_records("upload.csv", data.as_bytes()).unwrap();
        assert_eq!(t.header, vec!["ID", "Question", "Dimension"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0], (2, vec!["1".to_string(), "Sell houses".to_string(), "E".to_string()]));
        assert_eq!(t.rows[1].0, 4);
        assert_eq!(t.rows[1].1[1], "Draw, paint");
        assert_eq!(t.rows[1].1.len(), 4);
    }

    #[test]
    fn line_numbers_after_blank_lines() {
        let data = "\r\nID,Score\r\n1,4\r\n\r\n\r\n2,5\n\"3\",\"multi\nline\"\n\nx,3";
        let t = read_records("r.csv", data.as_bytes()).unwrap();
        assert_eq!(t.header, vec!["ID", "Score"]);
        let linenos: Vec<usize> = t.rows.iter().map(|(l, _)| *l).collect();
        assert_eq!(linenos, vec![3, 6, 7, 10]);

        let t = read_records("r.csv", "ID,Score\n1,4\n\nx,3\n".as_bytes()).unwrap();
        match responses_from_table(&t) {
            Err(SurveyError::MalformedCell { lineno, .. }) => assert_eq!(lineno, 4),
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn empty_input() {
        assert!(matches!(
            read_records("empty.csv", "".as_bytes()),
            Err(SurveyError::EmptyInput { .. })
        ));
        assert!(matches!(
            read_records("blank.csv", "\n\n".as_bytes()),
            Err(SurveyError::EmptyInput { .. })
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            read_csv_table("/nonexistent/questions.csv"),
            Err(SurveyError::CsvOpen { .. })
        ));
    }
}
