// Primitives shared by all the readers.

use std::path::Path;
use std::str::FromStr;

use crate::survey::*;

const ID_COLUMNS: [&str; 2] = ["id", "question id"];
const QUESTION_COLUMNS: [&str; 3] = ["question", "question text", "text"];
const DIMENSION_COLUMNS: [&str; 2] = ["dimension", "dimension label"];
const SCORE_COLUMNS: [&str; 2] = ["score", "response"];
const MEANING_COLUMNS: [&str; 2] = ["meaning", "description"];

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// The content of a file, as read by any of the readers.
///
/// All the cells are kept as text. The first row of the file is the header.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Table {
    pub path: String,
    pub header: Vec<String>,
    /// (line number in the file, starting at 1, cells)
    pub rows: Vec<(usize, Vec<String>)>,
}

impl Table {
    pub fn name(&self) -> String {
        simplify_file_name(&self.path)
    }

    /// Finds the first column that has one of the given names.
    /// Names are compared without case and surrounding spaces.
    pub fn column(&self, names: &[&str]) -> Option<usize> {
        self.header
            .iter()
            .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
    }

    fn require_column(&self, names: &[&str]) -> SurveyResult<usize> {
        self.column(names).context(MissingColumnSnafu {
            path: &self.path,
            column: names[0],
        })
    }

    /// The rows that contain at least one non-empty cell.
    pub fn data_rows(&self) -> impl Iterator<Item = &(usize, Vec<String>)> {
        self.rows
            .iter()
            .filter(|(_, cells)| cells.iter().any(|c| !c.trim().is_empty()))
    }

    fn parse_cell<T: FromStr>(&self, lineno: usize, content: &str, expected: &str) -> SurveyResult<T> {
        content.parse::<T>().ok().context(MalformedCellSnafu {
            path: &self.path,
            lineno,
            content,
            expected,
        })
    }
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|s| s.trim()).unwrap_or("")
}

/// Picks the reader from the provider name, or from the extension of the
/// file if no provider is given.
pub fn provider_for(explicit: &Option<String>, path: &str) -> String {
    match explicit {
        Some(p) => p.trim().to_lowercase(),
        None if path.to_lowercase().ends_with(".xlsx") => "xlsx".to_string(),
        None => "csv".to_string(),
    }
}

pub fn read_table(path: &str, provider: &str, worksheet_name: Option<&str>) -> SurveyResult<Table> {
    info!("Attempting to read {} file {:?}", provider, path);
    let table = match provider {
        "csv" => io_csv::read_csv_table(path)?,
        "xlsx" | "excel" => io_excel::read_excel_table(path, worksheet_name)?,
        x => {
            whatever!("Provider not implemented {:?}", x)
        }
    };
    debug!(
        "read_table: {}: header {:?}, {} rows",
        table.name(),
        table.header,
        table.rows.len()
    );
    Ok(table)
}

/// Reads the questions, in the order of the rows.
///
/// Without an id column, the questions are numbered from 1.
pub fn questions_from_table(table: &Table) -> SurveyResult<Vec<RawQuestion>> {
    let id_col = table.column(&ID_COLUMNS);
    let question_col = table.require_column(&QUESTION_COLUMNS)?;
    let dimension_col = table.require_column(&DIMENSION_COLUMNS)?;
    if id_col.is_none() {
        info!(
            "{}: no id column, numbering the questions from 1",
            table.name()
        );
    }

    let mut res: Vec<RawQuestion> = Vec::new();
    for (lineno, row) in table.data_rows() {
        let id: QuestionId = match id_col {
            Some(c) => table.parse_cell(*lineno, cell(row, c), "a question id")?,
            None => (res.len() + 1) as QuestionId,
        };
        res.push(RawQuestion {
            id,
            text: cell(row, question_col).to_string(),
            dimension_label: cell(row, dimension_col).to_string(),
        });
    }
    Ok(res)
}

/// Reads the (question id, score) pairs. Rows without a score are skipped.
pub fn responses_from_table(table: &Table) -> SurveyResult<Vec<(QuestionId, u32)>> {
    let id_col = table.require_column(&ID_COLUMNS)?;
    let score_col = table.require_column(&SCORE_COLUMNS)?;

    let mut res: Vec<(QuestionId, u32)> = Vec::new();
    for (lineno, row) in table.data_rows() {
        let id: QuestionId = table.parse_cell(*lineno, cell(row, id_col), "a question id")?;
        let content = cell(row, score_col);
        if content.is_empty() {
            debug!("responses_from_table: question {} has no response", id);
            continue;
        }
        let score: u32 = table.parse_cell(*lineno, content, "a score")?;
        res.push((id, score));
    }
    Ok(res)
}

/// Reads a table of (dimension label, score).
///
/// Without `Dimension` and `Score` columns, the first two columns are used.
pub fn scores_from_table(table: &Table) -> SurveyResult<Vec<(String, u64)>> {
    let (dimension_col, score_col) = match (
        table.column(&DIMENSION_COLUMNS),
        table.column(&SCORE_COLUMNS),
    ) {
        (Some(d), Some(s)) => (d, s),
        _ if table.header.len() >= 2 => {
            debug!(
                "scores_from_table: {}: using the first two columns of {:?}",
                table.name(),
                table.header
            );
            (0, 1)
        }
        _ => {
            return MissingColumnSnafu {
                path: &table.path,
                column: DIMENSION_COLUMNS[0],
            }
            .fail();
        }
    };

    let mut res: Vec<(String, u64)> = Vec::new();
    for (lineno, row) in table.data_rows() {
        let score: u64 = table.parse_cell(*lineno, cell(row, score_col), "a score")?;
        res.push((cell(row, dimension_col).to_string(), score));
    }
    Ok(res)
}

/// Reads the (canonical code, meaning) pairs of an instrument.
pub fn meanings_from_table(
    table: &Table,
    instrument: &Instrument,
    rules: &ScoringRules,
) -> SurveyResult<Vec<(String, String)>> {
    let dimension_col = table.require_column(&DIMENSION_COLUMNS)?;
    let meaning_col = table.require_column(&MEANING_COLUMNS)?;
    let normalizer = Normalizer::new(instrument);

    let mut res: Vec<(String, String)> = Vec::new();
    for (_, row) in table.data_rows() {
        let code = normalizer
            .normalize(cell(row, dimension_col), rules.label_fallback)
            .context(ScoringSnafu {
                instrument: &instrument.name,
            })?;
        res.push((code.code().to_string(), cell(row, meaning_col).to_string()));
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimension_profile::instruments::tci;

    fn table(header: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            path: "mem.csv".to_string(),
            header: header.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .enumerate()
                .map(|(idx, r)| (idx + 2, r.iter().map(|s| s.to_string()).collect()))
                .collect(),
        }
    }

    #[test]
    fn questions_with_and_without_ids() {
        let t = table(
            &[" id", "Question ", "DIMENSION"],
            &[&["7", "Sell houses", "E"], &["", "", ""], &["3", "Keep records", "Conventional"]],
        );
        let qs = questions_from_table(&t).unwrap();
        assert_eq!(qs.len(), 2);
        assert_eq!(qs[0].id, 7);
        assert_eq!(qs[1].id, 3);
        assert_eq!(qs[1].dimension_label, "Conventional");

        let t = table(
            &["question text", "dimension label"],
            &[&["Sell houses", "E"], &["Keep records", "C"]],
        );
        let ids: Vec<QuestionId> = questions_from_table(&t).unwrap().iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn missing_columns_and_bad_cells() {
        let t = table(&["ID", "Question"], &[&["1", "Sell houses"]]);
        assert!(matches!(
            questions_from_table(&t),
            Err(SurveyError::MissingColumn { .. })
        ));
        let t = table(&["ID", "Score"], &[&["1", "4"], &["two", "3"]]);
        match responses_from_table(&t) {
            Err(SurveyError::MalformedCell {
                lineno, content, ..
            }) => {
                assert_eq!(lineno, 3);
                assert_eq!(content, "two");
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn responses_skip_empty_scores() {
        let t = table(&["ID", "Score"], &[&["1", "4"], &["2", ""], &["3", "1"]]);
        assert_eq!(responses_from_table(&t).unwrap(), vec![(1, 4), (3, 1)]);
    }

    #[test]
    fn scores_fall_back_to_first_columns() {
        let t = table(&["trait", "points"], &[&["NS", "12"], &["Harm Avoidance", "3"]]);
        assert_eq!(
            scores_from_table(&t).unwrap(),
            vec![("NS".to_string(), 12), ("Harm Avoidance".to_string(), 3)]
        );
        let t = table(&["Score", "Dimension"], &[&["5", "A"]]);
        assert_eq!(scores_from_table(&t).unwrap(), vec![("A".to_string(), 5)]);
    }

    #[test]
    fn meanings_are_keyed_by_code() {
        let t = table(
            &["Dimension", "Meaning"],
            &[&["Novelty Seeking", "Curious"], &["ST", "Spiritual"]],
        );
        let res = meanings_from_table(&t, &tci(), &ScoringRules::DEFAULT_RULES).unwrap();
        assert_eq!(
            res,
            vec![
                ("NS".to_string(), "Curious".to_string()),
                ("ST".to_string(), "Spiritual".to_string())
            ]
        );
    }

    #[test]
    fn providers() {
        assert_eq!(provider_for(&None, "a/b/Answers.XLSX"), "xlsx");
        assert_eq!(provider_for(&None, "a.csv"), "csv");
        assert_eq!(provider_for(&Some("CSV".to_string()), "a.xlsx"), "csv");
        assert_eq!(simplify_file_name("/tmp/data/q.csv"), "q.csv");
    }
}
