// The outputs of a run: the text report, the score table and the JSON summary.

use std::fmt::Write as FmtWrite;
use std::io::Write;

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Value as JSValue;

use crate::survey::*;

const BAR_WIDTH: u64 = 30;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(rename = "reportName")]
    pub report_name: Option<String>,
    #[serde(rename = "topK")]
    pub top_k: usize,
}

fn dimension_name<'a>(instrument: &'a Instrument, code: &'a str) -> &'a str {
    instrument
        .dimension(code)
        .map(|d| d.name.as_str())
        .unwrap_or(code)
}

/// The bar of a score, scaled on the highest score of the ranking.
fn bar(score: u64, max_score: u64) -> String {
    if max_score == 0 {
        return String::new();
    }
    let width = score as u128 * BAR_WIDTH as u128 / max_score as u128;
    "#".repeat(width as usize)
}

fn render_instrument(text: &mut String, res: &InstrumentResult) -> std::fmt::Result {
    let profile = &res.profile;
    writeln!(text, "{}", profile.instrument)?;
    writeln!(text, "Top {} dimensions:", profile.top.len())?;
    for (idx, (desc, score)) in profile.top.iter().enumerate() {
        writeln!(
            text,
            "  {}. {} {} ({}): {}",
            idx + 1,
            desc.code,
            desc.name,
            score,
            desc.description
        )?;
    }
    writeln!(text, "Breakdown:")?;
    let max_score = profile.ranked.iter().map(|(_, s)| *s).max().unwrap_or(0);
    let name_width = res
        .instrument
        .dimensions
        .iter()
        .map(|d| d.code.len() + d.name.len() + 1)
        .max()
        .unwrap_or(0);
    for (code, score) in profile.ranked.iter() {
        let label = format!("{} {}", code, dimension_name(&res.instrument, code));
        writeln!(
            text,
            "  {:<width$} {:>4} {}",
            label,
            score,
            bar(*score, max_score),
            width = name_width
        )?;
        if let Some(dim) = res.instrument.dimension(code) {
            writeln!(text, "  {:<width$}      {}", "", dim.description, width = name_width)?;
        }
    }
    writeln!(text)
}

fn render_recommendation(text: &mut String, results: &[InstrumentResult]) -> std::fmt::Result {
    writeln!(text, "Recommendations:")?;
    if results.len() < 2 {
        return writeln!(
            text,
            "Profile more than one instrument for combined recommendations."
        );
    }
    let tops: Vec<String> = results
        .iter()
        .filter_map(|r| {
            r.profile.ranked.first().map(|(code, _)| {
                format!(
                    "top {} dimension {}",
                    r.profile.instrument,
                    dimension_name(&r.instrument, code)
                )
            })
        })
        .collect();
    writeln!(
        text,
        "Considering your {}, consider exploring related fields and programs.",
        tops.join(" and ")
    )
}

/// The report printed at the end of a run.
pub fn render_text(report_name: Option<&str>, results: &[InstrumentResult]) -> String {
    let mut text = String::new();
    // Writing to a string does not fail.
    let _ = render_all(&mut text, report_name, results);
    text
}

fn render_all(
    text: &mut String,
    report_name: Option<&str>,
    results: &[InstrumentResult],
) -> std::fmt::Result {
    if let Some(name) = report_name {
        writeln!(text, "{}", name)?;
        writeln!(text, "{}", "=".repeat(name.chars().count()))?;
        writeln!(text)?;
    }
    for res in results.iter() {
        render_instrument(text, res)?;
    }
    render_recommendation(text, results)
}

/// Writes the ranked scores of all the instruments, in the format accepted
/// back as a score table.
pub fn write_scores_csv<W: Write>(writer: W, results: &[InstrumentResult]) -> SurveyResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    wtr.write_record(["Dimension", "Name", "Score", "Source"])
        .context(CsvWriteSnafu {})?;
    for res in results.iter() {
        for (code, score) in res.profile.ranked.iter() {
            wtr.write_record([
                code.as_str(),
                dimension_name(&res.instrument, code),
                score.to_string().as_str(),
                res.profile.instrument.as_str(),
            ])
            .context(CsvWriteSnafu {})?;
        }
    }
    wtr.flush().context(TerminalSnafu {})?;
    Ok(())
}

fn result_to_json(res: &InstrumentResult) -> JSValue {
    let ranked: Vec<JSValue> = res
        .profile
        .ranked
        .iter()
        .map(|(code, score)| {
            json!({
                "dimension": code,
                "name": dimension_name(&res.instrument, code),
                "score": score
            })
        })
        .collect();
    let top: Vec<JSValue> = res
        .profile
        .top
        .iter()
        .map(|(desc, score)| {
            json!({
                "dimension": desc.code,
                "name": desc.name,
                "description": desc.description,
                "score": score
            })
        })
        .collect();
    json!({"instrument": res.profile.instrument, "ranked": ranked, "top": top})
}

pub fn build_summary_js(
    report_name: Option<&str>,
    top_k: usize,
    results: &[InstrumentResult],
) -> JSValue {
    let c = OutputConfig {
        report_name: report_name.map(|s| s.to_string()),
        top_k,
    };
    let results_js: Vec<JSValue> = results.iter().map(result_to_json).collect();
    json!({
        "config": c,
        "results": results_js })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimension_profile::instruments::{riasec, tci};

    fn result(instrument: Instrument, rows: &[(&str, u64)], k: usize) -> InstrumentResult {
        let rows: Vec<(String, u64)> = rows.iter().map(|(l, s)| (l.to_string(), *s)).collect();
        let score =
            DimensionScore::from_table(&instrument, &rows, &ScoringRules::DEFAULT_RULES).unwrap();
        let profile = build_profile(&score, &instrument, k).unwrap();
        InstrumentResult {
            instrument,
            profile,
        }
    }

    #[test]
    fn bars() {
        assert_eq!(bar(10, 10).len(), 30);
        assert_eq!(bar(5, 10).len(), 15);
        assert_eq!(bar(1, 3).len(), 10);
        assert_eq!(bar(0, 10), "");
        assert_eq!(bar(0, 0), "");
        assert_eq!(bar(u64::MAX, u64::MAX).len(), 30);
        assert_eq!(bar(u64::MAX / 2, u64::MAX).len(), 14);
    }

    #[test]
    fn large_scores_report() {
        let res = result(riasec(), &[("R", 1_000_000_000_000_000_000), ("C", 500_000_000_000_000_000)], 1);
        let text = render_text(None, &[res]);
        assert!(text.contains(&format!(" {}\n", "#".repeat(30))));
        assert!(text.contains(&format!(" {}\n", "#".repeat(15))));
    }

    #[test]
    fn single_instrument_report() {
        let res = result(riasec(), &[("R", 12), ("S", 6)], 2);
        let text = render_text(Some("Interests"), &[res]);
        assert!(text.starts_with("Interests\n=========\n"));
        assert!(text.contains("Top 2 dimensions:\n"));
        assert!(text.contains("  1. R Realistic (12): Practical, Hands-on\n"));
        assert!(text.contains("  2. S Social (6): Helping, Cooperative\n"));
        assert!(text.contains(&format!("{}\n", "#".repeat(30))));
        assert!(text.contains("Profile more than one instrument"));
    }

    #[test]
    fn combined_recommendation() {
        let r = result(riasec(), &[("A", 9)], 1);
        let t = result(tci(), &[("HA", 4), ("ST", 7)], 1);
        let text = render_text(None, &[r, t]);
        assert!(text.contains(
            "Considering your top RIASEC dimension Artistic and top TCI dimension Self-Transcendence, \
             consider exploring related fields and programs.\n"
        ));
    }

    #[test]
    fn scores_csv() {
        let t = result(tci(), &[("NS", 3), ("C", 5)], 1);
        let mut buffer: Vec<u8> = Vec::new();
        write_scores_csv(&mut buffer, &[t]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "Dimension,Name,Score,Source");
        assert_eq!(lines[1], "C,Cooperativeness,5,TCI");
        assert_eq!(lines[2], "NS,Novelty Seeking,3,TCI");
        assert_eq!(lines[3], "HA,Harm Avoidance,0,TCI");
    }

    #[test]
    fn summary() {
        let r = result(riasec(), &[("I", 4)], 1);
        let js = build_summary_js(None, 1, &[r]);
        assert_eq!(js["config"]["topK"], json!(1));
        assert_eq!(js["config"]["reportName"], JSValue::Null);
        assert_eq!(js["results"][0]["instrument"], json!("RIASEC"));
        assert_eq!(js["results"][0]["ranked"].as_array().unwrap().len(), 6);
        assert_eq!(
            js["results"][0]["top"][0],
            json!({"dimension": "I", "name": "Investigative",
                   "description": "Analytical, Curious", "score": 4})
        );
    }
}
