use log::{debug, info, warn};

use dimension_profile::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::survey::config_reader::*;
use crate::survey::io_common::*;

pub mod config_reader;
pub mod interactive;
pub mod io_common;
pub mod io_csv;
pub mod io_excel;
pub mod report;

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No data found in {path}"))]
    EmptyInput { path: String },
    #[snafu(display("Worksheet {name} not found in {path}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display(
        "{path} has several worksheets, pick one with --excel-worksheet-name or excelWorksheetName"
    ))]
    AmbiguousWorksheet { path: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Column {column} not found in {path}"))]
    MissingColumn { path: String, column: String },
    #[snafu(display("Line {lineno} of {path}: expected {expected}, found {content:?}"))]
    MalformedCell {
        path: String,
        lineno: usize,
        content: String,
        expected: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    Writing {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing the scores"))]
    CsvWrite { source: csv::Error },
    #[snafu(display("Error with the terminal"))]
    Terminal { source: std::io::Error },
    #[snafu(display("{instrument}: {source}"))]
    Scoring {
        source: ProfileErrors,
        instrument: String,
    },
    #[snafu(display("Unknown instrument {name:?}, expected riasec or tci"))]
    UnknownInstrument { name: String },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

/// The profile of one instrument, with the reference data used to
/// describe it.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct InstrumentResult {
    pub instrument: Instrument,
    pub profile: Profile,
}

fn resolve_path(root: &Path, p: &str) -> String {
    let path = Path::new(p);
    if path.is_absolute() {
        p.to_string()
    } else {
        root.join(path).to_string_lossy().to_string()
    }
}

fn read_source_table(root: &Path, src: &InstrumentSource, lpath: &str) -> SurveyResult<Table> {
    let path = resolve_path(root, lpath);
    let provider = provider_for(&src.provider, &path);
    read_table(&path, &provider, src.excel_worksheet_name.as_deref())
}

/// The built-in instrument, with the meanings of the source if any.
fn load_instrument(
    root: &Path,
    src: &InstrumentSource,
    rules: &ScoringRules,
) -> SurveyResult<Instrument> {
    let instrument = dimension_profile::instruments::by_name(&src.instrument).context(
        UnknownInstrumentSnafu {
            name: &src.instrument,
        },
    )?;
    match &src.meanings_file {
        Some(lpath) => {
            let table = read_source_table(root, src, lpath)?;
            let meanings = meanings_from_table(&table, &instrument, rules)?;
            debug!("load_instrument: meanings: {:?}", meanings);
            let name = instrument.name.clone();
            instrument
                .with_meanings(&meanings)
                .context(ScoringSnafu { instrument: name })
        }
        None => Ok(instrument),
    }
}

/// A session over the questions of the source, with the responses of the
/// source already recorded.
fn build_session(
    root: &Path,
    src: &InstrumentSource,
    questions_lpath: &str,
    instrument: &Instrument,
    rules: &ScoringRules,
) -> SurveyResult<Session> {
    let table = read_source_table(root, src, questions_lpath)?;
    let raw_questions = questions_from_table(&table)?;
    let questionnaire = Questionnaire::new(instrument, &raw_questions, rules).context(
        ScoringSnafu {
            instrument: &instrument.name,
        },
    )?;
    let mut session = Session::new(questionnaire, rules);

    if let Some(lpath) = &src.responses_file {
        let table = read_source_table(root, src, lpath)?;
        for (qid, score) in responses_from_table(&table)? {
            let previous = session.record(qid, score).context(ScoringSnafu {
                instrument: &instrument.name,
            })?;
            if let Some(previous) = previous.filter(|p| *p != score) {
                warn!(
                    "{}: question {} answered more than once ({} then {}), keeping the last answer",
                    table.name(),
                    qid,
                    previous,
                    score
                );
            }
        }
    }
    let (answered, total) = session.progress();
    info!(
        "{}: {} of {} questions answered",
        instrument.name, answered, total
    );
    Ok(session)
}

fn profile_source<R: BufRead, W: Write>(
    root: &Path,
    src: &InstrumentSource,
    rules: &ScoringRules,
    interactive: bool,
    input: &mut R,
    output: &mut W,
) -> SurveyResult<InstrumentResult> {
    let instrument = load_instrument(root, src, rules)?;
    let profile = if let Some(questions_lpath) = &src.questions_file {
        let mut session = build_session(root, src, questions_lpath, &instrument, rules)?;
        if interactive {
            interactive::run_interactive(&mut session, input, output)?;
        }
        session.profile().context(ScoringSnafu {
            instrument: &instrument.name,
        })?
    } else if let Some(scores_lpath) = &src.scores_file {
        let table = read_source_table(root, src, scores_lpath)?;
        let rows = scores_from_table(&table)?;
        let score = DimensionScore::from_table(&instrument, &rows, rules).context(ScoringSnafu {
            instrument: &instrument.name,
        })?;
        build_profile(&score, &instrument, rules.top_k).context(ScoringSnafu {
            instrument: &instrument.name,
        })?
    } else {
        whatever!(
            "The source for instrument {} needs a questionsFile or a scoresFile",
            src.instrument
        )
    };
    Ok(InstrumentResult {
        instrument,
        profile,
    })
}

/// The configuration described by the command line, when no configuration
/// file is given.
fn config_from_args(args: &Args) -> SurveyResult<SurveyConfig> {
    let instrument = match &args.instrument {
        Some(x) => x.clone(),
        None => {
            whatever!("An instrument (--instrument) or a configuration file (--config) is required")
        }
    };
    if args.input.is_none() && args.scores.is_none() {
        whatever!("Questions (--input) or scores (--scores) are required");
    }
    Ok(SurveyConfig {
        output_settings: OutputSettings::default(),
        instrument_sources: vec![InstrumentSource {
            instrument,
            provider: args.input_type.clone(),
            questions_file: args.input.clone(),
            responses_file: args.responses.clone(),
            scores_file: args.scores.clone(),
            meanings_file: args.meanings.clone(),
            excel_worksheet_name: args.excel_worksheet_name.clone(),
        }],
        rules: None,
    })
}

/// The rules of the configuration, overridden by the command line.
fn scoring_rules(args: &Args, config: &SurveyConfig) -> SurveyResult<ScoringRules> {
    let mut rules = match &config.rules {
        Some(r) => r.scoring_rules()?,
        None => ScoringRules::DEFAULT_RULES,
    };
    if let Some(k) = config.output_settings.top_k {
        rules.top_k = k;
    }
    if let Some(k) = args.top {
        rules.top_k = k;
    }
    if let Some(v) = args.fill_missing {
        rules.missing_response = MissingResponsePolicy::FillWith(v);
    }
    if args.strict_labels {
        rules.label_fallback = LabelFallback::Reject;
    }
    Ok(rules)
}

/// Where an output goes: the command line wins, an empty value turns the
/// output off, and otherwise the output directory of the configuration is
/// used if there is one.
fn destination(flag: &Option<String>, output_dir: &Option<String>, file_name: &str) -> Option<String> {
    match flag.as_deref() {
        Some(x) if x.trim().is_empty() => None,
        Some(x) => Some(x.to_string()),
        None => output_dir
            .as_ref()
            .map(|d| resolve_path(Path::new(d), file_name)),
    }
}

fn write_destination<W: Write>(dest: &str, contents: &[u8], output: &mut W) -> SurveyResult<()> {
    if dest == "stdout" {
        output.write_all(contents).context(TerminalSnafu {})?;
    } else {
        fs::write(dest, contents).context(WritingSnafu { path: dest })?;
        info!("Wrote {}", dest);
    }
    Ok(())
}

fn check_reference(reference_path: &str, summary_js: &JSValue) -> SurveyResult<()> {
    let summary_ref = read_summary(reference_path)?;
    debug!("summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    let pretty_js_stats = serde_json::to_string_pretty(summary_js).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(
            pretty_js_summary_ref.as_str(),
            pretty_js_stats.as_ref(),
            "\n",
        );
        return ReferenceMismatchSnafu {}.fail();
    }
    info!("The summary matches the reference {}", reference_path);
    Ok(())
}

/// Runs all the instruments described by the arguments.
///
/// The questions of the interactive mode are read from `input`. The report
/// (and the outputs sent to `stdout`) are written to `output`.
pub fn run_with_io<R: BufRead, W: Write>(
    args: &Args,
    input: &mut R,
    output: &mut W,
) -> SurveyResult<Vec<InstrumentResult>> {
    let (config, root): (SurveyConfig, PathBuf) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (config, root)
        }
        None => (config_from_args(args)?, PathBuf::new()),
    };
    info!("config: {:?}", config);

    if config.instrument_sources.is_empty() {
        whatever!("No instrument sources in the configuration");
    }
    let rules = scoring_rules(args, &config)?;
    debug!("run_with_io: rules: {:?}", rules);

    let mut results: Vec<InstrumentResult> = Vec::new();
    for src in config.instrument_sources.iter() {
        let res = profile_source(&root, src, &rules, args.interactive, input, output)?;
        results.push(res);
    }

    let report_name = config.output_settings.report_name.as_deref();
    let text = report::render_text(report_name, &results);
    output.write_all(text.as_bytes()).context(TerminalSnafu {})?;

    let output_dir = config
        .output_settings
        .output_directory
        .as_ref()
        .map(|d| resolve_path(&root, d));

    if let Some(dir) = &output_dir {
        if !Path::new(dir).is_dir() {
            info!("Creating the output directory {}", dir);
            fs::create_dir_all(dir).context(WritingSnafu { path: dir })?;
        }
    }

    if let Some(dest) = destination(&args.out, &output_dir, "scores.csv") {
        let mut buffer: Vec<u8> = Vec::new();
        report::write_scores_csv(&mut buffer, &results)?;
        write_destination(&dest, &buffer, output)?;
    }

    let summary_js = report::build_summary_js(report_name, rules.top_k, &results);
    if let Some(dest) = destination(&args.summary, &output_dir, "summary.json") {
        let pretty_js = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;
        write_destination(&dest, pretty_js.as_bytes(), output)?;
    }

    // The reference summary, if provided for comparison
    if let Some(reference_path) = &args.reference {
        check_reference(reference_path, &summary_js)?;
    }

    Ok(results)
}

#[cfg(test)]
fn run_survey_test(test_name: &str, config_lpath: &str, summary_lpath: &str) -> Vec<InstrumentResult> {
    let test_dir = option_env!("SURVEY_TEST_DIR")
        .unwrap_or(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data"));
    info!("Running test {}", test_name);
    let args = Args {
        config: Some(format!("{}/{}/{}", test_dir, test_name, config_lpath)),
        reference: Some(format!("{}/{}/{}", test_dir, test_name, summary_lpath)),
        ..Args::default()
    };
    let mut output: Vec<u8> = Vec::new();
    let res = run_with_io(&args, &mut std::io::empty(), &mut output);
    match res {
        Ok(results) => results,
        Err(e) => {
            warn!("Error occured {:?}", e);
            eprintln!("An error occured {}", e);
            if let Some(bt) = snafu::ErrorCompat::backtrace(&e) {
                eprintln!("trace: {}", bt);
            } else {
                eprintln!("No trace found");
            }
            panic!("test {} failed: {}", test_name, e)
        }
    }
}

#[cfg(test)]
pub fn test_wrapper(test_name: &str) -> Vec<InstrumentResult> {
    run_survey_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    )
}
