use clap::Parser;

/// This program computes the dimension profile of Likert questionnaires (RIASEC, TCI).
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the instruments and their input files.
    /// When provided, the input options below are ignored.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (riasec or tci) The instrument of the questions or of the scores.
    #[clap(long, value_parser)]
    pub instrument: Option<String>,

    /// (file path) The questions, with the columns ID, Question and Dimension.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or xlsx, default from the file extension) The type of the input files.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (file path, optional) The answers to the questions, with the columns ID and Score.
    #[clap(long, value_parser)]
    pub responses: Option<String>,

    /// (file path) Scores computed earlier, with the columns Dimension and Score. They are
    /// reported directly, without questions.
    #[clap(long, value_parser)]
    pub scores: Option<String>,

    /// (file path, optional) Descriptions of the dimensions, with the columns Dimension
    /// and Meaning.
    #[clap(long, value_parser)]
    pub meanings: Option<String>,

    /// If passed as an argument, the questions that have no answer are asked on the terminal.
    #[clap(long, takes_value = false)]
    pub interactive: bool,

    /// (default 3) The number of dimensions described at the top of the profile. 0 only prints
    /// the breakdown.
    #[clap(long, value_parser)]
    pub top: Option<usize>,

    /// (score, optional) If specified, questions without an answer count for this score
    /// instead of stopping the program.
    #[clap(long, value_parser)]
    pub fill_missing: Option<u32>,

    /// If passed as an argument, dimension labels must be exact codes or names.
    #[clap(long, takes_value = false)]
    pub strict_labels: bool,

    /// (file path, 'stdout' or empty) If specified, the ranked scores will be written in CSV
    /// format to the given location. An empty value writes nothing, even if the configuration
    /// has an output directory.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the profiles will be written
    /// in JSON format to the given location. An empty value writes nothing, even if the
    /// configuration has an output directory.
    #[clap(short, long, value_parser)]
    pub summary: Option<String>,

    /// (file path) A reference file containing a summary in JSON format. If provided, dimprof will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
