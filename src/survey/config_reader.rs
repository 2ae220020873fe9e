use crate::survey::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "reportName")]
    pub report_name: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "topK")]
    pub top_k: Option<usize>,
}

/// The files of one instrument.
///
/// Either the questions (and optionally the responses) or a table of
/// scores that were computed earlier.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentSource {
    pub instrument: String,
    pub provider: Option<String>,
    #[serde(rename = "questionsFile")]
    pub questions_file: Option<String>,
    #[serde(rename = "responsesFile")]
    pub responses_file: Option<String>,
    #[serde(rename = "scoresFile")]
    pub scores_file: Option<String>,
    #[serde(rename = "meaningsFile")]
    pub meanings_file: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesSettings {
    #[serde(rename = "missingResponse")]
    pub missing_response: Option<String>,
    #[serde(rename = "fillValue")]
    pub fill_value: Option<u32>,
    #[serde(rename = "labelFallback")]
    pub label_fallback: Option<String>,
}

impl RulesSettings {
    pub fn scoring_rules(&self) -> SurveyResult<ScoringRules> {
        let missing_response = match self.missing_response.as_deref() {
            None | Some("reject") => MissingResponsePolicy::Reject,
            Some("fillMidpoint") => MissingResponsePolicy::FillWithMidpoint,
            Some("fillWith") => match self.fill_value {
                Some(v) => MissingResponsePolicy::FillWith(v),
                None => {
                    whatever!("missingResponse rule fillWith requires a fillValue")
                }
            },
            Some(x) => {
                whatever!("unknown missingResponse rule: {}", x)
            }
        };
        let label_fallback = match self.label_fallback.as_deref() {
            None | Some("derivePrefix") => LabelFallback::DerivePrefix,
            Some("reject") => LabelFallback::Reject,
            Some(x) => {
                whatever!("unknown labelFallback rule: {}", x)
            }
        };
        Ok(ScoringRules {
            missing_response,
            label_fallback,
            ..ScoringRules::DEFAULT_RULES
        })
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "instrumentSources")]
    pub instrument_sources: Vec<InstrumentSource>,
    pub rules: Option<RulesSettings>,
}

pub fn read_config(path: &str) -> SurveyResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: SurveyConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> SurveyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config() {
        let config: SurveyConfig = serde_json::from_str(
            r#"{"instrumentSources": [{"instrument": "tci", "scoresFile": "s.csv"}]}"#,
        )
        .unwrap();
        assert_eq!(config.output_settings, OutputSettings::default());
        assert_eq!(config.instrument_sources[0].scores_file.as_deref(), Some("s.csv"));
        assert!(config.rules.is_none());
    }

    #[test]
    fn rules() {
        let r = RulesSettings {
            missing_response: Some("fillWith".to_string()),
            fill_value: Some(2),
            label_fallback: Some("reject".to_string()),
        };
        let rules = r.scoring_rules().unwrap();
        assert_eq!(rules.missing_response, MissingResponsePolicy::FillWith(2));
        assert_eq!(rules.label_fallback, LabelFallback::Reject);
        assert_eq!(rules.top_k, 3);

        assert_eq!(
            RulesSettings::default().scoring_rules().unwrap(),
            ScoringRules::DEFAULT_RULES
        );
        let bad = RulesSettings {
            missing_response: Some("fillWith".to_string()),
            ..RulesSettings::default()
        };
        assert!(bad.scoring_rules().is_err());
        let bad = RulesSettings {
            label_fallback: Some("guess".to_string()),
            ..RulesSettings::default()
        };
        assert!(bad.scoring_rules().is_err());
    }
}
