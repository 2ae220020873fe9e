// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The identifier of a question, exactly as declared by the question source.
pub type QuestionId = u32;

/// The closed range of answers accepted for each question, with optional
/// labels for each point of the scale.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LikertScale {
    pub min: u32,
    pub max: u32,
    /// One label per point, from `min` to `max`. May be empty.
    pub labels: Vec<String>,
}

impl LikertScale {
    pub fn new(min: u32, max: u32) -> LikertScale {
        LikertScale {
            min,
            max,
            labels: Vec::new(),
        }
    }

    pub fn with_labels(self, labels: &[&str]) -> LikertScale {
        LikertScale {
            labels: labels.iter().map(|s| s.to_string()).collect(),
            ..self
        }
    }

    pub fn contains(&self, score: u32) -> bool {
        score >= self.min && score <= self.max
    }

    /// The middle point of the scale, rounded down.
    pub fn midpoint(&self) -> u32 {
        self.min + (self.max - self.min) / 2
    }

    pub fn label(&self, score: u32) -> Option<&str> {
        if !self.contains(score) {
            return None;
        }
        self.labels
            .get((score - self.min) as usize)
            .map(|s| s.as_str())
    }

    /// All the points of the scale, in increasing order.
    pub fn points(&self) -> impl Iterator<Item = u32> {
        self.min..=self.max
    }
}

/// A canonical dimension of an instrument.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Dimension {
    /// The short canonical code (for example `R` or `NS`).
    pub code: String,
    /// The display name (for example `Realistic`).
    pub name: String,
    pub description: String,
}

impl Dimension {
    pub fn new(code: &str, name: &str, description: &str) -> Dimension {
        Dimension {
            code: code.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// A fixed questionnaire: the enumeration of its dimensions, in declaration
/// order, and the scale of its answers.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Instrument {
    pub name: String,
    pub dimensions: Vec<Dimension>,
    pub scale: LikertScale,
}

impl Instrument {
    pub fn dimension(&self, code: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.code == code)
    }

    /// The position of the dimension in the declaration order.
    pub fn position(&self, code: &str) -> Option<usize> {
        self.dimensions.iter().position(|d| d.code == code)
    }

    /// Replaces the descriptive text of the given dimensions.
    ///
    /// The meanings are keyed by canonical code. Unknown codes are rejected.
    pub fn with_meanings(self, meanings: &[(String, String)]) -> Result<Instrument, ProfileErrors> {
        let mut res = self;
        for (code, meaning) in meanings {
            let dim = res
                .dimensions
                .iter_mut()
                .find(|d| d.code == *code)
                .ok_or_else(|| ProfileErrors::UnknownDimension {
                    label: code.clone(),
                })?;
            dim.description = meaning.clone();
        }
        Ok(res)
    }
}

/// A question as read from a question source, before its dimension label
/// is resolved to a canonical code.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RawQuestion {
    pub id: QuestionId,
    pub text: String,
    pub dimension_label: String,
}

/// A question whose dimension is a canonical code of its instrument.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub dimension: String,
}

// ******** Output data structures *********

/// The display data of a dimension, as found in the reference data.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DimensionDescription {
    pub code: String,
    pub name: String,
    pub description: String,
}

/// The final profile of one instrument.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Profile {
    pub instrument: String,
    /// All the dimensions, by decreasing score.
    pub ranked: Vec<(String, u64)>,
    /// The first dimensions of the ranking, with their descriptions.
    pub top: Vec<(DimensionDescription, u64)>,
}

/// Errors that prevent a profile from being computed.
///
/// All of them are recoverable: the responses recorded so far are kept.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ProfileErrors {
    /// A score outside of the scale of the instrument.
    InvalidScore {
        question_id: Option<QuestionId>,
        score: u32,
        min: u32,
        max: u32,
    },
    /// The profile was requested before this question was answered.
    MissingResponse { question_id: QuestionId },
    /// A label that cannot be mapped to a dimension of the instrument.
    UnknownDimension { label: String },
    /// A response for a question that is not part of the questionnaire.
    UnknownQuestion { question_id: QuestionId },
    MalformedInput { reason: String },
}

impl Error for ProfileErrors {}

impl Display for ProfileErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileErrors::InvalidScore {
                question_id: Some(qid),
                score,
                min,
                max,
            } => write!(
                f,
                "invalid score {} for question {}: expected a value between {} and {}",
                score, qid, min, max
            ),
            ProfileErrors::InvalidScore {
                question_id: None,
                score,
                min,
                max,
            } => write!(
                f,
                "invalid score {}: expected a value between {} and {}",
                score, min, max
            ),
            ProfileErrors::MissingResponse { question_id } => {
                write!(f, "question {} has not been answered", question_id)
            }
            ProfileErrors::UnknownDimension { label } => {
                write!(f, "unknown dimension {:?}", label)
            }
            ProfileErrors::UnknownQuestion { question_id } => {
                write!(f, "question {} is not part of the questionnaire", question_id)
            }
            ProfileErrors::MalformedInput { reason } => write!(f, "malformed input: {}", reason),
        }
    }
}

// ********* Configuration **********

/// What to do with a question that has no response when the scores are
/// computed.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum MissingResponsePolicy {
    /// Fail with `MissingResponse`.
    Reject,
    /// Count the given score instead.
    FillWith(u32),
    /// Count the middle point of the scale instead.
    FillWithMidpoint,
}

/// What to do with a dimension label that is neither a code nor a full name.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum LabelFallback {
    /// Only exact codes and full names are accepted.
    Reject,
    /// The first two characters of the label, uppercased, are tried as a
    /// code. Such matches are reported as derived.
    DerivePrefix,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ScoringRules {
    pub missing_response: MissingResponsePolicy,
    pub label_fallback: LabelFallback,
    /// The number of dimensions described in the profile.
    pub top_k: usize,
}

impl ScoringRules {
    pub const DEFAULT_RULES: ScoringRules = ScoringRules {
        missing_response: MissingResponsePolicy::Reject,
        label_fallback: LabelFallback::DerivePrefix,
        top_k: 3,
    };
}

impl Default for ScoringRules {
    fn default() -> Self {
        ScoringRules::DEFAULT_RULES
    }
}
