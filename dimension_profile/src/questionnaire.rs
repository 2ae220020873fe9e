use log::{info, warn};
use std::collections::HashSet;

use crate::config::*;
use crate::normalizer::Normalizer;

/// The validated questions of one instrument, in presentation order.
///
/// Every question carries a canonical code of the instrument.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Questionnaire {
    instrument: Instrument,
    questions: Vec<Question>,
}

impl Questionnaire {
    /// Resolves the dimension label of every question.
    ///
    /// The whole set is rejected if a single label cannot be mapped or if
    /// an id appears twice.
    pub fn new(
        instrument: &Instrument,
        raw_questions: &[RawQuestion],
        rules: &ScoringRules,
    ) -> Result<Questionnaire, ProfileErrors> {
        if raw_questions.is_empty() {
            return Err(ProfileErrors::MalformedInput {
                reason: format!("no questions for instrument {}", instrument.name),
            });
        }
        let normalizer = Normalizer::new(instrument);
        let mut seen: HashSet<QuestionId> = HashSet::new();
        let mut questions: Vec<Question> = Vec::new();
        let mut num_derived = 0;
        for rq in raw_questions {
            if !seen.insert(rq.id) {
                return Err(ProfileErrors::MalformedInput {
                    reason: format!("duplicate question id {}", rq.id),
                });
            }
            let label = normalizer.normalize(&rq.dimension_label, rules.label_fallback)?;
            if !label.is_verified() {
                num_derived += 1;
            }
            questions.push(Question {
                id: rq.id,
                text: rq.text.clone(),
                dimension: label.code().to_string(),
            });
        }
        if num_derived > 0 {
            warn!(
                "{}: {} question(s) with a derived dimension code",
                instrument.name, num_derived
            );
        }
        info!(
            "Loaded {} questions for instrument {}",
            questions.len(),
            instrument.name
        );
        Ok(Questionnaire {
            instrument: instrument.clone(),
            questions,
        })
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, question_id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
