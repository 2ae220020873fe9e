use log::debug;
use std::collections::BTreeMap;

use crate::config::*;

/// The answers of one respondent, at most one per question.
///
/// The store never invents an answer: a question without a recorded
/// score is missing, whatever policy the caller applies later.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ResponseStore {
    scale: LikertScale,
    responses: BTreeMap<QuestionId, u32>,
}

impl ResponseStore {
    pub fn new(scale: &LikertScale) -> ResponseStore {
        ResponseStore {
            scale: scale.clone(),
            responses: BTreeMap::new(),
        }
    }

    pub fn scale(&self) -> &LikertScale {
        &self.scale
    }

    /// Records the answer to a question, replacing any previous answer.
    ///
    /// Returns the previous answer. A score outside of the scale leaves the
    /// store unchanged.
    pub fn record(&mut self, question_id: QuestionId, score: u32) -> Result<Option<u32>, ProfileErrors> {
        if !self.scale.contains(score) {
            return Err(ProfileErrors::InvalidScore {
                question_id: Some(question_id),
                score,
                min: self.scale.min,
                max: self.scale.max,
            });
        }
        let previous = self.responses.insert(question_id, score);
        if let Some(p) = previous {
            debug!(
                "record: question {} changed from {} to {}",
                question_id, p, score
            );
        }
        Ok(previous)
    }

    pub fn get(&self, question_id: QuestionId) -> Option<u32> {
        self.responses.get(&question_id).cloned()
    }

    pub fn is_complete(&self, questions: &[Question]) -> bool {
        questions.iter().all(|q| self.responses.contains_key(&q.id))
    }

    /// The questions without an answer, in the order of the questions.
    pub fn missing(&self, questions: &[Question]) -> Vec<QuestionId> {
        questions
            .iter()
            .filter(|q| !self.responses.contains_key(&q.id))
            .map(|q| q.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// The answers, by increasing question id.
    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, u32)> + '_ {
        self.responses.iter().map(|(qid, s)| (*qid, *s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions(ids: &[QuestionId]) -> Vec<Question> {
        ids.iter()
            .map(|id| Question {
                id: *id,
                text: format!("question {}", id),
                dimension: "R".to_string(),
            })
            .collect()
    }

    #[test]
    fn out_of_scale_is_rejected() {
        let mut store = ResponseStore::new(&LikertScale::new(1, 5));
        store.record(1, 4).unwrap();
        let err = store.record(1, 6).unwrap_err();
        assert_eq!(
            err,
            ProfileErrors::InvalidScore {
                question_id: Some(1),
                score: 6,
                min: 1,
                max: 5
            }
        );
        assert!(store.record(2, 0).is_err());
        assert_eq!(store.get(1), Some(4));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn last_write_wins() {
        let mut store = ResponseStore::new(&LikertScale::new(1, 5));
        assert_eq!(store.record(7, 2), Ok(None));
        assert_eq!(store.record(7, 5), Ok(Some(2)));
        assert_eq!(store.get(7), Some(5));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn completeness() {
        let qs = questions(&[3, 1, 2]);
        let mut store = ResponseStore::new(&LikertScale::new(1, 5));
        assert!(!store.is_complete(&qs));
        store.record(1, 3).unwrap();
        assert_eq!(store.missing(&qs), vec![3, 2]);
        store.record(2, 3).unwrap();
        store.record(3, 1).unwrap();
        assert!(store.is_complete(&qs));
        assert!(store.missing(&qs).is_empty());
        assert_eq!(store.iter().collect::<Vec<_>>(), vec![(1, 3), (2, 3), (3, 1)]);
    }
}
