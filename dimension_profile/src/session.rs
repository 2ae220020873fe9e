pub use crate::config::*;
use crate::{aggregate, build_profile, questionnaire::Questionnaire, store::ResponseStore, DimensionScore};

/// The answers of one respondent to one questionnaire.
///
/// The session is the only owner of the responses. Questions are surfaced
/// one at a time in presentation order, but any answer may be changed later.
///
/// ```
/// use dimension_profile::instruments::riasec;
/// use dimension_profile::{Questionnaire, RawQuestion, ScoringRules, Session};
/// # use dimension_profile::ProfileErrors;
///
/// let raw = vec![
///     RawQuestion { id: 1, text: "Fix a bike".to_string(), dimension_label: "Realistic".to_string() },
///     RawQuestion { id: 2, text: "Paint a mural".to_string(), dimension_label: "A".to_string() },
/// ];
/// let rules = ScoringRules::DEFAULT_RULES;
/// let questionnaire = Questionnaire::new(&riasec(), &raw, &rules)?;
/// let mut session = Session::new(questionnaire, &rules);
///
/// while session.current().is_some() {
///     session.answer(4)?;
/// }
/// let profile = session.profile()?;
/// assert_eq!(profile.top[0].0.code, "R");
///
/// # Ok::<(), ProfileErrors>(())
/// ```
pub struct Session {
    questionnaire: Questionnaire,
    store: ResponseStore,
    rules: ScoringRules,
}

impl Session {
    pub fn new(questionnaire: Questionnaire, rules: &ScoringRules) -> Session {
        let store = ResponseStore::new(&questionnaire.instrument().scale);
        Session {
            questionnaire,
            store,
            rules: rules.clone(),
        }
    }

    pub fn questionnaire(&self) -> &Questionnaire {
        &self.questionnaire
    }

    pub fn responses(&self) -> &ResponseStore {
        &self.store
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// The first question, in presentation order, that has no answer yet.
    pub fn current(&self) -> Option<&Question> {
        self.questionnaire
            .questions()
            .iter()
            .find(|q| self.store.get(q.id).is_none())
    }

    /// (number of answered questions, number of questions)
    pub fn progress(&self) -> (usize, usize) {
        let total = self.questionnaire.len();
        let missing = self.store.missing(self.questionnaire.questions()).len();
        (total - missing, total)
    }

    /// Answers the current question.
    ///
    /// Nothing changes if the score is not valid.
    pub fn answer(&mut self, score: u32) -> Result<QuestionId, ProfileErrors> {
        let qid = match self.current() {
            Some(q) => q.id,
            None => {
                return Err(ProfileErrors::MalformedInput {
                    reason: "all the questions have already been answered".to_string(),
                });
            }
        };
        self.store.record(qid, score)?;
        Ok(qid)
    }

    /// Records the answer to any question of the questionnaire.
    pub fn record(&mut self, question_id: QuestionId, score: u32) -> Result<Option<u32>, ProfileErrors> {
        if self.questionnaire.question(question_id).is_none() {
            return Err(ProfileErrors::UnknownQuestion { question_id });
        }
        self.store.record(question_id, score)
    }

    pub fn is_complete(&self) -> bool {
        self.store.is_complete(self.questionnaire.questions())
    }

    pub fn dimension_score(&self) -> Result<DimensionScore, ProfileErrors> {
        aggregate(
            self.questionnaire.questions(),
            &self.store,
            self.questionnaire.instrument(),
            &self.rules,
        )
    }

    pub fn profile(&self) -> Result<Profile, ProfileErrors> {
        let score = self.dimension_score()?;
        build_profile(&score, self.questionnaire.instrument(), self.rules.top_k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::riasec;

    fn session() -> Session {
        let raw: Vec<RawQuestion> = [(11, "R"), (12, "Investigative"), (13, "social")]
            .iter()
            .map(|(id, dim)| RawQuestion {
                id: *id,
                text: format!("Q{}", id),
                dimension_label: dim.to_string(),
            })
            .collect();
        let rules = ScoringRules::DEFAULT_RULES;
        Session::new(Questionnaire::new(&riasec(), &raw, &rules).unwrap(), &rules)
    }

    #[test]
    fn forward_flow() {
        let mut s = session();
        assert_eq!(s.progress(), (0, 3));
        assert_eq!(s.current().unwrap().id, 11);
        assert_eq!(s.answer(5), Ok(11));
        // A rejected answer does not move the flow forward.
        assert!(s.answer(9).is_err());
        assert_eq!(s.current().unwrap().id, 12);
        assert_eq!(s.answer(2), Ok(12));
        assert_eq!(s.answer(3), Ok(13));
        assert!(s.current().is_none());
        assert!(s.is_complete());
        assert!(matches!(
            s.answer(3),
            Err(ProfileErrors::MalformedInput { .. })
        ));
        let score = s.dimension_score().unwrap();
        assert_eq!(score.get("R"), Some(5));
        assert_eq!(score.get("I"), Some(2));
        assert_eq!(score.get("S"), Some(3));
    }

    #[test]
    fn errors_keep_the_responses() {
        let mut s = session();
        s.record(13, 4).unwrap();
        assert_eq!(
            s.record(99, 4),
            Err(ProfileErrors::UnknownQuestion { question_id: 99 })
        );
        assert_eq!(
            s.profile(),
            Err(ProfileErrors::MissingResponse { question_id: 11 })
        );
        assert_eq!(s.responses().get(13), Some(4));
        assert_eq!(s.progress(), (1, 3));
        // The flow resumes at the first unanswered question.
        assert_eq!(s.current().unwrap().id, 11);
    }

    #[test]
    fn changed_answer() {
        let mut s = session();
        for score in [1, 1, 1] {
            s.answer(score).unwrap();
        }
        assert_eq!(s.record(12, 5), Ok(Some(1)));
        let profile = s.profile().unwrap();
        assert_eq!(profile.ranked[0], ("I".to_string(), 5));
        assert_eq!(profile.top.len(), 3);
    }
}
