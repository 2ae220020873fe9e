mod config;
pub mod instruments;
pub mod manual;
pub mod normalizer;
pub mod questionnaire;
pub mod session;
pub mod store;

use log::{debug, info, warn};

use std::{
    cmp::Reverse,
    collections::{HashMap, HashSet},
    ops::{Add, AddAssign},
};

pub use crate::config::*;
pub use crate::normalizer::{NormalizedLabel, Normalizer};
pub use crate::questionnaire::Questionnaire;
pub use crate::session::Session;
pub use crate::store::ResponseStore;

// **** Private structures ****

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct ScoreSum(u64);

impl ScoreSum {
    const EMPTY: ScoreSum = ScoreSum(0);
}

impl std::iter::Sum for ScoreSum {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        ScoreSum(iter.map(|s| s.0).sum())
    }
}

impl AddAssign for ScoreSum {
    fn add_assign(&mut self, rhs: ScoreSum) {
        self.0 += rhs.0;
    }
}

impl Add for ScoreSum {
    type Output = ScoreSum;
    fn add(self: ScoreSum, rhs: ScoreSum) -> ScoreSum {
        ScoreSum(self.0 + rhs.0)
    }
}

/// The summed score of every dimension of an instrument.
///
/// All the dimensions of the instrument are present, in declaration order,
/// including the ones without any question (with a score of 0).
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DimensionScore {
    scores: Vec<(String, u64)>,
}

impl DimensionScore {
    fn from_totals(instrument: &Instrument, totals: &HashMap<String, ScoreSum>) -> DimensionScore {
        DimensionScore {
            scores: instrument
                .dimensions
                .iter()
                .map(|d| {
                    let total = totals.get(&d.code).cloned().unwrap_or(ScoreSum::EMPTY);
                    (d.code.clone(), total.0)
                })
                .collect(),
        }
    }

    /// Builds the scores from an already computed table of
    /// (dimension label, score).
    ///
    /// The labels are resolved like question labels. A dimension listed twice
    /// is rejected and dimensions not listed get a score of 0.
    pub fn from_table(
        instrument: &Instrument,
        rows: &[(String, u64)],
        rules: &ScoringRules,
    ) -> Result<DimensionScore, ProfileErrors> {
        let normalizer = Normalizer::new(instrument);
        let mut totals: HashMap<String, ScoreSum> = HashMap::new();
        for (label, score) in rows.iter() {
            let code = normalizer.normalize(label, rules.label_fallback)?;
            debug!("from_table: {:?} -> {:?}: {}", label, code, score);
            if totals
                .insert(code.code().to_string(), ScoreSum(*score))
                .is_some()
            {
                return Err(ProfileErrors::MalformedInput {
                    reason: format!("dimension {} is listed more than once", code.code()),
                });
            }
        }
        Ok(DimensionScore::from_totals(instrument, &totals))
    }

    pub fn get(&self, code: &str) -> Option<u64> {
        self.scores
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, s)| *s)
    }

    /// The scores, in the declaration order of the instrument.
    pub fn scores(&self) -> &[(String, u64)] {
        &self.scores
    }

    pub fn total(&self) -> u64 {
        self.scores.iter().map(|(_, s)| ScoreSum(*s)).sum::<ScoreSum>().0
    }
}

/// Sums the answers of each dimension.
///
/// Arguments:
/// * `questions` the questions, with their dimension
/// * `responses` the recorded answers
/// * `instrument` the instrument that defines the dimensions
/// * `rules` the policies for unanswered questions and dimension labels
///
/// Every stored answer must belong to one of the questions. Unless the rules
/// say how to fill them, all the questions must be answered.
pub fn aggregate(
    questions: &[Question],
    responses: &ResponseStore,
    instrument: &Instrument,
    rules: &ScoringRules,
) -> Result<DimensionScore, ProfileErrors> {
    info!(
        "Aggregating {:?} responses for {:?} questions of instrument {}",
        responses.len(),
        questions.len(),
        instrument.name
    );

    let question_ids: HashSet<QuestionId> = questions.iter().map(|q| q.id).collect();
    if let Some((qid, _)) = responses.iter().find(|(qid, _)| !question_ids.contains(qid)) {
        return Err(ProfileErrors::UnknownQuestion { question_id: qid });
    }

    let fill_value: Option<u32> = match rules.missing_response {
        MissingResponsePolicy::Reject => None,
        MissingResponsePolicy::FillWithMidpoint => Some(instrument.scale.midpoint()),
        MissingResponsePolicy::FillWith(v) if instrument.scale.contains(v) => Some(v),
        MissingResponsePolicy::FillWith(v) => {
            return Err(ProfileErrors::InvalidScore {
                question_id: None,
                score: v,
                min: instrument.scale.min,
                max: instrument.scale.max,
            });
        }
    };

    let normalizer = Normalizer::new(instrument);
    let mut totals: HashMap<String, ScoreSum> = HashMap::new();
    for q in questions.iter() {
        let code = normalizer.normalize(&q.dimension, rules.label_fallback)?;
        let score = match (responses.get(q.id), fill_value) {
            (Some(s), _) => s,
            (None, Some(v)) => {
                warn!("aggregate: question {} not answered, counting {}", q.id, v);
                v
            }
            (None, None) => {
                return Err(ProfileErrors::MissingResponse { question_id: q.id });
            }
        };
        debug!(
            "aggregate: question {} dimension {} score {}",
            q.id,
            code.code(),
            score
        );
        *totals
            .entry(code.code().to_string())
            .or_insert(ScoreSum::EMPTY) += ScoreSum(score as u64);
    }

    let res = DimensionScore::from_totals(instrument, &totals);
    debug!("aggregate: scores {:?}", res.scores);
    Ok(res)
}

/// Orders the dimensions by decreasing score.
///
/// Dimensions with the same score keep the declaration order of the
/// instrument.
pub fn rank(
    score: &DimensionScore,
    instrument: &Instrument,
) -> Result<Vec<(String, u64)>, ProfileErrors> {
    let mut positioned: Vec<(usize, &String, u64)> = Vec::new();
    for (code, s) in score.scores.iter() {
        let pos = instrument
            .position(code)
            .ok_or_else(|| ProfileErrors::UnknownDimension {
                label: code.clone(),
            })?;
        positioned.push((pos, code, *s));
    }
    positioned.sort_by_key(|(pos, _, s)| (Reverse(*s), *pos));
    Ok(positioned
        .into_iter()
        .map(|(_, code, s)| (code.clone(), s))
        .collect())
}

/// The first `k` entries of a ranking, or all of them if there are fewer.
pub fn top_k(ranked: &[(String, u64)], k: usize) -> Vec<(String, u64)> {
    ranked[..k.min(ranked.len())].to_vec()
}

pub fn describe(instrument: &Instrument, code: &str) -> Result<DimensionDescription, ProfileErrors> {
    let dim = instrument
        .dimension(code)
        .ok_or_else(|| ProfileErrors::UnknownDimension {
            label: code.to_string(),
        })?;
    Ok(DimensionDescription {
        code: dim.code.clone(),
        name: dim.name.clone(),
        description: dim.description.clone(),
    })
}

/// Ranks the dimensions and describes the first `k` of them.
pub fn build_profile(
    score: &DimensionScore,
    instrument: &Instrument,
    k: usize,
) -> Result<Profile, ProfileErrors> {
    let ranked = rank(score, instrument)?;
    let mut top: Vec<(DimensionDescription, u64)> = Vec::new();
    for (code, s) in top_k(&ranked, k) {
        top.push((describe(instrument, &code)?, s));
    }
    info!("Profile for {}", instrument.name);
    for (idx, (code, s)) in ranked.iter().enumerate() {
        info!("{:>3} {:>6} {}", idx + 1, s, code);
    }
    Ok(Profile {
        instrument: instrument.name.clone(),
        ranked,
        top,
    })
}
