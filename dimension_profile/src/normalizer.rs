use log::{debug, warn};
use std::collections::{HashMap, HashSet};

use crate::config::*;

/// The outcome of resolving a dimension label.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum NormalizedLabel {
    /// The label was a code or a full name of the instrument.
    Canonical(String),
    /// The code was guessed from the first characters of the label. It is
    /// a member of the instrument, but the match has not been verified.
    Derived(String),
}

impl NormalizedLabel {
    pub fn code(&self) -> &str {
        match self {
            NormalizedLabel::Canonical(c) => c.as_str(),
            NormalizedLabel::Derived(c) => c.as_str(),
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, NormalizedLabel::Canonical(_))
    }
}

/// Maps textual labels (codes, full names, case variants) to the canonical
/// codes of one instrument.
pub struct Normalizer {
    codes: HashSet<String>,
    // Lowercased full name -> code
    names: HashMap<String, String>,
}

impl Normalizer {
    pub fn new(instrument: &Instrument) -> Normalizer {
        Normalizer {
            codes: instrument.dimensions.iter().map(|d| d.code.clone()).collect(),
            names: instrument
                .dimensions
                .iter()
                .map(|d| (d.name.to_lowercase(), d.code.clone()))
                .collect(),
        }
    }

    /// Resolves a raw label.
    ///
    /// Derived codes are only returned when the fallback allows it, and are
    /// logged since they may hide a mislabelled question.
    pub fn normalize(
        &self,
        raw: &str,
        fallback: LabelFallback,
    ) -> Result<NormalizedLabel, ProfileErrors> {
        let label = raw.trim();
        if self.codes.contains(label) {
            return Ok(NormalizedLabel::Canonical(label.to_string()));
        }
        if let Some(code) = self.names.get(&label.to_lowercase()) {
            debug!("normalize: {:?} -> {:?}", label, code);
            return Ok(NormalizedLabel::Canonical(code.clone()));
        }
        let unknown = || ProfileErrors::UnknownDimension {
            label: raw.to_string(),
        };
        if fallback == LabelFallback::Reject || label.is_empty() {
            return Err(unknown());
        }
        let derived: String = label.chars().take(2).collect::<String>().to_uppercase();
        if self.codes.contains(&derived) {
            warn!(
                "normalize: label {:?} is not a known dimension, using derived code {:?}",
                label, derived
            );
            Ok(NormalizedLabel::Derived(derived))
        } else {
            Err(unknown())
        }
    }
}
