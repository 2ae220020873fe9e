//! The reference data of the built-in instruments.

use crate::config::*;

const RIASEC_LABELS: [&str; 5] = ["Not at all", "Slightly", "Moderately", "Very Much", "Extremely"];

const TCI_LABELS: [&str; 5] = [
    "Strongly Disagree",
    "Disagree",
    "Neutral",
    "Agree",
    "Strongly Agree",
];

/// The Holland interest inventory (6 dimensions), answered on a 1-5 scale
/// of enjoyment.
pub fn riasec() -> Instrument {
    Instrument {
        name: "RIASEC".to_string(),
        dimensions: vec![
            Dimension::new("R", "Realistic", "Practical, Hands-on"),
            Dimension::new("I", "Investigative", "Analytical, Curious"),
            Dimension::new("A", "Artistic", "Creative, Imaginative"),
            Dimension::new("S", "Social", "Helping, Cooperative"),
            Dimension::new("E", "Enterprising", "Leadership, Influencing"),
            Dimension::new("C", "Conventional", "Organized, Detail-oriented"),
        ],
        scale: LikertScale::new(1, 5).with_labels(&RIASEC_LABELS),
    }
}

/// The Temperament and Character Inventory (7 dimensions), answered on a
/// 1-5 agreement scale.
pub fn tci() -> Instrument {
    Instrument {
        name: "TCI".to_string(),
        dimensions: vec![
            Dimension::new(
                "NS",
                "Novelty Seeking",
                "High novelty seekers are curious, impulsive, and always ready for new adventures.",
            ),
            Dimension::new(
                "HA",
                "Harm Avoidance",
                "High harm avoidance individuals are cautious, careful, and easily stressed.",
            ),
            Dimension::new(
                "RD",
                "Reward Dependence",
                "Reward dependent people are warm, loving, and sensitive to social approval.",
            ),
            Dimension::new(
                "P",
                "Persistence",
                "Persistent individuals are determined, hard-working, and goal-oriented.",
            ),
            Dimension::new(
                "SD",
                "Self-Directedness",
                "Self-directed individuals are responsible, purposeful, and motivated.",
            ),
            Dimension::new(
                "C",
                "Cooperativeness",
                "Cooperative individuals are empathetic, kind, and supportive.",
            ),
            Dimension::new(
                "ST",
                "Self-Transcendence",
                "Self-transcendent people are spiritual, imaginative, and intuitive.",
            ),
        ],
        scale: LikertScale::new(1, 5).with_labels(&TCI_LABELS),
    }
}

/// Finds a built-in instrument by name (case-insensitive).
pub fn by_name(name: &str) -> Option<Instrument> {
    match name.trim().to_lowercase().as_str() {
        "riasec" => Some(riasec()),
        "tci" => Some(tci()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_sizes() {
        assert_eq!(riasec().dimensions.len(), 6);
        assert_eq!(tci().dimensions.len(), 7);
        assert_eq!(riasec().scale.label(5), Some("Extremely"));
        assert_eq!(tci().scale.label(0), None);
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(by_name(" TCI "), Some(tci()));
        assert_eq!(by_name("Riasec"), Some(riasec()));
        assert_eq!(by_name("mbti"), None);
    }

    #[test]
    fn meanings_override() {
        let inst = riasec()
            .with_meanings(&[("A".to_string(), "Makes things".to_string())])
            .unwrap();
        assert_eq!(inst.dimension("A").unwrap().description, "Makes things");
        let err = riasec()
            .with_meanings(&[("Z".to_string(), "?".to_string())])
            .unwrap_err();
        assert_eq!(
            err,
            ProfileErrors::UnknownDimension {
                label: "Z".to_string()
            }
        );
    }
}
