use serde::Serialize;

/// Default deficit still counted as "one score": a touchdown plus a
/// two-point conversion.
pub const DEFAULT_ONE_SCORE_MARGIN: i32 = 8;

/// Game situation of the possession team at the snap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Situation {
    Leading,
    Tied,
    #[serde(rename = "Trailing (1 score)")]
    TrailingOneScore,
    #[serde(rename = "Trailing (2+ scores)")]
    TrailingMultipleScores,
}

impl Situation {
    pub const ALL: [Situation; 4] = [
        Situation::Leading,
        Situation::Tied,
        Situation::TrailingOneScore,
        Situation::TrailingMultipleScores,
    ];

    /// Classify a score differential (possession team minus opponent).
    /// Deficits up to `one_score_margin` points count as one score.
    pub fn from_differential(diff: i32, one_score_margin: i32) -> Situation {
        if diff > 0 {
            Situation::Leading
        } else if diff == 0 {
            Situation::Tied
        } else if diff >= -one_score_margin {
            Situation::TrailingOneScore
        } else {
            Situation::TrailingMultipleScores
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Situation::Leading => "Leading",
            Situation::Tied => "Tied",
            Situation::TrailingOneScore => "Trailing (1 score)",
            Situation::TrailingMultipleScores => "Trailing (2+ scores)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_margin_boundaries() {
        let m = DEFAULT_ONE_SCORE_MARGIN;
        assert_eq!(Situation::from_differential(1, m), Situation::Leading);
        assert_eq!(Situation::from_differential(0, m), Situation::Tied);
        assert_eq!(Situation::from_differential(-1, m), Situation::TrailingOneScore);
        assert_eq!(Situation::from_differential(-8, m), Situation::TrailingOneScore);
        assert_eq!(
            Situation::from_differential(-9, m),
            Situation::TrailingMultipleScores
        );
    }

    #[test]
    fn test_margin_is_configurable() {
        assert_eq!(
            Situation::from_differential(-8, 7),
            Situation::TrailingMultipleScores
        );
        assert_eq!(Situation::from_differential(-7, 7), Situation::TrailingOneScore);
    }
}
