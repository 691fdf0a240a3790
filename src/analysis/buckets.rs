//! Yards-to-go groupings shared by the counterfactual model and the reports.
use serde::Serialize;

/// Five ordered, right-inclusive yards-to-go buckets covering `[0, ∞)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DistanceBucket {
    #[serde(rename = "0–1")]
    UpToOne,
    #[serde(rename = "2–3")]
    TwoToThree,
    #[serde(rename = "4–5")]
    FourToFive,
    #[serde(rename = "6–10")]
    SixToTen,
    #[serde(rename = "11+")]
    ElevenPlus,
}

impl DistanceBucket {
    /// Display and iteration order.
    pub const ALL: [DistanceBucket; 5] = [
        DistanceBucket::UpToOne,
        DistanceBucket::TwoToThree,
        DistanceBucket::FourToFive,
        DistanceBucket::SixToTen,
        DistanceBucket::ElevenPlus,
    ];

    pub fn from_yards(ydstogo: u32) -> DistanceBucket {
        match ydstogo {
            0..=1 => DistanceBucket::UpToOne,
            2..=3 => DistanceBucket::TwoToThree,
            4..=5 => DistanceBucket::FourToFive,
            6..=10 => DistanceBucket::SixToTen,
            _ => DistanceBucket::ElevenPlus,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DistanceBucket::UpToOne => "0–1",
            DistanceBucket::TwoToThree => "2–3",
            DistanceBucket::FourToFive => "4–5",
            DistanceBucket::SixToTen => "6–10",
            DistanceBucket::ElevenPlus => "11+",
        }
    }

    pub fn contains(self, ydstogo: u32) -> bool {
        DistanceBucket::from_yards(ydstogo) == self
    }
}

/// Coarse short / medium / long split used in the banned-punt breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceBracket {
    /// 4th-and-2 or less
    Short,
    /// 4th-and-3 to 5
    Medium,
    /// 4th-and-6 or more
    Long,
}

impl DistanceBracket {
    pub const ALL: [DistanceBracket; 3] = [
        DistanceBracket::Short,
        DistanceBracket::Medium,
        DistanceBracket::Long,
    ];

    pub fn from_yards(ydstogo: u32) -> DistanceBracket {
        match ydstogo {
            0..=2 => DistanceBracket::Short,
            3..=5 => DistanceBracket::Medium,
            _ => DistanceBracket::Long,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DistanceBracket::Short => "4th-and-2 or less",
            DistanceBracket::Medium => "4th-and-3 to 5",
            DistanceBracket::Long => "4th-and-6 or more",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_distance_lands_in_exactly_one_bucket() {
        for yards in 0..=120u32 {
            let hits = DistanceBucket::ALL
                .iter()
                .filter(|b| b.contains(yards))
                .count();
            assert_eq!(hits, 1, "ydstogo {yards} matched {hits} buckets");
        }
        assert_eq!(DistanceBucket::from_yards(u32::MAX), DistanceBucket::ElevenPlus);
    }

    #[test]
    fn test_bucket_boundaries_are_right_inclusive() {
        assert_eq!(DistanceBucket::from_yards(0), DistanceBucket::UpToOne);
        assert_eq!(DistanceBucket::from_yards(1), DistanceBucket::UpToOne);
        assert_eq!(DistanceBucket::from_yards(2), DistanceBucket::TwoToThree);
        assert_eq!(DistanceBucket::from_yards(3), DistanceBucket::TwoToThree);
        assert_eq!(DistanceBucket::from_yards(5), DistanceBucket::FourToFive);
        assert_eq!(DistanceBucket::from_yards(6), DistanceBucket::SixToTen);
        assert_eq!(DistanceBucket::from_yards(10), DistanceBucket::SixToTen);
        assert_eq!(DistanceBucket::from_yards(11), DistanceBucket::ElevenPlus);
    }

    #[test]
    fn test_buckets_are_ordered_like_their_ranges() {
        let mut sorted = DistanceBucket::ALL;
        sorted.sort();
        assert_eq!(sorted, DistanceBucket::ALL);
        let labels: Vec<_> = DistanceBucket::ALL.iter().map(|b| b.label()).collect();
        assert_eq!(labels, ["0–1", "2–3", "4–5", "6–10", "11+"]);
    }

    #[test]
    fn test_brackets_split_at_two_and_five() {
        assert_eq!(DistanceBracket::from_yards(2), DistanceBracket::Short);
        assert_eq!(DistanceBracket::from_yards(3), DistanceBracket::Medium);
        assert_eq!(DistanceBracket::from_yards(5), DistanceBracket::Medium);
        assert_eq!(DistanceBracket::from_yards(6), DistanceBracket::Long);
    }

    #[test]
    fn test_bucket_serializes_as_label() {
        let json = serde_json::to_string(&DistanceBucket::SixToTen).unwrap();
        assert_eq!(json, "\"6–10\"");
    }
}
