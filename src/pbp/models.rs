use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::AnalysisError;

/// Kind of play as labelled by the play-by-play provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayType {
    Punt,
    FieldGoal,
    Run,
    Pass,
    /// Kickoffs, extra points, kneels, penalties without a snap, ...
    Other(String),
}

impl PlayType {
    pub fn parse(s: &str) -> PlayType {
        match s.trim().to_lowercase().as_str() {
            "punt" => PlayType::Punt,
            "field_goal" => PlayType::FieldGoal,
            "run" => PlayType::Run,
            "pass" => PlayType::Pass,
            other => PlayType::Other(other.to_string()),
        }
    }

    /// Run or pass: the team tried to gain the yardage.
    pub fn is_scrimmage_attempt(&self) -> bool {
        matches!(self, PlayType::Run | PlayType::Pass)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldGoalResult {
    Made,
    Missed,
    Blocked,
}

impl FieldGoalResult {
    pub fn parse(s: &str) -> Option<FieldGoalResult> {
        match s.trim().to_lowercase().as_str() {
            "made" => Some(FieldGoalResult::Made),
            "missed" => Some(FieldGoalResult::Missed),
            "blocked" => Some(FieldGoalResult::Blocked),
            _ => None,
        }
    }
}

/// One row of historical play-by-play data.
///
/// Every field except `game_id` is nullable in the source feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Play {
    pub game_id: String,
    pub play_type: Option<PlayType>,
    /// Possession team
    pub posteam: Option<String>,
    pub home_team: Option<String>,
    /// Distance from the opponent's goal line (possession team's view)
    pub yardline_100: Option<i32>,
    /// Countdown clock within the current half
    pub half_seconds_remaining: Option<i32>,
    pub down: Option<u8>,
    pub ydstogo: Option<u32>,
    /// Possession team score minus opponent score at the snap
    pub score_differential: Option<i32>,
    pub epa: Option<f64>,
    /// Pre-play win probability of the possession team
    pub wp: Option<f64>,
    pub wpa: Option<f64>,
    pub fourth_down_converted: Option<bool>,
    pub third_down_converted: Option<bool>,
    pub kick_distance: Option<i32>,
    pub field_goal_result: Option<FieldGoalResult>,
    pub total_home_score: Option<i32>,
    pub total_away_score: Option<i32>,
}

impl Play {
    pub fn is_type(&self, play_type: &PlayType) -> bool {
        self.play_type.as_ref() == Some(play_type)
    }

    /// Win probability after the play resolves (`wp + wpa`).
    pub fn post_play_wp(&self) -> Option<f64> {
        Some(self.wp? + self.wpa?)
    }

    /// Whether the down was converted. Only defined on third and fourth down.
    pub fn down_converted(&self) -> Option<bool> {
        match self.down? {
            3 => self.third_down_converted,
            4 => self.fourth_down_converted,
            _ => None,
        }
    }
}

/// An immutable season of plays together with the columns the source supplied.
#[derive(Debug, Clone, Default)]
pub struct PlayTable {
    pub season: u16,
    columns: BTreeSet<String>,
    plays: Vec<Play>,
}

impl PlayTable {
    pub fn new<I, S>(season: u16, columns: I, plays: Vec<Play>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PlayTable {
            season,
            columns: columns.into_iter().map(Into::into).collect(),
            plays,
        }
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    /// Fail with a schema-drift error naming every missing column.
    pub fn require(&self, required: &[&str], analysis: &'static str) -> Result<(), AnalysisError> {
        let mut missing: Vec<String> = required
            .iter()
            .filter(|c| !self.columns.contains(**c))
            .map(|c| c.to_string())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        missing.dedup();
        Err(AnalysisError::SchemaDrift { analysis, missing })
    }
}
