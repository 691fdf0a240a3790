//! Predicates for the two hypothetical UFL rules.
//!
//! - **No punting past midfield**: a punt from the opponent's side of the
//!   field (`yardline_100 < 50`) is illegal, except inside the final two
//!   minutes of either half.
//! - **Four-point long field goal**: a made field goal of 60+ yards is worth
//!   4 points instead of 3.

use serde::Serialize;

use crate::pbp::{FieldGoalResult, Play, PlayType};

/// Punts from inside this yardline (distance to the opponent's goal) are
/// in opponent territory.
pub const MIDFIELD_YARDLINE: i32 = 50;
/// `half_seconds_remaining` at or below this value is inside the two-minute
/// window of a half.
pub const TWO_MINUTE_WINDOW_SECS: i32 = 120;
/// Minimum kick distance for the bonus point.
pub const LONG_FIELD_GOAL_YARDS: i32 = 60;
/// Extra points per made long field goal (3 → 4).
pub const LONG_FIELD_GOAL_BONUS: u32 = 1;

/// Exactly one verdict per punt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PuntVerdict {
    /// Not in opponent territory; the rule does not apply.
    NotApplicable,
    /// In opponent territory but allowed by the two-minute exemption.
    Exempt,
    /// Illegal under the rule.
    Banned,
}

/// Classify a play under the punt rule. Returns `None` for non-punts.
///
/// A punt with unknown field position is not applicable. With the exemption
/// enabled, an opponent-territory punt with an unknown clock cannot be placed
/// in or out of the window and is also not applicable.
pub fn punt_verdict(play: &Play, apply_two_minute_exemption: bool) -> Option<PuntVerdict> {
    if !play.is_type(&PlayType::Punt) {
        return None;
    }
    let verdict = match play.yardline_100 {
        Some(yardline) if yardline < MIDFIELD_YARDLINE => {
            if !apply_two_minute_exemption {
                PuntVerdict::Banned
            } else {
                match play.half_seconds_remaining {
                    Some(secs) if secs <= TWO_MINUTE_WINDOW_SECS => PuntVerdict::Exempt,
                    Some(_) => PuntVerdict::Banned,
                    None => PuntVerdict::NotApplicable,
                }
            }
        }
        _ => PuntVerdict::NotApplicable,
    };
    Some(verdict)
}

pub fn is_banned_punt(play: &Play, apply_two_minute_exemption: bool) -> bool {
    punt_verdict(play, apply_two_minute_exemption) == Some(PuntVerdict::Banned)
}

/// Outcome of a field goal under the long-kick rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LongFieldGoal {
    pub made: bool,
    /// Points added by the rule: `LONG_FIELD_GOAL_BONUS` for a make, else 0.
    pub bonus_points: u32,
}

/// Returns `Some` for field goals of `LONG_FIELD_GOAL_YARDS` or more.
pub fn long_field_goal(play: &Play) -> Option<LongFieldGoal> {
    if !play.is_type(&PlayType::FieldGoal) {
        return None;
    }
    let distance = play.kick_distance?;
    if distance < LONG_FIELD_GOAL_YARDS {
        return None;
    }
    let made = play.field_goal_result == Some(FieldGoalResult::Made);
    Some(LongFieldGoal {
        made,
        bonus_points: if made { LONG_FIELD_GOAL_BONUS } else { 0 },
    })
}

/// 4th-down run or pass: the population teams "go for it" from.
pub fn is_fourth_down_attempt(play: &Play) -> bool {
    play.down == Some(4)
        && play
            .play_type
            .as_ref()
            .is_some_and(PlayType::is_scrimmage_attempt)
}
