use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use super::rules::{long_field_goal, LongFieldGoal};
use super::stats::pct;
use crate::error::AnalysisError;
use crate::pbp::{Play, PlayTable, PlayType};

pub const FIELD_GOAL_COLUMNS: &[&str] =
    &["play_type", "kick_distance", "field_goal_result", "posteam"];

pub const CLOSE_LOSS_COLUMNS: &[&str] = &[
    "game_id",
    "posteam",
    "home_team",
    "total_home_score",
    "total_away_score",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldGoalSummary {
    /// Every field goal attempt, any distance
    pub total_attempts: usize,
    pub long_attempts: usize,
    pub long_made: usize,
    /// Long makes as a percentage of long attempts
    pub make_pct: f64,
    pub extra_points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamFieldGoalRow {
    pub team: String,
    pub attempts: usize,
    pub made: usize,
    pub make_pct: f64,
    pub extra_points: u32,
}

/// A made long field goal in a game the kicking team lost by exactly one
/// point. The bonus point would have tied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloseLoss {
    pub game_id: String,
    pub team: String,
    pub kick_distance: i32,
    pub team_score: i32,
    pub opponent_score: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldGoalReport {
    pub summary: FieldGoalSummary,
    /// Long field goals only; sorted by extra points (desc), then team
    pub by_team: Vec<TeamFieldGoalRow>,
    /// Fails on its own when the score columns are missing
    pub close_losses: Result<Vec<CloseLoss>, AnalysisError>,
}

pub fn analyze_field_goals(table: &PlayTable) -> Result<FieldGoalReport, AnalysisError> {
    table.require(FIELD_GOAL_COLUMNS, "field_goals")?;

    let mut total_attempts = 0usize;
    let mut long_kicks: Vec<(&Play, LongFieldGoal)> = Vec::new();
    for play in table.plays() {
        if !play.is_type(&PlayType::FieldGoal) {
            continue;
        }
        total_attempts += 1;
        if let Some(kick) = long_field_goal(play) {
            long_kicks.push((play, kick));
        }
    }

    let long_made = long_kicks.iter().filter(|(_, k)| k.made).count();
    let extra_points: u32 = long_kicks.iter().map(|(_, k)| k.bonus_points).sum();
    debug!(
        "Field goals: {} attempts, {} from 60+, {} made",
        total_attempts,
        long_kicks.len(),
        long_made
    );

    let summary = FieldGoalSummary {
        total_attempts,
        long_attempts: long_kicks.len(),
        long_made,
        make_pct: pct(long_made, long_kicks.len()),
        extra_points,
    };

    // team -> (attempts, made, extra points)
    let mut teams: BTreeMap<&str, (usize, usize, u32)> = BTreeMap::new();
    for (play, kick) in &long_kicks {
        let Some(team) = play.posteam.as_deref() else {
            continue;
        };
        let entry = teams.entry(team).or_default();
        entry.0 += 1;
        if kick.made {
            entry.1 += 1;
        }
        entry.2 += kick.bonus_points;
    }
    let mut by_team: Vec<TeamFieldGoalRow> = teams
        .into_iter()
        .map(|(team, (attempts, made, extra_points))| TeamFieldGoalRow {
            team: team.to_string(),
            attempts,
            made,
            make_pct: pct(made, attempts),
            extra_points,
        })
        .collect();
    by_team.sort_by(|a, b| b.extra_points.cmp(&a.extra_points));

    let close_losses = close_losses(table, &long_kicks);
    if let Err(e) = &close_losses {
        warn!("Skipping lost-by-one check: {}", e);
    }

    Ok(FieldGoalReport {
        summary,
        by_team,
        close_losses,
    })
}

/// Final score of every game, taken as the maximum running score seen.
pub fn final_scores(plays: &[Play]) -> HashMap<&str, (i32, i32)> {
    let mut finals: HashMap<&str, (i32, i32)> = HashMap::new();
    for play in plays {
        let (Some(home), Some(away)) = (play.total_home_score, play.total_away_score) else {
            continue;
        };
        let entry = finals.entry(play.game_id.as_str()).or_insert((home, away));
        entry.0 = entry.0.max(home);
        entry.1 = entry.1.max(away);
    }
    finals
}

fn close_losses(
    table: &PlayTable,
    long_kicks: &[(&Play, LongFieldGoal)],
) -> Result<Vec<CloseLoss>, AnalysisError> {
    table.require(CLOSE_LOSS_COLUMNS, "close_losses")?;
    let finals = final_scores(table.plays());

    let mut losses = Vec::new();
    for (play, kick) in long_kicks {
        if !kick.made {
            continue;
        }
        let (Some(team), Some(home_team), Some(distance)) = (
            play.posteam.as_deref(),
            play.home_team.as_deref(),
            play.kick_distance,
        ) else {
            continue;
        };
        let Some(&(home, away)) = finals.get(play.game_id.as_str()) else {
            continue;
        };
        let (team_score, opponent_score) = if team == home_team {
            (home, away)
        } else {
            (away, home)
        };
        if team_score - opponent_score == -1 {
            losses.push(CloseLoss {
                game_id: play.game_id.clone(),
                team: team.to_string(),
                kick_distance: distance,
                team_score,
                opponent_score,
            });
        }
    }
    Ok(losses)
}
