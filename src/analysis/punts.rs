use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use super::buckets::{DistanceBracket, DistanceBucket};
use super::rules::{is_banned_punt, punt_verdict, PuntVerdict, MIDFIELD_YARDLINE};
use super::situation::Situation;
use super::stats::{mean, median, pct, sample_std};
use super::AnalysisOptions;
use crate::error::AnalysisError;
use crate::pbp::{Play, PlayTable, PlayType};

/// Columns the punt breakdown reads.
pub const PUNT_COLUMNS: &[&str] = &[
    "play_type",
    "yardline_100",
    "half_seconds_remaining",
    "posteam",
    "ydstogo",
    "score_differential",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PuntSummary {
    pub total_punts: usize,
    /// Punts with `yardline_100 < 50`
    pub opp_territory: usize,
    pub exempt: usize,
    pub banned: usize,
    /// Banned punts as a percentage of all punts
    pub pct_banned: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamPuntRow {
    pub team: String,
    pub total_punts: usize,
    pub banned_punts: usize,
    /// Percentage of this team's punts
    pub pct_banned: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SituationRow {
    pub situation: Situation,
    pub count: usize,
    /// Percentage of banned punts with a known score differential
    pub pct_of_known: f64,
    pub avg_ydstogo: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketCountRow {
    pub bucket: DistanceBucket,
    pub count: usize,
    /// Percentage of banned punts with known yards to go
    pub pct_of_known: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracketRow {
    pub bracket: DistanceBracket,
    pub count: usize,
    /// Percentage of banned punts with known yards to go
    pub pct_of_known: f64,
}

/// Yards to go on banned punts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceSummary {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PuntReport {
    pub summary: PuntSummary,
    /// Sorted by banned punts (desc), then team
    pub by_team: Vec<TeamPuntRow>,
    /// Every situation, in `Situation::ALL` order
    pub by_situation: Vec<SituationRow>,
    /// Banned punts without a score differential; in no situation row
    pub unknown_situation: usize,
    /// Every bucket, in `DistanceBucket::ALL` order
    pub by_bucket: Vec<BucketCountRow>,
    pub by_bracket: Vec<BracketRow>,
    /// Banned punts without yards to go; in no bucket or bracket row
    pub unknown_ydstogo: usize,
    pub ydstogo: DistanceSummary,
}

impl PuntReport {
    /// Display filter for the team table. Does not touch any statistic.
    pub fn teams_with_min_punts(&self, min_punts: usize) -> Vec<&TeamPuntRow> {
        self.by_team
            .iter()
            .filter(|row| row.total_punts >= min_punts)
            .collect()
    }
}

/// Punts the rule would ban.
pub fn banned_punts(plays: &[Play], apply_two_minute_exemption: bool) -> Vec<&Play> {
    plays
        .iter()
        .filter(|p| is_banned_punt(p, apply_two_minute_exemption))
        .collect()
}

pub fn analyze_punts(
    table: &PlayTable,
    options: &AnalysisOptions,
) -> Result<PuntReport, AnalysisError> {
    table.require(PUNT_COLUMNS, "punts")?;

    let punts: Vec<&Play> = table
        .plays()
        .iter()
        .filter(|p| p.is_type(&PlayType::Punt))
        .collect();

    let mut opp_territory = 0usize;
    let mut exempt = 0usize;
    let mut banned: Vec<&Play> = Vec::new();
    // team -> (total punts, banned punts)
    let mut teams: BTreeMap<&str, (usize, usize)> = BTreeMap::new();

    for &punt in &punts {
        if punt.yardline_100.is_some_and(|y| y < MIDFIELD_YARDLINE) {
            opp_territory += 1;
        }
        let verdict = punt_verdict(punt, options.apply_two_minute_exemption);
        let is_banned = verdict == Some(PuntVerdict::Banned);
        match verdict {
            Some(PuntVerdict::Exempt) => exempt += 1,
            Some(PuntVerdict::Banned) => banned.push(punt),
            _ => {}
        }
        if let Some(team) = punt.posteam.as_deref() {
            let entry = teams.entry(team).or_default();
            entry.0 += 1;
            if is_banned {
                entry.1 += 1;
            }
        }
    }

    let n_banned = banned.len();
    debug!(
        "Punts: {} total, {} in opponent territory, {} exempt, {} banned",
        punts.len(),
        opp_territory,
        exempt,
        n_banned
    );

    let summary = PuntSummary {
        total_punts: punts.len(),
        opp_territory,
        exempt,
        banned: n_banned,
        pct_banned: pct(n_banned, punts.len()),
    };

    let mut by_team: Vec<TeamPuntRow> = teams
        .into_iter()
        .map(|(team, (total, banned))| TeamPuntRow {
            team: team.to_string(),
            total_punts: total,
            banned_punts: banned,
            pct_banned: pct(banned, total),
        })
        .collect();
    // BTreeMap order already breaks ties by team; the sort is stable.
    by_team.sort_by(|a, b| b.banned_punts.cmp(&a.banned_punts));

    let situations: Vec<(Situation, &Play)> = banned
        .iter()
        .filter_map(|p| {
            p.score_differential
                .map(|d| (Situation::from_differential(d, options.one_score_margin), *p))
        })
        .collect();
    let unknown_situation = n_banned - situations.len();

    let by_situation = Situation::ALL
        .iter()
        .map(|situation| {
            let in_situation: Vec<&Play> = situations
                .iter()
                .filter(|(s, _)| s == situation)
                .map(|(_, p)| *p)
                .collect();
            let count = in_situation.len();
            SituationRow {
                situation: *situation,
                count,
                pct_of_known: pct(count, situations.len()),
                avg_ydstogo: mean(in_situation.iter().filter_map(|p| p.ydstogo.map(f64::from))),
            }
        })
        .collect();

    let banned_yards: Vec<u32> = banned.iter().filter_map(|p| p.ydstogo).collect();
    let unknown_ydstogo = n_banned - banned_yards.len();

    let by_bucket = DistanceBucket::ALL
        .iter()
        .map(|bucket| {
            let count = banned_yards.iter().filter(|y| bucket.contains(**y)).count();
            BucketCountRow {
                bucket: *bucket,
                count,
                pct_of_known: pct(count, banned_yards.len()),
            }
        })
        .collect();

    let by_bracket = DistanceBracket::ALL
        .iter()
        .map(|bracket| {
            let count = banned_yards
                .iter()
                .filter(|y| DistanceBracket::from_yards(**y) == *bracket)
                .count();
            BracketRow {
                bracket: *bracket,
                count,
                pct_of_known: pct(count, banned_yards.len()),
            }
        })
        .collect();

    let yards_f: Vec<f64> = banned_yards.iter().map(|y| f64::from(*y)).collect();
    let ydstogo = DistanceSummary {
        mean: mean(yards_f.iter().copied()),
        median: median(&yards_f),
        std_dev: sample_std(&yards_f),
    };

    Ok(PuntReport {
        summary,
        by_team,
        by_situation,
        unknown_situation,
        by_bucket,
        by_bracket,
        unknown_ydstogo,
        ydstogo,
    })
}
