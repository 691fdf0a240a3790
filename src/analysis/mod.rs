pub mod buckets;
pub mod counterfactual;
pub mod field_goals;
pub mod fourth_down;
pub mod punts;
pub mod rules;
pub mod situation;
pub mod stats;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::AnalysisError;
use crate::pbp::PlayTable;
use field_goals::{analyze_field_goals, FieldGoalReport};
use fourth_down::{analyze_fourth_down, FourthDownReport};
use punts::{analyze_punts, PuntReport};
use situation::DEFAULT_ONE_SCORE_MARGIN;

/// Knobs that change computed statistics. Display-only filters such as
/// `min_punts` do not belong here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AnalysisOptions {
    pub apply_two_minute_exemption: bool,
    pub one_score_margin: i32,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            apply_two_minute_exemption: true,
            one_score_margin: DEFAULT_ONE_SCORE_MARGIN,
        }
    }
}

/// Everything computed for one season. Each section fails independently.
#[derive(Debug, Clone, Serialize)]
pub struct RuleImpactReport {
    pub season: u16,
    pub options: AnalysisOptions,
    pub plays: usize,
    pub generated_at: DateTime<Utc>,
    pub punts: Result<PuntReport, AnalysisError>,
    pub field_goals: Result<FieldGoalReport, AnalysisError>,
    pub fourth_down: Result<FourthDownReport, AnalysisError>,
}

pub fn analyze(table: &PlayTable, options: &AnalysisOptions) -> RuleImpactReport {
    info!(
        "Analyzing {} plays for season {} (two-minute exemption: {})",
        table.len(),
        table.season,
        options.apply_two_minute_exemption
    );

    if table.is_empty() {
        warn!("Season {} has no regular-season plays", table.season);
    }

    let punts = analyze_punts(table, options);
    let field_goals = analyze_field_goals(table);
    let fourth_down = analyze_fourth_down(table, options);

    for err in [
        punts.as_ref().err(),
        field_goals.as_ref().err(),
        fourth_down.as_ref().err(),
    ]
    .into_iter()
    .flatten()
    {
        warn!("Section skipped: {}", err);
    }

    RuleImpactReport {
        season: table.season,
        options: *options,
        plays: table.len(),
        generated_at: Utc::now(),
        punts,
        field_goals,
        fourth_down,
    }
}
