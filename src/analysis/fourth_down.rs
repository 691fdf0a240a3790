//! What banned punts would have been worth as 4th-down attempts.

use serde::Serialize;
use tracing::{debug, warn};

use super::counterfactual::{CounterfactualModel, SwingTable, ValueMetric};
use super::punts::banned_punts;
use super::rules::is_fourth_down_attempt;
use super::stats::pct;
use super::AnalysisOptions;
use crate::error::AnalysisError;
use crate::pbp::{Play, PlayTable};

/// Columns both populations need regardless of the value metric.
pub const FOURTH_DOWN_COLUMNS: &[&str] = &[
    "play_type",
    "down",
    "ydstogo",
    "fourth_down_converted",
    "yardline_100",
    "half_seconds_remaining",
];

pub const EPA_COLUMNS: &[&str] = &["epa"];
pub const WP_COLUMNS: &[&str] = &["wp", "wpa"];
pub const LEADING_COLUMNS: &[&str] = &["wp", "wpa", "score_differential"];

/// EPA swing table plus the unmodeled comparison of the two populations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpaSwing {
    pub avg_banned_punt_epa: Option<f64>,
    /// Every 4th-down run/pass, converted or not
    pub avg_go_for_it_epa: Option<f64>,
    /// `avg_go_for_it_epa - avg_banned_punt_epa`
    pub raw_swing: Option<f64>,
    pub table: SwingTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WpSwing {
    /// Pre-snap win probability of the punting team
    pub avg_wp_before_punt: Option<f64>,
    pub table: SwingTable,
}

/// WP swing for banned punts taken while the possession team was ahead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadingSwing {
    pub banned_leading: usize,
    /// Leading banned punts as a percentage of all banned punts
    pub share_of_banned: f64,
    pub avg_wp_before_punt: Option<f64>,
    pub table: SwingTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FourthDownReport {
    pub go_for_it_plays: usize,
    pub banned_punts: usize,
    pub epa: Result<EpaSwing, AnalysisError>,
    pub wp: Result<WpSwing, AnalysisError>,
    pub leading: Result<LeadingSwing, AnalysisError>,
}

pub fn analyze_fourth_down(
    table: &PlayTable,
    options: &AnalysisOptions,
) -> Result<FourthDownReport, AnalysisError> {
    table.require(FOURTH_DOWN_COLUMNS, "fourth_down")?;

    let go_for_it: Vec<&Play> = table
        .plays()
        .iter()
        .filter(|p| is_fourth_down_attempt(p))
        .collect();
    let banned = banned_punts(table.plays(), options.apply_two_minute_exemption);
    let go_for_it_plays = go_for_it.len();
    debug!(
        "Fourth down: {} go-for-it plays, {} banned punts",
        go_for_it_plays,
        banned.len()
    );
    let model = CounterfactualModel::new(go_for_it, banned);

    let epa = table.require(EPA_COLUMNS, "epa_swing").map(|()| {
        let avg_banned_punt_epa = model.affected_mean(|p| p.epa);
        let avg_go_for_it_epa = model.go_for_it_mean(|p| p.epa);
        EpaSwing {
            avg_banned_punt_epa,
            avg_go_for_it_epa,
            raw_swing: avg_go_for_it_epa.zip(avg_banned_punt_epa).map(|(go, punt)| go - punt),
            table: model.table(ValueMetric::Epa),
        }
    });
    let wp = table.require(WP_COLUMNS, "wp_swing").map(|()| WpSwing {
        avg_wp_before_punt: model.affected_mean(|p| p.wp),
        table: model.table(ValueMetric::PostPlayWp),
    });
    let leading = table.require(LEADING_COLUMNS, "wp_swing_leading").map(|()| {
        let leading = model.restrict(|p| p.score_differential.is_some_and(|d| d > 0));
        LeadingSwing {
            banned_leading: leading.affected_count(),
            share_of_banned: pct(leading.affected_count(), model.affected_count()),
            avg_wp_before_punt: leading.affected_mean(|p| p.wp),
            table: leading.table(ValueMetric::PostPlayWp),
        }
    });

    for section in [epa.as_ref().err(), wp.as_ref().err(), leading.as_ref().err()]
        .into_iter()
        .flatten()
    {
        warn!("Skipping swing table: {}", section);
    }

    Ok(FourthDownReport {
        go_for_it_plays,
        banned_punts: model.affected_count(),
        epa,
        wp,
        leading,
    })
}
