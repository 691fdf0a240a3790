//! Counterfactual "go for it" model.
//!
//! For each yards-to-go bucket, estimate what the possession team would have
//! gained by attempting the conversion instead of taking the action it
//! actually took (a punt the rule would ban):
//!
//!   E[go]  = p · v_success + (1 − p) · v_fail
//!   swing  = E[go] − v_actual
//!
//! where
//!   p         = conversions / attempts over this season's 4th-down runs/passes
//!   v_success = mean value metric of the converted attempts
//!   v_fail    = mean value metric of the failed attempts
//!   v_actual  = mean value metric of the affected plays
//!
//! The value metric (EPA, or post-play win probability `wp + wpa`) already
//! prices in what happens next, so this is a one-step lookahead: no
//! subsequent possessions are simulated.
//!
//! A positive swing means going for it would have produced more value; a
//! negative swing means the historical decision was better.

use serde::Serialize;

use super::buckets::DistanceBucket;
use super::stats::mean;
use crate::pbp::Play;

/// Per-play value the model averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueMetric {
    /// Expected points added
    Epa,
    /// Win probability after the play (`wp + wpa`)
    PostPlayWp,
}

impl ValueMetric {
    pub fn value(self, play: &Play) -> Option<f64> {
        match self {
            ValueMetric::Epa => play.epa,
            ValueMetric::PostPlayWp => play.post_play_wp(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ValueMetric::Epa => "EPA",
            ValueMetric::PostPlayWp => "WP",
        }
    }
}

/// Expected value of going for it given a conversion rate and the mean
/// outcome of each branch.
pub fn expected_go_value(conv_rate: f64, value_if_converted: f64, value_if_failed: f64) -> f64 {
    debug_assert!((0.0..=1.0).contains(&conv_rate), "conv_rate out of range");
    conv_rate * value_if_converted + (1.0 - conv_rate) * value_if_failed
}

/// Like [`expected_go_value`] but with possibly undefined inputs. A branch
/// with zero weight may be undefined; anything else undefined yields `None`.
fn expected_from_parts(
    conv_rate: Option<f64>,
    value_if_converted: Option<f64>,
    value_if_failed: Option<f64>,
) -> Option<f64> {
    let p = conv_rate?;
    match (value_if_converted, value_if_failed) {
        (Some(s), Some(f)) => Some(expected_go_value(p, s, f)),
        (Some(s), None) if p >= 1.0 => Some(s),
        (None, Some(f)) if p <= 0.0 => Some(f),
        _ => None,
    }
}

/// Model output for one bucket (or for all distances when `bucket` is `None`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwingRow {
    pub bucket: Option<DistanceBucket>,
    /// Go-for-it plays with a known conversion outcome
    pub go_attempts: usize,
    pub conversions: usize,
    pub conv_rate: Option<f64>,
    pub value_if_converted: Option<f64>,
    pub value_if_failed: Option<f64>,
    pub expected_go: Option<f64>,
    /// Affected plays (e.g. banned punts) in the bucket
    pub affected_count: usize,
    pub avg_affected: Option<f64>,
    pub swing: Option<f64>,
}

/// One row per bucket in `DistanceBucket::ALL` order, plus an unbucketed row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwingTable {
    pub metric: ValueMetric,
    pub overall: SwingRow,
    pub buckets: Vec<SwingRow>,
}

/// The two populations the model compares: the go-for-it baseline and the
/// affected plays.
#[derive(Debug, Clone)]
pub struct CounterfactualModel<'a> {
    go_for_it: Vec<&'a Play>,
    affected: Vec<&'a Play>,
}

impl<'a> CounterfactualModel<'a> {
    pub fn new(go_for_it: Vec<&'a Play>, affected: Vec<&'a Play>) -> Self {
        CounterfactualModel {
            go_for_it,
            affected,
        }
    }

    /// Sub-population model: the same predicate filters both populations so
    /// the comparison stays like-for-like.
    pub fn restrict<F>(&self, predicate: F) -> CounterfactualModel<'a>
    where
        F: Fn(&Play) -> bool,
    {
        CounterfactualModel {
            go_for_it: self
                .go_for_it
                .iter()
                .copied()
                .filter(|p| predicate(*p))
                .collect(),
            affected: self
                .affected
                .iter()
                .copied()
                .filter(|p| predicate(*p))
                .collect(),
        }
    }

    pub fn affected_count(&self) -> usize {
        self.affected.len()
    }

    /// Raw mean of `value` over every go-for-it play, whether or not its
    /// conversion outcome is known.
    pub fn go_for_it_mean<F>(&self, value: F) -> Option<f64>
    where
        F: Fn(&Play) -> Option<f64>,
    {
        mean(self.go_for_it.iter().copied().filter_map(|p| value(p)))
    }

    /// Raw mean of `value` over the affected plays.
    pub fn affected_mean<F>(&self, value: F) -> Option<f64>
    where
        F: Fn(&Play) -> Option<f64>,
    {
        mean(self.affected.iter().copied().filter_map(|p| value(p)))
    }

    pub fn table(&self, metric: ValueMetric) -> SwingTable {
        SwingTable {
            metric,
            overall: self.row(metric, None),
            buckets: DistanceBucket::ALL
                .iter()
                .map(|b| self.row(metric, Some(*b)))
                .collect(),
        }
    }

    pub fn row(&self, metric: ValueMetric, bucket: Option<DistanceBucket>) -> SwingRow {
        let in_bucket = |play: &Play| match bucket {
            None => true,
            Some(b) => play.ydstogo.is_some_and(|y| b.contains(y)),
        };

        let mut converted = Vec::new();
        let mut failed = Vec::new();
        for play in self.go_for_it.iter().copied().filter(|p| in_bucket(*p)) {
            match play.down_converted() {
                Some(true) => converted.push(play),
                Some(false) => failed.push(play),
                None => {}
            }
        }
        let go_attempts = converted.len() + failed.len();
        let conv_rate = if go_attempts == 0 {
            None
        } else {
            Some(converted.len() as f64 / go_attempts as f64)
        };
        let value_if_converted = mean(converted.iter().filter_map(|p| metric.value(p)));
        let value_if_failed = mean(failed.iter().filter_map(|p| metric.value(p)));
        let expected_go = expected_from_parts(conv_rate, value_if_converted, value_if_failed);

        let affected: Vec<&Play> = self
            .affected
            .iter()
            .copied()
            .filter(|p| in_bucket(*p))
            .collect();
        let avg_affected = mean(affected.iter().filter_map(|p| metric.value(p)));

        let swing = match (expected_go, avg_affected) {
            (Some(go), Some(actual)) => Some(go - actual),
            _ => None,
        };

        SwingRow {
            bucket,
            go_attempts,
            conversions: converted.len(),
            conv_rate,
            value_if_converted,
            value_if_failed,
            expected_go,
            affected_count: affected.len(),
            avg_affected,
            swing,
        }
    }
}
