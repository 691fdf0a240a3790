//! Parsing of nflverse-style play-by-play CSV into a [`PlayTable`].
//!
//! The feed has ~370 columns; only the ones the rule analyses use are read.
//! Columns are looked up by header name so that missing columns surface as
//! schema drift at analysis time instead of as parse failures here.

use std::collections::HashMap;
use std::io::Read;
use tracing::{debug, info};

use super::models::{FieldGoalResult, Play, PlayTable, PlayType};
use crate::error::SourceError;

/// `season_type` value of regular-season games.
const REGULAR_SEASON: &str = "REG";

/// Parse a play-by-play CSV, keeping regular-season plays only.
///
/// `origin` is a URL or file path used in error messages.
pub fn parse_play_csv<R: Read>(
    season: u16,
    reader: R,
    origin: &str,
) -> Result<PlayTable, SourceError> {
    let csv_err = |source: csv::Error| SourceError::Csv {
        origin: origin.to_string(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let headers = rdr.headers().map_err(csv_err)?.clone();
    let index: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_string(), i))
        .collect();

    let mut plays = Vec::new();
    let mut skipped = 0usize;
    for record in rdr.records() {
        let record = record.map_err(csv_err)?;
        let row = Row {
            index: &index,
            record: &record,
        };
        if let Some(season_type) = row.text("season_type") {
            if season_type != REGULAR_SEASON {
                skipped += 1;
                continue;
            }
        }
        plays.push(row.to_play());
    }

    info!(
        "Parsed {} regular-season plays for {} from {} ({} non-regular-season rows skipped)",
        plays.len(),
        season,
        origin,
        skipped
    );
    debug!("{} columns present in {}", index.len(), origin);

    Ok(PlayTable::new(season, index.into_keys(), plays))
}

struct Row<'a> {
    index: &'a HashMap<String, usize>,
    record: &'a csv::StringRecord,
}

impl Row<'_> {
    /// Raw cell text; `None` for missing columns, empty cells and `NA`.
    fn text(&self, column: &str) -> Option<&str> {
        let i = *self.index.get(column)?;
        let cell = self.record.get(i)?.trim();
        if cell.is_empty() || cell.eq_ignore_ascii_case("na") || cell.eq_ignore_ascii_case("nan") {
            None
        } else {
            Some(cell)
        }
    }

    fn string(&self, column: &str) -> Option<String> {
        self.text(column).map(str::to_string)
    }

    fn float(&self, column: &str) -> Option<f64> {
        self.text(column)
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }

    /// Integer columns are often written as floats (`45.0`).
    fn int(&self, column: &str) -> Option<i32> {
        self.float(column).map(|v| v.round() as i32)
    }

    fn flag(&self, column: &str) -> Option<bool> {
        match self.text(column)? {
            "true" | "TRUE" | "True" => Some(true),
            "false" | "FALSE" | "False" => Some(false),
            s => s.parse::<f64>().ok().map(|v| v != 0.0),
        }
    }

    fn to_play(&self) -> Play {
        Play {
            game_id: self.string("game_id").unwrap_or_default(),
            play_type: self.text("play_type").map(PlayType::parse),
            posteam: self.string("posteam"),
            home_team: self.string("home_team"),
            yardline_100: self.int("yardline_100"),
            half_seconds_remaining: self.int("half_seconds_remaining"),
            down: self
                .int("down")
                .and_then(|d| u8::try_from(d).ok()),
            ydstogo: self
                .int("ydstogo")
                .and_then(|y| u32::try_from(y).ok()),
            score_differential: self.int("score_differential"),
            epa: self.float("epa"),
            wp: self.float("wp"),
            wpa: self.float("wpa"),
            fourth_down_converted: self.flag("fourth_down_converted"),
            third_down_converted: self.flag("third_down_converted"),
            kick_distance: self.int("kick_distance"),
            field_goal_result: self
                .text("field_goal_result")
                .and_then(FieldGoalResult::parse),
            total_home_score: self.int("total_home_score"),
            total_away_score: self.int("total_away_score"),
        }
    }
}
