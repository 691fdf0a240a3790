pub mod csv_table;
pub mod models;
pub mod nflverse;
pub mod provider;

pub use models::{FieldGoalResult, Play, PlayTable, PlayType};
pub use nflverse::{CsvFileSource, NflverseSource};
pub use provider::PlayByPlaySource;

use crate::error::SourceError;

/// Seasons the analyzer is validated against, newest first.
pub const SUPPORTED_SEASONS: &[u16] = &[2025, 2024, 2023];

pub fn ensure_supported_season(season: u16) -> Result<(), SourceError> {
    if SUPPORTED_SEASONS.contains(&season) {
        Ok(())
    } else {
        Err(SourceError::UnsupportedSeason {
            season,
            supported: SUPPORTED_SEASONS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_seasons_are_accepted() {
        for season in SUPPORTED_SEASONS {
            assert!(ensure_supported_season(*season).is_ok());
        }
        assert!(ensure_supported_season(2019).is_err());
    }
}
