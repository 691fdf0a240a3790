use serde::Serialize;
use thiserror::Error;

/// Failure loading the raw play-by-play feed. Fatal for the current run.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("season {season} is not supported (supported: {supported:?})")]
    UnsupportedSeason { season: u16, supported: &'static [u16] },

    #[error("play-by-play request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("play-by-play provider returned {status} for {url}")]
    Status { url: String, status: reqwest::StatusCode },

    #[error("failed to read play-by-play file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed play-by-play CSV ({origin}): {source}")]
    Csv {
        origin: String,
        #[source]
        source: csv::Error,
    },
}

/// Failure of a single report section. Other sections still run.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisError {
    #[error("schema change detected in play-by-play data ({analysis}): missing columns {missing:?}")]
    SchemaDrift {
        analysis: &'static str,
        missing: Vec<String>,
    },
}
