use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use super::csv_table::parse_play_csv;
use super::models::PlayTable;
use super::provider::PlayByPlaySource;
use super::ensure_supported_season;
use crate::error::SourceError;

/// Release asset URL of the nflverse play-by-play CSV; `{season}` is substituted.
pub const DEFAULT_URL_TEMPLATE: &str =
    "https://github.com/nflverse/nflverse-data/releases/download/pbp/play_by_play_{season}.csv";

/// Play-by-play source backed by the public nflverse data releases.
/// Docs: <https://github.com/nflverse/nflverse-data>
pub struct NflverseSource {
    http: Client,
    /// URL with a `{season}` placeholder; overridable for mirrors and tests
    url_template: String,
}

impl NflverseSource {
    pub fn new(url_template: Option<&str>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(NflverseSource {
            http,
            url_template: url_template.unwrap_or(DEFAULT_URL_TEMPLATE).to_string(),
        })
    }

    pub fn season_url(&self, season: u16) -> String {
        self.url_template.replace("{season}", &season.to_string())
    }
}

#[async_trait]
impl PlayByPlaySource for NflverseSource {
    fn name(&self) -> &str {
        "nflverse"
    }

    async fn fetch_season(&self, season: u16) -> Result<PlayTable, SourceError> {
        ensure_supported_season(season)?;
        let url = self.season_url(season);
        info!("Downloading {} play-by-play from {}", season, url);

        let http_err = |source: reqwest::Error| SourceError::Http {
            url: url.clone(),
            source,
        };

        let resp = self.http.get(&url).send().await.map_err(http_err)?;
        if !resp.status().is_success() {
            return Err(SourceError::Status {
                url: url.clone(),
                status: resp.status(),
            });
        }

        let body = resp.bytes().await.map_err(http_err)?;
        debug!("Downloaded {} bytes from {}", body.len(), url);

        parse_play_csv(season, body.as_ref(), &url)
    }
}

/// Play-by-play source reading a CSV already on disk (an nflverse export or a
/// hand-built fixture). The season is only used as a label.
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvFileSource { path: path.into() }
    }
}

#[async_trait]
impl PlayByPlaySource for CsvFileSource {
    fn name(&self) -> &str {
        "csv-file"
    }

    async fn fetch_season(&self, season: u16) -> Result<PlayTable, SourceError> {
        let origin = self.path.display().to_string();
        info!("Reading {} play-by-play from {}", season, origin);
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: origin.clone(),
                source,
            })?;
        parse_play_csv(season, bytes.as_slice(), &origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use std::io::Write;

    const CSV: &str = "game_id,season_type,play_type,yardline_100\n\
                       g1,REG,punt,40\n\
                       g1,PRE,punt,40\n";

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_season_url_substitutes_placeholder() {
        let src = NflverseSource::new(None, Duration::from_secs(5)).unwrap();
        assert_eq!(
            src.season_url(2024),
            "https://github.com/nflverse/nflverse-data/releases/download/pbp/play_by_play_2024.csv"
        );
    }

    #[tokio::test]
    async fn test_rejects_unsupported_season_before_any_request() {
        let src =
            NflverseSource::new(Some("http://127.0.0.1:9/{season}.csv"), Duration::from_secs(1))
                .unwrap();
        let err = src.fetch_season(1999).await.unwrap_err();
        assert!(matches!(err, SourceError::UnsupportedSeason { season: 1999, .. }));
    }

    #[tokio::test]
    async fn test_downloads_and_parses_season_csv() {
        let base = serve(Router::new().route("/pbp/2025.csv", get(|| async { CSV }))).await;
        let src = NflverseSource::new(
            Some(&format!("{}/pbp/{{season}}.csv", base)),
            Duration::from_secs(5),
        )
        .unwrap();

        let table = src.fetch_season(2025).await.unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.plays()[0].yardline_100, Some(40));
    }

    #[tokio::test]
    async fn test_non_success_status_is_a_source_error() {
        let base = serve(Router::new().route(
            "/pbp/2024.csv",
            get(|| async { (StatusCode::NOT_FOUND, "gone") }),
        ))
        .await;
        let src = NflverseSource::new(
            Some(&format!("{}/pbp/{{season}}.csv", base)),
            Duration::from_secs(5),
        )
        .unwrap();

        let err = src.fetch_season(2024).await.unwrap_err();
        match err {
            SourceError::Status { status, .. } => assert_eq!(status, StatusCode::NOT_FOUND),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_csv_file_source_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let table = CsvFileSource::new(file.path()).fetch_season(2023).await.unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.season, 2023);
    }

    #[tokio::test]
    async fn test_missing_file_is_an_io_error() {
        let err = CsvFileSource::new("/definitely/not/here.csv")
            .fetch_season(2023)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }
}
