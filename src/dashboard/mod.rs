use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info};

use crate::analysis::field_goals::FieldGoalReport;
use crate::analysis::fourth_down::FourthDownReport;
use crate::analysis::punts::PuntReport;
use crate::analysis::{analyze, AnalysisOptions, RuleImpactReport};
use crate::cache::TtlCache;
use crate::error::{AnalysisError, SourceError};
use crate::pbp::{ensure_supported_season, PlayByPlaySource, PlayTable};

type ApiError = (StatusCode, String);

pub struct AppState {
    source: Arc<dyn PlayByPlaySource>,
    /// Loaded seasons
    tables: TtlCache<u16, Arc<PlayTable>>,
    /// Computed reports keyed by (season, two-minute exemption)
    reports: TtlCache<(u16, bool), Arc<RuleImpactReport>>,
    default_season: u16,
    /// Used when a request leaves `exclude_2min` or `min_punts` out
    default_options: AnalysisOptions,
    default_min_punts: usize,
}

impl AppState {
    pub fn new(
        source: Arc<dyn PlayByPlaySource>,
        default_season: u16,
        default_options: AnalysisOptions,
        default_min_punts: usize,
        cache_ttl: Duration,
    ) -> Self {
        AppState {
            source,
            tables: TtlCache::new(cache_ttl),
            reports: TtlCache::new(cache_ttl),
            default_season,
            default_options,
            default_min_punts,
        }
    }

    /// Periodically drop expired seasons and reports.
    pub fn spawn_cache_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let tables = self.tables.clone();
        let reports = self.reports.clone();
        let every = tables.ttl().max(Duration::from_secs(60));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let removed = tables.purge_expired().await + reports.purge_expired().await;
                debug!(
                    "Cache sweep: {} expired, {} seasons and {} reports cached",
                    removed,
                    tables.len().await,
                    reports.len().await
                );
            }
        })
    }

    async fn table(&self, season: u16) -> Result<Arc<PlayTable>, SourceError> {
        self.tables
            .get_or_try_insert_with(season, || async move {
                let table = self.source.fetch_season(season).await?;
                info!(
                    "Loaded {} plays for {} from {}",
                    table.len(),
                    season,
                    self.source.name()
                );
                Ok(Arc::new(table))
            })
            .await
    }

    /// Report for a season, computed at most once per cache lifetime.
    pub async fn report(
        &self,
        season: u16,
        apply_two_minute_exemption: bool,
    ) -> Result<Arc<RuleImpactReport>, SourceError> {
        ensure_supported_season(season)?;
        let options = AnalysisOptions {
            apply_two_minute_exemption,
            ..self.default_options
        };
        self.reports
            .get_or_try_insert_with((season, apply_two_minute_exemption), || async move {
                let table = self.table(season).await?;
                Ok(Arc::new(analyze(&table, &options)))
            })
            .await
    }
}

/// Query parameters shared by every report endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub season: Option<u16>,
    /// Exclude the final two minutes of each half from the punt ban
    pub exclude_2min: Option<bool>,
    /// Hide teams with fewer punts from the per-team table
    pub min_punts: Option<usize>,
}

/// Build the Axum router for the report API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/report", get(report_handler))
        .route("/api/punts", get(punts_handler))
        .route("/api/field-goals", get(field_goals_handler))
        .route("/api/fourth-down", get(fourth_down_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

fn status_for(err: &SourceError) -> StatusCode {
    match err {
        SourceError::UnsupportedSeason { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    }
}

async fn load_report(state: &AppState, query: &ReportQuery) -> Result<RuleImpactReport, ApiError> {
    let season = query.season.unwrap_or(state.default_season);
    let exemption = query
        .exclude_2min
        .unwrap_or(state.default_options.apply_two_minute_exemption);
    let min_punts = query.min_punts.unwrap_or(state.default_min_punts);
    let report = state.report(season, exemption).await.map_err(|e| {
        error!("Report for {} failed: {}", season, e);
        (status_for(&e), e.to_string())
    })?;

    let mut report = (*report).clone();
    if let Ok(punts) = report.punts.as_mut() {
        punts.by_team.retain(|row| row.total_punts >= min_punts);
    }
    Ok(report)
}

#[derive(Debug, Serialize)]
pub struct Health {
    status: &'static str,
    source: String,
}

/// GET /api/health
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Health> {
    Json(Health {
        status: "ok",
        source: state.source.name().to_string(),
    })
}

/// GET /api/report?season=2025&exclude_2min=true&min_punts=0
async fn report_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<RuleImpactReport>, ApiError> {
    load_report(&state, &query).await.map(Json)
}

/// GET /api/punts
async fn punts_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Result<PuntReport, AnalysisError>>, ApiError> {
    load_report(&state, &query).await.map(|r| Json(r.punts))
}

/// GET /api/field-goals
async fn field_goals_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Result<FieldGoalReport, AnalysisError>>, ApiError> {
    load_report(&state, &query).await.map(|r| Json(r.field_goals))
}

/// GET /api/fourth-down
async fn fourth_down_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Result<FourthDownReport, AnalysisError>>, ApiError> {
    load_report(&state, &query).await.map(|r| Json(r.fourth_down))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::punts::PUNT_COLUMNS;
    use crate::pbp::{Play, PlayType};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixtureSource {
        fetches: AtomicUsize,
        fail: bool,
    }

    fn punt(team: &str, yardline: i32, secs: i32) -> Play {
        Play {
            play_type: Some(PlayType::Punt),
            posteam: Some(team.into()),
            yardline_100: Some(yardline),
            half_seconds_remaining: Some(secs),
            ydstogo: Some(5),
            score_differential: Some(-3),
            ..Default::default()
        }
    }

    #[async_trait]
    impl PlayByPlaySource for FixtureSource {
        fn name(&self) -> &str {
            "fixture"
        }

        async fn fetch_season(&self, season: u16) -> Result<PlayTable, SourceError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SourceError::Status {
                    url: "http://fixture".into(),
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                });
            }
            Ok(PlayTable::new(
                season,
                PUNT_COLUMNS.iter().copied(),
                vec![punt("SEA", 45, 900), punt("SEA", 45, 60), punt("SF", 30, 900)],
            ))
        }
    }

    fn state_with(
        fail: bool,
        options: AnalysisOptions,
        min_punts: usize,
    ) -> (Arc<AppState>, Arc<FixtureSource>) {
        let source = Arc::new(FixtureSource {
            fetches: AtomicUsize::new(0),
            fail,
        });
        let state = AppState::new(
            source.clone(),
            2025,
            options,
            min_punts,
            Duration::from_secs(60),
        );
        (Arc::new(state), source)
    }

    fn state(fail: bool) -> (Arc<AppState>, Arc<FixtureSource>) {
        state_with(fail, AnalysisOptions::default(), 0)
    }

    #[tokio::test]
    async fn test_report_is_cached_per_season_and_exemption() {
        let (state, source) = state(false);

        let on = report_handler(State(state.clone()), Query(ReportQuery::default()))
            .await
            .unwrap();
        assert_eq!(on.0.season, 2025);
        assert_eq!(on.0.punts.as_ref().unwrap().summary.banned, 2);

        let off = report_handler(
            State(state.clone()),
            Query(ReportQuery {
                exclude_2min: Some(false),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(off.0.punts.as_ref().unwrap().summary.banned, 3);

        // Both reports share one download of the season.
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);

        let again = state.report(2025, true).await.unwrap();
        assert_eq!(again.generated_at, on.0.generated_at);
    }

    #[tokio::test]
    async fn test_min_punts_filters_team_rows_only() {
        let (state, _) = state(false);
        let Json(punts) = punts_handler(
            State(state.clone()),
            Query(ReportQuery {
                min_punts: Some(2),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        let punts = punts.unwrap();
        assert_eq!(punts.by_team.len(), 1);
        assert_eq!(punts.by_team[0].team, "SEA");
        assert_eq!(punts.summary.total_punts, 3);

        // The cached report keeps every team.
        let cached = state.report(2025, true).await.unwrap();
        assert_eq!(cached.punts.as_ref().unwrap().by_team.len(), 2);
    }

    #[tokio::test]
    async fn test_configured_defaults_apply_when_query_omits_them() {
        let options = AnalysisOptions {
            apply_two_minute_exemption: false,
            ..AnalysisOptions::default()
        };
        let (state, _) = state_with(false, options, 2);

        let Json(punts) = punts_handler(State(state.clone()), Query(ReportQuery::default()))
            .await
            .unwrap();
        let punts = punts.unwrap();
        assert_eq!(punts.summary.banned, 3);
        assert_eq!(punts.by_team.len(), 1);
        assert_eq!(punts.by_team[0].team, "SEA");

        // Query parameters still override the configured defaults.
        let Json(punts) = punts_handler(
            State(state),
            Query(ReportQuery {
                exclude_2min: Some(true),
                min_punts: Some(0),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        let punts = punts.unwrap();
        assert_eq!(punts.summary.banned, 2);
        assert_eq!(punts.by_team.len(), 2);
    }

    #[tokio::test]
    async fn test_schema_drift_is_returned_inside_the_section() {
        let (state, _) = state(false);
        let Json(fg) = field_goals_handler(State(state), Query(ReportQuery::default()))
            .await
            .unwrap();
        assert!(matches!(fg, Err(AnalysisError::SchemaDrift { .. })));
    }

    #[tokio::test]
    async fn test_unsupported_season_is_bad_request() {
        let (state, source) = state(false);
        let err = report_handler(
            State(state),
            Query(ReportQuery {
                season: Some(2019),
                ..Default::default()
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_source_failure_is_bad_gateway_and_not_cached() {
        let (state, source) = state(true);
        for _ in 0..2 {
            let err = fourth_down_handler(State(state.clone()), Query(ReportQuery::default()))
                .await
                .unwrap_err();
            assert_eq!(err.0, StatusCode::BAD_GATEWAY);
        }
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _) = state(false);
        let Json(health) = health_handler(State(state)).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.source, "fixture");
    }
}
