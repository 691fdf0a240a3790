use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

mod analysis;
mod cache;
mod config;
mod console;
mod dashboard;
mod error;
mod pbp;

use config::Config;
use dashboard::AppState;
use pbp::{CsvFileSource, NflverseSource, PlayByPlaySource};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let source: Arc<dyn PlayByPlaySource> = match &config.pbp_csv {
        Some(path) => {
            info!("Reading play-by-play from {}", path);
            Arc::new(CsvFileSource::new(path))
        }
        None => Arc::new(NflverseSource::new(
            Some(&config.pbp_url_template),
            config.http_timeout(),
        )?),
    };

    if let Some(addr) = &config.serve_addr {
        let state = AppState::new(
            source,
            config.season,
            config.analysis_options(),
            config.min_punts,
            config.cache_ttl(),
        );
        state.spawn_cache_sweeper();
        let app = dashboard::router(state);
        let addr: SocketAddr = addr
            .parse()
            .with_context(|| format!("Invalid --serve-addr {}", addr))?;
        info!("Report API listening on http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;
        return Ok(());
    }

    let table = source
        .fetch_season(config.season)
        .await
        .with_context(|| format!("Failed to load {} play-by-play", config.season))?;
    let report = analysis::analyze(&table, &config.analysis_options());

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", console::render_report(&report, config.min_punts));
    }

    Ok(())
}
