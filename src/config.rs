use clap::Parser;
use std::time::Duration;

use crate::analysis::AnalysisOptions;
use crate::pbp::SUPPORTED_SEASONS;

/// Impact of UFL-style rules (no punting past midfield, four-point 60+ yard
/// field goals) on an NFL season
#[derive(Parser, Debug, Clone)]
#[command(name = "ufl-rule-impact", version, about)]
pub struct Config {
    /// NFL season to analyze
    #[arg(long, env = "SEASON", default_value = "2025")]
    pub season: u16,

    /// Allow punts past midfield inside the final two minutes of each half
    #[arg(
        long,
        env = "APPLY_TWO_MINUTE_EXEMPTION",
        default_value = "true",
        action = clap::ArgAction::Set
    )]
    pub apply_two_minute_exemption: bool,

    /// Hide teams with fewer total punts from the per-team table
    #[arg(long, env = "MIN_PUNTS", default_value = "0")]
    pub min_punts: usize,

    /// Largest deficit (points) still counted as trailing by one score
    #[arg(long, env = "ONE_SCORE_MARGIN", default_value = "8")]
    pub one_score_margin: i32,

    /// Play-by-play CSV URL; `{season}` is replaced with the season
    #[arg(
        long,
        env = "PBP_URL_TEMPLATE",
        default_value = crate::pbp::nflverse::DEFAULT_URL_TEMPLATE
    )]
    pub pbp_url_template: String,

    /// Read play-by-play from a local CSV file instead of downloading it
    #[arg(long, env = "PBP_CSV")]
    pub pbp_csv: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value = "120")]
    pub http_timeout_secs: u64,

    /// Print the report as JSON instead of text
    #[arg(long, env = "JSON_OUTPUT", default_value = "false")]
    pub json: bool,

    /// Serve the JSON report API on this address instead of printing a report
    #[arg(long, env = "SERVE_ADDR")]
    pub serve_addr: Option<String>,

    /// How long loaded seasons and computed reports stay cached
    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = crate::cache::DEFAULT_TTL.as_secs())]
    pub cache_ttl_secs: u64,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !SUPPORTED_SEASONS.contains(&self.season) {
            anyhow::bail!(
                "season {} is not supported (choose one of {:?})",
                self.season,
                SUPPORTED_SEASONS
            );
        }
        if self.one_score_margin <= 0 {
            anyhow::bail!("one_score_margin must be positive");
        }
        if self.http_timeout_secs == 0 {
            anyhow::bail!("http_timeout_secs must be positive");
        }
        if self.pbp_csv.is_none() && !self.pbp_url_template.contains("{season}") {
            anyhow::bail!("pbp_url_template must contain a {{season}} placeholder");
        }
        Ok(())
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            apply_two_minute_exemption: self.apply_two_minute_exemption,
            one_score_margin: self.one_score_margin,
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["ufl-rule-impact"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config.season, 2025);
        assert!(config.apply_two_minute_exemption);
        assert_eq!(config.min_punts, 0);
        assert_eq!(config.one_score_margin, 8);
        assert_eq!(config.cache_ttl(), Duration::from_secs(86_400));
        assert_eq!(config.cache_ttl(), crate::cache::DEFAULT_TTL);
        assert!(config.validate().is_ok());
        assert_eq!(config.analysis_options(), AnalysisOptions::default());
    }

    #[test]
    fn test_exemption_can_be_disabled() {
        let config = parse(&["--apply-two-minute-exemption", "false", "--season", "2023"]);
        assert!(!config.apply_two_minute_exemption);
        assert!(!config.analysis_options().apply_two_minute_exemption);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_unsupported_season() {
        let err = parse(&["--season", "2019"]).validate().unwrap_err();
        assert!(err.to_string().contains("2019"));
    }

    #[test]
    fn test_rejects_non_positive_values() {
        assert!(parse(&["--one-score-margin", "0"]).validate().is_err());
        assert!(parse(&["--http-timeout-secs", "0"]).validate().is_err());
    }

    #[test]
    fn test_url_template_needs_placeholder_unless_reading_a_file() {
        assert!(parse(&["--pbp-url-template", "http://x/pbp.csv"])
            .validate()
            .is_err());
        assert!(parse(&[
            "--pbp-url-template",
            "http://x/pbp.csv",
            "--pbp-csv",
            "pbp.csv"
        ])
        .validate()
        .is_ok());
    }
}
