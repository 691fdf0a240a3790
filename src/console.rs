//! Plain-text rendering of a [`RuleImpactReport`]. Rounding happens here and
//! nowhere else.

use std::fmt::Write;

use crate::analysis::counterfactual::{SwingRow, SwingTable};
use crate::analysis::field_goals::FieldGoalReport;
use crate::analysis::fourth_down::FourthDownReport;
use crate::analysis::punts::PuntReport;
use crate::analysis::RuleImpactReport;
use crate::error::AnalysisError;

const NOT_AVAILABLE: &str = "N/A";

/// Percentage with one decimal.
pub fn fmt_pct(value: f64) -> String {
    format!("{:.1}%", value)
}

/// EPA / WP value with three decimals, or `N/A`.
pub fn fmt_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.3}", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Like [`fmt_value`] with an explicit sign, for swings.
pub fn fmt_signed(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:+.3}", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn fmt_rate(value: Option<f64>) -> String {
    match value {
        Some(v) => fmt_pct(v * 100.0),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn fmt_yards(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n── {} {}", title, "─".repeat(60usize.saturating_sub(title.len())));
}

fn section_error(out: &mut String, err: &AnalysisError) {
    let _ = writeln!(out, "  unavailable: {}", err);
}

/// Render the whole report. `min_punts` hides team rows with fewer punts.
pub fn render_report(report: &RuleImpactReport, min_punts: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "UFL rule impact, {} NFL regular season ({} plays)",
        report.season, report.plays
    );
    let _ = writeln!(
        out,
        "Two-minute exemption: {}   One-score margin: {}   Generated: {}",
        if report.options.apply_two_minute_exemption {
            "on"
        } else {
            "off"
        },
        report.options.one_score_margin,
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    );

    match &report.punts {
        Ok(punts) => render_punts(&mut out, punts, min_punts),
        Err(e) => {
            heading(&mut out, "No punting past midfield");
            section_error(&mut out, e);
        }
    }
    match &report.field_goals {
        Ok(fg) => render_field_goals(&mut out, fg),
        Err(e) => {
            heading(&mut out, "Four-point field goals (60+ yards)");
            section_error(&mut out, e);
        }
    }
    match &report.fourth_down {
        Ok(fd) => render_fourth_down(&mut out, fd),
        Err(e) => {
            heading(&mut out, "Go-for-it counterfactual");
            section_error(&mut out, e);
        }
    }
    out
}

pub fn render_punts(out: &mut String, punts: &PuntReport, min_punts: usize) {
    heading(out, "No punting past midfield");
    let s = &punts.summary;
    let _ = writeln!(out, "  Total punts:                {}", s.total_punts);
    let _ = writeln!(out, "  In opponent territory:      {}", s.opp_territory);
    let _ = writeln!(out, "  Exempt (final two minutes): {}", s.exempt);
    let _ = writeln!(
        out,
        "  Banned:                     {} ({} of all punts)",
        s.banned,
        fmt_pct(s.pct_banned)
    );

    let _ = writeln!(out, "\n  {:<6} {:>7} {:>7} {:>9}", "Team", "Punts", "Banned", "% Banned");
    for row in punts.teams_with_min_punts(min_punts) {
        let _ = writeln!(
            out,
            "  {:<6} {:>7} {:>7} {:>9}",
            row.team,
            row.total_punts,
            row.banned_punts,
            fmt_pct(row.pct_banned)
        );
    }

    let _ = writeln!(
        out,
        "\n  {:<22} {:>6} {:>9} {:>12}",
        "Situation", "Count", "% Known", "Avg to go"
    );
    for row in &punts.by_situation {
        let _ = writeln!(
            out,
            "  {:<22} {:>6} {:>9} {:>12}",
            row.situation.label(),
            row.count,
            fmt_pct(row.pct_of_known),
            fmt_yards(row.avg_ydstogo)
        );
    }
    if punts.unknown_situation > 0 {
        let _ = writeln!(out, "  {:<22} {:>6}", "Unknown score", punts.unknown_situation);
    }

    let _ = writeln!(out, "\n  {:<10} {:>6} {:>9}", "To go", "Count", "% Known");
    for row in &punts.by_bucket {
        let _ = writeln!(
            out,
            "  {:<10} {:>6} {:>9}",
            row.bucket.label(),
            row.count,
            fmt_pct(row.pct_of_known)
        );
    }
    for row in &punts.by_bracket {
        let _ = writeln!(
            out,
            "  {:<20} {:>6} ({})",
            row.bracket.label(),
            row.count,
            fmt_pct(row.pct_of_known)
        );
    }
    if punts.unknown_ydstogo > 0 {
        let _ = writeln!(out, "  {:<10} {:>6}", "Unknown", punts.unknown_ydstogo);
    }
    let d = &punts.ydstogo;
    let _ = writeln!(
        out,
        "  Yards to go: mean {}, median {}, std dev {}",
        fmt_yards(d.mean),
        fmt_yards(d.median),
        fmt_yards(d.std_dev)
    );
}

pub fn render_field_goals(out: &mut String, fg: &FieldGoalReport) {
    heading(out, "Four-point field goals (60+ yards)");
    let s = &fg.summary;
    let _ = writeln!(out, "  Field goal attempts:  {}", s.total_attempts);
    let _ = writeln!(out, "  60+ yard attempts:    {}", s.long_attempts);
    let _ = writeln!(
        out,
        "  60+ yard makes:       {} ({})",
        s.long_made,
        fmt_pct(s.make_pct)
    );
    let _ = writeln!(out, "  Extra points:         +{}", s.extra_points);

    if !fg.by_team.is_empty() {
        let _ = writeln!(
            out,
            "\n  {:<6} {:>5} {:>5} {:>7} {:>6}",
            "Team", "Att", "Made", "Make %", "Extra"
        );
        for row in &fg.by_team {
            let _ = writeln!(
                out,
                "  {:<6} {:>5} {:>5} {:>7} {:>6}",
                row.team,
                row.attempts,
                row.made,
                fmt_pct(row.make_pct),
                format!("+{}", row.extra_points)
            );
        }
    }

    match &fg.close_losses {
        Ok(losses) if losses.is_empty() => {
            let _ = writeln!(out, "\n  No one-point losses with a made 60+ yard field goal.");
        }
        Ok(losses) => {
            let _ = writeln!(out, "\n  One-point losses the bonus would have tied:");
            for loss in losses {
                let _ = writeln!(
                    out,
                    "    {} {} ({} yds): lost {}-{}",
                    loss.game_id, loss.team, loss.kick_distance, loss.team_score, loss.opponent_score
                );
            }
        }
        Err(e) => section_error(out, e),
    }
}

fn render_swing_table(out: &mut String, title: &str, table: &SwingTable) {
    let metric = table.metric.label();
    let _ = writeln!(out, "\n  {} ({})", title, metric);
    let _ = writeln!(
        out,
        "  {:<8} {:>5} {:>8} {:>9} {:>9} {:>9} {:>7} {:>9} {:>8}",
        "To go", "Att", "Conv %", "If conv", "If fail", "E[go]", "Punts", "Actual", "Swing"
    );
    for row in table.buckets.iter().chain(std::iter::once(&table.overall)) {
        swing_line(out, row);
    }
}

fn swing_line(out: &mut String, row: &SwingRow) {
    let label = row.bucket.map(|b| b.label()).unwrap_or("All");
    let _ = writeln!(
        out,
        "  {:<8} {:>5} {:>8} {:>9} {:>9} {:>9} {:>7} {:>9} {:>8}",
        label,
        row.go_attempts,
        fmt_rate(row.conv_rate),
        fmt_value(row.value_if_converted),
        fmt_value(row.value_if_failed),
        fmt_value(row.expected_go),
        row.affected_count,
        fmt_value(row.avg_affected),
        fmt_signed(row.swing)
    );
}

pub fn render_fourth_down(out: &mut String, fd: &FourthDownReport) {
    heading(out, "Go-for-it counterfactual");
    let _ = writeln!(
        out,
        "  {} fourth-down runs/passes as baseline, {} banned punts",
        fd.go_for_it_plays, fd.banned_punts
    );
    match &fd.epa {
        Ok(epa) => {
            let _ = writeln!(
                out,
                "\n  Avg EPA of banned punts:           {}",
                fmt_signed(epa.avg_banned_punt_epa)
            );
            let _ = writeln!(
                out,
                "  Avg EPA of 4th-down go-for-it:     {}",
                fmt_signed(epa.avg_go_for_it_epa)
            );
            let _ = writeln!(
                out,
                "  Raw EPA swing (go minus punt):     {}",
                fmt_signed(epa.raw_swing)
            );
            render_swing_table(out, "Expected points swing", &epa.table);
        }
        Err(e) => section_error(out, e),
    }
    match &fd.wp {
        Ok(wp) => {
            let _ = writeln!(
                out,
                "\n  Avg WP before banned punts:        {}",
                fmt_value(wp.avg_wp_before_punt)
            );
            render_swing_table(out, "Win probability swing", &wp.table);
        }
        Err(e) => section_error(out, e),
    }
    match &fd.leading {
        Ok(leading) => {
            let _ = writeln!(
                out,
                "\n  Banned punts while leading: {} ({} of banned), avg WP before punt {}",
                leading.banned_leading,
                fmt_pct(leading.share_of_banned),
                fmt_value(leading.avg_wp_before_punt)
            );
            render_swing_table(out, "Win probability swing while leading", &leading.table);
        }
        Err(e) => section_error(out, e),
    }
    let _ = writeln!(
        out,
        "\n  Positive swing: going for it would have produced more value."
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, AnalysisOptions};
    use crate::pbp::{Play, PlayTable, PlayType};

    #[test]
    fn test_formatting_rounds_and_marks_missing() {
        assert_eq!(fmt_pct(42.857142), "42.9%");
        assert_eq!(fmt_pct(0.0), "0.0%");
        assert_eq!(fmt_value(Some(0.12345)), "0.123");
        assert_eq!(fmt_value(None), "N/A");
        assert_eq!(fmt_signed(Some(0.92)), "+0.920");
        assert_eq!(fmt_signed(Some(-0.8)), "-0.800");
        assert_eq!(fmt_rate(Some(0.6)), "60.0%");
    }

    fn punt(team: &str, yardline: i32) -> Play {
        Play {
            play_type: Some(PlayType::Punt),
            posteam: Some(team.into()),
            yardline_100: Some(yardline),
            half_seconds_remaining: Some(900),
            ydstogo: Some(4),
            score_differential: Some(0),
            ..Default::default()
        }
    }

    #[test]
    fn test_min_punts_hides_small_teams_only_in_output() {
        let table = PlayTable::new(
            2024,
            crate::analysis::punts::PUNT_COLUMNS.iter().copied(),
            vec![punt("KC", 40), punt("KC", 45), punt("LV", 40)],
        );
        let report = analyze(&table, &AnalysisOptions::default());

        let all = render_report(&report, 0);
        assert!(all.contains("KC"));
        assert!(all.contains("LV"));

        let filtered = render_report(&report, 2);
        assert!(filtered.contains("KC"));
        assert!(!filtered.contains("LV "));
        assert_eq!(report.punts.as_ref().unwrap().summary.banned, 3);
    }

    #[test]
    fn test_unknown_punt_fields_get_their_own_line() {
        let mut blind = punt("NE", 40);
        blind.score_differential = None;
        blind.ydstogo = None;
        let table = PlayTable::new(
            2024,
            crate::analysis::punts::PUNT_COLUMNS.iter().copied(),
            vec![punt("NE", 45), blind],
        );
        let text = render_report(&analyze(&table, &AnalysisOptions::default()), 0);
        assert!(text.contains("Unknown score"));
        assert!(text.contains("Unknown "));
        assert!(text.contains("100.0%"));
    }

    #[test]
    fn test_fourth_down_shows_raw_epa_and_pre_punt_wp() {
        let columns = crate::analysis::fourth_down::FOURTH_DOWN_COLUMNS
            .iter()
            .chain(crate::analysis::fourth_down::EPA_COLUMNS)
            .chain(crate::analysis::fourth_down::LEADING_COLUMNS)
            .copied();
        let go = Play {
            play_type: Some(PlayType::Pass),
            down: Some(4),
            ydstogo: Some(1),
            fourth_down_converted: Some(true),
            epa: Some(1.5),
            wp: Some(0.5),
            wpa: Some(0.05),
            ..Default::default()
        };
        let banned = Play {
            down: Some(4),
            epa: Some(-0.5),
            wp: Some(0.6),
            wpa: Some(-0.01),
            score_differential: Some(3),
            ..punt("DAL", 40)
        };
        let table = PlayTable::new(2024, columns, vec![go, banned]);
        let text = render_report(&analyze(&table, &AnalysisOptions::default()), 0);
        assert!(text.contains("Avg EPA of banned punts:           -0.500"));
        assert!(text.contains("Raw EPA swing (go minus punt):     +2.000"));
        assert!(text.contains("Avg WP before banned punts:        0.600"));
        assert!(text.contains("avg WP before punt 0.600"));
    }

    #[test]
    fn test_failed_sections_render_as_unavailable() {
        let table = PlayTable::new(2024, ["game_id"], Vec::new());
        let report = analyze(&table, &AnalysisOptions::default());
        let text = render_report(&report, 0);
        assert_eq!(text.matches("unavailable:").count(), 3);
        assert!(text.contains("schema change detected"));
    }
}
