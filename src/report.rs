use std::fmt::Write as _;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::model::{ProjectionResult, TeamProjection};

const HIGH_TOTAL: f64 = 48.0;
const LOW_TOTAL: f64 = 40.0;
const HIGH_PASS_VOLUME: f64 = 80.0;
const WEATHER_IMPACT: f64 = 3.0;
const HIGH_SUCCESS_RATE: f64 = 0.48;
const LOW_SUCCESS_RATE: f64 = 0.42;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Insight {
    HighScoring,
    LowScoring,
    HighPassVolume,
    WeatherImpact,
    HighSuccessRates,
    LowSuccessRates,
}

impl Insight {
    pub fn message(self) -> &'static str {
        match self {
            Insight::HighScoring => "High-scoring game, consider the over",
            Insight::LowScoring => "Low-scoring game, consider the under",
            Insight::HighPassVolume => "High pass volume, strong QB/WR prop environment",
            Insight::WeatherImpact => "Weather is taking points off the board, under lean",
            Insight::HighSuccessRates => "High success rates, both teams sustaining drives",
            Insight::LowSuccessRates => "Low success rates, lots of punts expected",
        }
    }
}

pub fn insights(result: &ProjectionResult) -> Vec<Insight> {
    let mut out = Vec::new();
    if result.total >= HIGH_TOTAL {
        out.push(Insight::HighScoring);
    } else if result.total <= LOW_TOTAL {
        out.push(Insight::LowScoring);
    }
    if result.team_a.pass_attempts + result.team_b.pass_attempts >= HIGH_PASS_VOLUME {
        out.push(Insight::HighPassVolume);
    }
    if result.weather_penalty >= WEATHER_IMPACT {
        out.push(Insight::WeatherImpact);
    }
    let avg_sr = (result.team_a.success_rate + result.team_b.success_rate) / 2.0;
    if avg_sr >= HIGH_SUCCESS_RATE {
        out.push(Insight::HighSuccessRates);
    } else if avg_sr <= LOW_SUCCESS_RATE {
        out.push(Insight::LowSuccessRates);
    }
    out
}

fn team_block(out: &mut String, t: &TeamProjection) {
    let _ = writeln!(out, "{}: {:.2}", t.team.to_uppercase(), t.points);
    let _ = writeln!(
        out,
        "  Pass Rate: {:.1}% | Plays: {:.1} | Pass Att: {:.1}",
        t.expected_pass_rate * 100.0,
        t.expected_plays,
        t.pass_attempts
    );
    let _ = writeln!(
        out,
        "  Matchup EPA: {:.4} | Success Rate: {:.1}% ({:+.2} pts)",
        t.matchup_epa,
        t.success_rate * 100.0,
        t.success_rate_tilt
    );
    if t.home_field != 0.0 || t.injury_delta != 0.0 {
        let _ = writeln!(
            out,
            "  Home: {:+.2} | Injuries: {:+.2}",
            t.home_field, t.injury_delta
        );
    }
}

pub fn render_text(result: &ProjectionResult) -> String {
    let rule = "=".repeat(70);
    let stars = "*".repeat(70);
    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "FINAL PROJECTION");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out);
    team_block(&mut out, &result.team_a);
    let _ = writeln!(out);
    team_block(&mut out, &result.team_b);
    let _ = writeln!(out);
    let _ = writeln!(out, "{stars}");
    if result.weather_penalty > 0.0 {
        let _ = writeln!(out, "BASE TOTAL: {:.2}", result.base_total());
        let _ = writeln!(out, "WEATHER ADJUSTMENT: -{:.1} pts", result.weather_penalty);
        let _ = writeln!(out, "FINAL TOTAL: {:.2}", result.total);
    } else {
        let _ = writeln!(out, "PROJECTED TOTAL: {:.2}", result.total);
    }
    let _ = writeln!(out, "{stars}");

    let notes = insights(result);
    if !notes.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "--- INSIGHTS ---");
        for note in notes {
            let _ = writeln!(out, "- {}", note.message());
        }
    }
    if !result.warnings.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "--- DATA WARNINGS ---");
        for w in &result.warnings {
            let _ = writeln!(out, "- {w}");
        }
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    #[serde(flatten)]
    result: &'a ProjectionResult,
    insights: Vec<Insight>,
}

pub fn render_json(result: &ProjectionResult) -> Result<String> {
    let report = JsonReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        result,
        insights: insights(result),
    };
    serde_json::to_string_pretty(&report).context("serialize projection")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(name: &str, points: f64, pass_attempts: f64, success_rate: f64) -> TeamProjection {
        TeamProjection {
            team: name.to_string(),
            expected_pass_rate: 0.6,
            expected_plays: 64.0,
            pass_attempts,
            matchup_epa: 0.05,
            success_rate,
            raw_points: points,
            success_rate_tilt: 0.0,
            home_field: 0.0,
            injury_delta: 0.0,
            points,
        }
    }

    fn result(a: f64, b: f64, penalty: f64) -> ProjectionResult {
        ProjectionResult {
            team_a: team("kc", a, 38.0, 0.47),
            team_b: team("buf", b, 36.0, 0.45),
            team_a_points: a,
            team_b_points: b,
            weather_penalty: penalty,
            total: a + b - penalty,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn insights_flag_totals_and_weather() {
        assert_eq!(insights(&result(27.0, 24.0, 0.0)), vec![Insight::HighScoring]);
        assert_eq!(
            insights(&result(20.0, 21.0, 4.0)),
            vec![Insight::LowScoring, Insight::WeatherImpact]
        );
        assert!(insights(&result(22.0, 22.0, 0.0)).is_empty());
    }

    #[test]
    fn text_shows_weather_breakdown_only_when_present() {
        let calm = render_text(&result(24.0, 21.0, 0.0));
        assert!(calm.contains("PROJECTED TOTAL: 45.00"));
        assert!(!calm.contains("WEATHER"));
        let windy = render_text(&result(24.0, 21.0, 3.0));
        assert!(windy.contains("BASE TOTAL: 45.00"));
        assert!(windy.contains("FINAL TOTAL: 42.00"));
        assert!(windy.contains("KC: 24.00"));
    }

    #[test]
    fn json_flattens_result() {
        let raw = render_json(&result(24.0, 21.0, 0.0)).unwrap();
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v["total"], 45.0);
        assert_eq!(v["team_a"]["team"], "kc");
        assert!(v["generated_at"].is_string());
    }
}
