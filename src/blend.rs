use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, Result};
use crate::model::{TeamProfile, UnitStats};
use crate::model_params::BlendMode;

/// Weighted average of two windows, weighted by the games each covers.
pub fn blend_metric(
    team: &str,
    metric: &'static str,
    season_value: f64,
    season_games: u32,
    recent_value: f64,
    recent_games: u32,
) -> Result<f64> {
    let total = season_games.saturating_add(recent_games);
    if total == 0 {
        return Err(insufficient(team, metric));
    }
    // Exact pass-through keeps single-window blends free of rounding.
    if recent_games == 0 {
        return Ok(season_value);
    }
    if season_games == 0 {
        return Ok(recent_value);
    }
    let total = f64::from(total);
    let w_season = f64::from(season_games) / total;
    let w_recent = f64::from(recent_games) / total;
    Ok(season_value * w_season + recent_value * w_recent)
}

/// Fixed season/recent split keyed on how far into the season the team is.
pub fn blend_metric_tiered(
    team: &str,
    metric: &'static str,
    season_value: f64,
    season_games: u32,
    recent_value: f64,
    recent_games: u32,
) -> Result<f64> {
    if season_games == 0 && recent_games == 0 {
        return Err(insufficient(team, metric));
    }
    if recent_games == 0 {
        return Ok(season_value);
    }
    if season_games == 0 {
        return Ok(recent_value);
    }
    let w_recent = match season_games {
        0..=5 => return Ok(season_value),
        6..=10 => 0.35,
        11..=14 => 0.50,
        _ => 0.60,
    };
    Ok(season_value * (1.0 - w_recent) + recent_value * w_recent)
}

fn insufficient(team: &str, metric: &'static str) -> ProjectionError {
    ProjectionError::InsufficientData {
        team: team.to_string(),
        metric,
    }
}

/// One team's metrics after blending both windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendedMetrics {
    pub offense: UnitStats,
    pub defense: UnitStats,
}

const OFFENSE_METRICS: [&str; 4] = [
    "offense dropback_epa",
    "offense dropback_sr",
    "offense rush_epa",
    "offense rush_sr",
];
const DEFENSE_METRICS: [&str; 4] = [
    "defense dropback_epa",
    "defense dropback_sr",
    "defense rush_epa",
    "defense rush_sr",
];

type BlendFn = fn(&str, &'static str, f64, u32, f64, u32) -> Result<f64>;

pub fn blend_profile(profile: &TeamProfile, mode: BlendMode) -> Result<BlendedMetrics> {
    let blend: BlendFn = match mode {
        BlendMode::GamesWeighted => blend_metric,
        BlendMode::RecencyTiers => blend_metric_tiered,
    };
    let team = profile.team.as_str();
    let (sg, rg) = (profile.season.games_played, profile.recent.games_played);
    let unit = |names: [&'static str; 4], s: UnitStats, r: UnitStats| -> Result<UnitStats> {
        Ok(UnitStats {
            dropback_epa: blend(team, names[0], s.dropback_epa, sg, r.dropback_epa, rg)?,
            dropback_sr: blend(team, names[1], s.dropback_sr, sg, r.dropback_sr, rg)?,
            rush_epa: blend(team, names[2], s.rush_epa, sg, r.rush_epa, rg)?,
            rush_sr: blend(team, names[3], s.rush_sr, sg, r.rush_sr, rg)?,
        })
    };
    let blended = BlendedMetrics {
        offense: unit(OFFENSE_METRICS, profile.season.offense, profile.recent.offense)?,
        defense: unit(DEFENSE_METRICS, profile.season.defense, profile.recent.defense)?,
    };
    log::debug!("{team} blended metrics: {blended:?}");
    Ok(blended)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::profile;

    #[test]
    fn blended_value_stays_between_windows() {
        let cases = [
            (0.25, 17, 0.30, 5),
            (0.30, 3, -0.10, 3),
            (-0.05, 1, 0.12, 5),
            (0.48, 9, 0.41, 0),
            (0.0, 0, 0.2, 4),
        ];
        for (sv, sg, rv, rg) in cases {
            let b = blend_metric("T", "m", sv, sg, rv, rg).unwrap();
            let lo = f64::min(sv, rv);
            let hi = f64::max(sv, rv);
            assert!(b >= lo && b <= hi, "{b} not in [{lo}, {hi}]");
        }
    }

    #[test]
    fn worked_example_matches_hand_calculation() {
        let b = blend_metric("A", "offense dropback_epa", 0.25, 17, 0.30, 5).unwrap();
        let expected = 0.25 * (17.0 / 22.0) + 0.30 * (5.0 / 22.0);
        assert!((b - expected).abs() < 1e-12);
        assert!((b - 0.2614).abs() < 1e-4);
    }

    #[test]
    fn single_window_passes_through_exactly() {
        assert_eq!(blend_metric("T", "m", 0.1234, 8, 9.0, 0).unwrap(), 0.1234);
        assert_eq!(blend_metric("T", "m", 9.0, 0, 0.4321, 4).unwrap(), 0.4321);
        assert_eq!(blend_metric_tiered("T", "m", 0.1234, 16, 9.0, 0).unwrap(), 0.1234);
        assert_eq!(blend_metric_tiered("T", "m", 9.0, 0, 0.4321, 4).unwrap(), 0.4321);
    }

    #[test]
    fn no_games_is_insufficient_data() {
        let err = blend_metric("NYJ", "offense rush_sr", 0.4, 0, 0.5, 0).unwrap_err();
        assert_eq!(
            err,
            ProjectionError::InsufficientData {
                team: "NYJ".to_string(),
                metric: "offense rush_sr",
            }
        );
        assert!(blend_metric_tiered("NYJ", "m", 0.4, 0, 0.5, 0).is_err());
    }

    #[test]
    fn tiers_follow_season_progress() {
        assert_eq!(blend_metric_tiered("T", "m", 1.0, 4, 0.0, 4).unwrap(), 1.0);
        assert!((blend_metric_tiered("T", "m", 1.0, 8, 0.0, 5).unwrap() - 0.65).abs() < 1e-12);
        assert!((blend_metric_tiered("T", "m", 1.0, 12, 0.0, 5).unwrap() - 0.50).abs() < 1e-12);
        assert!((blend_metric_tiered("T", "m", 1.0, 17, 0.0, 5).unwrap() - 0.40).abs() < 1e-12);
    }

    #[test]
    fn profile_blend_names_failing_metric() {
        let mut p = profile("CHI");
        p.season.games_played = 0;
        p.recent.games_played = 0;
        match blend_profile(&p, BlendMode::GamesWeighted) {
            Err(ProjectionError::InsufficientData { team, metric }) => {
                assert_eq!(team, "CHI");
                assert_eq!(metric, "offense dropback_epa");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn profile_blend_uses_each_window() {
        let p = profile("CHI");
        let b = blend_profile(&p, BlendMode::GamesWeighted).unwrap();
        let expected = (0.10 * 12.0 + 0.14 * 5.0) / 17.0;
        assert!((b.offense.dropback_epa - expected).abs() < 1e-12);
        assert!((b.defense.dropback_epa - (0.02 * 12.0) / 17.0).abs() < 1e-12);
    }
}
