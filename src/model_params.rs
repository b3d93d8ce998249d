use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Precipitation, VenueStrength};

/// How the season and last-five windows are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    /// Weight each window by the games it covers.
    #[default]
    GamesWeighted,
    /// Fixed season/recent splits stepped by season games played.
    RecencyTiers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherParams {
    /// (minimum wind mph, points). The largest satisfied tier applies.
    pub wind_tiers: Vec<(f64, f64)>,
    pub freezing_below_f: f64,
    pub freezing_points: f64,
    pub light_rain: f64,
    pub heavy_rain: f64,
    pub light_snow: f64,
    pub heavy_snow: f64,
    pub blizzard: f64,
}

impl Default for WeatherParams {
    fn default() -> Self {
        Self {
            wind_tiers: vec![(10.0, 1.0), (15.0, 3.0), (20.0, 6.0)],
            freezing_below_f: 0.0,
            freezing_points: 2.0,
            light_rain: 0.0,
            heavy_rain: 3.0,
            light_snow: 2.0,
            heavy_snow: 4.0,
            blizzard: 8.0,
        }
    }
}

impl WeatherParams {
    pub fn precipitation_points(&self, precip: Precipitation) -> f64 {
        match precip {
            Precipitation::None => 0.0,
            Precipitation::LightRain => self.light_rain,
            Precipitation::HeavyRain => self.heavy_rain,
            Precipitation::LightSnow => self.light_snow,
            Precipitation::HeavySnow => self.heavy_snow,
            Precipitation::Blizzard => self.blizzard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjuryParams {
    pub qb_out: f64,
    pub elite_receiver_out: f64,
    pub offensive_lineman_out: f64,
    /// Credited to the offense facing a defense missing an EDGE rusher.
    pub opponent_edge_out: f64,
}

impl Default for InjuryParams {
    fn default() -> Self {
        Self {
            qb_out: -6.0,
            elite_receiver_out: -2.0,
            offensive_lineman_out: -0.5,
            opponent_edge_out: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeFieldParams {
    pub weak: f64,
    pub average: f64,
    pub strong: f64,
}

impl Default for HomeFieldParams {
    fn default() -> Self {
        Self {
            weak: 1.0,
            average: 1.5,
            strong: 2.5,
        }
    }
}

impl HomeFieldParams {
    pub fn points(&self, strength: VenueStrength) -> f64 {
        match strength {
            VenueStrength::Weak => self.weak,
            VenueStrength::Average => self.average,
            VenueStrength::Strong => self.strong,
        }
    }
}

/// Every tunable constant of the projection in one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    pub blend_mode: BlendMode,

    // Offense vs defense-allowed weights for net EPA and success rate.
    pub offense_weight: f64,
    pub defense_weight: f64,

    pub league_avg_pass_rate_allowed: f64,
    /// PROE beyond this magnitude is clamped and reported.
    pub max_abs_proe: f64,
    pub script_slope: f64,
    pub script_cap: f64,

    pub close_game_plays_bonus: f64,
    pub plays_lost_per_spread_point: f64,
    pub max_blowout_plays_lost: f64,

    pub points_per_play_base: f64,
    pub epa_to_points: f64,

    pub success_rate_weight: f64,
    pub league_avg_pass_sr: f64,
    pub league_avg_rush_sr: f64,

    pub home_field: HomeFieldParams,
    pub injuries: InjuryParams,
    pub weather: WeatherParams,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            blend_mode: BlendMode::GamesWeighted,
            offense_weight: 1.6,
            defense_weight: 1.0,
            league_avg_pass_rate_allowed: 0.60,
            max_abs_proe: 0.25,
            script_slope: 0.007,
            script_cap: 0.05,
            close_game_plays_bonus: 3.0,
            plays_lost_per_spread_point: 0.5,
            max_blowout_plays_lost: 4.0,
            points_per_play_base: 0.365,
            epa_to_points: 1.0,
            success_rate_weight: 55.0,
            league_avg_pass_sr: 0.46,
            league_avg_rush_sr: 0.46,
            home_field: HomeFieldParams::default(),
            injuries: InjuryParams::default(),
            weather: WeatherParams::default(),
        }
    }
}

pub fn load_params(path: &Path) -> Result<ModelParams> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read model params {}", path.display()))?;
    let params = serde_json::from_str::<ModelParams>(&raw)
        .with_context(|| format!("parse model params {}", path.display()))?;
    log::debug!("loaded model params from {}", path.display());
    Ok(params)
}

pub fn save_params(path: &Path, params: &ModelParams) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context("create params dir")?;
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(params).context("serialize model params")?;
    fs::write(&tmp, json).context("write model params")?;
    fs::rename(&tmp, path).context("swap model params")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let raw = r#"{"success_rate_weight": 40.0, "injuries": {"qb_out": -8.0}}"#;
        let params: ModelParams = serde_json::from_str(raw).unwrap();
        assert_eq!(params.success_rate_weight, 40.0);
        assert_eq!(params.injuries.qb_out, -8.0);
        assert_eq!(params.injuries.elite_receiver_out, -2.0);
        assert_eq!(params.offense_weight, 1.6);
        assert_eq!(params.blend_mode, BlendMode::GamesWeighted);
    }

    #[test]
    fn save_then_load_restores_params() {
        let dir = std::env::temp_dir().join(format!("nfl_totals_params_{}", std::process::id()));
        let path = dir.join("params.json");
        let mut params = ModelParams::default();
        params.blend_mode = BlendMode::RecencyTiers;
        params.home_field.strong = 3.0;
        save_params(&path, &params).unwrap();
        let loaded = load_params(&path).unwrap();
        assert_eq!(loaded, params);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn home_field_by_strength() {
        let home = HomeFieldParams::default();
        assert!(home.points(VenueStrength::Weak) < home.points(VenueStrength::Average));
        assert!(home.points(VenueStrength::Average) < home.points(VenueStrength::Strong));
    }
}
