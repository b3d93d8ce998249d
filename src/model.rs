use serde::{Deserialize, Serialize};

use crate::error::{OutOfRangeWarning, clamp_unit};

/// Efficiency numbers for one unit (offense, or defense-allowed) over one window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    pub dropback_epa: f64,
    pub dropback_sr: f64,
    pub rush_epa: f64,
    pub rush_sr: f64,
}

/// One recency window (season or last five) of a team's stats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamStatSnapshot {
    pub offense: UnitStats,
    pub defense: UnitStats,
    pub games_played: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamTendencies {
    pub pass_rate: f64,
    pub proe: f64,
    #[serde(default)]
    pub pace: Option<f64>,
    #[serde(default)]
    pub def_pass_rate_allowed: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamProfile {
    pub team: String,
    pub season: TeamStatSnapshot,
    pub recent: TeamStatSnapshot,
    pub tendencies: TeamTendencies,
}

impl TeamProfile {
    /// Returns a copy with every probability-valued field forced into [0, 1].
    ///
    /// Each field that had to move produces one warning.
    pub fn clamped(&self) -> (TeamProfile, Vec<OutOfRangeWarning>) {
        let mut warnings = Vec::new();
        let team = self.team.as_str();
        let mut unit = |window: &str, side: &str, stats: UnitStats| UnitStats {
            dropback_sr: clamp_unit(
                team,
                &format!("{window}.{side}.dropback_sr"),
                stats.dropback_sr,
                &mut warnings,
            ),
            rush_sr: clamp_unit(
                team,
                &format!("{window}.{side}.rush_sr"),
                stats.rush_sr,
                &mut warnings,
            ),
            ..stats
        };
        let season = TeamStatSnapshot {
            offense: unit("season", "offense", self.season.offense),
            defense: unit("season", "defense", self.season.defense),
            ..self.season
        };
        let recent = TeamStatSnapshot {
            offense: unit("recent", "offense", self.recent.offense),
            defense: unit("recent", "defense", self.recent.defense),
            ..self.recent
        };
        let tendencies = TeamTendencies {
            pass_rate: clamp_unit(team, "pass_rate", self.tendencies.pass_rate, &mut warnings),
            def_pass_rate_allowed: self
                .tendencies
                .def_pass_rate_allowed
                .map(|v| clamp_unit(team, "def_pass_rate_allowed", v, &mut warnings)),
            ..self.tendencies
        };
        (
            TeamProfile {
                team: self.team.clone(),
                season,
                recent,
                tendencies,
            },
            warnings,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VenueStrength {
    Weak,
    #[default]
    Average,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Precipitation {
    #[default]
    None,
    LightRain,
    HeavyRain,
    LightSnow,
    HeavySnow,
    Blizzard,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub wind_mph: f64,
    pub temp_f: f64,
    #[serde(default)]
    pub precipitation: Precipitation,
}

/// Players unavailable for one team. Each unit counts as one severity step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InjuryReport {
    #[serde(default)]
    pub qb_out: bool,
    #[serde(default)]
    pub elite_receivers_out: u8,
    #[serde(default)]
    pub offensive_linemen_out: u8,
    #[serde(default)]
    pub edge_rushers_out: u8,
}

/// Caller-resolved values that take priority over a profile's own tendencies.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileOverrides {
    #[serde(default)]
    pub pace: Option<f64>,
    #[serde(default)]
    pub def_pass_rate_allowed: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameContext {
    pub team_a: String,
    pub team_b: String,
    /// Betting line from team A's side; negative means A is favored.
    pub spread: f64,
    #[serde(default)]
    pub home: Option<Side>,
    #[serde(default)]
    pub venue_strength: VenueStrength,
    #[serde(default)]
    pub weather: Option<Weather>,
    #[serde(default)]
    pub injuries_a: InjuryReport,
    #[serde(default)]
    pub injuries_b: InjuryReport,
    #[serde(default)]
    pub overrides_a: ProfileOverrides,
    #[serde(default)]
    pub overrides_b: ProfileOverrides,
}

impl GameContext {
    pub fn new(team_a: impl Into<String>, team_b: impl Into<String>, spread: f64) -> Self {
        Self {
            team_a: team_a.into(),
            team_b: team_b.into(),
            spread,
            home: None,
            venue_strength: VenueStrength::default(),
            weather: None,
            injuries_a: InjuryReport::default(),
            injuries_b: InjuryReport::default(),
            overrides_a: ProfileOverrides::default(),
            overrides_b: ProfileOverrides::default(),
        }
    }

    pub fn team(&self, side: Side) -> &str {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }

    /// The line as seen by `side`.
    pub fn spread_for(&self, side: Side) -> f64 {
        match side {
            Side::A => self.spread,
            Side::B => -self.spread,
        }
    }

    pub fn injuries(&self, side: Side) -> &InjuryReport {
        match side {
            Side::A => &self.injuries_a,
            Side::B => &self.injuries_b,
        }
    }

    pub fn overrides(&self, side: Side) -> &ProfileOverrides {
        match side {
            Side::A => &self.overrides_a,
            Side::B => &self.overrides_b,
        }
    }

    pub fn is_home(&self, side: Side) -> bool {
        self.home == Some(side)
    }
}

/// Per-team breakdown of how the projected points were assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamProjection {
    pub team: String,
    pub expected_pass_rate: f64,
    pub expected_plays: f64,
    pub pass_attempts: f64,
    pub matchup_epa: f64,
    pub success_rate: f64,
    pub raw_points: f64,
    pub success_rate_tilt: f64,
    pub home_field: f64,
    pub injury_delta: f64,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub team_a: TeamProjection,
    pub team_b: TeamProjection,
    pub team_a_points: f64,
    pub team_b_points: f64,
    pub weather_penalty: f64,
    pub total: f64,
    #[serde(default)]
    pub warnings: Vec<OutOfRangeWarning>,
}

impl ProjectionResult {
    pub fn base_total(&self) -> f64 {
        self.team_a_points + self.team_b_points
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn unit(epa: f64, sr: f64) -> UnitStats {
        UnitStats {
            dropback_epa: epa,
            dropback_sr: sr,
            rush_epa: epa / 2.0,
            rush_sr: sr - 0.03,
        }
    }

    pub fn profile(team: &str) -> TeamProfile {
        TeamProfile {
            team: team.to_string(),
            season: TeamStatSnapshot {
                offense: unit(0.10, 0.47),
                defense: unit(0.02, 0.45),
                games_played: 12,
            },
            recent: TeamStatSnapshot {
                offense: unit(0.14, 0.49),
                defense: unit(0.00, 0.44),
                games_played: 5,
            },
            tendencies: TeamTendencies {
                pass_rate: 0.58,
                proe: 0.02,
                pace: Some(63.0),
                def_pass_rate_allowed: Some(0.60),
            },
        }
    }
}
