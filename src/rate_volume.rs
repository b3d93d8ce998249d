use crate::error::{OutOfRangeWarning, ProjectionError, Result, clamp_unit, record};
use crate::model::{ProfileOverrides, TeamProfile};
use crate::model_params::ModelParams;

const PASS_RATE_FIELD: &str = "expected_pass_rate";

/// Pass-rate nudge from the betting line. Underdogs (positive line) expect to
/// trail and throw more; the nudge is capped so blowouts cannot dominate.
pub fn script_adjustment(spread: f64, params: &ModelParams) -> f64 {
    let cap = params.script_cap.abs();
    (spread * params.script_slope).clamp(-cap, cap)
}

/// Team pass rate plus PROE, the opponent's pass-rate-allowed delta and the
/// script nudge, clamped to [0, 1]. A clamp or NaN fallback is recorded in
/// `warnings` under `expected_pass_rate`.
pub fn expected_pass_rate(
    team: &str,
    team_pass_rate: f64,
    team_proe: f64,
    opp_def_pass_rate_allowed: f64,
    spread: f64,
    params: &ModelParams,
    warnings: &mut Vec<OutOfRangeWarning>,
) -> f64 {
    let base = team_pass_rate + team_proe;
    let def_adj = opp_def_pass_rate_allowed - params.league_avg_pass_rate_allowed;
    let rate = base + def_adj + script_adjustment(spread, params);
    if rate.is_nan() {
        let fallback = params.league_avg_pass_rate_allowed.clamp(0.0, 1.0);
        record(team, PASS_RATE_FIELD, rate, fallback, warnings);
        return fallback;
    }
    clamp_unit(team, PASS_RATE_FIELD, rate, warnings)
}

/// Play-volume change from the size of the line. Close games run extra plays,
/// lopsided ones bleed clock; the direction is fewer plays as |spread| grows.
pub fn spread_plays_adjustment(spread: f64, params: &ModelParams) -> f64 {
    let bonus = params.close_game_plays_bonus;
    let adj = bonus - params.plays_lost_per_spread_point * spread.abs();
    adj.clamp(-params.max_blowout_plays_lost.abs(), bonus)
}

pub fn expected_plays(team_pace: f64, opp_pace: f64, spread: f64, params: &ModelParams) -> f64 {
    (team_pace + opp_pace) / 2.0 + spread_plays_adjustment(spread, params)
}

/// Pace with the override applied, or `MissingInput` if nothing usable exists.
pub fn resolve_pace(profile: &TeamProfile, overrides: &ProfileOverrides) -> Result<f64> {
    let pace = overrides.pace.or(profile.tendencies.pace);
    match pace {
        Some(p) if p.is_finite() && p > 0.0 => Ok(p),
        _ => Err(ProjectionError::MissingInput {
            team: profile.team.clone(),
            field: "pace",
        }),
    }
}

pub fn resolve_def_pass_rate_allowed(
    profile: &TeamProfile,
    overrides: &ProfileOverrides,
) -> Result<f64> {
    match overrides
        .def_pass_rate_allowed
        .or(profile.tendencies.def_pass_rate_allowed)
    {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(ProjectionError::MissingInput {
            team: profile.team.clone(),
            field: "def_pass_rate_allowed",
        }),
    }
}
