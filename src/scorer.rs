use serde::{Deserialize, Serialize};

use crate::blend::BlendedMetrics;
use crate::model::{InjuryReport, TeamProjection};
use crate::model_params::{InjuryParams, ModelParams};

/// Offense/defense-allowed blend using the configured weights.
pub fn net_value(offense: f64, defense_allowed: f64, params: &ModelParams) -> f64 {
    let total = params.offense_weight + params.defense_weight;
    (offense * params.offense_weight + defense_allowed * params.defense_weight) / total
}

pub fn raw_points(matchup_epa: f64, expected_plays: f64, params: &ModelParams) -> f64 {
    (params.points_per_play_base + params.epa_to_points * matchup_epa) * expected_plays
}

pub fn success_rate_tilt(
    pass_rate: f64,
    pass_sr: f64,
    rush_sr: f64,
    params: &ModelParams,
) -> f64 {
    let pass_diff = pass_sr - params.league_avg_pass_sr;
    let rush_diff = rush_sr - params.league_avg_rush_sr;
    params.success_rate_weight * (pass_rate * pass_diff + (1.0 - pass_rate) * rush_diff)
}

/// Point delta from one team's own absences plus the opposing defense's
/// missing EDGE rushers.
pub fn injury_delta(own: &InjuryReport, opponent: &InjuryReport, params: &InjuryParams) -> f64 {
    let mut delta = 0.0;
    if own.qb_out {
        delta += params.qb_out;
    }
    delta += f64::from(own.elite_receivers_out) * params.elite_receiver_out;
    delta += f64::from(own.offensive_linemen_out) * params.offensive_lineman_out;
    delta += f64::from(opponent.edge_rushers_out) * params.opponent_edge_out;
    delta
}

/// Everything the scorer needs about one side of the matchup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringInputs {
    pub team: BlendedMetrics,
    pub opponent: BlendedMetrics,
    pub expected_pass_rate: f64,
    pub expected_plays: f64,
    pub home_field: f64,
    pub injury_delta: f64,
}

/// Raw EPA points, success-rate tilt, home field and injuries, summed in that
/// order. The result is not floored.
pub fn score_team(team: &str, inputs: &ScoringInputs, params: &ModelParams) -> TeamProjection {
    let pr = inputs.expected_pass_rate;
    let off = &inputs.team.offense;
    let def = &inputs.opponent.defense;

    let net_pass_epa = net_value(off.dropback_epa, def.dropback_epa, params);
    let net_rush_epa = net_value(off.rush_epa, def.rush_epa, params);
    let matchup_epa = pr * net_pass_epa + (1.0 - pr) * net_rush_epa;

    let raw = raw_points(matchup_epa, inputs.expected_plays, params);

    let net_pass_sr = net_value(off.dropback_sr, def.dropback_sr, params);
    let net_rush_sr = net_value(off.rush_sr, def.rush_sr, params);
    let tilt = success_rate_tilt(pr, net_pass_sr, net_rush_sr, params);
    let success_rate = pr * net_pass_sr + (1.0 - pr) * net_rush_sr;

    let points = raw + tilt + inputs.home_field + inputs.injury_delta;
    log::debug!(
        "{team}: epa={matchup_epa:.4} raw={raw:.2} tilt={tilt:+.2} home={:+.2} inj={:+.2} pts={points:.2}",
        inputs.home_field,
        inputs.injury_delta
    );

    TeamProjection {
        team: team.to_string(),
        expected_pass_rate: pr,
        expected_plays: inputs.expected_plays,
        pass_attempts: pr * inputs.expected_plays,
        matchup_epa,
        success_rate,
        raw_points: raw,
        success_rate_tilt: tilt,
        home_field: inputs.home_field,
        injury_delta: inputs.injury_delta,
        points,
    }
}
