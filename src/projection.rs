use crate::blend::{BlendedMetrics, blend_profile};
use crate::error::{OutOfRangeWarning, Result, clamp_range, clamp_unit};
use crate::model::{GameContext, ProjectionResult, Side, TeamProfile, TeamProjection};
use crate::model_params::ModelParams;
use crate::rate_volume;
use crate::scorer::{self, ScoringInputs};
use crate::weather::weather_penalty;

/// Projects one matchup. `team_a` / `team_b` line up with `ctx.team_a` /
/// `ctx.team_b`.
///
/// Fatal input problems abort the whole projection; out-of-range
/// probabilities are clamped and listed in `warnings`.
pub fn project_game(
    team_a: &TeamProfile,
    team_b: &TeamProfile,
    ctx: &GameContext,
    params: &ModelParams,
) -> Result<ProjectionResult> {
    let (team_a, mut warnings) = team_a.clamped();
    let (team_b, warnings_b) = team_b.clamped();
    warnings.extend(warnings_b);

    let blended_a = blend_profile(&team_a, params.blend_mode)?;
    let blended_b = blend_profile(&team_b, params.blend_mode)?;

    let sides = Sides {
        a: (&team_a, &blended_a),
        b: (&team_b, &blended_b),
    };
    let proj_a = project_side(Side::A, &sides, ctx, params, &mut warnings)?;
    let proj_b = project_side(Side::B, &sides, ctx, params, &mut warnings)?;

    let penalty = weather_penalty(ctx.weather.as_ref(), &params.weather);
    let team_a_points = proj_a.points;
    let team_b_points = proj_b.points;
    let total = team_a_points + team_b_points - penalty;

    log::info!(
        "{} {:.2} - {} {:.2}, weather -{:.1}, total {:.2}",
        proj_a.team,
        team_a_points,
        proj_b.team,
        team_b_points,
        penalty,
        total
    );

    Ok(ProjectionResult {
        team_a: proj_a,
        team_b: proj_b,
        team_a_points,
        team_b_points,
        weather_penalty: penalty,
        total,
        warnings,
    })
}

struct Sides<'a> {
    a: (&'a TeamProfile, &'a BlendedMetrics),
    b: (&'a TeamProfile, &'a BlendedMetrics),
}

impl<'a> Sides<'a> {
    fn get(&self, side: Side) -> (&'a TeamProfile, &'a BlendedMetrics) {
        match side {
            Side::A => self.a,
            Side::B => self.b,
        }
    }
}

fn project_side(
    side: Side,
    sides: &Sides<'_>,
    ctx: &GameContext,
    params: &ModelParams,
    warnings: &mut Vec<OutOfRangeWarning>,
) -> Result<TeamProjection> {
    let (profile, blended) = sides.get(side);
    let (opp_profile, opp_blended) = sides.get(side.other());
    let spread = ctx.spread_for(side);

    let pace = rate_volume::resolve_pace(profile, ctx.overrides(side))?;
    let opp_pace = rate_volume::resolve_pace(opp_profile, ctx.overrides(side.other()))?;
    let opp_def_pass_rate =
        rate_volume::resolve_def_pass_rate_allowed(opp_profile, ctx.overrides(side.other()))?;
    // Overrides bypass the profile clamp, so check them here too.
    let opp_def_pass_rate = clamp_unit(
        &opp_profile.team,
        "def_pass_rate_allowed",
        opp_def_pass_rate,
        warnings,
    );

    let limit = params.max_abs_proe.abs();
    let proe = clamp_range(
        &profile.team,
        "proe",
        profile.tendencies.proe,
        -limit,
        limit,
        warnings,
    );

    let expected_pass_rate = rate_volume::expected_pass_rate(
        &profile.team,
        profile.tendencies.pass_rate,
        proe,
        opp_def_pass_rate,
        spread,
        params,
        warnings,
    );
    let expected_plays = rate_volume::expected_plays(pace, opp_pace, spread, params);

    let home_field = if ctx.is_home(side) {
        params.home_field.points(ctx.venue_strength)
    } else {
        0.0
    };
    let injury_delta = scorer::injury_delta(
        ctx.injuries(side),
        ctx.injuries(side.other()),
        &params.injuries,
    );

    let inputs = ScoringInputs {
        team: *blended,
        opponent: *opp_blended,
        expected_pass_rate,
        expected_plays,
        home_field,
        injury_delta,
    };
    Ok(scorer::score_team(&profile.team, &inputs, params))
}
