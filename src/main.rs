use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};

use nfl_totals::loader::{DataSet, GamesPlayed, override_games};
use nfl_totals::model::{
    GameContext, InjuryReport, Precipitation, ProfileOverrides, Side, VenueStrength, Weather,
};
use nfl_totals::model_params::{self, ModelParams};
use nfl_totals::stat_parse::parse_stat;
use nfl_totals::{project_game, report};

const DEFAULT_WEEK: u32 = 18;
const DEFAULT_TEMP_F: f64 = 70.0;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args: Vec<String> = std::env::args().skip(1).collect();

    let log_level = if has_flag(&args, "--verbose") { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    if let Some(path) = parse_path_arg(&args, "--write-default-params") {
        model_params::save_params(&path, &ModelParams::default())?;
        println!("Wrote default model params to {}", path.display());
        return Ok(());
    }

    let params = match parse_path_arg(&args, "--params")
        .or_else(|| std::env::var("NFL_MODEL_PARAMS").ok().map(PathBuf::from))
    {
        Some(path) => model_params::load_params(&path)?,
        None => ModelParams::default(),
    };

    let data_dir = parse_path_arg(&args, "--data-dir")
        .or_else(|| std::env::var("NFL_DATA_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let data = DataSet::load_dir(&data_dir).context("load team tables")?;

    if has_flag(&args, "--list-teams") {
        for chunk in data.teams().chunks(4) {
            let row = chunk
                .iter()
                .map(|t| format!("{t:18}"))
                .collect::<Vec<_>>()
                .join("  ");
            println!("{}", row.trim_end());
        }
        return Ok(());
    }

    let team_a = parse_string_arg(&args, "--team-a").context("--team-a is required")?;
    let team_b = parse_string_arg(&args, "--team-b").context("--team-b is required")?;
    let spread = parse_arg::<f64>(&args, "--spread")?
        .context("--spread is required (negative if team A is favored)")?;

    let week = parse_arg::<u32>(&args, "--week")?.unwrap_or(DEFAULT_WEEK);
    let games_a = GamesFlags::parse(&args, "a")?;
    let games_b = GamesFlags::parse(&args, "b")?;
    let mut profile_a = data.profile(&team_a, games_a.fallback(week))?;
    let mut profile_b = data.profile(&team_b, games_b.fallback(week))?;
    override_games(&mut profile_a, games_a.season, games_a.recent);
    override_games(&mut profile_b, games_b.season, games_b.recent);

    let mut ctx = GameContext::new(profile_a.team.clone(), profile_b.team.clone(), spread);
    ctx.home = parse_home_arg(&args)?;
    ctx.venue_strength = parse_venue_arg(&args)?;
    ctx.weather = parse_weather_args(&args)?;
    ctx.injuries_a = injuries_arg(&args, "a")?;
    ctx.injuries_b = injuries_arg(&args, "b")?;
    ctx.overrides_a = overrides_arg(&args, "a")?;
    ctx.overrides_b = overrides_arg(&args, "b")?;

    let result = project_game(&profile_a, &profile_b, &ctx, &params)?;

    if has_flag(&args, "--json") {
        println!("{}", report::render_json(&result)?);
    } else {
        print!("{}", report::render_text(&result));
    }
    Ok(())
}

/// `--games-<side>` / `--recent-games-<side>`. Explicit counts win over a
/// games column in the tables.
struct GamesFlags {
    season: Option<u32>,
    recent: Option<u32>,
}

impl GamesFlags {
    fn parse(args: &[String], side: &str) -> Result<Self> {
        Ok(Self {
            season: parse_arg(args, &format!("--games-{side}"))?,
            recent: parse_arg(args, &format!("--recent-games-{side}"))?,
        })
    }

    fn fallback(&self, week: u32) -> GamesPlayed {
        match self.season {
            Some(g) => GamesPlayed::from_season(g),
            None => GamesPlayed::from_week(week),
        }
    }
}

fn injuries_arg(args: &[String], side: &str) -> Result<InjuryReport> {
    let count = |name: &str| -> Result<u8> {
        Ok(parse_arg::<u32>(args, &format!("--{name}-{side}"))?
            .map(|n| n.min(u32::from(u8::MAX)) as u8)
            .unwrap_or(0))
    };
    Ok(InjuryReport {
        qb_out: has_flag(args, &format!("--qb-out-{side}")),
        elite_receivers_out: count("wr-out")?,
        offensive_linemen_out: count("ol-out")?,
        edge_rushers_out: count("edge-out")?,
    })
}

fn overrides_arg(args: &[String], side: &str) -> Result<ProfileOverrides> {
    let def_flag = format!("--def-pass-rate-{side}");
    let def_pass_rate_allowed = match parse_string_arg(args, &def_flag) {
        None => None,
        Some(raw) => Some(
            parse_stat(&raw, true).ok_or_else(|| anyhow!("invalid value for {def_flag}: '{raw}'"))?,
        ),
    };
    Ok(ProfileOverrides {
        pace: parse_arg(args, &format!("--pace-{side}"))?,
        def_pass_rate_allowed,
    })
}

fn parse_home_arg(args: &[String]) -> Result<Option<Side>> {
    match parse_string_arg(args, "--home").as_deref().map(str::to_ascii_lowercase) {
        None => Ok(None),
        Some(v) => match v.as_str() {
            "a" => Ok(Some(Side::A)),
            "b" => Ok(Some(Side::B)),
            "neutral" | "n" => Ok(None),
            other => Err(anyhow!("unknown --home value '{other}' (use a, b or neutral)")),
        },
    }
}

fn parse_venue_arg(args: &[String]) -> Result<VenueStrength> {
    match parse_string_arg(args, "--venue").as_deref().map(str::to_ascii_lowercase) {
        None => Ok(VenueStrength::Average),
        Some(v) => match v.as_str() {
            "weak" => Ok(VenueStrength::Weak),
            "average" => Ok(VenueStrength::Average),
            "strong" => Ok(VenueStrength::Strong),
            other => Err(anyhow!(
                "unknown --venue value '{other}' (use weak, average or strong)"
            )),
        },
    }
}

fn parse_weather_args(args: &[String]) -> Result<Option<Weather>> {
    if has_flag(args, "--dome") {
        return Ok(None);
    }
    let wind = parse_arg::<f64>(args, "--wind")?;
    let temp = parse_arg::<f64>(args, "--temp")?;
    let precip = parse_string_arg(args, "--precip");
    if wind.is_none() && temp.is_none() && precip.is_none() {
        return Ok(None);
    }
    let precipitation = match precip.as_deref().map(str::to_ascii_lowercase) {
        None => Precipitation::None,
        Some(v) => match v.as_str() {
            "none" => Precipitation::None,
            "light_rain" => Precipitation::LightRain,
            "heavy_rain" => Precipitation::HeavyRain,
            "light_snow" | "snow" => Precipitation::LightSnow,
            "heavy_snow" => Precipitation::HeavySnow,
            "blizzard" => Precipitation::Blizzard,
            other => return Err(anyhow!("unknown --precip value '{other}'")),
        },
    };
    Ok(Some(Weather {
        wind_mph: wind.unwrap_or(0.0).max(0.0),
        temp_f: temp.unwrap_or(DEFAULT_TEMP_F),
        precipitation,
    }))
}

fn parse_string_arg(args: &[String], name: &str) -> Option<String> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&format!("{name}=")) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}

fn parse_path_arg(args: &[String], name: &str) -> Option<PathBuf> {
    parse_string_arg(args, name).map(PathBuf::from)
}

/// Absent flag is `Ok(None)`; a value that does not parse is an error naming
/// the flag.
fn parse_arg<T: FromStr>(args: &[String], name: &str) -> Result<Option<T>> {
    match parse_string_arg(args, name) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow!("invalid value for {name}: '{raw}'")),
    }
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|arg| arg == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn typed_flags_accept_both_forms() {
        let a = args(&["--spread", "-3.5", "--week=9"]);
        assert_eq!(parse_arg::<f64>(&a, "--spread").unwrap(), Some(-3.5));
        assert_eq!(parse_arg::<u32>(&a, "--week").unwrap(), Some(9));
        assert_eq!(parse_arg::<f64>(&a, "--wind").unwrap(), None);
    }

    #[test]
    fn malformed_values_name_the_flag() {
        let a = args(&["--spread", "abc", "--pace-a=fast"]);
        let err = parse_arg::<f64>(&a, "--spread").unwrap_err().to_string();
        assert!(err.contains("--spread") && err.contains("abc"), "{err}");
        let err = overrides_arg(&a, "a").unwrap_err().to_string();
        assert!(err.contains("--pace-a") && err.contains("fast"), "{err}");

        let a = args(&["--def-pass-rate-b", "lots"]);
        assert!(overrides_arg(&a, "b").is_err());
        let a = args(&["--def-pass-rate-b", "58%"]);
        assert_eq!(overrides_arg(&a, "b").unwrap().def_pass_rate_allowed, Some(0.58));
    }

    #[test]
    fn explicit_games_flags_are_kept_apart_from_fallback() {
        let a = args(&["--games-a", "9", "--recent-games-b=2"]);
        let ga = GamesFlags::parse(&a, "a").unwrap();
        assert_eq!(ga.season, Some(9));
        assert_eq!(ga.fallback(15), GamesPlayed::from_season(9));
        let gb = GamesFlags::parse(&a, "b").unwrap();
        assert_eq!(gb.recent, Some(2));
        assert_eq!(gb.fallback(15), GamesPlayed::from_week(15));
    }
}
