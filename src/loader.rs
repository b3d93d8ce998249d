use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::model::{TeamProfile, TeamStatSnapshot, TeamTendencies, UnitStats};
use crate::stat_parse::parse_stat;

pub const TEAM_COLUMNS: &[&str] = &["Team", "team", "Abbr", "abbr"];

const PASS_RATE_COLUMNS: &[&str] = &["Pass Rate", "pass_rate"];
const PROE_COLUMNS: &[&str] = &["PROE", "proe"];
const PACE_COLUMNS: &[&str] = &["Pace", "pace"];
const DEF_PASS_RATE_COLUMNS: &[&str] = &["Opp Pass Rate", "opp_pass_rate", "Def Pass Rate Against"];

const DROPBACK_EPA_COLUMNS: &[&str] = &["Dropback EPA", "dropback_epa", "Dropback", "dropback"];
const DROPBACK_SR_COLUMNS: &[&str] = &[
    "Dropback SR",
    "dropback_sr",
    "Success R Dropback",
    "Dropback Success Rate",
];
const RUSH_EPA_COLUMNS: &[&str] = &["Rush EPA", "rush_epa", "Rush", "rush"];
const RUSH_SR_COLUMNS: &[&str] = &["Rush SR", "rush_sr", "Rush Success Rate"];
const GAMES_COLUMNS: &[&str] = &["Games", "games", "G", "GP"];

const TEAM_ALIASES: &[(&str, &str)] = &[("LA", "LAR"), ("WSH", "WAS")];

pub const TENDENCIES_FILE: &str = "pass.csv";
pub const OFFENSE_SEASON_FILE: &str = "oszn.csv";
pub const OFFENSE_RECENT_FILE: &str = "ol5.csv";
pub const DEFENSE_SEASON_FILE: &str = "dszn.csv";
pub const DEFENSE_RECENT_FILE: &str = "dl5.csv";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TendencyRow {
    pub pass_rate: Option<f64>,
    pub proe: Option<f64>,
    pub pace: Option<f64>,
    pub def_pass_rate_allowed: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatRow {
    pub dropback_epa: Option<f64>,
    pub dropback_sr: Option<f64>,
    pub rush_epa: Option<f64>,
    pub rush_sr: Option<f64>,
    pub games: Option<u32>,
}

/// Games each window covers when the tables carry no games column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamesPlayed {
    pub season: u32,
    pub recent: u32,
}

impl GamesPlayed {
    /// Season games from the current week; the recent window covers at most
    /// five of them.
    pub fn from_week(week: u32) -> Self {
        Self::from_season(week.saturating_sub(1))
    }

    pub fn from_season(season: u32) -> Self {
        let season = season.min(17);
        Self {
            season,
            recent: season.min(5),
        }
    }
}

/// Trims, upper-cases and applies abbreviation aliases.
pub fn canonical_team(raw: &str) -> String {
    let upper = raw.trim().to_ascii_uppercase();
    TEAM_ALIASES
        .iter()
        .find(|(from, _)| *from == upper)
        .map(|(_, to)| (*to).to_string())
        .unwrap_or(upper)
}

struct Columns {
    headers: csv::StringRecord,
}

impl Columns {
    fn find(&self, aliases: &[&str]) -> Vec<usize> {
        aliases
            .iter()
            .filter_map(|alias| self.headers.iter().position(|h| h.trim() == *alias))
            .collect()
    }
}

/// First non-blank cell among the alias columns, in alias order.
fn cell<'r>(record: &'r csv::StringRecord, idx: &[usize]) -> Option<&'r str> {
    idx.iter()
        .filter_map(|i| record.get(*i))
        .map(str::trim)
        .find(|v| !v.is_empty())
}

/// First alias cell that parses, so a garbage cell does not hide a good one.
fn stat(record: &csv::StringRecord, idx: &[usize], is_percentage: bool) -> Option<f64> {
    idx.iter()
        .filter_map(|i| record.get(*i))
        .find_map(|raw| parse_stat(raw, is_percentage))
}

fn read_team_table<R, T, F>(rdr: R, mut parse_row: F) -> Result<HashMap<String, T>>
where
    R: Read,
    F: FnMut(&Columns, &csv::StringRecord) -> T,
{
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let columns = Columns {
        headers: reader.headers().context("read csv headers")?.clone(),
    };
    let team_idx = columns.find(TEAM_COLUMNS);
    if team_idx.is_empty() {
        return Err(anyhow!("no team column (expected one of {TEAM_COLUMNS:?})"));
    }

    let mut out = HashMap::new();
    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(err) => {
                log::warn!("skipping malformed row {}: {err}", line + 2);
                continue;
            }
        };
        let Some(raw_team) = cell(&record, &team_idx) else {
            continue;
        };
        let team = canonical_team(raw_team);
        // Some exports repeat the header row mid-file.
        if team == "TEAM" {
            continue;
        }
        if out.contains_key(&team) {
            log::warn!("duplicate row for {team}, using latest");
        }
        out.insert(team, parse_row(&columns, &record));
    }
    Ok(out)
}

pub fn read_tendencies<R: Read>(rdr: R) -> Result<HashMap<String, TendencyRow>> {
    read_team_table(rdr, |cols, record| TendencyRow {
        pass_rate: stat(record, &cols.find(PASS_RATE_COLUMNS), true),
        proe: stat(record, &cols.find(PROE_COLUMNS), true),
        pace: stat(record, &cols.find(PACE_COLUMNS), false),
        def_pass_rate_allowed: stat(record, &cols.find(DEF_PASS_RATE_COLUMNS), true),
    })
}

pub fn read_stats<R: Read>(rdr: R) -> Result<HashMap<String, StatRow>> {
    read_team_table(rdr, |cols, record| StatRow {
        dropback_epa: stat(record, &cols.find(DROPBACK_EPA_COLUMNS), false),
        dropback_sr: stat(record, &cols.find(DROPBACK_SR_COLUMNS), true),
        rush_epa: stat(record, &cols.find(RUSH_EPA_COLUMNS), false),
        rush_sr: stat(record, &cols.find(RUSH_SR_COLUMNS), true),
        games: cell(record, &cols.find(GAMES_COLUMNS)).and_then(|g| g.parse::<u32>().ok()),
    })
}

pub fn load_tendencies(path: &Path) -> Result<HashMap<String, TendencyRow>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    read_tendencies(file).with_context(|| format!("load tendencies {}", path.display()))
}

pub fn load_stats(path: &Path) -> Result<HashMap<String, StatRow>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    read_stats(file).with_context(|| format!("load stats {}", path.display()))
}

/// The five source tables, keyed by canonical team abbreviation.
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    pub tendencies: HashMap<String, TendencyRow>,
    pub offense_season: HashMap<String, StatRow>,
    pub offense_recent: HashMap<String, StatRow>,
    pub defense_season: HashMap<String, StatRow>,
    pub defense_recent: HashMap<String, StatRow>,
}

impl DataSet {
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let path = |name: &str| -> PathBuf { dir.join(name) };
        let data = Self {
            tendencies: load_tendencies(&path(TENDENCIES_FILE))?,
            offense_season: load_stats(&path(OFFENSE_SEASON_FILE))?,
            offense_recent: load_stats(&path(OFFENSE_RECENT_FILE))?,
            defense_season: load_stats(&path(DEFENSE_SEASON_FILE))?,
            defense_recent: load_stats(&path(DEFENSE_RECENT_FILE))?,
        };
        log::info!(
            "loaded {} teams from {}",
            data.tendencies.len(),
            dir.display()
        );
        Ok(data)
    }

    pub fn teams(&self) -> Vec<String> {
        let mut teams: Vec<String> = self.tendencies.keys().cloned().collect();
        teams.sort();
        teams
    }

    /// Merges every table for `team` into one profile. A games column in the
    /// stat tables wins over `games`.
    pub fn profile(&self, team: &str, games: GamesPlayed) -> Result<TeamProfile> {
        let team = canonical_team(team);
        let Some(tend) = self.tendencies.get(&team) else {
            return Err(anyhow!(
                "unknown team {team} (available: {})",
                self.teams().join(", ")
            ));
        };

        let off_s = lookup(&self.offense_season, &team, "offense season")?;
        let off_r = lookup(&self.offense_recent, &team, "offense last 5")?;
        let def_s = lookup(&self.defense_season, &team, "defense season")?;
        let def_r = lookup(&self.defense_recent, &team, "defense last 5")?;

        let season = TeamStatSnapshot {
            offense: unit(off_s, &team, "offense season")?,
            defense: unit(def_s, &team, "defense season")?,
            games_played: off_s.games.or(def_s.games).unwrap_or(games.season),
        };
        let recent = TeamStatSnapshot {
            offense: unit(off_r, &team, "offense last 5")?,
            defense: unit(def_r, &team, "defense last 5")?,
            games_played: off_r.games.or(def_r.games).unwrap_or(games.recent),
        };
        let tendencies = TeamTendencies {
            pass_rate: require(tend.pass_rate, &team, "tendencies", "pass rate")?,
            proe: require(tend.proe, &team, "tendencies", "PROE")?,
            pace: tend.pace,
            def_pass_rate_allowed: tend.def_pass_rate_allowed,
        };

        Ok(TeamProfile {
            team,
            season,
            recent,
            tendencies,
        })
    }
}

/// Applies games counts given explicitly by the caller. These win over a games
/// column in the tables; a disagreement is logged.
pub fn override_games(profile: &mut TeamProfile, season: Option<u32>, recent: Option<u32>) {
    let team = profile.team.clone();
    for (window, slot, value) in [
        ("season", &mut profile.season.games_played, season),
        ("recent", &mut profile.recent.games_played, recent),
    ] {
        let Some(games) = value else {
            continue;
        };
        if *slot != games {
            log::info!("{team}: using {games} {window} games instead of {slot} from the tables");
        }
        *slot = games;
    }
}

fn lookup<'a>(table: &'a HashMap<String, StatRow>, team: &str, name: &str) -> Result<&'a StatRow> {
    table
        .get(team)
        .ok_or_else(|| anyhow!("{team} missing from {name} table"))
}

fn require(value: Option<f64>, team: &str, table: &str, field: &str) -> Result<f64> {
    value.ok_or_else(|| anyhow!("{team}: {field} missing in {table} table"))
}

fn unit(row: &StatRow, team: &str, table: &str) -> Result<UnitStats> {
    Ok(UnitStats {
        dropback_epa: require(row.dropback_epa, team, table, "dropback EPA")?,
        dropback_sr: require(row.dropback_sr, team, table, "dropback SR")?,
        rush_epa: require(row.rush_epa, team, table, "rush EPA")?,
        rush_sr: require(row.rush_sr, team, table, "rush SR")?,
    })
}
