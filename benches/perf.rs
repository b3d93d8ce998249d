use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use nfl_totals::loader::{read_stats, read_tendencies};
use nfl_totals::model::{
    GameContext, Precipitation, Side, TeamStatSnapshot, TeamTendencies, UnitStats, Weather,
};
use nfl_totals::stat_parse::parse_stat;
use nfl_totals::{ModelParams, TeamProfile, project_game};

fn sample_profile(name: &str, offense_epa: f64, defense_epa: f64) -> TeamProfile {
    let unit = |epa: f64, sr: f64| UnitStats {
        dropback_epa: epa,
        dropback_sr: sr,
        rush_epa: epa / 2.0,
        rush_sr: sr - 0.03,
    };
    TeamProfile {
        team: name.to_string(),
        season: TeamStatSnapshot {
            offense: unit(offense_epa, 0.47),
            defense: unit(defense_epa, 0.45),
            games_played: 12,
        },
        recent: TeamStatSnapshot {
            offense: unit(offense_epa + 0.03, 0.48),
            defense: unit(defense_epa - 0.01, 0.44),
            games_played: 5,
        },
        tendencies: TeamTendencies {
            pass_rate: 0.59,
            proe: 0.02,
            pace: Some(63.5),
            def_pass_rate_allowed: Some(0.60),
        },
    }
}

fn bench_project_game(c: &mut Criterion) {
    let params = ModelParams::default();
    let a = sample_profile("KC", 0.16, 0.01);
    let b = sample_profile("BUF", 0.19, -0.02);
    let mut ctx = GameContext::new("KC", "BUF", 2.5);
    ctx.home = Some(Side::B);
    ctx.weather = Some(Weather {
        wind_mph: 16.0,
        temp_f: 28.0,
        precipitation: Precipitation::LightSnow,
    });

    c.bench_function("project_game", |bench| {
        bench.iter(|| {
            let out = project_game(black_box(&a), black_box(&b), &ctx, &params).unwrap();
            black_box(out.total);
        })
    });
}

fn bench_parse_stat(c: &mut Criterion) {
    let cells = ["48.5%", "0.47", "61", "-0.03", "", "N/A", "+1.2%", "1,024"];
    c.bench_function("parse_stat", |bench| {
        bench.iter(|| {
            for raw in cells {
                black_box(parse_stat(black_box(raw), true));
            }
        })
    });
}

fn bench_table_load(c: &mut Criterion) {
    c.bench_function("read_stats", |bench| {
        bench.iter(|| {
            let rows = read_stats(black_box(OFFENSE_CSV.as_bytes())).unwrap();
            black_box(rows.len());
        })
    });
    c.bench_function("read_tendencies", |bench| {
        bench.iter(|| {
            let rows = read_tendencies(black_box(TENDENCIES_CSV.as_bytes())).unwrap();
            black_box(rows.len());
        })
    });
}

criterion_group!(perf, bench_project_game, bench_parse_stat, bench_table_load);
criterion_main!(perf);

static OFFENSE_CSV: &str = include_str!("../tests/fixtures/nfl/oszn.csv");
static TENDENCIES_CSV: &str = include_str!("../tests/fixtures/nfl/pass.csv");
