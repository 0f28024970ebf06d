//! Shared fixtures for hoops_core tests and downstream crates.
//!
//! `base_rosters()` is a ten-man depth chart per side with every archetype
//! represented; `uniform_rosters()` strips all asymmetry for bias checks.
//! Values are fixed, not generated, so tests are deterministic.

use crate::{
    Archetype, GameClock, GameState, PlayerId, PlayerRecord, PlayerState, Roster, Side, SimConfig,
    TeamId, TeamState,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

fn player(
    id: &str,
    name: &str,
    archetype: Archetype,
    two_point_pct: f32,
    three_point_pct: f32,
    usage_rate: f32,
) -> PlayerRecord {
    PlayerRecord {
        id: PlayerId(id.into()),
        name: name.into(),
        archetype,
        two_point_pct,
        three_point_pct,
        usage_rate,
    }
}

/// Two realistic ten-man rosters. Usage sums to 1.0 on each side; the
/// starting five covers all archetypes in depth-chart order.
pub fn base_rosters() -> (Roster, Roster) {
    let home = Roster {
        team_id: TeamId("hawks".into()),
        name: "Ridgeline Hawks".into(),
        players: vec![
            player("hawk_01", "Avery Cole", Archetype::Scorer, 0.52, 0.37, 0.26),
            player("hawk_02", "Marcus Webb", Archetype::Playmaker, 0.48, 0.36, 0.20),
            player("hawk_03", "Dmitri Volkov", Archetype::RimProtector, 0.62, 0.22, 0.12),
            player("hawk_04", "Jalen Price", Archetype::Slasher, 0.55, 0.28, 0.16),
            player("hawk_05", "Theo Mancini", Archetype::Balanced, 0.50, 0.34, 0.11),
            player("hawk_06", "Sam Okafor", Archetype::Balanced, 0.47, 0.33, 0.03),
            player("hawk_07", "Luca Moretti", Archetype::Scorer, 0.48, 0.35, 0.03),
            player("hawk_08", "Andre Gibson", Archetype::Slasher, 0.52, 0.25, 0.03),
            player("hawk_09", "Petr Novak", Archetype::RimProtector, 0.58, 0.20, 0.03),
            player("hawk_10", "Desmond Hale", Archetype::Playmaker, 0.44, 0.33, 0.03),
        ],
    };
    let away = Roster {
        team_id: TeamId("gulls".into()),
        name: "Harbor City Gulls".into(),
        players: vec![
            player("gull_01", "Darius King", Archetype::Scorer, 0.51, 0.38, 0.27),
            player("gull_02", "Tomas Reyes", Archetype::Playmaker, 0.47, 0.37, 0.19),
            player("gull_03", "Kofi Mensah", Archetype::RimProtector, 0.63, 0.21, 0.11),
            player("gull_04", "Ryo Tanaka", Archetype::Slasher, 0.54, 0.29, 0.17),
            player("gull_05", "Eli Thompson", Archetype::Balanced, 0.49, 0.35, 0.11),
            player("gull_06", "Victor Osei", Archetype::Balanced, 0.46, 0.32, 0.03),
            player("gull_07", "Jonas Berg", Archetype::Scorer, 0.47, 0.34, 0.03),
            player("gull_08", "Milan Kovac", Archetype::Slasher, 0.51, 0.26, 0.03),
            player("gull_09", "Owen Gallagher", Archetype::RimProtector, 0.57, 0.19, 0.03),
            player("gull_10", "Andrej Saric", Archetype::Playmaker, 0.45, 0.34, 0.03),
        ],
    };
    (home, away)
}

/// Five identical Balanced players per side with equal usage. Any scoring
/// gap between these teams is pure draw noise.
pub fn uniform_rosters() -> (Roster, Roster) {
    let build = |team_id: &str, name: &str, prefix: &str| Roster {
        team_id: TeamId(team_id.into()),
        name: name.into(),
        players: (1..=5)
            .map(|n| {
                player(
                    &format!("{prefix}_{n:02}"),
                    &format!("{name} {n}"),
                    Archetype::Balanced,
                    0.50,
                    0.35,
                    0.20,
                )
            })
            .collect(),
    };
    (
        build("mirror_a", "Mirror A", "ma"),
        build("mirror_b", "Mirror B", "mb"),
    )
}

pub fn base_config() -> SimConfig {
    SimConfig::default()
}

fn build_team(roster: Roster) -> TeamState {
    let players: Vec<PlayerState> = roster
        .players
        .into_iter()
        .map(|record| PlayerState::fresh(record, 1.0))
        .collect();
    let on_court = (0..players.len().min(5)).collect();
    TeamState {
        id: roster.team_id,
        name: roster.name,
        players,
        on_court,
        score: 0,
    }
}

/// Game state at the opening tip over the base rosters, everyone healthy.
pub fn base_state() -> GameState {
    let (home, away) = base_rosters();
    GameState {
        game_id: Uuid::nil(),
        seed: 42,
        clock: GameClock {
            period: 1,
            seconds_remaining: base_config().quarter_secs,
            home_possessions: 0,
            away_possessions: 0,
        },
        home: build_team(home),
        away: build_team(away),
        offense: Side::Home,
        clutch_active: false,
        blowout_triggered: false,
        possession_count: 0,
        friction_log: Vec::new(),
        anomalies: Vec::new(),
    }
}

/// Deterministic RNG for tests. Fixed seed so assertions are stable.
pub fn make_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}
