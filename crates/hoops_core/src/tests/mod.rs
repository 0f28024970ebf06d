//! Crate-level test suites: determinism, invariants, and the named
//! matchup scenarios.

use crate::test_fixtures::{base_config, base_rosters, uniform_rosters};
use crate::{GameDriver, MatchupIntel, NoIntel, SimConfig, SimulationResult};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

mod scenarios;

// --- Shared helpers ---------------------------------------------------------

fn run_game(seed: u64) -> SimulationResult {
    run_game_with(&NoIntel, seed)
}

fn run_game_with(intel: &dyn MatchupIntel, seed: u64) -> SimulationResult {
    let (home, away) = base_rosters();
    run_matchup(home, away, base_config(), intel, seed)
}

fn run_uniform(seed: u64) -> SimulationResult {
    let (home, away) = uniform_rosters();
    run_matchup(home, away, base_config(), &NoIntel, seed)
}

fn run_matchup(
    home: crate::Roster,
    away: crate::Roster,
    config: SimConfig,
    intel: &dyn MatchupIntel,
    seed: u64,
) -> SimulationResult {
    let driver =
        GameDriver::new(home, away, config, intel, seed).expect("test inputs are valid");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    driver.run(&mut rng)
}

/// Sum of a stat across the bench (everyone outside the starting five).
fn bench_seconds(team: &crate::TeamBoxScore) -> u32 {
    team.lines.iter().skip(5).map(|l| l.seconds_played).sum()
}

#[test]
fn test_full_game_smoke() {
    let result = run_game(11);
    assert!(result.home.score > 0);
    assert!(result.away.score > 0);
    assert!(result.total_possessions > 0);
    if result.home.score == result.away.score {
        assert!(
            result
                .anomalies
                .iter()
                .any(|a| matches!(a, crate::Anomaly::OvertimeCapReached { .. })),
            "a standing tie is only legal past the overtime cap"
        );
    }
}
