//! Loading a complete matchup directory and driving a game from it.

use hoops_core::{GameDriver, ScoutingReport};
use hoops_roster::{load_matchup, write_sample_matchup};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tempfile::TempDir;

#[test]
fn test_loaded_matchup_drives_a_full_game() {
    let dir = TempDir::new().expect("temp dir");
    write_sample_matchup(dir.path(), 42).expect("write sample");
    std::fs::write(
        dir.path().join("injuries.json"),
        r#"{"away_01": 0.8}"#,
    )
    .expect("write injuries");
    std::fs::write(
        dir.path().join("friction.json"),
        r#"{"home_03": {"interior": -0.05, "perimeter": 0.0}}"#,
    )
    .expect("write friction");

    let setup = load_matchup(dir.path()).expect("load matchup");
    let report = ScoutingReport::compile(
        setup.injuries,
        setup.friction,
        &setup.home,
        &setup.away,
    )
    .expect("generated ids match the scouting keys");
    let driver = GameDriver::new(setup.home, setup.away, setup.config, &report, 42)
        .expect("generated rosters pass validation");
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let result = driver.run(&mut rng);

    assert!(result.home.score > 40);
    assert!(result.away.score > 40);
    assert_eq!(result.home.lines.len(), 10);
}

#[test]
fn test_config_file_shapes_the_game() {
    let dir = TempDir::new().expect("temp dir");
    write_sample_matchup(dir.path(), 42).expect("write sample");
    // One-minute periods make for a very short evening.
    std::fs::write(
        dir.path().join("config.json"),
        r#"{"quarter_secs": 60, "overtime_secs": 60}"#,
    )
    .expect("write config");

    let setup = load_matchup(dir.path()).expect("load matchup");
    assert_eq!(setup.config.quarter_secs, 60);

    let driver = GameDriver::new(
        setup.home,
        setup.away,
        setup.config,
        &hoops_core::NoIntel,
        9,
    )
    .expect("valid setup");
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let result = driver.run(&mut rng);
    assert!(
        result.total_possessions < 60,
        "four 60s quarters cannot fit {} possessions",
        result.total_possessions
    );
}
