//! Matchup scenarios: symmetry, injuries, friction, and the blowout valve.

use super::{bench_seconds, run_game, run_game_with, run_matchup, run_uniform};
use crate::test_fixtures::{base_config, base_rosters};
use crate::{PlayerId, Roster, ScoutingReport, ShotClass, Side, ZoneDeltas};

/// Mirror-image five-man rosters must show no systematic home edge.
#[test]
fn test_symmetric_rosters_produce_no_bias() {
    let seeds = 0..64;
    let mut margin_sum = 0.0f64;
    let mut home_wins = 0u32;
    let mut away_wins = 0u32;
    for seed in seeds {
        let result = run_uniform(seed);
        margin_sum += f64::from(result.home.score) - f64::from(result.away.score);
        match result.winner() {
            Some(Side::Home) => home_wins += 1,
            Some(Side::Away) => away_wins += 1,
            None => {}
        }
    }
    let mean_margin = margin_sum / 64.0;
    // Per-game margins swing by a dozen points, so the band stays loose;
    // a true engine bias would push the mean far outside it.
    assert!(
        mean_margin.abs() < 8.0,
        "mean margin {mean_margin:.2} suggests a structural bias"
    );
    assert!(home_wins > 0 && away_wins > 0, "both mirrors must win games");
}

/// A 0.5 injury multiplier has to show up as a lower scoring rate.
#[test]
fn test_injury_multiplier_suppresses_scoring_rate() {
    let star = PlayerId("hawk_01".into());
    let mut healthy_points = 0u32;
    let mut healthy_seconds = 0u32;
    let mut injured_points = 0u32;
    let mut injured_seconds = 0u32;

    for seed in 0..16 {
        let healthy = run_game(seed);
        let line = &healthy.home.lines[0];
        assert_eq!(line.player, star);
        healthy_points += line.points;
        healthy_seconds += line.seconds_played;

        let (home, away) = base_rosters();
        let report = ScoutingReport::compile(vec![(star.clone(), 0.5)], Vec::new(), &home, &away)
            .expect("valid report");
        let injured = run_game_with(&report, seed);
        let line = &injured.home.lines[0];
        injured_points += line.points;
        injured_seconds += line.seconds_played;
    }

    let healthy_rate = f64::from(healthy_points) / f64::from(healthy_seconds.max(1));
    let injured_rate = f64::from(injured_points) / f64::from(injured_seconds.max(1));
    assert!(
        injured_rate < healthy_rate * 0.8,
        "halving the multiplier must cut the rate: {injured_rate:.4} vs {healthy_rate:.4}"
    );
}

/// A negative interior delta must surface in the friction log for every
/// attempt that defender absorbs.
#[test]
fn test_interior_friction_shows_in_the_log() {
    let (home, away) = base_rosters();
    let anchor = PlayerId("gull_03".into());
    let report = ScoutingReport::compile(
        Vec::new(),
        vec![(
            anchor.clone(),
            ZoneDeltas {
                interior: -0.15,
                perimeter: 0.0,
            },
        )],
        &home,
        &away,
    )
    .expect("valid report");

    let result = run_game_with(&report, 42);
    let contested: Vec<_> = result
        .friction_log
        .iter()
        .filter(|e| e.defender.as_ref() == Some(&anchor) && e.shot_class == ShotClass::TwoPoint)
        .collect();
    assert!(
        !contested.is_empty(),
        "the rim protector must absorb interior attempts"
    );
    for entry in contested {
        // -0.15 outweighs the maximum momentum plus clutch bonus (0.09).
        assert!(
            entry.adjusted_pct < entry.original_pct,
            "possession {}: {} not lowered from {}",
            entry.possession,
            entry.adjusted_pct,
            entry.original_pct
        );
    }
}

fn mismatch_rosters() -> (Roster, Roster) {
    let (mut strong, mut weak) = base_rosters();
    for player in &mut strong.players {
        player.two_point_pct = (player.two_point_pct + 0.12).min(0.95);
        player.three_point_pct = (player.three_point_pct + 0.10).min(0.90);
    }
    for player in &mut weak.players {
        player.two_point_pct *= 0.5;
        player.three_point_pct *= 0.5;
    }
    (strong, weak)
}

/// The valve must fire in a lopsided game and push minutes to the bench,
/// relative to the same matchup with the valve disabled.
#[test]
fn test_blowout_valve_raises_bench_minutes() {
    let seed = 7;
    let (strong, weak) = mismatch_rosters();
    let valve_on = run_matchup(
        strong.clone(),
        weak.clone(),
        base_config(),
        &crate::NoIntel,
        seed,
    );
    assert!(valve_on.was_blowout, "a lopsided matchup must trip the valve");
    assert!(
        valve_on.home.score > valve_on.away.score,
        "the boosted side should be the one ahead"
    );

    let mut no_valve = base_config();
    no_valve.blowout_margin = u32::MAX;
    let valve_off = run_matchup(strong, weak, no_valve, &crate::NoIntel, seed);
    assert!(!valve_off.was_blowout);

    assert!(
        bench_seconds(&valve_on.home) > bench_seconds(&valve_off.home),
        "garbage time must add bench minutes: {} vs {}",
        bench_seconds(&valve_on.home),
        bench_seconds(&valve_off.home)
    );
}

/// Clutch only latches when a final period opens close.
#[test]
fn test_clutch_flag_tracks_the_margin() {
    let mut clutch_seen = false;
    let mut non_clutch_seen = false;
    for seed in 0..24 {
        let result = run_game(seed);
        let (home_through_3, away_through_3) = result.period_scores.iter().take(3).fold(
            (0u32, 0u32),
            |(h, a), &(ph, pa)| (h + ph, a + pa),
        );
        let q4_margin = home_through_3.abs_diff(away_through_3);
        if q4_margin <= 8 {
            assert!(
                result.was_clutch,
                "seed {seed}: margin {q4_margin} at the Q4 whistle must latch clutch"
            );
            clutch_seen = true;
        } else if result.overtime_periods == 0 && !result.was_clutch {
            non_clutch_seen = true;
        }
    }
    assert!(clutch_seen, "24 seeds should produce at least one close Q4");
    assert!(
        non_clutch_seen,
        "24 seeds should produce at least one comfortable Q4"
    );
}
