//! The possession lifecycle.

use crate::fatigue;
use crate::intel::MatchupIntel;
use crate::selection;
use crate::shooting;
use crate::situational;
use crate::{GameState, Side, SimConfig};
use rand::Rng;

/// Run one full possession for the side currently on offense.
///
/// Order of operations:
/// 1. Bump the possession ordinal and draw the duration (clamped to the
///    remaining period clock).
/// 2. Select the primary actor by the usage-weighted draw.
/// 3. Resolve the outcome, including any rebound contest. An empty offensive
///    floor is a dead possession; the clock still runs.
/// 4. End-of-possession bookkeeping: minutes, fatigue and rest for both
///    teams, the ambient foul roll against the defense, then stint rotation
///    (suspended once the blowout valve has fired).
/// 5. Situational check: the fourth-quarter blowout valve.
/// 6. Advance the clock, credit the possession, and alternate the ball.
pub(crate) fn run_possession(
    state: &mut GameState,
    config: &SimConfig,
    intel: &dyn MatchupIntel,
    rng: &mut impl Rng,
) {
    state.possession_count += 1;
    let duration = draw_duration(state.clock.seconds_remaining, config, rng);
    let offense = state.offense;

    if let Some(actor) = selection::select_actor(state.team(offense), rng) {
        shooting::resolve_outcome(state, actor, config, intel, rng);
    }

    fatigue::apply_time(&mut state.home, duration, config);
    fatigue::apply_time(&mut state.away, duration, config);
    let defense = offense.opponent();
    fatigue::ambient_foul(state.team_mut(defense), config, rng);
    if !state.blowout_triggered {
        fatigue::rotate_stints(&mut state.home, config);
        fatigue::rotate_stints(&mut state.away, config);
    }
    situational::check_blowout(state, config);

    state.clock.seconds_remaining = state.clock.seconds_remaining.saturating_sub(duration);
    match offense {
        Side::Home => state.clock.home_possessions += 1,
        Side::Away => state.clock.away_possessions += 1,
    }
    state.offense = defense;
}

/// Uniform draw from the configured pace range, never past the period horn.
fn draw_duration(remaining: u32, config: &SimConfig, rng: &mut impl Rng) -> u32 {
    let drawn = rng.gen_range(config.possession_min_secs..=config.possession_max_secs);
    drawn.min(remaining)
}
