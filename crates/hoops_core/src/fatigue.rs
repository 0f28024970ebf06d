//! Fatigue decay, rest recovery, foul bookkeeping, and bench rotation.

use crate::{SimConfig, TeamState};
use rand::Rng;

/// Fatigue change for `elapsed` seconds relative to the configured interval.
fn decay_for(elapsed: u32, config: &SimConfig) -> f32 {
    elapsed as f32 / config.fatigue_interval_secs as f32 * config.fatigue_decay_per_interval
}

/// Credit elapsed floor time and bench rest to every player on the team.
///
/// On-court players accumulate minutes and lose fatigue down to the floor;
/// bench players recover toward 1.0 at the configured multiple of the decay
/// rate.
pub(crate) fn apply_time(team: &mut TeamState, elapsed: u32, config: &SimConfig) {
    let decay = decay_for(elapsed, config);
    for idx in 0..team.players.len() {
        let on_floor = team.on_court.contains(&idx);
        let player = &mut team.players[idx];
        if on_floor {
            player.seconds_played += elapsed;
            player.consecutive_seconds += elapsed;
            player.fatigue_multiplier =
                (player.fatigue_multiplier - decay).max(config.fatigue_floor);
        } else {
            player.rest_seconds += elapsed;
            player.fatigue_multiplier =
                (player.fatigue_multiplier + decay * config.recovery_multiplier).min(1.0);
        }
    }
}

/// Roll the per-possession off-ball foul against the defense. The offender
/// is a uniform pick among the defenders on the floor.
pub(crate) fn ambient_foul(team: &mut TeamState, config: &SimConfig, rng: &mut impl Rng) {
    if team.on_court.is_empty() {
        return;
    }
    let roll: f32 = rng.gen();
    if roll < config.ambient_foul_rate {
        let slot = rng.gen_range(0..team.on_court.len());
        let idx = team.on_court[slot];
        charge_foul(team, idx, config);
    }
}

/// Add one personal foul. Hitting the limit latches the foul-out and swaps
/// in the next-highest-usage eligible bench player immediately.
pub(crate) fn charge_foul(team: &mut TeamState, idx: usize, config: &SimConfig) {
    let player = &mut team.players[idx];
    player.fouls += 1;
    if player.fouls >= config.foul_limit {
        player.fouled_out = true;
        replace_on_court(team, idx);
    }
}

/// Swap a no-longer-eligible player out for the highest-usage bench player.
/// With the bench exhausted the slot is dropped and the team plays on
/// short-handed.
fn replace_on_court(team: &mut TeamState, idx: usize) {
    let Some(slot) = team.on_court.iter().position(|&i| i == idx) else {
        return;
    };
    team.players[idx].consecutive_seconds = 0;
    if let Some(replacement) = highest_usage_candidate(team) {
        enter_game(team, replacement);
        team.on_court[slot] = replacement;
    } else {
        team.on_court.remove(slot);
    }
}

/// Swap out anyone whose continuous stint has hit the limit, bringing in the
/// most-rested bench player. Disabled for the rest of the game once the
/// blowout valve flushes the lineups.
pub(crate) fn rotate_stints(team: &mut TeamState, config: &SimConfig) {
    // Collect first: swapping while iterating would re-examine fresh legs.
    let expiring: Vec<usize> = team
        .on_court
        .iter()
        .enumerate()
        .filter(|&(_, &idx)| team.players[idx].consecutive_seconds >= config.stint_secs)
        .map(|(slot, _)| slot)
        .collect();
    for slot in expiring {
        let Some(replacement) = most_rested_candidate(team) else {
            return;
        };
        let outgoing = team.on_court[slot];
        team.players[outgoing].consecutive_seconds = 0;
        team.players[outgoing].rest_seconds = 0;
        enter_game(team, replacement);
        team.on_court[slot] = replacement;
    }
}

/// Garbage-time flush: replace every on-court player with a lower-usage
/// bench player where one exists. Slots already held by the low-usage unit
/// stay put, which makes a second flush a no-op.
pub(crate) fn flush_lineup(team: &mut TeamState) {
    for slot in 0..team.on_court.len() {
        let current = team.on_court[slot];
        let Some(replacement) = lowest_usage_candidate(team) else {
            return;
        };
        if team.players[replacement].record.usage_rate
            < team.players[current].record.usage_rate
        {
            team.players[current].consecutive_seconds = 0;
            team.players[current].rest_seconds = 0;
            enter_game(team, replacement);
            team.on_court[slot] = replacement;
        }
    }
}

fn enter_game(team: &mut TeamState, idx: usize) {
    let player = &mut team.players[idx];
    player.consecutive_seconds = 0;
    player.rest_seconds = 0;
}

fn bench_candidates(team: &TeamState) -> impl Iterator<Item = usize> + '_ {
    (0..team.players.len())
        .filter(move |&idx| team.players[idx].eligible() && !team.on_court.contains(&idx))
}

fn highest_usage_candidate(team: &TeamState) -> Option<usize> {
    let mut best: Option<usize> = None;
    for idx in bench_candidates(team) {
        match best {
            Some(current)
                if team.players[idx].record.usage_rate
                    <= team.players[current].record.usage_rate => {}
            _ => best = Some(idx),
        }
    }
    best
}

fn lowest_usage_candidate(team: &TeamState) -> Option<usize> {
    let mut best: Option<usize> = None;
    for idx in bench_candidates(team) {
        match best {
            Some(current)
                if team.players[idx].record.usage_rate
                    >= team.players[current].record.usage_rate => {}
            _ => best = Some(idx),
        }
    }
    best
}

/// Most rest wins; fewest seconds played breaks ties, then roster order.
fn most_rested_candidate(team: &TeamState) -> Option<usize> {
    let mut best: Option<usize> = None;
    for idx in bench_candidates(team) {
        let Some(current) = best else {
            best = Some(idx);
            continue;
        };
        let challenger = &team.players[idx];
        let incumbent = &team.players[current];
        let better = challenger.rest_seconds > incumbent.rest_seconds
            || (challenger.rest_seconds == incumbent.rest_seconds
                && challenger.seconds_played < incumbent.seconds_played);
        if better {
            best = Some(idx);
        }
    }
    best
}
