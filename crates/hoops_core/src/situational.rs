//! Situational modifiers: clutch context, the blowout valve, and heat-check
//! momentum.

use crate::fatigue;
use crate::{Archetype, GameState, PlayerRecord, SimConfig};

/// Latch clutch when a final period opens inside the margin. Checked at the
/// start of the fourth quarter and of every overtime; once set it holds for
/// the rest of the game.
pub(crate) fn check_clutch_entry(state: &mut GameState, config: &SimConfig) {
    if state.clutch_active {
        return;
    }
    if state.clock.period >= 4 && state.score_margin() <= config.clutch_margin {
        state.clutch_active = true;
    }
}

/// Closer boost. Only Scorer archetypes with a ball-dominant usage profile
/// qualify; everyone else shoots their normal number.
pub(crate) fn clutch_bonus(record: &PlayerRecord, config: &SimConfig) -> f32 {
    if record.archetype == Archetype::Scorer && record.usage_rate >= config.clutch_usage_floor {
        config.clutch_bonus
    } else {
        0.0
    }
}

/// Additive hot-streak bonus, capped.
pub(crate) fn momentum_bonus(hot_streak: u32, config: &SimConfig) -> f32 {
    (hot_streak as f32 * config.momentum_step).min(config.momentum_cap)
}

/// Fourth-quarter blowout valve: when the lead reaches the margin, both
/// teams flush their lineups toward the bench exactly once.
pub(crate) fn check_blowout(state: &mut GameState, config: &SimConfig) {
    if state.blowout_triggered || state.clock.period != 4 {
        return;
    }
    if state.score_margin() >= config.blowout_margin {
        fatigue::flush_lineup(&mut state.home);
        fatigue::flush_lineup(&mut state.away);
        state.blowout_triggered = true;
    }
}
