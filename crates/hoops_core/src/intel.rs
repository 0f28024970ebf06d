//! Matchup intelligence injected into the engine.
//!
//! The engine never reaches into ambient state: injury status and defender
//! friction arrive through this trait, and the no-op default keeps the
//! engine fully functional when no intelligence is supplied.

use crate::{PlayerId, Roster, ShotClass, SimError, ZoneDeltas};
use ahash::AHashMap;

/// Per-matchup intelligence consulted during shot resolution.
///
/// Lookups must be total: absent knowledge means "no adjustment", which is
/// what the provided defaults return.
pub trait MatchupIntel {
    /// Performance multiplier in [0, 1]; 1.0 = fully healthy, 0.0 = out.
    fn performance_multiplier(&self, _player: &PlayerId) -> f32 {
        1.0
    }

    /// Additive delta the given defender imposes on attempts of this class.
    fn friction_delta(&self, _defender: &PlayerId, _class: ShotClass) -> f32 {
        0.0
    }
}

/// The neutral default: every player healthy, every matchup friction-free.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIntel;

impl MatchupIntel for NoIntel {}

/// Injury and friction inputs validated against the matchup's rosters, so
/// the engine never sees a key that matches no rostered player.
#[derive(Debug, Clone, Default)]
pub struct ScoutingReport {
    injuries: AHashMap<PlayerId, f32>,
    friction: AHashMap<PlayerId, ZoneDeltas>,
}

impl ScoutingReport {
    /// Build a report from raw input pairs, rejecting unknown player keys
    /// and injury multipliers outside [0, 1].
    pub fn compile(
        injuries: Vec<(PlayerId, f32)>,
        friction: Vec<(PlayerId, ZoneDeltas)>,
        home: &Roster,
        away: &Roster,
    ) -> Result<Self, SimError> {
        let known = |id: &PlayerId| {
            home.players
                .iter()
                .chain(away.players.iter())
                .any(|p| &p.id == id)
        };

        let mut report = Self::default();
        for (player, multiplier) in injuries {
            if !known(&player) {
                return Err(SimError::UnknownInjuryPlayer { player });
            }
            if !(0.0..=1.0).contains(&multiplier) {
                return Err(SimError::ValueOutOfRange {
                    player,
                    field: "injury multiplier",
                    value: multiplier,
                });
            }
            report.injuries.insert(player, multiplier);
        }
        for (defender, deltas) in friction {
            if !known(&defender) {
                return Err(SimError::UnknownFrictionDefender { defender });
            }
            report.friction.insert(defender, deltas);
        }
        Ok(report)
    }
}

impl MatchupIntel for ScoutingReport {
    fn performance_multiplier(&self, player: &PlayerId) -> f32 {
        self.injuries.get(player).copied().unwrap_or(1.0)
    }

    fn friction_delta(&self, defender: &PlayerId, class: ShotClass) -> f32 {
        self.friction
            .get(defender)
            .map_or(0.0, |deltas| deltas.for_class(class))
    }
}
