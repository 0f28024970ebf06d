//! Possession outcome resolution: the shot probability pipeline, fouls,
//! turnovers, and the rebound contest.

use crate::fatigue;
use crate::intel::MatchupIntel;
use crate::selection;
use crate::situational;
use crate::{
    Anomaly, Archetype, FrictionEntry, GameState, ShotClass, SimConfig, TeamState,
};
use rand::Rng;

/// Per-possession outcome category, decided by one draw against the
/// configured turnover and shooting-foul rates.
enum Category {
    Turnover,
    ShootingFoul,
    FieldGoal,
}

/// Composed make probability with its pre-clamp value preserved, so clamp
/// violations stay observable.
pub(crate) struct ShotProbability {
    pub baseline: f32,
    pub computed: f32,
    pub clamped: f32,
}

/// Fixed composition order: baseline, times injury, times fatigue, plus
/// friction, plus momentum, plus clutch, clamped to [0, 1].
pub(crate) fn compose_probability(
    baseline: f32,
    injury: f32,
    fatigue: f32,
    friction: f32,
    momentum: f32,
    clutch: f32,
) -> ShotProbability {
    let computed = baseline * injury * fatigue + friction + momentum + clutch;
    ShotProbability {
        baseline,
        computed,
        clamped: computed.clamp(0.0, 1.0),
    }
}

/// Resolve the selected actor's possession and apply all box-score deltas.
///
/// Draw order is fixed: category, then shot class, then the make roll, then
/// attribution rolls (assist, block, rebound side, rebounder or steal), then
/// free throws. Reordering any of these changes every seeded replay.
pub(crate) fn resolve_outcome(
    state: &mut GameState,
    actor: usize,
    config: &SimConfig,
    intel: &dyn MatchupIntel,
    rng: &mut impl Rng,
) {
    match draw_category(config, rng) {
        Category::Turnover => resolve_turnover(state, actor, config, rng),
        Category::ShootingFoul => resolve_shooting_foul(state, actor, config, rng),
        Category::FieldGoal => resolve_field_goal(state, actor, config, intel, rng),
    }
}

fn draw_category(config: &SimConfig, rng: &mut impl Rng) -> Category {
    let roll: f32 = rng.gen();
    if roll < config.turnover_rate {
        Category::Turnover
    } else if roll < config.turnover_rate + config.shooting_foul_rate {
        Category::ShootingFoul
    } else {
        Category::FieldGoal
    }
}

fn draw_shot_class(archetype: Archetype, rng: &mut impl Rng) -> ShotClass {
    let roll: f32 = rng.gen();
    if roll < archetype.three_point_share() {
        ShotClass::ThreePoint
    } else {
        ShotClass::TwoPoint
    }
}

/// Match the primary defender for an attempt.
///
/// Interior attempts are absorbed by the first rim protector on the floor;
/// everything else is defended by the player holding the shooter's lineup
/// slot, clamped when the defense is short-handed.
fn primary_defender(defense: &TeamState, shooter_slot: usize, class: ShotClass) -> Option<usize> {
    if defense.on_court.is_empty() {
        return None;
    }
    if class == ShotClass::TwoPoint {
        if let Some(&idx) = defense
            .on_court
            .iter()
            .find(|&&idx| defense.players[idx].record.archetype == Archetype::RimProtector)
        {
            return Some(idx);
        }
    }
    let slot = shooter_slot.min(defense.on_court.len() - 1);
    Some(defense.on_court[slot])
}

fn resolve_turnover(state: &mut GameState, actor: usize, config: &SimConfig, rng: &mut impl Rng) {
    let offense_side = state.offense;
    let (offense, defense) = state.matchup_mut(offense_side);
    offense.players[actor].turnovers += 1;
    // Live-ball turnovers credit a steal on the other end.
    let roll: f32 = rng.gen();
    if roll < config.steal_share {
        if let Some(thief) =
            selection::select_defender_weighted(defense, Archetype::steal_weight, rng)
        {
            defense.players[thief].steals += 1;
        }
    }
}

fn resolve_shooting_foul(
    state: &mut GameState,
    actor: usize,
    config: &SimConfig,
    rng: &mut impl Rng,
) {
    let offense_side = state.offense;
    let class = draw_shot_class(
        state.team(offense_side).players[actor].record.archetype,
        rng,
    );
    let shooter_slot = state
        .team(offense_side)
        .on_court
        .iter()
        .position(|&idx| idx == actor)
        .unwrap_or(0);

    let (offense, defense) = state.matchup_mut(offense_side);
    // An empty defensive floor means nobody to charge; the line is still
    // awarded.
    if let Some(defender) = primary_defender(defense, shooter_slot, class) {
        fatigue::charge_foul(defense, defender, config);
    }
    for _ in 0..class.free_throws() {
        let roll: f32 = rng.gen();
        if roll < config.free_throw_pct {
            offense.players[actor].points += 1;
            offense.score += 1;
        }
    }
}

fn resolve_field_goal(
    state: &mut GameState,
    actor: usize,
    config: &SimConfig,
    intel: &dyn MatchupIntel,
    rng: &mut impl Rng,
) {
    let offense_side = state.offense;
    let class = draw_shot_class(
        state.team(offense_side).players[actor].record.archetype,
        rng,
    );

    // Compose the probability against a read-only view, then log, then roll
    // and mutate.
    let (shooter_id, defender_id, probability) = {
        let offense = state.team(offense_side);
        let defense = state.team(offense_side.opponent());
        let shooter_slot = offense
            .on_court
            .iter()
            .position(|&idx| idx == actor)
            .unwrap_or(0);
        let defender_idx = primary_defender(defense, shooter_slot, class);
        let defender_id = defender_idx.map(|idx| defense.players[idx].record.id.clone());

        let shooter = &offense.players[actor];
        let baseline = match class {
            ShotClass::TwoPoint => shooter.record.two_point_pct,
            ShotClass::ThreePoint => shooter.record.three_point_pct,
        };
        let friction = defender_id
            .as_ref()
            .map_or(0.0, |id| intel.friction_delta(id, class));
        let momentum = situational::momentum_bonus(shooter.hot_streak, config);
        let clutch = if state.clutch_active {
            situational::clutch_bonus(&shooter.record, config)
        } else {
            0.0
        };
        let probability = compose_probability(
            baseline,
            shooter.injury_multiplier,
            shooter.fatigue_multiplier,
            friction,
            momentum,
            clutch,
        );
        (shooter.record.id.clone(), defender_id, probability)
    };

    if !(0.0..=1.0).contains(&probability.computed) {
        state.anomalies.push(Anomaly::ProbabilityOutOfRange {
            possession: state.possession_count,
            shooter: shooter_id.clone(),
            computed: probability.computed,
        });
    }
    state.friction_log.push(FrictionEntry {
        possession: state.possession_count,
        shooter: shooter_id,
        defender: defender_id,
        shot_class: class,
        original_pct: probability.baseline,
        adjusted_pct: probability.clamped,
    });

    let made = {
        let roll: f32 = rng.gen();
        roll < probability.clamped
    };

    let (offense, defense) = state.matchup_mut(offense_side);
    if made {
        let points = class.points();
        offense.players[actor].points += points;
        offense.players[actor].hot_streak += 1;
        offense.score += points;

        let assisted_share = match class {
            ShotClass::TwoPoint => config.assisted_share_two,
            ShotClass::ThreePoint => config.assisted_share_three,
        };
        let roll: f32 = rng.gen();
        if roll < assisted_share {
            if let Some(passer) = selection::select_assister(offense, actor, rng) {
                offense.players[passer].assists += 1;
            }
        }
    } else {
        offense.players[actor].hot_streak = 0;
        if class == ShotClass::TwoPoint {
            let roll: f32 = rng.gen();
            if roll < config.block_rate {
                if let Some(blocker) =
                    selection::select_defender_weighted(defense, Archetype::block_weight, rng)
                {
                    defense.players[blocker].blocks += 1;
                }
            }
        }
        rebound_contest(offense, defense, config, rng);
    }
}

/// The offensive-rebound base rate decides the side; a weighted draw
/// favoring rim protectors picks the rebounder.
fn rebound_contest(
    offense: &mut TeamState,
    defense: &mut TeamState,
    config: &SimConfig,
    rng: &mut impl Rng,
) {
    let roll: f32 = rng.gen();
    let team = if roll < config.offensive_rebound_rate {
        offense
    } else {
        defense
    };
    if let Some(rebounder) = selection::select_rebounder(team, rng) {
        team.players[rebounder].rebounds += 1;
    }
}
