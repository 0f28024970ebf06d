//! Weighted draws: possession actors, assist and steal attribution, rebound
//! contests.

use crate::{Archetype, TeamState};
use rand::Rng;

/// Pick the primary actor for a possession.
///
/// Candidates are the eligible players on the floor, weighted by usage rate
/// renormalized over that set. The walk runs weight-descending, then
/// seconds-played ascending, then roster order, so ties prefer the fresher
/// player. A zero weight sum falls back to a uniform pick; an empty floor
/// yields None.
pub(crate) fn select_actor(team: &TeamState, rng: &mut impl Rng) -> Option<usize> {
    let mut candidates: Vec<usize> = team
        .on_court
        .iter()
        .copied()
        .filter(|&idx| team.players[idx].eligible())
        .collect();
    if candidates.is_empty() {
        return None;
    }
    candidates.sort_by(|&a, &b| {
        let pa = &team.players[a];
        let pb = &team.players[b];
        pb.record
            .usage_rate
            .total_cmp(&pa.record.usage_rate)
            .then(pa.seconds_played.cmp(&pb.seconds_played))
            .then(a.cmp(&b))
    });

    let total: f32 = candidates
        .iter()
        .map(|&idx| team.players[idx].record.usage_rate)
        .sum();
    if total <= 0.0 {
        // Whole floor unit carries zero usage (deep-bench garbage lineups):
        // uniform fallback keeps the game playable.
        return Some(candidates[rng.gen_range(0..candidates.len())]);
    }

    let mut roll = rng.gen::<f32>() * total;
    for &idx in &candidates {
        roll -= team.players[idx].record.usage_rate;
        if roll <= 0.0 {
            return Some(idx);
        }
    }
    candidates.last().copied()
}

/// Weighted draw over explicit (index, weight) pairs. Falls back to uniform
/// when the weights sum to zero.
pub(crate) fn weighted_pick(pairs: &[(usize, f32)], rng: &mut impl Rng) -> Option<usize> {
    if pairs.is_empty() {
        return None;
    }
    let total: f32 = pairs.iter().map(|(_, weight)| weight).sum();
    if total <= 0.0 {
        return Some(pairs[rng.gen_range(0..pairs.len())].0);
    }
    let mut roll = rng.gen::<f32>() * total;
    for &(idx, weight) in pairs {
        roll -= weight;
        if roll <= 0.0 {
            return Some(idx);
        }
    }
    pairs.last().map(|&(idx, _)| idx)
}

/// Assist credit draw: the shooter's floor-mates, weighted by playmaking.
pub(crate) fn select_assister(
    team: &TeamState,
    shooter: usize,
    rng: &mut impl Rng,
) -> Option<usize> {
    let pairs: Vec<(usize, f32)> = team
        .on_court
        .iter()
        .copied()
        .filter(|&idx| idx != shooter)
        .map(|idx| (idx, team.players[idx].record.archetype.playmaking_weight()))
        .collect();
    weighted_pick(&pairs, rng)
}

/// Rebound draw within one team, favoring rim protectors.
pub(crate) fn select_rebounder(team: &TeamState, rng: &mut impl Rng) -> Option<usize> {
    let pairs: Vec<(usize, f32)> = team
        .on_court
        .iter()
        .copied()
        .map(|idx| (idx, team.players[idx].record.archetype.rebound_weight()))
        .collect();
    weighted_pick(&pairs, rng)
}

/// Defensive attribution draw with a caller-supplied weight table.
pub(crate) fn select_defender_weighted(
    team: &TeamState,
    weight: fn(Archetype) -> f32,
    rng: &mut impl Rng,
) -> Option<usize> {
    let pairs: Vec<(usize, f32)> = team
        .on_court
        .iter()
        .copied()
        .map(|idx| (idx, weight(team.players[idx].record.archetype)))
        .collect();
    weighted_pick(&pairs, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{base_state, make_rng};

    fn home_team() -> TeamState {
        base_state().home
    }

    #[test]
    fn test_high_usage_player_selected_most() {
        let team = home_team();
        let mut rng = make_rng();
        let mut counts = vec![0u32; team.players.len()];
        for _ in 0..4000 {
            let idx = select_actor(&team, &mut rng).expect("floor is populated");
            counts[idx] += 1;
        }
        // hawk_01 carries 0.26 usage against 0.12 for the rim protector; over
        // 4000 draws the ordering is stable.
        assert!(
            counts[0] > counts[2],
            "scorer ({}) should out-draw rim protector ({})",
            counts[0],
            counts[2]
        );
        for (idx, &count) in counts.iter().enumerate().take(5) {
            assert!(count > 0, "starter {idx} never selected");
        }
    }

    #[test]
    fn test_fouled_out_players_excluded() {
        let mut team = home_team();
        for idx in [0usize, 1, 2, 3] {
            team.players[idx].fouled_out = true;
        }
        let mut rng = make_rng();
        for _ in 0..200 {
            let idx = select_actor(&team, &mut rng).expect("one starter remains");
            assert_eq!(idx, 4, "only the eligible starter may be picked");
        }
    }

    #[test]
    fn test_empty_floor_yields_none() {
        let mut team = home_team();
        team.on_court.clear();
        let mut rng = make_rng();
        assert_eq!(select_actor(&team, &mut rng), None);
    }

    #[test]
    fn test_zero_usage_floor_falls_back_to_uniform() {
        let mut team = home_team();
        for player in &mut team.players {
            player.record.usage_rate = 0.0;
        }
        let mut rng = make_rng();
        let mut counts = vec![0u32; team.players.len()];
        for _ in 0..2000 {
            let idx = select_actor(&team, &mut rng).expect("floor is populated");
            counts[idx] += 1;
        }
        for (idx, &count) in counts.iter().enumerate().take(5) {
            assert!(
                count > 250,
                "uniform fallback should spread picks, starter {idx} got {count}"
            );
        }
    }

    #[test]
    fn test_assister_never_the_shooter() {
        let team = home_team();
        let mut rng = make_rng();
        for _ in 0..500 {
            let passer = select_assister(&team, 0, &mut rng).expect("four teammates");
            assert_ne!(passer, 0, "shooter cannot assist their own make");
        }
    }

    #[test]
    fn test_rebounds_favor_rim_protector() {
        let team = home_team();
        let mut rng = make_rng();
        let mut counts = vec![0u32; team.players.len()];
        for _ in 0..4000 {
            let idx = select_rebounder(&team, &mut rng).expect("floor is populated");
            counts[idx] += 1;
        }
        // Index 2 is the rim protector in the fixture depth chart.
        let rim = counts[2];
        for (idx, &count) in counts.iter().enumerate().take(5) {
            if idx != 2 {
                assert!(
                    rim > count,
                    "rim protector ({rim}) should out-rebound slot {idx} ({count})"
                );
            }
        }
    }

    #[test]
    fn test_weighted_pick_empty_is_none() {
        let mut rng = make_rng();
        assert_eq!(weighted_pick(&[], &mut rng), None);
    }
}
