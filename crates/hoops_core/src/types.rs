//! Type definitions for `hoops_core`.
//!
//! All identifiers, input records, mutable game state, log entries, and the
//! immutable result shape live here. Behavior lives in the sibling modules.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// ID newtypes
// ---------------------------------------------------------------------------

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(PlayerId);
string_id!(TeamId);

// ---------------------------------------------------------------------------
// Core enums
// ---------------------------------------------------------------------------

/// Closed archetype set. All weight tables are exhaustive matches, so adding
/// an archetype forces a decision about its shot mix and contest weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Scorer,
    Playmaker,
    RimProtector,
    Slasher,
    Balanced,
}

impl Archetype {
    /// Fraction of this archetype's field-goal attempts taken from deep.
    pub fn three_point_share(self) -> f32 {
        match self {
            Archetype::Scorer => 0.35,
            Archetype::Playmaker => 0.40,
            Archetype::RimProtector => 0.05,
            Archetype::Slasher => 0.15,
            Archetype::Balanced => 0.30,
        }
    }

    /// Relative weight in the rebound contest draw.
    pub fn rebound_weight(self) -> f32 {
        match self {
            Archetype::RimProtector => 3.0,
            Archetype::Slasher | Archetype::Balanced => 1.2,
            Archetype::Scorer => 1.0,
            Archetype::Playmaker => 0.8,
        }
    }

    /// Relative weight in the assist attribution draw.
    pub fn playmaking_weight(self) -> f32 {
        match self {
            Archetype::Playmaker => 3.0,
            Archetype::Balanced => 1.5,
            Archetype::Scorer | Archetype::Slasher => 1.0,
            Archetype::RimProtector => 0.8,
        }
    }

    /// Relative weight when attributing a steal on a live-ball turnover.
    pub fn steal_weight(self) -> f32 {
        match self {
            Archetype::Playmaker => 2.0,
            Archetype::Slasher => 1.5,
            Archetype::Scorer | Archetype::RimProtector | Archetype::Balanced => 1.0,
        }
    }

    /// Relative weight when attributing a block on a missed interior shot.
    pub fn block_weight(self) -> f32 {
        match self {
            Archetype::RimProtector => 3.0,
            Archetype::Slasher | Archetype::Balanced => 1.0,
            Archetype::Scorer => 0.8,
            Archetype::Playmaker => 0.6,
        }
    }
}

/// Shot classes map 1:1 onto friction zones: interior deltas apply to
/// two-point attempts, perimeter deltas to threes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotClass {
    TwoPoint,
    ThreePoint,
}

impl ShotClass {
    pub fn points(self) -> u32 {
        match self {
            ShotClass::TwoPoint => 2,
            ShotClass::ThreePoint => 3,
        }
    }

    /// Free throws awarded when the shooter is fouled on this attempt.
    pub fn free_throws(self) -> u32 {
        match self {
            ShotClass::TwoPoint => 2,
            ShotClass::ThreePoint => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

// ---------------------------------------------------------------------------
// Input records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    pub archetype: Archetype,
    /// Season baseline make percentage on two-point attempts, in [0, 1].
    pub two_point_pct: f32,
    /// Season baseline make percentage on three-point attempts, in [0, 1].
    pub three_point_pct: f32,
    /// Fraction of team possessions this player ends as the primary actor.
    pub usage_rate: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub team_id: TeamId,
    pub name: String,
    /// Depth-chart order. The first five eligible players start.
    pub players: Vec<PlayerRecord>,
}

/// Per-defender friction deltas by zone, as additive percentage adjustments
/// experienced by opposing shooters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneDeltas {
    pub interior: f32,
    pub perimeter: f32,
}

impl ZoneDeltas {
    pub fn for_class(self, class: ShotClass) -> f32 {
        match class {
            ShotClass::TwoPoint => self.interior,
            ShotClass::ThreePoint => self.perimeter,
        }
    }
}

// ---------------------------------------------------------------------------
// Mutable game state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub record: PlayerRecord,
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
    pub fouls: u8,
    /// Latched at the foul limit. Never cleared for the rest of the game.
    pub fouled_out: bool,
    pub seconds_played: u32,
    /// Continuous floor time since last coming on.
    pub consecutive_seconds: u32,
    /// Rest accumulated since last coming off.
    pub rest_seconds: u32,
    /// Consecutive field-goal makes. Any miss resets it.
    pub hot_streak: u32,
    /// Static for the whole game; 1.0 = fully healthy, 0.0 = ruled out.
    pub injury_multiplier: f32,
    /// Decays on the floor, recovers on the bench.
    pub fatigue_multiplier: f32,
}

impl PlayerState {
    pub fn fresh(record: PlayerRecord, injury_multiplier: f32) -> Self {
        Self {
            record,
            points: 0,
            rebounds: 0,
            assists: 0,
            steals: 0,
            blocks: 0,
            turnovers: 0,
            fouls: 0,
            fouled_out: false,
            seconds_played: 0,
            consecutive_seconds: 0,
            rest_seconds: 0,
            hot_streak: 0,
            injury_multiplier,
            fatigue_multiplier: 1.0,
        }
    }

    /// Eligible to take the floor: not foul-limited, not ruled out by injury.
    pub fn eligible(&self) -> bool {
        !self.fouled_out && self.injury_multiplier > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamState {
    pub id: TeamId,
    pub name: String,
    /// Depth-chart order, fixed for the whole game.
    pub players: Vec<PlayerState>,
    /// Indices into `players` for the current floor unit. At most five;
    /// fewer when foul-outs exhaust the bench.
    pub on_court: SmallVec<[usize; 5]>,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameClock {
    /// 1-4 in regulation; 5 and up are overtime periods.
    pub period: u8,
    pub seconds_remaining: u32,
    pub home_possessions: u32,
    pub away_possessions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub game_id: Uuid,
    pub seed: u64,
    pub clock: GameClock,
    pub home: TeamState,
    pub away: TeamState,
    /// Side with the ball for the next possession.
    pub offense: Side,
    /// Latched when a final period opens inside the clutch margin.
    pub clutch_active: bool,
    /// Latched when the fourth-quarter blowout valve fires. At most once.
    pub blowout_triggered: bool,
    /// Global possession ordinal; orders the friction log.
    pub possession_count: u32,
    pub friction_log: Vec<FrictionEntry>,
    pub anomalies: Vec<Anomaly>,
}

impl GameState {
    pub fn team(&self, side: Side) -> &TeamState {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn team_mut(&mut self, side: Side) -> &mut TeamState {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }

    /// Offense first, defense second. Split borrow so outcome resolution can
    /// touch both teams at once.
    pub(crate) fn matchup_mut(&mut self, offense: Side) -> (&mut TeamState, &mut TeamState) {
        match offense {
            Side::Home => (&mut self.home, &mut self.away),
            Side::Away => (&mut self.away, &mut self.home),
        }
    }

    pub fn score_margin(&self) -> u32 {
        self.home.score.abs_diff(self.away.score)
    }
}

// ---------------------------------------------------------------------------
// Logs and anomalies
// ---------------------------------------------------------------------------

/// One audit entry per resolved field-goal attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrictionEntry {
    pub possession: u32,
    pub shooter: PlayerId,
    /// Primary defender on the attempt. None only when the defense has no
    /// one left on the floor.
    pub defender: Option<PlayerId>,
    pub shot_class: ShotClass,
    /// Season baseline before any adjustment.
    pub original_pct: f32,
    /// Final probability the make roll used, after clamping.
    pub adjusted_pct: f32,
}

/// Conditions that indicate a logic or balance defect. Recorded on the
/// result rather than dropped, so batch tooling can surface them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Anomaly {
    /// A composed shot probability left [0, 1] before clamping.
    ProbabilityOutOfRange {
        possession: u32,
        shooter: PlayerId,
        computed: f32,
    },
    /// Still tied when the overtime cap was reached; the result stands as a
    /// draw.
    OvertimeCapReached { periods: u8 },
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxLine {
    pub player: PlayerId,
    pub name: String,
    pub archetype: Archetype,
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
    pub fouls: u8,
    pub fouled_out: bool,
    pub seconds_played: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamBoxScore {
    pub team_id: TeamId,
    pub name: String,
    pub score: u32,
    /// Roster order, one line per rostered player.
    pub lines: Vec<BoxLine>,
}

/// Immutable summary of one finished game. The only thing that escapes a
/// run; all intermediate state dies with the driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub schema_version: u32,
    pub game_id: Uuid,
    pub seed: u64,
    pub home: TeamBoxScore,
    pub away: TeamBoxScore,
    /// (home, away) points per period, regulation first, then overtimes.
    pub period_scores: Vec<(u32, u32)>,
    pub total_possessions: u32,
    pub overtime_periods: u8,
    pub was_clutch: bool,
    pub was_blowout: bool,
    pub friction_log: Vec<FrictionEntry>,
    pub anomalies: Vec<Anomaly>,
    /// Wall-clock execution time. Not covered by the determinism contract.
    pub duration_ms: u64,
}

impl SimulationResult {
    /// Winning side, or None for an overtime-capped draw.
    pub fn winner(&self) -> Option<Side> {
        match self.home.score.cmp(&self.away.score) {
            std::cmp::Ordering::Greater => Some(Side::Home),
            std::cmp::Ordering::Less => Some(Side::Away),
            std::cmp::Ordering::Equal => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunable simulation constants. Loaded from JSON; absent fields keep their
/// stated defaults, so partial config files are valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub quarter_secs: u32,
    pub overtime_secs: u32,
    /// Uniform possession-duration draw, inclusive. The 10-19s default
    /// averages 14.5s, about 99 possessions per team over 48 minutes.
    pub possession_min_secs: u32,
    pub possession_max_secs: u32,
    pub turnover_rate: f32,
    pub shooting_foul_rate: f32,
    pub free_throw_pct: f32,
    pub offensive_rebound_rate: f32,
    /// Chance a missed two-point attempt is credited as blocked.
    pub block_rate: f32,
    /// Share of turnovers that are live-ball and credit a steal.
    pub steal_share: f32,
    pub assisted_share_two: f32,
    pub assisted_share_three: f32,
    /// Per-possession chance of an off-ball foul against the defense.
    pub ambient_foul_rate: f32,
    pub foul_limit: u8,
    pub fatigue_interval_secs: u32,
    pub fatigue_decay_per_interval: f32,
    pub fatigue_floor: f32,
    /// Bench recovery speed relative to the decay rate.
    pub recovery_multiplier: f32,
    /// Continuous floor time that triggers a rotation swap.
    pub stint_secs: u32,
    pub momentum_step: f32,
    pub momentum_cap: f32,
    pub clutch_margin: u32,
    pub clutch_usage_floor: f32,
    pub clutch_bonus: f32,
    pub blowout_margin: u32,
    pub max_overtimes: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            quarter_secs: 720,
            overtime_secs: 300,
            possession_min_secs: 10,
            possession_max_secs: 19,
            turnover_rate: 0.13,
            shooting_foul_rate: 0.08,
            free_throw_pct: 0.78,
            offensive_rebound_rate: 0.27,
            block_rate: 0.07,
            steal_share: 0.55,
            assisted_share_two: 0.50,
            assisted_share_three: 0.80,
            ambient_foul_rate: 0.12,
            foul_limit: 6,
            fatigue_interval_secs: 480,
            fatigue_decay_per_interval: 0.01,
            fatigue_floor: 0.85,
            recovery_multiplier: 2.0,
            stint_secs: 360,
            momentum_step: 0.02,
            momentum_cap: 0.06,
            clutch_margin: 8,
            clutch_usage_floor: 0.20,
            clutch_bonus: 0.03,
            blowout_margin: 18,
            max_overtimes: 4,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Input-validation failures. All raised before any possession runs; a
/// constructed driver always yields a playable game.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("roster for team '{team}' is empty")]
    EmptyRoster { team: TeamId },
    #[error("duplicate player id '{player}' on team '{team}'")]
    DuplicatePlayer { team: TeamId, player: PlayerId },
    #[error("usage rates for team '{team}' sum to zero")]
    ZeroUsage { team: TeamId },
    #[error("player '{player}': {field} is {value}, outside [0, 1]")]
    ValueOutOfRange {
        player: PlayerId,
        field: &'static str,
        value: f32,
    },
    #[error("injury entry references unknown player '{player}'")]
    UnknownInjuryPlayer { player: PlayerId },
    #[error("friction profile references unknown defender '{defender}'")]
    UnknownFrictionDefender { defender: PlayerId },
    #[error("config: {0}")]
    InvalidConfig(String),
}
