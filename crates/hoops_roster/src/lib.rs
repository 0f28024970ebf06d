//! Matchup loading and roster generation for the simulation binaries.
//!
//! A matchup directory holds `home.json` and `away.json` plus three optional
//! files: `injuries.json`, `friction.json`, and `config.json`. Absent
//! optional files mean "everyone healthy, no scouting, default tuning".

use anyhow::{Context, Result};
use hoops_core::{Archetype, PlayerId, PlayerRecord, Roster, SimConfig, TeamId, ZoneDeltas};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Everything a binary needs to stage one game.
#[derive(Debug, Clone)]
pub struct MatchupSetup {
    pub home: Roster,
    pub away: Roster,
    pub injuries: Vec<(PlayerId, f32)>,
    pub friction: Vec<(PlayerId, ZoneDeltas)>,
    pub config: SimConfig,
}

pub fn load_matchup(dir: &Path) -> Result<MatchupSetup> {
    Ok(MatchupSetup {
        home: load_roster(&dir.join("home.json"))?,
        away: load_roster(&dir.join("away.json"))?,
        injuries: load_optional_map(&dir.join("injuries.json"))?,
        friction: load_optional_map(&dir.join("friction.json"))?,
        config: load_config(&dir.join("config.json"))?,
    })
}

pub fn load_roster(path: &Path) -> Result<Roster> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading roster file: {}", path.display()))?;
    let roster = serde_json::from_str(&json)
        .with_context(|| format!("parsing roster file: {}", path.display()))?;
    Ok(roster)
}

/// Optional JSON object keyed by player id. A missing file is an empty map.
/// BTreeMap keeps the pairs in sorted key order, so downstream validation
/// reports the same offender every run.
fn load_optional_map<T: DeserializeOwned>(path: &Path) -> Result<Vec<(PlayerId, T)>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading matchup file: {}", path.display()))?;
    let map: BTreeMap<String, T> = serde_json::from_str(&json)
        .with_context(|| format!("parsing matchup file: {}", path.display()))?;
    Ok(map.into_iter().map(|(id, value)| (PlayerId(id), value)).collect())
}

/// Missing config file means defaults; a present file may be partial.
pub fn load_config(path: &Path) -> Result<SimConfig> {
    if !path.exists() {
        return Ok(SimConfig::default());
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file: {}", path.display()))?;
    let config = serde_json::from_str(&json)
        .with_context(|| format!("parsing config file: {}", path.display()))?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

const FIRST_NAMES: &[&str] = &[
    "Avery", "Marcus", "Dmitri", "Jalen", "Theo", "Darius", "Tomas", "Kofi", "Ryo", "Eli",
    "Victor", "Jonas", "Milan", "Owen", "Sam", "Luca", "Andre", "Petr", "Desmond", "Andrej",
];

const LAST_NAMES: &[&str] = &[
    "Cole", "Webb", "Volkov", "Price", "Mancini", "King", "Reyes", "Mensah", "Tanaka",
    "Thompson", "Osei", "Berg", "Kovac", "Gallagher", "Okafor", "Moretti", "Gibson", "Novak",
    "Hale", "Saric",
];

/// Ten-man depth chart: the starting five covers every archetype, the bench
/// doubles up on wings and bigs.
const DEPTH_CHART: &[Archetype] = &[
    Archetype::Scorer,
    Archetype::Playmaker,
    Archetype::RimProtector,
    Archetype::Slasher,
    Archetype::Balanced,
    Archetype::Balanced,
    Archetype::Scorer,
    Archetype::Slasher,
    Archetype::RimProtector,
    Archetype::Playmaker,
];

/// Draw ranges for (two-point, three-point) baselines per archetype.
fn shooting_ranges(archetype: Archetype) -> ((f32, f32), (f32, f32)) {
    match archetype {
        Archetype::Scorer => ((0.48, 0.55), (0.34, 0.40)),
        Archetype::Playmaker => ((0.44, 0.50), (0.33, 0.39)),
        Archetype::RimProtector => ((0.58, 0.68), (0.15, 0.26)),
        Archetype::Slasher => ((0.50, 0.58), (0.24, 0.31)),
        Archetype::Balanced => ((0.46, 0.52), (0.31, 0.37)),
    }
}

fn usage_range(archetype: Archetype, starter: bool) -> (f32, f32) {
    if !starter {
        return (0.02, 0.06);
    }
    match archetype {
        Archetype::Scorer => (0.22, 0.30),
        Archetype::Playmaker => (0.16, 0.24),
        Archetype::RimProtector => (0.08, 0.14),
        Archetype::Slasher => (0.12, 0.20),
        Archetype::Balanced => (0.10, 0.18),
    }
}

/// Generate a plausible roster. Usage rates are renormalized to sum to 1.0
/// so the rosters always pass engine validation.
pub fn generate_roster(team_id: &str, team_name: &str, rng: &mut impl Rng) -> Roster {
    let mut players = Vec::with_capacity(DEPTH_CHART.len());
    for (slot, &archetype) in DEPTH_CHART.iter().enumerate() {
        let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
        let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
        let ((two_lo, two_hi), (three_lo, three_hi)) = shooting_ranges(archetype);
        let (usage_lo, usage_hi) = usage_range(archetype, slot < 5);
        players.push(PlayerRecord {
            id: PlayerId(format!("{team_id}_{:02}", slot + 1)),
            name: format!("{first} {last}"),
            archetype,
            two_point_pct: rng.gen_range(two_lo..=two_hi),
            three_point_pct: rng.gen_range(three_lo..=three_hi),
            usage_rate: rng.gen_range(usage_lo..=usage_hi),
        });
    }
    let total: f32 = players.iter().map(|p| p.usage_rate).sum();
    for player in &mut players {
        player.usage_rate /= total;
    }
    Roster {
        team_id: TeamId(team_id.to_string()),
        name: team_name.to_string(),
        players,
    }
}

/// Write a freshly generated home/away pair into a matchup directory.
pub fn write_sample_matchup(dir: &Path, seed: u64) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let home = generate_roster("home", "Harbor City Breakers", &mut rng);
    let away = generate_roster("away", "Ridgeline Royals", &mut rng);
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating matchup dir: {}", dir.display()))?;
    write_roster(&dir.join("home.json"), &home)?;
    write_roster(&dir.join("away.json"), &away)?;
    Ok(())
}

fn write_roster(path: &Path, roster: &Roster) -> Result<()> {
    let json = serde_json::to_string_pretty(roster).context("serializing roster")?;
    std::fs::write(path, json)
        .with_context(|| format!("writing roster file: {}", path.display()))?;
    Ok(())
}
