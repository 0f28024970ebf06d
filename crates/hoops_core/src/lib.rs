//! hoops_core: deterministic possession-by-possession game simulation.
//!
//! No IO, no network, no global state. All randomness flows through the
//! caller's Rng, so one seed always replays the same game.

mod boxscore;
mod driver;
mod engine;
mod fatigue;
mod intel;
mod selection;
mod shooting;
mod situational;
mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

pub use boxscore::{render_table, write_box_csv, BOX_SCORE_VERSION};
pub use driver::GameDriver;
pub use intel::{MatchupIntel, NoIntel, ScoutingReport};
pub use types::*;

#[cfg(test)]
mod tests;
