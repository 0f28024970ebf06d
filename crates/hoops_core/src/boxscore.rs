//! Box-score compilation and rendering.
//!
//! Pure functions over game state; the driver assembles the immutable
//! result from these at the final horn.

use crate::{BoxLine, GameState, SimulationResult, TeamBoxScore, TeamState};
use std::io::Write;

/// Bumped whenever the serialized result shape changes.
pub const BOX_SCORE_VERSION: u32 = 1;

fn team_box(team: &TeamState) -> TeamBoxScore {
    TeamBoxScore {
        team_id: team.id.clone(),
        name: team.name.clone(),
        score: team.score,
        lines: team
            .players
            .iter()
            .map(|p| BoxLine {
                player: p.record.id.clone(),
                name: p.record.name.clone(),
                archetype: p.record.archetype,
                points: p.points,
                rebounds: p.rebounds,
                assists: p.assists,
                steals: p.steals,
                blocks: p.blocks,
                turnovers: p.turnovers,
                fouls: p.fouls,
                fouled_out: p.fouled_out,
                seconds_played: p.seconds_played,
            })
            .collect(),
    }
}

pub(crate) fn compile(
    state: &GameState,
    period_scores: &[(u32, u32)],
    overtime_periods: u8,
    duration_ms: u64,
) -> SimulationResult {
    SimulationResult {
        schema_version: BOX_SCORE_VERSION,
        game_id: state.game_id,
        seed: state.seed,
        home: team_box(&state.home),
        away: team_box(&state.away),
        period_scores: period_scores.to_vec(),
        total_possessions: state.possession_count,
        overtime_periods,
        was_clutch: state.clutch_active,
        was_blowout: state.blowout_triggered,
        friction_log: state.friction_log.clone(),
        anomalies: state.anomalies.clone(),
        duration_ms,
    }
}

/// Render an aligned box-score table for terminal output.
pub fn render_table(result: &SimulationResult) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {} - {} {}\n",
        result.home.name, result.home.score, result.away.name, result.away.score
    ));
    let periods: Vec<String> = result
        .period_scores
        .iter()
        .map(|(h, a)| format!("{h}-{a}"))
        .collect();
    out.push_str(&format!(
        "periods: {}  possessions: {}  OT: {}\n",
        periods.join(" | "),
        result.total_possessions,
        result.overtime_periods
    ));

    for team in [&result.home, &result.away] {
        out.push_str(&format!(
            "\n{:<22} {:>5} {:>4} {:>4} {:>4} {:>4} {:>4} {:>4} {:>3}\n",
            team.name, "MIN", "PTS", "REB", "AST", "STL", "BLK", "TOV", "PF"
        ));
        for line in &team.lines {
            let minutes = f64::from(line.seconds_played) / 60.0;
            let fouls = if line.fouled_out {
                format!("{}*", line.fouls)
            } else {
                line.fouls.to_string()
            };
            out.push_str(&format!(
                "{:<22} {:>5.1} {:>4} {:>4} {:>4} {:>4} {:>4} {:>4} {:>3}\n",
                line.name,
                minutes,
                line.points,
                line.rebounds,
                line.assists,
                line.steals,
                line.blocks,
                line.turnovers,
                fouls
            ));
        }
    }

    let mut flags: Vec<&str> = Vec::new();
    if result.was_clutch {
        flags.push("clutch");
    }
    if result.was_blowout {
        flags.push("blowout");
    }
    out.push_str(&format!(
        "\nflags: {}  friction entries: {}  anomalies: {}\n",
        if flags.is_empty() {
            "none".to_string()
        } else {
            flags.join(", ")
        },
        result.friction_log.len(),
        result.anomalies.len()
    ));
    out
}

/// Write per-player lines as CSV, one row per rostered player.
pub fn write_box_csv<W: Write>(out: &mut W, result: &SimulationResult) -> std::io::Result<()> {
    writeln!(
        out,
        "game_id,seed,team,player,name,archetype,points,rebounds,assists,steals,blocks,turnovers,fouls,fouled_out,seconds_played"
    )?;
    for team in [&result.home, &result.away] {
        for line in &team.lines {
            writeln!(
                out,
                "{},{},{},{},{},{:?},{},{},{},{},{},{},{},{},{}",
                result.game_id,
                result.seed,
                team.team_id,
                line.player,
                line.name,
                line.archetype,
                line.points,
                line.rebounds,
                line.assists,
                line.steals,
                line.blocks,
                line.turnovers,
                line.fouls,
                line.fouled_out,
                line.seconds_played
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::base_state;

    fn sample_result() -> SimulationResult {
        let mut state = base_state();
        state.home.score = 104;
        state.away.score = 99;
        state.home.players[0].points = 31;
        state.home.players[0].seconds_played = 2100;
        state.home.players[2].fouls = 6;
        state.home.players[2].fouled_out = true;
        state.possession_count = 197;
        compile(&state, &[(25, 28), (30, 22), (24, 25), (25, 24)], 0, 12)
    }

    #[test]
    fn test_compile_preserves_scores_and_order() {
        let result = sample_result();
        assert_eq!(result.schema_version, BOX_SCORE_VERSION);
        assert_eq!(result.home.score, 104);
        assert_eq!(result.away.score, 99);
        assert_eq!(result.home.lines.len(), 10, "one line per rostered player");
        assert_eq!(result.home.lines[0].name, "Avery Cole");
        assert_eq!(result.home.lines[0].points, 31);
        assert_eq!(result.total_possessions, 197);
        assert_eq!(result.winner(), Some(crate::Side::Home));
    }

    #[test]
    fn test_render_table_lists_every_player() {
        let result = sample_result();
        let table = render_table(&result);
        assert!(table.contains("Ridgeline Hawks 104"));
        for line in &result.home.lines {
            assert!(table.contains(&line.name), "missing {}", line.name);
        }
        assert!(table.contains("6*"), "foul-outs are starred");
        assert!(table.contains("35.0"), "2100 seconds renders as 35.0 minutes");
    }

    #[test]
    fn test_csv_has_a_row_per_player_plus_header() {
        let result = sample_result();
        let mut buffer = Vec::new();
        write_box_csv(&mut buffer, &result).expect("write to memory");
        let text = String::from_utf8(buffer).expect("valid utf-8");
        let lines: Vec<&str> = text.trim_end().lines().collect();
        assert_eq!(lines.len(), 1 + 20, "header plus both ten-man rosters");
        assert!(lines[0].starts_with("game_id,seed,team,player"));
        assert!(lines[1].contains("hawk_01"));
        assert!(lines[1].contains("Scorer"));
    }
}
