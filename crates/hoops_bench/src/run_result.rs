use hoops_core::{Anomaly, SimulationResult};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Per-trial metadata written next to the full `SimulationResult`.
#[derive(Debug, Serialize)]
pub struct TrialRecord {
    pub trial_schema_version: u32,
    pub run_status: String,
    pub run_id: String,
    pub git_sha: String,
    pub git_dirty: bool,
    pub seed: u64,
    pub scenario_name: String,
    pub scenario_params: serde_json::Value,
    pub wall_time_ms: u64,
    pub possessions_per_second: f64,
    pub summary_metrics: Option<GameMetrics>,
    pub anomalous: bool,
    pub anomaly_reason: Option<String>,
    pub result_path: String,
}

/// The headline numbers batch tooling aggregates without re-reading the
/// full result file.
#[derive(Debug, Serialize)]
pub struct GameMetrics {
    pub home_score: u32,
    pub away_score: u32,
    pub home_margin: i64,
    pub total_possessions: u32,
    pub overtime_periods: u8,
    pub was_clutch: bool,
    pub was_blowout: bool,
    pub friction_entries: usize,
    pub anomaly_count: usize,
}

impl GameMetrics {
    pub fn from_result(result: &SimulationResult) -> Self {
        Self {
            home_score: result.home.score,
            away_score: result.away.score,
            home_margin: i64::from(result.home.score) - i64::from(result.away.score),
            total_possessions: result.total_possessions,
            overtime_periods: result.overtime_periods,
            was_clutch: result.was_clutch,
            was_blowout: result.was_blowout,
            friction_entries: result.friction_log.len(),
            anomaly_count: result.anomalies.len(),
        }
    }
}

impl TrialRecord {
    pub fn write_atomic(&self, path: &Path) -> anyhow::Result<()> {
        write_json_atomic(self, path)
    }
}

/// Write pretty JSON atomically: write to `.tmp`, fsync, then rename. An
/// aborted batch never leaves a half-written artifact behind.
pub fn write_json_atomic<T: Serialize>(value: &T, path: &Path) -> anyhow::Result<()> {
    let tmp_path = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(value)?;
    let mut file = std::fs::File::create(&tmp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Flag a trial whose result carries recorded anomalies, with the first
/// anomaly kind as the reason.
pub fn detect_anomalous(result: &SimulationResult) -> (bool, Option<String>) {
    match result.anomalies.first() {
        Some(Anomaly::ProbabilityOutOfRange { .. }) => {
            (true, Some("probability_out_of_range".to_string()))
        }
        Some(Anomaly::OvertimeCapReached { .. }) => {
            (true, Some("overtime_cap_reached".to_string()))
        }
        None => (false, None),
    }
}

pub fn git_sha() -> String {
    env!("GIT_SHA").to_string()
}

pub fn git_dirty() -> bool {
    env!("GIT_DIRTY") == "true"
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoops_core::{Archetype, BoxLine, PlayerId, TeamBoxScore, TeamId};
    use uuid::Uuid;

    fn box_line(id: &str, name: &str, points: u32) -> BoxLine {
        BoxLine {
            player: PlayerId(id.to_string()),
            name: name.to_string(),
            archetype: Archetype::Balanced,
            points,
            rebounds: 4,
            assists: 3,
            steals: 1,
            blocks: 0,
            turnovers: 2,
            fouls: 3,
            fouled_out: false,
            seconds_played: 1800,
        }
    }

    fn sample_result() -> SimulationResult {
        SimulationResult {
            schema_version: 1,
            game_id: Uuid::nil(),
            seed: 42,
            home: TeamBoxScore {
                team_id: TeamId("home".to_string()),
                name: "Home".to_string(),
                score: 101,
                lines: vec![box_line("home_01", "A", 55), box_line("home_02", "B", 46)],
            },
            away: TeamBoxScore {
                team_id: TeamId("away".to_string()),
                name: "Away".to_string(),
                score: 95,
                lines: vec![box_line("away_01", "C", 50), box_line("away_02", "D", 45)],
            },
            period_scores: vec![(25, 24), (26, 20), (24, 26), (26, 25)],
            total_possessions: 198,
            overtime_periods: 0,
            was_clutch: false,
            was_blowout: false,
            friction_log: Vec::new(),
            anomalies: Vec::new(),
            duration_ms: 3,
        }
    }

    #[test]
    fn test_game_metrics_from_result() {
        let result = sample_result();
        let metrics = GameMetrics::from_result(&result);
        assert_eq!(metrics.home_score, 101);
        assert_eq!(metrics.away_score, 95);
        assert_eq!(metrics.home_margin, 6);
        assert_eq!(metrics.total_possessions, 198);
        assert_eq!(metrics.anomaly_count, 0);
    }

    #[test]
    fn test_home_margin_is_signed() {
        let mut result = sample_result();
        result.home.score = 90;
        result.away.score = 100;
        let metrics = GameMetrics::from_result(&result);
        assert_eq!(metrics.home_margin, -10);
    }

    #[test]
    fn test_trial_record_serialization() {
        let result = sample_result();
        let record = TrialRecord {
            trial_schema_version: 1,
            run_status: "completed".to_string(),
            run_id: "test-uuid".to_string(),
            git_sha: "abc123".to_string(),
            git_dirty: false,
            seed: 42,
            scenario_name: "baseline".to_string(),
            scenario_params: serde_json::json!({"matchup_dir": "./data"}),
            wall_time_ms: 5,
            possessions_per_second: 39_600.0,
            summary_metrics: Some(GameMetrics::from_result(&result)),
            anomalous: false,
            anomaly_reason: None,
            result_path: "result.json".to_string(),
        };

        let json = serde_json::to_string_pretty(&record).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["trial_schema_version"], 1);
        assert_eq!(parsed["run_status"], "completed");
        assert_eq!(parsed["seed"], 42);
        assert_eq!(parsed["summary_metrics"]["home_score"], 101);
    }

    #[test]
    fn test_atomic_write() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("trial_record.json");
        let record = TrialRecord {
            trial_schema_version: 1,
            run_status: "completed".to_string(),
            run_id: "test-uuid".to_string(),
            git_sha: "abc123".to_string(),
            git_dirty: false,
            seed: 7,
            scenario_name: "baseline".to_string(),
            scenario_params: serde_json::json!({}),
            wall_time_ms: 5,
            possessions_per_second: 0.0,
            summary_metrics: None,
            anomalous: false,
            anomaly_reason: None,
            result_path: "result.json".to_string(),
        };

        record.write_atomic(&path).unwrap();
        assert!(path.exists());
        // Tmp file should not remain
        assert!(!path.with_extension("json.tmp").exists());

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["seed"], 7);
    }

    #[test]
    fn test_detect_anomalous_clean() {
        let result = sample_result();
        let (anomalous, reason) = detect_anomalous(&result);
        assert!(!anomalous);
        assert!(reason.is_none());
    }

    #[test]
    fn test_detect_anomalous_flags_first_kind() {
        let mut result = sample_result();
        result.anomalies.push(Anomaly::OvertimeCapReached { periods: 8 });
        let (anomalous, reason) = detect_anomalous(&result);
        assert!(anomalous);
        assert_eq!(reason.as_deref(), Some("overtime_cap_reached"));

        result.anomalies.insert(
            0,
            Anomaly::ProbabilityOutOfRange {
                possession: 12,
                shooter: PlayerId("home_01".to_string()),
                computed: 1.2,
            },
        );
        let (_, reason) = detect_anomalous(&result);
        assert_eq!(reason.as_deref(), Some("probability_out_of_range"));
    }

    #[test]
    fn test_git_sha_not_empty() {
        // Build-time env vars should be set
        let sha = git_sha();
        assert!(!sha.is_empty());
    }
}
