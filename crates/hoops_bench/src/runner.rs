use crate::run_result::{self, GameMetrics, TrialRecord};
use anyhow::{Context, Result};
use hoops_core::{GameDriver, ScoutingReport, SimulationResult};
use hoops_roster::MatchupSetup;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use std::time::Instant;
use uuid::Uuid;

pub struct TrialOutcome {
    pub seed: u64,
    pub result: SimulationResult,
    #[allow(dead_code)]
    pub wall_time_ms: u64,
    pub run_id: String,
}

pub fn run_trial(
    setup: &MatchupSetup,
    report: &ScoutingReport,
    seed: u64,
    seed_dir: &Path,
    scenario_name: &str,
    scenario_params: &serde_json::Value,
) -> Result<TrialOutcome> {
    let run_id = Uuid::new_v4().to_string();
    let start = Instant::now();

    let driver = GameDriver::new(
        setup.home.clone(),
        setup.away.clone(),
        setup.config.clone(),
        report,
        seed,
    )?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let result = driver.run(&mut rng);

    std::fs::create_dir_all(seed_dir)
        .with_context(|| format!("creating seed directory: {}", seed_dir.display()))?;

    let result_path = seed_dir.join("result.json");
    run_result::write_json_atomic(&result, &result_path)
        .with_context(|| format!("writing {}", result_path.display()))?;

    #[allow(clippy::cast_possible_truncation)]
    let wall_time_ms = start.elapsed().as_millis() as u64;
    let possessions_per_second = if wall_time_ms > 0 {
        f64::from(result.total_possessions) / (wall_time_ms as f64 / 1000.0)
    } else {
        0.0
    };

    let (anomalous, anomaly_reason) = run_result::detect_anomalous(&result);

    let record = TrialRecord {
        trial_schema_version: 1,
        run_status: "completed".to_string(),
        run_id: run_id.clone(),
        git_sha: run_result::git_sha(),
        git_dirty: run_result::git_dirty(),
        seed,
        scenario_name: scenario_name.to_string(),
        scenario_params: scenario_params.clone(),
        wall_time_ms,
        possessions_per_second,
        summary_metrics: Some(GameMetrics::from_result(&result)),
        anomalous,
        anomaly_reason,
        result_path: "result.json".to_string(),
    };

    record
        .write_atomic(&seed_dir.join("trial_record.json"))
        .context("writing trial_record.json")?;

    Ok(TrialOutcome {
        seed,
        result,
        wall_time_ms,
        run_id,
    })
}
