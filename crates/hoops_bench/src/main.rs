use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

mod overrides;
mod run_result;
mod runner;
mod scenario;
mod summary;

#[derive(Parser)]
#[command(
    name = "hoops_bench",
    about = "Monte Carlo scenario runner for game simulations"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file across multiple seeds.
    Run {
        /// Path to the scenario JSON file.
        #[arg(long)]
        scenario: String,
        /// Output directory (default: runs/).
        #[arg(long, default_value = "runs")]
        output_dir: String,
    },
}

#[allow(clippy::too_many_lines)]
fn run(scenario_path: &str, output_dir: &str) -> Result<()> {
    let scenario = scenario::load_scenario(Path::new(scenario_path))?;
    let seeds = scenario.seeds.expand();

    println!(
        "Loading scenario '{}': {} seeds, matchup dir {}",
        scenario.name,
        seeds.len(),
        scenario.matchup_dir
    );

    // Load the matchup and apply overrides.
    let mut setup = hoops_roster::load_matchup(Path::new(&scenario.matchup_dir))?;
    overrides::apply_overrides(&mut setup.config, &scenario.overrides)?;
    let report = hoops_core::ScoutingReport::compile(
        setup.injuries.clone(),
        setup.friction.clone(),
        &setup.home,
        &setup.away,
    )?;

    // Build scenario_params for trial_record metadata.
    let scenario_params = serde_json::json!({
        "matchup_dir": scenario.matchup_dir,
        "overrides": scenario.overrides,
    });

    // Create timestamped output directory.
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let run_dir = PathBuf::from(output_dir).join(format!("{}_{}", scenario.name, timestamp));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("creating output directory: {}", run_dir.display()))?;

    // Copy scenario file into output dir.
    std::fs::copy(scenario_path, run_dir.join("scenario.json")).context("copying scenario file")?;

    println!("Output: {}", run_dir.display());
    println!("Running {} seeds in parallel...", seeds.len());

    // Run all seeds in parallel.
    let outcomes: Vec<Result<runner::TrialOutcome>> = seeds
        .par_iter()
        .map(|&seed| {
            let seed_dir = run_dir.join(format!("seed_{seed}"));
            runner::run_trial(
                &setup,
                &report,
                seed,
                &seed_dir,
                &scenario.name,
                &scenario_params,
            )
        })
        .collect();

    // Collect results, reporting any failures.
    let mut trials = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(trial) => trials.push(trial),
            Err(err) => eprintln!("Seed failed: {err:#}"),
        }
    }

    if trials.is_empty() {
        anyhow::bail!("all seeds failed");
    }

    // Compute and print summary.
    let result_refs: Vec<&hoops_core::SimulationResult> =
        trials.iter().map(|t| &t.result).collect();
    let stats = summary::compute_summary(&result_refs);
    summary::print_summary(&scenario.name, &stats);

    let anomalous_seeds: Vec<u64> = trials
        .iter()
        .filter(|t| run_result::detect_anomalous(&t.result).0)
        .map(|t| t.seed)
        .collect();
    if !anomalous_seeds.is_empty() {
        println!("Anomalous seeds: {anomalous_seeds:?}");
    }

    // Write summary.json
    let summary_path = run_dir.join("summary.json");
    let summary_json = serde_json::to_string_pretty(&stats).context("serializing summary")?;
    std::fs::write(&summary_path, summary_json)
        .with_context(|| format!("writing {}", summary_path.display()))?;

    // Write projections.csv
    let projections_path = run_dir.join("projections.csv");
    let projections_file = std::fs::File::create(&projections_path)
        .with_context(|| format!("creating {}", projections_path.display()))?;
    summary::write_projections_csv(projections_file, &stats).context("writing projections csv")?;

    // Write batch_summary.json (contract v1 format)
    let batch_id = Uuid::new_v4().to_string();
    let run_ids: Vec<&str> = trials.iter().map(|t| t.run_id.as_str()).collect();
    let aggregated_metrics = summary::aggregated_metrics_json(&stats);

    let batch_summary = serde_json::json!({
        "batch_schema_version": 1,
        "batch_id": batch_id,
        "scenario_name": scenario.name,
        "scenario_params": scenario_params,
        "seed_count": trials.len(),
        "run_ids": run_ids,
        "home_wins": stats.home_wins,
        "away_wins": stats.away_wins,
        "draws": stats.draws,
        "anomalous_count": stats.anomalous_count,
        "aggregated_metrics": aggregated_metrics,
    });

    let batch_path = run_dir.join("batch_summary.json");
    let batch_tmp = batch_path.with_extension("json.tmp");
    let batch_json =
        serde_json::to_string_pretty(&batch_summary).context("serializing batch summary")?;
    let mut batch_file = std::fs::File::create(&batch_tmp)
        .with_context(|| format!("creating {}", batch_tmp.display()))?;
    batch_file
        .write_all(batch_json.as_bytes())
        .context("writing batch summary")?;
    batch_file.sync_all()?;
    std::fs::rename(&batch_tmp, &batch_path).context("renaming batch summary")?;

    println!("Summary written to {}", summary_path.display());
    println!("Projections written to {}", projections_path.display());
    println!("Batch summary written to {}", batch_path.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            scenario,
            output_dir,
        } => run(&scenario, &output_dir)?,
    }
    Ok(())
}
