//! Command-line runner: one seeded game from a matchup directory, with the
//! box score on stdout and JSON/CSV artifacts on disk.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hoops_core::{GameDriver, ScoutingReport};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hoops_cli", about = "Possession-by-possession game simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one game.
    Run {
        /// Directory with home.json and away.json, plus optional
        /// injuries.json, friction.json, and config.json.
        #[arg(long, default_value = "./data")]
        matchup_dir: String,
        /// Omit for a fresh entropy seed (non-reproducible by design).
        #[arg(long)]
        seed: Option<u64>,
        /// Print every friction-log entry instead of just the count.
        #[arg(long)]
        full_log: bool,
        /// Skip writing runs/<run_id>/ artifacts.
        #[arg(long)]
        no_artifact: bool,
    },
    /// Generate a sample matchup directory.
    Gen {
        #[arg(long, default_value = "./data")]
        out_dir: String,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

// ---------------------------------------------------------------------------
// Run id helpers
// ---------------------------------------------------------------------------

fn generate_run_id(seed: u64) -> String {
    // Manual UTC time formatting to avoid adding a chrono dependency.
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = now.as_secs();
    let days = secs / 86_400;
    let (year, month, day) = epoch_days_to_date(days);
    let secs_of_day = secs % 86_400;
    let hour = secs_of_day / 3600;
    let minute = (secs_of_day % 3600) / 60;
    let second = secs_of_day % 60;
    format!("game_{year:04}{month:02}{day:02}_{hour:02}{minute:02}{second:02}_seed{seed}")
}

/// Civil-from-days conversion (howardhinnant.github.io/date_algorithms.html).
fn epoch_days_to_date(days: u64) -> (u64, u64, u64) {
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z % 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + u64::from(month <= 2);
    (year, month, day)
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn run(matchup_dir: &str, seed: Option<u64>, full_log: bool, no_artifact: bool) -> Result<()> {
    let setup = hoops_roster::load_matchup(Path::new(matchup_dir))?;
    let resolved_seed = seed.unwrap_or_else(rand::random);
    let report = ScoutingReport::compile(
        setup.injuries,
        setup.friction,
        &setup.home,
        &setup.away,
    )?;
    let driver = GameDriver::new(setup.home, setup.away, setup.config, &report, resolved_seed)?;
    let mut rng = ChaCha8Rng::seed_from_u64(resolved_seed);
    let result = driver.run(&mut rng);

    println!("Seed: {resolved_seed}");
    print!("{}", hoops_core::render_table(&result));
    if full_log {
        for entry in &result.friction_log {
            let defender = entry
                .defender
                .as_ref()
                .map_or("(uncontested)", |id| id.0.as_str());
            println!(
                "  #{:03} {:?} {} vs {}: {:.3} -> {:.3}",
                entry.possession,
                entry.shot_class,
                entry.shooter,
                defender,
                entry.original_pct,
                entry.adjusted_pct
            );
        }
    }
    for anomaly in &result.anomalies {
        println!("anomaly: {anomaly:?}");
    }

    if !no_artifact {
        let run_dir = PathBuf::from("runs").join(generate_run_id(resolved_seed));
        std::fs::create_dir_all(&run_dir)
            .with_context(|| format!("creating run dir: {}", run_dir.display()))?;

        let json_path = run_dir.join("result.json");
        let json = serde_json::to_string_pretty(&result).context("serializing result")?;
        std::fs::write(&json_path, json)
            .with_context(|| format!("writing {}", json_path.display()))?;

        let csv_path = run_dir.join("box_score.csv");
        let mut csv_file = std::fs::File::create(&csv_path)
            .with_context(|| format!("creating {}", csv_path.display()))?;
        hoops_core::write_box_csv(&mut csv_file, &result).context("writing box score csv")?;

        println!("\nArtifacts: {}", run_dir.display());
    }
    Ok(())
}

fn generate(out_dir: &str, seed: u64) -> Result<()> {
    let dir = PathBuf::from(out_dir);
    hoops_roster::write_sample_matchup(&dir, seed)?;
    println!("Wrote sample matchup to {}", dir.display());
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Run {
            matchup_dir,
            seed,
            full_log,
            no_artifact,
        } => run(&matchup_dir, seed, full_log, no_artifact),
        Commands::Gen { out_dir, seed } => generate(&out_dir, seed),
    };
    if let Err(err) = outcome {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
