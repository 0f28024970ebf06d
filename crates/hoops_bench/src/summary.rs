use hoops_core::{Side, SimulationResult};
use serde::Serialize;
use std::collections::HashMap;

type Extractor = (&'static str, Box<dyn Fn(&SimulationResult) -> f64>);

#[derive(Debug, Serialize)]
pub struct BatchStats {
    pub trial_count: usize,
    pub home_wins: usize,
    pub away_wins: usize,
    pub draws: usize,
    pub clutch_count: usize,
    pub blowout_count: usize,
    pub anomalous_count: usize,
    pub metrics: Vec<MetricSummary>,
    pub players: Vec<PlayerProjection>,
}

#[derive(Debug, Serialize)]
pub struct MetricSummary {
    pub name: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub stddev: f64,
}

/// Per-player stat distribution across the batch, in roster order.
#[derive(Debug, Serialize)]
pub struct PlayerProjection {
    pub player: String,
    pub name: String,
    pub team: String,
    pub points: StatBand,
    pub rebounds: StatBand,
    pub assists: StatBand,
}

/// floor = 10th percentile, expected = mean, ceiling = 90th percentile.
#[derive(Debug, Serialize)]
pub struct StatBand {
    pub floor: f64,
    pub expected: f64,
    pub ceiling: f64,
}

pub fn compute_summary(results: &[&SimulationResult]) -> BatchStats {
    let trial_count = results.len();
    let home_wins = results
        .iter()
        .filter(|r| matches!(r.winner(), Some(Side::Home)))
        .count();
    let away_wins = results
        .iter()
        .filter(|r| matches!(r.winner(), Some(Side::Away)))
        .count();
    let draws = results.iter().filter(|r| r.winner().is_none()).count();
    let clutch_count = results.iter().filter(|r| r.was_clutch).count();
    let blowout_count = results.iter().filter(|r| r.was_blowout).count();
    let anomalous_count = results.iter().filter(|r| !r.anomalies.is_empty()).count();

    let extractors: Vec<Extractor> = vec![
        ("home_score", Box::new(|r| f64::from(r.home.score))),
        ("away_score", Box::new(|r| f64::from(r.away.score))),
        (
            "home_margin",
            Box::new(|r| f64::from(r.home.score) - f64::from(r.away.score)),
        ),
        (
            "total_possessions",
            Box::new(|r| f64::from(r.total_possessions)),
        ),
        (
            "overtime_periods",
            Box::new(|r| f64::from(r.overtime_periods)),
        ),
        (
            "friction_entries",
            Box::new(|r| r.friction_log.len() as f64),
        ),
    ];

    let metrics = extractors
        .iter()
        .map(|(name, extract)| {
            let values: Vec<f64> = results.iter().map(|r| extract(r)).collect();
            compute_metric_summary(name, &values)
        })
        .collect();

    BatchStats {
        trial_count,
        home_wins,
        away_wins,
        draws,
        clutch_count,
        blowout_count,
        anomalous_count,
        metrics,
        players: build_projections(results),
    }
}

fn compute_metric_summary(name: &str, values: &[f64]) -> MetricSummary {
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
    let stddev = variance.sqrt();

    MetricSummary {
        name: name.to_string(),
        mean,
        min,
        max,
        stddev,
    }
}

fn build_projections(results: &[&SimulationResult]) -> Vec<PlayerProjection> {
    struct Accum {
        player: String,
        name: String,
        team: String,
        points: Vec<f64>,
        rebounds: Vec<f64>,
        assists: Vec<f64>,
    }

    let mut order: Vec<Accum> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for result in results {
        for team_box in [&result.home, &result.away] {
            for line in &team_box.lines {
                let slot = *index.entry(line.player.0.clone()).or_insert_with(|| {
                    order.push(Accum {
                        player: line.player.0.clone(),
                        name: line.name.clone(),
                        team: team_box.name.clone(),
                        points: Vec::new(),
                        rebounds: Vec::new(),
                        assists: Vec::new(),
                    });
                    order.len() - 1
                });
                let accum = &mut order[slot];
                accum.points.push(f64::from(line.points));
                accum.rebounds.push(f64::from(line.rebounds));
                accum.assists.push(f64::from(line.assists));
            }
        }
    }

    order
        .into_iter()
        .map(|mut accum| PlayerProjection {
            player: accum.player,
            name: accum.name,
            team: accum.team,
            points: stat_band(&mut accum.points),
            rebounds: stat_band(&mut accum.rebounds),
            assists: stat_band(&mut accum.assists),
        })
        .collect()
}

fn stat_band(values: &mut [f64]) -> StatBand {
    values.sort_by(f64::total_cmp);
    let n = values.len();
    StatBand {
        floor: values[percentile_rank(n, 10) - 1],
        expected: values.iter().sum::<f64>() / n as f64,
        ceiling: values[percentile_rank(n, 90) - 1],
    }
}

/// Nearest-rank percentile: the smallest rank r with r/n >= p/100.
fn percentile_rank(n: usize, p: usize) -> usize {
    (p * n).div_ceil(100).max(1)
}

/// Aggregates in the contract format:
/// `{ "key": { "mean": ..., "min": ..., "max": ..., "stddev": ... }, ... }`
pub fn aggregated_metrics_json(stats: &BatchStats) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for metric in &stats.metrics {
        map.insert(
            metric.name.clone(),
            serde_json::json!({
                "mean": metric.mean,
                "min": metric.min,
                "max": metric.max,
                "stddev": metric.stddev,
            }),
        );
    }
    serde_json::Value::Object(map)
}

pub fn print_summary(scenario_name: &str, stats: &BatchStats) {
    println!(
        "\n=== {} ({} trials) ===\n",
        scenario_name, stats.trial_count
    );
    println!(
        "{:<24} {:>8} {:>8} {:>8} {:>8}",
        "Metric", "Mean", "Min", "Max", "StdDev"
    );
    println!("{}", "-".repeat(60));
    for metric in &stats.metrics {
        println!(
            "{:<24} {:>8.2} {:>8.2} {:>8.2} {:>8.2}",
            metric.name, metric.mean, metric.min, metric.max, metric.stddev
        );
    }
    println!();
    println!(
        "{:<24} {}-{} ({} draws)",
        "record (home-away)", stats.home_wins, stats.away_wins, stats.draws
    );
    println!(
        "{:<24} {}/{}",
        "clutch_rate", stats.clutch_count, stats.trial_count
    );
    println!(
        "{:<24} {}/{}",
        "blowout_rate", stats.blowout_count, stats.trial_count
    );
    println!(
        "{:<24} {}/{}",
        "anomalous_rate", stats.anomalous_count, stats.trial_count
    );

    let mut by_points: Vec<&PlayerProjection> = stats.players.iter().collect();
    by_points.sort_by(|a, b| b.points.expected.total_cmp(&a.points.expected));
    println!(
        "\n{:<22} {:<22} {:>7} {:>7} {:>7}",
        "Player", "Team", "Floor", "Exp", "Ceil"
    );
    for proj in by_points.iter().take(10) {
        println!(
            "{:<22} {:<22} {:>7.1} {:>7.1} {:>7.1}",
            proj.name, proj.team, proj.points.floor, proj.points.expected, proj.points.ceiling
        );
    }
}

pub fn write_projections_csv<W: std::io::Write>(writer: W, stats: &BatchStats) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "player",
        "name",
        "team",
        "points_floor",
        "points_expected",
        "points_ceiling",
        "rebounds_floor",
        "rebounds_expected",
        "rebounds_ceiling",
        "assists_floor",
        "assists_expected",
        "assists_ceiling",
    ])?;
    for proj in &stats.players {
        let row = vec![
            proj.player.clone(),
            proj.name.clone(),
            proj.team.clone(),
            format!("{:.1}", proj.points.floor),
            format!("{:.1}", proj.points.expected),
            format!("{:.1}", proj.points.ceiling),
            format!("{:.1}", proj.rebounds.floor),
            format!("{:.1}", proj.rebounds.expected),
            format!("{:.1}", proj.rebounds.ceiling),
            format!("{:.1}", proj.assists.floor),
            format!("{:.1}", proj.assists.expected),
            format!("{:.1}", proj.assists.ceiling),
        ];
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}
