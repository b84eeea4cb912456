use crate::runner::SeedResult;
use duel_core::Outcome;
use serde::Serialize;

/// Fixed display/serialization order for outcome groups.
const OUTCOME_ORDER: [Outcome; 4] = [
    Outcome::Ship1Wins,
    Outcome::Ship2Wins,
    Outcome::BothDestroyed,
    Outcome::Ongoing,
];

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub seed_count: usize,
    pub decisive_count: usize,
    pub outcome_counts: Vec<OutcomeCount>,
    pub overall: GroupStats,
    pub by_outcome: Vec<OutcomeGroup>,
}

#[derive(Debug, Serialize)]
pub struct OutcomeCount {
    pub outcome: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct OutcomeGroup {
    pub outcome: String,
    pub count: usize,
    pub stats: GroupStats,
}

#[derive(Debug, Serialize)]
pub struct GroupStats {
    pub run_length: MetricSummary,
    pub initial_distance: MetricSummary,
}

#[derive(Debug, Serialize)]
pub struct MetricSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub stddev: f64,
}

pub fn compute_summary(results: &[SeedResult]) -> SummaryStats {
    let seed_count = results.len();
    let decisive_count = results.iter().filter(|r| r.decisive).count();

    let outcome_counts = OUTCOME_ORDER
        .iter()
        .map(|&outcome| OutcomeCount {
            outcome: outcome.as_str().to_string(),
            count: results.iter().filter(|r| r.outcome == outcome).count(),
        })
        .collect();

    let by_outcome = OUTCOME_ORDER
        .iter()
        .filter_map(|&outcome| {
            let group: Vec<&SeedResult> =
                results.iter().filter(|r| r.outcome == outcome).collect();
            if group.is_empty() {
                return None;
            }
            Some(OutcomeGroup {
                outcome: outcome.as_str().to_string(),
                count: group.len(),
                stats: group_stats(&group),
            })
        })
        .collect();

    let all: Vec<&SeedResult> = results.iter().collect();
    SummaryStats {
        seed_count,
        decisive_count,
        outcome_counts,
        overall: group_stats(&all),
        by_outcome,
    }
}

fn group_stats(results: &[&SeedResult]) -> GroupStats {
    let run_lengths: Vec<f64> = results.iter().map(|r| r.ticks as f64).collect();
    let distances: Vec<f64> = results
        .iter()
        .filter_map(|r| r.initial_distance)
        .collect();
    GroupStats {
        run_length: compute_metric_summary(&run_lengths),
        initial_distance: compute_metric_summary(&distances),
    }
}

fn compute_metric_summary(values: &[f64]) -> MetricSummary {
    if values.is_empty() {
        return MetricSummary {
            mean: 0.0,
            min: 0.0,
            max: 0.0,
            stddev: 0.0,
        };
    }
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
    let stddev = variance.sqrt();

    MetricSummary {
        mean,
        min,
        max,
        stddev,
    }
}

pub fn print_summary(scenario_name: &str, max_ticks: u64, stats: &SummaryStats) {
    let tick_display = if max_ticks >= 1000 {
        format!("{}k", max_ticks / 1000)
    } else {
        max_ticks.to_string()
    };
    println!(
        "\n=== {} ({} seeds, up to {} ticks each) ===\n",
        scenario_name, stats.seed_count, tick_display
    );

    for entry in &stats.outcome_counts {
        println!("{:<30} {:>8}", entry.outcome, entry.count);
    }
    println!(
        "{:<30} {}/{}",
        "decisive", stats.decisive_count, stats.seed_count
    );

    println!(
        "\n{:<30} {:>10} {:>10} {:>10} {:>10}",
        "Metric", "Mean", "Min", "Max", "StdDev"
    );
    println!("{}", "-".repeat(76));
    print_group_rows("overall", &stats.overall);
    for group in &stats.by_outcome {
        print_group_rows(&group.outcome, &group.stats);
    }
}

fn print_group_rows(label: &str, stats: &GroupStats) {
    print_metric_row(&format!("run_length ({label})"), &stats.run_length);
    print_metric_row(&format!("initial_distance ({label})"), &stats.initial_distance);
}

fn print_metric_row(name: &str, metric: &MetricSummary) {
    println!(
        "{:<30} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
        name, metric.mean, metric.min, metric.max, metric.stddev
    );
}
