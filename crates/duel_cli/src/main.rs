use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use duel_core::{run_duel, DuelReport, RecordFileWriter, Ship, ShipConfig, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "duel_cli", about = "Two-ship duel simulation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single duel to termination or tick budget exhaustion.
    Run {
        /// Tick budget for the run.
        #[arg(long, default_value_t = 10_000)]
        ticks: u64,
        /// Seed for the run's randomness. Random when omitted.
        #[arg(long)]
        seed: Option<u64>,
        /// Duel config JSON with explicit ship parameters. Ships are
        /// placed randomly when omitted.
        #[arg(long)]
        scenario: Option<String>,
        /// Radius of the random placement sphere (no-scenario runs).
        #[arg(long, default_value_t = 1000.0)]
        max_distance: f64,
        /// Print a status line every N ticks.
        #[arg(long, default_value_t = 100)]
        print_every: u64,
        /// Disable the per-run records CSV under runs/.
        #[arg(long)]
        no_records: bool,
    },
}

/// Explicit duel setup: both ships fully configured.
#[derive(Debug, Deserialize)]
struct DuelScenario {
    ship1: ShipConfig,
    ship2: ShipConfig,
}

// ---------------------------------------------------------------------------
// Run directory helpers
// ---------------------------------------------------------------------------

fn generate_run_id(seed: u64) -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = now.as_secs();
    // Manual UTC time formatting to avoid adding chrono dependency.
    let days = secs / 86400;
    let time_of_day = secs % 86400;
    let hours = time_of_day / 3600;
    let minutes = (time_of_day % 3600) / 60;
    let seconds = time_of_day % 60;

    // Days since epoch → year/month/day (simplified Gregorian).
    let (year, month, day) = epoch_days_to_date(days);

    format!("{year:04}{month:02}{day:02}_{hours:02}{minutes:02}{seconds:02}_seed{seed}")
}

fn epoch_days_to_date(mut days: u64) -> (u64, u64, u64) {
    // Algorithm from http://howardhinnant.github.io/date_algorithms.html
    days += 719_468;
    let era = days / 146_097;
    let day_of_era = days % 146_097;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36524 - day_of_era / 146_096) / 365;
    let year = year_of_era + era * 400;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let mp = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = if month <= 2 { year + 1 } else { year };
    (year, month, day)
}

fn create_run_dir(run_id: &str) -> Result<std::path::PathBuf> {
    let dir = std::path::PathBuf::from("runs").join(run_id);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating run directory: {}", dir.display()))?;
    Ok(dir)
}

fn write_run_info(
    dir: &std::path::Path,
    run_id: &str,
    seed: u64,
    ticks: u64,
    scenario: Option<&str>,
    max_distance: f64,
) -> Result<()> {
    let info = serde_json::json!({
        "run_id": run_id,
        "seed": seed,
        "start_time": run_id.split('_').take(2).collect::<Vec<_>>().join("_"),
        "runner": "duel_cli",
        "args": {
            "ticks": ticks,
            "scenario": scenario,
            "max_distance": max_distance,
        }
    });
    let path = dir.join("run_info.json");
    let file =
        std::fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, &info)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Run loop
// ---------------------------------------------------------------------------

fn load_scenario(path: &str) -> Result<DuelScenario> {
    let json =
        std::fs::read_to_string(path).with_context(|| format!("reading scenario file: {path}"))?;
    serde_json::from_str(&json).with_context(|| format!("parsing scenario file: {path}"))
}

/// Random ship placement used when no scenario is given: position on a
/// sphere of radius `max_distance`, heading uniform on the unit sphere,
/// everything else at defaults.
fn random_ship_config(rng: &mut impl Rng, max_distance: f64) -> ShipConfig {
    ShipConfig {
        position: Vec3::random_direction(rng) * max_distance,
        heading: Vec3::random_direction(rng),
        ..ShipConfig::default()
    }
}

fn run(
    ticks: u64,
    seed: Option<u64>,
    scenario_path: Option<&str>,
    max_distance: f64,
    print_every: u64,
    no_records: bool,
) -> Result<()> {
    let resolved_seed = seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(resolved_seed);

    let (config1, config2) = if let Some(path) = scenario_path {
        let scenario = load_scenario(path)?;
        (scenario.ship1, scenario.ship2)
    } else {
        (
            random_ship_config(&mut rng, max_distance),
            random_ship_config(&mut rng, max_distance),
        )
    };

    let ship1 = Ship::from_config(&config1).context("building ship1")?;
    let ship2 = Ship::from_config(&config2).context("building ship2")?;

    println!(
        "Starting duel: ticks={ticks} seed={resolved_seed} initial_distance={:.1}",
        ship1.distance_to(ship2.position)
    );
    println!("{}", "-".repeat(80));

    let report = run_duel(ship1, ship2, ticks, &mut rng).context("running duel")?;

    let print_every = print_every.max(1);
    for record in &report.records {
        let is_last = record.index + 1 == report.run_length() as u64;
        if record.index % print_every == 0 || is_last {
            print_status(record);
        }
    }

    println!("{}", "-".repeat(80));
    print_summary(&report);

    if !no_records {
        let run_id = generate_run_id(resolved_seed);
        let run_dir = create_run_dir(&run_id)?;
        write_run_info(
            &run_dir,
            &run_id,
            resolved_seed,
            ticks,
            scenario_path,
            max_distance,
        )?;
        let mut writer = RecordFileWriter::new(run_dir.clone())
            .with_context(|| format!("opening records CSV in {}", run_dir.display()))?;
        for record in &report.records {
            writer.write_row(record).context("writing record row")?;
        }
        writer.flush().context("final records flush")?;
        println!("Records written to {}", run_dir.display());
    }

    Ok(())
}

fn print_status(record: &duel_core::TickRecord) {
    println!(
        "[tick={:05}]  result={:<14}  dist={:>10.2}  angle1={:>7.2}  angle2={:>7.2}  \
         strat1={:<14}  strat2={:<14}",
        record.index,
        record.result.as_str(),
        record.ship_distance,
        record.ship1_angle_to_enemy,
        record.ship2_angle_to_enemy,
        record.ship1_strategy.as_str(),
        record.ship2_strategy.as_str(),
    );
}

fn print_summary(report: &DuelReport) {
    println!("RESULT: {}", report.outcome());
    println!("TICKS: {}", report.run_length());
    if let Some(distance) = report.initial_distance() {
        println!("INITIAL DISTANCE: {distance:.2}");
    }
    if let Some((angle1, angle2)) = report.initial_angles() {
        println!("INITIAL ANGLES: ship1={angle1:.2}  ship2={angle2:.2}");
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            ticks,
            seed,
            scenario,
            max_distance,
            print_every,
            no_records,
        } => run(
            ticks,
            seed,
            scenario.as_deref(),
            max_distance,
            print_every,
            no_records,
        )?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_epoch_days_to_date_known_values() {
        assert_eq!(epoch_days_to_date(0), (1970, 1, 1));
        assert_eq!(epoch_days_to_date(19_723), (2024, 1, 1));
    }

    #[test]
    fn test_run_id_shape() {
        let run_id = generate_run_id(42);
        let parts: Vec<&str> = run_id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 8);
        assert_eq!(parts[1].len(), 6);
        assert_eq!(parts[2], "seed42");
    }

    #[test]
    fn test_load_scenario_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{
            "ship1": {"position": {"x": 0.0, "y": 0.0, "z": 0.0}, "speed": 2.0},
            "ship2": {"position": {"x": 200.0, "y": 200.0, "z": 200.0}}
        }"#,
        )
        .unwrap();
        let scenario = load_scenario(file.path().to_str().unwrap()).unwrap();
        assert!((scenario.ship1.speed - 2.0).abs() < 1e-9);
        // Omitted fields fall back to defaults.
        assert!((scenario.ship2.speed - 1.0).abs() < 1e-9);
        assert!((scenario.ship2.position.x - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_random_ship_config_on_sphere() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..20 {
            let config = random_ship_config(&mut rng, 1000.0);
            assert!((config.position.magnitude() - 1000.0).abs() < 1e-6);
            assert!((config.heading.magnitude() - 1.0).abs() < 1e-9);
        }
    }
}
