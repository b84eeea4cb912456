use crate::run_result::{self, RunResult};
use crate::scenario::Scenario;
use anyhow::{Context, Result};
use duel_core::{run_duel, Outcome, RecordFileWriter, Ship, ShipConfig, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use std::time::Instant;
use uuid::Uuid;

pub struct SeedResult {
    pub seed: u64,
    pub outcome: Outcome,
    pub decisive: bool,
    pub ticks: u64,
    pub initial_distance: Option<f64>,
    #[allow(dead_code)]
    pub wall_time_ms: u64,
    pub run_id: String,
}

/// Position on a sphere of radius `max_initial_distance`, random
/// heading, everything else from the scenario's ship overrides.
fn random_ship_config(scenario: &Scenario, rng: &mut impl Rng) -> ShipConfig {
    let mut config = ShipConfig {
        position: Vec3::random_direction(rng) * scenario.max_initial_distance,
        heading: Vec3::random_direction(rng),
        ..ShipConfig::default()
    };
    scenario.ship.apply(&mut config);
    config
}

pub fn run_seed(
    scenario: &Scenario,
    seed: u64,
    seed_dir: &Path,
    scenario_params: &serde_json::Value,
) -> Result<SeedResult> {
    let run_id = Uuid::new_v4().to_string();
    let start = Instant::now();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let config1 = random_ship_config(scenario, &mut rng);
    let config2 = random_ship_config(scenario, &mut rng);
    let ship1 = Ship::from_config(&config1).context("building ship1")?;
    let ship2 = Ship::from_config(&config2).context("building ship2")?;

    std::fs::create_dir_all(seed_dir)
        .with_context(|| format!("creating seed directory: {}", seed_dir.display()))?;

    let report = run_duel(ship1, ship2, scenario.max_ticks, &mut rng)
        .with_context(|| format!("running duel for seed {seed}"))?;

    let mut records_writer = RecordFileWriter::new(seed_dir.to_path_buf())
        .with_context(|| format!("opening records CSV in {}", seed_dir.display()))?;
    for record in &report.records {
        records_writer
            .write_row(record)
            .context("writing record row")?;
    }
    records_writer.flush().context("flushing records")?;

    let ticks = report.run_length() as u64;
    #[allow(clippy::cast_possible_truncation)]
    let wall_time_ms = start.elapsed().as_millis() as u64;
    let sim_ticks_per_second = if wall_time_ms > 0 {
        (ticks as f64) / (wall_time_ms as f64 / 1000.0)
    } else {
        0.0
    };

    let initial_angles = report.initial_angles();
    let run_result = RunResult {
        run_schema_version: 1,
        run_status: "completed".to_string(),
        run_id: run_id.clone(),
        git_sha: run_result::git_sha(),
        git_dirty: run_result::git_dirty(),
        seed,
        scenario_name: scenario.name.clone(),
        scenario_params: scenario_params.clone(),
        outcome: report.outcome().as_str().to_string(),
        decisive: report.is_decisive(),
        ticks,
        initial_distance: report.initial_distance(),
        ship1_initial_angle_deg: initial_angles.map(|(a, _)| a),
        ship2_initial_angle_deg: initial_angles.map(|(_, a)| a),
        wall_time_ms,
        sim_ticks_per_second,
        records_path: "records_000.csv".to_string(),
        error_message: None,
    };

    run_result
        .write_atomic(&seed_dir.join("run_result.json"))
        .context("writing run_result.json")?;

    Ok(SeedResult {
        seed,
        outcome: report.outcome(),
        decisive: report.is_decisive(),
        ticks,
        initial_distance: report.initial_distance(),
        wall_time_ms,
        run_id,
    })
}
