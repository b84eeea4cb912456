use anyhow::{bail, Context, Result};
use duel_core::ShipConfig;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub max_ticks: u64,
    pub seeds: SeedSpec,
    #[serde(default = "default_max_initial_distance")]
    pub max_initial_distance: f64,
    #[serde(default)]
    pub ship: ShipOverrides,
}

fn default_max_initial_distance() -> f64 {
    1000.0
}

/// Per-ship parameter overrides applied symmetrically to both ships.
/// Absent fields keep the `ShipConfig` defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ShipOverrides {
    pub speed: Option<f64>,
    pub turn_rate_deg: Option<f64>,
    pub weapon_range: Option<f64>,
    pub weapon_half_angle_deg: Option<f64>,
}

impl ShipOverrides {
    pub fn apply(&self, config: &mut ShipConfig) {
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if let Some(turn_rate_deg) = self.turn_rate_deg {
            config.turn_rate_deg = turn_rate_deg;
        }
        if let Some(weapon_range) = self.weapon_range {
            config.weapon_range = weapon_range;
        }
        if let Some(weapon_half_angle_deg) = self.weapon_half_angle_deg {
            config.weapon_half_angle_deg = weapon_half_angle_deg;
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SeedSpec {
    List(Vec<u64>),
    Range { range: [u64; 2] },
}

impl SeedSpec {
    pub fn expand(&self) -> Vec<u64> {
        match self {
            SeedSpec::List(seeds) => seeds.clone(),
            SeedSpec::Range { range } => (range[0]..=range[1]).collect(),
        }
    }
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario file: {}", path.display()))?;
    let scenario: Scenario = serde_json::from_str(&json)
        .with_context(|| format!("parsing scenario file: {}", path.display()))?;
    if scenario.name.is_empty() {
        bail!("scenario 'name' must not be empty");
    }
    if scenario.max_ticks == 0 {
        bail!("scenario 'max_ticks' must be > 0");
    }
    if scenario.seeds.expand().is_empty() {
        bail!("scenario 'seeds' must produce at least one seed");
    }
    if scenario.max_initial_distance <= 0.0 {
        bail!("scenario 'max_initial_distance' must be > 0");
    }
    Ok(scenario)
}
