use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct RunResult {
    pub run_schema_version: u32,
    pub run_status: String,
    pub run_id: String,
    pub git_sha: String,
    pub git_dirty: bool,
    pub seed: u64,
    pub scenario_name: String,
    pub scenario_params: serde_json::Value,
    pub outcome: String,
    pub decisive: bool,
    pub ticks: u64,
    pub initial_distance: Option<f64>,
    pub ship1_initial_angle_deg: Option<f64>,
    pub ship2_initial_angle_deg: Option<f64>,
    pub wall_time_ms: u64,
    pub sim_ticks_per_second: f64,
    pub records_path: String,
    pub error_message: Option<String>,
}

impl RunResult {
    /// Write JSON atomically: write to `.tmp` then rename.
    pub fn write_atomic(&self, path: &Path) -> anyhow::Result<()> {
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self)?;
        let mut file = std::fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
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

    fn sample_result() -> RunResult {
        RunResult {
            run_schema_version: 1,
            run_status: "completed".to_string(),
            run_id: "test-uuid".to_string(),
            git_sha: "abc123".to_string(),
            git_dirty: false,
            seed: 42,
            scenario_name: "baseline".to_string(),
            scenario_params: serde_json::json!({"max_ticks": 10_000}),
            outcome: "SHIP_1_WINS".to_string(),
            decisive: true,
            ticks: 738,
            initial_distance: Some(812.5),
            ship1_initial_angle_deg: Some(96.2),
            ship2_initial_angle_deg: Some(41.7),
            wall_time_ms: 12,
            sim_ticks_per_second: 61_500.0,
            records_path: "records_000.csv".to_string(),
            error_message: None,
        }
    }

    #[test]
    fn test_run_result_serialization() {
        let json = serde_json::to_string_pretty(&sample_result()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["run_schema_version"], 1);
        assert_eq!(parsed["run_status"], "completed");
        assert_eq!(parsed["seed"], 42);
        assert_eq!(parsed["outcome"], "SHIP_1_WINS");
        assert_eq!(parsed["decisive"], true);
        assert!(parsed["initial_distance"].as_f64().unwrap() > 0.0);
        assert!(parsed["error_message"].is_null());
    }

    #[test]
    fn test_atomic_write() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("run_result.json");

        sample_result().write_atomic(&path).unwrap();
        assert!(path.exists());
        // Tmp file should not remain
        assert!(!path.with_extension("json.tmp").exists());

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["run_schema_version"], 1);
        assert_eq!(parsed["ticks"], 738);
    }

    #[test]
    fn test_git_sha_not_empty() {
        // Build-time env vars should be set
        assert!(!git_sha().is_empty());
    }
}
