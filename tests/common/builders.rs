//! Builders for pipeline artifact fixtures.

use std::fs;
use tempfile::TempDir;

use natal_batch::config::MonitorConfig;

pub const SUMMARY_HEADER: &str = "profile_id,name,date,time,lat,lon,top1_animal,top1_score";

/// Temporary directory standing in for the pipeline's `outputs/` folder
pub struct ArtifactFixture {
    dir: TempDir,
    config: MonitorConfig,
}

impl ArtifactFixture {
    pub fn new(target_count: usize) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = MonitorConfig {
            target_count,
            poll_interval_ms: 10,
            ..MonitorConfig::default()
        }
        .with_artifact_dir(dir.path());

        Self { dir, config }
    }

    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.config.poll_interval_ms = interval_ms;
        self
    }

    pub fn config(&self) -> MonitorConfig {
        self.config.clone()
    }

    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }

    /// Summary table with a header and `rows` data lines
    pub fn write_summary(&self, rows: usize) {
        let mut content = String::from(SUMMARY_HEADER);
        content.push('\n');
        for i in 0..rows {
            content.push_str(&format!("{},,1970-01-01,12:00,0.0,0.0,Wolf,10.0\n", i + 1));
        }
        fs::write(&self.config.summary_path, content).expect("Failed to write summary");
    }

    pub fn write_results(&self, count: usize) {
        let results: Vec<serde_json::Value> = (0..count)
            .map(|i| serde_json::json!({"profile_id": i + 1, "status": "success"}))
            .collect();
        fs::write(
            &self.config.results_path,
            serde_json::to_string(&results).unwrap(),
        )
        .expect("Failed to write results");
    }

    /// Totals with the given scores, one entry per score
    pub fn write_totals(&self, scores: &[f64]) {
        let totals: Vec<serde_json::Value> = scores
            .iter()
            .enumerate()
            .map(|(i, score)| {
                serde_json::json!({"ANIMAL": format!("Animal {i}"), "TOTAL_SCORE": score})
            })
            .collect();
        fs::write(
            &self.config.totals_path,
            serde_json::to_string(&totals).unwrap(),
        )
        .expect("Failed to write totals");
    }

    /// Simulate a writer caught mid-flush
    pub fn write_torn_results(&self) {
        fs::write(&self.config.results_path, "[{\"profile_id\": 1}, {\"profile_")
            .expect("Failed to write results");
    }
}
