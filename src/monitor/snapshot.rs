use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use super::states::MonitorState;

/// Progress view rebuilt from the artifacts on every poll
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRunState {
    pub state: MonitorState,
    /// Summary table rows, header excluded
    pub processed_count: usize,
    /// Elements of the structured-results artifact
    pub json_result_count: usize,
    /// Aggregate-totals entries with a strictly positive score
    pub unique_nonzero_categories: usize,
    pub elapsed: Duration,
    pub target_count: usize,
    /// Estimated time to reach the target at the rate observed since start
    pub eta: Option<Duration>,
    pub summary_modified_at: Option<DateTime<Utc>>,
    pub poll_cycle: u64,
}

impl BatchRunState {
    /// Snapshot before any artifact has been read
    pub fn initial(target_count: usize) -> Self {
        Self {
            state: MonitorState::Waiting,
            processed_count: 0,
            json_result_count: 0,
            unique_nonzero_categories: 0,
            elapsed: Duration::ZERO,
            target_count,
            eta: None,
            summary_modified_at: None,
            poll_cycle: 0,
        }
    }

    pub fn progress_percent(&self) -> f64 {
        if self.target_count == 0 {
            return 100.0;
        }
        self.processed_count as f64 / self.target_count as f64 * 100.0
    }

    /// Profiles per second over the whole elapsed time
    pub fn throughput(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds <= 0.0 {
            return 0.0;
        }
        self.processed_count as f64 / seconds
    }

    pub fn remaining(&self) -> usize {
        self.target_count.saturating_sub(self.processed_count)
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_terminal()
    }

    /// One-line human summary with counts, percentage, and elapsed time
    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "Progress: {}/{} profiles ({:.1}%) | JSON: {} | Unique categories: {} | \
             Rate: {:.2}/s | Elapsed: {}",
            self.processed_count,
            self.target_count,
            self.progress_percent(),
            self.json_result_count,
            self.unique_nonzero_categories,
            self.throughput(),
            format_duration(self.elapsed),
        );
        if let Some(eta) = self.eta {
            line.push_str(&format!(" | ETA: {}", format_duration(eta)));
        }
        line
    }
}

/// `HH:MM:SS`, hours unbounded
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Remaining work divided by the rate observed between two readings
pub fn estimate_eta(
    baseline: usize,
    processed: usize,
    over: Duration,
    target: usize,
) -> Option<Duration> {
    let done = processed.checked_sub(baseline).filter(|done| *done > 0)?;
    let seconds = over.as_secs_f64();
    if seconds <= 0.0 {
        return None;
    }
    let rate = done as f64 / seconds;
    let remaining = target.saturating_sub(processed) as f64;
    // Unrepresentable estimates (huge targets, tiny rates) are simply unknown
    Duration::try_from_secs_f64(remaining / rate).ok()
}
