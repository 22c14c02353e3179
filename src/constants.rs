//! # System Constants
//!
//! Default artifact locations, cadence, and field names shared by the
//! normalizer and the progress monitor.

/// Artifacts written incrementally by the external scoring pipeline
pub mod artifacts {
    pub const SUMMARY_PATH: &str = "outputs/supabase_batch_summary.csv";
    pub const RESULTS_PATH: &str = "outputs/supabase_batch_results.json";
    pub const TOTALS_PATH: &str = "outputs/animal_totals.json";

    /// Score field of each aggregate-totals entry
    pub const SCORE_FIELD: &str = "TOTAL_SCORE";

    /// Header lines preceding data rows in the summary table
    pub const SUMMARY_HEADER_LINES: usize = 1;
}

/// Monitor defaults
pub mod monitor {
    pub const DEFAULT_TARGET_COUNT: usize = 1000;
    pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
}

/// Normalizer defaults
pub mod normalizer {
    pub const DEFAULT_OUTPUT_PATH: &str = "profiles_converted.txt";

    /// Indentation used for each pretty-printed unit of the canonical stream
    pub const UNIT_INDENT: &[u8] = b"  ";
}

/// Operation names attached to structured log events
pub mod operations {
    pub const MONITOR_STARTED: &str = "monitor.started";
    pub const MONITOR_POLLED: &str = "monitor.polled";
    pub const MONITOR_STALLED: &str = "monitor.stalled";
    pub const MONITOR_SUMMARY_UPDATED: &str = "monitor.summary_updated";
    pub const MONITOR_COMPLETED: &str = "monitor.completed";
    pub const MONITOR_CANCELLED: &str = "monitor.cancelled";
    pub const ARTIFACT_UNAVAILABLE: &str = "monitor.artifact_unavailable";

    pub const NORMALIZE_STARTED: &str = "normalizer.started";
    pub const NORMALIZE_REJECTED: &str = "normalizer.profile_rejected";
    pub const NORMALIZE_COMPLETED: &str = "normalizer.completed";
}
