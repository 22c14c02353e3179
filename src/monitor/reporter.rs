//! Output channels for progress snapshots.

use chrono::Local;
use std::io::Write;

use super::snapshot::{format_duration, BatchRunState};
use crate::constants::operations;
use crate::error::{BatchError, BatchResult};
use crate::log_monitor;

/// Receives every snapshot the monitor produces
///
/// Failures are logged by the monitor and never stop the polling loop.
pub trait ProgressReporter: Send {
    /// Called once per poll cycle
    fn progress(&mut self, snapshot: &BatchRunState) -> BatchResult<()>;

    /// Called on every poll that observes no progress while work remains
    fn stalled(&mut self, snapshot: &BatchRunState) -> BatchResult<()>;

    /// Called when the summary table's modification time advances
    fn summary_updated(&mut self, snapshot: &BatchRunState) -> BatchResult<()>;

    fn completed(&mut self, snapshot: &BatchRunState) -> BatchResult<()>;

    fn cancelled(&mut self, snapshot: &BatchRunState) -> BatchResult<()>;
}

/// Human-facing reporter that redraws a single progress line
#[derive(Debug)]
pub struct ConsoleReporter<W: Write + Send> {
    out: W,
}

impl ConsoleReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) -> BatchResult<()> {
        self.out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|e| BatchError::Reporting(format!("console write failed: {e}")))
    }
}

impl<W: Write + Send> ProgressReporter for ConsoleReporter<W> {
    fn progress(&mut self, snapshot: &BatchRunState) -> BatchResult<()> {
        let line = format!("\r📊 {}", snapshot.summary_line());
        self.write(&line)
    }

    fn stalled(&mut self, snapshot: &BatchRunState) -> BatchResult<()> {
        let message = format!(
            "\n⚠️  No new profile processed since the previous poll\n   Last profile: {}\n",
            snapshot.processed_count
        );
        self.write(&message)
    }

    fn summary_updated(&mut self, snapshot: &BatchRunState) -> BatchResult<()> {
        match snapshot.summary_modified_at {
            Some(modified_at) => {
                let local = modified_at.with_timezone(&Local);
                let message = format!("\n🔄 Update detected at {}\n", local.format("%H:%M:%S"));
                self.write(&message)
            }
            None => Ok(()),
        }
    }

    fn completed(&mut self, snapshot: &BatchRunState) -> BatchResult<()> {
        let message = format!(
            "\n\n🎉 Batch processing complete\n✅ {} profiles processed\n\
             ⏱️ Total time: {}\n",
            snapshot.processed_count,
            format_duration(snapshot.elapsed)
        );
        self.write(&message)
    }

    fn cancelled(&mut self, snapshot: &BatchRunState) -> BatchResult<()> {
        let message = format!(
            "\n\n⏹️  Monitoring stopped by user\n📊 Final progress: {}/{} profiles\n",
            snapshot.processed_count, snapshot.target_count
        );
        self.write(&message)
    }
}

/// Reporter that emits structured tracing events only
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn progress(&mut self, snapshot: &BatchRunState) -> BatchResult<()> {
        log_monitor!(
            info,
            operations::MONITOR_POLLED,
            state: snapshot.state,
            processed: snapshot.processed_count,
            target: snapshot.target_count,
            percent: format!("{:.1}", snapshot.progress_percent()),
            json_results: snapshot.json_result_count,
            nonzero_categories: snapshot.unique_nonzero_categories,
            elapsed: format_duration(snapshot.elapsed),
        );
        Ok(())
    }

    fn stalled(&mut self, snapshot: &BatchRunState) -> BatchResult<()> {
        log_monitor!(
            warn,
            operations::MONITOR_STALLED,
            processed: snapshot.processed_count,
            target: snapshot.target_count,
        );
        Ok(())
    }

    fn summary_updated(&mut self, snapshot: &BatchRunState) -> BatchResult<()> {
        log_monitor!(
            debug,
            operations::MONITOR_SUMMARY_UPDATED,
            modified_at: snapshot.summary_modified_at.map(|at| at.to_rfc3339()),
            processed: snapshot.processed_count,
        );
        Ok(())
    }

    fn completed(&mut self, snapshot: &BatchRunState) -> BatchResult<()> {
        log_monitor!(
            info,
            operations::MONITOR_COMPLETED,
            processed: snapshot.processed_count,
            elapsed: format_duration(snapshot.elapsed),
        );
        Ok(())
    }

    fn cancelled(&mut self, snapshot: &BatchRunState) -> BatchResult<()> {
        log_monitor!(
            info,
            operations::MONITOR_CANCELLED,
            processed: snapshot.processed_count,
            target: snapshot.target_count,
        );
        Ok(())
    }
}
