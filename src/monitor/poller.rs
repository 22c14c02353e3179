//! Polling loop for batch progress
//!
//! Observes the pipeline only through its artifacts: no process handle, no
//! locks, no writes. Each cycle rebuilds a [`BatchRunState`] from scratch,
//! reports it, and either terminates on completion or sleeps for the
//! configured interval. A [`CancellationToken`] stops the loop cleanly from
//! outside at any suspension point.

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::artifacts::ArtifactReader;
use super::reporter::ProgressReporter;
use super::snapshot::{estimate_eta, BatchRunState};
use super::states::{MonitorOutcome, MonitorState, StateTracker};
use crate::config::MonitorConfig;
use crate::constants::operations;
use crate::error::BatchResult;
use crate::log_monitor;

pub struct ProgressMonitor<R: ProgressReporter> {
    monitor_id: Uuid,
    config: MonitorConfig,
    reader: ArtifactReader,
    reporter: R,
    tracker: StateTracker,
    /// Set by the first poll
    started_at: Option<Instant>,
    /// First positive reading, used as the origin for rate estimates
    baseline: Option<(usize, Instant)>,
    cycles: u64,
    last_snapshot: Option<BatchRunState>,
    summary_modified_at: Option<DateTime<Utc>>,
}

impl<R: ProgressReporter> std::fmt::Debug for ProgressMonitor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressMonitor")
            .field("monitor_id", &self.monitor_id)
            .field("config", &self.config)
            .field("state", &self.tracker.state())
            .field("cycles", &self.cycles)
            .finish()
    }
}

impl<R: ProgressReporter> ProgressMonitor<R> {
    pub fn new(config: MonitorConfig, reporter: R) -> BatchResult<Self> {
        config.validate()?;

        let monitor_id = Uuid::new_v4();
        log_monitor!(
            info,
            operations::MONITOR_STARTED,
            monitor_id: monitor_id,
            target: config.target_count,
            poll_interval: config.poll_interval(),
            summary_path: config.summary_path.display().to_string(),
        );

        Ok(Self {
            monitor_id,
            reader: ArtifactReader::new(&config),
            config,
            reporter,
            tracker: StateTracker::new(),
            started_at: None,
            baseline: None,
            cycles: 0,
            last_snapshot: None,
            summary_modified_at: None,
        })
    }

    pub fn monitor_id(&self) -> Uuid {
        self.monitor_id
    }

    pub fn state(&self) -> MonitorState {
        self.tracker.state()
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    pub fn last_snapshot(&self) -> Option<&BatchRunState> {
        self.last_snapshot.as_ref()
    }

    /// Run one poll cycle without sleeping
    pub async fn poll_once(&mut self) -> BatchRunState {
        self.cycles += 1;
        let target = self.config.target_count;
        let started_at = *self.started_at.get_or_insert_with(Instant::now);

        let counts = self.reader.read().await;
        let now = Instant::now();

        let transition = self
            .tracker
            .observe(counts.processed, counts.artifacts_present, target);

        if transition.regressed {
            log_monitor!(
                warn,
                "monitor.count_regressed",
                monitor_id: self.monitor_id,
                previous: self.last_snapshot.as_ref().map(|s| s.processed_count),
                processed: counts.processed,
            );
        }
        if transition.changed() {
            log_monitor!(
                debug,
                "monitor.state_changed",
                monitor_id: self.monitor_id,
                from: transition.from,
                to: transition.to,
            );
        }

        if self.baseline.is_none() && counts.processed > 0 {
            self.baseline = Some((counts.processed, now));
        }
        let eta = self.baseline.and_then(|(baseline, since)| {
            estimate_eta(baseline, counts.processed, now - since, target)
        });

        let snapshot = BatchRunState {
            state: transition.to,
            processed_count: counts.processed,
            json_result_count: counts.json_results,
            unique_nonzero_categories: counts.nonzero_categories,
            elapsed: now - started_at,
            target_count: target,
            eta,
            summary_modified_at: counts.summary_modified_at,
            poll_cycle: self.cycles,
        };

        let reported = self.reporter.progress(&snapshot);
        self.absorb("progress", reported);

        // The first sighting only records the baseline modification time
        if let Some(modified_at) = snapshot.summary_modified_at {
            let advanced = self
                .summary_modified_at
                .is_some_and(|previous| modified_at > previous);
            if advanced {
                let reported = self.reporter.summary_updated(&snapshot);
                self.absorb("summary_updated", reported);
            }
            self.summary_modified_at = Some(modified_at);
        }

        match snapshot.state {
            MonitorState::Complete => {
                let reported = self.reporter.completed(&snapshot);
                self.absorb("completed", reported);
            }
            MonitorState::Stalled => {
                let reported = self.reporter.stalled(&snapshot);
                self.absorb("stalled", reported);
            }
            MonitorState::Waiting | MonitorState::Running => {}
        }

        self.last_snapshot = Some(snapshot.clone());
        snapshot
    }

    /// Poll until the target is reached or `cancel` fires
    pub async fn run(&mut self, cancel: CancellationToken) -> MonitorOutcome {
        let interval = self.config.poll_interval();

        loop {
            let polled = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                snapshot = self.poll_once() => Some(snapshot),
            };
            let Some(snapshot) = polled else {
                return self.finish_cancelled();
            };

            if snapshot.is_complete() {
                return MonitorOutcome::Completed(snapshot);
            }

            let interrupted = tokio::select! {
                biased;
                _ = cancel.cancelled() => true,
                _ = tokio::time::sleep(interval) => false,
            };
            if interrupted {
                return self.finish_cancelled();
            }
        }
    }

    fn finish_cancelled(&mut self) -> MonitorOutcome {
        let snapshot = self
            .last_snapshot
            .clone()
            .unwrap_or_else(|| BatchRunState::initial(self.config.target_count));

        let reported = self.reporter.cancelled(&snapshot);
        self.absorb("cancelled", reported);

        MonitorOutcome::Cancelled(snapshot)
    }

    fn absorb(&self, channel: &str, reported: BatchResult<()>) {
        if let Err(error) = reported {
            log_monitor!(
                error,
                "monitor.report_failed",
                monitor_id: self.monitor_id,
                channel: channel,
                error: error.to_string(),
            );
        }
    }
}
