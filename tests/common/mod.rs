//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod builders;
pub mod strategies;

use std::sync::{Arc, Mutex};

use natal_batch::error::BatchResult;
use natal_batch::monitor::{BatchRunState, MonitorState, ProgressReporter};

#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    Progress(BatchRunState),
    Stalled(BatchRunState),
    SummaryUpdated(BatchRunState),
    Completed(BatchRunState),
    Cancelled(BatchRunState),
}

/// Reporter that records every event; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<ReportEvent>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn progress_counts(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ReportEvent::Progress(snapshot) => Some(snapshot.processed_count),
                _ => None,
            })
            .collect()
    }

    pub fn progress_states(&self) -> Vec<MonitorState> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ReportEvent::Progress(snapshot) => Some(snapshot.state),
                _ => None,
            })
            .collect()
    }

    pub fn stall_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, ReportEvent::Stalled(_)))
            .count()
    }

    pub fn summary_update_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, ReportEvent::SummaryUpdated(_)))
            .count()
    }

    fn push(&self, event: ReportEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl ProgressReporter for RecordingReporter {
    fn progress(&mut self, snapshot: &BatchRunState) -> BatchResult<()> {
        self.push(ReportEvent::Progress(snapshot.clone()));
        Ok(())
    }

    fn stalled(&mut self, snapshot: &BatchRunState) -> BatchResult<()> {
        self.push(ReportEvent::Stalled(snapshot.clone()));
        Ok(())
    }

    fn summary_updated(&mut self, snapshot: &BatchRunState) -> BatchResult<()> {
        self.push(ReportEvent::SummaryUpdated(snapshot.clone()));
        Ok(())
    }

    fn completed(&mut self, snapshot: &BatchRunState) -> BatchResult<()> {
        self.push(ReportEvent::Completed(snapshot.clone()));
        Ok(())
    }

    fn cancelled(&mut self, snapshot: &BatchRunState) -> BatchResult<()> {
        self.push(ReportEvent::Cancelled(snapshot.clone()));
        Ok(())
    }
}
