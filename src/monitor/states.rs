use serde::{Deserialize, Serialize};
use std::fmt;

use super::snapshot::BatchRunState;

/// Monitor state reconstructed from the pipeline's artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorState {
    /// No artifact has been observed yet
    Waiting,
    /// Artifacts exist and the processed count is below target
    Running,
    /// Processed count unchanged since the previous poll while work remains
    Stalled,
    /// Processed count reached the target
    Complete,
}

impl MonitorState {
    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Running => write!(f, "running"),
            Self::Stalled => write!(f, "stalled"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

impl std::str::FromStr for MonitorState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(Self::Waiting),
            "running" => Ok(Self::Running),
            "stalled" => Ok(Self::Stalled),
            "complete" => Ok(Self::Complete),
            _ => Err(format!("Invalid monitor state: {s}")),
        }
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::Waiting
    }
}

/// Result of feeding one poll's reading into the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: MonitorState,
    pub to: MonitorState,
    /// Processed count went down since the previous poll
    pub regressed: bool,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Poll-over-poll state machine
///
/// Stall detection is a single-interval comparison against the previous
/// poll; there is no cumulative threshold.
#[derive(Debug, Clone, Default)]
pub struct StateTracker {
    state: MonitorState,
    previous_processed: Option<usize>,
    artifacts_seen: bool,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn observe(
        &mut self,
        processed: usize,
        artifacts_present: bool,
        target: usize,
    ) -> Transition {
        let from = self.state;
        if from.is_terminal() {
            return Transition {
                from,
                to: from,
                regressed: false,
            };
        }

        // Once seen, a briefly missing artifact is a torn read, not a restart
        self.artifacts_seen |= artifacts_present;

        let regressed = self
            .previous_processed
            .is_some_and(|previous| processed < previous);

        let to = if processed >= target {
            MonitorState::Complete
        } else if !self.artifacts_seen {
            MonitorState::Waiting
        } else if processed > 0 && self.previous_processed == Some(processed) {
            MonitorState::Stalled
        } else {
            MonitorState::Running
        };

        self.previous_processed = Some(processed);
        self.state = to;

        Transition {
            from,
            to,
            regressed,
        }
    }
}

/// How a monitor run ended
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorOutcome {
    /// The processed count reached the target
    Completed(BatchRunState),
    /// The cancellation token fired; carries the last known snapshot
    Cancelled(BatchRunState),
}

impl MonitorOutcome {
    pub fn snapshot(&self) -> &BatchRunState {
        match self {
            Self::Completed(snapshot) | Self::Cancelled(snapshot) => snapshot,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}
