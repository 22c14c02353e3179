// Batch progress monitor
//
// Watches the summary table, results container, and aggregate totals that the
// external scoring pipeline writes while it runs, and turns them into
// progress snapshots driven by an explicit state machine.

pub mod artifacts;
pub mod poller;
pub mod reporter;
pub mod snapshot;
pub mod states;

pub use artifacts::{ArtifactCounts, ArtifactError, ArtifactReader};
pub use poller::ProgressMonitor;
pub use reporter::{ConsoleReporter, ProgressReporter, TracingReporter};
pub use snapshot::{format_duration, BatchRunState};
pub use states::{MonitorOutcome, MonitorState, StateTracker, Transition};
