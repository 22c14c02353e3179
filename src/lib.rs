#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Natal Batch
//!
//! Batch-side plumbing for a natal-chart scoring pipeline.
//!
//! ## Overview
//!
//! The scoring engine itself (ephemeris, totem scores) runs as an external
//! process. This crate covers what happens around it:
//!
//! - **Normalization**: a JSON array of birth profiles becomes the canonical
//!   one-object-per-unit stream the pipeline consumes, with per-record
//!   validation and an all-or-nothing write of the destination.
//! - **Progress monitoring**: the pipeline's incremental output files are
//!   polled on a fixed cadence and turned into progress snapshots
//!   (`waiting`, `running`, `stalled`, `complete`) without touching the
//!   pipeline process.
//! - **Translation**: canonical aspect, planet, and sign identifiers map to
//!   their French display names, unknown terms passing through unchanged.
//!
//! ## Module Organization
//!
//! - [`normalizer`] - Input container to canonical stream
//! - [`monitor`] - Artifact polling, state machine, and reporters
//! - [`translation`] - Display-locale lookups
//! - [`models`] - Profile record
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//! - [`logging`] - Tracing setup and structured log macros
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use natal_batch::config::MonitorConfig;
//! use natal_batch::monitor::{ProgressMonitor, TracingReporter};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MonitorConfig {
//!     target_count: 500,
//!     ..MonitorConfig::default()
//! };
//! let mut monitor = ProgressMonitor::new(config, TracingReporter)?;
//! let outcome = monitor.run(CancellationToken::new()).await;
//! println!("{}", outcome.snapshot().summary_line());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod monitor;
pub mod normalizer;
pub mod translation;

pub use config::{BatchConfig, MonitorConfig, NormalizerConfig};
pub use error::{BatchError, BatchResult};
pub use models::Profile;
pub use monitor::{BatchRunState, MonitorOutcome, MonitorState, ProgressMonitor};
pub use normalizer::{NormalizeReport, RejectedProfile};
pub use translation::{Category, TranslationTable};
