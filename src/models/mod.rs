//! # Data Models
//!
//! Records exchanged between the normalizer and the external scoring pipeline.

pub mod profile;

pub use profile::Profile;
