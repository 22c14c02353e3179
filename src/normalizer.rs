//! # Profile Batch Normalizer
//!
//! Converts a JSON array of profile records into the canonical stream read by
//! the scoring pipeline: one pretty-printed JSON object per profile, each
//! followed by a newline, in input order.
//!
//! A container that does not decode as an array fails the whole call with
//! [`BatchError::MalformedBatchInput`]. Individual records that fail to decode
//! or validate are rejected and reported without aborting the batch.
//!
//! The destination is written through a temporary file in the same directory
//! and renamed into place, so it is either complete or untouched.

use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::constants::{normalizer::UNIT_INDENT, operations};
use crate::error::{BatchError, BatchResult};
use crate::log_normalizer;
use crate::models::Profile;

/// A record dropped during normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedProfile {
    /// Zero-based position in the input container
    pub index: usize,
    pub reason: String,
}

/// Accepted profiles in input order plus the records that were dropped
#[derive(Debug, Clone, Default)]
pub struct ParsedBatch {
    pub profiles: Vec<Profile>,
    pub rejected: Vec<RejectedProfile>,
}

/// Outcome of writing a canonical stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    pub accepted: usize,
    pub rejected: Vec<RejectedProfile>,
}

impl NormalizeReport {
    pub fn total(&self) -> usize {
        self.accepted + self.rejected.len()
    }
}

/// Decode an input container and validate each record independently
pub fn parse_batch(input: &str) -> BatchResult<ParsedBatch> {
    let records: Vec<Value> = serde_json::from_str(input).map_err(|e| {
        BatchError::MalformedBatchInput(format!("expected a JSON array of objects: {e}"))
    })?;

    let mut batch = ParsedBatch::default();

    for (index, record) in records.into_iter().enumerate() {
        match decode_record(record) {
            Ok(profile) => batch.profiles.push(profile),
            Err(reason) => {
                log_normalizer!(warn, operations::NORMALIZE_REJECTED, index: index, reason: reason);
                batch.rejected.push(RejectedProfile { index, reason });
            }
        }
    }

    Ok(batch)
}

fn decode_record(record: Value) -> Result<Profile, String> {
    if !record.is_object() {
        return Err(format!("record is not an object: {record}"));
    }

    let profile: Profile = serde_json::from_value(record).map_err(|e| e.to_string())?;

    match profile.validate() {
        Ok(()) => Ok(profile),
        Err(BatchError::Validation(reason)) => Err(reason),
        Err(other) => Err(other.to_string()),
    }
}

/// Serialize profiles as canonical units onto `writer`
pub fn write_canonical_stream<W: Write>(writer: &mut W, profiles: &[Profile]) -> BatchResult<()> {
    for profile in profiles {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(UNIT_INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut *writer, formatter);
        profile.serialize(&mut serializer)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Canonical stream for `profiles` as a string
pub fn encode_canonical_stream(profiles: &[Profile]) -> BatchResult<String> {
    let mut buffer = Vec::new();
    write_canonical_stream(&mut buffer, profiles)?;
    String::from_utf8(buffer)
        .map_err(|e| BatchError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Read a canonical stream back into profiles, in order
///
/// Units are self-delimiting JSON objects; whitespace between them is ignored.
pub fn decode_canonical_stream(text: &str) -> BatchResult<Vec<Profile>> {
    serde_json::Deserializer::from_str(text)
        .into_iter::<Profile>()
        .enumerate()
        .map(|(index, unit)| {
            unit.map_err(|e| {
                BatchError::MalformedBatchInput(format!(
                    "canonical unit {index} is undecodable: {e}"
                ))
            })
        })
        .collect()
}

/// Normalize an in-memory container into its canonical stream
pub fn normalize_str(input: &str) -> BatchResult<(String, NormalizeReport)> {
    let batch = parse_batch(input)?;
    let stream = encode_canonical_stream(&batch.profiles)?;
    let report = NormalizeReport {
        accepted: batch.profiles.len(),
        rejected: batch.rejected,
    };
    Ok((stream, report))
}

/// Normalize the container at `input` and write the canonical stream to `output`
pub fn normalize_file(input: &Path, output: &Path) -> BatchResult<NormalizeReport> {
    log_normalizer!(
        info,
        operations::NORMALIZE_STARTED,
        input: input.display().to_string(),
        output: output.display().to_string(),
    );

    let bytes = fs::read(input)?;
    let content = std::str::from_utf8(&bytes).map_err(|e| {
        BatchError::MalformedBatchInput(format!("input is not valid UTF-8: {e}"))
    })?;
    let batch = parse_batch(content)?;

    write_atomically(output, &batch.profiles)?;

    let report = NormalizeReport {
        accepted: batch.profiles.len(),
        rejected: batch.rejected,
    };

    log_normalizer!(
        info,
        operations::NORMALIZE_COMPLETED,
        accepted: report.accepted,
        rejected: report.rejected.len(),
        output: output.display().to_string(),
    );

    Ok(report)
}

fn write_atomically(output: &Path, profiles: &[Profile]) -> BatchResult<()> {
    let directory = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Dropped (and removed) on every early return below
    let mut staging = NamedTempFile::new_in(directory)?;
    {
        let mut writer = BufWriter::new(staging.as_file_mut());
        write_canonical_stream(&mut writer, profiles)?;
        writer.flush()?;
    }
    staging.as_file().sync_all()?;
    staging.persist(output).map_err(|e| BatchError::Io(e.error))?;

    Ok(())
}
