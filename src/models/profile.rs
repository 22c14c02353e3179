//! # Profile Model
//!
//! One subject's natal data as exchanged with the scoring pipeline.
//!
//! Date and time are kept as the exact text supplied by the caller so that a
//! profile written to the canonical stream decodes back to identical values.
//! Syntax is checked with `chrono` during validation.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{BatchError, BatchResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// Natal-chart subject record
///
/// Field declaration order is the serialization order of the canonical
/// stream; do not reorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    pub date: String,
    pub time: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: String,
}

impl Profile {
    pub fn new(date: impl Into<String>, time: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: String::new(),
            date: date.into(),
            time: time.into(),
            lat,
            lon,
            country: String::new(),
            state: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_location(mut self, country: impl Into<String>, state: impl Into<String>) -> Self {
        self.country = country.into();
        self.state = state.into();
        self
    }

    /// Check date/time syntax and coordinate ranges
    pub fn validate(&self) -> BatchResult<()> {
        self.birth_date()?;
        self.birth_time()?;

        if !self.lat.is_finite() || self.lat < LATITUDE_RANGE.0 || self.lat > LATITUDE_RANGE.1 {
            return Err(BatchError::validation_error(format!(
                "lat {} outside [{}, {}]",
                self.lat, LATITUDE_RANGE.0, LATITUDE_RANGE.1
            )));
        }
        if !self.lon.is_finite() || self.lon < LONGITUDE_RANGE.0 || self.lon > LONGITUDE_RANGE.1 {
            return Err(BatchError::validation_error(format!(
                "lon {} outside [{}, {}]",
                self.lon, LONGITUDE_RANGE.0, LONGITUDE_RANGE.1
            )));
        }

        Ok(())
    }

    pub fn birth_date(&self) -> BatchResult<NaiveDate> {
        if !has_fixed_shape(&self.date, b'-', &[4, 7]) {
            return Err(BatchError::validation_error(format!(
                "date '{}' is not YYYY-MM-DD",
                self.date
            )));
        }
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).map_err(|e| {
            BatchError::validation_error(format!("date '{}' is not YYYY-MM-DD: {e}", self.date))
        })
    }

    pub fn birth_time(&self) -> BatchResult<NaiveTime> {
        if !has_fixed_shape(&self.time, b':', &[2]) {
            return Err(BatchError::validation_error(format!(
                "time '{}' is not HH:MM",
                self.time
            )));
        }
        NaiveTime::parse_from_str(&self.time, TIME_FORMAT).map_err(|e| {
            BatchError::validation_error(format!("time '{}' is not HH:MM: {e}", self.time))
        })
    }
}

/// Zero-padded digits with `separator` at exactly `positions`
///
/// chrono alone accepts unpadded and signed fields, which the pipeline does not.
fn has_fixed_shape(value: &str, separator: u8, positions: &[usize]) -> bool {
    let expected_len = match positions {
        [.., last] => last + 3,
        [] => return false,
    };
    value.len() == expected_len
        && value.bytes().enumerate().all(|(i, byte)| {
            if positions.contains(&i) {
                byte == separator
            } else {
                byte.is_ascii_digit()
            }
        })
}
