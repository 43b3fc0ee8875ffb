//! Tabulated forcing lookups.
//!
//! The ODE models only need forcing that can be evaluated at an arbitrary real
//! time. [`Timeseries`] provides linear interpolation between tabulated points
//! and holds the end values outside the table. [`AtmosphericHistory`] wraps a
//! mixing-ratio table with the freeze policy used by the forced ocean model.

use crate::errors::{CfcError, CfcResult};
use crate::units::MixingRatio;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

pub type FloatValue = f64;
pub type Time = f64;

/// Year after which the observed atmospheric history is held constant.
pub const ATMOSPHERIC_FREEZE_YEAR: Time = 2010.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeseries {
    time: Vec<Time>,
    values: Vec<FloatValue>,
}

impl Timeseries {
    /// Time must be strictly increasing and both vectors finite and of equal, non-zero length.
    pub fn new(time: Vec<Time>, values: Vec<FloatValue>) -> CfcResult<Self> {
        if time.is_empty() {
            return Err(CfcError::InvalidTimeseries("no points".to_string()));
        }
        if time.len() != values.len() {
            return Err(CfcError::InvalidTimeseries(format!(
                "{} times but {} values",
                time.len(),
                values.len()
            )));
        }
        if let Some(bad) = time.iter().chain(values.iter()).find(|v| !v.is_finite()) {
            return Err(CfcError::InvalidTimeseries(format!(
                "non-finite entry {bad}"
            )));
        }
        if let Some(w) = time.windows(2).find(|w| w[1] <= w[0]) {
            return Err(CfcError::InvalidTimeseries(format!(
                "time is not strictly increasing ({} then {})",
                w[0], w[1]
            )));
        }
        Ok(Self { time, values })
    }

    /// Read a two-column CSV table (time, value) with a header row.
    /// Lines starting with `#` are ignored.
    pub fn from_csv_reader<R: Read>(reader: R) -> CfcResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut time = Vec::new();
        let mut values = Vec::new();
        for result in rdr.deserialize() {
            let (t, v): (Time, FloatValue) = result?;
            time.push(t);
            values.push(v);
        }
        Self::new(time, values)
    }

    pub fn from_csv_file(path: impl AsRef<Path>) -> CfcResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn time(&self) -> &[Time] {
        &self.time
    }

    pub fn values(&self) -> &[FloatValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time_bounds(&self) -> (Time, Time) {
        (self.time[0], self.time[self.time.len() - 1])
    }

    /// Linearly interpolated value, holding the first/last value outside the table.
    pub fn at(&self, t: Time) -> FloatValue {
        let n = self.time.len();
        if t <= self.time[0] {
            return self.values[0];
        }
        if t >= self.time[n - 1] {
            return self.values[n - 1];
        }
        let idx = self.time.partition_point(|x| *x <= t);
        let (t0, t1) = (self.time[idx - 1], self.time[idx]);
        let (v0, v1) = (self.values[idx - 1], self.values[idx]);
        v0 + (v1 - v0) * (t - t0) / (t1 - t0)
    }
}

/// Observed atmospheric mixing-ratio history of one compound.
///
/// Queries beyond `freeze_year` return the value at `freeze_year`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtmosphericHistory {
    series: Timeseries,
    freeze_year: Time,
}

impl AtmosphericHistory {
    /// `series` maps calendar year to mixing ratio in ppt.
    pub fn new(series: Timeseries) -> Self {
        Self::with_freeze_year(series, ATMOSPHERIC_FREEZE_YEAR)
    }

    pub fn with_freeze_year(series: Timeseries, freeze_year: Time) -> Self {
        Self {
            series,
            freeze_year,
        }
    }

    pub fn freeze_year(&self) -> Time {
        self.freeze_year
    }

    pub fn series(&self) -> &Timeseries {
        &self.series
    }

    pub fn mixing_ratio(&self, year: Time) -> MixingRatio {
        MixingRatio::new(self.series.at(year.min(self.freeze_year)))
    }
}
