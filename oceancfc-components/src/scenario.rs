//! Scenario tags and the forcing they select.
//!
//! Every forcing function takes model time `t` in years since 1950
//! (see [`crate::constants::EPOCH_YEAR`]) and is defined for any real `t`.

use crate::constants::calendar_year;
use oceancfc_core::errors::{CfcError, CfcResult};
use oceancfc_core::timeseries::{FloatValue, Time};
use oceancfc_core::units::{degc, IceFraction, Temperature};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Named combination of forcing assumptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioTag {
    Control,
    Warming,
    Melt,
    WarmingMelt,
}

impl ScenarioTag {
    pub const ALL: [ScenarioTag; 4] = [
        ScenarioTag::Control,
        ScenarioTag::Warming,
        ScenarioTag::Melt,
        ScenarioTag::WarmingMelt,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScenarioTag::Control => "control",
            ScenarioTag::Warming => "warming",
            ScenarioTag::Melt => "melt",
            ScenarioTag::WarmingMelt => "warming_melt",
        }
    }

    pub fn is_warming(&self) -> bool {
        match self {
            ScenarioTag::Control | ScenarioTag::Melt => false,
            ScenarioTag::Warming | ScenarioTag::WarmingMelt => true,
        }
    }

    pub fn is_melting(&self) -> bool {
        match self {
            ScenarioTag::Control | ScenarioTag::Warming => false,
            ScenarioTag::Melt | ScenarioTag::WarmingMelt => true,
        }
    }
}

impl fmt::Display for ScenarioTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioTag {
    type Err = CfcError;

    fn from_str(s: &str) -> CfcResult<Self> {
        let key = s.trim().trim_start_matches(':').to_ascii_lowercase().replace('-', "_");
        ScenarioTag::ALL
            .into_iter()
            .find(|tag| tag.name() == key)
            .ok_or_else(|| {
                CfcError::Config(format!(
                    "unknown scenario '{s}'. Expected one of control, warming, melt, warming_melt"
                ))
            })
    }
}

/// Parameters of the scenario forcing functions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioForcing {
    /// Sea-surface temperature without warming
    /// unit: degC
    pub baseline_temperature: FloatValue,
    /// Linear warming rate applied by the warming scenarios
    /// unit: degC / yr
    pub warming_rate: FloatValue,
    /// Amplitude of the annual cycle of temperature, off by default
    /// unit: degC
    pub seasonal_amplitude: FloatValue,
    /// Sea-ice fraction without melt
    pub baseline_ice_fraction: FloatValue,
    /// Linear loss of sea-ice fraction applied by the melt scenarios
    /// unit: 1 / yr
    pub melt_rate: FloatValue,
}

impl Default for ScenarioForcing {
    fn default() -> Self {
        Self {
            baseline_temperature: 0.0,
            warming_rate: 0.03,
            seasonal_amplitude: 0.0,
            baseline_ice_fraction: 0.5,
            melt_rate: 0.004,
        }
    }
}

impl ScenarioForcing {
    /// Sea-surface temperature
    ///
    /// $$ T(t) = T_0 + r_T t + A \sin(2 \pi t) $$
    ///
    /// where the trend term only applies to warming scenarios.
    pub fn temperature(&self, t: Time, scenario: ScenarioTag) -> Temperature {
        let trend = if scenario.is_warming() {
            self.warming_rate * t
        } else {
            0.0
        };
        let seasonal = self.seasonal_amplitude * (2.0 * PI * t).sin();
        degc(self.baseline_temperature + trend + seasonal)
    }

    /// Sea-ice fraction, clamped to [0, 1].
    pub fn sea_ice_fraction(&self, t: Time, scenario: ScenarioTag) -> IceFraction {
        let loss = if scenario.is_melting() {
            self.melt_rate * t
        } else {
            0.0
        };
        IceFraction::new((self.baseline_ice_fraction - loss).clamp(0.0, 1.0))
    }
}

/// Peak of the emission index, reached in [`PHASE_OUT_START`].
pub const SOURCE_PEAK: FloatValue = 10.0;
/// unit: 1 / yr
pub const SOURCE_RATE: FloatValue = 0.1;
pub const PHASE_OUT_START: Time = 1995.0;
pub const PHASE_OUT_END: Time = 2010.0;

/// Three-phase emission index used as the atmospheric source of the coupled model.
///
/// $$ E(y) = \begin{cases}
///   E_p e^{r (y - 1995)} & y < 1995 \\
///   E_p \frac{e^{-r (y - 1995)} - e^{-15 r}}{1 - e^{-15 r}} & 1995 \le y < 2010 \\
///   0 & y \ge 2010
/// \end{cases} $$
///
/// with $E_p$ = [`SOURCE_PEAK`], $r$ = [`SOURCE_RATE`] and $y$ the calendar year.
///
/// Growth is exponential and reaches the peak of 10 exactly at the start of the
/// phase-out, rather than approaching it asymptotically. The decline is an
/// exponential decay over a 15-year window (1995 to 2010), offset and rescaled
/// so that it starts at the peak and ends at zero. Both switches are therefore
/// continuous.
pub fn anthropogenic_source(t: Time) -> FloatValue {
    let year = calendar_year(t);
    if year < PHASE_OUT_START {
        SOURCE_PEAK * (SOURCE_RATE * (year - PHASE_OUT_START)).exp()
    } else if year < PHASE_OUT_END {
        let floor = (-SOURCE_RATE * (PHASE_OUT_END - PHASE_OUT_START)).exp();
        let decay = (-SOURCE_RATE * (year - PHASE_OUT_START)).exp();
        SOURCE_PEAK * (decay - floor) / (1.0 - floor)
    } else {
        0.0
    }
}

/// Temperature with the default forcing parameters.
pub fn temperature(t: Time, scenario: ScenarioTag) -> Temperature {
    ScenarioForcing::default().temperature(t, scenario)
}

/// Sea-ice fraction with the default forcing parameters.
pub fn sea_ice_fraction(t: Time, scenario: ScenarioTag) -> IceFraction {
    ScenarioForcing::default().sea_ice_fraction(t, scenario)
}
