//! Coefficient tables for the solubility and Schmidt-number fits.
//!
//! Two independent tables, each with one column per [`Compound`]. The built-in
//! values are the seawater constants tabulated by the OMIP biogeochemistry
//! protocol (Orr et al., 2017):
//!
//! - solubility: Warner & Weiss (1985), 7 coefficients, F in mol L^-1 atm^-1
//! - Schmidt number: Wanninkhof (2014) fourth-order polynomial in °C, 5 coefficients
//!
//! Alternative tables can be read from TOML with the same layout that
//! [`CoefficientTables::to_toml_string`] writes:
//!
//! ```toml
//! [solubility."CFC-11"]
//! a1 = -229.9261
//! # ...
//! [schmidt."CFC-11"]
//! a = 3579.2
//! # ...
//! ```

use crate::compound::Compound;
use crate::errors::{CfcError, CfcResult};
use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Solubility fit
///
/// $$ \ln F = a_1 + a_2 \frac{100}{T} + a_3 \ln\frac{T}{100} + a_4 \left(\frac{T}{100}\right)^2
///   + S \left[b_1 + b_2 \frac{T}{100} + b_3 \left(\frac{T}{100}\right)^2\right] $$
///
/// with T in kelvin and S in g/kg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolubilityCoefficients {
    pub a1: FloatValue,
    pub a2: FloatValue,
    pub a3: FloatValue,
    pub a4: FloatValue,
    pub b1: FloatValue,
    pub b2: FloatValue,
    pub b3: FloatValue,
}

impl SolubilityCoefficients {
    pub fn as_array(&self) -> [FloatValue; 7] {
        [
            self.a1, self.a2, self.a3, self.a4, self.b1, self.b2, self.b3,
        ]
    }
}

/// Schmidt number fit
///
/// $$ Sc = A + B t + C t^2 + D t^3 + E t^4 $$
///
/// with t in °C.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchmidtCoefficients {
    pub a: FloatValue,
    pub b: FloatValue,
    pub c: FloatValue,
    pub d: FloatValue,
    pub e: FloatValue,
}

impl SchmidtCoefficients {
    pub fn as_array(&self) -> [FloatValue; 5] {
        [self.a, self.b, self.c, self.d, self.e]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolubilityTable {
    #[serde(rename = "CFC-11")]
    pub cfc11: SolubilityCoefficients,
    #[serde(rename = "CFC-12")]
    pub cfc12: SolubilityCoefficients,
}

impl SolubilityTable {
    pub fn get(&self, compound: Compound) -> &SolubilityCoefficients {
        match compound {
            Compound::Cfc11 => &self.cfc11,
            Compound::Cfc12 => &self.cfc12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchmidtTable {
    #[serde(rename = "CFC-11")]
    pub cfc11: SchmidtCoefficients,
    #[serde(rename = "CFC-12")]
    pub cfc12: SchmidtCoefficients,
}

impl SchmidtTable {
    pub fn get(&self, compound: Compound) -> &SchmidtCoefficients {
        match compound {
            Compound::Cfc11 => &self.cfc11,
            Compound::Cfc12 => &self.cfc12,
        }
    }
}

/// Both coefficient tables. Immutable once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoefficientTables {
    pub solubility: SolubilityTable,
    pub schmidt: SchmidtTable,
}

/// OMIP CFC constants.
pub const OMIP_TABLES: CoefficientTables = CoefficientTables {
    solubility: SolubilityTable {
        cfc11: SolubilityCoefficients {
            a1: -229.9261,
            a2: 319.6552,
            a3: 119.4471,
            a4: -1.39165,
            b1: -0.142382,
            b2: 0.091459,
            b3: -0.0157274,
        },
        cfc12: SolubilityCoefficients {
            a1: -218.0971,
            a2: 298.9702,
            a3: 113.8049,
            a4: -1.39165,
            b1: -0.143566,
            b2: 0.091015,
            b3: -0.0153924,
        },
    },
    schmidt: SchmidtTable {
        cfc11: SchmidtCoefficients {
            a: 3579.2,
            b: -222.63,
            c: 7.5749,
            d: -0.14595,
            e: 0.0011874,
        },
        cfc12: SchmidtCoefficients {
            a: 3828.1,
            b: -249.86,
            c: 8.7603,
            d: -0.1716,
            e: 0.001408,
        },
    },
};

impl Default for CoefficientTables {
    fn default() -> Self {
        OMIP_TABLES
    }
}

impl CoefficientTables {
    pub fn from_toml_str(content: &str) -> CfcResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> CfcResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> CfcResult<String> {
        toml::to_string(self).map_err(|e| CfcError::Config(e.to_string()))
    }
}
