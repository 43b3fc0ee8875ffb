//! Parameter bundles for the ocean uptake components.

use crate::scenario::{ScenarioForcing, ScenarioTag};
use oceancfc_core::compound::Compound;
use oceancfc_core::gas_exchange::{GasExchange, SurfaceConditions};
use oceancfc_core::timeseries::{FloatValue, Time};
use oceancfc_core::units::{atm, meters, mps, Depth, Pressure, Salinity, WindSpeed};
use serde::{Deserialize, Serialize};

/// Conditions held constant through a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    pub compound: Compound,
    pub salinity: Salinity,
    pub surface_pressure: Pressure,
    pub wind_speed: WindSpeed,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            compound: Compound::Cfc11,
            salinity: Salinity::new(35.0),
            surface_pressure: atm(1.0),
            wind_speed: mps(5.0),
        }
    }
}

/// Everything the right-hand side of a scenario needs at any time `t`.
///
/// The scenario tag selects the temperature and sea-ice forcing; the
/// environment and coefficient tables are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub scenario: ScenarioTag,
    pub environment: Environment,
    pub forcing: ScenarioForcing,
    pub gas: GasExchange,
}

impl ScenarioParams {
    pub fn new(scenario: ScenarioTag, environment: Environment) -> Self {
        Self {
            scenario,
            environment,
            forcing: ScenarioForcing::default(),
            gas: GasExchange::omip(),
        }
    }

    pub fn with_forcing(self, forcing: ScenarioForcing) -> Self {
        Self { forcing, ..self }
    }

    pub fn with_gas_exchange(self, gas: GasExchange) -> Self {
        Self { gas, ..self }
    }

    pub fn compound(&self) -> Compound {
        self.environment.compound
    }

    pub fn surface_conditions(&self, t: Time) -> SurfaceConditions {
        SurfaceConditions {
            temperature: self.forcing.temperature(t, self.scenario),
            salinity: self.environment.salinity,
            surface_pressure: self.environment.surface_pressure,
            wind_speed: self.environment.wind_speed,
            ice_fraction: self.forcing.sea_ice_fraction(t, self.scenario),
        }
    }
}

/// Parameters for the single-reservoir ocean uptake component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OceanUptakeParameters {
    /// Depth of the well-mixed surface layer, serialised in metres
    pub surface_layer_depth: Depth,
}

impl Default for OceanUptakeParameters {
    fn default() -> Self {
        Self {
            surface_layer_depth: meters(5.0),
        }
    }
}

/// Parameters for the coupled ocean-atmosphere uptake component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoupledParameters {
    /// Depth of the well-mixed surface layer, serialised in metres
    pub surface_layer_depth: Depth,
    /// Fraction of the Earth's surface exchanging with the atmosphere
    pub ocean_fraction: FloatValue,
    /// Atmosphere-equivalent concentration added per unit of emission index
    /// unit: mol / m^3 / yr
    pub source_scale: FloatValue,
}

impl Default for CoupledParameters {
    fn default() -> Self {
        Self {
            surface_layer_depth: meters(5.0),
            ocean_fraction: crate::constants::OCEAN_FRACTION,
            source_scale: 5e-11,
        }
    }
}
