//! Run configuration read from TOML.
//!
//! ```toml
//! model = "coupled"
//! compound = "CFC-11"
//! scenarios = ["control", "warming_melt"]
//! t_start = 0.0
//! t_end = 70.0
//! output_step = 1.0
//!
//! surface_layer_depth = { value = 5.0, unit = "m" }
//!
//! [environment]
//! salinity = { value = 35.0, unit = "g/kg" }
//! wind_speed = { value = 5.0, unit = "m/s" }
//! ```
//!
//! Relative paths (atmospheric history, coefficient tables) are resolved
//! against the directory holding the configuration file.

use oceancfc_components::driver::{ModelVariant, ScenarioDriver};
use oceancfc_components::parameters::{CoupledParameters, Environment, OceanUptakeParameters};
use oceancfc_components::scenario::{ScenarioForcing, ScenarioTag};
use oceancfc_core::coefficients::CoefficientTables;
use oceancfc_core::compound::Compound;
use oceancfc_core::errors::{CfcError, CfcResult};
use oceancfc_core::gas_exchange::GasExchange;
use oceancfc_core::ivp::SolverOptions;
use oceancfc_core::timeseries::{AtmosphericHistory, Time, Timeseries, ATMOSPHERIC_FREEZE_YEAR};
use oceancfc_core::units::{Depth, LabelledValue, Pressure, Salinity, WindSpeed};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment values as written in the file, each with a unit label.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentConfig {
    pub salinity: Option<LabelledValue>,
    pub surface_pressure: Option<LabelledValue>,
    pub wind_speed: Option<LabelledValue>,
}

impl EnvironmentConfig {
    /// Check the unit labels and build the typed environment.
    pub fn resolve(&self, compound: Compound) -> CfcResult<Environment> {
        let defaults = Environment::default();
        Ok(Environment {
            compound,
            salinity: match &self.salinity {
                Some(v) => v.to::<Salinity>()?,
                None => defaults.salinity,
            },
            surface_pressure: match &self.surface_pressure {
                Some(v) => v.to::<Pressure>()?,
                None => defaults.surface_pressure,
            },
            wind_speed: match &self.wind_speed {
                Some(v) => v.to::<WindSpeed>()?,
                None => defaults.wind_speed,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default)]
    pub model: ModelVariant,
    #[serde(default = "default_compound")]
    pub compound: Compound,
    #[serde(default = "default_scenarios")]
    pub scenarios: Vec<ScenarioTag>,
    /// unit: yr since 1950
    #[serde(default)]
    pub t_start: Time,
    /// unit: yr since 1950
    #[serde(default = "default_t_end")]
    pub t_end: Time,
    /// Spacing of the written output
    /// unit: yr
    #[serde(default = "default_output_step")]
    pub output_step: Time,
    /// Two-column (year, ppt) table, required by the single-reservoir model
    pub history: Option<PathBuf>,
    #[serde(default = "default_freeze_year")]
    pub history_freeze_year: Time,
    /// Coefficient tables replacing the built-in OMIP values
    pub coefficients: Option<PathBuf>,
    /// Overrides the surface-layer depth of both models
    pub surface_layer_depth: Option<LabelledValue>,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub forcing: ScenarioForcing,
    #[serde(default)]
    pub ocean: OceanUptakeParameters,
    #[serde(default)]
    pub coupled: CoupledParameters,
    #[serde(default)]
    pub solver: SolverOptions,
}

fn default_compound() -> Compound {
    Compound::Cfc11
}

fn default_scenarios() -> Vec<ScenarioTag> {
    ScenarioTag::ALL.to_vec()
}

fn default_t_end() -> Time {
    70.0
}

fn default_output_step() -> Time {
    1.0
}

fn default_freeze_year() -> Time {
    ATMOSPHERIC_FREEZE_YEAR
}

impl RunConfig {
    pub fn from_toml_str(content: &str) -> CfcResult<Self> {
        let config: RunConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> CfcResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> CfcResult<()> {
        if !(self.t_end > self.t_start) {
            return Err(CfcError::Config(format!(
                "t_end ({}) must be after t_start ({})",
                self.t_end, self.t_start
            )));
        }
        if !(self.output_step > 0.0) {
            return Err(CfcError::Config(format!(
                "output_step must be positive, got {}",
                self.output_step
            )));
        }
        if self.scenarios.is_empty() {
            return Err(CfcError::Config("no scenarios selected".to_string()));
        }
        if self.model == ModelVariant::Single && self.history.is_none() {
            return Err(CfcError::Config(
                "the single-reservoir model needs `history`".to_string(),
            ));
        }
        Ok(())
    }

    /// Output times from `t_start` to `t_end` inclusive.
    pub fn output_times(&self) -> Vec<Time> {
        let n = ((self.t_end - self.t_start) / self.output_step).floor() as usize;
        let mut times: Vec<Time> = (0..=n)
            .map(|i| self.t_start + i as Time * self.output_step)
            .filter(|t| *t <= self.t_end)
            .collect();
        if times.last().map_or(true, |t| *t < self.t_end) {
            times.push(self.t_end);
        }
        times
    }

    /// Build the scenario driver, reading any referenced files relative to `base_dir`.
    pub fn driver(&self, base_dir: &Path) -> CfcResult<ScenarioDriver> {
        let environment = self.environment.resolve(self.compound)?;
        let mut driver = ScenarioDriver::new(environment).with_solver_options(self.solver);
        driver.forcing = self.forcing;
        driver.ocean_parameters = self.ocean;
        driver.coupled_parameters = self.coupled;
        if let Some(depth) = &self.surface_layer_depth {
            let depth = depth.to::<Depth>()?;
            driver.ocean_parameters.surface_layer_depth = depth;
            driver.coupled_parameters.surface_layer_depth = depth;
        }

        if let Some(path) = &self.coefficients {
            let tables = CoefficientTables::from_file(base_dir.join(path))?;
            driver.gas = GasExchange::new(tables);
        }
        if let Some(path) = &self.history {
            let series = Timeseries::from_csv_file(base_dir.join(path))?;
            driver = driver.with_history(AtmosphericHistory::with_freeze_year(
                series,
                self.history_freeze_year,
            ));
        }
        Ok(driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oceancfc_core::units::{in_atm, in_meters, in_mps};

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = RunConfig::from_toml_str("").unwrap();
        assert_eq!(config.model, ModelVariant::Coupled);
        assert_eq!(config.compound, Compound::Cfc11);
        assert_eq!(config.scenarios, ScenarioTag::ALL.to_vec());
        assert_eq!(config.t_end, 70.0);
        assert_eq!(config.solver, SolverOptions::default());
        assert_eq!(config.output_times().len(), 71);
    }

    #[test]
    fn test_full_config() {
        let text = r#"
            model = "single"
            compound = "CFC-12"
            scenarios = ["control", "warming_melt"]
            t_start = 10.0
            t_end = 12.5
            output_step = 1.0
            history = "history.csv"

            [environment]
            salinity = { value = 34.5, unit = "g/kg" }
            surface_pressure = { value = 1013.25, unit = "hPa" }
            wind_speed = { value = 36.0, unit = "km/h" }

            [forcing]
            seasonal_amplitude = 1.0

            [solver]
            segment_length = 0.5
        "#;
        let config = RunConfig::from_toml_str(text).unwrap();
        assert_eq!(config.model, ModelVariant::Single);
        assert_eq!(
            config.scenarios,
            vec![ScenarioTag::Control, ScenarioTag::WarmingMelt]
        );
        assert_eq!(config.output_times(), vec![10.0, 11.0, 12.0, 12.5]);
        assert_eq!(config.forcing.seasonal_amplitude, 1.0);
        assert_eq!(config.forcing.warming_rate, 0.03);
        assert_eq!(config.solver.segment_length, 0.5);

        let env = config.environment.resolve(config.compound).unwrap();
        assert_eq!(env.compound, Compound::Cfc12);
        assert_eq!(env.salinity.grams_per_kilogram(), 34.5);
        assert!((in_atm(env.surface_pressure) - 1.0).abs() < 1e-12);
        assert!((in_mps(env.wind_speed) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_wrong_unit_is_rejected() {
        let text = r#"
            [environment]
            wind_speed = { value = 5.0, unit = "degC" }
        "#;
        let config = RunConfig::from_toml_str(text).unwrap();
        let err = config.environment.resolve(config.compound).unwrap_err();
        assert!(matches!(err, CfcError::UnitMismatch { quantity: "wind speed", .. }));
    }

    #[test]
    fn test_surface_layer_depth_is_unit_checked() {
        let config = RunConfig::from_toml_str("").unwrap();
        let driver = config.driver(Path::new(".")).unwrap();
        assert_eq!(in_meters(driver.coupled_parameters.surface_layer_depth), 5.0);

        let text = r#"surface_layer_depth = { value = 1500.0, unit = "cm" }"#;
        let config = RunConfig::from_toml_str(text).unwrap();
        let driver = config.driver(Path::new(".")).unwrap();
        assert!((in_meters(driver.ocean_parameters.surface_layer_depth) - 15.0).abs() < 1e-12);
        assert!((in_meters(driver.coupled_parameters.surface_layer_depth) - 15.0).abs() < 1e-12);

        let text = r#"surface_layer_depth = { value = 5.0, unit = "m/s" }"#;
        let config = RunConfig::from_toml_str(text).unwrap();
        assert!(matches!(
            config.driver(Path::new(".")),
            Err(CfcError::UnitMismatch { quantity: "depth", .. })
        ));
    }

    #[test]
    fn test_invalid_configs() {
        assert!(RunConfig::from_toml_str("t_start = 5.0\nt_end = 1.0").is_err());
        assert!(RunConfig::from_toml_str("scenarios = []").is_err());
        assert!(RunConfig::from_toml_str("model = \"single\"").is_err());
        assert!(matches!(
            RunConfig::from_toml_str("compound = \"CFC-113\""),
            Err(CfcError::Config(_))
        ));
        assert!(RunConfig::from_toml_str("scenarios = [\"hot\"]").is_err());
    }

    #[test]
    fn test_driver_reads_history_relative_to_config() {
        let text = r#"
            model = "single"
            history = "data/cfc11_atmospheric_history.csv"
            history_freeze_year = 2000.0
        "#;
        let config = RunConfig::from_toml_str(text).unwrap();
        let driver = config.driver(Path::new(env!("CARGO_MANIFEST_DIR"))).unwrap();
        let history = driver.history().unwrap();
        assert_eq!(history.freeze_year(), 2000.0);
        assert_eq!(history.mixing_ratio(2015.0), history.mixing_ratio(2000.0));
    }
}
