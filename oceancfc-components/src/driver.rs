//! Scenario integration driver
//!
//! Builds the parameter bundle for a scenario tag, starts from an empty ocean
//! (and empty atmosphere for the coupled model) and integrates with the
//! non-negativity guard. Scenario sets are integrated in parallel; each run is
//! independent of the others.

use crate::components::{
    coupled_uptake, ocean_uptake, CoupledUptakeComponent, OceanUptakeComponent,
};
use crate::parameters::{CoupledParameters, Environment, OceanUptakeParameters, ScenarioParams};
use crate::scenario::{ScenarioForcing, ScenarioTag};
use oceancfc_core::errors::{CfcError, CfcResult};
use oceancfc_core::gas_exchange::GasExchange;
use oceancfc_core::ivp::SolverOptions;
use oceancfc_core::timeseries::{AtmosphericHistory, Time};
use oceancfc_core::trajectory::Trajectory;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

/// Which right-hand side a run integrates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelVariant {
    /// Ocean forced by the observed atmospheric history
    Single,
    /// Ocean and atmosphere reservoirs
    #[default]
    Coupled,
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelVariant::Single => f.write_str("single"),
            ModelVariant::Coupled => f.write_str("coupled"),
        }
    }
}

impl ModelVariant {
    pub fn state_names(&self) -> &'static [&'static str] {
        match self {
            ModelVariant::Single => &ocean_uptake::STATE_NAMES,
            ModelVariant::Coupled => &coupled_uptake::STATE_NAMES,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioDriver {
    pub environment: Environment,
    pub forcing: ScenarioForcing,
    pub gas: GasExchange,
    pub ocean_parameters: OceanUptakeParameters,
    pub coupled_parameters: CoupledParameters,
    pub solver_options: SolverOptions,
    history: Option<AtmosphericHistory>,
}

impl Default for ScenarioDriver {
    fn default() -> Self {
        Self::new(Environment::default())
    }
}

impl ScenarioDriver {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            forcing: ScenarioForcing::default(),
            gas: GasExchange::omip(),
            ocean_parameters: OceanUptakeParameters::default(),
            coupled_parameters: CoupledParameters::default(),
            solver_options: SolverOptions::default(),
            history: None,
        }
    }

    /// Atmospheric history forcing the single-reservoir model.
    pub fn with_history(self, history: AtmosphericHistory) -> Self {
        Self {
            history: Some(history),
            ..self
        }
    }

    pub fn with_solver_options(self, solver_options: SolverOptions) -> Self {
        Self {
            solver_options,
            ..self
        }
    }

    pub fn history(&self) -> Option<&AtmosphericHistory> {
        self.history.as_ref()
    }

    pub fn scenario_params(&self, scenario: ScenarioTag) -> ScenarioParams {
        ScenarioParams::new(scenario, self.environment)
            .with_forcing(self.forcing)
            .with_gas_exchange(self.gas)
    }

    /// Integrate the single-reservoir model over `[t0, t1]` (years since 1950).
    pub fn run_single(
        &self,
        scenario: ScenarioTag,
        t0: Time,
        t1: Time,
    ) -> CfcResult<Trajectory<1>> {
        let history = self.history.clone().ok_or_else(|| {
            CfcError::Config(
                "the single-reservoir model needs an atmospheric history".to_string(),
            )
        })?;
        let component = OceanUptakeComponent::from_parameters(
            self.ocean_parameters,
            self.scenario_params(scenario),
            history,
        );

        info!(%scenario, variant = "single", t0, t1, "running scenario");
        let trajectory = component.solve(
            t0,
            t1,
            ocean_uptake::ModelState::zeros(),
            &self.solver_options,
        )?;
        info!(
            %scenario,
            steps = trajectory.len(),
            corrections = trajectory.corrections(),
            "finished scenario"
        );
        Ok(trajectory)
    }

    /// Integrate the coupled model over `[t0, t1]` (years since 1950).
    pub fn run_coupled(
        &self,
        scenario: ScenarioTag,
        t0: Time,
        t1: Time,
    ) -> CfcResult<Trajectory<2>> {
        let component = CoupledUptakeComponent::from_parameters(
            self.coupled_parameters,
            self.scenario_params(scenario),
        );

        info!(%scenario, variant = "coupled", t0, t1, "running scenario");
        let trajectory = component.solve(
            t0,
            t1,
            coupled_uptake::ModelState::zeros(),
            &self.solver_options,
        )?;
        info!(
            %scenario,
            steps = trajectory.len(),
            corrections = trajectory.corrections(),
            "finished scenario"
        );
        Ok(trajectory)
    }

    /// Run the single-reservoir model for every scenario in parallel.
    pub fn run_single_scenarios(
        &self,
        scenarios: &[ScenarioTag],
        t0: Time,
        t1: Time,
    ) -> CfcResult<BTreeMap<ScenarioTag, Trajectory<1>>> {
        let runs = scenarios
            .par_iter()
            .map(|scenario| {
                self.run_single(*scenario, t0, t1)
                    .map(|trajectory| (*scenario, trajectory))
            })
            .collect::<CfcResult<Vec<_>>>()?;
        Ok(runs.into_iter().collect())
    }

    /// Run the coupled model for every scenario in parallel.
    pub fn run_coupled_scenarios(
        &self,
        scenarios: &[ScenarioTag],
        t0: Time,
        t1: Time,
    ) -> CfcResult<BTreeMap<ScenarioTag, Trajectory<2>>> {
        let runs = scenarios
            .par_iter()
            .map(|scenario| {
                self.run_coupled(*scenario, t0, t1)
                    .map(|trajectory| (*scenario, trajectory))
            })
            .collect::<CfcResult<Vec<_>>>()?;
        Ok(runs.into_iter().collect())
    }
}
