//! Single-reservoir ocean uptake component
//!
//! A well-mixed surface layer taking up CFC from an atmosphere whose mixing
//! ratio follows an observed history.

use crate::constants::calendar_year;
use crate::parameters::{OceanUptakeParameters, ScenarioParams};
use oceancfc_core::errors::CfcResult;
use oceancfc_core::ivp::{integrate_guarded, NonNegativityGuard, SolverOptions, IVP};
use oceancfc_core::timeseries::{AtmosphericHistory, FloatValue, Time};
use oceancfc_core::trajectory::Trajectory;
use oceancfc_core::units::{in_meters, mol_per_m3, GasFlux};
use ode_solvers::Vector1;

pub type ModelState = Vector1<FloatValue>;

/// Names of the state components, in order.
pub const STATE_NAMES: [&str; 1] = ["ocean_concentration"];

/// Surface-layer CFC forced by the atmospheric history
///
/// $$ \frac{dC}{dt} = \frac{\Phi(T(t), f(t), x(t), C)}{h} $$
///
/// Where:
/// - $C$ is the surface-layer concentration (mol / m^3)
/// - $\Phi$ is the air-sea flux, converted to mol / m^2 / yr
/// - $x(t)$ is the atmospheric mixing ratio, held at its 2010 value afterwards
/// - $h$ is the surface-layer depth (m)
#[derive(Debug, Clone)]
pub struct OceanUptakeComponent {
    parameters: OceanUptakeParameters,
    scenario: ScenarioParams,
    history: AtmosphericHistory,
}

impl OceanUptakeComponent {
    pub fn from_parameters(
        parameters: OceanUptakeParameters,
        scenario: ScenarioParams,
        history: AtmosphericHistory,
    ) -> Self {
        Self {
            parameters,
            scenario,
            history,
        }
    }

    pub fn scenario(&self) -> &ScenarioParams {
        &self.scenario
    }

    /// Air-sea flux at model time `t` for a surface concentration (mol / m^3).
    pub fn flux(&self, t: Time, ocean_concentration: FloatValue) -> GasFlux {
        let conditions = self.scenario.surface_conditions(t);
        let mixing_ratio = self.history.mixing_ratio(calendar_year(t));
        self.scenario.gas.air_sea_flux(
            &conditions,
            mixing_ratio,
            mol_per_m3(ocean_concentration),
            self.scenario.compound(),
        )
    }

    pub fn solve(
        &self,
        t0: Time,
        t1: Time,
        y0: ModelState,
        options: &SolverOptions,
    ) -> CfcResult<Trajectory<1>> {
        integrate_guarded(self, &NonNegativityGuard, t0, t1, y0, options)
    }
}

impl IVP<Time, ModelState> for OceanUptakeComponent {
    fn calculate_dy_dt(&self, t: Time, y: &ModelState, dy_dt: &mut ModelState) {
        let flux = self.flux(t, y[0]).mol_per_m2_per_year();
        let depth = in_meters(self.parameters.surface_layer_depth);
        dy_dt[0] = flux / depth; // mol / m^3 / yr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::Environment;
    use crate::scenario::ScenarioTag;
    use approx::assert_relative_eq;
    use oceancfc_core::timeseries::Timeseries;
    use oceancfc_core::units::in_mol_per_m3;

    fn component(scenario: ScenarioTag) -> OceanUptakeComponent {
        let history = Timeseries::new(vec![1950.0, 2010.0], vec![0.0, 240.0]).unwrap();
        OceanUptakeComponent::from_parameters(
            OceanUptakeParameters::default(),
            ScenarioParams::new(scenario, Environment::default()),
            AtmosphericHistory::new(history),
        )
    }

    #[test]
    fn test_derivative_is_flux_over_depth() {
        let component = component(ScenarioTag::Control);
        let mut dy = ModelState::zeros();
        component.calculate_dy_dt(30.0, &ModelState::new(0.0), &mut dy);

        let flux = component.flux(30.0, 0.0);
        assert!(flux.mol_per_m2_per_s() > 0.0);
        assert_relative_eq!(
            dy[0],
            flux.mol_per_m2_per_s() * 365.25 * 86400.0 / 5.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_no_uptake_at_saturation() {
        let component = component(ScenarioTag::Warming);
        let t = 80.0;
        let params = component.scenario();
        let conditions = params.surface_conditions(t);
        let saturated = params.gas.saturation_concentration(
            conditions.temperature,
            conditions.salinity,
            conditions.surface_pressure,
            component.history.mixing_ratio(calendar_year(t)),
            params.compound(),
        );
        let mut dy = ModelState::zeros();
        component.calculate_dy_dt(t, &ModelState::new(in_mol_per_m3(saturated)), &mut dy);
        assert_eq!(dy[0], 0.0);
    }

    #[test]
    fn test_history_frozen_after_2010() {
        let component = component(ScenarioTag::Control);
        assert_eq!(
            component.flux(60.0, 1e-9).mol_per_m2_per_s(),
            component.flux(90.0, 1e-9).mol_per_m2_per_s()
        );
    }
}
