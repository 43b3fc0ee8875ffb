//! Coupled ocean-atmosphere uptake component
//!
//! Two reservoirs exchanging CFC through the air-sea flux: the surface ocean
//! and a well-mixed atmosphere fed by the anthropogenic emission index.

use crate::constants::{MOLAR_MASS_DRY_AIR, PASCAL_PER_ATM, STANDARD_GRAVITY};
use crate::parameters::{CoupledParameters, ScenarioParams};
use crate::scenario::anthropogenic_source;
use oceancfc_core::errors::CfcResult;
use oceancfc_core::ivp::{integrate_guarded, NonNegativityGuard, SolverOptions, IVP};
use oceancfc_core::timeseries::{FloatValue, Time};
use oceancfc_core::trajectory::Trajectory;
use oceancfc_core::units::{in_meters, mol_per_m3, GasFlux};
use ode_solvers::Vector2;

pub type ModelState = Vector2<FloatValue>;

/// Names of the state components, in order.
pub const STATE_NAMES: [&str; 2] = ["ocean_concentration", "atmosphere_equivalent"];

/// Coupled surface ocean and atmosphere
///
/// The atmosphere is carried as the dissolved concentration it would support
/// at saturation under the current surface conditions, $A = F(T, S) P x$, so
/// both state components are in mol / m^3 and the disequilibrium driving the
/// flux is $A - O$.
///
/// $$ \frac{dO}{dt} = \frac{\Phi}{h} $$
/// $$ \frac{dA}{dt} = -\Phi f_{ocean} F \frac{g M_{air}}{P_{ref}} + s E(t) $$
///
/// Where:
/// - $\Phi$ is the air-sea flux (mol / m^2 / yr), positive into the ocean
/// - $h$ is the surface-layer depth
/// - $g M_{air} / P_{ref}$ is the inverse of the moles of air above a square
///   metre per atmosphere of surface pressure
/// - $E(t)$ is the emission index and $s$ its scale
#[derive(Debug, Clone)]
pub struct CoupledUptakeComponent {
    parameters: CoupledParameters,
    scenario: ScenarioParams,
}

impl CoupledUptakeComponent {
    pub fn from_parameters(parameters: CoupledParameters, scenario: ScenarioParams) -> Self {
        Self {
            parameters,
            scenario,
        }
    }

    pub fn scenario(&self) -> &ScenarioParams {
        &self.scenario
    }

    /// Air-sea flux at model time `t` for the given state.
    pub fn flux(&self, t: Time, y: &ModelState) -> GasFlux {
        let env = &self.scenario.environment;
        let conditions = self.scenario.surface_conditions(t);
        let mixing_ratio = self.scenario.gas.atmospheric_mixing_ratio(
            conditions.temperature,
            env.salinity,
            env.surface_pressure,
            mol_per_m3(y[1]),
            env.compound,
        );
        self.scenario
            .gas
            .air_sea_flux(&conditions, mixing_ratio, mol_per_m3(y[0]), env.compound)
    }

    pub fn solve(
        &self,
        t0: Time,
        t1: Time,
        y0: ModelState,
        options: &SolverOptions,
    ) -> CfcResult<Trajectory<2>> {
        integrate_guarded(self, &NonNegativityGuard, t0, t1, y0, options)
    }
}

impl IVP<Time, ModelState> for CoupledUptakeComponent {
    fn calculate_dy_dt(&self, t: Time, y: &ModelState, dy_dt: &mut ModelState) {
        let env = &self.scenario.environment;
        let temperature = self.scenario.forcing.temperature(t, self.scenario.scenario);
        let solubility = self
            .scenario
            .gas
            .solubility(temperature, env.salinity, env.compound)
            .mol_per_m3_per_atm();

        let flux = self.flux(t, y).mol_per_m2_per_year();

        // mol / m^2 of air per atm of surface pressure
        let air_column = PASCAL_PER_ATM / (STANDARD_GRAVITY * MOLAR_MASS_DRY_AIR);
        let atmospheric_loss = flux * self.parameters.ocean_fraction * solubility / air_column;

        let source = self.parameters.source_scale * anthropogenic_source(t);

        // mol / m^3 / yr
        dy_dt[0] = flux / in_meters(self.parameters.surface_layer_depth);
        dy_dt[1] = -atmospheric_loss + source;
    }
}
