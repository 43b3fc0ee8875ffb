//! Air-sea gas exchange of CFCs following the OMIP protocol.
//!
//! The chain is: coefficient tables → solubility F and Schmidt number Sc →
//! saturation concentration and piston velocity → net flux
//!
//! $$ \Phi = k_w \left( C_{sat} - C_{ocn} \right) $$
//!
//! positive into the ocean. All inputs are typed quantities (see
//! [`crate::units`]); the only conversions happen here and are explicit.

use crate::coefficients::{CoefficientTables, OMIP_TABLES};
use crate::compound::Compound;
use crate::timeseries::FloatValue;
use crate::units::{
    celsius, in_atm, in_kelvin, in_mol_per_m3, in_mps, mol_per_m3, mps, Concentration, GasFlux,
    IceFraction, MixingRatio, PistonVelocity, Pressure, Salinity, Solubility, Temperature,
    WindSpeed,
};
use serde::{Deserialize, Serialize};

/// Wanninkhof (2014) quadratic wind-speed coefficient, 0.251 cm h^-1 (m/s)^-2.
/// unit: s/m
pub const PISTON_VELOCITY_COEFFICIENT: FloatValue = 0.251 / (100.0 * 3600.0);

/// Schmidt number the piston velocity coefficient is normalised to (CO2 in seawater at 20 °C).
pub const REFERENCE_SCHMIDT_NUMBER: FloatValue = 660.0;

/// Reference pressure for the saturation concentration.
/// unit: atm
pub const REFERENCE_PRESSURE_ATM: FloatValue = 1.0;

/// Surface conditions seen by the gas exchange at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConditions {
    pub temperature: Temperature,
    pub salinity: Salinity,
    pub surface_pressure: Pressure,
    pub wind_speed: WindSpeed,
    pub ice_fraction: IceFraction,
}

/// Gas-exchange calculator bound to a set of coefficient tables.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GasExchange {
    tables: CoefficientTables,
}

impl GasExchange {
    pub const fn new(tables: CoefficientTables) -> Self {
        Self { tables }
    }

    /// Calculator using the OMIP coefficient tables.
    pub const fn omip() -> Self {
        Self::new(OMIP_TABLES)
    }

    pub fn tables(&self) -> &CoefficientTables {
        &self.tables
    }

    /// Solubility function F (Warner & Weiss, 1985).
    ///
    /// Strictly positive; decreases with warming.
    pub fn solubility(
        &self,
        temperature: Temperature,
        salinity: Salinity,
        compound: Compound,
    ) -> Solubility {
        let c = self.tables.solubility.get(compound);
        let t_k = in_kelvin(temperature);
        let t_100 = t_k / 100.0;
        let s = salinity.grams_per_kilogram();

        let ln_f = c.a1
            + c.a2 * (100.0 / t_k)
            + c.a3 * t_100.ln()
            + c.a4 * t_100 * t_100
            + s * (c.b1 + c.b2 * t_100 + c.b3 * t_100 * t_100);

        // The fit is in mol L^-1 atm^-1
        Solubility::from_mol_per_litre_per_atm(ln_f.exp())
    }

    /// Schmidt number in seawater (dimensionless).
    pub fn schmidt_number(&self, temperature: Temperature, compound: Compound) -> FloatValue {
        let c = self.tables.schmidt.get(compound);
        let t = celsius(temperature);
        // Horner form of A + Bt + Ct^2 + Dt^3 + Et^4
        c.a + t * (c.b + t * (c.c + t * (c.d + t * c.e)))
    }

    /// Gas transfer velocity
    ///
    /// $$ k_w = a \left(\frac{Sc}{660}\right)^{-1/2} u^2 (1 - f) $$
    ///
    /// The ice fraction is used as given; no clamping.
    pub fn piston_velocity(
        &self,
        temperature: Temperature,
        wind_speed: WindSpeed,
        ice_fraction: IceFraction,
        compound: Compound,
    ) -> PistonVelocity {
        let sc = self.schmidt_number(temperature, compound);
        let u = in_mps(wind_speed);
        let k = PISTON_VELOCITY_COEFFICIENT
            * (sc / REFERENCE_SCHMIDT_NUMBER).powf(-0.5)
            * u
            * u
            * ice_fraction.open_water();
        mps(k)
    }

    /// Dissolved concentration in equilibrium with the atmosphere
    ///
    /// $$ C_{sat} = \frac{P_{sfc}}{P_0} F \, p_{cfc} $$
    pub fn saturation_concentration(
        &self,
        temperature: Temperature,
        salinity: Salinity,
        surface_pressure: Pressure,
        mixing_ratio: MixingRatio,
        compound: Compound,
    ) -> Concentration {
        let f = self.solubility(temperature, salinity, compound);
        let p_sfc = in_atm(surface_pressure);
        let c_sat = p_sfc * f.mol_per_m3_per_atm() * mixing_ratio.partial_pressure_atm()
            / REFERENCE_PRESSURE_ATM;
        mol_per_m3(c_sat)
    }

    /// Atmospheric mixing ratio a dissolved concentration would be saturated with.
    ///
    /// Inverse of [`GasExchange::saturation_concentration`] at the same
    /// temperature, salinity and pressure.
    pub fn atmospheric_mixing_ratio(
        &self,
        temperature: Temperature,
        salinity: Salinity,
        surface_pressure: Pressure,
        concentration: Concentration,
        compound: Compound,
    ) -> MixingRatio {
        let f = self.solubility(temperature, salinity, compound);
        let p_sfc = in_atm(surface_pressure);
        let capacity = p_sfc * f.mol_per_m3_per_atm();
        let partial_pressure = in_mol_per_m3(concentration) * REFERENCE_PRESSURE_ATM / capacity;
        MixingRatio::from_partial_pressure_atm(partial_pressure)
    }

    /// Net air-sea flux, positive into the ocean.
    pub fn air_sea_flux(
        &self,
        conditions: &SurfaceConditions,
        mixing_ratio: MixingRatio,
        ocean_concentration: Concentration,
        compound: Compound,
    ) -> GasFlux {
        let k_w = self.piston_velocity(
            conditions.temperature,
            conditions.wind_speed,
            conditions.ice_fraction,
            compound,
        );
        let c_sat = self.saturation_concentration(
            conditions.temperature,
            conditions.salinity,
            conditions.surface_pressure,
            mixing_ratio,
            compound,
        );
        let disequilibrium = in_mol_per_m3(c_sat) - in_mol_per_m3(ocean_concentration);
        // (m s^-1) * (mol m^-3)
        GasFlux::new(in_mps(k_w) * disequilibrium)
    }
}

/// Solubility F using the OMIP tables.
pub fn solubility(temperature: Temperature, salinity: Salinity, compound: Compound) -> Solubility {
    GasExchange::omip().solubility(temperature, salinity, compound)
}

/// Schmidt number using the OMIP tables.
pub fn schmidt_number(temperature: Temperature, compound: Compound) -> FloatValue {
    GasExchange::omip().schmidt_number(temperature, compound)
}

/// Piston velocity using the OMIP tables.
pub fn piston_velocity(
    temperature: Temperature,
    wind_speed: WindSpeed,
    ice_fraction: IceFraction,
    compound: Compound,
) -> PistonVelocity {
    GasExchange::omip().piston_velocity(temperature, wind_speed, ice_fraction, compound)
}

/// Saturation concentration using the OMIP tables.
pub fn saturation_concentration(
    temperature: Temperature,
    salinity: Salinity,
    surface_pressure: Pressure,
    mixing_ratio: MixingRatio,
    compound: Compound,
) -> Concentration {
    GasExchange::omip().saturation_concentration(
        temperature,
        salinity,
        surface_pressure,
        mixing_ratio,
        compound,
    )
}

/// Inverse saturation using the OMIP tables.
pub fn atmospheric_mixing_ratio(
    temperature: Temperature,
    salinity: Salinity,
    surface_pressure: Pressure,
    concentration: Concentration,
    compound: Compound,
) -> MixingRatio {
    GasExchange::omip().atmospheric_mixing_ratio(
        temperature,
        salinity,
        surface_pressure,
        concentration,
        compound,
    )
}

/// Air-sea flux using the OMIP tables.
pub fn air_sea_flux(
    conditions: &SurfaceConditions,
    mixing_ratio: MixingRatio,
    ocean_concentration: Concentration,
    compound: Compound,
) -> GasFlux {
    GasExchange::omip().air_sea_flux(conditions, mixing_ratio, ocean_concentration, compound)
}
