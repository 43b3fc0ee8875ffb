//! Typed physical quantities for the gas-exchange functions.
//!
//! Dimensional quantities are `uom` SI quantities (`Temperature`, `WindSpeed`,
//! `Pressure`, `Concentration`, `Depth`). Quantities that are dimensionless in
//! SI but must never be confused with each other (salinity, mixing ratio, ice
//! fraction) get their own newtypes, as do the derived coefficients returned by
//! the flux functions.
//!
//! Passing a wind speed where a temperature is expected is a compile error.
//! Values arriving from configuration files carry a unit label instead, and are
//! checked once at construction time through [`FromLabelled`]:
//!
//! ```
//! use oceancfc_core::units::{FromLabelled, Temperature, LabelledValue};
//!
//! let t = Temperature::from_labelled(275.15, "K").unwrap();
//! assert!((oceancfc_core::units::celsius(t) - 2.0).abs() < 1e-12);
//!
//! let wrong = LabelledValue::new(5.0, "m/s").to::<Temperature>();
//! assert!(wrong.is_err());
//! ```

use crate::errors::{CfcError, CfcResult};
use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};
use std::fmt;

use uom::si::f64::{
    Length as UomLength, MolarConcentration as UomMolarConcentration, Pressure as UomPressure,
    ThermodynamicTemperature as UomThermodynamicTemperature, Velocity as UomVelocity,
};

pub type Temperature = UomThermodynamicTemperature;
pub type WindSpeed = UomVelocity;
pub type PistonVelocity = UomVelocity;
pub type Pressure = UomPressure;
pub type Concentration = UomMolarConcentration;
pub type Depth = UomLength;

/// Length of a Julian year.
pub const SECONDS_PER_YEAR: FloatValue = 365.25 * 86_400.0;

/// Parts per trillion in one mole fraction.
pub const PPT_PER_MOLE_FRACTION: FloatValue = 1.0e12;

/// Litres in one cubic metre.
pub const LITRES_PER_CUBIC_METRE: FloatValue = 1000.0;

#[inline]
pub fn degc(v: FloatValue) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn kelvin(v: FloatValue) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn mps(v: FloatValue) -> WindSpeed {
    use uom::si::velocity::meter_per_second;
    WindSpeed::new::<meter_per_second>(v)
}

#[inline]
pub fn atm(v: FloatValue) -> Pressure {
    use uom::si::pressure::atmosphere;
    Pressure::new::<atmosphere>(v)
}

#[inline]
pub fn mol_per_m3(v: FloatValue) -> Concentration {
    use uom::si::molar_concentration::mole_per_cubic_meter;
    Concentration::new::<mole_per_cubic_meter>(v)
}

#[inline]
pub fn meters(v: FloatValue) -> Depth {
    use uom::si::length::meter;
    Depth::new::<meter>(v)
}

/// Temperature in degrees Celsius.
#[inline]
pub fn celsius(t: Temperature) -> FloatValue {
    use uom::si::thermodynamic_temperature::degree_celsius;
    t.get::<degree_celsius>()
}

/// Temperature in kelvin.
#[inline]
pub fn in_kelvin(t: Temperature) -> FloatValue {
    use uom::si::thermodynamic_temperature::kelvin;
    t.get::<kelvin>()
}

#[inline]
pub fn in_mps(v: UomVelocity) -> FloatValue {
    use uom::si::velocity::meter_per_second;
    v.get::<meter_per_second>()
}

#[inline]
pub fn in_atm(p: Pressure) -> FloatValue {
    use uom::si::pressure::atmosphere;
    p.get::<atmosphere>()
}

#[inline]
pub fn in_mol_per_m3(c: Concentration) -> FloatValue {
    use uom::si::molar_concentration::mole_per_cubic_meter;
    c.get::<mole_per_cubic_meter>()
}

#[inline]
pub fn in_meters(d: Depth) -> FloatValue {
    use uom::si::length::meter;
    d.get::<meter>()
}

/// Absolute salinity.
/// unit: g/kg
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Salinity(FloatValue);

impl Salinity {
    pub fn new(grams_per_kilogram: FloatValue) -> Self {
        Self(grams_per_kilogram)
    }

    pub fn grams_per_kilogram(self) -> FloatValue {
        self.0
    }
}

/// Atmospheric dry-air mole fraction of a trace gas.
/// unit: ppt (pmol/mol)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct MixingRatio(FloatValue);

impl MixingRatio {
    pub fn new(ppt: FloatValue) -> Self {
        Self(ppt)
    }

    pub fn ppt(self) -> FloatValue {
        self.0
    }

    /// Partial pressure this mole fraction exerts in a 1 atm atmosphere (atm).
    pub fn partial_pressure_atm(self) -> FloatValue {
        self.0 / PPT_PER_MOLE_FRACTION
    }

    /// Inverse of [`MixingRatio::partial_pressure_atm`].
    pub fn from_partial_pressure_atm(partial_pressure: FloatValue) -> Self {
        Self(partial_pressure * PPT_PER_MOLE_FRACTION)
    }
}

/// Fraction of the sea surface covered by ice.
///
/// Expected in [0, 1]. Construction does not clamp; forcing functions clamp
/// where clamping is part of their definition.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct IceFraction(FloatValue);

impl IceFraction {
    pub fn new(fraction: FloatValue) -> Self {
        Self(fraction)
    }

    pub fn ice_free() -> Self {
        Self(0.0)
    }

    pub fn value(self) -> FloatValue {
        self.0
    }

    /// Fraction of the surface open to gas exchange.
    pub fn open_water(self) -> FloatValue {
        1.0 - self.0
    }
}

/// Solubility function F.
/// unit: mol m^-3 atm^-1
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Solubility(FloatValue);

impl Solubility {
    pub fn new(mol_per_m3_per_atm: FloatValue) -> Self {
        Self(mol_per_m3_per_atm)
    }

    /// From the mol L^-1 atm^-1 basis the published fits are expressed in.
    pub fn from_mol_per_litre_per_atm(v: FloatValue) -> Self {
        Self(v * LITRES_PER_CUBIC_METRE)
    }

    pub fn mol_per_m3_per_atm(self) -> FloatValue {
        self.0
    }
}

/// Air-sea gas flux, positive into the ocean.
/// unit: mol m^-2 s^-1
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct GasFlux(FloatValue);

impl GasFlux {
    pub fn new(mol_per_m2_per_s: FloatValue) -> Self {
        Self(mol_per_m2_per_s)
    }

    pub fn mol_per_m2_per_s(self) -> FloatValue {
        self.0
    }

    /// unit: mol m^-2 yr^-1
    pub fn mol_per_m2_per_year(self) -> FloatValue {
        self.0 * SECONDS_PER_YEAR
    }
}

impl fmt::Display for GasFlux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:e} mol m^-2 s^-1", self.0)
    }
}

/// Construction of a typed quantity from a value and a unit label.
///
/// Labels of the quantity's own dimension are converted explicitly, anything
/// else is a [`CfcError::UnitMismatch`].
pub trait FromLabelled: Sized {
    const QUANTITY: &'static str;
    const EXPECTED: &'static str;

    fn convert(value: FloatValue, unit: &str) -> Option<Self>;

    fn from_labelled(value: FloatValue, unit: &str) -> CfcResult<Self> {
        let normalised: String = unit.split_whitespace().collect();
        Self::convert(value, &normalised).ok_or_else(|| CfcError::UnitMismatch {
            quantity: Self::QUANTITY,
            expected: Self::EXPECTED,
            got: unit.to_string(),
        })
    }
}

impl FromLabelled for Temperature {
    const QUANTITY: &'static str = "temperature";
    const EXPECTED: &'static str = "degC or K";

    fn convert(value: FloatValue, unit: &str) -> Option<Self> {
        match unit {
            "degC" | "°C" | "C" | "celsius" => Some(degc(value)),
            "K" | "kelvin" => Some(kelvin(value)),
            _ => None,
        }
    }
}

impl FromLabelled for Salinity {
    const QUANTITY: &'static str = "salinity";
    const EXPECTED: &'static str = "g/kg";

    fn convert(value: FloatValue, unit: &str) -> Option<Self> {
        match unit {
            "g/kg" | "gkg^-1" | "permil" | "‰" => Some(Salinity::new(value)),
            "kg/kg" => Some(Salinity::new(value * 1000.0)),
            _ => None,
        }
    }
}

impl FromLabelled for WindSpeed {
    const QUANTITY: &'static str = "wind speed";
    const EXPECTED: &'static str = "m/s";

    fn convert(value: FloatValue, unit: &str) -> Option<Self> {
        match unit {
            "m/s" | "ms^-1" => Some(mps(value)),
            "km/h" => Some(mps(value / 3.6)),
            _ => None,
        }
    }
}

impl FromLabelled for Pressure {
    const QUANTITY: &'static str = "pressure";
    const EXPECTED: &'static str = "atm";

    fn convert(value: FloatValue, unit: &str) -> Option<Self> {
        use uom::si::pressure::{bar, hectopascal, pascal};
        match unit {
            "atm" => Some(atm(value)),
            "Pa" => Some(Pressure::new::<pascal>(value)),
            "hPa" | "mbar" => Some(Pressure::new::<hectopascal>(value)),
            "bar" => Some(Pressure::new::<bar>(value)),
            _ => None,
        }
    }
}

impl FromLabelled for MixingRatio {
    const QUANTITY: &'static str = "mixing ratio";
    const EXPECTED: &'static str = "ppt";

    fn convert(value: FloatValue, unit: &str) -> Option<Self> {
        match unit {
            "ppt" | "pmol/mol" => Some(MixingRatio::new(value)),
            "ppb" | "nmol/mol" => Some(MixingRatio::new(value * 1.0e3)),
            _ => None,
        }
    }
}

impl FromLabelled for Concentration {
    const QUANTITY: &'static str = "concentration";
    const EXPECTED: &'static str = "mol/m^3";

    fn convert(value: FloatValue, unit: &str) -> Option<Self> {
        match unit {
            "mol/m^3" | "mol/m3" | "molm^-3" => Some(mol_per_m3(value)),
            "mol/L" | "mol/l" => Some(mol_per_m3(value * LITRES_PER_CUBIC_METRE)),
            _ => None,
        }
    }
}

impl FromLabelled for IceFraction {
    const QUANTITY: &'static str = "sea-ice fraction";
    const EXPECTED: &'static str = "1 (dimensionless) or %";

    fn convert(value: FloatValue, unit: &str) -> Option<Self> {
        match unit {
            "" | "1" | "fraction" => Some(IceFraction::new(value)),
            "%" => Some(IceFraction::new(value / 100.0)),
            _ => None,
        }
    }
}

impl FromLabelled for Depth {
    const QUANTITY: &'static str = "depth";
    const EXPECTED: &'static str = "m";

    fn convert(value: FloatValue, unit: &str) -> Option<Self> {
        match unit {
            "m" => Some(meters(value)),
            "cm" => Some(meters(value / 100.0)),
            _ => None,
        }
    }
}

/// A raw value with its unit label, as written in configuration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelledValue {
    pub value: FloatValue,
    pub unit: String,
}

impl LabelledValue {
    pub fn new(value: FloatValue, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }

    pub fn to<Q: FromLabelled>(&self) -> CfcResult<Q> {
        Q::from_labelled(self.value, &self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn constructors_smoke() {
        assert_relative_eq!(in_kelvin(degc(0.0)), 273.15, epsilon = 1e-12);
        assert_relative_eq!(in_mps(mps(5.0)), 5.0);
        assert_relative_eq!(in_atm(atm(1.0)), 1.0, epsilon = 1e-12);
        assert_relative_eq!(in_mol_per_m3(mol_per_m3(1e-9)), 1e-9);
        assert_relative_eq!(in_meters(meters(5.0)), 5.0);
    }

    #[test]
    fn labelled_temperature_converts_kelvin() {
        let t = Temperature::from_labelled(283.15, "K").unwrap();
        assert_relative_eq!(celsius(t), 10.0, epsilon = 1e-10);
    }

    #[test]
    fn labelled_value_rejects_other_dimension() {
        let err = LabelledValue::new(5.0, "m/s").to::<Temperature>().unwrap_err();
        match err {
            CfcError::UnitMismatch {
                quantity, got, ..
            } => {
                assert_eq!(quantity, "temperature");
                assert_eq!(got, "m/s");
            }
            other => panic!("Expected UnitMismatch, got {other:?}"),
        }
    }

    #[test]
    fn mixing_ratio_is_not_salinity() {
        assert!(Salinity::from_labelled(35.0, "ppt").is_err());
        assert!(MixingRatio::from_labelled(35.0, "g/kg").is_err());
    }

    #[test]
    fn unit_labels_ignore_whitespace() {
        let c = Concentration::from_labelled(2.0, "mol / m^3").unwrap();
        assert_relative_eq!(in_mol_per_m3(c), 2.0);
        let c = Concentration::from_labelled(2.0e-12, "mol/L").unwrap();
        assert_relative_eq!(in_mol_per_m3(c), 2.0e-9);
    }

    #[test]
    fn compatible_units_are_converted() {
        let p = Pressure::from_labelled(101_325.0, "Pa").unwrap();
        assert_relative_eq!(in_atm(p), 1.0, epsilon = 1e-12);
        let x = MixingRatio::from_labelled(0.5, "ppb").unwrap();
        assert_relative_eq!(x.ppt(), 500.0);
        let u = WindSpeed::from_labelled(36.0, "km/h").unwrap();
        assert_relative_eq!(in_mps(u), 10.0, epsilon = 1e-12);
        let f = IceFraction::from_labelled(25.0, "%").unwrap();
        assert_relative_eq!(f.value(), 0.25);
    }

    #[test]
    fn partial_pressure_round_trip() {
        let x = MixingRatio::new(250.0);
        assert_relative_eq!(x.partial_pressure_atm(), 2.5e-10);
        let back = MixingRatio::from_partial_pressure_atm(x.partial_pressure_atm());
        assert_relative_eq!(back.ppt(), 250.0, max_relative = 1e-14);
    }

    #[test]
    fn flux_per_year() {
        let flux = GasFlux::new(1.0);
        assert_relative_eq!(flux.mol_per_m2_per_year(), 31_557_600.0);
    }
}
