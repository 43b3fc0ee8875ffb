use oceancfc_core::timeseries::{FloatValue, Time};

/// Calendar year of model time zero.
pub const EPOCH_YEAR: Time = 1950.0;

/// Standard acceleration of gravity
/// unit: m / s^2
pub const STANDARD_GRAVITY: FloatValue = 9.80665;

/// Molar mass of dry air
/// unit: kg / mol
pub const MOLAR_MASS_DRY_AIR: FloatValue = 0.0289644;

/// unit: Pa / atm
pub const PASCAL_PER_ATM: FloatValue = 101_325.0;

/// Fraction of the Earth's surface covered by ocean
pub const OCEAN_FRACTION: FloatValue = 0.71;

/// Calendar year for a model time.
pub fn calendar_year(t: Time) -> Time {
    EPOCH_YEAR + t
}
