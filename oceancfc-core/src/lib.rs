//! Air-sea gas exchange of CFC-11 and CFC-12 following the OMIP protocol,
//! plus the solver glue shared by the ocean uptake models.
pub mod coefficients;
pub mod compound;
pub mod gas_exchange;
pub mod ivp;
pub mod timeseries;
pub mod trajectory;
pub mod units;

pub mod errors;
