//! Scenario-forced models of CFC uptake by the surface ocean.
pub mod components;
pub mod constants;
pub mod driver;
pub mod parameters;
pub mod scenario;
