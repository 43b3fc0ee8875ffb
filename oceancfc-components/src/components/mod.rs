pub mod coupled_uptake;
pub mod ocean_uptake;

pub use coupled_uptake::CoupledUptakeComponent;
pub use ocean_uptake::OceanUptakeComponent;
