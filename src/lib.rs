//! Command-line driver for the CFC ocean uptake models: run configuration and CSV output.
//!
//! The physics lives in [`oceancfc_core`] and the scenario models in
//! [`oceancfc_components`]; both are re-exported here.
pub mod config;
pub mod output;

pub use oceancfc_components as components;
pub use oceancfc_core as core;
