//! The shipped demo configurations parse and build a driver.

use oceancfc::config::RunConfig;
use oceancfc_components::driver::ModelVariant;
use oceancfc_core::compound::Compound;
use oceancfc_core::units::in_meters;
use std::path::Path;

fn demo(name: &str) -> (RunConfig, std::path::PathBuf) {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos");
    let config = RunConfig::from_file(dir.join(name)).unwrap();
    (config, dir)
}

#[test]
fn test_coupled_demo() {
    let (config, dir) = demo("coupled.toml");
    assert_eq!(config.model, ModelVariant::Coupled);
    assert_eq!(config.scenarios.len(), 4);
    let driver = config.driver(&dir).unwrap();
    assert!(driver.history().is_none());
    assert_eq!(in_meters(driver.coupled_parameters.surface_layer_depth), 5.0);
}

#[test]
fn test_single_demo_loads_history() {
    let (config, dir) = demo("single.toml");
    assert_eq!(config.model, ModelVariant::Single);
    assert_eq!(config.compound, Compound::Cfc12);
    assert_eq!(config.output_times().len(), 141);

    let driver = config.driver(&dir).unwrap();
    let history = driver.history().unwrap();
    assert_eq!(history.series().time_bounds(), (1950.0, 2015.0));
    assert_eq!(history.mixing_ratio(2030.0).ppt(), 533.0);
}
