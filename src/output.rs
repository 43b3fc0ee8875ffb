//! CSV output for scenario runs and gas property tables.

use oceancfc_components::constants::calendar_year;
use oceancfc_components::scenario::ScenarioTag;
use oceancfc_core::compound::Compound;
use oceancfc_core::errors::{CfcError, CfcResult};
use oceancfc_core::gas_exchange::GasExchange;
use oceancfc_core::timeseries::{FloatValue, Time};
use oceancfc_core::trajectory::Trajectory;
use oceancfc_core::units::{
    degc, in_mol_per_m3, in_mps, IceFraction, MixingRatio, Pressure, Salinity, WindSpeed,
};
use std::collections::BTreeMap;
use std::io::Write;

/// Write one row per scenario and output time: `time,year,scenario,<state columns>`.
pub fn write_trajectories<W: Write, const N: usize>(
    writer: W,
    runs: &BTreeMap<ScenarioTag, Trajectory<N>>,
    times: &[Time],
    state_names: &[&str],
) -> CfcResult<()> {
    if state_names.len() != N {
        return Err(CfcError::Error(format!(
            "{} state names given for a {N} component state",
            state_names.len()
        )));
    }

    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec!["time", "year", "scenario"];
    header.extend_from_slice(state_names);
    wtr.write_record(&header)?;

    for (scenario, trajectory) in runs {
        let sampled = trajectory.sample(times)?;
        for (t, row) in times.iter().zip(sampled.rows()) {
            let mut record = vec![
                t.to_string(),
                calendar_year(*t).to_string(),
                scenario.to_string(),
            ];
            record.extend(row.iter().map(|v| format!("{v:e}")));
            wtr.write_record(&record)?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Fixed conditions for a gas property table
#[derive(Debug, Clone, Copy)]
pub struct PropertyConditions {
    pub compound: Compound,
    pub salinity: Salinity,
    pub surface_pressure: Pressure,
    pub wind_speed: WindSpeed,
    pub ice_fraction: IceFraction,
    pub mixing_ratio: MixingRatio,
}

/// Solubility, Schmidt number, piston velocity and saturation over a temperature range.
pub fn write_gas_properties<W: Write>(
    writer: W,
    gas: &GasExchange,
    conditions: &PropertyConditions,
    temperatures: &[FloatValue],
) -> CfcResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "temperature_degC",
        "solubility_mol_m3_atm",
        "schmidt_number",
        "piston_velocity_m_s",
        "saturation_mol_m3",
    ])?;

    for t in temperatures {
        let temperature = degc(*t);
        let f = gas.solubility(temperature, conditions.salinity, conditions.compound);
        let sc = gas.schmidt_number(temperature, conditions.compound);
        let k = gas.piston_velocity(
            temperature,
            conditions.wind_speed,
            conditions.ice_fraction,
            conditions.compound,
        );
        let sat = gas.saturation_concentration(
            temperature,
            conditions.salinity,
            conditions.surface_pressure,
            conditions.mixing_ratio,
            conditions.compound,
        );
        wtr.write_record(&[
            t.to_string(),
            format!("{:.6}", f.mol_per_m3_per_atm()),
            format!("{sc:.2}"),
            format!("{:e}", in_mps(k)),
            format!("{:e}", in_mol_per_m3(sat)),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Temperatures from `t_min` to `t_max` inclusive.
pub fn temperature_range(
    t_min: FloatValue,
    t_max: FloatValue,
    step: FloatValue,
) -> CfcResult<Vec<FloatValue>> {
    if !(step > 0.0) || t_max < t_min {
        return Err(CfcError::Config(format!(
            "invalid temperature range {t_min}..{t_max} step {step}"
        )));
    }
    let n = ((t_max - t_min) / step + 1e-9).floor() as usize;
    Ok((0..=n).map(|i| t_min + i as FloatValue * step).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oceancfc_core::ivp::State;
    use oceancfc_core::units::{atm, mps};

    fn flat(value: FloatValue) -> Trajectory<2> {
        Trajectory::new(
            vec![0.0, 10.0],
            vec![State::<2>::new(value, 2.0 * value); 2],
            vec![State::<2>::zeros(); 2],
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_trajectory_csv_layout() {
        let mut runs = BTreeMap::new();
        runs.insert(ScenarioTag::WarmingMelt, flat(2.0));
        runs.insert(ScenarioTag::Control, flat(1.0));

        let mut buffer = Vec::new();
        write_trajectories(&mut buffer, &runs, &[0.0, 5.0], &["ocean", "atmosphere"]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "time,year,scenario,ocean,atmosphere");
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("0,1950,control,1e0,2e0"));
        assert!(lines[4].starts_with("5,1955,warming_melt,"));
    }

    #[test]
    fn test_trajectory_csv_rejects_out_of_span_times() {
        let mut runs = BTreeMap::new();
        runs.insert(ScenarioTag::Control, flat(1.0));
        let result = write_trajectories(Vec::new(), &runs, &[20.0], &["a", "b"]);
        assert!(matches!(result, Err(CfcError::ExtrapolationNotAllowed(..))));
    }

    #[test]
    fn test_gas_property_table() {
        let conditions = PropertyConditions {
            compound: Compound::Cfc12,
            salinity: Salinity::new(35.0),
            surface_pressure: atm(1.0),
            wind_speed: mps(5.0),
            ice_fraction: IceFraction::ice_free(),
            mixing_ratio: MixingRatio::new(500.0),
        };
        let temperatures = temperature_range(-2.0, 30.0, 2.0).unwrap();
        assert_eq!(temperatures.len(), 17);

        let mut buffer = Vec::new();
        write_gas_properties(&mut buffer, &GasExchange::omip(), &conditions, &temperatures)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 18);
        assert!(text.starts_with("temperature_degC,solubility_mol_m3_atm"));
    }

    #[test]
    fn test_gas_property_table_uses_typed_conditions() {
        let calm = PropertyConditions {
            compound: Compound::Cfc11,
            salinity: Salinity::new(35.0),
            surface_pressure: atm(1.0),
            wind_speed: mps(0.0),
            ice_fraction: IceFraction::ice_free(),
            mixing_ratio: MixingRatio::new(250.0),
        };
        let mut buffer = Vec::new();
        write_gas_properties(&mut buffer, &GasExchange::omip(), &calm, &[10.0]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let row: Vec<&str> = text.lines().nth(1).unwrap().split(',').collect();
        assert_eq!(row[3].parse::<f64>().unwrap(), 0.0);

        let gas = GasExchange::omip();
        let expected = gas.saturation_concentration(
            degc(10.0),
            calm.salinity,
            calm.surface_pressure,
            calm.mixing_ratio,
            calm.compound,
        );
        let written: f64 = row[4].parse().unwrap();
        assert!((written - in_mol_per_m3(expected)).abs() <= 1e-12 * written.abs());
    }

    #[test]
    fn test_invalid_temperature_range() {
        assert!(temperature_range(10.0, 0.0, 1.0).is_err());
        assert!(temperature_range(0.0, 10.0, 0.0).is_err());
    }
}
