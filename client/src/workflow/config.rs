use anyhow::Context;
use netvisorcore::SimulationParameters;
use std::fs;
use std::path::Path;

pub use netvisorcore::config::ClientConfig;

/// Parameter file in YAML, keyed by the service's wire names. Missing keys
/// take their defaults.
pub fn load_parameters(path: &Path) -> anyhow::Result<SimulationParameters> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading parameter file {}", path.display()))?;
    let params: SimulationParameters = serde_yaml::from_str(&contents)
        .with_context(|| format!("parsing parameter file {}", path.display()))?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parameter_file_uses_wire_names() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"numberOfNodes: 5\nnumberOfAccessPoints: 2\nK0dB: 7.5\n\
              transmissionPowers: [20, 20]\nfrequencies: [2.4e9, 5.0e9]\n\
              bandwidths: [20e6, 40e6]\napPositions: [[0, 0], [10, 10]]\n\
              antennaGains: [0, 3]\nbeamwidths: [360, 120]\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let params = load_parameters(&path).unwrap();
        assert_eq!(params.number_of_nodes, 5);
        assert_eq!(params.k0_db, 7.5);
        assert_eq!(params.ap_positions[1], [10.0, 10.0]);
        assert_eq!(params.simulation_time, 30.0);
        assert!(params.is_consistent());
    }

    #[test]
    fn malformed_parameter_file_names_the_path() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"numberOfNodes: [oops\n").unwrap();
        let path = temp.into_temp_path();
        let err = load_parameters(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("parsing parameter file"));
    }
}
