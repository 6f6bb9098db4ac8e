use serde::{Deserialize, Serialize};

pub const DEFAULT_POWER_DBM: f64 = 23.0;
pub const DEFAULT_FREQUENCY_HZ: f64 = 2.4e9;
pub const DEFAULT_BANDWIDTH_HZ: f64 = 20_000_000.0;
pub const DEFAULT_POSITION: [f64; 2] = [0.0, 0.0];
pub const DEFAULT_ANTENNA_GAIN_DBI: f64 = 0.0;
pub const DEFAULT_BEAMWIDTH_DEG: f64 = 360.0;

/// Parameter record posted to the simulation service.
///
/// Field names on the wire follow the service contract (`numberOfNodes`,
/// `K0dB`, ...). Every per-AP array carries `number_of_access_points` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationParameters {
    pub simulation_time: f64,
    pub time_step: f64,
    pub number_of_nodes: u32,
    pub velocity: f64,
    pub path_loss_exponent: f64,
    pub number_of_access_points: usize,
    pub data_size: f64,
    pub transmission_powers: Vec<f64>,
    pub frequencies: Vec<f64>,
    pub bandwidths: Vec<f64>,
    pub ap_positions: Vec<[f64; 2]>,
    #[serde(rename = "K0dB")]
    pub k0_db: f64,
    #[serde(rename = "KDecay")]
    pub k_decay: f64,
    #[serde(rename = "shadowSigmaDB")]
    pub shadow_sigma_db: f64,
    pub max_retries: u32,
    pub antenna_gains: Vec<f64>,
    pub beamwidths: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_type: Option<String>,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            simulation_time: 30.0,
            time_step: 1.0,
            number_of_nodes: 3,
            velocity: 1.5,
            path_loss_exponent: 3.2,
            number_of_access_points: 3,
            data_size: 1000.0,
            transmission_powers: vec![DEFAULT_POWER_DBM; 3],
            frequencies: vec![DEFAULT_FREQUENCY_HZ; 3],
            bandwidths: vec![DEFAULT_BANDWIDTH_HZ; 3],
            ap_positions: vec![[0.0, 0.0], [50.0, 0.0], [0.0, 50.0]],
            k0_db: 5.0,
            k_decay: 0.1,
            shadow_sigma_db: 3.0,
            max_retries: 3,
            antenna_gains: vec![DEFAULT_ANTENNA_GAIN_DBI; 3],
            beamwidths: vec![DEFAULT_BEAMWIDTH_DEG; 3],
            environment_type: None,
        }
    }
}

impl SimulationParameters {
    /// Returns the names of per-AP arrays whose length disagrees with the AP count.
    pub fn mismatched_arrays(&self) -> Vec<&'static str> {
        let expected = self.number_of_access_points;
        let lengths = [
            ("transmissionPowers", self.transmission_powers.len()),
            ("frequencies", self.frequencies.len()),
            ("bandwidths", self.bandwidths.len()),
            ("apPositions", self.ap_positions.len()),
            ("antennaGains", self.antenna_gains.len()),
            ("beamwidths", self.beamwidths.len()),
        ];
        lengths
            .iter()
            .filter(|(_, len)| *len != expected)
            .map(|(name, _)| *name)
            .collect()
    }

    pub fn is_consistent(&self) -> bool {
        self.mismatched_arrays().is_empty()
    }

    /// Flattens the record into `(wire name, display value)` pairs.
    pub fn display_fields(&self) -> Vec<(&'static str, String)> {
        let join = |values: &[f64]| {
            values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(";")
        };
        let positions = self
            .ap_positions
            .iter()
            .map(|[x, y]| format!("{}:{}", x, y))
            .collect::<Vec<_>>()
            .join(";");

        let mut fields = vec![
            ("simulationTime", self.simulation_time.to_string()),
            ("timeStep", self.time_step.to_string()),
            ("numberOfNodes", self.number_of_nodes.to_string()),
            ("velocity", self.velocity.to_string()),
            ("pathLossExponent", self.path_loss_exponent.to_string()),
            ("numberOfAccessPoints", self.number_of_access_points.to_string()),
            ("dataSize", self.data_size.to_string()),
            ("transmissionPowers", join(&self.transmission_powers)),
            ("frequencies", join(&self.frequencies)),
            ("bandwidths", join(&self.bandwidths)),
            ("apPositions", positions),
            ("K0dB", self.k0_db.to_string()),
            ("KDecay", self.k_decay.to_string()),
            ("shadowSigmaDB", self.shadow_sigma_db.to_string()),
            ("maxRetries", self.max_retries.to_string()),
            ("antennaGains", join(&self.antenna_gains)),
            ("beamwidths", join(&self.beamwidths)),
        ];
        if let Some(environment) = &self.environment_type {
            fields.push(("environmentType", environment.clone()));
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_consistent() {
        let params = SimulationParameters::default();
        assert!(params.is_consistent());
        assert_eq!(params.number_of_access_points, 3);
    }

    #[test]
    fn serializes_with_service_field_names() {
        let value = serde_json::to_value(SimulationParameters::default()).unwrap();
        assert_eq!(value["numberOfNodes"], 3);
        assert_eq!(value["K0dB"], 5.0);
        assert_eq!(value["shadowSigmaDB"], 3.0);
        assert_eq!(value["apPositions"][1][0], 50.0);
        assert!(value.get("environmentType").is_none());
    }

    #[test]
    fn partial_payload_falls_back_to_defaults() {
        let params: SimulationParameters =
            serde_json::from_str(r#"{"numberOfNodes": 5, "KDecay": 0.5}"#).unwrap();
        assert_eq!(params.number_of_nodes, 5);
        assert_eq!(params.k_decay, 0.5);
        assert_eq!(params.simulation_time, 30.0);
    }

    #[test]
    fn mismatched_arrays_are_reported() {
        let params = SimulationParameters {
            number_of_access_points: 2,
            transmission_powers: vec![23.0, 23.0],
            ..Default::default()
        };
        let mismatched = params.mismatched_arrays();
        assert!(!mismatched.contains(&"transmissionPowers"));
        assert!(mismatched.contains(&"frequencies"));
    }
}
