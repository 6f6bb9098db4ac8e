use crate::prelude::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Time series returned by the simulation service.
///
/// Per-AP metrics are indexed `[user][ap][step]`, per-user metrics
/// `[user][step]`. A populated `error` means the remote computation failed and
/// every series is expected to be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    #[serde(default)]
    pub time: Vec<f64>,
    #[serde(default)]
    pub users_sinr: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    pub users_distance: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    pub users_throughput: Vec<Vec<f64>>,
    #[serde(default)]
    pub users_mac_throughput: Vec<Vec<f64>>,
    #[serde(default)]
    pub users_per: Vec<Vec<f64>>,
    #[serde(default)]
    pub users_collision: Vec<Vec<f64>>,
    #[serde(default)]
    pub users_retries: Vec<Vec<f64>>,
    #[serde(default)]
    pub users_handover: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SimulationResult {
    /// Builds the uniform failure payload rendered when a run cannot complete.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    /// Parses a response body at the network boundary.
    pub fn from_json(body: &str) -> CoreResult<Self> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        if !value.is_object() {
            return Err(CoreError::Payload(
                "simulation response is not a JSON object".into(),
            ));
        }
        let result: SimulationResult = serde_json::from_value(value)?;
        Ok(result)
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn has_series(&self) -> bool {
        !(self.time.is_empty()
            && self.users_sinr.is_empty()
            && self.users_distance.is_empty()
            && self.users_throughput.is_empty()
            && self.users_mac_throughput.is_empty()
            && self.users_per.is_empty()
            && self.users_collision.is_empty()
            && self.users_retries.is_empty()
            && self.users_handover.is_empty())
    }

    pub fn step_count(&self) -> usize {
        self.time.len()
    }

    pub fn user_count(&self) -> usize {
        self.users_throughput.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_result_has_only_error() {
        let result = SimulationResult::failed("HTTP error! status: 500");
        assert!(result.is_error());
        assert!(!result.has_series());
    }

    #[test]
    fn parses_partial_payload() {
        let body = r#"{"time": [0, 1], "users_per": [[0.1, 0.2]], "extra": true}"#;
        let result = SimulationResult::from_json(body).unwrap();
        assert_eq!(result.step_count(), 2);
        assert_eq!(result.users_per[0][1], 0.2);
        assert!(result.users_sinr.is_empty());
        assert!(!result.is_error());
    }

    #[test]
    fn parses_service_error_payload() {
        let result = SimulationResult::from_json(r#"{"error": "matlab engine down"}"#).unwrap();
        assert_eq!(result.error.as_deref(), Some("matlab engine down"));
    }

    #[test]
    fn rejects_non_object_payload() {
        assert!(matches!(
            SimulationResult::from_json("[1, 2, 3]"),
            Err(CoreError::Payload(_))
        ));
        assert!(SimulationResult::from_json(r#"{"time": "soon"}"#).is_err());
    }
}
