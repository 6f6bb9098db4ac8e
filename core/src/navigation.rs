use crate::history::HistoryEntry;
use crate::model::{SimulationParameters, SimulationResult};
use crate::prelude::epoch_millis;
use rand::{distributions::Uniform, Rng};
use serde::{Deserialize, Serialize};
use std::fmt;

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Identifier of a single simulation run, `sim-{millis}-{suffix}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimulationId(String);

impl SimulationId {
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let alphabet = Uniform::from(0..BASE36.len());
        let suffix: String = (0..ID_SUFFIX_LEN)
            .map(|_| BASE36[rng.sample(alphabet)] as char)
            .collect();
        Self(format!("sim-{}-{}", epoch_millis(), suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SimulationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SimulationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SimulationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// State handed from the input page to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub form_data: SimulationParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_result: Option<SimulationResult>,
    #[serde(default)]
    pub is_historical: bool,
    pub simulation_id: SimulationId,
}

impl NavigationState {
    /// Fresh run: new identifier, no precomputed result.
    pub fn fresh(form_data: SimulationParameters) -> Self {
        Self {
            form_data,
            saved_result: None,
            is_historical: false,
            simulation_id: SimulationId::generate(),
        }
    }

    pub fn replay(entry: &HistoryEntry) -> Self {
        Self {
            form_data: entry.form_data.clone(),
            saved_result: Some(entry.result.clone()),
            is_historical: true,
            simulation_id: entry.id.clone(),
        }
    }
}
