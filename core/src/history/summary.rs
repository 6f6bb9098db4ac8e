use crate::model::{SimulationParameters, SimulationResult};

pub const ERROR_SUMMARY: &str = "Error in simulation";

/// One-line description shown next to a history entry.
pub fn summarize(params: &SimulationParameters, result: &SimulationResult) -> String {
    if result.is_error() {
        return ERROR_SUMMARY.to_string();
    }
    format!(
        "{} users, {} APs, {}s",
        params.number_of_nodes, params.number_of_access_points, params.simulation_time
    )
}
