//! Downloadable renderings of a run: a JSON document and a flattened CSV
//! summary.

use crate::history::{summarize, HistoryEntry};
use crate::math::StatsHelper;
use crate::model::{SimulationParameters, SimulationResult};
use crate::navigation::SimulationId;
use crate::prelude::{epoch_millis, CoreError, CoreResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub simulation_id: SimulationId,
    /// Epoch milliseconds.
    pub exported_at: u64,
    pub summary: String,
}

/// Metadata wrapper around a run, as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub metadata: ExportMetadata,
    pub parameters: SimulationParameters,
    pub results: SimulationResult,
}

impl ExportDocument {
    pub fn new(
        simulation_id: SimulationId,
        parameters: SimulationParameters,
        results: SimulationResult,
    ) -> Self {
        let summary = summarize(&parameters, &results);
        Self {
            metadata: ExportMetadata {
                simulation_id,
                exported_at: epoch_millis(),
                summary,
            },
            parameters,
            results,
        }
    }

    pub fn from_entry(entry: &HistoryEntry) -> Self {
        Self::new(
            entry.id.clone(),
            entry.form_data.clone(),
            entry.result.clone(),
        )
    }

    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CoreError::Export(e.to_string()))
    }

    pub fn from_json(raw: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_csv(&self) -> CoreResult<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        let to_export_err = |e: csv::Error| CoreError::Export(e.to_string());

        writer
            .write_record(["Section", "Field", "Value"])
            .map_err(to_export_err)?;

        let metadata = [
            ("simulationId", self.metadata.simulation_id.to_string()),
            ("exportedAt", self.metadata.exported_at.to_string()),
            ("summary", self.metadata.summary.clone()),
        ];
        for (field, value) in metadata {
            writer
                .write_record(["metadata", field, value.as_str()])
                .map_err(to_export_err)?;
        }

        for (field, value) in self.parameters.display_fields() {
            writer
                .write_record(["parameters", field, value.as_str()])
                .map_err(to_export_err)?;
        }

        for (field, value) in headline_counts(&self.results) {
            writer
                .write_record(["results", field, value.as_str()])
                .map_err(to_export_err)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| CoreError::Export(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| CoreError::Export(e.to_string()))
    }

    /// Suggested file name for a given extension.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.metadata.simulation_id, extension)
    }
}

/// Handovers: AP changes between consecutive steps, summed over users.
pub fn total_handovers(result: &SimulationResult) -> usize {
    result
        .users_handover
        .iter()
        .map(|series| StatsHelper::transitions(series))
        .sum()
}

fn headline_counts(result: &SimulationResult) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("timeSteps", result.step_count().to_string()),
        ("users", result.user_count().to_string()),
        (
            "accessPoints",
            result
                .users_sinr
                .first()
                .map(Vec::len)
                .unwrap_or(0)
                .to_string(),
        ),
        ("totalHandovers", total_handovers(result).to_string()),
        (
            "totalCollisions",
            StatsHelper::sum_nested(&result.users_collision).to_string(),
        ),
        (
            "totalRetries",
            StatsHelper::sum_nested(&result.users_retries).to_string(),
        ),
        (
            "meanPer",
            format!("{:.4}", StatsHelper::mean_nested(&result.users_per)),
        ),
        (
            "meanThroughputMbps",
            format!(
                "{:.3}",
                StatsHelper::mean_nested(&result.users_throughput) / 1e6
            ),
        ),
    ];
    if let Some(error) = &result.error {
        rows.push(("error", error.clone()));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> ExportDocument {
        let results = SimulationResult {
            time: vec![0.0, 1.0, 2.0],
            users_sinr: vec![vec![vec![1.0; 3]; 3]; 2],
            users_throughput: vec![vec![2e6, 4e6, 6e6], vec![0.0, 0.0, 0.0]],
            users_per: vec![vec![0.1, 0.2, 0.3], vec![0.0, 0.0, 0.0]],
            users_collision: vec![vec![1.0, 0.0, 2.0], vec![0.0, 1.0, 0.0]],
            users_retries: vec![vec![0.0, 3.0, 0.0], vec![1.0, 0.0, 0.0]],
            users_handover: vec![vec![1.0, 2.0, 1.0], vec![3.0, 3.0, 3.0]],
            ..Default::default()
        };
        ExportDocument::new(
            SimulationId::from("sim-1-abc"),
            SimulationParameters::default(),
            results,
        )
    }

    #[test]
    fn json_round_trip_is_lossless() {
        let doc = document();
        let raw = doc.to_json().unwrap();
        assert_eq!(ExportDocument::from_json(&raw).unwrap(), doc);

        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["metadata"]["simulationId"], "sim-1-abc");
        assert_eq!(value["parameters"]["numberOfAccessPoints"], 3);
        assert_eq!(value["results"]["time"][2], 2.0);
    }

    #[test]
    fn csv_flattens_metadata_parameters_and_counts() {
        let csv = document().to_csv().unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Section,Field,Value"));
        assert!(csv.contains("metadata,summary,\"3 users, 3 APs, 30s\""));
        assert!(csv.contains("parameters,apPositions,0:0;50:0;0:50"));
        assert!(csv.contains("results,totalHandovers,2"));
        assert!(csv.contains("results,totalCollisions,4"));
        assert!(csv.contains("results,accessPoints,3"));
        assert!(csv.contains("results,meanThroughputMbps,2.000"));
        assert!(!csv.contains("results,error"));
    }

    #[test]
    fn csv_reports_service_error() {
        let doc = ExportDocument::new(
            SimulationId::from("sim-2"),
            SimulationParameters::default(),
            SimulationResult::failed("HTTP error! status: 500"),
        );
        let csv = doc.to_csv().unwrap();
        assert!(csv.contains("metadata,summary,Error in simulation"));
        assert!(csv.contains("results,error,HTTP error! status: 500"));
        assert_eq!(doc.file_name("csv"), "sim-2.csv");
    }
}
