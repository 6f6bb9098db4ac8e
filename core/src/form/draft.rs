use crate::form::fields::{ApArrayField, ScalarField};
use crate::form::validation::MAX_ACCESS_POINTS;
use crate::model::parameters::{
    DEFAULT_ANTENNA_GAIN_DBI, DEFAULT_BANDWIDTH_HZ, DEFAULT_BEAMWIDTH_DEG, DEFAULT_FREQUENCY_HZ,
    DEFAULT_POSITION, DEFAULT_POWER_DBM,
};
use crate::model::SimulationParameters;
use std::collections::BTreeMap;

/// Parses raw input text. Empty or unparsable text yields `None`.
pub fn parse_entry(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn normalized(entry: Option<f64>) -> f64 {
    entry.unwrap_or(0.0)
}

/// In-progress form state. Entries may be empty while the user is editing.
#[derive(Debug, Clone, PartialEq)]
pub struct FormDraft {
    scalars: BTreeMap<ScalarField, Option<f64>>,
    arrays: BTreeMap<ApArrayField, Vec<Option<f64>>>,
    positions: Vec<[f64; 2]>,
    access_points: usize,
    environment_type: Option<String>,
}

impl Default for FormDraft {
    fn default() -> Self {
        Self::from_parameters(&SimulationParameters::default())
    }
}

impl FormDraft {
    pub fn from_parameters(params: &SimulationParameters) -> Self {
        let scalars = ScalarField::ALL
            .into_iter()
            .map(|field| {
                let value = match field {
                    ScalarField::SimulationTime => params.simulation_time,
                    ScalarField::TimeStep => params.time_step,
                    ScalarField::NumberOfNodes => params.number_of_nodes as f64,
                    ScalarField::Velocity => params.velocity,
                    ScalarField::PathLossExponent => params.path_loss_exponent,
                    ScalarField::DataSize => params.data_size,
                    ScalarField::K0Db => params.k0_db,
                    ScalarField::KDecay => params.k_decay,
                    ScalarField::ShadowSigmaDb => params.shadow_sigma_db,
                    ScalarField::MaxRetries => params.max_retries as f64,
                };
                (field, Some(value))
            })
            .collect();

        let wrap = |values: &[f64]| values.iter().map(|v| Some(*v)).collect::<Vec<_>>();
        let mut arrays = BTreeMap::new();
        arrays.insert(ApArrayField::TransmissionPowers, wrap(&params.transmission_powers));
        arrays.insert(ApArrayField::Frequencies, wrap(&params.frequencies));
        arrays.insert(ApArrayField::Bandwidths, wrap(&params.bandwidths));
        arrays.insert(ApArrayField::AntennaGains, wrap(&params.antenna_gains));
        arrays.insert(ApArrayField::Beamwidths, wrap(&params.beamwidths));

        let mut draft = Self {
            scalars,
            arrays,
            positions: params.ap_positions.clone(),
            access_points: params.number_of_access_points,
            environment_type: params.environment_type.clone(),
        };
        // Loaded records may be inconsistent; the draft never is.
        draft.resize(params.number_of_access_points);
        draft
    }

    pub fn scalar(&self, field: ScalarField) -> Option<f64> {
        self.scalars.get(&field).copied().flatten()
    }

    pub fn scalar_or_zero(&self, field: ScalarField) -> f64 {
        normalized(self.scalar(field))
    }

    pub(crate) fn set_scalar(&mut self, field: ScalarField, value: Option<f64>) {
        self.scalars.insert(field, value);
    }

    pub fn array(&self, field: ApArrayField) -> &[Option<f64>] {
        self.arrays.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn array_or_zero(&self, field: ApArrayField) -> Vec<f64> {
        self.array(field).iter().map(|entry| normalized(*entry)).collect()
    }

    pub(crate) fn array_mut(&mut self, field: ApArrayField) -> &mut Vec<Option<f64>> {
        self.arrays.entry(field).or_default()
    }

    pub fn positions(&self) -> &[[f64; 2]] {
        &self.positions
    }

    pub(crate) fn positions_mut(&mut self) -> &mut Vec<[f64; 2]> {
        &mut self.positions
    }

    pub fn access_points(&self) -> usize {
        self.access_points
    }

    pub fn environment_type(&self) -> Option<&str> {
        self.environment_type.as_deref()
    }

    pub(crate) fn set_environment_type(&mut self, label: Option<String>) {
        self.environment_type = label;
    }

    /// Resizes every per-AP array to `count`, preserving existing entries.
    /// Counts above `MAX_ACCESS_POINTS` are recorded but leave the arrays
    /// untouched, so validation can reject them.
    pub(crate) fn resize(&mut self, count: usize) {
        self.access_points = count;
        if count > MAX_ACCESS_POINTS {
            return;
        }
        for field in ApArrayField::ALL {
            let fill = match field {
                ApArrayField::TransmissionPowers => DEFAULT_POWER_DBM,
                ApArrayField::Frequencies => DEFAULT_FREQUENCY_HZ,
                ApArrayField::Bandwidths => DEFAULT_BANDWIDTH_HZ,
                ApArrayField::AntennaGains => DEFAULT_ANTENNA_GAIN_DBI,
                ApArrayField::Beamwidths => DEFAULT_BEAMWIDTH_DEG,
            };
            self.array_mut(field).resize(count, Some(fill));
        }
        self.positions.resize(count, DEFAULT_POSITION);
    }

    /// Every per-AP array has exactly `access_points` entries.
    pub fn is_consistent(&self) -> bool {
        ApArrayField::ALL
            .into_iter()
            .all(|field| self.array(field).len() == self.access_points)
            && self.positions.len() == self.access_points
    }

    /// Cleaned record with empty entries normalized to zero. Counts are
    /// truncated; range checks belong to validation.
    pub fn to_parameters(&self) -> SimulationParameters {
        SimulationParameters {
            simulation_time: self.scalar_or_zero(ScalarField::SimulationTime),
            time_step: self.scalar_or_zero(ScalarField::TimeStep),
            number_of_nodes: self.scalar_or_zero(ScalarField::NumberOfNodes).max(0.0) as u32,
            velocity: self.scalar_or_zero(ScalarField::Velocity),
            path_loss_exponent: self.scalar_or_zero(ScalarField::PathLossExponent),
            number_of_access_points: self.access_points,
            data_size: self.scalar_or_zero(ScalarField::DataSize),
            transmission_powers: self.array_or_zero(ApArrayField::TransmissionPowers),
            frequencies: self.array_or_zero(ApArrayField::Frequencies),
            bandwidths: self.array_or_zero(ApArrayField::Bandwidths),
            ap_positions: self.positions.clone(),
            k0_db: self.scalar_or_zero(ScalarField::K0Db),
            k_decay: self.scalar_or_zero(ScalarField::KDecay),
            shadow_sigma_db: self.scalar_or_zero(ScalarField::ShadowSigmaDb),
            max_retries: self.scalar_or_zero(ScalarField::MaxRetries).max(0.0) as u32,
            antenna_gains: self.array_or_zero(ApArrayField::AntennaGains),
            beamwidths: self.array_or_zero(ApArrayField::Beamwidths),
            environment_type: self.environment_type.clone(),
        }
    }
}
