use crate::form::draft::{parse_entry, FormDraft};
use crate::form::fields::{ApArrayField, Axis, FormField, ScalarField};
use crate::form::presets::{
    find_preset, match_positions, match_scalars, PresetField, PresetValues,
};
use crate::form::validation::{validate, ValidationErrors};
use crate::model::{find_environment, SimulationParameters};
use crate::prelude::{CoreError, CoreResult};
use crate::telemetry::LogManager;

/// Result of selecting a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetOutcome {
    Applied,
    /// "Custom" carries no values and leaves the draft as is.
    Custom,
    /// The preset describes a different number of access points.
    LengthMismatch { preset: usize, access_points: usize },
}

/// Collects and validates simulation parameters before handing them on.
///
/// The collector never talks to the network; `submit` passes the cleaned
/// record to a caller-supplied callback.
pub struct FormCollector {
    draft: FormDraft,
    errors: ValidationErrors,
    logger: LogManager,
}

impl Default for FormCollector {
    fn default() -> Self {
        Self::new(FormDraft::default())
    }
}

impl FormCollector {
    pub fn new(draft: FormDraft) -> Self {
        Self {
            draft,
            errors: ValidationErrors::default(),
            logger: LogManager::new(),
        }
    }

    pub fn from_parameters(params: &SimulationParameters) -> Self {
        Self::new(FormDraft::from_parameters(params))
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn update_scalar(&mut self, field: ScalarField, raw: &str) {
        self.draft.set_scalar(field, parse_entry(raw));
        self.errors.clear_field(FormField::Scalar(field));
    }

    /// Indexed per-AP update. Indices past the current AP count are ignored.
    pub fn update_array(&mut self, field: ApArrayField, index: usize, raw: &str) {
        if let Some(slot) = self.draft.array_mut(field).get_mut(index) {
            *slot = parse_entry(raw);
            self.errors.clear_field(FormField::ApArray(field, index));
        }
    }

    /// Position edits store zero for blank input right away.
    pub fn update_position(&mut self, index: usize, axis: Axis, raw: &str) {
        if let Some(point) = self.draft.positions_mut().get_mut(index) {
            point[axis.index()] = parse_entry(raw).unwrap_or(0.0);
            self.errors.clear_field(FormField::Position(index, axis));
        }
    }

    pub fn set_access_point_count(&mut self, count: usize) {
        self.draft.resize(count);
        self.errors.clear_where(|field| {
            matches!(
                field,
                FormField::AccessPointCount | FormField::ApArray(..) | FormField::Position(..)
            )
        });
    }

    /// Unparsable or negative counts resize to zero and fail validation later.
    /// Huge values saturate and are kept only as the count.
    pub fn set_access_point_count_input(&mut self, raw: &str) {
        let count = parse_entry(raw)
            .filter(|value| *value >= 0.0)
            .map(|value| value as usize)
            .unwrap_or(0);
        self.set_access_point_count(count);
    }

    pub fn add_access_point(&mut self) {
        self.set_access_point_count(self.draft.access_points().saturating_add(1));
    }

    pub fn remove_access_point(&mut self) {
        if self.draft.access_points() > 1 {
            self.set_access_point_count(self.draft.access_points() - 1);
        }
    }

    pub fn apply_preset(&mut self, field: PresetField, label: &str) -> CoreResult<PresetOutcome> {
        let preset = find_preset(field, label)?;
        if preset.is_custom() {
            return Ok(PresetOutcome::Custom);
        }

        let access_points = self.draft.access_points();
        if preset.values.len() != access_points {
            return Ok(PresetOutcome::LengthMismatch {
                preset: preset.values.len(),
                access_points,
            });
        }

        match (preset.values, ApArrayField::from_preset_field(field)) {
            (PresetValues::Positions(points), _) => {
                *self.draft.positions_mut() = points;
                self.errors
                    .clear_where(|f| matches!(f, FormField::Position(..)));
            }
            (PresetValues::Scalars(values), Some(array)) => {
                *self.draft.array_mut(array) = values.into_iter().map(Some).collect();
                self.errors
                    .clear_where(|f| matches!(f, FormField::ApArray(a, _) if *a == array));
            }
            (PresetValues::Scalars(_), None) => {
                return Err(CoreError::UnknownPreset(format!("{:?}/{}", field, label)));
            }
        }
        self.logger
            .debug(&format!("applied preset {:?}/{}", field, label));
        Ok(PresetOutcome::Applied)
    }

    /// Label of the preset the current values match, or "Custom".
    pub fn matching_preset(&self, field: PresetField) -> &'static str {
        match ApArrayField::from_preset_field(field) {
            Some(array) => match_scalars(field, &self.draft.array_or_zero(array)),
            None => match_positions(self.draft.positions()),
        }
    }

    pub fn apply_environment(&mut self, label: &str) -> CoreResult<()> {
        let environment = find_environment(label)
            .ok_or_else(|| CoreError::UnknownEnvironment(label.to_string()))?;
        self.draft
            .set_environment_type(Some(environment.label.to_string()));
        self.draft.set_scalar(
            ScalarField::PathLossExponent,
            Some(environment.path_loss_exponent),
        );
        self.errors
            .clear_field(FormField::Scalar(ScalarField::PathLossExponent));
        Ok(())
    }

    /// Normalizes, validates, and on success hands the record to `on_submit`.
    pub fn submit<F>(&mut self, on_submit: F) -> Result<(), ValidationErrors>
    where
        F: FnOnce(SimulationParameters),
    {
        self.errors = validate(&self.draft);
        if !self.errors.is_empty() {
            self.logger
                .warn(&format!("form rejected: {}", self.errors));
            return Err(self.errors.clone());
        }

        let params = self.draft.to_parameters();
        debug_assert!(params.is_consistent());
        on_submit(params);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::validation::MAX_ACCESS_POINTS;

    fn assert_shape(form: &FormCollector, expected: usize) {
        let params = form.draft().to_parameters();
        assert_eq!(params.number_of_access_points, expected);
        assert!(params.is_consistent(), "{:?}", params.mismatched_arrays());
    }

    #[test]
    fn add_and_remove_keep_arrays_aligned() {
        let mut form = FormCollector::default();
        form.add_access_point();
        assert_shape(&form, 4);
        assert_eq!(form.draft().array(ApArrayField::Frequencies)[3], Some(2.4e9));
        for _ in 0..10 {
            form.remove_access_point();
        }
        assert_shape(&form, 1);
    }

    #[test]
    fn presets_only_apply_when_lengths_match() {
        let mut form = FormCollector::default();
        assert_eq!(
            form.apply_preset(PresetField::Powers, "Mixed").unwrap(),
            PresetOutcome::Applied
        );
        assert_eq!(form.matching_preset(PresetField::Powers), "Mixed");
        assert_shape(&form, 3);

        form.add_access_point();
        let outcome = form.apply_preset(PresetField::Positions, "Line").unwrap();
        assert_eq!(
            outcome,
            PresetOutcome::LengthMismatch {
                preset: 3,
                access_points: 4
            }
        );
        assert_shape(&form, 4);
        assert_eq!(form.matching_preset(PresetField::Positions), "Custom");
    }

    #[test]
    fn custom_preset_is_a_no_op() {
        let mut form = FormCollector::default();
        let before = form.draft().clone();
        assert_eq!(
            form.apply_preset(PresetField::Frequencies, "Custom").unwrap(),
            PresetOutcome::Custom
        );
        assert_eq!(form.draft(), &before);
    }

    #[test]
    fn zero_nodes_blocks_submit() {
        let mut form = FormCollector::default();
        form.update_scalar(ScalarField::NumberOfNodes, "0");
        let mut called = false;
        let result = form.submit(|_| called = true);
        assert!(result.is_err());
        assert!(!called);
        assert!(form
            .errors()
            .contains(FormField::Scalar(ScalarField::NumberOfNodes)));
    }

    #[test]
    fn out_of_range_access_point_counts_block_submit() {
        for raw in ["11", "1e300", "99999999999"] {
            let mut form = FormCollector::default();
            form.set_access_point_count_input(raw);
            assert!(form.draft().access_points() > MAX_ACCESS_POINTS, "{}", raw);
            assert_eq!(form.draft().positions().len(), 3);
            assert_eq!(form.draft().array(ApArrayField::Beamwidths).len(), 3);

            let mut called = false;
            let errors = form.submit(|_| called = true).unwrap_err();
            assert!(!called);
            assert_eq!(
                errors.get(FormField::AccessPointCount),
                Some("must be between 1 and 10")
            );
        }
    }

    #[test]
    fn recovers_from_an_oversized_count() {
        let mut form = FormCollector::default();
        form.set_access_point_count_input("1e300");
        form.add_access_point();
        assert!(form.submit(|_| {}).is_err());

        form.set_access_point_count_input("4");
        assert!(form.errors().is_empty());
        assert_shape(&form, 4);
        assert!(form.submit(|_| {}).is_ok());
    }

    #[test]
    fn blank_entries_submit_as_zero() {
        let mut form = FormCollector::default();
        form.update_scalar(ScalarField::KDecay, "");
        form.update_array(ApArrayField::AntennaGains, 2, "");
        form.update_position(1, Axis::Y, "");
        let mut submitted = None;
        form.submit(|params| submitted = Some(params)).unwrap();
        let params = submitted.unwrap();
        assert_eq!(params.k_decay, 0.0);
        assert_eq!(params.antenna_gains, vec![0.0, 0.0, 0.0]);
        assert_eq!(params.ap_positions[1], [50.0, 0.0]);
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        let mut form = FormCollector::default();
        form.update_scalar(ScalarField::SimulationTime, "-1");
        assert!(form.submit(|_| {}).is_err());
        form.update_scalar(ScalarField::SimulationTime, "60");
        assert!(form.errors().is_empty());
        assert!(form.submit(|_| {}).is_ok());
    }

    #[test]
    fn environment_sets_path_loss_exponent() {
        let mut form = FormCollector::default();
        form.apply_environment("Dense urban / urban canyon").unwrap();
        let params = form.draft().to_parameters();
        assert_eq!(params.path_loss_exponent, 5.0);
        assert_eq!(
            params.environment_type.as_deref(),
            Some("Dense urban / urban canyon")
        );
        assert!(form.apply_environment("Mars").is_err());
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut form = FormCollector::default();
        let before = form.draft().clone();
        form.update_array(ApArrayField::TransmissionPowers, 7, "10");
        form.update_position(9, Axis::X, "10");
        assert_eq!(form.draft(), &before);
    }
}
