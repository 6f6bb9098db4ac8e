use crate::form::draft::FormDraft;
use crate::form::fields::{ApArrayField, FormField, ScalarField};
use std::collections::BTreeMap;
use std::fmt;

pub const MIN_NODES: f64 = 1.0;
pub const MAX_NODES: f64 = 10.0;
pub const MIN_ACCESS_POINTS: usize = 1;
pub const MAX_ACCESS_POINTS: usize = 10;

/// Field-level validation failures, ordered by field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: BTreeMap<FormField, String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FormField, &String)> {
        self.errors.iter()
    }

    pub(crate) fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub(crate) fn clear_field(&mut self, field: FormField) {
        self.errors.remove(&field);
    }

    pub(crate) fn clear_where(&mut self, predicate: impl Fn(&FormField) -> bool) {
        self.errors.retain(|field, _| !predicate(field));
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", rendered)
    }
}

fn is_integer(value: f64) -> bool {
    value.fract() == 0.0
}

/// Checks the normalized draft. Empty entries count as zero.
pub fn validate(draft: &FormDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    let nodes = draft.scalar_or_zero(ScalarField::NumberOfNodes);
    if !is_integer(nodes) || !(MIN_NODES..=MAX_NODES).contains(&nodes) {
        errors.insert(
            FormField::Scalar(ScalarField::NumberOfNodes),
            format!("must be a whole number between {} and {}", MIN_NODES, MAX_NODES),
        );
    }

    let access_points = draft.access_points();
    if !(MIN_ACCESS_POINTS..=MAX_ACCESS_POINTS).contains(&access_points) {
        errors.insert(
            FormField::AccessPointCount,
            format!(
                "must be between {} and {}",
                MIN_ACCESS_POINTS, MAX_ACCESS_POINTS
            ),
        );
    }

    let simulation_time = draft.scalar_or_zero(ScalarField::SimulationTime);
    if simulation_time <= 0.0 {
        errors.insert(
            FormField::Scalar(ScalarField::SimulationTime),
            "must be greater than zero",
        );
    }

    let time_step = draft.scalar_or_zero(ScalarField::TimeStep);
    if time_step <= 0.0 {
        errors.insert(
            FormField::Scalar(ScalarField::TimeStep),
            "must be greater than zero",
        );
    } else if simulation_time > 0.0 && time_step > simulation_time {
        errors.insert(
            FormField::Scalar(ScalarField::TimeStep),
            "must not exceed the simulation time",
        );
    }

    if draft.scalar_or_zero(ScalarField::Velocity) < 0.0 {
        errors.insert(
            FormField::Scalar(ScalarField::Velocity),
            "must not be negative",
        );
    }

    if draft.scalar_or_zero(ScalarField::DataSize) <= 0.0 {
        errors.insert(
            FormField::Scalar(ScalarField::DataSize),
            "must be greater than zero",
        );
    }

    let retries = draft.scalar_or_zero(ScalarField::MaxRetries);
    if retries < 0.0 || !is_integer(retries) {
        errors.insert(
            FormField::Scalar(ScalarField::MaxRetries),
            "must be a non-negative whole number",
        );
    }

    for field in [ApArrayField::Frequencies, ApArrayField::Bandwidths] {
        for (idx, value) in draft.array_or_zero(field).into_iter().enumerate() {
            if value <= 0.0 {
                errors.insert(FormField::ApArray(field, idx), "must be greater than zero");
            }
        }
    }

    for (idx, value) in draft
        .array_or_zero(ApArrayField::Beamwidths)
        .into_iter()
        .enumerate()
    {
        if value <= 0.0 || value > 360.0 {
            errors.insert(
                FormField::ApArray(ApArrayField::Beamwidths, idx),
                "must be within (0, 360] degrees",
            );
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_draft_is_valid() {
        assert!(validate(&FormDraft::default()).is_empty());
    }

    #[test]
    fn empty_time_step_normalizes_to_zero_and_fails() {
        let mut draft = FormDraft::default();
        draft.set_scalar(ScalarField::TimeStep, None);
        let errors = validate(&draft);
        assert!(errors.contains(FormField::Scalar(ScalarField::TimeStep)));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn fractional_node_count_is_rejected() {
        let mut draft = FormDraft::default();
        draft.set_scalar(ScalarField::NumberOfNodes, Some(2.5));
        assert!(validate(&draft).contains(FormField::Scalar(ScalarField::NumberOfNodes)));
    }

    #[test]
    fn beamwidth_bounds_are_checked_per_ap() {
        let mut draft = FormDraft::default();
        draft.array_mut(ApArrayField::Beamwidths)[1] = Some(400.0);
        let errors = validate(&draft);
        assert!(errors.contains(FormField::ApArray(ApArrayField::Beamwidths, 1)));
        assert!(!errors.contains(FormField::ApArray(ApArrayField::Beamwidths, 0)));
        assert!(errors.to_string().contains("beamwidths[1]"));
    }
}
