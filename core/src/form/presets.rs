use crate::prelude::{CoreError, CoreResult};

/// Two arrays whose elements differ by less than this are considered equal
/// when detecting which preset the current draft matches.
pub const PRESET_TOLERANCE: f64 = 0.001;

pub const CUSTOM_LABEL: &str = "Custom";

/// Per-AP array fields that accept presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetField {
    Positions,
    Powers,
    Frequencies,
    Bandwidths,
    AntennaGains,
    Beamwidths,
}

impl PresetField {
    pub const ALL: [PresetField; 6] = [
        PresetField::Positions,
        PresetField::Powers,
        PresetField::Frequencies,
        PresetField::Bandwidths,
        PresetField::AntennaGains,
        PresetField::Beamwidths,
    ];

    pub fn title(self) -> &'static str {
        match self {
            PresetField::Positions => "AP Positions Preset",
            PresetField::Powers => "AP Power Preset",
            PresetField::Frequencies => "AP Frequency Preset",
            PresetField::Bandwidths => "AP Bandwidth Preset",
            PresetField::AntennaGains => "AP Antenna Gain Preset",
            PresetField::Beamwidths => "AP Beamwidth Preset",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "positions" | "appositions" => Some(PresetField::Positions),
            "powers" | "transmissionpowers" => Some(PresetField::Powers),
            "frequencies" | "freqs" => Some(PresetField::Frequencies),
            "bandwidths" => Some(PresetField::Bandwidths),
            "gains" | "antennagains" => Some(PresetField::AntennaGains),
            "beamwidths" => Some(PresetField::Beamwidths),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PresetValues {
    Scalars(Vec<f64>),
    Positions(Vec<[f64; 2]>),
}

impl PresetValues {
    pub fn len(&self) -> usize {
        match self {
            PresetValues::Scalars(values) => values.len(),
            PresetValues::Positions(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub label: &'static str,
    pub values: PresetValues,
}

impl Preset {
    fn scalars(label: &'static str, values: &[f64]) -> Self {
        Self {
            label,
            values: PresetValues::Scalars(values.to_vec()),
        }
    }

    fn positions(label: &'static str, values: &[[f64; 2]]) -> Self {
        Self {
            label,
            values: PresetValues::Positions(values.to_vec()),
        }
    }

    pub fn is_custom(&self) -> bool {
        self.label == CUSTOM_LABEL
    }
}

/// Preset catalogue for a field, "Custom" last.
pub fn presets_for(field: PresetField) -> Vec<Preset> {
    match field {
        PresetField::Positions => vec![
            Preset::positions("Triangle", &[[0.0, 0.0], [50.0, 0.0], [0.0, 50.0]]),
            Preset::positions("Line", &[[0.0, 0.0], [25.0, 0.0], [50.0, 0.0]]),
            Preset::positions(CUSTOM_LABEL, &[]),
        ],
        PresetField::Powers => vec![
            Preset::scalars("All 23 dBm", &[23.0, 23.0, 23.0]),
            Preset::scalars("Mixed", &[20.0, 23.0, 25.0]),
            Preset::scalars(CUSTOM_LABEL, &[]),
        ],
        PresetField::Frequencies => vec![
            Preset::scalars("All 2.4 GHz", &[2.4e9, 2.4e9, 2.4e9]),
            Preset::scalars("Mixed", &[2.4e9, 2.42e9, 2.44e9]),
            Preset::scalars(CUSTOM_LABEL, &[]),
        ],
        PresetField::Bandwidths => vec![
            Preset::scalars("All 20 MHz", &[20_000_000.0, 20_000_000.0, 20_000_000.0]),
            Preset::scalars("Mixed", &[20_000_000.0, 40_000_000.0, 20_000_000.0]),
            Preset::scalars(CUSTOM_LABEL, &[]),
        ],
        PresetField::AntennaGains => vec![
            Preset::scalars("All 0 dBi", &[0.0, 0.0, 0.0]),
            Preset::scalars(CUSTOM_LABEL, &[]),
        ],
        PresetField::Beamwidths => vec![
            Preset::scalars("All 360°", &[360.0, 360.0, 360.0]),
            Preset::scalars(CUSTOM_LABEL, &[]),
        ],
    }
}

pub fn find_preset(field: PresetField, label: &str) -> CoreResult<Preset> {
    presets_for(field)
        .into_iter()
        .find(|preset| preset.label == label)
        .ok_or_else(|| CoreError::UnknownPreset(format!("{:?}/{}", field, label)))
}

fn approx_eq(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| (x - y).abs() < PRESET_TOLERANCE)
}

/// Label of the first non-custom preset equal to `current`, or "Custom".
pub fn match_scalars(field: PresetField, current: &[f64]) -> &'static str {
    presets_for(field)
        .into_iter()
        .filter(|preset| !preset.is_custom())
        .find(|preset| match &preset.values {
            PresetValues::Scalars(values) => approx_eq(values, current),
            PresetValues::Positions(_) => false,
        })
        .map(|preset| preset.label)
        .unwrap_or(CUSTOM_LABEL)
}

pub fn match_positions(current: &[[f64; 2]]) -> &'static str {
    let flat = |points: &[[f64; 2]]| points.iter().flatten().copied().collect::<Vec<_>>();
    let current = flat(current);
    presets_for(PresetField::Positions)
        .into_iter()
        .filter(|preset| !preset.is_custom())
        .find(|preset| match &preset.values {
            PresetValues::Positions(values) => approx_eq(&flat(values), &current),
            PresetValues::Scalars(_) => false,
        })
        .map(|preset| preset.label)
        .unwrap_or(CUSTOM_LABEL)
}
