use crate::form::presets::PresetField;
use std::fmt;

/// Scalar inputs of the parameter form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarField {
    SimulationTime,
    TimeStep,
    NumberOfNodes,
    Velocity,
    PathLossExponent,
    DataSize,
    K0Db,
    KDecay,
    ShadowSigmaDb,
    MaxRetries,
}

impl ScalarField {
    pub const ALL: [ScalarField; 10] = [
        ScalarField::SimulationTime,
        ScalarField::TimeStep,
        ScalarField::NumberOfNodes,
        ScalarField::Velocity,
        ScalarField::PathLossExponent,
        ScalarField::DataSize,
        ScalarField::K0Db,
        ScalarField::KDecay,
        ScalarField::ShadowSigmaDb,
        ScalarField::MaxRetries,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            ScalarField::SimulationTime => "simulationTime",
            ScalarField::TimeStep => "timeStep",
            ScalarField::NumberOfNodes => "numberOfNodes",
            ScalarField::Velocity => "velocity",
            ScalarField::PathLossExponent => "pathLossExponent",
            ScalarField::DataSize => "dataSize",
            ScalarField::K0Db => "K0dB",
            ScalarField::KDecay => "KDecay",
            ScalarField::ShadowSigmaDb => "shadowSigmaDB",
            ScalarField::MaxRetries => "maxRetries",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScalarField::SimulationTime => "Simulation Time (s)",
            ScalarField::TimeStep => "Time Step (s)",
            ScalarField::NumberOfNodes => "Number of Nodes",
            ScalarField::Velocity => "Velocity (m/s)",
            ScalarField::PathLossExponent => "Path Loss Exponent",
            ScalarField::DataSize => "Data Size",
            ScalarField::K0Db => "K0 (dB)",
            ScalarField::KDecay => "K Decay",
            ScalarField::ShadowSigmaDb => "Shadow Sigma (dB)",
            ScalarField::MaxRetries => "Max Retries",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.wire_name() == name)
    }
}

/// Per-AP scalar arrays of the parameter form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ApArrayField {
    TransmissionPowers,
    Frequencies,
    Bandwidths,
    AntennaGains,
    Beamwidths,
}

impl ApArrayField {
    pub const ALL: [ApArrayField; 5] = [
        ApArrayField::TransmissionPowers,
        ApArrayField::Frequencies,
        ApArrayField::Bandwidths,
        ApArrayField::AntennaGains,
        ApArrayField::Beamwidths,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            ApArrayField::TransmissionPowers => "transmissionPowers",
            ApArrayField::Frequencies => "frequencies",
            ApArrayField::Bandwidths => "bandwidths",
            ApArrayField::AntennaGains => "antennaGains",
            ApArrayField::Beamwidths => "beamwidths",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ApArrayField::TransmissionPowers => "Power (dBm)",
            ApArrayField::Frequencies => "Freq (Hz)",
            ApArrayField::Bandwidths => "Bandwidth (Hz)",
            ApArrayField::AntennaGains => "Antenna Gain (dBi)",
            ApArrayField::Beamwidths => "Beamwidth (deg)",
        }
    }

    pub fn preset_field(self) -> PresetField {
        match self {
            ApArrayField::TransmissionPowers => PresetField::Powers,
            ApArrayField::Frequencies => PresetField::Frequencies,
            ApArrayField::Bandwidths => PresetField::Bandwidths,
            ApArrayField::AntennaGains => PresetField::AntennaGains,
            ApArrayField::Beamwidths => PresetField::Beamwidths,
        }
    }

    pub fn from_preset_field(field: PresetField) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|array| array.preset_field() == field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

/// Addressable input of the form, used to key validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormField {
    Scalar(ScalarField),
    AccessPointCount,
    ApArray(ApArrayField, usize),
    Position(usize, Axis),
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormField::Scalar(field) => write!(f, "{}", field.wire_name()),
            FormField::AccessPointCount => write!(f, "numberOfAccessPoints"),
            FormField::ApArray(field, idx) => write!(f, "{}[{}]", field.wire_name(), idx),
            FormField::Position(idx, axis) => write!(f, "apPositions[{}][{}]", idx, axis.index()),
        }
    }
}
