pub mod collector;
pub mod draft;
pub mod fields;
pub mod presets;
pub mod validation;

pub use collector::{FormCollector, PresetOutcome};
pub use draft::FormDraft;
pub use fields::{ApArrayField, Axis, FormField, ScalarField};
pub use presets::{Preset, PresetField, PresetValues, CUSTOM_LABEL, PRESET_TOLERANCE};
pub use validation::{ValidationErrors, MAX_ACCESS_POINTS, MAX_NODES};
