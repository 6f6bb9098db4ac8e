use netvisorcore::form::{ApArrayField, Axis, FormDraft, FormField, ScalarField};
use std::collections::BTreeMap;

/// Raw text of every form input, so partially typed values ("1.", "-")
/// survive a redraw while the draft holds the parsed numbers.
#[derive(Debug, Default)]
pub struct InputBuffer {
    raw: BTreeMap<FormField, String>,
}

fn show(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl InputBuffer {
    pub fn from_draft(draft: &FormDraft) -> Self {
        let mut buffer = Self::default();
        buffer.sync(draft);
        buffer
    }

    /// Rebuilds every entry from `draft`.
    pub fn sync(&mut self, draft: &FormDraft) {
        self.raw.clear();
        for field in ScalarField::ALL {
            self.raw
                .insert(FormField::Scalar(field), show(draft.scalar(field)));
        }
        self.raw.insert(
            FormField::AccessPointCount,
            draft.access_points().to_string(),
        );
        self.sync_access_points(draft);
    }

    /// Rebuilds the per-AP entries, keeping scalar and count text.
    pub fn sync_access_points(&mut self, draft: &FormDraft) {
        self.raw
            .retain(|field, _| matches!(field, FormField::Scalar(_) | FormField::AccessPointCount));
        for array in ApArrayField::ALL {
            for (index, value) in draft.array(array).iter().enumerate() {
                self.raw
                    .insert(FormField::ApArray(array, index), show(*value));
            }
        }
        for (index, [x, y]) in draft.positions().iter().enumerate() {
            self.raw
                .insert(FormField::Position(index, Axis::X), x.to_string());
            self.raw
                .insert(FormField::Position(index, Axis::Y), y.to_string());
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        self.raw.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: FormField, value: String) {
        self.raw.insert(field, value);
    }
}
