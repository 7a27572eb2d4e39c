/// Wizard state
///
/// The single value that tracks a user's progress through a flow. The
/// source pages kept this implicit in CSS class membership and a handful
/// of module-level bindings; here it is one explicit struct that every
/// engine operation takes and returns, and that round-trips through the
/// progress store unchanged.

use crate::validate::FormValues;
use serde::{Deserialize, Serialize};

/// Last transition direction. A rendering hint for slide animations
/// only; validation never depends on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    current_step: usize,
    collected: FormValues,
    direction: Direction,
}

impl WizardState {
    /// Fresh state at step 0 with nothing collected.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Everything the user has entered so far, across all steps.
    pub fn collected(&self) -> &FormValues {
        &self.collected
    }

    pub fn value(&self, field_id: &str) -> Option<&str> {
        self.collected.get(field_id).map(String::as_str)
    }

    pub(crate) fn move_to(&mut self, step: usize, direction: Direction) {
        self.current_step = step;
        self.direction = direction;
    }

    /// Fold validated form values into the collected set. New values
    /// override old ones for the same field id; nothing is ever removed,
    /// so backward motion cannot lose data entered in later steps.
    pub(crate) fn merge(&mut self, values: &FormValues) {
        for (id, value) in values {
            self.collected.insert(id.clone(), value.clone());
        }
    }
}
