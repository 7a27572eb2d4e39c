/// Rendering contract
///
/// The engine never touches a view. A renderer translates step-index
/// changes into visibility and field failures into inline error marks;
/// the full failure set arrives at once, never one blocking alert per
/// field.

use crate::validate::FailureReason;
use crate::wizard::state::Direction;

pub trait StepRenderer {
    /// Make the given step the visible one. `direction` is an animation
    /// hint (slide left or right).
    fn show_step(&mut self, index: usize, direction: Direction);

    /// Mark one field invalid with its reason code.
    fn mark_field_invalid(&mut self, field_id: &str, reason: FailureReason);

    /// Remove any error mark from a field.
    fn clear_field_error(&mut self, field_id: &str);
}

/// Human-readable message for a failure reason.
pub fn reason_message(reason: FailureReason) -> &'static str {
    match reason {
        FailureReason::Empty => "This field is required",
        FailureReason::Format => "Doesn't look right, check the format",
        FailureReason::Mismatch => "Passwords do not match",
        FailureReason::TooShort => "Too short for the password policy",
    }
}

/// Plain console renderer used by the demo binary.
pub struct ConsoleRenderer {
    total_steps: usize,
}

impl ConsoleRenderer {
    pub fn new(total_steps: usize) -> Self {
        Self { total_steps }
    }
}

impl StepRenderer for ConsoleRenderer {
    fn show_step(&mut self, index: usize, direction: Direction) {
        let arrow = match direction {
            Direction::Forward => "→",
            Direction::Backward => "←",
        };
        let percent = (index + 1) * 100 / self.total_steps.max(1);
        println!(
            "\n{arrow} Step {} of {} ({percent}%)",
            index + 1,
            self.total_steps
        );
    }

    fn mark_field_invalid(&mut self, field_id: &str, reason: FailureReason) {
        println!("  ✗ {field_id}: {}", reason_message(reason));
    }

    fn clear_field_error(&mut self, _field_id: &str) {
        // Nothing sticky to clear on a scrolling console.
    }
}
