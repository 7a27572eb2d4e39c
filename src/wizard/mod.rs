/// Multi-step wizard core
///
/// Drives a user through an ordered sequence of form steps, gating
/// forward motion on validation while allowing unconditional backward
/// motion, conditional step-skipping and resume after reload.
///
/// ## Architecture
///
/// ```text
/// WizardEngine<S: ProgressStore>
///   ├── WizardDefinition (ordered StepSpecs, skip and redirect rules)
///   ├── WizardState (current step, collected values, direction)
///   └── Transitions (advance, retreat, jump_to, abandon, settle)
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// use rideflow::flows;
/// use rideflow::store::MemoryStore;
/// use rideflow::validate::PasswordPolicy;
/// use rideflow::wizard::{Transition, WizardEngine};
///
/// let mut engine = WizardEngine::new(
///     flows::signup(PasswordPolicy::RELAXED),
///     MemoryStore::new(),
/// );
/// let mut state = engine.start();
///
/// match engine.advance(&mut state, &form_values)? {
///     Transition::Moved { step, .. } => renderer.show_step(step, state.direction()),
///     Transition::Completed { redirect } => { /* navigate away */ }
///     Transition::Rejected(result) => {
///         for (field, reason) in result.failures() {
///             renderer.mark_field_invalid(field, *reason);
///         }
///     }
///     Transition::Blocked { .. } => {}
/// }
/// ```
///
/// The engine owns no view concerns: a `StepRenderer` translates step
/// indices into visibility, and a `ProgressStore` persists partial
/// progress so a reload resumes where the user left off.

pub mod definition;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use definition::{FieldSpec, StepSpec, WizardDefinition};
pub use engine::{Transition, WizardEngine};
pub use state::{Direction, WizardState};
