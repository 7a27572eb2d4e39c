/// Wizard engine
///
/// Interprets a `WizardDefinition` over an explicit `WizardState`:
/// validates the current step before any forward motion, allows
/// unconditional backward motion, applies skip and redirect rules for
/// the active role, and persists partial progress after every
/// transition so a reload can resume.

use crate::error::WizardError;
use crate::roles::Role;
use crate::store::ProgressStore;
use crate::validate::{check_field, FormValues, ValidationResult};
use crate::wizard::definition::WizardDefinition;
use crate::wizard::state::{Direction, WizardState};
use tracing::{debug, warn};

/// Outcome of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Landed on another step.
    Moved { step: usize, direction: Direction },
    /// Flow finished; persisted progress has been cleared. `redirect`
    /// names where the caller should navigate, when the flow has one.
    Completed { redirect: Option<String> },
    /// The current step failed validation; state is unchanged and every
    /// failing field is reported at once.
    Rejected(ValidationResult),
    /// Navigation hit a boundary (retreat at step 0); state unchanged.
    Blocked { reason: String },
}

/// Flow controller. Owns the definition, the active role and the store
/// handle; the `WizardState` is passed explicitly into every operation.
pub struct WizardEngine<S: ProgressStore> {
    definition: WizardDefinition,
    role: Option<Role>,
    store: S,
    in_flight: bool,
    degraded: bool,
}

impl<S: ProgressStore> WizardEngine<S> {
    pub fn new(definition: WizardDefinition, store: S) -> Self {
        Self {
            definition,
            role: None,
            store,
            in_flight: false,
            degraded: false,
        }
    }

    /// Set the active role, which drives skip and redirect rules.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn definition(&self) -> &WizardDefinition {
        &self.definition
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// True while a transition's simulated side effects are pending.
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// True once the store has failed and the engine fell back to
    /// in-memory-only state.
    pub fn persistence_degraded(&self) -> bool {
        self.degraded
    }

    /// Begin the flow: resume persisted progress when it exists and its
    /// step is still within bounds, otherwise start fresh at step 0.
    /// A store failure degrades to a fresh in-memory state.
    pub fn start(&mut self) -> WizardState {
        match self.store.load(self.definition.flow_id()) {
            Ok(Some(saved)) if saved.current_step() < self.definition.len() => {
                debug!(
                    flow = self.definition.flow_id(),
                    step = saved.current_step(),
                    "Resuming wizard from saved progress"
                );
                saved
            }
            Ok(Some(_)) => {
                debug!(
                    flow = self.definition.flow_id(),
                    "Saved progress out of bounds, starting fresh"
                );
                WizardState::new()
            }
            Ok(None) => WizardState::new(),
            Err(err) => {
                warn!(
                    flow = self.definition.flow_id(),
                    error = %err,
                    "Progress store unavailable, continuing in memory"
                );
                self.degraded = true;
                WizardState::new()
            }
        }
    }

    /// Validate one step against raw form values. Every required field
    /// is checked and every failure collected; a step with no fields
    /// always passes. Pure function over its inputs.
    pub fn validate_step(&self, step_index: usize, values: &FormValues) -> ValidationResult {
        let mut result = ValidationResult::passed();
        let Some(step) = self.definition.step(step_index) else {
            return result;
        };
        for field in &step.fields {
            let raw = values.get(&field.id).map(String::as_str).unwrap_or("");
            if let Some(reason) = check_field(&field.kind, raw, values) {
                result.record(&field.id, reason);
            }
        }
        result
    }

    /// Move forward one step, gated on validation.
    ///
    /// At the last step this signals completion instead of moving and
    /// clears persisted progress. Roles with a redirect rule complete on
    /// their first forward interaction regardless of form content.
    pub fn advance(
        &mut self,
        state: &mut WizardState,
        values: &FormValues,
    ) -> Result<Transition, WizardError> {
        if self.in_flight {
            return Err(WizardError::OperationInProgress);
        }

        if let Some(target) = self.definition.redirect_for(self.role) {
            let target = target.to_string();
            debug!(
                flow = self.definition.flow_id(),
                role = ?self.role,
                redirect = %target,
                "Role bypasses flow, completing with redirect"
            );
            self.clear_progress();
            return Ok(Transition::Completed {
                redirect: Some(target),
            });
        }

        let result = self.validate_step(state.current_step(), values);
        if !result.valid() {
            debug!(
                flow = self.definition.flow_id(),
                step = state.current_step(),
                failures = result.failures().len(),
                "Step validation failed"
            );
            return Ok(Transition::Rejected(result));
        }

        state.merge(values);
        let leaving_deferred = self
            .definition
            .step(state.current_step())
            .map(|s| s.deferred)
            .unwrap_or(false);

        match self.definition.next_index(state.current_step(), self.role) {
            Some(next) => {
                state.move_to(next, Direction::Forward);
                self.persist(state);
                if leaving_deferred {
                    self.in_flight = true;
                }
                debug!(
                    flow = self.definition.flow_id(),
                    step = next,
                    "Advanced to next step"
                );
                Ok(Transition::Moved {
                    step: next,
                    direction: Direction::Forward,
                })
            }
            None => {
                self.clear_progress();
                debug!(flow = self.definition.flow_id(), "Flow completed");
                Ok(Transition::Completed {
                    redirect: self.definition.completion_target().map(str::to_string),
                })
            }
        }
    }

    /// Move backward one step, skipping steps the active role bypasses.
    /// Never revalidates and never discards collected values; a no-op at
    /// step 0.
    pub fn retreat(&mut self, state: &mut WizardState) -> Result<Transition, WizardError> {
        if self.in_flight {
            return Err(WizardError::OperationInProgress);
        }

        match self.definition.prev_index(state.current_step(), self.role) {
            Some(prev) => {
                state.move_to(prev, Direction::Backward);
                self.persist(state);
                Ok(Transition::Moved {
                    step: prev,
                    direction: Direction::Backward,
                })
            }
            None => Ok(Transition::Blocked {
                reason: "Already at first step".to_string(),
            }),
        }
    }

    /// Navigate directly to a step (resume, deep link). Skipped steps
    /// are not validated; only forward `advance` gates on validation.
    pub fn jump_to(
        &mut self,
        state: &mut WizardState,
        target: usize,
    ) -> Result<Transition, WizardError> {
        if target >= self.definition.len() {
            return Err(WizardError::OutOfRange {
                target,
                len: self.definition.len(),
            });
        }
        if target == state.current_step() {
            return Ok(Transition::Moved {
                step: target,
                direction: state.direction(),
            });
        }

        let direction = if target > state.current_step() {
            Direction::Forward
        } else {
            Direction::Backward
        };
        state.move_to(target, direction);
        self.persist(state);
        Ok(Transition::Moved {
            step: target,
            direction,
        })
    }

    /// Clear persisted progress for this flow (completion or explicit
    /// restart).
    pub fn abandon(&mut self) {
        self.clear_progress();
    }

    /// Resolve the pending simulated side effects of the last
    /// transition, allowing navigation again.
    pub fn settle(&mut self) {
        if self.in_flight {
            debug!(flow = self.definition.flow_id(), "Pending transition settled");
            self.in_flight = false;
        }
    }

    fn persist(&mut self, state: &WizardState) {
        if let Err(err) = self.store.save(self.definition.flow_id(), state) {
            if !self.degraded {
                warn!(
                    flow = self.definition.flow_id(),
                    error = %err,
                    "Failed to persist progress, continuing in memory"
                );
            }
            self.degraded = true;
        }
    }

    fn clear_progress(&mut self) {
        if let Err(err) = self.store.clear(self.definition.flow_id()) {
            if !self.degraded {
                warn!(
                    flow = self.definition.flow_id(),
                    error = %err,
                    "Failed to clear persisted progress"
                );
            }
            self.degraded = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::MemoryStore;
    use crate::validate::{FailureReason, FieldKind, PasswordPolicy};
    use crate::wizard::definition::StepSpec;

    fn values(pairs: &[(&str, &str)]) -> FormValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn three_step_definition() -> WizardDefinition {
        WizardDefinition::new(
            "test-signup",
            vec![
                StepSpec::new("identity")
                    .field("firstName", FieldKind::RequiredText)
                    .field("lastName", FieldKind::RequiredText)
                    .field("email", FieldKind::Email),
                StepSpec::new("contact")
                    .field("phone", FieldKind::RequiredText)
                    .field("country", FieldKind::RequiredText),
                StepSpec::new("security")
                    .field("password", FieldKind::Password(PasswordPolicy::RELAXED))
                    .field(
                        "confirm",
                        FieldKind::ConfirmPassword {
                            pair: "password".to_string(),
                        },
                    ),
            ],
        )
    }

    fn engine() -> WizardEngine<MemoryStore> {
        WizardEngine::new(three_step_definition(), MemoryStore::new())
    }

    #[test]
    fn test_happy_path_first_step() {
        let mut engine = engine();
        let mut state = engine.start();

        let input = values(&[
            ("firstName", "Ada"),
            ("lastName", "Lovelace"),
            ("email", "ada@example.com"),
        ]);
        let transition = engine.advance(&mut state, &input).unwrap();

        assert_eq!(
            transition,
            Transition::Moved {
                step: 1,
                direction: Direction::Forward
            }
        );
        assert_eq!(state.current_step(), 1);
        assert_eq!(state.value("firstName"), Some("Ada"));
        assert_eq!(state.value("lastName"), Some("Lovelace"));
        assert_eq!(state.value("email"), Some("ada@example.com"));
    }

    #[test]
    fn test_invalid_step_reports_every_failure_at_once() {
        let mut engine = engine();
        let mut state = engine.start();

        let input = values(&[("firstName", "Ada"), ("lastName", ""), ("email", "nope")]);
        let transition = engine.advance(&mut state, &input).unwrap();

        let Transition::Rejected(result) = transition else {
            panic!("expected rejection, got {transition:?}");
        };
        assert_eq!(result.failures().len(), 2);
        assert_eq!(result.failures()["lastName"], FailureReason::Empty);
        assert_eq!(result.failures()["email"], FailureReason::Format);

        // State untouched.
        assert_eq!(state.current_step(), 0);
        assert!(state.collected().is_empty());
    }

    #[test]
    fn test_password_mismatch_scenario() {
        let engine = engine();
        let input = values(&[("password", "Abcdef12"), ("confirm", "Abcdef13")]);
        let result = engine.validate_step(2, &input);

        assert!(!result.valid());
        assert_eq!(result.failures().len(), 1);
        assert_eq!(result.failures()["confirm"], FailureReason::Mismatch);
    }

    #[test]
    fn test_retreat_keeps_collected_values() {
        let mut engine = engine();
        let mut state = engine.start();

        engine
            .advance(
                &mut state,
                &values(&[
                    ("firstName", "Ada"),
                    ("lastName", "Lovelace"),
                    ("email", "ada@example.com"),
                ]),
            )
            .unwrap();
        engine
            .advance(&mut state, &values(&[("phone", "0700"), ("country", "Nigeria")]))
            .unwrap();
        assert_eq!(state.current_step(), 2);

        let transition = engine.retreat(&mut state).unwrap();
        assert_eq!(
            transition,
            Transition::Moved {
                step: 1,
                direction: Direction::Backward
            }
        );
        assert_eq!(state.value("phone"), Some("0700"));
        assert_eq!(state.value("country"), Some("Nigeria"));

        // Moving forward again restores the position without re-entry.
        let transition = engine
            .advance(&mut state, &values(&[("phone", "0700"), ("country", "Nigeria")]))
            .unwrap();
        assert_eq!(
            transition,
            Transition::Moved {
                step: 2,
                direction: Direction::Forward
            }
        );
    }

    #[test]
    fn test_retreat_at_floor_is_a_no_op() {
        let mut engine = engine();
        let mut state = engine.start();

        let before = state.clone();
        let transition = engine.retreat(&mut state).unwrap();
        assert!(matches!(transition, Transition::Blocked { .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn test_completion_at_last_step_clears_progress() {
        let mut engine = engine();
        let mut state = engine.start();

        engine
            .advance(
                &mut state,
                &values(&[
                    ("firstName", "Ada"),
                    ("lastName", "Lovelace"),
                    ("email", "ada@example.com"),
                ]),
            )
            .unwrap();
        engine
            .advance(&mut state, &values(&[("phone", "0700"), ("country", "Nigeria")]))
            .unwrap();

        let transition = engine
            .advance(
                &mut state,
                &values(&[("password", "secret9"), ("confirm", "secret9")]),
            )
            .unwrap();
        assert_eq!(transition, Transition::Completed { redirect: None });

        // Progress cleared: starting over yields a fresh state.
        let resumed = engine.start();
        assert_eq!(resumed.current_step(), 0);
        assert!(resumed.collected().is_empty());
    }

    #[test]
    fn test_resume_from_saved_progress() {
        let store = MemoryStore::new();
        let mut engine = WizardEngine::new(three_step_definition(), store.clone());
        let mut state = engine.start();
        engine
            .advance(
                &mut state,
                &values(&[
                    ("firstName", "Ada"),
                    ("lastName", "Lovelace"),
                    ("email", "ada@example.com"),
                ]),
            )
            .unwrap();

        // Fresh engine over the same store picks up where we left off.
        let mut reloaded = WizardEngine::new(three_step_definition(), store);
        let resumed = reloaded.start();
        assert_eq!(resumed, state);
        assert_eq!(resumed.current_step(), 1);
        assert_eq!(resumed.value("email"), Some("ada@example.com"));
    }

    #[test]
    fn test_resume_ignores_out_of_bounds_progress() {
        let store = MemoryStore::new();
        {
            // Persist progress for a longer flow under the same id.
            let long = WizardDefinition::new(
                "test-signup",
                (0..6).map(|_| StepSpec::new("s")).collect(),
            );
            let mut engine = WizardEngine::new(long, store.clone());
            let mut state = engine.start();
            engine.jump_to(&mut state, 5).unwrap();
        }

        let mut engine = WizardEngine::new(three_step_definition(), store);
        let state = engine.start();
        assert_eq!(state.current_step(), 0);
    }

    #[test]
    fn test_jump_to_is_idempotent_at_current_step() {
        let mut engine = engine();
        let mut state = engine.start();
        engine.jump_to(&mut state, 2).unwrap();

        let before = state.clone();
        engine.jump_to(&mut state, 2).unwrap();
        assert_eq!(state, before);
    }

    #[test]
    fn test_jump_to_out_of_range_fails() {
        let mut engine = engine();
        let mut state = engine.start();

        let err = engine.jump_to(&mut state, 3).unwrap_err();
        assert!(matches!(err, WizardError::OutOfRange { target: 3, len: 3 }));
        assert_eq!(state.current_step(), 0);
    }

    #[test]
    fn test_jump_skips_no_validation() {
        let mut engine = engine();
        let mut state = engine.start();

        // Step 0 was never validated, jump lands on step 2 regardless.
        engine.jump_to(&mut state, 2).unwrap();
        assert_eq!(state.current_step(), 2);
        assert_eq!(state.direction(), Direction::Forward);
    }

    #[test]
    fn test_company_role_shortcut() {
        let definition = three_step_definition().redirect_role(Role::Company, "signupCompany");
        let mut engine =
            WizardEngine::new(definition, MemoryStore::new()).with_role(Role::Company);
        let mut state = engine.start();

        // First forward interaction completes immediately, form content
        // notwithstanding.
        let transition = engine.advance(&mut state, &FormValues::new()).unwrap();
        assert_eq!(
            transition,
            Transition::Completed {
                redirect: Some("signupCompany".to_string())
            }
        );
        assert_eq!(state.current_step(), 0);
    }

    #[test]
    fn test_role_skips_marked_steps() {
        let definition = WizardDefinition::new(
            "test-skip",
            vec![
                StepSpec::new("one"),
                StepSpec::new("two").skippable_for(Role::Driver),
                StepSpec::new("three"),
            ],
        );
        let mut engine =
            WizardEngine::new(definition, MemoryStore::new()).with_role(Role::Driver);
        let mut state = engine.start();

        let transition = engine.advance(&mut state, &FormValues::new()).unwrap();
        assert_eq!(
            transition,
            Transition::Moved {
                step: 2,
                direction: Direction::Forward
            }
        );

        let transition = engine.retreat(&mut state).unwrap();
        assert_eq!(
            transition,
            Transition::Moved {
                step: 0,
                direction: Direction::Backward
            }
        );
    }

    #[test]
    fn test_deferred_step_guards_double_submit() {
        let definition = WizardDefinition::new(
            "test-deferred",
            vec![
                StepSpec::new("request").deferred(),
                StepSpec::new("verify"),
                StepSpec::new("done"),
            ],
        );
        let mut engine = WizardEngine::new(definition, MemoryStore::new());
        let mut state = engine.start();

        let transition = engine.advance(&mut state, &FormValues::new()).unwrap();
        assert!(matches!(transition, Transition::Moved { step: 1, .. }));
        assert!(engine.in_flight());

        // A second activation before the side effects resolve is rejected.
        let err = engine.advance(&mut state, &FormValues::new()).unwrap_err();
        assert!(matches!(err, WizardError::OperationInProgress));
        let err = engine.retreat(&mut state).unwrap_err();
        assert!(matches!(err, WizardError::OperationInProgress));
        assert_eq!(state.current_step(), 1);

        engine.settle();
        assert!(!engine.in_flight());
        let transition = engine.advance(&mut state, &FormValues::new()).unwrap();
        assert!(matches!(transition, Transition::Moved { step: 2, .. }));
    }

    #[derive(Clone)]
    struct BrokenStore;

    impl ProgressStore for BrokenStore {
        fn save(&self, flow_id: &str, _state: &WizardState) -> Result<(), StoreError> {
            Err(StoreError::SaveFailed {
                flow_id: flow_id.to_string(),
                source: "storage disabled".into(),
            })
        }

        fn load(&self, flow_id: &str) -> Result<Option<WizardState>, StoreError> {
            Err(StoreError::LoadFailed {
                flow_id: flow_id.to_string(),
                source: "storage disabled".into(),
            })
        }

        fn clear(&self, flow_id: &str) -> Result<(), StoreError> {
            Err(StoreError::ClearFailed {
                flow_id: flow_id.to_string(),
                source: "storage disabled".into(),
            })
        }
    }

    #[test]
    fn test_broken_store_degrades_without_failing() {
        let mut engine = WizardEngine::new(three_step_definition(), BrokenStore);
        let mut state = engine.start();
        assert!(engine.persistence_degraded());
        assert_eq!(state.current_step(), 0);

        // Navigation keeps working on in-memory state.
        let transition = engine
            .advance(
                &mut state,
                &values(&[
                    ("firstName", "Ada"),
                    ("lastName", "Lovelace"),
                    ("email", "ada@example.com"),
                ]),
            )
            .unwrap();
        assert!(matches!(transition, Transition::Moved { step: 1, .. }));
    }

    #[test]
    fn test_abandon_clears_progress() {
        let store = MemoryStore::new();
        let mut engine = WizardEngine::new(three_step_definition(), store.clone());
        let mut state = engine.start();
        engine.jump_to(&mut state, 1).unwrap();

        engine.abandon();
        let mut fresh = WizardEngine::new(three_step_definition(), store);
        assert_eq!(fresh.start().current_step(), 0);
    }

    #[test]
    fn test_empty_step_always_passes() {
        let definition = WizardDefinition::new("test-empty", vec![StepSpec::new("only")]);
        let engine = WizardEngine::new(definition, MemoryStore::new());
        assert!(engine.validate_step(0, &FormValues::new()).valid());
    }
}
