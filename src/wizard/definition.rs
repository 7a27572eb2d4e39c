/// Wizard flow definitions
///
/// A `WizardDefinition` is plain data: the ordered steps, which of them
/// may be skipped for which roles, and which roles bypass the flow
/// entirely with a redirect. The engine interprets it; nothing here has
/// behavior beyond index arithmetic.

use crate::roles::Role;
use crate::validate::FieldKind;
use std::collections::{BTreeMap, BTreeSet};

/// A single required field within a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub id: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(id: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

/// One screen of a wizard flow.
#[derive(Debug, Clone, Default)]
pub struct StepSpec {
    /// Short identifier used in logs and step indicators.
    pub name: &'static str,
    /// Fields that must be valid before leaving this step forward.
    /// A step with no fields always validates as passable.
    pub fields: Vec<FieldSpec>,
    /// Roles for which this step is bypassed without being shown.
    pub skippable_for: BTreeSet<Role>,
    /// Leaving this step forward triggers simulated asynchronous side
    /// effects (e.g. sending the reset mail); the engine stays in-flight
    /// until they settle.
    pub deferred: bool,
}

impl StepSpec {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    pub fn field(mut self, id: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec::new(id, kind));
        self
    }

    pub fn skippable_for(mut self, role: Role) -> Self {
        self.skippable_for.insert(role);
        self
    }

    pub fn deferred(mut self) -> Self {
        self.deferred = true;
        self
    }

    /// Whether this step is bypassed for the active role.
    pub fn skipped_for(&self, role: Option<Role>) -> bool {
        role.map(|r| self.skippable_for.contains(&r)).unwrap_or(false)
    }
}

/// An ordered wizard flow.
#[derive(Debug, Clone)]
pub struct WizardDefinition {
    flow_id: &'static str,
    steps: Vec<StepSpec>,
    redirect_roles: BTreeMap<Role, String>,
    completion_redirect: Option<String>,
}

impl WizardDefinition {
    pub fn new(flow_id: &'static str, steps: Vec<StepSpec>) -> Self {
        Self {
            flow_id,
            steps,
            redirect_roles: BTreeMap::new(),
            completion_redirect: None,
        }
    }

    /// Mark a role whose first forward interaction completes the flow
    /// immediately with a redirect instead of walking the steps.
    pub fn redirect_role(mut self, role: Role, target: impl Into<String>) -> Self {
        self.redirect_roles.insert(role, target.into());
        self
    }

    /// Navigation target signalled on normal completion.
    pub fn completion_redirect(mut self, target: impl Into<String>) -> Self {
        self.completion_redirect = Some(target.into());
        self
    }

    /// Stable identifier, used as the persistence key.
    pub fn flow_id(&self) -> &'static str {
        self.flow_id
    }

    pub fn steps(&self) -> &[StepSpec] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&StepSpec> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// The redirect target for a role that bypasses this flow, if any.
    pub fn redirect_for(&self, role: Option<Role>) -> Option<&str> {
        role.and_then(|r| self.redirect_roles.get(&r)).map(String::as_str)
    }

    pub fn completion_target(&self) -> Option<&str> {
        self.completion_redirect.as_deref()
    }

    /// Next step index moving forward from `from`, skipping steps the
    /// active role bypasses. `None` means the flow is finished.
    pub fn next_index(&self, from: usize, role: Option<Role>) -> Option<usize> {
        self.steps
            .iter()
            .enumerate()
            .skip(from + 1)
            .find(|(_, step)| !step.skipped_for(role))
            .map(|(i, _)| i)
    }

    /// Previous step index moving backward from `from`, skipping steps
    /// the active role bypasses. `None` means `from` is already at the
    /// floor.
    pub fn prev_index(&self, from: usize, role: Option<Role>) -> Option<usize> {
        self.steps
            .iter()
            .enumerate()
            .take(from)
            .rev()
            .find(|(_, step)| !step.skipped_for(role))
            .map(|(i, _)| i)
    }
}
