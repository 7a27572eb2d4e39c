use thiserror::Error;

/// Library-level errors using thiserror for structured error handling.
///
/// These errors represent contract violations and persistence failures.
/// Validation failures are deliberately NOT errors: they are ordinary
/// return values (see `ValidationResult`) so callers can surface every
/// failing field at once instead of unwinding on the first one.

#[derive(Error, Debug)]
pub enum WizardError {
    /// A jump target lies outside the step sequence. This is a caller
    /// contract bug, not a user-facing condition.
    #[error("Step index {target} is out of range (flow has {len} steps)")]
    OutOfRange { target: usize, len: usize },

    /// A transition was requested while a prior one is still settling.
    /// Callers should ignore the duplicate (e.g. keep the triggering
    /// control disabled) rather than show the user an error.
    #[error("A transition is already in progress for this flow")]
    OperationInProgress,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to save wizard progress for flow '{flow_id}'")]
    SaveFailed {
        flow_id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to load wizard progress for flow '{flow_id}'")]
    LoadFailed {
        flow_id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to clear wizard progress for flow '{flow_id}'")]
    ClearFailed {
        flow_id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("No writable storage location available")]
    Unavailable,
}
