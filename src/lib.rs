//! RideFlow — the multi-step form core of a ride-booking client.
//!
//! Signup, company signup and password reset are all the same shape: an
//! ordered sequence of screens, each gating forward motion on its own
//! validation, with partial progress surviving a reload. This crate
//! implements that shape once as an explicit state machine instead of
//! page-by-page class toggling, and ships the brand's three production
//! flow definitions on top of it.

pub mod error;
pub mod flows;
pub mod otp;
pub mod renderer;
pub mod roles;
pub mod store;
pub mod validate;
pub mod wizard;

pub use error::{StoreError, WizardError};
pub use otp::OtpCode;
pub use renderer::StepRenderer;
pub use roles::Role;
pub use store::{JsonFileStore, MemoryStore, ProgressStore};
pub use validate::{FailureReason, FieldKind, FormValues, PasswordPolicy, ValidationResult};
pub use wizard::{Direction, StepSpec, Transition, WizardDefinition, WizardEngine, WizardState};
