//! Emergency ticket wizard
//!
//! The form is split across three steps, each validated before the user can
//! move on. Completing the last step opens a confirmation gate; only an
//! explicit confirmation sends the ticket.

mod controller;
mod form;
mod submission;
mod validation;

pub use controller::{WizardAction, WizardController, WizardState};
pub use form::{EmergencyField, EmergencyForm, EmergencyType, FieldUpdate};
pub use submission::{submit, SubmissionOutcome, SUBMISSION_FAILED_MESSAGE};
pub use validation::{is_valid_contact_number, validate_step, ValidationError, WizardStep};
