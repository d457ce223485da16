//! Emergency wizard state machine

use super::form::{EmergencyField, EmergencyForm, EmergencyType, FieldUpdate};
use super::submission::{self, SubmissionOutcome};
use super::validation::{validate_step, ValidationError, WizardStep};
use crate::api::{EmergencyTicketRequest, Session, TicketApi, EMERGENCY_STATUS};
use crate::state::TicketPriority;

/// Where the wizard currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    /// Editing one of the steps
    Step(WizardStep),
    /// Every step is valid and the user must confirm before anything is sent
    ConfirmGate { in_flight: bool },
    /// The primary create succeeded
    Submitted { ticket_id: i64 },
}

impl Default for WizardState {
    fn default() -> Self {
        Self::Step(WizardStep::Details)
    }
}

/// Synchronous wizard actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    Update(FieldUpdate),
    Advance,
    Retreat,
    CancelConfirmation,
}

/// Drives the emergency form across its steps
#[derive(Debug, Clone, Default)]
pub struct WizardController {
    form: EmergencyForm,
    state: WizardState,
    error: Option<String>,
    focus: usize,
    /// Whether the confirm button (rather than cancel) is highlighted in the gate
    confirm_highlighted: bool,
}

impl WizardController {
    pub fn form(&self) -> &EmergencyForm {
        &self.form
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    /// Inline error for the current step, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The step shown on screen. The gate and the submitted state sit on the last step.
    pub fn step(&self) -> WizardStep {
        match self.state {
            WizardState::Step(step) => step,
            WizardState::ConfirmGate { .. } | WizardState::Submitted { .. } => WizardStep::Review,
        }
    }

    pub fn is_confirming(&self) -> bool {
        matches!(self.state, WizardState::ConfirmGate { .. })
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, WizardState::ConfirmGate { in_flight: true })
    }

    /// Merge one field into the form. Never validates.
    pub fn update_field(&mut self, update: FieldUpdate) {
        self.form.apply(update);
    }

    /// Validate the fields owned by the current step
    pub fn validate_current_step(&self) -> Result<(), ValidationError> {
        validate_step(&self.form, self.step())
    }

    /// Move forward one step, or open the confirmation gate from the last step
    pub fn advance(&mut self) {
        let WizardState::Step(step) = self.state else {
            return;
        };
        if let Err(e) = self.validate_current_step() {
            self.error = Some(e.to_string());
            return;
        }
        self.error = None;
        match step.next() {
            Some(next) => {
                self.state = WizardState::Step(next);
                self.focus = 0;
            }
            None => {
                self.state = WizardState::ConfirmGate { in_flight: false };
                self.confirm_highlighted = false;
            }
        }
    }

    /// Move back one step without validating
    pub fn retreat(&mut self) {
        let WizardState::Step(step) = self.state else {
            return;
        };
        if let Some(prev) = step.prev() {
            self.state = WizardState::Step(prev);
            self.focus = 0;
        }
        self.error = None;
    }

    /// Close the gate and return to the last step, unless a submission is pending
    pub fn cancel_confirmation(&mut self) {
        if self.state == (WizardState::ConfirmGate { in_flight: false }) {
            self.state = WizardState::Step(WizardStep::Review);
        }
    }

    /// Mark a submission as in flight and build its request.
    ///
    /// Returns `None` unless the gate is open and idle, so at most one
    /// submission can be pending.
    pub fn begin_submission(&mut self) -> Option<EmergencyTicketRequest> {
        if self.state != (WizardState::ConfirmGate { in_flight: false }) {
            return None;
        }
        self.state = WizardState::ConfirmGate { in_flight: true };
        self.error = None;

        let form = &self.form;
        Some(EmergencyTicketRequest {
            title: form.title.clone(),
            description: form.description.clone(),
            location: form.location.clone(),
            contact_number: form.contact_number.clone(),
            emergency_type: form.emergency_type,
            immediate_action: form.immediate_action,
            notify_management: form.notify_management,
            notify_security: form.notify_security,
            priority: TicketPriority::Emergency,
            status: EMERGENCY_STATUS,
        })
    }

    /// Apply the outcome of the pending submission.
    ///
    /// Returns the created ticket id to navigate to. On failure the gate
    /// closes on the last step with the form left as entered.
    pub fn finish_submission(&mut self, outcome: &SubmissionOutcome) -> Option<i64> {
        if !self.is_in_flight() {
            tracing::warn!("Ignoring submission outcome with nothing in flight");
            return None;
        }
        match outcome {
            SubmissionOutcome::Created { ticket_id } => {
                self.form = EmergencyForm::default();
                self.state = WizardState::Submitted {
                    ticket_id: *ticket_id,
                };
                self.focus = 0;
                self.error = None;
                Some(*ticket_id)
            }
            SubmissionOutcome::Failed { message } => {
                self.state = WizardState::Step(WizardStep::Review);
                self.error = Some(message.clone());
                None
            }
        }
    }

    /// Submit from the gate and wait for the outcome.
    ///
    /// This is the in-place entry point. `App` runs the same three stages
    /// itself (`begin_submission`, [`submission::submit`] on a spawned task,
    /// then `finish_submission` when the event arrives) so the UI keeps
    /// drawing while the request is out; only tests drive this method.
    #[allow(dead_code)]
    pub async fn confirm_and_submit(
        &mut self,
        api: &dyn TicketApi,
        session: &Session,
    ) -> Option<i64> {
        let request = self.begin_submission()?;
        let outcome = submission::submit(api, session, &request).await;
        self.finish_submission(&outcome)
    }

    /// Reducer entry point for the synchronous actions
    pub fn apply(&mut self, action: WizardAction) {
        match action {
            WizardAction::Update(update) => self.update_field(update),
            WizardAction::Advance => self.advance(),
            WizardAction::Retreat => self.retreat(),
            WizardAction::CancelConfirmation => self.cancel_confirmation(),
        }
    }

    // Focus and keyboard editing

    pub fn focused_field(&self) -> Option<EmergencyField> {
        match self.state {
            WizardState::Step(step) => step.fields().get(self.focus).copied(),
            _ => None,
        }
    }

    pub fn focus_next(&mut self) {
        let count = self.step().fields().len();
        self.focus = (self.focus + 1) % count;
    }

    pub fn focus_prev(&mut self) {
        let count = self.step().fields().len();
        self.focus = (self.focus + count - 1) % count;
    }

    /// Append a character to the focused text field
    pub fn type_char(&mut self, c: char) {
        let Some(field) = self.focused_field() else {
            return;
        };
        if let Some(current) = field.text(&self.form) {
            let mut value = current.to_string();
            value.push(c);
            if let Some(update) = field.with_text(value) {
                self.update_field(update);
            }
        }
    }

    /// Remove the last character of the focused text field
    pub fn backspace(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };
        if let Some(current) = field.text(&self.form) {
            let mut value = current.to_string();
            value.pop();
            if let Some(update) = field.with_text(value) {
                self.update_field(update);
            }
        }
    }

    /// Flip the focused toggle or cycle the emergency type
    pub fn toggle_focused(&mut self, forward: bool) {
        match self.focused_field() {
            Some(EmergencyField::EmergencyType) => {
                let current = self.form.emergency_type.unwrap_or_default();
                let next = if forward { current.next() } else { current.prev() };
                self.update_field(FieldUpdate::EmergencyType(Some(next)));
            }
            Some(field) => {
                if let Some(update) = field.toggled(&self.form) {
                    self.update_field(update);
                }
            }
            None => {}
        }
    }

    /// Select an emergency type directly
    pub fn select_type(&mut self, emergency_type: EmergencyType) {
        self.update_field(FieldUpdate::EmergencyType(Some(emergency_type)));
    }

    pub fn confirm_highlighted(&self) -> bool {
        self.confirm_highlighted
    }

    pub fn toggle_confirm_highlight(&mut self) {
        if !self.is_in_flight() {
            self.confirm_highlighted = !self.confirm_highlighted;
        }
    }
}
