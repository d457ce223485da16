//! Step boundary validation

use super::form::{EmergencyField, EmergencyForm};
use thiserror::Error;

/// Steps of the emergency wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    #[default]
    Details,
    LocationContact,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [
        WizardStep::Details,
        WizardStep::LocationContact,
        WizardStep::Review,
    ];

    pub fn index(&self) -> usize {
        match self {
            Self::Details => 0,
            Self::LocationContact => 1,
            Self::Review => 2,
        }
    }

    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Details => Some(Self::LocationContact),
            Self::LocationContact => Some(Self::Review),
            Self::Review => None,
        }
    }

    pub fn prev(&self) -> Option<Self> {
        match self {
            Self::Details => None,
            Self::LocationContact => Some(Self::Details),
            Self::Review => Some(Self::LocationContact),
        }
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Details => "Emergency Details",
            Self::LocationContact => "Location & Contact",
            Self::Review => "Confirmation",
        }
    }

    /// Fields edited on this step, in focus order
    pub fn fields(&self) -> &'static [EmergencyField] {
        match self {
            Self::Details => &[
                EmergencyField::Title,
                EmergencyField::Description,
                EmergencyField::EmergencyType,
            ],
            Self::LocationContact => &[EmergencyField::Location, EmergencyField::ContactNumber],
            Self::Review => &[
                EmergencyField::ImmediateAction,
                EmergencyField::NotifyManagement,
                EmergencyField::NotifySecurity,
            ],
        }
    }
}

/// Why a step blocks advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields")]
    MissingDetails,
    #[error("Location and contact number are required")]
    MissingLocationOrContact,
    #[error("Please enter a valid 10-digit phone number")]
    InvalidContactNumber,
}

/// Number of digits required in a contact number
pub const CONTACT_DIGITS: usize = 10;

/// A contact number is valid when it holds exactly ten digits once everything
/// else is stripped
pub fn is_valid_contact_number(value: &str) -> bool {
    value.chars().filter(|c| c.is_ascii_digit()).count() == CONTACT_DIGITS
}

/// Validate the fields owned by `step`
pub fn validate_step(form: &EmergencyForm, step: WizardStep) -> Result<(), ValidationError> {
    match step {
        WizardStep::Details => {
            if form.title.trim().is_empty()
                || form.description.trim().is_empty()
                || form.emergency_type.is_none()
            {
                return Err(ValidationError::MissingDetails);
            }
        }
        WizardStep::LocationContact => {
            if form.location.trim().is_empty() || form.contact_number.trim().is_empty() {
                return Err(ValidationError::MissingLocationOrContact);
            }
            if !is_valid_contact_number(&form.contact_number) {
                return Err(ValidationError::InvalidContactNumber);
            }
        }
        WizardStep::Review => {}
    }
    Ok(())
}
