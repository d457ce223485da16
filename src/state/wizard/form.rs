//! Emergency ticket form data

use serde::{Deserialize, Serialize};

/// Category of an emergency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmergencyType {
    #[default]
    Maintenance,
    Security,
    Fire,
    Water,
    Electrical,
}

impl EmergencyType {
    pub const ALL: [EmergencyType; 5] = [
        EmergencyType::Maintenance,
        EmergencyType::Security,
        EmergencyType::Fire,
        EmergencyType::Water,
        EmergencyType::Electrical,
    ];

    pub fn next(&self) -> Self {
        match self {
            Self::Maintenance => Self::Security,
            Self::Security => Self::Fire,
            Self::Fire => Self::Water,
            Self::Water => Self::Electrical,
            Self::Electrical => Self::Maintenance,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Self::Maintenance => Self::Electrical,
            Self::Security => Self::Maintenance,
            Self::Fire => Self::Security,
            Self::Water => Self::Fire,
            Self::Electrical => Self::Water,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Maintenance => "Maintenance Emergency",
            Self::Security => "Security Issue",
            Self::Fire => "Fire Related",
            Self::Water => "Water/Flooding",
            Self::Electrical => "Electrical Issue",
        }
    }
}

/// Everything the user enters across the wizard steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmergencyForm {
    pub title: String,
    pub description: String,
    pub location: String,
    pub contact_number: String,
    pub emergency_type: Option<EmergencyType>,
    pub immediate_action: bool,
    pub notify_management: bool,
    pub notify_security: bool,
}

impl Default for EmergencyForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            location: String::new(),
            contact_number: String::new(),
            emergency_type: Some(EmergencyType::default()),
            immediate_action: false,
            notify_management: true,
            notify_security: false,
        }
    }
}

/// A single field edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Title(String),
    Description(String),
    Location(String),
    ContactNumber(String),
    EmergencyType(Option<EmergencyType>),
    ImmediateAction(bool),
    NotifyManagement(bool),
    NotifySecurity(bool),
}

impl EmergencyForm {
    /// Merge one field into the form
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Title(v) => self.title = v,
            FieldUpdate::Description(v) => self.description = v,
            FieldUpdate::Location(v) => self.location = v,
            FieldUpdate::ContactNumber(v) => self.contact_number = v,
            FieldUpdate::EmergencyType(v) => self.emergency_type = v,
            FieldUpdate::ImmediateAction(v) => self.immediate_action = v,
            FieldUpdate::NotifyManagement(v) => self.notify_management = v,
            FieldUpdate::NotifySecurity(v) => self.notify_security = v,
        }
    }

    /// Whether any follow-up notification was requested
    pub fn wants_notifications(&self) -> bool {
        self.notify_management || self.notify_security
    }
}

/// Editable fields, in on-screen order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmergencyField {
    Title,
    Description,
    EmergencyType,
    Location,
    ContactNumber,
    ImmediateAction,
    NotifyManagement,
    NotifySecurity,
}

impl EmergencyField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "Emergency Title",
            Self::Description => "Description",
            Self::EmergencyType => "Emergency Type",
            Self::Location => "Location",
            Self::ContactNumber => "Contact Number",
            Self::ImmediateAction => "Requires immediate action",
            Self::NotifyManagement => "Notify building management",
            Self::NotifySecurity => "Notify security team",
        }
    }

    pub fn is_toggle(&self) -> bool {
        matches!(
            self,
            Self::ImmediateAction | Self::NotifyManagement | Self::NotifySecurity
        )
    }

    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Self::Title | Self::Description | Self::Location | Self::ContactNumber
        )
    }

    /// Current text of a text field
    pub fn text<'a>(&self, form: &'a EmergencyForm) -> Option<&'a str> {
        match self {
            Self::Title => Some(&form.title),
            Self::Description => Some(&form.description),
            Self::Location => Some(&form.location),
            Self::ContactNumber => Some(&form.contact_number),
            _ => None,
        }
    }

    /// Current value of a toggle field
    pub fn flag(&self, form: &EmergencyForm) -> Option<bool> {
        match self {
            Self::ImmediateAction => Some(form.immediate_action),
            Self::NotifyManagement => Some(form.notify_management),
            Self::NotifySecurity => Some(form.notify_security),
            _ => None,
        }
    }

    /// Update replacing this text field's value
    pub fn with_text(&self, value: String) -> Option<FieldUpdate> {
        match self {
            Self::Title => Some(FieldUpdate::Title(value)),
            Self::Description => Some(FieldUpdate::Description(value)),
            Self::Location => Some(FieldUpdate::Location(value)),
            Self::ContactNumber => Some(FieldUpdate::ContactNumber(value)),
            _ => None,
        }
    }

    /// Update flipping this toggle field
    pub fn toggled(&self, form: &EmergencyForm) -> Option<FieldUpdate> {
        match self {
            Self::ImmediateAction => Some(FieldUpdate::ImmediateAction(!form.immediate_action)),
            Self::NotifyManagement => Some(FieldUpdate::NotifyManagement(!form.notify_management)),
            Self::NotifySecurity => Some(FieldUpdate::NotifySecurity(!form.notify_security)),
            _ => None,
        }
    }
}
